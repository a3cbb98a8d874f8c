// Color palettes for depression status and pie categories

use std::collections::HashMap;
use std::fmt;

use crate::record::YesNo;

/// An sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color(pub u8, pub u8, pub u8);

impl Color {
    pub const BLACK: Color = Color(0, 0, 0);
    pub const WHITE: Color = Color(255, 255, 255);
    pub const STEELBLUE: Color = Color(70, 130, 180);
    pub const LIGHTGRAY: Color = Color(211, 211, 211);
    pub const NOT_DEPRESSED: Color = Color(0x1f, 0x77, 0xb4);
    pub const DEPRESSED: Color = Color(0xff, 0x00, 0x00);

    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.hex())
    }
}

/// Fixed two-color scale for depression status.
pub fn status_color(status: YesNo) -> Color {
    match status {
        YesNo::No => Color::NOT_DEPRESSED,
        YesNo::Yes => Color::DEPRESSED,
    }
}

/// Color palette for categorical data
pub struct ColorPalette {
    colors: Vec<Color>,
}

impl ColorPalette {
    /// ColorBrewer Set3, 12 pastel colors.
    pub fn set3() -> Self {
        ColorPalette {
            colors: vec![
                Color(0x8d, 0xd3, 0xc7),
                Color(0xff, 0xff, 0xb3),
                Color(0xbe, 0xba, 0xda),
                Color(0xfb, 0x80, 0x72),
                Color(0x80, 0xb1, 0xd3),
                Color(0xfd, 0xb4, 0x62),
                Color(0xb3, 0xde, 0x69),
                Color(0xfc, 0xcd, 0xe5),
                Color(0xd9, 0xd9, 0xd9),
                Color(0xbc, 0x80, 0xbd),
                Color(0xcc, 0xeb, 0xc5),
                Color(0xff, 0xed, 0x6f),
            ],
        }
    }

    /// Get color for a specific index (wraps around if index > palette size)
    pub fn get_color(&self, index: usize) -> Color {
        self.colors[index % self.colors.len()]
    }

    /// Assign colors to category keys in order.
    pub fn assign_colors(&self, keys: &[String]) -> HashMap<String, Color> {
        keys.iter()
            .enumerate()
            .map(|(i, key)| (key.clone(), self.get_color(i)))
            .collect()
    }
}
