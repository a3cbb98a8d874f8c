// Axis drawing shared by the cartesian charts.

use crate::ir::{Anchor, DrawCommand, TextStyle};
use crate::palette::Color;

const TICK_SIZE: f64 = 6.0;
const TICK_PADDING: f64 = 3.0;
const FONT_SIZE: f64 = 10.0;

/// Horizontal axis along `y`, one tick per `(position, label)`.
pub fn bottom_axis(y: f64, span: (f64, f64), ticks: &[(f64, String)]) -> Vec<DrawCommand> {
    let mut commands = vec![DrawCommand::Line {
        from: (span.0, y),
        to: (span.1, y),
        stroke: Color::BLACK,
        width: 1.0,
    }];
    for (x, label) in ticks {
        commands.push(DrawCommand::Line {
            from: (*x, y),
            to: (*x, y + TICK_SIZE),
            stroke: Color::BLACK,
            width: 1.0,
        });
        commands.push(DrawCommand::Text {
            pos: (*x, y + TICK_SIZE + TICK_PADDING + FONT_SIZE * 0.71),
            text: label.clone(),
            style: TextStyle::centered(FONT_SIZE),
        });
    }
    commands
}

/// Vertical axis along `x` with labels to its left.
pub fn left_axis(x: f64, span: (f64, f64), ticks: &[(f64, String)]) -> Vec<DrawCommand> {
    let mut commands = vec![DrawCommand::Line {
        from: (x, span.0),
        to: (x, span.1),
        stroke: Color::BLACK,
        width: 1.0,
    }];
    for (y, label) in ticks {
        commands.push(DrawCommand::Line {
            from: (x - TICK_SIZE, *y),
            to: (x, *y),
            stroke: Color::BLACK,
            width: 1.0,
        });
        commands.push(DrawCommand::Text {
            pos: (x - TICK_SIZE - TICK_PADDING, *y + FONT_SIZE * 0.32),
            text: label.clone(),
            style: TextStyle {
                anchor: Anchor::End,
                ..TextStyle::plain(FONT_SIZE)
            },
        });
    }
    commands
}

/// Tick label for a count axis: integers without a fraction.
pub fn format_tick(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{:.1}", value)
    }
}
