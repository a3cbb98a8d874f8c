use anyhow::{anyhow, Context, Result};
use image::ImageEncoder;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::Color as _;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use tracing::warn;

use crate::ir::{self, Anchor, DrawCommand, Scene};
use crate::palette::Color;

/// Render a settled or mid-transition scene as an SVG document.
pub fn render_svg(scene: &Scene) -> Result<String> {
    if scene.width == 0 || scene.height == 0 {
        return Ok(format!(
            "<svg width=\"{}\" height=\"{}\" xmlns=\"http://www.w3.org/2000/svg\"></svg>",
            scene.width, scene.height
        ));
    }

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (scene.width, scene.height)).into_drawing_area();
        draw_scene(&root, scene)?;
        root.present()
            .map_err(|e| anyhow!("Failed to present SVG: {:?}", e))?;
    }
    Ok(svg)
}

/// Render a scene to PNG bytes.
pub fn render_png(scene: &Scene) -> Result<Vec<u8>> {
    if scene.width == 0 || scene.height == 0 {
        anyhow::bail!(
            "Cannot rasterize an empty viewport ({}x{})",
            scene.width,
            scene.height
        );
    }

    let len = (scene.width as usize)
        .checked_mul(scene.height as usize)
        .and_then(|n| n.checked_mul(3))
        .with_context(|| format!("Viewport {}x{} is too large to rasterize", scene.width, scene.height))?;
    let mut buffer = vec![0u8; len];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (scene.width, scene.height))
            .into_drawing_area();
        draw_scene(&root, scene)?;
        root.present()
            .map_err(|e| anyhow!("Failed to present drawing: {:?}", e))?;
    }

    let mut png_bytes = Vec::new();
    {
        let encoder = image::codecs::png::PngEncoder::new(&mut png_bytes);
        encoder
            .write_image(&buffer, scene.width, scene.height, image::ColorType::Rgb8)
            .context("Failed to encode PNG")?;
    }

    Ok(png_bytes)
}

fn draw_scene<DB: DrawingBackend>(root: &DrawingArea<DB, Shift>, scene: &Scene) -> Result<()> {
    root.fill(&WHITE)
        .map_err(|e| anyhow!("Failed to fill background: {:?}", e))?;

    for group in &scene.groups {
        for command in &group.commands {
            match draw_command(root, command) {
                Ok(()) => {}
                // Raster text needs a system font
                Err(e) if matches!(command, DrawCommand::Text { .. }) => {
                    warn!(layer = group.id, error = ?e, "text skipped");
                }
                Err(e) => return Err(anyhow!("Failed to draw '{}' layer: {:?}", group.id, e)),
            }
        }
    }
    Ok(())
}

fn draw_command<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    command: &DrawCommand,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    match command {
        DrawCommand::Rect { geom, fill, .. } => {
            if geom.width <= 0.0 || geom.height <= 0.0 {
                return Ok(());
            }
            root.draw(&Rectangle::new(
                [px((geom.x, geom.y)), px((geom.x + geom.width, geom.y + geom.height))],
                rgb(*fill).filled(),
            ))
        }
        DrawCommand::Wedge { geom, fill, stroke, .. } => {
            if geom.end_angle - geom.start_angle <= 0.0 {
                return Ok(());
            }
            let outline: Vec<(i32, i32)> = geom.outline().into_iter().map(px).collect();
            root.draw(&Polygon::new(outline.clone(), rgb(*fill).filled()))?;
            if let Some((color, width)) = stroke {
                let mut closed = outline;
                if let Some(first) = closed.first().copied() {
                    closed.push(first);
                }
                root.draw(&PathElement::new(closed, stroke_style(*color, *width)))?;
            }
            Ok(())
        }
        DrawCommand::Polyline { points, stroke, width, .. } => root.draw(&PathElement::new(
            points.iter().copied().map(px).collect::<Vec<_>>(),
            stroke_style(*stroke, *width),
        )),
        DrawCommand::Line { from, to, stroke, width } => root.draw(&PathElement::new(
            vec![px(*from), px(*to)],
            stroke_style(*stroke, *width),
        )),
        DrawCommand::Text { pos, text, style } => {
            root.draw(&Text::new(text.as_str(), px(*pos), text_style(style)))
        }
    }
}

fn text_style(style: &ir::TextStyle) -> TextStyle<'static> {
    let weight = if style.bold { FontStyle::Bold } else { FontStyle::Normal };
    let mut font = FontDesc::new(FontFamily::SansSerif, style.size, weight);
    if style.vertical {
        font = font.transform(FontTransform::Rotate270);
    }
    let hpos = match style.anchor {
        Anchor::Start => HPos::Left,
        Anchor::Middle => HPos::Center,
        Anchor::End => HPos::Right,
    };
    // Positions are baselines
    TextStyle::from(font)
        .color(&BLACK)
        .pos(Pos::new(hpos, VPos::Bottom))
}

// Sub-pixel strokes are drawn one pixel wide and faded instead.
fn stroke_style(color: Color, width: f64) -> ShapeStyle {
    if width < 1.0 {
        rgb(color).mix(width).stroke_width(1)
    } else {
        rgb(color).stroke_width(width.round() as u32)
    }
}

fn rgb(color: Color) -> RGBColor {
    RGBColor(color.0, color.1, color.2)
}

fn px(point: (f64, f64)) -> (i32, i32) {
    (point.0.round() as i32, point.1.round() as i32)
}
