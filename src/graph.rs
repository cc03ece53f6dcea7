// Backend: executes a SceneGraph on a plotters drawing area

use crate::ir::{DrawCommand, SceneGraph};
use crate::OutputFormat;
use anyhow::{anyhow, Context, Result};
use image::ImageEncoder;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

/// Stroke for polylines and axis rules
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineStyle {
    pub color: RGBColor,
    pub width: f64,
}

/// Fill (and optional outline) for rectangles
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FillStyle {
    pub color: RGBColor,
    pub stroke: Option<RGBColor>,
}

/// Horizontal text anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Start,
    Middle,
    End,
}

/// Vertical text anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Baseline {
    Top,
    Middle,
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelStyle {
    pub size: f64,
    pub color: RGBColor,
    pub anchor: Anchor,
    pub baseline: Baseline,
    /// Rotate a quarter turn counter-clockwise (y axis titles)
    pub vertical: bool,
}

impl LabelStyle {
    pub fn new(size: f64) -> Self {
        Self {
            size,
            color: BLACK,
            anchor: Anchor::Start,
            baseline: Baseline::Bottom,
            vertical: false,
        }
    }

    pub fn anchor(mut self, anchor: Anchor) -> Self {
        self.anchor = anchor;
        self
    }

    pub fn baseline(mut self, baseline: Baseline) -> Self {
        self.baseline = baseline;
        self
    }

    pub fn vertical(mut self) -> Self {
        self.vertical = true;
        self
    }
}

/// Render a scene to PNG or SVG bytes
pub fn render_scene(scene: &SceneGraph, format: OutputFormat) -> Result<Vec<u8>> {
    match format {
        OutputFormat::Png => render_png(scene),
        OutputFormat::Svg => render_svg(scene).map(String::into_bytes),
    }
}

fn render_png(scene: &SceneGraph) -> Result<Vec<u8>> {
    let len = (scene.width as usize)
        .checked_mul(scene.height as usize)
        .and_then(|pixels| pixels.checked_mul(3))
        .ok_or_else(|| anyhow!("Canvas {}x{} is too large", scene.width, scene.height))?;
    let mut buffer = vec![0u8; len];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (scene.width, scene.height))
            .into_drawing_area();
        draw_scene(&root, scene)?;
        root.present().context("Failed to present drawing")?;
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

fn render_svg(scene: &SceneGraph) -> Result<String> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (scene.width, scene.height))
            .into_drawing_area();
        draw_scene(&root, scene)?;
        root.present().context("Failed to present drawing")?;
    }
    Ok(svg)
}

fn draw_scene<DB>(root: &DrawingArea<DB, Shift>, scene: &SceneGraph) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.fill(&WHITE).context("Failed to fill background")?;

    for command in &scene.commands {
        match command {
            DrawCommand::DrawLine { points, style } => {
                let pixels: Vec<(i32, i32)> = points.iter().map(|&p| to_pixel(p)).collect();
                let width = style.width.round().max(1.0) as u32;
                root.draw(&PathElement::new(pixels, style.color.stroke_width(width)))
                    .context("Failed to draw line")?;
            }
            DrawCommand::DrawRect { tl, br, style } => {
                let corners = [to_pixel(*tl), to_pixel(*br)];
                root.draw(&Rectangle::new(corners, style.color.filled()))
                    .context("Failed to draw rectangle")?;
                if let Some(stroke) = style.stroke {
                    root.draw(&Rectangle::new(corners, stroke.stroke_width(1)))
                        .context("Failed to draw rectangle outline")?;
                }
            }
            DrawCommand::DrawText { pos, text, style } => {
                // Missing fonts only cost the label, not the chart
                if let Err(e) = draw_label(root, *pos, text, style) {
                    log::warn!("Skipping label '{}': {}", text, e);
                }
            }
        }
    }

    Ok(())
}

fn draw_label<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    pos: (f64, f64),
    text: &str,
    style: &LabelStyle,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    let h_pos = match style.anchor {
        Anchor::Start => HPos::Left,
        Anchor::Middle => HPos::Center,
        Anchor::End => HPos::Right,
    };
    let v_pos = match style.baseline {
        Baseline::Top => VPos::Top,
        Baseline::Middle => VPos::Center,
        Baseline::Bottom => VPos::Bottom,
    };

    let mut text_style = ("sans-serif", style.size)
        .into_font()
        .color(&style.color)
        .pos(Pos::new(h_pos, v_pos));
    if style.vertical {
        text_style = text_style.transform(FontTransform::Rotate270);
    }

    root.draw_text(text, &text_style, to_pixel(pos))
}

fn to_pixel((x, y): (f64, f64)) -> (i32, i32) {
    (x.round() as i32, y.round() as i32)
}
