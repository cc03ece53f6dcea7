use crate::curve;
use crate::graph::{Anchor, Baseline, FillStyle, LabelStyle, LineStyle};
use crate::ir::{ChartData, DrawCommand, SceneGraph};
use crate::palette::{resolve_color, OrdinalPalette, BOX_FILL, CATEGORY10, LINE_STROKE};
use crate::parser::ast::{AxisScale, BarLayer, BoxplotLayer, ChartSpec, Curve, Geom, Labels, LineLayer};
use crate::scale::{format_tick, format_time_tick, BandScale, LinearScale, TimeScale};
use crate::stats::{extent, FiveNumberSummary, Grouped};
use crate::RenderOptions;
use anyhow::{bail, Context, Result};
use chrono::NaiveDateTime;
use plotters::style::BLACK;

/// Requested number of y axis ticks
const Y_TICKS: usize = 10;
const TICK_SIZE: f64 = 6.0;
const TICK_PADDING: f64 = 3.0;
const TICK_FONT: f64 = 10.0;
const LEGEND_FONT: f64 = 11.0;
const AXIS_TITLE_FONT: f64 = 12.0;
const TITLE_FONT: f64 = 16.0;
const TITLE_SPACE: f64 = 24.0;
const AXIS_TITLE_SPACE: f64 = 18.0;
/// Largest accepted canvas side, in pixels
pub const MAX_CANVAS_SIDE: u32 = 16_384;

// =============================================================================
// Layout
// =============================================================================

/// Space around the plot area, in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Margins {
    pub fn for_geom(geom: &Geom) -> Self {
        match geom {
            Geom::Boxplot(_) => Margins {
                top: 20.0,
                right: 30.0,
                bottom: 40.0,
                left: 40.0,
            },
            // Wide right margin holds the legend
            Geom::Bar(_) => Margins {
                top: 20.0,
                right: 150.0,
                bottom: 50.0,
                left: 40.0,
            },
            Geom::Line(_) => Margins {
                top: 20.0,
                right: 30.0,
                bottom: 50.0,
                left: 40.0,
            },
        }
    }
}

/// Pixel rectangle the data is drawn in
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotArea {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl PlotArea {
    fn new(width: u32, height: u32, margins: Margins, labels: &Labels) -> Result<Self> {
        let extra = |present: bool, space: f64| if present { space } else { 0.0 };
        let area = PlotArea {
            left: margins.left + extra(labels.y.is_some(), AXIS_TITLE_SPACE),
            top: margins.top + extra(labels.title.is_some(), TITLE_SPACE),
            right: width as f64 - margins.right,
            bottom: height as f64 - margins.bottom - extra(labels.x.is_some(), AXIS_TITLE_SPACE),
        };
        if area.right <= area.left || area.bottom <= area.top {
            bail!("Canvas {}x{} is too small for the chart margins", width, height);
        }
        Ok(area)
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    fn x_range(&self) -> (f64, f64) {
        (self.left, self.right)
    }

    /// Pixel y grows downward, so the range runs bottom to top
    fn y_range(&self) -> (f64, f64) {
        (self.bottom, self.top)
    }
}

/// Order two corners as (top-left, bottom-right)
fn corners(a: (f64, f64), b: (f64, f64)) -> ((f64, f64), (f64, f64)) {
    ((a.0.min(b.0), a.1.min(b.1)), (a.0.max(b.0), a.1.max(b.1)))
}

fn stroke(width: f64) -> LineStyle {
    LineStyle {
        color: BLACK,
        width,
    }
}

// =============================================================================
// Scales
// =============================================================================

/// Y scale over the chart values, honouring `scale_y`/`ylim`
fn build_y_scale(values: &[f64], axis: &AxisScale, default_nice: bool, area: &PlotArea) -> Result<LinearScale> {
    let domain = match axis.limits {
        Some((lo, hi)) => {
            if !lo.is_finite() || !hi.is_finite() {
                bail!("ylim bounds must be finite, got ({}, {})", lo, hi);
            }
            (lo, hi)
        }
        None => {
            let (lo, hi) = extent(values.iter().copied()).unwrap_or((0.0, 0.0));
            if axis.zero.unwrap_or(true) {
                (lo.min(0.0), hi)
            } else {
                (lo, hi)
            }
        }
    };

    let scale = match LinearScale::try_new(domain, area.y_range()) {
        Ok(scale) => scale,
        Err(e) => {
            log::warn!("y axis: {}; drawing every value at the axis midpoint", e);
            LinearScale::new(domain, area.y_range())
        }
    };

    if axis.limits.is_none() && axis.nice.unwrap_or(default_nice) {
        Ok(scale.nice(Y_TICKS))
    } else {
        Ok(scale)
    }
}

fn build_time_scale(start: NaiveDateTime, end: NaiveDateTime, area: &PlotArea) -> TimeScale {
    match TimeScale::try_new((start, end), area.x_range()) {
        Ok(scale) => scale,
        Err(e) => {
            log::warn!("x axis: {}; drawing every point at the axis midpoint", e);
            TimeScale::new((start, end), area.x_range())
        }
    }
}

// =============================================================================
// Entry point
// =============================================================================

/// Compile chart statistics into a SceneGraph of drawing commands
pub fn compile_geometry(data: &ChartData, spec: &ChartSpec, options: &RenderOptions) -> Result<SceneGraph> {
    let (width, height) = options.size_for(&spec.geom);
    if width == 0 || height == 0 {
        bail!("Canvas size must be positive, got {}x{}", width, height);
    }
    if width > MAX_CANVAS_SIDE || height > MAX_CANVAS_SIDE {
        bail!(
            "Canvas size {}x{} exceeds the {}px limit per side",
            width,
            height,
            MAX_CANVAS_SIDE
        );
    }

    let area = PlotArea::new(width, height, Margins::for_geom(&spec.geom), &spec.labels)?;
    let y = build_y_scale(&data.y_values(), &spec.y_scale, spec.geom.default_nice(), &area)?;
    log::debug!("{}(): y domain {:?} -> range {:?}", spec.geom.name(), y.domain(), y.range());

    let mut scene = SceneGraph::new(width, height);
    draw_y_axis(&mut scene, &area, &y);

    match (&spec.geom, data) {
        (Geom::Boxplot(layer), ChartData::Boxplot { summaries }) => {
            compile_boxplot(&mut scene, &area, layer, &y, summaries)?
        }
        (Geom::Bar(layer), ChartData::GroupedBar { groups, series, values }) => {
            compile_bars(&mut scene, &area, layer, &y, groups, series, values)?
        }
        (Geom::Line(layer), ChartData::Line { points }) => {
            compile_line(&mut scene, &area, layer, &y, points)?
        }
        _ => bail!("Chart data does not match the {}() geometry", spec.geom.name()),
    }

    draw_labels(&mut scene, &area, &spec.labels);
    Ok(scene)
}

// =============================================================================
// Geometries
// =============================================================================

fn compile_boxplot(
    scene: &mut SceneGraph,
    area: &PlotArea,
    layer: &BoxplotLayer,
    y: &LinearScale,
    summaries: &Grouped<String, FiveNumberSummary>,
) -> Result<()> {
    let x = BandScale::new(summaries.keys().cloned(), area.x_range())
        .with_padding(layer.padding())
        .context("Invalid boxplot padding")?;
    log::debug!("boxplot(): {} groups, bandwidth {:.1}", x.domain().len(), x.bandwidth());

    draw_band_axis(scene, area, &x);

    let fill = resolve_color(layer.fill.as_deref(), BOX_FILL);
    let width = x.bandwidth();

    for (key, summary) in summaries.iter() {
        let (Some(left), Some(center)) = (x.position(key), x.center(key)) else {
            continue;
        };

        // Whisker from min to max, behind the box
        scene.push(DrawCommand::DrawLine {
            points: vec![(center, y.map(summary.min)), (center, y.map(summary.max))],
            style: stroke(1.0),
        });

        let (tl, br) = corners((left, y.map(summary.q3)), (left + width, y.map(summary.q1)));
        scene.push(DrawCommand::DrawRect {
            tl,
            br,
            style: FillStyle {
                color: fill,
                stroke: Some(BLACK),
            },
        });

        let median = y.map(summary.median);
        scene.push(DrawCommand::DrawLine {
            points: vec![(left, median), (left + width, median)],
            style: stroke(2.0),
        });
    }

    Ok(())
}

fn compile_bars(
    scene: &mut SceneGraph,
    area: &PlotArea,
    layer: &BarLayer,
    y: &LinearScale,
    groups: &[String],
    series: &[String],
    values: &Grouped<(String, String), f64>,
) -> Result<()> {
    let outer = BandScale::new(groups.iter().cloned(), area.x_range())
        .with_padding(layer.padding())
        .context("Invalid bar padding")?;
    let inner = BandScale::new(series.iter().cloned(), (0.0, outer.bandwidth()))
        .with_padding(layer.inner_padding())
        .context("Invalid bar inner_padding")?;
    let palette = OrdinalPalette::new(series.iter().cloned(), &CATEGORY10);

    draw_band_axis(scene, area, &outer);

    // Bars grow from zero, or from the nearest domain edge when zero is outside
    let (d0, d1) = y.domain();
    let baseline = y.map(0.0_f64.clamp(d0.min(d1), d0.max(d1)));

    for ((group, serie), value) in values.iter() {
        let (Some(group_x), Some(serie_x)) = (outer.position(group), inner.position(serie)) else {
            continue;
        };
        let left = group_x + serie_x;
        let (tl, br) = corners((left, y.map(*value)), (left + inner.bandwidth(), baseline));
        scene.push(DrawCommand::DrawRect {
            tl,
            br,
            style: FillStyle {
                color: palette.color(serie),
                stroke: None,
            },
        });
    }

    draw_legend(scene, area, &palette);
    Ok(())
}

fn compile_line(
    scene: &mut SceneGraph,
    area: &PlotArea,
    layer: &LineLayer,
    y: &LinearScale,
    points: &[(NaiveDateTime, f64)],
) -> Result<()> {
    let (Some(&(start, _)), Some(&(end, _))) = (points.first(), points.last()) else {
        bail!("line() needs at least one point");
    };
    let x = build_time_scale(start, end, area);
    log::debug!("line(): x domain {:?}, {} points", x.domain(), points.len());

    draw_time_axis(scene, area, &x);

    let pixels: Vec<(f64, f64)> = points.iter().map(|&(t, v)| (x.map(t), y.map(v))).collect();
    let path = match layer.curve() {
        Curve::Natural => curve::natural(&pixels, curve::DEFAULT_SAMPLES),
        Curve::Linear => pixels,
    };

    scene.push(DrawCommand::DrawLine {
        points: path,
        style: LineStyle {
            color: resolve_color(layer.color.as_deref(), LINE_STROKE),
            width: layer.width(),
        },
    });

    Ok(())
}

// =============================================================================
// Axes, legend, labels
// =============================================================================

fn draw_y_axis(scene: &mut SceneGraph, area: &PlotArea, y: &LinearScale) {
    scene.push(DrawCommand::DrawLine {
        points: vec![(area.left, area.top), (area.left, area.bottom)],
        style: stroke(1.0),
    });

    let step = y.tick_step(Y_TICKS);
    for value in y.ticks(Y_TICKS) {
        let py = y.map(value);
        scene.push(DrawCommand::DrawLine {
            points: vec![(area.left - TICK_SIZE, py), (area.left, py)],
            style: stroke(1.0),
        });
        scene.push(DrawCommand::DrawText {
            pos: (area.left - TICK_SIZE - TICK_PADDING, py),
            text: format_tick(value, step),
            style: LabelStyle::new(TICK_FONT)
                .anchor(Anchor::End)
                .baseline(Baseline::Middle),
        });
    }
}

fn x_axis_rule(scene: &mut SceneGraph, area: &PlotArea) {
    scene.push(DrawCommand::DrawLine {
        points: vec![(area.left, area.bottom), (area.right, area.bottom)],
        style: stroke(1.0),
    });
}

fn x_tick(scene: &mut SceneGraph, area: &PlotArea, px: f64, text: String) {
    scene.push(DrawCommand::DrawLine {
        points: vec![(px, area.bottom), (px, area.bottom + TICK_SIZE)],
        style: stroke(1.0),
    });
    scene.push(DrawCommand::DrawText {
        pos: (px, area.bottom + TICK_SIZE + TICK_PADDING),
        text,
        style: LabelStyle::new(TICK_FONT)
            .anchor(Anchor::Middle)
            .baseline(Baseline::Top),
    });
}

fn draw_band_axis(scene: &mut SceneGraph, area: &PlotArea, x: &BandScale<String>) {
    x_axis_rule(scene, area);
    for key in x.domain() {
        if let Some(center) = x.center(key) {
            x_tick(scene, area, center, key.clone());
        }
    }
}

fn draw_time_axis(scene: &mut SceneGraph, area: &PlotArea, x: &TimeScale) {
    x_axis_rule(scene, area);
    let count = ((area.width() / 80.0) as usize).clamp(2, 10);
    for t in x.ticks(count) {
        x_tick(scene, area, x.map(t), format_time_tick(t));
    }
}

fn draw_legend(scene: &mut SceneGraph, area: &PlotArea, palette: &OrdinalPalette<String>) {
    let x = area.right + 20.0;
    for (i, (name, color)) in palette.entries().enumerate() {
        let top = area.top + i as f64 * 20.0;
        scene.push(DrawCommand::DrawRect {
            tl: (x, top),
            br: (x + 12.0, top + 12.0),
            style: FillStyle {
                color,
                stroke: None,
            },
        });
        scene.push(DrawCommand::DrawText {
            pos: (x + 18.0, top + 6.0),
            text: name.clone(),
            style: LabelStyle::new(LEGEND_FONT).baseline(Baseline::Middle),
        });
    }
}

fn draw_labels(scene: &mut SceneGraph, area: &PlotArea, labels: &Labels) {
    let center_x = (area.left + area.right) / 2.0;
    let height = scene.height as f64;

    if let Some(title) = &labels.title {
        scene.push(DrawCommand::DrawText {
            pos: (center_x, 4.0),
            text: title.clone(),
            style: LabelStyle::new(TITLE_FONT)
                .anchor(Anchor::Middle)
                .baseline(Baseline::Top),
        });
    }
    if let Some(x_label) = &labels.x {
        scene.push(DrawCommand::DrawText {
            pos: (center_x, height - 4.0),
            text: x_label.clone(),
            style: LabelStyle::new(AXIS_TITLE_FONT)
                .anchor(Anchor::Middle)
                .baseline(Baseline::Bottom),
        });
    }
    if let Some(y_label) = &labels.y {
        scene.push(DrawCommand::DrawText {
            pos: (4.0, (area.top + area.bottom) / 2.0),
            text: y_label.clone(),
            style: LabelStyle::new(AXIS_TITLE_FONT)
                .anchor(Anchor::Middle)
                .baseline(Baseline::Top)
                .vertical(),
        });
    }
}
