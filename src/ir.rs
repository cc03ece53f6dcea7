use crate::graph::{FillStyle, LabelStyle, LineStyle};
use crate::stats::{FiveNumberSummary, Grouped};
use chrono::NaiveDateTime;

// =============================================================================
// Phase 1: Transformation
// =============================================================================

/// Statistics computed from the typed rows, ready for scaling
#[derive(Debug, Clone, PartialEq)]
pub enum ChartData {
    /// Five-number summary per category, in first-appearance order
    Boxplot {
        summaries: Grouped<String, FiveNumberSummary>,
    },
    /// Mean value per (group, series) pair
    GroupedBar {
        groups: Vec<String>,
        series: Vec<String>,
        values: Grouped<(String, String), f64>,
    },
    /// Mean value per instant, sorted by time
    Line { points: Vec<(NaiveDateTime, f64)> },
}

impl ChartData {
    /// Every y value the chart will draw
    pub fn y_values(&self) -> Vec<f64> {
        match self {
            ChartData::Boxplot { summaries } => summaries
                .values()
                .flat_map(|s| [s.min, s.max])
                .collect(),
            ChartData::GroupedBar { values, .. } => values.values().copied().collect(),
            ChartData::Line { points } => points.iter().map(|(_, v)| *v).collect(),
        }
    }
}

// =============================================================================
// Phase 2: Compilation (Scene Graph)
// =============================================================================

/// A list of primitive drawing commands in pixel coordinates.
/// The backend just executes these blindly.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneGraph {
    pub width: u32,
    pub height: u32,
    pub commands: Vec<DrawCommand>,
}

impl SceneGraph {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
        }
    }

    pub fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    pub fn rects(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::DrawRect { .. }))
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::DrawText { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Open polyline
    DrawLine {
        points: Vec<(f64, f64)>,
        style: LineStyle,
    },
    DrawRect {
        // Top-Left, Bottom-Right
        tl: (f64, f64),
        br: (f64, f64),
        style: FillStyle,
    },
    DrawText {
        pos: (f64, f64),
        text: String,
        style: LabelStyle,
    },
}
