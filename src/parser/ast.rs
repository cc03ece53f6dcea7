// Abstract Syntax Tree for the chart DSL

use crate::data::DEFAULT_DATE_FORMAT;

/// A parsed chart: one geometry plus optional modifiers
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub geom: Geom,
    pub labels: Labels,
    pub y_scale: AxisScale,
}

impl ChartSpec {
    pub fn new(geom: Geom) -> Self {
        Self {
            geom,
            labels: Labels::default(),
            y_scale: AxisScale::default(),
        }
    }
}

/// The chart geometry
#[derive(Debug, Clone, PartialEq)]
pub enum Geom {
    Boxplot(BoxplotLayer),
    Bar(BarLayer),
    Line(LineLayer),
}

impl Geom {
    pub fn name(&self) -> &'static str {
        match self {
            Geom::Boxplot(_) => "boxplot",
            Geom::Bar(_) => "bar",
            Geom::Line(_) => "line",
        }
    }

    /// Canvas size used when the caller does not give one
    pub fn default_size(&self) -> (u32, u32) {
        match self {
            Geom::Boxplot(_) => (900, 500),
            Geom::Bar(_) | Geom::Line(_) => (800, 400),
        }
    }

    /// Whether the y domain is rounded to tick multiples by default
    pub fn default_nice(&self) -> bool {
        !matches!(self, Geom::Boxplot(_))
    }
}

/// Box-and-whisker per category
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BoxplotLayer {
    pub x: Option<String>,
    pub y: Option<String>,
    pub padding: Option<f64>,
    pub fill: Option<String>,
}

impl BoxplotLayer {
    pub fn x_column(&self) -> &str {
        self.x.as_deref().unwrap_or("Platform")
    }

    pub fn y_column(&self) -> &str {
        self.y.as_deref().unwrap_or("Likes")
    }

    pub fn padding(&self) -> f64 {
        self.padding.unwrap_or(0.1)
    }
}

/// Bars grouped by category, one bar per series inside each group
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BarLayer {
    pub x: Option<String>,
    /// Series column; bars are colored by it
    pub fill: Option<String>,
    pub y: Option<String>,
    pub padding: Option<f64>,
    pub inner_padding: Option<f64>,
}

impl BarLayer {
    pub fn x_column(&self) -> &str {
        self.x.as_deref().unwrap_or("Platform")
    }

    pub fn fill_column(&self) -> &str {
        self.fill.as_deref().unwrap_or("PostType")
    }

    pub fn y_column(&self) -> &str {
        self.y.as_deref().unwrap_or("Likes")
    }

    pub fn padding(&self) -> f64 {
        self.padding.unwrap_or(0.1)
    }

    pub fn inner_padding(&self) -> f64 {
        self.inner_padding.unwrap_or(0.05)
    }
}

/// Path interpolation between line points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Curve {
    #[default]
    Natural,
    Linear,
}

/// Time series line
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LineLayer {
    pub x: Option<String>,
    pub y: Option<String>,
    /// chrono format of the date column
    pub format: Option<String>,
    pub color: Option<String>,
    pub width: Option<f64>,
    pub curve: Option<Curve>,
}

impl LineLayer {
    pub fn x_column(&self) -> &str {
        self.x.as_deref().unwrap_or("Date")
    }

    pub fn y_column(&self) -> &str {
        self.y.as_deref().unwrap_or("Likes")
    }

    pub fn date_format(&self) -> &str {
        self.format.as_deref().unwrap_or(DEFAULT_DATE_FORMAT)
    }

    pub fn width(&self) -> f64 {
        self.width.unwrap_or(1.5)
    }

    pub fn curve(&self) -> Curve {
        self.curve.unwrap_or_default()
    }
}

/// Plot labels (title, axes)
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Labels {
    pub title: Option<String>,
    pub x: Option<String>,
    pub y: Option<String>,
}

impl Labels {
    /// Fields set in `other` replace ours
    pub fn merge(&mut self, other: Labels) {
        if other.title.is_some() {
            self.title = other.title;
        }
        if other.x.is_some() {
            self.x = other.x;
        }
        if other.y.is_some() {
            self.y = other.y;
        }
    }
}

/// Y axis configuration
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AxisScale {
    pub nice: Option<bool>,
    pub zero: Option<bool>,
    pub limits: Option<(f64, f64)>,
}

impl AxisScale {
    pub fn merge(&mut self, other: AxisScale) {
        if other.nice.is_some() {
            self.nice = other.nice;
        }
        if other.zero.is_some() {
            self.zero = other.zero;
        }
        if other.limits.is_some() {
            self.limits = other.limits;
        }
    }
}
