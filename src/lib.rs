// Library exports for socialplot

pub mod csv_reader;
pub mod data;
pub mod error;
pub mod graph;
pub mod palette;
pub mod parser;
pub mod prepare;
pub mod runtime;
pub mod stats;

// Rendering pipeline
pub mod compiler;
pub mod config;
pub mod curve;
pub mod ir;
pub mod scale;
pub mod transform;

use parser::ast::Geom;
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[serde(rename = "png")]
    #[default]
    Png,
    #[serde(rename = "svg")]
    Svg,
}

impl OutputFormat {
    /// Guess the format from a file extension
    pub fn from_path(path: &std::path::Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        if ext.eq_ignore_ascii_case("png") {
            Some(OutputFormat::Png)
        } else if ext.eq_ignore_ascii_case("svg") {
            Some(OutputFormat::Svg)
        } else {
            None
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Svg => "svg",
        }
    }
}

/// Canvas size and encoding. A missing dimension falls back to the chart
/// kind's default size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
pub struct RenderOptions {
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default, rename = "type")]
    pub format: OutputFormat,
}

impl RenderOptions {
    pub fn size_for(&self, geom: &Geom) -> (u32, u32) {
        let (width, height) = geom.default_size();
        (self.width.unwrap_or(width), self.height.unwrap_or(height))
    }
}
