// Dashboard configuration: a JSON list of charts to render

use crate::{OutputFormat, RenderOptions};
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

/// One chart of the dashboard
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChartJob {
    /// Output file stem; must be a plain file name
    pub name: String,
    /// CSV or JSON table
    pub input: PathBuf,
    pub dsl: String,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub format: Option<OutputFormat>,
}

impl ChartJob {
    pub fn options(&self, default_format: OutputFormat) -> RenderOptions {
        RenderOptions {
            width: self.width,
            height: self.height,
            format: self.format.unwrap_or(default_format),
        }
    }

    /// `<output_dir>/<name>.<ext>`
    pub fn output_path(&self, output_dir: &Path, default_format: OutputFormat) -> PathBuf {
        let format = self.format.unwrap_or(default_format);
        output_dir.join(format!("{}.{}", self.name, format.extension()))
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DashboardConfig {
    pub output_dir: PathBuf,
    #[serde(default)]
    pub format: OutputFormat,
    pub charts: Vec<ChartJob>,
}

impl DashboardConfig {
    /// Parse and validate a config from any reader
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let config: DashboardConfig =
            serde_json::from_reader(reader).context("Failed to parse dashboard config")?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file. Relative paths inside it are taken relative to
    /// the file's directory.
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open dashboard config '{}'", path.display()))?;
        let mut config = Self::from_reader(BufReader::new(file))
            .with_context(|| format!("Invalid dashboard config '{}'", path.display()))?;

        if let Some(base) = path.parent() {
            config.rebase(base);
        }
        Ok(config)
    }

    fn rebase(&mut self, base: &Path) {
        if self.output_dir.is_relative() {
            self.output_dir = base.join(&self.output_dir);
        }
        for chart in &mut self.charts {
            if chart.input.is_relative() {
                chart.input = base.join(&chart.input);
            }
        }
    }

    fn validate(&self) -> Result<()> {
        if self.charts.is_empty() {
            bail!("Dashboard config lists no charts");
        }

        let mut seen = HashSet::new();
        for chart in &self.charts {
            let plain = Path::new(&chart.name)
                .file_name()
                .map(|n| n.to_str() == Some(chart.name.as_str()))
                .unwrap_or(false);
            if chart.name.is_empty() || !plain {
                bail!("Chart name '{}' must be a plain file name", chart.name);
            }
            if !seen.insert(chart.name.as_str()) {
                bail!("Chart name '{}' is used more than once", chart.name);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str = r#"{
        "output_dir": "out",
        "format": "svg",
        "charts": [
            {"name": "likes_box", "input": "data/socialMedia.csv", "dsl": "boxplot()"},
            {"name": "likes_bar", "input": "/abs/avg.csv", "dsl": "bar()", "width": 640, "format": "png"}
        ]
    }"#;

    #[test]
    fn test_parse_config() {
        let config = DashboardConfig::from_reader(CONFIG.as_bytes()).unwrap();
        assert_eq!(config.format, OutputFormat::Svg);
        assert_eq!(config.charts.len(), 2);

        let box_job = &config.charts[0];
        let options = box_job.options(config.format);
        assert_eq!(options.format, OutputFormat::Svg);
        assert_eq!(options.width, None);
        assert_eq!(
            box_job.output_path(Path::new("out"), config.format),
            PathBuf::from("out/likes_box.svg")
        );

        let bar_job = &config.charts[1];
        assert_eq!(bar_job.options(config.format).width, Some(640));
        assert_eq!(
            bar_job.output_path(Path::new("out"), config.format),
            PathBuf::from("out/likes_bar.png")
        );
    }

    #[test]
    fn test_default_format_is_png() {
        let config = DashboardConfig::from_reader(
            r#"{"output_dir": ".", "charts": [{"name": "a", "input": "a.csv", "dsl": "line()"}]}"#.as_bytes(),
        )
        .unwrap();
        assert_eq!(config.format, OutputFormat::Png);
    }

    #[test]
    fn test_rebase_relative_paths() {
        let mut config = DashboardConfig::from_reader(CONFIG.as_bytes()).unwrap();
        config.rebase(Path::new("/srv/dash"));
        assert_eq!(config.output_dir, PathBuf::from("/srv/dash/out"));
        assert_eq!(config.charts[0].input, PathBuf::from("/srv/dash/data/socialMedia.csv"));
        assert_eq!(config.charts[1].input, PathBuf::from("/abs/avg.csv"));
    }

    #[test]
    fn test_rejects_bad_names() {
        let dup = r#"{"output_dir": ".", "charts": [
            {"name": "a", "input": "a.csv", "dsl": "bar()"},
            {"name": "a", "input": "b.csv", "dsl": "bar()"}
        ]}"#;
        assert!(DashboardConfig::from_reader(dup.as_bytes()).is_err());

        let nested = r#"{"output_dir": ".", "charts": [{"name": "../a", "input": "a.csv", "dsl": "bar()"}]}"#;
        assert!(DashboardConfig::from_reader(nested.as_bytes()).is_err());

        let empty = r#"{"output_dir": ".", "charts": []}"#;
        assert!(DashboardConfig::from_reader(empty.as_bytes()).is_err());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let typo = r#"{"output_dir": ".", "charts": [{"name": "a", "input": "a.csv", "dls": "bar()"}]}"#;
        assert!(DashboardConfig::from_reader(typo.as_bytes()).is_err());
    }
}
