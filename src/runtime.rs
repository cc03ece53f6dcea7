// Runtime executor: DSL + table -> image bytes, and the dashboard runner

use crate::compiler::compile_geometry;
use crate::config::{ChartJob, DashboardConfig};
use crate::csv_reader::load_table;
use crate::data::PlotData;
use crate::graph::render_scene;
use crate::parser::{parse_chart_spec, ChartSpec};
use crate::transform::apply_transformations;
use crate::RenderOptions;
use anyhow::{anyhow, Context, Result};
use rayon::prelude::*;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Render a parsed chart against a table
pub fn render_chart(spec: &ChartSpec, data: &PlotData, options: &RenderOptions) -> Result<Vec<u8>> {
    let chart_data = apply_transformations(spec, data)
        .with_context(|| format!("Failed to prepare data for {}()", spec.geom.name()))?;
    let scene = compile_geometry(&chart_data, spec, options).context("Failed to lay out chart")?;
    render_scene(&scene, options.format).context("Failed to render chart")
}

/// Parse a DSL string and render it against a table
pub fn render_dsl(dsl: &str, data: &PlotData, options: &RenderOptions) -> Result<Vec<u8>> {
    let spec = parse_chart_spec(dsl).with_context(|| format!("Invalid chart DSL: {}", dsl))?;
    render_chart(&spec, data, options)
}

/// Render every chart of a dashboard in parallel.
///
/// Each distinct input is loaded once. Failures are logged per chart; the
/// first one (in config order) is returned after all charts have run.
pub fn run_dashboard(config: &DashboardConfig) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(&config.output_dir).with_context(|| {
        format!("Failed to create output directory '{}'", config.output_dir.display())
    })?;

    let mut inputs: Vec<&Path> = Vec::new();
    for job in &config.charts {
        if !inputs.contains(&job.input.as_path()) {
            inputs.push(job.input.as_path());
        }
    }
    let tables: HashMap<&Path, Result<PlotData>> = inputs
        .into_par_iter()
        .map(|path| (path, load_table(path)))
        .collect();

    let results: Vec<(&ChartJob, Result<PathBuf>)> = config
        .charts
        .par_iter()
        .map(|job| {
            let result = match tables.get(job.input.as_path()) {
                Some(Ok(data)) => render_job(job, data, config),
                Some(Err(e)) => Err(anyhow!("{:#}", e)),
                None => Err(anyhow!("Input '{}' was not loaded", job.input.display())),
            };
            (job, result)
        })
        .collect();

    let mut written = Vec::with_capacity(results.len());
    let mut first_error = None;
    for (job, result) in results {
        match result {
            Ok(path) => written.push(path),
            Err(e) => {
                log::error!("Chart '{}' failed: {:#}", job.name, e);
                if first_error.is_none() {
                    first_error = Some(e.context(format!("Chart '{}' failed", job.name)));
                }
            }
        }
    }

    match first_error {
        Some(e) => Err(e),
        None => Ok(written),
    }
}

fn render_job(job: &ChartJob, data: &PlotData, config: &DashboardConfig) -> Result<PathBuf> {
    let options = job.options(config.format);
    let bytes = render_dsl(&job.dsl, data, &options)?;
    let path = job.output_path(&config.output_dir, config.format);
    fs::write(&path, bytes).with_context(|| format!("Failed to write '{}'", path.display()))?;
    log::info!("Wrote chart '{}' to {}", job.name, path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::OutputFormat;

    fn make_plot_data(headers: Vec<&str>, rows: Vec<Vec<&str>>) -> PlotData {
        PlotData::new(
            headers.into_iter().map(String::from).collect(),
            rows.into_iter()
                .map(|r| r.into_iter().map(String::from).collect())
                .collect(),
        )
    }

    fn social() -> PlotData {
        make_plot_data(
            vec!["Platform", "PostType", "Date", "Likes"],
            vec![
                vec!["Instagram", "Video", "3/1/2024 (Friday)", "120"],
                vec!["Instagram", "Image", "3/2/2024 (Saturday)", "80"],
                vec!["Facebook", "Video", "3/3/2024 (Sunday)", "60"],
                vec!["Facebook", "Image", "3/4/2024 (Monday)", "95"],
            ],
        )
    }

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("socialplot-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_render_dsl_png() {
        let bytes = render_dsl("boxplot()", &social(), &RenderOptions::default()).unwrap();
        assert_eq!(&bytes[..4], &[0x89, b'P', b'N', b'G']);
    }

    #[test]
    fn test_render_dsl_svg_all_kinds() {
        let options = RenderOptions {
            format: OutputFormat::Svg,
            ..RenderOptions::default()
        };
        for dsl in ["boxplot()", "bar()", "line()"] {
            let bytes = render_dsl(dsl, &social(), &options).unwrap();
            let svg = String::from_utf8(bytes).unwrap();
            assert!(svg.contains("<svg"), "{} did not render", dsl);
        }
    }

    #[test]
    fn test_render_dsl_reports_parse_error() {
        let err = render_dsl("pie()", &social(), &RenderOptions::default()).unwrap_err();
        assert!(format!("{:#}", err).contains("Parse error near 'pie()'"));
    }

    #[test]
    fn test_render_dsl_rejects_huge_canvas() {
        let options = RenderOptions {
            width: Some(70_000),
            height: Some(70_000),
            format: OutputFormat::Png,
        };
        let err = render_dsl("boxplot()", &social(), &options).unwrap_err();
        assert!(format!("{:#}", err).contains("exceeds"));
    }

    #[test]
    fn test_render_dsl_reports_missing_column() {
        let err = render_dsl("boxplot(x: Network)", &social(), &RenderOptions::default()).unwrap_err();
        let message = format!("{:#}", err);
        assert!(message.contains("boxplot()"));
        assert!(message.contains("Network"));
    }

    #[test]
    fn test_run_dashboard() {
        let dir = scratch_dir("dashboard");
        fs::create_dir_all(&dir).unwrap();
        let input = dir.join("social.csv");
        crate::csv_reader::write_csv_to_path(&social(), &input).unwrap();

        let config = DashboardConfig {
            output_dir: dir.join("out"),
            format: OutputFormat::Svg,
            charts: vec![
                ChartJob {
                    name: "box".to_string(),
                    input: input.clone(),
                    dsl: "boxplot()".to_string(),
                    width: None,
                    height: None,
                    format: None,
                },
                ChartJob {
                    name: "bar".to_string(),
                    input: input.clone(),
                    dsl: "bar()".to_string(),
                    width: Some(640),
                    height: None,
                    format: Some(OutputFormat::Png),
                },
            ],
        };

        let written = run_dashboard(&config).unwrap();
        assert_eq!(
            written,
            vec![dir.join("out/box.svg"), dir.join("out/bar.png")]
        );
        for path in &written {
            assert!(path.exists());
        }
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_run_dashboard_reports_failing_chart() {
        let dir = scratch_dir("dashboard-fail");
        fs::create_dir_all(&dir).unwrap();
        let input = dir.join("social.csv");
        crate::csv_reader::write_csv_to_path(&social(), &input).unwrap();

        let job = |name: &str, input: &Path, dsl: &str| ChartJob {
            name: name.to_string(),
            input: input.to_path_buf(),
            dsl: dsl.to_string(),
            width: None,
            height: None,
            format: None,
        };
        let config = DashboardConfig {
            output_dir: dir.join("out"),
            format: OutputFormat::Svg,
            charts: vec![
                job("good", &input, "line()"),
                job("bad", &input, "bar(fill: Missing)"),
                job("absent", &dir.join("nope.csv"), "bar()"),
            ],
        };

        let err = run_dashboard(&config).unwrap_err();
        assert!(format!("{:#}", err).contains("Chart 'bad' failed"));
        // Healthy charts are still written
        assert!(dir.join("out/good.svg").exists());
        let _ = fs::remove_dir_all(&dir);
    }
}
