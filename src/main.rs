use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use socialplot::config::DashboardConfig;
use socialplot::csv_reader;
use socialplot::data::DEFAULT_DATE_FORMAT;
use socialplot::prepare::{derive_average_table, derive_time_table};
use socialplot::runtime;
use socialplot::{OutputFormat, RenderOptions};
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "socialplot")]
#[command(about = "Render box plot, grouped bar and time series charts of social media engagement", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render one chart
    Render {
        /// Chart DSL string (e.g., 'boxplot(x: Platform, y: Likes) | labs(title: "Likes")')
        dsl: String,
        /// CSV or JSON table; stdin (CSV) when omitted
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Image path; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Output encoding; guessed from --output when omitted
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
        #[arg(long)]
        width: Option<u32>,
        #[arg(long)]
        height: Option<u32>,
    },
    /// Render every chart listed in a JSON config
    Dashboard {
        config: PathBuf,
    },
    /// Derive the bar and line chart tables from a raw post table
    Prepare {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(long)]
        out_dir: PathBuf,
        /// chrono format of the Date column
        #[arg(long, default_value = DEFAULT_DATE_FORMAT)]
        date_format: String,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();

    match args.command {
        Command::Render {
            dsl,
            input,
            output,
            format,
            width,
            height,
        } => {
            let format = format
                .or_else(|| output.as_deref().and_then(OutputFormat::from_path))
                .unwrap_or_default();
            let options = RenderOptions {
                width,
                height,
                format,
            };
            render(&dsl, input, output, &options)
        }
        Command::Dashboard { config } => {
            let config = DashboardConfig::load(&config)?;
            let written = runtime::run_dashboard(&config)?;
            for path in written {
                println!("{}", path.display());
            }
            Ok(())
        }
        Command::Prepare {
            input,
            out_dir,
            date_format,
        } => prepare(input, out_dir, &date_format),
    }
}

fn render(dsl: &str, input: Option<PathBuf>, output: Option<PathBuf>, options: &RenderOptions) -> Result<()> {
    let data = match input {
        Some(path) => csv_reader::load_table(&path)?,
        None => csv_reader::read_csv_from_stdin().context("Failed to read CSV from stdin")?,
    };

    let bytes = runtime::render_dsl(dsl, &data, options)?;

    match output {
        Some(path) => {
            fs::write(&path, &bytes)
                .with_context(|| format!("Failed to write '{}'", path.display()))?;
            log::info!("Wrote {} bytes to {}", bytes.len(), path.display());
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            handle
                .write_all(&bytes)
                .context("Failed to write image to stdout")?;
            handle.flush().context("Failed to flush stdout")?;
        }
    }

    Ok(())
}

fn prepare(input: PathBuf, out_dir: PathBuf, date_format: &str) -> Result<()> {
    let raw = csv_reader::load_table(&input)?;
    fs::create_dir_all(&out_dir)
        .with_context(|| format!("Failed to create '{}'", out_dir.display()))?;

    let avg = derive_average_table(&raw).context("Failed to derive average table")?;
    csv_reader::write_csv_to_path(&avg, &out_dir.join("socialMediaAvg.csv"))?;

    let time = derive_time_table(&raw, date_format).context("Failed to derive time table")?;
    csv_reader::write_csv_to_path(&time, &out_dir.join("socialMediaTime.csv"))?;

    Ok(())
}
