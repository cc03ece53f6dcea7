//! Derived tables for the bar and line charts.
//!
//! Both start from the raw post table (`Platform, PostType, Date, Likes`)
//! and average `Likes`, so the outputs plug straight into `bar()` and
//! `line()` with their default columns.

use crate::data::{Columns, PlotData, Row};
use crate::error::DataError;
use crate::stats::mean_by;
use anyhow::{anyhow, Result};
use std::fmt::Write;

fn format_value(value: f64) -> String {
    format!("{}", value)
}

/// Mean Likes per (Platform, PostType), in first-appearance order
pub fn derive_average_table(raw: &PlotData) -> Result<PlotData> {
    if raw.is_empty() {
        return Err(DataError::Empty.into());
    }

    let columns = Columns::default()
        .category("Platform")
        .series("PostType")
        .value("Likes");
    let rows = raw.typed_rows(&columns)?;
    let means = mean_by(
        &rows,
        |r| Ok((r.category()?.to_string(), r.series()?.to_string())),
        Row::value,
    )?;

    let table = means
        .into_iter()
        .map(|((platform, post_type), likes)| vec![platform, post_type, format_value(likes)])
        .collect();

    Ok(PlotData::new(
        vec!["Platform".into(), "PostType".into(), "Likes".into()],
        table,
    ))
}

/// Mean Likes per Date, ascending. Dates are read and written with
/// `date_format`.
pub fn derive_time_table(raw: &PlotData, date_format: &str) -> Result<PlotData> {
    if raw.is_empty() {
        return Err(DataError::Empty.into());
    }

    let columns = Columns::default().date("Date", date_format).value("Likes");
    let rows = raw.typed_rows(&columns)?;
    let mut means: Vec<_> = mean_by(&rows, Row::date, Row::value)?.into_iter().collect();
    means.sort_by_key(|(date, _)| *date);

    let mut table = Vec::with_capacity(means.len());
    for (date, likes) in means {
        let mut text = String::new();
        write!(text, "{}", date.format(date_format))
            .map_err(|_| anyhow!("Cannot format dates with '{}'", date_format))?;
        table.push(vec![text, format_value(likes)]);
    }

    Ok(PlotData::new(vec!["Date".into(), "Likes".into()], table))
}
