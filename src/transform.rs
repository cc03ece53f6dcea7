use crate::data::{Columns, PlotData, Row};
use crate::error::DataError;
use crate::ir::ChartData;
use crate::parser::ast::{ChartSpec, Geom};
use crate::stats::{aggregate, mean_by};

/// Main entry point: turn the string table into the statistics the chart draws
pub fn apply_transformations(spec: &ChartSpec, data: &PlotData) -> Result<ChartData, DataError> {
    if data.is_empty() {
        return Err(DataError::Empty);
    }

    match &spec.geom {
        Geom::Boxplot(layer) => {
            let columns = Columns::default()
                .category(layer.x_column())
                .value(layer.y_column());
            let rows = data.typed_rows(&columns)?;
            let summaries = aggregate(&rows, |r| r.category().map(str::to_string), Row::value)?;
            Ok(ChartData::Boxplot { summaries })
        }
        Geom::Bar(layer) => {
            let columns = Columns::default()
                .category(layer.x_column())
                .series(layer.fill_column())
                .value(layer.y_column());
            let rows = data.typed_rows(&columns)?;
            bar_means(&rows)
        }
        Geom::Line(layer) => {
            let columns = Columns::default()
                .date(layer.x_column(), layer.date_format())
                .value(layer.y_column());
            let rows = data.typed_rows(&columns)?;
            line_points(&rows)
        }
    }
}

/// Mean per (category, series); repeated pairs collapse into one bar
fn bar_means(rows: &[Row]) -> Result<ChartData, DataError> {
    let values = mean_by(
        rows,
        |r| Ok((r.category()?.to_string(), r.series()?.to_string())),
        Row::value,
    )?;

    let mut groups: Vec<String> = Vec::new();
    let mut series: Vec<String> = Vec::new();
    for (group, serie) in values.keys() {
        if !groups.contains(group) {
            groups.push(group.clone());
        }
        if !series.contains(serie) {
            series.push(serie.clone());
        }
    }

    Ok(ChartData::GroupedBar {
        groups,
        series,
        values,
    })
}

/// Mean per instant, ascending in time
fn line_points(rows: &[Row]) -> Result<ChartData, DataError> {
    let means = mean_by(rows, Row::date, Row::value)?;
    let mut points: Vec<_> = means.into_iter().collect();
    points.sort_by_key(|(date, _)| *date);
    Ok(ChartData::Line { points })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_chart_spec;
    use chrono::NaiveDate;

    fn table(headers: &[&str], rows: &[&[&str]]) -> PlotData {
        PlotData::new(
            headers.iter().map(|s| s.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|s| s.to_string()).collect())
                .collect(),
        )
    }

    #[test]
    fn test_boxplot_summaries() {
        let data = table(
            &["Platform", "Likes"],
            &[
                &["Instagram", "1"],
                &["Facebook", "10"],
                &["Instagram", "2"],
                &["Instagram", "3"],
                &["Instagram", "4"],
            ],
        );
        let spec = parse_chart_spec("boxplot()").unwrap();
        match apply_transformations(&spec, &data).unwrap() {
            ChartData::Boxplot { summaries } => {
                let keys: Vec<&String> = summaries.keys().collect();
                assert_eq!(keys, vec!["Instagram", "Facebook"]);
                let insta = summaries.get(&"Instagram".to_string()).unwrap();
                assert_eq!(insta.q1, 1.75);
                assert_eq!(insta.median, 2.5);
                assert_eq!(insta.q3, 3.25);
                assert_eq!(summaries.get(&"Facebook".to_string()).unwrap().min, 10.0);
            }
            other => panic!("Expected boxplot data, got {:?}", other),
        }
    }

    #[test]
    fn test_boxplot_missing_value_fails() {
        let data = table(&["Platform", "Likes"], &[&["Instagram", "1"], &["Twitter", ""]]);
        let spec = parse_chart_spec("boxplot()").unwrap();
        let err = apply_transformations(&spec, &data).unwrap_err();
        assert_eq!(
            err,
            DataError::MissingField {
                row: 2,
                field: "value".to_string()
            }
        );
    }

    #[test]
    fn test_missing_column() {
        let data = table(&["Network", "Likes"], &[&["Instagram", "1"]]);
        let spec = parse_chart_spec("boxplot()").unwrap();
        assert!(matches!(
            apply_transformations(&spec, &data),
            Err(DataError::MissingColumn { .. })
        ));
    }

    #[test]
    fn test_empty_table() {
        let data = table(&["Platform", "Likes"], &[]);
        let spec = parse_chart_spec("boxplot()").unwrap();
        assert_eq!(apply_transformations(&spec, &data), Err(DataError::Empty));
    }

    #[test]
    fn test_bar_means_and_order() {
        let data = table(
            &["Platform", "PostType", "Likes"],
            &[
                &["Instagram", "Video", "100"],
                &["Instagram", "Image", "50"],
                &["Facebook", "Image", "20"],
                &["Instagram", "Video", "200"],
            ],
        );
        let spec = parse_chart_spec("bar()").unwrap();
        match apply_transformations(&spec, &data).unwrap() {
            ChartData::GroupedBar {
                groups,
                series,
                values,
            } => {
                assert_eq!(groups, vec!["Instagram", "Facebook"]);
                assert_eq!(series, vec!["Video", "Image"]);
                assert_eq!(values.len(), 3);
                let key = ("Instagram".to_string(), "Video".to_string());
                assert_eq!(values.get(&key), Some(&150.0));
            }
            other => panic!("Expected bar data, got {:?}", other),
        }
    }

    #[test]
    fn test_line_points_sorted_by_date() {
        let data = table(
            &["Date", "Likes"],
            &[
                &["3/3/2024 (Sunday)", "30"],
                &["3/1/2024 (Friday)", "10"],
                &["3/3/2024 (Sunday)", "50"],
            ],
        );
        let spec = parse_chart_spec("line()").unwrap();
        match apply_transformations(&spec, &data).unwrap() {
            ChartData::Line { points } => {
                let day = |d| {
                    NaiveDate::from_ymd_opt(2024, 3, d)
                        .unwrap()
                        .and_hms_opt(0, 0, 0)
                        .unwrap()
                };
                assert_eq!(points, vec![(day(1), 10.0), (day(3), 40.0)]);
            }
            other => panic!("Expected line data, got {:?}", other),
        }
    }

    #[test]
    fn test_line_custom_format() {
        let data = table(&["day", "n"], &[&["2024-03-02", "4"]]);
        let spec = parse_chart_spec(r#"line(x: day, y: n, format: "%Y-%m-%d")"#).unwrap();
        assert!(matches!(
            apply_transformations(&spec, &data),
            Ok(ChartData::Line { ref points }) if points.len() == 1
        ));
    }

    #[test]
    fn test_line_wrong_weekday_is_malformed() {
        let data = table(&["Date", "Likes"], &[&["3/1/2024 (Monday)", "1"]]);
        let spec = parse_chart_spec("line()").unwrap();
        assert!(matches!(
            apply_transformations(&spec, &data),
            Err(DataError::Malformed { row: 1, .. })
        ));
    }
}
