use crate::error::DataError;
use anyhow::{anyhow, Result};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde_json::Value;

/// Date format of the time-series input, e.g. `3/1/2024 (Friday)`.
pub const DEFAULT_DATE_FORMAT: &str = "%m/%d/%Y (%A)";

/// Raw string table as read from CSV or JSON
#[derive(Debug, Clone, PartialEq)]
pub struct PlotData {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl PlotData {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    /// Create PlotData from a JSON Array of Objects
    ///
    /// Headers are the union of all object keys, in first-appearance order.
    /// Missing keys and nulls become empty cells, which the typed row
    /// conversion treats as absent fields.
    pub fn from_json(value: &Value) -> Result<Self> {
        let array = value
            .as_array()
            .ok_or_else(|| anyhow!("Input data must be a JSON array of objects"))?;

        let objects = array
            .iter()
            .enumerate()
            .map(|(idx, item)| {
                item.as_object()
                    .ok_or_else(|| anyhow!("Item {} in array is not an object", idx + 1))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut headers: Vec<String> = Vec::new();
        for obj in &objects {
            for key in obj.keys() {
                if !headers.contains(key) {
                    headers.push(key.clone());
                }
            }
        }

        let mut rows = Vec::with_capacity(objects.len());
        for (idx, obj) in objects.iter().enumerate() {
            let mut row = Vec::with_capacity(headers.len());
            for header in &headers {
                let cell = match obj.get(header) {
                    Some(Value::String(s)) => s.clone(),
                    Some(Value::Number(n)) => n.to_string(),
                    Some(Value::Bool(b)) => b.to_string(),
                    Some(Value::Null) | None => String::new(),
                    Some(_) => {
                        return Err(anyhow!(
                            "Unsupported value type for field '{}' in item {}",
                            header,
                            idx + 1
                        ))
                    }
                };
                row.push(cell);
            }
            rows.push(row);
        }

        Ok(Self { headers, rows })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Case-insensitive header lookup
    pub fn column_index(&self, name: &str) -> Result<usize, DataError> {
        self.headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(name))
            .ok_or_else(|| DataError::MissingColumn {
                column: name.to_string(),
                available: self.headers.join(", "),
            })
    }

    /// Convert the string table into typed rows.
    ///
    /// Every mapped column must exist in the header. Empty cells leave the
    /// field absent; non-empty cells that fail to convert are rejected.
    pub fn typed_rows(&self, columns: &Columns) -> Result<Vec<Row>, DataError> {
        let category = self.optional_index(columns.category.as_deref())?;
        let series = self.optional_index(columns.series.as_deref())?;
        let value = self.optional_index(columns.value.as_deref())?;
        let date = self.optional_index(columns.date.as_deref())?;

        let mut out = Vec::with_capacity(self.rows.len());
        for (idx, raw) in self.rows.iter().enumerate() {
            let line = idx + 1;
            let cell = |col: Option<usize>| {
                col.and_then(|c| raw.get(c))
                    .map(|s| s.trim())
                    .filter(|s| !s.is_empty())
            };

            let mut row = Row::new(line);

            if let Some(text) = cell(category) {
                row = row.with_category(text);
            }
            if let Some(text) = cell(series) {
                row = row.with_series(text);
            }
            if let Some(text) = cell(value) {
                let parsed = parse_number(text).ok_or_else(|| DataError::Malformed {
                    row: line,
                    field: columns.value.clone().unwrap_or_default(),
                    value: text.to_string(),
                    expected: "a finite number".to_string(),
                })?;
                row = row.with_value(parsed);
            }
            if let Some(text) = cell(date) {
                let parsed = parse_datetime(text, &columns.date_format).ok_or_else(|| {
                    DataError::Malformed {
                        row: line,
                        field: columns.date.clone().unwrap_or_default(),
                        value: text.to_string(),
                        expected: format!("a date matching '{}'", columns.date_format),
                    }
                })?;
                row = row.with_date(parsed);
            }

            out.push(row);
        }

        Ok(out)
    }

    fn optional_index(&self, name: Option<&str>) -> Result<Option<usize>, DataError> {
        name.map(|n| self.column_index(n)).transpose()
    }
}

/// Which source columns feed which typed field of a [`Row`]
#[derive(Debug, Clone, PartialEq)]
pub struct Columns {
    pub category: Option<String>,
    pub series: Option<String>,
    pub value: Option<String>,
    pub date: Option<String>,
    pub date_format: String,
}

impl Default for Columns {
    fn default() -> Self {
        Self {
            category: None,
            series: None,
            value: None,
            date: None,
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}

impl Columns {
    pub fn category(mut self, name: impl Into<String>) -> Self {
        self.category = Some(name.into());
        self
    }

    pub fn series(mut self, name: impl Into<String>) -> Self {
        self.series = Some(name.into());
        self
    }

    pub fn value(mut self, name: impl Into<String>) -> Self {
        self.value = Some(name.into());
        self
    }

    pub fn date(mut self, name: impl Into<String>, format: impl Into<String>) -> Self {
        self.date = Some(name.into());
        self.date_format = format.into();
        self
    }
}

/// One typed record. Constructed once at load time and never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    line: usize,
    category: Option<String>,
    series: Option<String>,
    value: Option<f64>,
    date: Option<NaiveDateTime>,
}

impl Row {
    pub fn new(line: usize) -> Self {
        Self {
            line,
            category: None,
            series: None,
            value: None,
            date: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_series(mut self, series: impl Into<String>) -> Self {
        self.series = Some(series.into());
        self
    }

    pub fn with_value(mut self, value: f64) -> Self {
        self.value = Some(value);
        self
    }

    pub fn with_date(mut self, date: NaiveDateTime) -> Self {
        self.date = Some(date);
        self
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn category(&self) -> Result<&str, DataError> {
        self.category.as_deref().ok_or_else(|| self.missing("category"))
    }

    pub fn series(&self) -> Result<&str, DataError> {
        self.series.as_deref().ok_or_else(|| self.missing("series"))
    }

    pub fn value(&self) -> Result<f64, DataError> {
        self.value.ok_or_else(|| self.missing("value"))
    }

    pub fn date(&self) -> Result<NaiveDateTime, DataError> {
        self.date.ok_or_else(|| self.missing("date"))
    }

    fn missing(&self, field: &str) -> DataError {
        DataError::MissingField {
            row: self.line,
            field: field.to_string(),
        }
    }
}

/// Parse a numeric cell. Non-finite values are rejected.
pub fn parse_number(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse a temporal cell with a chrono format string.
///
/// Formats without a time component yield midnight.
pub fn parse_datetime(text: &str, format: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    NaiveDateTime::parse_from_str(text, format)
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(text, format)
                .ok()
                .map(|d| d.and_time(NaiveTime::MIN))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_data(headers: Vec<&str>, rows: Vec<Vec<&str>>) -> PlotData {
        PlotData::new(
            headers.iter().map(|s| s.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|s| s.to_string()).collect())
                .collect(),
        )
    }

    #[test]
    fn test_typed_rows_basic() {
        let data = make_data(
            vec!["Platform", "Likes"],
            vec![vec!["Facebook", "120"], vec!["Twitter", "45.5"]],
        );
        let columns = Columns::default().category("platform").value("LIKES");
        let rows = data.typed_rows(&columns).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].category().unwrap(), "Facebook");
        assert_eq!(rows[1].value().unwrap(), 45.5);
        assert_eq!(rows[1].line(), 2);
    }

    #[test]
    fn test_typed_rows_missing_column() {
        let data = make_data(vec!["Platform"], vec![vec!["Facebook"]]);
        let columns = Columns::default().category("Platform").value("Likes");
        let err = data.typed_rows(&columns).unwrap_err();
        assert!(matches!(err, DataError::MissingColumn { ref column, .. } if column == "Likes"));
    }

    #[test]
    fn test_typed_rows_malformed_number() {
        let data = make_data(
            vec!["Platform", "Likes"],
            vec![vec!["Facebook", "10"], vec!["Twitter", "lots"]],
        );
        let columns = Columns::default().category("Platform").value("Likes");
        let err = data.typed_rows(&columns).unwrap_err();
        assert_eq!(
            err,
            DataError::Malformed {
                row: 2,
                field: "Likes".to_string(),
                value: "lots".to_string(),
                expected: "a finite number".to_string(),
            }
        );
    }

    #[test]
    fn test_typed_rows_rejects_nan() {
        let data = make_data(vec!["Likes"], vec![vec!["NaN"]]);
        let columns = Columns::default().value("Likes");
        assert!(data.typed_rows(&columns).is_err());
    }

    #[test]
    fn test_empty_cell_is_absent_field() {
        let data = make_data(vec!["Platform", "Likes"], vec![vec!["Facebook", ""]]);
        let columns = Columns::default().category("Platform").value("Likes");
        let rows = data.typed_rows(&columns).unwrap();
        let err = rows[0].value().unwrap_err();
        assert_eq!(
            err,
            DataError::MissingField {
                row: 1,
                field: "value".to_string()
            }
        );
    }

    #[test]
    fn test_parse_date_with_weekday() {
        let parsed = parse_datetime("3/1/2024 (Friday)", DEFAULT_DATE_FORMAT).unwrap();
        assert_eq!(
            parsed,
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap().and_time(NaiveTime::MIN)
        );
    }

    #[test]
    fn test_parse_date_wrong_weekday() {
        assert!(parse_datetime("3/1/2024 (Monday)", DEFAULT_DATE_FORMAT).is_none());
    }

    #[test]
    fn test_from_json() {
        let value = serde_json::json!([
            {"Likes": 10, "Platform": "Facebook"},
            {"Likes": null, "Platform": "Twitter"}
        ]);
        let data = PlotData::from_json(&value).unwrap();
        assert_eq!(data.headers, vec!["Likes", "Platform"]);
        assert_eq!(data.rows[0], vec!["10", "Facebook"]);
        assert_eq!(data.rows[1], vec!["", "Twitter"]);
    }

    #[test]
    fn test_from_json_keys_from_later_objects() {
        let value = serde_json::json!([
            {"Platform": "Facebook"},
            {"Likes": 42, "Platform": "Twitter"}
        ]);
        let data = PlotData::from_json(&value).unwrap();
        assert_eq!(data.headers, vec!["Platform", "Likes"]);
        assert_eq!(data.rows[0], vec!["Facebook", ""]);
        assert_eq!(data.rows[1], vec!["Twitter", "42"]);
    }

    #[test]
    fn test_from_json_not_array() {
        let value = serde_json::json!({"a": 1});
        assert!(PlotData::from_json(&value).is_err());
    }
}
