// Typed errors for the data and scale layers

use thiserror::Error;

/// Problems with the input table or a row pulled from it.
///
/// Row numbers are 1-based data row indices (the header is not counted).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DataError {
    #[error("column '{column}' not found (available: {available})")]
    MissingColumn { column: String, available: String },

    #[error("row {row}: required field '{field}' is missing")]
    MissingField { row: usize, field: String },

    #[error("row {row}: cannot parse '{value}' in column '{field}' as {expected}")]
    Malformed {
        row: usize,
        field: String,
        value: String,
        expected: String,
    },

    #[error("input table has no data rows")]
    Empty,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScaleError {
    #[error("degenerate domain [{min}, {max}]: domain must have non-zero width")]
    DegenerateDomain { min: f64, max: f64 },

    #[error("band padding {0} is outside [0, 1)")]
    InvalidPadding(f64),
}
