// Chart DSL parser module

pub mod ast;
pub mod geom;
pub mod labels;
pub mod lexer;
pub mod pipeline;
pub mod scale;

// Public API re-exports
pub use ast::{AxisScale, BarLayer, BoxplotLayer, ChartSpec, Curve, Geom, Labels, LineLayer};
pub use pipeline::{parse_chart_spec, DslError};
