// Pipeline parser: command | command | ...

use super::ast::{AxisScale, ChartSpec, Geom, Labels};
use super::geom::parse_geom;
use super::labels::parse_labs;
use super::lexer::ws;
use super::scale::parse_scale_command;
use nom::{
    branch::alt,
    bytes::complete::tag,
    combinator::{eof, map},
    multi::separated_list0,
    IResult,
};
use thiserror::Error;

/// Errors reported for a DSL string
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DslError {
    #[error("Parse error near '{remainder}'")]
    Syntax { remainder: String },
    #[error("No geometry given; expected one of boxplot(), bar(), line()")]
    MissingGeometry,
    #[error("Only one geometry is allowed, found {first}() and {second}()")]
    DuplicateGeometry {
        first: &'static str,
        second: &'static str,
    },
}

#[derive(Debug)]
enum PipelineComponent {
    Geom(Geom),
    Labels(Labels),
    Scale(AxisScale),
}

fn parse_pipeline_component(input: &str) -> IResult<&str, PipelineComponent> {
    alt((
        map(parse_geom, PipelineComponent::Geom),
        map(parse_labs, PipelineComponent::Labels),
        map(parse_scale_command, PipelineComponent::Scale),
    ))(input)
}

fn parse_components(input: &str) -> IResult<&str, Vec<PipelineComponent>> {
    let (input, components) = separated_list0(ws(tag("|")), parse_pipeline_component)(input)?;
    let (input, _) = ws(eof)(input)?;
    Ok((input, components))
}

/// Parse a full chart pipeline
/// Format: component | component | ...
pub fn parse_chart_spec(input: &str) -> Result<ChartSpec, DslError> {
    let components = match parse_components(input) {
        Ok((_, components)) => components,
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => {
            return Err(DslError::Syntax {
                remainder: e.input.trim().to_string(),
            })
        }
        Err(nom::Err::Incomplete(_)) => {
            return Err(DslError::Syntax {
                remainder: String::new(),
            })
        }
    };

    let mut geom: Option<Geom> = None;
    let mut labels = Labels::default();
    let mut y_scale = AxisScale::default();

    for comp in components {
        match comp {
            PipelineComponent::Geom(g) => {
                if let Some(first) = &geom {
                    return Err(DslError::DuplicateGeometry {
                        first: first.name(),
                        second: g.name(),
                    });
                }
                geom = Some(g);
            }
            // Later modifiers override earlier ones field by field
            PipelineComponent::Labels(l) => labels.merge(l),
            PipelineComponent::Scale(s) => y_scale.merge(s),
        }
    }

    let geom = geom.ok_or(DslError::MissingGeometry)?;
    Ok(ChartSpec {
        geom,
        labels,
        y_scale,
    })
}
