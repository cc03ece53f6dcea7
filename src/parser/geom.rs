// Geometry parsers: boxplot(), bar(), line()

use super::ast::{BarLayer, BoxplotLayer, Curve, Geom, LineLayer};
use super::lexer::{arg_key, column, number_literal, string_literal, ws};
use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::char,
    combinator::{map, value},
    multi::separated_list0,
    sequence::{delimited, preceded},
    IResult,
};

/// Parsed value of a named argument
#[derive(Debug, Clone, PartialEq)]
enum Arg {
    Text(String),
    Number(f64),
    Curve(Curve),
}

fn curve_literal(input: &str) -> IResult<&str, Curve> {
    delimited(
        char('"'),
        alt((
            value(Curve::Natural, tag("natural")),
            value(Curve::Linear, tag("linear")),
        )),
        char('"'),
    )(input)
}

/// Parse a box plot geometry
/// Format: boxplot() or boxplot(x: Platform, y: Likes, padding: 0.1, fill: "#69b3a2")
pub fn parse_boxplot(input: &str) -> IResult<&str, Geom> {
    let (input, _) = ws(tag("boxplot"))(input)?;
    let (input, _) = ws(char('('))(input)?;

    let (input, args) = separated_list0(
        ws(char(',')),
        alt((
            map(preceded(arg_key("x"), ws(column)), |v| ("x", Arg::Text(v))),
            map(preceded(arg_key("y"), ws(column)), |v| ("y", Arg::Text(v))),
            map(preceded(arg_key("padding"), ws(number_literal)), |v| {
                ("padding", Arg::Number(v))
            }),
            map(preceded(arg_key("fill"), ws(string_literal)), |v| {
                ("fill", Arg::Text(v))
            }),
        )),
    )(input)?;

    let (input, _) = ws(char(')'))(input)?;

    let mut layer = BoxplotLayer::default();
    for (key, arg) in args {
        match (key, arg) {
            ("x", Arg::Text(v)) => layer.x = Some(v),
            ("y", Arg::Text(v)) => layer.y = Some(v),
            ("padding", Arg::Number(v)) => layer.padding = Some(v),
            ("fill", Arg::Text(v)) => layer.fill = Some(v),
            _ => {}
        }
    }

    Ok((input, Geom::Boxplot(layer)))
}

/// Parse a grouped bar geometry
/// Format: bar(x: Platform, fill: PostType, y: Likes, padding: 0.1, inner_padding: 0.05)
pub fn parse_bar(input: &str) -> IResult<&str, Geom> {
    let (input, _) = ws(tag("bar"))(input)?;
    let (input, _) = ws(char('('))(input)?;

    let (input, args) = separated_list0(
        ws(char(',')),
        alt((
            map(preceded(arg_key("x"), ws(column)), |v| ("x", Arg::Text(v))),
            map(preceded(arg_key("y"), ws(column)), |v| ("y", Arg::Text(v))),
            map(preceded(arg_key("fill"), ws(column)), |v| {
                ("fill", Arg::Text(v))
            }),
            map(preceded(arg_key("padding"), ws(number_literal)), |v| {
                ("padding", Arg::Number(v))
            }),
            map(preceded(arg_key("inner_padding"), ws(number_literal)), |v| {
                ("inner_padding", Arg::Number(v))
            }),
        )),
    )(input)?;

    let (input, _) = ws(char(')'))(input)?;

    let mut layer = BarLayer::default();
    for (key, arg) in args {
        match (key, arg) {
            ("x", Arg::Text(v)) => layer.x = Some(v),
            ("y", Arg::Text(v)) => layer.y = Some(v),
            ("fill", Arg::Text(v)) => layer.fill = Some(v),
            ("padding", Arg::Number(v)) => layer.padding = Some(v),
            ("inner_padding", Arg::Number(v)) => layer.inner_padding = Some(v),
            _ => {}
        }
    }

    Ok((input, Geom::Bar(layer)))
}

/// Parse a time series line geometry
/// Format: line(x: Date, y: Likes, format: "%m/%d/%Y", color: "red", width: 2, curve: "linear")
pub fn parse_line(input: &str) -> IResult<&str, Geom> {
    let (input, _) = ws(tag("line"))(input)?;
    let (input, _) = ws(char('('))(input)?;

    let (input, args) = separated_list0(
        ws(char(',')),
        alt((
            map(preceded(arg_key("x"), ws(column)), |v| ("x", Arg::Text(v))),
            map(preceded(arg_key("y"), ws(column)), |v| ("y", Arg::Text(v))),
            map(preceded(arg_key("format"), ws(string_literal)), |v| {
                ("format", Arg::Text(v))
            }),
            map(preceded(arg_key("color"), ws(string_literal)), |v| {
                ("color", Arg::Text(v))
            }),
            map(preceded(arg_key("width"), ws(number_literal)), |v| {
                ("width", Arg::Number(v))
            }),
            map(preceded(arg_key("curve"), ws(curve_literal)), |v| {
                ("curve", Arg::Curve(v))
            }),
        )),
    )(input)?;

    let (input, _) = ws(char(')'))(input)?;

    let mut layer = LineLayer::default();
    for (key, arg) in args {
        match (key, arg) {
            ("x", Arg::Text(v)) => layer.x = Some(v),
            ("y", Arg::Text(v)) => layer.y = Some(v),
            ("format", Arg::Text(v)) => layer.format = Some(v),
            ("color", Arg::Text(v)) => layer.color = Some(v),
            ("width", Arg::Number(v)) => layer.width = Some(v),
            ("curve", Arg::Curve(v)) => layer.curve = Some(v),
            _ => {}
        }
    }

    Ok((input, Geom::Line(layer)))
}

/// Parse any geometry command
pub fn parse_geom(input: &str) -> IResult<&str, Geom> {
    alt((parse_boxplot, parse_bar, parse_line))(input)
}
