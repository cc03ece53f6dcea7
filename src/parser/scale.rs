use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::char,
    combinator::map,
    multi::separated_list0,
    sequence::preceded,
    IResult,
};
use crate::parser::ast::AxisScale;
use crate::parser::lexer::{arg_key, bool_literal, number_literal, ws};

/// Format: scale_y(nice: true, zero: false)
pub fn parse_scale_y(input: &str) -> IResult<&str, AxisScale> {
    let (input, _) = ws(tag("scale_y"))(input)?;
    let (input, _) = ws(char('('))(input)?;

    let (input, args) = separated_list0(
        ws(char(',')),
        alt((
            map(preceded(arg_key("nice"), ws(bool_literal)), |v| ("nice", v)),
            map(preceded(arg_key("zero"), ws(bool_literal)), |v| ("zero", v)),
        )),
    )(input)?;

    let (input, _) = ws(char(')'))(input)?;

    let mut scale = AxisScale::default();
    for (key, val) in args {
        match key {
            "nice" => scale.nice = Some(val),
            "zero" => scale.zero = Some(val),
            _ => {}
        }
    }

    Ok((input, scale))
}

/// Format: ylim(min, max)
pub fn parse_ylim(input: &str) -> IResult<&str, AxisScale> {
    let (input, _) = ws(tag("ylim"))(input)?;
    let (input, _) = ws(char('('))(input)?;
    let (input, min) = ws(number_literal)(input)?;
    let (input, _) = ws(char(','))(input)?;
    let (input, max) = ws(number_literal)(input)?;
    let (input, _) = ws(char(')'))(input)?;
    Ok((
        input,
        AxisScale {
            limits: Some((min, max)),
            ..AxisScale::default()
        },
    ))
}

pub fn parse_scale_command(input: &str) -> IResult<&str, AxisScale> {
    alt((parse_scale_y, parse_ylim))(input)
}
