use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::char,
    combinator::map,
    multi::separated_list0,
    sequence::preceded,
    IResult,
};
use crate::parser::ast::Labels;
use crate::parser::lexer::{arg_key, string_literal, ws};

/// Parse chart labels
/// Format: labs(title: "...", x: "...", y: "...")
pub fn parse_labs(input: &str) -> IResult<&str, Labels> {
    let (input, _) = ws(tag("labs"))(input)?;
    let (input, _) = ws(char('('))(input)?;

    let (input, args) = separated_list0(
        ws(char(',')),
        alt((
            map(preceded(arg_key("title"), ws(string_literal)), |v| ("title", v)),
            map(preceded(arg_key("x"), ws(string_literal)), |v| ("x", v)),
            map(preceded(arg_key("y"), ws(string_literal)), |v| ("y", v)),
        )),
    )(input)?;

    let (input, _) = ws(char(')'))(input)?;

    let mut labels = Labels::default();
    for (key, val) in args {
        match key {
            "title" => labels.title = Some(val),
            "x" => labels.x = Some(val),
            "y" => labels.y = Some(val),
            _ => {}
        }
    }

    Ok((input, labels))
}
