// Lexical helpers shared by the DSL parsers

use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{alpha1, alphanumeric1, char, multispace0, none_of, one_of},
    combinator::{map, recognize, value},
    multi::many0,
    number::complete::double,
    sequence::{delimited, pair, preceded, terminated},
    IResult,
};

/// Wrap a parser so it skips surrounding whitespace
pub fn ws<'a, F, O>(inner: F) -> impl FnMut(&'a str) -> IResult<&'a str, O>
where
    F: FnMut(&'a str) -> IResult<&'a str, O>,
{
    delimited(multispace0, inner, multispace0)
}

/// Identifier: letter or underscore, then letters, digits, underscores
pub fn identifier(input: &str) -> IResult<&str, String> {
    map(
        recognize(pair(
            alt((alpha1, tag("_"))),
            many0(alt((alphanumeric1, tag("_")))),
        )),
        |s: &str| s.to_string(),
    )(input)
}

/// Double-quoted string with `\"` and `\\` escapes
pub fn string_literal(input: &str) -> IResult<&str, String> {
    map(
        delimited(
            char('"'),
            many0(alt((none_of("\\\""), preceded(char('\\'), one_of("\\\""))))),
            char('"'),
        ),
        |chars: Vec<char>| chars.into_iter().collect(),
    )(input)
}

pub fn number_literal(input: &str) -> IResult<&str, f64> {
    double(input)
}

pub fn bool_literal(input: &str) -> IResult<&str, bool> {
    alt((value(true, tag("true")), value(false, tag("false"))))(input)
}

/// Column reference: a bare identifier, or a quoted name for headers with
/// spaces or punctuation
pub fn column(input: &str) -> IResult<&str, String> {
    alt((string_literal, identifier))(input)
}

/// Named argument key, `name:`
pub fn arg_key<'a>(name: &'static str) -> impl FnMut(&'a str) -> IResult<&'a str, &'a str> {
    ws(terminated(tag(name), ws(char(':'))))
}
