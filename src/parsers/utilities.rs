//! Utility parsers.

use crate::parsers::{ws_and_comments, ParseResult, Span};
use nom::bytes::complete::tag_no_case;
use nom::character::complete::char;
use nom::combinator::map;
use nom::multi::{many0, many1};
use nom::number::complete::double;
use nom::sequence::{delimited, preceded};

/// A combinator that takes a parser `inner` and produces a parser that also
/// consumes a leading `(name` and trailing `)`, returning the output of
/// `inner`. The name is matched case-insensitively.
pub fn prefix_expr<'a, F, O>(name: &'a str, inner: F) -> impl FnMut(Span<'a>) -> ParseResult<'a, O>
where
    F: FnMut(Span<'a>) -> ParseResult<'a, O>,
{
    delimited(
        preceded(leading_whitespace(char('(')), keyword(name)),
        leading_whitespace(inner),
        leading_whitespace(char(')')),
    )
}

/// Matches a bare keyword case-insensitively, consuming leading whitespace
/// and comments.
pub fn keyword<'a>(word: &'a str) -> impl FnMut(Span<'a>) -> ParseResult<'a, Span<'a>> {
    leading_whitespace(tag_no_case(word))
}

/// A combinator that takes a parser `inner` and produces a parser that also
/// consumes leading whitespace and line comments, returning the output of
/// `inner`.
pub fn leading_whitespace<'a, F, O>(inner: F) -> impl FnMut(Span<'a>) -> ParseResult<'a, O>
where
    F: FnMut(Span<'a>) -> ParseResult<'a, O>,
{
    preceded(ws_and_comments, inner)
}

/// A combinator that takes a parser `inner` and produces a parser that also
/// consumes leading and trailing whitespace and line comments, returning the
/// output of `inner`.
pub fn surrounding_whitespace<'a, F, O>(inner: F) -> impl FnMut(Span<'a>) -> ParseResult<'a, O>
where
    F: FnMut(Span<'a>) -> ParseResult<'a, O>,
{
    delimited(ws_and_comments, inner, ws_and_comments)
}

/// A combinator that parses zero or more whitespace-separated occurrences of
/// `inner`.
pub fn space_separated_list0<'a, F, O>(inner: F) -> impl FnMut(Span<'a>) -> ParseResult<'a, Vec<O>>
where
    F: FnMut(Span<'a>) -> ParseResult<'a, O>,
{
    many0(leading_whitespace(inner))
}

/// A combinator that parses one or more whitespace-separated occurrences of
/// `inner`.
pub fn space_separated_list1<'a, F, O>(inner: F) -> impl FnMut(Span<'a>) -> ParseResult<'a, Vec<O>>
where
    F: FnMut(Span<'a>) -> ParseResult<'a, O>,
{
    many1(leading_whitespace(inner))
}

/// A combinator that takes a parser `inner` and produces a parser that
/// consumes surrounding parentheses, returning the output of `inner`.
pub fn parens<'a, F, O>(inner: F) -> impl FnMut(Span<'a>) -> ParseResult<'a, O>
where
    F: FnMut(Span<'a>) -> ParseResult<'a, O>,
{
    delimited(
        leading_whitespace(char('(')),
        leading_whitespace(inner),
        leading_whitespace(char(')')),
    )
}

/// Parses a numeric literal as `f64`.
pub fn parse_number(input: Span) -> ParseResult<f64> {
    map(double, |value| value)(input)
}
