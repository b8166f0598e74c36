//! Provides parsers for names and variables.

use crate::parsed_types::Name;
use crate::parsers::{ParseResult, Span};
use nom::branch::alt;
use nom::bytes::complete::{tag, take_while1};
use nom::character::complete::char;
use nom::combinator::{map, verify};
use nom::sequence::preceded;

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

/// Parses a name, i.e. `<letter> <any char>*`. Names are lowercased because
/// PDDL is case-insensitive.
pub fn parse_name(input: Span) -> ParseResult<Name> {
    map(
        verify(take_while1(is_name_char), |span: &Span| {
            span.fragment()
                .chars()
                .next()
                .is_some_and(|c| c.is_ascii_alphabetic())
        }),
        |span: Span| Name::new(span.fragment().to_ascii_lowercase()),
    )(input)
}

/// Parses a predicate name, i.e. a name or the equality symbol `=`.
pub fn parse_predicate_name(input: Span) -> ParseResult<Name> {
    alt((parse_name, map(tag("="), |_| Name::from("="))))(input)
}

/// Parses a variable, i.e. `?<name>`. The leading `?` is stripped.
pub fn parse_variable(input: Span) -> ParseResult<Name> {
    preceded(char('?'), parse_name)(input)
}
