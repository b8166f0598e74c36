//! Provides parsers for `;` line comments.

use crate::parsers::{ParseResult, Span};
use nom::bytes::complete::is_not;
use nom::character::complete::{char, multispace0};
use nom::combinator::{opt, value};
use nom::multi::many0;
use nom::sequence::{pair, preceded};

/// Consumes any mix of whitespace and `;` line comments, including nothing.
pub(crate) fn ws_and_comments(input: Span) -> ParseResult<()> {
    value(
        (),
        pair(
            multispace0,
            many0(pair(
                preceded(char(';'), opt(is_not("\n\r"))),
                multispace0,
            )),
        ),
    )(input)
}
