//! nom parsers for the supported PDDL subset. Keywords are matched
//! case-insensitively and identifiers are lowercased, per the PDDL standard.

mod action_definition;
mod atom;
mod comments;
mod domain;
mod effect;
mod literal;
mod name;
mod problem;
mod requirements;
mod term;
mod typed_list;
mod utilities;

pub trait Parser {
    type Item;

    fn parse<'a, S: Into<Span<'a>>>(input: S) -> ParseResult<'a, Self::Item>;

    /// Parse a string slice into the desired type. Discards any remaining
    /// input.
    fn from_str(input: &str) -> Result<Self::Item, nom::Err<ParseError>> {
        let (_, value) = Self::parse(input)?;
        Ok(value)
    }
}

pub type Span<'a> = nom_locate::LocatedSpan<&'a str>;

pub type ParseError<'a> = nom_greedyerror::GreedyError<Span<'a>, nom::error::ErrorKind>;

pub type ParseResult<'a, T, E = ParseError<'a>> = nom::IResult<Span<'a>, T, E>;

/// Re-exports commonly used types.
pub mod preamble {
    pub use crate::parsers::Parser;
    pub use crate::parsers::{ParseError, ParseResult, Span};
}

// Parsers
pub use action_definition::parse_action_definition;
pub use domain::parse_domain;
pub use effect::parse_prop_effect;
pub use name::{parse_name, parse_predicate_name, parse_variable};
pub use problem::parse_problem;
pub use requirements::{parse_requirement_key, parse_requirements};
pub use term::parse_term;

// Parser combinators
pub use atom::atom;
pub use literal::{literal, literal_conjunction};
pub use typed_list::typed_list;

pub(crate) use comments::ws_and_comments;
#[allow(unused_imports)]
pub(crate) use utilities::{
    keyword, leading_whitespace, parens, parse_number, prefix_expr, space_separated_list0,
    space_separated_list1, surrounding_whitespace,
};
