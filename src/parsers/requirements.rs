//! Provides parsers for requirements.

use crate::parsed_types::requirement_names as names;
use crate::parsed_types::Requirement;
use crate::parsers::{prefix_expr, space_separated_list1, ParseResult, Span};
use nom::branch::alt;
use nom::bytes::complete::tag_no_case;
use nom::combinator::map;

/// Parses a requirement definition, i.e. `(:requirements <require-key>⁺)`.
pub fn parse_requirements(input: Span) -> ParseResult<Vec<Requirement>> {
    prefix_expr(":requirements", space_separated_list1(parse_requirement_key))(input)
}

/// Parses a requirement key, i.e. `:strips`. Keys outside the supported
/// subset are parse errors.
pub fn parse_requirement_key(input: Span) -> ParseResult<Requirement> {
    map(
        alt((
            tag_no_case(names::NEGATIVE_PRECONDITIONS),
            tag_no_case(names::CONDITIONAL_EFFECTS),
            tag_no_case(names::ACTION_COSTS),
            tag_no_case(names::EQUALITY),
            tag_no_case(names::STRIPS),
            tag_no_case(names::TYPING),
        )),
        |key: Span| {
            Requirement::try_from(key.fragment().to_ascii_lowercase().as_str())
                .expect("unhandled requirement variant")
        },
    )(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_works() {
        let (_, requirements) =
            parse_requirements(Span::new("(:requirements :strips :typing)")).unwrap();
        assert_eq!(requirements, vec![Requirement::Strips, Requirement::Typing]);
    }

    #[test]
    fn unsupported_keys_are_rejected() {
        assert!(parse_requirement_key(Span::new(":adl")).is_err());
    }
}
