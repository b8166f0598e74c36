//! Provides parsers for domain definitions.

use crate::parsed_types::{Domain, FunctionDefinition, PredicateDefinition};
use crate::parsers::{
    parens, parse_action_definition, parse_name, parse_predicate_name, parse_requirements,
    parse_variable, prefix_expr, space_separated_list0, space_separated_list1,
    surrounding_whitespace, typed_list, ParseResult, Span,
};
use nom::combinator::{map, opt};
use nom::sequence::{pair, tuple};

fn parse_predicate_definition(input: Span) -> ParseResult<PredicateDefinition> {
    map(
        parens(pair(parse_predicate_name, typed_list(parse_variable))),
        |(name, variables)| PredicateDefinition::new(name, variables),
    )(input)
}

fn parse_function_definition(input: Span) -> ParseResult<FunctionDefinition> {
    map(
        parens(pair(parse_name, typed_list(parse_variable))),
        |(name, variables)| FunctionDefinition::new(name, variables),
    )(input)
}

/// Parses a domain definition.
///
/// ## Example
/// ```
/// # use rankplan::parsers::{parse_domain, preamble::*};
/// let input = r#"
/// (define (domain briefcase)
///     (:requirements :strips :typing)
///     (:types location physob)
///     (:predicates (at ?x - physob ?l - location)
///                  (in ?x - physob))
///
///     (:action move
///         :parameters (?b - physob ?from ?to - location)
///         :precondition (at ?b ?from)
///         :effect (and (at ?b ?to) (not (at ?b ?from))))
/// )"#;
///
/// let (remainder, domain) = parse_domain(Span::new(input)).unwrap();
///
/// assert!(remainder.is_empty());
/// assert_eq!(domain.name(), "briefcase");
/// assert_eq!(domain.types().len(), 2);
/// assert_eq!(domain.predicates().len(), 2);
/// assert_eq!(domain.actions().len(), 1);
/// ```
pub fn parse_domain(input: Span) -> ParseResult<Domain> {
    map(
        surrounding_whitespace(prefix_expr(
            "define",
            tuple((
                prefix_expr("domain", parse_name),
                opt(parse_requirements),
                opt(prefix_expr(":types", typed_list(parse_name))),
                opt(prefix_expr(":constants", typed_list(parse_name))),
                opt(prefix_expr(
                    ":predicates",
                    space_separated_list1(parse_predicate_definition),
                )),
                opt(prefix_expr(
                    ":functions",
                    space_separated_list1(parse_function_definition),
                )),
                space_separated_list0(parse_action_definition),
            )),
        )),
        |(name, requirements, types, constants, predicates, functions, actions)| {
            Domain::new(
                name,
                requirements.unwrap_or_default(),
                types.unwrap_or_default(),
                constants.unwrap_or_default(),
                predicates.unwrap_or_default(),
                functions.unwrap_or_default(),
                actions,
            )
        },
    )(input)
}

impl crate::parsers::Parser for Domain {
    type Item = Domain;

    /// See [`parse_domain`].
    fn parse<'a, S: Into<Span<'a>>>(input: S) -> ParseResult<'a, Self::Item> {
        parse_domain(input.into())
    }
}
