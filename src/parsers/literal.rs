//! Provides parsers for literals.

use crate::parsed_types::Literal;
use crate::parsers::{atom, prefix_expr, space_separated_list0, ParseResult, Span};
use nom::branch::alt;
use nom::combinator::map;

/// Parser combinator that parses a literal, i.e.
/// `<atomic formula(t)> | (not <atomic formula(t)>)`.
pub fn literal<'a, F, O>(inner: F) -> impl FnMut(Span<'a>) -> ParseResult<'a, Literal<O>>
where
    F: Clone + FnMut(Span<'a>) -> ParseResult<'a, O>,
{
    let is = map(atom(inner.clone()), Literal::new);
    let is_not = map(prefix_expr("not", atom(inner)), Literal::new_not);

    alt((is_not, is))
}

/// Parser combinator that parses a conjunction of literals, i.e.
/// `<literal> | (and <literal>*)`.
pub fn literal_conjunction<'a, F, O>(
    inner: F,
) -> impl FnMut(Span<'a>) -> ParseResult<'a, Vec<Literal<O>>>
where
    F: Clone + FnMut(Span<'a>) -> ParseResult<'a, O>,
{
    alt((
        prefix_expr("and", space_separated_list0(literal(inner.clone()))),
        map(literal(inner), |lit| vec![lit]),
    ))
}
