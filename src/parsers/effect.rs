//! Provides parsers for effect items.

use crate::parsed_types::{FunctionSource, PropEffect};
use crate::parsers::literal::literal_conjunction;
use crate::parsers::{
    atom, leading_whitespace, parse_number, parse_term, prefix_expr, ParseResult, Span,
};
use nom::branch::alt;
use nom::combinator::map;
use nom::sequence::pair;

fn function_source(input: Span) -> ParseResult<FunctionSource> {
    alt((
        map(parse_number, FunctionSource::Number),
        map(atom(parse_term), FunctionSource::Function),
    ))(input)
}

/// Parses a single effect item: an added or deleted atom, a conditional
/// effect `(when <condition> <consequence>)`, or a numeric update
/// `(increase|decrease (<function> t*) <source>)`.
pub fn parse_prop_effect(input: Span) -> ParseResult<PropEffect> {
    let when = map(
        prefix_expr(
            "when",
            pair(
                literal_conjunction(parse_term),
                leading_whitespace(literal_conjunction(parse_term)),
            ),
        ),
        |(antecedent, consequence)| PropEffect::When(antecedent, consequence),
    );
    let increase = map(
        prefix_expr(
            "increase",
            pair(atom(parse_term), leading_whitespace(function_source)),
        ),
        |(target, source)| PropEffect::Increase(target, source),
    );
    let decrease = map(
        prefix_expr(
            "decrease",
            pair(atom(parse_term), leading_whitespace(function_source)),
        ),
        |(target, source)| PropEffect::Decrease(target, source),
    );
    let delete = map(prefix_expr("not", atom(parse_term)), PropEffect::Delete);
    let add = map(atom(parse_term), PropEffect::Add);

    alt((when, increase, decrease, delete, add))(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_and_delete() {
        let (_, effect) = parse_prop_effect(Span::new("(on ?x b1)")).unwrap();
        assert!(matches!(effect, PropEffect::Add(_)));

        let (_, effect) = parse_prop_effect(Span::new("(not (on ?x b1))")).unwrap();
        assert!(matches!(effect, PropEffect::Delete(_)));
    }

    #[test]
    fn conditional() {
        let input = "(when (and (in ?x) (at ?l)) (and (at-obj ?x ?l) (not (in ?x))))";
        let (_, effect) = parse_prop_effect(Span::new(input)).unwrap();
        match effect {
            PropEffect::When(antecedent, consequence) => {
                assert_eq!(antecedent.len(), 2);
                assert_eq!(consequence.len(), 2);
                assert!(consequence[1].is_negated());
            }
            other => panic!("expected a conditional effect, got {other:?}"),
        }
    }

    #[test]
    fn increase_with_constant() {
        let (_, effect) = parse_prop_effect(Span::new("(increase (total-cost) 5)")).unwrap();
        match effect {
            PropEffect::Increase(target, FunctionSource::Number(value)) => {
                assert_eq!(target.predicate_name(), "total-cost");
                assert_eq!(value, 5.0);
            }
            other => panic!("expected a numeric increase, got {other:?}"),
        }
    }

    #[test]
    fn increase_with_function() {
        let (_, effect) =
            parse_prop_effect(Span::new("(increase (total-cost) (distance ?a ?b))")).unwrap();
        match effect {
            PropEffect::Increase(_, FunctionSource::Function(source)) => {
                assert_eq!(source.predicate_name(), "distance");
                assert_eq!(source.values().len(), 2);
            }
            other => panic!("expected a function-sourced increase, got {other:?}"),
        }
    }
}
