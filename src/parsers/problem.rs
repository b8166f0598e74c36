//! Provides parsers for problem definitions.

use crate::parsed_types::{InitElement, Metric, Problem};
use crate::parsers::literal::literal_conjunction;
use crate::parsers::{
    atom, leading_whitespace, literal, parens, parse_name, parse_number, parse_requirements,
    prefix_expr, space_separated_list0, surrounding_whitespace, typed_list, ParseResult, Span,
};
use nom::branch::alt;
use nom::character::complete::char;
use nom::combinator::{map, opt};
use nom::sequence::{pair, preceded, tuple};

fn parse_init_element(input: Span) -> ParseResult<InitElement> {
    let function_value = map(
        parens(preceded(
            char('='),
            pair(
                leading_whitespace(atom(parse_name)),
                leading_whitespace(parse_number),
            ),
        )),
        |(function_atom, value)| InitElement::FunctionValue(function_atom, value),
    );
    alt((
        function_value,
        map(literal(parse_name), InitElement::Literal),
    ))(input)
}

fn parse_metric(input: Span) -> ParseResult<Metric> {
    prefix_expr(
        ":metric",
        map(
            pair(parse_name, parens(parse_name)),
            |(direction, function_name)| Metric::new(direction, function_name),
        ),
    )(input)
}

/// Parses a problem definition.
///
/// ## Example
/// ```
/// # use rankplan::parsers::{parse_problem, preamble::*};
/// let input = r#"(define (problem get-paid)
///         (:domain briefcase-world)
///         (:init (at b home) (at p home) (in p))
///         (:goal (and (at b office) (at p home)))
///     )"#;
///
/// let (remainder, problem) = parse_problem(Span::new(input)).unwrap();
///
/// assert!(remainder.is_empty());
/// assert_eq!(problem.name(), "get-paid");
/// assert_eq!(problem.domain(), "briefcase-world");
/// assert_eq!(problem.init().len(), 3);
/// assert_eq!(problem.goals().len(), 2);
/// ```
pub fn parse_problem(input: Span) -> ParseResult<Problem> {
    map(
        surrounding_whitespace(prefix_expr(
            "define",
            tuple((
                prefix_expr("problem", parse_name),
                prefix_expr(":domain", parse_name),
                opt(parse_requirements),
                opt(prefix_expr(":objects", typed_list(parse_name))),
                prefix_expr(":init", space_separated_list0(parse_init_element)),
                prefix_expr(":goal", literal_conjunction(parse_name)),
                opt(parse_metric),
            )),
        )),
        |(name, domain, requirements, objects, init, goals, metric)| {
            Problem::new(
                name,
                domain,
                requirements.unwrap_or_default(),
                objects.unwrap_or_default(),
                init,
                goals,
                metric,
            )
        },
    )(input)
}

impl crate::parsers::Parser for Problem {
    type Item = Problem;

    /// See [`parse_problem`].
    fn parse<'a, S: Into<Span<'a>>>(input: S) -> ParseResult<'a, Self::Item> {
        parse_problem(input.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::Parser;

    #[test]
    fn it_works() {
        let input = r#"
            (define (problem blocks-4-0)
                (:domain blocks)
                (:objects d b a c)
                (:init (clear c) (clear a) (ontable c) (handempty))
                (:goal (and (on d c) (on c b))))"#;

        let problem = Problem::from_str(input).unwrap();
        assert_eq!(problem.name(), "blocks-4-0");
        assert_eq!(problem.domain(), "blocks");
        assert_eq!(problem.objects().len(), 4);
        assert_eq!(problem.init().len(), 4);
        assert_eq!(problem.goals().len(), 2);
        assert!(problem.metric().is_none());
    }

    #[test]
    fn function_values_and_metric() {
        let input = r#"
            (define (problem delivery-1)
                (:domain delivery)
                (:objects a b)
                (:init (at truck a) (= (distance a b) 4) (= (total-cost) 0))
                (:goal (at truck b))
                (:metric minimize (total-cost)))"#;

        let problem = Problem::from_str(input).unwrap();
        assert_eq!(problem.init().len(), 3);
        let function_values = problem
            .init()
            .iter()
            .filter(|element| matches!(element, InitElement::FunctionValue(_, _)))
            .count();
        assert_eq!(function_values, 2);
        let metric = problem.metric().unwrap();
        assert_eq!(metric.direction(), "minimize");
        assert_eq!(metric.function_name(), "total-cost");
    }
}
