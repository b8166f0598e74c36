//! Provides parsers for action definitions.

use crate::parsed_types::ActionDefinition;
use crate::parsers::literal::literal_conjunction;
use crate::parsers::{
    keyword, leading_whitespace, parens, parse_name, parse_prop_effect, parse_term, parse_variable,
    prefix_expr, space_separated_list0, typed_list, ParseResult, Span,
};
use nom::branch::alt;
use nom::combinator::{map, opt};
use nom::sequence::{pair, preceded, tuple};

/// Parses an action definition, i.e. `(:action <name> :parameters (…)
/// :precondition (…) :effect (…))`.
pub fn parse_action_definition(input: Span) -> ParseResult<ActionDefinition> {
    let parameters = preceded(keyword(":parameters"), parens(typed_list(parse_variable)));
    let precondition = preceded(keyword(":precondition"), literal_conjunction(parse_term));
    let effect = preceded(
        keyword(":effect"),
        alt((
            prefix_expr("and", space_separated_list0(parse_prop_effect)),
            map(leading_whitespace(parse_prop_effect), |effect| vec![effect]),
        )),
    );

    map(
        prefix_expr(
            ":action",
            tuple((
                parse_name,
                parameters,
                pair(opt(precondition), opt(effect)),
            )),
        ),
        |(name, parameters, (preconditions, effects))| {
            ActionDefinition::new(
                name,
                parameters,
                preconditions.unwrap_or_default(),
                effects.unwrap_or_default(),
            )
        },
    )(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsed_types::PropEffect;

    #[test]
    fn it_works() {
        let input = r#"(:action putdown
                :parameters (?ob)
                :precondition (holding ?ob)
                :effect (and (clear ?ob) (arm-empty) (not (holding ?ob))))"#;

        let (_, action) = parse_action_definition(Span::new(input)).unwrap();
        assert_eq!(action.name(), "putdown");
        assert_eq!(action.parameters().len(), 1);
        assert_eq!(action.preconditions().len(), 1);
        assert_eq!(action.effects().len(), 3);
        assert!(matches!(action.effects()[2], PropEffect::Delete(_)));
    }

    #[test]
    fn typed_parameters() {
        let input = r#"(:action walk
                :parameters (?start - location ?end - location ?m - man)
                :precondition (and (at ?m ?start) (link ?start ?end))
                :effect (and (not (at ?m ?start)) (at ?m ?end)))"#;

        let (_, action) = parse_action_definition(Span::new(input)).unwrap();
        assert_eq!(action.parameters().len(), 3);
        assert_eq!(action.parameters().values()[2].type_name(), "man");
        assert_eq!(action.preconditions().len(), 2);
    }
}
