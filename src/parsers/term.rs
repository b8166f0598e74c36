//! Provides parsers for terms.

use crate::parsed_types::Term;
use crate::parsers::{parse_name, parse_variable, ParseResult, Span};
use nom::branch::alt;
use nom::combinator::map;

/// Parses a term, i.e. `<name> | <variable>`.
pub fn parse_term(input: Span) -> ParseResult<Term> {
    alt((
        map(parse_variable, Term::Variable),
        map(parse_name, Term::Name),
    ))(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsed_types::Name;

    #[test]
    fn it_works() {
        let (_, term) = parse_term(Span::new("abcde")).unwrap();
        assert_eq!(term, Term::Name(Name::from("abcde")));

        let (_, term) = parse_term(Span::new("?abcde")).unwrap();
        assert_eq!(term, Term::Variable(Name::from("abcde")));
    }
}
