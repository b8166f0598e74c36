//! Provides parsers for atoms.

use crate::parsed_types::Atom;
use crate::parsers::{
    leading_whitespace, parens, parse_predicate_name, space_separated_list0, ParseResult, Span,
};
use nom::combinator::map;
use nom::sequence::pair;

/// Parses an atom, i.e. `(<predicate> t*)`, with the argument parser given by
/// `inner` (terms inside schemas, names in ground contexts).
pub fn atom<'a, F, O>(inner: F) -> impl FnMut(Span<'a>) -> ParseResult<'a, Atom<O>>
where
    F: FnMut(Span<'a>) -> ParseResult<'a, O>,
{
    map(
        parens(pair(
            parse_predicate_name,
            leading_whitespace(space_separated_list0(inner)),
        )),
        |(predicate, values)| Atom::new(predicate, values),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsed_types::Name;
    use crate::parsers::{parse_name, parse_term};

    #[test]
    fn it_works() {
        let (_, atom) = atom(parse_term)(Span::new("(can-move ?from ?to)")).unwrap();
        assert_eq!(atom.predicate_name(), &Name::from("can-move"));
        assert_eq!(atom.values().len(), 2);
    }

    #[test]
    fn nullary_works() {
        let (_, atom) = atom(parse_name)(Span::new("(handempty)")).unwrap();
        assert_eq!(atom.predicate_name(), &Name::from("handempty"));
        assert!(atom.values().is_empty());
    }
}
