//! Provides the [`typed_list`] parser combinator.

use crate::parsed_types::{Typed, TypedList};
use crate::parsers::{
    leading_whitespace, parse_name, space_separated_list0, space_separated_list1, ParseResult, Span,
};
use nom::character::complete::char;
use nom::combinator::map;
use nom::multi::many0;
use nom::sequence::{pair, preceded};

/// Parser combinator that parses a typed list, i.e. `x* | x⁺ - <type>
/// <typed-list (x)>`. Elements without an explicit type default to `object`.
pub fn typed_list<'a, F, O>(inner: F) -> impl FnMut(Span<'a>) -> ParseResult<'a, TypedList<O>>
where
    F: Clone + FnMut(Span<'a>) -> ParseResult<'a, O>,
{
    // `x⁺ - <type>`
    let explicitly_typed = map(
        pair(
            space_separated_list1(inner.clone()),
            preceded(leading_whitespace(char('-')), leading_whitespace(parse_name)),
        ),
        |(values, type_name)| {
            values
                .into_iter()
                .map(move |value| Typed::new(value, type_name.clone()))
                .collect::<Vec<_>>()
        },
    );

    // `x*`
    let implicitly_typed = map(inner, Typed::new_object);
    let implicitly_typed_list = space_separated_list0(implicitly_typed);

    map(
        pair(many0(explicitly_typed), implicitly_typed_list),
        |(explicit, mut implicit)| {
            let mut values: Vec<Typed<O>> = explicit.into_iter().flatten().collect();
            values.append(&mut implicit);
            TypedList::new(values)
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsed_types::Name;

    #[test]
    fn implicitly_typed() {
        let (_, list) = typed_list(parse_name)(Span::new("abc def")).unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list.values()[0].type_name(), &Name::from("object"));
    }

    #[test]
    fn explicitly_typed() {
        let (_, list) = typed_list(parse_name)(Span::new("abc def - word kitchen - room")).unwrap();
        assert_eq!(list.len(), 3);
        assert_eq!(list.values()[0].type_name(), &Name::from("word"));
        assert_eq!(list.values()[1].type_name(), &Name::from("word"));
        assert_eq!(list.values()[2].type_name(), &Name::from("room"));
    }

    #[test]
    fn mixed() {
        let (_, list) = typed_list(parse_name)(Span::new("man nut - locatable shed gate")).unwrap();
        assert_eq!(list.len(), 4);
        assert_eq!(list.values()[1].type_name(), &Name::from("locatable"));
        assert_eq!(list.values()[3].type_name(), &Name::from("object"));
    }
}
