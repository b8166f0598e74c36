//! Contains terms.

use crate::parsed_types::Name;
use std::fmt::{Display, Formatter};

/// A term, i.e. a constant name or a `?variable`. The variant stores the
/// variable name without its leading `?`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Term {
    Name(Name),
    Variable(Name),
}

impl Term {
    pub fn is_variable(&self) -> bool {
        matches!(self, Term::Variable(_))
    }
}

impl Display for Term {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Term::Name(name) => write!(f, "{name}"),
            Term::Variable(name) => write!(f, "?{name}"),
        }
    }
}
