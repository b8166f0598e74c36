//! Contains requirement keys.

/// The requirement keys of the supported PDDL subset. Unsupported keys are
/// rejected at parse time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Requirement {
    Strips,
    Typing,
    NegativePreconditions,
    Equality,
    ConditionalEffects,
    ActionCosts,
}

pub mod names {
    pub const STRIPS: &str = ":strips";
    pub const TYPING: &str = ":typing";
    pub const NEGATIVE_PRECONDITIONS: &str = ":negative-preconditions";
    pub const EQUALITY: &str = ":equality";
    pub const CONDITIONAL_EFFECTS: &str = ":conditional-effects";
    pub const ACTION_COSTS: &str = ":action-costs";
}

impl TryFrom<&str> for Requirement {
    type Error = ();

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            names::STRIPS => Ok(Self::Strips),
            names::TYPING => Ok(Self::Typing),
            names::NEGATIVE_PRECONDITIONS => Ok(Self::NegativePreconditions),
            names::EQUALITY => Ok(Self::Equality),
            names::CONDITIONAL_EFFECTS => Ok(Self::ConditionalEffects),
            names::ACTION_COSTS => Ok(Self::ActionCosts),
            _ => Err(()),
        }
    }
}
