use crate::search::{Action, State};

/// A transition of the state space: applying `action` in `source` yields
/// `target`.
#[derive(Debug, Clone)]
pub struct Transition {
    pub source: State,
    pub action: Action,
    pub target: State,
}

impl Transition {
    pub fn new(source: State, action: Action, target: State) -> Self {
        Self {
            source,
            action,
            target,
        }
    }
}
