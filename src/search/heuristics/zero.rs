//! The zero heuristic. A* degenerates to uniform-cost (Dijkstra) search.

use crate::search::heuristics::Heuristic;
use crate::search::State;

#[derive(Debug, Default)]
pub struct ZeroHeuristic;

impl ZeroHeuristic {
    pub fn new() -> Self {
        Self
    }
}

impl Heuristic for ZeroHeuristic {
    fn evaluate(&mut self, _state: &State) -> f64 {
        0.0
    }
}
