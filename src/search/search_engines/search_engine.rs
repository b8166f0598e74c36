use crate::search::search_engines::SearchStatistics;
use crate::search::Plan;
use std::time::{Duration, Instant};

/// The outcome of a search.
#[derive(Debug, Clone)]
pub enum SearchResult {
    /// A plan was found.
    Solved(Plan),
    /// The whole reachable space was exhausted without reaching the goal.
    Unsolvable,
    /// The abort flag was raised; partial statistics remain valid.
    Aborted,
}

impl SearchResult {
    pub fn is_solved(&self) -> bool {
        matches!(self, Self::Solved(_))
    }
}

/// Callback invoked when a search advances (a new depth for breadth-first
/// search, a new f-value for A*).
pub type EventHandler<'a> = Box<dyn FnMut(&SearchStatistics) + 'a>;

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
#[clap(rename_all = "lower")]
pub enum SearchName {
    Bfs,
    Astar,
    Dijkstras,
    Statespace,
}

/// Stand-in deadline for searches without an explicit time bound. The
/// successor generators poll a concrete `Instant`, so an unbounded search
/// passes one far enough out to never fire.
pub(crate) fn distant_deadline() -> Instant {
    Instant::now() + Duration::from_secs(60 * 60 * 24 * 365)
}
