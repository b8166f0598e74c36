mod h1;
mod h2;
mod heuristic;
mod zero;

pub use h1::H1Heuristic;
pub use h2::H2Heuristic;
pub use heuristic::{is_dead_end, Heuristic, DEAD_END};
pub use zero::ZeroHeuristic;
