mod astar;
mod bfs;
mod search_engine;
mod search_statistics;

pub use astar::EagerAStarSearch;
pub use bfs::BreadthFirstSearch;
pub use search_engine::{EventHandler, SearchName, SearchResult};
pub use search_statistics::SearchStatistics;
