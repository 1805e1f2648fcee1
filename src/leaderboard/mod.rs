pub mod board;
pub mod formatter;
pub mod rank_entry;
pub mod section;

pub use board::{Board, BoardState};
pub use formatter::Formatter;
pub use rank_entry::{Metric, RankEntry};
