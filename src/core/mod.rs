pub mod clue;
pub mod coordinate;
pub mod ranked_clue;

pub use clue::{parse_clue, ClueId, ClueType, ParsedClue};
pub use coordinate::Coordinate;
pub use ranked_clue::{RankedClue, TriagedClue};
