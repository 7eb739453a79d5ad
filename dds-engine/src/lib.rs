//! Double-dummy search engine.
//!
//! Cards are indices `0..52` grouped by suit (spades first) with the ace
//! lowest within each suit; seats run West, North, East, South. The search is
//! a fail-soft null-window alpha-beta driven by MTD(f), with:
//!
//! - a transposition cache of trick-count bounds keyed by normalized position
//! - move ordering heuristics plus a table of recent cutoff cards
//! - sure-trick estimates for early cutoffs
//! - skipping of cards equivalent to one already tried

mod cache;
mod canonical;
pub mod cards;
mod hands;
mod ordering;
mod position;
mod search;
mod solver;
mod tricks;
pub mod types;

pub use cache::{Bounds, CacheConfig, CacheStats, OverflowPolicy, TranspositionCache, DEFAULT_MAX_BYTES, ENTRY_BYTES};
pub use canonical::{Canonicalization, Signature};
pub use cards::Cards;
pub use hands::Hands;
pub use ordering::{order_follows, order_leads, CutoffTable, OrderedCards, TrickView};
pub use position::{wins_over, PlayError, Position, PositionError};
pub use search::{SearchOptions, SearchStats};
pub use solver::{MoveValue, SolveOutcome, Solver};
pub use tricks::quick_tricks;
pub use types::{Seat, Suit, NOTRUMP, NUM_RANKS, NUM_SEATS, NUM_SUITS, TOTAL_CARDS, TOTAL_TRICKS};
pub use types::{CLUB, DIAMOND, HEART, SPADE};
pub use types::{EAST, NORTH, SOUTH, WEST};
