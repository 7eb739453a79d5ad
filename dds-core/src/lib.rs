//! Deal model shared by the double-dummy engine and its callers.
//!
//! A [`Deal`] is four [`Hand`]s plus the seat on lead. Deals are parsed from
//! and formatted to PBN text, and must pass [`Deal::validate`] before they can
//! be solved.

mod card;
mod deal;
mod hand;
mod pbn;

pub use card::{Card, Rank, Suit};
pub use deal::{Deal, DealError, Seat};
pub use hand::Hand;
pub use pbn::PbnError;
