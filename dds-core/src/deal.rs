use crate::{Card, Hand};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// The four seats at a bridge table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum Seat {
    North = 0,
    East = 1,
    South = 2,
    West = 3,
}

impl Seat {
    /// All seats in clockwise order starting from North
    pub const ALL: [Seat; 4] = [Seat::North, Seat::East, Seat::South, Seat::West];

    /// `seat as usize` back to a seat
    pub fn from_index(index: u8) -> Option<Self> {
        Seat::ALL.get(index as usize).copied()
    }

    /// Parse a seat letter (N, E, S, W), case-insensitive
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'N' => Some(Seat::North),
            'E' => Some(Seat::East),
            'S' => Some(Seat::South),
            'W' => Some(Seat::West),
            _ => None,
        }
    }

    pub fn to_char(&self) -> char {
        match self {
            Seat::North => 'N',
            Seat::East => 'E',
            Seat::South => 'S',
            Seat::West => 'W',
        }
    }

    pub fn partner(&self) -> Seat {
        self.rotate(2)
    }

    /// The seat to the left, who plays next
    pub fn next(&self) -> Seat {
        self.rotate(1)
    }

    /// The seat `steps` places clockwise from this one
    pub fn rotate(&self, steps: usize) -> Seat {
        Seat::ALL[(*self as usize + steps) % 4]
    }

    pub fn is_north_south(&self) -> bool {
        matches!(self, Seat::North | Seat::South)
    }
}

impl fmt::Display for Seat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Seat::North => "North",
            Seat::East => "East",
            Seat::South => "South",
            Seat::West => "West",
        };
        f.write_str(name)
    }
}

/// Reasons a deal cannot be solved
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DealError {
    #[error("{card} is dealt to both {first} and {second}")]
    DuplicateCard { card: Card, first: Seat, second: Seat },

    #[error("{card} is missing from the deal")]
    MissingCard { card: Card },

    #[error("{seat} holds {count} cards, expected 13")]
    WrongCardCount { seat: Seat, count: usize },
}

/// A complete bridge deal: four hands and the dealer.
///
/// The dealer plays no part in solving; every table and board puts the seat
/// after the declarer on lead. It is kept so PBN text and par scores can
/// use it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deal {
    hands: [Hand; 4],
    dealer: Seat,
}

impl Deal {
    /// Create a new empty deal dealt by West
    pub fn new() -> Self {
        Deal {
            hands: Default::default(),
            dealer: Seat::West,
        }
    }

    /// Build a deal from hands given in `Seat::ALL` order
    pub fn from_hands(hands: [Hand; 4], dealer: Seat) -> Self {
        Deal { hands, dealer }
    }

    pub fn hand(&self, seat: Seat) -> &Hand {
        &self.hands[seat as usize]
    }

    pub fn hand_mut(&mut self, seat: Seat) -> &mut Hand {
        &mut self.hands[seat as usize]
    }

    pub fn dealer(&self) -> Seat {
        self.dealer
    }

    pub fn set_dealer(&mut self, dealer: Seat) {
        self.dealer = dealer;
    }

    /// The same cards with a different dealer
    pub fn with_dealer(mut self, dealer: Seat) -> Self {
        self.dealer = dealer;
        self
    }

    /// Spades first, high to low, in every hand
    pub fn sort_all_hands(&mut self) {
        for hand in &mut self.hands {
            hand.sort();
        }
    }

    /// Check that the hands partition the 52-card deck, 13 cards each.
    ///
    /// Duplicates are reported first, then missing cards, then hand sizes, so
    /// the error names a card whenever one is at fault.
    pub fn validate(&self) -> Result<(), DealError> {
        let mut owner: [Option<Seat>; 52] = [None; 52];
        for seat in Seat::ALL {
            for card in self.hand(seat).cards() {
                let slot = &mut owner[card.to_index() as usize];
                if let Some(first) = *slot {
                    return Err(DealError::DuplicateCard {
                        card: *card,
                        first,
                        second: seat,
                    });
                }
                *slot = Some(seat);
            }
        }

        if let Some(card) = Card::deck().find(|card| owner[card.to_index() as usize].is_none()) {
            return Err(DealError::MissingCard { card });
        }

        for seat in Seat::ALL {
            let count = self.hand(seat).len();
            if count != 13 {
                return Err(DealError::WrongCardCount { seat, count });
            }
        }
        Ok(())
    }
}

impl Default for Deal {
    fn default() -> Self {
        Self::new()
    }
}
