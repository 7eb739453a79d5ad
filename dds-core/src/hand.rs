use crate::{Card, Suit};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The cards one seat holds, in the order they were added. A hand may
/// hold any number of cards; [`crate::Deal::validate`] checks for thirteen.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Hand {
    cards: Vec<Card>,
}

impl Hand {
    pub fn new() -> Self {
        Hand { cards: Vec::new() }
    }

    /// Cards are kept as given, unsorted and unchecked
    pub fn from_cards(cards: Vec<Card>) -> Self {
        Hand { cards }
    }

    /// Appends without checking for a duplicate, so bad deals can be built
    /// and rejected by validation.
    pub fn add_card(&mut self, card: Card) {
        self.cards.push(card);
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn contains(&self, card: Card) -> bool {
        self.cards.contains(&card)
    }

    /// Length of the holding in `suit`
    pub fn suit_length(&self, suit: Suit) -> usize {
        self.cards.iter().filter(|c| c.suit == suit).count()
    }

    /// Cards of one suit, highest first
    pub fn cards_in_suit(&self, suit: Suit) -> Vec<Card> {
        let mut cards: Vec<Card> = self
            .cards
            .iter()
            .filter(|c| c.suit == suit)
            .copied()
            .collect();
        cards.sort_by(|a, b| b.rank.cmp(&a.rank));
        cards
    }

    /// Spades first, high to low within a suit
    pub fn sort(&mut self) {
        self.cards
            .sort_by(|a, b| b.suit.cmp(&a.suit).then_with(|| b.rank.cmp(&a.rank)));
    }

    /// Ranks of one suit as text, e.g. "AKT3"; empty for a void
    pub fn suit_text(&self, suit: Suit) -> String {
        self.cards_in_suit(suit)
            .iter()
            .map(|c| c.rank.to_char())
            .collect()
    }
}

/// PBN hand notation: spades, hearts, diamonds, clubs separated by dots
impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, suit) in Suit::DISPLAY_ORDER.iter().enumerate() {
            if i > 0 {
                write!(f, ".")?;
            }
            write!(f, "{}", self.suit_text(*suit))?;
        }
        Ok(())
    }
}
