use super::cards::Cards;
use super::types::*;
use std::ops::{Index, IndexMut};

/// Remaining cards of all four seats, indexed by engine seat number
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Hands {
    hands: [Cards; NUM_SEATS],
}

impl Hands {
    pub fn new() -> Self {
        Hands::default()
    }

    pub fn from_cards(hands: [Cards; NUM_SEATS]) -> Self {
        Hands { hands }
    }

    /// Parse engine-level PBN such as `"N:A... K... 2... 3..."`.
    ///
    /// Hands may hold any number of cards, which makes this convenient for
    /// end positions. Returns `None` on malformed text.
    pub fn from_pbn(pbn: &str) -> Option<Hands> {
        let (seat_text, rest) = pbn.trim().split_once(':')?;
        let mut chars = seat_text.chars();
        let first = seat_from_char(chars.next()?)?;
        if chars.next().is_some() {
            return None;
        }

        let mut hands = Hands::new();
        let mut count = 0;
        for (i, hand_text) in rest.split_whitespace().enumerate() {
            if i >= NUM_SEATS {
                return None;
            }
            let seat = (first + i) % NUM_SEATS;
            let suits: Vec<&str> = hand_text.split('.').collect();
            if suits.len() != NUM_SUITS {
                return None;
            }
            for (suit, ranks) in suits.iter().enumerate() {
                for c in ranks.chars() {
                    hands[seat].add(card_of(suit, rank_from_char(c)?));
                }
            }
            count += 1;
        }
        (count == NUM_SEATS).then_some(hands)
    }

    pub fn all_cards(&self) -> Cards {
        self.hands
            .iter()
            .fold(Cards::new(), |all, hand| all.union(*hand))
    }

    /// Tricks left to play: the size of the longest hand
    pub fn num_tricks(&self) -> usize {
        self.hands.iter().map(Cards::size).max().unwrap_or(0)
    }

    /// High-card points of one seat (A=4, K=3, Q=2, J=1)
    pub fn points(&self, seat: Seat) -> usize {
        const HONOURS: [(usize, usize); 4] = [(ACE, 4), (KING, 3), (QUEEN, 2), (JACK, 1)];
        let hand = self.hands[seat];
        (0..NUM_SUITS)
            .flat_map(|suit| HONOURS.iter().map(move |&(rank, value)| (card_of(suit, rank), value)))
            .filter(|&(card, _)| hand.have(card))
            .map(|(_, value)| value)
            .sum()
    }

    /// Seat holding `card`, if any
    pub fn owner(&self, card: usize) -> Option<Seat> {
        (0..NUM_SEATS).find(|&seat| self.hands[seat].have(card))
    }

    /// PBN text starting from `first`
    pub fn to_pbn(&self, first: Seat) -> String {
        let hands: Vec<String> = (0..NUM_SEATS)
            .map(|i| self.hands[(first + i) % NUM_SEATS].to_string())
            .collect();
        format!("{}:{}", seat_char(first), hands.join(" "))
    }
}

impl Index<Seat> for Hands {
    type Output = Cards;

    #[inline]
    fn index(&self, seat: Seat) -> &Cards {
        &self.hands[seat]
    }
}

impl IndexMut<Seat> for Hands {
    #[inline]
    fn index_mut(&mut self, seat: Seat) -> &mut Cards {
        &mut self.hands[seat]
    }
}
