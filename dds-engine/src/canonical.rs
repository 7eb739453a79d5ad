//! Position signatures for the transposition cache.
//!
//! A signature is computed at a trick boundary from the remaining hands, the
//! seat on lead and the trump suit. Normalization only applies transforms
//! that cannot change the value of a position:
//!
//! * Within a suit only the relative order of the remaining cards matters,
//!   so the k-th highest remaining card is renamed to the k-th highest rank.
//! * Suits other than trump are interchangeable, so they are sorted into a
//!   canonical order by their holdings.

use super::cards::Cards;
use super::hands::Hands;
use super::types::*;
use serde::{Deserialize, Serialize};

const SUIT_BITS: u64 = (1 << NUM_RANKS) - 1;

/// How aggressively positions are merged in the cache
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Canonicalization {
    /// Raw holdings
    Identity,
    /// Holdings by relative rank within each suit
    RankEquivalence,
    /// Relative ranks plus a canonical order of the non-trump suits
    #[default]
    Full,
}

/// Cache key for a position at a trick boundary
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Signature {
    hands: [u64; NUM_SEATS],
}

impl Canonicalization {
    /// Hands with the same value as `hands` in canonical form
    pub fn normalize(self, hands: &Hands, trump: usize) -> Hands {
        match self {
            Canonicalization::Identity => *hands,
            Canonicalization::RankEquivalence => relative_ranks(hands),
            Canonicalization::Full => sort_suits(&relative_ranks(hands), trump),
        }
    }

    pub fn signature(self, hands: &Hands, leader: Seat, trump: usize) -> Signature {
        let normal = self.normalize(hands, trump);
        let mut words = [0u64; NUM_SEATS];
        for (seat, word) in words.iter_mut().enumerate() {
            *word = normal[seat].value();
        }
        // Cards occupy the low 52 bits; seat and trump go above them.
        words[0] |= (leader as u64) << 56 | (trump as u64) << 60;
        Signature { hands: words }
    }
}

/// Rename the remaining cards of each suit to the top ranks, keeping their
/// order and owners.
pub fn relative_ranks(hands: &Hands) -> Hands {
    let all_cards = hands.all_cards();
    let mut normal = Hands::new();
    for suit in 0..NUM_SUITS {
        for (k, card) in all_cards.suit(suit).iter().enumerate() {
            let target = suit * NUM_RANKS + k;
            for seat in 0..NUM_SEATS {
                if hands[seat].have(card) {
                    normal[seat].add(target);
                    break;
                }
            }
        }
    }
    normal
}

/// Reorder the non-trump suits by their holdings, largest key first.
/// The trump suit keeps its place.
pub fn sort_suits(hands: &Hands, trump: usize) -> Hands {
    let holding = |suit: Suit| -> [u64; NUM_SEATS] {
        [0, 1, 2, 3].map(|seat| (hands[seat].value() >> (suit * NUM_RANKS)) & SUIT_BITS)
    };

    let mut others: Vec<(Suit, [u64; NUM_SEATS])> = (0..NUM_SUITS)
        .filter(|&suit| suit != trump)
        .map(|suit| (suit, holding(suit)))
        .collect();
    others.sort_by(|a, b| b.1.cmp(&a.1));

    let slots = (0..NUM_SUITS).filter(|&suit| suit != trump);
    let mut sorted = [Cards::new(); NUM_SEATS];
    for (slot, (_, holdings)) in slots.zip(others.iter()) {
        for seat in 0..NUM_SEATS {
            let bits = holdings[seat] << (slot * NUM_RANKS);
            sorted[seat] = sorted[seat].union(Cards::from_bits(bits));
        }
    }
    if trump < NOTRUMP {
        for (seat, hand) in sorted.iter_mut().enumerate() {
            *hand = hand.union(hands[seat].suit(trump));
        }
    }
    Hands::from_cards(sorted)
}
