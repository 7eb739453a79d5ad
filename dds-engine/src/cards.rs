//! Card sets as 64-bit masks

use super::types::*;
use std::fmt;

const SUIT_MASK: u64 = (1 << NUM_RANKS) - 1;

/// A set of cards. Bit `i` is card index `i`, so iteration order is
/// spades first and high to low within each suit.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Cards {
    bits: u64,
}

impl Cards {
    #[inline]
    pub const fn new() -> Self {
        Cards { bits: 0 }
    }

    #[inline]
    pub const fn from_bits(bits: u64) -> Self {
        Cards { bits }
    }

    #[inline]
    pub fn value(&self) -> u64 {
        self.bits
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.bits.count_ones() as usize
    }

    #[inline]
    pub fn have(&self, card: usize) -> bool {
        self.bits & (1 << card) != 0
    }

    #[inline]
    pub fn add(&mut self, card: usize) {
        self.bits |= 1 << card;
    }

    #[inline]
    pub fn remove(&mut self, card: usize) {
        self.bits &= !(1 << card);
    }

    #[inline]
    pub fn remove_cards(&mut self, cards: Cards) {
        self.bits &= !cards.bits;
    }

    #[inline]
    pub fn union(&self, other: Cards) -> Cards {
        Cards::from_bits(self.bits | other.bits)
    }

    #[inline]
    pub fn intersect(&self, other: Cards) -> Cards {
        Cards::from_bits(self.bits & other.bits)
    }

    /// Cards in `self` but not in `other`
    #[inline]
    pub fn different(&self, other: Cards) -> Cards {
        Cards::from_bits(self.bits & !other.bits)
    }

    /// True when every card of `other` is in `self`
    #[inline]
    pub fn include(&self, other: Cards) -> bool {
        self.bits & other.bits == other.bits
    }

    #[inline]
    pub fn suit(&self, suit: Suit) -> Cards {
        Cards::from_bits(self.bits & (SUIT_MASK << (suit * NUM_RANKS)))
    }

    /// Highest card (lowest index). Must not be empty.
    #[inline]
    pub fn top(&self) -> usize {
        debug_assert!(!self.is_empty(), "top of an empty card set");
        self.bits.trailing_zeros() as usize
    }

    /// Lowest card (highest index). Must not be empty.
    #[inline]
    pub fn bottom(&self) -> usize {
        debug_assert!(!self.is_empty(), "bottom of an empty card set");
        63 - self.bits.leading_zeros() as usize
    }

    /// Cards with index in `begin..end`
    #[inline]
    pub fn slice(&self, begin: usize, end: usize) -> Cards {
        if begin >= end {
            return Cards::new();
        }
        let upper = if end >= 64 { u64::MAX } else { (1u64 << end) - 1 };
        let lower = (1u64 << begin) - 1;
        Cards::from_bits(self.bits & upper & !lower)
    }

    /// Cards from high to low
    #[inline]
    pub fn iter(&self) -> CardIter {
        CardIter { bits: self.bits }
    }

    /// Cards from low to high
    #[inline]
    pub fn iter_low(&self) -> impl Iterator<Item = usize> {
        let mut bits = self.bits;
        std::iter::from_fn(move || {
            if bits == 0 {
                return None;
            }
            let card = 63 - bits.leading_zeros() as usize;
            bits &= !(1 << card);
            Some(card)
        })
    }
}

pub struct CardIter {
    bits: u64,
}

impl Iterator for CardIter {
    type Item = usize;

    #[inline]
    fn next(&mut self) -> Option<usize> {
        if self.bits == 0 {
            return None;
        }
        let card = self.bits.trailing_zeros() as usize;
        self.bits &= self.bits - 1;
        Some(card)
    }
}

impl FromIterator<usize> for Cards {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        let mut cards = Cards::new();
        for card in iter {
            cards.add(card);
        }
        cards
    }
}

/// Suits separated by dots, as in PBN
impl fmt::Display for Cards {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for suit in 0..NUM_SUITS {
            if suit > 0 {
                write!(f, ".")?;
            }
            for card in self.suit(suit).iter() {
                write!(f, "{}", rank_char(rank_of(card)))?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Cards {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Cards({})", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_operations() {
        let mut cards = Cards::new();
        assert!(cards.is_empty());

        cards.add(card_of(SPADE, ACE));
        cards.add(card_of(HEART, KING));
        cards.add(card_of(HEART, TWO));
        assert_eq!(cards.size(), 3);
        assert!(cards.have(card_of(SPADE, ACE)));
        assert_eq!(cards.suit(HEART).size(), 2);
        assert_eq!(cards.suit(HEART).top(), card_of(HEART, KING));
        assert_eq!(cards.suit(HEART).bottom(), card_of(HEART, TWO));

        cards.remove(card_of(SPADE, ACE));
        assert!(cards.suit(SPADE).is_empty());
    }

    #[test]
    fn test_iteration_order() {
        let cards: Cards = [card_of(CLUB, TWO), card_of(SPADE, TEN), card_of(SPADE, ACE)]
            .into_iter()
            .collect();
        let high: Vec<usize> = cards.iter().collect();
        let low: Vec<usize> = cards.iter_low().collect();
        assert_eq!(high, vec![card_of(SPADE, ACE), card_of(SPADE, TEN), card_of(CLUB, TWO)]);
        assert_eq!(low, vec![card_of(CLUB, TWO), card_of(SPADE, TEN), card_of(SPADE, ACE)]);
    }

    #[test]
    fn test_slice_and_set_ops() {
        let spades: Cards = (0..NUM_RANKS).collect();
        let above_ten = spades.slice(0, card_of(SPADE, TEN));
        assert_eq!(above_ten.size(), 4);
        assert!(spades.slice(5, 5).is_empty());
        assert_eq!(Cards::from_bits(u64::MAX).slice(60, 64).size(), 4);

        let honours = above_ten.union(Cards::from_bits(1 << card_of(SPADE, TEN)));
        assert!(spades.include(honours));
        assert_eq!(spades.different(honours).size(), 8);
        assert_eq!(spades.intersect(honours), honours);
    }

    #[test]
    fn test_display() {
        let cards: Cards = [card_of(SPADE, ACE), card_of(DIAMOND, TEN), card_of(DIAMOND, TWO)]
            .into_iter()
            .collect();
        assert_eq!(cards.to_string(), "A..T2.");
    }
}
