//! Translation between the public card model and engine indices

use crate::denomination::Denomination;
use dds_core::{Card, Deal, Rank, Seat, Suit};
use dds_engine::types::{card_of, rank_of, suit_of};
use dds_engine::{Hands, CLUB, DIAMOND, EAST, HEART, NORTH, NOTRUMP, SOUTH, SPADE, WEST};

pub(crate) fn engine_suit(suit: Suit) -> usize {
    match suit {
        Suit::Spades => SPADE,
        Suit::Hearts => HEART,
        Suit::Diamonds => DIAMOND,
        Suit::Clubs => CLUB,
    }
}

pub(crate) fn engine_trump(denomination: Denomination) -> usize {
    denomination.to_suit().map_or(NOTRUMP, engine_suit)
}

pub(crate) fn engine_seat(seat: Seat) -> usize {
    match seat {
        Seat::North => NORTH,
        Seat::East => EAST,
        Seat::South => SOUTH,
        Seat::West => WEST,
    }
}

pub(crate) fn engine_card(card: Card) -> usize {
    card_of(engine_suit(card.suit), card.rank as usize - 2)
}

pub(crate) fn public_card(card: usize) -> Option<Card> {
    let suit = match suit_of(card) {
        SPADE => Suit::Spades,
        HEART => Suit::Hearts,
        DIAMOND => Suit::Diamonds,
        CLUB => Suit::Clubs,
        _ => return None,
    };
    let rank = Rank::from_value(rank_of(card) as u8 + 2)?;
    Some(Card::new(suit, rank))
}

/// Engine hands for a deal. The deal should already be validated.
pub(crate) fn engine_hands(deal: &Deal) -> Hands {
    let mut hands = Hands::new();
    for seat in Seat::ALL {
        for &card in deal.hand(seat).cards() {
            hands[engine_seat(seat)].add(engine_card(card));
        }
    }
    hands
}
