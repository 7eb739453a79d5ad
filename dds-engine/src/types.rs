//! Seat, suit and rank numbering used throughout the engine.
//!
//! Cards are indices 0..52: suits are blocks of 13 in the order spades,
//! hearts, diamonds, clubs, and within a suit a lower index is a higher rank
//! (index 0 is the ace of spades).

pub type Seat = usize;
pub type Suit = usize;

pub const NUM_SEATS: usize = 4;
pub const NUM_SUITS: usize = 4;
pub const NUM_RANKS: usize = 13;
pub const TOTAL_CARDS: usize = NUM_SUITS * NUM_RANKS;
pub const TOTAL_TRICKS: usize = 13;

pub const WEST: Seat = 0;
pub const NORTH: Seat = 1;
pub const EAST: Seat = 2;
pub const SOUTH: Seat = 3;

pub const SPADE: Suit = 0;
pub const HEART: Suit = 1;
pub const DIAMOND: Suit = 2;
pub const CLUB: Suit = 3;
pub const NOTRUMP: usize = 4;

pub const TWO: usize = 0;
pub const TEN: usize = 8;
pub const JACK: usize = 9;
pub const QUEEN: usize = 10;
pub const KING: usize = 11;
pub const ACE: usize = 12;

const SEAT_CHARS: [char; NUM_SEATS] = ['W', 'N', 'E', 'S'];
const SUIT_CHARS: [char; NUM_SUITS + 1] = ['S', 'H', 'D', 'C', 'N'];
const RANK_CHARS: [char; NUM_RANKS] = [
    '2', '3', '4', '5', '6', '7', '8', '9', 'T', 'J', 'Q', 'K', 'A',
];

#[inline]
pub fn next_seat(seat: Seat) -> Seat {
    (seat + 1) % NUM_SEATS
}

#[inline]
pub fn partner(seat: Seat) -> Seat {
    (seat + 2) % NUM_SEATS
}

#[inline]
pub fn left_hand_opp(seat: Seat) -> Seat {
    next_seat(seat)
}

#[inline]
pub fn right_hand_opp(seat: Seat) -> Seat {
    (seat + 3) % NUM_SEATS
}

/// North and South have odd seat numbers
#[inline]
pub fn is_ns(seat: Seat) -> bool {
    seat & 1 == 1
}

#[inline]
pub fn card_of(suit: Suit, rank: usize) -> usize {
    suit * NUM_RANKS + (ACE - rank)
}

#[inline]
pub fn suit_of(card: usize) -> Suit {
    card / NUM_RANKS
}

#[inline]
pub fn rank_of(card: usize) -> usize {
    ACE - card % NUM_RANKS
}

pub fn seat_char(seat: Seat) -> char {
    SEAT_CHARS[seat]
}

pub fn seat_from_char(c: char) -> Option<Seat> {
    SEAT_CHARS.iter().position(|&s| s == c.to_ascii_uppercase())
}

/// Trump letter, 'N' for no-trump
pub fn trump_char(trump: usize) -> char {
    SUIT_CHARS[trump.min(NOTRUMP)]
}

pub fn rank_char(rank: usize) -> char {
    RANK_CHARS[rank]
}

pub fn rank_from_char(c: char) -> Option<usize> {
    RANK_CHARS.iter().position(|&r| r == c.to_ascii_uppercase())
}

/// Two-character card name such as "SA" or "C7"
pub fn card_name(card: usize) -> String {
    format!(
        "{}{}",
        SUIT_CHARS[suit_of(card)],
        RANK_CHARS[rank_of(card)]
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_numbering() {
        assert_eq!(card_of(SPADE, ACE), 0);
        assert_eq!(card_of(CLUB, TWO), TOTAL_CARDS - 1);
        for card in 0..TOTAL_CARDS {
            assert_eq!(card_of(suit_of(card), rank_of(card)), card);
        }
        assert_eq!(card_name(card_of(HEART, TEN)), "HT");
    }

    #[test]
    fn test_seats() {
        assert_eq!(next_seat(SOUTH), WEST);
        assert_eq!(partner(WEST), EAST);
        assert_eq!(right_hand_opp(NORTH), WEST);
        assert!(is_ns(NORTH) && is_ns(SOUTH));
        assert!(!is_ns(EAST) && !is_ns(WEST));
        assert_eq!(seat_from_char('s'), Some(SOUTH));
        assert_eq!(seat_char(EAST), 'E');
    }
}
