//! PBN deal notation: `N:AKQT3.J6.KJ42.95 652.AK42.AQ87.T4 ...`
//!
//! Hands are listed clockwise from the seat before the colon, each as
//! spades.hearts.diamonds.clubs. A bare string and a full `[Deal "..."]` tag
//! are both accepted.

use crate::{Card, Deal, Hand, Rank, Seat, Suit};
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PbnError {
    #[error("expected <seat>:<hands>, found {0:?}")]
    MissingSeat(String),

    #[error("invalid seat {0:?}")]
    InvalidSeat(String),

    #[error("expected 4 hands, found {0}")]
    HandCount(usize),

    #[error("hand {0:?} must have 4 suits separated by '.'")]
    SuitCount(String),

    #[error("invalid rank {rank:?} in hand {hand:?}")]
    InvalidRank { rank: char, hand: String },
}

impl Deal {
    /// Parse PBN deal text. The seat named before the colon is the dealer.
    ///
    /// Only the notation is checked here; call [`Deal::validate`] to check
    /// that the result is a complete deal.
    pub fn from_pbn(input: &str) -> Result<Deal, PbnError> {
        let content = strip_deal_tag(input.trim());
        let (seat_text, hands_text) = content
            .split_once(':')
            .ok_or_else(|| PbnError::MissingSeat(content.to_string()))?;

        let first_seat = parse_seat(seat_text)?;

        let hand_texts: Vec<&str> = hands_text.split_whitespace().collect();
        if hand_texts.len() != 4 {
            return Err(PbnError::HandCount(hand_texts.len()));
        }

        let mut deal = Deal::new().with_dealer(first_seat);
        for (i, text) in hand_texts.into_iter().enumerate() {
            *deal.hand_mut(first_seat.rotate(i)) = parse_hand(text)?;
        }
        Ok(deal)
    }

    /// Format as PBN text starting from `first_seat`
    pub fn to_pbn(&self, first_seat: Seat) -> String {
        let hands: Vec<String> = (0..4)
            .map(|i| self.hand(first_seat.rotate(i)).to_string())
            .collect();
        format!("{}:{}", first_seat.to_char(), hands.join(" "))
    }
}

impl FromStr for Deal {
    type Err = PbnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Deal::from_pbn(s)
    }
}

fn strip_deal_tag(input: &str) -> &str {
    input
        .strip_prefix("[Deal \"")
        .and_then(|rest| rest.strip_suffix("\"]"))
        .unwrap_or(input)
}

fn parse_seat(text: &str) -> Result<Seat, PbnError> {
    let mut chars = text.trim().chars();
    match (chars.next().and_then(Seat::from_char), chars.next()) {
        (Some(seat), None) => Ok(seat),
        _ => Err(PbnError::InvalidSeat(text.to_string())),
    }
}

/// Parse one hand; "-" stands for an empty hand
fn parse_hand(text: &str) -> Result<Hand, PbnError> {
    let mut hand = Hand::new();
    if text == "-" {
        return Ok(hand);
    }

    let suits: Vec<&str> = text.split('.').collect();
    if suits.len() != 4 {
        return Err(PbnError::SuitCount(text.to_string()));
    }

    for (suit, ranks) in Suit::DISPLAY_ORDER.iter().zip(suits) {
        for c in ranks.chars() {
            let rank = Rank::from_char(c).ok_or_else(|| PbnError::InvalidRank {
                rank: c,
                hand: text.to_string(),
            })?;
            hand.add_card(Card::new(*suit, rank));
        }
    }
    Ok(hand)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "N:AKQT3.J6.KJ42.95 652.AK42.AQ87.T4 J74.QT95.T.AK863 98.873.9653.QJ72";

    #[test]
    fn test_parse_sample_deal() {
        let deal = Deal::from_pbn(SAMPLE).unwrap();
        assert_eq!(deal.dealer(), Seat::North);
        assert_eq!(deal.validate(), Ok(()));
        assert_eq!(deal.hand(Seat::North).suit_length(Suit::Spades), 5);
        assert!(deal
            .hand(Seat::East)
            .contains(Card::new(Suit::Hearts, Rank::Ace)));
        assert_eq!(deal.hand(Seat::West).to_string(), "98.873.9653.QJ72");
    }

    #[test]
    fn test_first_seat_rotates_hands() {
        let deal = Deal::from_pbn("W:A... K... Q... J...").unwrap();
        assert_eq!(deal.dealer(), Seat::West);
        assert_eq!(deal.hand(Seat::West).to_string(), "A...");
        assert_eq!(deal.hand(Seat::North).to_string(), "K...");
        assert_eq!(deal.hand(Seat::South).to_string(), "J...");
    }

    #[test]
    fn test_deal_tag_accepted() {
        let tagged = format!("[Deal \"{}\"]", SAMPLE);
        assert_eq!(Deal::from_pbn(&tagged), Deal::from_pbn(SAMPLE));
    }

    #[test]
    fn test_format_matches_input() {
        let deal: Deal = SAMPLE.parse().unwrap();
        assert_eq!(deal.to_pbn(Seat::North), SAMPLE);
        let from_east = deal.to_pbn(Seat::East);
        assert!(from_east.starts_with("E:652.AK42.AQ87.T4 "));
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            Deal::from_pbn("AKQT3.J6.KJ42.95"),
            Err(PbnError::MissingSeat(_))
        ));
        assert!(matches!(
            Deal::from_pbn("X:A... K... Q... J..."),
            Err(PbnError::InvalidSeat(_))
        ));
        assert_eq!(
            Deal::from_pbn("N:A... K... Q..."),
            Err(PbnError::HandCount(3))
        );
        assert!(matches!(
            Deal::from_pbn("N:A.. K... Q... J..."),
            Err(PbnError::SuitCount(_))
        ));
        assert!(matches!(
            Deal::from_pbn("N:A1... K... Q... J..."),
            Err(PbnError::InvalidRank { rank: '1', .. })
        ));
    }

    #[test]
    fn test_empty_hand_dash() {
        let deal = Deal::from_pbn("N:- - - -").unwrap();
        assert!(Seat::ALL.iter().all(|s| deal.hand(*s).is_empty()));
    }
}
