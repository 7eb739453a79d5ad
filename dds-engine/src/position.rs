//! Game state reached by playing cards forward from a deal

use super::cards::Cards;
use super::hands::Hands;
use super::types::*;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PositionError {
    #[error("{} is held by more than one seat", card_text(.0))]
    SharedCard(usize),

    #[error("hands must be the same size at the start of a trick, found {0:?}")]
    UnevenHands([usize; NUM_SEATS]),

    #[error("invalid trump {0}")]
    InvalidTrump(usize),

    #[error("invalid seat {0}")]
    InvalidSeat(usize),

    #[error("card index {0} is outside the deck")]
    InvalidCard(usize),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlayError {
    #[error("{} is not in {}'s hand", card_text(.card), seat_text(.seat))]
    NotHeld { card: usize, seat: Seat },

    #[error("{} must follow suit to {}", seat_text(.seat), suit_text(.lead_suit))]
    Revoke { seat: Seat, lead_suit: Suit },

    #[error("no cards left to play")]
    Finished,
}

/// One node of the game: remaining hands, the trick in progress and the
/// tricks won so far.
///
/// Positions start at a trick boundary with equal hands; cards are added to
/// the current trick with [`Position::play`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Position {
    hands: Hands,
    trump: usize,
    leader: Seat,
    trick: [usize; NUM_SEATS],
    played: usize,
    ns_tricks: u8,
    ew_tricks: u8,
}

impl Position {
    pub fn new(hands: Hands, trump: usize, leader: Seat) -> Result<Self, PositionError> {
        if trump > NOTRUMP {
            return Err(PositionError::InvalidTrump(trump));
        }
        if leader >= NUM_SEATS {
            return Err(PositionError::InvalidSeat(leader));
        }

        let mut seen = Cards::new();
        for seat in 0..NUM_SEATS {
            let shared = seen.intersect(hands[seat]);
            if !shared.is_empty() {
                return Err(PositionError::SharedCard(shared.top()));
            }
            seen = seen.union(hands[seat]);
        }
        let stray = seen.slice(TOTAL_CARDS, 64);
        if !stray.is_empty() {
            return Err(PositionError::InvalidCard(stray.top()));
        }

        let sizes = [0, 1, 2, 3].map(|seat| hands[seat].size());
        if sizes.iter().any(|&size| size != sizes[0]) {
            return Err(PositionError::UnevenHands(sizes));
        }

        Ok(Position {
            hands,
            trump,
            leader,
            trick: [TOTAL_CARDS; NUM_SEATS],
            played: 0,
            ns_tricks: 0,
            ew_tricks: 0,
        })
    }

    pub fn hands(&self) -> &Hands {
        &self.hands
    }

    pub fn trump(&self) -> usize {
        self.trump
    }

    /// Seat that led to the current trick
    pub fn leader(&self) -> Seat {
        self.leader
    }

    pub fn seat_to_play(&self) -> Seat {
        (self.leader + self.played) % NUM_SEATS
    }

    /// Cards played to the current trick, in order from the leader
    pub fn current_trick(&self) -> &[usize] {
        &self.trick[..self.played]
    }

    pub fn ns_tricks(&self) -> u8 {
        self.ns_tricks
    }

    pub fn ew_tricks(&self) -> u8 {
        self.ew_tricks
    }

    /// Tricks still to be decided, the one in progress included
    pub fn tricks_remaining(&self) -> usize {
        self.hands.num_tricks()
    }

    pub fn is_finished(&self) -> bool {
        self.played == 0 && self.hands.all_cards().is_empty()
    }

    pub fn lead_suit(&self) -> Option<Suit> {
        self.current_trick().first().map(|&card| suit_of(card))
    }

    /// Cards the seat to play may legally play
    pub fn legal_moves(&self) -> Cards {
        let hand = self.hands[self.seat_to_play()];
        match self.lead_suit() {
            Some(suit) if !hand.suit(suit).is_empty() => hand.suit(suit),
            _ => hand,
        }
    }

    /// Play a card for the seat to play. Completing the fourth card resolves
    /// the trick and hands the lead to its winner.
    pub fn play(&mut self, card: usize) -> Result<(), PlayError> {
        let seat = self.seat_to_play();
        if self.hands[seat].is_empty() {
            return Err(PlayError::Finished);
        }
        if card >= TOTAL_CARDS || !self.hands[seat].have(card) {
            return Err(PlayError::NotHeld { card, seat });
        }
        if let Some(lead_suit) = self.lead_suit() {
            if suit_of(card) != lead_suit && !self.hands[seat].suit(lead_suit).is_empty() {
                return Err(PlayError::Revoke { seat, lead_suit });
            }
        }

        self.hands[seat].remove(card);
        self.trick[self.played] = card;
        self.played += 1;

        if self.played == NUM_SEATS {
            let winner = self.trick_winner();
            if is_ns(winner) {
                self.ns_tricks += 1;
            } else {
                self.ew_tricks += 1;
            }
            self.leader = winner;
            self.played = 0;
            self.trick = [TOTAL_CARDS; NUM_SEATS];
        }
        Ok(())
    }

    /// Seat currently winning the trick in progress
    pub fn trick_winner(&self) -> Seat {
        let mut winning = 0;
        for i in 1..self.played {
            if wins_over(self.trick[i], self.trick[winning], self.trump) {
                winning = i;
            }
        }
        (self.leader + winning) % NUM_SEATS
    }
}

fn card_text(card: &usize) -> String {
    card_name(*card)
}

fn seat_text(seat: &Seat) -> char {
    seat_char(*seat)
}

fn suit_text(suit: &Suit) -> char {
    trump_char(*suit)
}

/// Whether `card` beats the current winner `winning`, which is either of the
/// suit led or a trump.
#[inline]
pub fn wins_over(card: usize, winning: usize, trump: usize) -> bool {
    if suit_of(card) == suit_of(winning) {
        card < winning
    } else {
        suit_of(card) == trump
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ending() -> Position {
        let hands = Hands::from_pbn("N:AK.2.. Q3.K.. J4.A.. T5.Q..").unwrap();
        Position::new(hands, NOTRUMP, WEST).unwrap()
    }

    #[test]
    fn test_legal_moves_follow_suit() {
        let mut position = ending();
        assert_eq!(position.seat_to_play(), WEST);
        assert_eq!(position.legal_moves().size(), 3);

        position.play(card_of(HEART, QUEEN)).unwrap();
        assert_eq!(position.seat_to_play(), NORTH);
        assert_eq!(position.legal_moves(), Cards::from_bits(1 << card_of(HEART, TWO)));
        assert_eq!(position.lead_suit(), Some(HEART));
    }

    #[test]
    fn test_trick_resolution() {
        let mut position = ending();
        for card in [
            card_of(HEART, QUEEN),
            card_of(HEART, TWO),
            card_of(HEART, KING),
            card_of(HEART, ACE),
        ] {
            position.play(card).unwrap();
        }
        assert_eq!(position.ns_tricks(), 1);
        assert_eq!(position.ew_tricks(), 0);
        assert_eq!(position.leader(), SOUTH);
        assert!(position.current_trick().is_empty());
        assert_eq!(position.tricks_remaining(), 2);
    }

    #[test]
    fn test_trump_wins_trick() {
        let hands = Hands::from_pbn("N:AJ... K... .2.. Q...").unwrap();
        assert!(Position::new(hands, SPADE, WEST).is_err());

        let hands = Hands::from_pbn("N:A... K... .2.. Q...").unwrap();
        let mut position = Position::new(hands, HEART, WEST).unwrap();
        position.play(card_of(SPADE, QUEEN)).unwrap();
        position.play(card_of(SPADE, ACE)).unwrap();
        position.play(card_of(SPADE, KING)).unwrap();
        position.play(card_of(HEART, TWO)).unwrap();
        assert_eq!(position.ns_tricks(), 1);
        assert_eq!(position.leader(), SOUTH);
        assert!(position.is_finished());
    }

    #[test]
    fn test_illegal_plays() {
        let mut position = ending();
        assert_eq!(
            position.play(card_of(SPADE, ACE)),
            Err(PlayError::NotHeld {
                card: card_of(SPADE, ACE),
                seat: WEST
            })
        );
        position.play(card_of(SPADE, TEN)).unwrap();
        assert_eq!(
            position.play(card_of(HEART, TWO)),
            Err(PlayError::Revoke {
                seat: NORTH,
                lead_suit: SPADE
            })
        );
    }

    #[test]
    fn test_invalid_positions() {
        let shared = Hands::from_cards([
            Cards::from_bits(1),
            Cards::from_bits(1),
            Cards::from_bits(2),
            Cards::from_bits(4),
        ]);
        assert_eq!(
            Position::new(shared, NOTRUMP, WEST),
            Err(PositionError::SharedCard(0))
        );
        let hands = Hands::from_pbn("N:A... K... 2... 3...").unwrap();
        assert_eq!(
            Position::new(hands, 5, WEST),
            Err(PositionError::InvalidTrump(5))
        );
        assert_eq!(
            Position::new(hands, NOTRUMP, 4),
            Err(PositionError::InvalidSeat(4))
        );

        let off_deck = Hands::from_cards([
            Cards::from_bits(1),
            Cards::from_bits(2),
            Cards::from_bits(4),
            Cards::from_bits(1 << TOTAL_CARDS),
        ]);
        assert_eq!(
            Position::new(off_deck, NOTRUMP, WEST),
            Err(PositionError::InvalidCard(TOTAL_CARDS))
        );
    }

    #[test]
    fn test_play_after_last_trick() {
        let hands = Hands::from_pbn("N:A... K... 2... 3...").unwrap();
        let mut position = Position::new(hands, NOTRUMP, WEST).unwrap();
        for card in [card_of(SPADE, TWO + 1), card_of(SPADE, ACE), card_of(SPADE, KING), card_of(SPADE, TWO)] {
            position.play(card).unwrap();
        }
        assert_eq!(position.play(card_of(SPADE, ACE)), Err(PlayError::Finished));
    }
}
