//! Sure tricks for the side on lead

use super::cards::Cards;
use super::hands::Hands;
use super::types::*;

/// Consecutive top cards of a suit held by `hand`, counting only the cards
/// still in play
#[inline]
fn top_winners(hand: Cards, all_suit: Cards) -> usize {
    let mut winners = 0;
    for card in all_suit.iter() {
        if !hand.have(card) {
            break;
        }
        winners += 1;
    }
    winners
}

/// Tricks the leader can take by cashing winners from the top without ever
/// giving up the lead. This is a lower bound on the tricks the leader's side
/// takes from here on.
///
/// In a suit contract a side-suit winner only counts while both opponents
/// still follow, unless neither holds a trump, and while partner follows if
/// partner could be forced to ruff it. Side suits are cashed before trumps, so
/// opponents following in one side suit never change their holding in
/// another.
pub fn quick_tricks(hands: &Hands, leader: Seat, trump: usize) -> usize {
    let my_hand = hands[leader];
    let pd_hand = hands[partner(leader)];
    let lho_hand = hands[left_hand_opp(leader)];
    let rho_hand = hands[right_hand_opp(leader)];
    let all_cards = hands.all_cards();
    let suit_contract = trump < NOTRUMP;
    let opps_ruff = suit_contract && !lho_hand.union(rho_hand).suit(trump).is_empty();
    let pd_ruffs = suit_contract && !pd_hand.suit(trump).is_empty();

    let mut tricks = 0;
    for suit in 0..NUM_SUITS {
        let mut winners = top_winners(my_hand, all_cards.suit(suit));
        if winners == 0 {
            continue;
        }
        if suit_contract && suit != trump {
            if opps_ruff {
                winners = winners
                    .min(lho_hand.suit(suit).size())
                    .min(rho_hand.suit(suit).size());
            }
            if pd_ruffs {
                winners = winners.min(pd_hand.suit(suit).size());
            }
        }
        tricks += winners;
    }
    tricks.min(my_hand.size())
}
