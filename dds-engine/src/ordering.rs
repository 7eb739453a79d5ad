//! Move ordering. Nothing here changes a result, only how soon the search
//! finds a cutoff.

use super::cards::Cards;
use super::hands::Hands;
use super::position::wins_over;
use super::types::*;
use rustc_hash::FxHasher;
use std::hash::{Hash, Hasher};

/// Cards in the order they should be searched. Each card appears once.
#[derive(Clone, Copy)]
pub struct OrderedCards {
    cards: [u8; TOTAL_TRICKS],
    count: usize,
    added: Cards,
}

impl OrderedCards {
    #[inline]
    pub fn new() -> Self {
        OrderedCards {
            cards: [0; TOTAL_TRICKS],
            count: 0,
            added: Cards::new(),
        }
    }

    /// Cards high to low with no heuristics
    pub fn natural(cards: Cards) -> Self {
        let mut ordered = OrderedCards::new();
        ordered.add_cards(cards);
        ordered
    }

    #[inline]
    fn add(&mut self, card: usize) {
        if self.added.have(card) || self.count == TOTAL_TRICKS {
            return;
        }
        self.added.add(card);
        self.cards[self.count] = card as u8;
        self.count += 1;
    }

    /// High to low
    #[inline]
    fn add_cards(&mut self, cards: Cards) {
        for card in cards.iter() {
            self.add(card);
        }
    }

    /// Low to high
    #[inline]
    fn add_reversed(&mut self, cards: Cards) {
        for card in cards.iter_low() {
            self.add(card);
        }
    }

    /// Move `card` to the front if it is already present
    pub fn promote(&mut self, card: usize) {
        if let Some(i) = self.cards[..self.count].iter().position(|&c| c as usize == card) {
            self.cards[..=i].rotate_right(1);
        }
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.cards[..self.count].iter().map(|&c| c as usize)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

impl Default for OrderedCards {
    fn default() -> Self {
        OrderedCards::new()
    }
}

/// True when `card` is interchangeable with a card already tried: every card
/// still in play between the two belongs to the same hand.
///
/// `all_cards` must be the cards present at the start of the trick, so cards
/// already played to it still separate the ones around them.
#[inline]
pub fn is_equivalent(card: usize, tried: Cards, all_cards: Cards, my_hand: Cards) -> bool {
    let suit = suit_of(card);
    let tried_suit = tried.suit(suit);
    if tried_suit.is_empty() {
        return false;
    }
    let all_suit = all_cards.suit(suit);
    let my_suit = my_hand.suit(suit);

    let above = tried_suit.slice(0, card);
    if !above.is_empty() {
        let nearest = above.bottom();
        if all_suit.slice(nearest + 1, card) == my_suit.slice(nearest + 1, card) {
            return true;
        }
    }

    let below = tried_suit.slice(card + 1, TOTAL_CARDS);
    if !below.is_empty() {
        let nearest = below.top();
        if all_suit.slice(card + 1, nearest) == my_suit.slice(card + 1, nearest) {
            return true;
        }
    }
    false
}

/// Top and bottom card of a holding
#[inline]
fn ends(cards: Cards) -> Cards {
    let mut ends = Cards::new();
    if !cards.is_empty() {
        ends.add(cards.top());
        ends.add(cards.bottom());
    }
    ends
}

/// The `n` highest cards still in play in a suit, padded with the lowest
fn top_ranks<const N: usize>(all_suit: Cards) -> [usize; N] {
    let mut ranks = [TOTAL_CARDS; N];
    let mut last = TOTAL_CARDS;
    let mut cards = all_suit.iter();
    for slot in ranks.iter_mut() {
        if let Some(card) = cards.next() {
            last = card;
        }
        *slot = last;
    }
    ranks
}

/// Leads grouped by how promising they look, best group first
#[derive(Clone, Copy)]
enum LeadClass {
    /// Partner can ruff the return
    Ruff,
    /// Leading towards partner's tenace
    Finesse,
    /// Our side holds most of the top honours
    Cash,
    Plain,
    /// Leading away from our tenace into a higher honour
    Risky,
    Trump,
}

const LEAD_CLASSES: usize = 6;

/// Order the leads of `seat`
pub fn order_leads(
    playable: Cards,
    hands: &Hands,
    seat: Seat,
    trump: usize,
    all_cards: Cards,
) -> OrderedCards {
    let suit_contract = trump < NOTRUMP;
    let pd_hand = hands[partner(seat)];
    let lho_hand = hands[left_hand_opp(seat)];
    let rho_hand = hands[right_hand_opp(seat)];
    let our_cards = hands[seat].union(pd_hand);
    let opp_trumps = |hand: Cards| suit_contract && !hand.suit(trump).is_empty();

    let mut classes = [Cards::new(); LEAD_CLASSES];
    for suit in 0..NUM_SUITS {
        let my_suit = playable.suit(suit);
        if my_suit.is_empty() {
            continue;
        }
        if suit_contract && suit == trump {
            classes[LeadClass::Trump as usize] = ends(my_suit);
            continue;
        }

        let lho_suit = lho_hand.suit(suit);
        let rho_suit = rho_hand.suit(suit);
        // Left for last when an opponent can ruff
        if (lho_suit.is_empty() && opp_trumps(lho_hand)) || (rho_suit.is_empty() && opp_trumps(rho_hand)) {
            continue;
        }

        let pd_suit = pd_hand.suit(suit);
        let our_suit = my_suit.union(pd_suit);
        let [a, k, q, j, t] = top_ranks::<5>(all_cards.suit(suit));
        let both = |x: usize, y: usize| our_suit.have(x) && our_suit.have(y);

        let class = if pd_suit.size() >= 2
            && lho_suit.size() >= 2
            && ((pd_suit.have(k) && lho_suit.have(a))
                || (pd_suit.have(a) && lho_suit.have(k) && (pd_suit.have(q) || both(q, j)))
                || (pd_suit.have(k) && lho_suit.have(q) && (pd_suit.have(j) || both(j, t))))
        {
            LeadClass::Finesse
        } else if my_suit.size() >= 2
            && rho_suit.size() >= 2
            && ((my_suit.have(a) && rho_suit.have(k))
                || (my_suit.have(k) && rho_suit.have(a) && !our_cards.have(q)))
        {
            LeadClass::Risky
        } else if !lho_suit.is_empty()
            && !rho_suit.is_empty()
            && [a, k, q].iter().filter(|&&c| our_cards.have(c)).count() >= 2
        {
            LeadClass::Cash
        } else if suit_contract
            && pd_suit.is_empty()
            && !lho_suit.is_empty()
            && !rho_suit.is_empty()
            && !pd_hand.suit(trump).is_empty()
            && my_suit.bottom() != a
        {
            classes[LeadClass::Ruff as usize].add(my_suit.bottom());
            continue;
        } else {
            LeadClass::Plain
        };
        let bucket = &mut classes[class as usize];
        *bucket = bucket.union(ends(my_suit));
    }

    let mut ordered = OrderedCards::new();
    for cards in classes {
        ordered.add_cards(cards);
    }
    ordered.add_cards(playable);
    ordered
}

/// What the follower knows about the trick so far
pub struct TrickView {
    pub lead_suit: Suit,
    pub winning_seat: Seat,
    pub winning_card: usize,
    pub card_in_trick: usize,
}

/// Order the cards of `seat` when following to a trick
pub fn order_follows(
    playable: Cards,
    hands: &Hands,
    seat: Seat,
    trump: usize,
    trick: &TrickView,
) -> OrderedCards {
    let mut ordered = OrderedCards::new();
    let winning_card = trick.winning_card;
    let partner_winning = trick.winning_seat == partner(seat);
    let last_to_play = trick.card_in_trick == 3;
    let lho_suit = hands[left_hand_opp(seat)].suit(trick.lead_suit);
    let pd_suit = hands[partner(seat)].suit(trick.lead_suit);

    let my_suit = playable.suit(trick.lead_suit);
    if !my_suit.is_empty() {
        let play_low = !wins_over(my_suit.top(), winning_card, trump)
            || (partner_winning
                && (last_to_play
                    || lho_suit.is_empty()
                    || winning_card < lho_suit.top()
                    || lho_suit.slice(0, winning_card) == lho_suit.slice(0, my_suit.top())))
            || (trick.card_in_trick == 1
                && !pd_suit.is_empty()
                && pd_suit.top() < winning_card
                && (lho_suit.is_empty()
                    || pd_suit.top() < lho_suit.top()
                    || (lho_suit.top() < pd_suit.union(my_suit).top()
                        && lho_suit.slice(0, pd_suit.top()) == lho_suit.slice(0, my_suit.top()))));
        if play_low {
            ordered.add_reversed(playable);
            return ordered;
        }

        let winners = my_suit.slice(0, winning_card);
        if last_to_play || lho_suit.is_empty() || winners.bottom() < lho_suit.top() {
            // Cheapest winner is enough
            ordered.add_reversed(winners);
        } else {
            ordered.add_cards(winners);
        }
        ordered.add_reversed(my_suit);
        return ordered;
    }

    let my_trumps = if trump < NOTRUMP { playable.suit(trump) } else { Cards::new() };
    let partner_holds = partner_winning
        && (last_to_play || (!lho_suit.is_empty() && wins_over(winning_card, lho_suit.top(), trump)));
    if !my_trumps.is_empty() && !partner_holds {
        if suit_of(winning_card) == trump {
            if !partner_winning && wins_over(my_trumps.top(), winning_card, trump) {
                ordered.add_reversed(my_trumps.slice(0, winning_card));
            }
        } else {
            let lho_can_overruff = !last_to_play
                && lho_suit.is_empty()
                && !hands[left_hand_opp(seat)].suit(trump).is_empty();
            if lho_can_overruff {
                ordered.add_cards(my_trumps);
            } else {
                ordered.add(my_trumps.bottom());
            }
        }
    }
    add_discards(&mut ordered, playable, trump);
    ordered
}

/// Lowest card of each side suit, longest suit first, then everything else
fn add_discards(ordered: &mut OrderedCards, playable: Cards, trump: usize) {
    let mut lows: Vec<(usize, usize)> = (0..NUM_SUITS)
        .filter(|&suit| suit != trump)
        .map(|suit| playable.suit(suit))
        .filter(|cards| !cards.is_empty())
        .map(|cards| (cards.bottom(), cards.size()))
        .collect();
    lows.sort_by(|a, b| b.1.cmp(&a.1));
    for (card, _) in lows {
        ordered.add(card);
    }
    ordered.add_reversed(playable);
}

/// Remembers, per situation, the card that last caused a cutoff.
///
/// A situation is the mover's hand plus what it is playing against (the lead
/// suit and current winner mid-trick). Collisions only cost ordering quality.
pub struct CutoffTable {
    slots: Box<[(u64, u8)]>,
    mask: usize,
}

impl CutoffTable {
    pub fn new(bits: usize) -> Self {
        let size = 1 << bits;
        CutoffTable {
            slots: vec![(0, TOTAL_CARDS as u8); size].into_boxed_slice(),
            mask: size - 1,
        }
    }

    pub fn key(hand: Cards, seat: Seat, card_in_trick: usize, winning_card: usize) -> u64 {
        let mut hasher = FxHasher::default();
        (hand.value(), seat, card_in_trick, winning_card).hash(&mut hasher);
        hasher.finish()
    }

    #[inline]
    pub fn lookup(&self, key: u64) -> Option<usize> {
        let (stored, card) = self.slots[key as usize & self.mask];
        (stored == key && (card as usize) < TOTAL_CARDS).then_some(card as usize)
    }

    #[inline]
    pub fn store(&mut self, key: u64, card: usize) {
        self.slots[key as usize & self.mask] = (key, card as u8);
    }

    pub fn clear(&mut self) {
        self.slots.fill((0, TOTAL_CARDS as u8));
    }
}

impl Default for CutoffTable {
    fn default() -> Self {
        CutoffTable::new(16)
    }
}
