//! Fail-soft null-window alpha-beta search.
//!
//! Values are North-South tricks still to be won from the starting position.
//! North-South maximize, East-West minimize. Each probe answers whether the
//! value is at least `beta`; the MTD(f) driver in `solver` combines probes.

use super::cache::{Bounds, TranspositionCache};
use super::canonical::Canonicalization;
use super::cards::Cards;
use super::hands::Hands;
use super::ordering::{is_equivalent, order_follows, order_leads, CutoffTable, OrderedCards, TrickView};
use super::position::{wins_over, Position};
use super::tricks::quick_tricks;
use super::types::*;
use log::trace;
use serde::{Deserialize, Serialize};

/// Switches for the optional parts of the search. None of them changes a
/// result.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchOptions {
    pub canonicalization: Canonicalization,
    pub move_ordering: bool,
    pub quick_tricks: bool,
    pub skip_equivalent: bool,
    /// Log every trick boundary at trace level
    pub trace: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        SearchOptions {
            canonicalization: Canonicalization::Full,
            move_ordering: true,
            quick_tricks: true,
            skip_equivalent: true,
            trace: false,
        }
    }
}

/// Counters gathered while solving
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Positions where a card was chosen
    pub nodes: u64,
    pub trick_starts: u64,
    pub cache_cutoffs: u64,
    pub quick_cutoffs: u64,
    pub equivalent_skips: u64,
    /// Null-window probes made by the driver
    pub probes: u64,
}

impl SearchStats {
    pub fn merge(&mut self, other: &SearchStats) {
        self.nodes += other.nodes;
        self.trick_starts += other.trick_starts;
        self.cache_cutoffs += other.cache_cutoffs;
        self.quick_cutoffs += other.quick_cutoffs;
        self.equivalent_skips += other.equivalent_skips;
        self.probes += other.probes;
    }
}

#[derive(Clone, Copy, Default)]
struct PlayState {
    /// North-South tricks won before this play's trick
    ns_won: u8,
    seat: Seat,
    card: usize,
    /// Depth of the play currently winning this trick
    winning: usize,
}

#[derive(Clone, Copy, Default)]
struct TrickState {
    /// Cards in play when the trick started
    all_cards: Cards,
    lead_suit: Suit,
}

pub(crate) struct Search<'a> {
    hands: Hands,
    trump: usize,
    num_tricks: usize,
    start_depth: usize,
    plays: [PlayState; TOTAL_CARDS + 1],
    tricks: [TrickState; TOTAL_TRICKS],
    cache: &'a mut TranspositionCache,
    cutoffs: &'a mut CutoffTable,
    options: &'a SearchOptions,
    stats: &'a mut SearchStats,
}

impl<'a> Search<'a> {
    pub(crate) fn new(
        position: &Position,
        cache: &'a mut TranspositionCache,
        cutoffs: &'a mut CutoffTable,
        options: &'a SearchOptions,
        stats: &'a mut SearchStats,
    ) -> Self {
        let trump = position.trump();
        let leader = position.leader();
        let played = position.current_trick();
        let hands = *position.hands();

        let mut plays = [PlayState::default(); TOTAL_CARDS + 1];
        let mut tricks = [TrickState::default(); TOTAL_TRICKS];
        let mut all_cards = hands.all_cards();
        for (depth, &card) in played.iter().enumerate() {
            all_cards.add(card);
            let winning = if depth == 0 || wins_over(card, plays[plays[depth - 1].winning].card, trump) {
                depth
            } else {
                plays[depth - 1].winning
            };
            plays[depth] = PlayState {
                ns_won: 0,
                seat: (leader + depth) % NUM_SEATS,
                card,
                winning,
            };
        }
        tricks[0] = TrickState {
            all_cards,
            lead_suit: played.first().map_or(SPADE, |&card| suit_of(card)),
        };
        let start_depth = played.len();
        plays[start_depth].seat = (leader + start_depth) % NUM_SEATS;

        Search {
            hands,
            trump,
            num_tricks: hands.num_tricks(),
            start_depth,
            plays,
            tricks,
            cache,
            cutoffs,
            options,
            stats,
        }
    }

    /// Probe: the result is a lower bound on the value when it is at least
    /// `beta`, otherwise an upper bound.
    pub(crate) fn search(&mut self, beta: i8) -> u8 {
        self.search_node(self.start_depth, beta)
    }

    fn search_node(&mut self, depth: usize, beta: i8) -> u8 {
        let card_in_trick = depth & 3;
        if depth > self.start_depth {
            let prev = self.plays[depth - 1];
            if card_in_trick == 0 {
                let winner = self.plays[prev.winning].seat;
                self.plays[depth].ns_won = prev.ns_won + is_ns(winner) as u8;
                self.plays[depth].seat = winner;
            } else {
                self.plays[depth].ns_won = prev.ns_won;
                self.plays[depth].seat = next_seat(prev.seat);
            }
        }

        if card_in_trick == 0 {
            self.search_trick_start(depth, beta)
        } else {
            self.search_moves(depth, beta)
        }
    }

    fn search_trick_start(&mut self, depth: usize, beta: i8) -> u8 {
        self.stats.trick_starts += 1;
        let ns_won = self.plays[depth].ns_won;
        let seat = self.plays[depth].seat;
        let remaining = self.num_tricks - depth / 4;

        if remaining == 0 || ns_won as i8 >= beta {
            return ns_won;
        }
        if ns_won as i8 + (remaining as i8) < beta {
            return ns_won + remaining as u8;
        }
        if remaining == 1 {
            return self.last_trick(depth);
        }

        self.tricks[depth / 4].all_cards = self.hands.all_cards();

        let signature = self
            .cache
            .is_enabled()
            .then(|| self.options.canonicalization.signature(&self.hands, seat, self.trump));
        let relative_beta = beta - ns_won as i8;
        if let Some(signature) = &signature {
            if let Some(bounds) = self.cache.lookup(signature) {
                if bounds.cutoff(relative_beta) {
                    self.stats.cache_cutoffs += 1;
                    let value = if bounds.lower >= relative_beta { bounds.lower } else { bounds.upper };
                    return ns_won + value as u8;
                }
            }
        }

        if self.options.quick_tricks {
            let sure = quick_tricks(&self.hands, seat, self.trump);
            let bounds = if is_ns(seat) {
                Bounds::new(sure as i8, remaining as i8)
            } else {
                Bounds::new(0, (remaining - sure) as i8)
            };
            if bounds.cutoff(relative_beta) {
                self.stats.quick_cutoffs += 1;
                if let Some(signature) = signature {
                    self.cache.store(signature, bounds);
                }
                let value = if is_ns(seat) { bounds.lower } else { bounds.upper };
                return ns_won + value as u8;
            }
        }

        let value = self.search_moves(depth, beta);
        let relative = value as i8 - ns_won as i8;
        if let Some(signature) = signature {
            let bounds = if value as i8 >= beta {
                Bounds::new(relative, remaining as i8)
            } else {
                Bounds::new(0, relative)
            };
            self.cache.store(signature, bounds);
        }
        if self.options.trace {
            trace!(
                "trick {} {} leads, {} ({}) beta {} -> {}",
                depth / 4 + 1,
                seat_char(seat),
                self.hands.to_pbn(seat),
                trump_char(self.trump),
                beta,
                value
            );
        }
        value
    }

    fn search_moves(&mut self, depth: usize, beta: i8) -> u8 {
        self.stats.nodes += 1;
        let trick = depth / 4;
        let card_in_trick = depth & 3;
        let PlayState { ns_won, seat, .. } = self.plays[depth];
        let remaining = self.num_tricks - trick;
        let hand = self.hands[seat];
        let all_cards = self.tricks[trick].all_cards;

        let (playable, mut ordered, cutoff_key) = if card_in_trick == 0 {
            let ordered = if self.options.move_ordering {
                order_leads(hand, &self.hands, seat, self.trump, all_cards)
            } else {
                OrderedCards::natural(hand)
            };
            (hand, ordered, CutoffTable::key(hand, seat, 0, TOTAL_CARDS))
        } else {
            let lead_suit = self.tricks[trick].lead_suit;
            let playable = match hand.suit(lead_suit) {
                suited if suited.is_empty() => hand,
                suited => suited,
            };
            let winning = self.plays[self.plays[depth - 1].winning];
            let ordered = if self.options.move_ordering {
                let view = TrickView {
                    lead_suit,
                    winning_seat: winning.seat,
                    winning_card: winning.card,
                    card_in_trick,
                };
                order_follows(playable, &self.hands, seat, self.trump, &view)
            } else {
                OrderedCards::natural(playable)
            };
            (playable, ordered, CutoffTable::key(hand, seat, card_in_trick, winning.card))
        };
        if self.options.move_ordering {
            if let Some(card) = self.cutoffs.lookup(cutoff_key) {
                if playable.have(card) {
                    ordered.promote(card);
                }
            }
        }

        let maximizing = is_ns(seat);
        let mut best = if maximizing { ns_won } else { ns_won + remaining as u8 };
        let mut tried = Cards::new();
        for card in ordered.iter() {
            if self.options.skip_equivalent && is_equivalent(card, tried, all_cards, hand) {
                self.stats.equivalent_skips += 1;
                tried.add(card);
                continue;
            }
            tried.add(card);

            let value = self.play_card(depth, card, beta);
            let cutoff = if maximizing {
                best = best.max(value);
                best as i8 >= beta
            } else {
                best = best.min(value);
                (best as i8) < beta
            };
            if cutoff {
                self.cutoffs.store(cutoff_key, card);
                break;
            }
        }
        best
    }

    fn play_card(&mut self, depth: usize, card: usize, beta: i8) -> u8 {
        let seat = self.plays[depth].seat;
        let trick = depth / 4;
        self.plays[depth].card = card;
        self.plays[depth].winning = if depth & 3 == 0 {
            self.tricks[trick].lead_suit = suit_of(card);
            depth
        } else {
            let winning = self.plays[depth - 1].winning;
            if wins_over(card, self.plays[winning].card, self.trump) {
                depth
            } else {
                winning
            }
        };

        self.hands[seat].remove(card);
        let value = self.search_node(depth + 1, beta);
        self.hands[seat].add(card);
        value
    }

    /// Every hand holds one card: play them out
    fn last_trick(&self, depth: usize) -> u8 {
        let leader = self.plays[depth].seat;
        let mut winner = leader;
        let mut winning_card = self.hands[leader].top();
        for offset in 1..NUM_SEATS {
            let seat = (leader + offset) % NUM_SEATS;
            let card = self.hands[seat].top();
            if wins_over(card, winning_card, self.trump) {
                winner = seat;
                winning_card = card;
            }
        }
        self.plays[depth].ns_won + is_ns(winner) as u8
    }
}
