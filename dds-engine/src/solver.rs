//! MTD(f) driver over the null-window search

use super::cache::{CacheConfig, TranspositionCache};
use super::hands::Hands;
use super::ordering::CutoffTable;
use super::position::{PlayError, Position, PositionError};
use super::search::{Search, SearchOptions, SearchStats};
use super::types::*;
use log::debug;

/// Result of solving one position
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SolveOutcome {
    /// Tricks North-South end with, those already won included
    pub ns_tricks: u8,
    pub ew_tricks: u8,
    pub stats: SearchStats,
}

/// Value of playing one card from a position
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveValue {
    pub card: usize,
    pub ns_tricks: u8,
}

pub struct Solver {
    position: Position,
    options: SearchOptions,
}

impl Solver {
    pub fn new(position: Position) -> Self {
        Solver::with_options(position, SearchOptions::default())
    }

    pub fn with_options(position: Position, options: SearchOptions) -> Self {
        Solver { position, options }
    }

    /// Solver for full hands with `leader` on lead
    pub fn from_hands(hands: Hands, trump: usize, leader: Seat) -> Result<Self, PositionError> {
        Ok(Solver::new(Position::new(hands, trump, leader)?))
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    /// Tricks North-South take with best play from both sides
    pub fn solve(&self) -> u8 {
        let mut cache = TranspositionCache::new(CacheConfig::default());
        let mut cutoffs = CutoffTable::default();
        self.solve_with_caches(&mut cache, &mut cutoffs).ns_tricks
    }

    /// Solve reusing caches from earlier solves of positions with the same
    /// trump suit.
    pub fn solve_with_caches(
        &self,
        cache: &mut TranspositionCache,
        cutoffs: &mut CutoffTable,
    ) -> SolveOutcome {
        let mut stats = SearchStats::default();
        let future = self.mtdf(cache, cutoffs, &mut stats);
        let remaining = self.position.tricks_remaining() as u8;
        let outcome = SolveOutcome {
            ns_tricks: self.position.ns_tricks() + future,
            ew_tricks: self.position.ew_tricks() + remaining - future,
            stats,
        };
        debug!(
            "{} to play, trump {}: NS {} EW {} ({} nodes, {} probes)",
            seat_char(self.position.seat_to_play()),
            trump_char(self.position.trump()),
            outcome.ns_tricks,
            outcome.ew_tricks,
            stats.nodes,
            stats.probes
        );
        outcome
    }

    /// Value of every legal card for the seat to play, in card order.
    /// Equivalent cards are all listed.
    pub fn analyze_moves(
        &self,
        cache: &mut TranspositionCache,
        cutoffs: &mut CutoffTable,
    ) -> Result<Vec<MoveValue>, PlayError> {
        let moves = self.position.legal_moves();
        let mut values = Vec::with_capacity(moves.size());
        for card in moves.iter() {
            let mut next = self.position.clone();
            next.play(card)?;
            let outcome = Solver::with_options(next, self.options).solve_with_caches(cache, cutoffs);
            values.push(MoveValue {
                card,
                ns_tricks: outcome.ns_tricks,
            });
        }
        Ok(values)
    }

    fn mtdf(
        &self,
        cache: &mut TranspositionCache,
        cutoffs: &mut CutoffTable,
        stats: &mut SearchStats,
    ) -> u8 {
        let num_tricks = self.position.tricks_remaining() as i8;
        let mut lower: i8 = 0;
        let mut upper: i8 = num_tricks;
        let mut guess = (self.guess_tricks() as i8).min(num_tricks);

        while lower < upper {
            let beta = if guess == lower { guess + 1 } else { guess };
            stats.probes += 1;
            let mut search = Search::new(&self.position, cache, cutoffs, &self.options, stats);
            guess = search.search(beta) as i8;
            if guess < beta {
                upper = guess;
            } else {
                lower = guess;
            }
        }
        lower as u8
    }

    /// Starting guess from high-card strength and trump length
    fn guess_tricks(&self) -> usize {
        let hands = self.position.hands();
        let num_tricks = hands.num_tricks();
        let ns_points = hands.points(NORTH) + hands.points(SOUTH);
        let ew_points = hands.points(EAST) + hands.points(WEST);
        let trump = self.position.trump();

        if trump == NOTRUMP {
            if ns_points * 2 < ew_points {
                return 0;
            }
            if ns_points < ew_points {
                return num_tricks / 2 + 1;
            }
        } else {
            let length = |seat: Seat| hands[seat].suit(trump).size();
            let ns_long = length(NORTH).max(length(SOUTH));
            let ew_long = length(EAST).max(length(WEST));
            let ns_total = length(NORTH) + length(SOUTH);
            let ew_total = length(EAST) + length(WEST);
            if ns_points < ew_points && (ns_long < ew_long || (ns_long == ew_long && ns_total < ew_total)) {
                return 0;
            }
        }
        num_tricks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solver(pbn: &str, trump: usize, leader: Seat) -> Solver {
        Solver::from_hands(Hands::from_pbn(pbn).unwrap(), trump, leader).unwrap()
    }

    #[test]
    fn test_single_trick() {
        assert_eq!(solver("N:A... K... 2... 3...", NOTRUMP, WEST).solve(), 1);
        assert_eq!(solver("N:K... A... 2... 3...", NOTRUMP, WEST).solve(), 0);
    }

    #[test]
    fn test_finished_position() {
        let s = solver("N:... ... ... ...", NOTRUMP, WEST);
        assert_eq!(s.solve(), 0);
    }

    #[test]
    fn test_tricks_add_up() {
        let s = solver("N:AK.AK.AK.AK QJ.QJ.QJ.QJ 32.32.32.32 T9.T9.T9.T9", NOTRUMP, WEST);
        let mut cache = TranspositionCache::new(CacheConfig::default());
        let mut cutoffs = CutoffTable::default();
        let outcome = s.solve_with_caches(&mut cache, &mut cutoffs);
        assert_eq!(outcome.ns_tricks, 8);
        assert_eq!(outcome.ew_tricks, 0);
        assert!(outcome.stats.probes >= 1);
    }

    #[test]
    fn test_analyze_moves() {
        // North leads in notrump with the ace and a loser
        let s = solver("N:A2... KQ... 43... 65...", NOTRUMP, NORTH);
        let mut cache = TranspositionCache::new(CacheConfig::default());
        let mut cutoffs = CutoffTable::default();
        let values = s.analyze_moves(&mut cache, &mut cutoffs).unwrap();
        assert_eq!(values.len(), 2);
        let best = values.iter().map(|v| v.ns_tricks).max().unwrap();
        assert_eq!(best, s.solve());
        assert_eq!(best, 1);
    }
}
