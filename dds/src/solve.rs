//! Solving single deals

use crate::config::EngineConfig;
use crate::convert::{engine_hands, engine_seat, engine_trump, public_card};
use crate::denomination::Denomination;
use crate::error::{EngineError, SolveError};
use crate::exec::ExecutionContext;
use crate::scheduler::{BatchScheduler, Granularity, SolveRequest};
use crate::table::DdTable;
use dds_core::{Card, Deal, Seat};
use dds_engine::{CutoffTable, Hands, Position, SearchOptions, SearchStats, Solver, TranspositionCache};

/// Tricks `declarer` takes in `denomination` with the next seat on lead.
/// The caches must only have been used for the same deal and strain.
pub(crate) fn declarer_tricks(
    hands: &Hands,
    denomination: Denomination,
    declarer: Seat,
    options: &SearchOptions,
    cache: &mut TranspositionCache,
    cutoffs: &mut CutoffTable,
) -> Result<(u8, SearchStats), SolveError> {
    let position = Position::new(*hands, engine_trump(denomination), engine_seat(declarer.next()))?;
    let outcome = Solver::with_options(position, *options).solve_with_caches(cache, cutoffs);
    let tricks = if declarer.is_north_south() {
        outcome.ns_tricks
    } else {
        outcome.ew_tricks
    };
    Ok((tricks, outcome.stats))
}

/// Double-dummy solver for one validated deal, on the calling thread
pub struct DoubleDummySolver {
    deal: Deal,
    hands: Hands,
    config: EngineConfig,
}

impl DoubleDummySolver {
    pub fn new(deal: Deal) -> Result<Self, SolveError> {
        Self::with_config(deal, EngineConfig::default())
    }

    pub fn with_config(deal: Deal, config: EngineConfig) -> Result<Self, SolveError> {
        deal.validate()?;
        let hands = engine_hands(&deal);
        Ok(DoubleDummySolver { deal, hands, config })
    }

    pub fn deal(&self) -> &Deal {
        &self.deal
    }

    /// Tricks for `declarer` in `denomination`
    pub fn solve(&self, denomination: Denomination, declarer: Seat) -> Result<u8, SolveError> {
        let (mut cache, mut cutoffs) = self.caches();
        let (tricks, _) = declarer_tricks(
            &self.hands,
            denomination,
            declarer,
            &self.config.search_options(),
            &mut cache,
            &mut cutoffs,
        )?;
        Ok(tricks)
    }

    /// Tricks for every declarer in one denomination, indexed by
    /// `Seat as usize`. The declarers share one cache.
    pub fn solve_strain(&self, denomination: Denomination) -> Result<[u8; 4], SolveError> {
        let (mut cache, mut cutoffs) = self.caches();
        let options = self.config.search_options();
        let mut row = [0; 4];
        for declarer in Seat::ALL {
            let (tricks, _) = declarer_tricks(&self.hands, denomination, declarer, &options, &mut cache, &mut cutoffs)?;
            row[declarer as usize] = tricks;
        }
        Ok(row)
    }

    /// The full table, one strain after another
    pub fn solve_all(&self) -> Result<DdTable, SolveError> {
        let mut table = DdTable::new();
        for denomination in Denomination::ALL {
            let row = self.solve_strain(denomination)?;
            for declarer in Seat::ALL {
                table.set_tricks(denomination, declarer, row[declarer as usize]);
            }
        }
        Ok(table)
    }

    /// Tricks `declarer` takes after each possible opening lead
    pub fn solve_lead(&self, denomination: Denomination, declarer: Seat) -> Result<Vec<(Card, u8)>, SolveError> {
        let position = Position::new(self.hands, engine_trump(denomination), engine_seat(declarer.next()))?;
        let (mut cache, mut cutoffs) = self.caches();
        let values = Solver::with_options(position, self.config.search_options())
            .analyze_moves(&mut cache, &mut cutoffs)?;
        Ok(values
            .into_iter()
            .filter_map(|value| {
                let tricks = if declarer.is_north_south() {
                    value.ns_tricks
                } else {
                    13 - value.ns_tricks
                };
                public_card(value.card).map(|card| (card, tricks))
            })
            .collect())
    }

    fn caches(&self) -> (TranspositionCache, CutoffTable) {
        (TranspositionCache::new(self.config.cache), CutoffTable::default())
    }
}

/// Tricks `declarer` takes in `denomination`
pub fn solve_board(deal: &Deal, denomination: Denomination, declarer: Seat) -> Result<u8, SolveError> {
    DoubleDummySolver::new(deal.clone())?.solve(denomination, declarer)
}

/// The full double-dummy table of a deal
pub fn solve_all_strains(deal: &Deal) -> Result<DdTable, SolveError> {
    DoubleDummySolver::new(deal.clone())?.solve_all()
}

/// How [`solve_batch`] runs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchMode {
    pub config: EngineConfig,
    pub granularity: Granularity,
}

/// Full tables for many deals in parallel, in input order. A bad deal fails
/// only its own slot.
pub fn solve_batch(deals: &[Deal], mode: &BatchMode) -> Result<Vec<Result<DdTable, SolveError>>, EngineError> {
    let context = ExecutionContext::new(mode.config.clone())?;
    let scheduler = BatchScheduler::new(context.clone()).with_granularity(mode.granularity);
    let requests: Vec<SolveRequest> = deals.iter().cloned().map(SolveRequest::all_strains).collect();
    let results = scheduler
        .solve(&requests)?
        .into_iter()
        .map(|result| result.map(|solved| solved.to_table()))
        .collect();
    context.shutdown();
    Ok(results)
}
