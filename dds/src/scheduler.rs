//! Order-preserving batch solving on an execution context

use crate::config::EngineConfig;
use crate::convert::engine_hands;
use crate::denomination::Denomination;
use crate::error::{EngineError, SolveError};
use crate::exec::{CancelToken, ExecutionContext, TaskHandle};
use crate::observe::{NullObserver, SolveObserver, TaskInfo, TaskReport};
use crate::solve::declarer_tricks;
use crate::table::{DdTable, TrickResult};
use dds_core::{Deal, Seat};
use dds_engine::{CacheStats, CutoffTable, SearchStats, TranspositionCache};
use log::warn;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

/// Which combinations of a deal to solve
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveTarget {
    /// All 20 denomination and declarer pairs
    AllStrains,
    /// Every declarer in one denomination
    Strain(Denomination),
    Board { denomination: Denomination, declarer: Seat },
}

impl SolveTarget {
    /// Requested denominations with their declarers
    fn strains(&self) -> Vec<(Denomination, Vec<Seat>)> {
        match *self {
            SolveTarget::AllStrains => Denomination::ALL
                .iter()
                .map(|&denomination| (denomination, Seat::ALL.to_vec()))
                .collect(),
            SolveTarget::Strain(denomination) => vec![(denomination, Seat::ALL.to_vec())],
            SolveTarget::Board { denomination, declarer } => vec![(denomination, vec![declarer])],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolveRequest {
    pub deal: Deal,
    pub target: SolveTarget,
}

impl SolveRequest {
    pub fn all_strains(deal: Deal) -> Self {
        SolveRequest {
            deal,
            target: SolveTarget::AllStrains,
        }
    }

    pub fn strain(deal: Deal, denomination: Denomination) -> Self {
        SolveRequest {
            deal,
            target: SolveTarget::Strain(denomination),
        }
    }

    pub fn board(deal: Deal, denomination: Denomination, declarer: Seat) -> Self {
        SolveRequest {
            deal,
            target: SolveTarget::Board { denomination, declarer },
        }
    }
}

/// Solved combinations of one request, in request order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolveResult {
    pub results: Vec<TrickResult>,
}

impl SolveResult {
    pub fn tricks(&self, denomination: Denomination, declarer: Seat) -> Option<u8> {
        self.results
            .iter()
            .find(|r| r.denomination == denomination && r.declarer == declarer)
            .map(|r| r.tricks)
    }

    /// Table of the solved combinations; unsolved entries are 0
    pub fn to_table(&self) -> DdTable {
        self.results.iter().copied().collect()
    }
}

/// How requests are cut into tasks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Granularity {
    /// One task per request
    #[default]
    PerRequest,
    /// One task per requested denomination
    PerStrain,
}

/// Work of one task
struct TaskUnit {
    request: usize,
    deal: Arc<Deal>,
    strains: Vec<(Denomination, Vec<Seat>)>,
}

enum Slot {
    Invalid(SolveError),
    Tasks(Vec<TaskHandle<Vec<TrickResult>>>),
}

pub struct BatchScheduler {
    context: ExecutionContext,
    granularity: Granularity,
    observer: Arc<dyn SolveObserver>,
}

impl BatchScheduler {
    pub fn new(context: ExecutionContext) -> Self {
        BatchScheduler {
            context,
            granularity: Granularity::default(),
            observer: Arc::new(NullObserver),
        }
    }

    pub fn with_granularity(mut self, granularity: Granularity) -> Self {
        self.granularity = granularity;
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn SolveObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn context(&self) -> &ExecutionContext {
        &self.context
    }

    /// Solve every request. The outer error means the batch could not be
    /// submitted; per-request failures land in their own slot.
    pub fn solve(&self, requests: &[SolveRequest]) -> Result<Vec<Result<SolveResult, SolveError>>, EngineError> {
        let mut results = Vec::with_capacity(requests.len());
        self.solve_streaming(requests, |_, result| results.push(result))?;
        Ok(results)
    }

    /// Solve every request, passing each result to `callback` as soon as it
    /// and all earlier ones are done.
    pub fn solve_streaming<F>(&self, requests: &[SolveRequest], mut callback: F) -> Result<(), EngineError>
    where
        F: FnMut(usize, Result<SolveResult, SolveError>),
    {
        let mut units = Vec::new();
        let mut slots = Vec::with_capacity(requests.len());
        let mut task_counts = Vec::with_capacity(requests.len());
        for (index, request) in requests.iter().enumerate() {
            match request.deal.validate() {
                Ok(()) => {
                    let before = units.len();
                    self.partition(index, request, &mut units);
                    task_counts.push(units.len() - before);
                    slots.push(None);
                }
                Err(e) => {
                    warn!("request {index} rejected: {e}");
                    task_counts.push(0);
                    slots.push(Some(Slot::Invalid(SolveError::Deal(e))));
                }
            }
        }

        let config = Arc::new(self.context.config().clone());
        let tasks: Vec<_> = units
            .into_iter()
            .map(|unit| {
                let config = config.clone();
                let observer = self.observer.clone();
                move |cancel: &CancelToken| run_unit(&unit, &config, observer.as_ref(), cancel)
            })
            .collect();
        let mut handles = self.context.submit_all(tasks)?.into_iter();

        for (index, slot) in slots.into_iter().enumerate() {
            let slot = slot.unwrap_or_else(|| Slot::Tasks(handles.by_ref().take(task_counts[index]).collect()));
            let result = match slot {
                Slot::Invalid(e) => Err(e),
                Slot::Tasks(handles) => collect(handles),
            };
            callback(index, result);
        }
        Ok(())
    }

    fn partition(&self, index: usize, request: &SolveRequest, units: &mut Vec<TaskUnit>) {
        let deal = Arc::new(request.deal.clone());
        let strains = request.target.strains();
        match self.granularity {
            Granularity::PerRequest => units.push(TaskUnit {
                request: index,
                deal,
                strains,
            }),
            Granularity::PerStrain => units.extend(strains.into_iter().map(|strain| TaskUnit {
                request: index,
                deal: deal.clone(),
                strains: vec![strain],
            })),
        }
    }
}

fn collect(handles: Vec<TaskHandle<Vec<TrickResult>>>) -> Result<SolveResult, SolveError> {
    let mut results = Vec::new();
    for handle in handles {
        results.extend(handle.wait()?);
    }
    Ok(SolveResult { results })
}

/// Solve one task; each strain gets a fresh cache shared by its declarers
fn run_unit(
    unit: &TaskUnit,
    config: &EngineConfig,
    observer: &dyn SolveObserver,
    cancel: &CancelToken,
) -> Result<Vec<TrickResult>, SolveError> {
    let info = TaskInfo {
        request: unit.request,
        denominations: unit.strains.iter().map(|(denomination, _)| *denomination).collect(),
    };
    observer.task_started(&info);
    let start = Instant::now();
    let hands = engine_hands(&unit.deal);
    let options = config.search_options();
    let mut search = SearchStats::default();
    let mut cache_stats = CacheStats::default();

    let mut solve = || -> Result<Vec<TrickResult>, SolveError> {
        let mut results = Vec::new();
        for (denomination, declarers) in &unit.strains {
            let mut cache = TranspositionCache::new(config.cache);
            let mut cutoffs = CutoffTable::default();
            for &declarer in declarers {
                if cancel.is_cancelled() {
                    return Err(SolveError::Abandoned);
                }
                let (tricks, stats) = declarer_tricks(&hands, *denomination, declarer, &options, &mut cache, &mut cutoffs)?;
                search.merge(&stats);
                results.push(TrickResult {
                    denomination: *denomination,
                    declarer,
                    tricks,
                });
            }
            cache_stats.merge(&cache.stats());
        }
        Ok(results)
    };
    let result = solve();

    let report = TaskReport {
        elapsed: start.elapsed(),
        search,
        cache: cache_stats,
        ok: result.is_ok(),
    };
    observer.task_finished(&info, &report);
    result
}
