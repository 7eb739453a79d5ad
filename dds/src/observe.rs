//! Task lifecycle callbacks

use crate::denomination::Denomination;
use dds_engine::{CacheStats, SearchStats};
use log::debug;
use std::time::Duration;

/// What a solver task is about to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskInfo {
    /// Position of the request in its batch
    pub request: usize,
    pub denominations: Vec<Denomination>,
}

/// How a solver task went
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskReport {
    pub elapsed: Duration,
    pub search: SearchStats,
    pub cache: CacheStats,
    pub ok: bool,
}

/// Receives task lifecycle events. Called on the backend's threads.
pub trait SolveObserver: Send + Sync {
    fn task_started(&self, _info: &TaskInfo) {}

    fn task_finished(&self, _info: &TaskInfo, _report: &TaskReport) {}
}

/// Ignores every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl SolveObserver for NullObserver {}

/// Logs task events at debug level
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl SolveObserver for LogObserver {
    fn task_started(&self, info: &TaskInfo) {
        debug!("request {}: solving {}", info.request, strains(&info.denominations));
    }

    fn task_finished(&self, info: &TaskInfo, report: &TaskReport) {
        debug!(
            "request {}: {} {} in {:.1?}, {} nodes, {} probes, cache {}/{} hits",
            info.request,
            strains(&info.denominations),
            if report.ok { "done" } else { "failed" },
            report.elapsed,
            report.search.nodes,
            report.search.probes,
            report.cache.hits,
            report.cache.lookups
        );
    }
}

fn strains(denominations: &[Denomination]) -> String {
    denominations.iter().map(|d| d.to_string()).collect::<Vec<_>>().join(",")
}
