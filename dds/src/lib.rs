//! Double-dummy solver for bridge.
//!
//! Computes how many tricks each declarer takes in each denomination when
//! all four hands are visible, for single deals or for batches solved in
//! parallel on a configurable thread backend. Par scores and text output are
//! built on top of the solved tables.
//!
//! ```no_run
//! use dds::{solve_all_strains, Deal, Denomination, Seat};
//!
//! let deal: Deal = "N:AKQT3.J6.KJ42.95 652.AK42.AQ87.T4 J74.QT95.T.AK863 98.873.9653.QJ72"
//!     .parse()
//!     .unwrap();
//! let table = solve_all_strains(&deal).unwrap();
//! assert_eq!(table.get_tricks(Denomination::NoTrump, Seat::North), 9);
//! ```

mod config;
mod convert;
mod denomination;
mod error;
pub mod exec;
pub mod format;
mod observe;
mod par;
mod scheduler;
mod solve;
mod table;

pub use config::{BackendKind, EngineConfig, MAX_THREADS};
pub use denomination::Denomination;
pub use error::{EngineError, SolveError};
pub use exec::{CancelToken, ExecutionContext, TaskHandle};
pub use format::{format_deal, format_levels, format_table, tricks_to_level};
pub use observe::{LogObserver, NullObserver, SolveObserver, TaskInfo, TaskReport};
pub use par::{contract_score, par, Contract, ParResult, Vulnerability};
pub use scheduler::{BatchScheduler, Granularity, SolveRequest, SolveResult, SolveTarget};
pub use solve::{solve_all_strains, solve_batch, solve_board, BatchMode, DoubleDummySolver};
pub use table::{DdTable, TrickResult};

pub use dds_engine as engine;

pub use dds_core::{Card, Deal, DealError, Hand, PbnError, Rank, Seat, Suit};
pub use dds_engine::{CacheConfig, CacheStats, Canonicalization, OverflowPolicy, SearchStats};
