//! Engine configuration.
//!
//! Every field has a default, so a TOML file only needs the settings it
//! changes:
//!
//! ```toml
//! threads = 4
//! backend = "worker-pool"
//!
//! [cache]
//! max_bytes = 33554432
//! overflow = "refuse"
//! ```

use crate::error::EngineError;
use dds_engine::{CacheConfig, Canonicalization, SearchOptions};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How solver tasks are run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BackendKind {
    /// A new OS thread for every task
    ThreadPerTask,
    /// Fixed worker threads fed from a queue
    #[default]
    WorkerPool,
    /// Rayon pool, one spawned job per task
    WorkStealing,
    /// Rayon pool, each submitted batch run as one parallel loop
    DataParallel,
}

impl BackendKind {
    pub const ALL: [BackendKind; 4] = [
        BackendKind::ThreadPerTask,
        BackendKind::WorkerPool,
        BackendKind::WorkStealing,
        BackendKind::DataParallel,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            BackendKind::ThreadPerTask => "thread-per-task",
            BackendKind::WorkerPool => "worker-pool",
            BackendKind::WorkStealing => "work-stealing",
            BackendKind::DataParallel => "data-parallel",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Worker threads (0 = one per available core)
    pub threads: usize,
    pub backend: BackendKind,
    pub canonicalization: Canonicalization,
    pub move_ordering: bool,
    pub quick_tricks: bool,
    /// Try only one card of each run of equivalent cards
    pub skip_equivalent: bool,
    /// Trace every trick of the search at `trace` log level
    pub trace: bool,
    /// Transposition cache of each task
    pub cache: CacheConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        let search = SearchOptions::default();
        EngineConfig {
            threads: 0,
            backend: BackendKind::default(),
            canonicalization: search.canonicalization,
            move_ordering: search.move_ordering,
            quick_tricks: search.quick_tricks,
            skip_equivalent: search.skip_equivalent,
            trace: search.trace,
            cache: CacheConfig::default(),
        }
    }
}

/// Largest accepted thread count
pub const MAX_THREADS: usize = 1024;

impl EngineConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, EngineError> {
        let config: EngineConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, EngineError> {
        toml::to_string(self).map_err(|e| EngineError::Config(e.to_string()))
    }

    pub fn with_backend(mut self, backend: BackendKind) -> Self {
        self.backend = backend;
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if self.threads > MAX_THREADS {
            return Err(EngineError::Config(format!(
                "threads = {} exceeds the maximum of {}",
                self.threads, MAX_THREADS
            )));
        }
        if self.cache.enabled && self.cache.max_entries() == 0 {
            return Err(EngineError::Config(format!(
                "cache.max_bytes = {} is too small to hold a single entry",
                self.cache.max_bytes
            )));
        }
        Ok(())
    }

    /// Thread count with 0 resolved to the available parallelism
    pub fn actual_threads(&self) -> usize {
        if self.threads == 0 {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        } else {
            self.threads
        }
    }

    pub fn search_options(&self) -> SearchOptions {
        SearchOptions {
            canonicalization: self.canonicalization,
            move_ordering: self.move_ordering,
            quick_tricks: self.quick_tricks,
            skip_equivalent: self.skip_equivalent,
            trace: self.trace,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dds_engine::OverflowPolicy;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.threads, 0);
        assert!(config.actual_threads() >= 1);
        assert_eq!(config.backend, BackendKind::WorkerPool);
        assert!(config.cache.enabled);
        assert_eq!(config.search_options(), SearchOptions::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_toml() {
        let config = EngineConfig::from_toml_str(
            r#"
            threads = 3
            backend = "data-parallel"
            canonicalization = "rank-equivalence"
            quick_tricks = false
            skip_equivalent = false

            [cache]
            max_bytes = 1048576
            overflow = "refuse"
            "#,
        )
        .unwrap();
        assert_eq!(config.threads, 3);
        assert_eq!(config.backend, BackendKind::DataParallel);
        assert_eq!(config.canonicalization, Canonicalization::RankEquivalence);
        assert!(!config.quick_tricks);
        assert!(!config.skip_equivalent);
        assert!(!config.search_options().skip_equivalent);
        assert!(config.move_ordering);
        assert!(config.cache.enabled);
        assert_eq!(config.cache.max_bytes, 1 << 20);
        assert_eq!(config.cache.overflow, OverflowPolicy::Refuse);
    }

    #[test]
    fn test_empty_toml_is_default() {
        assert_eq!(EngineConfig::from_toml_str("").unwrap(), EngineConfig::default());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = EngineConfig::default()
            .with_backend(BackendKind::ThreadPerTask)
            .with_threads(2);
        let text = config.to_toml_string().unwrap();
        assert_eq!(EngineConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_rejects_bad_config() {
        assert!(matches!(
            EngineConfig::from_toml_str("thread = 4"),
            Err(EngineError::ConfigParse(_))
        ));
        assert!(matches!(
            EngineConfig::from_toml_str("backend = \"gpu\""),
            Err(EngineError::ConfigParse(_))
        ));
        assert!(matches!(
            EngineConfig::from_toml_str("threads = 100000"),
            Err(EngineError::Config(_))
        ));
        assert!(matches!(
            EngineConfig::from_toml_str("[cache]\nmax_bytes = 1"),
            Err(EngineError::Config(_))
        ));
        assert!(EngineConfig::from_toml_str("[cache]\nenabled = false\nmax_bytes = 1").is_ok());
    }

    #[test]
    fn test_backend_names() {
        for backend in BackendKind::ALL {
            let text = format!("backend = \"{}\"", backend);
            assert_eq!(EngineConfig::from_toml_str(&text).unwrap().backend, backend);
        }
    }
}
