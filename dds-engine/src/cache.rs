//! Transposition cache: bounds on future North-South tricks, keyed by
//! position signature.
//!
//! Bounds are stored relative to the tricks already won when the position
//! was reached, so one entry serves every path into the same holdings.

use super::canonical::Signature;
use log::warn;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::mem;

/// Approximate bytes one entry occupies, table overhead included
pub const ENTRY_BYTES: usize = mem::size_of::<Signature>() + mem::size_of::<Bounds>() + 16;

/// Default per-task memory bound
pub const DEFAULT_MAX_BYTES: usize = 64 << 20;

/// Bounds on a trick count
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Bounds {
    pub lower: i8,
    pub upper: i8,
}

impl Bounds {
    pub fn new(lower: i8, upper: i8) -> Self {
        Bounds { lower, upper }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.upper < self.lower
    }

    #[inline]
    pub fn is_exact(&self) -> bool {
        self.upper == self.lower
    }

    #[inline]
    pub fn intersect(&self, other: Bounds) -> Bounds {
        Bounds {
            lower: self.lower.max(other.lower),
            upper: self.upper.min(other.upper),
        }
    }

    /// True when these bounds alone decide a null-window probe at `beta`
    #[inline]
    pub fn cutoff(&self, beta: i8) -> bool {
        self.lower >= beta || self.upper < beta
    }
}

/// What to do once the cache reaches its memory bound
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OverflowPolicy {
    /// Drop every entry and keep caching
    #[default]
    Flush,
    /// Keep the existing entries and ignore new ones
    Refuse,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CacheConfig {
    pub enabled: bool,
    pub max_bytes: usize,
    pub overflow: OverflowPolicy,
}

impl Default for CacheConfig {
    fn default() -> Self {
        CacheConfig {
            enabled: true,
            max_bytes: DEFAULT_MAX_BYTES,
            overflow: OverflowPolicy::Flush,
        }
    }
}

impl CacheConfig {
    /// A cache that stores nothing
    pub fn disabled() -> Self {
        CacheConfig {
            enabled: false,
            ..CacheConfig::default()
        }
    }

    pub fn max_entries(&self) -> usize {
        self.max_bytes / ENTRY_BYTES
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub lookups: u64,
    pub hits: u64,
    pub stores: u64,
    pub refused: u64,
    pub flushes: u64,
}

impl CacheStats {
    pub fn merge(&mut self, other: &CacheStats) {
        self.lookups += other.lookups;
        self.hits += other.hits;
        self.stores += other.stores;
        self.refused += other.refused;
        self.flushes += other.flushes;
    }
}

pub struct TranspositionCache {
    entries: FxHashMap<Signature, Bounds>,
    config: CacheConfig,
    max_entries: usize,
    stats: CacheStats,
    warned: bool,
}

impl TranspositionCache {
    pub fn new(config: CacheConfig) -> Self {
        let max_entries = if config.enabled { config.max_entries() } else { 0 };
        TranspositionCache {
            entries: FxHashMap::default(),
            config,
            max_entries,
            stats: CacheStats::default(),
            warned: false,
        }
    }

    pub fn disabled() -> Self {
        TranspositionCache::new(CacheConfig::disabled())
    }

    pub fn is_enabled(&self) -> bool {
        self.max_entries > 0
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Forget every entry. Statistics are kept.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    #[inline]
    pub fn lookup(&mut self, signature: &Signature) -> Option<Bounds> {
        self.stats.lookups += 1;
        let found = self.entries.get(signature).copied();
        if found.is_some() {
            self.stats.hits += 1;
        }
        found
    }

    /// Record `bounds` for `signature`, tightening any existing entry
    pub fn store(&mut self, signature: Signature, bounds: Bounds) {
        if !self.is_enabled() {
            return;
        }
        if let Some(existing) = self.entries.get_mut(&signature) {
            let merged = existing.intersect(bounds);
            *existing = if merged.is_empty() { bounds } else { merged };
            self.stats.stores += 1;
            return;
        }
        if self.entries.len() >= self.max_entries && !self.make_room() {
            self.stats.refused += 1;
            return;
        }
        self.entries.insert(signature, bounds);
        self.stats.stores += 1;
    }

    /// Apply the overflow policy. Returns whether there is room afterwards.
    fn make_room(&mut self) -> bool {
        if !self.warned {
            warn!(
                "transposition cache full at {} entries ({} bytes), {:?} from now on",
                self.entries.len(),
                self.config.max_bytes,
                self.config.overflow
            );
            self.warned = true;
        }
        match self.config.overflow {
            OverflowPolicy::Flush => {
                self.entries.clear();
                self.stats.flushes += 1;
                true
            }
            OverflowPolicy::Refuse => false,
        }
    }
}
