//! Eviction Strategy Module
//!
//! Pluggable policies that pick which entry to drop when the cache is at
//! capacity. The policy is chosen once, at engine construction, and every
//! eviction goes through the same trait object.

use std::fmt;
use std::str::FromStr;

// == Eviction Candidate ==
/// Per-key bookkeeping snapshot a strategy ranks during victim selection.
#[derive(Debug, Clone, Copy)]
pub struct EvictionCandidate<'a> {
    pub key: &'a str,
    /// Last access timestamp (Unix milliseconds)
    pub last_access: u64,
    /// Lifetime access count, starting at 1 on insert
    pub access_count: u64,
    /// Absolute expiry timestamp (Unix milliseconds)
    pub expires_at: u64,
}

// == Eviction Strategy ==
/// A victim-selection policy.
///
/// Implementations must be deterministic: given the same candidates they
/// always pick the same key, so ties are broken explicitly.
pub trait EvictionStrategy: fmt::Debug + Send + Sync {
    /// Picks the key to evict, or `None` when there are no candidates.
    fn choose_victim<'a>(&self, candidates: &[EvictionCandidate<'a>]) -> Option<&'a str>;

    /// Policy name used in logs.
    fn name(&self) -> &'static str;
}

// == Recency Strategy ==
/// Evicts the entry not accessed for the longest time.
///
/// Ties on last access resolve to the lexicographically lowest key.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecencyStrategy;

impl EvictionStrategy for RecencyStrategy {
    fn choose_victim<'a>(&self, candidates: &[EvictionCandidate<'a>]) -> Option<&'a str> {
        candidates
            .iter()
            .min_by_key(|c| (c.last_access, c.key))
            .map(|c| c.key)
    }

    fn name(&self) -> &'static str {
        "recency"
    }
}

// == Frequency Strategy ==
/// Evicts the entry with the lowest access count.
///
/// Ties resolve to the oldest last access, then the lowest key.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrequencyStrategy;

impl EvictionStrategy for FrequencyStrategy {
    fn choose_victim<'a>(&self, candidates: &[EvictionCandidate<'a>]) -> Option<&'a str> {
        candidates
            .iter()
            .min_by_key(|c| (c.access_count, c.last_access, c.key))
            .map(|c| c.key)
    }

    fn name(&self) -> &'static str {
        "frequency"
    }
}

// == Expiry Proximity Strategy ==
/// Evicts the entry closest to its expiry time.
///
/// Ties on expiry resolve to the lexicographically lowest key.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExpiryProximityStrategy;

impl EvictionStrategy for ExpiryProximityStrategy {
    fn choose_victim<'a>(&self, candidates: &[EvictionCandidate<'a>]) -> Option<&'a str> {
        candidates
            .iter()
            .min_by_key(|c| (c.expires_at, c.key))
            .map(|c| c.key)
    }

    fn name(&self) -> &'static str {
        "expiry-proximity"
    }
}

// == Eviction Kind ==
/// Configuration selector for the eviction policy.
///
/// Parsed once when configuration loads; unknown names are rejected there
/// rather than at eviction time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EvictionKind {
    #[default]
    Recency,
    Frequency,
    ExpiryProximity,
}

impl EvictionKind {
    /// Builds the strategy object for this selector.
    pub fn build(self) -> Box<dyn EvictionStrategy> {
        match self {
            EvictionKind::Recency => Box::new(RecencyStrategy),
            EvictionKind::Frequency => Box::new(FrequencyStrategy),
            EvictionKind::ExpiryProximity => Box::new(ExpiryProximityStrategy),
        }
    }

    /// Stable lowercase name, matching the configuration spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            EvictionKind::Recency => "recency",
            EvictionKind::Frequency => "frequency",
            EvictionKind::ExpiryProximity => "expiry-proximity",
        }
    }
}

impl fmt::Display for EvictionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EvictionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "recency" => Ok(EvictionKind::Recency),
            "frequency" => Ok(EvictionKind::Frequency),
            "expiry-proximity" => Ok(EvictionKind::ExpiryProximity),
            other => Err(format!("unknown eviction strategy: {other}")),
        }
    }
}
