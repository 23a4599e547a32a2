//! Diagnostic counters for the coercion pass.
//!
//! Coercion misses and numeric parse failures never change control flow.
//! They are counted here and logged, so a policy that references paths
//! absent from every document can still be spotted.

use log::{debug, info};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Shared counters; clones observe the same values.
#[derive(Clone, Default, Debug)]
pub struct CoercionStats {
    applied: Arc<AtomicUsize>,
    missed: Arc<AtomicUsize>,
    parse_failures: Arc<AtomicUsize>,
    corrected_noticed: Arc<AtomicBool>,
}

impl CoercionStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// A coercion changed the tree.
    pub fn record_applied(&self) {
        self.applied.fetch_add(1, Ordering::Relaxed);
    }

    /// A target was missing, had a non-object parent or the wrong shape.
    pub fn record_miss(&self, path: &str, reason: &str) {
        self.missed.fetch_add(1, Ordering::Relaxed);
        debug!("Coercion skipped for '{}': {}", path, reason);
    }

    /// Numeric text at a coercion target did not parse.
    pub fn record_parse_failure(&self, path: &str, text: &str) {
        self.parse_failures.fetch_add(1, Ordering::Relaxed);
        debug!("Number coercion failed for '{}': {:?} is not a number", path, text);
    }

    /// Corrected-mode array or number coercion produced a value the legacy
    /// converter would not have. Logged once per set of counters.
    pub fn record_corrected(&self, path: &str) {
        if !self.corrected_noticed.swap(true, Ordering::Relaxed) {
            info!(
                "Coercion of '{}' uses corrected semantics; set \"coercionMode\": \"legacy\" for the previous output",
                path
            );
        }
    }

    /// Whether [`record_corrected`](Self::record_corrected) has fired.
    pub fn corrected_noticed(&self) -> bool {
        self.corrected_noticed.load(Ordering::Relaxed)
    }

    pub fn applied(&self) -> usize {
        self.applied.load(Ordering::Relaxed)
    }

    pub fn missed(&self) -> usize {
        self.missed.load(Ordering::Relaxed)
    }

    pub fn parse_failures(&self) -> usize {
        self.parse_failures.load(Ordering::Relaxed)
    }

    /// Log the totals so far.
    pub fn finish(&self) {
        debug!(
            "Coercion totals: {} applied, {} skipped, {} number parse failures",
            self.applied(),
            self.missed(),
            self.parse_failures()
        );
    }
}
