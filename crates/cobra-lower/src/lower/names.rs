//! Fresh name generation
//!
//! One counter per base name, shared by everything a single [`Lowerer`]
//! session lowers, so labels and temporaries never repeat across functions.
//! Bases must not end in a digit, otherwise `base + counter` could collide
//! between two bases.
//!
//! [`Lowerer`]: super::Lowerer

use rustc_hash::FxHashMap;
use tracing::trace;

/// Monotonic per-base name counter
#[derive(Debug, Clone, Default)]
pub struct NameGenerator {
    counters: FxHashMap<String, u32>,
}

impl NameGenerator {
    /// Create a generator with every counter at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a generator whose counters resume after the given values
    pub fn seeded<S: Into<String>>(counters: impl IntoIterator<Item = (S, u32)>) -> Self {
        Self {
            counters: counters
                .into_iter()
                .map(|(base, count)| (base.into(), count))
                .collect(),
        }
    }

    /// Return `base` followed by the next unused positive integer for it
    pub fn fresh(&mut self, base: &str) -> String {
        let counter = self.counters.entry(base.to_string()).or_insert(0);
        *counter += 1;
        let name = format!("{}{}", base, counter);
        trace!(%name, "fresh name");
        name
    }

    /// Last number handed out for `base`
    pub fn last(&self, base: &str) -> Option<u32> {
        self.counters.get(base).copied()
    }
}
