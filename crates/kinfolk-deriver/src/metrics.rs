//! Metrics collection for Deriver operations

use kinfolk_domain::EventTypeId;
use std::collections::BTreeMap;

/// Derivations for one event type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DerivationCounts {
    /// Events created by derivation
    pub created: usize,

    /// Existing events whose dates were extended
    pub updated: usize,
}

impl DerivationCounts {
    /// Whether nothing was created or updated
    pub fn is_empty(&self) -> bool {
        self.created == 0 && self.updated == 0
    }
}

impl std::ops::AddAssign for DerivationCounts {
    fn add_assign(&mut self, other: Self) {
        self.created += other.created;
        self.updated += other.updated;
    }
}

/// Metrics collected during derivation passes
#[derive(Debug, Clone, Default)]
pub struct DerivationMetrics {
    /// Derivations per event type
    pub derivations: BTreeMap<EventTypeId, DerivationCounts>,

    /// Person scans performed (one per person per event type)
    pub persons_scanned: usize,

    /// Derivation passes completed
    pub pass_count: usize,
}

impl DerivationMetrics {
    /// Create new empty metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the derivations for one event type
    pub fn record(&mut self, event_type: &EventTypeId, counts: DerivationCounts) {
        *self.derivations.entry(event_type.clone()).or_default() += counts;
    }

    /// Record one scanned person
    pub fn record_scan(&mut self) {
        self.persons_scanned += 1;
    }

    /// Record a pass completion
    pub fn record_pass(&mut self) {
        self.pass_count += 1;
    }

    /// Derivations for one event type
    pub fn counts(&self, event_type: &EventTypeId) -> DerivationCounts {
        self.derivations.get(event_type).copied().unwrap_or_default()
    }

    /// Total events created across all event types
    pub fn total_created(&self) -> usize {
        self.derivations.values().map(|c| c.created).sum()
    }

    /// Total events updated across all event types
    pub fn total_updated(&self) -> usize {
        self.derivations.values().map(|c| c.updated).sum()
    }

    /// Add another set of metrics to these
    pub fn merge(&mut self, other: &DerivationMetrics) {
        for (event_type, counts) in &other.derivations {
            self.record(event_type, *counts);
        }
        self.persons_scanned += other.persons_scanned;
        self.pass_count += other.pass_count;
    }

    /// Reset all metrics
    pub fn reset(&mut self) {
        self.derivations.clear();
        self.persons_scanned = 0;
        self.pass_count = 0;
    }

    /// Generate a summary report of metrics
    pub fn summary(&self) -> String {
        let mut lines = vec![
            "Deriver Metrics Summary".to_string(),
            "=======================".to_string(),
            format!("Passes: {}", self.pass_count),
            format!("Persons scanned: {}", self.persons_scanned),
            String::new(),
        ];

        if !self.derivations.is_empty() {
            lines.push("Derivations by event type:".to_string());
            for (event_type, counts) in &self.derivations {
                lines.push(format!(
                    "  {}: {} created, {} updated",
                    event_type, counts.created, counts.updated
                ));
            }
            lines.push(format!(
                "  Total: {} created, {} updated",
                self.total_created(),
                self.total_updated()
            ));
        }

        lines.join("\n")
    }
}
