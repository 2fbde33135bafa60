//! Period-scoped soft diagnostics.
//!
//! Expected data sparsity (no vacant dwelling for a mover, a zero-probability
//! choice set, a missing optional record) is counted here instead of being
//! returned as an error.  Errors are reserved for broken invariants.
//!
//! One [`Issues`] value is owned by the orchestrator and lent to every model
//! through its context.  It is reset at model startup and at the start of
//! each simulated year; counts are only meaningful within that window.

use std::collections::BTreeMap;
use std::fmt;

use tracing::{info, warn};

use crate::Year;

/// How many context strings are retained per issue kind.
const MAX_EXAMPLES: usize = 3;

/// Category of a soft diagnostic.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[non_exhaustive]
pub enum IssueKind {
    /// Every alternative in a choice set had zero probability.
    ZeroProbability,
    /// A mover found no vacant dwelling.
    NoVacantDwelling,
    /// A job seeker found no vacant job.
    NoVacantJob,
    /// A school had no free seat.
    SchoolFull,
    /// An optional record referenced by the input was absent.
    MissingRecord,
    /// A destination could not be reached on the network.
    Unreachable,
}

impl IssueKind {
    pub fn as_str(self) -> &'static str {
        match self {
            IssueKind::ZeroProbability  => "zero_probability",
            IssueKind::NoVacantDwelling => "no_vacant_dwelling",
            IssueKind::NoVacantJob      => "no_vacant_job",
            IssueKind::SchoolFull       => "school_full",
            IssueKind::MissingRecord    => "missing_record",
            IssueKind::Unreachable      => "unreachable",
        }
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct IssueCount {
    count:    u64,
    examples: Vec<String>,
}

/// Accumulated issue counts for one period.
#[derive(Clone, Debug, Default)]
pub struct Issues {
    period: Option<Year>,
    counts: BTreeMap<IssueKind, IssueCount>,
}

impl Issues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Discard all counts and open a new period.
    pub fn reset_for_period(&mut self, year: Year) {
        self.period = Some(year);
        self.counts.clear();
    }

    /// Discard all counts without opening a period (model startup).
    pub fn reset(&mut self) {
        self.period = None;
        self.counts.clear();
    }

    /// Record one occurrence.  `context` is only formatted for the first
    /// few occurrences of each kind.
    pub fn increment(&mut self, kind: IssueKind, context: impl fmt::Display) {
        let entry = self.counts.entry(kind).or_default();
        entry.count += 1;
        if entry.examples.len() < MAX_EXAMPLES {
            entry.examples.push(context.to_string());
        }
    }

    pub fn count(&self, kind: IssueKind) -> u64 {
        self.counts.get(&kind).map_or(0, |c| c.count)
    }

    pub fn total(&self) -> u64 {
        self.counts.values().map(|c| c.count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn period(&self) -> Option<Year> {
        self.period
    }

    /// Snapshot of the current period's counts, ordered by kind.
    pub fn summarize(&self) -> IssueSummary {
        IssueSummary {
            period:  self.period,
            entries: self
                .counts
                .iter()
                .map(|(kind, c)| IssueEntry {
                    kind:     *kind,
                    count:    c.count,
                    examples: c.examples.clone(),
                })
                .collect(),
        }
    }

    /// Emit the period summary through `tracing`.
    pub fn log_summary(&self) {
        let period = self.period.map(|y| y.to_string()).unwrap_or_else(|| "setup".into());
        if self.counts.is_empty() {
            info!(period = %period, "no issues recorded");
            return;
        }
        for (kind, c) in &self.counts {
            warn!(
                period = %period,
                issue = %kind,
                count = c.count,
                examples = ?c.examples,
                "issues recorded",
            );
        }
    }
}

/// One row of an [`IssueSummary`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IssueEntry {
    pub kind:     IssueKind,
    pub count:    u64,
    pub examples: Vec<String>,
}

/// Immutable copy of one period's issue counts.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IssueSummary {
    pub period:  Option<Year>,
    pub entries: Vec<IssueEntry>,
}

impl IssueSummary {
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|e| e.count).sum()
    }
}
