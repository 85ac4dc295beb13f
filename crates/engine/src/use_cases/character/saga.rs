//! Creation saga bookkeeping: steps, outcome and compensation.
//!
//! A character is written to four stores in a fixed order. When a later write
//! fails, the earlier ones are undone in reverse. Compensation is best-effort
//! and never retried; anything it could not undo is reported, logged and
//! counted, but never replaces the original error.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use roster_domain::{Character, CharacterId, OwnerId};

use super::{CharacterError, CharacterStores};
use crate::infrastructure::ports::RepoError;

/// Store writes in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SagaStep {
    Identity,
    Appearance,
    Stats,
    Position,
}

impl SagaStep {
    pub const ORDER: [SagaStep; 4] = [
        SagaStep::Identity,
        SagaStep::Appearance,
        SagaStep::Stats,
        SagaStep::Position,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SagaStep::Identity => "identity",
            SagaStep::Appearance => "appearance",
            SagaStep::Stats => "stats",
            SagaStep::Position => "position",
        }
    }
}

impl fmt::Display for SagaStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct CompensationFailure {
    pub step: SagaStep,
    pub error: RepoError,
}

/// What compensation managed to undo.
#[derive(Debug, Clone, Default)]
pub struct CompensationReport {
    /// Steps undone, in the order they were undone.
    pub compensated: Vec<SagaStep>,
    /// Steps whose records may be orphaned.
    pub failed: Vec<CompensationFailure>,
}

impl CompensationReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn orphaned_steps(&self) -> Vec<SagaStep> {
        self.failed.iter().map(|f| f.step).collect()
    }
}

#[derive(Debug)]
pub enum SagaOutcome {
    Completed(Character),
    Failed {
        error: CharacterError,
        compensation: CompensationReport,
    },
}

impl SagaOutcome {
    pub(super) fn rejected(error: CharacterError) -> Self {
        SagaOutcome::Failed {
            error,
            compensation: CompensationReport::default(),
        }
    }

    pub fn into_result(self) -> Result<Character, CharacterError> {
        match self {
            SagaOutcome::Completed(character) => Ok(character),
            SagaOutcome::Failed { error, .. } => Err(error),
        }
    }
}

/// Saga counters for monitoring.
#[derive(Debug, Default)]
pub struct SagaMetrics {
    started: AtomicU64,
    completed: AtomicU64,
    failed: AtomicU64,
    compensation_failures: AtomicU64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SagaMetricsSnapshot {
    pub started: u64,
    pub completed: u64,
    pub failed: u64,
    pub compensation_failures: u64,
}

impl SagaMetrics {
    pub(super) fn record_started(&self) {
        self.started.fetch_add(1, Ordering::Relaxed);
    }

    pub(super) fn record_completed(&self) {
        self.completed.fetch_add(1, Ordering::Relaxed);
    }

    pub(super) fn record_failed(&self, report: &CompensationReport) {
        self.failed.fetch_add(1, Ordering::Relaxed);
        self.compensation_failures
            .fetch_add(report.failed.len() as u64, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> SagaMetricsSnapshot {
        SagaMetricsSnapshot {
            started: self.started.load(Ordering::Relaxed),
            completed: self.completed.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            compensation_failures: self.compensation_failures.load(Ordering::Relaxed),
        }
    }
}

/// Undo `written` in reverse. A record that is already gone counts as undone.
pub(super) async fn compensate(
    stores: &CharacterStores,
    character_id: CharacterId,
    owner_id: OwnerId,
    written: &[SagaStep],
) -> CompensationReport {
    let mut report = CompensationReport::default();

    for &step in written.iter().rev() {
        let result = match step {
            SagaStep::Identity => stores.characters.delete(character_id).await,
            SagaStep::Appearance => stores.appearance.delete(character_id).await,
            SagaStep::Stats => stores.stats.delete(character_id).await,
            SagaStep::Position => stores.positions.delete(character_id).await,
        };

        match result {
            Ok(()) => report.compensated.push(step),
            Err(e) if e.is_not_found() => {
                tracing::debug!(%character_id, %step, "Nothing to compensate");
                report.compensated.push(step);
            }
            Err(e) => {
                tracing::error!(
                    %character_id,
                    %owner_id,
                    %step,
                    error = %e,
                    "Compensation failed, record may be orphaned"
                );
                report.failed.push(CompensationFailure { step, error: e });
            }
        }
    }

    report
}
