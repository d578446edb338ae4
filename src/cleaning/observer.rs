use std::fmt;
use std::time::Duration;

use tracing::{debug, info};

use super::CleaningStats;

/// A table-wide cleaning step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleaningStep {
    Normalize,
    Deduplicate,
    FilterRequired,
}

impl fmt::Display for CleaningStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CleaningStep::Normalize => "normalize",
            CleaningStep::Deduplicate => "deduplicate",
            CleaningStep::FilterRequired => "filter_required",
        })
    }
}

/// Events emitted by [`super::CleaningEngine`] during a run.
#[derive(Debug, Clone)]
pub enum CleaningEvent {
    RunStarted {
        rows: usize,
        columns: usize,
    },
    ColumnsMapped {
        missing: Vec<String>,
        ignored: Vec<String>,
    },
    StepFinished {
        step: CleaningStep,
        rows_before: usize,
        rows_after: usize,
    },
    RunFinished {
        elapsed: Duration,
        stats: CleaningStats,
    },
}

/// Statistics sink for cleaning runs.
///
/// The engine never logs on its own; callers inject an observer to route progress and
/// counters wherever they need them.
pub trait CleaningObserver: Send + Sync {
    fn on_event(&self, event: &CleaningEvent);
}

/// Forwards cleaning events to `tracing`.
#[derive(Debug, Default)]
pub struct TracingObserver;

impl CleaningObserver for TracingObserver {
    fn on_event(&self, event: &CleaningEvent) {
        match event {
            CleaningEvent::RunStarted { rows, columns } => {
                debug!(rows, columns, "cleaning started");
            }
            CleaningEvent::ColumnsMapped { missing, ignored } => {
                if !missing.is_empty() {
                    info!(columns = ?missing, "input lacks columns; filling with nulls");
                }
                if !ignored.is_empty() {
                    debug!(columns = ?ignored, "ignoring unrecognized input columns");
                }
            }
            CleaningEvent::StepFinished {
                step,
                rows_before,
                rows_after,
            } => {
                debug!(%step, rows_before, rows_after, "cleaning step finished");
            }
            CleaningEvent::RunFinished { elapsed, stats } => {
                info!(?elapsed, "Cleaning finished: {stats}");
            }
        }
    }
}
