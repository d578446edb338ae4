//! The cleaning engine.
//!
//! [`CleaningEngine::clean`] turns a [`RawTable`] into a [`CleanTable`] in three fixed steps:
//!
//! 1. field normalization ([`normalize`]), row-chunked across a rayon pool
//! 2. duplicate resolution ([`dedup::resolve_duplicates`])
//! 3. required-field filtering ([`filter::drop_incomplete`])
//!
//! Each step owns its input and produces a new collection. Counters from normalization chunks
//! are summed after the fact, so the result does not depend on scheduling.
//!
//! ```rust
//! use order_cleaner::cleaning::{CleaningEngine, CleaningOptions};
//! use order_cleaner::types::{RawTable, RawValue};
//!
//! let raw = RawTable::new(
//!     vec!["Order ID".into(), "Customer Name".into(), "Amount USD".into()],
//!     vec![vec![RawValue::from(" ORD-1 "), RawValue::from("Ada"), RawValue::from("$1,234.56")]],
//! );
//! let engine = CleaningEngine::new(CleaningOptions::default()).unwrap();
//! let out = engine.clean(&raw);
//! assert_eq!(out.table.records[0].amount_usd, Some(1234.56));
//! assert_eq!(out.stats.trimmed_strings, 1);
//! ```

pub mod dedup;
pub mod filter;
pub mod normalize;
mod observer;

use std::fmt;
use std::ops::AddAssign;
use std::sync::Arc;
use std::time::Instant;

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use serde::Serialize;

use crate::error::{PipelineError, PipelineResult};
use crate::types::{CleanTable, OrderColumn, OrderRecord, RawTable, RawValue};

pub use observer::{CleaningEvent, CleaningObserver, CleaningStep, TracingObserver};

/// Counters collected during one cleaning run.
///
/// Drop counters are measured against the row count immediately before their own step.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct CleaningStats {
    /// Raw input headers, as read.
    pub columns_before: Vec<String>,
    /// Output columns, always [`OrderColumn::ALL`].
    pub columns_after: Vec<String>,
    pub trimmed_strings: usize,
    pub parsed_dates_nulls: usize,
    pub invalid_emails: usize,
    pub invalid_amounts: usize,
    pub dropped_duplicates: usize,
    pub dropped_missing_required: usize,
}

impl CleaningStats {
    /// Named counters in report order.
    pub fn counters(&self) -> [(&'static str, usize); 6] {
        [
            ("trimmed_strings", self.trimmed_strings),
            ("parsed_dates_nulls", self.parsed_dates_nulls),
            ("invalid_emails", self.invalid_emails),
            ("invalid_amounts", self.invalid_amounts),
            ("dropped_duplicates", self.dropped_duplicates),
            ("dropped_missing_required", self.dropped_missing_required),
        ]
    }

    /// Whether every counter is zero.
    pub fn is_clean(&self) -> bool {
        self.counters().iter().all(|(_, v)| *v == 0)
    }
}

impl fmt::Display for CleaningStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (name, value)) in self.counters().iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{name}={value}")?;
        }
        Ok(())
    }
}

/// Configuration for the [`CleaningEngine`].
#[derive(Debug, Clone)]
pub struct CleaningOptions {
    /// Worker threads for normalization. `None` uses rayon's default.
    pub num_threads: Option<usize>,
    /// Rows per normalization chunk.
    pub chunk_size: usize,
}

impl Default for CleaningOptions {
    fn default() -> Self {
        Self {
            num_threads: None,
            chunk_size: 4_096,
        }
    }
}

/// Cleaned table plus the statistics of the run that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanOutput {
    pub table: CleanTable,
    pub stats: CleaningStats,
}

/// Orchestrates normalization, de-duplication and required-field filtering.
pub struct CleaningEngine {
    pool: ThreadPool,
    opts: CleaningOptions,
    observer: Option<Arc<dyn CleaningObserver>>,
}

impl fmt::Debug for CleaningEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CleaningEngine")
            .field("opts", &self.opts)
            .field("threads", &self.pool.current_num_threads())
            .field("observer_set", &self.observer.is_some())
            .finish()
    }
}

impl CleaningEngine {
    /// Create a new engine with the given options.
    ///
    /// # Errors
    ///
    /// - [`PipelineError::InvalidOptions`] if `chunk_size == 0` or `num_threads == Some(0)`
    /// - [`PipelineError::ThreadPool`] if the worker pool cannot be built
    pub fn new(opts: CleaningOptions) -> PipelineResult<Self> {
        if opts.chunk_size == 0 {
            return Err(PipelineError::InvalidOptions {
                message: "chunk_size must be > 0".to_string(),
            });
        }
        let mut builder = ThreadPoolBuilder::new();
        if let Some(n) = opts.num_threads {
            if n == 0 {
                return Err(PipelineError::InvalidOptions {
                    message: "num_threads must be > 0 when set".to_string(),
                });
            }
            builder = builder.num_threads(n);
        }
        Ok(Self {
            pool: builder.build()?,
            opts,
            observer: None,
        })
    }

    /// Attach a statistics sink.
    pub fn with_observer(mut self, observer: Arc<dyn CleaningObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Clean a raw table. Never fails: bad values become nulls and are counted.
    pub fn clean(&self, table: &RawTable) -> CleanOutput {
        let start = Instant::now();
        self.emit(CleaningEvent::RunStarted {
            rows: table.row_count(),
            columns: table.column_count(),
        });

        let projection = ColumnProjection::from_headers(&table.headers);
        self.emit(CleaningEvent::ColumnsMapped {
            missing: projection.missing(),
            ignored: projection.ignored.clone(),
        });

        let (records, counts) = self.normalize_rows(table, &projection);
        self.emit(CleaningEvent::StepFinished {
            step: CleaningStep::Normalize,
            rows_before: table.row_count(),
            rows_after: records.len(),
        });

        let rows_before = records.len();
        let (records, dropped_duplicates) = dedup::resolve_duplicates(records);
        self.emit(CleaningEvent::StepFinished {
            step: CleaningStep::Deduplicate,
            rows_before,
            rows_after: records.len(),
        });

        let rows_before = records.len();
        let (records, dropped_missing_required) = filter::drop_incomplete(records);
        self.emit(CleaningEvent::StepFinished {
            step: CleaningStep::FilterRequired,
            rows_before,
            rows_after: records.len(),
        });

        let stats = CleaningStats {
            columns_before: table.headers.clone(),
            columns_after: OrderColumn::names(),
            trimmed_strings: counts.trimmed_strings,
            parsed_dates_nulls: counts.parsed_dates_nulls,
            invalid_emails: counts.invalid_emails,
            invalid_amounts: counts.invalid_amounts,
            dropped_duplicates,
            dropped_missing_required,
        };
        self.emit(CleaningEvent::RunFinished {
            elapsed: start.elapsed(),
            stats: stats.clone(),
        });

        CleanOutput {
            table: CleanTable::new(records),
            stats,
        }
    }

    fn normalize_rows(
        &self,
        table: &RawTable,
        projection: &ColumnProjection,
    ) -> (Vec<OrderRecord>, NormalizeCounts) {
        let per_chunk: Vec<(Vec<OrderRecord>, NormalizeCounts)> = self.pool.install(|| {
            table
                .rows
                .par_chunks(self.opts.chunk_size)
                .map(|chunk| {
                    let mut counts = NormalizeCounts::default();
                    let records = chunk
                        .iter()
                        .map(|row| normalize_row(row, projection, &mut counts))
                        .collect::<Vec<_>>();
                    (records, counts)
                })
                .collect()
        });

        let mut total = NormalizeCounts::default();
        let mut records = Vec::with_capacity(table.row_count());
        for (chunk, counts) in per_chunk {
            records.extend(chunk);
            total += counts;
        }
        (records, total)
    }

    fn emit(&self, event: CleaningEvent) {
        if let Some(o) = &self.observer {
            o.on_event(&event);
        }
    }
}

static NULL_CELL: RawValue = RawValue::Null;

/// Logical column -> raw column index, resolved once per table.
#[derive(Debug, Clone)]
struct ColumnProjection {
    indices: [Option<usize>; OrderColumn::ALL.len()],
    ignored: Vec<String>,
}

impl ColumnProjection {
    /// The first raw header that normalizes to a logical name wins.
    fn from_headers(headers: &[String]) -> Self {
        let mut indices = [None; OrderColumn::ALL.len()];
        let mut ignored = Vec::new();
        for (idx, header) in headers.iter().enumerate() {
            match OrderColumn::from_name(&normalize::normalize_column_name(header)) {
                Some(col) if indices[col.index()].is_none() => indices[col.index()] = Some(idx),
                _ => ignored.push(header.clone()),
            }
        }
        Self { indices, ignored }
    }

    fn missing(&self) -> Vec<String> {
        OrderColumn::ALL
            .iter()
            .filter(|c| self.indices[c.index()].is_none())
            .map(|c| c.name().to_string())
            .collect()
    }

    fn cell<'a>(&self, row: &'a [RawValue], column: OrderColumn) -> &'a RawValue {
        self.indices[column.index()]
            .and_then(|idx| row.get(idx))
            .unwrap_or(&NULL_CELL)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct NormalizeCounts {
    trimmed_strings: usize,
    parsed_dates_nulls: usize,
    invalid_emails: usize,
    invalid_amounts: usize,
}

impl AddAssign for NormalizeCounts {
    fn add_assign(&mut self, rhs: Self) {
        self.trimmed_strings += rhs.trimmed_strings;
        self.parsed_dates_nulls += rhs.parsed_dates_nulls;
        self.invalid_emails += rhs.invalid_emails;
        self.invalid_amounts += rhs.invalid_amounts;
    }
}

fn normalize_row(
    row: &[RawValue],
    projection: &ColumnProjection,
    counts: &mut NormalizeCounts,
) -> OrderRecord {
    let [order_id, customer_name, raw_email, raw_status, country] =
        OrderColumn::TEXT.map(|column| {
            let trimmed = normalize::trim_text(projection.cell(row, column));
            if trimmed.changed {
                counts.trimmed_strings += 1;
            }
            trimmed.value
        });

    let email = normalize::normalize_email(raw_email.as_deref());
    if raw_email.is_some() && email.is_none() {
        counts.invalid_emails += 1;
    }

    let amount_usd = normalize::parse_amount(projection.cell(row, OrderColumn::AmountUsd));
    if amount_usd.is_none() {
        counts.invalid_amounts += 1;
    }

    // Unknown statuses become null without a counter.
    let status = normalize::normalize_status(raw_status.as_deref());

    let raw_created_at = projection.cell(row, OrderColumn::CreatedAt);
    let created_at = normalize::parse_timestamp(raw_created_at);
    if !raw_created_at.is_null() && created_at.is_none() {
        counts.parsed_dates_nulls += 1;
    }

    OrderRecord {
        order_id,
        customer_name,
        email,
        amount_usd,
        created_at,
        status,
        country,
    }
}
