//! `order-cleaner` turns messy e-commerce order exports into a normalized, schema-validated
//! table plus a JSON/Markdown quality report.
//!
//! The core is [`cleaning::CleaningEngine`] followed by [`validation::SchemaValidator`]. Everything
//! else ([`io`], [`report`], [`logging`], [`cli`]) is plumbing around them, wired together by
//! [`pipeline::run`].
//!
//! ## What gets cleaned
//!
//! - **Column names**: trimmed and lower-cased; whitespace runs become `_`, other punctuation is
//!   dropped (`" Amount (USD) "` → `amount_usd`). Missing logical columns are added as all-null.
//! - **Text fields**: trimmed; empty becomes null.
//! - **Email**: lower-cased; anything without an `@` becomes null.
//! - **Amount**: currency symbols, spaces and locale separators handled (`"$1,234.56"`,
//!   `"1.234,56"`, `"1 234,56"` all parse to `1234.56`).
//! - **Status**: synonyms folded onto `paid`, `pending`, `cancelled`, `refunded`.
//! - **Created at**: ISO-8601 and common regional date formats; unparsable becomes null.
//! - **Duplicates**: per `order_id`, the record with the latest `created_at` wins.
//! - **Required fields**: rows missing `order_id`, `customer_name` or `amount_usd` are
//!   dropped.
//!
//! ## Quick example
//!
//! ```rust
//! use order_cleaner::cleaning::{CleaningEngine, CleaningOptions};
//! use order_cleaner::types::{OrderStatus, RawTable, RawValue};
//! use order_cleaner::validation::SchemaValidator;
//!
//! # fn main() -> Result<(), order_cleaner::PipelineError> {
//! let raw = RawTable::new(
//!     ["Order ID", "Customer Name", "Email", "Amount (USD)", "Status"]
//!         .map(String::from)
//!         .to_vec(),
//!     vec![vec![
//!         RawValue::from("ORD-1"),
//!         RawValue::from("Ada"),
//!         RawValue::from(" Ada@Example.COM "),
//!         RawValue::from("1.234,56 €"),
//!         RawValue::from("Completed"),
//!     ]],
//! );
//!
//! let cleaned = CleaningEngine::new(CleaningOptions::default())?.clean(&raw);
//! let record = &cleaned.table.records[0];
//! assert_eq!(record.email.as_deref(), Some("ada@example.com"));
//! assert_eq!(record.amount_usd, Some(1234.56));
//! assert_eq!(record.status, Some(OrderStatus::Paid));
//!
//! // created_at and country are missing; both are nullable.
//! let result = SchemaValidator::default().validate(&cleaned.table);
//! assert!(result.ok);
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`types`]: raw input cells, the fixed order columns, cleaned records
//! - [`cleaning`]: field normalizers, duplicate resolution, required-field filtering
//! - [`validation`]: the column contract and its validator
//! - [`io`]: CSV and workbook reading/writing
//! - [`report`]: `report.json` / `report.md`
//! - [`pipeline`]: the end-to-end run and its exit status
//! - [`error`]: error types used across I/O and setup

pub mod cleaning;
pub mod cli;
pub mod error;
pub mod io;
pub mod logging;
pub mod pipeline;
pub mod report;
pub mod types;
pub mod validation;

pub use error::{PipelineError, PipelineResult};
