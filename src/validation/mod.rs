//! Schema validation of cleaned tables.
//!
//! [`SchemaValidator`] checks every record against a [`ColumnContract`] and collects *all*
//! violations instead of stopping at the first one. Only the first
//! [`ValidationOptions::preview_limit`] violations are kept for display, but
//! [`ValidationResult::errors_count`] is always the exact total.
//!
//! ```rust
//! use order_cleaner::types::{CleanTable, OrderRecord};
//! use order_cleaner::validation::SchemaValidator;
//!
//! let table = CleanTable::new(vec![OrderRecord {
//!     order_id: Some("ORD-1".into()),
//!     customer_name: Some("Ada".into()),
//!     amount_usd: Some(-5.0),
//!     ..Default::default()
//! }]);
//! let result = SchemaValidator::default().validate(&table);
//! assert!(!result.ok);
//! assert_eq!(result.errors_count, 1);
//! assert_eq!(result.errors[0].check.to_string(), "in_range(0, 100000)");
//! ```

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Serialize, Serializer};

use crate::types::{CleanTable, OrderColumn, OrderRecord, OrderStatus};

/// Email shape: `<non-empty>@<non-empty>.<non-empty>`.
pub const EMAIL_PATTERN: &str = r".+@.+\..+";

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!("^{EMAIL_PATTERN}")).expect("valid email regex"));

static NOT_NULLABLE: CheckKind = CheckKind::NotNullable;

/// A single column check.
#[derive(Debug, Clone, PartialEq)]
pub enum CheckKind {
    /// Value must not be null.
    NotNullable,
    /// String length (in characters) must be within `[min, max]`.
    StrLength { min: usize, max: usize },
    /// Number must be within `[min, max]`.
    InRange { min: f64, max: f64 },
    /// String must have the [`EMAIL_PATTERN`] shape.
    EmailShape,
    /// String must be one of the listed values.
    IsIn(Vec<&'static str>),
}

impl CheckKind {
    /// Whether a non-null record value passes this check. Nullability is handled separately.
    fn passes(&self, record: &OrderRecord, column: OrderColumn) -> bool {
        match self {
            CheckKind::NotNullable => !record.is_null(column),
            CheckKind::StrLength { min, max } => record
                .text(column)
                .is_none_or(|s| (*min..=*max).contains(&s.chars().count())),
            CheckKind::InRange { min, max } => match column {
                OrderColumn::AmountUsd => record
                    .amount_usd
                    .is_none_or(|v| (*min..=*max).contains(&v)),
                _ => true,
            },
            CheckKind::EmailShape => record.text(column).is_none_or(|s| EMAIL_RE.is_match(s)),
            CheckKind::IsIn(allowed) => record
                .text(column)
                .is_none_or(|s| allowed.iter().any(|a| *a == s)),
        }
    }
}

impl fmt::Display for CheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckKind::NotNullable => f.write_str("not_nullable"),
            CheckKind::StrLength { min, max } => write!(f, "str_length({min}, {max})"),
            CheckKind::InRange { min, max } => write!(f, "in_range({min}, {max})"),
            CheckKind::EmailShape => write!(f, "str_matches('{EMAIL_PATTERN}')"),
            CheckKind::IsIn(allowed) => {
                let quoted: Vec<String> = allowed.iter().map(|v| format!("'{v}'")).collect();
                write!(f, "isin([{}])", quoted.join(", "))
            }
        }
    }
}

impl Serialize for CheckKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Contract for one logical column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnRule {
    pub column: OrderColumn,
    pub nullable: bool,
    pub checks: Vec<CheckKind>,
}

impl ColumnRule {
    fn new(column: OrderColumn, nullable: bool, checks: Vec<CheckKind>) -> Self {
        Self {
            column,
            nullable,
            checks,
        }
    }

    /// All checks in evaluation order, nullability first.
    fn all_checks(&self) -> impl Iterator<Item = &CheckKind> {
        let not_null = (!self.nullable).then_some(&NOT_NULLABLE);
        not_null.into_iter().chain(self.checks.iter())
    }
}

/// The fixed column contract of a cleaned order table.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnContract {
    pub rules: Vec<ColumnRule>,
}

impl ColumnContract {
    /// Contract for [`OrderColumn::ALL`].
    pub fn orders() -> Self {
        use OrderColumn as C;
        Self {
            rules: vec![
                ColumnRule::new(C::OrderId, false, vec![CheckKind::StrLength { min: 1, max: 64 }]),
                ColumnRule::new(
                    C::CustomerName,
                    false,
                    vec![CheckKind::StrLength { min: 1, max: 120 }],
                ),
                ColumnRule::new(C::Email, true, vec![CheckKind::EmailShape]),
                ColumnRule::new(
                    C::AmountUsd,
                    false,
                    vec![CheckKind::InRange {
                        min: 0.0,
                        max: 100_000.0,
                    }],
                ),
                ColumnRule::new(C::CreatedAt, true, vec![]),
                ColumnRule::new(
                    C::Status,
                    true,
                    vec![CheckKind::IsIn(
                        OrderStatus::ALL.iter().map(|s| s.as_str()).collect(),
                    )],
                ),
                ColumnRule::new(C::Country, true, vec![]),
            ],
        }
    }
}

impl Default for ColumnContract {
    fn default() -> Self {
        Self::orders()
    }
}

/// One failed `(row, column, check)` triple.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Violation {
    pub column: OrderColumn,
    pub check: CheckKind,
    /// 0-based row index in the validated table.
    pub row: usize,
    /// Offending value, `None` when the failure is a null.
    pub failure_case: Option<String>,
}

/// Outcome of validating one table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationResult {
    /// `true` only when there are zero violations.
    pub ok: bool,
    /// Exact total number of violations.
    pub errors_count: usize,
    /// The first violations, capped at the preview limit.
    pub errors: Vec<Violation>,
}

impl ValidationResult {
    /// Number of violations retained in [`Self::errors`].
    pub fn errors_preview_count(&self) -> usize {
        self.errors.len()
    }

    /// Whether the preview omits some violations.
    pub fn is_truncated(&self) -> bool {
        self.errors_count > self.errors.len()
    }
}

/// Options controlling validation output.
#[derive(Debug, Clone)]
pub struct ValidationOptions {
    /// Maximum number of violations kept in [`ValidationResult::errors`].
    pub preview_limit: usize,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self { preview_limit: 50 }
    }
}

/// Validates cleaned tables against a [`ColumnContract`].
#[derive(Debug, Clone, Default)]
pub struct SchemaValidator {
    contract: ColumnContract,
    opts: ValidationOptions,
}

impl SchemaValidator {
    /// Create a validator for a contract.
    pub fn new(contract: ColumnContract, opts: ValidationOptions) -> Self {
        Self { contract, opts }
    }

    /// Check every record against every rule. Never mutates the table.
    ///
    /// Violations are ordered by column (contract order), then check, then row.
    pub fn validate(&self, table: &CleanTable) -> ValidationResult {
        let mut errors = Vec::new();
        let mut errors_count = 0usize;

        for rule in &self.contract.rules {
            for check in rule.all_checks() {
                for (row, record) in table.records.iter().enumerate() {
                    if check.passes(record, rule.column) {
                        continue;
                    }
                    errors_count += 1;
                    if errors.len() < self.opts.preview_limit {
                        errors.push(Violation {
                            column: rule.column,
                            check: check.clone(),
                            row,
                            failure_case: record.display_value(rule.column),
                        });
                    }
                }
            }
        }

        ValidationResult {
            ok: errors_count == 0,
            errors_count,
            errors,
        }
    }
}
