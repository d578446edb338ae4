//! Core data model types.
//!
//! Input arrives as a [`RawTable`]: free-form headers and loosely typed [`RawValue`] cells, exactly
//! as the I/O layer found them. Cleaning produces a [`CleanTable`] of [`OrderRecord`]s whose shape
//! is fixed by [`OrderColumn`], regardless of which columns the input carried.

use std::fmt;

use chrono::NaiveDateTime;
use serde::Serialize;

/// The fixed, ordered set of logical columns of a cleaned order table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderColumn {
    OrderId,
    CustomerName,
    Email,
    AmountUsd,
    CreatedAt,
    Status,
    Country,
}

impl OrderColumn {
    /// All logical columns in output order.
    pub const ALL: [OrderColumn; 7] = [
        OrderColumn::OrderId,
        OrderColumn::CustomerName,
        OrderColumn::Email,
        OrderColumn::AmountUsd,
        OrderColumn::CreatedAt,
        OrderColumn::Status,
        OrderColumn::Country,
    ];

    /// Columns that go through string trimming.
    pub const TEXT: [OrderColumn; 5] = [
        OrderColumn::OrderId,
        OrderColumn::CustomerName,
        OrderColumn::Email,
        OrderColumn::Status,
        OrderColumn::Country,
    ];

    /// Canonical column name.
    pub fn name(self) -> &'static str {
        match self {
            OrderColumn::OrderId => "order_id",
            OrderColumn::CustomerName => "customer_name",
            OrderColumn::Email => "email",
            OrderColumn::AmountUsd => "amount_usd",
            OrderColumn::CreatedAt => "created_at",
            OrderColumn::Status => "status",
            OrderColumn::Country => "country",
        }
    }

    /// Look up a logical column by its canonical (already normalized) name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }

    /// Position of this column in [`OrderColumn::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// Canonical names of all columns, in output order.
    pub fn names() -> Vec<String> {
        Self::ALL.iter().map(|c| c.name().to_string()).collect()
    }
}

impl fmt::Display for OrderColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Canonical order status vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Paid,
    Pending,
    Cancelled,
    Refunded,
}

impl OrderStatus {
    /// All canonical statuses.
    pub const ALL: [OrderStatus; 4] = [
        OrderStatus::Paid,
        OrderStatus::Pending,
        OrderStatus::Cancelled,
        OrderStatus::Refunded,
    ];

    /// Canonical lower-case spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Paid => "paid",
            OrderStatus::Pending => "pending",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::Refunded => "refunded",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single untyped-or-loosely-typed input cell.
///
/// CSV input only ever yields [`RawValue::Null`] and [`RawValue::Text`]; workbooks may carry
/// native numbers, booleans and date-times.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    /// Missing/empty cell.
    Null,
    /// Text exactly as read (not trimmed).
    Text(String),
    /// Integer cell.
    Int(i64),
    /// Floating point cell.
    Float(f64),
    /// Boolean cell.
    Bool(bool),
    /// Native date-time cell.
    Timestamp(NaiveDateTime),
}

impl RawValue {
    /// Returns `true` for [`RawValue::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, RawValue::Null)
    }

    /// Stringify a non-null cell; integral floats render without a fractional part.
    pub fn to_text(&self) -> Option<String> {
        match self {
            RawValue::Null => None,
            RawValue::Text(s) => Some(s.clone()),
            RawValue::Int(i) => Some(i.to_string()),
            RawValue::Float(f) => {
                if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
                    Some((*f as i64).to_string())
                } else {
                    Some(f.to_string())
                }
            }
            RawValue::Bool(b) => Some(b.to_string()),
            RawValue::Timestamp(ts) => Some(format_timestamp(ts)),
        }
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::Text(s.to_string())
    }
}

impl From<Option<&str>> for RawValue {
    fn from(s: Option<&str>) -> Self {
        s.map_or(RawValue::Null, RawValue::from)
    }
}

/// Input table: raw header text plus row-major cells in header order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawTable {
    /// Header cells as read from the source.
    pub headers: Vec<String>,
    /// Row-major cell storage. Rows shorter than `headers` are treated as null-padded.
    pub rows: Vec<Vec<RawValue>>,
}

impl RawTable {
    /// Create a raw table from headers and rows.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<RawValue>>) -> Self {
        Self { headers, rows }
    }

    /// Number of data rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of header columns.
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }
}

/// One cleaned order. `None` is the explicit null of every logical column.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct OrderRecord {
    pub order_id: Option<String>,
    pub customer_name: Option<String>,
    pub email: Option<String>,
    pub amount_usd: Option<f64>,
    pub created_at: Option<NaiveDateTime>,
    pub status: Option<OrderStatus>,
    pub country: Option<String>,
}

impl OrderRecord {
    /// Text value of a string-typed column; `None` for non-text columns.
    pub fn text(&self, column: OrderColumn) -> Option<&str> {
        match column {
            OrderColumn::OrderId => self.order_id.as_deref(),
            OrderColumn::CustomerName => self.customer_name.as_deref(),
            OrderColumn::Email => self.email.as_deref(),
            OrderColumn::Status => self.status.map(OrderStatus::as_str),
            OrderColumn::Country => self.country.as_deref(),
            OrderColumn::AmountUsd | OrderColumn::CreatedAt => None,
        }
    }

    /// Whether the given column holds null.
    pub fn is_null(&self, column: OrderColumn) -> bool {
        match column {
            OrderColumn::AmountUsd => self.amount_usd.is_none(),
            OrderColumn::CreatedAt => self.created_at.is_none(),
            other => self.text(other).is_none(),
        }
    }

    /// Cell value rendered for reports; `None` when null.
    pub fn display_value(&self, column: OrderColumn) -> Option<String> {
        match column {
            OrderColumn::AmountUsd => self.amount_usd.map(|v| v.to_string()),
            OrderColumn::CreatedAt => self.created_at.as_ref().map(format_timestamp),
            other => self.text(other).map(str::to_string),
        }
    }

    /// Back-convert into raw cells in [`OrderColumn::ALL`] order.
    pub fn to_raw_row(&self) -> Vec<RawValue> {
        let text = |v: &Option<String>| v.as_deref().map_or(RawValue::Null, RawValue::from);
        vec![
            text(&self.order_id),
            text(&self.customer_name),
            text(&self.email),
            self.amount_usd.map_or(RawValue::Null, RawValue::Float),
            self.created_at.map_or(RawValue::Null, RawValue::Timestamp),
            self.status.map_or(RawValue::Null, |s| RawValue::from(s.as_str())),
            text(&self.country),
        ]
    }
}

/// Cleaned table with the fixed [`OrderColumn::ALL`] column set.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CleanTable {
    /// Records in output order.
    pub records: Vec<OrderRecord>,
}

impl CleanTable {
    /// Create a table from records.
    pub fn new(records: Vec<OrderRecord>) -> Self {
        Self { records }
    }

    /// Number of records.
    pub fn row_count(&self) -> usize {
        self.records.len()
    }

    /// Output column names, always the full logical set in fixed order.
    pub fn column_names(&self) -> Vec<String> {
        OrderColumn::names()
    }

    /// View this table as raw input, e.g. to feed it back through cleaning.
    pub fn to_raw(&self) -> RawTable {
        RawTable::new(
            self.column_names(),
            self.records.iter().map(OrderRecord::to_raw_row).collect(),
        )
    }
}

/// Render a timestamp as `YYYY-MM-DD HH:MM:SS`, with fractional seconds only when present.
pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format("%Y-%m-%d %H:%M:%S%.f").to_string()
}
