//! Record filtering.

use crate::types::{OrderColumn, OrderRecord};

/// Columns every surviving record must carry.
pub const REQUIRED_COLUMNS: [OrderColumn; 3] = [
    OrderColumn::OrderId,
    OrderColumn::CustomerName,
    OrderColumn::AmountUsd,
];

/// Returns `true` when none of [`REQUIRED_COLUMNS`] is null.
pub fn is_complete(record: &OrderRecord) -> bool {
    REQUIRED_COLUMNS.iter().all(|c| !record.is_null(*c))
}

/// Keep only records for which `predicate` returns `true`, preserving order.
///
/// Returns `(kept, dropped_count)`.
pub fn filter<F>(records: Vec<OrderRecord>, mut predicate: F) -> (Vec<OrderRecord>, usize)
where
    F: FnMut(&OrderRecord) -> bool,
{
    let before = records.len();
    let kept: Vec<OrderRecord> = records.into_iter().filter(|r| predicate(r)).collect();
    let dropped = before - kept.len();
    (kept, dropped)
}

/// Drop records still missing a required field.
pub fn drop_incomplete(records: Vec<OrderRecord>) -> (Vec<OrderRecord>, usize) {
    filter(records, is_complete)
}

#[cfg(test)]
mod tests {
    use super::{drop_incomplete, filter};
    use crate::types::OrderRecord;

    fn complete(id: &str) -> OrderRecord {
        OrderRecord {
            order_id: Some(id.to_string()),
            customer_name: Some("Ada".to_string()),
            amount_usd: Some(10.0),
            ..Default::default()
        }
    }

    #[test]
    fn drops_records_missing_any_required_field() {
        let mut no_id = complete("x");
        no_id.order_id = None;
        let mut no_name = complete("y");
        no_name.customer_name = None;
        let mut no_amount = complete("z");
        no_amount.amount_usd = None;

        let (out, dropped) = drop_incomplete(vec![
            complete("a"),
            no_id,
            no_name,
            complete("b"),
            no_amount,
        ]);

        assert_eq!(dropped, 3);
        let ids: Vec<_> = out.iter().map(|r| r.order_id.as_deref().unwrap()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn optional_fields_may_be_null() {
        let (out, dropped) = drop_incomplete(vec![complete("a")]);
        assert_eq!(dropped, 0);
        assert_eq!(out.len(), 1);
        assert!(out[0].email.is_none());
        assert!(out[0].created_at.is_none());
    }

    #[test]
    fn filter_can_return_empty() {
        let (out, dropped) = filter(vec![complete("a"), complete("b")], |_| false);
        assert!(out.is_empty());
        assert_eq!(dropped, 2);
    }
}
