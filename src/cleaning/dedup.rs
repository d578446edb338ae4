//! Identifier de-duplication.

use std::collections::HashMap;

use crate::types::OrderRecord;

/// Collapse records sharing an `order_id` into one.
///
/// Records are stably ordered by `created_at` ascending with null timestamps first. For every
/// non-null `order_id`, only the record that sorts last survives: the latest known timestamp,
/// or the last input occurrence among equal timestamps. Null identifiers never match each other.
///
/// The returned records keep that sort order. Returns `(kept, dropped_count)`.
pub fn resolve_duplicates(mut records: Vec<OrderRecord>) -> (Vec<OrderRecord>, usize) {
    // `Option` orders `None` before `Some`, and `sort_by_key` is stable.
    records.sort_by_key(|r| r.created_at);

    let keep: Vec<bool> = {
        let mut last_position: HashMap<&str, usize> = HashMap::new();
        for (pos, record) in records.iter().enumerate() {
            if let Some(id) = record.order_id.as_deref() {
                last_position.insert(id, pos);
            }
        }
        records
            .iter()
            .enumerate()
            .map(|(pos, record)| match record.order_id.as_deref() {
                Some(id) => last_position.get(id) == Some(&pos),
                None => true,
            })
            .collect()
    };

    let before = records.len();
    let kept: Vec<OrderRecord> = records
        .into_iter()
        .zip(keep)
        .filter_map(|(record, keep)| keep.then_some(record))
        .collect();
    let dropped = before - kept.len();
    (kept, dropped)
}
