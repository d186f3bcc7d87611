//! Manual-override merge: reviewed corrections applied on top of parsed
//! rows, keyed by delivery and batch number.

use crate::record::FieldMap;

/// Columns that identify a row for override matching.
pub const MERGE_KEYS: [&str; 2] = ["Delivery Number", "Batch Number"];

fn same_key(row: &FieldMap, other: &FieldMap) -> bool {
    MERGE_KEYS.iter().all(|k| row.get(k) == other.get(k))
}

/// Apply override rows onto parsed rows in place. A non-empty override
/// cell replaces the parsed cell; empty cells preserve the parsed value.
/// Rows with no matching override pass through untouched.
pub fn apply_overrides(rows: &mut [FieldMap], overrides: &[FieldMap]) {
    for row in rows.iter_mut() {
        let Some(ovr) = overrides.iter().find(|o| same_key(row, o)) else {
            continue;
        };
        let updates: Vec<(String, String)> = ovr
            .names()
            .filter(|n| !MERGE_KEYS.contains(n))
            .map(|n| (n.to_string(), ovr.get(n).to_string()))
            .filter(|(_, v)| !v.trim().is_empty())
            .collect();
        for (name, value) in updates {
            row.set(&name, value);
        }
    }
}
