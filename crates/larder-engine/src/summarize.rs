use std::collections::BTreeMap;

use chrono::NaiveDate;

use larder_core::ContextId;
use larder_store::EntryRepo;

use crate::error::EngineError;
use crate::reply;

/// Summarize intent: group the range's entries by `(item, unit)` and
/// sum quantities per group. Unit is part of the key — mixed units for
/// one item stay separate lines, never converted.
pub(crate) fn run(
    repo: &EntryRepo,
    context: &ContextId,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<String, EngineError> {
    let entries = repo.query_range(context, start, end)?;
    if entries.is_empty() {
        return Ok(reply::no_data_in_range(start, end));
    }

    let mut totals: BTreeMap<(String, String), f64> = BTreeMap::new();
    for entry in entries {
        *totals.entry((entry.item, entry.unit)).or_insert(0.0) += entry.quantity;
    }
    Ok(reply::summary(start, end, &totals))
}
