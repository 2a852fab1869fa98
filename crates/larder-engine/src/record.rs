use chrono::NaiveDate;

use larder_core::{ContextId, NewEntry};
use larder_parse::parse_record_line;
use larder_store::EntryRepo;

use crate::error::EngineError;
use crate::reply;

/// Record intent: partition the lines into accepted triples and skipped
/// originals, insert the accepted batch dated `date`, and report both.
/// Zero accepted lines means format help and no store mutation.
pub(crate) fn run(
    repo: &EntryRepo,
    context: &ContextId,
    date: NaiveDate,
    lines: &[String],
) -> Result<String, EngineError> {
    let mut accepted = Vec::new();
    let mut skipped = Vec::new();
    for line in lines {
        if line.trim().is_empty() {
            continue;
        }
        match parse_record_line(line) {
            Some(record) => accepted.push(record),
            None => skipped.push(line.clone()),
        }
    }

    if accepted.is_empty() {
        return Ok(reply::record_format_help().to_string());
    }

    let entries: Vec<NewEntry> = accepted
        .into_iter()
        .map(|record| NewEntry {
            context_id: context.clone(),
            item: record.item,
            quantity: record.quantity,
            unit: record.unit,
            date,
        })
        .collect();
    let stored = repo.insert_batch(&entries)?;
    Ok(reply::recorded(date, &stored, &skipped))
}
