use chrono::NaiveDate;

use larder_core::ContextId;
use larder_store::EntryRepo;

use crate::error::EngineError;
use crate::reply;

/// Delete intent: remove by date, or by date and exact item when a
/// filter was given. The reply always carries the removed count, so
/// "nothing matched" is visible to the user.
pub(crate) fn run(
    repo: &EntryRepo,
    context: &ContextId,
    date: NaiveDate,
    item: Option<&str>,
) -> Result<String, EngineError> {
    let removed = match item {
        Some(item) => repo.delete_by_date_and_item(context, date, item)?,
        None => repo.delete_by_date(context, date)?,
    };
    Ok(reply::deleted(date, item, removed))
}
