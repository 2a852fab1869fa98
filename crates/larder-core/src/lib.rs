pub mod entry;
pub mod ids;
pub mod message;
pub mod scope;

pub use entry::{format_quantity, LedgerEntry, NewEntry};
pub use ids::{ContextId, ExportId};
pub use message::InboundMessage;
pub use scope::LedgerScope;
