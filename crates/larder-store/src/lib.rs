pub mod database;
pub mod entries;
pub mod error;
pub mod schema;

pub use database::Database;
pub use entries::EntryRepo;
pub use error::StoreError;
