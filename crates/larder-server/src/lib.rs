pub mod delivery;
pub mod server;
pub mod webhook;

pub use delivery::{DeliveryError, LineDelivery, RecordingDelivery, ReplyDelivery};
pub use server::{build_router, start, AppState, ServerConfig, ServerHandle};
