mod error;
mod handlers;
mod helpers;
mod router;
mod types;

pub use handlers::core::open_store_into as open_default_store;
pub use router::handle_request;
pub use types::{AppState, Request};
