//! HTTP 传输层

pub mod dto;
pub mod extract;
pub mod handlers;
pub mod router;
pub mod state;

pub use router::build_router;
pub use state::AppState;
