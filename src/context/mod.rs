//! Shared runtime state exposed to the HTTP server.

mod status;

pub use status::{AppStatus, Status};
