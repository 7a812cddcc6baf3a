//! Sources for the monitored player-count metric.

mod http;
mod ip_info;
mod traits;

pub use http::HttpPlayerCountSource;
pub use ip_info::{EgressIdentity, log_egress_identity};
#[cfg(test)]
pub use traits::MockPlayerCountSource;
pub use traits::{FetchError, PlayerCountSource};
