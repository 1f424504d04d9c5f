//! Client for the nad.fun agent API: image and metadata uploads, salt mining
//! and token status lookups.

mod api;

pub use api::{ApiError, LaunchpadApi, NadFunClient};
