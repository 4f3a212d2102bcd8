mod blocking;
mod http;
mod traits;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;

pub use blocking::{BlockingHttpService, DecisionOutcome};
pub use http::HttpService;
pub use traits::{ReviewService, ServiceError};
