// GitHub search API client, error taxonomy and time sources
pub mod clock;
pub mod error;
pub mod github;
pub mod rate_limit;
pub mod types;

// Re-export common types
pub use clock::{Clock, SystemClock, TokioClock};
pub use error::{ApiError, Result};
pub use github::GitHubSearchClient;
pub use types::RepositorySummary;
