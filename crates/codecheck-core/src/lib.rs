// Search orchestration: throttling, state, and user-facing error events
pub mod config;
pub mod coordinator;
pub mod error;
pub mod message;
pub mod providers;
pub mod search;

pub use codecheck_api::{ApiError, Clock, RepositorySummary, SystemClock};
pub use config::Config;
pub use coordinator::{CoordinatorEvents, NavigationRequests, SearchCoordinator};
pub use error::Error;
pub use message::{MessageReason, UserMessage};
pub use search::SearchProvider;

/// Result type alias for the non-search parts of the core
pub type Result<T> = std::result::Result<T, Error>;
