// User-facing notifications derived from search failures
use chrono::{DateTime, Utc};
use codecheck_api::ApiError;
use serde::{Deserialize, Serialize};

/// A one-shot notification for the UI.
///
/// Carries only a classification plus formatting parameters. Turning it into
/// a localized sentence is the UI's job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserMessage {
    /// A classified HTTP failure with its status code
    WithCode { status: u16, reason: MessageReason },
    /// Anything we couldn't classify (network, parse, odd status)
    Unknown,
}

/// Which flavour of classified failure happened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageReason {
    BadRequest,
    Unauthorized,
    NotFound,
    RateLimited { wait_seconds: u64 },
    ClientError,
    ServerError,
}

impl UserMessage {
    /// Build the notification for a failed search observed at `now`
    pub fn from_error(err: &ApiError, now: DateTime<Utc>) -> Self {
        let (status, reason) = match err {
            ApiError::BadRequest { status } => (*status, MessageReason::BadRequest),
            ApiError::Unauthorized { status } => (*status, MessageReason::Unauthorized),
            ApiError::NotFound { status } => (*status, MessageReason::NotFound),
            ApiError::RateLimited {
                status,
                reset_at_ms,
            } => (
                *status,
                MessageReason::RateLimited {
                    wait_seconds: wait_seconds(*reset_at_ms, now),
                },
            ),
            ApiError::ClientError { status, .. } => (*status, MessageReason::ClientError),
            ApiError::ServerError { status, .. } => (*status, MessageReason::ServerError),
            ApiError::UnexpectedStatus { .. } | ApiError::Network(_) | ApiError::Parse(_) => {
                return UserMessage::Unknown
            }
        };
        UserMessage::WithCode { status, reason }
    }
}

/// Whole seconds until `reset_at_ms`, rounded up, never below one
pub fn wait_seconds(reset_at_ms: i64, now: DateTime<Utc>) -> u64 {
    let remaining_ms = reset_at_ms.saturating_sub(now.timestamp_millis());
    let seconds = remaining_ms.saturating_add(999).div_euclid(1000);
    seconds.max(1) as u64
}
