use chrono::{DateTime, Utc};
use reqwest::header::HeaderMap;
use thiserror::Error;

use crate::rate_limit;

/// Every way a repository search can fail
///
/// The first six variants are the classified HTTP failures. Everything
/// else is a generic failure that the UI reports without details.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Bad request ({status})")]
    BadRequest { status: u16 },

    #[error("Unauthorized ({status})")]
    Unauthorized { status: u16 },

    #[error("Not found ({status})")]
    NotFound { status: u16 },

    #[error("Rate limited ({status}), resets at {reset_at_ms} ms")]
    RateLimited { status: u16, reset_at_ms: i64 },

    #[error("Client error {status}: {description}")]
    ClientError { status: u16, description: String },

    #[error("Server error {status}: {description}")]
    ServerError { status: u16, description: String },

    #[error("Unexpected status {status}: {description}")]
    UnexpectedStatus { status: u16, description: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    Parse(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ApiError>;

impl ApiError {
    /// Map a non-200 response onto the taxonomy.
    ///
    /// `headers` only matter for 403, where they drive the reset time.
    pub fn classify(
        status: u16,
        description: &str,
        headers: &HeaderMap,
        now: DateTime<Utc>,
    ) -> Self {
        match status {
            400 => ApiError::BadRequest { status },
            401 => ApiError::Unauthorized { status },
            403 => ApiError::RateLimited {
                status,
                reset_at_ms: rate_limit::reset_at_ms(headers, now),
            },
            404 => ApiError::NotFound { status },
            402 | 405..=499 => ApiError::ClientError {
                status,
                description: description.to_string(),
            },
            500..=599 => ApiError::ServerError {
                status,
                description: description.to_string(),
            },
            _ => ApiError::UnexpectedStatus {
                status,
                description: description.to_string(),
            },
        }
    }

    /// HTTP status carried by the error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::BadRequest { status }
            | ApiError::Unauthorized { status }
            | ApiError::NotFound { status }
            | ApiError::RateLimited { status, .. }
            | ApiError::ClientError { status, .. }
            | ApiError::ServerError { status, .. }
            | ApiError::UnexpectedStatus { status, .. } => Some(*status),
            ApiError::Network(err) => err.status().map(|s| s.as_u16()),
            ApiError::Parse(_) => None,
        }
    }

    /// True for failures outside the classified HTTP set
    pub fn is_generic(&self) -> bool {
        matches!(
            self,
            ApiError::UnexpectedStatus { .. } | ApiError::Network(_) | ApiError::Parse(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(status: u16) -> ApiError {
        ApiError::classify(status, "reason", &HeaderMap::new(), Utc::now())
    }

    #[test]
    fn test_classification_covers_every_bucket() {
        assert!(matches!(classify(400), ApiError::BadRequest { status: 400 }));
        assert!(matches!(classify(401), ApiError::Unauthorized { status: 401 }));
        assert!(matches!(classify(403), ApiError::RateLimited { status: 403, .. }));
        assert!(matches!(classify(404), ApiError::NotFound { status: 404 }));
        assert!(matches!(classify(418), ApiError::ClientError { status: 418, .. }));
        assert!(matches!(classify(402), ApiError::ClientError { status: 402, .. }));
        assert!(matches!(classify(500), ApiError::ServerError { status: 500, .. }));
        assert!(matches!(classify(599), ApiError::ServerError { status: 599, .. }));
        assert!(matches!(
            classify(600),
            ApiError::UnexpectedStatus { status: 600, .. }
        ));
        assert!(matches!(
            classify(302),
            ApiError::UnexpectedStatus { status: 302, .. }
        ));
    }

    #[test]
    fn test_descriptions_are_kept() {
        match ApiError::classify(422, "Unprocessable Entity", &HeaderMap::new(), Utc::now()) {
            ApiError::ClientError { description, .. } => {
                assert_eq!(description, "Unprocessable Entity")
            }
            other => panic!("unexpected classification: {:?}", other),
        }
    }

    #[test]
    fn test_rate_limit_reset_is_in_the_future() {
        let now = Utc::now();
        match ApiError::classify(403, "Forbidden", &HeaderMap::new(), now) {
            ApiError::RateLimited { reset_at_ms, .. } => {
                assert!(reset_at_ms >= now.timestamp_millis() + 1000)
            }
            other => panic!("unexpected classification: {:?}", other),
        }
    }

    #[test]
    fn test_generic_family() {
        assert!(classify(600).is_generic());
        assert!(!classify(500).is_generic());
        assert!(!classify(403).is_generic());

        let parse = serde_json::from_str::<serde_json::Value>("nope").unwrap_err();
        assert!(ApiError::from(parse).is_generic());
    }

    #[test]
    fn test_status_accessor() {
        assert_eq!(classify(418).status(), Some(418));
        assert_eq!(classify(600).status(), Some(600));
    }
}
