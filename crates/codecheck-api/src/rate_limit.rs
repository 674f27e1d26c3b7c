// Rate-limit backoff computed from 403 response headers
use chrono::{DateTime, Utc};
use reqwest::header::HeaderMap;

/// Used when the response gives us nothing to go on
pub const DEFAULT_WAIT_MS: i64 = 60_000;

/// Never report a reset that is in the past or immediate
pub const MIN_WAIT_MS: i64 = 1_000;

pub const RETRY_AFTER: &str = "retry-after";
pub const RATE_LIMIT_REMAINING: &str = "x-ratelimit-remaining";
pub const RATE_LIMIT_RESET: &str = "x-ratelimit-reset";

/// Absolute epoch-millisecond time at which searching may resume.
///
/// Precedence: `Retry-After` seconds, then an exhausted
/// `X-RateLimit-Remaining` paired with `X-RateLimit-Reset` epoch seconds,
/// then a flat minute.
pub fn reset_at_ms(headers: &HeaderMap, now: DateTime<Utc>) -> i64 {
    let wait_ms = wait_ms(headers, now).max(MIN_WAIT_MS);
    now.timestamp_millis().saturating_add(wait_ms)
}

fn wait_ms(headers: &HeaderMap, now: DateTime<Utc>) -> i64 {
    if let Some(retry_after) = header_i64(headers, RETRY_AFTER) {
        return retry_after.saturating_mul(1000);
    }

    let remaining = header_i64(headers, RATE_LIMIT_REMAINING);
    let reset = header_i64(headers, RATE_LIMIT_RESET);
    match (remaining, reset) {
        (Some(0), Some(reset_secs)) => reset_secs
            .saturating_sub(now.timestamp())
            .saturating_mul(1000),
        _ => DEFAULT_WAIT_MS,
    }
}

fn header_i64(headers: &HeaderMap, name: &str) -> Option<i64> {
    headers.get(name)?.to_str().ok()?.trim().parse().ok()
}
