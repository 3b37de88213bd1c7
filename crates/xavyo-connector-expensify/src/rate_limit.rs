//! Rate-limit descriptor extraction from Expensify responses.
//!
//! The connector never sleeps or retries on its own; it reports what the
//! server said so the sync scheduler can throttle the next call.

use chrono::{DateTime, Duration, Utc};
use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::StatusCode;
use xavyo_connector::annotations::{RateLimitDescription, RateLimitStatus};

const LIMIT_HEADERS: &[&str] = &["x-ratelimit-limit", "ratelimit-limit"];
const REMAINING_HEADERS: &[&str] = &["x-ratelimit-remaining", "ratelimit-remaining"];
const RESET_HEADERS: &[&str] = &["x-ratelimit-reset", "ratelimit-reset"];

/// Reset values above this are Unix timestamps rather than delta seconds.
const EPOCH_THRESHOLD: u64 = 1_000_000_000;

/// Outcome of reading one header.
enum HeaderValue {
    Missing,
    Invalid,
    Value(u64),
}

fn read_u64(headers: &HeaderMap, names: &[&str]) -> HeaderValue {
    let Some(raw) = names.iter().find_map(|name| headers.get(*name)) else {
        return HeaderValue::Missing;
    };

    match raw.to_str().ok().and_then(|v| v.trim().parse::<u64>().ok()) {
        Some(value) => HeaderValue::Value(value),
        None => HeaderValue::Invalid,
    }
}

/// Parse a `Retry-After` value.
///
/// Supports both delay-seconds format (e.g., "120") and
/// HTTP-date format (e.g., "Wed, 21 Oct 2015 07:28:00 GMT").
/// Delays too large to represent yield `None`.
#[must_use]
pub fn parse_retry_after(value: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(seconds) = value.parse::<i64>() {
        return after(now, seconds.max(0));
    }

    DateTime::parse_from_rfc2822(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn after(now: DateTime<Utc>, seconds: i64) -> Option<DateTime<Utc>> {
    now.checked_add_signed(Duration::try_seconds(seconds)?)
}

fn reset_instant(value: u64, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let secs = i64::try_from(value).ok()?;
    if value > EPOCH_THRESHOLD {
        DateTime::from_timestamp(secs, 0)
    } else {
        after(now, secs)
    }
}

/// Build the rate-limit descriptor for a response.
///
/// Always returns a descriptor: `Overlimit` for HTTP 429 or an exhausted
/// window, `Error` when a rate-limit header is present but unreadable,
/// `Ok` otherwise.
#[must_use]
pub fn describe_rate_limit(
    status: StatusCode,
    headers: &HeaderMap,
    now: DateTime<Utc>,
) -> RateLimitDescription {
    let mut description = RateLimitDescription::new(RateLimitStatus::Ok);
    let mut malformed = false;

    match read_u64(headers, LIMIT_HEADERS) {
        HeaderValue::Value(limit) => description.limit = Some(limit),
        HeaderValue::Invalid => malformed = true,
        HeaderValue::Missing => {}
    }

    match read_u64(headers, REMAINING_HEADERS) {
        HeaderValue::Value(remaining) => description.remaining = Some(remaining),
        HeaderValue::Invalid => malformed = true,
        HeaderValue::Missing => {}
    }

    match read_u64(headers, RESET_HEADERS) {
        HeaderValue::Value(reset) => description.reset_at = reset_instant(reset, now),
        HeaderValue::Invalid => malformed = true,
        HeaderValue::Missing => {}
    }

    if description.reset_at.is_none() {
        description.reset_at = headers
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| parse_retry_after(v, now));
    }

    description.status = if status == StatusCode::TOO_MANY_REQUESTS
        || description.remaining == Some(0)
    {
        RateLimitStatus::Overlimit
    } else if malformed {
        RateLimitStatus::Error
    } else {
        RateLimitStatus::Ok
    };

    description
}
