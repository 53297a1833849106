//! Shared utility functions for the collabhub service.

use axum::http::HeaderMap;

/// Header the upstream gateway uses to forward the authenticated user id.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Extract the acting user id forwarded by the upstream gateway.
///
/// Returns None if the header is missing, not valid UTF-8, or empty.
pub fn extract_user_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get(USER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(String::from)
}

/// Lenient date parsing for request bodies.
///
/// Accepts unix seconds, RFC 3339 timestamps, or plain `YYYY-MM-DD` dates
/// (midnight UTC).
pub mod timestamp {
    use chrono::{DateTime, NaiveDate};
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawTimestamp {
        Seconds(i64),
        Text(String),
    }

    pub fn parse(value: &str) -> Option<i64> {
        let value = value.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
            return Some(dt.timestamp());
        }
        NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc().timestamp())
    }

    pub fn deserialize_opt<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<RawTimestamp>::deserialize(deserializer)? {
            None => Ok(None),
            Some(RawTimestamp::Seconds(secs)) => Ok(Some(secs)),
            Some(RawTimestamp::Text(text)) => parse(&text)
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid date: {}", text))),
        }
    }
}
