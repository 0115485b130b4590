use chrono::NaiveDate;
use reqwest::header::HeaderMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Envelope shared by every Beds24 v2 list endpoint. Only the fields the
/// client acts on are decoded.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    pub success: Option<bool>,
    pub error: Option<String>,
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
}

/// A property as returned by `GET /properties`. Only the fields the
/// exporter needs are decoded.
#[derive(Debug, Clone, Deserialize)]
pub struct Property {
    pub id: i64,
    pub name: Option<String>,
}

/// A Booking.com guest review.
///
/// The record is kept opaque: the whole JSON object is carried as-is, so
/// decode followed by encode keeps every field, nulls included. Keys are
/// written back in sorted order. `reviewId` and `createdTimestamp` are
/// read through accessors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookingReview {
    pub fields: Map<String, Value>,
}

impl BookingReview {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Deduplication key. A missing, null or non-string id maps to the
    /// empty string.
    pub fn review_id(&self) -> &str {
        self.fields
            .get("reviewId")
            .and_then(Value::as_str)
            .unwrap_or("")
    }

    pub fn created_timestamp(&self) -> Option<&str> {
        self.fields.get("createdTimestamp").and_then(Value::as_str)
    }

    /// Calendar date from the first ten characters of `createdTimestamp`.
    pub fn created_date(&self) -> Option<NaiveDate> {
        let prefix = self.created_timestamp()?.get(..10)?;
        NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok()
    }
}

/// Beds24 credit accounting, read from response headers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RateLimitInfo {
    /// Credits available per five-minute window.
    pub credit_limit: Option<i64>,
    pub credit_remaining: Option<i64>,
    pub resets_in_secs: Option<i64>,
    /// Credits charged for the request that produced these headers.
    pub request_cost: Option<i64>,
}

impl RateLimitInfo {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let read = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<i64>().ok())
        };

        Self {
            credit_limit: read("x-fivemincreditlimit"),
            credit_remaining: read("x-fivemincreditlimit-remaining"),
            resets_in_secs: read("x-fivemincreditlimit-resetsin"),
            request_cost: read("x-requestcost"),
        }
    }
}

/// One page of results plus the credit headers that came with it.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub rate_limit: RateLimitInfo,
}

impl<T> Page<T> {
    pub fn new(data: Vec<T>) -> Self {
        Self {
            data,
            rate_limit: RateLimitInfo::default(),
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    fn decode(raw: &str) -> BookingReview {
        serde_json::from_str(raw).unwrap()
    }

    #[test]
    fn test_review_keeps_unknown_fields() {
        let raw = r#"{"reviewId":"r1","createdTimestamp":"2023-07-04T10:00:00Z","score":9,"guest":{"name":"A"}}"#;
        let review = decode(raw);

        assert_eq!(review.review_id(), "r1");
        assert_eq!(review.fields.get("score"), Some(&Value::from(9)));

        let back: Value = serde_json::to_value(&review).unwrap();
        let original: Value = serde_json::from_str(raw).unwrap();
        assert_eq!(back, original);
    }

    #[test]
    fn test_null_review_id_survives_reencode() {
        let review = decode(r#"{"reviewId":null,"x":1}"#);

        assert_eq!(review.review_id(), "");
        assert_eq!(
            serde_json::to_string(&review).unwrap(),
            r#"{"reviewId":null,"x":1}"#
        );
    }

    #[test]
    fn test_created_date_uses_prefix() {
        let review = decode(r#"{"reviewId":"r1","createdTimestamp":"2023-07-04T10:00:00Z"}"#);
        assert_eq!(review.created_date(), NaiveDate::from_ymd_opt(2023, 7, 4));

        let short = decode(r#"{"reviewId":"r1","createdTimestamp":"2023"}"#);
        assert_eq!(short.created_date(), None);

        let missing = decode(r#"{"reviewId":"r1"}"#);
        assert_eq!(missing.created_date(), None);
    }

    #[test]
    fn test_missing_review_id_is_empty_key() {
        let review = decode(r#"{"score":3}"#);
        assert_eq!(review.review_id(), "");
        assert_eq!(serde_json::to_string(&review).unwrap(), r#"{"score":3}"#);
    }

    #[test]
    fn test_non_object_is_rejected() {
        assert!(serde_json::from_str::<BookingReview>("[1,2]").is_err());
    }

    #[test]
    fn test_rate_limit_headers() {
        let mut headers = HeaderMap::new();
        headers.insert("x-fivemincreditlimit", HeaderValue::from_static("100"));
        headers.insert(
            "x-fivemincreditlimit-remaining",
            HeaderValue::from_static("97"),
        );
        headers.insert("x-requestcost", HeaderValue::from_static("garbage"));

        let info = RateLimitInfo::from_headers(&headers);
        assert_eq!(info.credit_limit, Some(100));
        assert_eq!(info.credit_remaining, Some(97));
        assert_eq!(info.resets_in_secs, None);
        assert_eq!(info.request_cost, None);
    }
}
