//! Pure Beds24 v2 REST API client.
//!
//! A minimal client for the parts of the Beds24 API the review exporter
//! uses: the property listing and the Booking.com review feed.
//!
//! # Example
//!
//! ```rust,ignore
//! use beds24_client::{Beds24Client, ClientConfig};
//!
//! let config = ClientConfig::new(std::env::var("BEDS24_API_TOKEN")?);
//! let client = Beds24Client::new(&config)?;
//!
//! let page = client.list_properties(1).await?;
//! for property in &page.data {
//!     println!("{}", property.id);
//! }
//! ```

pub mod error;
pub mod types;

pub use error::{Beds24Error, Result};
pub use types::{ApiResponse, BookingReview, Page, Property, RateLimitInfo};

use chrono::NaiveDate;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use std::fmt;
use tracing::{debug, warn};

pub const DEFAULT_BASE_URL: &str = "https://api.beds24.com/v2";

/// Header Beds24 reads the long-lived access token from.
const TOKEN_HEADER: &str = "token";

/// Everything needed to talk to Beds24. Built once by the caller and
/// handed to [`Beds24Client::new`].
#[derive(Clone)]
pub struct ClientConfig {
    pub token: String,
    pub base_url: String,
}

impl ClientConfig {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Set a custom base URL (proxies, test servers).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("token", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[derive(Clone)]
pub struct Beds24Client {
    http_client: reqwest::Client,
    base_url: String,
}

impl Beds24Client {
    /// Build a client that sends the configured token on every request.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let mut token = HeaderValue::from_str(&config.token)
            .map_err(|e| Beds24Error::Config(format!("invalid token: {}", e)))?;
        token.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(TOKEN_HEADER, token);

        let http_client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http_client,
            base_url: config.base_url.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET /properties?page=N`. Beds24 numbers pages from 1.
    pub async fn list_properties(&self, page: u32) -> Result<Page<Property>> {
        self.get("properties", &[("page", page.to_string())]).await
    }

    /// `GET /channels/booking/reviews` for one property, limited to reviews
    /// created on or after `from`.
    pub async fn booking_reviews(
        &self,
        property_id: i64,
        from: NaiveDate,
    ) -> Result<Page<BookingReview>> {
        self.get(
            "channels/booking/reviews",
            &[
                ("propertyId", property_id.to_string()),
                ("from", from.format("%Y-%m-%d").to_string()),
            ],
        )
        .await
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Page<T>> {
        let url = format!("{}/{}", self.base_url, path);
        let start = std::time::Instant::now();

        let resp = self
            .http_client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, path, "Beds24 request failed");
                Beds24Error::Network(e)
            })?;

        let status = resp.status();
        let rate_limit = RateLimitInfo::from_headers(resp.headers());

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!(status = %status, error = %body, path, "Beds24 API error");
            return Err(Beds24Error::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = resp.text().await?;
        let envelope: ApiResponse<T> =
            serde_json::from_str(&body).map_err(|e| Beds24Error::Parse(e.to_string()))?;

        if envelope.success == Some(false) {
            return Err(Beds24Error::Api {
                status: status.as_u16(),
                message: envelope
                    .error
                    .unwrap_or_else(|| "request was not successful".to_string()),
            });
        }

        debug!(
            path,
            count = envelope.data.len(),
            duration_ms = start.elapsed().as_millis(),
            "Beds24 request"
        );

        Ok(Page {
            data: envelope.data,
            rate_limit,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = ClientConfig::new("tok").with_base_url("http://localhost:1234/v2/");

        assert_eq!(config.token, "tok");
        assert_eq!(config.base_url, "http://localhost:1234/v2");
    }

    #[test]
    fn test_config_debug_hides_token() {
        let config = ClientConfig::new("very-secret");
        let rendered = format!("{:?}", config);

        assert!(!rendered.contains("very-secret"));
        assert!(rendered.contains(DEFAULT_BASE_URL));
    }

    #[test]
    fn test_rejects_token_with_newline() {
        let config = ClientConfig::new("bad\ntoken");
        assert!(matches!(
            Beds24Client::new(&config),
            Err(Beds24Error::Config(_))
        ));
    }
}
