//! Review fetcher.
//!
//! Walks the Booking.com review feed property by property. Beds24 has no
//! page parameter on this endpoint, so paging is driven by the `from`
//! cursor: after each page the cursor moves to the creation date of the
//! last review seen and the next request starts there. Because the cursor
//! is a date, consecutive pages overlap on the boundary day. Those
//! duplicates are left for [`crate::dedupe`] to remove.

use std::path::Path;
use std::time::Duration;

use beds24_client::BookingReview;
use chrono::NaiveDate;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

use crate::error::{ExportError, Result};
use crate::properties::read_property_ids;
use crate::source::Beds24Api;

/// Beds24 returns at most this many reviews per request. A shorter page
/// means the feed is exhausted for the property.
pub const PAGE_SIZE: usize = 100;

/// Upper bound on requests per property.
pub const MAX_REVIEW_PAGES: u32 = 1000;

/// Where the `from` cursor starts for each property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorScope {
    /// Every property starts from the configured date.
    #[default]
    PerProperty,
    /// Each property starts from where the previous one left off. Can skip
    /// early reviews of later properties.
    Carry,
}

/// Fixed delays that keep the run under the Beds24 credit limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pacing {
    /// Sleep before every request.
    PerPage(Duration),
    /// Sleep between properties only.
    PerProperty(Duration),
    None,
}

impl Default for Pacing {
    fn default() -> Self {
        Pacing::PerPage(Duration::from_millis(1500))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FetchOptions {
    pub cursor_scope: CursorScope,
    pub pacing: Pacing,
}

impl FetchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cursor_scope(mut self, scope: CursorScope) -> Self {
        self.cursor_scope = scope;
        self
    }

    pub fn with_pacing(mut self, pacing: Pacing) -> Self {
        self.pacing = pacing;
        self
    }
}

/// What happened for a single property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyProgress {
    pub property_id: i64,
    pub pages: u32,
    pub records: usize,
    /// Cursor after the last page.
    pub cursor: NaiveDate,
}

#[derive(Debug, Clone, Default)]
pub struct FetchReport {
    pub properties: Vec<PropertyProgress>,
    /// Set when the id file had an unparsable token; see
    /// [`crate::properties::PropertyIds::truncated_at`].
    pub ids_truncated_at: Option<String>,
}

impl FetchReport {
    pub fn pages(&self) -> u32 {
        self.properties.iter().map(|p| p.pages).sum()
    }

    pub fn records(&self) -> usize {
        self.properties.iter().map(|p| p.records).sum()
    }
}

/// Fetch every review since `since` for the properties listed in
/// `property_ids_path` and append them to `output_path` as JSON Lines.
///
/// The output file is created if missing and never truncated. The first
/// failed request aborts the run; everything appended before it stays.
pub async fn fetch_reviews_since<A>(
    api: &A,
    property_ids_path: &Path,
    output_path: &Path,
    since: NaiveDate,
    options: &FetchOptions,
) -> Result<FetchReport>
where
    A: Beds24Api + ?Sized,
{
    let property_ids = read_property_ids(property_ids_path).await?;

    let mut file = tokio::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(output_path)
        .await
        .map_err(ExportError::io(output_path))?;

    let mut report = FetchReport {
        properties: Vec::with_capacity(property_ids.ids.len()),
        ids_truncated_at: property_ids.truncated_at,
    };
    let mut carried = since;

    for (index, &property_id) in property_ids.ids.iter().enumerate() {
        if let Pacing::PerProperty(delay) = options.pacing {
            if index > 0 {
                tokio::time::sleep(delay).await;
            }
        }

        let start = match options.cursor_scope {
            CursorScope::PerProperty => since,
            CursorScope::Carry => carried,
        };

        info!(property_id, from = %start, "Fetching reviews for property");
        let progress =
            fetch_property(api, &mut file, output_path, property_id, start, options).await?;
        carried = progress.cursor;
        report.properties.push(progress);
    }

    Ok(report)
}

async fn fetch_property<A>(
    api: &A,
    file: &mut tokio::fs::File,
    output_path: &Path,
    property_id: i64,
    start: NaiveDate,
    options: &FetchOptions,
) -> Result<PropertyProgress>
where
    A: Beds24Api + ?Sized,
{
    let mut progress = PropertyProgress {
        property_id,
        pages: 0,
        records: 0,
        cursor: start,
    };

    for page in 0..MAX_REVIEW_PAGES {
        if let Pacing::PerPage(delay) = options.pacing {
            tokio::time::sleep(delay).await;
        }

        let resp = api.booking_reviews(property_id, progress.cursor).await?;
        if page == 0 {
            let limits = resp.rate_limit;
            debug!(
                property_id,
                credit_limit = ?limits.credit_limit,
                credit_remaining = ?limits.credit_remaining,
                resets_in_secs = ?limits.resets_in_secs,
                request_cost = ?limits.request_cost,
                "Beds24 credit headers"
            );
        }

        info!(
            property_id,
            page,
            from = %progress.cursor,
            count = resp.len(),
            "Fetched review page"
        );

        let mut lines = String::new();
        for review in &resp.data {
            lines.push_str(&serde_json::to_string(review)?);
            lines.push('\n');
            progress.cursor = advance_cursor(progress.cursor, review);
        }
        file.write_all(lines.as_bytes())
            .await
            .map_err(ExportError::io(output_path))?;
        file.flush().await.map_err(ExportError::io(output_path))?;

        progress.pages += 1;
        progress.records += resp.len();

        if resp.len() < PAGE_SIZE {
            break;
        }
    }

    Ok(progress)
}

/// Move the cursor to the review's creation date. Never moves backwards,
/// and a review without a usable date leaves it where it was.
pub fn advance_cursor(cursor: NaiveDate, review: &BookingReview) -> NaiveDate {
    match review.created_date() {
        Some(date) => cursor.max(date),
        None => {
            warn!(
                review_id = review.review_id(),
                created = ?review.created_timestamp(),
                "Review has no usable creation date; cursor unchanged"
            );
            cursor
        }
    }
}
