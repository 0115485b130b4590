//! The seam between the pipeline and the Beds24 API.

use async_trait::async_trait;
use beds24_client::{Beds24Client, BookingReview, Page, Property};
use chrono::NaiveDate;

/// The two Beds24 endpoints the exporter reads from.
#[async_trait]
pub trait Beds24Api: Send + Sync {
    /// Fetch one page of the property listing.
    async fn list_properties(&self, page: u32) -> beds24_client::Result<Page<Property>>;

    /// Fetch reviews for a property created on or after `from`.
    async fn booking_reviews(
        &self,
        property_id: i64,
        from: NaiveDate,
    ) -> beds24_client::Result<Page<BookingReview>>;
}

#[async_trait]
impl Beds24Api for Beds24Client {
    async fn list_properties(&self, page: u32) -> beds24_client::Result<Page<Property>> {
        Beds24Client::list_properties(self, page).await
    }

    async fn booking_reviews(
        &self,
        property_id: i64,
        from: NaiveDate,
    ) -> beds24_client::Result<Page<BookingReview>> {
        Beds24Client::booking_reviews(self, property_id, from).await
    }
}
