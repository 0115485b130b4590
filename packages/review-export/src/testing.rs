//! Testing utilities including a scripted Beds24 mock.
//!
//! Lets the pipeline be exercised end to end without network access.

use async_trait::async_trait;
use beds24_client::{Beds24Error, BookingReview, Page, Property};
use chrono::NaiveDate;
use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, RwLock};

use crate::source::Beds24Api;

/// Build a review with the given id and creation timestamp.
pub fn review(id: &str, created: &str) -> BookingReview {
    let mut fields = Map::new();
    fields.insert("reviewId".to_string(), Value::from(id));
    fields.insert("createdTimestamp".to_string(), Value::from(created));
    BookingReview::new(fields)
}

pub fn property(id: i64) -> Property {
    Property { id, name: None }
}

/// A mock Beds24 API.
///
/// Property pages are served by page number; anything not configured is an
/// empty page, or the endless page if one was set. Review pages are queued
/// per property and handed out in order; once a queue is drained the
/// property repeats its endless page if it has one, fails if it was marked
/// with [`MockBeds24::failing_after`], and returns empty pages otherwise.
#[derive(Default)]
pub struct MockBeds24 {
    property_pages: Arc<RwLock<HashMap<u32, Vec<Property>>>>,
    endless_properties: Arc<RwLock<Option<Vec<Property>>>>,
    review_pages: Arc<RwLock<HashMap<i64, VecDeque<Vec<BookingReview>>>>>,
    endless_reviews: Arc<RwLock<HashMap<i64, Vec<BookingReview>>>>,
    failing: Arc<RwLock<HashSet<i64>>>,
    calls: Arc<RwLock<Vec<MockCall>>>,
}

/// Record of a call made to the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    ListProperties { page: u32 },
    BookingReviews { property_id: i64, from: NaiveDate },
}

impl MockBeds24 {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_property_page(self, page: u32, properties: Vec<Property>) -> Self {
        self.property_pages
            .write()
            .unwrap()
            .insert(page, properties);
        self
    }

    /// Queue the next page of reviews for a property.
    pub fn with_review_page(self, property_id: i64, reviews: Vec<BookingReview>) -> Self {
        self.review_pages
            .write()
            .unwrap()
            .entry(property_id)
            .or_default()
            .push_back(reviews);
        self
    }

    /// Serve this page for every property page not set explicitly.
    pub fn with_endless_properties(self, properties: Vec<Property>) -> Self {
        *self.endless_properties.write().unwrap() = Some(properties);
        self
    }

    /// Repeat this page for a property once its queue is drained.
    pub fn with_endless_reviews(self, property_id: i64, reviews: Vec<BookingReview>) -> Self {
        self.endless_reviews
            .write()
            .unwrap()
            .insert(property_id, reviews);
        self
    }

    /// Fail review requests for this property once its queued pages run out.
    pub fn failing_after(self, property_id: i64) -> Self {
        self.failing.write().unwrap().insert(property_id);
        self
    }

    /// Get all calls made to this mock.
    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.read().unwrap().clone()
    }

    /// Calls to the review endpoint, as `(property_id, from)` pairs.
    pub fn review_calls(&self) -> Vec<(i64, NaiveDate)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                MockCall::BookingReviews { property_id, from } => Some((property_id, from)),
                MockCall::ListProperties { .. } => None,
            })
            .collect()
    }
}

#[async_trait]
impl Beds24Api for MockBeds24 {
    async fn list_properties(&self, page: u32) -> beds24_client::Result<Page<Property>> {
        self.calls
            .write()
            .unwrap()
            .push(MockCall::ListProperties { page });

        let data = self
            .property_pages
            .read()
            .unwrap()
            .get(&page)
            .cloned()
            .or_else(|| self.endless_properties.read().unwrap().clone())
            .unwrap_or_default();
        Ok(Page::new(data))
    }

    async fn booking_reviews(
        &self,
        property_id: i64,
        from: NaiveDate,
    ) -> beds24_client::Result<Page<BookingReview>> {
        self.calls
            .write()
            .unwrap()
            .push(MockCall::BookingReviews { property_id, from });

        let next = self
            .review_pages
            .write()
            .unwrap()
            .get_mut(&property_id)
            .and_then(|queue| queue.pop_front())
            .or_else(|| {
                self.endless_reviews
                    .read()
                    .unwrap()
                    .get(&property_id)
                    .cloned()
            });

        match next {
            Some(data) => Ok(Page::new(data)),
            None if self.failing.read().unwrap().contains(&property_id) => {
                Err(Beds24Error::Api {
                    status: 500,
                    message: format!("mock failure for property {}", property_id),
                })
            }
            None => Ok(Page::new(Vec::new())),
        }
    }
}
