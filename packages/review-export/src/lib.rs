//! Batch export of Beds24 Booking.com reviews.
//!
//! The pipeline is three sequential steps over flat files:
//!
//! 1. [`properties::write_all_property_ids`] lists every property and writes
//!    one id per line.
//! 2. [`reviews::fetch_reviews_since`] walks the review feed of each listed
//!    property and appends the records to a JSON Lines file.
//! 3. [`dedupe::remove_duplicates`] keeps the first record per review id.
//!
//! # Example
//!
//! ```rust,ignore
//! use beds24_client::Beds24Client;
//! use review_export::{Config, FetchOptions};
//!
//! let config = Config::from_env()?;
//! let client = Beds24Client::new(&config.beds24)?;
//!
//! review_export::fetch_reviews_since(
//!     &client,
//!     "property_ids.txt".as_ref(),
//!     "reviews.json".as_ref(),
//!     since,
//!     &FetchOptions::default(),
//! )
//! .await?;
//! review_export::remove_duplicates("reviews.json".as_ref(), "reviews_unique.json".as_ref())?;
//! ```

pub mod config;
pub mod dedupe;
pub mod error;
pub mod properties;
pub mod reviews;
pub mod source;
pub mod testing;

pub use config::Config;
pub use dedupe::{remove_duplicates, DedupeReport, Deduplicator};
pub use error::{ExportError, Result};
pub use properties::{parse_property_ids, read_property_ids, write_all_property_ids, PropertyIds};
pub use reviews::{
    fetch_reviews_since, CursorScope, FetchOptions, FetchReport, Pacing, PropertyProgress,
};
pub use source::Beds24Api;
pub use testing::MockBeds24;
