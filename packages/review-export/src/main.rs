// One-shot export: property ids -> raw reviews -> deduplicated reviews.

use std::path::Path;

use anyhow::{Context, Result};
use beds24_client::Beds24Client;
use chrono::NaiveDate;
use review_export::{
    fetch_reviews_since, remove_duplicates, write_all_property_ids, Config, FetchOptions,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const PROPERTY_IDS_PATH: &str = "property_ids.txt";
const REVIEWS_PATH: &str = "reviews.json";
const UNIQUE_REVIEWS_PATH: &str = "reviews_unique.json";
const REVIEWS_SINCE: &str = "2023-06-01";

// The id list only changes when properties are added or removed.
const REFRESH_PROPERTY_IDS: bool = false;

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,review_export=debug,beds24_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = run().await {
        tracing::error!(error = %format!("{:#}", e), "Review export failed");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let config = Config::from_env().context("Failed to load configuration")?;
    let client = Beds24Client::new(&config.beds24).context("Failed to build Beds24 client")?;
    tracing::info!(base_url = client.base_url(), "Beds24 client ready");

    if REFRESH_PROPERTY_IDS {
        let count = write_all_property_ids(&client, Path::new(PROPERTY_IDS_PATH))
            .await
            .context("Failed to list properties")?;
        tracing::info!(count, path = PROPERTY_IDS_PATH, "Wrote property ids");
    }

    let since = NaiveDate::parse_from_str(REVIEWS_SINCE, "%Y-%m-%d")
        .context("Invalid start date")?;

    let fetched = fetch_reviews_since(
        &client,
        Path::new(PROPERTY_IDS_PATH),
        Path::new(REVIEWS_PATH),
        since,
        &FetchOptions::default(),
    )
    .await
    .context("Failed to fetch reviews")?;
    tracing::info!(
        properties = fetched.properties.len(),
        pages = fetched.pages(),
        records = fetched.records(),
        "Fetched reviews"
    );

    let deduped = remove_duplicates(Path::new(REVIEWS_PATH), Path::new(UNIQUE_REVIEWS_PATH))
        .context("Failed to remove duplicate reviews")?;
    if deduped.stopped_early {
        tracing::warn!(
            path = REVIEWS_PATH,
            "Review file had a malformed record; later records were not deduplicated"
        );
    }

    tracing::info!(
        unique = deduped.written,
        path = UNIQUE_REVIEWS_PATH,
        "Review export complete"
    );

    Ok(())
}
