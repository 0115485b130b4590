//! Property listing and the property-id file.
//!
//! The id file is plain UTF-8 with one integer per line. It is produced by
//! [`write_all_property_ids`] and consumed by the review fetcher.

use std::path::Path;

use tokio::io::AsyncWriteExt;
use tracing::{info, warn};

use crate::error::{ExportError, Result};
use crate::source::Beds24Api;

/// Upper bound on listing requests. Property pages are numbered from 1, so
/// at most `MAX_PROPERTY_PAGES - 1` requests are made.
pub const MAX_PROPERTY_PAGES: u32 = 1000;

/// Ids read from a property-id file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyIds {
    pub ids: Vec<i64>,
    /// The first token that failed to parse. Reading stops there and
    /// everything after it is ignored.
    pub truncated_at: Option<String>,
}

/// Parse whitespace-delimited integers, stopping silently at the first
/// token that is not one. Bytes that are not UTF-8 count as a bad token.
pub fn parse_property_ids(bytes: &[u8]) -> PropertyIds {
    let mut parsed = PropertyIds::default();

    let tokens = bytes
        .split(u8::is_ascii_whitespace)
        .filter(|token| !token.is_empty());
    for token in tokens {
        let id = std::str::from_utf8(token)
            .ok()
            .and_then(|s| s.parse::<i64>().ok());
        match id {
            Some(id) => parsed.ids.push(id),
            None => {
                parsed.truncated_at = Some(String::from_utf8_lossy(token).into_owned());
                break;
            }
        }
    }

    parsed
}

pub async fn read_property_ids(path: &Path) -> Result<PropertyIds> {
    let bytes = tokio::fs::read(path).await.map_err(ExportError::io(path))?;

    let parsed = parse_property_ids(&bytes);
    if let Some(token) = &parsed.truncated_at {
        warn!(
            path = %path.display(),
            token = %token,
            kept = parsed.ids.len(),
            "Stopped reading property ids at unparsable token"
        );
    }

    Ok(parsed)
}

/// Page through every property and write its id, one per line, to `path`.
///
/// The file is truncated first. Stops at the first empty page. Any failed
/// request aborts the listing; lines already written stay in the file.
/// Returns the number of ids written.
pub async fn write_all_property_ids<A>(api: &A, path: &Path) -> Result<usize>
where
    A: Beds24Api + ?Sized,
{
    let mut file = tokio::fs::File::create(path)
        .await
        .map_err(ExportError::io(path))?;

    let mut written = 0;
    for page in 1..MAX_PROPERTY_PAGES {
        let resp = api.list_properties(page).await?;
        if resp.is_empty() {
            break;
        }

        info!(page, count = resp.len(), "Fetched property page");

        let mut lines = String::new();
        for property in &resp.data {
            lines.push_str(&property.id.to_string());
            lines.push('\n');
        }
        file.write_all(lines.as_bytes())
            .await
            .map_err(ExportError::io(path))?;
        written += resp.len();
    }

    file.flush().await.map_err(ExportError::io(path))?;
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_newline_delimited() {
        let parsed = parse_property_ids(b"101\n102\n\n103\n");
        assert_eq!(parsed.ids, vec![101, 102, 103]);
        assert_eq!(parsed.truncated_at, None);
    }

    #[test]
    fn test_parse_stops_at_first_bad_token() {
        let parsed = parse_property_ids(b"101\n10x2\n103\n");
        assert_eq!(parsed.ids, vec![101]);
        assert_eq!(parsed.truncated_at.as_deref(), Some("10x2"));
    }

    #[test]
    fn test_parse_stops_at_invalid_utf8() {
        let parsed = parse_property_ids(b"101\n\xff\xfe\n102\n");
        assert_eq!(parsed.ids, vec![101]);
        assert_eq!(parsed.truncated_at.as_deref(), Some("\u{fffd}\u{fffd}"));
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(parse_property_ids(b""), PropertyIds::default());
    }
}
