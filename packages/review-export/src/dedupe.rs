//! Deduplication of a JSON Lines review file by review id.

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use beds24_client::BookingReview;
use tracing::{info, warn};

use crate::error::{ExportError, Result};

/// Tracks which review ids have already been emitted.
#[derive(Debug, Default)]
pub struct Deduplicator {
    seen: HashSet<String>,
}

impl Deduplicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` the first time a review id is offered.
    pub fn admit(&mut self, review: &BookingReview) -> bool {
        if self.seen.contains(review.review_id()) {
            return false;
        }
        self.seen.insert(review.review_id().to_string())
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DedupeReport {
    /// Records decoded from the input.
    pub read: usize,
    pub written: usize,
    pub duplicates: usize,
    /// Decoding hit a malformed or truncated value before end of input.
    /// Anything after that point was not read.
    pub stopped_early: bool,
}

/// Copy `input` to `output`, keeping only the first record for each review
/// id. `output` is truncated first.
///
/// Decoding stops without error at the first value that is not a review
/// record; the report says whether that happened. Read failures from the
/// file itself are still errors.
pub fn remove_duplicates(input: &Path, output: &Path) -> Result<DedupeReport> {
    let reader = File::open(input).map_err(ExportError::io(input))?;
    let writer = File::create(output).map_err(ExportError::io(output))?;
    let mut writer = BufWriter::new(writer);

    let mut report = DedupeReport::default();
    let mut dedup = Deduplicator::new();

    let stream =
        serde_json::Deserializer::from_reader(BufReader::new(reader)).into_iter::<BookingReview>();

    for item in stream {
        let review = match item {
            Ok(review) => review,
            Err(e) if e.is_io() => {
                return Err(ExportError::Io {
                    path: input.to_path_buf(),
                    source: e.into(),
                });
            }
            Err(e) => {
                warn!(
                    path = %input.display(),
                    line = e.line(),
                    column = e.column(),
                    error = %e,
                    "Stopped reading reviews at malformed record"
                );
                report.stopped_early = true;
                break;
            }
        };

        report.read += 1;
        if !dedup.admit(&review) {
            report.duplicates += 1;
            continue;
        }

        let mut line = serde_json::to_vec(&review)?;
        line.push(b'\n');
        writer.write_all(&line).map_err(ExportError::io(output))?;
        report.written += 1;
    }

    writer.flush().map_err(ExportError::io(output))?;

    info!(
        read = report.read,
        written = report.written,
        duplicates = report.duplicates,
        "Removed duplicate reviews"
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::review;

    #[test]
    fn test_admit_first_occurrence_only() {
        let mut dedup = Deduplicator::new();

        assert!(dedup.admit(&review("a", "2023-06-01")));
        assert!(dedup.admit(&review("b", "2023-06-01")));
        assert!(!dedup.admit(&review("a", "2023-06-02")));
        assert_eq!(dedup.len(), 2);
    }
}
