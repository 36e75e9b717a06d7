// convlog - core/model.rs
//
// Core data model types. Pure data definitions with no I/O and no
// platform dependencies.
//
// These types are the shared vocabulary across all layers.

use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

// =============================================================================
// Conversation entries
// =============================================================================

/// Uniqueness key of a conversation entry.
///
/// Two headers with the same id and date are duplicates whatever their
/// titles say.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct IdentityKey {
    /// Hex conversation identifier.
    pub id: String,
    /// `YYYY-MM-DD` date text exactly as written in the header.
    pub date: String,
}

impl fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.id, self.date)
    }
}

/// A line recognised as the start of a conversation entry.
///
/// The date only has to have the `YYYY-MM-DD` shape; `2024-02-30` is still
/// a header and still part of the key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryHeader<'a> {
    pub id: &'a str,
    pub date: &'a str,
    pub title: &'a str,
}

impl EntryHeader<'_> {
    pub fn key(&self) -> IdentityKey {
        IdentityKey {
            id: self.id.to_string(),
            date: self.date.to_string(),
        }
    }

    /// The header date as a real calendar day, if it is one.
    pub fn calendar_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.date, crate::util::constants::ENTRY_DATE_FORMAT).ok()
    }
}

/// What happened to an entry header during a dedupe pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    /// First occurrence; the header and its body were kept.
    Kept,
    /// Repeat of an earlier key; the header and its body were dropped.
    Removed,
}

/// One header decision, in scan order. Used for reporting only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderDecision {
    pub key: IdentityKey,
    pub title: String,
    /// 1-based line number of the header in the input document.
    pub line_number: usize,
    pub verdict: Verdict,
}

/// Line and entry counts for one dedupe pass.
///
/// `total_in == total_out + removed` always holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DedupeStats {
    /// Distinct identity keys seen (and kept).
    pub kept: usize,
    /// Lines dropped from the document.
    pub removed: usize,
    /// Lines in the input document.
    pub total_in: usize,
    /// Lines in the filtered document.
    pub total_out: usize,
}

// =============================================================================
// AICF analysis
// =============================================================================

/// Efficiency metrics for a single AICF file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileMetrics {
    /// Path the metrics were computed for.
    pub path: PathBuf,
    /// Non-blank lines.
    pub lines: usize,
    /// Approximate word tokens.
    pub tokens: usize,
    /// Content size in UTF-8 bytes.
    pub size: usize,
    /// `@UPPER_CASE` block markers.
    pub semantic_blocks: usize,
    /// Tokens per byte, 0 for an empty file.
    pub token_byte_ratio: f64,
}

/// Aggregate metrics over every analysed file.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnalysisTotals {
    pub files: usize,
    pub tokens: usize,
    pub size: usize,
    pub semantic_blocks: usize,
}

impl AnalysisTotals {
    /// Fold one file's metrics into the totals.
    pub fn add(&mut self, metrics: &FileMetrics) {
        self.files += 1;
        self.tokens += metrics.tokens;
        self.size += metrics.size;
        self.semantic_blocks += metrics.semantic_blocks;
    }

    pub fn size_kb(&self) -> f64 {
        self.size as f64 / 1024.0
    }

    /// Average tokens per byte. `None` when nothing was analysed.
    pub fn tokens_per_byte(&self) -> Option<f64> {
        (self.size > 0).then(|| self.tokens as f64 / self.size as f64)
    }

    /// Semantic blocks per 1000 bytes. `None` when nothing was analysed.
    pub fn blocks_per_kb(&self) -> Option<f64> {
        (self.size > 0).then(|| self.semantic_blocks as f64 / self.size as f64 * 1000.0)
    }

    /// Size the same content would take as JSON, by the per-token estimate.
    pub fn estimated_json_size(&self) -> u64 {
        self.tokens as u64 * crate::util::constants::JSON_BYTES_PER_TOKEN
    }

    /// Percent saved against the JSON estimate. `None` when the estimate is 0.
    pub fn savings_vs_json_percent(&self) -> Option<f64> {
        let json = self.estimated_json_size();
        (json > 0).then(|| (json as f64 - self.size as f64) / json as f64 * 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(tokens: usize, size: usize, blocks: usize) -> FileMetrics {
        FileMetrics {
            path: PathBuf::from("x.aicf"),
            lines: 1,
            tokens,
            size,
            semantic_blocks: blocks,
            token_byte_ratio: 0.0,
        }
    }

    #[test]
    fn test_totals_accumulate() {
        let mut totals = AnalysisTotals::default();
        totals.add(&metrics(10, 100, 2));
        totals.add(&metrics(30, 300, 4));
        assert_eq!(totals.files, 2);
        assert_eq!(totals.tokens, 40);
        assert_eq!(totals.size, 400);
        assert_eq!(totals.semantic_blocks, 6);
        assert_eq!(totals.tokens_per_byte(), Some(0.1));
        assert_eq!(totals.blocks_per_kb(), Some(15.0));
    }

    #[test]
    fn test_savings_against_json_estimate() {
        let mut totals = AnalysisTotals::default();
        totals.add(&metrics(100, 150, 0));
        assert_eq!(totals.estimated_json_size(), 1500);
        let saved = totals.savings_vs_json_percent().unwrap();
        assert!((saved - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_totals_have_no_ratios() {
        let totals = AnalysisTotals::default();
        assert_eq!(totals.tokens_per_byte(), None);
        assert_eq!(totals.blocks_per_kb(), None);
        assert_eq!(totals.savings_vs_json_percent(), None);
    }

    #[test]
    fn test_identity_key_display() {
        let key = IdentityKey {
            id: "abc123".to_string(),
            date: "2024-01-01".to_string(),
        };
        assert_eq!(key.to_string(), "abc123 (2024-01-01)");
    }

    #[test]
    fn test_calendar_date_is_lenient() {
        let real = EntryHeader {
            id: "aa",
            date: "2024-02-29",
            title: "Leap day",
        };
        assert_eq!(real.calendar_date(), NaiveDate::from_ymd_opt(2024, 2, 29));

        let impossible = EntryHeader {
            id: "aa",
            date: "2024-02-30",
            title: "No such day",
        };
        assert_eq!(impossible.calendar_date(), None);
        assert_eq!(impossible.key().date, "2024-02-30");
    }
}
