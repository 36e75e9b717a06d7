// convlog - core/dedupe.rs
//
// First-occurrence-wins deduplication of conversation entries.
// Core layer: a pure function from lines to lines plus counts. Backup and
// overwrite live in the app layer.

use crate::core::model::{DedupeStats, HeaderDecision, IdentityKey, Verdict};
use crate::core::parser::{is_section_start, parse_entry_header};
use std::collections::HashSet;

/// Output of a single dedupe pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deduplicated<'a> {
    /// Surviving lines, in their original order.
    pub lines: Vec<&'a str>,
    pub stats: DedupeStats,
    /// Every header seen, in scan order, with what was done to it.
    pub decisions: Vec<HeaderDecision>,
}

/// Remove repeated conversation entries, keeping the first occurrence of
/// each `(id, date)` key.
///
/// A repeated header starts a skip span that swallows the header and every
/// following line until the next entry header or, failing that, the next
/// `## ` section line. The section line that ends a span is kept.
///
/// The output is always a subsequence of the input, and running the pass
/// again on its own output removes nothing.
pub fn deduplicate<'a, I>(document: I) -> Deduplicated<'a>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen: HashSet<IdentityKey> = HashSet::new();
    let mut lines = Vec::new();
    let mut decisions = Vec::new();
    let mut skipping = false;
    let mut total_in = 0usize;

    for (index, line) in document.into_iter().enumerate() {
        total_in += 1;

        if let Some(header) = parse_entry_header(line) {
            if header.calendar_date().is_none() {
                tracing::warn!(
                    id = header.id,
                    date = header.date,
                    line = index + 1,
                    "Entry header date is not a calendar day"
                );
            }
            let key = header.key();
            let verdict = if seen.contains(&key) {
                skipping = true;
                Verdict::Removed
            } else {
                skipping = false;
                Verdict::Kept
            };

            tracing::debug!(key = %key, line = index + 1, ?verdict, "Entry header");
            decisions.push(HeaderDecision {
                key: key.clone(),
                title: header.title.to_string(),
                line_number: index + 1,
                verdict,
            });

            if verdict == Verdict::Removed {
                continue;
            }
            seen.insert(key);
        } else if skipping && is_section_start(line) {
            tracing::debug!(line = index + 1, "Section boundary ends duplicate span");
            skipping = false;
        }

        if !skipping {
            lines.push(line);
        }
    }

    let total_out = lines.len();
    let stats = DedupeStats {
        kept: seen.len(),
        removed: total_in - total_out,
        total_in,
        total_out,
    };

    Deduplicated {
        lines,
        stats,
        decisions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(text: &str) -> Deduplicated<'_> {
        deduplicate(text.lines())
    }

    #[test]
    fn test_drops_repeated_entry_with_body() {
        let text = "\
## Chat abc123 - 2024-01-01 - First
body one
## Chat def456 - 2024-01-02 - Other
body two
## Chat abc123 - 2024-01-01 - Renamed
stale body
more stale";
        let result = run(text);
        assert_eq!(
            result.lines,
            vec![
                "## Chat abc123 - 2024-01-01 - First",
                "body one",
                "## Chat def456 - 2024-01-02 - Other",
                "body two",
            ]
        );
        assert_eq!(result.stats.kept, 2);
        assert_eq!(result.stats.removed, 3);
        assert_eq!(result.stats.total_in, 7);
        assert_eq!(result.stats.total_out, 4);
    }

    #[test]
    fn test_same_id_different_date_is_distinct() {
        let text = "\
## Chat abc123 - 2024-01-01 - Day one
## Chat abc123 - 2024-01-02 - Day two";
        let result = run(text);
        assert_eq!(result.stats.kept, 2);
        assert_eq!(result.stats.removed, 0);
    }

    #[test]
    fn test_next_header_ends_skip() {
        let text = "\
## Chat aa - 2024-01-01 - A
## Chat aa - 2024-01-01 - A again
dup body
## Chat bb - 2024-01-01 - B
b body";
        let result = run(text);
        assert_eq!(
            result.lines,
            vec![
                "## Chat aa - 2024-01-01 - A",
                "## Chat bb - 2024-01-01 - B",
                "b body",
            ]
        );
    }

    #[test]
    fn test_consecutive_duplicates_keep_skipping() {
        let text = "\
## Chat aa - 2024-01-01 - A
a
## Chat aa - 2024-01-01 - A
x
## Chat aa - 2024-01-01 - A
y";
        let result = run(text);
        assert_eq!(result.lines, vec!["## Chat aa - 2024-01-01 - A", "a"]);
        assert_eq!(result.stats.removed, 4);
    }

    #[test]
    fn test_generic_section_ends_skip_and_is_emitted() {
        let text = "\
## Chat aa - 2024-01-01 - A
## Chat aa - 2024-01-01 - A
dup body
## Summary
summary body";
        let result = run(text);
        assert_eq!(
            result.lines,
            vec!["## Chat aa - 2024-01-01 - A", "## Summary", "summary body"]
        );
    }

    #[test]
    fn test_subsection_does_not_end_skip() {
        let text = "\
## Chat aa - 2024-01-01 - A
## Chat aa - 2024-01-01 - A
### Details
detail";
        let result = run(text);
        assert_eq!(result.lines, vec!["## Chat aa - 2024-01-01 - A"]);
    }

    #[test]
    fn test_malformed_header_is_body_content() {
        let text = "\
## Chat aa - 2024-01-01 - A
## Chat aa - 2024-1-01 - Short month
## Chat aa - 2024-1-01 - Short month";
        let result = run(text);
        assert_eq!(result.stats.removed, 0);
        assert_eq!(result.stats.kept, 1);
        assert_eq!(result.decisions.len(), 1);
    }

    #[test]
    fn test_impossible_date_still_dedupes() {
        let lines = vec![
            "## Chat aa - 2024-02-30 - A",
            "body",
            "## Chat aa - 2024-02-30 - A",
            "dup body",
        ];
        let result = deduplicate(lines);
        assert_eq!(result.lines, vec!["## Chat aa - 2024-02-30 - A", "body"]);
        assert_eq!(result.stats.kept, 1);
        assert_eq!(result.stats.removed, 2);
    }

    #[test]
    fn test_malformed_header_inside_skip_ends_it() {
        // Not an entry header, but still a `## ` section start.
        let text = "\
## Chat aa - 2024-01-01 - A
## Chat aa - 2024-01-01 - A
## Chat ZZ - 2024-01-01 - Upper-case id";
        let result = run(text);
        assert_eq!(
            result.lines,
            vec![
                "## Chat aa - 2024-01-01 - A",
                "## Chat ZZ - 2024-01-01 - Upper-case id",
            ]
        );
    }

    #[test]
    fn test_blank_lines_follow_skip_state() {
        let lines = vec![
            "## Chat aa - 2024-01-01 - A",
            "",
            "## Chat aa - 2024-01-01 - A",
            "",
            "   ",
        ];
        let result = deduplicate(lines);
        assert_eq!(result.lines, vec!["## Chat aa - 2024-01-01 - A", ""]);
    }

    #[test]
    fn test_decisions_record_scan_order() {
        let text = "\
## Chat aa - 2024-01-01 - A
## Chat bb - 2024-01-01 - B
## Chat aa - 2024-01-01 - A2";
        let result = run(text);
        let verdicts: Vec<_> = result
            .decisions
            .iter()
            .map(|d| (d.key.id.as_str(), d.line_number, d.verdict))
            .collect();
        assert_eq!(
            verdicts,
            vec![
                ("aa", 1, Verdict::Kept),
                ("bb", 2, Verdict::Kept),
                ("aa", 3, Verdict::Removed),
            ]
        );
        assert_eq!(result.decisions[2].title, "A2");
    }

    #[test]
    fn test_empty_document() {
        let result = deduplicate(std::iter::empty());
        assert!(result.lines.is_empty());
        assert_eq!(result.stats, DedupeStats::default());
    }
}
