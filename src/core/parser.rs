// convlog - core/parser.rs
//
// Line classification for conversation logs.
// Core layer: works on in-memory text, never touches the filesystem.

use crate::core::model::EntryHeader;
use crate::util::constants;
use regex::Regex;
use std::borrow::Cow;
use std::sync::OnceLock;

fn header_regex() -> &'static Regex {
    static HEADER: OnceLock<Regex> = OnceLock::new();
    // The pattern is a compile-time constant covered by the tests below.
    HEADER.get_or_init(|| {
        Regex::new(constants::ENTRY_HEADER_PATTERN).expect("entry header: invalid regex")
    })
}

/// Parse `line` as a conversation entry header.
///
/// Returns `None` for anything that does not match the strict header shape;
/// such lines are ordinary body content. The date is checked for shape only,
/// so `2024-02-30` still makes a header.
pub fn parse_entry_header(line: &str) -> Option<EntryHeader<'_>> {
    let caps = header_regex().captures(line)?;
    Some(EntryHeader {
        id: caps.get(1)?.as_str(),
        date: caps.get(2)?.as_str(),
        title: caps.get(3)?.as_str(),
    })
}

/// True when `line` opens any level-2 section, entry header or not.
///
/// This is the weaker of the two line patterns: it can end a duplicate skip
/// span but never starts one.
pub fn is_section_start(line: &str) -> bool {
    line.starts_with(constants::SECTION_START_PREFIX)
}

/// Normalise line endings to `\n`.
///
/// Borrows when the text has no carriage returns.
pub fn normalize_line_endings(text: &str) -> Cow<'_, str> {
    if text.contains('\r') {
        Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Cow::Borrowed(text)
    }
}

/// Split normalised text into document lines.
///
/// Empty text is the empty document. Otherwise the text is split on every
/// `\n`, so a trailing newline yields a final empty line and
/// [`join_lines`] restores the text exactly.
pub fn split_lines(text: &str) -> Vec<&str> {
    if text.is_empty() {
        Vec::new()
    } else {
        text.split('\n').collect()
    }
}

/// Inverse of [`split_lines`].
pub fn join_lines(lines: &[&str]) -> String {
    lines.join("\n")
}
