// convlog - core/analyze.rs
//
// Token, size, and structure metrics for AICF text.
// Core layer: pure functions over in-memory content.

use crate::core::model::FileMetrics;
use crate::util::constants;
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

fn token_regex() -> &'static Regex {
    static TOKEN: OnceLock<Regex> = OnceLock::new();
    TOKEN.get_or_init(|| Regex::new(constants::TOKEN_PATTERN).expect("token: invalid regex"))
}

fn block_regex() -> &'static Regex {
    static BLOCK: OnceLock<Regex> = OnceLock::new();
    BLOCK.get_or_init(|| {
        Regex::new(constants::SEMANTIC_BLOCK_PATTERN).expect("semantic block: invalid regex")
    })
}

/// Approximate GPT-style token count: the number of maximal runs of word
/// characters.
pub fn count_tokens(text: &str) -> usize {
    token_regex().find_iter(text).count()
}

/// Number of `@UPPER_CASE` block markers.
pub fn count_semantic_blocks(text: &str) -> usize {
    block_regex().find_iter(text).count()
}

/// Lines containing anything other than whitespace.
pub fn count_content_lines(text: &str) -> usize {
    text.split('\n').filter(|l| !l.trim().is_empty()).count()
}

/// Compute all metrics for one file's content.
pub fn analyze_content(path: &Path, content: &str) -> FileMetrics {
    let tokens = count_tokens(content);
    let size = content.len();
    let token_byte_ratio = if size > 0 {
        tokens as f64 / size as f64
    } else {
        0.0
    };

    FileMetrics {
        path: path.to_path_buf(),
        lines: count_content_lines(content),
        tokens,
        size,
        semantic_blocks: count_semantic_blocks(content),
        token_byte_ratio,
    }
}
