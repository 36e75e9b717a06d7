// convlog - app/report.rs
//
// Human-readable (and JSON) rendering of run results.
// Writes to any Write trait object; main.rs hands in stdout.

use crate::app::analyze::{AnalysisReport, FileOutcome};
use crate::app::dedupe::DedupeRun;
use crate::core::model::Verdict;
use crate::util::constants;
use std::io::{self, Write};

/// Render a dedupe run: one line per header decision, then the counts.
pub fn write_dedupe_report<W: Write>(mut out: W, run: &DedupeRun) -> io::Result<()> {
    writeln!(out, "Conversation log: {}", run.log_path.display())?;

    for decision in &run.decisions {
        match decision.verdict {
            Verdict::Kept => writeln!(out, "  kept     {}", decision.key)?,
            Verdict::Removed => writeln!(
                out,
                "  removed  {}  (line {}: {})",
                decision.key, decision.line_number, decision.title
            )?,
        }
    }

    let stats = &run.stats;
    writeln!(out)?;
    writeln!(out, "Statistics:")?;
    writeln!(out, "   Original lines: {}", stats.total_in)?;
    writeln!(out, "   Final lines: {}", stats.total_out)?;
    writeln!(out, "   Removed lines: {}", stats.removed)?;
    writeln!(out, "   Conversations found: {}", stats.kept)?;

    match &run.backup_path {
        Some(backup) => writeln!(out, "Backup created: {}", backup.display())?,
        None => writeln!(out, "Dry run: no files were written")?,
    }
    Ok(())
}

/// Render a dedupe run as pretty-printed JSON.
pub fn write_dedupe_json<W: Write>(mut out: W, run: &DedupeRun) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut out, run)?;
    writeln!(out)
}

/// Render an analysis run as per-file blocks followed by overall figures.
pub fn write_analysis_report<W: Write>(mut out: W, report: &AnalysisReport) -> io::Result<()> {
    writeln!(out, "AICF Token Efficiency Analysis")?;
    writeln!(out)?;

    for outcome in &report.files {
        match outcome {
            FileOutcome::Missing { path } => {
                writeln!(out, "File not found: {}", path.display())?;
            }
            FileOutcome::Analyzed(m) => {
                let name = m
                    .path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| m.path.display().to_string());
                writeln!(out, "{name}:")?;
                writeln!(out, "   Lines: {}", group_thousands(m.lines))?;
                writeln!(out, "   Tokens: {}", group_thousands(m.tokens))?;
                writeln!(out, "   Size: {} bytes", group_thousands(m.size))?;
                writeln!(out, "   Semantic Blocks: {}", m.semantic_blocks)?;
                writeln!(out, "   Token/Byte Ratio: {:.4}", m.token_byte_ratio)?;
                writeln!(out)?;
            }
        }
    }

    let totals = &report.totals;
    let (Some(tokens_per_byte), Some(blocks_per_kb)) =
        (totals.tokens_per_byte(), totals.blocks_per_kb())
    else {
        writeln!(out, "No valid files found for analysis")?;
        return Ok(());
    };

    writeln!(out, "OVERALL STATISTICS:")?;
    writeln!(out, "   Total Tokens: {}", group_thousands(totals.tokens))?;
    writeln!(out, "   Total Size: {:.2} KB", totals.size_kb())?;
    writeln!(out, "   Total Semantic Blocks: {}", totals.semantic_blocks)?;
    writeln!(out, "   Average Compression: {tokens_per_byte:.4} tokens/byte")?;
    writeln!(out, "   Storage Efficiency: {blocks_per_kb:.2} blocks/KB")?;

    match totals.savings_vs_json_percent() {
        Some(saved) => {
            writeln!(out, "   Estimated Compression vs JSON: {saved:.1}%")?;
            writeln!(out)?;
            if saved > constants::EXCELLENT_COMPRESSION_PERCENT {
                writeln!(
                    out,
                    "AICF achieves >90% compression while maintaining semantic structure"
                )?;
            } else {
                writeln!(out, "AICF provides significant compression with semantic benefits")?;
            }
        }
        None => writeln!(out, "   Estimated Compression vs JSON: n/a (no tokens)")?,
    }
    Ok(())
}

/// Render an analysis run as pretty-printed JSON, including the derived
/// overall ratios.
pub fn write_analysis_json<W: Write>(mut out: W, report: &AnalysisReport) -> io::Result<()> {
    let totals = &report.totals;
    let doc = serde_json::json!({
        "directory": report.directory,
        "files": report.files,
        "totals": totals,
        "overall": {
            "size_kb": totals.size_kb(),
            "tokens_per_byte": totals.tokens_per_byte(),
            "blocks_per_kb": totals.blocks_per_kb(),
            "estimated_json_size": totals.estimated_json_size(),
            "savings_vs_json_percent": totals.savings_vs_json_percent(),
        },
    });
    serde_json::to_writer_pretty(&mut out, &doc)?;
    writeln!(out)
}

/// `1234567` -> `"1,234,567"`.
fn group_thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
