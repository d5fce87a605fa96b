use crate::core::codec;
use crate::domain::model::{BatchReport, BatchRow};

/// Non-blank lines of `text` with their 1-based line numbers.
///
/// Accepts both `\n` and `\r\n` line endings.
pub fn split_lines(text: &str) -> Vec<(usize, &str)> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| (idx + 1, line))
        .collect()
}

pub fn convert_line(line: usize, original: &str) -> BatchRow {
    let outcome = codec::convert(original);
    if let Err(e) = &outcome {
        tracing::debug!("Line {} rejected: {}", line, e);
    }

    BatchRow {
        line,
        original: original.to_string(),
        normalized: codec::format(original),
        outcome,
    }
}

/// Converts every non-blank line of `text`, keeping input order.
pub fn convert_batch(text: &str) -> BatchReport {
    let rows: Vec<BatchRow> = split_lines(text)
        .into_iter()
        .map(|(line, original)| convert_line(line, original))
        .collect();

    let report = BatchReport::new(rows);
    tracing::debug!(
        "Batch converted: {} valid, {} invalid",
        report.valid_count(),
        report.invalid_count()
    );
    report
}
