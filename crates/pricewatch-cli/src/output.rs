use anyhow::Context;
use pricewatch_core::NormalizedRecord;
use pricewatch_scanner::{ResultSet, SourceStatus};
use std::fmt::Write as _;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

const HEADERS: [&str; 3] = ["description", "price", "source"];

/// Render records as an aligned `description | price | source` table.
pub fn render_table(records: &[NormalizedRecord]) -> String {
    let rows: Vec<[String; 3]> = records
        .iter()
        .map(|record| {
            [
                record.description().to_string(),
                record.price().to_string(),
                record.source_name().to_string(),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(|header| header.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_row(&mut out, &HEADERS.map(str::to_string), &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let _ = writeln!(out, "{}", rule.join("-+-"));
    for row in &rows {
        push_row(&mut out, row, &widths);
    }
    out
}

fn push_row(out: &mut String, row: &[String; 3], widths: &[usize; 3]) {
    // Prices are right-aligned so the decimal points line up.
    let _ = writeln!(
        out,
        "{:<dw$} | {:>pw$} | {}",
        row[0],
        row[1],
        row[2],
        dw = widths[0],
        pw = widths[1],
    );
}

/// One-line outcome of a scan.
pub fn summary(result: &ResultSet) -> String {
    let total = result.sources().len();
    let failed = result.failed_sources().count();

    if result.all_sources_failed() {
        return format!("Every source failed ({total} of {total}); no listings collected.");
    }

    let mut line = if result.is_empty() {
        format!(
            "No relevant listings among {} candidates.",
            result.candidates()
        )
    } else {
        format!(
            "{} relevant listings from {} candidates.",
            result.len(),
            result.candidates()
        )
    };

    if failed > 0 {
        let names: Vec<String> = result
            .failed_sources()
            .map(|report| match &report.status {
                SourceStatus::Cancelled => format!("{} (cancelled)", report.source_name),
                _ => report.source_name.clone(),
            })
            .collect();
        let _ = write!(
            line,
            " {failed} of {total} sources failed: {}.",
            names.join(", ")
        );
    }

    line
}

/// Write the whole result set as pretty JSON.
pub fn write_json(path: &Path, result: &ResultSet) -> anyhow::Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create output file {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), result)
        .with_context(|| format!("failed to write results to {}", path.display()))?;
    Ok(())
}
