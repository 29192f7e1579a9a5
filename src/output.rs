//! Output formatting and persistence for roster reports.
//!
//! Supports pretty-printing, JSON serialization, plain-text tables and
//! writing the augmented roster as CSV.

use anyhow::Result;
use csv::WriterBuilder;
use flate2::Compression;
use flate2::write::GzEncoder;
use serde::Serialize;
use std::fmt::Debug;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::{debug, info};

use crate::roster::{DERIVED_COLUMNS, Roster, Student};

/// Logs a report using Rust's debug pretty-print format.
pub fn print_pretty(value: &impl Debug) {
    debug!("{:#?}", value);
}

/// Writes a report as pretty-printed JSON followed by a newline.
pub fn write_json<W: Write>(mut writer: W, value: &impl Serialize) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, value)?;
    writeln!(writer)?;
    Ok(())
}

/// Display form of a value that may be undefined.
pub fn format_value(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) => format!("{v:.decimals$}"),
        None => "no data".to_string(),
    }
}

/// Renders students as a fixed-width text table.
pub fn format_students(students: &[&Student]) -> String {
    let mut out = format!(
        "{:<28} {:>8} {:>8} {:>7} {:>7}\n",
        "Name", "Total", "Average", "GPA", "Status"
    );
    for s in students {
        let status = s.status().map_or_else(|| "-".to_string(), |st| st.to_string());
        out.push_str(&format!(
            "{:<28} {:>8.1} {:>8} {:>7} {:>7}\n",
            s.name(),
            s.total(),
            format_value(s.average(), 2),
            format_value(s.gpa(), 1),
            status
        ));
    }
    out
}

/// Writes the roster with its derived columns as CSV. The file is
/// gzip-compressed when `gzip` is set.
///
/// Missing scores and undefined statistics are written as empty cells.
pub fn write_roster_csv(path: &str, roster: &Roster, name_column: &str, gzip: bool) -> Result<()> {
    let file = File::create(Path::new(path))?;

    if gzip {
        let encoder = write_rows(GzEncoder::new(file, Compression::default()), roster, name_column)?;
        encoder.finish()?;
    } else {
        write_rows(file, roster, name_column)?;
    }

    info!(path, students = roster.len(), gzip, "Roster written");
    Ok(())
}

fn write_rows<W: Write>(sink: W, roster: &Roster, name_column: &str) -> Result<W> {
    let mut writer = WriterBuilder::new().from_writer(sink);

    // Every student carries the same pass-through columns.
    let extra_headers: Vec<&str> = roster
        .students()
        .first()
        .map(|s| s.extra().iter().map(|(k, _)| k.as_str()).collect())
        .unwrap_or_default();

    let mut header = vec![name_column];
    header.extend(roster.subjects().names().iter().map(String::as_str));
    header.extend(extra_headers.iter().copied());
    header.extend(DERIVED_COLUMNS);
    writer.write_record(&header)?;

    for s in roster.students() {
        let mut row = vec![s.name().to_string()];
        row.extend(s.scores().iter().map(|v| cell(*v)));
        row.extend(s.extra().iter().map(|(_, v)| v.clone()));
        row.push(s.total().to_string());
        row.push(cell(s.average()));
        row.push(cell(s.gpa()));
        row.push(s.status().map(|st| st.to_string()).unwrap_or_default());
        writer.write_record(&row)?;
    }

    debug!(rows = roster.len(), "CSV rows written");
    writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("failed to flush CSV writer: {}", e.error()))
}

fn cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}
