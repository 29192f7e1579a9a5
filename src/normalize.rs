//! Turns a raw table into a typed [`Roster`].

use std::path::Path;
use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::error::{Error, IngestionError};
use crate::parser::{RawTable, read_table};
use crate::roster::{DERIVED_COLUMNS, Grading, Roster, Student, SubjectSet};

/// Parses one score cell. Blank, unparseable and non-finite cells are missing.
pub fn parse_score(cell: &str) -> Option<f64> {
    cell.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Builds a roster from `table`.
///
/// The name column and every subject column must be present in the header.
/// Individual cells never fail the load: a bad score is recorded as missing.
pub fn normalize(
    table: &RawTable,
    subjects: &SubjectSet,
    name_column: &str,
    grading: &Grading,
) -> Result<Roster, IngestionError> {
    if table.headers.is_empty() {
        return Err(IngestionError::EmptyHeader);
    }

    let name_idx = table
        .column(name_column)
        .ok_or_else(|| IngestionError::MissingColumn {
            column: name_column.to_string(),
        })?;

    let subject_idx = subjects
        .names()
        .iter()
        .map(|subject| {
            table
                .column(subject)
                .ok_or_else(|| IngestionError::MissingColumn {
                    column: subject.clone(),
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let (stale, passthrough): (Vec<usize>, Vec<usize>) = (0..table.headers.len())
        .filter(|i| *i != name_idx && !subject_idx.contains(i))
        .partition(|&i| DERIVED_COLUMNS.contains(&table.headers[i].as_str()));
    if !stale.is_empty() {
        debug!(dropped = stale.len(), "Ignoring derived columns from source");
    }

    let mut missing_cells = 0usize;
    let mut students = Vec::with_capacity(table.rows.len());

    for row in &table.rows {
        let cell = |i: usize| row.get(i).map_or("", String::as_str);

        let scores: Vec<Option<f64>> = subject_idx.iter().map(|&i| parse_score(cell(i))).collect();
        missing_cells += scores.iter().filter(|s| s.is_none()).count();

        let extra = passthrough
            .iter()
            .map(|&i| (table.headers[i].clone(), cell(i).to_string()))
            .collect();

        students.push(Student::new(cell(name_idx).trim(), scores, extra, grading));
    }

    debug!(
        students = students.len(),
        subjects = subjects.len(),
        missing_cells,
        "Roster normalized"
    );

    Ok(Roster::new(subjects.clone(), grading.clone(), students))
}

/// Reads and normalizes the table at `path` using `config`.
pub fn load_roster(path: impl AsRef<Path>, config: &EngineConfig) -> Result<Roster, Error> {
    config.validate()?;
    let subjects = config.subject_set()?;
    let table = read_table(path)?;
    let roster = normalize(&table, &subjects, &config.name_column, &Grading::from(config))?;

    info!(
        students = roster.len(),
        subjects = subjects.len(),
        "Roster loaded"
    );
    Ok(roster)
}

/// Like [`load_roster`], but falls back to an empty roster when the source
/// cannot be ingested. Configuration errors still fail.
pub fn load_roster_or_empty(
    path: impl AsRef<Path>,
    config: &EngineConfig,
) -> Result<Roster, Error> {
    match load_roster(path, config) {
        Err(Error::Ingestion(e)) => {
            warn!(error = %e, "Load failed, continuing with an empty roster");
            Ok(Roster::empty(config.subject_set()?, Grading::from(config)))
        }
        other => other,
    }
}
