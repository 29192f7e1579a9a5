//! CSV reader for roster tables.

use csv::ReaderBuilder;
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

use crate::error::IngestionError;

/// A table of untyped cells, header first. Every row has exactly one cell
/// per header column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }
}

/// Reads a CSV table from `path`, decompressing it first when the file name
/// ends in `.gz`.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or is not valid CSV.
#[tracing::instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn read_table(path: impl AsRef<Path>) -> Result<RawTable, IngestionError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| IngestionError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let gzipped = path.extension().and_then(|e| e.to_str()) == Some("gz");
    let reader: Box<dyn Read> = if gzipped {
        Box::new(GzDecoder::new(file))
    } else {
        Box::new(file)
    };

    let table = parse_table(reader).map_err(|source| IngestionError::Csv {
        path: path.to_path_buf(),
        source,
    })?;

    debug!(
        columns = table.headers.len(),
        rows = table.rows.len(),
        gzipped,
        "Table read"
    );
    Ok(table)
}

/// Parses CSV from any reader.
///
/// Header names are trimmed. Columns with a blank header are dropped, as are
/// rows whose cells are all blank. Short rows are padded with empty cells.
/// Cells that are not valid UTF-8 are decoded lossily, so a stray Latin-1
/// byte spoils only its own cell.
pub fn parse_table<R: Read>(reader: R) -> Result<RawTable, csv::Error> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_reader(reader);

    let raw_headers: Vec<String> = rdr
        .byte_headers()?
        .iter()
        .map(|h| decode(h).trim().to_string())
        .collect();
    let keep: Vec<usize> = raw_headers
        .iter()
        .enumerate()
        .filter(|(_, h)| !h.is_empty())
        .map(|(i, _)| i)
        .collect();

    let headers = keep.iter().map(|&i| raw_headers[i].clone()).collect();
    let mut rows = Vec::new();

    for result in rdr.byte_records() {
        let record = result?;
        if record.iter().all(|cell| decode(cell).trim().is_empty()) {
            continue;
        }
        let row = keep
            .iter()
            .map(|&i| record.get(i).map(decode).unwrap_or_default())
            .collect();
        rows.push(row);
    }

    Ok(RawTable { headers, rows })
}

fn decode(cell: &[u8]) -> String {
    String::from_utf8_lossy(cell).into_owned()
}
