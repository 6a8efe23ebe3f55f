// Event-series loading: file -> guarded bytes -> one timestamp column (bd-m3u)

use std::fs;
use std::path::Path;

use csv::ByteRecord;

use super::parse::parse_timestamp;

/// One loaded timestamp column, scaled and validated.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    /// Header name of the column the values came from.
    pub column: String,
    pub values: Vec<f64>,
}

/// Encoding guardrail failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodingIssue {
    /// UTF-16/UTF-32 BOM: the file is not UTF-8 text.
    WideBom,
    /// NUL byte near the start: likely a binary file.
    NulByte,
}

/// Why a series could not be loaded. Maps 1:1 onto refusal codes.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadError {
    Io {
        error: String,
    },
    Encoding {
        issue: EncodingIssue,
    },
    CsvParse {
        line: Option<u64>,
    },
    /// The requested column is not in the header row.
    NoColumn {
        column: String,
        available: Vec<String>,
    },
    /// Multiple columns and no `--column` to pick one.
    AmbiguousColumn {
        available: Vec<String>,
    },
    /// A value in the timestamp column failed to parse.
    BadValue {
        record: u64,
        value: Vec<u8>,
    },
    /// Timestamps must be non-decreasing.
    NotMonotonic {
        record: u64,
        prev: f64,
        value: f64,
    },
    /// The file holds a header but no data records.
    Empty,
}

/// Number of leading bytes scanned for NUL.
const NUL_SCAN_LIMIT: usize = 8 * 1024;

const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// Load one timestamp column from a delimited text file.
///
/// `column = None` requires a single-column file; `scale` multiplies every
/// value (unit conversion, e.g. seconds to milliseconds). Values must be
/// finite and non-decreasing after scaling.
pub fn load_series(
    path: &Path,
    column: Option<&str>,
    scale: f64,
    delimiter: u8,
) -> Result<Series, LoadError> {
    let bytes = fs::read(path).map_err(|err| LoadError::Io {
        error: err.to_string(),
    })?;
    let text = guard_bytes(&bytes).map_err(|issue| LoadError::Encoding { issue })?;

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(false)
        .from_reader(text);

    let headers: Vec<String> = reader
        .byte_headers()
        .map_err(map_csv_error)?
        .iter()
        .map(|name| String::from_utf8_lossy(name).into_owned())
        .collect();

    let index = match column {
        Some(name) => {
            headers
                .iter()
                .position(|header| header == name)
                .ok_or_else(|| LoadError::NoColumn {
                    column: name.to_string(),
                    available: headers.clone(),
                })?
        }
        None if headers.len() == 1 => 0,
        None => {
            return Err(LoadError::AmbiguousColumn { available: headers });
        }
    };

    let mut values = Vec::new();
    let mut record = ByteRecord::new();
    let mut data_index: u64 = 0;
    loop {
        match reader.read_byte_record(&mut record) {
            Ok(true) => {
                if record.iter().all(|field| field.is_empty()) {
                    continue;
                }
                data_index += 1;
                let raw = record.get(index).unwrap_or(b"");
                let parsed = parse_timestamp(raw).ok_or_else(|| LoadError::BadValue {
                    record: data_index,
                    value: raw.to_vec(),
                })?;
                let value = parsed * scale;
                if let Some(prev) = values.last().copied()
                    && value < prev
                {
                    return Err(LoadError::NotMonotonic {
                        record: data_index,
                        prev,
                        value,
                    });
                }
                values.push(value);
            }
            Ok(false) => break,
            Err(err) => return Err(map_csv_error(err)),
        }
    }

    if values.is_empty() {
        return Err(LoadError::Empty);
    }

    Ok(Series {
        column: headers[index].clone(),
        values,
    })
}

/// Refuse wide-character BOMs and binary content; strip a UTF-8 BOM.
fn guard_bytes(input: &[u8]) -> Result<&[u8], EncodingIssue> {
    let wide_bom = matches!(
        input,
        [0x00, 0x00, 0xFE, 0xFF, ..]
            | [0xFF, 0xFE, 0x00, 0x00, ..]
            | [0xFE, 0xFF, ..]
            | [0xFF, 0xFE, ..]
    );
    if wide_bom {
        return Err(EncodingIssue::WideBom);
    }
    let stripped = input.strip_prefix(&UTF8_BOM).unwrap_or(input);
    if stripped.iter().take(NUL_SCAN_LIMIT).any(|byte| *byte == 0) {
        return Err(EncodingIssue::NulByte);
    }
    Ok(stripped)
}

fn map_csv_error(err: csv::Error) -> LoadError {
    LoadError::CsvParse {
        line: err.position().map(|pos| pos.line()),
    }
}
