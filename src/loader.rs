//! Reads the school-safety table into a [`RecordCollection`].
//!
//! The source is a delimited text file (comma or semicolon) whose header row
//! names the columns. Which optional columns exist is detected here and
//! recorded in the collection's [`Schema`]; the rest of the pipeline never
//! looks at headers again.

use std::fmt;
use std::io::Read;
use std::path::PathBuf;

use csv::{ReaderBuilder, StringRecord, Trim};
use flate2::read::GzDecoder;
use tracing::{debug, info, warn};

use crate::config::ColumnMap;
use crate::fetch::fetch_bytes;
use crate::records::{RecordCollection, Schema, SchoolRecord};

/// Cell values that mean "no value", besides the empty string.
const MISSING_MARKERS: &[&str] = &["nan", "na", "n/a", "null", "none"];

/// Where the dataset comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    File(PathBuf),
    Url(String),
}

impl DataSource {
    /// Interprets `http://` and `https://` prefixes as URLs, anything else as a path.
    pub fn parse(value: &str) -> Self {
        if value.starts_with("http://") || value.starts_with("https://") {
            Self::Url(value.to_string())
        } else {
            Self::File(PathBuf::from(value))
        }
    }

    fn is_gzip(&self) -> bool {
        match self {
            Self::File(path) => path.extension().is_some_and(|ext| ext == "gz"),
            Self::Url(url) => url.ends_with(".gz"),
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Url(url) => f.write_str(url),
        }
    }
}

/// Failures that stop a session before any view is computed.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The file does not exist (or the server answered 404).
    #[error("data source not found: {source_name}")]
    NotFound { source_name: String },

    /// One or more required columns are absent from the header row.
    #[error("{source_name} is missing required columns: {}", missing.join(", "))]
    Schema {
        source_name: String,
        missing: Vec<String>,
    },

    /// The content could not be read or decoded.
    #[error("could not read {source_name}: {cause}")]
    Parse {
        source_name: String,
        #[source]
        cause: ParseCause,
    },
}

/// Underlying reason for a [`LoadError::Parse`].
#[derive(Debug, thiserror::Error)]
pub enum ParseCause {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("download failed: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("malformed table: {0}")]
    Csv(#[from] csv::Error),

    #[error("line {line}, column {column}: '{value}' is not a number")]
    InvalidNumber {
        line: u64,
        column: String,
        value: String,
    },

    #[error("source is empty")]
    Empty,
}

/// Header positions resolved against a [`ColumnMap`].
struct ColumnIndex {
    name: usize,
    safety_score: usize,
    municipality: Option<usize>,
    address: Option<usize>,
    missing_notes: Option<usize>,
    coordinates: Option<(usize, usize)>,
}

impl ColumnIndex {
    fn resolve(headers: &StringRecord, columns: &ColumnMap) -> Result<Self, Vec<String>> {
        let position = |header: &str| headers.iter().position(|h| h == header);

        let name = position(&columns.name);
        let safety_score = position(&columns.safety_score);

        let (Some(name), Some(safety_score)) = (name, safety_score) else {
            let mut missing = Vec::new();
            if name.is_none() {
                missing.push(columns.name.clone());
            }
            if safety_score.is_none() {
                missing.push(columns.safety_score.clone());
            }
            return Err(missing);
        };

        let coordinates = match (position(&columns.latitude), position(&columns.longitude)) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => None,
        };

        Ok(Self {
            name,
            safety_score,
            municipality: position(&columns.municipality),
            address: position(&columns.address),
            missing_notes: position(&columns.missing_notes),
            coordinates,
        })
    }

    fn schema(&self) -> Schema {
        Schema {
            municipality: self.municipality.is_some(),
            address: self.address.is_some(),
            missing_notes: self.missing_notes.is_some(),
            coordinates: self.coordinates.is_some(),
        }
    }
}

/// Reads and validates the dataset at `source`.
///
/// # Errors
///
/// * [`LoadError::NotFound`] if the file or URL does not exist.
/// * [`LoadError::Schema`] if the name or score column is absent.
/// * [`LoadError::Parse`] for unreadable content or a non-numeric score or
///   coordinate cell.
#[tracing::instrument(skip_all, fields(source = %source))]
pub fn load(source: &DataSource, columns: &ColumnMap) -> Result<RecordCollection, LoadError> {
    let source_name = source.to_string();
    let bytes = read_source(source).map_err(|err| match err {
        ReadFailure::NotFound => LoadError::NotFound {
            source_name: source_name.clone(),
        },
        ReadFailure::Other(cause) => LoadError::Parse {
            source_name: source_name.clone(),
            cause,
        },
    })?;

    let collection = parse_table(&bytes, columns, &source_name)?;

    info!(
        records = collection.len(),
        municipality = collection.schema.municipality,
        coordinates = collection.schema.coordinates,
        "Dataset loaded"
    );
    if !collection.schema.municipality {
        warn!(column = %columns.municipality, "Municipality column absent, filtering disabled");
    }
    if !collection.schema.coordinates {
        warn!("Coordinate columns absent, map points unavailable");
    }

    Ok(collection)
}

/// Parses an in-memory table. `source_name` only appears in error messages.
pub fn parse_table(
    bytes: &[u8],
    columns: &ColumnMap,
    source_name: &str,
) -> Result<RecordCollection, LoadError> {
    let parse_error = |cause: ParseCause| LoadError::Parse {
        source_name: source_name.to_string(),
        cause,
    };

    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(parse_error(ParseCause::Empty));
    }

    let delimiter = sniff_delimiter(bytes);
    debug!(delimiter = %char::from(delimiter), "Reading table");

    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .trim(Trim::All)
        .from_reader(bytes);

    let headers = reader
        .headers()
        .map_err(|e| parse_error(e.into()))?
        .clone();

    let index = ColumnIndex::resolve(&headers, columns).map_err(|missing| LoadError::Schema {
        source_name: source_name.to_string(),
        missing,
    })?;

    let mut records = Vec::new();
    for (row, result) in reader.records().enumerate() {
        let raw = result.map_err(|e| parse_error(e.into()))?;
        let record = parse_row(row, &raw, &index, columns).map_err(parse_error)?;
        records.push(record);
    }

    Ok(RecordCollection::new(index.schema(), records))
}

fn parse_row(
    row: usize,
    raw: &StringRecord,
    index: &ColumnIndex,
    columns: &ColumnMap,
) -> Result<SchoolRecord, ParseCause> {
    // Header is line 1, so the first data row is line 2 when positions are unknown.
    let line = raw.position().map_or(row as u64 + 2, |p| p.line());
    let text = |idx: Option<usize>| idx.and_then(|i| raw.get(i)).and_then(clean_text);
    let number = |idx: Option<usize>, column: &str| parse_number(text(idx), column, line);

    let (lat_idx, lon_idx) = index.coordinates.unzip();

    Ok(SchoolRecord {
        row,
        name: text(Some(index.name)).unwrap_or_default(),
        municipality: text(index.municipality),
        address: text(index.address),
        safety_score: number(Some(index.safety_score), &columns.safety_score)?,
        missing_notes: text(index.missing_notes),
        latitude: number(lat_idx, &columns.latitude)?,
        longitude: number(lon_idx, &columns.longitude)?,
    })
}

fn clean_text(cell: &str) -> Option<String> {
    let cell = cell.trim();
    if cell.is_empty() || MISSING_MARKERS.iter().any(|m| cell.eq_ignore_ascii_case(m)) {
        None
    } else {
        Some(cell.to_string())
    }
}

/// Accepts `.` or `,` as decimal separator.
fn parse_number(cell: Option<String>, column: &str, line: u64) -> Result<Option<f64>, ParseCause> {
    let Some(cell) = cell else {
        return Ok(None);
    };

    match cell.replace(',', ".").parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(Some(value)),
        _ => Err(ParseCause::InvalidNumber {
            line,
            column: column.to_string(),
            value: cell,
        }),
    }
}

/// Picks `;` when the header line has more semicolons than commas.
fn sniff_delimiter(bytes: &[u8]) -> u8 {
    let header = bytes.split(|&b| b == b'\n').next().unwrap_or_default();
    let count = |needle: u8| header.iter().filter(|&&b| b == needle).count();
    if count(b';') > count(b',') { b';' } else { b',' }
}

enum ReadFailure {
    NotFound,
    Other(ParseCause),
}

fn read_source(source: &DataSource) -> Result<Vec<u8>, ReadFailure> {
    let raw = match source {
        DataSource::File(path) => std::fs::read(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ReadFailure::NotFound
            } else {
                ReadFailure::Other(e.into())
            }
        })?,
        DataSource::Url(url) => fetch_bytes(url).map_err(|e| {
            if e.status() == Some(reqwest::StatusCode::NOT_FOUND) {
                ReadFailure::NotFound
            } else {
                ReadFailure::Other(e.into())
            }
        })?,
    };

    if !source.is_gzip() {
        return Ok(raw);
    }

    let mut decoded = Vec::new();
    GzDecoder::new(raw.as_slice())
        .read_to_end(&mut decoded)
        .map_err(|e| ReadFailure::Other(e.into()))?;
    debug!(compressed = raw.len(), decoded = decoded.len(), "Decompressed source");
    Ok(decoded)
}
