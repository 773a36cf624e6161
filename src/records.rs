//! In-memory representation of the school-safety dataset.

use serde::Serialize;

/// One school row as read from the source file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchoolRecord {
    /// Zero-based position in the source, after the header.
    pub row: usize,
    pub name: String,
    pub municipality: Option<String>,
    pub address: Option<String>,
    /// Kept exactly as read, including values outside 0–100.
    pub safety_score: Option<f64>,
    pub missing_notes: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl SchoolRecord {
    /// Creates a record with only the required fields set.
    pub fn new(row: usize, name: impl Into<String>, safety_score: Option<f64>) -> Self {
        Self {
            row,
            name: name.into(),
            municipality: None,
            address: None,
            safety_score,
            missing_notes: None,
            latitude: None,
            longitude: None,
        }
    }

    pub fn with_municipality(mut self, municipality: &str) -> Self {
        self.municipality = Some(municipality.to_string());
        self
    }

    pub fn with_address(mut self, address: &str) -> Self {
        self.address = Some(address.to_string());
        self
    }

    pub fn with_notes(mut self, notes: &str) -> Self {
        self.missing_notes = Some(notes.to_string());
        self
    }

    pub fn with_coordinates(mut self, latitude: Option<f64>, longitude: Option<f64>) -> Self {
        self.latitude = latitude;
        self.longitude = longitude;
        self
    }

    /// Records with a blank name cannot be ranked or looked up.
    pub fn has_name(&self) -> bool {
        !self.name.trim().is_empty()
    }

    /// Returns `(latitude, longitude)` only when both are present and finite.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) if lat.is_finite() && lon.is_finite() => Some((lat, lon)),
            _ => None,
        }
    }

    pub fn is_geolocated(&self) -> bool {
        self.coordinates().is_some()
    }
}

/// Which optional columns the source file provided.
///
/// `name` and `safety_score` are always present once a load succeeds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Schema {
    pub municipality: bool,
    pub address: bool,
    pub missing_notes: bool,
    /// True only when both the latitude and longitude columns exist.
    pub coordinates: bool,
}

impl Schema {
    /// Schema with every optional column present.
    pub fn full() -> Self {
        Self {
            municipality: true,
            address: true,
            missing_notes: true,
            coordinates: true,
        }
    }
}

/// The complete dataset as loaded, in source order. Never mutated after load.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordCollection {
    pub schema: Schema,
    pub records: Vec<SchoolRecord>,
}

impl RecordCollection {
    pub fn new(schema: Schema, records: Vec<SchoolRecord>) -> Self {
        Self { schema, records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
