//! Data types passed between the pipeline stages and the presentation layer.

use serde::Serialize;

use crate::pipeline::band::SafetyBand;
use crate::records::{Schema, SchoolRecord};

/// Label the dashboard uses for "no municipality filter".
pub const ALL_MUNICIPALITIES: &str = "TUTTA LA PROVINCIA";

/// The user's municipality selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MunicipalityChoice {
    All,
    Municipality(String),
}

impl MunicipalityChoice {
    /// Maps a dropdown value to a choice; the province-wide label, `all`
    /// and the empty string all mean no filter.
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() || value == ALL_MUNICIPALITIES || value.eq_ignore_ascii_case("all") {
            Self::All
        } else {
            Self::Municipality(value.to_string())
        }
    }
}

/// What filter actually produced a [`DatasetView`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "municipality", rename_all = "snake_case")]
pub enum FilterApplied {
    All,
    Municipality(String),
    /// The dataset has no municipality column, so the full collection is shown.
    Unavailable,
}

/// Records relevant to the current selection, in source order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetView {
    pub filter: FilterApplied,
    pub schema: Schema,
    pub records: Vec<SchoolRecord>,
}

impl DatasetView {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// KPI block shown above the map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Summary {
    /// All records in the view, scored or not.
    pub count: usize,
    pub scored_count: usize,
    /// `None` when no record in the view has a score.
    pub mean_score: Option<f64>,
    pub excellent_count: usize,
    pub attention_count: usize,
    pub critical_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Worst first.
    Ascending,
    /// Best first.
    Descending,
}

/// A map marker: the record plus its validated coordinates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeoPoint {
    pub record: SchoolRecord,
    pub latitude: f64,
    pub longitude: f64,
}

/// Map data for a view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "points", rename_all = "snake_case")]
pub enum GeoPoints {
    /// The dataset has no coordinate columns.
    Unsupported,
    /// Coordinate columns exist; the list may still be empty.
    Points(Vec<GeoPoint>),
}

/// Documentation status of a single school.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "notes", rename_all = "snake_case")]
pub enum Compliance {
    Compliant,
    Missing(String),
}

/// Everything the inspection panel shows for one school.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchoolDetail {
    pub name: String,
    pub municipality: Option<String>,
    pub address: Option<String>,
    pub safety_score: Option<f64>,
    pub band: Option<SafetyBand>,
    pub compliance: Compliance,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_choice_parse() {
        assert_eq!(MunicipalityChoice::parse(ALL_MUNICIPALITIES), MunicipalityChoice::All);
        assert_eq!(MunicipalityChoice::parse("all"), MunicipalityChoice::All);
        assert_eq!(MunicipalityChoice::parse(" "), MunicipalityChoice::All);
        assert_eq!(
            MunicipalityChoice::parse("MANDURIA"),
            MunicipalityChoice::Municipality("MANDURIA".to_string())
        );
    }

    #[test]
    fn test_geo_points_serialize_status() {
        let json = serde_json::to_value(GeoPoints::Unsupported).unwrap();
        assert_eq!(json["status"], "unsupported");

        let json = serde_json::to_value(GeoPoints::Points(vec![])).unwrap();
        assert_eq!(json["status"], "points");
        assert!(json["points"].as_array().unwrap().is_empty());
    }
}
