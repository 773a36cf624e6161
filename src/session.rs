//! Per-session state: the dataset, loaded once and then only read.
//!
//! A [`Session`] is the event handler the presentation layer talks to. Each
//! call takes the current selection as a plain value and recomputes the
//! affected views from the immutable collection.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

use crate::config::ColumnMap;
use crate::loader::{DataSource, LoadError, load};
use crate::pipeline::band::SCORE_COLOR_RANGE;
use crate::pipeline::{
    DatasetView, FilterApplied, GeoPoints, MunicipalityChoice, SchoolDetail, SortOrder, Summary,
    detail, filter_by_municipality, find_by_name, geo_points, municipalities, school_names,
    suggested_zoom, summarize, top_n,
};
use crate::records::{RecordCollection, SchoolRecord};

/// Number of schools in each leaderboard by default.
pub const DEFAULT_LEADERBOARD_SIZE: usize = 10;

/// Everything the dashboard page renders for one selection.
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub generated_at: DateTime<Utc>,
    pub filter: FilterApplied,
    pub summary: Summary,
    pub best: Vec<SchoolRecord>,
    pub worst: Vec<SchoolRecord>,
    pub map: GeoPoints,
    pub zoom: u8,
    /// Score range mapped onto the marker color scale.
    pub color_range: (f64, f64),
}

#[derive(Debug, Clone)]
pub struct Session {
    collection: RecordCollection,
}

impl Session {
    /// Loads the dataset. A failure here is terminal for the session.
    #[tracing::instrument(skip_all, fields(source = %source))]
    pub fn open(source: &DataSource, columns: &ColumnMap) -> Result<Self, LoadError> {
        let collection = load(source, columns)?;
        Ok(Self::from_collection(collection))
    }

    pub fn from_collection(collection: RecordCollection) -> Self {
        Self { collection }
    }

    pub fn collection(&self) -> &RecordCollection {
        &self.collection
    }

    /// Dropdown values; `None` when the dataset cannot be filtered.
    pub fn municipalities(&self) -> Option<Vec<String>> {
        municipalities(&self.collection)
    }

    pub fn view(&self, choice: &MunicipalityChoice) -> DatasetView {
        filter_by_municipality(&self.collection, choice)
    }

    pub fn school_names(&self, choice: &MunicipalityChoice) -> Vec<String> {
        school_names(&self.view(choice))
    }

    pub fn ranking(
        &self,
        choice: &MunicipalityChoice,
        n: usize,
        order: SortOrder,
    ) -> Vec<SchoolRecord> {
        top_n(&self.view(choice), n, order)
    }

    /// Recomputes the KPI, leaderboard and map data for `choice`.
    pub fn dashboard(&self, choice: &MunicipalityChoice, leaderboard_size: usize) -> Dashboard {
        let view = self.view(choice);
        let summary = summarize(&view);

        info!(
            filter = ?view.filter,
            count = summary.count,
            mean_score = ?summary.mean_score,
            "Dashboard recomputed"
        );

        Dashboard {
            generated_at: Utc::now(),
            summary,
            best: top_n(&view, leaderboard_size, SortOrder::Descending),
            worst: top_n(&view, leaderboard_size, SortOrder::Ascending),
            map: geo_points(&view),
            zoom: suggested_zoom(&view.filter),
            color_range: SCORE_COLOR_RANGE,
            filter: view.filter,
        }
    }

    /// Inspection panel for the first school named `name` within `choice`.
    pub fn inspect(&self, choice: &MunicipalityChoice, name: &str) -> Option<SchoolDetail> {
        let view = self.view(choice);
        let found = find_by_name(&view, name).map(detail);
        debug!(name, found = found.is_some(), "School lookup");
        found
    }
}
