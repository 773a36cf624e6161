//! Filter, aggregation and ranking over a loaded dataset.
//!
//! Every function here is pure: it takes the immutable collection (or a view
//! derived from it) plus the current selection and returns new values. None
//! of them can fail; empty input produces empty output or a "no data" marker.

pub mod band;
pub mod filter;
pub mod geo;
pub mod ranking;
pub mod summary;
pub mod types;
pub mod utility;

pub use band::SafetyBand;
pub use filter::{filter_by_municipality, municipalities};
pub use geo::{geo_points, suggested_zoom};
pub use ranking::{detail, find_by_name, school_names, top_n};
pub use summary::summarize;
pub use types::{
    Compliance, DatasetView, FilterApplied, GeoPoint, GeoPoints, MunicipalityChoice, SchoolDetail,
    SortOrder, Summary,
};
