use crate::pipeline::types::{DatasetView, FilterApplied, GeoPoint, GeoPoints};

/// Map zoom for the whole province.
pub const PROVINCE_ZOOM: u8 = 9;

/// Map zoom when a single municipality is selected.
pub const MUNICIPALITY_ZOOM: u8 = 13;

/// Extracts map markers for every geolocated record, in source order.
pub fn geo_points(view: &DatasetView) -> GeoPoints {
    if !view.schema.coordinates {
        return GeoPoints::Unsupported;
    }

    let points = view
        .records
        .iter()
        .filter_map(|record| {
            record.coordinates().map(|(latitude, longitude)| GeoPoint {
                record: record.clone(),
                latitude,
                longitude,
            })
        })
        .collect();

    GeoPoints::Points(points)
}

pub fn suggested_zoom(filter: &FilterApplied) -> u8 {
    match filter {
        FilterApplied::Municipality(_) => MUNICIPALITY_ZOOM,
        FilterApplied::All | FilterApplied::Unavailable => PROVINCE_ZOOM,
    }
}
