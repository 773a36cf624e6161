use std::collections::BTreeSet;

use tracing::debug;

use crate::pipeline::types::{DatasetView, FilterApplied, MunicipalityChoice};
use crate::records::RecordCollection;

/// Narrows the collection to one municipality.
///
/// The match is exact and case-sensitive. An unknown municipality yields an
/// empty view. When the dataset has no municipality column the full
/// collection is returned and the view is marked [`FilterApplied::Unavailable`].
pub fn filter_by_municipality(
    collection: &RecordCollection,
    choice: &MunicipalityChoice,
) -> DatasetView {
    let (filter, records) = match choice {
        _ if !collection.schema.municipality => {
            (FilterApplied::Unavailable, collection.records.clone())
        }
        MunicipalityChoice::All => (FilterApplied::All, collection.records.clone()),
        MunicipalityChoice::Municipality(name) => {
            let records: Vec<_> = collection
                .records
                .iter()
                .filter(|r| r.municipality.as_deref() == Some(name.as_str()))
                .cloned()
                .collect();
            (FilterApplied::Municipality(name.clone()), records)
        }
    };

    debug!(filter = ?filter, records = records.len(), "View computed");

    DatasetView {
        filter,
        schema: collection.schema,
        records,
    }
}

/// Sorted, distinct municipalities for the filter dropdown.
///
/// Returns `None` when the dataset has no municipality column.
pub fn municipalities(collection: &RecordCollection) -> Option<Vec<String>> {
    if !collection.schema.municipality {
        return None;
    }

    let names: BTreeSet<&str> = collection
        .records
        .iter()
        .filter_map(|r| r.municipality.as_deref())
        .collect();

    Some(names.into_iter().map(str::to_string).collect())
}
