use std::collections::BTreeSet;

use crate::pipeline::band::SafetyBand;
use crate::pipeline::types::{Compliance, DatasetView, SchoolDetail, SortOrder};
use crate::records::SchoolRecord;

/// Returns up to `n` named, scored records ordered by score.
///
/// Unscored and unnamed records are never ranked. The sort is stable, so
/// equal scores keep their source order in both directions.
pub fn top_n(view: &DatasetView, n: usize, order: SortOrder) -> Vec<SchoolRecord> {
    let mut ranked: Vec<(f64, &SchoolRecord)> = view
        .records
        .iter()
        .filter(|r| r.has_name())
        .filter_map(|r| r.safety_score.map(|score| (score, r)))
        .collect();

    match order {
        SortOrder::Ascending => ranked.sort_by(|a, b| a.0.total_cmp(&b.0)),
        SortOrder::Descending => ranked.sort_by(|a, b| b.0.total_cmp(&a.0)),
    }

    ranked
        .into_iter()
        .take(n)
        .map(|(_, record)| record.clone())
        .collect()
}

/// First record whose name equals `name` exactly, in source order.
///
/// Duplicate names are not an error; later duplicates are unreachable here.
pub fn find_by_name<'a>(view: &'a DatasetView, name: &str) -> Option<&'a SchoolRecord> {
    if name.trim().is_empty() {
        return None;
    }
    view.records.iter().find(|r| r.name == name)
}

/// Sorted, distinct school names for the lookup dropdown.
pub fn school_names(view: &DatasetView) -> Vec<String> {
    let names: BTreeSet<&str> = view
        .records
        .iter()
        .filter(|r| r.has_name())
        .map(|r| r.name.as_str())
        .collect();
    names.into_iter().map(str::to_string).collect()
}

/// Builds the inspection panel for a record.
pub fn detail(record: &SchoolRecord) -> SchoolDetail {
    let compliance = match record.missing_notes.as_deref().map(str::trim) {
        Some(notes) if !notes.is_empty() => Compliance::Missing(notes.to_string()),
        _ => Compliance::Compliant,
    };

    SchoolDetail {
        name: record.name.clone(),
        municipality: record.municipality.clone(),
        address: record.address.clone(),
        safety_score: record.safety_score,
        band: record.safety_score.map(SafetyBand::from_score),
        compliance,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::types::FilterApplied;
    use crate::records::Schema;

    fn view(records: Vec<SchoolRecord>) -> DatasetView {
        DatasetView {
            filter: FilterApplied::All,
            schema: Schema::full(),
            records,
        }
    }

    fn names(records: &[SchoolRecord]) -> Vec<&str> {
        records.iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn test_ascending_excludes_missing_scores() {
        let view = view(vec![
            SchoolRecord::new(0, "A", Some(30.0)),
            SchoolRecord::new(1, "B", Some(90.0)),
            SchoolRecord::new(2, "C", None),
        ]);

        assert_eq!(names(&top_n(&view, 2, SortOrder::Ascending)), vec!["A", "B"]);
        assert_eq!(names(&top_n(&view, 5, SortOrder::Descending)), vec!["B", "A"]);
    }

    #[test]
    fn test_ties_keep_source_order() {
        let view = view(vec![
            SchoolRecord::new(0, "First", Some(70.0)),
            SchoolRecord::new(1, "Low", Some(20.0)),
            SchoolRecord::new(2, "Second", Some(70.0)),
            SchoolRecord::new(3, "Third", Some(70.0)),
        ]);

        assert_eq!(
            names(&top_n(&view, 3, SortOrder::Descending)),
            vec!["First", "Second", "Third"]
        );
        assert_eq!(
            names(&top_n(&view, 4, SortOrder::Ascending)),
            vec!["Low", "First", "Second", "Third"]
        );
    }

    #[test]
    fn test_top_n_limits_and_zero() {
        let view = view(vec![
            SchoolRecord::new(0, "A", Some(10.0)),
            SchoolRecord::new(1, "B", Some(20.0)),
            SchoolRecord::new(2, "C", Some(30.0)),
        ]);

        assert_eq!(top_n(&view, 2, SortOrder::Descending).len(), 2);
        assert!(top_n(&view, 0, SortOrder::Descending).is_empty());
    }

    #[test]
    fn test_unnamed_records_not_ranked() {
        let view = view(vec![
            SchoolRecord::new(0, "", Some(99.0)),
            SchoolRecord::new(1, "A", Some(10.0)),
        ]);

        assert_eq!(names(&top_n(&view, 10, SortOrder::Descending)), vec!["A"]);
    }

    #[test]
    fn test_find_by_name_returns_first_duplicate() {
        let view = view(vec![
            SchoolRecord::new(0, "Scuola X", Some(40.0)).with_address("Via Uno"),
            SchoolRecord::new(1, "Scuola Y", Some(60.0)),
            SchoolRecord::new(2, "Scuola X", Some(80.0)).with_address("Via Due"),
        ]);

        let found = find_by_name(&view, "Scuola X").unwrap();
        assert_eq!(found.row, 0);
        assert_eq!(found.address.as_deref(), Some("Via Uno"));
    }

    #[test]
    fn test_find_by_name_exact_match_only() {
        let view = view(vec![SchoolRecord::new(0, "Scuola X", Some(40.0))]);

        assert!(find_by_name(&view, "scuola x").is_none());
        assert!(find_by_name(&view, "Scuola").is_none());
        assert!(find_by_name(&view, "").is_none());
    }

    #[test]
    fn test_school_names_sorted_distinct() {
        let view = view(vec![
            SchoolRecord::new(0, "Liceo B", None),
            SchoolRecord::new(1, "IC A", Some(1.0)),
            SchoolRecord::new(2, "Liceo B", Some(2.0)),
            SchoolRecord::new(3, " ", Some(3.0)),
        ]);

        assert_eq!(school_names(&view), vec!["IC A", "Liceo B"]);
    }

    #[test]
    fn test_detail_compliance_and_band() {
        let compliant = detail(&SchoolRecord::new(0, "A", Some(85.0)).with_notes("  "));
        assert_eq!(compliant.compliance, Compliance::Compliant);
        assert_eq!(compliant.band, Some(SafetyBand::Excellent));

        let missing = detail(&SchoolRecord::new(1, "B", Some(42.0)).with_notes("DVR assente"));
        assert_eq!(missing.compliance, Compliance::Missing("DVR assente".to_string()));
        assert_eq!(missing.band, Some(SafetyBand::Critical));

        let unscored = detail(&SchoolRecord::new(2, "C", None));
        assert_eq!(unscored.band, None);
    }
}
