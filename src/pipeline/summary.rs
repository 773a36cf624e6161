use crate::pipeline::band::SafetyBand;
use crate::pipeline::types::{DatasetView, Summary};
use crate::pipeline::utility::mean;

/// Computes the KPI block for a view.
///
/// Records without a score count towards `count` only.
pub fn summarize(view: &DatasetView) -> Summary {
    let scores: Vec<f64> = view.records.iter().filter_map(|r| r.safety_score).collect();

    let mut summary = Summary {
        count: view.len(),
        scored_count: scores.len(),
        mean_score: mean(&scores),
        excellent_count: 0,
        attention_count: 0,
        critical_count: 0,
    };

    for &score in &scores {
        match SafetyBand::from_score(score) {
            SafetyBand::Excellent => summary.excellent_count += 1,
            SafetyBand::Attention => summary.attention_count += 1,
            SafetyBand::Critical => summary.critical_count += 1,
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::types::FilterApplied;
    use crate::records::{Schema, SchoolRecord};

    fn view(scores: &[Option<f64>]) -> DatasetView {
        DatasetView {
            filter: FilterApplied::All,
            schema: Schema::full(),
            records: scores
                .iter()
                .enumerate()
                .map(|(i, s)| SchoolRecord::new(i, format!("S{i}"), *s))
                .collect(),
        }
    }

    #[test]
    fn test_empty_view_has_no_mean() {
        let summary = summarize(&view(&[]));

        assert_eq!(summary.count, 0);
        assert_eq!(summary.mean_score, None);
        assert_eq!(summary.excellent_count, 0);
        assert_eq!(summary.critical_count, 0);
    }

    #[test]
    fn test_all_scores_missing() {
        let summary = summarize(&view(&[None, None]));

        assert_eq!(summary.count, 2);
        assert_eq!(summary.scored_count, 0);
        assert_eq!(summary.mean_score, None);
    }

    #[test]
    fn test_missing_scores_excluded_from_mean() {
        let summary = summarize(&view(&[Some(30.0), None, Some(90.0)]));

        assert_eq!(summary.count, 3);
        assert_eq!(summary.scored_count, 2);
        assert_eq!(summary.mean_score, Some(60.0));
    }

    #[test]
    fn test_threshold_boundaries() {
        let summary = summarize(&view(&[
            Some(49.99),
            Some(50.0),
            Some(79.99),
            Some(80.0),
        ]));

        assert_eq!(summary.critical_count, 1);
        assert_eq!(summary.attention_count, 2);
        assert_eq!(summary.excellent_count, 1);
        assert!(summary.excellent_count + summary.critical_count <= summary.count);
    }

    #[test]
    fn test_bands_partition_scored_records() {
        let summary = summarize(&view(&[
            Some(-3.0),
            Some(12.0),
            None,
            Some(65.0),
            Some(101.0),
        ]));

        assert_eq!(
            summary.critical_count + summary.attention_count + summary.excellent_count,
            summary.scored_count
        );
        assert_eq!(summary.critical_count, 2);
        assert_eq!(summary.excellent_count, 1);
    }
}
