use crate::models::{AccidentTable, InfrastructureFeature};
use crate::processors::RecordFilter;
use crate::utils::stats::percentage;
use serde::Serialize;

/// Treemap cell: how often a feature appears and what share of those
/// accidents happened at night.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureNightRatio {
    pub feature: InfrastructureFeature,
    pub count: usize,
    pub night_count: usize,
    pub night_percentage: f64,
}

/// Night ratio for every infrastructure feature flagged at least once, most
/// frequent first. Equal counts keep declaration order.
pub fn night_ratio_by_feature(
    table: &AccidentTable,
    filter: &RecordFilter,
) -> Vec<FeatureNightRatio> {
    let mut totals = [0usize; 13];
    let mut nights = [0usize; 13];

    for record in filter.apply(table) {
        let night = record.is_night();
        for feature in record.infrastructure.iter() {
            totals[feature.index()] += 1;
            if night {
                nights[feature.index()] += 1;
            }
        }
    }

    let mut ratios: Vec<FeatureNightRatio> = InfrastructureFeature::ALL
        .into_iter()
        .filter(|feature| totals[feature.index()] > 0)
        .map(|feature| {
            let count = totals[feature.index()];
            let night_count = nights[feature.index()];
            FeatureNightRatio {
                feature,
                count,
                night_count,
                night_percentage: percentage(night_count, count),
            }
        })
        .collect();

    ratios.sort_by(|a, b| b.count.cmp(&a.count));
    ratios
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::test_support::{record, table_of};
    use crate::models::{DayPhase, InfrastructureFlags};

    fn ratio_for(ratios: &[FeatureNightRatio], feature: InfrastructureFeature) -> &FeatureNightRatio {
        ratios.iter().find(|r| r.feature == feature).unwrap()
    }

    #[test]
    fn test_crossing_night_ratio() {
        let mut records = Vec::new();
        for i in 0..12 {
            let mut r = record("OH", "Dayton", "Clear", 2);
            if i < 10 {
                r.infrastructure = InfrastructureFlags::empty().with(InfrastructureFeature::Crossing);
            }
            r.sunrise_sunset = if i < 4 || i == 11 {
                DayPhase::Night
            } else {
                DayPhase::Day
            };
            records.push(r);
        }

        let ratios = night_ratio_by_feature(&table_of(records), &RecordFilter::new());
        let crossing = ratio_for(&ratios, InfrastructureFeature::Crossing);

        assert_eq!(crossing.count, 10);
        assert_eq!(crossing.night_count, 4);
        assert_eq!(crossing.night_percentage, 40.0);
        assert_eq!(ratios[0].feature, InfrastructureFeature::Crossing);
    }

    #[test]
    fn test_unflagged_features_are_omitted() {
        let mut signal = record("OH", "Dayton", "Clear", 2);
        signal.infrastructure = InfrastructureFlags::empty().with(InfrastructureFeature::TrafficSignal);
        signal.sunrise_sunset = DayPhase::Night;
        let table = table_of(vec![signal, record("OH", "Dayton", "Clear", 2)]);

        let ratios = night_ratio_by_feature(&table, &RecordFilter::new());
        assert_eq!(ratios.len(), 1);
        assert_eq!(ratios[0].feature, InfrastructureFeature::TrafficSignal);
        assert_eq!((ratios[0].count, ratios[0].night_percentage), (1, 100.0));

        let plain = table_of(vec![record("OH", "Dayton", "Clear", 2)]);
        assert!(night_ratio_by_feature(&plain, &RecordFilter::new()).is_empty());
    }

    #[test]
    fn test_ties_keep_declaration_order() {
        let mut both = record("OH", "Dayton", "Clear", 2);
        both.infrastructure = InfrastructureFlags::empty()
            .with(InfrastructureFeature::Stop)
            .with(InfrastructureFeature::Bump);
        let table = table_of(vec![both]);

        let ratios = night_ratio_by_feature(&table, &RecordFilter::new());
        let features: Vec<_> = ratios.iter().map(|r| r.feature).collect();
        assert_eq!(
            features,
            vec![InfrastructureFeature::Bump, InfrastructureFeature::Stop]
        );
        assert!(ratios.iter().all(|r| r.night_percentage == 0.0));
    }

    #[test]
    fn test_empty_table_and_filter() {
        assert!(night_ratio_by_feature(&table_of(vec![]), &RecordFilter::new()).is_empty());

        let mut stop = record("CA", "Fresno", "Rain", 3);
        stop.infrastructure = InfrastructureFlags::empty().with(InfrastructureFeature::Stop);
        stop.sunrise_sunset = DayPhase::Night;
        let table = table_of(vec![stop, record("OH", "Dayton", "Clear", 2)]);

        let only_ohio = RecordFilter::new().with_states(["OH"]);
        assert!(night_ratio_by_feature(&table, &only_ohio).is_empty());

        let ratios = night_ratio_by_feature(&table, &RecordFilter::new());
        let stop = ratio_for(&ratios, InfrastructureFeature::Stop);
        assert_eq!((stop.count, stop.night_percentage), (1, 100.0));
    }
}
