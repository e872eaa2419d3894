use crate::analyzers::counts::tally;
use crate::models::{AccidentTable, Severity};
use crate::processors::RecordFilter;
use crate::utils::stats::{mean, percentage};
use serde::Serialize;
use std::collections::{BTreeSet, HashSet};

/// Headline figures shown above the charts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryMetrics {
    pub total_accidents: usize,
    pub mean_severity: Option<f64>,
    pub distinct_states: usize,
    pub distinct_cities: usize,
    pub night_accidents: usize,
    pub night_percentage: f64,
    pub most_common_weather: Option<String>,
}

impl SummaryMetrics {
    pub fn detailed_summary(&self) -> String {
        let mut summary = String::new();

        summary.push_str("=== Accident Summary ===\n");
        summary.push_str(&format!("Total Accidents: {}\n", self.total_accidents));
        match self.mean_severity {
            Some(m) => summary.push_str(&format!("Mean Severity: {:.2}\n", m)),
            None => summary.push_str("Mean Severity: n/a\n"),
        }
        summary.push_str(&format!("States Affected: {}\n", self.distinct_states));
        summary.push_str(&format!("Cities Affected: {}\n", self.distinct_cities));
        summary.push_str(&format!(
            "Night Accidents: {} ({:.1}%)\n",
            self.night_accidents, self.night_percentage
        ));
        summary.push_str(&format!(
            "Most Common Weather: {}\n",
            self.most_common_weather.as_deref().unwrap_or("n/a")
        ));

        summary
    }
}

/// Values available to each sidebar filter, sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    pub states: Vec<String>,
    pub cities: Vec<String>,
    pub severities: Vec<Severity>,
    pub weather_conditions: Vec<String>,
}

pub fn summary_metrics(table: &AccidentTable, filter: &RecordFilter) -> SummaryMetrics {
    let mut total = 0;
    let mut night = 0;
    let mut states = HashSet::new();
    let mut cities = HashSet::new();
    let mut severities = Vec::new();

    for record in filter.apply(table) {
        total += 1;
        if record.is_night() {
            night += 1;
        }
        states.insert(record.state.as_str());
        cities.insert(record.city.as_str());
        severities.push(record.severity.level() as f64);
    }

    SummaryMetrics {
        total_accidents: total,
        mean_severity: mean(severities),
        distinct_states: states.len(),
        distinct_cities: cities.len(),
        night_accidents: night,
        night_percentage: percentage(night, total),
        most_common_weather: most_common_weather(table, filter),
    }
}

/// Mode of the weather column; ties go to the alphabetically first value.
fn most_common_weather(table: &AccidentTable, filter: &RecordFilter) -> Option<String> {
    let counts = tally(filter.apply(table).map(|r| r.weather_condition.as_str()));
    let top = counts.first()?.1;
    counts
        .iter()
        .take_while(|(_, count)| *count == top)
        .map(|(weather, _)| *weather)
        .min()
        .map(str::to_string)
}

pub fn filter_options(table: &AccidentTable) -> FilterOptions {
    let mut states = BTreeSet::new();
    let mut cities = BTreeSet::new();
    let mut severities = BTreeSet::new();
    let mut weather_conditions = BTreeSet::new();

    for record in table {
        states.insert(record.state.as_str());
        cities.insert(record.city.as_str());
        severities.insert(record.severity);
        weather_conditions.insert(record.weather_condition.as_str());
    }

    FilterOptions {
        states: states.into_iter().map(str::to_string).collect(),
        cities: cities.into_iter().map(str::to_string).collect(),
        severities: severities.into_iter().collect(),
        weather_conditions: weather_conditions.into_iter().map(str::to_string).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::test_support::{record, table_of};
    use crate::models::DayPhase;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_summary_metrics() {
        let mut night = record("CA", "Fresno", "Rain", 4);
        night.sunrise_sunset = DayPhase::Night;
        let table = table_of(vec![
            record("OH", "Dayton", "Fog", 1),
            record("OH", "Columbus", "Rain", 2),
            night,
            record("CA", "Fresno", "Fog", 1),
        ]);

        let metrics = summary_metrics(&table, &RecordFilter::new());
        assert_eq!(
            metrics,
            SummaryMetrics {
                total_accidents: 4,
                mean_severity: Some(2.0),
                distinct_states: 2,
                distinct_cities: 3,
                night_accidents: 1,
                night_percentage: 25.0,
                most_common_weather: Some("Fog".to_string()),
            }
        );
        assert!(metrics.detailed_summary().contains("Night Accidents: 1 (25.0%)"));
    }

    #[test]
    fn test_mode_ties_pick_alphabetical_first() {
        let table = table_of(vec![
            record("OH", "Dayton", "Rain", 1),
            record("OH", "Dayton", "Clear", 1),
        ]);
        let metrics = summary_metrics(&table, &RecordFilter::new());
        assert_eq!(metrics.most_common_weather.as_deref(), Some("Clear"));
    }

    #[test]
    fn test_empty_summary() {
        let metrics = summary_metrics(&table_of(vec![]), &RecordFilter::new());
        assert_eq!(metrics.total_accidents, 0);
        assert_eq!(metrics.mean_severity, None);
        assert_eq!(metrics.night_percentage, 0.0);
        assert_eq!(metrics.most_common_weather, None);
    }

    #[test]
    fn test_filter_options_sorted_and_distinct() {
        let table = table_of(vec![
            record("TX", "Austin", "Rain", 3),
            record("CA", "Fresno", "Clear", 1),
            record("CA", "Bakersfield", "Rain", 3),
        ]);

        let options = filter_options(&table);
        assert_eq!(options.states, vec!["CA", "TX"]);
        assert_eq!(options.cities, vec!["Austin", "Bakersfield", "Fresno"]);
        assert_eq!(
            options.severities.iter().map(|s| s.level()).collect::<Vec<_>>(),
            vec![1, 3]
        );
        assert_eq!(options.weather_conditions, vec!["Clear", "Rain"]);
    }
}
