use crate::models::{AccidentRecord, AccidentTable, Severity};
use serde::{Deserialize, Serialize};

/// Inclusion predicates supplied by the presentation layer. An empty set
/// leaves that column unconstrained.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordFilter {
    #[serde(default)]
    pub states: Vec<String>,
    #[serde(default)]
    pub cities: Vec<String>,
    #[serde(default)]
    pub severities: Vec<Severity>,
    #[serde(default)]
    pub weather_conditions: Vec<String>,
}

impl RecordFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_states<I, S>(mut self, states: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.states = states.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_cities<I, S>(mut self, cities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.cities = cities.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_severities<I>(mut self, severities: I) -> Self
    where
        I: IntoIterator<Item = Severity>,
    {
        self.severities = severities.into_iter().collect();
        self
    }

    pub fn with_weather_conditions<I, S>(mut self, conditions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.weather_conditions = conditions.into_iter().map(Into::into).collect();
        self
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
            && self.cities.is_empty()
            && self.severities.is_empty()
            && self.weather_conditions.is_empty()
    }

    pub fn matches(&self, record: &AccidentRecord) -> bool {
        (self.states.is_empty() || self.states.contains(&record.state))
            && (self.cities.is_empty() || self.cities.contains(&record.city))
            && (self.severities.is_empty() || self.severities.contains(&record.severity))
            && (self.weather_conditions.is_empty()
                || self.weather_conditions.contains(&record.weather_condition))
    }

    /// Rows of `table` that pass the filter, in table order.
    pub fn apply<'a>(
        &'a self,
        table: &'a AccidentTable,
    ) -> impl Iterator<Item = &'a AccidentRecord> + 'a {
        table.iter().filter(move |record| self.matches(record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DayPhase, InfrastructureFlags, Schema};

    fn record(state: &str, city: &str, weather: &str, severity: u8) -> AccidentRecord {
        AccidentRecord {
            state: state.to_string(),
            city: city.to_string(),
            weather_condition: weather.to_string(),
            severity: Severity::new(severity).unwrap(),
            temperature_f: None,
            humidity_pct: None,
            visibility_mi: None,
            start_time: None,
            year_month: None,
            infrastructure: InfrastructureFlags::empty(),
            sunrise_sunset: DayPhase::Unknown,
        }
    }

    fn sample_table() -> AccidentTable {
        AccidentTable::new(
            Schema::full(),
            vec![
                record("OH", "Dayton", "Rain", 2),
                record("CA", "Fresno", "Clear", 3),
                record("CA", "Los Angeles", "Clear", 2),
                record("TX", "Austin", "Fog", 4),
            ],
        )
    }

    #[test]
    fn test_empty_filter_passes_everything() {
        let table = sample_table();
        let filter = RecordFilter::new();
        assert!(filter.is_empty());
        assert_eq!(filter.apply(&table).count(), 4);
    }

    #[test]
    fn test_filters_combine_with_and() {
        let table = sample_table();
        let filter = RecordFilter::new()
            .with_states(["CA", "TX"])
            .with_severities([Severity::new(2).unwrap(), Severity::new(4).unwrap()]);

        let cities: Vec<&str> = filter.apply(&table).map(|r| r.city.as_str()).collect();
        assert_eq!(cities, vec!["Los Angeles", "Austin"]);
    }

    #[test]
    fn test_city_and_weather_filters() {
        let table = sample_table();
        let filter = RecordFilter::new()
            .with_weather_conditions(["Clear"])
            .with_cities(["Fresno"]);
        assert_eq!(filter.apply(&table).count(), 1);

        let none = RecordFilter::new().with_states(["WA"]);
        assert_eq!(none.apply(&table).count(), 0);
    }
}
