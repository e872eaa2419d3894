pub mod climate;
pub mod counts;
pub mod infrastructure;
pub mod summary;
pub mod trends;

pub use climate::{climate_by_severity, SeverityBoxStats};
pub use counts::{
    count_by, count_by_pair, severity_distribution, state_counts, top_cities,
    top_weather_conditions, Category, CategoryCount, PairCount, SeverityShare,
};
pub use infrastructure::{night_ratio_by_feature, FeatureNightRatio};
pub use summary::{filter_options, summary_metrics, FilterOptions, SummaryMetrics};
pub use trends::{monthly_counts, trend_summary, MonthlyCount, TrendSummary};

#[cfg(test)]
pub(crate) mod test_support {
    use crate::models::{
        AccidentRecord, AccidentTable, DayPhase, InfrastructureFlags, Schema, Severity, YearMonth,
    };
    use crate::utils::datetime::parse_flexible_datetime;

    pub fn record(state: &str, city: &str, weather: &str, severity: u8) -> AccidentRecord {
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

    pub fn record_at(start_time: &str) -> AccidentRecord {
        let start_time = parse_flexible_datetime(start_time).unwrap();
        AccidentRecord {
            start_time: Some(start_time),
            year_month: Some(YearMonth::from_datetime(&start_time)),
            ..record("OH", "Dayton", "Clear", 2)
        }
    }

    pub fn table_of(records: Vec<AccidentRecord>) -> AccidentTable {
        AccidentTable::new(Schema::full(), records)
    }
}
