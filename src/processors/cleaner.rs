use crate::models::infrastructure::parse_flag;
use crate::models::{
    AccidentRecord, AccidentTable, ClimateVariable, DayPhase, InfrastructureFlags, RawRecord,
    RawTable, Schema, Severity, YearMonth,
};
use crate::utils::constants::MISSING_PLACEHOLDERS;
use crate::utils::datetime::parse_flexible_datetime;
use crate::utils::stats::median;
use serde::Serialize;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanOptions {
    /// Drop rows whose `Start_Time` does not parse.
    pub strict_dates: bool,
}

/// How one climate column was back-filled.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClimateFill {
    pub variable: ClimateVariable,
    pub median: Option<f64>,
    pub filled: usize,
}

/// Row accounting for one cleaning pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CleanReport {
    pub input_rows: usize,
    pub output_rows: usize,
    pub dropped_missing_required: usize,
    pub dropped_placeholder_text: usize,
    pub dropped_invalid_severity: usize,
    pub dropped_invalid_start_time: usize,
    pub unparsed_start_times: usize,
    pub climate_fills: Vec<ClimateFill>,
}

impl CleanReport {
    pub fn dropped_rows(&self) -> usize {
        self.input_rows - self.output_rows
    }

    pub fn summary(&self) -> String {
        let mut summary = String::new();

        summary.push_str("=== Cleaning Report ===\n");
        summary.push_str(&format!("Input Rows: {}\n", self.input_rows));
        summary.push_str(&format!("Output Rows: {}\n", self.output_rows));
        summary.push_str(&format!(
            "Dropped (missing State/Weather/Severity): {}\n",
            self.dropped_missing_required
        ));
        summary.push_str(&format!(
            "Dropped (empty City/Weather text): {}\n",
            self.dropped_placeholder_text
        ));
        summary.push_str(&format!(
            "Dropped (invalid Severity): {}\n",
            self.dropped_invalid_severity
        ));
        summary.push_str(&format!(
            "Dropped (unparseable Start_Time): {}\n",
            self.dropped_invalid_start_time
        ));
        summary.push_str(&format!(
            "Unparsed Start_Time kept: {}\n",
            self.unparsed_start_times
        ));
        for fill in &self.climate_fills {
            match fill.median {
                Some(m) => summary.push_str(&format!(
                    "Filled {} missing {} with median {:.2}\n",
                    fill.filled,
                    fill.variable.column_name(),
                    m
                )),
                None => summary.push_str(&format!(
                    "{} has no valid readings; left empty\n",
                    fill.variable.column_name()
                )),
            }
        }

        summary
    }
}

/// Turns a sampled raw table into typed records. Never fails on bad rows;
/// they are dropped and counted.
pub struct Cleaner {
    options: CleanOptions,
}

impl Cleaner {
    pub fn new() -> Self {
        Self {
            options: CleanOptions::default(),
        }
    }

    pub fn with_options(options: CleanOptions) -> Self {
        Self { options }
    }

    pub fn with_strict_dates(strict_dates: bool) -> Self {
        Self {
            options: CleanOptions { strict_dates },
        }
    }

    pub fn options(&self) -> CleanOptions {
        self.options
    }

    pub fn clean_table(&self, raw: &RawTable) -> AccidentTable {
        self.clean(raw).0
    }

    pub fn clean(&self, raw: &RawTable) -> (AccidentTable, CleanReport) {
        let schema = &raw.schema;
        let mut report = CleanReport {
            input_rows: raw.len(),
            ..Default::default()
        };

        let mut records: Vec<AccidentRecord> = raw
            .records
            .iter()
            .filter_map(|row| self.clean_row(row, schema, &mut report))
            .collect();

        // Medians come from the surviving rows only.
        for variable in ClimateVariable::ALL {
            if !schema.has_climate(variable) {
                continue;
            }
            let column_median = median(records.iter().filter_map(|r| r.climate(variable)));
            let mut filled = 0;
            if let Some(m) = column_median {
                for record in records.iter_mut() {
                    let slot = record.climate_mut(variable);
                    if slot.is_none() {
                        *slot = Some(m);
                        filled += 1;
                    }
                }
            }
            debug!(
                column = variable.column_name(),
                median = ?column_median,
                filled,
                "back-filled climate column"
            );
            report.climate_fills.push(ClimateFill {
                variable,
                median: column_median,
                filled,
            });
        }

        report.output_rows = records.len();
        info!(
            input = report.input_rows,
            output = report.output_rows,
            dropped = report.dropped_rows(),
            "cleaned accident sample"
        );

        (AccidentTable::new(schema.clone(), records), report)
    }

    fn clean_row(
        &self,
        row: &RawRecord,
        schema: &Schema,
        report: &mut CleanReport,
    ) -> Option<AccidentRecord> {
        let (Some(state), Some(weather), Some(severity)) = (
            row.state.as_deref(),
            row.weather_condition.as_deref(),
            row.severity.as_deref(),
        ) else {
            report.dropped_missing_required += 1;
            return None;
        };

        let (Some(city), Some(weather_condition)) =
            (normalize_text(row.city.as_deref()), normalize_text(Some(weather)))
        else {
            report.dropped_placeholder_text += 1;
            return None;
        };

        let Some(severity) = Severity::parse(severity) else {
            report.dropped_invalid_severity += 1;
            return None;
        };

        let start_time = row.start_time.as_deref().and_then(parse_flexible_datetime);
        if start_time.is_none() {
            if self.options.strict_dates {
                report.dropped_invalid_start_time += 1;
                return None;
            }
            report.unparsed_start_times += 1;
        }

        let mut infrastructure = InfrastructureFlags::empty();
        for feature in schema.features.iter() {
            infrastructure.set(feature, row.flag(feature).is_some_and(parse_flag));
        }

        let sunrise_sunset = if schema.has_sunrise_sunset {
            row.sunrise_sunset
                .as_deref()
                .map(DayPhase::parse)
                .unwrap_or_default()
        } else {
            DayPhase::Unknown
        };

        let climate = |variable: ClimateVariable| {
            if schema.has_climate(variable) {
                row.climate(variable).and_then(parse_number)
            } else {
                None
            }
        };

        Some(AccidentRecord {
            state: state.to_string(),
            city,
            weather_condition,
            severity,
            temperature_f: climate(ClimateVariable::Temperature),
            humidity_pct: climate(ClimateVariable::Humidity),
            visibility_mi: climate(ClimateVariable::Visibility),
            start_time,
            year_month: start_time.as_ref().map(YearMonth::from_datetime),
            infrastructure,
            sunrise_sunset,
        })
    }
}

impl Default for Cleaner {
    fn default() -> Self {
        Self::new()
    }
}

/// Trimmed text, or `None` when empty or a stringified missing value.
fn normalize_text(value: Option<&str>) -> Option<String> {
    let text = value?.trim();
    if text.is_empty() || MISSING_PLACEHOLDERS.contains(&text) {
        None
    } else {
        Some(text.to_string())
    }
}

fn parse_number(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::InfrastructureFeature;
    use pretty_assertions::assert_eq;
    use validator::Validate;

    fn raw(state: Option<&str>, city: &str, weather: Option<&str>, severity: &str) -> RawRecord {
        RawRecord {
            state: state.map(String::from),
            city: Some(city.to_string()),
            weather_condition: weather.map(String::from),
            severity: Some(severity.to_string()),
            start_time: Some("2016-02-08 05:46:00".to_string()),
            ..Default::default()
        }
    }

    fn table(records: Vec<RawRecord>) -> RawTable {
        RawTable::new(Schema::full(), records)
    }

    #[test]
    fn test_drops_bad_severity_and_missing_state() {
        let input = table(vec![
            raw(Some("OH"), "Dayton", Some("Rain"), "2"),
            raw(Some("CA"), "Fresno", Some("Clear"), "3"),
            raw(Some("TX"), "Austin", Some("Clear"), "N/A"),
            raw(None, "Miami", Some("Fog"), "1"),
            raw(Some("NY"), "Albany", Some("Snow"), "4"),
        ]);

        let (cleaned, report) = Cleaner::new().clean(&input);

        let states: Vec<&str> = cleaned.iter().map(|r| r.state.as_str()).collect();
        assert_eq!(states, vec!["OH", "CA", "NY"]);
        assert_eq!(report.dropped_invalid_severity, 1);
        assert_eq!(report.dropped_missing_required, 1);
        assert_eq!(report.dropped_rows(), 2);
    }

    #[test]
    fn test_placeholder_text_is_dropped() {
        let input = table(vec![
            raw(Some("OH"), "  Dayton ", Some(" Rain "), "2"),
            raw(Some("OH"), "nan", Some("Rain"), "2"),
            raw(Some("OH"), "Dayton", Some("   "), "2"),
            RawRecord {
                city: None,
                ..raw(Some("OH"), "", Some("Rain"), "2")
            },
        ]);

        let (cleaned, report) = Cleaner::new().clean(&input);

        assert_eq!(cleaned.len(), 1);
        assert_eq!(cleaned.records()[0].city, "Dayton");
        assert_eq!(cleaned.records()[0].weather_condition, "Rain");
        assert_eq!(report.dropped_placeholder_text, 3);
    }

    #[test]
    fn test_median_fill_uses_surviving_rows() {
        let mut rows = vec![
            raw(Some("OH"), "Dayton", Some("Rain"), "2"),
            raw(Some("OH"), "Dayton", Some("Rain"), "2"),
            raw(Some("OH"), "Dayton", Some("Rain"), "2"),
            raw(Some("OH"), "Dayton", Some("Rain"), "bad"),
        ];
        rows[0].temperature_f = Some("10".to_string());
        rows[1].temperature_f = Some("not a number".to_string());
        rows[2].temperature_f = Some("30".to_string());
        rows[3].temperature_f = Some("1000".to_string());

        let (cleaned, report) = Cleaner::new().clean(&table(rows));

        let temps: Vec<Option<f64>> = cleaned.iter().map(|r| r.temperature_f).collect();
        assert_eq!(temps, vec![Some(10.0), Some(20.0), Some(30.0)]);

        let fill = &report.climate_fills[0];
        assert_eq!(fill.variable, ClimateVariable::Temperature);
        assert_eq!(fill.median, Some(20.0));
        assert_eq!(fill.filled, 1);
    }

    #[test]
    fn test_absent_climate_column_stays_empty() {
        let mut schema = Schema::full();
        schema.climate = vec![ClimateVariable::Humidity];
        let mut row = raw(Some("OH"), "Dayton", Some("Rain"), "2");
        row.temperature_f = Some("50".to_string());
        row.humidity_pct = Some("80".to_string());

        let (cleaned, report) = Cleaner::new().clean(&RawTable::new(schema, vec![row]));

        assert_eq!(cleaned.records()[0].temperature_f, None);
        assert_eq!(cleaned.records()[0].humidity_pct, Some(80.0));
        assert_eq!(report.climate_fills.len(), 1);
    }

    #[test]
    fn test_flags_and_day_phase_defaults() {
        let mut row = raw(Some("OH"), "Dayton", Some("Rain"), "2");
        row.set_flag(InfrastructureFeature::Crossing, Some("True".to_string()));
        row.set_flag(InfrastructureFeature::Stop, Some("False".to_string()));

        let cleaned = Cleaner::new().clean_table(&table(vec![row]));
        let record = &cleaned.records()[0];

        assert!(record.has_feature(InfrastructureFeature::Crossing));
        assert!(!record.has_feature(InfrastructureFeature::Stop));
        assert!(!record.has_feature(InfrastructureFeature::Junction));
        assert_eq!(record.sunrise_sunset, DayPhase::Unknown);
    }

    #[test]
    fn test_strict_dates_drop_unparseable_rows() {
        let mut rows = vec![
            raw(Some("OH"), "Dayton", Some("Rain"), "2"),
            raw(Some("OH"), "Dayton", Some("Rain"), "2"),
        ];
        rows[1].start_time = Some("sometime in spring".to_string());

        let (lenient, lenient_report) = Cleaner::new().clean(&table(rows.clone()));
        assert_eq!(lenient.len(), 2);
        assert_eq!(lenient.records()[1].year_month, None);
        assert_eq!(lenient_report.unparsed_start_times, 1);

        let (strict, strict_report) = Cleaner::with_strict_dates(true).clean(&table(rows));
        assert_eq!(strict.len(), 1);
        assert_eq!(strict_report.dropped_invalid_start_time, 1);
        assert_eq!(
            strict.records()[0].year_month.map(|ym| ym.to_string()),
            Some("2016-02".to_string())
        );
    }

    #[test]
    fn test_cleaning_is_idempotent() {
        let mut rows = vec![
            raw(Some("OH"), " Dayton", Some("Light Rain"), "2.0"),
            raw(Some("CA"), "Fresno", Some("Clear"), "3"),
            raw(Some("TX"), "Austin", Some("Clear"), "1"),
            raw(Some("TX"), "nan", Some("Clear"), "1"),
        ];
        rows[0].temperature_f = Some("36.9".to_string());
        rows[1].humidity_pct = Some("91".to_string());
        rows[2].start_time = Some("2016-02-08 05:46:00.123".to_string());
        rows[1].start_time = None;
        rows[0].sunrise_sunset = Some("Night".to_string());
        rows[2].set_flag(InfrastructureFeature::TrafficSignal, Some("True".to_string()));

        let cleaner = Cleaner::new();
        let once = cleaner.clean_table(&table(rows));
        let (twice, report) = cleaner.clean(&RawTable::from(&once));

        assert_eq!(twice, once);
        assert_eq!(report.dropped_rows(), 0);
        assert!(report.climate_fills.iter().all(|f| f.filled == 0));
    }

    #[test]
    fn test_cleaned_records_validate() {
        let rows = vec![
            raw(Some("OH"), "Dayton", Some("Rain"), "4"),
            raw(Some("OH"), "Dayton", Some("Rain"), "0"),
            raw(Some("OH"), "Dayton", Some("Rain"), "7"),
        ];

        let cleaned = Cleaner::new().clean_table(&table(rows));

        assert_eq!(cleaned.len(), 1);
        assert!(cleaned.iter().all(|r| r.validate().is_ok()));
    }

    #[test]
    fn test_empty_table() {
        let (cleaned, report) = Cleaner::new().clean(&RawTable::default());
        assert!(cleaned.is_empty());
        assert_eq!(report.output_rows, 0);
        assert!(report.summary().contains("Input Rows: 0"));
    }
}
