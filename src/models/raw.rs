use crate::models::accident::{ClimateVariable, DayPhase};
use crate::models::infrastructure::{InfrastructureFeature, InfrastructureFlags};
use crate::models::table::AccidentTable;

/// Which optional columns the source file carried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    pub climate: Vec<ClimateVariable>,
    pub features: InfrastructureFlags,
    pub has_sunrise_sunset: bool,
}

impl Schema {
    /// Every allowlisted column present.
    pub fn full() -> Self {
        Self {
            climate: ClimateVariable::ALL.to_vec(),
            features: InfrastructureFlags::all(),
            has_sunrise_sunset: true,
        }
    }

    pub fn has_climate(&self, variable: ClimateVariable) -> bool {
        self.climate.contains(&variable)
    }
}

impl Default for Schema {
    fn default() -> Self {
        Self::full()
    }
}

/// One sampled row as read from the file. Empty fields are `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRecord {
    pub state: Option<String>,
    pub city: Option<String>,
    pub weather_condition: Option<String>,
    pub severity: Option<String>,
    pub temperature_f: Option<String>,
    pub humidity_pct: Option<String>,
    pub visibility_mi: Option<String>,
    pub start_time: Option<String>,
    pub sunrise_sunset: Option<String>,
    pub flags: [Option<String>; 13],
}

impl RawRecord {
    pub fn climate(&self, variable: ClimateVariable) -> Option<&str> {
        match variable {
            ClimateVariable::Temperature => self.temperature_f.as_deref(),
            ClimateVariable::Humidity => self.humidity_pct.as_deref(),
            ClimateVariable::Visibility => self.visibility_mi.as_deref(),
        }
    }

    pub fn climate_mut(&mut self, variable: ClimateVariable) -> &mut Option<String> {
        match variable {
            ClimateVariable::Temperature => &mut self.temperature_f,
            ClimateVariable::Humidity => &mut self.humidity_pct,
            ClimateVariable::Visibility => &mut self.visibility_mi,
        }
    }

    pub fn flag(&self, feature: InfrastructureFeature) -> Option<&str> {
        self.flags[feature.index()].as_deref()
    }

    pub fn set_flag(&mut self, feature: InfrastructureFeature, value: Option<String>) {
        self.flags[feature.index()] = value;
    }
}

/// Sampled, uncleaned table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub schema: Schema,
    pub records: Vec<RawRecord>,
}

impl RawTable {
    pub fn new(schema: Schema, records: Vec<RawRecord>) -> Self {
        Self { schema, records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Renders a cleaned table back into raw text so it can be cleaned again.
impl From<&AccidentTable> for RawTable {
    fn from(table: &AccidentTable) -> Self {
        let schema = table.schema().clone();
        let records = table
            .iter()
            .map(|record| {
                let mut raw = RawRecord {
                    state: Some(record.state.clone()),
                    city: Some(record.city.clone()),
                    weather_condition: Some(record.weather_condition.clone()),
                    severity: Some(record.severity.to_string()),
                    temperature_f: record.temperature_f.map(|v| v.to_string()),
                    humidity_pct: record.humidity_pct.map(|v| v.to_string()),
                    visibility_mi: record.visibility_mi.map(|v| v.to_string()),
                    start_time: record
                        .start_time
                        .map(|t| t.format("%Y-%m-%d %H:%M:%S%.f").to_string()),
                    sunrise_sunset: None,
                    flags: Default::default(),
                };
                if schema.has_sunrise_sunset && record.sunrise_sunset != DayPhase::Unknown {
                    raw.sunrise_sunset = Some(record.sunrise_sunset.as_str().to_string());
                }
                for feature in schema.features.iter() {
                    let value = if record.has_feature(feature) {
                        "True"
                    } else {
                        "False"
                    };
                    raw.set_flag(feature, Some(value.to_string()));
                }
                raw
            })
            .collect();

        RawTable::new(schema, records)
    }
}
