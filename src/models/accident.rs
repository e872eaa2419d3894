use chrono::{Datelike, NaiveDateTime};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use validator::{Validate, ValidationError};

use crate::models::infrastructure::{InfrastructureFeature, InfrastructureFlags};
use crate::utils::constants::{
    COL_HUMIDITY, COL_TEMPERATURE, COL_VISIBILITY, MAX_SEVERITY, MIN_SEVERITY,
};

/// Ordinal accident impact, 1 (minor) through 4 (severe).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Severity(u8);

impl Severity {
    pub const ALL: [Severity; 4] = [Severity(1), Severity(2), Severity(3), Severity(4)];

    pub fn new(level: u8) -> Option<Self> {
        (MIN_SEVERITY..=MAX_SEVERITY)
            .contains(&level)
            .then_some(Self(level))
    }

    /// Numeric coercion: accepts "3", " 3 " and "3.0"; rejects fractions and
    /// levels outside 1..=4.
    pub fn parse(s: &str) -> Option<Self> {
        let value: f64 = s.trim().parse().ok()?;
        if value.fract() != 0.0 || value < MIN_SEVERITY as f64 || value > MAX_SEVERITY as f64 {
            return None;
        }
        Self::new(value as u8)
    }

    pub fn level(self) -> u8 {
        self.0
    }

    pub fn label(self) -> &'static str {
        match self.0 {
            1 => "Minor",
            2 => "Moderate",
            3 => "Serious",
            _ => "Severe",
        }
    }
}

impl TryFrom<u8> for Severity {
    type Error = String;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        Self::new(level).ok_or_else(|| format!("severity {} is outside 1..=4", level))
    }
}

impl From<Severity> for u8 {
    fn from(severity: Severity) -> Self {
        severity.0
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Light condition reported with the accident.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DayPhase {
    Day,
    Night,
    #[default]
    Unknown,
}

impl DayPhase {
    pub fn parse(s: &str) -> Self {
        match s.trim() {
            "Day" => DayPhase::Day,
            "Night" => DayPhase::Night,
            _ => DayPhase::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DayPhase::Day => "Day",
            DayPhase::Night => "Night",
            DayPhase::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for DayPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Calendar month key. Orders chronologically and renders as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn from_datetime(dt: &NaiveDateTime) -> Self {
        Self {
            year: dt.year(),
            month: dt.month(),
        }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl Serialize for YearMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Climate readings carried by each record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClimateVariable {
    Temperature,
    Humidity,
    Visibility,
}

impl ClimateVariable {
    pub const ALL: [ClimateVariable; 3] = [
        ClimateVariable::Temperature,
        ClimateVariable::Humidity,
        ClimateVariable::Visibility,
    ];

    pub fn column_name(&self) -> &'static str {
        match self {
            ClimateVariable::Temperature => COL_TEMPERATURE,
            ClimateVariable::Humidity => COL_HUMIDITY,
            ClimateVariable::Visibility => COL_VISIBILITY,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ClimateVariable::Temperature => "Temperature",
            ClimateVariable::Humidity => "Humidity",
            ClimateVariable::Visibility => "Visibility",
        }
    }

    pub fn units(&self) -> &'static str {
        match self {
            ClimateVariable::Temperature => "°F",
            ClimateVariable::Humidity => "%",
            ClimateVariable::Visibility => "mi",
        }
    }
}

impl fmt::Display for ClimateVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.display_name(), self.units())
    }
}

/// One cleaned accident observation.
#[derive(Debug, Clone, PartialEq, Serialize, Validate)]
pub struct AccidentRecord {
    #[validate(length(min = 1))]
    pub state: String,

    #[validate(length(min = 1))]
    pub city: String,

    #[validate(length(min = 1))]
    pub weather_condition: String,

    #[validate(custom(function = "validate_severity"))]
    pub severity: Severity,

    pub temperature_f: Option<f64>,
    pub humidity_pct: Option<f64>,
    pub visibility_mi: Option<f64>,

    pub start_time: Option<NaiveDateTime>,
    pub year_month: Option<YearMonth>,

    pub infrastructure: InfrastructureFlags,
    pub sunrise_sunset: DayPhase,
}

fn validate_severity(severity: &Severity) -> Result<(), ValidationError> {
    if (MIN_SEVERITY..=MAX_SEVERITY).contains(&severity.level()) {
        Ok(())
    } else {
        Err(ValidationError::new("severity_range"))
    }
}

impl AccidentRecord {
    pub fn climate(&self, variable: ClimateVariable) -> Option<f64> {
        match variable {
            ClimateVariable::Temperature => self.temperature_f,
            ClimateVariable::Humidity => self.humidity_pct,
            ClimateVariable::Visibility => self.visibility_mi,
        }
    }

    pub fn climate_mut(&mut self, variable: ClimateVariable) -> &mut Option<f64> {
        match variable {
            ClimateVariable::Temperature => &mut self.temperature_f,
            ClimateVariable::Humidity => &mut self.humidity_pct,
            ClimateVariable::Visibility => &mut self.visibility_mi,
        }
    }

    pub fn has_feature(&self, feature: InfrastructureFeature) -> bool {
        self.infrastructure.contains(feature)
    }

    pub fn is_night(&self) -> bool {
        self.sunrise_sunset == DayPhase::Night
    }
}
