/// Source column names
pub const COL_STATE: &str = "State";
pub const COL_CITY: &str = "City";
pub const COL_WEATHER_CONDITION: &str = "Weather_Condition";
pub const COL_SEVERITY: &str = "Severity";
pub const COL_TEMPERATURE: &str = "Temperature(F)";
pub const COL_HUMIDITY: &str = "Humidity(%)";
pub const COL_VISIBILITY: &str = "Visibility(mi)";
pub const COL_SUNRISE_SUNSET: &str = "Sunrise_Sunset";
pub const COL_START_TIME: &str = "Start_Time";

/// Columns that must be present in the input header
pub const REQUIRED_COLUMNS: [&str; 5] = [
    COL_STATE,
    COL_CITY,
    COL_WEATHER_CONDITION,
    COL_SEVERITY,
    COL_START_TIME,
];

/// Sampling defaults
pub const DEFAULT_SAMPLE_SIZE: usize = 100_000;
pub const DEFAULT_SEED: u64 = 42;
pub const DEFAULT_DELIMITER: char = ',';

/// Chart truncation defaults
pub const DEFAULT_WEATHER_TOP_N: usize = 15;
pub const DEFAULT_CITY_TOP_N: usize = 20;
pub const DEFAULT_STATE_TOP_N: usize = 5;

/// Severity bounds
pub const MIN_SEVERITY: u8 = 1;
pub const MAX_SEVERITY: u8 = 4;

/// Text produced when a missing value is stringified
pub const MISSING_PLACEHOLDERS: [&str; 5] = ["nan", "NaN", "None", "null", "<NA>"];

/// Settings
pub const DEFAULT_CONFIG_FILE: &str = "accident-insights";
pub const ENV_PREFIX: &str = "ACCIDENTS";

pub const DEFAULT_BUFFER_SIZE: usize = 8192 * 16; // 128KB
