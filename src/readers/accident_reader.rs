use crate::error::{ProcessingError, Result};
use crate::models::{
    ClimateVariable, InfrastructureFeature, InfrastructureFlags, RawRecord, RawTable, Schema,
};
use crate::readers::sampler::sample_records;
use crate::utils::constants::*;
use crate::utils::progress::ProgressReporter;
use csv::{ByteRecord, ReaderBuilder};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{debug, info};

const PROGRESS_STEP: u64 = 10_000;

/// Sampling and parsing parameters for the loader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOptions {
    pub sample_size: usize,
    pub seed: u64,
    pub delimiter: u8,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            sample_size: DEFAULT_SAMPLE_SIZE,
            seed: DEFAULT_SEED,
            delimiter: DEFAULT_DELIMITER as u8,
        }
    }
}

/// Header positions of the allowlisted columns.
#[derive(Debug, Clone)]
struct ColumnIndex {
    state: usize,
    city: usize,
    weather_condition: usize,
    severity: usize,
    start_time: usize,
    temperature_f: Option<usize>,
    humidity_pct: Option<usize>,
    visibility_mi: Option<usize>,
    sunrise_sunset: Option<usize>,
    flags: [Option<usize>; 13],
}

impl ColumnIndex {
    fn resolve(headers: &ByteRecord) -> Result<(Self, Schema)> {
        let names: Vec<String> = headers
            .iter()
            .enumerate()
            .map(|(i, h)| {
                let name = String::from_utf8_lossy(h);
                if i == 0 {
                    name.trim_start_matches('\u{feff}').trim().to_string()
                } else {
                    name.trim().to_string()
                }
            })
            .collect();
        let position = |column: &str| names.iter().position(|n| n == column);

        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|column| position(**column).is_none())
            .map(|c| c.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(ProcessingError::SchemaMismatch { missing });
        }

        let required = |column: &str| {
            position(column).ok_or_else(|| ProcessingError::SchemaMismatch {
                missing: vec![column.to_string()],
            })
        };

        let mut flags = [None; 13];
        let mut features = InfrastructureFlags::empty();
        for (i, name) in names.iter().enumerate() {
            if let Some(feature) = InfrastructureFeature::from_column_name(name) {
                // first occurrence wins on duplicate headers
                if flags[feature.index()].is_none() {
                    flags[feature.index()] = Some(i);
                    features.set(feature, true);
                }
            }
        }

        let index = Self {
            state: required(COL_STATE)?,
            city: required(COL_CITY)?,
            weather_condition: required(COL_WEATHER_CONDITION)?,
            severity: required(COL_SEVERITY)?,
            start_time: required(COL_START_TIME)?,
            temperature_f: position(COL_TEMPERATURE),
            humidity_pct: position(COL_HUMIDITY),
            visibility_mi: position(COL_VISIBILITY),
            sunrise_sunset: position(COL_SUNRISE_SUNSET),
            flags,
        };

        let climate = ClimateVariable::ALL
            .into_iter()
            .filter(|v| position(v.column_name()).is_some())
            .collect();
        let schema = Schema {
            climate,
            features,
            has_sunrise_sunset: index.sunrise_sunset.is_some(),
        };

        Ok((index, schema))
    }

    fn extract(&self, row: &ByteRecord) -> RawRecord {
        let field = |idx: Option<usize>| -> Option<String> {
            let bytes = row.get(idx?)?;
            if bytes.is_empty() {
                None
            } else {
                Some(String::from_utf8_lossy(bytes).into_owned())
            }
        };

        let mut flags: [Option<String>; 13] = Default::default();
        for (slot, idx) in flags.iter_mut().zip(self.flags.iter()) {
            *slot = field(*idx);
        }

        RawRecord {
            state: field(Some(self.state)),
            city: field(Some(self.city)),
            weather_condition: field(Some(self.weather_condition)),
            severity: field(Some(self.severity)),
            temperature_f: field(self.temperature_f),
            humidity_pct: field(self.humidity_pct),
            visibility_mi: field(self.visibility_mi),
            start_time: field(Some(self.start_time)),
            sunrise_sunset: field(self.sunrise_sunset),
            flags,
        }
    }
}

/// Reads the accident export into a raw table restricted to the allowlisted
/// columns, then draws the seeded sample.
pub struct AccidentReader {
    options: LoadOptions,
}

impl AccidentReader {
    pub fn new() -> Self {
        Self {
            options: LoadOptions::default(),
        }
    }

    pub fn with_options(options: LoadOptions) -> Self {
        Self { options }
    }

    pub fn with_sample_size(mut self, sample_size: usize) -> Self {
        self.options.sample_size = sample_size;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.options.seed = seed;
        self
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.options.delimiter = delimiter;
        self
    }

    pub fn options(&self) -> &LoadOptions {
        &self.options
    }

    /// Load the file and return the sampled raw table.
    pub fn load_sample(&self, path: &Path, progress: Option<&ProgressReporter>) -> Result<RawTable> {
        let table = self.read_all(path, progress)?;
        Ok(self.sample(table))
    }

    /// Read every row of the file without sampling.
    pub fn read_all(&self, path: &Path, progress: Option<&ProgressReporter>) -> Result<RawTable> {
        let file = File::open(path).map_err(|source| ProcessingError::DataUnavailable {
            path: path.to_path_buf(),
            source,
        })?;

        info!(path = %path.display(), "reading accident data");
        self.read_from(BufReader::with_capacity(DEFAULT_BUFFER_SIZE, file), progress)
    }

    /// Read every row from any byte source.
    pub fn read_from<R: Read>(&self, input: R, progress: Option<&ProgressReporter>) -> Result<RawTable> {
        let mut reader = ReaderBuilder::new()
            .delimiter(self.options.delimiter)
            .has_headers(true)
            .flexible(true)
            .from_reader(input);

        let (index, schema) = ColumnIndex::resolve(reader.byte_headers()?)?;
        debug!(?schema, "resolved column layout");

        if let Some(p) = progress {
            p.set_message("Reading CSV...");
        }

        let mut records = Vec::new();
        let mut row = ByteRecord::new();
        while reader.read_byte_record(&mut row)? {
            records.push(index.extract(&row));
            if records.len() as u64 % PROGRESS_STEP == 0 {
                if let Some(p) = progress {
                    p.increment(PROGRESS_STEP);
                }
            }
        }

        info!(rows = records.len(), "read accident rows");
        Ok(RawTable::new(schema, records))
    }

    /// Draw the configured sample from a fully read table.
    pub fn sample(&self, table: RawTable) -> RawTable {
        let total = table.len();
        let RawTable { schema, records } = table;
        let records = sample_records(records, self.options.sample_size, self.options.seed);
        info!(
            total,
            sampled = records.len(),
            seed = self.options.seed,
            "sampled accident rows"
        );
        RawTable::new(schema, records)
    }
}

impl Default for AccidentReader {
    fn default() -> Self {
        Self::new()
    }
}
