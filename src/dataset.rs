use crate::error::Result;
use crate::models::AccidentTable;
use crate::processors::{CleanOptions, CleanReport, Cleaner};
use crate::readers::{AccidentReader, LoadOptions};
use crate::utils::progress::ProgressReporter;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Owns the cleaned table for one input file. The table is built on first
/// use and shared until `invalidate` is called.
#[derive(Debug)]
pub struct Dataset {
    path: PathBuf,
    load: LoadOptions,
    clean: CleanOptions,
    cached: Option<(Arc<AccidentTable>, CleanReport)>,
}

impl Dataset {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            load: LoadOptions::default(),
            clean: CleanOptions::default(),
            cached: None,
        }
    }

    pub fn with_load_options(mut self, load: LoadOptions) -> Self {
        self.load = load;
        self.cached = None;
        self
    }

    pub fn with_clean_options(mut self, clean: CleanOptions) -> Self {
        self.clean = clean;
        self.cached = None;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_loaded(&self) -> bool {
        self.cached.is_some()
    }

    /// The cleaned table, loading it if needed.
    pub fn table(&mut self, progress: Option<&ProgressReporter>) -> Result<Arc<AccidentTable>> {
        if let Some((table, _)) = &self.cached {
            debug!(path = %self.path.display(), "reusing cached accident table");
            return Ok(Arc::clone(table));
        }

        let raw = AccidentReader::with_options(self.load.clone()).load_sample(&self.path, progress)?;

        if let Some(p) = progress {
            p.set_message("Cleaning data...");
        }
        let (table, report) = Cleaner::with_options(self.clean).clean(&raw);
        let table = Arc::new(table);

        info!(rows = table.len(), "accident table ready");
        self.cached = Some((Arc::clone(&table), report));
        Ok(table)
    }

    /// Report from the most recent load, if any.
    pub fn clean_report(&self) -> Option<&CleanReport> {
        self.cached.as_ref().map(|(_, report)| report)
    }

    /// Forget the cached table so the next `table` call reloads the file.
    pub fn invalidate(&mut self) {
        if self.is_loaded() {
            debug!(path = %self.path.display(), "invalidated cached accident table");
        }
        self.cached = None;
    }
}

/// Load, sample and clean `path` with default settings.
pub fn load_and_clean(path: &Path) -> Result<AccidentTable> {
    let raw = AccidentReader::new().load_sample(path, None)?;
    Ok(Cleaner::new().clean_table(&raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProcessingError;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_csv(rows: &[&str]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "State,City,Weather_Condition,Severity,Start_Time").unwrap();
        for row in rows {
            writeln!(file, "{}", row).unwrap();
        }
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_table_is_memoized_until_invalidated() -> Result<()> {
        let mut file = write_csv(&["OH,Dayton,Rain,2,2016-02-08 05:46:00"]);
        let mut dataset = Dataset::new(file.path());
        assert!(!dataset.is_loaded());

        let first = dataset.table(None)?;
        let second = dataset.table(None)?;
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(dataset.clean_report().map(|r| r.output_rows), Some(1));

        writeln!(file, "CA,Fresno,Clear,3,2016-03-01 10:00:00")?;
        file.flush()?;
        assert_eq!(dataset.table(None)?.len(), 1);

        dataset.invalidate();
        assert!(!dataset.is_loaded());
        assert_eq!(dataset.table(None)?.len(), 2);
        Ok(())
    }

    #[test]
    fn test_options_apply_to_load() -> Result<()> {
        let file = write_csv(&[
            "OH,Dayton,Rain,2,2016-02-08 05:46:00",
            "OH,Dayton,Rain,2,not a date",
            "CA,Fresno,Clear,3,2016-03-01 10:00:00",
        ]);

        let mut strict = Dataset::new(file.path()).with_clean_options(CleanOptions {
            strict_dates: true,
        });
        assert_eq!(strict.table(None)?.len(), 2);

        let mut sampled = Dataset::new(file.path()).with_load_options(LoadOptions {
            sample_size: 1,
            ..LoadOptions::default()
        });
        assert_eq!(sampled.table(None)?.len(), 1);
        Ok(())
    }

    #[test]
    fn test_debug_output_names_path() {
        let dataset = Dataset::new("/data/US_Accidents.csv");
        let rendered = format!("{:?}", dataset);
        assert!(rendered.contains("US_Accidents.csv"));
        assert!(rendered.contains("cached: None"));
    }

    #[test]
    fn test_load_and_clean_missing_file() {
        let err = load_and_clean(Path::new("/nonexistent/accidents.csv")).unwrap_err();
        assert!(matches!(err, ProcessingError::DataUnavailable { .. }));
    }
}
