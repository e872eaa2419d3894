use crate::analyzers::Category;
use crate::models::{ClimateVariable, Severity};
use crate::processors::RecordFilter;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "accident-insights")]
#[command(about = "Sampled cleaning and per-chart aggregates for US traffic-accident data")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(
        long,
        global = true,
        help = "Settings file (TOML, JSON or YAML) [default: ./accident-insights.toml if present]"
    )]
    pub config: Option<PathBuf>,
}

/// Where the data comes from and how it is sampled.
#[derive(Args, Debug, Clone, Default)]
pub struct DatasetArgs {
    #[arg(short, long, help = "Input CSV file [default: input_path from settings]")]
    pub input: Option<PathBuf>,

    #[arg(long, help = "Rows to sample [default: 100000]")]
    pub sample_size: Option<usize>,

    #[arg(long, help = "Sampling seed [default: 42]")]
    pub seed: Option<u64>,

    #[arg(long, help = "Drop rows whose Start_Time cannot be parsed")]
    pub strict_dates: bool,

    #[arg(long, help = "Print results as JSON")]
    pub json: bool,
}

/// Sidebar-style filters. Each flag can be repeated; an absent flag does
/// not constrain.
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    #[arg(long = "state", value_name = "STATE")]
    pub states: Vec<String>,

    #[arg(long = "city", value_name = "CITY")]
    pub cities: Vec<String>,

    #[arg(
        long = "severity",
        value_name = "LEVEL",
        value_parser = clap::value_parser!(u8).range(1..=4)
    )]
    pub severities: Vec<u8>,

    #[arg(long = "weather", value_name = "CONDITION")]
    pub weather_conditions: Vec<String>,
}

impl FilterArgs {
    pub fn to_filter(&self) -> RecordFilter {
        RecordFilter::new()
            .with_states(self.states.iter().cloned())
            .with_cities(self.cities.iter().cloned())
            .with_severities(self.severities.iter().copied().filter_map(Severity::new))
            .with_weather_conditions(self.weather_conditions.iter().cloned())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CategoryArg {
    State,
    City,
    Weather,
    Severity,
    Month,
    DayPhase,
}

impl From<CategoryArg> for Category {
    fn from(arg: CategoryArg) -> Self {
        match arg {
            CategoryArg::State => Category::State,
            CategoryArg::City => Category::City,
            CategoryArg::Weather => Category::WeatherCondition,
            CategoryArg::Severity => Category::Severity,
            CategoryArg::Month => Category::YearMonth,
            CategoryArg::DayPhase => Category::DayPhase,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ClimateArg {
    Temperature,
    Humidity,
    Visibility,
}

impl From<ClimateArg> for ClimateVariable {
    fn from(arg: ClimateArg) -> Self {
        match arg {
            ClimateArg::Temperature => ClimateVariable::Temperature,
            ClimateArg::Humidity => ClimateVariable::Humidity,
            ClimateArg::Visibility => ClimateVariable::Visibility,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Headline metrics, severity mix and top states, conditions and cities
    Summary {
        #[command(flatten)]
        dataset: DatasetArgs,

        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Accidents per value of one category, most frequent first
    Counts {
        #[arg(short, long, value_enum)]
        by: CategoryArg,

        #[arg(short, long, help = "Keep only the N most frequent values")]
        top: Option<usize>,

        #[command(flatten)]
        dataset: DatasetArgs,

        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Accidents per combination of two categories
    Pairs {
        #[arg(long, value_enum)]
        first: CategoryArg,

        #[arg(long, value_enum)]
        second: CategoryArg,

        #[arg(short, long, help = "Keep only the N most frequent pairs")]
        top: Option<usize>,

        #[command(flatten)]
        dataset: DatasetArgs,

        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Frequency and night share of each road infrastructure feature
    Infrastructure {
        #[command(flatten)]
        dataset: DatasetArgs,

        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Monthly accident series with busiest and quietest month
    Trend {
        #[command(flatten)]
        dataset: DatasetArgs,

        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Distribution of a climate reading per severity level
    Climate {
        #[arg(long, value_enum, default_value_t = ClimateArg::Temperature)]
        variable: ClimateArg,

        #[command(flatten)]
        dataset: DatasetArgs,

        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Distinct states, cities, severities and conditions available to filters
    Options {
        #[command(flatten)]
        dataset: DatasetArgs,
    },
}

impl Commands {
    pub fn dataset_args(&self) -> &DatasetArgs {
        match self {
            Commands::Summary { dataset, .. }
            | Commands::Counts { dataset, .. }
            | Commands::Pairs { dataset, .. }
            | Commands::Infrastructure { dataset, .. }
            | Commands::Trend { dataset, .. }
            | Commands::Climate { dataset, .. }
            | Commands::Options { dataset } => dataset,
        }
    }
}
