use crate::analyzers::{
    climate_by_severity, count_by, count_by_pair, filter_options, monthly_counts,
    night_ratio_by_feature, severity_distribution, summary_metrics, top_cities,
    top_weather_conditions, trend_summary, Category, CategoryCount, MonthlyCount, SeverityShare,
    SummaryMetrics, TrendSummary,
};
use crate::cli::args::{Cli, Commands, DatasetArgs};
use crate::config::Settings;
use crate::dataset::Dataset;
use crate::error::{ProcessingError, Result};
use crate::models::ClimateVariable;
use crate::processors::CleanReport;
use crate::utils::progress::ProgressReporter;
use serde::Serialize;
use tracing::debug;

#[derive(Serialize)]
struct SummaryOutput {
    metrics: SummaryMetrics,
    severity_distribution: Vec<SeverityShare>,
    top_states: Vec<CategoryCount>,
    top_weather_conditions: Vec<CategoryCount>,
    top_cities: Vec<CategoryCount>,
    cleaning: Option<CleanReport>,
}

#[derive(Serialize)]
struct TrendOutput {
    months: Vec<MonthlyCount>,
    summary: Option<TrendSummary>,
}

pub fn run(cli: Cli) -> Result<()> {
    let settings = Settings::load(cli.config.as_deref())?;
    debug!(?settings, "settings loaded");

    let args = cli.command.dataset_args().clone();
    let mut dataset = open_dataset(&settings, &args)?;

    let progress = ProgressReporter::new_spinner("Loading accidents...", args.json);
    let table = dataset.table(Some(&progress))?;
    progress.finish_with_message(&format!("Loaded {} accidents", table.len()));

    match cli.command {
        Commands::Summary { dataset: _, filter } => {
            let filter = filter.to_filter();
            let output = SummaryOutput {
                metrics: summary_metrics(&table, &filter),
                severity_distribution: severity_distribution(&table, &filter),
                top_states: count_by(&table, &filter, Category::State, Some(settings.state_top_n)),
                top_weather_conditions: top_weather_conditions(
                    &table,
                    &filter,
                    settings.weather_top_n,
                ),
                top_cities: top_cities(&table, &filter, settings.city_top_n),
                cleaning: dataset.clean_report().cloned(),
            };

            if args.json {
                return emit_json(&output);
            }
            print_summary(&output);
        }

        Commands::Counts {
            by,
            top,
            dataset: _,
            filter,
        } => {
            let category = Category::from(by);
            let filter = filter.to_filter();
            let counts = count_by(&table, &filter, category, top);

            if args.json {
                return emit_json(&counts);
            }
            let total = filter.apply(&table).count();
            println!("\nAccidents by {}:", category);
            print_counts(&counts, total);
        }

        Commands::Pairs {
            first,
            second,
            top,
            dataset: _,
            filter,
        } => {
            let (first, second) = (Category::from(first), Category::from(second));
            let pairs = count_by_pair(&table, &filter.to_filter(), first, second, top);

            if args.json {
                return emit_json(&pairs);
            }
            println!("\nAccidents by {} and {}:", first, second);
            for (i, pair) in pairs.iter().enumerate() {
                println!("{}. {} / {}: {}", i + 1, pair.first, pair.second, pair.count);
            }
        }

        Commands::Infrastructure { dataset: _, filter } => {
            let ratios = night_ratio_by_feature(&table, &filter.to_filter());

            if args.json {
                return emit_json(&ratios);
            }
            println!("\nInfrastructure Features (night share):");
            for ratio in &ratios {
                println!(
                    "  {:<16} {:>8} accidents, {:>6} at night ({:.1}%)",
                    ratio.feature.column_name(),
                    ratio.count,
                    ratio.night_count,
                    ratio.night_percentage
                );
            }
        }

        Commands::Trend { dataset: _, filter } => {
            let filter = filter.to_filter();
            let output = TrendOutput {
                months: monthly_counts(&table, &filter),
                summary: trend_summary(&table, &filter),
            };

            if args.json {
                return emit_json(&output);
            }
            println!("\nMonthly Accidents:");
            for month in &output.months {
                println!("  {}: {}", month.year_month, month.count);
            }
            match &output.summary {
                Some(summary) => {
                    println!("\nMonths Covered: {}", summary.months);
                    println!(
                        "Busiest Month: {} ({} accidents)",
                        summary.busiest.year_month, summary.busiest.count
                    );
                    println!(
                        "Quietest Month: {} ({} accidents)",
                        summary.quietest.year_month, summary.quietest.count
                    );
                    println!("Mean per Month: {:.1}", summary.mean_per_month);
                }
                None => println!("No dated accidents match the filter"),
            }
        }

        Commands::Climate {
            variable,
            dataset: _,
            filter,
        } => {
            let variable = ClimateVariable::from(variable);
            if !table.schema().has_climate(variable) {
                return Err(ProcessingError::InvalidFormat(format!(
                    "input has no {} column",
                    variable.column_name()
                )));
            }
            let stats = climate_by_severity(&table, &filter.to_filter(), variable);

            if args.json {
                return emit_json(&stats);
            }
            println!("\n{} by Severity:", variable);
            for s in &stats {
                println!(
                    "  {} ({} accidents): min={:.1}, q1={:.1}, median={:.1}, q3={:.1}, max={:.1}, mean={:.1}, iqr={:.1}",
                    s.severity.label(),
                    s.count,
                    s.min,
                    s.q1,
                    s.median,
                    s.q3,
                    s.max,
                    s.mean,
                    s.interquartile_range()
                );
            }
        }

        Commands::Options { dataset: _ } => {
            let options = filter_options(&table);

            if args.json {
                return emit_json(&options);
            }
            println!("\nStates ({}): {}", options.states.len(), options.states.join(", "));
            println!("Cities: {}", options.cities.len());
            println!(
                "Severities: {}",
                options
                    .severities
                    .iter()
                    .map(|s| s.to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            );
            println!(
                "Weather Conditions ({}): {}",
                options.weather_conditions.len(),
                options.weather_conditions.join(", ")
            );
        }
    }

    Ok(())
}

/// Builds the dataset handle; CLI flags win over settings.
fn open_dataset(settings: &Settings, args: &DatasetArgs) -> Result<Dataset> {
    let path = args
        .input
        .clone()
        .or_else(|| settings.input_path.clone())
        .ok_or_else(|| {
            ProcessingError::Config(
                "no input file given; pass --input or set input_path in settings".to_string(),
            )
        })?;

    let mut load = settings.load_options()?;
    if let Some(sample_size) = args.sample_size {
        if sample_size == 0 {
            return Err(ProcessingError::Config(
                "--sample-size must be at least 1".to_string(),
            ));
        }
        load.sample_size = sample_size;
    }
    if let Some(seed) = args.seed {
        load.seed = seed;
    }

    let mut clean = settings.clean_options();
    clean.strict_dates |= args.strict_dates;

    Ok(Dataset::new(path)
        .with_load_options(load)
        .with_clean_options(clean))
}

fn emit_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_counts(counts: &[CategoryCount], total: usize) {
    for (i, count) in counts.iter().enumerate() {
        println!(
            "{}. {}: {} ({:.1}%)",
            i + 1,
            count.category,
            count.count,
            count.percentage_of(total)
        );
    }
}

fn print_summary(output: &SummaryOutput) {
    println!("\n{}", output.metrics.detailed_summary());

    println!("Severity Distribution:");
    for share in &output.severity_distribution {
        println!(
            "  {}: {} ({:.1}%)",
            share.severity.label(),
            share.count,
            share.percentage
        );
    }

    let total = output.metrics.total_accidents;
    println!("\nTop {} States:", output.top_states.len());
    print_counts(&output.top_states, total);
    println!("\nTop {} Weather Conditions:", output.top_weather_conditions.len());
    print_counts(&output.top_weather_conditions, total);
    println!("\nTop {} Cities:", output.top_cities.len());
    print_counts(&output.top_cities, total);

    if let Some(report) = &output.cleaning {
        println!("\n{}", report.summary());
    }
}
