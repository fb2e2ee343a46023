use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use countryboard::app::Session;
use countryboard::constants::LIVE_ENDPOINT;
use countryboard::data::{
    ExportOptions, Fetcher, RangeFilter, RowSet, View, export, export_xlsx, map_points,
    process_chart_data, write_export,
};
use countryboard::settings::{Settings, default_settings_path};
use countryboard::types::{
    AggregationType, ChartConfig, CountryRow, Field, NumericField, SortOrder,
};

// ============================================================
// CLI
// ============================================================

#[derive(Parser)]
#[command(name = "countryboard", about = "Explore the country dataset", version)]
struct Args {
    /// Dataset URL (overrides settings).
    #[arg(long, global = true, conflicts_with = "live")]
    endpoint: Option<String>,

    /// Use the live REST API instead of the mirrored file.
    #[arg(long, global = true)]
    live: bool,

    /// Settings file (default: <config dir>/countryboard/settings.json).
    #[arg(long, global = true, value_name = "PATH", env = "COUNTRYBOARD_SETTINGS")]
    settings: Option<PathBuf>,

    /// Request timeout in seconds.
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Total attempts for transient network failures.
    #[arg(long, global = true)]
    attempts: Option<u32>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the table.
    Show {
        #[arg(long, default_value = "20")]
        limit: usize,
    },
    /// Mean, median and standard deviation of a numeric column.
    Stats {
        field: NumericField,
        /// Only rows with population at least this value.
        #[arg(long)]
        min_population: Option<f64>,
    },
    /// Print rows sorted by a column.
    Sort {
        field: Field,
        #[arg(long)]
        desc: bool,
        #[arg(long, default_value = "20")]
        limit: usize,
    },
    /// Keep rows whose column lies within [min, max].
    Filter {
        field: NumericField,
        min: f64,
        max: f64,
        /// Additional range as field:min:max (all ranges must hold).
        #[arg(long = "and", value_name = "FIELD:MIN:MAX", value_parser = parse_range)]
        and: Vec<RangeFilter>,
    },
    /// Keep rows whose column is at least a threshold.
    AtLeast { field: NumericField, threshold: f64 },
    /// Totals per region.
    Regions {
        #[arg(long, default_value = "population")]
        value: NumericField,
    },
    /// Chart series grouped by a column.
    Chart {
        group: Field,
        value: NumericField,
        #[arg(long, default_value = "sum")]
        aggregation: AggregationType,
        /// original, label-asc, label-desc, value-asc or value-desc.
        #[arg(long, default_value = "value-desc")]
        sort: SortOrder,
        #[arg(long, default_value = "12")]
        max_points: usize,
    },
    /// Countries with coordinates, for plotting on a map.
    Map,
    /// Write the table (optionally filtered) to a file.
    Export {
        path: PathBuf,
        /// Tab-separated spreadsheet instead of CSV.
        #[arg(long, conflicts_with = "xlsx")]
        spreadsheet: bool,
        /// Excel workbook (.xlsx) instead of CSV.
        #[arg(long)]
        xlsx: bool,
        /// Leave out latitude/longitude.
        #[arg(long)]
        no_coordinates: bool,
        #[arg(long)]
        min_population: Option<f64>,
    },
}

fn parse_range(s: &str) -> Result<RangeFilter, String> {
    let parts: Vec<&str> = s.split(':').collect();
    let [field, min, max] = parts.as_slice() else {
        return Err(format!("expected FIELD:MIN:MAX, got {s:?}"));
    };
    let field: NumericField = field.parse().map_err(|e| format!("{e}"))?;
    let min: f64 = min.parse().map_err(|_| format!("invalid minimum {min:?}"))?;
    let max: f64 = max.parse().map_err(|_| format!("invalid maximum {max:?}"))?;
    Ok(RangeFilter::new(field, min, max))
}

// ============================================================
// Main
// ============================================================

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("countryboard=info")),
        )
        .init();

    let settings = resolve_settings(&args)?;
    let fetcher = Fetcher::from_settings(&settings).context("failed to build HTTP client")?;
    let session = Session::load(&fetcher)
        .with_context(|| format!("failed to load dataset from {}", settings.endpoint))?;
    let table = session.table();

    match args.command {
        Command::Show { limit } => print_rows(&table.view().head(limit)),
        Command::Stats {
            field,
            min_population,
        } => {
            let view = match min_population {
                Some(threshold) => table.filter_at_least(NumericField::Population, threshold),
                None => table.view(),
            };
            let stats = view.stats(field);
            println!("column:  {}", field);
            println!("rows:    {}", stats.count);
            println!("mean:    {}", stats.mean);
            println!("median:  {}", stats.median);
            if stats.has_stddev() {
                println!("stddev:  {}", stats.stddev);
            } else {
                println!("stddev:  undefined (fewer than two values)");
            }
        }
        Command::Sort { field, desc, limit } => print_rows(&table.sort(field, !desc).head(limit)),
        Command::Filter {
            field,
            min,
            max,
            and,
        } => {
            if min > max {
                warn!(min, max, "filter: empty range, no row can match");
            }
            let mut filters = vec![RangeFilter::new(field, min, max)];
            filters.extend(and);
            print_rows(&table.filter_all(&filters));
        }
        Command::AtLeast { field, threshold } => {
            print_rows(&table.filter_at_least(field, threshold))
        }
        Command::Regions { value } => {
            for (region, total) in table.sum_by_group(Field::Region, value) {
                println!("{:<24} {}", region, total);
            }
        }
        Command::Chart {
            group,
            value,
            aggregation,
            sort,
            max_points,
        } => {
            let config = ChartConfig::new(group, value)
                .with_aggregation(aggregation)
                .with_sort_order(sort)
                .with_max_points(max_points);
            match process_chart_data(table.rows(), &config) {
                Some(chart) => {
                    println!(
                        "{} by {} ({}, {})",
                        chart.y_label,
                        chart.x_label,
                        aggregation.label(),
                        sort.label()
                    );
                    for point in &chart.points {
                        println!("{:<24} {}", point.label, point.value);
                    }
                }
                None => println!("no data"),
            }
        }
        Command::Map => {
            for point in map_points(table.rows()) {
                println!(
                    "{:<32} {:>9.3} {:>9.3} {:>12}",
                    point.name, point.latitude, point.longitude, point.population
                );
            }
        }
        Command::Export {
            path,
            spreadsheet,
            xlsx,
            no_coordinates,
            min_population,
        } => {
            let view = match min_population {
                Some(threshold) => table.filter_at_least(NumericField::Population, threshold),
                None => table.view(),
            };
            let mut options = if spreadsheet {
                ExportOptions::spreadsheet()
            } else {
                ExportOptions::csv()
            };
            if no_coordinates {
                options = options.without_coordinates();
            }
            let bytes = if xlsx {
                export_xlsx(view.rows(), &options).context("failed to build workbook")?
            } else {
                export(view.rows(), &options)
            };
            write_export(&path, &bytes)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!(rows = view.len(), path = %path.display(), "exported");
        }
    }

    Ok(())
}

fn resolve_settings(args: &Args) -> Result<Settings> {
    let mut settings = match args.settings.clone().or_else(default_settings_path) {
        Some(path) => Settings::load_from(&path)
            .with_context(|| format!("failed to load settings from {}", path.display()))?,
        None => Settings::default(),
    };
    settings
        .apply_overrides(|key| std::env::var(key).ok())
        .context("invalid environment override")?;

    if args.live {
        settings.endpoint = LIVE_ENDPOINT.to_string();
    }
    if let Some(endpoint) = &args.endpoint {
        settings.endpoint = endpoint.clone();
    }
    if let Some(timeout) = args.timeout {
        settings.timeout_secs = timeout;
    }
    if let Some(attempts) = args.attempts {
        settings.max_attempts = attempts;
    }
    settings.validate().context("invalid settings")?;

    info!(
        endpoint = %settings.endpoint,
        timeout = ?settings.timeout(),
        attempts = settings.max_attempts,
        "settings resolved"
    );
    Ok(settings)
}

fn print_rows(view: &View) {
    println!(
        "{:<32} {:<12} {:>12} {:>12} {:>7} {:>9} {:>9} {:>9} {:>9}",
        "name", "region", "population", "area", "borders", "languages", "timezones", "latitude",
        "longitude"
    );
    for row in view {
        print_row(row);
    }
    println!("({} rows)", view.len());
}

fn print_row(row: &CountryRow) {
    let coord = |v: Option<f64>| v.map(|v| format!("{:.2}", v)).unwrap_or_else(|| "-".into());
    println!(
        "{:<32} {:<12} {:>12} {:>12} {:>7} {:>9} {:>9} {:>9} {:>9}",
        row.name,
        row.region,
        row.population,
        row.area,
        row.border_count,
        row.official_language_count,
        row.timezone_count,
        coord(row.latitude),
        coord(row.longitude)
    );
}
