use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use hazard_map::config::Config;
use hazard_map::constants;
use hazard_map::observability;
use hazard_map::pipeline::{DatasetLoader, DatasetSource, FsDatasetSource, HttpDatasetSource, LoadOutcome, Pipeline};
use hazard_map::query::{self, BoundingBox, SearchCriteria};

#[derive(Parser)]
#[command(name = "hazard_map")]
#[command(about = "Normalize historical volcano, tsunami and earthquake datasets")]
#[command(version = "0.1.0")]
struct Cli {
    /// TOML file with additional deployment profiles
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory for the JSON log files
    #[arg(long, global = true, default_value = "logs")]
    log_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load one category and print the normalized records
    Load {
        /// Dataset category. Available: volcano, tsunami, earthquake
        #[arg(long)]
        category: String,
        /// Directory holding {category}_data.csv files
        #[arg(long, default_value = "data", conflicts_with = "base_url")]
        data_dir: PathBuf,
        /// Fetch {base_url}/{category}_data.csv over HTTP instead of reading files
        #[arg(long)]
        base_url: Option<String>,
        /// Deployment profile name (defaults to the config's default profile)
        #[arg(long)]
        profile: Option<String>,
        /// Print records as JSON instead of a summary
        #[arg(long)]
        json: bool,
        /// Print the number of records per year
        #[arg(long)]
        histogram: bool,
        #[arg(long)]
        min_year: Option<i32>,
        #[arg(long)]
        max_year: Option<i32>,
        /// Earliest date (YYYY-MM-DD); records without a full date are excluded
        #[arg(long)]
        min_date: Option<NaiveDate>,
        /// Latest date (YYYY-MM-DD); records without a full date are excluded
        #[arg(long)]
        max_date: Option<NaiveDate>,
        #[arg(long)]
        min_magnitude: Option<f64>,
        #[arg(long)]
        max_magnitude: Option<f64>,
        #[arg(long)]
        min_vei: Option<i32>,
        /// Minimum volcano elevation in meters
        #[arg(long)]
        min_elevation: Option<f64>,
        /// Minimum tsunami maximum water height in meters
        #[arg(long)]
        min_water_height: Option<f64>,
        /// Minimum number of tsunami runups
        #[arg(long)]
        min_runups: Option<i64>,
        #[arg(long, allow_hyphen_values = true)]
        min_lat: Option<f64>,
        #[arg(long, allow_hyphen_values = true)]
        max_lat: Option<f64>,
        #[arg(long, allow_hyphen_values = true)]
        min_lon: Option<f64>,
        #[arg(long, allow_hyphen_values = true)]
        max_lon: Option<f64>,
        /// 1-based page number
        #[arg(long, default_value_t = 1)]
        page: usize,
        #[arg(long, default_value_t = constants::DEFAULT_PAGE_SIZE)]
        size: usize,
    },
    /// List the available deployment profiles
    Profiles,
}

fn load_config(path: Option<&PathBuf>) -> Result<Config> {
    match path {
        Some(path) => Config::load(path).with_context(|| format!("loading {}", path.display())),
        None => Ok(Config::builtin()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _log_guard = observability::init_logging(&cli.log_dir);

    let config = load_config(cli.config.as_ref())?;

    match cli.command {
        Commands::Profiles => {
            for name in config.profile_names() {
                let profile = config.profile(Some(name))?;
                let marker = if name == config.default_profile { "*" } else { " " };
                println!("{} {}", marker, name);
                for category in hazard_map::Category::ALL {
                    let p = profile.for_category(category);
                    println!(
                        "    {:<10} {}-{}  {:?}",
                        category.as_str(),
                        p.window.min_year,
                        p.window.max_year,
                        p.ranking
                    );
                }
            }
        }
        Commands::Load {
            category,
            data_dir,
            base_url,
            profile,
            json,
            histogram,
            min_year,
            max_year,
            min_date,
            max_date,
            min_magnitude,
            max_magnitude,
            min_vei,
            min_elevation,
            min_water_height,
            min_runups,
            min_lat,
            max_lat,
            min_lon,
            max_lon,
            page,
            size,
        } => {
            let profile = config.profile(profile.as_deref())?.clone();
            info!("Using profile {}", profile.name);

            let source: Arc<dyn DatasetSource> = match base_url {
                Some(url) => Arc::new(HttpDatasetSource::new(url)?),
                None => Arc::new(FsDatasetSource::new(data_dir)),
            };
            let loader = DatasetLoader::new(source, Arc::new(Pipeline::new(profile)));

            let set = match loader.load(&category).await {
                LoadOutcome::Applied(set) => set,
                LoadOutcome::Rejected => {
                    warn!("Unknown category specified");
                    anyhow::bail!(
                        "unknown category '{}'; available: {}",
                        category,
                        constants::get_supported_categories().join(", ")
                    );
                }
                LoadOutcome::Stale { token } => {
                    anyhow::bail!("load {} was superseded", token);
                }
            };

            let bounds = BoundingBox {
                min_latitude: min_lat,
                min_longitude: min_lon,
                max_latitude: max_lat,
                max_longitude: max_lon,
            };
            let criteria = SearchCriteria {
                min_year,
                max_year,
                min_date,
                max_date,
                min_magnitude,
                max_magnitude,
                min_vei,
                min_elevation,
                min_max_water_height: min_water_height,
                min_num_runups: min_runups,
                bounds: (!bounds.is_unbounded()).then_some(bounds),
            };
            let matching: Vec<_> = criteria.apply(&set.records).into_iter().cloned().collect();
            let results = query::paginate(&matching, page, size);

            if json {
                println!("{}", serde_json::to_string_pretty(&results)?);
            } else {
                let (mapped, total) = set.coordinate_summary();
                println!("📊 {} records ({} mappable)", total, mapped);
                println!(
                    "   Matching: {}  Page {}/{}",
                    results.total_items, results.page, results.total_pages
                );
                for record in &results.items {
                    let place = record
                        .common
                        .location
                        .as_deref()
                        .or(record.common.country.as_deref())
                        .unwrap_or("unknown");
                    match record.magnitude() {
                        Some(m) => println!("   {}  M{:<4} {}", record.year(), m, place),
                        None => println!("   {}  {}", record.year(), place),
                    }
                }
            }

            if histogram {
                println!("\nRecords per year:");
                for (year, count) in query::year_counts(&matching) {
                    println!("   {} {}", year, count);
                }
            }
        }
    }

    Ok(())
}
