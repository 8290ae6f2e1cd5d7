use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use url::Url;

use splitscope::api::state::AppState;
use splitscope::cohort::filter_cohort;
use splitscope::compare::{checkpoint_pace_samples, compare};
use splitscope::config::AppConfig;
use splitscope::fetch::{DataProvider, HttpDataProvider, LocalDataProvider};
use splitscope::models::{FilterSpec, GenderFilter};
use splitscope::store::{EventKey, RecordStore};
use splitscope::{format_hms, format_pace};

#[derive(Parser)]
#[command(name = "splitscope")]
#[command(about = "Ski race results explorer with checkpoint split analytics")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve {
        /// Bind address (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port number (overrides config)
        #[arg(long)]
        port: Option<u16>,
    },

    /// List available events
    Events,

    /// Show aggregate statistics for one event
    Stats {
        /// Event year
        #[arg(long)]
        year: u16,

        /// Event id (e.g. "VL_90")
        #[arg(long)]
        event: String,
    },

    /// Look up an athlete and compare against a cohort
    Athlete {
        /// Event year
        #[arg(long)]
        year: u16,

        /// Event id (e.g. "VL_90")
        #[arg(long)]
        event: String,

        /// Bib number
        #[arg(long)]
        bib: String,

        /// Restrict the cohort to one gender ("male" or "female")
        #[arg(long)]
        gender: Option<String>,

        /// Comma-separated start groups to compare against
        #[arg(long)]
        start_groups: Option<String>,

        /// Comma-separated age categories to compare against
        #[arg(long)]
        age_groups: Option<String>,

        /// Include non-finishers in the cohort
        #[arg(long)]
        include_dnf: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    if cli.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    tracing::info!("Starting splitscope v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config(&cli.config)?;
    let provider = build_provider(&config)?;

    match cli.command {
        Commands::Serve { host, port } => {
            let state = AppState::new(provider, config.course_catalog());
            let app = splitscope::api::build_router(state);

            let host = host.unwrap_or(config.server.host);
            let port = port.unwrap_or(config.server.port);
            let addr = format!("{}:{}", host, port);
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!("Listening on http://{}", addr);
            axum::serve(listener, app).await?;
        }

        Commands::Events => {
            let index = provider.event_index().await?;
            for (year, events) in index.iter().rev() {
                for (event_id, label) in events {
                    println!("{}  {:12}  {}", year, event_id, label);
                }
            }
        }

        Commands::Stats { year, event } => {
            let key = EventKey::new(year, event);
            let store = RecordStore::load(provider.as_ref(), &config.course_catalog(), key).await?;

            println!("Event {} — {} participants", store.key(), store.len());
            println!(
                "  Finishers: {}   DNF: {}",
                store.finisher_count(),
                store.statistics().dnf_count
            );

            if let Some(finish) = &store.statistics().finish_times {
                println!(
                    "  Finish times: fastest {}  average {}  slowest {}",
                    format_hms(finish.min as u64),
                    format_hms(finish.avg as u64),
                    format_hms(finish.max as u64),
                );
            }
            if let Some(paces) = &store.statistics().paces {
                println!(
                    "  Pace (per km): fastest {}  average {}",
                    format_pace(paces.min),
                    format_pace(paces.avg),
                );
            }

            let mut checkpoints: Vec<_> = store.statistics().checkpoint_stats.iter().collect();
            checkpoints.sort_by(|a, b| a.1.min.total_cmp(&b.1.min));
            for (name, summary) in checkpoints {
                println!(
                    "  {:20} reached by {:6}  fastest {}",
                    name,
                    summary.count,
                    format_hms(summary.min as u64),
                );
            }
        }

        Commands::Athlete {
            year,
            event,
            bib,
            gender,
            start_groups,
            age_groups,
            include_dnf,
        } => {
            let key = EventKey::new(year, event);
            let store = RecordStore::load(provider.as_ref(), &config.course_catalog(), key).await?;

            let target = store
                .participant_by_bib(&bib)
                .with_context(|| format!("no athlete with bib {} in {}", bib, store.key()))?;

            println!("{} — {}", target.name, store.key());
            println!(
                "  Bib {}  {}  {}",
                target.display_bib(),
                target.category,
                target.start_group
            );
            match target.position {
                Some(position) => println!(
                    "  Finish: {}  (position {} of {})",
                    target.finish_time,
                    position,
                    store.finisher_count()
                ),
                None => println!("  Did not finish"),
            }

            println!();
            println!("  Checkpoints:");
            for cp in &target.checkpoints {
                let position = cp
                    .position
                    .map_or_else(|| "-".to_string(), |p| p.to_string());
                let behind = cp
                    .relative_to_best
                    .map_or_else(String::new, |s| format!("  +{}", format_hms(s)));
                println!(
                    "    {:20} {:5.1} km  {}  pos {:>6}{}",
                    cp.name, cp.distance_km, cp.time, position, behind
                );
            }

            let spec = build_filter_spec(gender, start_groups, age_groups, !include_dnf)?;
            let cohort = filter_cohort(store.participants(), &target.id, &spec);
            let report = compare(target, &cohort);

            println!();
            println!(
                "  Cohort: {} athletes ({} finishers)",
                report.cohort_size, report.cohort_finishers
            );
            match report.percentile {
                Some(percentile) => println!("  Percentile: better than {}%", percentile),
                None => println!("  Percentile: not applicable"),
            }
            if let Some(gap) = report.gap_to_leader {
                println!("  Gap to leader: {}", fmt_gap(gap as f64));
            }
            if let Some(gap) = report.gap_to_median {
                println!("  Gap to median: {}", fmt_gap(gap));
            }
            if let Some(gap) = report.gap_to_average {
                println!("  Gap to average: {}", fmt_gap(gap));
            }

            let samples = checkpoint_pace_samples(target, &cohort);
            if !samples.is_empty() {
                println!();
                println!("  Pace by checkpoint (min/km):");
                for sample in samples {
                    let own = sample
                        .target_pace
                        .map_or_else(|| "  -  ".to_string(), format_pace);
                    let cohort_avg = sample.paces.iter().sum::<f64>() / sample.paces.len() as f64;
                    println!(
                        "    {:20} own {:>6}  cohort avg {:>6}  ({} samples)",
                        sample.checkpoint,
                        own,
                        format_pace(cohort_avg),
                        sample.paces.len(),
                    );
                }
            }
        }
    }

    Ok(())
}

/// Load config from the given path, falling back to defaults when the file
/// does not exist.
fn load_config(path: &str) -> Result<AppConfig> {
    let path = PathBuf::from(path);
    if path.exists() {
        AppConfig::from_file(&path).with_context(|| format!("loading {}", path.display()))
    } else {
        tracing::debug!(path = %path.display(), "config file not found, using defaults");
        Ok(AppConfig::default())
    }
}

/// Build the dataset provider named by the config.
fn build_provider(config: &AppConfig) -> Result<Arc<dyn DataProvider>> {
    match config.data.source.as_str() {
        "http" => {
            let base_url = Url::parse(&config.data.base_url)
                .with_context(|| format!("invalid base URL {}", config.data.base_url))?;
            let provider = HttpDataProvider::new(
                base_url,
                Duration::from_secs(config.data.timeout_seconds),
            )?;
            Ok(Arc::new(provider))
        }
        _ => Ok(Arc::new(LocalDataProvider::new(
            config.data.data_dir.clone(),
        ))),
    }
}

fn build_filter_spec(
    gender: Option<String>,
    start_groups: Option<String>,
    age_groups: Option<String>,
    finishers_only: bool,
) -> Result<FilterSpec> {
    let gender = match gender.as_deref() {
        None | Some("any") => GenderFilter::Any,
        Some("male") | Some("m") => GenderFilter::Male,
        Some("female") | Some("f") => GenderFilter::Female,
        Some(other) => anyhow::bail!("unknown gender filter '{}'", other),
    };

    let split = |s: Option<String>| {
        s.map(|s| {
            s.split(',')
                .map(str::trim)
                .filter(|g| !g.is_empty())
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .unwrap_or_default()
    };

    Ok(FilterSpec::unrestricted()
        .with_gender(gender)
        .with_start_groups(split(start_groups))
        .with_age_groups(split(age_groups))
        .finishers_only(finishers_only))
}

/// Format a signed gap in seconds as "+M:SS" / "-M:SS".
fn fmt_gap(seconds: f64) -> String {
    let sign = if seconds < 0.0 { '-' } else { '+' };
    let abs = seconds.abs().round() as u64;
    format!("{}{}:{:02}", sign, abs / 60, abs % 60)
}
