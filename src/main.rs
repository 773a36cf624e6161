//! CLI entry point for the Sentinella school-safety dashboard.
//!
//! Loads the dataset once, then answers a single query against it: KPIs,
//! leaderboards, map markers, a school's inspection panel or the whole
//! dashboard as JSON.

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use sentinella::config::Settings;
use sentinella::loader::DataSource;
use sentinella::output::{
    format_detail, format_filter, format_map, format_ranking, format_summary, print_pretty,
    to_json, write_records_csv,
};
use sentinella::pipeline::{MunicipalityChoice, SortOrder, geo_points, summarize};
use sentinella::session::{DEFAULT_LEADERBOARD_SIZE, Session};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "sentinella")]
#[command(about = "School safety dashboard over a provincial dataset", long_about = None)]
struct Cli {
    /// Path or URL of the dataset (overrides SENTINELLA_SOURCE)
    #[arg(short, long, global = true)]
    source: Option<String>,

    /// JSON file overriding column header names (overrides SENTINELLA_COLUMNS)
    #[arg(long, global = true)]
    columns: Option<String>,

    /// Municipality to filter on; omit for the whole province
    #[arg(short, long, global = true, default_value = "all")]
    municipality: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Order {
    Best,
    Worst,
}

impl From<Order> for SortOrder {
    fn from(order: Order) -> Self {
        match order {
            Order::Best => SortOrder::Descending,
            Order::Worst => SortOrder::Ascending,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List the municipalities available for filtering
    Municipalities,
    /// Show the KPI block for the selection
    Summary,
    /// Show a best or worst leaderboard
    Rank {
        #[arg(short, long, value_enum, default_value_t = Order::Best)]
        order: Order,

        #[arg(short, default_value_t = DEFAULT_LEADERBOARD_SIZE)]
        n: usize,
    },
    /// Show the inspection panel for a school
    Inspect {
        /// Exact school name
        name: String,
    },
    /// List the school names available for inspection
    Schools,
    /// List map markers for the selection
    Map,
    /// Compute the whole dashboard
    Report {
        /// Print JSON instead of text
        #[arg(long, default_value_t = false)]
        json: bool,

        #[arg(short, default_value_t = DEFAULT_LEADERBOARD_SIZE)]
        n: usize,
    },
    /// Write a leaderboard to a CSV file
    Export {
        #[arg(short, long, value_enum, default_value_t = Order::Best)]
        order: Order,

        #[arg(short, default_value_t = DEFAULT_LEADERBOARD_SIZE)]
        n: usize,

        #[arg(long, value_name = "FILE", default_value = "ranking.csv")]
        output: PathBuf,
    },
}

fn main() -> Result<ExitCode> {
    dotenvy::dotenv().ok(); // Load .env file

    let settings = Settings::from_env();

    // Logging setup: colored stderr + JSON rolling log file
    let log_dir = Path::new(&settings.log_file_path)
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&settings.log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("sentinella.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(env_filter("RUST_LOG", "info")?);

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(env_filter("RUST_LOG_JSON", "debug")?);

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    let source = DataSource::parse(cli.source.as_deref().unwrap_or(&settings.source));
    let columns = match cli.columns {
        Some(path) => sentinella::config::ColumnMap::load(&path)?,
        None => settings.column_map()?,
    };

    let session = match Session::open(&source, &columns) {
        Ok(session) => session,
        Err(e) => {
            error!(error = %e, "Dataset could not be loaded, stopping");
            eprintln!("Error: {e}");
            return Ok(ExitCode::FAILURE);
        }
    };

    let choice = MunicipalityChoice::parse(&cli.municipality);
    run(&session, &choice, cli.command)?;

    Ok(ExitCode::SUCCESS)
}

fn env_filter(var: &str, default_directive: &str) -> Result<EnvFilter> {
    Ok(EnvFilter::from_env(var).add_directive(default_directive.parse()?))
}

fn run(session: &Session, choice: &MunicipalityChoice, command: Commands) -> Result<()> {
    match command {
        Commands::Municipalities => match session.municipalities() {
            Some(names) => {
                for name in names {
                    println!("{name}");
                }
            }
            None => warn!("Dataset has no municipality column, filtering unavailable"),
        },
        Commands::Summary => {
            let view = session.view(choice);
            let summary = summarize(&view);
            print_pretty(&summary);
            println!("Selection: {}", format_filter(&view.filter));
            println!("{}", format_summary(&summary));
        }
        Commands::Rank { order, n } => {
            let ranking = session.ranking(choice, n, order.into());
            print!("{}", format_ranking(&ranking));
        }
        Commands::Inspect { name } => match session.inspect(choice, &name) {
            Some(detail) => print!("{}", format_detail(&detail)),
            None => {
                info!(name = %name, "No school with this name in the selection");
                println!("No school named '{name}' in this selection");
            }
        },
        Commands::Schools => {
            for name in session.school_names(choice) {
                println!("{name}");
            }
        }
        Commands::Map => {
            let view = session.view(choice);
            print!("{}", format_map(&geo_points(&view)));
        }
        Commands::Report { json, n } => {
            let dashboard = session.dashboard(choice, n);
            if json {
                println!("{}", to_json(&dashboard)?);
            } else {
                println!("Selection: {}", format_filter(&dashboard.filter));
                println!("{}\n", format_summary(&dashboard.summary));
                println!("Best {n}:\n{}", format_ranking(&dashboard.best));
                println!("Worst {n}:\n{}", format_ranking(&dashboard.worst));
                println!("Map (zoom {}):\n{}", dashboard.zoom, format_map(&dashboard.map));
            }
        }
        Commands::Export { order, n, output } => {
            let ranking = session.ranking(choice, n, order.into());
            write_records_csv(&output, &ranking)?;
        }
    }

    Ok(())
}
