//! Planfact CLI
//!
//! Command-line driver for the dashboard view model:
//! - Render a payload and print the resulting snapshot
//! - Toggle the display currency or activate a tab with persisted state
//! - Sort and filter a results table
//! - Generate the default config file

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use planfact::{
    generate_default_config, Config, CsvTableImporter, DashboardPayload, DashboardViewModel,
    FileStore, LoggingConfig, SnapshotBackend, SnapshotView, SortIndicator, TableController,
    Trigger, ViewState, ViewUpdate,
};

#[derive(Parser)]
#[command(name = "planfact")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Plan/fact dashboard view model driver")]
#[command(
    long_about = "Renders plan/fact dashboard payloads headlessly.\nCurrency and tab choices persist to a JSON state file between runs."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: search standard locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// State file holding the persisted currency and tab
    #[arg(short, long, global = true)]
    pub state: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load a payload and print the rendered snapshot
    Render {
        /// Payload JSON file
        payload: PathBuf,
    },

    /// Switch the display currency
    Toggle {
        /// Payload JSON file
        payload: PathBuf,
        /// Show amounts in USD
        #[arg(long, conflicts_with = "base")]
        usd: bool,
        /// Show amounts in UZS
        #[arg(long)]
        base: bool,
    },

    /// Activate a tab
    Tab {
        /// Payload JSON file
        payload: PathBuf,
        /// Tab id (e.g. "#performance")
        tab: String,
    },

    /// Sort and filter a results table
    Table {
        /// CSV file or payload JSON file
        input: PathBuf,
        /// Column to sort by (0-indexed)
        #[arg(long)]
        sort: Option<usize>,
        /// Sort descending
        #[arg(long)]
        desc: bool,
        /// Search term
        #[arg(short, long)]
        filter: Option<String>,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Serialize)]
struct Report<'a> {
    state: &'a ViewState,
    toggle_enabled: bool,
    update: ViewUpdate,
    charts: SnapshotView,
}

#[derive(Serialize)]
struct TableReport {
    columns: Vec<String>,
    visible: usize,
    total: usize,
    indicator: Option<SortIndicator>,
    rows: Vec<Vec<String>>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_with_env(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => Config::load_default(),
    };
    init_logging(&config.logging);

    match cli.command {
        Commands::Render { ref payload } => {
            let report = with_view_model(&cli, &config, payload, |_, loaded| loaded)?;
            print_json(&report)?;
        }

        Commands::Toggle {
            ref payload,
            usd,
            base,
        } => {
            if !usd && !base {
                bail!("choose a currency with --usd or --base");
            }
            let report = with_view_model(&cli, &config, payload, |vm, update| {
                let toggled = vm.dispatch(Trigger::CurrencyToggle(usd));
                if toggled.is_empty() {
                    tracing::warn!("Currency toggle had no effect");
                }
                merge(update, toggled)
            })?;
            print_json(&report)?;
        }

        Commands::Tab {
            ref payload,
            ref tab,
        } => {
            let report = with_view_model(&cli, &config, payload, |vm, update| {
                let activated = vm.dispatch(Trigger::TabActivate(tab.clone()));
                merge(update, activated)
            })?;
            print_json(&report)?;
        }

        Commands::Table {
            ref input,
            sort,
            desc,
            ref filter,
        } => {
            let mut table = load_table(input)?;
            if let Some(column) = sort {
                if !table.sort(column, !desc) {
                    bail!("column {} cannot be sorted", column);
                }
            }
            if let Some(term) = filter {
                table.filter(term);
            }
            print_json(&table_report(&table))?;
        }

        Commands::Config { ref output } => {
            let content = generate_default_config();
            match output {
                Some(path) => {
                    std::fs::write(path, content)
                        .with_context(|| format!("writing {}", path.display()))?;
                    println!("Config written to {}", path.display());
                }
                None => print!("{}", content),
            }
        }
    }

    Ok(())
}

fn init_logging(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(format!("planfact={}", logging.level))
    });

    let registry = tracing_subscriber::registry().with(filter);
    if logging.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

/// Load the payload, restore persisted state, run `step` after the load
/// trigger and report the final view.
fn with_view_model<F>(
    cli: &Cli,
    config: &Config,
    payload_path: &Path,
    step: F,
) -> anyhow::Result<serde_json::Value>
where
    F: FnOnce(&mut DashboardViewModel<SnapshotBackend, FileStore>, ViewUpdate) -> ViewUpdate,
{
    let payload = DashboardPayload::from_path(payload_path)
        .with_context(|| format!("reading payload {}", payload_path.display()))?;

    let state_path = cli
        .state
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.storage.state_file));
    let store = FileStore::open(&state_path)
        .with_context(|| format!("opening state file {}", state_path.display()))?;
    tracing::debug!("State file: {:?}", state_path);

    let mut vm = DashboardViewModel::new(payload, config, SnapshotBackend::open(), store);
    let loaded = vm.dispatch(Trigger::Load);
    let update = step(&mut vm, loaded);

    let report = Report {
        state: vm.state(),
        toggle_enabled: vm.toggle_enabled(),
        update,
        charts: vm.registry().backend().view(),
    };
    Ok(serde_json::to_value(&report)?)
}

/// Fold a later update over an earlier one; later text wins.
fn merge(mut base: ViewUpdate, later: ViewUpdate) -> ViewUpdate {
    for field in later.fields {
        match base.fields.iter_mut().find(|f| f.id == field.id) {
            Some(existing) => existing.text = field.text,
            None => base.fields.push(field),
        }
    }
    if later.labels.is_some() {
        base.labels = later.labels;
    }
    if later.export_href.is_some() {
        base.export_href = later.export_href;
    }
    if later.table.is_some() {
        base.table = later.table;
    }
    base.charts.extend(later.charts);
    base
}

fn load_table(input: &Path) -> anyhow::Result<TableController> {
    let is_csv = input
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("csv"))
        .unwrap_or(false);

    if is_csv {
        return CsvTableImporter::new()
            .import_file(input)
            .with_context(|| format!("importing {}", input.display()));
    }

    let payload = DashboardPayload::from_path(input)
        .with_context(|| format!("reading payload {}", input.display()))?;
    match &payload.table {
        Some(data) => Ok(TableController::from_data(data)),
        None => bail!("{} carries no table", input.display()),
    }
}

fn table_report(table: &TableController) -> TableReport {
    TableReport {
        columns: table.columns().iter().map(|c| c.title.clone()).collect(),
        visible: table.visible_count(),
        total: table.rows().len(),
        indicator: table.indicator(),
        rows: table.visible_rows().map(|row| row.cells.clone()).collect(),
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
