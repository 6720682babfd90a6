use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;
use workorders_core::{AppConfig, NewWorkOrder, Priority, Status, format_timestamp};
use workorders_sqlite::WorkOrderStore;

mod render;

/// Environment variable holding the log filter (e.g. `debug`).
const LOG_ENV: &str = "WORKORDERS_LOG";

/// CLI-specific priority enum with clap argument parsing support.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliPriority {
    Low,
    Med,
    High,
}

impl From<CliPriority> for Priority {
    fn from(priority: CliPriority) -> Self {
        match priority {
            CliPriority::Low => Self::Low,
            CliPriority::Med => Self::Med,
            CliPriority::High => Self::High,
        }
    }
}

/// CLI-specific status enum with clap argument parsing support.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliStatus {
    Open,
    Closed,
}

impl From<CliStatus> for Status {
    fn from(status: CliStatus) -> Self {
        match status {
            CliStatus::Open => Self::Open,
            CliStatus::Closed => Self::Closed,
        }
    }
}

/// Output format for commands that print work orders.
#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "workorders")]
#[command(about = "Simple work order tracker backed by SQLite")]
#[command(version)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Args)]
struct GlobalArgs {
    /// Path to the SQLite database file (default: ./workorders.db).
    #[arg(long, global = true)]
    db: Option<PathBuf>,
    /// Path to a YAML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Output format for list, history, and show.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Add a new work order.
    Add(AddArgs),
    /// List work orders, newest first.
    List(ListArgs),
    /// Close a work order by id.
    Close(CloseArgs),
    /// Show work order history for a machine.
    History(HistoryArgs),
    /// Show a work order by id.
    Show(ShowArgs),
}

#[derive(Debug, Args)]
struct AddArgs {
    /// Machine identifier (e.g. KMT-102).
    #[arg(long)]
    machine_id: String,
    /// Issue description.
    #[arg(long)]
    issue: String,
    /// Priority level.
    #[arg(long, value_enum, default_value_t = CliPriority::Med)]
    priority: CliPriority,
}

#[derive(Debug, Args)]
struct ListArgs {
    /// Filter by status.
    #[arg(long, value_enum)]
    status: Option<CliStatus>,
}

#[derive(Debug, Args)]
struct CloseArgs {
    /// Work order id.
    #[arg(long)]
    id: i64,
}

#[derive(Debug, Args)]
struct HistoryArgs {
    /// Machine identifier (e.g. KMT-102).
    #[arg(long)]
    machine_id: String,
    /// Optional status filter.
    #[arg(long, value_enum)]
    status: Option<CliStatus>,
}

#[derive(Debug, Args)]
struct ShowArgs {
    /// Work order id.
    #[arg(long)]
    id: i64,
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Add(args) => run_add(&cli.global, args),
        Command::List(args) => run_list(&cli.global, args),
        Command::Close(args) => run_close(&cli.global, args),
        Command::History(args) => run_history(&cli.global, args),
        Command::Show(args) => run_show(&cli.global, args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

fn run_add(global: &GlobalArgs, args: AddArgs) -> Result<(), String> {
    let order = NewWorkOrder::new(&args.machine_id, &args.issue, args.priority.into())
        .map_err(|e| e.to_string())?;
    let store = open_store(global)?;
    let id = store
        .add(&order)
        .map_err(|e| format!("Failed to add work order: {e}"))?;
    println!("Added work order #{id}");
    Ok(())
}

fn run_list(global: &GlobalArgs, args: ListArgs) -> Result<(), String> {
    let store = open_store(global)?;
    let orders = store
        .list(args.status.map(Status::from))
        .map_err(|e| format!("Failed to list work orders: {e}"))?;
    match global.format {
        OutputFormat::Table => print!("{}", render::list_table(&orders)),
        OutputFormat::Json => print_json(&orders)?,
    }
    Ok(())
}

fn run_close(global: &GlobalArgs, args: CloseArgs) -> Result<(), String> {
    let store = open_store(global)?;
    let order = store.close(args.id).map_err(|e| e.to_string())?;
    println!("Closed work order #{}", order.id);
    if let Some(closed_at) = &order.closed_at {
        println!("Closed At: {}", format_timestamp(closed_at));
    }
    Ok(())
}

fn run_history(global: &GlobalArgs, args: HistoryArgs) -> Result<(), String> {
    let status = args.status.map(Status::from);
    let store = open_store(global)?;
    let orders = store
        .history(&args.machine_id, status)
        .map_err(|e| {
            if e.is_user_error() {
                e.to_string()
            } else {
                format!("Failed to load history: {e}")
            }
        })?;
    match global.format {
        OutputFormat::Table => print!(
            "{}",
            render::history_table(args.machine_id.trim(), status, &orders)
        ),
        OutputFormat::Json => print_json(&orders)?,
    }
    Ok(())
}

fn run_show(global: &GlobalArgs, args: ShowArgs) -> Result<(), String> {
    let store = open_store(global)?;
    let order = store.get_by_id(args.id).map_err(|e| e.to_string())?;
    match global.format {
        OutputFormat::Table => print!("{}", render::detail(&order)),
        OutputFormat::Json => print_json(&order)?,
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Loads configuration and opens the store at the resolved database path.
fn open_store(global: &GlobalArgs) -> Result<WorkOrderStore, String> {
    let config = AppConfig::discover(global.config.as_deref())
        .map_err(|e| format!("Failed to load configuration: {e}"))?;
    let db = config.resolve_database(global.db.as_deref());
    debug!(db = %db.display(), "resolved database path");
    WorkOrderStore::open(&db)
        .map_err(|e| format!("Failed to open database '{}': {e}", db.display()))
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<(), String> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| format!("Failed to serialize output: {e}"))?;
    println!("{json}");
    Ok(())
}

