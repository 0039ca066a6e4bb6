use adhoc_cli::{commands, load_filters, CliError, PanelConfig};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "adhoc")]
#[command(about = "Apply dashboard ad hoc filters to Databend SQL", long_about = None)]
struct Cli {
    /// Log debug output (RUST_LOG overrides)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge ad hoc filters into a query's WHERE clause
    Apply(ApplyArgs),
    /// Print the table a query reads from
    Table(TableArgs),
    /// Expand $__ time macros in a query
    Interpolate(InterpolateArgs),
}

#[derive(Parser)]
struct ApplyArgs {
    /// Panel file with sql, filters and optional table and time range
    #[arg(long, conflicts_with_all = ["sql", "filters"])]
    config: Option<PathBuf>,

    /// Query to rewrite
    #[arg(long)]
    sql: Option<String>,

    /// YAML or JSON file with a list of filters
    #[arg(long, requires = "sql")]
    filters: Option<PathBuf>,

    /// Target table; derived from the query when omitted
    #[arg(long)]
    table: Option<String>,
}

#[derive(Parser)]
struct TableArgs {
    /// Query to inspect
    #[arg(long)]
    sql: String,
}

#[derive(Parser)]
struct InterpolateArgs {
    /// Query to expand
    #[arg(long)]
    sql: String,

    /// Start of the time range (RFC 3339)
    #[arg(long)]
    from: String,

    /// End of the time range (RFC 3339)
    #[arg(long)]
    to: String,

    /// Panel interval in seconds
    #[arg(long, default_value_t = 1)]
    interval_secs: u64,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let output = match cli.command {
        Commands::Apply(args) => apply(args)?,
        Commands::Table(args) => commands::table(&args.sql)?,
        Commands::Interpolate(args) => interpolate(args)?,
    };

    println!("{}", output);
    Ok(())
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

fn apply(args: ApplyArgs) -> Result<String> {
    if let Some(path) = args.config {
        let panel = PanelConfig::load(&path)
            .with_context(|| format!("Failed to load panel {}", path.display()))?;
        let table = args.table.as_deref().or(panel.table.as_deref());
        let ctx = panel.query_context();
        return commands::apply(&panel.sql, &panel.filters, table, ctx.as_ref());
    }

    let sql = args.sql.ok_or(CliError::MissingQuery)?;
    let filters = match args.filters {
        Some(path) => load_filters(&path)
            .with_context(|| format!("Failed to load filters from {}", path.display()))?,
        None => Vec::new(),
    };
    commands::apply(&sql, &filters, args.table.as_deref(), None)
}

fn interpolate(args: InterpolateArgs) -> Result<String> {
    let ctx = commands::query_context(&args.from, &args.to, args.interval_secs)?;
    adhoc_core::interpolate(&args.sql, &ctx).context("Failed to expand time macros")
}
