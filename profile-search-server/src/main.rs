use anyhow::Context;
use clap::{Parser, Subcommand};
use profile_search_common::{Config, LogLevel, MatchMode};
use profile_search_server::commands::{self, load_snapshot};
use profile_search_server::{init_logging, router, AppState};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "profile-search", version, about = "Profile dataset search service")]
struct Cli {
    /// config file (default: $PROFILE_SEARCH_CONFIG or the user config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// dataset CSV, overrides [dataset].path
    #[arg(long, global = true)]
    dataset: Option<String>,
    #[arg(long, global = true)]
    log_level: Option<LogLevel>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the HTTP API (default)
    Serve {
        #[arg(long)] host: Option<String>,
        #[arg(long)] port: Option<u16>,
        /// default combination for POST /search: any (OR) or all (AND)
        #[arg(long)] mode: Option<MatchMode>,
    },
    /// Free-text search across every column, printed as JSON
    Search { query: String },
    /// Criteria search; pass JSON inline or @path to read it from a file
    Filter {
        #[arg(long)] criteria: String,
        #[arg(long)] mode: Option<MatchMode>,
    },
    /// Write the default config file
    InitConfig {
        #[arg(long)] force: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);
    let mut config = Config::load_from(&config_path)
        .with_context(|| format!("reading config {}", config_path.display()))?;
    if let Some(path) = cli.dataset {
        config.dataset.path = path;
    }
    init_logging(cli.log_level.unwrap_or(config.logging.level))?;
    match cli.command.unwrap_or(Commands::Serve { host: None, port: None, mode: None }) {
        Commands::Serve { host, port, mode } => {
            if let Some(h) = host { config.server.host = h; }
            if let Some(p) = port { config.server.port = p; }
            if let Some(m) = mode { config.search.default_mode = m; }
            run_serve(config).await?
        }
        Commands::Search { query } => run_search(&config, &query)?,
        Commands::Filter { criteria, mode } => run_filter(&config, &criteria, mode)?,
        Commands::InitConfig { force } => run_init_config(&config_path, force)?,
    }
    Ok(())
}

async fn run_serve(config: Config) -> anyhow::Result<()> {
    let snapshot = load_snapshot(&config)?; // load failure keeps serving, every search reports it
    let state = AppState::new(snapshot, config.search.clone());
    let app = router(state, config.server.cors_permissive);
    let addr = config.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    tracing::info!(%addr, mode = %config.search.default_mode, "listening");
    axum::serve(listener, app).await?;
    Ok(())
}

fn run_search(config: &Config, query: &str) -> anyhow::Result<()> {
    let rows = commands::search(config, query)?;
    println!("{}", serde_json::to_string_pretty(&rows)?);
    Ok(())
}

fn run_filter(config: &Config, criteria: &str, mode: Option<MatchMode>) -> anyhow::Result<()> {
    let out = commands::filter(config, criteria, mode)?;
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

fn run_init_config(path: &Path, force: bool) -> anyhow::Result<()> {
    commands::init_config(path, force)?;
    println!("wrote {}", path.display());
    Ok(())
}
