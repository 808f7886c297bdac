use std::{
    path::{Path, PathBuf},
    process,
};

use clap::{ArgAction, Parser, Subcommand};
use golinks_sdk::{ClientConfig, LinksClient};
use tracing_subscriber::EnvFilter;

mod config;
mod list;
mod manifest;
mod routes;

use manifest::Manifest;

#[derive(Clone, Debug)]
pub struct Context {
    pub client_config: ClientConfig,
}

impl Context {
    pub fn new(client_config: ClientConfig) -> Self {
        Context { client_config }
    }

    /// Client for the resolved configuration
    pub fn client(&self) -> Result<LinksClient, String> {
        LinksClient::new(self.client_config.clone()).map_err(|e| e.to_string())
    }
}

#[derive(Parser, Debug)]
#[clap(author, version, about = "golinks - manage go-links from the terminal", long_about = None)]
struct Opts {
    /// Path to the golinks.toml file (default: ./golinks.toml)
    #[arg(
        long = "config",
        short = 'c',
        global = true,
        default_value = "./golinks.toml"
    )]
    config_path: PathBuf,

    /// Base URL of the go-links service
    #[arg(long = "endpoint", short = 'e', global = true, env = "GOLINKS_ENDPOINT")]
    endpoint: Option<String>,

    /// Routes requested per page when listing (1-10000)
    #[arg(long = "page-size", global = true, env = "GOLINKS_PAGE_SIZE")]
    page_size: Option<u32>,

    /// Request timeout in milliseconds
    #[arg(long = "timeout-ms", global = true)]
    timeout_ms: Option<u64>,

    /// Log requests to stderr (-vv for trace)
    #[arg(long = "verbose", short = 'v', global = true, action = ArgAction::Count)]
    verbose: u8,

    #[clap(subcommand)]
    command: Command,
}

impl Opts {
    /// Flags and environment win over the manifest
    fn client_config(&self, manifest: &Manifest) -> ClientConfig {
        let mut config = manifest.client_config();
        if let Some(endpoint) = &self.endpoint {
            config.endpoint = endpoint.clone();
        }
        if let Some(page_size) = self.page_size {
            config = config.with_page_size(page_size);
        }
        if let Some(timeout_ms) = self.timeout_ms {
            config = config.with_timeout(timeout_ms);
        }
        config
    }
}

#[derive(Subcommand, PartialEq, Clone, Debug)]
enum Command {
    /// List every route
    List(list::ListCommand),
    /// Show where a name points
    Get(routes::GetCommand),
    /// Point a name at a URL
    Set(routes::SetCommand),
    /// Delete a name
    Delete(routes::DeleteCommand),
    /// Show the service and client settings
    Config(config::ConfigCommand),
}

#[tokio::main]
async fn main() {
    // Loaded before parsing so the `env` fallbacks see it
    let env_file = load_env_file(Path::new("."));

    let opts: Opts = match Opts::try_parse() {
        Ok(opts) => opts,
        Err(e) => {
            let _ = e.print();
            process::exit(e.exit_code());
        }
    };

    init_tracing(opts.verbose);

    match env_file {
        Ok(Some(path)) => tracing::debug!(path = %path.display(), "Loaded environment"),
        Ok(None) => {}
        Err(e) => tracing::warn!("Failed to load .env file: {}", e),
    }

    let manifest = match Manifest::load(&opts.config_path) {
        Ok(manifest) => manifest,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    let ctx = Context::new(opts.client_config(&manifest));
    tracing::debug!(endpoint = %ctx.client_config.endpoint, page_size = ctx.client_config.page_size, "Resolved configuration");

    if let Err(e) = handle_command(opts.command, &ctx).await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Load environment variables from a .env file in `dir`, if there is one
fn load_env_file(dir: &Path) -> Result<Option<PathBuf>, String> {
    let env_file_path = dir.join(".env");

    match dotenvy::from_path(&env_file_path) {
        Ok(_) => Ok(Some(env_file_path)),
        Err(e) if e.not_found() => Ok(None),
        Err(e) => Err(format!("{}: {}", env_file_path.display(), e)),
    }
}

/// Logs go to stderr so stdout stays clean for `--format json`
fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn handle_command(command: Command, ctx: &Context) -> Result<(), String> {
    match command {
        Command::List(cmd) => cmd.execute(ctx).await,
        Command::Get(cmd) => cmd.execute(ctx).await,
        Command::Set(cmd) => cmd.execute(ctx).await,
        Command::Delete(cmd) => cmd.execute(ctx).await,
        Command::Config(cmd) => cmd.execute(ctx).await,
    }
}
