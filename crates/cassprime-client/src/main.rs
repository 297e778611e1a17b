//! Cassprime - prime a Cassandra stub server from the command line
//!
//! # Usage
//!
//! ```bash
//! # Submit a query prime (connects to localhost:8043 by default)
//! cassprime prime people.json
//!
//! # Submit a prepared statement prime to another server
//! cassprime --admin-url http://server:8043 prime --prepared lookup.json
//!
//! # Show current primes, then clear everything
//! cassprime list
//! cassprime clear --all
//! ```

use anyhow::Context;
use cassprime_client::{codec, ClientConfig, PrimeKind, PrimingClient, PrimingRequest};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "cassprime")]
#[command(author, version, about = "Prime a Cassandra stub server over its admin API")]
struct Args {
    /// Admin API URL (overrides the config file)
    #[arg(short, long, global = true, env = "CASSPRIME_ADMIN_URL")]
    admin_url: Option<String>,

    /// YAML client configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Request timeout in milliseconds (overrides the config file)
    #[arg(long, global = true)]
    timeout_ms: Option<u64>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Submit one priming document read from a JSON file
    Prime {
        /// Path to the priming document
        file: PathBuf,

        /// Treat the document as a prepared statement prime
        #[arg(long)]
        prepared: bool,
    },
    /// Print the primes currently held by the server
    List {
        /// List prepared statement primes instead of query primes
        #[arg(long)]
        prepared: bool,
    },
    /// Remove primes from the server
    Clear {
        /// Clear prepared statement primes instead of query primes
        #[arg(long, conflicts_with = "all")]
        prepared: bool,

        /// Clear both query and prepared statement primes
        #[arg(long)]
        all: bool,
    },
}

fn kind(prepared: bool) -> PrimeKind {
    if prepared {
        PrimeKind::PreparedStatement
    } else {
        PrimeKind::Query
    }
}

fn load_config(args: &Args) -> anyhow::Result<ClientConfig> {
    let mut config = match &args.config {
        Some(path) => ClientConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => ClientConfig::default(),
    };
    if let Some(url) = &args.admin_url {
        config.admin_url = url.clone();
    }
    if let Some(timeout_ms) = args.timeout_ms {
        config.timeout_ms = timeout_ms;
    }
    config.validate()?;
    Ok(config)
}

fn print_primes(primes: &[PrimingRequest]) -> anyhow::Result<()> {
    let documents = primes
        .iter()
        .map(codec::encode_value)
        .collect::<Result<Vec<_>, _>>()?;
    println!("{}", serde_json::to_string_pretty(&documents)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = load_config(&args)?;
    let client = PrimingClient::new(&config)?;

    match args.command {
        Command::Prime { file, prepared } => {
            let contents = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let request = codec::decode_prime(&contents, kind(prepared))
                .with_context(|| format!("Invalid priming document {}", file.display()))?;
            client.prime(&request).await?;
        }
        Command::List { prepared } => {
            let primes = match kind(prepared) {
                PrimeKind::Query => client.retrieve_query_primes().await?,
                PrimeKind::PreparedStatement => client.retrieve_prepared_primes().await?,
            };
            print_primes(&primes)?;
        }
        Command::Clear { prepared, all } => {
            if all {
                client.clear_all_primes().await?;
            } else if prepared {
                client.clear_prepared_primes().await?;
            } else {
                client.clear_query_primes().await?;
            }
        }
    }

    Ok(())
}
