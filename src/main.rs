//! Address validation simulator.
//!
//! Drives [`AddressValidationService`] from the command line, standing in for
//! the storefront screens that call it in production.
//!
//! ```text
//! address-validation validate --street "123 Main St" --city "San Francisco" --state CA --zip 94105
//! address-validation search "main"
//! address-validation demo --count 8 --fail-every 3
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use futures_util::future::join_all;
use serde::Serialize;
use serde_json::json;

use address_validation::config::{load_config, load_default_config};
use address_validation::observability::logging::init_logging;
use address_validation::observability::Tracer;
use address_validation::validation::{Address, AddressValidationService};

#[derive(Parser)]
#[command(name = "address-validation")]
#[command(about = "Simulated address validation with span telemetry", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Fixed RNG seed (overrides configuration)
    #[arg(short, long)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a single address
    Validate {
        #[arg(long)]
        street: String,
        #[arg(long)]
        street2: Option<String>,
        #[arg(long)]
        city: String,
        #[arg(long)]
        state: String,
        #[arg(long)]
        zip: String,
        #[arg(long, default_value = "US")]
        country: String,
        /// Force a simulated backend failure
        #[arg(long)]
        simulate_error: bool,
    },
    /// Suggest addresses for a free-text query
    Search { query: String },
    /// Validate sample addresses concurrently and summarize the cache
    Demo {
        #[arg(long, default_value_t = 6)]
        count: usize,
        /// Simulate a backend failure on every Nth call
        #[arg(long)]
        fail_every: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => load_default_config()?,
    };
    if let Some(seed) = cli.seed {
        config.simulation.seed = Some(seed);
    }

    init_logging(&config.observability);

    tracing::info!(
        seed = ?config.simulation.seed,
        validation_max_ms = config.latency.validation_max_ms,
        search_max_ms = config.latency.search_max_ms,
        "Configuration loaded"
    );

    let service = Arc::new(AddressValidationService::from_config(&config, Tracer::default()));

    match cli.command {
        Commands::Validate {
            street,
            street2,
            city,
            state,
            zip,
            country,
            simulate_error,
        } => {
            let mut address = Address::new(street, city, state, zip);
            address.street2 = street2;
            address.country = country;

            match service.validate_address(&address, simulate_error).await {
                Ok(result) => print_json(&result)?,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Commands::Search { query } => {
            let suggestions = service.search_address_suggestions(&query).await;
            print_json(&suggestions)?;
        }
        Commands::Demo { count, fail_every } => {
            run_demo(service, count, fail_every).await?;
        }
    }

    Ok(())
}

async fn run_demo(
    service: Arc<AddressValidationService>,
    count: usize,
    fail_every: Option<usize>,
) -> Result<(), Box<dyn std::error::Error>> {
    let samples = sample_addresses();

    let tasks = (0..count).map(|i| {
        let service = service.clone();
        let address = Address {
            id: format!("demo-{}", i),
            ..samples[i % samples.len()].clone()
        };
        let simulate_error = fail_every.is_some_and(|n| n > 0 && (i + 1) % n == 0);

        tokio::spawn(async move {
            let outcome = service.validate_address(&address, simulate_error).await;
            (address.id, outcome)
        })
    });

    let mut failed = Vec::new();
    for joined in join_all(tasks).await {
        let (id, outcome) = joined?;
        if let Err(e) = outcome {
            failed.push(json!({ "address_id": id, "error": e.kind() }));
        }
    }

    let (valid, invalid) = service.cache().summary();
    print_json(&json!({
        "requested": count,
        "cached": service.cache().len(),
        "valid": valid,
        "invalid": invalid,
        "failed": failed,
    }))?;
    Ok(())
}

fn sample_addresses() -> Vec<Address> {
    vec![
        Address::new("123 Main St", "San Francisco", "CA", "94105").with_name("Ada", "Lovelace"),
        Address::new("350 Fifth Avenue", "New York", "NY", "10118").with_name("Grace", "Hopper"),
        Address::new("1 Rd", "X", "Texas", "7700").with_name("Alan", "Turing"),
        Address::new("233 S Wacker Dr", "Chicago", "IL", "60606").with_name("Edsger", "Dijkstra"),
    ]
}

fn print_json<T: Serialize>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
