//! corpdb-cli — Command-line interface for corpdb-core
//!
//! This binary inspects and queries a corpdb company-record index from
//! the terminal. It supports printing index statistics, forcing a corpus
//! rescan, and running substring searches through the same rate-limited
//! entry point a service deployment would use.
//!
//! Usage examples
//! --------------
//!
//! - Show index stats
//!   $ corpdb-cli stats
//!
//! - Rebuild the snapshot from the corpus directory
//!   $ corpdb-cli --data-dir ./data build
//!
//! - Search by company name or identifier
//!   $ corpdb-cli search acme
//!   $ corpdb-cli search CIN123 --privileged
//!
//! Data source
//! -----------
//!
//! By default the CLI scans the data directory bundled with `corpdb-core`
//! and caches a binary snapshot next to it for fast subsequent runs. Use
//! `--data-dir <path>` to point at a custom corpus and `--snapshot <path>`
//! to relocate the snapshot.
mod args;

use crate::args::{CliArgs, Commands};
use clap::Parser;
use corpdb_core::{CorpusConfig, CorpusIndex, SearchService};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = CliArgs::parse();

    let mut config = match args.data_dir {
        Some(dir) => CorpusConfig::new(dir),
        None => CorpusConfig::default(),
    };
    if let Some(snapshot) = args.snapshot {
        config = config.with_snapshot(snapshot);
    }

    match args.command {
        Commands::Stats => {
            let cache = corpdb_core::IndexCache::new();
            let index = cache.ensure_ready(&config);
            let stats = index.stats();
            println!("Index statistics:");
            println!("  Files: {}", stats.files);
            println!("  Records: {}", stats.records);
        }

        Commands::Build => {
            let index = CorpusIndex::build(&config);
            index.save_as(&config.snapshot_path)?;
            let stats = index.stats();
            println!(
                "Indexed {} records from {} files -> {}",
                stats.records,
                stats.files,
                config.snapshot_path.display()
            );
        }

        Commands::Search {
            query,
            identity,
            privileged,
        } => {
            let service = SearchService::new(config);
            let resp = service.search(&query, &identity, privileged)?;

            if let Some(reason) = resp.error {
                eprintln!("Denied: {reason}");
                return Ok(());
            }
            if resp.results.is_empty() {
                println!("No records found matching: {query}");
            } else {
                for row in &resp.results {
                    println!(
                        "{} — {} [{}] {} ({})",
                        row.id, row.name, row.identifier, row.region, row.status
                    );
                }
            }
            match resp.remaining {
                Some(n) => println!("Queries remaining today: {n}"),
                None => println!("Queries remaining today: unlimited"),
            }
        }
    }

    Ok(())
}
