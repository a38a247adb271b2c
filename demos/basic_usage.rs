//! Basic usage example for corpdb-rs
//!
//! Builds (or loads) the index for a corpus directory and runs a couple
//! of searches through the rate-limited service entry point.

use corpdb_core::{CorpusConfig, SearchService};

fn main() -> corpdb_core::Result<()> {
    let data_dir = std::env::args()
        .nth(1)
        .unwrap_or_else(|| CorpusConfig::default_data_dir().display().to_string());

    let service = SearchService::new(CorpusConfig::new(data_dir));
    service.warm_up();

    for query in ["acme", "CIN1"] {
        println!("--- Searching for {query:?} ---");
        let resp = service.search(query, "203.0.113.7", false)?;
        if let Some(reason) = &resp.error {
            println!("denied: {reason}");
            continue;
        }
        for row in &resp.results {
            println!("{} — {} [{}] {}", row.id, row.name, row.identifier, row.status);
        }
        match resp.remaining {
            Some(n) => println!("({} results, {n} queries remaining)\n", resp.results.len()),
            None => println!("({} results, unlimited)\n", resp.results.len()),
        }
    }

    Ok(())
}
