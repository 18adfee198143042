//! Time catalog loading.
//!
//! Run with: cargo run --package data-loader --example benchmark_load -- [PATH_OR_URL]

use data_loader::{Catalog, DataSource, LoadOptions};
use std::time::Instant;

#[tokio::main]
async fn main() -> data_loader::Result<()> {
    let locator = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "data/movies_metadata.csv".to_string());
    let source = DataSource::parse(&locator);

    println!("Loading movie metadata from {}...\n", source);

    let start = Instant::now();
    let catalog = Catalog::load(&source, &LoadOptions::default()).await?;
    let elapsed = start.elapsed();

    let words: usize = catalog.documents().iter().map(|d| d.split_whitespace().count()).sum();

    println!("=== Load Complete ===");
    println!("Time taken: {:?}", elapsed);
    println!("Movies: {}", catalog.len());
    println!("Words of combined text: {}", words);
    println!(
        "\nPerformance: {:.0} movies/second",
        catalog.len() as f64 / elapsed.as_secs_f64()
    );
    Ok(())
}
