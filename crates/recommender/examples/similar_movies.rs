//! Example: Find movies similar to a title
//!
//! Run with: cargo run --package recommender --example similar_movies -- "Avatar"
//!
//! This example shows how to:
//! 1. Bootstrap the catalog from the data directory
//! 2. Rank every movie against the selected one
//! 3. Display the top recommendations

use data_loader::{Catalog, DataPaths};
use recommender::SimilarityRecommender;
use std::sync::Arc;
use std::time::Instant;

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter("info")
        .init();

    let title = std::env::args().nth(1).unwrap_or_else(|| "Avatar".to_string());

    println!("=== Similar Movies Example ===\n");

    let start = Instant::now();
    let catalog = Arc::new(Catalog::bootstrap(&DataPaths::new("data"))?);
    println!("Loaded {} movies in {:?}\n", catalog.len(), start.elapsed());

    let recommender = SimilarityRecommender::new(catalog);
    let start = Instant::now();
    let recs = recommender.recommend(&title)?;
    println!("Movies similar to '{}' (found in {:?}):", title, start.elapsed());

    for (i, rec) in recs.iter().enumerate() {
        println!("  {}. {} (score: {:.4})", i + 1, rec.title, rec.score);
    }

    Ok(())
}
