use data_loader::{Catalog, DataPaths};
use std::time::Instant;

fn main() {
    let paths = DataPaths::new("data");

    println!("Loading recommendation artifacts...\n");

    let start = Instant::now();
    let catalog = Catalog::bootstrap(&paths).expect("Failed to load artifacts");
    let elapsed = start.elapsed();

    let dim = catalog.similarity().dimension();

    println!("\n=== Load Complete ===");
    println!("Time taken: {:?}", elapsed);
    println!("Movies: {}", catalog.len());
    println!("Matrix: {}x{}", dim, dim);
    println!("\nPerformance: {:.0} scores/second",
             (dim * dim) as f64 / elapsed.as_secs_f64());
}
