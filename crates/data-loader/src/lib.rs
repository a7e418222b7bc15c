//! # Data Loader Crate
//!
//! This crate handles extracting, loading and validating the two precomputed
//! artifacts behind the recommender: the movie table and the similarity matrix.
//!
//! ## Main Components
//!
//! - **types**: Core domain types (Movie, SimilarityMatrix, DataPaths, Catalog)
//! - **parser**: Parse the JSON artifacts into Rust structs
//! - **archive**: Unpack zipped artifacts on first run
//! - **index**: Bootstrap and validate the Catalog
//! - **error**: Error types for data loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::{Catalog, DataPaths};
//!
//! let catalog = Catalog::bootstrap(&DataPaths::new("data"))?;
//!
//! let row = catalog.row_of("Avatar").unwrap();
//! let scores = catalog.similarity_row(row).unwrap();
//!
//! println!("{} has {} similarity scores", catalog.movie(row).unwrap().title, scores.len());
//! ```

// Public modules
pub mod archive;
pub mod error;
pub mod index;
pub mod parser;
pub mod types;

// Re-export commonly used types for convenience
pub use archive::{ExtractOutcome, ensure_extracted};
pub use error::{DataLoadError, Result};
pub use types::{Catalog, DataPaths, Movie, RowIndex, SimilarityMatrix};
