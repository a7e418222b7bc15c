//! # Recommender Crate
//!
//! Finds the movies most similar to a selected title using the precomputed
//! similarity matrix held by a [`data_loader::Catalog`].
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::{Catalog, DataPaths};
//! use recommender::SimilarityRecommender;
//! use std::sync::Arc;
//!
//! let catalog = Arc::new(Catalog::bootstrap(&DataPaths::new("data"))?);
//! let recommender = SimilarityRecommender::new(catalog);
//!
//! for movie in recommender.recommend("Avatar")? {
//!     println!("{} ({:.3})", movie.title, movie.score);
//! }
//! ```
//!
//! Lookups are plain reads over shared immutable data, so a recommender can
//! be cloned freely and used from any thread.

pub mod error;
pub mod similar;
pub mod types;

pub use error::{RecommendError, Result};
pub use similar::{DEFAULT_LIMIT, SimilarityRecommender};
pub use types::ScoredMovie;
