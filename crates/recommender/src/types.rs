//! Result types produced by the recommender.

use data_loader::RowIndex;

/// One recommended movie together with its similarity to the query
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredMovie {
    pub row: RowIndex,
    pub movie_id: Option<u64>,
    pub title: String,
    /// Similarity score between the query movie and this one
    pub score: f64,
}
