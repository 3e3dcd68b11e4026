// src/error.rs
use folio_layout::BreakError;
use thiserror::Error;

/// Errors surfaced by the pagination facade.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Breaking failed: {0}")]
    Break(#[from] BreakError),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Sequence {index} failed: {source}")]
    Sequence {
        index: usize,
        #[source]
        source: BreakError,
    },
}
