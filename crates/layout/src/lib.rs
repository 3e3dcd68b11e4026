use thiserror::Error;

#[derive(Error, Debug)]
pub enum BreakError {
    #[error("Cannot break an empty sequence.")]
    EmptySequence,
    #[error("Element {0} is a legal break before any content.")]
    LeadingBreak(usize),
    #[error("Element {index} has a negative {what} of {value}.")]
    NegativeLength {
        index: usize,
        what: &'static str,
        value: i32,
    },
    #[error("Sequence lengths add up to {total}, more than the breaker can represent.")]
    LengthOverflow { total: i64 },
    #[error("Sequence does not end with a forced break.")]
    UnterminatedSequence,
    #[error("No feasible set of breaks found (gave up at element {0}).")]
    NoFeasibleBreaks(usize),
    #[error("Invalid breaking configuration: {0}")]
    InvalidConfig(String),
    #[error("Internal breaker error: {0}")]
    Internal(String),
}

pub mod algorithms;
pub mod config;
pub mod interface;
pub mod output;
pub mod perf;
pub mod util;

pub use self::algorithms::{PageBreaker, break_lines};
pub use self::config::{Alignment, BreakingConfig};
pub use self::interface::{PageLengths, PageProvider, UniformPages};
pub use self::output::{
    FootnotePosition, FootnoteRange, FootnoteSlice, PageBreak, PageSlice, slice_pages,
};

// Re-export the data model so callers need only one dependency
pub use folio_types::{Element, Length, MinOptMax, PenaltyCost, Sequence};

#[cfg(test)]
mod test_utils;
