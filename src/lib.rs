//! Optimal-fit page breaking with footnotes.
//!
//! The `folio` crate ties the workspace together: callers build a
//! [`Sequence`] of boxes, glue and penalties, hand it to a [`Paginator`] along
//! with a [`BreakingConfig`] and a [`PageProvider`], and get back the pages.

pub mod error;
pub mod pipeline;

pub use error::PipelineError;
pub use pipeline::{Pagination, Paginator};

pub use folio_layout::perf::{BreakEvent, DebugProfiler, NoOpProfiler, Profiler};
pub use folio_layout::{
    Alignment, BreakError, BreakingConfig, FootnotePosition, FootnoteRange, FootnoteSlice,
    PageBreak, PageBreaker, PageLengths, PageProvider, PageSlice, UniformPages, break_lines,
    slice_pages,
};
pub use folio_types::{Element, Length, MinOptMax, PenaltyCost, Sequence};
