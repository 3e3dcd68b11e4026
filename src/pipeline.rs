// src/pipeline.rs
use crate::error::PipelineError;
use folio_layout::perf::{NOOP_PROFILER, Profiler};
use folio_layout::{
    BreakingConfig, Element, PageBreak, PageBreaker, PageProvider, PageSlice, Sequence,
    slice_pages,
};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::Serialize;

/// The pages produced for one sequence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pagination {
    breaks: Vec<PageBreak>,
    slices: Vec<PageSlice>,
}

impl Pagination {
    fn new(elements: &[Element], breaks: Vec<PageBreak>) -> Self {
        let slices = slice_pages(elements, &breaks);
        Self { breaks, slices }
    }

    /// One record per page, in page order.
    pub fn breaks(&self) -> &[PageBreak] {
        &self.breaks
    }

    /// The element and footnote ranges of each page.
    pub fn pages(&self) -> &[PageSlice] {
        &self.slices
    }

    pub fn page_count(&self) -> usize {
        self.breaks.len()
    }

    pub fn overflowing_pages(&self) -> impl Iterator<Item = &PageBreak> {
        self.breaks.iter().filter(|page| page.overflows)
    }

    pub fn into_breaks(self) -> Vec<PageBreak> {
        self.breaks
    }
}

/// Breaks sequences into pages with a fixed configuration and page geometry.
///
/// ```ignore
/// let paginator = Paginator::new(BreakingConfig::default(), UniformPages(10000))?;
/// let pagination = paginator.paginate(&sequence)?;
/// for page in pagination.pages() {
///     println!("{:?}", page.content);
/// }
/// ```
pub struct Paginator<P> {
    config: BreakingConfig,
    provider: P,
}

impl<P: PageProvider> Paginator<P> {
    pub fn new(config: BreakingConfig, provider: P) -> Result<Self, PipelineError> {
        config.validate()?;
        Ok(Self { config, provider })
    }

    /// Reads a `BreakingConfig` from JSON. Missing fields take their defaults.
    pub fn from_json_config(json: &str, provider: P) -> Result<Self, PipelineError> {
        let config: BreakingConfig = serde_json::from_str(json)?;
        Self::new(config, provider)
    }

    pub fn config(&self) -> &BreakingConfig {
        &self.config
    }

    pub fn paginate(&self, elements: &[Element]) -> Result<Pagination, PipelineError> {
        self.paginate_with_profiler(elements, &NOOP_PROFILER)
    }

    pub fn paginate_with_profiler(
        &self,
        elements: &[Element],
        profiler: &dyn Profiler,
    ) -> Result<Pagination, PipelineError> {
        let breaks = self.find_breaks(elements, profiler)?;
        Ok(Pagination::new(elements, breaks))
    }

    /// Parses a JSON array of elements and paginates it.
    pub fn paginate_json(&self, json: &str) -> Result<Pagination, PipelineError> {
        let sequence: Sequence = serde_json::from_str(json)?;
        self.paginate(&sequence)
    }

    fn find_breaks(
        &self,
        elements: &[Element],
        profiler: &dyn Profiler,
    ) -> Result<Vec<PageBreak>, folio_layout::BreakError> {
        let provider = |page: usize| self.provider.available_length(page);
        PageBreaker::new(&self.config, provider)
            .with_profiler(profiler)
            .find_breaks(elements)
    }

    fn paginate_indexed(
        &self,
        index: usize,
        sequence: &Sequence,
    ) -> Result<Pagination, PipelineError> {
        log::debug!(
            "Paginating sequence {} ({} elements, {} footnotes)",
            index,
            sequence.len(),
            sequence.footnote_count()
        );
        self.find_breaks(sequence, &NOOP_PROFILER)
            .map(|breaks| Pagination::new(sequence, breaks))
            .map_err(|source| PipelineError::Sequence { index, source })
    }
}

#[cfg(feature = "parallel")]
impl<P: PageProvider + Sync> Paginator<P> {
    /// Paginates independent sequences on rayon's pool. Results keep the input
    /// order; the first failing sequence is reported.
    pub fn paginate_many(&self, sequences: &[Sequence]) -> Result<Vec<Pagination>, PipelineError> {
        sequences
            .par_iter()
            .enumerate()
            .map(|(index, sequence)| self.paginate_indexed(index, sequence))
            .collect()
    }
}

#[cfg(not(feature = "parallel"))]
impl<P: PageProvider> Paginator<P> {
    /// Paginates independent sequences one after another.
    pub fn paginate_many(&self, sequences: &[Sequence]) -> Result<Vec<Pagination>, PipelineError> {
        sequences
            .iter()
            .enumerate()
            .map(|(index, sequence)| self.paginate_indexed(index, sequence))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_layout::UniformPages;

    fn two_pages() -> Sequence {
        let mut seq = Sequence::new();
        seq.push_box(3000)
            .push_glue(1000, 500, 500)
            .push_box(3000)
            .push_glue(1000, 500, 500)
            .push_box(3000)
            .push_forced_break();
        seq
    }

    #[test]
    fn test_paginate_slices_the_sequence() {
        let paginator = Paginator::new(BreakingConfig::default(), UniformPages(9000)).unwrap();
        let pagination = paginator.paginate(&two_pages()).unwrap();

        assert_eq!(pagination.page_count(), 2);
        assert_eq!(pagination.pages()[0].content, 0..4);
        assert_eq!(pagination.pages()[1].content, 4..6);
        assert_eq!(pagination.overflowing_pages().count(), 0);
    }

    #[test]
    fn test_invalid_config_is_rejected_up_front() {
        let config = BreakingConfig {
            threshold: -1.0,
            ..Default::default()
        };
        assert!(matches!(
            Paginator::new(config, UniformPages(9000)),
            Err(PipelineError::Break(folio_layout::BreakError::InvalidConfig(_)))
        ));
    }

    #[test]
    fn test_failing_sequence_is_named() {
        let paginator = Paginator::new(BreakingConfig::default(), UniformPages(9000)).unwrap();
        let open: Sequence = vec![Element::boxed(100)].into();
        let result = paginator.paginate_many(&[two_pages(), open]);
        assert!(matches!(result, Err(PipelineError::Sequence { index: 1, .. })));
    }
}
