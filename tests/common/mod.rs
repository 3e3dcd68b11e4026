pub mod fixtures;

use folio::{BreakingConfig, PageBreak, PageProvider, Pagination, Paginator, PipelineError};

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

/// Paginate `sequence` and log the outcome, for tests that only look at the result.
pub fn paginate<P: PageProvider>(
    sequence: &[folio::Element],
    config: BreakingConfig,
    provider: P,
) -> Result<Pagination, PipelineError> {
    let _ = env_logger::builder().is_test(true).try_init();

    let pagination = Paginator::new(config, provider)?.paginate(sequence)?;
    for page in pagination.breaks() {
        log::debug!("{}", describe(page));
    }
    Ok(pagination)
}

/// Positions of every page break, in order.
pub fn positions(pagination: &Pagination) -> Vec<usize> {
    pagination.breaks().iter().map(|p| p.position).collect()
}

/// Footnote elements placed by each page, as `(list, element)` pairs.
pub fn footnotes_per_page(pagination: &Pagination) -> Vec<Vec<(usize, usize)>> {
    pagination
        .pages()
        .iter()
        .map(|page| {
            page.footnotes
                .iter()
                .flat_map(|slice| slice.elements.clone().map(move |e| (slice.list, e)))
                .collect()
        })
        .collect()
}

fn describe(page: &PageBreak) -> String {
    format!(
        "page {} ends at {} (ratio {:.3}, difference {}, demerits {}{})",
        page.page_index,
        page.position,
        page.adjust_ratio,
        page.difference,
        page.total_demerits,
        if page.overflows { ", overflows" } else { "" }
    )
}
