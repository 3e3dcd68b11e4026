//! Output types from the page breaker.
//!
//! A `PageBreak` describes where one page ends and what it holds; `slice_pages`
//! turns a list of them back into index ranges over the input.

use folio_types::{Element, Length};
use serde::Serialize;
use std::ops::Range;

/// One element of one footnote body: `list` counts anchored bodies in document
/// order, `element` indexes into that body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct FootnotePosition {
    pub list: usize,
    pub element: usize,
}

/// Inclusive range of footnote elements placed on one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FootnoteRange {
    pub first: FootnotePosition,
    pub last: FootnotePosition,
}

/// Where a page ends, and how well its content fits.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageBreak {
    pub page_index: usize,
    /// Index of the break element. Footnote-only pages at the end of a sequence
    /// repeat the position of the last break.
    pub position: usize,
    pub footnotes: Option<FootnoteRange>,
    pub adjust_ratio: f64,
    /// Space left unused after adjustment.
    pub difference: Length,
    pub available_stretch: Length,
    pub available_shrink: Length,
    /// The page's content does not fit even at full shrink.
    pub overflows: bool,
    pub total_demerits: f64,
}

/// The part of the footnote `list` placed on a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FootnoteSlice {
    pub list: usize,
    pub elements: Range<usize>,
}

/// Index ranges making up one page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageSlice {
    pub page_index: usize,
    /// Main-flow elements, break element included.
    pub content: Range<usize>,
    pub footnotes: Vec<FootnoteSlice>,
}

/// Splits `elements` and their footnote bodies along `breaks`.
pub fn slice_pages(elements: &[Element], breaks: &[PageBreak]) -> Vec<PageSlice> {
    let lists: Vec<&Vec<Element>> = elements.iter().flat_map(|e| e.footnotes()).collect();
    let mut start = 0;
    breaks
        .iter()
        .map(|page| {
            let end = (page.position + 1).max(start);
            let content = start..end;
            start = end;
            let footnotes = page
                .footnotes
                .map(|range| {
                    (range.first.list..=range.last.list)
                        .filter_map(|list| {
                            let len = lists.get(list)?.len();
                            let first = if list == range.first.list { range.first.element } else { 0 };
                            let last = if list == range.last.list { range.last.element + 1 } else { len };
                            (first < last).then_some(FootnoteSlice {
                                list,
                                elements: first..last,
                            })
                        })
                        .collect()
                })
                .unwrap_or_default();
            PageSlice {
                page_index: page.page_index,
                content,
                footnotes,
            }
        })
        .collect()
}
