use crate::BreakError;
use crate::config::BreakingConfig;
use crate::interface::UniformPages;
use crate::output::PageBreak;
use crate::{PageBreaker, algorithms::breaking::ScanOrder};
use folio_types::{Element, MinOptMax, Sequence};

/// Three 3000-wide boxes separated by glue that can stretch or shrink by 500.
pub fn three_blocks() -> Sequence {
    let mut seq = Sequence::new();
    seq.push_box(3000)
        .push_glue(1000, 500, 500)
        .push_box(3000)
        .push_glue(1000, 500, 500)
        .push_box(3000)
        .push_forced_break();
    seq
}

/// 7000 of main content with `footnote` anchored at the second box.
pub fn anchored_footnote(footnote: Vec<Element>) -> Sequence {
    let mut seq = Sequence::new();
    seq.push_box(3000)
        .push_glue(1000, 500, 500)
        .push_block_box(3000, vec![footnote])
        .push_forced_break();
    seq
}

/// A 5000 footnote with a legal break after each of its four pieces.
pub fn splittable_footnote() -> Vec<Element> {
    vec![
        Element::boxed(1200),
        Element::penalty(0, 0, false),
        Element::boxed(1200),
        Element::penalty(0, 0, false),
        Element::boxed(1300),
        Element::penalty(0, 0, false),
        Element::boxed(1300),
    ]
}

/// A box wider than any page, with breakable glue on both sides.
pub fn oversized_box() -> Sequence {
    let mut seq = Sequence::new();
    seq.push_box(1000)
        .push_glue(1000, 500, 500)
        .push_box(50000)
        .push_glue(1000, 500, 500)
        .push_box(1000)
        .push_forced_break();
    seq
}

/// Default settings with a fixed 500 footnote separator.
pub fn footnote_config() -> BreakingConfig {
    BreakingConfig {
        footnote_separator: MinOptMax::fixed(500),
        ..Default::default()
    }
}

pub fn break_pages(
    elements: &[Element],
    config: &BreakingConfig,
    capacity: i32,
) -> Result<Vec<PageBreak>, BreakError> {
    PageBreaker::new(config, UniformPages(capacity)).find_breaks(elements)
}

pub fn break_pages_reversed(
    elements: &[Element],
    config: &BreakingConfig,
    capacity: i32,
) -> Result<Vec<PageBreak>, BreakError> {
    PageBreaker::new(config, UniformPages(capacity))
        .with_scan_order(ScanOrder::Reverse)
        .find_breaks(elements)
}

/// Every footnote element of `elements`, as `(list, element)`, in the order the
/// pages place them.
pub fn placed_footnotes(elements: &[Element], pages: &[PageBreak]) -> Vec<(usize, usize)> {
    let slices = crate::output::slice_pages(elements, pages);
    slices
        .iter()
        .flat_map(|page| page.footnotes.iter())
        .flat_map(|slice| slice.elements.clone().map(move |e| (slice.list, e)))
        .collect()
}

/// Every footnote element of `elements`, as `(list, element)`, in document order.
pub fn all_footnotes(elements: &[Element]) -> Vec<(usize, usize)> {
    elements
        .iter()
        .flat_map(|e| e.footnotes())
        .enumerate()
        .flat_map(|(list, body)| (0..body.len()).map(move |e| (list, e)))
        .collect()
}

/// A long run of varied boxes and glue, with a three-piece footnote anchored at
/// every seventh box.
pub fn long_document(boxes: usize) -> Sequence {
    let mut seq = Sequence::new();
    for k in 0..boxes {
        let width = 800 + (k as i32 * 37) % 400;
        if k % 7 == 3 {
            let footnote = vec![
                Element::boxed(300),
                Element::penalty(0, 0, false),
                Element::boxed(300 + (k as i32 % 3) * 100),
            ];
            seq.push_block_box(width, vec![footnote]);
        } else {
            seq.push_box(width);
        }
        if k + 1 < boxes {
            seq.push_glue(200, 100, 50);
        }
    }
    seq.end_sequence();
    seq
}
