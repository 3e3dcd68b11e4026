use super::breaking::{BreakStrategy, BreakingAlgorithm};
use crate::BreakError;
use crate::config::BreakingConfig;
use crate::interface::PageProvider;
use folio_types::{Element, Length};
use serde::Serialize;

/// Plain line breaking: containers are lines whose widths come from a provider,
/// and nothing floats.
pub struct LineBreaking<P> {
    widths: P,
}

impl<P: PageProvider> LineBreaking<P> {
    pub fn new(widths: P) -> Self {
        Self { widths }
    }
}

impl<P: PageProvider> BreakStrategy for LineBreaking<P> {
    type Ext = ();

    fn line_width(&self, line: usize) -> Length {
        self.widths.available_length(line)
    }
}

/// One line of a broken paragraph.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineBreak {
    pub line_index: usize,
    pub position: usize,
    pub adjust_ratio: f64,
    pub difference: Length,
    pub total_demerits: f64,
}

/// Breaks `elements` into lines of the widths `widths` reports.
pub fn break_lines<P: PageProvider>(
    elements: &[Element],
    config: &BreakingConfig,
    widths: P,
) -> Result<Vec<LineBreak>, BreakError> {
    config.validate()?;
    crate::util::validate_sequence(elements)?;
    let mut strategy = LineBreaking::new(widths);
    let result = BreakingAlgorithm::new(config).find_breaking_points(elements, &mut strategy)?;
    Ok(result
        .breaks()
        .into_iter()
        .map(|id| {
            let node = &result.arena[id];
            LineBreak {
                line_index: node.line - 1,
                position: node.position,
                adjust_ratio: node.adjust_ratio,
                difference: node.difference,
                total_demerits: node.total_demerits,
            }
        })
        .collect())
}
