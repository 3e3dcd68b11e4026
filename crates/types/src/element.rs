//! The box/glue/penalty primitives.
//!
//! A breaker only ever looks at widths, elasticity and costs, so these types carry
//! nothing else. Content that floats out of the main flow (footnote bodies) rides
//! along on a [`Element::BlockBox`] as nested element lists.

use crate::length::Length;
use serde::{Deserialize, Serialize};

/// The body of one footnote, itself a list of primitives with its own legal breaks.
pub type FootnoteBody = Vec<Element>;

/// Cost attached to a penalty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PenaltyCost {
    /// A finite cost. Negative values make the break attractive.
    Cost(i32),
    /// Breaking here is never allowed.
    Forbidden,
    /// Breaking here is mandatory.
    Forced,
}

impl PenaltyCost {
    pub fn is_forbidden(self) -> bool {
        matches!(self, PenaltyCost::Forbidden)
    }

    pub fn is_forced(self) -> bool {
        matches!(self, PenaltyCost::Forced)
    }
}

impl Default for PenaltyCost {
    fn default() -> Self {
        PenaltyCost::Cost(0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Element {
    /// Indivisible content.
    Box { width: Length },
    /// Indivisible content carrying the bodies of the footnotes cited in it.
    BlockBox {
        width: Length,
        #[serde(default)]
        footnotes: Vec<FootnoteBody>,
    },
    /// Breakable, elastic spacing.
    Glue {
        width: Length,
        #[serde(default)]
        stretch: Length,
        #[serde(default)]
        shrink: Length,
    },
    /// An explicit break opportunity.
    Penalty {
        #[serde(default)]
        width: Length,
        cost: PenaltyCost,
        #[serde(default)]
        flagged: bool,
    },
}

impl Element {
    pub fn boxed(width: Length) -> Self {
        Element::Box { width }
    }

    pub fn block_box(width: Length, footnotes: Vec<FootnoteBody>) -> Self {
        Element::BlockBox { width, footnotes }
    }

    pub fn glue(width: Length, stretch: Length, shrink: Length) -> Self {
        Element::Glue {
            width,
            stretch,
            shrink,
        }
    }

    pub fn penalty(width: Length, cost: i32, flagged: bool) -> Self {
        Element::Penalty {
            width,
            cost: PenaltyCost::Cost(cost),
            flagged,
        }
    }

    pub fn forced_break() -> Self {
        Element::Penalty {
            width: 0,
            cost: PenaltyCost::Forced,
            flagged: false,
        }
    }

    pub fn forbidden_break() -> Self {
        Element::Penalty {
            width: 0,
            cost: PenaltyCost::Forbidden,
            flagged: false,
        }
    }

    pub fn is_box(&self) -> bool {
        matches!(self, Element::Box { .. } | Element::BlockBox { .. })
    }

    pub fn is_glue(&self) -> bool {
        matches!(self, Element::Glue { .. })
    }

    pub fn is_penalty(&self) -> bool {
        matches!(self, Element::Penalty { .. })
    }

    pub fn width(&self) -> Length {
        match self {
            Element::Box { width }
            | Element::BlockBox { width, .. }
            | Element::Glue { width, .. }
            | Element::Penalty { width, .. } => *width,
        }
    }

    pub fn stretch(&self) -> Length {
        match self {
            Element::Glue { stretch, .. } => *stretch,
            _ => 0,
        }
    }

    pub fn shrink(&self) -> Length {
        match self {
            Element::Glue { shrink, .. } => *shrink,
            _ => 0,
        }
    }

    pub fn penalty_cost(&self) -> Option<PenaltyCost> {
        match self {
            Element::Penalty { cost, .. } => Some(*cost),
            _ => None,
        }
    }

    pub fn is_flagged(&self) -> bool {
        matches!(self, Element::Penalty { flagged: true, .. })
    }

    pub fn is_forced_break(&self) -> bool {
        self.penalty_cost().is_some_and(PenaltyCost::is_forced)
    }

    /// A penalty that may be chosen as a break (finite or forced cost).
    pub fn is_breakable_penalty(&self) -> bool {
        self.penalty_cost().is_some_and(|c| !c.is_forbidden())
    }

    /// Footnote bodies anchored at this element. Empty for everything but block boxes.
    pub fn footnotes(&self) -> &[FootnoteBody] {
        match self {
            Element::BlockBox { footnotes, .. } => footnotes,
            _ => &[],
        }
    }

    pub fn has_footnotes(&self) -> bool {
        !self.footnotes().is_empty()
    }

    /// Width contributed to a content length estimate: penalties only count when
    /// a break actually happens at them, so they are left out.
    pub fn content_width(&self) -> Length {
        if self.is_penalty() { 0 } else { self.width() }
    }
}

/// Whether a break is legal at `index`: a glue directly after a box, or a penalty
/// that is not forbidden.
pub fn is_legal_break(elements: &[Element], index: usize) -> bool {
    match elements.get(index) {
        Some(Element::Glue { .. }) => index > 0 && elements[index - 1].is_box(),
        Some(el) => el.is_breakable_penalty(),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glue_break_needs_preceding_box() {
        let elements = vec![
            Element::glue(100, 10, 10),
            Element::boxed(500),
            Element::glue(100, 10, 10),
            Element::glue(100, 10, 10),
        ];
        assert!(!is_legal_break(&elements, 0));
        assert!(!is_legal_break(&elements, 1));
        assert!(is_legal_break(&elements, 2));
        assert!(!is_legal_break(&elements, 3));
        assert!(!is_legal_break(&elements, 4));
    }

    #[test]
    fn test_penalty_breakability() {
        let elements = vec![
            Element::boxed(500),
            Element::forbidden_break(),
            Element::penalty(0, 50, true),
            Element::forced_break(),
        ];
        assert!(!is_legal_break(&elements, 1));
        assert!(is_legal_break(&elements, 2));
        assert!(is_legal_break(&elements, 3));
        assert!(elements[2].is_flagged());
        assert!(elements[3].is_forced_break());
    }

    #[test]
    fn test_block_box_is_a_box() {
        let anchored = Element::block_box(1200, vec![vec![Element::boxed(300)]]);
        assert!(anchored.is_box());
        assert!(anchored.has_footnotes());
        assert_eq!(anchored.width(), 1200);
        assert!(!Element::boxed(10).has_footnotes());
    }

    #[test]
    fn test_serde_shape() {
        let el: Element =
            serde_json::from_str(r#"{ "type": "penalty", "cost": "forced" }"#).unwrap();
        assert!(el.is_forced_break());

        let el: Element = serde_json::from_str(
            r#"{ "type": "glue", "width": 1000, "stretch": 500 }"#,
        )
        .unwrap();
        assert_eq!(el, Element::glue(1000, 500, 0));

        let el: Element =
            serde_json::from_str(r#"{ "type": "penalty", "cost": { "cost": -50 } }"#).unwrap();
        assert_eq!(el.penalty_cost(), Some(PenaltyCost::Cost(-50)));
    }
}
