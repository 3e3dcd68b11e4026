use crate::element::{Element, FootnoteBody};
use crate::length::Length;
use serde::{Deserialize, Serialize};
use std::ops::Deref;

/// An ordered list of primitives, built once by a producer and read-only while it
/// is being broken.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sequence {
    elements: Vec<Element>,
}

impl Sequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            elements: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, element: Element) -> &mut Self {
        self.elements.push(element);
        self
    }

    pub fn push_box(&mut self, width: Length) -> &mut Self {
        self.push(Element::boxed(width))
    }

    /// Appends a box anchoring the given footnote bodies.
    pub fn push_block_box(&mut self, width: Length, footnotes: Vec<FootnoteBody>) -> &mut Self {
        self.push(Element::block_box(width, footnotes))
    }

    pub fn push_glue(&mut self, width: Length, stretch: Length, shrink: Length) -> &mut Self {
        self.push(Element::glue(width, stretch, shrink))
    }

    pub fn push_penalty(&mut self, width: Length, cost: i32, flagged: bool) -> &mut Self {
        self.push(Element::penalty(width, cost, flagged))
    }

    pub fn push_forced_break(&mut self) -> &mut Self {
        self.push(Element::forced_break())
    }

    /// Closes the sequence: trailing glue is dropped and a forced break appended,
    /// unless the sequence already ends with one.
    pub fn end_sequence(&mut self) -> &mut Self {
        if self.ends_with_forced_break() {
            return self;
        }
        while self.elements.last().is_some_and(Element::is_glue) {
            self.elements.pop();
        }
        self.push_forced_break()
    }

    pub fn ends_with_forced_break(&self) -> bool {
        self.elements.last().is_some_and(Element::is_forced_break)
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Number of footnote bodies anchored anywhere in the sequence.
    pub fn footnote_count(&self) -> usize {
        self.elements.iter().map(|e| e.footnotes().len()).sum()
    }
}

impl Deref for Sequence {
    type Target = [Element];

    fn deref(&self) -> &Self::Target {
        &self.elements
    }
}

impl From<Vec<Element>> for Sequence {
    fn from(elements: Vec<Element>) -> Self {
        Self { elements }
    }
}

impl FromIterator<Element> for Sequence {
    fn from_iter<I: IntoIterator<Item = Element>>(iter: I) -> Self {
        Self {
            elements: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Sequence {
    type Item = &'a Element;
    type IntoIter = std::slice::Iter<'a, Element>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}
