use folio_types::Length;
use serde::{Deserialize, Serialize};

/// Answers "how much space does container `index` have".
///
/// For pages this is the height of the body region of the `index`-th page,
/// counted from zero. Implementations must be deterministic: the breaker may ask
/// for the same index many times.
pub trait PageProvider {
    fn available_length(&self, page_index: usize) -> Length;
}

impl<F> PageProvider for F
where
    F: Fn(usize) -> Length,
{
    fn available_length(&self, page_index: usize) -> Length {
        self(page_index)
    }
}

/// Every page has the same capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniformPages(pub Length);

impl PageProvider for UniformPages {
    fn available_length(&self, _page_index: usize) -> Length {
        self.0
    }
}

/// Explicit per-page capacities; pages beyond the list use `fallback`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLengths {
    pub lengths: Vec<Length>,
    pub fallback: Length,
}

impl PageLengths {
    pub fn new(lengths: Vec<Length>, fallback: Length) -> Self {
        Self { lengths, fallback }
    }
}

impl PageProvider for PageLengths {
    fn available_length(&self, page_index: usize) -> Length {
        self.lengths
            .get(page_index)
            .copied()
            .unwrap_or(self.fallback)
    }
}
