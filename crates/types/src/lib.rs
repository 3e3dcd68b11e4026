pub mod element;
pub mod length;
pub mod sequence;

pub use element::{Element, FootnoteBody, PenaltyCost, is_legal_break};
pub use length::{Length, MinOptMax};
pub use sequence::Sequence;
