pub mod breaking;
pub mod footnotes;
pub mod line;
pub mod node;
pub mod page;

pub use self::breaking::{BreakStrategy, BreakingAlgorithm, BreakingResult, INFINITE_RATIO};
pub use self::footnotes::{FootnoteCursor, FootnoteLedger};
pub use self::line::{LineBreak, LineBreaking, break_lines};
pub use self::node::{Fitness, Node, NodeArena, NodeId};
pub use self::page::{PageBreaker, PageStrategy};
