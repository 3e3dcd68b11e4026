//! Breakpoint nodes and the bookkeeping structures that hold them.
//!
//! Nodes live in an arena for the duration of one run and point at their
//! predecessor by index. The active set groups node ids by the number of
//! containers (lines or pages) that end at the node.

use folio_types::{Element, Length};
use std::fmt;

/// Index of a node inside a [`NodeArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// How tight or loose a container ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Fitness {
    Tight = 0,
    Decent = 1,
    Loose = 2,
    VeryLoose = 3,
}

impl Fitness {
    pub const ALL: [Fitness; 4] = [
        Fitness::Tight,
        Fitness::Decent,
        Fitness::Loose,
        Fitness::VeryLoose,
    ];

    pub fn from_ratio(ratio: f64) -> Self {
        if ratio < -0.5 {
            Fitness::Tight
        } else if ratio <= 0.5 {
            Fitness::Decent
        } else if ratio <= 1.0 {
            Fitness::Loose
        } else {
            Fitness::VeryLoose
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    /// Adjacent containers whose classes are more than one step apart look uneven.
    pub fn is_compatible_with(self, other: Fitness) -> bool {
        self.index().abs_diff(other.index()) <= 1
    }
}

/// Running width, stretch and shrink of the elements up to some position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Totals {
    pub width: Length,
    pub stretch: Length,
    pub shrink: Length,
}

impl Totals {
    fn add(self, element: &Element) -> Self {
        match element {
            Element::Penalty { .. } => self,
            _ => Totals {
                width: self.width + element.width(),
                stretch: self.stretch + element.stretch(),
                shrink: self.shrink + element.shrink(),
            },
        }
    }

    /// `prefix[i]` holds the totals of `elements[..i]`; the vector has one extra
    /// trailing entry for the whole sequence.
    pub fn prefix_sums(elements: &[Element]) -> Vec<Totals> {
        let mut sums = Vec::with_capacity(elements.len() + 1);
        let mut running = Totals::default();
        sums.push(running);
        for element in elements {
            running = running.add(element);
            sums.push(running);
        }
        sums
    }
}

/// A feasible breakpoint.
#[derive(Clone)]
pub struct Node<X> {
    /// Index of the break element in the sequence.
    pub position: usize,
    /// Number of containers ending at or before this break.
    pub line: usize,
    pub fitness: Fitness,
    /// Totals after the break, with the discardable elements that follow it skipped.
    pub totals: Totals,
    pub adjust_ratio: f64,
    pub available_shrink: Length,
    pub available_stretch: Length,
    /// Capacity minus content of the container ending here. Negative means overfull.
    pub difference: Length,
    pub total_demerits: f64,
    pub previous: Option<NodeId>,
    /// Strategy-specific payload.
    pub ext: X,
}

impl<X> Node<X> {
    pub(crate) fn root(position: usize, totals: Totals, ext: X) -> Self {
        Node {
            position,
            line: 0,
            fitness: Fitness::Decent,
            totals,
            adjust_ratio: 0.0,
            available_shrink: 0,
            available_stretch: 0,
            difference: 0,
            total_demerits: 0.0,
            previous: None,
            ext,
        }
    }
}

impl<X: fmt::Debug> fmt::Debug for Node<X> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<Node at {} {}+{}-{} line:{} prev:{} dem:{} ext:{:?}>",
            self.position,
            self.totals.width,
            self.totals.stretch,
            self.totals.shrink,
            self.line,
            self.previous.map_or(-1, |p| p.0 as i64),
            self.total_demerits,
            self.ext
        )
    }
}

/// Owns every node created during one run.
#[derive(Debug, Clone)]
pub struct NodeArena<X> {
    nodes: Vec<Node<X>>,
}

impl<X> Default for NodeArena<X> {
    fn default() -> Self {
        Self { nodes: Vec::new() }
    }
}

impl<X> NodeArena<X> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, node: Node<X>) -> NodeId {
        if let Some(prev) = node.previous {
            let prev = &self.nodes[prev.0];
            debug_assert!(
                prev.position <= node.position,
                "node at {} follows a predecessor at {}",
                node.position,
                prev.position
            );
            debug_assert!(prev.total_demerits <= node.total_demerits);
        }
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    pub fn get(&self, id: NodeId) -> &Node<X> {
        &self.nodes[id.0]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Drops every node positioned after `position`.
    ///
    /// Within one scan nodes are created in position order, and every restart
    /// truncates before scanning again, so the dropped nodes form a suffix.
    pub fn truncate_after(&mut self, position: usize) {
        let keep = self.nodes.partition_point(|n| n.position <= position);
        self.nodes.truncate(keep);
    }

    /// Walks from `id` back to the root, returning ids from last to first.
    pub fn chain(&self, id: NodeId) -> Vec<NodeId> {
        let mut ids = Vec::new();
        let mut current = Some(id);
        while let Some(cur) = current {
            ids.push(cur);
            current = self.nodes[cur.0].previous;
        }
        ids
    }
}

impl<X> std::ops::Index<NodeId> for NodeArena<X> {
    type Output = Node<X>;

    fn index(&self, id: NodeId) -> &Self::Output {
        self.get(id)
    }
}

/// Active nodes bucketed by line number.
#[derive(Debug, Clone, Default)]
pub struct ActiveNodes {
    lines: Vec<Vec<NodeId>>,
    count: usize,
}

impl ActiveNodes {
    pub fn add(&mut self, line: usize, id: NodeId) {
        if line >= self.lines.len() {
            self.lines.resize_with(line + 1, Vec::new);
        }
        self.lines[line].push(id);
        self.count += 1;
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn clear(&mut self) {
        self.lines.clear();
        self.count = 0;
    }

    /// Range of line numbers that currently hold nodes.
    pub fn line_range(&self) -> std::ops::Range<usize> {
        let start = self.lines.iter().position(|l| !l.is_empty());
        match start {
            Some(start) => {
                let end = self.lines.iter().rposition(|l| !l.is_empty()).map_or(start, |e| e);
                start..end + 1
            }
            None => 0..0,
        }
    }

    /// Removes a line's nodes so they can be scanned while new nodes are added
    /// to other lines. Pair with [`ActiveNodes::restore_line`].
    pub(crate) fn take_line(&mut self, line: usize) -> Vec<NodeId> {
        match self.lines.get_mut(line) {
            Some(ids) => {
                let ids = std::mem::take(ids);
                self.count -= ids.len();
                ids
            }
            None => Vec::new(),
        }
    }

    pub(crate) fn restore_line(&mut self, line: usize, ids: Vec<NodeId>) {
        for id in ids {
            self.add(line, id);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.lines.iter().flatten().copied()
    }
}

/// A candidate predecessor for a break, kept per fitness class.
#[derive(Debug, Clone)]
pub struct Record<X> {
    pub demerits: f64,
    pub node: NodeId,
    pub adjust_ratio: f64,
    pub difference: Length,
    pub available_shrink: Length,
    pub available_stretch: Length,
    pub ext: X,
}

/// The best way found so far to end a container at the current break, one slot
/// per fitness class. Reset after every break.
#[derive(Debug, Clone)]
pub struct BestRecords<X> {
    records: [Option<Record<X>>; 4],
}

impl<X> Default for BestRecords<X> {
    fn default() -> Self {
        Self {
            records: std::array::from_fn(|_| None),
        }
    }
}

impl<X> BestRecords<X> {
    /// Keeps `record` if it beats the current one of its class. Ties go to the
    /// older source node so the outcome does not depend on scan order.
    pub fn offer(&mut self, fitness: Fitness, record: Record<X>) -> bool {
        let slot = &mut self.records[fitness.index()];
        let improves = match slot {
            None => true,
            Some(current) => {
                record.demerits < current.demerits
                    || (record.demerits == current.demerits && record.node < current.node)
            }
        };
        if improves {
            *slot = Some(record);
        }
        improves
    }

    pub fn has_records(&self) -> bool {
        self.records.iter().any(Option::is_some)
    }

    pub fn get(&self, fitness: Fitness) -> Option<&Record<X>> {
        self.records[fitness.index()].as_ref()
    }

    pub fn min_demerits(&self) -> Option<f64> {
        self.records
            .iter()
            .flatten()
            .map(|r| r.demerits)
            .min_by(f64::total_cmp)
    }

    pub fn reset(&mut self) {
        self.records = std::array::from_fn(|_| None);
    }
}
