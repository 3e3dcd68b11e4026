//! Optimal-fit breaking of a box/glue/penalty sequence into containers.
//!
//! The engine is a Knuth-Plass style dynamic program: it walks the sequence once,
//! keeps a set of active breakpoints, and at every legal break evaluates how well a
//! container starting at each active node would end there. What a "container" is
//! (a line, a page with footnotes) is decided by a [`BreakStrategy`].

use super::node::{
    ActiveNodes, BestRecords, Fitness, Node, NodeArena, NodeId, Record, Totals,
};
use crate::BreakError;
use crate::config::{Alignment, BreakingConfig};
use crate::perf::{BreakEvent, NOOP_PROFILER, Profiler};
use folio_types::{Element, Length, PenaltyCost, is_legal_break};
use std::fmt::Debug;
use std::time::Instant;

/// Ratio reported when a container would need elasticity it does not have.
pub const INFINITE_RATIO: f64 = 1000.0;

/// Container-specific behavior plugged into the generic engine.
pub trait BreakStrategy {
    /// Extra state carried on every node.
    type Ext: Clone + Debug + Default;

    /// Capacity of the container with the given index.
    fn line_width(&self, line: usize) -> Length;

    /// Called for every box the scan passes over.
    fn handle_box(&mut self, _index: usize) {}

    /// Content beyond the main flow that a container starting after `node` and
    /// ending at `index` must also hold, given `content` of main flow so far.
    /// Returns the added length and the payload for a node created here.
    fn extra_content(
        &mut self,
        node: &Node<Self::Ext>,
        _index: usize,
        _content: Length,
    ) -> (Length, Self::Ext) {
        (0, node.ext.clone())
    }

    /// Additional `(stretch, shrink)` available to a container starting after `node`.
    fn extra_elasticity(&self, _node: &Node<Self::Ext>) -> (Length, Length) {
        (0, 0)
    }

    fn extra_demerits(&self, _ext: &Self::Ext) -> f64 {
        0.0
    }

    /// Called once all active nodes were evaluated against the break at `index`.
    fn legal_break_considered(&mut self, _index: usize) {}

    /// Called before the scan resumes after `node`.
    fn restart_from(&mut self, _node: &Node<Self::Ext>) {}
}

/// Order in which the nodes of one line group are evaluated. The result must not
/// depend on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum ScanOrder {
    #[default]
    Forward,
    Reverse,
}

/// The node arena of a finished run and the node the best chain ends at.
#[derive(Debug)]
pub struct BreakingResult<X> {
    pub arena: NodeArena<X>,
    pub best: NodeId,
}

impl<X> BreakingResult<X> {
    /// Ids of the chosen breaks in document order, the starting node excluded.
    pub fn breaks(&self) -> Vec<NodeId> {
        let mut chain = self.arena.chain(self.best);
        chain.pop();
        chain.reverse();
        chain
    }
}

pub struct BreakingAlgorithm<'c> {
    config: &'c BreakingConfig,
    profiler: &'c dyn Profiler,
    order: ScanOrder,
}

impl<'c> BreakingAlgorithm<'c> {
    pub fn new(config: &'c BreakingConfig) -> Self {
        Self {
            config,
            profiler: &NOOP_PROFILER,
            order: ScanOrder::Forward,
        }
    }

    pub fn with_profiler(mut self, profiler: &'c dyn Profiler) -> Self {
        self.profiler = profiler;
        self
    }

    pub(crate) fn with_scan_order(mut self, order: ScanOrder) -> Self {
        self.order = order;
        self
    }

    pub fn find_breaking_points<S: BreakStrategy>(
        &self,
        elements: &[Element],
        strategy: &mut S,
    ) -> Result<BreakingResult<S::Ext>, BreakError> {
        if elements.is_empty() {
            return Err(BreakError::EmptySequence);
        }
        let start = Instant::now();
        let mut run = Run::new(self, elements, strategy);
        run.scan()?;
        let best = run.best_active()?;
        self.profiler.record("break_scan", start.elapsed());
        log::debug!(
            "Found {} breaks over {} elements ({} nodes)",
            run.arena[best].line,
            elements.len(),
            run.arena.len()
        );
        Ok(BreakingResult {
            arena: run.arena,
            best,
        })
    }
}

/// State of one `find_breaking_points` call.
struct Run<'r, S: BreakStrategy> {
    config: &'r BreakingConfig,
    profiler: &'r dyn Profiler,
    order: ScanOrder,
    elements: &'r [Element],
    strategy: &'r mut S,
    prefix: Vec<Totals>,
    arena: NodeArena<S::Ext>,
    active: ActiveNodes,
    best: BestRecords<S::Ext>,
    too_short: Option<Node<S::Ext>>,
    too_long: Option<Node<S::Ext>>,
    last_restart: usize,
    start: usize,
}

impl<'r, S: BreakStrategy> Run<'r, S> {
    fn new(algorithm: &BreakingAlgorithm<'r>, elements: &'r [Element], strategy: &'r mut S) -> Self {
        let config = algorithm.config;
        let start = if config.alignment == Alignment::Center {
            0
        } else {
            elements.iter().position(Element::is_box).unwrap_or(0)
        };
        let prefix = Totals::prefix_sums(elements);
        let mut arena = NodeArena::new();
        let mut active = ActiveNodes::default();
        let root = arena.push(Node::root(start, prefix[start], S::Ext::default()));
        active.add(0, root);
        Self {
            config,
            profiler: algorithm.profiler,
            order: algorithm.order,
            elements,
            strategy,
            prefix,
            arena,
            active,
            best: BestRecords::default(),
            too_short: None,
            too_long: None,
            last_restart: start,
            start,
        }
    }

    fn scan(&mut self) -> Result<(), BreakError> {
        let elements = self.elements;
        let mut i = self.start;
        while i < elements.len() {
            let element = &elements[i];
            if element.is_box() {
                self.strategy.handle_box(i);
            } else if is_legal_break(elements, i)
                && (self.config.hyphenation_allowed || !element.is_flagged())
            {
                self.consider_legal_break(i);
            }

            if self.active.is_empty() {
                if !self.config.force {
                    log::debug!("No feasible set of breaks (threshold {})", self.config.threshold);
                    return Err(BreakError::NoFeasibleBreaks(i));
                }
                i = self.restart()?;
                continue;
            }
            i += 1;
        }
        Ok(())
    }

    fn consider_legal_break(&mut self, index: usize) {
        self.profiler.count(BreakEvent::LegalBreak);
        self.too_long = None;
        let elements = self.elements;
        let element = &elements[index];
        let running = self.prefix[index];
        let is_last = index + 1 == elements.len();
        let ragged_last = is_last && self.config.alignment_last != Alignment::Justify;
        let mut feasible_here = false;

        for line in self.active.line_range() {
            let ids = self.active.take_line(line);
            let mut keep = vec![true; ids.len()];
            let order: Vec<usize> = match self.order {
                ScanOrder::Forward => (0..ids.len()).collect(),
                ScanOrder::Reverse => (0..ids.len()).rev().collect(),
            };
            for k in order {
                let id = ids[k];
                let node = &self.arena[id];
                if node.position == index {
                    continue;
                }

                let mut content = running.width - node.totals.width;
                if element.is_penalty() {
                    content += element.width();
                }
                let (extra, ext) = self.strategy.extra_content(node, index, content);
                let difference = self.strategy.line_width(node.line) - (content + extra);
                let (extra_stretch, extra_shrink) = self.strategy.extra_elasticity(node);
                let available_stretch = running.stretch - node.totals.stretch + extra_stretch;
                let available_shrink = running.shrink - node.totals.shrink + extra_shrink;
                let ratio = if ragged_last && difference > 0 {
                    0.0
                } else {
                    adjustment_ratio(difference, available_stretch, available_shrink)
                };
                log::trace!("break {} from {:?}: r={:.3} diff={}", index, node, ratio, difference);

                if ratio < -1.0 || element.is_forced_break() {
                    keep[k] = false;
                    self.profiler.count(BreakEvent::NodeDeactivated);
                }

                let feasible = (-1.0..=self.config.threshold).contains(&ratio);
                if !feasible && !self.config.force {
                    continue;
                }
                let fitness = Fitness::from_ratio(ratio);
                let demerits = self.demerits(node, element, fitness, ratio)
                    + self.strategy.extra_demerits(&ext);
                let record = Record {
                    demerits,
                    node: id,
                    adjust_ratio: ratio,
                    difference,
                    available_shrink,
                    available_stretch,
                    ext,
                };
                if feasible {
                    feasible_here = true;
                    self.best.offer(fitness, record);
                } else {
                    self.keep_fallback(index, line, fitness, record);
                }
            }
            let kept = ids
                .into_iter()
                .zip(keep)
                .filter_map(|(id, keep)| keep.then_some(id))
                .collect();
            self.active.restore_line(line, kept);
            self.add_breaks(line, index);
        }
        // Decided once per break so the fallback does not depend on node order.
        if feasible_here {
            self.too_short = None;
        }
        self.strategy.legal_break_considered(index);
    }

    fn demerits(
        &self,
        node: &Node<S::Ext>,
        element: &Element,
        fitness: Fitness,
        ratio: f64,
    ) -> f64 {
        let f = 1.0 + 100.0 * ratio.abs().powi(3);
        let mut demerits = match element.penalty_cost() {
            Some(PenaltyCost::Cost(p)) if p >= 0 => (f + p as f64).powi(2),
            // Clamped so a chain's demerits never decrease.
            Some(PenaltyCost::Cost(p)) => (f * f - (p as f64).powi(2)).max(0.0),
            _ => f * f,
        };
        if element.is_flagged() && self.elements[node.position].is_flagged() {
            demerits += self.config.repeated_flagged_demerit;
        }
        if !fitness.is_compatible_with(node.fitness) {
            demerits += self.config.incompatible_fitness_demerit;
        }
        node.total_demerits + demerits
    }

    /// Remembers an infeasible candidate in case every node gets deactivated.
    fn keep_fallback(
        &mut self,
        index: usize,
        line: usize,
        fitness: Fitness,
        record: Record<S::Ext>,
    ) {
        let too_long = record.adjust_ratio <= -1.0;
        let current = if too_long { &self.too_long } else { &self.too_short };
        let replace = match current {
            None => true,
            Some(current) => {
                let source = current.previous.map_or(usize::MAX, NodeId::index);
                record.demerits < current.total_demerits
                    || (record.demerits == current.total_demerits && record.node.index() < source)
            }
        };
        if !replace {
            return;
        }
        let node = self.node_from(index, line, fitness, record);
        if too_long {
            self.too_long = Some(node);
        } else {
            self.too_short = Some(node);
        }
    }

    fn node_from(
        &self,
        index: usize,
        line: usize,
        fitness: Fitness,
        record: Record<S::Ext>,
    ) -> Node<S::Ext> {
        Node {
            position: index,
            line: line + 1,
            fitness,
            totals: self.totals_after_break(index),
            adjust_ratio: record.adjust_ratio,
            available_shrink: record.available_shrink,
            available_stretch: record.available_stretch,
            difference: record.difference,
            total_demerits: record.demerits,
            previous: Some(record.node),
            ext: record.ext,
        }
    }

    /// Totals at the start of the container following a break at `index`:
    /// glue and penalties directly after the break are discarded.
    fn totals_after_break(&self, index: usize) -> Totals {
        let mut k = index;
        while k < self.elements.len() {
            let element = &self.elements[k];
            if element.is_box() || (element.is_forced_break() && k != index) {
                break;
            }
            k += 1;
        }
        self.prefix[k]
    }

    fn add_breaks(&mut self, line: usize, index: usize) {
        let Some(min) = self.best.min_demerits() else {
            return;
        };
        let limit = min + self.config.incompatible_fitness_demerit;
        let best = std::mem::take(&mut self.best);
        for fitness in Fitness::ALL {
            if let Some(record) = best.get(fitness)
                && record.demerits <= limit
            {
                let node = self.node_from(index, line, fitness, record.clone());
                let id = self.arena.push(node);
                self.active.add(line + 1, id);
                self.profiler.count(BreakEvent::NodeCreated);
            }
        }
    }

    /// Resumes the scan after the least bad infeasible candidate. Returns the
    /// index to continue from.
    fn restart(&mut self) -> Result<usize, BreakError> {
        let too_short = self.too_short.take();
        let too_long = self.too_long.take();
        let mut candidate = match too_short {
            Some(node) if node.position != self.last_restart => node,
            _ => too_long.ok_or_else(|| {
                BreakError::Internal("no candidate to restart from".to_string())
            })?,
        };
        // The fallback's own container has an unbounded ratio. Its cost is left
        // out so the containers after it are still compared by their own costs.
        if let Some(previous) = candidate.previous {
            candidate.total_demerits = self.arena[previous].total_demerits;
        }
        candidate.fitness = Fitness::Decent;
        log::debug!("Restarting at node {:?}", candidate);
        self.profiler.count(BreakEvent::Restart);

        self.arena.truncate_after(candidate.position);
        self.strategy.restart_from(&candidate);
        let position = candidate.position;
        let line = candidate.line;
        let id = self.arena.push(candidate);
        self.active.clear();
        self.active.add(line, id);
        self.best.reset();
        self.last_restart = position;
        Ok(position + 1)
    }

    /// The furthest active node, least demerits first, then the oldest.
    fn best_active(&self) -> Result<NodeId, BreakError> {
        self.active
            .iter()
            .max_by(|&a, &b| {
                let (na, nb) = (&self.arena[a], &self.arena[b]);
                na.position
                    .cmp(&nb.position)
                    .then(nb.total_demerits.total_cmp(&na.total_demerits))
                    .then(b.cmp(&a))
            })
            .ok_or_else(|| BreakError::Internal("no active node left".to_string()))
    }
}

/// How much of its elasticity a container has to use to absorb `difference`.
pub fn adjustment_ratio(difference: Length, stretch: Length, shrink: Length) -> f64 {
    if difference > 0 {
        if stretch > 0 {
            difference as f64 / stretch as f64
        } else {
            INFINITE_RATIO
        }
    } else if difference < 0 {
        if shrink > 0 {
            difference as f64 / shrink as f64
        } else {
            -INFINITE_RATIO
        }
    } else {
        0.0
    }
}
