//! Page breaking: the generic engine with pages as containers and footnotes
//! competing with the main flow for space.

use super::breaking::{BreakStrategy, BreakingAlgorithm, BreakingResult, ScanOrder};
use super::footnotes::{FootnoteCursor, FootnoteLedger};
use super::node::{Fitness, Node, NodeArena, NodeId};
use crate::BreakError;
use crate::config::BreakingConfig;
use crate::interface::PageProvider;
use crate::output::PageBreak;
use crate::perf::{BreakEvent, NOOP_PROFILER, Profiler};
use crate::util::validate_sequence;
use folio_types::{Element, Length, MinOptMax, is_legal_break};

/// Result of the last "is there a legal break between these two" scan.
#[derive(Debug, Clone, Copy)]
struct BreakScan {
    from: usize,
    to: usize,
    none_between: bool,
}

pub struct PageStrategy<'a, P: ?Sized> {
    elements: &'a [Element],
    provider: &'a P,
    separator: MinOptMax,
    split_demerits: f64,
    deferred_demerits: f64,
    ledger: FootnoteLedger<'a>,
    last_scan: Option<BreakScan>,
    profiler: &'a dyn Profiler,
}

impl<'a, P: PageProvider + ?Sized> PageStrategy<'a, P> {
    pub fn new(elements: &'a [Element], provider: &'a P, config: &BreakingConfig) -> Self {
        Self {
            elements,
            provider,
            separator: config.footnote_separator,
            split_demerits: config.split_footnote_demerits,
            deferred_demerits: config.deferred_footnote_demerits,
            ledger: FootnoteLedger::new(),
            last_scan: None,
            profiler: &NOOP_PROFILER,
        }
    }

    pub fn with_profiler(mut self, profiler: &'a dyn Profiler) -> Self {
        self.profiler = profiler;
        self
    }

    pub fn ledger(&self) -> &FootnoteLedger<'a> {
        &self.ledger
    }

    /// Old footnotes may be cut or deferred when the page starting after `node`
    /// is the first feasible one and the page before left footnotes over.
    fn can_defer_old_footnotes(&mut self, node: &Node<FootnoteCursor>, index: usize) -> bool {
        self.no_break_between(node.position, index) && self.ledger.has_deferred(&node.ext)
    }

    fn no_break_between(&mut self, from: usize, to: usize) -> bool {
        // No break in from..to means none in any later start..to either; a break
        // in from..to is also one in any earlier start..later end.
        if let Some(scan) = self.last_scan
            && ((from >= scan.from && to == scan.to && scan.none_between)
                || (from <= scan.from && to >= scan.to && !scan.none_between))
        {
            return scan.none_between;
        }

        let mut index = from + 1;
        while index < to && !self.elements[index].is_box() {
            index += 1;
        }
        while index < to && !is_legal_break(self.elements, index) {
            index += 1;
        }
        let none_between = index >= to;
        self.last_scan = Some(BreakScan {
            from,
            to,
            none_between,
        });
        none_between
    }

    /// Adds footnote-only pages after `last` until every footnote is placed.
    ///
    /// Each of these pages offers its full capacity to the footnotes.
    pub fn finish(&self, arena: &mut NodeArena<FootnoteCursor>, last: NodeId) -> NodeId {
        let mut current = last;
        loop {
            let node = &arena[current];
            let cursor = node.ext;
            let pending = self.ledger.total() - cursor.inserted;
            if pending <= 0 {
                return current;
            }
            let page = node.line;
            let available = self.provider.available_length(page);
            let (placed, next) = if pending <= available {
                (pending, self.ledger.end_cursor())
            } else if let Some(split) = self.ledger.split(&cursor, available, true) {
                self.profiler.count(BreakEvent::FootnoteSplit);
                split
            } else {
                log::warn!(
                    "Footnote content at list {} does not fit on page {} even alone ({} available)",
                    cursor.list,
                    page,
                    available
                );
                self.ledger.forced_prefix(&cursor)
            };
            self.profiler.count(BreakEvent::FootnotePage);
            log::debug!("Footnote-only page {} holds {} of {} pending", page, placed, pending);

            let trailing = Node {
                position: node.position,
                line: node.line + 1,
                fitness: Fitness::Decent,
                totals: node.totals,
                adjust_ratio: 0.0,
                available_shrink: self.separator.shrink(),
                available_stretch: self.separator.stretch(),
                difference: available - placed,
                total_demerits: node.total_demerits,
                previous: Some(current),
                ext: next,
            };
            current = arena.push(trailing);
        }
    }

    /// Walks the chain ending at `last` into page records in document order.
    pub fn extract(
        &self,
        arena: &NodeArena<FootnoteCursor>,
        last: NodeId,
        auto_height: bool,
    ) -> Vec<PageBreak> {
        let mut pages = Vec::new();
        let mut current = last;
        while let Some(previous) = arena[current].previous {
            let node = &arena[current];
            let is_last = current == last;

            let overflows = node.difference + node.available_shrink < 0;
            if overflows && !auto_height {
                log::warn!(
                    "Page {} overflows by {} at position {}",
                    node.line - 1,
                    -(node.difference + node.available_shrink),
                    node.position
                );
            }

            let mut ratio = node.adjust_ratio;
            let mut difference = node.difference;
            if ratio < 0.0 {
                difference = 0;
            } else if ratio <= 1.0 && !is_last {
                difference = 0;
            } else if ratio > 1.0 {
                ratio = 1.0;
                difference -= node.available_stretch;
            } else {
                ratio = 0.0;
            }

            pages.push(PageBreak {
                page_index: node.line - 1,
                position: node.position,
                footnotes: self.ledger.placed_between(&arena[previous].ext, &node.ext),
                adjust_ratio: ratio,
                difference,
                available_stretch: node.available_stretch,
                available_shrink: node.available_shrink,
                overflows,
                total_demerits: node.total_demerits,
            });
            current = previous;
        }
        pages.reverse();
        pages
    }
}

impl<P: PageProvider + ?Sized> BreakStrategy for PageStrategy<'_, P> {
    type Ext = FootnoteCursor;

    fn line_width(&self, line: usize) -> Length {
        self.provider.available_length(line)
    }

    fn handle_box(&mut self, index: usize) {
        let elements = self.elements;
        let footnotes = elements[index].footnotes();
        if !footnotes.is_empty() {
            self.ledger.register(index, footnotes);
        }
    }

    fn extra_content(
        &mut self,
        node: &Node<FootnoteCursor>,
        index: usize,
        content: Length,
    ) -> (Length, FootnoteCursor) {
        let cursor = node.ext;
        let pending = self.ledger.total() - cursor.inserted;
        if pending <= 0 {
            return if self.ledger.is_empty() {
                (0, cursor)
            } else {
                (0, self.ledger.end_cursor())
            };
        }

        let width = self.line_width(node.line);
        let content = content + self.separator.opt;
        if content + pending <= width {
            return (self.separator.opt + pending, self.ledger.end_cursor());
        }
        let can_defer_old = self.can_defer_old_footnotes(node, index);
        if (can_defer_old || self.ledger.has_new())
            && let Some((split, next)) = self.ledger.split(&cursor, width - content, can_defer_old)
        {
            self.profiler.count(BreakEvent::FootnoteSplit);
            return (self.separator.opt + split, next);
        }
        // Nothing can be cut: charge everything so the break is rejected as overfull.
        (self.separator.opt + pending, self.ledger.end_cursor())
    }

    fn extra_elasticity(&self, node: &Node<FootnoteCursor>) -> (Length, Length) {
        if node.ext.inserted < self.ledger.total() {
            (self.separator.stretch(), self.separator.shrink())
        } else {
            (0, 0)
        }
    }

    fn extra_demerits(&self, cursor: &FootnoteCursor) -> f64 {
        if self.ledger.is_empty() {
            return 0.0;
        }
        let last = self.ledger.len() - 1;
        let mut demerits = 0.0;
        if cursor.list < last {
            demerits += (last - cursor.list) as f64 * self.deferred_demerits;
        }
        if !self.ledger.is_list_complete(cursor) {
            demerits += self.split_demerits;
        }
        demerits
    }

    fn legal_break_considered(&mut self, _index: usize) {
        self.ledger.clear_new();
    }

    fn restart_from(&mut self, node: &Node<FootnoteCursor>) {
        self.ledger.rollback_to(node.position);
        self.last_scan = None;
    }
}

/// Breaks a sequence into pages.
pub struct PageBreaker<'c, P> {
    config: &'c BreakingConfig,
    provider: P,
    profiler: &'c dyn Profiler,
    order: ScanOrder,
}

impl<'c, P: PageProvider> PageBreaker<'c, P> {
    pub fn new(config: &'c BreakingConfig, provider: P) -> Self {
        Self {
            config,
            provider,
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

    /// Finds the least-demerit set of page breaks for `elements`.
    ///
    /// The sequence must end with a forced break. Pages that cannot be made to
    /// fit are reported with `overflows` set rather than failing the run.
    pub fn find_breaks(&self, elements: &[Element]) -> Result<Vec<PageBreak>, BreakError> {
        self.config.validate()?;
        validate_sequence(elements)?;

        let mut strategy =
            PageStrategy::new(elements, &self.provider, self.config).with_profiler(self.profiler);
        let BreakingResult { mut arena, best } = BreakingAlgorithm::new(self.config)
            .with_profiler(self.profiler)
            .with_scan_order(self.order)
            .find_breaking_points(elements, &mut strategy)?;

        let last = strategy.finish(&mut arena, best);
        let pages = strategy.extract(&arena, last, self.config.auto_height);
        log::debug!(
            "Broke {} elements into {} pages ({} footnote lists)",
            elements.len(),
            pages.len(),
            strategy.ledger().len()
        );
        Ok(pages)
    }
}
