//! Bookkeeping for footnote bodies anchored in the main flow.
//!
//! Every anchored body becomes one list in the ledger, in document order. A page
//! node remembers how far into the ledger it has placed footnotes through a
//! [`FootnoteCursor`]; the ledger itself never tracks placement.

use crate::output::{FootnotePosition, FootnoteRange};
use crate::util::content_length_all;
use folio_types::{Element, Length, is_legal_break};

/// How much footnote content is placed up to and including some page.
///
/// `list`/`element` name the last placed element. `element == None` means that
/// nothing of `list` is placed yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FootnoteCursor {
    pub inserted: Length,
    pub list: usize,
    pub element: Option<usize>,
}

#[derive(Debug, Clone, Default)]
pub struct FootnoteLedger<'a> {
    lists: Vec<&'a [Element]>,
    /// `cumulative[i]` is the length of lists `0..=i`.
    cumulative: Vec<Length>,
    /// Index of the anchoring element of each list.
    anchors: Vec<usize>,
    /// First list registered since the last legal break was considered.
    first_new: Option<usize>,
}

impl<'a> FootnoteLedger<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, anchor: usize, bodies: &'a [Vec<Element>]) {
        for body in bodies {
            if self.first_new.is_none() {
                self.first_new = Some(self.lists.len());
            }
            let length = content_length_all(body);
            self.cumulative.push(self.total() + length);
            self.lists.push(body.as_slice());
            self.anchors.push(anchor);
        }
    }

    pub fn len(&self) -> usize {
        self.lists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }

    pub fn total(&self) -> Length {
        self.cumulative.last().copied().unwrap_or(0)
    }

    pub fn has_new(&self) -> bool {
        self.first_new.is_some()
    }

    pub fn clear_new(&mut self) {
        self.first_new = None;
    }

    /// Forgets every list anchored after `position`.
    pub fn rollback_to(&mut self, position: usize) {
        let keep = self.anchors.partition_point(|&a| a <= position);
        self.lists.truncate(keep);
        self.cumulative.truncate(keep);
        self.anchors.truncate(keep);
        self.first_new = None;
    }

    /// Cursor with every registered list placed.
    pub fn end_cursor(&self) -> FootnoteCursor {
        match self.lists.len() {
            0 => FootnoteCursor::default(),
            n => FootnoteCursor {
                inserted: self.total(),
                list: n - 1,
                element: self.lists[n - 1].len().checked_sub(1),
            },
        }
    }

    pub fn is_list_complete(&self, cursor: &FootnoteCursor) -> bool {
        match self.lists.get(cursor.list) {
            None => true,
            Some(list) => match cursor.element {
                None => list.is_empty(),
                Some(e) => e + 1 >= list.len(),
            },
        }
    }

    /// `(list, element)` of the first element not yet placed, skipping empty lists.
    /// Returns `(self.len(), 0)` once everything is placed.
    pub fn next_unplaced(&self, cursor: &FootnoteCursor) -> (usize, usize) {
        let (mut list, mut element) = match cursor.element {
            None => (cursor.list, 0),
            Some(e) => (cursor.list, e + 1),
        };
        while list < self.lists.len() && element >= self.lists[list].len() {
            list += 1;
            element = 0;
        }
        (list.min(self.lists.len()), element)
    }

    /// Whether the page ending at `cursor` left footnote content for later pages.
    pub fn has_deferred(&self, cursor: &FootnoteCursor) -> bool {
        let deferred_new = self.first_new.is_some_and(|first| {
            first != 0 && (cursor.list + 1 < first || !self.is_list_complete(cursor))
        });
        deferred_new || cursor.inserted < self.total()
    }

    /// The largest amount of pending footnote content that fits in `available`,
    /// cut at a legal break inside some footnote body.
    ///
    /// Old lists registered before the latest break cannot be cut or deferred
    /// unless `can_defer_old` is set. Returns the added length and the cursor
    /// after it, or `None` when not even the first piece fits.
    pub fn split(
        &self,
        cursor: &FootnoteCursor,
        available: Length,
        can_defer_old: bool,
    ) -> Option<(Length, FootnoteCursor)> {
        if available <= 0 {
            return None;
        }
        let base = cursor.inserted;
        let (mut list, mut start) = self.next_unplaced(cursor);
        if list >= self.lists.len() {
            return None;
        }

        let mut length: Length = 0;
        let mut added = false;
        if list + 1 < self.lists.len() {
            if !can_defer_old
                && let Some(first_new) = self.first_new
                && first_new > list
            {
                length = self.cumulative[first_new - 1] - base;
                list = first_new;
                start = 0;
            }
            while list < self.lists.len() && self.cumulative[list] - base <= available {
                length = self.cumulative[list] - base;
                added = true;
                list += 1;
                start = 0;
            }
            if list >= self.lists.len() {
                return Some((length, self.end_cursor()));
            }
        }

        let body = self.lists[list];
        let mut prev_length: Length = 0;
        let mut prev_break: Option<usize> = None;
        let mut last_break: Option<usize> = None;
        let mut next = start;
        loop {
            if added && length > available {
                break;
            }
            if added {
                prev_length = length;
                prev_break = last_break;
            }
            added = true;
            if next >= body.len() {
                break;
            }
            match self.next_sub_break(body, &mut next, &mut length) {
                Some(index) => last_break = Some(index),
                None => {
                    // Ran off the end of the body: the whole rest is one piece.
                    if length <= available {
                        prev_length = length;
                        prev_break = Some(body.len() - 1);
                    }
                    break;
                }
            }
        }

        if prev_length <= 0 {
            return None;
        }
        let cursor = match prev_break {
            Some(index) => FootnoteCursor {
                inserted: base + prev_length,
                list,
                element: Some(index),
            },
            None => self.complete_before(list, base + prev_length),
        };
        Some((prev_length, cursor))
    }

    /// The smallest piece of the next unplaced list: up to its first legal break,
    /// or the whole rest of it.
    pub fn forced_prefix(&self, cursor: &FootnoteCursor) -> (Length, FootnoteCursor) {
        let (list, start) = self.next_unplaced(cursor);
        if list >= self.lists.len() {
            return (0, self.end_cursor());
        }
        let body = self.lists[list];
        let mut length = 0;
        for index in start..body.len() {
            let element = &body[index];
            if index > start && is_legal_break(body, index) {
                let cursor = FootnoteCursor {
                    inserted: cursor.inserted + length,
                    list,
                    element: Some(index),
                };
                return (length, cursor);
            }
            length += element.content_width();
        }
        let cursor = FootnoteCursor {
            inserted: cursor.inserted + length,
            list,
            element: Some(body.len() - 1),
        };
        (length, cursor)
    }

    /// Footnote elements placed between two cursors, `None` if there are none.
    pub fn placed_between(
        &self,
        before: &FootnoteCursor,
        after: &FootnoteCursor,
    ) -> Option<FootnoteRange> {
        let start = self.next_unplaced(before);
        let end = self.next_unplaced(after);
        if end <= start {
            return None;
        }
        let last = if end.1 > 0 {
            (end.0, end.1 - 1)
        } else {
            let list = (0..end.0).rev().find(|&l| !self.lists[l].is_empty())?;
            (list, self.lists[list].len() - 1)
        };
        Some(FootnoteRange {
            first: FootnotePosition {
                list: start.0,
                element: start.1,
            },
            last: FootnotePosition {
                list: last.0,
                element: last.1,
            },
        })
    }

    /// Advances `next` through `body` up to its next legal break, adding the
    /// widths before it to `length`.
    fn next_sub_break(&self, body: &[Element], next: &mut usize, length: &mut Length) -> Option<usize> {
        while *next < body.len() {
            let index = *next;
            *next += 1;
            let element = &body[index];
            if element.is_box() {
                *length += element.width();
            } else if element.is_glue() {
                if is_legal_break(body, index) {
                    return Some(index);
                }
                *length += element.width();
            } else if element.is_breakable_penalty() {
                return Some(index);
            }
        }
        None
    }

    fn complete_before(&self, list: usize, inserted: Length) -> FootnoteCursor {
        let list = list.saturating_sub(1);
        FootnoteCursor {
            inserted,
            list,
            element: self.lists.get(list).and_then(|l| l.len().checked_sub(1)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split_body() -> Vec<Element> {
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

    #[test]
    fn test_register_tracks_totals_and_new_marker() {
        let bodies = vec![vec![Element::boxed(300)], vec![Element::boxed(200)]];
        let mut ledger = FootnoteLedger::new();
        ledger.register(4, &bodies);

        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.total(), 500);
        assert!(ledger.has_new());

        ledger.clear_new();
        assert!(!ledger.has_new());
    }

    #[test]
    fn test_split_stops_at_last_fitting_sub_break() {
        let bodies = vec![split_body()];
        let mut ledger = FootnoteLedger::new();
        ledger.register(2, &bodies);

        let (length, cursor) = ledger
            .split(&FootnoteCursor::default(), 2500, false)
            .expect("first two pieces fit");
        assert_eq!(length, 2400);
        assert_eq!(cursor.list, 0);
        assert_eq!(cursor.element, Some(3));
        assert_eq!(cursor.inserted, 2400);
        assert!(!ledger.is_list_complete(&cursor));
        assert_eq!(ledger.next_unplaced(&cursor), (0, 4));
    }

    #[test]
    fn test_split_fails_when_first_piece_is_too_big() {
        let bodies = vec![split_body()];
        let mut ledger = FootnoteLedger::new();
        ledger.register(2, &bodies);

        assert!(ledger.split(&FootnoteCursor::default(), 1000, true).is_none());
        assert!(ledger.split(&FootnoteCursor::default(), 0, true).is_none());
    }

    #[test]
    fn test_split_takes_whole_lists_first() {
        let bodies = vec![vec![Element::boxed(800)], split_body()];
        let mut ledger = FootnoteLedger::new();
        ledger.register(2, &bodies);

        let (length, cursor) = ledger
            .split(&FootnoteCursor::default(), 2100, true)
            .expect("first list and one piece fit");
        assert_eq!(length, 2000);
        assert_eq!((cursor.list, cursor.element), (1, Some(1)));

        let (length, cursor) = ledger
            .split(&FootnoteCursor::default(), 1000, true)
            .expect("first list fits");
        assert_eq!(length, 800);
        assert_eq!((cursor.list, cursor.element), (0, Some(0)));
        assert!(ledger.is_list_complete(&cursor));
    }

    #[test]
    fn test_forced_prefix_always_advances() {
        let bodies = vec![split_body()];
        let mut ledger = FootnoteLedger::new();
        ledger.register(2, &bodies);

        let (length, cursor) = ledger.forced_prefix(&FootnoteCursor::default());
        assert_eq!(length, 1200);
        assert_eq!(cursor.element, Some(1));

        let tail = FootnoteCursor {
            inserted: 3700,
            list: 0,
            element: Some(5),
        };
        let (length, cursor) = ledger.forced_prefix(&tail);
        assert_eq!(length, 1300);
        assert!(ledger.is_list_complete(&cursor));
    }

    #[test]
    fn test_rollback_forgets_later_anchors() {
        let early = vec![vec![Element::boxed(100)]];
        let late = vec![vec![Element::boxed(200)]];
        let mut ledger = FootnoteLedger::new();
        ledger.register(3, &early);
        ledger.register(9, &late);

        ledger.rollback_to(5);
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.total(), 100);
        assert!(!ledger.has_new());
    }

    #[test]
    fn test_deferred_detection() {
        let bodies = vec![vec![Element::boxed(100)], vec![Element::boxed(200)]];
        let mut ledger = FootnoteLedger::new();
        ledger.register(1, &bodies);

        assert!(ledger.has_deferred(&FootnoteCursor::default()));
        assert!(!ledger.has_deferred(&ledger.end_cursor()));
    }

    #[test]
    fn test_placed_between_skips_empty_lists() {
        let bodies = vec![
            vec![Element::boxed(100), Element::penalty(0, 0, false), Element::boxed(100)],
            Vec::new(),
            vec![Element::boxed(50)],
        ];
        let mut ledger = FootnoteLedger::new();
        ledger.register(1, &bodies);

        let start = FootnoteCursor::default();
        let middle = FootnoteCursor {
            inserted: 100,
            list: 0,
            element: Some(1),
        };
        let range = ledger.placed_between(&start, &middle).expect("first piece");
        assert_eq!((range.first.list, range.first.element), (0, 0));
        assert_eq!((range.last.list, range.last.element), (0, 1));

        let range = ledger
            .placed_between(&middle, &ledger.end_cursor())
            .expect("rest");
        assert_eq!((range.first.list, range.first.element), (0, 2));
        assert_eq!((range.last.list, range.last.element), (2, 0));

        assert!(ledger.placed_between(&ledger.end_cursor(), &ledger.end_cursor()).is_none());
    }
}
