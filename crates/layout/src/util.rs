use crate::BreakError;
use folio_types::{Element, Length, PenaltyCost, is_legal_break};

/// Rejects sequences the breaker cannot work with.
pub fn validate_sequence(elements: &[Element]) -> Result<(), BreakError> {
    if elements.is_empty() {
        return Err(BreakError::EmptySequence);
    }
    let first_box = elements
        .iter()
        .position(Element::is_box)
        .unwrap_or(elements.len());
    if let Some(index) = elements[..first_box]
        .iter()
        .position(Element::is_breakable_penalty)
    {
        return Err(BreakError::LeadingBreak(index));
    }
    let mut total: i64 = 0;
    for (index, element) in elements.iter().enumerate() {
        total += check_lengths(index, element)?;
        for body in element.footnotes() {
            for nested in body {
                total += check_lengths(index, nested)?;
            }
        }
    }
    // Prefix totals and footnote lengths are kept in `Length`; leave headroom
    // for the differences computed from them.
    if total > i64::from(Length::MAX / 2) {
        return Err(BreakError::LengthOverflow { total });
    }
    if !ends_with_forced_break(elements) {
        return Err(BreakError::UnterminatedSequence);
    }
    Ok(())
}

/// Rejects negative lengths and returns the element's width, stretch and shrink summed.
fn check_lengths(index: usize, element: &Element) -> Result<i64, BreakError> {
    let checks = [
        ("width", element.width()),
        ("stretch", element.stretch()),
        ("shrink", element.shrink()),
    ];
    let mut sum = 0;
    for (what, value) in checks {
        if value < 0 {
            return Err(BreakError::NegativeLength { index, what, value });
        }
        sum += i64::from(value);
    }
    Ok(sum)
}

/// Locks `elements` against breaking: breakable penalties become forbidden and
/// every legal glue gets a forbidden penalty in front of it.
pub fn remove_legal_breaks(elements: &mut Vec<Element>) {
    lock_breaks(elements, None);
}

/// Like [`remove_legal_breaks`], but stops once the box and glue widths seen so
/// far exceed `budget`. Returns `true` if the whole list was locked within it.
pub fn remove_legal_breaks_within(elements: &mut Vec<Element>, budget: Length) -> bool {
    lock_breaks(elements, Some(budget))
}

fn lock_breaks(elements: &mut Vec<Element>, budget: Option<Length>) -> bool {
    let mut length: Length = 0;
    let mut i = 0;
    while i < elements.len() {
        match &mut elements[i] {
            Element::Penalty { cost, .. } => {
                if !cost.is_forbidden() {
                    *cost = PenaltyCost::Forbidden;
                }
            }
            Element::Glue { width, .. } => {
                length += *width;
                if i > 0 && elements[i - 1].is_box() {
                    elements.insert(i, Element::forbidden_break());
                    i += 1;
                }
            }
            other => length += other.width(),
        }
        if budget.is_some_and(|b| length > b) {
            return false;
        }
        i += 1;
    }
    true
}

/// Sum of box and glue widths in `elements[start..=end]`.
pub fn content_length(elements: &[Element], start: usize, end: usize) -> Length {
    if start >= elements.len() || start > end {
        return 0;
    }
    let end = end.min(elements.len() - 1);
    elements[start..=end].iter().map(Element::content_width).sum()
}

pub fn content_length_all(elements: &[Element]) -> Length {
    elements.iter().map(Element::content_width).sum()
}

pub fn ends_with_forced_break(elements: &[Element]) -> bool {
    elements.last().is_some_and(Element::is_forced_break)
}

/// The closest legal break at or before `from`.
pub fn previous_break_index(elements: &[Element], from: usize) -> Option<usize> {
    let from = from.min(elements.len().checked_sub(1)?);
    (0..=from).rev().find(|&i| is_legal_break(elements, i))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rejects_lengths_past_the_representable_total() {
        let huge = vec![
            Element::boxed(500_000_000),
            Element::glue(0, 0, 0),
            Element::boxed(500_000_000),
            Element::glue(0, 0, 0),
            Element::boxed(500_000_000),
            Element::forced_break(),
        ];
        assert!(matches!(
            validate_sequence(&huge),
            Err(BreakError::LengthOverflow { total: 1_500_000_000 })
        ));

        let footnoted = vec![
            Element::block_box(10, vec![vec![Element::boxed(1_100_000_000)]]),
            Element::forced_break(),
        ];
        assert!(matches!(validate_sequence(&footnoted), Err(BreakError::LengthOverflow { .. })));

        let fine = vec![Element::boxed(500_000_000), Element::forced_break()];
        assert!(validate_sequence(&fine).is_ok());
    }

    #[test]
    fn test_validate_rejects_malformed_input() {
        assert!(matches!(validate_sequence(&[]), Err(BreakError::EmptySequence)));

        let leading = vec![Element::penalty(0, 0, false), Element::boxed(10), Element::forced_break()];
        assert!(matches!(validate_sequence(&leading), Err(BreakError::LeadingBreak(0))));

        let negative = vec![Element::boxed(10), Element::glue(5, -1, 0), Element::boxed(10), Element::forced_break()];
        assert!(matches!(
            validate_sequence(&negative),
            Err(BreakError::NegativeLength { index: 1, what: "stretch", value: -1 })
        ));

        let open = vec![Element::boxed(10), Element::glue(5, 1, 1), Element::boxed(10)];
        assert!(matches!(validate_sequence(&open), Err(BreakError::UnterminatedSequence)));

        let nested = vec![
            Element::block_box(10, vec![vec![Element::boxed(-3)]]),
            Element::forced_break(),
        ];
        assert!(matches!(
            validate_sequence(&nested),
            Err(BreakError::NegativeLength { index: 0, what: "width", .. })
        ));
    }

    #[test]
    fn test_validate_accepts_leading_glue() {
        let seq = vec![Element::glue(100, 0, 0), Element::boxed(10), Element::forced_break()];
        assert!(validate_sequence(&seq).is_ok());
    }

    #[test]
    fn test_remove_legal_breaks_locks_everything() {
        let mut elements = vec![
            Element::boxed(100),
            Element::glue(10, 5, 5),
            Element::boxed(100),
            Element::penalty(0, 20, false),
            Element::boxed(100),
        ];
        remove_legal_breaks(&mut elements);

        assert_eq!(elements.len(), 6);
        assert!((0..elements.len()).all(|i| !is_legal_break(&elements, i)));
        assert_eq!(content_length_all(&elements), 310);
    }

    #[test]
    fn test_remove_legal_breaks_within_budget() {
        let mut elements = vec![
            Element::boxed(100),
            Element::glue(10, 5, 5),
            Element::boxed(100),
            Element::glue(10, 5, 5),
            Element::boxed(100),
        ];
        assert!(!remove_legal_breaks_within(&mut elements, 150));
        assert!(!is_legal_break(&elements, 2));
        assert!(is_legal_break(&elements, 4));

        let mut short = vec![Element::boxed(100), Element::glue(10, 5, 5), Element::boxed(100)];
        assert!(remove_legal_breaks_within(&mut short, 500));
        assert!((0..short.len()).all(|i| !is_legal_break(&short, i)));
    }

    #[test]
    fn test_content_length_ignores_penalties() {
        let elements = vec![
            Element::boxed(100),
            Element::glue(10, 5, 5),
            Element::penalty(50, 0, true),
            Element::boxed(100),
        ];
        assert_eq!(content_length(&elements, 0, 3), 210);
        assert_eq!(content_length(&elements, 1, 2), 10);
        assert_eq!(content_length(&elements, 2, 99), 100);
        assert_eq!(content_length(&elements, 3, 1), 0);
    }

    #[test]
    fn test_previous_break_index() {
        let elements = vec![
            Element::boxed(100),
            Element::glue(10, 5, 5),
            Element::boxed(100),
            Element::penalty(0, 0, false),
            Element::boxed(100),
        ];
        assert_eq!(previous_break_index(&elements, 4), Some(3));
        assert_eq!(previous_break_index(&elements, 2), Some(1));
        assert_eq!(previous_break_index(&elements, 0), None);
        assert_eq!(previous_break_index(&[], 3), None);
        assert!(!ends_with_forced_break(&elements));
    }
}
