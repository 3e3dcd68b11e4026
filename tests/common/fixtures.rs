use folio::{Element, MinOptMax, Sequence, BreakingConfig};

/// `Box(3000) Glue(1000,500,500) Box(3000) Glue(1000,500,500) Box(3000) Forced`
pub fn three_blocks() -> Sequence {
    let mut seq = Sequence::new();
    seq.push_box(3000)
        .push_glue(1000, 500, 500)
        .push_box(3000)
        .push_glue(1000, 500, 500)
        .push_box(3000)
        .push_forced_break();
    seq
}

/// 7000 of main content; the second box cites `footnote`.
pub fn cited(footnote: Vec<Element>) -> Sequence {
    let mut seq = Sequence::new();
    seq.push_box(3000)
        .push_glue(1000, 500, 500)
        .push_block_box(3000, vec![footnote])
        .push_forced_break();
    seq
}

/// A footnote body made of `pieces`, with a legal break between each two.
pub fn footnote(pieces: &[i32]) -> Vec<Element> {
    let mut body = Vec::new();
    for (i, &piece) in pieces.iter().enumerate() {
        if i > 0 {
            body.push(Element::penalty(0, 0, false));
        }
        body.push(Element::boxed(piece));
    }
    body
}

/// A box wider than any page with breakable glue on both sides.
pub fn wide_box() -> Sequence {
    let mut seq = Sequence::new();
    seq.push_box(1000)
        .push_glue(1000, 500, 500)
        .push_box(50000)
        .push_glue(1000, 500, 500)
        .push_box(1000)
        .push_forced_break();
    seq
}

/// `paragraphs` runs of lines, each line a 1200 box, separated by stretchy glue.
/// Every fifth line cites a two-piece footnote.
pub fn report(paragraphs: usize, lines: usize) -> Sequence {
    let mut seq = Sequence::new();
    let mut line = 0;
    for p in 0..paragraphs {
        for l in 0..lines {
            if line % 5 == 2 {
                seq.push_block_box(1200, vec![footnote(&[400, 300])]);
            } else {
                seq.push_box(1200);
            }
            line += 1;
            if l + 1 < lines {
                seq.push_glue(0, 0, 0);
            }
        }
        if p + 1 < paragraphs {
            seq.push_glue(600, 400, 200);
        }
    }
    seq.end_sequence();
    seq
}

pub fn with_separator() -> BreakingConfig {
    BreakingConfig {
        footnote_separator: MinOptMax::fixed(500),
        ..Default::default()
    }
}
