use folio::{
    BreakingConfig, DebugProfiler, Element, MinOptMax, Paginator, PipelineError, Sequence,
    UniformPages,
};
use std::env;
use std::fs;

/// A short chapter: paragraphs of lines, some of which cite footnotes long enough
/// to need splitting.
fn chapter() -> Sequence {
    let mut seq = Sequence::new();
    for paragraph in 0..8 {
        for line in 0..5 {
            if line == 2 && paragraph % 2 == 1 {
                let body = (0..6)
                    .flat_map(|_| [Element::boxed(900), Element::penalty(0, 0, false)])
                    .take(11)
                    .collect();
                seq.push_block_box(1200, vec![body]);
            } else {
                seq.push_box(1200);
            }
            seq.push_glue(0, 0, 0);
        }
        seq.push_glue(600, 600, 200);
    }
    seq.end_sequence();
    seq
}

fn main() -> Result<(), PipelineError> {
    if env::var("RUST_LOG").is_err() {
        unsafe {
            env::set_var("RUST_LOG", "folio=info,folio_layout=debug");
        }
    }
    env_logger::init();

    // An optional argument names a JSON file holding a sequence of elements.
    let sequence = match env::args().nth(1) {
        Some(path) => {
            println!("Loading sequence from {}", path);
            let source = fs::read_to_string(&path).map_err(serde_json::Error::io)?;
            serde_json::from_str(&source)?
        }
        None => chapter(),
    };

    let config = BreakingConfig {
        footnote_separator: MinOptMax::new(400, 600, 800),
        ..Default::default()
    };
    println!(
        "{} elements citing {} footnotes",
        sequence.len(),
        sequence.footnote_count()
    );
    let paginator = Paginator::new(config, UniformPages(20000))?;
    let profiler = DebugProfiler::new();
    let pagination = paginator.paginate_with_profiler(&sequence, &profiler)?;

    for (page, slice) in pagination.breaks().iter().zip(pagination.pages()) {
        println!(
            "Page {:>2}: elements {:?}, ratio {:+.3}{}",
            page.page_index,
            slice.content,
            page.adjust_ratio,
            if page.overflows { " (overflows)" } else { "" }
        );
        for footnote in &slice.footnotes {
            println!("         footnote {} elements {:?}", footnote.list, footnote.elements);
        }
    }
    profiler.log_summary(0);

    println!("\n{}", serde_json::to_string_pretty(&pagination)?);
    Ok(())
}
