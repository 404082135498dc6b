use core_config::DisplayConfig;
use core_display::{DisplayIndex, HunkSource, ScreenLineBuilder, TagRegistry};
use core_text::Buffer;
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

fn sample_text(rows: usize) -> String {
    let mut out = String::new();
    for i in 0..rows {
        match i % 4 {
            0 => out.push_str("fn item() {\n"),
            1 => out.push_str("    let value = compute(alpha, beta, gamma, delta, epsilon);   \n"),
            2 => out.push('\n'),
            _ => out.push_str("\t\treturn value;\n"),
        }
    }
    out
}

fn bench_build(c: &mut Criterion) {
    let buf = Buffer::from_str("bench", &sample_text(2_000)).unwrap();
    let mut cfg = DisplayConfig {
        show_indent_guides: true,
        ..DisplayConfig::default()
    };
    cfg.invisibles.space = Some('·');
    cfg.invisibles.tab = Some('»');
    cfg.invisibles.eol.lf = Some('¬');
    let tags = TagRegistry::new();

    let plain = DisplayIndex::new(&buf, &cfg);
    c.bench_function("build_screen_lines_viewport", |b| {
        let builder = ScreenLineBuilder::new(&buf, &plain, &cfg, &tags);
        b.iter(|| black_box(builder.build_screen_lines(black_box(1_000), 1_060).unwrap()))
    });

    let mut wrapped = DisplayIndex::new(&buf, &cfg);
    wrapped.set_soft_wrap(Some(40)).unwrap();
    c.bench_function("build_screen_lines_soft_wrap", |b| {
        let builder = ScreenLineBuilder::new(&buf, &wrapped, &cfg, &tags);
        let mid = wrapped.screen_line_count() / 2;
        b.iter(|| black_box(builder.build_screen_lines(black_box(mid), mid + 60).unwrap()))
    });

    c.bench_function("display_index_relayout", |b| {
        b.iter(|| {
            let mut index = DisplayIndex::new(&buf, &cfg);
            index.set_soft_wrap(Some(black_box(40))).unwrap();
            black_box(index.screen_line_count())
        })
    });
}

criterion_group!(benches, bench_build);
criterion_main!(benches);
