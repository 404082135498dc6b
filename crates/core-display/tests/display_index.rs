use core_config::DisplayConfig;
use core_display::{
    BufferPoint, DisplayIndex, HunkKind, HunkSource, ScreenLineBuilder, ScreenPoint, TagRegistry,
};
use core_text::Buffer;
use pretty_assertions::assert_eq;

const SAMPLE: &str = "fn main() {\n    let words = \"the quick brown fox jumps over the lazy dog\";\n\n\tfor w in words.split(' ') {\n\t\tprintln!(\"{w}\");\n\t}\n}\n";

fn bp(row: usize, column: usize) -> BufferPoint {
    BufferPoint::new(row, column)
}

#[test]
fn line_count_tracks_folds_and_wraps() {
    let buf = Buffer::from_str("sample.rs", SAMPLE).unwrap();
    let cfg = DisplayConfig::default();
    let mut index = DisplayIndex::new(&buf, &cfg);
    assert_eq!(index.screen_line_count(), buf.line_count());

    index.fold(bp(3, 27), bp(5, 1)).unwrap();
    assert_eq!(index.screen_line_count(), buf.line_count() - 2);

    index.set_soft_wrap(Some(24)).unwrap();
    let wraps = index
        .hunks()
        .hunks()
        .iter()
        .filter(|h| h.kind(&cfg.fold_glyph) == HunkKind::SoftWrap)
        .count();
    assert!(wraps > 0);
    assert_eq!(index.screen_line_count(), buf.line_count() - 2 + wraps);
}

#[test]
fn row_starts_round_trip() {
    let buf = Buffer::from_str("sample.rs", SAMPLE).unwrap();
    let cfg = DisplayConfig::default();
    let mut index = DisplayIndex::new(&buf, &cfg);
    index.fold(bp(0, 11), bp(1, 4)).unwrap();
    index.set_soft_wrap(Some(20)).unwrap();
    for row in 0..index.screen_line_count() {
        let start = ScreenPoint::new(row, 0);
        let buffer = index.translate_screen_position(start);
        assert_eq!(
            index.translate_buffer_position(buffer).row,
            row,
            "screen row {row} maps to {buffer:?}"
        );
    }
}

#[test]
fn positions_inside_a_fold_clip_to_its_start() {
    let buf = Buffer::from_str("sample.rs", SAMPLE).unwrap();
    let cfg = DisplayConfig::default();
    let mut index = DisplayIndex::new(&buf, &cfg);
    index.fold(bp(1, 4), bp(1, 15)).unwrap();
    assert_eq!(
        index.translate_buffer_position(bp(1, 9)),
        ScreenPoint::new(1, 4)
    );
    // The column after the glyph is the fold end.
    assert_eq!(index.translate_screen_position(ScreenPoint::new(1, 5)), bp(1, 15));
}

#[test]
fn wrapped_lines_fit_the_wrap_column() {
    let buf = Buffer::from_str("sample.rs", SAMPLE).unwrap();
    let cfg = DisplayConfig::default();
    let tags = TagRegistry::new();
    for column in [12, 16, 24, 40] {
        let mut index = DisplayIndex::new(&buf, &cfg);
        index.set_soft_wrap(Some(column)).unwrap();
        let lines = ScreenLineBuilder::new(&buf, &index, &cfg, &tags)
            .build_screen_lines(0, index.screen_line_count())
            .unwrap();
        assert_eq!(lines.len(), index.screen_line_count());
        for line in &lines {
            assert!(
                line.width() <= column,
                "{:?} exceeds wrap column {column}",
                line.text
            );
        }
    }
}

#[test]
fn wrapped_output_reassembles_the_row() {
    let buf = Buffer::from_str("t", "    alpha beta gamma delta epsilon").unwrap();
    let cfg = DisplayConfig::default();
    let tags = TagRegistry::new();
    let mut index = DisplayIndex::new(&buf, &cfg);
    index.set_soft_wrap(Some(14)).unwrap();
    let lines = ScreenLineBuilder::new(&buf, &index, &cfg, &tags)
        .build_screen_lines(0, index.screen_line_count())
        .unwrap();
    assert!(lines.len() > 1);
    assert!(lines[1..].iter().all(|l| l.text.starts_with("    ")));
    let joined: String = std::iter::once(lines[0].text.as_str())
        .chain(lines[1..].iter().map(|l| &l.text[4..]))
        .collect();
    assert_eq!(joined, "    alpha beta gamma delta epsilon");
}
