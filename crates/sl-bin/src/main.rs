//! Screenlines entrypoint: lay out a file and print its screen lines.
use anyhow::{Context, Result};
use clap::Parser;
use core_config::{Config, load_from};
use core_display::{
    BufferPoint, DisplayIndex, HunkSource, ScreenLine, ScreenLineBuilder, TagRegistry,
};
use core_text::{Buffer, LineEnding, TextSource};
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Once;
use tracing::{debug, info};
use tracing_appender::non_blocking::WorkerGuard;

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "screenlines", version, about = "Print the screen lines of a text file")]
struct Args {
    /// File to lay out (UTF-8 text).
    pub path: PathBuf,
    /// Optional configuration file path (overrides discovery of `screenlines.toml`).
    #[arg(long = "config")]
    pub config: Option<PathBuf>,
    /// First screen row to print.
    #[arg(long, default_value_t = 0)]
    pub start: usize,
    /// Screen row to stop before; defaults to the end of the file.
    #[arg(long)]
    pub end: Option<usize>,
    /// Fold a buffer range, written `ROW:COL-ROW:COL`. Repeatable.
    #[arg(long = "fold", value_name = "ROW:COL-ROW:COL")]
    pub folds: Vec<FoldArg>,
    /// Soft-wrap column (overrides the config file).
    #[arg(long = "wrap", value_name = "COLUMN")]
    pub wrap: Option<usize>,
    /// Show indent guides.
    #[arg(long)]
    pub guides: bool,
    /// Tab length (overrides the config file).
    #[arg(long = "tab-length")]
    pub tab_length: Option<usize>,
    /// Emit JSON instead of annotated text.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FoldArg {
    start: BufferPoint,
    end: BufferPoint,
}

fn parse_point(s: &str) -> Result<BufferPoint, String> {
    let (row, column) = s
        .split_once(':')
        .ok_or_else(|| format!("expected ROW:COL, got `{s}`"))?;
    let row = row
        .trim()
        .parse()
        .map_err(|e| format!("bad row `{row}`: {e}"))?;
    let column = column
        .trim()
        .parse()
        .map_err(|e| format!("bad column `{column}`: {e}"))?;
    Ok(BufferPoint::new(row, column))
}

impl FromStr for FoldArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (start, end) = s
            .split_once('-')
            .ok_or_else(|| format!("expected ROW:COL-ROW:COL, got `{s}`"))?;
        Ok(Self {
            start: parse_point(start)?,
            end: parse_point(end)?,
        })
    }
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct SpanRecord {
    label: String,
    start: usize,
    end: usize,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct LineRecord {
    id: u64,
    row: usize,
    text: String,
    tag_codes: Vec<i32>,
    spans: Vec<SpanRecord>,
}

fn configure_logging() -> Option<WorkerGuard> {
    let (nb_writer, guard) = tracing_appender::non_blocking(io::stderr());
    match tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(nb_writer)
        .try_init()
    {
        Ok(_) => Some(guard),
        // Global subscriber already installed; dropping the guard shuts the writer down.
        Err(_err) => None,
    }
}

fn install_panic_hook() {
    static HOOK: Once = Once::new();
    HOOK.call_once(|| {
        let default_panic = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            tracing::error!(target: "runtime.panic", ?info, "panic");
            default_panic(info);
        }));
    });
}

/// Load the config file and fold command-line overrides into it.
fn load_config(args: &Args) -> Result<Config> {
    let mut config = load_from(args.config.clone())?;
    if let Some(tab_length) = args.tab_length {
        config.file.display.tab_length = tab_length;
    }
    if args.guides {
        config.file.display.show_indent_guides = true;
    }
    if args.wrap.is_some() {
        config.file.soft_wrap.column = args.wrap;
    }
    config.resolve();
    Ok(config)
}

/// Lay out `buffer` and collect screen rows `[start, end)` with decoded spans.
fn render(
    buffer: &Buffer,
    config: &Config,
    folds: &[FoldArg],
    start: usize,
    end: Option<usize>,
) -> Result<Vec<LineRecord>> {
    let display = &config.display;
    let mut index = DisplayIndex::new(buffer, display);
    index.set_soft_wrap(config.soft_wrap_column)?;
    for fold in folds {
        index
            .fold(fold.start, fold.end)
            .with_context(|| format!("cannot fold {:?}..{:?}", fold.start, fold.end))?;
    }

    let tags = TagRegistry::new();
    let end = end.unwrap_or_else(|| index.screen_line_count());
    let lines = ScreenLineBuilder::new(buffer, &index, display, &tags)
        .build_screen_lines(start, end)?;
    debug!(
        target: "runtime",
        screen_lines = index.screen_line_count(),
        built = lines.len(),
        labels = tags.len(),
        "render_complete"
    );

    lines
        .into_iter()
        .enumerate()
        .map(|(offset, line)| to_record(line, start + offset, &tags))
        .collect()
}

fn to_record(line: ScreenLine, row: usize, tags: &TagRegistry) -> Result<LineRecord> {
    let spans = line
        .tag_spans(tags)?
        .into_iter()
        .map(|s| SpanRecord {
            label: s.label.to_string(),
            start: s.start,
            end: s.end,
        })
        .collect();
    Ok(LineRecord {
        id: line.id.get(),
        row,
        text: line.text,
        tag_codes: line.tag_codes,
        spans,
    })
}

fn write_text(out: &mut impl Write, records: &[LineRecord]) -> io::Result<()> {
    for record in records {
        writeln!(out, "{:>5} │{}", record.row, record.text)?;
        for span in &record.spans {
            writeln!(out, "      │ {}..{} {}", span.start, span.end, span.label)?;
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let _log_guard = configure_logging();
    install_panic_hook();
    info!(target: "runtime", "startup");

    let args = Args::parse();
    let config = load_config(&args)?;

    let content = std::fs::read_to_string(&args.path)
        .with_context(|| format!("cannot read {}", args.path.display()))?;
    let name = args
        .path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("file");
    let buffer = Buffer::from_str(name, &content)?;
    info!(
        target: "runtime",
        file = %args.path.display(),
        size_bytes = content.len(),
        line_count = buffer.line_count(),
        first_line_ending = buffer.line_ending(0).map(LineEnding::name),
        folds = args.folds.len(),
        soft_wrap = ?config.soft_wrap_column,
        "file_loaded"
    );

    let records = render(&buffer, &config, &args.folds, args.start, args.end)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if args.json {
        serde_json::to_writer_pretty(&mut out, &records)?;
        writeln!(out)?;
    } else {
        write_text(&mut out, &records)?;
    }
    Ok(())
}
