//! Paragraph layout CLI
//!
//! Lays out a content script at a given width with approximate font
//! metrics and prints the preferred widths and each line.

mod script;

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context as _, Result, bail};
use clap::{Parser, ValueEnum};
use owo_colors::OwoColorize;
use paragraph_layout::{
    ApproximateMetrics, Context, LineSink, LineStatus, LogConfig, LogLevel, MinMaxWidth,
    ParagraphClient, ParagraphError, Position, TextMetrics, TextSpan,
};
use serde::Serialize;

use script::Item;

/// Paragraph layout demo: greedy line breaking over a content script
#[derive(Parser, Debug)]
#[command(name = "paragraph")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Lay out a script at 300px
    paragraph story.para

    # Narrow column, larger type
    paragraph --width 120 --font-size 20 story.para

    # Lay out a single text run
    paragraph --text 'The quick brown fox jumps over the lazy dog' -w 100

    # Machine-readable output with layout logging
    paragraph --json --log debug story.para
"#)]
struct Cli {
    /// Content script to lay out
    #[arg(value_name = "FILE")]
    script: Option<PathBuf>,

    /// Lay out this text instead of a script
    #[arg(long, value_name = "TEXT")]
    text: Option<String>,

    /// Available line width in pixels
    #[arg(short, long, default_value = "300")]
    width: u32,

    /// Font size of the container style in pixels
    #[arg(long, default_value = "16")]
    font_size: f32,

    /// Character advance as a fraction of the font size
    #[arg(long, default_value = "0.6")]
    char_width: f32,

    /// Print the layout as JSON
    #[arg(long)]
    json: bool,

    /// Minimum level of engine messages written to stderr
    #[arg(long, value_enum, default_value = "warning")]
    log: LogArg,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogArg {
    Off,
    Debug,
    Info,
    Notice,
    Warning,
    Error,
}

impl LogArg {
    fn config(self) -> LogConfig {
        let level = match self {
            Self::Off => return LogConfig::disabled(),
            Self::Debug => LogLevel::Debug,
            Self::Info => LogLevel::Info,
            Self::Notice => LogLevel::Notice,
            Self::Warning => LogLevel::Warning,
            Self::Error => LogLevel::Error,
        };
        LogConfig::stderr(level)
    }
}

#[derive(Debug)]
struct DemoStyle {
    name: String,
    font_size: f32,
}

/// Measures with fixed ratios; handles are script line numbers.
struct DemoClient {
    metrics: ApproximateMetrics,
    floats: HashMap<usize, u32>,
}

impl ParagraphClient for DemoClient {
    type Style = Arc<DemoStyle>;
    type Text = String;
    type Handle = usize;

    fn text_get(&self, text: &String) -> paragraph_layout::Result<String> {
        Ok(text.clone())
    }

    fn measure_text(
        &self,
        text: &str,
        style: &Arc<DemoStyle>,
    ) -> paragraph_layout::Result<TextMetrics> {
        Ok(self.metrics.measure(text, style.font_size))
    }

    fn measure_float(
        &self,
        handle: &usize,
        _style: &Arc<DemoStyle>,
    ) -> paragraph_layout::Result<u32> {
        self.floats
            .get(handle)
            .copied()
            .ok_or(ParagraphError::BadParam("float without a width"))
    }
}

#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
enum Placed {
    Text {
        line: usize,
        style: String,
        text: String,
        x: u32,
    },
    Replaced {
        line: usize,
        style: String,
        x: u32,
    },
    Float {
        line: usize,
        width: u32,
        available: u32,
    },
}

#[derive(Debug, Serialize)]
struct LineReport {
    status: LineStatus,
    height: u32,
    baseline: u32,
    placed: Vec<Placed>,
}

#[derive(Debug, Serialize)]
struct Report {
    width: u32,
    widths: MinMaxWidth,
    lines: Vec<LineReport>,
}

/// Collects the placements of the line being laid out.
struct Collector<'a> {
    floats: &'a HashMap<usize, u32>,
    placed: Vec<Placed>,
}

impl LineSink<Arc<DemoStyle>, usize> for Collector<'_> {
    fn layout_text(
        &mut self,
        handle: &usize,
        style: &Arc<DemoStyle>,
        span: TextSpan<'_>,
        at: Position,
    ) -> paragraph_layout::Result<()> {
        self.placed.push(Placed::Text {
            line: *handle,
            style: style.name.clone(),
            text: span.text.to_string(),
            x: at.x,
        });
        Ok(())
    }

    fn layout_replaced(
        &mut self,
        handle: &usize,
        style: &Arc<DemoStyle>,
        at: Position,
    ) -> paragraph_layout::Result<()> {
        self.placed.push(Placed::Replaced {
            line: *handle,
            style: style.name.clone(),
            x: at.x,
        });
        Ok(())
    }

    fn layout_float(
        &mut self,
        handle: &usize,
        _style: &Arc<DemoStyle>,
        available: &mut u32,
    ) -> paragraph_layout::Result<()> {
        let width = self.floats.get(handle).copied().unwrap_or(0);
        *available = available.saturating_sub(width);
        self.placed.push(Placed::Float {
            line: *handle,
            width,
            available: *available,
        });
        Ok(())
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let items = match (&cli.script, &cli.text) {
        (_, Some(text)) => vec![(1, Item::Text(text.clone()))],
        (Some(path), None) => {
            let source = fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            script::parse(&source)?
        }
        (None, None) => bail!("nothing to lay out: pass a script file or --text"),
    };

    let report = lay_out(&cli, &items)?;
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn lay_out(cli: &Cli, items: &[(usize, Item)]) -> Result<Report> {
    let floats = items
        .iter()
        .filter_map(|(line, item)| match item {
            Item::Float { width } => Some((*line, *width)),
            _ => None,
        })
        .collect();
    let client = DemoClient {
        metrics: ApproximateMetrics::with_char_width(cli.char_width),
        floats,
    };
    let ctx = Context::with_log(client, cli.log.config());
    let body = Arc::new(DemoStyle {
        name: "body".to_string(),
        font_size: cli.font_size,
    });

    let mut para = ctx.paragraph(0, &body);
    for (line, item) in items {
        let line = *line;
        let inserted = match item {
            Item::Text(text) => para.add_text(text.clone(), line),
            Item::InlineStart { name, font_size } => {
                let style = Arc::new(DemoStyle {
                    name: name.clone(),
                    font_size: font_size.unwrap_or(para.current_style().font_size),
                });
                para.add_inline_start(&style, line)
            }
            Item::InlineEnd => para.add_inline_end(line),
            Item::Replaced { width, height } => {
                let style = Arc::clone(para.current_style());
                para.add_replaced(*width, *height, &style, line)
            }
            Item::Float { .. } => {
                let style = Arc::clone(para.current_style());
                para.add_float(&style, line)
            }
        };
        let _ = inserted.with_context(|| format!("script line {line}"))?;
    }

    let widths = para.min_max_width()?;
    let mut collector = Collector {
        floats: &ctx.client().floats,
        placed: Vec::new(),
    };
    let mut lines = Vec::new();
    loop {
        let outcome = para.layout_next_line(cli.width, &mut collector)?;
        lines.push(LineReport {
            status: outcome.status,
            height: outcome.height,
            baseline: outcome.baseline,
            placed: std::mem::take(&mut collector.placed),
        });
        if !outcome.has_more() {
            break;
        }
    }

    Ok(Report {
        width: cli.width,
        widths,
        lines,
    })
}

fn print_report(report: &Report) {
    println!(
        "{} {}px  {} {}px  {} {}px",
        "width".bold(),
        report.width,
        "min".bold(),
        report.widths.min,
        "max".bold(),
        report.widths.max
    );
    println!();

    for (number, line) in (1..).zip(&report.lines) {
        let mut rendered = String::new();
        let mut notes = Vec::new();
        for placed in &line.placed {
            match placed {
                Placed::Text { text, .. } => {
                    let text = text.trim_end_matches(['\n', '\r']);
                    rendered.push_str(&text.green().to_string());
                }
                Placed::Replaced { style, .. } => {
                    rendered.push_str(&format!("[{style}]").magenta().to_string());
                }
                Placed::Float {
                    line,
                    width,
                    available,
                } => notes.push(format!(
                    "float from line {line} ({width}px), {available}px left"
                )),
            }
        }
        println!(
            "{:>4} {} {}",
            number.dimmed(),
            rendered,
            format!("({}px)", line.height).dimmed()
        );
        for note in notes {
            println!("     {}", note.yellow());
        }
    }
}
