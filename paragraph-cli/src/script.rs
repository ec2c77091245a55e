//! Content scripts for the demo binary.
//!
//! One item per line, tagged with a content kind name:
//!
//! ```text
//! # comment
//! text Some words, kept verbatim up to the end of the line\n
//! inline-start em 20
//! text emphasised
//! inline-end
//! replaced 40 30
//! float 80
//! ```
//!
//! Text runs understand `\n` and `\t` escapes. The font size after an
//! `inline-start` style name is optional and defaults to the enclosing one.

use anyhow::{Context as _, Result, bail};
use paragraph_layout::ContentKind;

/// One parsed script item.
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    Text(String),
    InlineStart { name: String, font_size: Option<f32> },
    InlineEnd,
    Replaced { width: u32, height: u32 },
    Float { width: u32 },
}

/// Parse a script into items paired with their 1-based line numbers.
pub fn parse(source: &str) -> Result<Vec<(usize, Item)>> {
    let mut items = Vec::new();
    for (line, raw) in (1..).zip(source.lines()) {
        let trimmed = raw.trim_start();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let (tag, rest) = trimmed.split_once(' ').unwrap_or((trimmed, ""));
        let kind = ContentKind::parse(tag).with_context(|| format!("line {line}"))?;
        let item = parse_item(kind, rest).with_context(|| format!("line {line}: {kind}"))?;
        items.push((line, item));
    }
    Ok(items)
}

fn parse_item(kind: ContentKind, rest: &str) -> Result<Item> {
    let mut args = rest.split_whitespace();
    let item = match kind {
        ContentKind::Text => return Ok(Item::Text(unescape(rest))),
        ContentKind::InlineStart => Item::InlineStart {
            name: args.next().context("missing style name")?.to_string(),
            font_size: args
                .next()
                .map(str::parse::<f32>)
                .transpose()
                .context("bad font size")?,
        },
        ContentKind::InlineEnd => Item::InlineEnd,
        ContentKind::Replaced => Item::Replaced {
            width: number(args.next(), "width")?,
            height: number(args.next(), "height")?,
        },
        ContentKind::Float => Item::Float {
            width: number(args.next(), "width")?,
        },
    };
    if let Some(extra) = args.next() {
        bail!("unexpected argument {extra:?}");
    }
    Ok(item)
}

fn number(arg: Option<&str>, what: &str) -> Result<u32> {
    arg.with_context(|| format!("missing {what}"))?
        .parse()
        .with_context(|| format!("bad {what}"))
}

fn unescape(text: &str) -> String {
    text.replace("\\n", "\n").replace("\\t", "\t")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_every_kind() {
        let items = parse(
            "# heading\n\ntext Hello \ninline-start em 20\ntext world\\n\ninline-end\n\
             replaced 40 30\nfloat 80\n",
        )
        .unwrap();
        assert_eq!(
            items,
            [
                (3, Item::Text("Hello ".to_string())),
                (
                    4,
                    Item::InlineStart {
                        name: "em".to_string(),
                        font_size: Some(20.0)
                    }
                ),
                (5, Item::Text("world\n".to_string())),
                (6, Item::InlineEnd),
                (
                    7,
                    Item::Replaced {
                        width: 40,
                        height: 30
                    }
                ),
                (8, Item::Float { width: 80 }),
            ]
        );
    }

    #[test]
    fn test_inline_start_font_size_is_optional() {
        let items = parse("inline-start strong").unwrap();
        assert_eq!(
            items[0].1,
            Item::InlineStart {
                name: "strong".to_string(),
                font_size: None
            }
        );
    }

    #[test]
    fn test_unknown_tag_reports_line() {
        let err = parse("text ok\npicture 1 2").unwrap_err();
        assert_eq!(err.to_string(), "line 2");
        assert!(format!("{err:#}").contains("picture"));
    }

    #[test]
    fn test_missing_and_extra_arguments() {
        let err = parse("replaced 40").unwrap_err();
        assert!(format!("{err:#}").contains("missing height"));
        let err = parse("float 10 20").unwrap_err();
        assert!(format!("{err:#}").contains("unexpected argument"));
        let err = parse("float wide").unwrap_err();
        assert!(format!("{err:#}").contains("bad width"));
    }
}
