//! Shrink-to-fit width analysis.
//!
//! The minimum width is the widest unbreakable unit (or float); the maximum
//! is the widest stretch of content between forced breaks laid out on an
//! infinitely wide line, with floats added alongside the in-flow content.

use paragraph_common::{Fixed, Result};
use paragraph_content::{ContentId, ContentModel};
use serde::Serialize;

use crate::client::ParagraphClient;
use crate::segment::{BreakTable, Cursor, Step, Walker, measure_unit};

/// Minimum and maximum preferred widths of a paragraph, in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct MinMaxWidth {
    /// Narrowest width the content can be laid out in without overflowing.
    pub min: u32,
    /// Width the content takes when no soft break is ever used.
    pub max: u32,
}

pub(crate) fn min_max_width<C: ParagraphClient>(
    client: &C,
    content: &ContentModel<C::Style, C::Text, C::Handle>,
    breaks: &BreakTable,
) -> Result<MinMaxWidth> {
    let walker = Walker::new(content, breaks);
    let mut cursor = Cursor::start(content);
    let mut min = Fixed::ZERO;
    let mut max = Fixed::ZERO;
    // Running width of the current forced-break segment, with and without
    // the last unit's hanging white space.
    let mut line = Fixed::ZERO;
    let mut line_fit = Fixed::ZERO;

    while let Some((step, next)) = walker.next_step(cursor)? {
        match step {
            Step::Float(id) => {
                let width = float_width(client, &walker, id)?;
                min = min.max(width);
                line += width;
                line_fit = line;
            }
            Step::Unit(unit) => {
                let measured = measure_unit(client, &walker, &unit)?;
                if measured.visible {
                    min = min.max(measured.fit);
                    line_fit = line + measured.fit;
                    line += measured.width;
                }
                for id in &unit.floats {
                    let width = float_width(client, &walker, *id)?;
                    min = min.max(width);
                    line += width;
                    line_fit += width;
                }
                if unit.forced {
                    max = max.max(line_fit);
                    line = Fixed::ZERO;
                    line_fit = Fixed::ZERO;
                }
            }
        }
        cursor = next;
    }
    max = max.max(line_fit);

    Ok(MinMaxWidth {
        min: min.to_px(),
        max: max.to_px(),
    })
}

fn float_width<C: ParagraphClient>(
    client: &C,
    walker: &Walker<'_, C::Style, C::Text, C::Handle>,
    id: ContentId,
) -> Result<Fixed> {
    let entry = walker.entry(id)?;
    Ok(Fixed::from_px(
        client.measure_float(entry.handle(), entry.style())?,
    ))
}
