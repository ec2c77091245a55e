//! Break opportunities and the breakable units between them.
//!
//! Text is segmented with the Unicode line breaking algorithm (UAX #14) run
//! over the paragraph's aggregate text, so opportunities are found across
//! entry boundaries exactly as they would be in one string. Replaced boxes
//! are atomic units with an opportunity on both sides. A float met before
//! any visible content is a step of its own; one met inside a word rides
//! along with that word's unit and leaves the flow after it.

use std::ops::Range;

use paragraph_common::{Fixed, ParagraphError, Result};
use paragraph_content::{Content, ContentId, ContentModel, Entry};
use smallvec::{Array, SmallVec};
use unicode_linebreak::{BreakOpportunity, linebreaks};

use crate::client::ParagraphClient;

/// A position before which a line may end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct BreakPoint {
    /// Byte offset into the aggregate text.
    pub at: usize,
    /// The line must end here (preceded by a hard line break character).
    pub forced: bool,
}

/// Break opportunities of the aggregate text, rebuilt when the content
/// revision moves.
#[derive(Debug, Default)]
pub(crate) struct BreakTable {
    revision: Option<u64>,
    points: Vec<BreakPoint>,
}

impl BreakTable {
    pub fn refresh<S, T, H>(&mut self, content: &mut ContentModel<S, T, H>) -> Result<()> {
        let revision = content.revision();
        if self.revision == Some(revision) {
            return Ok(());
        }
        self.revision = None;
        self.points.clear();
        let text = content.aggregate_text()?;
        for (at, opportunity) in linebreaks(text) {
            let forced = matches!(opportunity, BreakOpportunity::Mandatory)
                && text[..at].chars().next_back().is_some_and(is_hard_break);
            self.points.try_reserve(1)?;
            self.points.push(BreakPoint { at, forced });
        }
        self.revision = Some(revision);
        Ok(())
    }

    /// First opportunity strictly after `pos`.
    fn next_after(&self, pos: usize) -> Option<BreakPoint> {
        let index = self.points.partition_point(|point| point.at <= pos);
        self.points.get(index).copied()
    }
}

/// UAX #14 classes BK, CR, LF and NL.
const fn is_hard_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\u{0B}' | '\u{0C}' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

/// White space that hangs past the end of a line. No-break spaces do not.
fn hangs(c: char) -> bool {
    c.is_whitespace() && !matches!(c, '\u{A0}' | '\u{2007}' | '\u{202F}')
}

/// Where in-flow walking resumes: an entry and a byte offset into its text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Cursor {
    entry: Option<ContentId>,
    offset: usize,
}

impl Cursor {
    pub fn start<S, T, H>(content: &ContentModel<S, T, H>) -> Self {
        Self {
            entry: content.first(),
            offset: 0,
        }
    }
}

/// One piece of a breakable unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Piece {
    /// Bytes of a text entry, relative to that entry's text.
    Text { id: ContentId, range: Range<usize> },
    Replaced(ContentId),
    /// Inline start or end; occupies no space.
    Marker(ContentId),
}

/// Content between two consecutive break opportunities.
#[derive(Debug)]
pub(crate) struct Unit {
    pub pieces: SmallVec<[Piece; 4]>,
    /// Floats met inside the unit, taken out of flow once it is placed.
    pub floats: SmallVec<[ContentId; 1]>,
    /// The opportunity ending this unit is a forced break.
    pub forced: bool,
}

#[derive(Debug)]
pub(crate) enum Step {
    /// A float to take out of flow.
    Float(ContentId),
    Unit(Unit),
}

/// Measured extent of a unit.
#[derive(Debug)]
pub(crate) struct Measured {
    /// Advance of every piece, in piece order.
    pub advances: SmallVec<[Fixed; 4]>,
    pub width: Fixed,
    /// Width excluding hanging trailing white space.
    pub fit: Fixed,
    pub height: Fixed,
    pub baseline: Fixed,
    /// Whether the unit holds any text or replaced content.
    pub visible: bool,
}

pub(crate) fn try_push<A: Array>(vec: &mut SmallVec<A>, item: A::Item) -> Result<()> {
    vec.try_reserve(1).map_err(|_| ParagraphError::OutOfMemory)?;
    vec.push(item);
    Ok(())
}

/// Walks content from a cursor one step at a time.
pub(crate) struct Walker<'a, S, T, H> {
    content: &'a ContentModel<S, T, H>,
    breaks: &'a BreakTable,
}

impl<'a, S, T, H> Walker<'a, S, T, H> {
    pub const fn new(content: &'a ContentModel<S, T, H>, breaks: &'a BreakTable) -> Self {
        Self { content, breaks }
    }

    pub fn entry(&self, id: ContentId) -> Result<&'a Entry<S, T, H>> {
        self.content
            .get(id)
            .ok_or(ParagraphError::BadParam("stale content handle"))
    }

    fn after(&self, id: ContentId) -> Cursor {
        Cursor {
            entry: self.content.next(id),
            offset: 0,
        }
    }

    /// The next float or unit at `cursor`, and the cursor just past it.
    pub fn next_step(&self, mut cursor: Cursor) -> Result<Option<(Step, Cursor)>> {
        let mut pieces: SmallVec<[Piece; 4]> = SmallVec::new();
        let mut floats: SmallVec<[ContentId; 1]> = SmallVec::new();
        let mut visible = false;

        while let Some(id) = cursor.entry {
            match self.entry(id)?.content() {
                Content::Float => {
                    if pieces.is_empty() {
                        return Ok(Some((Step::Float(id), self.after(id))));
                    }
                    if !visible {
                        break;
                    }
                    try_push(&mut floats, id)?;
                    cursor = self.after(id);
                }
                Content::Replaced { .. } => {
                    if visible {
                        break;
                    }
                    try_push(&mut pieces, Piece::Replaced(id))?;
                    let unit = Unit {
                        pieces,
                        floats,
                        forced: false,
                    };
                    return Ok(Some((Step::Unit(unit), self.after(id))));
                }
                Content::InlineStart | Content::InlineEnd => {
                    try_push(&mut pieces, Piece::Marker(id))?;
                    cursor = self.after(id);
                }
                Content::Text { text, .. } => {
                    let span = self
                        .content
                        .text_range(id)
                        .ok_or(ParagraphError::BadParam("aggregate text is stale"))?;
                    let pos = span.start + cursor.offset;
                    if pos >= span.end {
                        cursor = self.after(id);
                        continue;
                    }
                    match self.breaks.next_after(pos) {
                        Some(point) if point.at <= span.end => {
                            let end = point.at - span.start;
                            try_push(
                                &mut pieces,
                                Piece::Text {
                                    id,
                                    range: cursor.offset..end,
                                },
                            )?;
                            let next = if end < text.len() {
                                Cursor {
                                    entry: Some(id),
                                    offset: end,
                                }
                            } else {
                                self.after(id)
                            };
                            let unit = Unit {
                                pieces,
                                floats,
                                forced: point.forced,
                            };
                            return Ok(Some((Step::Unit(unit), next)));
                        }
                        _ => {
                            try_push(
                                &mut pieces,
                                Piece::Text {
                                    id,
                                    range: cursor.offset..text.len(),
                                },
                            )?;
                            visible = true;
                            cursor = self.after(id);
                        }
                    }
                }
            }
        }

        if pieces.is_empty() {
            return Ok(None);
        }
        let unit = Unit {
            pieces,
            floats,
            forced: false,
        };
        Ok(Some((Step::Unit(unit), cursor)))
    }

    /// Whether anything other than inline markers remains at `cursor`.
    pub fn has_more(&self, cursor: Cursor) -> bool {
        let mut cursor = cursor;
        while let Some(id) = cursor.entry {
            match self.content.get(id).map(Entry::content) {
                Some(Content::Float | Content::Replaced { .. }) => return true,
                Some(Content::Text { text, .. }) if cursor.offset < text.len() => return true,
                _ => cursor = self.after(id),
            }
        }
        false
    }

    /// The bytes, style and handle behind a text piece.
    pub fn text_of(
        &self,
        id: ContentId,
        range: &Range<usize>,
    ) -> Result<(&'a str, &'a Entry<S, T, H>)> {
        let entry = self.entry(id)?;
        let text = entry
            .text()
            .and_then(|text| text.get(range.clone()))
            .ok_or(ParagraphError::BadParam("text piece out of range"))?;
        Ok((text, entry))
    }
}

/// Measure a unit through the client, piece by piece.
pub(crate) fn measure_unit<C: ParagraphClient>(
    client: &C,
    walker: &Walker<'_, C::Style, C::Text, C::Handle>,
    unit: &Unit,
) -> Result<Measured> {
    let mut measured = Measured {
        advances: SmallVec::new(),
        width: Fixed::ZERO,
        fit: Fixed::ZERO,
        height: Fixed::ZERO,
        baseline: Fixed::ZERO,
        visible: false,
    };

    for piece in &unit.pieces {
        let advance = match piece {
            Piece::Text { id, range } => {
                let (text, entry) = walker.text_of(*id, range)?;
                let metrics = client.measure_text(text, entry.style())?;
                measured.height = measured.height.max(metrics.height);
                measured.baseline = measured.baseline.max(metrics.baseline);
                measured.visible = true;
                metrics.width
            }
            Piece::Replaced(id) => {
                let (width, height) = match walker.entry(*id)?.content() {
                    Content::Replaced { width, height } => (*width, *height),
                    _ => (0, 0),
                };
                measured.height = measured.height.max(Fixed::from_px(height));
                measured.visible = true;
                Fixed::from_px(width)
            }
            Piece::Marker(_) => Fixed::ZERO,
        };
        try_push(&mut measured.advances, advance)?;
        measured.width += advance;
    }

    let mut hang = Fixed::ZERO;
    for (piece, advance) in unit.pieces.iter().zip(&measured.advances).rev() {
        match piece {
            Piece::Marker(_) => {}
            Piece::Replaced(_) => break,
            Piece::Text { id, range } => {
                let (text, entry) = walker.text_of(*id, range)?;
                let kept = text.trim_end_matches(hangs);
                if kept.len() == text.len() {
                    break;
                }
                if kept.is_empty() {
                    hang += *advance;
                    continue;
                }
                hang += *advance - client.measure_text(kept, entry.style())?.width;
                break;
            }
        }
    }
    measured.fit = (measured.width - hang).clamp(Fixed::ZERO, measured.width);
    Ok(measured)
}
