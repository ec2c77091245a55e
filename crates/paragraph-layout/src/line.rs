//! Resumable greedy line breaking.
//!
//! Each call fills one line, left to right, with whole breakable units:
//!
//! 1. Floats reached on the line go to the sink first; each may narrow the
//!    available width for the rest of the line. A float inside a word goes
//!    to the sink once that word is placed.
//! 2. In-flow units are measured and placed while they fit. The first
//!    visible unit that would overflow ends the line, unless nothing visible
//!    has been placed yet, in which case it is placed anyway so every line
//!    makes progress. Units holding only inline markers always fit.
//! 3. A forced break ends the line after the unit carrying it.
//!
//! Trailing white space of a unit hangs: it does not count towards fitting.
//! There is no look-ahead past the first overflowing unit and no
//! backtracking.

use std::ops::Range;

use paragraph_common::{Fixed, LogLevel, Result, para_log};
use paragraph_content::{ContentId, ContentModel};
use serde::Serialize;
use smallvec::SmallVec;
use strum_macros::Display;

use crate::client::{LineSink, ParagraphClient, Position, TextSpan};
use crate::context::Context;
use crate::segment::{BreakTable, Cursor, Piece, Step, Walker, measure_unit, try_push};

/// Progress of a paragraph through line layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, Serialize)]
pub enum BreakerState {
    /// No line laid out since creation, reset or the last content change.
    #[default]
    Idle,
    /// At least one line laid out and content remains.
    InProgress,
    /// Every piece of content has been laid out.
    Exhausted,
}

/// Successful result of one line layout call.
///
/// `Display` gives the status strings of the error-to-string table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize)]
pub enum LineStatus {
    /// The paragraph is fully laid out.
    #[strum(to_string = "Success")]
    Done,
    /// A line was laid out and more content remains.
    #[strum(to_string = "Success: End of line")]
    EndOfLine,
}

/// Result of laying out one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct LineOutcome {
    /// Whether more lines follow.
    pub status: LineStatus,
    /// Line height in pixels: the tallest text span or replaced box placed.
    pub height: u32,
    /// Distance from the top of the line to the highest text baseline.
    pub baseline: u32,
}

impl LineOutcome {
    const EXHAUSTED: Self = Self {
        status: LineStatus::Done,
        height: 0,
        baseline: 0,
    };

    /// Whether another call would lay out more content.
    #[must_use]
    pub const fn has_more(&self) -> bool {
        matches!(self.status, LineStatus::EndOfLine)
    }
}

/// An in-flow piece placed on the current line, waiting to be emitted.
#[derive(Debug)]
struct Placement {
    piece: Piece,
    x: Fixed,
}

/// Per-paragraph line breaking state: where the next line resumes.
#[derive(Debug, Default)]
pub(crate) struct LineBreaker {
    state: BreakerState,
    cursor: Cursor,
    lines: usize,
}

impl LineBreaker {
    pub const fn state(&self) -> BreakerState {
        self.state
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Lay out the next line into `sink`.
    ///
    /// On error the resume point does not move.
    pub fn layout_line<C, K>(
        &mut self,
        ctx: &Context<C>,
        content: &ContentModel<C::Style, C::Text, C::Handle>,
        breaks: &BreakTable,
        available_width: u32,
        sink: &mut K,
    ) -> Result<LineOutcome>
    where
        C: ParagraphClient,
        K: LineSink<C::Style, C::Handle> + ?Sized,
    {
        let log = ctx.log();
        let mut cursor = match self.state {
            BreakerState::Exhausted => return Ok(LineOutcome::EXHAUSTED),
            BreakerState::Idle => Cursor::start(content),
            BreakerState::InProgress => self.cursor,
        };
        let line = self.lines + 1;
        let walker = Walker::new(content, breaks);

        let mut available = available_width;
        let mut pen = Fixed::ZERO;
        let mut height = Fixed::ZERO;
        let mut baseline = Fixed::ZERO;
        let mut has_content = false;
        let mut placements: SmallVec<[Placement; 8]> = SmallVec::new();
        let mut remaining = true;

        loop {
            let Some((step, next)) = walker.next_step(cursor)? else {
                remaining = false;
                break;
            };
            match step {
                Step::Float(id) => {
                    place_float(ctx, &walker, id, line, &mut available, sink)?;
                    cursor = next;
                }
                Step::Unit(unit) => {
                    let measured = measure_unit(ctx.client(), &walker, &unit)?;
                    let limit = Fixed::from_px(available);

                    #[cfg(feature = "layout-trace")]
                    eprintln!(
                        "[LINE {line}] unit {:?} width={} fit={} pen={pen} limit={limit}",
                        unit.pieces, measured.width, measured.fit
                    );

                    if measured.visible && has_content && pen + measured.fit > limit {
                        break;
                    }
                    if measured.visible && !has_content && measured.fit > limit {
                        para_log!(
                            log,
                            LogLevel::Warning,
                            "line {line}: unbreakable content of {} overflows {available}px",
                            measured.fit
                        );
                    }

                    let forced = unit.forced;
                    let mut x = pen;
                    for (piece, advance) in unit.pieces.into_iter().zip(measured.advances) {
                        try_push(&mut placements, Placement { piece, x })?;
                        x += advance;
                    }
                    pen += measured.width;
                    height = height.max(measured.height);
                    baseline = baseline.max(measured.baseline);
                    has_content |= measured.visible;
                    cursor = next;
                    for id in unit.floats {
                        place_float(ctx, &walker, id, line, &mut available, sink)?;
                    }

                    if forced {
                        remaining = walker.has_more(cursor);
                        break;
                    }
                }
            }
        }

        emit(&walker, &placements, sink)?;

        let outcome = LineOutcome {
            status: if remaining {
                LineStatus::EndOfLine
            } else {
                LineStatus::Done
            },
            height: height.to_px(),
            baseline: baseline.to_px(),
        };
        para_log!(
            log,
            LogLevel::Debug,
            "line {line}: {} pieces, {pen} wide, {}px high: {}",
            placements.len(),
            outcome.height,
            outcome.status
        );

        self.lines = line;
        self.cursor = cursor;
        self.state = if remaining {
            BreakerState::InProgress
        } else {
            BreakerState::Exhausted
        };
        Ok(outcome)
    }
}

fn place_float<C, K>(
    ctx: &Context<C>,
    walker: &Walker<'_, C::Style, C::Text, C::Handle>,
    id: ContentId,
    line: usize,
    available: &mut u32,
    sink: &mut K,
) -> Result<()>
where
    C: ParagraphClient,
    K: LineSink<C::Style, C::Handle> + ?Sized,
{
    let entry = walker.entry(id)?;
    sink.layout_float(entry.handle(), entry.style(), available)?;
    para_log!(
        ctx.log(),
        LogLevel::Debug,
        "line {line}: float placed, {available}px available"
    );
    Ok(())
}

/// Hand the placed pieces to the sink in order, merging adjacent slices of
/// the same text entry into one span.
fn emit<S, T, H, K>(
    walker: &Walker<'_, S, T, H>,
    placements: &[Placement],
    sink: &mut K,
) -> Result<()>
where
    K: LineSink<S, H> + ?Sized,
{
    let mut pending: Option<(ContentId, Range<usize>, Fixed)> = None;

    for placement in placements {
        match &placement.piece {
            Piece::Text { id, range } => {
                let contiguous = pending
                    .as_mut()
                    .filter(|(run_id, run, _)| *run_id == *id && run.end == range.start);
                if let Some((_, run, _)) = contiguous {
                    run.end = range.end;
                    continue;
                }
                if let Some(run) = pending.replace((*id, range.clone(), placement.x)) {
                    emit_text(walker, run, sink)?;
                }
            }
            Piece::Replaced(id) => {
                if let Some(run) = pending.take() {
                    emit_text(walker, run, sink)?;
                }
                let entry = walker.entry(*id)?;
                sink.layout_replaced(entry.handle(), entry.style(), position(placement.x))?;
            }
            Piece::Marker(_) => {}
        }
    }
    if let Some(run) = pending {
        emit_text(walker, run, sink)?;
    }
    Ok(())
}

fn emit_text<S, T, H, K>(
    walker: &Walker<'_, S, T, H>,
    (id, range, x): (ContentId, Range<usize>, Fixed),
    sink: &mut K,
) -> Result<()>
where
    K: LineSink<S, H> + ?Sized,
{
    let (text, entry) = walker.text_of(id, &range)?;
    let span = TextSpan {
        text,
        offset: range.start,
    };
    sink.layout_text(entry.handle(), entry.style(), span, position(x))
}

const fn position(x: Fixed) -> Position {
    Position { x: x.to_px(), y: 0 }
}
