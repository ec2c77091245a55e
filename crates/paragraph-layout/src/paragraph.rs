//! A paragraph: content, open-element styles and layout progress.

use std::fmt;

use paragraph_common::{LogLevel, Result, para_log};
use paragraph_content::{ContentId, ContentModel, ContentParams, InsertAt, StyleStack};

use crate::client::{LineSink, ParagraphClient};
use crate::context::Context;
use crate::line::{BreakerState, LineBreaker, LineOutcome};
use crate::segment::BreakTable;
use crate::width::{self, MinMaxWidth};

/// Content model type of a paragraph over client `C`.
pub type ParagraphContent<C> = ContentModel<
    <C as ParagraphClient>::Style,
    <C as ParagraphClient>::Text,
    <C as ParagraphClient>::Handle,
>;

/// Insertion parameters for a paragraph over client `C`.
pub type Params<'a, C> = ContentParams<
    'a,
    <C as ParagraphClient>::Style,
    <C as ParagraphClient>::Text,
    <C as ParagraphClient>::Handle,
>;

/// One paragraph of inline content.
///
/// Built by inserting content, queried for its shrink-to-fit widths and
/// laid out one line per [`Paragraph::layout_next_line`] call. Any content
/// change rewinds layout to the first line.
///
/// Dropping the paragraph releases one style reference per entry and one
/// per style stack frame.
pub struct Paragraph<'ctx, C: ParagraphClient> {
    ctx: &'ctx Context<C>,
    owner: C::Handle,
    content: ParagraphContent<C>,
    styles: StyleStack<C::Style>,
    breaks: BreakTable,
    widths: Option<(u64, MinMaxWidth)>,
    breaker: LineBreaker,
}

impl<'ctx, C: ParagraphClient> Paragraph<'ctx, C> {
    /// Create an empty paragraph whose container style is `container_style`.
    #[must_use]
    pub fn new(ctx: &'ctx Context<C>, owner: C::Handle, container_style: &C::Style) -> Self {
        para_log!(ctx.log(), LogLevel::Debug, "paragraph created");
        Self {
            ctx,
            owner,
            content: ContentModel::new(),
            styles: StyleStack::new(container_style),
            breaks: BreakTable::default(),
            widths: None,
            breaker: LineBreaker::default(),
        }
    }

    /// The context this paragraph was created in.
    #[must_use]
    pub const fn context(&self) -> &'ctx Context<C> {
        self.ctx
    }

    /// The client handle of the element owning this paragraph.
    #[must_use]
    pub const fn owner(&self) -> &C::Handle {
        &self.owner
    }

    /// The content in sequence order.
    #[must_use]
    pub const fn content(&self) -> &ParagraphContent<C> {
        &self.content
    }

    /// All resolved text in sequence order.
    ///
    /// # Errors
    ///
    /// Returns [`ParagraphError::OutOfMemory`](paragraph_common::ParagraphError::OutOfMemory)
    /// if the text buffer cannot grow.
    pub fn aggregate_text(&mut self) -> Result<&str> {
        self.content.aggregate_text()
    }

    /// The style new text would be set in.
    #[must_use]
    pub fn current_style(&self) -> &C::Style {
        self.styles.current()
    }

    /// Number of style stack frames, the container frame included.
    #[must_use]
    pub fn style_depth(&self) -> usize {
        self.styles.depth()
    }

    /// Where line layout stands.
    #[must_use]
    pub const fn layout_state(&self) -> BreakerState {
        self.breaker.state()
    }

    /// Insert content at `at`.
    ///
    /// Text is resolved through [`ParagraphClient::text_get`] immediately.
    ///
    /// # Errors
    ///
    /// - [`ParagraphError::BadParam`](paragraph_common::ParagraphError::BadParam)
    ///   for a stale anchor or an inline end with no open inline start.
    /// - [`ParagraphError::OutOfMemory`](paragraph_common::ParagraphError::OutOfMemory)
    ///   if storage cannot grow.
    /// - Any error from text retrieval.
    pub fn insert(&mut self, params: Params<'_, C>, at: InsertAt) -> Result<ContentId> {
        let kind = params.kind();
        let client = self.ctx.client();
        let inserted = self
            .content
            .insert(&mut self.styles, params, at, |text| client.text_get(text));
        match &inserted {
            Ok(id) => {
                para_log!(self.ctx.log(), LogLevel::Debug, "inserted {kind} as {id:?}");
                self.content_changed();
            }
            Err(err) => {
                para_log!(self.ctx.log(), LogLevel::Notice, "insert {kind} failed: {err}");
            }
        }
        inserted
    }

    /// Append a text run in the current style.
    ///
    /// # Errors
    ///
    /// As for [`Paragraph::insert`].
    pub fn add_text(&mut self, text: C::Text, handle: C::Handle) -> Result<ContentId> {
        self.insert(Params::<C>::Text { text, handle }, InsertAt::End)
    }

    /// Append a floated box.
    ///
    /// # Errors
    ///
    /// As for [`Paragraph::insert`].
    pub fn add_float(&mut self, style: &C::Style, handle: C::Handle) -> Result<ContentId> {
        self.insert(Params::<C>::Float { style, handle }, InsertAt::End)
    }

    /// Append a replaced box of `width` × `height` pixels.
    ///
    /// # Errors
    ///
    /// As for [`Paragraph::insert`].
    pub fn add_replaced(
        &mut self,
        width: u32,
        height: u32,
        style: &C::Style,
        handle: C::Handle,
    ) -> Result<ContentId> {
        let params = Params::<C>::Replaced {
            width,
            height,
            style,
            handle,
        };
        self.insert(params, InsertAt::End)
    }

    /// Open a nested inline element styled by `style`.
    ///
    /// # Errors
    ///
    /// As for [`Paragraph::insert`].
    pub fn add_inline_start(&mut self, style: &C::Style, handle: C::Handle) -> Result<ContentId> {
        self.insert(Params::<C>::InlineStart { style, handle }, InsertAt::End)
    }

    /// Close the innermost open inline element.
    ///
    /// # Errors
    ///
    /// As for [`Paragraph::insert`].
    pub fn add_inline_end(&mut self, handle: C::Handle) -> Result<ContentId> {
        self.insert(Params::<C>::InlineEnd { handle }, InsertAt::End)
    }

    /// Remove one entry.
    ///
    /// # Errors
    ///
    /// Returns [`ParagraphError::BadParam`](paragraph_common::ParagraphError::BadParam)
    /// if `id` is not live.
    pub fn remove(&mut self, id: ContentId) -> Result<()> {
        self.content.remove(id)?;
        self.content_changed();
        Ok(())
    }

    /// Remove all content and close every open inline element.
    pub fn clear(&mut self) {
        self.content.clear();
        self.styles.unwind();
        self.content_changed();
    }

    /// Minimum and maximum preferred widths, recomputed only after content
    /// changes.
    ///
    /// # Errors
    ///
    /// Any measurement error, or
    /// [`ParagraphError::OutOfMemory`](paragraph_common::ParagraphError::OutOfMemory).
    pub fn min_max_width(&mut self) -> Result<MinMaxWidth> {
        let revision = self.content.revision();
        if let Some((_, widths)) = self.widths.filter(|(cached, _)| *cached == revision) {
            return Ok(widths);
        }
        self.breaks.refresh(&mut self.content)?;
        let widths = width::min_max_width(self.ctx.client(), &self.content, &self.breaks)?;
        para_log!(
            self.ctx.log(),
            LogLevel::Debug,
            "min width {}px, max width {}px",
            widths.min,
            widths.max
        );
        self.widths = Some((revision, widths));
        Ok(widths)
    }

    /// Minimum preferred width.
    ///
    /// # Errors
    ///
    /// As for [`Paragraph::min_max_width`].
    pub fn min_width(&mut self) -> Result<u32> {
        self.min_max_width().map(|widths| widths.min)
    }

    /// Maximum preferred width.
    ///
    /// # Errors
    ///
    /// As for [`Paragraph::min_max_width`].
    pub fn max_width(&mut self) -> Result<u32> {
        self.min_max_width().map(|widths| widths.max)
    }

    /// Lay out the next line in `available_width` pixels.
    ///
    /// Returns [`LineStatus::EndOfLine`](crate::LineStatus::EndOfLine) while
    /// content remains. Once exhausted, every further call succeeds with
    /// [`LineStatus::Done`](crate::LineStatus::Done), zero height and no
    /// sink calls.
    ///
    /// # Errors
    ///
    /// Any measurement or sink error, unchanged. The paragraph then resumes
    /// from the same line on the next call.
    pub fn layout_next_line<K>(
        &mut self,
        available_width: u32,
        sink: &mut K,
    ) -> Result<LineOutcome>
    where
        K: LineSink<C::Style, C::Handle> + ?Sized,
    {
        self.breaks.refresh(&mut self.content)?;
        self.breaker
            .layout_line(self.ctx, &self.content, &self.breaks, available_width, sink)
    }

    /// Rewind line layout to the first line, keeping the content.
    pub fn reset_layout(&mut self) {
        self.breaker.reset();
    }

    fn content_changed(&mut self) {
        self.breaker.reset();
    }
}

impl<C: ParagraphClient> fmt::Debug for Paragraph<'_, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Paragraph")
            .field("entries", &self.content.len())
            .field("text_len", &self.content.text_len())
            .field("style_depth", &self.styles.depth())
            .field("layout_state", &self.breaker.state())
            .finish_non_exhaustive()
    }
}
