//! Client collaborators: text retrieval, measurement and layout output.
//!
//! The engine never interprets styles or text references. Everything that
//! needs font data or document knowledge goes through [`ParagraphClient`],
//! and every placement decision comes back out through a [`LineSink`].

use paragraph_common::{Fixed, Result};
use serde::Serialize;

/// Measured extent of a span of text in one style.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TextMetrics {
    /// Advance width.
    pub width: Fixed,
    /// Ascent plus descent.
    pub height: Fixed,
    /// Distance from the top of the span to its baseline.
    pub baseline: Fixed,
}

/// Services the client provides to every paragraph of a context.
///
/// Measurements must be deterministic for the lifetime of a paragraph: the
/// same span in the same style always measures the same.
pub trait ParagraphClient {
    /// Opaque style handle. Cloning acquires a reference, dropping releases
    /// it.
    type Style: Clone;
    /// Client reference to a string, resolved once per text insertion.
    type Text;
    /// Opaque per-entry handle passed back in layout callbacks.
    type Handle;

    /// Resolve a text reference to its bytes.
    ///
    /// # Errors
    ///
    /// Any failure is propagated unchanged to the inserting caller.
    fn text_get(&self, text: &Self::Text) -> Result<String>;

    /// Measure `text` set in `style`.
    ///
    /// # Errors
    ///
    /// Any failure aborts the width query or line layout that asked.
    fn measure_text(&self, text: &str, style: &Self::Style) -> Result<TextMetrics>;

    /// Width in pixels of a floated box, for shrink-to-fit width analysis.
    ///
    /// # Errors
    ///
    /// Any failure aborts the width query.
    fn measure_float(&self, handle: &Self::Handle, style: &Self::Style) -> Result<u32>;
}

/// Position of an item relative to the top-left of its line's in-flow area,
/// in whole pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Position {
    /// Horizontal offset.
    pub x: u32,
    /// Vertical offset.
    pub y: u32,
}

/// A slice of one text entry placed on a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TextSpan<'a> {
    /// The placed bytes.
    pub text: &'a str,
    /// Byte offset of `text` within the entry's resolved text.
    pub offset: usize,
}

/// Receives the placements of one laid-out line.
///
/// Sinks only ever see shared borrows of paragraph data, so they cannot
/// change the paragraph while it is being laid out. Returning an error
/// aborts the line; the paragraph does not advance past it.
pub trait LineSink<S, H> {
    /// A run of text from one entry, all in one style.
    ///
    /// # Errors
    ///
    /// Propagated to the caller of the layout call.
    fn layout_text(&mut self, handle: &H, style: &S, span: TextSpan<'_>, at: Position)
    -> Result<()>;

    /// A replaced box.
    ///
    /// # Errors
    ///
    /// Propagated to the caller of the layout call.
    fn layout_replaced(&mut self, handle: &H, style: &S, at: Position) -> Result<()> {
        let _ = (handle, style, at);
        Ok(())
    }

    /// A float reached on this line. The sink places it and narrows
    /// `available_width` by the space it takes.
    ///
    /// # Errors
    ///
    /// Propagated to the caller of the layout call.
    fn layout_float(&mut self, handle: &H, style: &S, available_width: &mut u32) -> Result<()> {
        let _ = (handle, style, available_width);
        Ok(())
    }
}

/// Approximate text metrics from fixed ratios of the font size.
///
/// Without font data the average advance of Latin glyphs in a proportional
/// face is about 0.6 em, and 1.2 em is the upper end of the usual range for
/// `line-height: normal`. The baseline sits at 80% of the line height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ApproximateMetrics {
    /// Advance of one character as a fraction of the font size.
    pub char_width_ratio: f32,
    /// Line height as a fraction of the font size.
    pub line_height_ratio: f32,
}

impl ApproximateMetrics {
    /// Fraction of the line height above the baseline.
    const BASELINE_RATIO: f32 = 0.8;

    /// Metrics with the given character-advance ratio and the default line
    /// height.
    #[must_use]
    pub fn with_char_width(char_width_ratio: f32) -> Self {
        Self {
            char_width_ratio,
            ..Self::default()
        }
    }

    /// Measure `text` at `font_size` pixels.
    #[must_use]
    pub fn measure(&self, text: &str, font_size: f32) -> TextMetrics {
        #[allow(clippy::cast_precision_loss)]
        let chars = text.chars().count() as f32;
        let line_height = font_size * self.line_height_ratio;
        TextMetrics {
            width: Fixed::from_f32(chars * font_size * self.char_width_ratio),
            height: Fixed::from_f32(line_height),
            baseline: Fixed::from_f32(line_height * Self::BASELINE_RATIO),
        }
    }
}

impl Default for ApproximateMetrics {
    fn default() -> Self {
        Self {
            char_width_ratio: 0.6,
            line_height_ratio: 1.2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_approximate_metrics() {
        let m = ApproximateMetrics::default().measure("hello", 10.0);
        assert_eq!(m.width.to_px(), 30);
        assert_eq!(m.height.to_px(), 12);
        assert_eq!(m.baseline, Fixed::from_f32(9.6));
    }

    #[test]
    fn test_multibyte_counts_chars() {
        let m = ApproximateMetrics::default().measure("héllo", 10.0);
        assert_eq!(m.width.to_px(), 30);
    }

    #[test]
    fn test_custom_ratio() {
        let m = ApproximateMetrics::with_char_width(1.0).measure("ab", 16.0);
        assert_eq!(m.width, Fixed::from_px(32));
        assert_eq!(m.height, Fixed::from_f32(19.2));
    }
}
