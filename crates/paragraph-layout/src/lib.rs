//! Inline line layout for the paragraph engine.
//!
//! A [`Context`] wraps the client's collaborators and logging; each
//! [`Paragraph`] created from it holds inline content and lays it out one
//! line at a time.
//!
//! ```
//! use paragraph_layout::{
//!     ApproximateMetrics, Context, LineSink, ParagraphClient, Position, Result, TextMetrics,
//!     TextSpan,
//! };
//!
//! struct Client;
//!
//! impl ParagraphClient for Client {
//!     type Style = f32;
//!     type Text = &'static str;
//!     type Handle = ();
//!
//!     fn text_get(&self, text: &&'static str) -> Result<String> {
//!         Ok((*text).to_string())
//!     }
//!
//!     fn measure_text(&self, text: &str, font_size: &f32) -> Result<TextMetrics> {
//!         Ok(ApproximateMetrics::default().measure(text, *font_size))
//!     }
//!
//!     fn measure_float(&self, _: &(), _: &f32) -> Result<u32> {
//!         Ok(0)
//!     }
//! }
//!
//! struct Lines(Vec<String>);
//!
//! impl LineSink<f32, ()> for Lines {
//!     fn layout_text(&mut self, _: &(), _: &f32, span: TextSpan<'_>, _: Position) -> Result<()> {
//!         self.0.push(span.text.to_string());
//!         Ok(())
//!     }
//! }
//!
//! let ctx = Context::new(Client);
//! let mut para = ctx.paragraph((), &10.0);
//! para.add_text("Hello wide world", ())?;
//!
//! let mut lines = Lines(Vec::new());
//! while para.layout_next_line(65, &mut lines)?.has_more() {}
//! assert_eq!(lines.0, ["Hello wide ", "world"]);
//! # Ok::<(), paragraph_layout::ParagraphError>(())
//! ```

pub mod client;
pub mod context;
pub mod line;
pub mod paragraph;
mod segment;
pub mod width;

pub use client::{ApproximateMetrics, LineSink, ParagraphClient, Position, TextMetrics, TextSpan};
pub use context::Context;
pub use line::{BreakerState, LineOutcome, LineStatus};
pub use paragraph::{Paragraph, ParagraphContent, Params};
pub use width::MinMaxWidth;

pub use paragraph_common::{
    FacadeSink, Fixed, LogConfig, LogLevel, LogSink, ParagraphError, Result, StderrSink,
};
pub use paragraph_content::{ContentId, ContentKind, ContentParams, InsertAt};
