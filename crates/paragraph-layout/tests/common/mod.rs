//! Shared test doubles for paragraph layout tests.
#![allow(dead_code)]

use std::cell::Cell;
use std::rc::Rc;

use paragraph_layout::{
    ApproximateMetrics, Context, LineSink, ParagraphClient, ParagraphError, Position, Result,
    TextMetrics, TextSpan,
};

/// Counts live style references. Every `Clone` is an acquire and every
/// `Drop` a release.
#[derive(Debug, Default, Clone)]
pub struct StyleCounter(Rc<Cell<usize>>);

impl StyleCounter {
    /// Create a style with its first reference.
    pub fn style(&self, name: &'static str, font_size: f32) -> Style {
        self.0.set(self.0.get() + 1);
        Style {
            name,
            font_size,
            live: Rc::clone(&self.0),
        }
    }

    /// Live references across every style made by this counter.
    pub fn live(&self) -> usize {
        self.0.get()
    }
}

/// Reference-counted test style.
#[derive(Debug)]
pub struct Style {
    pub name: &'static str,
    pub font_size: f32,
    live: Rc<Cell<usize>>,
}

impl Clone for Style {
    fn clone(&self) -> Self {
        self.live.set(self.live.get() + 1);
        Self {
            name: self.name,
            font_size: self.font_size,
            live: Rc::clone(&self.live),
        }
    }
}

impl Drop for Style {
    fn drop(&mut self) {
        self.live.set(self.live.get() - 1);
    }
}

/// Resolves text verbatim and measures with 0.6 em advances, so a 10px
/// style gives 6px per character.
#[derive(Debug, Default)]
pub struct TestClient {
    /// Width reported for every float.
    pub float_width: u32,
    /// Texts that fail to resolve.
    pub missing: Vec<&'static str>,
    /// Measurement fails for spans containing this text.
    pub unmeasurable: Option<&'static str>,
}

impl ParagraphClient for TestClient {
    type Style = Style;
    type Text = &'static str;
    type Handle = u32;

    fn text_get(&self, text: &&'static str) -> Result<String> {
        if self.missing.contains(text) {
            return Err(ParagraphError::client(format!("no string {text:?}")));
        }
        Ok((*text).to_string())
    }

    fn measure_text(&self, text: &str, style: &Style) -> Result<TextMetrics> {
        if self.unmeasurable.is_some_and(|bad| text.contains(bad)) {
            return Err(ParagraphError::client("glyph missing"));
        }
        Ok(ApproximateMetrics::default().measure(text, style.font_size))
    }

    fn measure_float(&self, _handle: &u32, _style: &Style) -> Result<u32> {
        Ok(self.float_width)
    }
}

/// One callback received by [`Recorder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Text {
        handle: u32,
        style: &'static str,
        text: String,
        offset: usize,
        x: u32,
    },
    Replaced {
        handle: u32,
        style: &'static str,
        x: u32,
    },
    Float {
        handle: u32,
        available: u32,
    },
}

/// Records every callback. Floats narrow the line by `float_width`.
#[derive(Debug, Default)]
pub struct Recorder {
    pub events: Vec<Event>,
    pub float_width: u32,
    /// Fail on the text callback for this handle.
    pub fail_on: Option<u32>,
}

impl Recorder {
    pub fn texts(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|event| match event {
                Event::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn take(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }
}

impl LineSink<Style, u32> for Recorder {
    fn layout_text(
        &mut self,
        handle: &u32,
        style: &Style,
        span: TextSpan<'_>,
        at: Position,
    ) -> Result<()> {
        if self.fail_on == Some(*handle) {
            return Err(ParagraphError::client("sink refused text"));
        }
        self.events.push(Event::Text {
            handle: *handle,
            style: style.name,
            text: span.text.to_string(),
            offset: span.offset,
            x: at.x,
        });
        Ok(())
    }

    fn layout_replaced(&mut self, handle: &u32, style: &Style, at: Position) -> Result<()> {
        self.events.push(Event::Replaced {
            handle: *handle,
            style: style.name,
            x: at.x,
        });
        Ok(())
    }

    fn layout_float(&mut self, handle: &u32, _style: &Style, available: &mut u32) -> Result<()> {
        *available = available.saturating_sub(self.float_width);
        self.events.push(Event::Float {
            handle: *handle,
            available: *available,
        });
        Ok(())
    }
}

pub fn context() -> Context<TestClient> {
    Context::new(TestClient::default())
}
