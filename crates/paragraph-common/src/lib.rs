//! Common utilities for the paragraph engine.
//!
//! This crate provides shared infrastructure used by all paragraph components:
//! - **Errors** - the [`ParagraphError`] taxonomy and [`Result`] alias
//! - **Fixed point** - the 22.10 [`Fixed`] type used for sub-pixel layout math
//! - **Logging** - the injected [`LogConfig`] capability and stock sinks

pub mod error;
pub mod fixed;
pub mod logging;

pub use error::{ParagraphError, Result};
pub use fixed::Fixed;
pub use logging::{FacadeSink, LogConfig, LogLevel, LogSink, StderrSink};
