//! Shared layout context.

use paragraph_common::{LogConfig, LogLevel, para_log};

use crate::client::ParagraphClient;
use crate::paragraph::Paragraph;

/// State shared by every paragraph of one client: the collaborator
/// implementation and the logging configuration.
///
/// Paragraphs borrow their context, so a context always outlives the
/// paragraphs created from it.
#[derive(Debug)]
pub struct Context<C> {
    client: C,
    log: LogConfig,
}

impl<C: ParagraphClient> Context<C> {
    /// Create a context with logging disabled.
    #[must_use]
    pub fn new(client: C) -> Self {
        Self::with_log(client, LogConfig::disabled())
    }

    /// Create a context that logs through `log`.
    #[must_use]
    pub fn with_log(client: C, log: LogConfig) -> Self {
        para_log!(&log, LogLevel::Info, "context created, log level {}", log.level());
        Self { client, log }
    }

    /// The client collaborator.
    #[must_use]
    pub const fn client(&self) -> &C {
        &self.client
    }

    /// The logging configuration.
    #[must_use]
    pub const fn log(&self) -> &LogConfig {
        &self.log
    }

    /// Create an empty paragraph owned by `owner`, styled by
    /// `container_style`.
    #[must_use]
    pub fn paragraph(&self, owner: C::Handle, container_style: &C::Style) -> Paragraph<'_, C> {
        Paragraph::new(self, owner, container_style)
    }
}
