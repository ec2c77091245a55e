//! Content-type tags.

use paragraph_common::{ParagraphError, Result};
use serde::Serialize;
use strum_macros::{Display, EnumString};

/// The closed set of content variants a paragraph can hold.
///
/// `Display` gives the canonical upper-case name; parsing accepts that name
/// or the kebab-case form (`inline-start`). The `u8` discriminants are the
/// wire tags accepted by [`ContentKind::try_from`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize)]
#[repr(u8)]
pub enum ContentKind {
    /// A run of text.
    #[strum(to_string = "TEXT", serialize = "text")]
    Text = 0,
    /// A box with `float: left | right`.
    #[strum(to_string = "FLOAT", serialize = "float")]
    Float = 1,
    /// A box with caller-provided dimensions (image, form control,
    /// inline-block).
    #[strum(to_string = "REPLACED", serialize = "replaced")]
    Replaced = 2,
    /// Start of a nested inline element.
    #[strum(to_string = "INLINE START", serialize = "inline-start")]
    InlineStart = 3,
    /// End of a nested inline element.
    #[strum(to_string = "INLINE END", serialize = "inline-end")]
    InlineEnd = 4,
}

impl ContentKind {
    /// Parse a textual content tag, rejecting unknown tags with
    /// [`ParagraphError::BadContentType`].
    ///
    /// # Errors
    ///
    /// Returns [`ParagraphError::BadContentType`] if `tag` names no variant.
    pub fn parse(tag: &str) -> Result<Self> {
        tag.parse()
            .map_err(|_| ParagraphError::BadContentType(tag.to_string()))
    }

    /// Whether content of this kind takes part in in-flow line filling.
    #[must_use]
    pub const fn is_in_flow(self) -> bool {
        !matches!(self, Self::Float)
    }
}

impl TryFrom<u8> for ContentKind {
    type Error = ParagraphError;

    fn try_from(tag: u8) -> Result<Self> {
        match tag {
            0 => Ok(Self::Text),
            1 => Ok(Self::Float),
            2 => Ok(Self::Replaced),
            3 => Ok(Self::InlineStart),
            4 => Ok(Self::InlineEnd),
            other => Err(ParagraphError::BadContentType(format!("tag {other}"))),
        }
    }
}
