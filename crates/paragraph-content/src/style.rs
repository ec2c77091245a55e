//! Style stack for the inline elements open at the insertion point.
//!
//! Styles are opaque, client-owned and reference counted. Storing a style
//! acquires a reference (`Clone`); discarding one releases it (`Drop`). The
//! stack therefore holds exactly one reference per frame.

use paragraph_common::{ParagraphError, Result};
use smallvec::SmallVec;

/// Nested frames stored inline before the stack spills to the heap.
pub const INLINE_FRAMES: usize = 2;

/// Ordered stack of styles: the paragraph's container style at the bottom,
/// one frame per currently open nested inline element above it.
///
/// The container frame cannot be popped. Shallow nesting stays in inline
/// storage; once the stack spills to the heap it stays there until dropped.
#[derive(Debug)]
pub struct StyleStack<S> {
    container: S,
    nested: SmallVec<[S; INLINE_FRAMES]>,
}

impl<S: Clone> StyleStack<S> {
    /// Create a stack holding only `container`, acquiring one reference.
    pub fn new(container: &S) -> Self {
        Self {
            container: container.clone(),
            nested: SmallVec::new(),
        }
    }

    /// Push a nested frame, acquiring a reference to `style`.
    ///
    /// # Errors
    ///
    /// Returns [`ParagraphError::OutOfMemory`] if the stack cannot grow; the
    /// stack is left unchanged.
    pub fn push(&mut self, style: &S) -> Result<()> {
        self.nested
            .try_reserve(1)
            .map_err(|_| ParagraphError::OutOfMemory)?;
        self.nested.push(style.clone());
        Ok(())
    }

    /// Pop the top nested frame, handing its reference to the caller.
    ///
    /// Returns `None` when only the container frame remains.
    pub fn pop(&mut self) -> Option<S> {
        self.nested.pop()
    }

    /// The style in effect at the insertion point.
    #[must_use]
    pub fn current(&self) -> &S {
        self.nested.last().unwrap_or(&self.container)
    }

    /// The paragraph container style.
    #[must_use]
    pub const fn container(&self) -> &S {
        &self.container
    }

    /// Number of frames, container included. Never zero.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.nested.len() + 1
    }

    /// Whether any nested element is open.
    #[must_use]
    pub fn has_open_elements(&self) -> bool {
        !self.nested.is_empty()
    }

    /// Whether frame storage has moved to the heap.
    #[must_use]
    pub fn is_spilled(&self) -> bool {
        self.nested.spilled()
    }

    /// Release every nested frame, leaving the container.
    pub fn unwind(&mut self) {
        self.nested.clear();
    }

    /// Frames from the container upwards.
    pub fn iter(&self) -> impl Iterator<Item = &S> {
        std::iter::once(&self.container).chain(self.nested.iter())
    }
}
