//! Ordered, relocatable sequence of paragraph content.
//!
//! # Design
//!
//! Entries live in an arena of slots addressed by [`ContentId`]. Each
//! occupied slot stores intrusive `prev`/`next` links, so splicing before or
//! after any entry is O(1) and never moves other entries. A slot's
//! generation is bumped when it is vacated, which turns a handle to removed
//! content into a detectable [`ParagraphError::BadParam`] instead of a
//! silent alias of whatever reuses the slot.

use std::ops::Range;

use paragraph_common::{ParagraphError, Result};
use serde::Serialize;

use crate::kind::ContentKind;
use crate::style::StyleStack;

/// Stable handle to one content entry.
///
/// Valid until that entry is removed; unaffected by any other insertion or
/// removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ContentId {
    index: u32,
    generation: u32,
}

impl ContentId {
    /// Arena slot index. Slots are reused, so this alone is not an identity.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.index
    }
}

/// Variant payload of a stored entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content<T> {
    /// A text run.
    Text {
        /// The client's reference to the text, as supplied.
        source: T,
        /// The text resolved through the client at insertion time.
        text: String,
    },
    /// A floated box, sized later through the client.
    Float,
    /// A box with fixed, pre-scaled pixel dimensions.
    Replaced {
        /// Width in pixels.
        width: u32,
        /// Height in pixels.
        height: u32,
    },
    /// Start of a nested inline element.
    InlineStart,
    /// End of a nested inline element.
    InlineEnd,
}

impl<T> Content<T> {
    /// The tag of this variant.
    #[must_use]
    pub const fn kind(&self) -> ContentKind {
        match self {
            Self::Text { .. } => ContentKind::Text,
            Self::Float => ContentKind::Float,
            Self::Replaced { .. } => ContentKind::Replaced,
            Self::InlineStart => ContentKind::InlineStart,
            Self::InlineEnd => ContentKind::InlineEnd,
        }
    }

    /// Resolved text, for text runs.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Text { text, .. } => Some(text),
            _ => None,
        }
    }

    /// Resolved text length in bytes; zero for non-text content.
    #[must_use]
    pub fn text_len(&self) -> usize {
        self.text().map_or(0, str::len)
    }
}

/// One stored content entry: payload, owned style reference and the client's
/// handle.
#[derive(Debug)]
pub struct Entry<S, T, H> {
    content: Content<T>,
    style: S,
    handle: H,
}

impl<S, T, H> Entry<S, T, H> {
    /// The variant payload.
    #[must_use]
    pub const fn content(&self) -> &Content<T> {
        &self.content
    }

    /// The variant tag.
    #[must_use]
    pub const fn kind(&self) -> ContentKind {
        self.content.kind()
    }

    /// The style this entry holds a reference to.
    #[must_use]
    pub const fn style(&self) -> &S {
        &self.style
    }

    /// The client handle supplied at insertion.
    #[must_use]
    pub const fn handle(&self) -> &H {
        &self.handle
    }

    /// Resolved text, for text runs.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.content.text()
    }
}

/// Parameters for one insertion, tagged by content variant.
///
/// Styles are borrowed; the model acquires its own reference.
#[derive(Debug)]
pub enum ContentParams<'a, S, T, H> {
    /// A text run, styled with the current style at the insertion point.
    Text {
        /// Client reference to the text; resolved immediately.
        text: T,
        /// Client handle for this run.
        handle: H,
    },
    /// A floated box.
    Float {
        /// Style of the float.
        style: &'a S,
        /// Client handle for the float.
        handle: H,
    },
    /// A replaced box of fixed size.
    Replaced {
        /// Width in pixels.
        width: u32,
        /// Height in pixels.
        height: u32,
        /// Style of the box.
        style: &'a S,
        /// Client handle for the box.
        handle: H,
    },
    /// Open a nested inline element.
    InlineStart {
        /// Style of the element; becomes the current style.
        style: &'a S,
        /// Client handle for the element.
        handle: H,
    },
    /// Close the innermost open inline element.
    InlineEnd {
        /// Client handle for the element.
        handle: H,
    },
}

impl<S, T, H> ContentParams<'_, S, T, H> {
    /// The tag of the content these parameters describe.
    #[must_use]
    pub const fn kind(&self) -> ContentKind {
        match self {
            Self::Text { .. } => ContentKind::Text,
            Self::Float { .. } => ContentKind::Float,
            Self::Replaced { .. } => ContentKind::Replaced,
            Self::InlineStart { .. } => ContentKind::InlineStart,
            Self::InlineEnd { .. } => ContentKind::InlineEnd,
        }
    }
}

/// Where a new entry goes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InsertAt {
    /// After the last entry.
    #[default]
    End,
    /// Immediately before an existing entry.
    Before(ContentId),
    /// Immediately after an existing entry.
    After(ContentId),
}

#[derive(Debug)]
struct Node<S, T, H> {
    entry: Entry<S, T, H>,
    prev: Option<u32>,
    next: Option<u32>,
    /// Byte offset into the aggregate text; valid while the model is clean.
    text_start: usize,
}

#[derive(Debug)]
enum Slot<S, T, H> {
    Occupied { generation: u32, node: Node<S, T, H> },
    Vacant { generation: u32, next_free: Option<u32> },
}

impl<S, T, H> Slot<S, T, H> {
    const fn generation(&self) -> u32 {
        match self {
            Self::Occupied { generation, .. } | Self::Vacant { generation, .. } => *generation,
        }
    }

    const fn node(&self) -> Option<&Node<S, T, H>> {
        match self {
            Self::Occupied { node, .. } => Some(node),
            Self::Vacant { .. } => None,
        }
    }

    fn node_mut(&mut self) -> Option<&mut Node<S, T, H>> {
        match self {
            Self::Occupied { node, .. } => Some(node),
            Self::Vacant { .. } => None,
        }
    }
}

/// The ordered content of one paragraph.
///
/// `S` is the client style type, `T` the client's text reference and `H`
/// the client's per-entry handle. Dropping the model releases every entry's
/// style reference.
#[derive(Debug)]
pub struct ContentModel<S, T, H> {
    slots: Vec<Slot<S, T, H>>,
    free_head: Option<u32>,
    first: Option<u32>,
    last: Option<u32>,
    count: usize,
    text_len: usize,
    aggregate: String,
    dirty: bool,
    revision: u64,
}

impl<S, T, H> Default for ContentModel<S, T, H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, T, H> ContentModel<S, T, H> {
    /// An empty model.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_head: None,
            first: None,
            last: None,
            count: 0,
            text_len: 0,
            aggregate: String::new(),
            dirty: false,
            revision: 0,
        }
    }

    /// Number of live entries.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.count
    }

    /// Whether the model holds no entries.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Total resolved text length of all live text runs, in bytes.
    #[must_use]
    pub const fn text_len(&self) -> usize {
        self.text_len
    }

    /// Counter bumped by every mutation. Derived data keyed on it is stale
    /// once the value changes.
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// First entry in sequence order.
    #[must_use]
    pub fn first(&self) -> Option<ContentId> {
        self.first.map(|index| self.id_at(index))
    }

    /// Last entry in sequence order.
    #[must_use]
    pub fn last(&self) -> Option<ContentId> {
        self.last.map(|index| self.id_at(index))
    }

    /// The entry after `id`.
    #[must_use]
    pub fn next(&self, id: ContentId) -> Option<ContentId> {
        self.node(id)?.next.map(|index| self.id_at(index))
    }

    /// The entry before `id`.
    #[must_use]
    pub fn prev(&self, id: ContentId) -> Option<ContentId> {
        self.node(id)?.prev.map(|index| self.id_at(index))
    }

    /// Look up a live entry.
    #[must_use]
    pub fn get(&self, id: ContentId) -> Option<&Entry<S, T, H>> {
        self.node(id).map(|node| &node.entry)
    }

    /// Whether `id` names a live entry.
    #[must_use]
    pub fn contains(&self, id: ContentId) -> bool {
        self.node(id).is_some()
    }

    /// Entries in sequence order.
    #[must_use]
    pub fn iter(&self) -> Iter<'_, S, T, H> {
        Iter {
            model: self,
            cursor: self.first,
        }
    }

    /// Insert one entry, resolving text runs through `resolve`.
    ///
    /// Text runs take a reference to the current style of `styles`; inline
    /// starts push their style and inline ends pop it. On error nothing is
    /// changed: neither the model nor the stack.
    ///
    /// # Errors
    ///
    /// - [`ParagraphError::BadParam`] if the anchor in `at` is not live, or
    ///   for an inline end with no open inline element.
    /// - [`ParagraphError::OutOfMemory`] if storage cannot grow.
    /// - Whatever `resolve` returns.
    pub fn insert(
        &mut self,
        styles: &mut StyleStack<S>,
        params: ContentParams<'_, S, T, H>,
        at: InsertAt,
        resolve: impl FnOnce(&T) -> Result<String>,
    ) -> Result<ContentId>
    where
        S: Clone,
    {
        match at {
            InsertAt::End => {}
            InsertAt::Before(anchor) | InsertAt::After(anchor) => {
                if !self.contains(anchor) {
                    return Err(ParagraphError::BadParam("stale position handle"));
                }
            }
        }
        if self.free_head.is_none() {
            let _ = slot_index(self.slots.len())?;
            self.slots.try_reserve(1)?;
        }

        let entry = match params {
            ContentParams::Text { text, handle } => {
                let resolved = resolve(&text)?;
                Entry {
                    content: Content::Text {
                        source: text,
                        text: resolved,
                    },
                    style: styles.current().clone(),
                    handle,
                }
            }
            ContentParams::Float { style, handle } => Entry {
                content: Content::Float,
                style: style.clone(),
                handle,
            },
            ContentParams::Replaced {
                width,
                height,
                style,
                handle,
            } => Entry {
                content: Content::Replaced { width, height },
                style: style.clone(),
                handle,
            },
            ContentParams::InlineStart { style, handle } => {
                styles.push(style)?;
                Entry {
                    content: Content::InlineStart,
                    style: style.clone(),
                    handle,
                }
            }
            ContentParams::InlineEnd { handle } => {
                let Some(popped) = styles.pop() else {
                    return Err(ParagraphError::BadParam(
                        "inline end without an open inline start",
                    ));
                };
                let style = popped.clone();
                drop(popped);
                Entry {
                    content: Content::InlineEnd,
                    style,
                    handle,
                }
            }
        };

        let text_len = entry.content.text_len();
        let index = self.allocate(entry)?;
        self.link(index, at);
        self.count += 1;
        self.text_len += text_len;
        self.touch();
        Ok(self.id_at(index))
    }

    /// Remove an entry, releasing its style reference.
    ///
    /// Removing inline markers does not touch the style stack, which only
    /// reflects the insertion point.
    ///
    /// # Errors
    ///
    /// Returns [`ParagraphError::BadParam`] if `id` is not live.
    pub fn remove(&mut self, id: ContentId) -> Result<()> {
        let Some(node) = self.node(id) else {
            return Err(ParagraphError::BadParam("stale content handle"));
        };
        let (prev, next) = (node.prev, node.next);
        self.set_next(prev, next);
        self.set_prev(next, prev);

        let slot = Slot::Vacant {
            generation: id.generation.wrapping_add(1),
            next_free: self.free_head,
        };
        let old = std::mem::replace(&mut self.slots[id.index as usize], slot);
        self.free_head = Some(id.index);
        if let Slot::Occupied { node, .. } = old {
            self.count -= 1;
            self.text_len -= node.entry.content.text_len();
        }
        self.touch();
        Ok(())
    }

    /// Remove every entry, releasing all their style references. Handles to
    /// removed entries stay detectably stale.
    pub fn clear(&mut self) {
        let mut free_head = None;
        for (index, slot) in self.slots.iter_mut().enumerate().rev() {
            let generation = match slot {
                Slot::Occupied { generation, .. } => generation.wrapping_add(1),
                Slot::Vacant { generation, .. } => *generation,
            };
            *slot = Slot::Vacant {
                generation,
                next_free: free_head,
            };
            free_head = u32::try_from(index).ok();
        }
        self.free_head = free_head;
        self.first = None;
        self.last = None;
        self.count = 0;
        self.text_len = 0;
        self.touch();
    }

    /// Concatenated text of every text run in sequence order, rebuilt if any
    /// mutation happened since the last call.
    ///
    /// # Errors
    ///
    /// Returns [`ParagraphError::OutOfMemory`] if the buffer cannot be
    /// allocated; the previous cache is then left marked stale.
    pub fn aggregate_text(&mut self) -> Result<&str> {
        if self.dirty {
            let mut text = String::new();
            text.try_reserve_exact(self.text_len)?;
            let mut cursor = self.first;
            while let Some(index) = cursor {
                let Some(node) = self.slots.get_mut(index as usize).and_then(Slot::node_mut)
                else {
                    break;
                };
                node.text_start = text.len();
                if let Some(run) = node.entry.content.text() {
                    text.push_str(run);
                }
                cursor = node.next;
            }
            self.aggregate = text;
            self.dirty = false;
        }
        Ok(&self.aggregate)
    }

    /// The aggregate text if it is up to date.
    #[must_use]
    pub fn cached_text(&self) -> Option<&str> {
        (!self.dirty).then_some(self.aggregate.as_str())
    }

    /// Byte range of a text run inside the aggregate text.
    ///
    /// `None` for non-text entries, stale handles, or while the aggregate is
    /// out of date.
    #[must_use]
    pub fn text_range(&self, id: ContentId) -> Option<Range<usize>> {
        if self.dirty {
            return None;
        }
        let node = self.node(id)?;
        let len = node.entry.content.text()?.len();
        Some(node.text_start..node.text_start + len)
    }

    fn node(&self, id: ContentId) -> Option<&Node<S, T, H>> {
        let slot = self.slots.get(id.index as usize)?;
        if slot.generation() != id.generation {
            return None;
        }
        slot.node()
    }

    fn node_at_mut(&mut self, index: u32) -> Option<&mut Node<S, T, H>> {
        self.slots.get_mut(index as usize).and_then(Slot::node_mut)
    }

    fn id_at(&self, index: u32) -> ContentId {
        let generation = self
            .slots
            .get(index as usize)
            .map_or(0, Slot::generation);
        ContentId { index, generation }
    }

    fn allocate(&mut self, entry: Entry<S, T, H>) -> Result<u32> {
        let node = Node {
            entry,
            prev: None,
            next: None,
            text_start: 0,
        };
        if let Some(index) = self.free_head {
            let slot = &mut self.slots[index as usize];
            let (generation, next_free) = match slot {
                Slot::Vacant {
                    generation,
                    next_free,
                } => (*generation, *next_free),
                Slot::Occupied { generation, .. } => (*generation, None),
            };
            *slot = Slot::Occupied { generation, node };
            self.free_head = next_free;
            Ok(index)
        } else {
            let index = slot_index(self.slots.len())?;
            self.slots.push(Slot::Occupied {
                generation: 0,
                node,
            });
            Ok(index)
        }
    }

    fn link(&mut self, index: u32, at: InsertAt) {
        let (prev, next) = match at {
            InsertAt::End => (self.last, None),
            InsertAt::Before(anchor) => {
                (self.node(anchor).and_then(|n| n.prev), Some(anchor.index))
            }
            InsertAt::After(anchor) => {
                (Some(anchor.index), self.node(anchor).and_then(|n| n.next))
            }
        };
        if let Some(node) = self.node_at_mut(index) {
            node.prev = prev;
            node.next = next;
        }
        self.set_next(prev, Some(index));
        self.set_prev(next, Some(index));
    }

    /// Point `at`'s forward link (or `first` when `at` is `None`) to `to`.
    fn set_next(&mut self, at: Option<u32>, to: Option<u32>) {
        match at {
            Some(index) => {
                if let Some(node) = self.node_at_mut(index) {
                    node.next = to;
                }
            }
            None => self.first = to,
        }
    }

    /// Point `at`'s backward link (or `last` when `at` is `None`) to `to`.
    fn set_prev(&mut self, at: Option<u32>, to: Option<u32>) {
        match at {
            Some(index) => {
                if let Some(node) = self.node_at_mut(index) {
                    node.prev = to;
                }
            }
            None => self.last = to,
        }
    }

    fn touch(&mut self) {
        self.dirty = true;
        self.revision = self.revision.wrapping_add(1);
    }
}

/// Index of a fresh slot appended at `len`. Handles carry `u32` indices, so
/// running out of them is reported as exhaustion.
fn slot_index(len: usize) -> Result<u32> {
    u32::try_from(len).map_err(|_| ParagraphError::OutOfMemory)
}

/// Iterator over entries in sequence order.
#[derive(Debug)]
pub struct Iter<'a, S, T, H> {
    model: &'a ContentModel<S, T, H>,
    cursor: Option<u32>,
}

impl<'a, S, T, H> Iterator for Iter<'a, S, T, H> {
    type Item = (ContentId, &'a Entry<S, T, H>);

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.cursor?;
        let slot = self.model.slots.get(index as usize)?;
        let node = slot.node()?;
        self.cursor = node.next;
        Some((
            ContentId {
                index,
                generation: slot.generation(),
            },
            &node.entry,
        ))
    }
}

impl<'a, S, T, H> IntoIterator for &'a ContentModel<S, T, H> {
    type Item = (ContentId, &'a Entry<S, T, H>);
    type IntoIter = Iter<'a, S, T, H>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Model = ContentModel<&'static str, &'static str, u32>;

    fn resolve(text: &&'static str) -> Result<String> {
        Ok((*text).to_string())
    }

    fn add_text(
        model: &mut Model,
        styles: &mut StyleStack<&'static str>,
        text: &'static str,
        at: InsertAt,
    ) -> ContentId {
        model
            .insert(styles, ContentParams::Text { text, handle: 0 }, at, resolve)
            .unwrap()
    }

    #[test]
    fn test_slot_indices_stop_at_u32_range() {
        let last = usize::try_from(u32::MAX).unwrap();
        assert_eq!(slot_index(last), Ok(u32::MAX));
        if let Some(beyond) = last.checked_add(1) {
            assert_eq!(slot_index(beyond), Err(ParagraphError::OutOfMemory));
        }
    }

    #[test]
    fn test_vacated_slot_is_reused_with_new_generation() {
        let mut styles = StyleStack::new(&"body");
        let mut model = Model::new();
        let a = add_text(&mut model, &mut styles, "a", InsertAt::End);
        model.remove(a).unwrap();
        let b = add_text(&mut model, &mut styles, "b", InsertAt::End);
        assert_eq!(a.index(), b.index());
        assert_ne!(a, b);
        assert!(model.get(a).is_none());
        assert_eq!(model.get(b).and_then(Entry::text), Some("b"));
    }

    #[test]
    fn test_text_range_requires_fresh_aggregate() {
        let mut styles = StyleStack::new(&"body");
        let mut model = Model::new();
        let _ = add_text(&mut model, &mut styles, "ab", InsertAt::End);
        let c = add_text(&mut model, &mut styles, "cde", InsertAt::End);
        assert_eq!(model.text_range(c), None);
        assert_eq!(model.aggregate_text().unwrap(), "abcde");
        assert_eq!(model.text_range(c), Some(2..5));
    }

    #[test]
    fn test_clear_invalidates_every_handle() {
        let mut styles = StyleStack::new(&"body");
        let mut model = Model::new();
        let a = add_text(&mut model, &mut styles, "a", InsertAt::End);
        let b = add_text(&mut model, &mut styles, "b", InsertAt::End);
        model.clear();
        assert!(model.is_empty());
        assert!(!model.contains(a));
        assert!(!model.contains(b));
        assert_eq!(model.aggregate_text().unwrap(), "");
        let c = add_text(&mut model, &mut styles, "c", InsertAt::End);
        assert_ne!(c, a);
        assert_ne!(c, b);
    }
}
