//! Inline content storage for the paragraph engine.
//!
//! A paragraph is built from a flat sequence of inline-level content: text
//! runs, floated boxes, replaced boxes and markers bracketing nested inline
//! elements. This crate stores that sequence and the stack of styles open at
//! the insertion point.
//!
//! # Design
//!
//! - [`ContentModel`] is a slot arena with intrusive links, so entries can be
//!   spliced anywhere in O(1) and [`ContentId`] handles stay valid across
//!   unrelated edits.
//! - [`StyleStack`] keeps shallow nesting in inline storage.
//! - Styles are client-owned. Storing one clones it, discarding one drops
//!   it; a reference-counted style type observes exactly one reference per
//!   stored copy.

pub mod kind;
pub mod model;
pub mod style;

pub use kind::ContentKind;
pub use model::{Content, ContentId, ContentModel, ContentParams, Entry, InsertAt, Iter};
pub use style::{INLINE_FRAMES, StyleStack};
