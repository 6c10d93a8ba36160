//! Host environment contract.
//!
//! The core never touches a document. Adapters (wasm/DOM, tests) implement
//! [`Host`] to supply scroll position, viewport height, element geometry and
//! to receive style writes.

use crate::anchor::Rect;

/// Where a computed property is written.
#[derive(Clone, Debug, PartialEq)]
pub enum StyleSink<'a, E> {
    Element(&'a E),
    /// The document root element (`<html>`).
    Root,
}

pub trait Host {
    /// Opaque element reference (a DOM node in the browser).
    type Element: Clone;

    /// Pixels scrolled in the scrolling root.
    fn scroll_top(&self) -> f64;

    /// Height of the visible viewport.
    fn viewport_height(&self) -> f64;

    /// Bounding box of `elem` relative to the viewport, or `None` when the
    /// element is not attached to the document.
    fn bounding_rect(&self, elem: &Self::Element) -> Option<Rect>;

    /// Write one inline style property.
    fn set_property(&mut self, sink: StyleSink<'_, Self::Element>, key: &str, value: &str);
}
