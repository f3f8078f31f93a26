#![forbid(unsafe_code)]

//! Canonical input events delivered by the host page.
//!
//! The host translates DOM `mousemove`, `mouseover`, `mousedown`, `touch*`,
//! `resize` and `scroll` events into these types before pushing them into a
//! view. Coordinates are client (viewport) pixels.
//!
//! - Coordinate-free events (`TouchEnd`, `Up`) never move the pointer.
//! - A touch move with an empty touch list carries no coordinate and is
//!   dropped by consumers.

use crate::geometry::{Point, Viewport};

/// A pointer or touch event.
#[derive(Debug, Clone, PartialEq)]
pub enum PointerEvent {
    /// Mouse moved to client coordinates.
    Move { x: f32, y: f32 },
    /// Touch moved; the first touch is the pointer.
    TouchMove { touches: Vec<Point> },
    /// Mouse button pressed.
    Down,
    /// Mouse button released.
    Up,
    /// Finger touched the screen.
    TouchStart,
    /// Finger lifted. Carries no coordinate.
    TouchEnd,
    /// The pointer entered a new element.
    Over { target: HoverPath },
}

impl PointerEvent {
    /// Convenience constructor for a mouse move.
    #[must_use]
    pub const fn moved(x: f32, y: f32) -> Self {
        Self::Move { x, y }
    }

    /// The coordinate carried by this event, if any.
    ///
    /// Non-finite coordinates are treated as missing.
    #[must_use]
    pub fn position(&self) -> Option<Point> {
        let p = match self {
            Self::Move { x, y } => Point::new(*x, *y),
            Self::TouchMove { touches } => *touches.first()?,
            _ => return None,
        };
        p.is_finite().then_some(p)
    }
}

/// One element on the path from the hovered element up to the document root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoverNode {
    /// Lower-case tag name (`a`, `button`, `div`, …).
    pub tag: String,
    /// Class list.
    pub classes: Vec<String>,
}

impl HoverNode {
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into().to_ascii_lowercase(),
            classes: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

/// Marker class that opts an arbitrary element into interactive hover.
pub const HOVER_CLASS: &str = "cursor-hover";

/// The hovered element followed by its ancestors (leaf first).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HoverPath {
    nodes: Vec<HoverNode>,
}

impl HoverPath {
    /// Build from leaf-first nodes.
    #[must_use]
    pub fn new(nodes: Vec<HoverNode>) -> Self {
        Self { nodes }
    }

    /// A single-element path.
    #[must_use]
    pub fn leaf(node: HoverNode) -> Self {
        Self { nodes: vec![node] }
    }

    pub fn nodes(&self) -> &[HoverNode] {
        &self.nodes
    }

    /// True when the leaf is, or is contained by, a clickable element.
    ///
    /// Links, buttons and anything carrying [`HOVER_CLASS`] count at any
    /// depth; `input` only counts as the leaf itself.
    pub fn is_interactive(&self) -> bool {
        let leaf_is_input = self.nodes.first().is_some_and(|n| n.tag == "input");
        leaf_is_input
            || self
                .nodes
                .iter()
                .any(|n| n.tag == "a" || n.tag == "button" || n.has_class(HOVER_CLASS))
    }
}

/// Everything the host can push into a mounted view.
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    Pointer(PointerEvent),
    /// The window was resized.
    Resize(Viewport),
    /// The document scrolled.
    Scroll { scroll_y: f32, document_height: f32 },
}

impl From<PointerEvent> for HostEvent {
    fn from(event: PointerEvent) -> Self {
        Self::Pointer(event)
    }
}
