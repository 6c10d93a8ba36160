//! Relative anchors: `"<element>-<viewport>"` expressions resolved to scroll offsets.
//!
//! `"top-bottom"` reads "the scroll offset at which the element's top meets the
//! viewport's bottom". Resolution depends on the element box and viewport height
//! at the time of the call, so results are cached per instance and recomputed on
//! resize rather than every frame.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Element box as reported by the host, in viewport coordinates.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub top: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(top: f64, height: f64) -> Self {
        Self { top, height }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Anchor {
    Top,
    Middle,
    Bottom,
}

impl Anchor {
    /// Offset of this anchor from the top of a span of `extent` pixels.
    #[inline]
    pub fn offset(self, extent: f64) -> f64 {
        match self {
            Anchor::Top => 0.0,
            Anchor::Middle => extent / 2.0,
            Anchor::Bottom => extent,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Anchor::Top => "top",
            Anchor::Middle => "middle",
            Anchor::Bottom => "bottom",
        }
    }
}

impl FromStr for Anchor {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "top" => Ok(Anchor::Top),
            "middle" => Ok(Anchor::Middle),
            "bottom" => Ok(Anchor::Bottom),
            _ => Err(()),
        }
    }
}

/// Parsed `"<element>-<viewport>"` expression.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct AnchorExpr {
    pub element: Anchor,
    pub viewport: Anchor,
}

impl AnchorExpr {
    pub fn new(element: Anchor, viewport: Anchor) -> Self {
        Self { element, viewport }
    }

    /// Parse `"top-bottom"` style text. Returns `None` for anything else.
    pub fn parse(expr: &str) -> Option<Self> {
        let (element, viewport) = expr.split_once('-')?;
        Some(Self {
            element: element.parse().ok()?,
            viewport: viewport.parse().ok()?,
        })
    }

    /// Scroll offset (document pixels) at which both anchors coincide.
    pub fn resolve(self, elem_box: Rect, scroll_top: f64, viewport_height: f64) -> f64 {
        let elem_y = elem_box.top + scroll_top + self.element.offset(elem_box.height);
        elem_y - self.viewport.offset(viewport_height)
    }
}

impl fmt::Display for AnchorExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.element.name(), self.viewport.name())
    }
}
