//! Depth/perspective layers: parallax translation driven by an instance's progress.
//!
//! A layer turns progress into a target vertical offset (rem) scaled by its
//! depth, then eases its drawn offset toward that target once per frame.

use serde::Serialize;

use crate::value::{format_number, round_to};

/// Full-range travel in rem before the `1 / (depth * 3)` scale.
const TRAVEL_REM: f64 = 65.0;
/// Per-frame easing weights of the drawn and the target offset.
const EASE_KEEP: f64 = 0.9;
const EASE_TAKE: f64 = 0.1;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DepthLayer {
    depth: u32,
    translate_y: f64,
    target_translate_y: f64,
    last_drawn: Option<f64>,
    progress_set: bool,
    drawn: bool,
}

impl DepthLayer {
    /// `depth` below 1 is treated as 1.
    pub fn new(depth: u32) -> Self {
        Self {
            depth: depth.max(1),
            translate_y: 0.0,
            target_translate_y: 0.0,
            last_drawn: None,
            progress_set: false,
            drawn: false,
        }
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn translate_y(&self) -> f64 {
        self.translate_y
    }

    pub fn target_translate_y(&self) -> f64 {
        self.target_translate_y
    }

    /// Set the target from a progress percentage (clamped to `[0, 100]`).
    ///
    /// In `compact` mode every layer uses depth 2 centred on 100%, and only
    /// depth-1 layers move at all.
    pub fn set_target_from_progress(&mut self, progress: f64, compact: bool) {
        self.progress_set = true;
        if compact && self.depth != 1 {
            self.target_translate_y = 0.0;
            return;
        }
        let progress = progress.clamp(0.0, 100.0);
        let (depth, center) = if compact {
            (2.0, 100.0)
        } else {
            (f64::from(self.depth), 50.0)
        };
        self.target_translate_y = round_to(
            TRAVEL_REM * ((center - progress) / 100.0) * (1.0 / (depth * 3.0)),
            2,
        );
    }

    /// Step one frame. Returns the transform to write, or `None` when the drawn
    /// offset did not change.
    pub fn advance(&mut self) -> Option<String> {
        self.translate_y = if self.drawn {
            round_to(
                EASE_KEEP * self.translate_y + EASE_TAKE * self.target_translate_y,
                2,
            )
        } else {
            self.target_translate_y
        };

        if self.last_drawn == Some(self.translate_y) {
            return None;
        }
        self.last_drawn = Some(self.translate_y);
        if self.progress_set {
            self.drawn = true;
        }
        Some(self.transform())
    }

    /// CSS transform for the current offset.
    pub fn transform(&self) -> String {
        format!("translate3d(0, {}rem, 0)", format_number(self.translate_y))
    }
}
