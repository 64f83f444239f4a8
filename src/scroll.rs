//! # Scroll Module
//!
//! Turns a raw vertical scroll offset into normalized progress through a tracked region.
//!
//! ## Key Types
//! - `ScrollProgress`: A scalar clamped to `[0, 1]`.
//! - `ScrollOffset`: Which edge of the region meets which edge of the viewport.
//! - `ScrollTracker`: Maps scroll offsets to progress for one region.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Normalized traversal of a tracked region, always within `[0, 1]`.
#[derive(Copy, Clone, Debug, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct ScrollProgress(f64);

impl ScrollProgress {
    pub const START: ScrollProgress = ScrollProgress(0.0);
    pub const END: ScrollProgress = ScrollProgress(1.0);

    /// Clamps `value` into `[0, 1]`; NaN becomes 0.
    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            return Self::START;
        }
        Self(value.clamp(0.0, 1.0))
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl From<f64> for ScrollProgress {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl From<ScrollProgress> for f64 {
    fn from(p: ScrollProgress) -> Self {
        p.0
    }
}

impl fmt::Display for ScrollProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}", self.0)
    }
}

/// A point along an element, as a fraction of its height.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Edge {
    Start,
    Center,
    End,
}

impl Edge {
    fn fraction(self) -> f64 {
        match self {
            Edge::Start => 0.0,
            Edge::Center => 0.5,
            Edge::End => 1.0,
        }
    }
}

/// "`region` edge meets `viewport` edge".
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScrollOffset {
    pub region: Edge,
    pub viewport: Edge,
}

impl ScrollOffset {
    pub const fn new(region: Edge, viewport: Edge) -> Self {
        Self { region, viewport }
    }
}

/// The vertical extent of the tracked region in document coordinates.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub top: f64,
    pub height: f64,
}

/// Maps document scroll offsets to progress through one region.
///
/// Progress is 0 when the `start` offset is met and 1 when the `end` offset is
/// met. The landing page tracks its sticky section from "start start" (region top
/// at viewport top) to "end end" (region bottom at viewport bottom).
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScrollTracker {
    pub region: Region,
    pub viewport_height: f64,
    pub start: ScrollOffset,
    pub end: ScrollOffset,
}

impl ScrollTracker {
    pub fn new(region: Region, viewport_height: f64) -> Self {
        Self {
            region,
            viewport_height,
            start: ScrollOffset::new(Edge::Start, Edge::Start),
            end: ScrollOffset::new(Edge::End, Edge::End),
        }
    }

    pub fn with_offsets(mut self, start: ScrollOffset, end: ScrollOffset) -> Self {
        self.start = start;
        self.end = end;
        self
    }

    /// Scroll offset at which `offset` is met.
    fn threshold(&self, offset: ScrollOffset) -> f64 {
        self.region.top + offset.region.fraction() * self.region.height
            - offset.viewport.fraction() * self.viewport_height
    }

    /// Scroll range `(start, end)` that maps onto `[0, 1]`.
    pub fn range(&self) -> (f64, f64) {
        (self.threshold(self.start), self.threshold(self.end))
    }

    /// Progress for the viewport scrolled to `scroll_y`.
    ///
    /// When the range is empty or inverted (region no taller than the viewport
    /// for "start start"/"end end") progress jumps from 0 to 1 at the end threshold.
    pub fn progress(&self, scroll_y: f64) -> ScrollProgress {
        let (start, end) = self.range();
        let length = end - start;
        if length <= 0.0 {
            return if scroll_y >= end {
                ScrollProgress::END
            } else {
                ScrollProgress::START
            };
        }
        ScrollProgress::new((scroll_y - start) / length)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_clamps_and_drops_nan() {
        assert_eq!(ScrollProgress::new(1.7).value(), 1.0);
        assert_eq!(ScrollProgress::new(-0.2).value(), 0.0);
        assert_eq!(ScrollProgress::new(f64::NAN).value(), 0.0);
    }

    #[test]
    fn center_offsets_shift_the_range() {
        let tracker = ScrollTracker::new(Region { top: 1000.0, height: 400.0 }, 800.0)
            .with_offsets(
                ScrollOffset::new(Edge::Start, Edge::Center),
                ScrollOffset::new(Edge::End, Edge::Center),
            );
        assert_eq!(tracker.range(), (600.0, 1000.0));
        assert!((tracker.progress(800.0).value() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn serde_goes_through_plain_number() {
        let p: ScrollProgress = serde_json::from_str("1.5").unwrap();
        assert_eq!(p, ScrollProgress::END);
        assert_eq!(serde_json::to_string(&ScrollProgress::new(0.25)).unwrap(), "0.25");
    }
}
