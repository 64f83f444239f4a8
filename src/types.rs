//! # Types Module
//!
//! Shared data types used across the engine.
//!
//! ## Key Types
//! - `Color`: Float-based RGBA color with Skia conversion.
//! - `Palette`: The stage colors of the landing page.

use serde::{Deserialize, Serialize};
use skia_safe::Color4f;

/// Represents a RGBA color in float format (0.0 - 1.0).
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Same color with alpha multiplied by `opacity` (clamped to 0..1).
    pub fn with_opacity(&self, opacity: f32) -> Self {
        Self {
            a: self.a * opacity.clamp(0.0, 1.0),
            ..*self
        }
    }

    /// Converts to Skia's `Color` struct (u8 based), rounding each channel.
    pub fn to_skia(&self) -> skia_safe::Color {
        fn channel(v: f32) -> u8 {
            (v.clamp(0.0, 1.0) * 255.0).round() as u8
        }
        skia_safe::Color::from_argb(
            channel(self.a),
            channel(self.r),
            channel(self.g),
            channel(self.b),
        )
    }

    /// Converts to Skia's `Color4f` struct (float based).
    pub fn to_color4f(&self) -> Color4f {
        Color4f::new(self.r, self.g, self.b, self.a)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

/// Colors of the sticky "cell" stage.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    /// Deep-ocean page background.
    pub background: Color,
    /// Fill of the cell core.
    pub core: Color,
    /// Soft cyan halo behind the core.
    pub bloom: Color,
    /// Satellite cells that appear late in the scroll.
    pub cluster: Color,
    /// Beat copy.
    pub text: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: Color::rgb(0.012, 0.043, 0.086),
            core: Color::rgb(0.16, 0.75, 0.69),
            bloom: Color::rgb(0.33, 0.93, 1.0),
            cluster: Color::rgb(0.58, 0.98, 0.88),
            text: Color::rgb(0.92, 0.96, 0.98),
        }
    }
}
