//! Drawing surface contract
//!
//! Effects never talk to a concrete 2D API. They build a `Path`, pick a
//! `Paint` and hand both to a `Canvas`. The browser host maps this onto
//! `CanvasRenderingContext2d`; tests use `RecordingCanvas`.

pub mod path;
pub mod recording;

pub use path::{Path, PathCommand};
pub use recording::{DrawCommand, RecordingCanvas};

use glam::Vec2;

use crate::error::{EffectError, Result};

/// Surface dimensions, read once when an effect starts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Surface {
    pub width: u32,
    pub height: u32,
}

impl Surface {
    /// Validated surface; both dimensions must be positive
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(EffectError::InvalidSurface { width, height });
        }
        Ok(Self { width, height })
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width as f32 / 2.0, self.height as f32 / 2.0)
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }
}

/// RGBA colour, 8-bit channels plus float alpha (CSS style)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    /// Opaque colour from `0xRRGGBB`
    pub const fn rgb(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xff) as u8,
            g: ((hex >> 8) & 0xff) as u8,
            b: (hex & 0xff) as u8,
            a: 1.0,
        }
    }

    pub const fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// CSS colour string (`#rrggbb` when opaque, `rgba(...)` otherwise)
    pub fn to_css(&self) -> String {
        if self.a >= 1.0 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("rgba({},{},{},{})", self.r, self.g, self.b, self.a.max(0.0))
        }
    }
}

/// One stop of a gradient, `offset` in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorStop {
    pub offset: f32,
    pub color: Rgba,
}

/// Two-circle radial gradient (same model as the 2D canvas API)
#[derive(Debug, Clone, PartialEq)]
pub struct RadialGradient {
    pub inner_center: Vec2,
    pub inner_radius: f32,
    pub outer_center: Vec2,
    pub outer_radius: f32,
    pub stops: Vec<ColorStop>,
}

impl RadialGradient {
    /// Concentric gradient between two radii
    pub fn concentric(center: Vec2, inner_radius: f32, outer_radius: f32) -> Self {
        Self {
            inner_center: center,
            inner_radius,
            outer_center: center,
            outer_radius,
            stops: Vec::new(),
        }
    }

    pub fn stop(mut self, offset: f32, color: Rgba) -> Self {
        self.stops.push(ColorStop { offset, color });
        self
    }
}

/// Fill style
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Solid(Rgba),
    Radial(RadialGradient),
}

/// Minimal 2D drawing API consumed by the effects
pub trait Canvas {
    /// Surface width in pixels
    fn width(&self) -> u32;
    /// Surface height in pixels
    fn height(&self) -> u32;

    /// Clear a rectangle to transparent
    fn clear_rect(&mut self, x: f32, y: f32, width: f32, height: f32);

    /// Fill a closed path
    fn fill_path(&mut self, path: &Path, paint: &Paint);

    /// Fill a full circle (arc from 0 to 2π)
    fn fill_circle(&mut self, center: Vec2, radius: f32, paint: &Paint);

    /// Clear the whole surface
    fn clear(&mut self) {
        let (w, h) = (self.width() as f32, self.height() as f32);
        self.clear_rect(0.0, 0.0, w, h);
    }

    /// Surface snapshot with validated dimensions
    fn surface(&self) -> Result<Surface> {
        Surface::new(self.width(), self.height())
    }
}
