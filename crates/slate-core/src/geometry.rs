//! Geometry primitives for the layout engine
//!
//! The central type is [`Rect`], a floating rectangle whose fields carry
//! overloaded units: a value in `[0, 1]` is a fraction of the matching
//! reference dimension, a value above `1` is absolute pixels. The overload is
//! resolved at the point of use with [`Rect::to_pixels`], never stored
//! pre-resolved, so the same authored rectangle can be reinterpreted against
//! different parents.
//!
//! [`DisplayTransform`] describes how the physical panel is mounted relative
//! to the logical coordinate space the UI lays out in. The mapping is fixed
//! for the lifetime of the device and comes from panel configuration.

use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use serde::{Deserialize, Serialize};

/// Round a pixel coordinate to the nearest integer.
///
/// `f32::round` is not available in `core`; this is the cast-based
/// equivalent used throughout the crate.
pub(crate) fn round_px(value: f32) -> i32 {
    if value >= 0.0 {
        (value + 0.5) as i32
    } else {
        (value - 0.5) as i32
    }
}

// ============================================================================
// Rect
// ============================================================================

/// A rectangle with overloaded relative/absolute units.
///
/// Each field independently means either a fraction of the corresponding
/// reference dimension (when in `[0, 1]`) or an absolute pixel count (when
/// above `1`). See [`Rect::to_pixels`] for the resolution rules.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    /// The zero rectangle.
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        width: 0.0,
        height: 0.0,
    };

    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge (`x + width`).
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge (`y + height`).
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Half-open containment test.
    ///
    /// A point on the left or top edge is inside; a point on the right or
    /// bottom edge is outside.
    pub fn contains_point(&self, x: f32, y: f32) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }

    /// Overlap of two rectangles, or `None` when they do not intersect.
    ///
    /// Touching edges (zero-area overlap) count as no intersection.
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let left = self.x.max(other.x);
        let top = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if left >= right || top >= bottom {
            return None;
        }

        Some(Rect::new(left, top, right - left, bottom - top))
    }

    /// Resolve the relative/absolute overload against reference dimensions.
    ///
    /// Position fields at or below `1.0` scale by the matching reference
    /// dimension; larger values pass through as pixels. Width and height
    /// additionally require a strictly positive value for the relative
    /// branch, so a literal zero size stays zero instead of scaling.
    pub fn to_pixels(&self, reference_width: f32, reference_height: f32) -> Rect {
        let x = if self.x <= 1.0 {
            self.x * reference_width
        } else {
            self.x
        };
        let y = if self.y <= 1.0 {
            self.y * reference_height
        } else {
            self.y
        };
        let width = if self.width > 0.0 && self.width <= 1.0 {
            self.width * reference_width
        } else {
            self.width
        };
        let height = if self.height > 0.0 && self.height <= 1.0 {
            self.height * reference_height
        } else {
            self.height
        };

        Rect::new(x, y, width, height)
    }

    /// Translate by an offset.
    pub fn offset(&self, dx: f32, dy: f32) -> Rect {
        Rect::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Uniformly scale all four fields.
    pub fn scaled(&self, factor: f32) -> Rect {
        Rect::new(
            self.x * factor,
            self.y * factor,
            self.width * factor,
            self.height * factor,
        )
    }

    /// Convert to an embedded-graphics `Rectangle`, rounding to the nearest
    /// pixel. Negative sizes clamp to zero.
    pub fn to_rectangle(&self) -> Rectangle {
        Rectangle::new(
            Point::new(round_px(self.x), round_px(self.y)),
            Size::new(
                round_px(self.width).max(0) as u32,
                round_px(self.height).max(0) as u32,
            ),
        )
    }

    /// Convert from an embedded-graphics `Rectangle`.
    pub fn from_rectangle(rectangle: Rectangle) -> Rect {
        Rect::new(
            rectangle.top_left.x as f32,
            rectangle.top_left.y as f32,
            rectangle.size.width as f32,
            rectangle.size.height as f32,
        )
    }
}

// ============================================================================
// Display transform
// ============================================================================

/// Panel rotation in quarter turns.
///
/// Variant naming follows the display driver's orientation options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

/// Fixed mounting orientation of the physical panel.
///
/// Maps between the logical coordinate space the UI lays out in and the
/// panel's native pixel coordinates. Rotation is applied before mirroring in
/// the forward direction ([`to_display`](Self::to_display)); the inverse
/// undoes mirroring first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DisplayTransform {
    pub rotation: Rotation,
    pub flip_horizontal: bool,
    pub flip_vertical: bool,
}

impl DisplayTransform {
    /// No rotation, no mirroring.
    pub const IDENTITY: Self = Self {
        rotation: Rotation::Deg0,
        flip_horizontal: false,
        flip_vertical: false,
    };

    pub const fn new(rotation: Rotation, flip_horizontal: bool, flip_vertical: bool) -> Self {
        Self {
            rotation,
            flip_horizontal,
            flip_vertical,
        }
    }

    /// Map a logical rectangle into panel coordinates.
    ///
    /// Rotation first, then horizontal/vertical mirroring.
    pub fn to_display(&self, rect: Rect, display_width: f32, display_height: f32) -> Rect {
        let mut out = match self.rotation {
            Rotation::Deg0 => rect,
            Rotation::Deg90 => Rect::new(
                display_height - rect.y - rect.height,
                rect.x,
                rect.height,
                rect.width,
            ),
            Rotation::Deg180 => Rect::new(
                display_width - rect.x - rect.width,
                display_height - rect.y - rect.height,
                rect.width,
                rect.height,
            ),
            Rotation::Deg270 => Rect::new(
                rect.y,
                display_width - rect.x - rect.width,
                rect.height,
                rect.width,
            ),
        };

        if self.flip_horizontal {
            out.x = display_width - out.x - out.width;
        }
        if self.flip_vertical {
            out.y = display_height - out.y - out.height;
        }

        out
    }

    /// Map a panel-coordinate rectangle back into logical coordinates.
    ///
    /// Exact inverse of [`to_display`](Self::to_display): mirroring is undone
    /// first, then the rotation.
    pub fn from_display(&self, rect: Rect, display_width: f32, display_height: f32) -> Rect {
        let mut out = rect;

        if self.flip_horizontal {
            out.x = display_width - out.x - out.width;
        }
        if self.flip_vertical {
            out.y = display_height - out.y - out.height;
        }

        match self.rotation {
            Rotation::Deg0 => out,
            Rotation::Deg90 => Rect::new(
                out.y,
                display_height - out.x - out.width,
                out.height,
                out.width,
            ),
            Rotation::Deg180 => Rect::new(
                display_width - out.x - out.width,
                display_height - out.y - out.height,
                out.width,
                out.height,
            ),
            Rotation::Deg270 => Rect::new(
                display_width - out.y - out.height,
                out.x,
                out.height,
                out.width,
            ),
        }
    }
}
