//! Per-call layout context and per-node results
//!
//! A [`LayoutContext`] is transient and stack-allocated for one `calculate`
//! call; strategies rebuild the reference dimensions per recursion level
//! (children resolve against their parent's content box). A
//! [`LayoutResult`] is written for every visited node, in pre-order; the
//! only link back to the element is positional correspondence with that
//! traversal.

use crate::geometry::{DisplayTransform, Rect};

/// Inputs for one layout calculation.
#[derive(Debug, Clone, Copy)]
pub struct LayoutContext<'a> {
    /// Area the root of the call is placed within (resolved pixels).
    pub available: Rect,
    /// Panel mounting orientation; when set, computed rectangles are mapped
    /// into display coordinates as the final step of the calculation.
    pub transform: Option<&'a DisplayTransform>,
    /// Uniform multiplier applied to resolved pixel rectangles.
    pub scale_factor: f32,
    /// Reference width for resolving the root's fractional bounds.
    pub reference_width: f32,
    /// Reference height for resolving the root's fractional bounds.
    pub reference_height: f32,
}

impl<'a> LayoutContext<'a> {
    /// Context filling `available`, with the reference dimensions taken from
    /// it, scale 1.0, and no display transform.
    pub fn new(available: Rect) -> Self {
        Self {
            available,
            transform: None,
            scale_factor: 1.0,
            reference_width: available.width,
            reference_height: available.height,
        }
    }

    pub fn with_transform(mut self, transform: &'a DisplayTransform) -> Self {
        self.transform = Some(transform);
        self
    }

    pub fn with_scale_factor(mut self, scale_factor: f32) -> Self {
        self.scale_factor = scale_factor;
        self
    }

    pub fn with_reference(mut self, width: f32, height: f32) -> Self {
        self.reference_width = width;
        self.reference_height = height;
        self
    }
}

/// Computed geometry for one visited element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutResult {
    /// Resolved rectangle, absolute pixels.
    pub rect: Rect,
    /// Whether the element should be drawn (`!hidden`).
    pub visible: bool,
    /// Whether the element overflowed its clip bounds.
    pub clipped: bool,
}

impl Default for LayoutResult {
    fn default() -> Self {
        Self {
            rect: Rect::ZERO,
            visible: true,
            clipped: false,
        }
    }
}

/// Map finished results into display coordinates when the context carries a
/// transform. Shared tail step of both strategies.
pub(crate) fn finish_results(context: &LayoutContext<'_>, results: &mut [LayoutResult]) {
    if let Some(transform) = context.transform {
        for result in results {
            result.rect = transform.to_display(
                result.rect,
                context.available.width,
                context.available.height,
            );
        }
    }
}
