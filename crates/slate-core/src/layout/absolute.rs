//! Absolute-positioning strategy
//!
//! Places every node at its stored bounds (fractional or pixel), resolved
//! against the parent's content box and offset by the parent's content
//! origin. Padding from the call's spec is applied at each recursion level.
//!
//! Overflow clipping is historical behavior kept intact: a node is compared
//! against the *call root's* rectangle (result index 0) minus the spec
//! padding, never against its immediate ancestor. For absolute containers
//! nested three or more levels deep this can differ from per-ancestor
//! clipping; callers relying on the old behavior get exactly that.

use crate::element::{ElementId, ElementTree};
use crate::geometry::Rect;
use crate::layout::adapter::count_tree;
use crate::layout::context::{LayoutContext, LayoutResult, finish_results};
use crate::layout::spec::LayoutSpec;
use crate::layout::{LayoutEngine, LayoutError, StrategyKind};

/// Stored-bounds placement engine. Stateless; one instance serves any number
/// of disjoint trees.
#[derive(Debug, Clone, Copy, Default)]
pub struct AbsoluteLayout;

impl LayoutEngine for AbsoluteLayout {
    fn calculate<const N: usize>(
        &self,
        tree: &ElementTree,
        root: ElementId,
        spec: &LayoutSpec<N>,
        context: &LayoutContext<'_>,
        results: &mut [LayoutResult],
    ) -> Result<usize, LayoutError> {
        if spec.strategy() != StrategyKind::Absolute {
            return Err(LayoutError::StrategyMismatch {
                expected: StrategyKind::Absolute,
                found: spec.strategy(),
            });
        }
        let node = tree.get(root).ok_or(LayoutError::InvalidElement)?;

        let needed = count_tree(tree, root);
        if results.len() < needed {
            return Err(LayoutError::ResultsTooSmall {
                needed,
                have: results.len(),
            });
        }

        let rect = node
            .layout_bounds()
            .to_pixels(context.reference_width, context.reference_height)
            .scaled(context.scale_factor)
            .offset(context.available.x, context.available.y);

        results[0] = LayoutResult {
            rect,
            visible: !node.is_hidden(),
            clipped: false,
        };

        let content = spec.padding().content_box(&rect);
        let mut cursor = 1;
        for &child in tree.children(root) {
            place_subtree(tree, child, spec, context.scale_factor, content, results, &mut cursor);
        }

        finish_results(context, &mut results[..cursor]);
        Ok(cursor)
    }

    fn min_size<const N: usize>(
        &self,
        tree: &ElementTree,
        root: ElementId,
        spec: &LayoutSpec<N>,
    ) -> Result<(f32, f32), LayoutError> {
        if spec.strategy() != StrategyKind::Absolute {
            return Err(LayoutError::StrategyMismatch {
                expected: StrategyKind::Absolute,
                found: spec.strategy(),
            });
        }
        tree.get(root).ok_or(LayoutError::InvalidElement)?;

        // Direct visible children only; stored values taken as-is.
        let mut max_right: f32 = 0.0;
        let mut max_bottom: f32 = 0.0;
        for &child in tree.children(root) {
            let node = tree.node(child);
            if node.is_hidden() {
                continue;
            }
            let bounds = node.layout_bounds();
            max_right = max_right.max(bounds.right());
            max_bottom = max_bottom.max(bounds.bottom());
        }

        let padding = spec.padding();
        Ok((max_right + padding.right, max_bottom + padding.bottom))
    }
}

/// Place `id` and its descendants by stored bounds inside `parent_content`.
///
/// Writes results in pre-order starting at `*cursor`. Also used by the flex
/// engine for everything below a flex container's direct children. The
/// caller has already validated the result buffer size, so this recursion
/// cannot fail.
pub(crate) fn place_subtree<const N: usize>(
    tree: &ElementTree,
    id: ElementId,
    spec: &LayoutSpec<N>,
    scale_factor: f32,
    parent_content: Rect,
    results: &mut [LayoutResult],
    cursor: &mut usize,
) {
    let node = tree.node(id);
    let rect = node
        .layout_bounds()
        .to_pixels(parent_content.width, parent_content.height)
        .scaled(scale_factor)
        .offset(parent_content.x, parent_content.y);

    let clipped = spec.clip_overflow() && outside_root(&rect, spec, results);

    let index = *cursor;
    *cursor += 1;
    results[index] = LayoutResult {
        rect,
        visible: !node.is_hidden(),
        clipped,
    };

    let content = spec.padding().content_box(&rect);
    for &child in tree.children(id) {
        place_subtree(tree, child, spec, scale_factor, content, results, cursor);
    }
}

/// Clip test against the call root's rectangle minus the spec padding.
fn outside_root<const N: usize>(rect: &Rect, spec: &LayoutSpec<N>, results: &[LayoutResult]) -> bool {
    let root = results[0].rect;
    let padding = spec.padding();

    rect.right() > root.right() - padding.right
        || rect.bottom() > root.bottom() - padding.bottom
        || rect.x < root.x + padding.left
        || rect.y < root.y + padding.top
}
