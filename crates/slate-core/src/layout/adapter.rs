//! Element/layout adapter
//!
//! Translation between the element tree's stored bounds and the engine's
//! floating rectangles: sizing the result buffer ([`count_tree`]), writing
//! resolved rectangles back onto nodes ([`set_layout_bounds`]), and applying
//! a whole result array in traversal order ([`apply_results`]).
//!
//! `apply_results` deliberately tolerates a count mismatch between the tree
//! and the result array: it logs a warning and applies however many results
//! are available. Everything else in the layout engine treats mismatches as
//! hard errors; this is the one seam where partial application is useful
//! (a strategy may legitimately stop early, e.g. a flex container with no
//! visible children).

use alloc::vec::Vec;

use embedded_graphics::primitives::Rectangle;

use crate::element::{ElementId, ElementTree};
use crate::geometry::{Rect, round_px};
use crate::layout::context::LayoutResult;
use crate::layout::spec::Padding;

/// Number of nodes in the subtree rooted at `root` (self + descendants),
/// counted in the same pre-order `calculate` visits them. Used to size
/// [`LayoutResult`] buffers.
pub fn count_tree(tree: &ElementTree, root: ElementId) -> usize {
    if tree.get(root).is_none() {
        return 0;
    }
    let mut count = 1;
    for &child in tree.children(root) {
        count += count_tree(tree, child);
    }
    count
}

/// Write a resolved rectangle back onto an element.
///
/// The rectangle is rounded to the nearest integer pixel; both the absolute
/// and (for parented nodes) the parent-relative bounds are updated, and the
/// node is marked as needing layout on the next pass.
///
/// Relative bounds are stored against the parent's *content* origin, which
/// is where the engines resolve them from, so the written-back values feed a
/// subsequent `calculate` without shifting. `padding` must be the same
/// padding the pass that produced `rect` used.
pub fn set_layout_bounds(tree: &mut ElementTree, id: ElementId, rect: Rect, padding: Padding) {
    if tree.get(id).is_none() {
        return;
    }

    let rounded = Rect::new(
        round_px(rect.x) as f32,
        round_px(rect.y) as f32,
        round_px(rect.width) as f32,
        round_px(rect.height) as f32,
    );

    let content_origin = tree
        .node(id)
        .parent()
        .map(|parent| {
            let bounds = tree.node(parent).bounds();
            (bounds.x + padding.left, bounds.y + padding.top)
        });

    let node = tree.node_mut(id);
    node.set_absolute_bounds(rounded);
    if let Some((origin_x, origin_y)) = content_origin {
        node.set_relative_bounds(Some(rounded.offset(-origin_x, -origin_y)));
    }
}

/// Apply a result array onto the subtree at `root`, walking the same
/// pre-order `calculate` used. Returns the number of results applied.
///
/// A count mismatch is reported as a warning, not a failure; the walk
/// applies what it can and stops when the results run out. An unknown root
/// applies nothing. `padding` is the padding of the spec that produced
/// `results`; see [`set_layout_bounds`].
pub fn apply_results(
    tree: &mut ElementTree,
    root: ElementId,
    results: &[LayoutResult],
    padding: Padding,
) -> usize {
    if tree.get(root).is_none() {
        log::warn!("apply_results: element {:?} is not in the tree", root);
        return 0;
    }

    let expected = count_tree(tree, root);
    if expected != results.len() {
        log::warn!(
            "layout result count mismatch: subtree has {} nodes, {} results",
            expected,
            results.len()
        );
    }

    let mut cursor = 0;
    apply_recursive(tree, root, results, padding, &mut cursor);
    log::debug!("applied {} layout results", cursor);
    cursor
}

fn apply_recursive(
    tree: &mut ElementTree,
    id: ElementId,
    results: &[LayoutResult],
    padding: Padding,
    cursor: &mut usize,
) {
    let Some(&result) = results.get(*cursor) else {
        return;
    };
    *cursor += 1;

    set_layout_bounds(tree, id, result.rect, padding);
    tree.node_mut(id)
        .set_computed_flags(result.visible, result.clipped);

    let children: Vec<ElementId> = tree.children(id).to_vec();
    for child in children {
        apply_recursive(tree, child, results, padding, cursor);
    }
}

/// An element's absolute bounds as an embedded-graphics `Rectangle`, for
/// handing to the renderer.
pub fn pixel_bounds(tree: &ElementTree, id: ElementId) -> Option<Rectangle> {
    tree.get(id).map(|node| node.bounds().to_rectangle())
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::prelude::*;

    fn sample_tree() -> (ElementTree, ElementId, ElementId, ElementId) {
        let mut tree = ElementTree::new(Rect::new(0.0, 0.0, 200.0, 100.0));
        let root = tree.root();
        let a = tree
            .add_child(root, Rect::new(10.0, 10.0, 50.0, 50.0))
            .unwrap();
        let b = tree
            .add_child(root, Rect::new(70.0, 10.0, 50.0, 50.0))
            .unwrap();
        (tree, root, a, b)
    }

    #[test]
    fn test_count_tree() {
        let (mut tree, root, a, _) = sample_tree();
        assert_eq!(count_tree(&tree, root), 3);
        assert_eq!(count_tree(&tree, a), 1);

        let nested = tree.add_child(a, Rect::ZERO).unwrap();
        tree.add_child(nested, Rect::ZERO).unwrap();
        assert_eq!(count_tree(&tree, root), 5);
        assert_eq!(count_tree(&tree, a), 3);
    }

    #[test]
    fn test_set_layout_bounds_rounds_and_updates_both_representations() {
        let (mut tree, _, a, _) = sample_tree();
        tree.get_mut(a).unwrap().mark_laid_out();

        set_layout_bounds(&mut tree, a, Rect::new(10.6, 19.4, 50.5, 29.5), Padding::default());

        let node = tree.get(a).unwrap();
        assert_eq!(node.bounds(), Rect::new(11.0, 19.0, 51.0, 30.0));
        // Parent (root) sits at the origin, so relative equals absolute here.
        assert_eq!(node.relative_bounds(), Some(Rect::new(11.0, 19.0, 51.0, 30.0)));
        assert!(node.needs_layout());
    }

    #[test]
    fn test_set_layout_bounds_relative_to_parent_origin() {
        let mut tree = ElementTree::new(Rect::new(0.0, 0.0, 200.0, 100.0));
        let parent = tree
            .add_child(tree.root(), Rect::new(20.0, 30.0, 100.0, 50.0))
            .unwrap();
        let child = tree.add_child(parent, Rect::ZERO).unwrap();

        set_layout_bounds(&mut tree, child, Rect::new(25.0, 40.0, 10.0, 10.0), Padding::default());

        let node = tree.get(child).unwrap();
        assert_eq!(node.bounds(), Rect::new(25.0, 40.0, 10.0, 10.0));
        assert_eq!(node.relative_bounds(), Some(Rect::new(5.0, 10.0, 10.0, 10.0)));
    }

    #[test]
    fn test_set_layout_bounds_relative_to_parent_content_origin() {
        let mut tree = ElementTree::new(Rect::new(0.0, 0.0, 200.0, 100.0));
        let parent = tree
            .add_child(tree.root(), Rect::new(20.0, 30.0, 100.0, 50.0))
            .unwrap();
        let child = tree.add_child(parent, Rect::ZERO).unwrap();

        set_layout_bounds(&mut tree, child, Rect::new(35.0, 45.0, 10.0, 10.0), Padding::all(10.0));

        // (35, 45) sits 5px inside the parent's content origin (30, 40).
        let node = tree.get(child).unwrap();
        assert_eq!(node.relative_bounds(), Some(Rect::new(5.0, 5.0, 10.0, 10.0)));
    }

    #[test]
    fn test_apply_results_full() {
        let (mut tree, root, a, b) = sample_tree();
        let results = [
            LayoutResult {
                rect: Rect::new(0.0, 0.0, 200.0, 100.0),
                visible: true,
                clipped: false,
            },
            LayoutResult {
                rect: Rect::new(10.0, 10.0, 50.0, 50.0),
                visible: true,
                clipped: false,
            },
            LayoutResult {
                rect: Rect::new(70.0, 10.0, 50.0, 50.0),
                visible: false,
                clipped: true,
            },
        ];

        let applied = apply_results(&mut tree, root, &results, Padding::default());
        assert_eq!(applied, 3);

        assert_eq!(tree.get(a).unwrap().bounds(), Rect::new(10.0, 10.0, 50.0, 50.0));
        let last = tree.get(b).unwrap();
        assert!(!last.is_visible());
        assert!(last.is_clipped());
    }

    #[test]
    fn test_apply_results_partial_on_mismatch() {
        let (mut tree, root, a, b) = sample_tree();
        let results = [
            LayoutResult {
                rect: Rect::new(0.0, 0.0, 200.0, 100.0),
                visible: true,
                clipped: false,
            },
            LayoutResult {
                rect: Rect::new(1.0, 2.0, 3.0, 4.0),
                visible: true,
                clipped: false,
            },
        ];

        // Two results for a three-node tree: applies the prefix.
        let applied = apply_results(&mut tree, root, &results, Padding::default());
        assert_eq!(applied, 2);
        assert_eq!(tree.get(a).unwrap().bounds(), Rect::new(1.0, 2.0, 3.0, 4.0));
        // Unreached node keeps its authored bounds.
        assert_eq!(tree.get(b).unwrap().bounds(), Rect::new(70.0, 10.0, 50.0, 50.0));
    }

    #[test]
    fn test_apply_results_unknown_root_applies_nothing() {
        let (mut tree, _, a, _) = sample_tree();
        let results = [LayoutResult {
            rect: Rect::new(1.0, 2.0, 3.0, 4.0),
            visible: true,
            clipped: false,
        }];

        let applied = apply_results(&mut tree, ElementId(99), &results, Padding::default());
        assert_eq!(applied, 0);
        assert_eq!(tree.get(a).unwrap().bounds(), Rect::new(10.0, 10.0, 50.0, 50.0));
    }

    #[test]
    fn test_relayout_after_apply_results_is_stable() {
        use crate::layout::{AbsoluteLayout, LayoutContext, LayoutEngine, LayoutSpec};

        let mut tree = ElementTree::new(Rect::new(0.0, 0.0, 200.0, 100.0));
        tree.add_child(tree.root(), Rect::new(5.0, 5.0, 30.0, 30.0))
            .unwrap();

        let mut spec: LayoutSpec = LayoutSpec::absolute();
        spec.set_padding(Padding::all(10.0));
        let context = LayoutContext::new(Rect::new(0.0, 0.0, 200.0, 100.0));

        let mut first = [LayoutResult::default(); 2];
        AbsoluteLayout
            .calculate(&tree, tree.root(), &spec, &context, &mut first)
            .unwrap();
        assert_eq!(first[1].rect, Rect::new(15.0, 15.0, 30.0, 30.0));

        let root = tree.root();
        apply_results(&mut tree, root, &first, spec.padding());

        // Written-back bounds must resolve to the same places again.
        let mut second = [LayoutResult::default(); 2];
        AbsoluteLayout
            .calculate(&tree, tree.root(), &spec, &context, &mut second)
            .unwrap();
        assert_eq!(second[1].rect, first[1].rect);
    }

    #[test]
    fn test_pixel_bounds_conversion() {
        let (tree, _, a, _) = sample_tree();
        let pixels = pixel_bounds(&tree, a).unwrap();
        assert_eq!(pixels.top_left, Point::new(10, 10));
        assert_eq!(pixels.size, Size::new(50, 50));
    }
}
