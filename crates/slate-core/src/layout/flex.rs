//! Flex-distribution strategy
//!
//! A simplified, single-line flexbox. The container's direction selects the
//! main axis; children are measured (explicit basis, else natural size),
//! leftover main-axis space is absorbed by grow/shrink factors, and when
//! nothing flexes the leftover is distributed per justify-content. Cross-axis
//! sizing follows align-items, overridable per child with align-self.
//!
//! Wrapping is declared in the configuration (`wrap`, `align_content`,
//! `line_gap`) but not executed: all children lay out on a single line. This
//! is a known gap, kept as configuration surface so callers can set it
//! without error.
//!
//! Descendants below the direct children are placed by the absolute
//! recursion against each child's content box, so the one-result-per-node
//! pre-order invariant holds for the whole subtree.

use crate::element::{ElementId, ElementTree};
use crate::geometry::Rect;
use crate::layout::absolute::place_subtree;
use crate::layout::adapter::count_tree;
use crate::layout::context::{LayoutContext, LayoutResult, finish_results};
use crate::layout::spec::{Alignment, JustifyContent, LayoutSpec};
use crate::layout::{LayoutEngine, LayoutError, StrategyKind};

/// Flex placement engine. Stateless; one instance serves any number of
/// disjoint trees.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlexLayout;

impl LayoutEngine for FlexLayout {
    fn calculate<const N: usize>(
        &self,
        tree: &ElementTree,
        root: ElementId,
        spec: &LayoutSpec<N>,
        context: &LayoutContext<'_>,
        results: &mut [LayoutResult],
    ) -> Result<usize, LayoutError> {
        let flex = spec.flex_spec().ok_or(LayoutError::StrategyMismatch {
            expected: StrategyKind::Flex,
            found: spec.strategy(),
        })?;
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
        let mut cursor = 1;

        let content = spec.padding().content_box(&rect);
        let children = tree.children(root);

        let is_row = flex.direction.is_row();
        let is_reverse = flex.direction.is_reverse();
        let main_avail = if is_row { content.width } else { content.height };
        let cross_avail = if is_row { content.height } else { content.width };
        let gap = spec.gap();

        // First pass: accumulate flex factors and the space consumed by
        // bases/naturals plus inter-child gaps, over visible children.
        let mut visible_count = 0usize;
        let mut total_grow = 0.0f32;
        let mut total_shrink = 0.0f32;
        let mut fixed_space = 0.0f32;
        for &child in children {
            let child_node = tree.node(child);
            if child_node.is_hidden() {
                continue;
            }
            visible_count += 1;

            let natural = child_node
                .layout_bounds()
                .to_pixels(content.width, content.height)
                .scaled(context.scale_factor);
            let natural_main = if is_row { natural.width } else { natural.height };

            let (grow, shrink, basis) = flex
                .child(child)
                .map(|props| (props.grow, props.shrink, props.basis))
                .unwrap_or((0.0, 0.0, 0.0));
            total_grow += grow;
            total_shrink += shrink;
            // Explicit bases scale like naturals do.
            fixed_space += if basis > 0.0 {
                basis * context.scale_factor
            } else {
                natural_main
            };
        }

        if visible_count == 0 {
            finish_results(context, &mut results[..cursor]);
            return Ok(cursor);
        }
        fixed_space += gap * (visible_count - 1) as f32;

        let remaining = main_avail - fixed_space;
        let growing = remaining > 0.0;
        let total_flex = if growing { total_grow } else { total_shrink };

        // When nothing flexes, leftover positive space goes to
        // justify-content instead.
        let mut lead = 0.0f32;
        let mut extra_gap = 0.0f32;
        if total_flex <= 0.0 && remaining > 0.0 {
            match flex.justify {
                JustifyContent::Start => {}
                JustifyContent::End => lead = remaining,
                JustifyContent::Center => lead = remaining / 2.0,
                JustifyContent::SpaceBetween => {
                    // A single child degrades to start.
                    if visible_count > 1 {
                        extra_gap = remaining / (visible_count - 1) as f32;
                    }
                }
                JustifyContent::SpaceAround => {
                    extra_gap = remaining / visible_count as f32;
                    lead = extra_gap / 2.0;
                }
                JustifyContent::SpaceEvenly => {
                    extra_gap = remaining / (visible_count + 1) as f32;
                    lead = extra_gap;
                }
            }
        }

        // Second pass: size and place in child order.
        let mut main_pos = lead;
        for &child in children {
            let child_node = tree.node(child);
            let natural = child_node
                .layout_bounds()
                .to_pixels(content.width, content.height)
                .scaled(context.scale_factor);

            if child_node.is_hidden() {
                // Hidden children are still visited so results keep their
                // traversal correspondence, but take no main-axis space.
                let rect = Rect::new(content.x, content.y, natural.width, natural.height);
                let index = cursor;
                cursor += 1;
                results[index] = LayoutResult {
                    rect,
                    visible: false,
                    clipped: false,
                };
                descend(tree, child, spec, context, rect, results, &mut cursor);
                continue;
            }

            let (natural_main, natural_cross) = if is_row {
                (natural.width, natural.height)
            } else {
                (natural.height, natural.width)
            };

            let (grow, shrink, basis_prop, align_self) = flex
                .child(child)
                .map(|props| (props.grow, props.shrink, props.basis, props.align_self))
                .unwrap_or((0.0, 0.0, 0.0, None));

            let basis = if basis_prop > 0.0 {
                basis_prop * context.scale_factor
            } else {
                natural_main
            };
            let factor = if growing { grow } else { shrink };
            let main_size = if total_flex > 0.0 && factor > 0.0 {
                basis + remaining * (factor / total_flex)
            } else {
                basis
            };

            let mut cross_size = natural_cross;
            let mut cross_offset = 0.0;
            match align_self.unwrap_or(flex.align_items) {
                Alignment::Stretch => cross_size = cross_avail,
                Alignment::Center => cross_offset = (cross_avail - cross_size) / 2.0,
                Alignment::End => cross_offset = cross_avail - cross_size,
                Alignment::Start => {}
            }

            let main_origin = if is_reverse {
                main_avail - main_pos - main_size
            } else {
                main_pos
            };
            let rect = if is_row {
                Rect::new(
                    content.x + main_origin,
                    content.y + cross_offset,
                    main_size,
                    cross_size,
                )
            } else {
                Rect::new(
                    content.x + cross_offset,
                    content.y + main_origin,
                    cross_size,
                    main_size,
                )
            };

            let clipped = spec.clip_overflow()
                && (rect.x < content.x
                    || rect.y < content.y
                    || rect.right() > content.right()
                    || rect.bottom() > content.bottom());

            let index = cursor;
            cursor += 1;
            results[index] = LayoutResult {
                rect,
                visible: true,
                clipped,
            };

            descend(tree, child, spec, context, rect, results, &mut cursor);
            main_pos += main_size + gap + extra_gap;
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
        let flex = spec.flex_spec().ok_or(LayoutError::StrategyMismatch {
            expected: StrategyKind::Flex,
            found: spec.strategy(),
        })?;
        tree.get(root).ok_or(LayoutError::InvalidElement)?;

        let is_row = flex.direction.is_row();
        let mut visible_count = 0usize;
        let mut main_total: f32 = 0.0;
        let mut cross_max: f32 = 0.0;
        for &child in tree.children(root) {
            let node = tree.node(child);
            if node.is_hidden() {
                continue;
            }
            visible_count += 1;
            let bounds = node.layout_bounds();
            let (main, cross) = if is_row {
                (bounds.width, bounds.height)
            } else {
                (bounds.height, bounds.width)
            };
            main_total += main;
            cross_max = cross_max.max(cross);
        }
        if visible_count > 1 {
            main_total += spec.gap() * (visible_count - 1) as f32;
        }

        let padding = spec.padding();
        let size = if is_row {
            (
                main_total + padding.horizontal(),
                cross_max + padding.vertical(),
            )
        } else {
            (
                cross_max + padding.horizontal(),
                main_total + padding.vertical(),
            )
        };
        Ok(size)
    }
}

/// Place a flex child's descendants by stored bounds inside the child's
/// content box.
fn descend<const N: usize>(
    tree: &ElementTree,
    child: ElementId,
    spec: &LayoutSpec<N>,
    context: &LayoutContext<'_>,
    child_rect: Rect,
    results: &mut [LayoutResult],
    cursor: &mut usize,
) {
    let content = spec.padding().content_box(&child_rect);
    for &grandchild in tree.children(child) {
        place_subtree(
            tree,
            grandchild,
            spec,
            context.scale_factor,
            content,
            results,
            cursor,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::spec::{FlexDirection, Padding};

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 0.01
    }

    fn row_container(child_sizes: &[(f32, f32)]) -> (ElementTree, alloc::vec::Vec<ElementId>) {
        let mut tree = ElementTree::new(Rect::new(0.0, 0.0, 300.0, 100.0));
        let ids = child_sizes
            .iter()
            .map(|&(width, height)| {
                tree.add_child(tree.root(), Rect::new(0.0, 0.0, width, height))
                    .unwrap()
            })
            .collect();
        (tree, ids)
    }

    fn calculate<const N: usize>(
        tree: &ElementTree,
        spec: &LayoutSpec<N>,
    ) -> alloc::vec::Vec<LayoutResult> {
        let context = LayoutContext::new(tree.get(tree.root()).unwrap().bounds());
        let mut results =
            alloc::vec![LayoutResult::default(); count_tree(tree, tree.root())];
        let written = FlexLayout
            .calculate(tree, tree.root(), spec, &context, &mut results)
            .unwrap();
        results.truncate(written);
        results
    }

    #[test]
    fn test_equal_width_row_with_stretch() {
        let (tree, _) = row_container(&[(50.0, 50.0), (50.0, 50.0), (50.0, 50.0)]);
        let spec: LayoutSpec = LayoutSpec::flex();
        let results = calculate(&tree, &spec);

        assert_eq!(results[0].rect, Rect::new(0.0, 0.0, 300.0, 100.0));
        for (index, expected_x) in [(1, 0.0), (2, 50.0), (3, 100.0)] {
            assert_eq!(results[index].rect, Rect::new(expected_x, 0.0, 50.0, 100.0));
        }
    }

    #[test]
    fn test_grow_distribution_proportional() {
        let (tree, ids) = row_container(&[(50.0, 50.0), (50.0, 50.0)]);
        let mut spec: LayoutSpec = LayoutSpec::flex();
        spec.set_child_flex(ids[0], 1.0, 0.0, 50.0).unwrap();
        spec.set_child_flex(ids[1], 2.0, 0.0, 50.0).unwrap();
        let results = calculate(&tree, &spec);

        assert!(close(results[1].rect.width, 116.67));
        assert!(close(results[2].rect.width, 183.33));
        assert!(close(results[2].rect.x, 116.67));
    }

    #[test]
    fn test_shrink_distribution() {
        let mut tree = ElementTree::new(Rect::new(0.0, 0.0, 100.0, 100.0));
        let a = tree
            .add_child(tree.root(), Rect::new(0.0, 0.0, 80.0, 50.0))
            .unwrap();
        let b = tree
            .add_child(tree.root(), Rect::new(0.0, 0.0, 80.0, 50.0))
            .unwrap();
        let mut spec: LayoutSpec = LayoutSpec::flex();
        spec.set_child_flex(a, 0.0, 1.0, 0.0).unwrap();
        spec.set_child_flex(b, 0.0, 1.0, 0.0).unwrap();
        let results = calculate(&tree, &spec);

        // 160 natural into 100: each loses half the 60px overflow.
        assert!(close(results[1].rect.width, 50.0));
        assert!(close(results[2].rect.width, 50.0));
        assert!(close(results[2].rect.x, 50.0));
    }

    #[test]
    fn test_zero_factor_child_never_flexes() {
        let (tree, ids) = row_container(&[(50.0, 50.0), (50.0, 50.0)]);
        let mut spec: LayoutSpec = LayoutSpec::flex();
        spec.set_child_flex(ids[0], 1.0, 0.0, 50.0).unwrap();
        let results = calculate(&tree, &spec);

        // The growing child absorbs all 200px of leftover.
        assert!(close(results[1].rect.width, 250.0));
        assert!(close(results[2].rect.width, 50.0));
        assert!(close(results[2].rect.x, 250.0));
    }

    #[test]
    fn test_justify_space_between() {
        let (tree, _) = row_container(&[(50.0, 50.0), (50.0, 50.0), (50.0, 50.0)]);
        let mut spec: LayoutSpec = LayoutSpec::flex();
        spec.flex_mut().unwrap().justify = JustifyContent::SpaceBetween;
        let results = calculate(&tree, &spec);

        assert!(close(results[1].rect.x, 0.0));
        assert!(close(results[2].rect.x, 125.0));
        assert!(close(results[3].rect.x, 250.0));
    }

    #[test]
    fn test_justify_space_around_and_evenly() {
        let (tree, _) = row_container(&[(50.0, 50.0), (50.0, 50.0), (50.0, 50.0)]);

        let mut spec: LayoutSpec = LayoutSpec::flex();
        spec.flex_mut().unwrap().justify = JustifyContent::SpaceAround;
        let around = calculate(&tree, &spec);
        assert!(close(around[1].rect.x, 25.0));
        assert!(close(around[2].rect.x, 125.0));
        assert!(close(around[3].rect.x, 225.0));

        spec.flex_mut().unwrap().justify = JustifyContent::SpaceEvenly;
        let evenly = calculate(&tree, &spec);
        assert!(close(evenly[1].rect.x, 37.5));
        assert!(close(evenly[2].rect.x, 125.0));
        assert!(close(evenly[3].rect.x, 212.5));
    }

    #[test]
    fn test_justify_end_and_center() {
        let (tree, _) = row_container(&[(50.0, 50.0), (50.0, 50.0)]);

        let mut spec: LayoutSpec = LayoutSpec::flex();
        spec.flex_mut().unwrap().justify = JustifyContent::End;
        let end = calculate(&tree, &spec);
        assert!(close(end[1].rect.x, 200.0));
        assert!(close(end[2].rect.x, 250.0));

        spec.flex_mut().unwrap().justify = JustifyContent::Center;
        let center = calculate(&tree, &spec);
        assert!(close(center[1].rect.x, 100.0));
        assert!(close(center[2].rect.x, 150.0));
    }

    #[test]
    fn test_row_reverse_mirrors_positions() {
        let (tree, _) = row_container(&[(50.0, 50.0), (50.0, 50.0), (50.0, 50.0)]);
        let mut spec: LayoutSpec = LayoutSpec::flex();
        spec.flex_mut().unwrap().direction = FlexDirection::RowReverse;
        let results = calculate(&tree, &spec);

        assert!(close(results[1].rect.x, 250.0));
        assert!(close(results[2].rect.x, 200.0));
        assert!(close(results[3].rect.x, 150.0));
    }

    #[test]
    fn test_column_direction_uses_vertical_main_axis() {
        let mut tree = ElementTree::new(Rect::new(0.0, 0.0, 100.0, 300.0));
        for _ in 0..3 {
            tree.add_child(tree.root(), Rect::new(0.0, 0.0, 40.0, 50.0))
                .unwrap();
        }
        let mut spec: LayoutSpec = LayoutSpec::flex();
        spec.flex_mut().unwrap().direction = FlexDirection::Column;
        let results = calculate(&tree, &spec);

        for (index, expected_y) in [(1, 0.0), (2, 50.0), (3, 100.0)] {
            assert!(close(results[index].rect.y, expected_y));
            // Stretch fills the cross (horizontal) axis.
            assert!(close(results[index].rect.width, 100.0));
            assert!(close(results[index].rect.height, 50.0));
        }
    }

    #[test]
    fn test_align_center_and_self_override() {
        let (tree, ids) = row_container(&[(50.0, 50.0), (50.0, 50.0)]);
        let mut spec: LayoutSpec = LayoutSpec::flex();
        spec.flex_mut().unwrap().align_items = Alignment::Center;
        spec.set_child_align(ids[1], Some(Alignment::End)).unwrap();
        let results = calculate(&tree, &spec);

        assert!(close(results[1].rect.y, 25.0));
        assert!(close(results[1].rect.height, 50.0));
        assert!(close(results[2].rect.y, 50.0));
    }

    #[test]
    fn test_gap_between_children() {
        let (tree, _) = row_container(&[(50.0, 50.0), (50.0, 50.0), (50.0, 50.0)]);
        let mut spec: LayoutSpec = LayoutSpec::flex();
        spec.set_gap(10.0);
        let results = calculate(&tree, &spec);

        assert!(close(results[1].rect.x, 0.0));
        assert!(close(results[2].rect.x, 60.0));
        assert!(close(results[3].rect.x, 120.0));
    }

    #[test]
    fn test_hidden_child_excluded_from_distribution() {
        let (mut tree, ids) = row_container(&[(50.0, 50.0), (50.0, 50.0), (50.0, 50.0)]);
        tree.set_hidden(ids[1], true);
        let spec: LayoutSpec = LayoutSpec::flex();
        let results = calculate(&tree, &spec);

        assert!(close(results[1].rect.x, 0.0));
        assert!(!results[2].visible);
        // The hidden child takes no main-axis space.
        assert!(close(results[3].rect.x, 50.0));
    }

    #[test]
    fn test_overflow_clip_marks_children() {
        let mut tree = ElementTree::new(Rect::new(0.0, 0.0, 100.0, 100.0));
        tree.add_child(tree.root(), Rect::new(0.0, 0.0, 150.0, 50.0))
            .unwrap();
        let mut spec: LayoutSpec = LayoutSpec::flex();
        spec.set_clip_overflow(true);
        let results = calculate(&tree, &spec);
        assert!(results[1].clipped);

        spec.set_clip_overflow(false);
        let unclipped = calculate(&tree, &spec);
        assert!(!unclipped[1].clipped);
    }

    #[test]
    fn test_padding_shrinks_content_box() {
        let (tree, _) = row_container(&[(50.0, 50.0), (50.0, 50.0)]);
        let mut spec: LayoutSpec = LayoutSpec::flex();
        spec.set_padding(Padding::all(10.0));
        let results = calculate(&tree, &spec);

        assert!(close(results[1].rect.x, 10.0));
        assert!(close(results[1].rect.y, 10.0));
        // Stretch fills the padded cross axis.
        assert!(close(results[1].rect.height, 80.0));
        assert!(close(results[2].rect.x, 60.0));
    }

    #[test]
    fn test_scale_factor_applies_to_explicit_basis() {
        let mut tree = ElementTree::new(Rect::new(0.0, 0.0, 100.0, 100.0));
        let a = tree
            .add_child(tree.root(), Rect::new(0.0, 0.0, 50.0, 50.0))
            .unwrap();
        tree.add_child(tree.root(), Rect::new(0.0, 0.0, 30.0, 50.0))
            .unwrap();
        let mut spec: LayoutSpec = LayoutSpec::flex();
        spec.set_child_flex(a, 0.0, 0.0, 50.0).unwrap();

        let context =
            LayoutContext::new(Rect::new(0.0, 0.0, 200.0, 200.0)).with_scale_factor(2.0);
        let mut results = [LayoutResult::default(); 3];
        FlexLayout
            .calculate(&tree, tree.root(), &spec, &context, &mut results)
            .unwrap();

        // Basis-sized and natural-sized siblings scale the same way.
        assert!(close(results[1].rect.width, 100.0));
        assert!(close(results[2].rect.width, 60.0));
        assert!(close(results[2].rect.x, 100.0));
    }

    #[test]
    fn test_no_visible_children_returns_container_only() {
        let (mut tree, ids) = row_container(&[(50.0, 50.0)]);
        tree.set_hidden(ids[0], true);
        let spec: LayoutSpec = LayoutSpec::flex();
        let results = calculate(&tree, &spec);
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn test_descendants_place_inside_flex_child() {
        let mut tree = ElementTree::new(Rect::new(0.0, 0.0, 300.0, 100.0));
        let child = tree
            .add_child(tree.root(), Rect::new(0.0, 0.0, 100.0, 100.0))
            .unwrap();
        tree.add_child(child, Rect::new(10.0, 10.0, 20.0, 20.0))
            .unwrap();

        let spec: LayoutSpec = LayoutSpec::flex();
        let results = calculate(&tree, &spec);

        assert_eq!(results.len(), 3);
        // Grandchild offsets from the flex child's computed origin.
        assert!(close(results[2].rect.x, 10.0));
        assert!(close(results[2].rect.y, 10.0));
    }

    #[test]
    fn test_min_size_row() {
        let mut tree = ElementTree::new(Rect::new(0.0, 0.0, 300.0, 100.0));
        tree.add_child(tree.root(), Rect::new(0.0, 0.0, 50.0, 30.0))
            .unwrap();
        tree.add_child(tree.root(), Rect::new(0.0, 0.0, 70.0, 40.0))
            .unwrap();

        let mut spec: LayoutSpec = LayoutSpec::flex();
        spec.set_gap(10.0);
        spec.set_padding(Padding::all(5.0));
        let (width, height) = FlexLayout.min_size(&tree, tree.root(), &spec).unwrap();

        assert!(close(width, 140.0));
        assert!(close(height, 50.0));
    }

    #[test]
    fn test_strategy_mismatch_rejected() {
        let tree = ElementTree::new(Rect::new(0.0, 0.0, 100.0, 100.0));
        let spec: LayoutSpec = LayoutSpec::absolute();
        let context = LayoutContext::new(Rect::new(0.0, 0.0, 100.0, 100.0));
        let mut results = [LayoutResult::default()];

        assert_eq!(
            FlexLayout.calculate(&tree, tree.root(), &spec, &context, &mut results),
            Err(LayoutError::StrategyMismatch {
                expected: StrategyKind::Flex,
                found: StrategyKind::Absolute,
            })
        );
    }
}
