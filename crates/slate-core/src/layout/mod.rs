//! Declarative layout engine
//!
//! Converts a per-container [`LayoutSpec`] plus a subtree of the element
//! tree into concrete pixel rectangles. Two strategies are implemented:
//!
//! - [`AbsoluteLayout`] places each node at its stored (relative or pixel)
//!   bounds, offset by the parent's content box.
//! - [`FlexLayout`] is a single-line flexbox: main/cross axis from the
//!   direction, grow/shrink distribution, justify-content, alignment, gaps.
//!
//! A `calculate` call walks the subtree pre-order and writes one
//! [`LayoutResult`] per visited node into a caller-provided buffer sized via
//! [`adapter::count_tree`]. [`adapter::apply_results`] writes the rectangles
//! back onto the tree in the same order.
//!
//! The engines are stateless and reentrant; a single tree and result buffer
//! must not be shared between concurrent calls.

use thiserror_no_std::Error;

use crate::element::{ElementId, ElementTree};

pub mod absolute;
pub mod adapter;
pub mod context;
pub mod flex;
pub mod spec;

pub use absolute::AbsoluteLayout;
pub use adapter::{apply_results, count_tree, pixel_bounds, set_layout_bounds};
pub use context::{LayoutContext, LayoutResult};
pub use flex::FlexLayout;
pub use spec::{
    Alignment, FlexChild, FlexDirection, FlexSpec, JustifyContent, LayoutSpec, Padding,
    StrategyPayload,
};

/// Strategy tags a [`LayoutSpec`] can carry.
///
/// `Grid` is reserved: specs can be created with it, but calculation reports
/// [`LayoutError::UnsupportedStrategy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyKind {
    Absolute,
    Flex,
    Grid,
}

/// Error types for layout operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LayoutError {
    /// The spec's strategy tag does not match the engine invoked
    #[error("spec strategy {found:?} does not match engine strategy {expected:?}")]
    StrategyMismatch {
        /// Strategy the engine implements
        expected: StrategyKind,
        /// Strategy the spec declares
        found: StrategyKind,
    },

    /// Strategy is declared but has no engine
    #[error("strategy {strategy:?} is not implemented")]
    UnsupportedStrategy {
        /// The unimplemented strategy
        strategy: StrategyKind,
    },

    /// Root id does not belong to the given tree
    #[error("element id does not belong to this tree")]
    InvalidElement,

    /// Result buffer smaller than the subtree node count
    #[error("result buffer too small (need {needed}, have {have})")]
    ResultsTooSmall {
        /// Nodes in the subtree
        needed: usize,
        /// Result slots provided
        have: usize,
    },

    /// Per-child flex property table is at capacity
    #[error("flex child table full (max: {max})")]
    ChildTableFull {
        /// Table capacity
        max: usize,
    },
}

/// The seam between strategy implementations.
///
/// Both engines are stateless unit structs; the trait exists so callers can
/// be generic over the strategy without the engines carrying any state. For
/// tag-driven dispatch use [`LayoutSpec::calculate`], which matches on the
/// spec's payload.
pub trait LayoutEngine {
    /// Lay out the subtree rooted at `root`, writing one result per node in
    /// pre-order into `results`. Returns the number of results written.
    fn calculate<const N: usize>(
        &self,
        tree: &ElementTree,
        root: ElementId,
        spec: &LayoutSpec<N>,
        context: &LayoutContext<'_>,
        results: &mut [LayoutResult],
    ) -> Result<usize, LayoutError>;

    /// Minimum content size `(width, height)` the container needs for its
    /// direct visible children. Non-recursive.
    fn min_size<const N: usize>(
        &self,
        tree: &ElementTree,
        root: ElementId,
        spec: &LayoutSpec<N>,
    ) -> Result<(f32, f32), LayoutError>;
}
