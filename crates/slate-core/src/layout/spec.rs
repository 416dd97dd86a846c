//! Per-container layout configuration
//!
//! A [`LayoutSpec`] is owned by whichever container created it and carries
//! padding, the inter-child gap, the overflow-clip flag, and a
//! strategy-specific payload. The flex payload additionally holds the
//! container-level distribution settings and a bounded table of per-child
//! properties, appended lazily the first time a child's flex properties are
//! set. Lookups are a linear scan keyed on element identity; container child
//! counts are small (single digits to low tens), so this stays cheap.

use heapless::Vec;
use serde::{Deserialize, Serialize};

use crate::element::{ElementId, ElementTree};
use crate::geometry::Rect;
use crate::layout::context::{LayoutContext, LayoutResult};
use crate::layout::{AbsoluteLayout, FlexLayout, LayoutEngine, LayoutError, StrategyKind};

/// Default capacity of the per-child flex property table.
pub const DEFAULT_FLEX_CHILDREN: usize = 8;

// ============================================================================
// Padding
// ============================================================================

/// Padding around a container's content (top, right, bottom, left), in
/// pixels.
///
/// # Examples
///
/// ```ignore
/// // Equal padding on all sides
/// let p = Padding::all(8.0);
///
/// // Different vertical (12px) and horizontal (16px)
/// let p = Padding::symmetric(12.0, 16.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Padding {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Padding {
    /// Equal padding on all sides.
    pub const fn all(value: f32) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    /// Symmetric padding (vertical, then horizontal).
    pub const fn symmetric(vertical: f32, horizontal: f32) -> Self {
        Self {
            top: vertical,
            right: horizontal,
            bottom: vertical,
            left: horizontal,
        }
    }

    /// Individual control for each side.
    pub const fn new(top: f32, right: f32, bottom: f32, left: f32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Total horizontal padding (left + right).
    pub fn horizontal(&self) -> f32 {
        self.left + self.right
    }

    /// Total vertical padding (top + bottom).
    pub fn vertical(&self) -> f32 {
        self.top + self.bottom
    }

    /// Shrink a resolved rectangle to its content box.
    pub fn content_box(&self, rect: &Rect) -> Rect {
        Rect::new(
            rect.x + self.left,
            rect.y + self.top,
            rect.width - self.horizontal(),
            rect.height - self.vertical(),
        )
    }
}

// ============================================================================
// Flex configuration
// ============================================================================

/// Main-axis direction of a flex container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlexDirection {
    /// Horizontal, left to right
    #[default]
    Row,
    /// Horizontal, right to left
    RowReverse,
    /// Vertical, top to bottom
    Column,
    /// Vertical, bottom to top
    ColumnReverse,
}

impl FlexDirection {
    /// Whether the main axis is horizontal.
    pub fn is_row(&self) -> bool {
        matches!(self, Self::Row | Self::RowReverse)
    }

    /// Whether children are placed from the far end backwards.
    pub fn is_reverse(&self) -> bool {
        matches!(self, Self::RowReverse | Self::ColumnReverse)
    }
}

/// Distribution policy for leftover main-axis space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JustifyContent {
    /// Pack children at the start of the main axis
    #[default]
    Start,
    /// Pack children at the end
    End,
    /// Center children
    Center,
    /// Equal gaps between children, none at the edges
    SpaceBetween,
    /// Equal space around each child (half-gaps at the edges)
    SpaceAround,
    /// Equal gaps between children and at both edges
    SpaceEvenly,
}

/// Cross-axis alignment, container-wide or as a per-child override.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    /// Align to the start of the cross axis
    Start,
    /// Align to the end
    End,
    /// Center on the cross axis
    Center,
    /// Resize to fill the cross axis
    Stretch,
}

/// Per-child flex properties, looked up by element identity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlexChild {
    /// The child this entry belongs to (non-owning)
    pub element: ElementId,
    /// Weight for absorbing positive leftover space (0 = never grows)
    pub grow: f32,
    /// Weight for absorbing negative leftover space (0 = never shrinks)
    pub shrink: f32,
    /// Base main-axis size; zero or negative means "use natural size"
    pub basis: f32,
    /// Cross-axis override for this child
    pub align_self: Option<Alignment>,
}

impl FlexChild {
    fn new(element: ElementId) -> Self {
        Self {
            element,
            grow: 0.0,
            shrink: 0.0,
            basis: 0.0,
            align_self: None,
        }
    }
}

/// Flex-strategy payload of a [`LayoutSpec`].
///
/// `wrap`, `align_content`, and `line_gap` are accepted as configuration but
/// only single-line layout is implemented today; multi-line distribution is
/// a known gap, not a supported feature.
#[derive(Debug, Clone, PartialEq)]
pub struct FlexSpec<const N: usize = DEFAULT_FLEX_CHILDREN> {
    pub direction: FlexDirection,
    pub justify: JustifyContent,
    pub align_items: Alignment,
    pub align_content: Alignment,
    pub wrap: bool,
    pub line_gap: f32,
    children: Vec<FlexChild, N>,
}

impl<const N: usize> Default for FlexSpec<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> FlexSpec<N> {
    pub fn new() -> Self {
        Self {
            direction: FlexDirection::Row,
            justify: JustifyContent::Start,
            align_items: Alignment::Stretch,
            align_content: Alignment::Stretch,
            wrap: false,
            line_gap: 0.0,
            children: Vec::new(),
        }
    }

    pub fn with_direction(mut self, direction: FlexDirection) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_justify(mut self, justify: JustifyContent) -> Self {
        self.justify = justify;
        self
    }

    pub fn with_align_items(mut self, align: Alignment) -> Self {
        self.align_items = align;
        self
    }

    pub fn with_align_content(mut self, align: Alignment) -> Self {
        self.align_content = align;
        self
    }

    pub fn with_line_gap(mut self, line_gap: f32) -> Self {
        self.line_gap = line_gap;
        self
    }

    pub fn with_wrap(mut self, wrap: bool) -> Self {
        self.wrap = wrap;
        self
    }

    /// Properties for `element`, if any have been set.
    pub fn child(&self, element: ElementId) -> Option<&FlexChild> {
        self.children.iter().find(|child| child.element == element)
    }

    /// Number of children with explicit properties.
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Set grow/shrink/basis for a child, inserting or updating in place.
    ///
    /// Calling twice for the same child updates the existing entry rather
    /// than appending a duplicate.
    pub fn set_child_flex(
        &mut self,
        element: ElementId,
        grow: f32,
        shrink: f32,
        basis: f32,
    ) -> Result<(), LayoutError> {
        let entry = self.entry(element)?;
        entry.grow = grow;
        entry.shrink = shrink;
        entry.basis = basis;
        Ok(())
    }

    /// Set or clear the cross-axis override for a child.
    pub fn set_child_align(
        &mut self,
        element: ElementId,
        align: Option<Alignment>,
    ) -> Result<(), LayoutError> {
        self.entry(element)?.align_self = align;
        Ok(())
    }

    fn entry(&mut self, element: ElementId) -> Result<&mut FlexChild, LayoutError> {
        let index = match self
            .children
            .iter()
            .position(|child| child.element == element)
        {
            Some(index) => index,
            None => {
                self.children
                    .push(FlexChild::new(element))
                    .map_err(|_| LayoutError::ChildTableFull { max: N })?;
                self.children.len() - 1
            }
        };
        Ok(&mut self.children[index])
    }
}

// ============================================================================
// Layout spec
// ============================================================================

/// Strategy tag plus strategy-specific payload.
///
/// The payload *is* the tag; a spec can never declare one strategy while
/// carrying another's payload.
#[derive(Debug, Clone, PartialEq)]
pub enum StrategyPayload<const N: usize = DEFAULT_FLEX_CHILDREN> {
    /// Stored-bounds placement, no extra configuration
    Absolute,
    /// Single-line flexbox
    Flex(FlexSpec<N>),
    /// Reserved; calculation reports [`LayoutError::UnsupportedStrategy`]
    Grid,
}

/// Per-container layout configuration.
///
/// # Examples
///
/// ```ignore
/// let mut spec: LayoutSpec = LayoutSpec::flex();
/// spec.set_padding(Padding::all(8.0));
/// spec.set_gap(4.0);
/// if let Some(flex) = spec.flex_mut() {
///     flex.justify = JustifyContent::SpaceBetween;
/// }
/// spec.set_child_flex(header, 0.0, 0.0, 40.0)?;
/// spec.set_child_flex(body, 1.0, 1.0, 0.0)?;
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutSpec<const N: usize = DEFAULT_FLEX_CHILDREN> {
    padding: Padding,
    gap: f32,
    clip_overflow: bool,
    payload: StrategyPayload<N>,
}

impl<const N: usize> LayoutSpec<N> {
    /// Create a spec for the given strategy with default configuration.
    pub fn new(strategy: StrategyKind) -> Self {
        let payload = match strategy {
            StrategyKind::Absolute => StrategyPayload::Absolute,
            StrategyKind::Flex => StrategyPayload::Flex(FlexSpec::new()),
            StrategyKind::Grid => StrategyPayload::Grid,
        };
        Self {
            padding: Padding::default(),
            gap: 0.0,
            clip_overflow: false,
            payload,
        }
    }

    /// Shorthand for `new(StrategyKind::Absolute)`.
    pub fn absolute() -> Self {
        Self::new(StrategyKind::Absolute)
    }

    /// Shorthand for `new(StrategyKind::Flex)`.
    pub fn flex() -> Self {
        Self::new(StrategyKind::Flex)
    }

    /// The strategy this spec declares.
    pub fn strategy(&self) -> StrategyKind {
        match self.payload {
            StrategyPayload::Absolute => StrategyKind::Absolute,
            StrategyPayload::Flex(_) => StrategyKind::Flex,
            StrategyPayload::Grid => StrategyKind::Grid,
        }
    }

    pub fn padding(&self) -> Padding {
        self.padding
    }

    pub fn set_padding(&mut self, padding: Padding) {
        self.padding = padding;
    }

    /// Equal padding on all four sides.
    pub fn set_uniform_padding(&mut self, value: f32) {
        self.padding = Padding::all(value);
    }

    pub fn gap(&self) -> f32 {
        self.gap
    }

    pub fn set_gap(&mut self, gap: f32) {
        self.gap = gap;
    }

    pub fn clip_overflow(&self) -> bool {
        self.clip_overflow
    }

    pub fn set_clip_overflow(&mut self, clip: bool) {
        self.clip_overflow = clip;
    }

    pub fn payload(&self) -> &StrategyPayload<N> {
        &self.payload
    }

    /// Flex payload, when this is a flex spec.
    pub fn flex_spec(&self) -> Option<&FlexSpec<N>> {
        match &self.payload {
            StrategyPayload::Flex(flex) => Some(flex),
            _ => None,
        }
    }

    pub fn flex_mut(&mut self) -> Option<&mut FlexSpec<N>> {
        match &mut self.payload {
            StrategyPayload::Flex(flex) => Some(flex),
            _ => None,
        }
    }

    /// Per-child flex setter, dispatched through the payload.
    ///
    /// Returns [`LayoutError::StrategyMismatch`] for non-flex specs.
    pub fn set_child_flex(
        &mut self,
        element: ElementId,
        grow: f32,
        shrink: f32,
        basis: f32,
    ) -> Result<(), LayoutError> {
        let found = self.strategy();
        self.flex_mut()
            .ok_or(LayoutError::StrategyMismatch {
                expected: StrategyKind::Flex,
                found,
            })?
            .set_child_flex(element, grow, shrink, basis)
    }

    /// Per-child cross-axis override, dispatched through the payload.
    pub fn set_child_align(
        &mut self,
        element: ElementId,
        align: Option<Alignment>,
    ) -> Result<(), LayoutError> {
        let found = self.strategy();
        self.flex_mut()
            .ok_or(LayoutError::StrategyMismatch {
                expected: StrategyKind::Flex,
                found,
            })?
            .set_child_align(element, align)
    }

    /// Run the engine matching this spec's strategy tag.
    pub fn calculate(
        &self,
        tree: &ElementTree,
        root: ElementId,
        context: &LayoutContext<'_>,
        results: &mut [LayoutResult],
    ) -> Result<usize, LayoutError> {
        match self.payload {
            StrategyPayload::Absolute => AbsoluteLayout.calculate(tree, root, self, context, results),
            StrategyPayload::Flex(_) => FlexLayout.calculate(tree, root, self, context, results),
            StrategyPayload::Grid => Err(LayoutError::UnsupportedStrategy {
                strategy: StrategyKind::Grid,
            }),
        }
    }

    /// Run the matching engine's minimum-size pass.
    pub fn min_size(
        &self,
        tree: &ElementTree,
        root: ElementId,
    ) -> Result<(f32, f32), LayoutError> {
        match self.payload {
            StrategyPayload::Absolute => AbsoluteLayout.min_size(tree, root, self),
            StrategyPayload::Flex(_) => FlexLayout.min_size(tree, root, self),
            StrategyPayload::Grid => Err(LayoutError::UnsupportedStrategy {
                strategy: StrategyKind::Grid,
            }),
        }
    }
}
