//! Retained element tree
//!
//! The UI system needs a tree the layout engine can walk without trait
//! objects and without pointer-chasing ownership cycles. Nodes live in an
//! arena owned by [`ElementTree`] and are addressed by copyable
//! [`ElementId`]s; the parent link is a plain id, used for lookup only.
//!
//! Each node stores its authored bounds as two clearly-typed rectangles:
//! absolute bounds, and optional parent-relative bounds. Both use the
//! overloaded units of [`Rect`] (fraction vs. pixels), resolved by the layout
//! strategies at calculation time.

use alloc::vec::Vec;

use crate::geometry::Rect;

/// Identity of an element within its [`ElementTree`].
///
/// Ids are never reused; the tree has no removal API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementId(pub(crate) usize);

/// One node of the retained tree.
#[derive(Debug, Clone)]
pub struct Element {
    bounds: Rect,
    relative_bounds: Option<Rect>,
    hidden: bool,
    visible: bool,
    clipped: bool,
    needs_layout: bool,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
}

impl Element {
    fn new(bounds: Rect, parent: Option<ElementId>) -> Self {
        Self {
            bounds,
            relative_bounds: None,
            hidden: false,
            visible: true,
            clipped: false,
            needs_layout: true,
            parent,
            children: Vec::new(),
        }
    }

    /// Absolute bounds (overloaded units).
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Parent-relative bounds, if authored (overloaded units).
    pub fn relative_bounds(&self) -> Option<Rect> {
        self.relative_bounds
    }

    /// The bounds the layout engine should resolve for this node.
    ///
    /// Parented nodes prefer their parent-relative rectangle when one has
    /// been authored; roots (and nodes without relative bounds) use the
    /// absolute rectangle.
    pub fn layout_bounds(&self) -> Rect {
        if self.parent.is_some()
            && let Some(relative) = self.relative_bounds
        {
            return relative;
        }
        self.bounds
    }

    pub fn parent(&self) -> Option<ElementId> {
        self.parent
    }

    pub fn children(&self) -> &[ElementId] {
        &self.children
    }

    /// Authored hidden flag. Hidden nodes are still visited by layout but
    /// produce `visible = false` results and do not take part in flex
    /// distribution.
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Computed visibility, written back by `apply_results`.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Computed overflow-clip flag, written back by `apply_results`.
    pub fn is_clipped(&self) -> bool {
        self.clipped
    }

    /// Whether this node's geometry changed since the last layout pass.
    pub fn needs_layout(&self) -> bool {
        self.needs_layout
    }

    pub fn mark_laid_out(&mut self) {
        self.needs_layout = false;
    }

    pub(crate) fn set_absolute_bounds(&mut self, bounds: Rect) {
        if self.bounds != bounds {
            self.bounds = bounds;
            self.needs_layout = true;
        }
    }

    pub(crate) fn set_relative_bounds(&mut self, bounds: Option<Rect>) {
        if self.relative_bounds != bounds {
            self.relative_bounds = bounds;
            self.needs_layout = true;
        }
    }

    pub(crate) fn set_computed_flags(&mut self, visible: bool, clipped: bool) {
        self.visible = visible;
        self.clipped = clipped;
    }
}

/// Arena-owned retained element tree.
///
/// # Examples
///
/// ```ignore
/// let mut tree = ElementTree::new(Rect::new(0.0, 0.0, 320.0, 240.0));
/// let root = tree.root();
/// let header = tree.add_child(root, Rect::new(0.0, 0.0, 1.0, 40.0)).unwrap();
/// tree.set_hidden(header, false);
/// ```
#[derive(Debug, Clone)]
pub struct ElementTree {
    nodes: Vec<Element>,
}

impl ElementTree {
    /// Create a tree with a single root element.
    pub fn new(root_bounds: Rect) -> Self {
        Self {
            nodes: alloc::vec![Element::new(root_bounds, None)],
        }
    }

    /// The root element's id.
    pub fn root(&self) -> ElementId {
        ElementId(0)
    }

    /// Total number of elements in the tree.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Append a child under `parent`. Returns `None` when `parent` does not
    /// belong to this tree.
    pub fn add_child(&mut self, parent: ElementId, bounds: Rect) -> Option<ElementId> {
        if parent.0 >= self.nodes.len() {
            return None;
        }
        let id = ElementId(self.nodes.len());
        self.nodes.push(Element::new(bounds, Some(parent)));
        self.nodes[parent.0].children.push(id);
        Some(id)
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.nodes.get(id.0)
    }

    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.nodes.get_mut(id.0)
    }

    /// Child ids of `id`, empty for unknown ids.
    pub fn children(&self, id: ElementId) -> &[ElementId] {
        self.nodes
            .get(id.0)
            .map(|node| node.children.as_slice())
            .unwrap_or(&[])
    }

    /// Internal infallible access; ids handed out by this tree are always
    /// valid since nodes are never removed.
    pub(crate) fn node(&self, id: ElementId) -> &Element {
        &self.nodes[id.0]
    }

    pub(crate) fn node_mut(&mut self, id: ElementId) -> &mut Element {
        &mut self.nodes[id.0]
    }

    pub fn set_hidden(&mut self, id: ElementId, hidden: bool) {
        if let Some(node) = self.nodes.get_mut(id.0)
            && node.hidden != hidden
        {
            node.hidden = hidden;
            node.needs_layout = true;
        }
    }

    /// Author an element's bounds.
    ///
    /// When every field is at or below `1.0` the rectangle is stored as
    /// parent-relative (fractional) bounds; otherwise it replaces the
    /// absolute bounds. Roots always store absolute bounds.
    pub fn set_bounds(&mut self, id: ElementId, bounds: Rect) {
        let Some(node) = self.nodes.get_mut(id.0) else {
            return;
        };

        let all_fractional = bounds.x <= 1.0
            && bounds.y <= 1.0
            && bounds.width <= 1.0
            && bounds.height <= 1.0;

        if all_fractional && node.parent.is_some() {
            node.set_relative_bounds(Some(bounds));
        } else {
            node.set_absolute_bounds(bounds);
        }
    }
}
