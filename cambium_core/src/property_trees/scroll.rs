// Copyright 2026 the Cambium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scroll tree and the synced scroll offsets.

use alloc::collections::BTreeMap;

use super::{INVALID_NODE, PropertyTree, TreeNode};
use crate::geometry::{IntSize, ScrollOffset};
use crate::layer::LayerId;

/// A node of the [`ScrollTree`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScrollNode {
    /// Index of this node (assigned on insertion).
    pub id: u32,
    /// Index of the parent node, or [`INVALID_NODE`].
    pub parent_id: u32,
    /// Layer this node was created for, if any.
    pub owning_layer_id: Option<LayerId>,
    /// Transform node that the scroll offset is applied to.
    pub transform_id: u32,
    /// Whether the node scrolls at all.
    pub scrollable: bool,
    /// Size of the visible window onto the content.
    pub container_bounds: IntSize,
    /// Size of the scrolled content.
    pub bounds: IntSize,
    /// Whether user input may scroll horizontally.
    pub user_scrollable_horizontal: bool,
    /// Whether user input may scroll vertically.
    pub user_scrollable_vertical: bool,
    /// This node scrolls the inner (visual) viewport.
    pub is_inner_viewport_scroll_layer: bool,
    /// This node scrolls the outer (layout) viewport.
    pub is_outer_viewport_scroll_layer: bool,
}

impl Default for ScrollNode {
    fn default() -> Self {
        Self {
            id: INVALID_NODE,
            parent_id: INVALID_NODE,
            owning_layer_id: None,
            transform_id: INVALID_NODE,
            scrollable: false,
            container_bounds: IntSize::ZERO,
            bounds: IntSize::ZERO,
            user_scrollable_horizontal: true,
            user_scrollable_vertical: true,
            is_inner_viewport_scroll_layer: false,
            is_outer_viewport_scroll_layer: false,
        }
    }
}

impl TreeNode for ScrollNode {
    fn id(&self) -> u32 {
        self.id
    }

    fn parent_id(&self) -> u32 {
        self.parent_id
    }

    fn owning_layer_id(&self) -> Option<LayerId> {
        self.owning_layer_id
    }

    fn set_id(&mut self, id: u32) {
        self.id = id;
    }
}

/// Tree of [`ScrollNode`]s plus the current offset of every scrolling
/// layer.
///
/// Offsets are keyed by layer rather than by node, so they survive a
/// rebuild of the node arena.
#[derive(Clone, Debug, Default)]
pub struct ScrollTree {
    tree: PropertyTree<ScrollNode>,
    offsets: BTreeMap<LayerId, ScrollOffset>,
}

impl ScrollTree {
    /// Creates an empty tree.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            tree: PropertyTree::new(),
            offsets: BTreeMap::new(),
        }
    }

    pub(crate) fn insert(&mut self, node: ScrollNode) -> u32 {
        self.tree.insert(node)
    }

    /// Returns the node at `index`.
    #[must_use]
    pub fn node(&self, index: u32) -> Option<&ScrollNode> {
        self.tree.node(index)
    }

    /// Returns the node at `index` for mutation.
    pub fn node_mut(&mut self, index: u32) -> Option<&mut ScrollNode> {
        self.tree.node_mut(index)
    }

    /// Number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// Returns `true` if the tree has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Whether cached state must be recomputed.
    #[must_use]
    pub const fn needs_update(&self) -> bool {
        self.tree.needs_update()
    }

    /// Requests (or clears a request for) recomputation.
    pub fn set_needs_update(&mut self, needs_update: bool) {
        self.tree.set_needs_update(needs_update);
    }

    /// The current scroll offset of `layer`; zero if it never scrolled.
    #[must_use]
    pub fn current_scroll_offset(&self, layer: LayerId) -> ScrollOffset {
        self.offsets
            .get(&layer)
            .copied()
            .unwrap_or(ScrollOffset::ZERO)
    }

    /// Stores the scroll offset of `layer`. Returns whether it changed.
    pub fn set_scroll_offset(&mut self, layer: LayerId, offset: ScrollOffset) -> bool {
        let old = self.current_scroll_offset(layer);
        if old == offset {
            return false;
        }
        self.offsets.insert(layer, offset);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets_default_to_zero_and_report_changes() {
        let mut tree = ScrollTree::new();
        let layer = LayerId::new(3);
        assert_eq!(tree.current_scroll_offset(layer), ScrollOffset::ZERO);
        assert!(!tree.set_scroll_offset(layer, ScrollOffset::ZERO));
        assert!(tree.set_scroll_offset(layer, ScrollOffset::new(1.0, 2.0)));
        assert!(!tree.set_scroll_offset(layer, ScrollOffset::new(1.0, 2.0)));
        assert_eq!(
            tree.current_scroll_offset(layer),
            ScrollOffset::new(1.0, 2.0)
        );
    }

    #[test]
    fn nodes_default_to_user_scrollable() {
        let node = ScrollNode::default();
        assert!(node.user_scrollable_horizontal);
        assert!(node.user_scrollable_vertical);
        assert!(!node.scrollable);
    }
}
