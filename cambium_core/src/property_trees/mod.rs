// Copyright 2026 the Cambium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The four shared property trees and the set that owns them.
//!
//! Layers never own a transform matrix, an opacity, a clip rectangle, or a
//! scroll offset. Instead each layer stores an index into each of the four
//! trees held by [`PropertyTrees`], and derives those values on demand by
//! looking the index up. Trees are arenas: nodes live in a `Vec` and refer
//! to their parent by index, with [`INVALID_NODE`] as the "none" sentinel.
//!
//! Nodes that belong to a specific layer record it in `owning_layer_id`;
//! [`PropertyTrees`] keeps a `layer id → node index` map per tree so that a
//! layer can find "its own" node even when its stored index points at an
//! ancestor's node.

mod clip;
mod effect;
mod scroll;
mod transform;

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use kurbo::Vec2;

use crate::geometry::ScrollOffset;
use crate::layer::LayerId;

pub use clip::{ClipNode, ClipTree};
pub use effect::{EffectNode, EffectTree, RenderSurface};
pub use scroll::{ScrollNode, ScrollTree};
pub use transform::{TransformNode, TransformTree};

/// Sentinel index meaning "no node".
pub const INVALID_NODE: u32 = u32::MAX;

/// Selects one of the four property trees.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TreeType {
    /// The transform tree.
    Transform,
    /// The effect tree.
    Effect,
    /// The clip tree.
    Clip,
    /// The scroll tree.
    Scroll,
}

/// Common shape of property-tree nodes.
pub trait TreeNode {
    /// Index of this node in its tree.
    fn id(&self) -> u32;
    /// Index of the parent node, or [`INVALID_NODE`] for a root.
    fn parent_id(&self) -> u32;
    /// The layer this node was created for, if any.
    fn owning_layer_id(&self) -> Option<LayerId>;
    /// Assigns the node's index on insertion.
    fn set_id(&mut self, id: u32);
}

/// Vec-backed arena of property-tree nodes.
#[derive(Clone, Debug)]
pub struct PropertyTree<N> {
    pub(crate) nodes: Vec<N>,
    needs_update: bool,
}

impl<N> Default for PropertyTree<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N> PropertyTree<N> {
    /// Creates an empty tree.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            nodes: Vec::new(),
            needs_update: false,
        }
    }

    /// Number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the tree has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the node at `index`, or `None` for [`INVALID_NODE`] and
    /// out-of-range indices.
    #[must_use]
    pub fn node(&self, index: u32) -> Option<&N> {
        if index == INVALID_NODE {
            return None;
        }
        self.nodes.get(index as usize)
    }

    /// Mutable variant of [`node`](Self::node).
    pub fn node_mut(&mut self, index: u32) -> Option<&mut N> {
        if index == INVALID_NODE {
            return None;
        }
        self.nodes.get_mut(index as usize)
    }

    /// All nodes, in index order.
    #[must_use]
    pub fn nodes(&self) -> &[N] {
        &self.nodes
    }

    /// Whether cached state in this tree must be recomputed.
    #[must_use]
    pub const fn needs_update(&self) -> bool {
        self.needs_update
    }

    /// Requests (or clears a request for) recomputation.
    pub fn set_needs_update(&mut self, needs_update: bool) {
        self.needs_update = needs_update;
    }
}

impl<N: TreeNode> PropertyTree<N> {
    /// Appends `node`, assigning its index.
    ///
    /// # Panics
    ///
    /// Panics if the node's parent is neither [`INVALID_NODE`] nor an
    /// existing node.
    pub(crate) fn insert(&mut self, mut node: N) -> u32 {
        let parent = node.parent_id();
        assert!(
            parent == INVALID_NODE || (parent as usize) < self.nodes.len(),
            "parent node {parent} must be inserted before its children"
        );
        assert!(
            self.nodes.len() < INVALID_NODE as usize,
            "property tree is full"
        );
        #[expect(
            clippy::cast_possible_truncation,
            reason = "length checked against INVALID_NODE above"
        )]
        let index = self.nodes.len() as u32;
        node.set_id(index);
        self.nodes.push(node);
        self.needs_update = true;
        index
    }
}

/// The transform, effect, clip, and scroll trees shared by every layer of a
/// [`LayerTree`](crate::tree::LayerTree).
#[derive(Debug)]
pub struct PropertyTrees {
    /// The transform tree.
    pub transform_tree: TransformTree,
    /// The effect tree.
    pub effect_tree: EffectTree,
    /// The clip tree.
    pub clip_tree: ClipTree,
    /// The scroll tree.
    pub scroll_tree: ScrollTree,
    /// Set when damage must cover the whole tree rather than individual
    /// layers.
    pub full_tree_damaged: bool,
    /// Whether layers draw into non-root render surfaces. When disabled,
    /// every layer's draw transform is its screen-space transform.
    pub non_root_surfaces_enabled: bool,

    layer_id_to_transform_node_index: BTreeMap<LayerId, u32>,
    layer_id_to_effect_node_index: BTreeMap<LayerId, u32>,
    layer_id_to_clip_node_index: BTreeMap<LayerId, u32>,
    layer_id_to_scroll_node_index: BTreeMap<LayerId, u32>,

    inner_viewport_container_bounds_delta: Vec2,
    outer_viewport_container_bounds_delta: Vec2,
    inner_viewport_scroll_bounds_delta: Vec2,
}

impl Default for PropertyTrees {
    fn default() -> Self {
        Self::new()
    }
}

impl PropertyTrees {
    /// Creates an empty set with non-root surfaces enabled.
    #[must_use]
    pub fn new() -> Self {
        Self {
            transform_tree: TransformTree::new(),
            effect_tree: EffectTree::new(),
            clip_tree: ClipTree::new(),
            scroll_tree: ScrollTree::new(),
            full_tree_damaged: false,
            non_root_surfaces_enabled: true,
            layer_id_to_transform_node_index: BTreeMap::new(),
            layer_id_to_effect_node_index: BTreeMap::new(),
            layer_id_to_clip_node_index: BTreeMap::new(),
            layer_id_to_scroll_node_index: BTreeMap::new(),
            inner_viewport_container_bounds_delta: Vec2::ZERO,
            outer_viewport_container_bounds_delta: Vec2::ZERO,
            inner_viewport_scroll_bounds_delta: Vec2::ZERO,
        }
    }

    /// Adds a transform node, registering it for its owning layer.
    pub fn add_transform_node(&mut self, node: TransformNode) -> u32 {
        let owner = node.owning_layer_id;
        let index = self.transform_tree.insert(node);
        if let Some(owner) = owner {
            self.layer_id_to_transform_node_index.insert(owner, index);
        }
        index
    }

    /// Adds an effect node, registering it for its owning layer.
    pub fn add_effect_node(&mut self, node: EffectNode) -> u32 {
        let owner = node.owning_layer_id;
        let index = self.effect_tree.insert(node);
        if let Some(owner) = owner {
            self.layer_id_to_effect_node_index.insert(owner, index);
        }
        index
    }

    /// Adds a clip node, registering it for its owning layer.
    pub fn add_clip_node(&mut self, node: ClipNode) -> u32 {
        let owner = node.owning_layer_id;
        let index = self.clip_tree.insert(node);
        if let Some(owner) = owner {
            self.layer_id_to_clip_node_index.insert(owner, index);
        }
        index
    }

    /// Adds a scroll node, registering it for its owning layer.
    pub fn add_scroll_node(&mut self, node: ScrollNode) -> u32 {
        let owner = node.owning_layer_id;
        let index = self.scroll_tree.insert(node);
        if let Some(owner) = owner {
            self.layer_id_to_scroll_node_index.insert(owner, index);
        }
        index
    }

    fn id_map(&self, tree: TreeType) -> &BTreeMap<LayerId, u32> {
        match tree {
            TreeType::Transform => &self.layer_id_to_transform_node_index,
            TreeType::Effect => &self.layer_id_to_effect_node_index,
            TreeType::Clip => &self.layer_id_to_clip_node_index,
            TreeType::Scroll => &self.layer_id_to_scroll_node_index,
        }
    }

    /// Returns whether `layer` owns a node in `tree`.
    #[must_use]
    pub fn is_in_id_to_index_map(&self, tree: TreeType, layer: LayerId) -> bool {
        self.id_map(tree).contains_key(&layer)
    }

    /// Returns the index of the node `layer` owns in `tree`.
    #[must_use]
    pub fn node_index_for_layer(&self, tree: TreeType, layer: LayerId) -> Option<u32> {
        self.id_map(tree).get(&layer).copied()
    }

    /// Records the inner viewport container's bounds delta.
    pub fn set_inner_viewport_container_bounds_delta(&mut self, delta: Vec2) {
        self.inner_viewport_container_bounds_delta = delta;
        self.transform_tree.set_needs_update(true);
    }

    /// Records the outer viewport container's bounds delta.
    pub fn set_outer_viewport_container_bounds_delta(&mut self, delta: Vec2) {
        self.outer_viewport_container_bounds_delta = delta;
        self.transform_tree.set_needs_update(true);
    }

    /// Records the inner viewport scroll layer's bounds delta.
    pub fn set_inner_viewport_scroll_bounds_delta(&mut self, delta: Vec2) {
        self.inner_viewport_scroll_bounds_delta = delta;
    }

    /// The inner viewport container's bounds delta.
    #[must_use]
    pub const fn inner_viewport_container_bounds_delta(&self) -> Vec2 {
        self.inner_viewport_container_bounds_delta
    }

    /// The outer viewport container's bounds delta.
    #[must_use]
    pub const fn outer_viewport_container_bounds_delta(&self) -> Vec2 {
        self.outer_viewport_container_bounds_delta
    }

    /// The inner viewport scroll layer's bounds delta.
    #[must_use]
    pub const fn inner_viewport_scroll_bounds_delta(&self) -> Vec2 {
        self.inner_viewport_scroll_bounds_delta
    }

    /// The largest offset the scroll node at `scroll_index` can reach.
    ///
    /// Content bounds minus container bounds, each adjusted by the viewport
    /// bounds deltas when the node plays a viewport role, floored at zero.
    /// Missing and non-scrollable nodes yield zero.
    #[must_use]
    pub fn max_scroll_offset(&self, scroll_index: u32) -> ScrollOffset {
        let Some(node) = self.scroll_tree.node(scroll_index) else {
            return ScrollOffset::ZERO;
        };
        if !node.scrollable {
            return ScrollOffset::ZERO;
        }

        let mut container = node.container_bounds.to_kurbo().to_vec2();
        let mut content = node.bounds.to_kurbo().to_vec2();
        if node.is_inner_viewport_scroll_layer {
            container += self.inner_viewport_container_bounds_delta;
            content += self.inner_viewport_scroll_bounds_delta;
        } else if node.is_outer_viewport_scroll_layer {
            container += self.outer_viewport_container_bounds_delta;
        }

        ScrollOffset::new(
            (content.x - container.x).max(0.0),
            (content.y - container.y).max(0.0),
        )
    }

    /// Clamps `offset` componentwise into `[0, max_scroll_offset]`.
    #[must_use]
    pub fn clamp_scroll_offset(&self, scroll_index: u32, offset: ScrollOffset) -> ScrollOffset {
        let max = self.max_scroll_offset(scroll_index);
        ScrollOffset::new(offset.x.min(max.x).max(0.0), offset.y.min(max.y).max(0.0))
    }

    /// Scrolls the node at `scroll_index` by `delta`.
    ///
    /// Axes the user cannot scroll are ignored and the result is clamped to
    /// the scroll limits. Returns the delta actually applied and, if the
    /// stored offset changed, the layer that owns the node.
    pub fn scroll_by(&mut self, scroll_index: u32, delta: Vec2) -> (Vec2, Option<LayerId>) {
        let Some(node) = self.scroll_tree.node(scroll_index) else {
            return (Vec2::ZERO, None);
        };
        let Some(owner) = node.owning_layer_id else {
            return (Vec2::ZERO, None);
        };
        let mut adjusted = delta;
        if !node.user_scrollable_horizontal {
            adjusted.x = 0.0;
        }
        if !node.user_scrollable_vertical {
            adjusted.y = 0.0;
        }

        let old = self.scroll_tree.current_scroll_offset(owner);
        let new = self.clamp_scroll_offset(scroll_index, old + adjusted);
        let changed = self.scroll_tree.set_scroll_offset(owner, new);
        (new - old, changed.then_some(owner))
    }

    /// Recomputes cached transform and effect state for every dirty node.
    pub fn update(&mut self) {
        self.transform_tree.update_transforms();
        self.effect_tree.update_effects();
        self.clip_tree.set_needs_update(false);
    }

    /// Clears per-node change flags and full-tree damage after a frame has
    /// consumed them.
    pub fn reset_change_tracking(&mut self) {
        self.transform_tree.reset_change_tracking();
        self.effect_tree.reset_change_tracking();
        self.full_tree_damaged = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::IntSize;

    fn layer(id: i32) -> LayerId {
        LayerId::new(id)
    }

    fn scroller(trees: &mut PropertyTrees, owner: LayerId) -> u32 {
        trees.add_scroll_node(ScrollNode {
            owning_layer_id: Some(owner),
            scrollable: true,
            container_bounds: IntSize::new(100, 100),
            bounds: IntSize::new(300, 200),
            ..ScrollNode::default()
        })
    }

    #[test]
    fn node_lookup_handles_sentinel_and_range() {
        let mut trees = PropertyTrees::new();
        let root = trees.add_clip_node(ClipNode::default());
        assert!(trees.clip_tree.node(root).is_some());
        assert!(trees.clip_tree.node(INVALID_NODE).is_none());
        assert!(trees.clip_tree.node(root + 1).is_none());
    }

    #[test]
    #[should_panic(expected = "must be inserted before its children")]
    fn child_before_parent_panics() {
        let mut trees = PropertyTrees::new();
        let _ = trees.add_clip_node(ClipNode {
            parent_id: 3,
            ..ClipNode::default()
        });
    }

    #[test]
    fn owned_nodes_are_registered_by_layer() {
        let mut trees = PropertyTrees::new();
        let a = layer(1);
        let b = layer(2);
        let _root = trees.add_effect_node(EffectNode::default());
        let owned = trees.add_effect_node(EffectNode {
            parent_id: 0,
            owning_layer_id: Some(a),
            ..EffectNode::default()
        });
        assert!(trees.is_in_id_to_index_map(TreeType::Effect, a));
        assert!(!trees.is_in_id_to_index_map(TreeType::Effect, b));
        assert!(!trees.is_in_id_to_index_map(TreeType::Transform, a));
        assert_eq!(trees.node_index_for_layer(TreeType::Effect, a), Some(owned));
    }

    #[test]
    fn max_scroll_offset_is_content_minus_container() {
        let mut trees = PropertyTrees::new();
        let idx = scroller(&mut trees, layer(4));
        assert_eq!(trees.max_scroll_offset(idx), ScrollOffset::new(200.0, 100.0));
        assert_eq!(trees.max_scroll_offset(INVALID_NODE), ScrollOffset::ZERO);
    }

    #[test]
    fn inner_viewport_deltas_adjust_max_scroll_offset() {
        let mut trees = PropertyTrees::new();
        let idx = trees.add_scroll_node(ScrollNode {
            owning_layer_id: Some(layer(4)),
            scrollable: true,
            container_bounds: IntSize::new(100, 100),
            bounds: IntSize::new(300, 200),
            is_inner_viewport_scroll_layer: true,
            ..ScrollNode::default()
        });
        trees.set_inner_viewport_container_bounds_delta(Vec2::new(0.0, 20.0));
        trees.set_inner_viewport_scroll_bounds_delta(Vec2::new(10.0, 0.0));
        assert_eq!(trees.max_scroll_offset(idx), ScrollOffset::new(210.0, 80.0));
    }

    #[test]
    fn clamp_scroll_offset_stays_within_limits() {
        let mut trees = PropertyTrees::new();
        let idx = scroller(&mut trees, layer(4));
        let max = trees.max_scroll_offset(idx);
        for candidate in [
            ScrollOffset::new(-50.0, -1.0),
            ScrollOffset::new(1_000.0, 50.0),
            ScrollOffset::new(20.0, 5_000.0),
            ScrollOffset::new(f64::MAX, f64::MIN),
        ] {
            let clamped = trees.clamp_scroll_offset(idx, candidate);
            assert!((0.0..=max.x).contains(&clamped.x), "{clamped:?}");
            assert!((0.0..=max.y).contains(&clamped.y), "{clamped:?}");
        }
    }

    #[test]
    fn scroll_by_returns_applied_delta() {
        let mut trees = PropertyTrees::new();
        let owner = layer(4);
        let idx = scroller(&mut trees, owner);

        let (applied, scrolled) = trees.scroll_by(idx, Vec2::new(50.0, 150.0));
        assert_eq!(scrolled, Some(owner));
        assert_eq!(applied, Vec2::new(50.0, 100.0));
        assert_eq!(
            trees.scroll_tree.current_scroll_offset(owner),
            ScrollOffset::new(50.0, 100.0)
        );

        let (applied, scrolled) = trees.scroll_by(idx, Vec2::new(0.0, 10.0));
        assert_eq!(scrolled, None);
        assert_eq!(applied, Vec2::ZERO);
    }

    #[test]
    fn scroll_by_ignores_axes_the_user_cannot_scroll() {
        let mut trees = PropertyTrees::new();
        let owner = layer(4);
        let idx = scroller(&mut trees, owner);
        trees.scroll_tree.node_mut(idx).unwrap().user_scrollable_vertical = false;

        let (applied, _) = trees.scroll_by(idx, Vec2::new(10.0, 10.0));
        assert_eq!(applied, Vec2::new(10.0, 0.0));
    }

    #[test]
    fn reset_change_tracking_clears_full_tree_damage() {
        let mut trees = PropertyTrees::new();
        trees.full_tree_damaged = true;
        trees.reset_change_tracking();
        assert!(!trees.full_tree_damaged);
    }
}
