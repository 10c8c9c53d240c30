// Copyright 2026 the Cambium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Transform tree: local transforms and cached screen-space composition.

use alloc::vec::Vec;

use kurbo::Vec2;
use understory_dirty::{CycleHandling, DirtyTracker, EagerPolicy};

use super::{INVALID_NODE, PropertyTree, TreeNode};
use crate::dirty;
use crate::geometry::ScrollOffset;
use crate::layer::LayerId;
use crate::transform::Transform3d;

/// A node of the [`TransformTree`].
#[derive(Clone, Debug, PartialEq)]
pub struct TransformNode {
    /// Index of this node (assigned on insertion).
    pub id: u32,
    /// Index of the parent node, or [`INVALID_NODE`].
    pub parent_id: u32,
    /// Layer this node was created for, if any.
    pub owning_layer_id: Option<LayerId>,

    /// The node's own transform.
    pub local: Transform3d,
    /// Translation from this node's space into its parent's, applied after
    /// `local`.
    pub post_translation: Vec2,
    /// Current scroll offset, subtracted from `post_translation`.
    pub scroll_offset: ScrollOffset,
    /// Whether the inherited screen transform is flattened before composing.
    pub flattens_inherited_transform: bool,
    /// 3-D sorting context; zero means "not 3-D sorted".
    pub sorting_context_id: i32,
    /// Whether an ancestor (or this node) applies the page scale.
    pub in_subtree_of_page_scale_layer: bool,

    /// A transform animation is running right now.
    pub is_currently_animating: bool,
    /// A transform animation exists that may run.
    pub has_potential_animation: bool,
    /// Every transform animation on this node is a pure translation.
    pub has_only_translation_animations: bool,

    /// `to_parent` must be rebuilt from `local`, `post_translation`, and
    /// `scroll_offset`.
    pub needs_local_transform_update: bool,
    /// The node's transform changed since change tracking was last reset.
    pub transform_changed: bool,

    /// Cached: maps this node's space into its parent's.
    pub to_parent: Transform3d,
    /// Cached: maps this node's space into screen space.
    pub to_screen: Transform3d,
    /// Cached: every `to_parent` from the root down to this node is an
    /// integer translation.
    pub node_and_ancestors_have_only_integer_translation: bool,
}

impl Default for TransformNode {
    fn default() -> Self {
        Self {
            id: INVALID_NODE,
            parent_id: INVALID_NODE,
            owning_layer_id: None,
            local: Transform3d::IDENTITY,
            post_translation: Vec2::ZERO,
            scroll_offset: ScrollOffset::ZERO,
            flattens_inherited_transform: false,
            sorting_context_id: 0,
            in_subtree_of_page_scale_layer: false,
            is_currently_animating: false,
            has_potential_animation: false,
            has_only_translation_animations: true,
            needs_local_transform_update: true,
            transform_changed: false,
            to_parent: Transform3d::IDENTITY,
            to_screen: Transform3d::IDENTITY,
            node_and_ancestors_have_only_integer_translation: true,
        }
    }
}

impl TreeNode for TransformNode {
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

/// Tree of [`TransformNode`]s with dirty-driven recomputation of cached
/// screen transforms.
#[derive(Debug)]
pub struct TransformTree {
    tree: PropertyTree<TransformNode>,
    dirty: DirtyTracker<u32>,
}

impl Default for TransformTree {
    fn default() -> Self {
        Self::new()
    }
}

impl TransformTree {
    /// Creates an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tree: PropertyTree::new(),
            dirty: DirtyTracker::with_cycle_handling(CycleHandling::Error),
        }
    }

    pub(crate) fn insert(&mut self, node: TransformNode) -> u32 {
        let parent = node.parent_id;
        let index = self.tree.insert(node);
        if parent != INVALID_NODE {
            let _ = self.dirty.add_dependency(index, parent, dirty::TRANSFORM);
        }
        self.dirty.mark_with(index, dirty::TRANSFORM, &EagerPolicy);
        index
    }

    /// Returns the node at `index`.
    #[must_use]
    pub fn node(&self, index: u32) -> Option<&TransformNode> {
        self.tree.node(index)
    }

    /// Returns the node at `index` for mutation.
    ///
    /// Changing fields that feed `to_parent` requires setting
    /// `needs_local_transform_update` so the next
    /// [`update_transforms`](Self::update_transforms) picks the node up.
    pub fn node_mut(&mut self, index: u32) -> Option<&mut TransformNode> {
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

    /// Replaces a node's local transform.
    ///
    /// Returns `false` (and marks nothing) if the node is missing or the
    /// transform is unchanged.
    pub fn set_local(&mut self, index: u32, local: Transform3d) -> bool {
        let Some(node) = self.tree.node_mut(index) else {
            return false;
        };
        if node.local == local {
            return false;
        }
        node.local = local;
        node.needs_local_transform_update = true;
        node.transform_changed = true;
        self.dirty.mark_with(index, dirty::TRANSFORM, &EagerPolicy);
        self.tree.set_needs_update(true);
        true
    }

    /// Recomputes `to_parent`, `to_screen`, and the integer-translation flag
    /// for every node whose local state changed and for their descendants.
    ///
    /// Returns the recomputed node indices in ascending order.
    pub fn update_transforms(&mut self) -> Vec<u32> {
        for node in &self.tree.nodes {
            if node.needs_local_transform_update {
                self.dirty.mark_with(node.id, dirty::TRANSFORM, &EagerPolicy);
            }
        }

        let mut affected: Vec<u32> = self
            .dirty
            .drain(dirty::TRANSFORM)
            .affected()
            .deterministic()
            .run()
            .collect();
        affected.sort_unstable();

        for &index in &affected {
            let node = &self.tree.nodes[index as usize];
            let (parent_screen, parent_integer) = match self.tree.node(node.parent_id) {
                Some(parent) if node.flattens_inherited_transform => (
                    parent.to_screen.flatten_to_2d(),
                    parent.node_and_ancestors_have_only_integer_translation,
                ),
                Some(parent) => (
                    parent.to_screen,
                    parent.node_and_ancestors_have_only_integer_translation,
                ),
                None => (Transform3d::IDENTITY, true),
            };
            let to_parent =
                Transform3d::from_offset(node.post_translation - node.scroll_offset) * node.local;

            let node = &mut self.tree.nodes[index as usize];
            node.to_parent = to_parent;
            node.to_screen = parent_screen * to_parent;
            node.node_and_ancestors_have_only_integer_translation =
                parent_integer && to_parent.is_integer_translation();
            node.needs_local_transform_update = false;
        }

        self.tree.set_needs_update(false);
        affected
    }

    /// The cached screen-space transform of a node; identity for a missing
    /// node.
    #[must_use]
    pub fn to_screen(&self, index: u32) -> Transform3d {
        self.node(index)
            .map_or(Transform3d::IDENTITY, |node| node.to_screen)
    }

    /// Maps node `index`'s space into the space of its ancestor `target`.
    ///
    /// Composes cached `to_parent` transforms up the ancestor chain. If
    /// `target` is [`INVALID_NODE`] or not an ancestor of `index`, returns
    /// the screen-space transform instead.
    #[must_use]
    pub fn to_target(&self, index: u32, target: u32) -> Transform3d {
        if target == INVALID_NODE {
            return self.to_screen(index);
        }
        let mut xform = Transform3d::IDENTITY;
        let mut current = index;
        while current != target {
            let Some(node) = self.node(current) else {
                return self.to_screen(index);
            };
            xform = node.to_parent * xform;
            current = node.parent_id;
        }
        xform
    }

    /// Clears `transform_changed` on every node.
    pub fn reset_change_tracking(&mut self) {
        for node in &mut self.tree.nodes {
            node.transform_changed = false;
        }
    }
}
