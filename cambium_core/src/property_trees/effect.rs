// Copyright 2026 the Cambium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Effect tree: opacity, render surfaces, and render targets.

use alloc::vec::Vec;

use kurbo::Vec2;
use understory_dirty::{CycleHandling, DirtyTracker, EagerPolicy};

use super::{INVALID_NODE, PropertyTree, TreeNode};
use crate::dirty;
use crate::geometry::IntRect;
use crate::layer::LayerId;

/// A node of the [`EffectTree`].
#[derive(Clone, Debug, PartialEq)]
pub struct EffectNode {
    /// Index of this node (assigned on insertion).
    pub id: u32,
    /// Index of the parent node, or [`INVALID_NODE`].
    pub parent_id: u32,
    /// Layer this node was created for, if any.
    pub owning_layer_id: Option<LayerId>,
    /// Transform node whose space the effect is applied in.
    pub transform_id: u32,

    /// The node's own opacity.
    pub opacity: f32,
    /// Cached: product of the opacities from the root down to this node.
    pub screen_space_opacity: f32,
    /// Whether this node's subtree draws into its own render surface.
    pub has_render_surface: bool,
    /// Cached: the node whose render surface this node draws into.
    pub target_id: u32,
    /// Scale at which the surface's contents are rasterized.
    pub surface_contents_scale: Vec2,
    /// Copy-output requests attached to this node and its descendants.
    pub num_copy_requests_in_subtree: u32,

    /// An opacity animation is running right now.
    pub is_currently_animating_opacity: bool,
    /// An opacity animation exists that may run.
    pub has_potential_opacity_animation: bool,
    /// A filter animation is running right now.
    pub is_currently_animating_filter: bool,
    /// A filter animation exists that may run.
    pub has_potential_filter_animation: bool,

    /// The node's effect changed since change tracking was last reset.
    pub effect_changed: bool,
}

impl Default for EffectNode {
    fn default() -> Self {
        Self {
            id: INVALID_NODE,
            parent_id: INVALID_NODE,
            owning_layer_id: None,
            transform_id: INVALID_NODE,
            opacity: 1.0,
            screen_space_opacity: 1.0,
            has_render_surface: false,
            target_id: INVALID_NODE,
            surface_contents_scale: Vec2::new(1.0, 1.0),
            num_copy_requests_in_subtree: 0,
            is_currently_animating_opacity: false,
            has_potential_opacity_animation: false,
            is_currently_animating_filter: false,
            has_potential_filter_animation: false,
            effect_changed: false,
        }
    }
}

impl TreeNode for EffectNode {
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

/// An offscreen target that an effect node's subtree draws into.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderSurface {
    /// The effect node that owns the surface.
    pub effect_index: u32,
    /// The layer that owns that effect node, if any.
    pub owning_layer_id: Option<LayerId>,
    /// Area of the surface that receives content, in target space.
    pub content_rect: IntRect,
}

/// Tree of [`EffectNode`]s with their render surfaces.
#[derive(Debug)]
pub struct EffectTree {
    tree: PropertyTree<EffectNode>,
    surfaces: Vec<Option<RenderSurface>>,
    dirty: DirtyTracker<u32>,
}

impl Default for EffectTree {
    fn default() -> Self {
        Self::new()
    }
}

impl EffectTree {
    /// Creates an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tree: PropertyTree::new(),
            surfaces: Vec::new(),
            dirty: DirtyTracker::with_cycle_handling(CycleHandling::Error),
        }
    }

    pub(crate) fn insert(&mut self, node: EffectNode) -> u32 {
        let parent = node.parent_id;
        let surface = node.has_render_surface.then(|| RenderSurface {
            effect_index: 0,
            owning_layer_id: node.owning_layer_id,
            content_rect: IntRect::EMPTY,
        });
        let index = self.tree.insert(node);
        self.surfaces.push(surface.map(|s| RenderSurface {
            effect_index: index,
            ..s
        }));
        if parent != INVALID_NODE {
            let _ = self.dirty.add_dependency(index, parent, dirty::EFFECT);
        }
        self.dirty.mark_with(index, dirty::EFFECT, &EagerPolicy);
        index
    }

    /// Returns the node at `index`.
    #[must_use]
    pub fn node(&self, index: u32) -> Option<&EffectNode> {
        self.tree.node(index)
    }

    /// Returns the node at `index` for mutation.
    ///
    /// Use [`set_opacity`](Self::set_opacity) and
    /// [`set_has_render_surface`](Self::set_has_render_surface) for fields
    /// that feed cached state.
    pub fn node_mut(&mut self, index: u32) -> Option<&mut EffectNode> {
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

    /// Sets a node's own opacity. Returns whether anything changed.
    pub fn set_opacity(&mut self, index: u32, opacity: f32) -> bool {
        let Some(node) = self.tree.node_mut(index) else {
            return false;
        };
        if node.opacity == opacity {
            return false;
        }
        node.opacity = opacity;
        node.effect_changed = true;
        self.dirty.mark_with(index, dirty::EFFECT, &EagerPolicy);
        self.tree.set_needs_update(true);
        true
    }

    /// Gives a node its own render surface, or takes it away. Returns
    /// whether anything changed.
    pub fn set_has_render_surface(&mut self, index: u32, has_surface: bool) -> bool {
        let Some(node) = self.tree.node_mut(index) else {
            return false;
        };
        if node.has_render_surface == has_surface {
            return false;
        }
        node.has_render_surface = has_surface;
        node.effect_changed = true;
        let owner = node.owning_layer_id;
        self.surfaces[index as usize] = has_surface.then_some(RenderSurface {
            effect_index: index,
            owning_layer_id: owner,
            content_rect: IntRect::EMPTY,
        });
        self.dirty.mark_with(index, dirty::EFFECT, &EagerPolicy);
        self.tree.set_needs_update(true);
        true
    }

    /// The render surface owned by node `index`, if it has one.
    #[must_use]
    pub fn render_surface(&self, index: u32) -> Option<&RenderSurface> {
        if index == INVALID_NODE {
            return None;
        }
        self.surfaces.get(index as usize)?.as_ref()
    }

    /// Mutable variant of [`render_surface`](Self::render_surface).
    pub fn render_surface_mut(&mut self, index: u32) -> Option<&mut RenderSurface> {
        if index == INVALID_NODE {
            return None;
        }
        self.surfaces.get_mut(index as usize)?.as_mut()
    }

    /// Recomputes screen-space opacity and render targets for every node
    /// whose effect changed and for their descendants.
    ///
    /// The root targets itself. Any other node targets its parent when the
    /// parent owns a surface, and otherwise inherits the parent's target.
    ///
    /// Returns the recomputed node indices in ascending order.
    pub fn update_effects(&mut self) -> Vec<u32> {
        let mut affected: Vec<u32> = self
            .dirty
            .drain(dirty::EFFECT)
            .affected()
            .deterministic()
            .run()
            .collect();
        affected.sort_unstable();

        for &index in &affected {
            let node = &self.tree.nodes[index as usize];
            let (parent_opacity, target) = match self.tree.node(node.parent_id) {
                Some(parent) if parent.has_render_surface => {
                    (parent.screen_space_opacity, parent.id)
                }
                Some(parent) => (parent.screen_space_opacity, parent.target_id),
                None => (1.0, index),
            };
            let node = &mut self.tree.nodes[index as usize];
            node.screen_space_opacity = parent_opacity * node.opacity;
            node.target_id = target;
        }

        self.tree.set_needs_update(false);
        affected
    }

    /// Clears `effect_changed` on every node.
    pub fn reset_change_tracking(&mut self) {
        for node in &mut self.tree.nodes {
            node.effect_changed = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree_with_surface() -> (EffectTree, u32, u32, u32) {
        let mut tree = EffectTree::new();
        let root = tree.insert(EffectNode {
            has_render_surface: true,
            ..EffectNode::default()
        });
        let surface = tree.insert(EffectNode {
            parent_id: root,
            opacity: 0.5,
            has_render_surface: true,
            ..EffectNode::default()
        });
        let leaf = tree.insert(EffectNode {
            parent_id: surface,
            opacity: 0.5,
            ..EffectNode::default()
        });
        let _ = tree.update_effects();
        (tree, root, surface, leaf)
    }

    #[test]
    fn screen_space_opacity_multiplies_down() {
        let (tree, root, surface, leaf) = tree_with_surface();
        assert_eq!(tree.node(root).unwrap().screen_space_opacity, 1.0);
        assert_eq!(tree.node(surface).unwrap().screen_space_opacity, 0.5);
        assert_eq!(tree.node(leaf).unwrap().screen_space_opacity, 0.25);
    }

    #[test]
    fn targets_follow_nearest_surface() {
        let (tree, root, surface, leaf) = tree_with_surface();
        assert_eq!(tree.node(root).unwrap().target_id, root);
        assert_eq!(tree.node(surface).unwrap().target_id, root);
        assert_eq!(tree.node(leaf).unwrap().target_id, surface);
        assert_eq!(tree.render_surface(surface).unwrap().effect_index, surface);
        assert!(tree.render_surface(leaf).is_none());
        assert!(tree.render_surface(INVALID_NODE).is_none());
    }

    #[test]
    fn removing_a_surface_retargets_descendants() {
        let (mut tree, root, surface, leaf) = tree_with_surface();
        assert!(tree.set_has_render_surface(surface, false));
        assert!(tree.needs_update());
        let _ = tree.update_effects();
        assert_eq!(tree.node(leaf).unwrap().target_id, root);
        assert!(tree.render_surface(surface).is_none());
    }

    #[test]
    fn set_opacity_propagates() {
        let (mut tree, _, surface, leaf) = tree_with_surface();
        assert!(tree.set_opacity(surface, 1.0));
        assert!(!tree.set_opacity(surface, 1.0));
        let updated = tree.update_effects();
        assert_eq!(updated, [surface, leaf]);
        assert_eq!(tree.node(leaf).unwrap().screen_space_opacity, 0.5);

        tree.reset_change_tracking();
        assert!(!tree.node(surface).unwrap().effect_changed);
    }
}
