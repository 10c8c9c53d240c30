// Copyright 2026 the Cambium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scroll offsets, limits, and their transform-tree mirror.

use kurbo::Vec2;

use super::{Active, LayerTree, TreePhase};
use crate::geometry::ScrollOffset;
use crate::layer::LayerId;
use crate::trace::ScrollOffsetEvent;

impl<P: TreePhase> LayerTree<P> {
    /// The synced scroll offset of `id`.
    #[must_use]
    pub fn current_scroll_offset(&self, id: LayerId) -> ScrollOffset {
        self.property_trees.scroll_tree.current_scroll_offset(id)
    }

    /// Alias of [`current_scroll_offset`](Self::current_scroll_offset) used
    /// as the starting point of scroll-offset animations.
    #[must_use]
    pub fn scroll_offset_for_animation(&self, id: LayerId) -> ScrollOffset {
        self.current_scroll_offset(id)
    }

    /// The largest scroll offset the layer's scroll node allows.
    #[must_use]
    pub fn max_scroll_offset(&self, id: LayerId) -> ScrollOffset {
        self.property_trees
            .max_scroll_offset(self.layer(id).scroll_tree_index)
    }

    /// Clamps `offset` componentwise into `[0, max_scroll_offset(id)]`.
    #[must_use]
    pub fn clamp_scroll_offset_to_limits(&self, id: LayerId, offset: ScrollOffset) -> ScrollOffset {
        self.property_trees
            .clamp_scroll_offset(self.layer(id).scroll_tree_index, offset)
    }

    /// Scrolls the layer's scroll node by `delta` and returns the delta
    /// actually applied.
    ///
    /// The applied delta differs from `delta` when an axis is not user
    /// scrollable or the result hits a scroll limit. The offset update is
    /// reported for the layer owning the scroll node, which need not be
    /// `id`.
    pub fn scroll_by(&mut self, id: LayerId, delta: Vec2) -> Vec2 {
        let index = self.layer(id).scroll_tree_index;
        let (applied, scrolled) = self.property_trees.scroll_by(index, delta);
        if let Some(owner) = scrolled {
            self.did_scroll(owner);
        }
        applied
    }

    /// Scrolls back inside the limits if the current offset lies outside
    /// them, returning the correction applied.
    pub fn clamp_scroll_to_max_scroll_offset(&mut self, id: LayerId) -> Vec2 {
        let old = self.current_scroll_offset(id);
        let clamped = self.clamp_scroll_offset_to_limits(id, old);
        let delta = clamped - old;
        if delta != Vec2::ZERO {
            let _ = self.scroll_by(id, delta);
        }
        delta
    }

    /// Mirrors the layer's scroll offset into its transform node.
    ///
    /// Marks the node for a local-transform update only when the offset
    /// differs.
    pub fn update_property_tree_scroll_offset(&mut self, id: LayerId) {
        let index = self.layer(id).transform_tree_index;
        let current = self.current_scroll_offset(id);
        let transform_tree = &mut self.property_trees.transform_tree;
        let Some(node) = transform_tree.node_mut(index) else {
            return;
        };
        if node.scroll_offset == current {
            return;
        }
        node.scroll_offset = current;
        node.needs_local_transform_update = true;
        transform_tree.set_needs_update(true);
    }

    fn did_scroll(&mut self, id: LayerId) {
        self.did_update_scroll_offset(id);
        let offset = self.current_scroll_offset(id);
        self.tracer.scroll_offset(&ScrollOffsetEvent { layer: id, offset });
    }
}

impl LayerTree<Active> {
    /// Writes the synced scroll offset of `id`.
    ///
    /// A scroll-offset update is reported only when the stored value
    /// actually changed.
    pub fn set_current_scroll_offset(&mut self, id: LayerId, offset: ScrollOffset) {
        assert!(self.contains(id), "unknown layer {id:?}");
        if self
            .property_trees
            .scroll_tree
            .set_scroll_offset(id, offset)
        {
            self.did_scroll(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::IntSize;
    use crate::layer::LayerKind;
    use crate::property_trees::{ScrollNode, TransformNode};
    use crate::tree::Pending;

    fn id(raw: i32) -> LayerId {
        LayerId::new(raw)
    }

    /// Layer 2 scrolls 300x200 content inside layer 1's 100x100 clip.
    fn scrolling_tree<P: TreePhase>() -> LayerTree<P> {
        let mut tree = LayerTree::<P>::default();
        tree.create_layer(id(1), LayerKind::Base);
        tree.create_layer(id(2), LayerKind::Base);
        tree.set_scroll_clip_layer(id(2), Some(id(1)));

        let trees = tree.property_trees_mut();
        let transform = trees.add_transform_node(TransformNode {
            owning_layer_id: Some(id(2)),
            ..TransformNode::default()
        });
        let scroll = trees.add_scroll_node(ScrollNode {
            owning_layer_id: Some(id(2)),
            transform_id: transform,
            scrollable: true,
            container_bounds: IntSize::new(100, 100),
            bounds: IntSize::new(300, 200),
            ..ScrollNode::default()
        });
        let _ = trees.transform_tree.update_transforms();
        tree.set_transform_tree_index(id(2), transform);
        tree.set_scroll_tree_index(id(2), scroll);
        let _ = tree.take_scroll_state_updates();
        tree
    }

    #[test]
    fn scroll_by_reports_the_applied_delta() {
        let mut tree = scrolling_tree::<Pending>();
        let applied = tree.scroll_by(id(2), Vec2::new(-10.0, 150.0));
        assert_eq!(applied, Vec2::new(0.0, 100.0));
        assert_eq!(tree.current_scroll_offset(id(2)), ScrollOffset::new(0.0, 100.0));
        assert_eq!(tree.take_scroll_offset_updates(), [id(2)]);

        assert_eq!(tree.scroll_by(id(2), Vec2::new(0.0, 1.0)), Vec2::ZERO);
        assert!(tree.take_scroll_offset_updates().is_empty());
    }

    #[test]
    fn scrolling_through_a_shared_node_reports_its_owner() {
        let mut tree = scrolling_tree::<Pending>();
        tree.create_layer(id(3), LayerKind::Base);
        let index = tree.layer(id(2)).scroll_tree_index();
        tree.set_scroll_tree_index(id(3), index);

        let applied = tree.scroll_by(id(3), Vec2::new(0.0, 30.0));
        assert_eq!(applied, Vec2::new(0.0, 30.0));
        assert_eq!(tree.current_scroll_offset(id(2)), ScrollOffset::new(0.0, 30.0));
        assert_eq!(tree.current_scroll_offset(id(3)), ScrollOffset::ZERO);
        assert_eq!(tree.take_scroll_offset_updates(), [id(2)]);
    }

    #[test]
    fn clamp_to_limits_stays_in_range() {
        let tree = scrolling_tree::<Pending>();
        let max = tree.max_scroll_offset(id(2));
        assert_eq!(max, ScrollOffset::new(200.0, 100.0));
        for candidate in [
            ScrollOffset::new(-1.0, -1.0),
            ScrollOffset::new(250.0, 40.0),
            ScrollOffset::new(10.0, 1e9),
        ] {
            let clamped = tree.clamp_scroll_offset_to_limits(id(2), candidate);
            assert!((0.0..=max.x).contains(&clamped.x), "{clamped:?}");
            assert!((0.0..=max.y).contains(&clamped.y), "{clamped:?}");
        }
    }

    #[test]
    fn layer_without_a_scroll_node_cannot_scroll() {
        let mut tree = scrolling_tree::<Pending>();
        assert_eq!(tree.max_scroll_offset(id(1)), ScrollOffset::ZERO);
        assert_eq!(tree.scroll_by(id(1), Vec2::new(5.0, 5.0)), Vec2::ZERO);
    }

    #[test]
    fn set_current_scroll_offset_reports_only_changes() {
        let mut tree = scrolling_tree::<Active>();
        tree.set_current_scroll_offset(id(2), ScrollOffset::new(20.0, 30.0));
        assert_eq!(tree.take_scroll_offset_updates(), [id(2)]);
        assert_eq!(
            tree.scroll_offset_for_animation(id(2)),
            ScrollOffset::new(20.0, 30.0)
        );

        tree.set_current_scroll_offset(id(2), ScrollOffset::new(20.0, 30.0));
        assert!(tree.take_scroll_offset_updates().is_empty());
    }

    #[test]
    fn clamp_scroll_to_max_pulls_back_after_shrinking() {
        let mut tree = scrolling_tree::<Active>();
        tree.set_current_scroll_offset(id(2), ScrollOffset::new(150.0, 100.0));
        assert_eq!(tree.clamp_scroll_to_max_scroll_offset(id(2)), Vec2::ZERO);

        let index = tree.layer(id(2)).scroll_tree_index();
        tree.property_trees_mut()
            .scroll_tree
            .node_mut(index)
            .unwrap()
            .bounds = IntSize::new(200, 150);
        let delta = tree.clamp_scroll_to_max_scroll_offset(id(2));
        assert_eq!(delta, Vec2::new(-50.0, -50.0));
        assert_eq!(tree.current_scroll_offset(id(2)), ScrollOffset::new(100.0, 50.0));
    }

    #[test]
    fn scroll_offset_is_mirrored_into_the_transform_tree() {
        let mut tree = scrolling_tree::<Active>();
        let index = tree.layer(id(2)).transform_tree_index();
        tree.update_property_tree_scroll_offset(id(2));
        assert!(!tree.property_trees().transform_tree.needs_update());

        tree.set_current_scroll_offset(id(2), ScrollOffset::new(0.0, 40.0));
        tree.update_property_tree_scroll_offset(id(2));
        let transform_tree = &tree.property_trees().transform_tree;
        assert!(transform_tree.needs_update());
        let node = transform_tree.node(index).unwrap();
        assert_eq!(node.scroll_offset, ScrollOffset::new(0.0, 40.0));
        assert!(node.needs_local_transform_update);

        let _ = tree.property_trees_mut().transform_tree.update_transforms();
        assert_eq!(
            tree.screen_space_transform(id(2)).translation_2d(),
            Vec2::new(0.0, -40.0)
        );
    }
}
