// Copyright 2026 the Cambium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bridging between layers and the animation system.
//!
//! Queries go out to the tree's [`MutatorHost`] keyed by the layer's
//! element id and the tree's element list. A layer without an element id
//! has no animations. Notifications come back through
//! [`on_is_animating_changed`](LayerTree::on_is_animating_changed), which
//! writes the animation bits of the layer's transform and effect nodes.

use super::{LayerTree, TreePhase};
use crate::animation::{
    ElementListType, MutatorHost, PropertyAnimationState, TargetProperty,
};
use crate::geometry::Box3d;
use crate::layer::{ElementId, LayerId};
use crate::property_trees::TreeType;

impl<P: TreePhase> LayerTree<P> {
    /// The element list animation queries from this tree refer to.
    #[must_use]
    pub const fn element_list_type(&self) -> ElementListType {
        P::ELEMENT_LIST
    }

    fn with_element<T>(
        &self,
        id: LayerId,
        no_element: T,
        query: impl FnOnce(&dyn MutatorHost, ElementId) -> T,
    ) -> T {
        match self.layer(id).element_id {
            Some(element) => query(&*self.mutator_host, element),
            None => no_element,
        }
    }

    /// A transform animation is running on the layer.
    #[must_use]
    pub fn transform_is_animating(&self, id: LayerId) -> bool {
        self.with_element(id, false, |host, element| {
            host.is_animating_transform_property(element, P::ELEMENT_LIST)
        })
    }

    /// A transform animation exists on the layer that may run.
    #[must_use]
    pub fn has_potentially_running_transform_animation(&self, id: LayerId) -> bool {
        self.with_element(id, false, |host, element| {
            host.has_potentially_running_transform_animation(element, P::ELEMENT_LIST)
        })
    }

    /// A filter animation is running on the layer.
    #[must_use]
    pub fn filter_is_animating(&self, id: LayerId) -> bool {
        self.with_element(id, false, |host, element| {
            host.is_animating_filter_property(element, P::ELEMENT_LIST)
        })
    }

    /// A filter animation exists on the layer that may run.
    #[must_use]
    pub fn has_potentially_running_filter_animation(&self, id: LayerId) -> bool {
        self.with_element(id, false, |host, element| {
            host.has_potentially_running_filter_animation(element, P::ELEMENT_LIST)
        })
    }

    /// Every transform animation on the layer is a translation.
    #[must_use]
    pub fn has_only_translation_transforms(&self, id: LayerId) -> bool {
        self.with_element(id, true, |host, element| {
            host.has_only_translation_transforms(element, P::ELEMENT_LIST)
        })
    }

    /// Some animation on the layer targets `property`.
    #[must_use]
    pub fn has_any_animation_targeting_property(
        &self,
        id: LayerId,
        property: TargetProperty,
    ) -> bool {
        self.with_element(id, false, |host, element| {
            host.has_any_animation_targeting_property(element, property)
        })
    }

    /// A filter animation on the layer can grow its painted area.
    #[must_use]
    pub fn has_filter_animation_that_inflates_bounds(&self, id: LayerId) -> bool {
        self.with_element(id, false, |host, element| {
            host.has_filter_animation_that_inflates_bounds(element)
        })
    }

    /// A transform animation on the layer can grow its painted area.
    #[must_use]
    pub fn has_transform_animation_that_inflates_bounds(&self, id: LayerId) -> bool {
        self.with_element(id, false, |host, element| {
            host.has_transform_animation_that_inflates_bounds(element)
        })
    }

    /// Any animation on the layer can grow its painted area.
    #[must_use]
    pub fn has_animation_that_inflates_bounds(&self, id: LayerId) -> bool {
        self.with_element(id, false, |host, element| {
            host.has_animation_that_inflates_bounds(element)
        })
    }

    /// Bounds swept by `bounds` under the layer's filter animations.
    #[must_use]
    pub fn filter_animation_bounds_for_box(&self, id: LayerId, bounds: Box3d) -> Option<Box3d> {
        self.with_element(id, Some(bounds), |host, element| {
            host.filter_animation_bounds_for_box(element, bounds)
        })
    }

    /// Bounds swept by `bounds` under the layer's transform animations.
    #[must_use]
    pub fn transform_animation_bounds_for_box(
        &self,
        id: LayerId,
        bounds: Box3d,
    ) -> Option<Box3d> {
        self.with_element(id, Some(bounds), |host, element| {
            host.transform_animation_bounds_for_box(element, bounds)
        })
    }

    /// Records that the layer has (or no longer has) a transform animation
    /// that may run.
    ///
    /// Only acts on a transform node the layer owns, and only when the flag
    /// changes. The translation-only bit is refreshed from the host.
    pub fn update_property_tree_transform_is_animated(&mut self, id: LayerId, is_animated: bool) {
        let Some(index) = self
            .property_trees
            .node_index_for_layer(TreeType::Transform, id)
        else {
            return;
        };
        let only_translation = !is_animated || self.has_only_translation_transforms(id);

        let transform_tree = &mut self.property_trees.transform_tree;
        let Some(node) = transform_tree.node_mut(index) else {
            return;
        };
        if node.has_potential_animation == is_animated {
            return;
        }
        node.has_potential_animation = is_animated;
        node.has_only_translation_animations = only_translation;
        transform_tree.set_needs_update(true);
        self.needs_update_draw_properties = true;
    }

    /// Brings the layer's transform node up to date with its scroll offset
    /// and transform animations.
    pub fn update_property_tree_for_scrolling_and_animation_if_needed(&mut self, id: LayerId) {
        if self.layer(id).scrollable() {
            self.update_property_tree_scroll_offset(id);
        }
        if self.has_any_animation_targeting_property(id, TargetProperty::Transform) {
            let is_animated = self.has_potentially_running_transform_animation(id);
            self.update_property_tree_transform_is_animated(id, is_animated);
        }
    }

    /// Applies an animation-state change to the layer's property-tree nodes.
    ///
    /// Only the bits set in `mask` are written. Transform state goes to the
    /// transform node the layer owns; opacity and filter state go to its
    /// effect node. Other properties are ignored. A change in potential
    /// transform animation also clears the layer's ready-since-animation
    /// flag.
    ///
    /// # Panics
    ///
    /// Panics if there is no layer `id`.
    pub fn on_is_animating_changed(
        &mut self,
        id: LayerId,
        mask: PropertyAnimationState,
        state: PropertyAnimationState,
    ) {
        assert!(self.contains(id), "unknown layer {id:?}");
        let transform_index = self
            .property_trees
            .node_index_for_layer(TreeType::Transform, id);
        let effect_index = self
            .property_trees
            .node_index_for_layer(TreeType::Effect, id);

        for property in TargetProperty::ALL {
            let running = mask
                .currently_running
                .contains(property)
                .then(|| state.currently_running.contains(property));
            let potential = mask
                .potentially_animating
                .contains(property)
                .then(|| state.potentially_animating.contains(property));

            match property {
                TargetProperty::Transform => {
                    let Some(index) = transform_index else {
                        continue;
                    };
                    if let Some(running) = running
                        && let Some(node) = self.property_trees.transform_tree.node_mut(index)
                    {
                        node.is_currently_animating = running;
                    }
                    if let Some(potential) = potential {
                        self.update_property_tree_transform_is_animated(id, potential);
                        self.layer_mut(id).was_ever_ready_since_last_transform_animation = false;
                    }
                }
                TargetProperty::Opacity => {
                    let effect_tree = &mut self.property_trees.effect_tree;
                    let Some(node) = effect_index.and_then(|i| effect_tree.node_mut(i)) else {
                        continue;
                    };
                    if let Some(running) = running {
                        node.is_currently_animating_opacity = running;
                    }
                    if let Some(potential) = potential {
                        node.has_potential_opacity_animation = potential;
                        effect_tree.set_needs_update(true);
                    }
                }
                TargetProperty::Filter => {
                    let effect_tree = &mut self.property_trees.effect_tree;
                    let Some(node) = effect_index.and_then(|i| effect_tree.node_mut(i)) else {
                        continue;
                    };
                    if let Some(running) = running {
                        node.is_currently_animating_filter = running;
                    }
                    if let Some(potential) = potential {
                        node.has_potential_filter_animation = potential;
                    }
                }
                TargetProperty::ScrollOffset | TargetProperty::BackgroundColor => {}
            }
        }
    }

    /// [`on_is_animating_changed`](Self::on_is_animating_changed) for the
    /// layer carrying `element`. Does nothing for an unmapped element.
    pub fn on_element_is_animating_changed(
        &mut self,
        element: ElementId,
        mask: PropertyAnimationState,
        state: PropertyAnimationState,
    ) {
        if let Some(id) = self.layer_id_by_element_id(element) {
            self.on_is_animating_changed(id, mask, state);
        }
    }

    /// Marks the layer as drawn ready (or not) since its last transform
    /// animation change.
    pub fn set_was_ever_ready_since_last_transform_animation(&mut self, id: LayerId, ready: bool) {
        self.layer_mut(id).was_ever_ready_since_last_transform_animation = ready;
    }
}

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;

    use super::*;
    use crate::animation::TargetProperties;
    use crate::geometry::{IntSize, ScrollOffset};
    use crate::layer::LayerKind;
    use crate::property_trees::{EffectNode, ScrollNode, TransformNode};
    use crate::tree::{Active, LayerTreeSettings, Pending};

    const ELEMENT: ElementId = ElementId(42);

    fn id(raw: i32) -> LayerId {
        LayerId::new(raw)
    }

    /// Answers for one element: a rotating transform animation, running
    /// only on the active tree.
    #[derive(Debug)]
    struct RotationHost;

    impl MutatorHost for RotationHost {
        fn is_animating_transform_property(&self, element: ElementId, list: ElementListType) -> bool {
            element == ELEMENT && list == ElementListType::Active
        }

        fn has_potentially_running_transform_animation(
            &self,
            element: ElementId,
            _list: ElementListType,
        ) -> bool {
            element == ELEMENT
        }

        fn has_only_translation_transforms(&self, element: ElementId, _list: ElementListType) -> bool {
            element != ELEMENT
        }

        fn has_any_animation_targeting_property(
            &self,
            element: ElementId,
            property: TargetProperty,
        ) -> bool {
            element == ELEMENT && property == TargetProperty::Transform
        }

        fn transform_animation_bounds_for_box(
            &self,
            element: ElementId,
            bounds: Box3d,
        ) -> Option<Box3d> {
            (element != ELEMENT).then_some(bounds)
        }
    }

    fn animated_tree<P: TreePhase>() -> LayerTree<P> {
        let mut tree = LayerTree::<P>::new(LayerTreeSettings::new(), Rc::new(RotationHost));
        tree.create_layer(id(1), LayerKind::Base);
        tree.set_element_id(id(1), Some(ELEMENT));

        let trees = tree.property_trees_mut();
        let transform = trees.add_transform_node(TransformNode {
            owning_layer_id: Some(id(1)),
            ..TransformNode::default()
        });
        let effect = trees.add_effect_node(EffectNode {
            owning_layer_id: Some(id(1)),
            transform_id: transform,
            ..EffectNode::default()
        });
        trees.update();
        tree.set_transform_tree_index(id(1), transform);
        tree.set_effect_tree_index(id(1), effect);
        tree.did_update_draw_properties();
        tree
    }

    fn only(property: TargetProperty) -> TargetProperties {
        TargetProperties::NONE.with(property)
    }

    #[test]
    fn queries_use_the_element_and_list() {
        let active = animated_tree::<Active>();
        assert_eq!(active.element_list_type(), ElementListType::Active);
        assert!(active.transform_is_animating(id(1)));
        assert!(!active.has_only_translation_transforms(id(1)));
        assert!(active.has_any_animation_targeting_property(id(1), TargetProperty::Transform));
        assert!(!active.has_any_animation_targeting_property(id(1), TargetProperty::Opacity));

        let b = Box3d::new([0.0; 3], [1.0; 3]);
        assert_eq!(active.transform_animation_bounds_for_box(id(1), b), None);
        assert_eq!(active.filter_animation_bounds_for_box(id(1), b), Some(b));

        let pending = animated_tree::<Pending>();
        assert!(!pending.transform_is_animating(id(1)));
        assert!(pending.has_potentially_running_transform_animation(id(1)));
    }

    #[test]
    fn layers_without_an_element_have_no_animations() {
        let mut tree = animated_tree::<Active>();
        tree.set_element_id(id(1), None);
        assert!(!tree.transform_is_animating(id(1)));
        assert!(!tree.has_potentially_running_transform_animation(id(1)));
        assert!(tree.has_only_translation_transforms(id(1)));
        let b = Box3d::new([1.0; 3], [2.0; 3]);
        assert_eq!(tree.transform_animation_bounds_for_box(id(1), b), Some(b));
    }

    #[test]
    fn masked_bits_only_are_written() {
        let mut tree = animated_tree::<Active>();
        let mask = PropertyAnimationState {
            currently_running: only(TargetProperty::Opacity),
            potentially_animating: TargetProperties::NONE,
        };
        let state = PropertyAnimationState {
            currently_running: only(TargetProperty::Opacity).with(TargetProperty::Filter),
            potentially_animating: only(TargetProperty::Opacity),
        };
        tree.on_is_animating_changed(id(1), mask, state);

        let effect = tree.layer(id(1)).effect_tree_index();
        let node = tree.property_trees().effect_tree.node(effect).unwrap();
        assert!(node.is_currently_animating_opacity);
        assert!(!node.is_currently_animating_filter);
        assert!(!node.has_potential_opacity_animation);
        assert!(!tree.property_trees().effect_tree.needs_update());
    }

    #[test]
    fn potential_opacity_and_filter_animations() {
        let mut tree = animated_tree::<Active>();
        let both = only(TargetProperty::Opacity).with(TargetProperty::Filter);
        let state = PropertyAnimationState {
            currently_running: both,
            potentially_animating: both,
        };
        tree.on_is_animating_changed(id(1), state, state);

        let effect = tree.layer(id(1)).effect_tree_index();
        let effect_tree = &tree.property_trees().effect_tree;
        let node = effect_tree.node(effect).unwrap();
        assert!(node.has_potential_opacity_animation && node.is_currently_animating_opacity);
        assert!(node.has_potential_filter_animation && node.is_currently_animating_filter);
        assert!(effect_tree.needs_update());
    }

    #[test]
    fn potential_transform_animation_updates_the_node() {
        let mut tree = animated_tree::<Active>();
        let transform = only(TargetProperty::Transform);
        let state = PropertyAnimationState {
            currently_running: transform,
            potentially_animating: transform,
        };
        tree.on_is_animating_changed(id(1), state, state);

        let index = tree.layer(id(1)).transform_tree_index();
        let transform_tree = &tree.property_trees().transform_tree;
        let node = transform_tree.node(index).unwrap();
        assert!(node.is_currently_animating);
        assert!(node.has_potential_animation);
        assert!(!node.has_only_translation_animations);
        assert!(transform_tree.needs_update());
        assert!(tree.needs_update_draw_properties());
        assert!(!tree.layer(id(1)).was_ever_ready_since_last_transform_animation());

        tree.set_was_ever_ready_since_last_transform_animation(id(1), true);
        let stopped = PropertyAnimationState::default();
        tree.on_is_animating_changed(id(1), state, stopped);
        let node = tree.property_trees().transform_tree.node(index).unwrap();
        assert!(!node.has_potential_animation);
        assert!(node.has_only_translation_animations);
        assert!(!tree.layer(id(1)).was_ever_ready_since_last_transform_animation());
    }

    #[test]
    fn layer_without_nodes_ignores_notifications() {
        let mut tree = LayerTree::<Active>::default();
        tree.create_layer(id(3), LayerKind::Base);
        let all = TargetProperty::ALL
            .into_iter()
            .fold(TargetProperties::NONE, TargetProperties::with);
        let state = PropertyAnimationState {
            currently_running: all,
            potentially_animating: all,
        };
        tree.on_is_animating_changed(id(3), state, state);
        assert!(tree.layer(id(3)).was_ever_ready_since_last_transform_animation());
        assert!(!tree.needs_update_draw_properties());
    }

    #[test]
    fn element_notifications_route_through_the_element_map() {
        let mut tree = animated_tree::<Pending>();
        let state = PropertyAnimationState {
            currently_running: only(TargetProperty::Transform),
            potentially_animating: TargetProperties::NONE,
        };
        tree.on_element_is_animating_changed(ElementId(7), state, state);
        tree.on_element_is_animating_changed(ELEMENT, state, state);

        let index = tree.layer(id(1)).transform_tree_index();
        let node = tree.property_trees().transform_tree.node(index).unwrap();
        assert!(node.is_currently_animating);
    }

    #[test]
    fn scrolling_and_animation_refresh() {
        let mut tree = animated_tree::<Active>();
        tree.create_layer(id(2), LayerKind::Base);
        tree.set_scroll_clip_layer(id(1), Some(id(2)));
        let scroll = tree.property_trees_mut().add_scroll_node(ScrollNode {
            owning_layer_id: Some(id(1)),
            scrollable: true,
            container_bounds: IntSize::new(10, 10),
            bounds: IntSize::new(10, 50),
            ..ScrollNode::default()
        });
        tree.set_scroll_tree_index(id(1), scroll);
        tree.set_current_scroll_offset(id(1), ScrollOffset::new(0.0, 25.0));

        tree.update_property_tree_for_scrolling_and_animation_if_needed(id(1));

        let index = tree.layer(id(1)).transform_tree_index();
        let node = tree.property_trees().transform_tree.node(index).unwrap();
        assert_eq!(node.scroll_offset, ScrollOffset::new(0.0, 25.0));
        assert!(node.has_potential_animation);
        assert!(!node.has_only_translation_animations);
    }
}
