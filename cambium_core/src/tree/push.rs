// Copyright 2026 the Cambium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Replicating pending-tree state into the active tree.

use alloc::vec::Vec;

use super::{Active, LayerTree, Pending};
use crate::layer::LayerId;
use crate::trace::{LayerField, PropertyChangedEvent, PushEvent};

impl LayerTree<Pending> {
    /// Copies the state of pending layer `id` into its active counterpart.
    ///
    /// Plain fields are copied first. A pending change flag is carried over
    /// after requesting a draw-properties pass on the active tree. Bounds,
    /// scroll clip layer, element id, and mutable properties then go through
    /// the active tree's setters so their side effects fire there. The
    /// update rect is merged by union rather than overwritten, and any
    /// debug payload moves to the active layer. Finally the pending layer's
    /// change flag, push flag, and update rect are cleared and it leaves the
    /// pending-push list.
    ///
    /// Only an active tree can receive a push:
    ///
    /// ```compile_fail
    /// use cambium_core::layer::{LayerId, LayerKind};
    /// use cambium_core::tree::{LayerTree, Pending};
    ///
    /// let id = LayerId::new(1);
    /// let mut source = LayerTree::<Pending>::default();
    /// let mut target = LayerTree::<Pending>::default();
    /// source.create_layer(id, LayerKind::Base);
    /// target.create_layer(id, LayerKind::Base);
    /// source.push_properties_to(id, &mut target);
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if either tree has no layer `id`.
    pub fn push_properties_to(&mut self, id: LayerId, target: &mut LayerTree<Active>) {
        assert!(
            target.contains(id),
            "active tree has no counterpart for layer {id:?}"
        );
        let src = self.layer(id);
        let dst = target.layer_mut(id);

        dst.offset_to_transform_parent = src.offset_to_transform_parent;
        dst.main_thread_scrolling_reasons = src.main_thread_scrolling_reasons;
        dst.user_scrollable_horizontal = src.user_scrollable_horizontal;
        dst.user_scrollable_vertical = src.user_scrollable_vertical;
        dst.non_fast_scrollable_region
            .clone_from(&src.non_fast_scrollable_region);
        dst.touch_event_handler_region
            .clone_from(&src.touch_event_handler_region);
        dst.should_flatten_transform_from_property_tree =
            src.should_flatten_transform_from_property_tree;
        dst.masks_to_bounds = src.masks_to_bounds;
        dst.contents_opaque = src.contents_opaque;
        dst.may_contain_video = src.may_contain_video;
        dst.use_parent_backface_visibility = src.use_parent_backface_visibility;
        dst.use_local_transform_for_backface_visibility =
            src.use_local_transform_for_backface_visibility;
        dst.should_check_backface_visibility = src.should_check_backface_visibility;
        dst.draws_content = src.draws_content;
        dst.background_color = src.background_color;
        dst.safe_opaque_background_color = src.safe_opaque_background_color;
        dst.draw_blend_mode = src.draw_blend_mode;
        dst.position = src.position;
        dst.transform_tree_index = src.transform_tree_index;
        dst.effect_tree_index = src.effect_tree_index;
        dst.clip_tree_index = src.clip_tree_index;
        dst.scroll_tree_index = src.scroll_tree_index;
        dst.has_will_change_transform_hint = src.has_will_change_transform_hint;
        dst.scrollbars_hidden = src.scrollbars_hidden;
        dst.preferred_raster_bounds = src.preferred_raster_bounds;

        if src.layer_property_changed {
            target.set_needs_update_draw_properties();
            target.layer_mut(id).layer_property_changed = true;
            target.tracer.property_changed(&PropertyChangedEvent {
                layer: id,
                field: LayerField::Pushed,
                active_tree: true,
            });
        }

        target.set_bounds(id, src.bounds);
        target.set_scroll_clip_layer(id, src.scroll_clip_layer_id);
        target.set_element_id(id, src.element_id);
        target.set_mutable_properties(id, src.mutable_properties);

        let merged = src.update_rect.union(target.layer(id).update_rect);
        target.set_update_rect(id, merged);

        let src = self.layer_mut(id);
        if let Some(info) = src.debug_info.take() {
            target.set_debug_info(id, Some(info));
        }

        src.layer_property_changed = false;
        src.needs_push_properties = false;
        src.update_rect = crate::geometry::IntRect::EMPTY;
        self.remove_layer_should_push_properties(id);

        self.tracer.push(&PushEvent {
            layer: id,
            update_rect: merged,
        });
    }

    /// Pushes every layer on the pending-push list into `target`.
    ///
    /// Layers missing from `target` are created there first, and active
    /// layers with no pending counterpart are destroyed. The root layer,
    /// viewport roles, and scale factors are copied as well.
    ///
    /// Property trees are not copied; each tree's embedder builds its own.
    ///
    /// ```
    /// use cambium_core::geometry::IntSize;
    /// use cambium_core::layer::{LayerId, LayerKind};
    /// use cambium_core::tree::{Active, LayerTree, Pending};
    ///
    /// let id = LayerId::new(1);
    /// let mut pending = LayerTree::<Pending>::default();
    /// let mut active = LayerTree::<Active>::default();
    /// pending.create_layer(id, LayerKind::Base);
    /// pending.set_bounds(id, IntSize::new(64, 32));
    ///
    /// pending.push_properties_to_tree(&mut active);
    /// assert_eq!(active.layer(id).bounds(), IntSize::new(64, 32));
    /// assert!(pending.layers_that_should_push_properties().is_empty());
    /// ```
    pub fn push_properties_to_tree(&mut self, target: &mut LayerTree<Active>) {
        let stale: Vec<LayerId> = target
            .layer_ids()
            .filter(|&id| !self.contains(id))
            .collect();
        for id in stale {
            let _ = target.destroy_layer(id);
        }

        let to_push: Vec<LayerId> = self.layers_to_push.clone();
        for id in to_push {
            if !target.contains(id) {
                target.create_layer(id, self.layer(id).kind);
            }
            self.push_properties_to(id, target);
        }

        target.set_root_layer(self.root_layer);
        target.set_viewport_layers(self.viewport);
        target.set_device_scale_factor(self.device_scale_factor);
        target.set_page_scale_factor(self.page_scale_factor);
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::string::String;

    use kurbo::{Point, Vec2};

    use super::*;
    use crate::geometry::{IntRect, IntSize, Region};
    use crate::layer::{Color, DebugInfo, ElementId, LayerKind, MutableProperties};
    use crate::tree::ViewportLayers;

    fn id(raw: i32) -> LayerId {
        LayerId::new(raw)
    }

    fn pair(ids: &[i32]) -> (LayerTree<Pending>, LayerTree<Active>) {
        let mut pending = LayerTree::<Pending>::default();
        let mut active = LayerTree::<Active>::default();
        for &raw in ids {
            pending.create_layer(id(raw), LayerKind::Base);
            active.create_layer(id(raw), LayerKind::Base);
        }
        pending.reset_all_change_tracking();
        active.reset_all_change_tracking();
        active.did_update_draw_properties();
        (pending, active)
    }

    #[derive(Debug)]
    struct Label(&'static str);

    impl DebugInfo for Label {
        fn append_as_trace_format(&self, out: &mut String) {
            out.push_str(self.0);
        }
    }

    #[test]
    fn update_rects_from_two_cycles_merge() {
        let (mut pending, mut active) = pair(&[1]);
        pending.set_update_rect(id(1), IntRect::new(0, 0, 10, 10));
        pending.set_update_rect(id(1), IntRect::new(5, 5, 10, 10));
        pending.push_properties_to(id(1), &mut active);
        assert_eq!(active.layer(id(1)).update_rect(), IntRect::new(0, 0, 15, 15));
    }

    #[test]
    fn update_rect_is_unioned_with_the_destination() {
        let (mut pending, mut active) = pair(&[1]);
        let a = IntRect::new(0, 0, 10, 10);
        let b = IntRect::new(20, -5, 4, 4);
        pending.set_update_rect(id(1), a);
        active.set_update_rect(id(1), b);

        pending.push_properties_to(id(1), &mut active);
        let merged = active.layer(id(1)).update_rect();
        assert_eq!(merged, a.union(b));
        assert!(merged.contains_rect(a) && merged.contains_rect(b));
    }

    #[test]
    fn push_clears_the_source() {
        let (mut pending, mut active) = pair(&[1]);
        pending.set_bounds(id(1), IntSize::new(10, 10));
        pending.set_update_rect(id(1), IntRect::new(0, 0, 10, 10));

        pending.push_properties_to(id(1), &mut active);
        let src = pending.layer(id(1));
        assert!(!src.layer_property_changed_flag());
        assert!(!src.needs_push_properties());
        assert!(src.update_rect().is_empty());
        assert!(pending.layers_that_should_push_properties().is_empty());
    }

    #[test]
    fn change_flag_and_fields_are_carried_over() {
        let (mut pending, mut active) = pair(&[1, 9]);
        let layer = id(1);
        pending.set_background_color(layer, Color::WHITE);
        pending.set_contents_opaque(layer, true);
        pending.set_position(layer, Point::new(1.0, 2.0));
        pending.set_offset_to_transform_parent(layer, Vec2::new(3.0, 4.0));
        pending.set_transform_tree_index(layer, 2);
        pending.set_scroll_clip_layer(layer, Some(id(9)));
        pending.set_element_id(layer, Some(ElementId(11)));
        pending.set_mutable_properties(layer, MutableProperties::TRANSFORM);
        pending.set_non_fast_scrollable_region(layer, Region::from_rect(IntRect::new(0, 0, 8, 8)));
        pending.set_touch_event_handler_region(layer, Region::from_rect(IntRect::new(4, 4, 2, 2)));

        pending.push_properties_to(layer, &mut active);

        assert!(active.needs_update_draw_properties());
        let dst = active.layer(layer);
        assert!(dst.layer_property_changed_flag());
        assert_eq!(dst.background_color(), Color::WHITE);
        assert!(dst.contents_opaque());
        assert_eq!(dst.position(), Point::new(1.0, 2.0));
        assert_eq!(dst.offset_to_transform_parent(), Vec2::new(3.0, 4.0));
        assert_eq!(dst.transform_tree_index(), 2);
        assert!(dst.non_fast_scrollable_region().contains_point(7, 7));
        assert_eq!(
            dst.touch_event_handler_region().rects(),
            [IntRect::new(4, 4, 2, 2)]
        );
        assert_eq!(active.scroll_layer_for_clip(id(9)), Some(layer));
        let entry = active.element_map_entry(ElementId(11)).unwrap();
        assert_eq!(entry.layer, layer);
        assert_eq!(entry.mutable_properties, MutableProperties::TRANSFORM);
    }

    #[test]
    fn unchanged_source_does_not_dirty_the_destination() {
        let (mut pending, mut active) = pair(&[1]);
        pending.set_contents_opaque(id(1), true);
        pending.push_properties_to(id(1), &mut active);
        assert!(!active.layer(id(1)).layer_property_changed_flag());
        assert!(!active.needs_update_draw_properties());
    }

    #[test]
    fn bounds_push_fires_destination_side_effects() {
        let (mut pending, mut active) = pair(&[1]);
        pending.set_bounds(id(1), IntSize::new(40, 30));
        pending.push_properties_to(id(1), &mut active);
        assert_eq!(active.layer(id(1)).base_bounds(), IntSize::new(40, 30));
        assert_eq!(active.take_scroll_state_updates(), [id(1)]);
    }

    #[test]
    fn debug_info_moves_to_the_destination() {
        let (mut pending, mut active) = pair(&[1]);
        pending.set_debug_info(id(1), Some(Box::new(Label("raster"))));
        pending.push_properties_to(id(1), &mut active);

        assert!(pending.layer(id(1)).debug_info().is_none());
        let mut out = String::new();
        active
            .layer(id(1))
            .debug_info()
            .unwrap()
            .append_as_trace_format(&mut out);
        assert_eq!(out, "raster");
    }

    #[test]
    #[should_panic(expected = "no counterpart")]
    fn pushing_to_a_missing_counterpart_panics() {
        let (mut pending, mut active) = pair(&[]);
        pending.create_layer(id(1), LayerKind::Base);
        pending.push_properties_to(id(1), &mut active);
    }

    #[test]
    fn tree_push_carries_plain_fields_set_after_an_earlier_push() {
        let (mut pending, mut active) = pair(&[1]);
        pending.push_properties_to_tree(&mut active);

        pending.set_contents_opaque(id(1), true);
        pending.set_clip_tree_index(id(1), 4);
        pending.push_properties_to_tree(&mut active);

        let dst = active.layer(id(1));
        assert!(dst.contents_opaque());
        assert_eq!(dst.clip_tree_index(), 4);
        assert!(!dst.layer_property_changed_flag());
        assert!(pending.layers_that_should_push_properties().is_empty());
    }

    #[test]
    fn tree_push_syncs_membership_and_tree_state() {
        let (mut pending, mut active) = pair(&[1, 2]);
        let _ = pending.destroy_layer(id(2));
        pending.create_layer(id(3), LayerKind::Base);
        pending.set_draws_content(id(1), true);
        pending.set_root_layer(Some(id(1)));
        pending.set_viewport_layers(ViewportLayers {
            outer_viewport_scroll: Some(id(3)),
            ..ViewportLayers::default()
        });
        pending.set_device_scale_factor(2.0);

        pending.push_properties_to_tree(&mut active);

        let ids: Vec<_> = active.layer_ids().collect();
        assert_eq!(ids, [id(1), id(3)]);
        assert!(active.layer(id(1)).draws_content());
        assert_eq!(active.root_layer(), Some(id(1)));
        assert_eq!(active.viewport_layers().outer_viewport_scroll, Some(id(3)));
        assert_eq!(active.device_scale_factor(), 2.0);
        assert!(pending.layers_that_should_push_properties().is_empty());
    }
}
