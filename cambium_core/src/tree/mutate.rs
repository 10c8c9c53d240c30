// Copyright 2026 the Cambium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layer setters and change tracking.
//!
//! Setters for values that affect what a layer looks like (bounds,
//! draws-content, background color) are no-ops when the value is unchanged
//! and otherwise go through
//! [`note_layer_property_changed`](LayerTree::note_layer_property_changed).
//! The remaining setters store the value and schedule a push when it
//! changed, without noting a visual change.

use alloc::boxed::Box;

use kurbo::{Point, Rect, Vec2};

use super::{Active, LayerTree, TreePhase};
use crate::geometry::{IntRect, IntSize, Region};
use crate::layer::{
    BlendMode, Color, DebugInfo, ElementId, Layer, LayerId, MainThreadScrollingReasons,
    MutableProperties,
};
use crate::trace::{LayerField, PropertyChangedEvent};

impl<P: TreePhase> LayerTree<P> {
    // -- Change tracking --

    /// Marks `id` as visually changed.
    ///
    /// Sets the layer's change flag, requests a draw-properties pass, and
    /// schedules the layer for a push.
    pub fn note_layer_property_changed(&mut self, id: LayerId, field: LayerField) {
        self.layer_mut(id).layer_property_changed = true;
        self.needs_update_draw_properties = true;
        self.tracer.property_changed(&PropertyChangedEvent {
            layer: id,
            field,
            active_tree: P::IS_ACTIVE,
        });
        self.set_needs_push_properties(id);
    }

    /// Schedules `id` for the next push.
    ///
    /// The layer joins the pending-push list only on the transition from
    /// clean to dirty, so it is listed at most once.
    pub fn set_needs_push_properties(&mut self, id: LayerId) {
        let layer = self.layer_mut(id);
        if layer.needs_push_properties {
            return;
        }
        layer.needs_push_properties = true;
        self.add_layer_should_push_properties(id);
    }

    /// Clears the change flag, the push flag, and both accumulator rects.
    pub fn reset_change_tracking(&mut self, id: LayerId) {
        let layer = self.layer_mut(id);
        layer.layer_property_changed = false;
        layer.needs_push_properties = false;
        layer.update_rect = IntRect::EMPTY;
        layer.damage_rect = IntRect::EMPTY;
        self.remove_layer_should_push_properties(id);
    }

    /// Resets change tracking on every layer and on the property trees.
    pub fn reset_all_change_tracking(&mut self) {
        for layer in self.layers.values_mut() {
            layer.layer_property_changed = false;
            layer.needs_push_properties = false;
            layer.update_rect = IntRect::EMPTY;
            layer.damage_rect = IntRect::EMPTY;
        }
        self.layers_to_push.clear();
        self.property_trees.reset_change_tracking();
    }

    /// Grows the update rect to cover `rect` and schedules a push.
    ///
    /// The update rect accumulates until the next push or reset, so several
    /// production cycles may invalidate before one is consumed.
    pub fn set_update_rect(&mut self, id: LayerId, rect: IntRect) {
        let layer = self.layer_mut(id);
        layer.update_rect = layer.update_rect.union(rect);
        self.set_needs_push_properties(id);
    }

    /// Grows the damage accumulator to cover `rect`.
    pub fn add_damage_rect(&mut self, id: LayerId, rect: IntRect) {
        let layer = self.layer_mut(id);
        layer.damage_rect = layer.damage_rect.union(rect);
    }

    /// Attaches (or detaches) a diagnostics payload and schedules a push.
    pub fn set_debug_info(&mut self, id: LayerId, info: Option<Box<dyn DebugInfo>>) {
        self.layer_mut(id).debug_info = info;
        self.set_needs_push_properties(id);
    }

    // -- Change-noting setters --

    /// Sets the stored bounds.
    ///
    /// Scroll extents depend on bounds, so a change also reports a scroll
    /// state update for `id`.
    pub fn set_bounds(&mut self, id: LayerId, bounds: IntSize) {
        let layer = self.layer_mut(id);
        if layer.bounds == bounds {
            return;
        }
        layer.bounds = bounds;
        self.did_update_scroll_state(id);
        self.note_layer_property_changed(id, LayerField::Bounds);
    }

    /// Sets whether the layer draws anything itself.
    pub fn set_draws_content(&mut self, id: LayerId, draws_content: bool) {
        let layer = self.layer_mut(id);
        if layer.draws_content == draws_content {
            return;
        }
        layer.draws_content = draws_content;
        self.note_layer_property_changed(id, LayerField::DrawsContent);
    }

    /// Sets the background color.
    pub fn set_background_color(&mut self, id: LayerId, color: Color) {
        let layer = self.layer_mut(id);
        if layer.background_color == color {
            return;
        }
        layer.background_color = color;
        self.note_layer_property_changed(id, LayerField::BackgroundColor);
    }

    // -- Plain setters --

    /// Writes one stored field and schedules a push if the value changed.
    ///
    /// Plain fields carry no visual change note of their own; the active
    /// tree picks them up on the next push.
    fn store<T: PartialEq>(
        &mut self,
        id: LayerId,
        value: T,
        field: impl FnOnce(&mut Layer) -> &mut T,
    ) {
        let slot = field(self.layer_mut(id));
        if *slot == value {
            return;
        }
        *slot = value;
        self.set_needs_push_properties(id);
    }

    /// Sets the color used for uncovered areas of opaque layers.
    pub fn set_safe_opaque_background_color(&mut self, id: LayerId, color: Color) {
        self.store(id, color, |layer| &mut layer.safe_opaque_background_color);
    }

    /// Sets whether descendants are clipped to this layer's bounds.
    pub fn set_masks_to_bounds(&mut self, id: LayerId, masks_to_bounds: bool) {
        self.store(id, masks_to_bounds, |layer| &mut layer.masks_to_bounds);
    }

    /// Sets whether every drawn pixel is opaque.
    pub fn set_contents_opaque(&mut self, id: LayerId, opaque: bool) {
        self.store(id, opaque, |layer| &mut layer.contents_opaque);
    }

    /// Sets the position relative to the parent.
    pub fn set_position(&mut self, id: LayerId, position: Point) {
        self.store(id, position, |layer| &mut layer.position);
    }

    /// Sets the offset from the transform node's origin.
    pub fn set_offset_to_transform_parent(&mut self, id: LayerId, offset: Vec2) {
        self.store(id, offset, |layer| &mut layer.offset_to_transform_parent);
    }

    /// Points the layer at a transform-tree node.
    pub fn set_transform_tree_index(&mut self, id: LayerId, index: u32) {
        self.store(id, index, |layer| &mut layer.transform_tree_index);
    }

    /// Points the layer at an effect-tree node.
    pub fn set_effect_tree_index(&mut self, id: LayerId, index: u32) {
        self.store(id, index, |layer| &mut layer.effect_tree_index);
    }

    /// Points the layer at a clip-tree node.
    pub fn set_clip_tree_index(&mut self, id: LayerId, index: u32) {
        self.store(id, index, |layer| &mut layer.clip_tree_index);
    }

    /// Points the layer at a scroll-tree node.
    pub fn set_scroll_tree_index(&mut self, id: LayerId, index: u32) {
        self.store(id, index, |layer| &mut layer.scroll_tree_index);
    }

    /// Sets whether the layer may present video.
    pub fn set_may_contain_video(&mut self, id: LayerId, may_contain_video: bool) {
        self.store(id, may_contain_video, |layer| &mut layer.may_contain_video);
    }

    /// Sets whether backface visibility is inherited from the parent.
    pub fn set_use_parent_backface_visibility(&mut self, id: LayerId, value: bool) {
        self.store(id, value, |layer| &mut layer.use_parent_backface_visibility);
    }

    /// Sets whether backface visibility uses the local transform.
    pub fn set_use_local_transform_for_backface_visibility(&mut self, id: LayerId, value: bool) {
        self.store(id, value, |layer| &mut layer.use_local_transform_for_backface_visibility);
    }

    /// Sets whether the draw pass tests this layer's backface.
    pub fn set_should_check_backface_visibility(&mut self, id: LayerId, value: bool) {
        self.store(id, value, |layer| &mut layer.should_check_backface_visibility);
    }

    /// Sets whether derived transforms are flattened to 2-D.
    pub fn set_should_flatten_transform_from_property_tree(&mut self, id: LayerId, value: bool) {
        self.store(id, value, |layer| &mut layer.should_flatten_transform_from_property_tree);
    }

    /// Records a producer hint that the transform will change.
    pub fn set_has_will_change_transform_hint(&mut self, id: LayerId, value: bool) {
        self.store(id, value, |layer| &mut layer.has_will_change_transform_hint);
    }

    /// Hides or shows overlay scrollbars.
    pub fn set_scrollbars_hidden(&mut self, id: LayerId, hidden: bool) {
        self.store(id, hidden, |layer| &mut layer.scrollbars_hidden);
    }

    /// Sets the blend mode used when drawing.
    pub fn set_draw_blend_mode(&mut self, id: LayerId, mode: BlendMode) {
        self.store(id, mode, |layer| &mut layer.draw_blend_mode);
    }

    /// Sets why scrolling must happen on the main thread.
    pub fn set_main_thread_scrolling_reasons(
        &mut self,
        id: LayerId,
        reasons: MainThreadScrollingReasons,
    ) {
        self.store(id, reasons, |layer| &mut layer.main_thread_scrolling_reasons);
    }

    /// Allows or forbids horizontal user scrolling.
    pub fn set_user_scrollable_horizontal(&mut self, id: LayerId, scrollable: bool) {
        self.store(id, scrollable, |layer| &mut layer.user_scrollable_horizontal);
    }

    /// Allows or forbids vertical user scrolling.
    pub fn set_user_scrollable_vertical(&mut self, id: LayerId, scrollable: bool) {
        self.store(id, scrollable, |layer| &mut layer.user_scrollable_vertical);
    }

    /// Sets the area where scrolling cannot be handled off the main thread.
    pub fn set_non_fast_scrollable_region(&mut self, id: LayerId, region: Region) {
        self.store(id, region, |layer| &mut layer.non_fast_scrollable_region);
    }

    /// Sets the area covered by touch event handlers.
    pub fn set_touch_event_handler_region(&mut self, id: LayerId, region: Region) {
        self.store(id, region, |layer| &mut layer.touch_event_handler_region);
    }

    /// Requests a raster size.
    pub fn set_preferred_raster_bounds(&mut self, id: LayerId, bounds: IntSize) {
        self.store(id, Some(bounds), |layer| &mut layer.preferred_raster_bounds);
    }

    /// Withdraws a raster size request.
    pub fn clear_preferred_raster_bounds(&mut self, id: LayerId) {
        self.store(id, None, |layer| &mut layer.preferred_raster_bounds);
    }

    // -- Registry-backed setters --

    /// Sets the animation element id, moving the layer's element-map entry.
    pub fn set_element_id(&mut self, id: LayerId, element: Option<ElementId>) {
        if self.layer(id).element_id == element {
            return;
        }
        self.remove_from_element_map(id);
        self.layer_mut(id).element_id = element;
        self.add_to_element_map(id);
        self.set_needs_push_properties(id);
    }

    /// Sets the off-thread-mutable properties, refreshes the element map,
    /// and schedules a push.
    pub fn set_mutable_properties(&mut self, id: LayerId, properties: MutableProperties) {
        let layer = self.layer_mut(id);
        if layer.mutable_properties == properties {
            return;
        }
        layer.mutable_properties = properties;
        self.add_to_element_map(id);
        self.set_needs_push_properties(id);
    }

    /// Sets the layer whose bounds clip this layer's scrolling.
    ///
    /// The scroll registry is updated under both the old and the new clip
    /// layer. Setting the current value does nothing.
    pub fn set_scroll_clip_layer(&mut self, id: LayerId, clip_layer: Option<LayerId>) {
        if self.layer(id).scroll_clip_layer_id == clip_layer {
            return;
        }
        self.unregister_scroll_layer(id);
        self.layer_mut(id).scroll_clip_layer_id = clip_layer;
        self.register_scroll_layer(id);
    }
}

impl LayerTree<Active> {
    /// Sets the consumer-side bounds adjustment.
    ///
    /// Viewport layers forward the delta to the matching field of the
    /// property trees. A layer that masks to bounds rewrites its clip node
    /// and damages the whole tree instead of noting a per-layer change.
    pub fn set_bounds_delta(&mut self, id: LayerId, delta: Vec2) {
        let layer = self.layer_mut(id);
        if layer.bounds_delta == delta {
            return;
        }
        layer.bounds_delta = delta;
        let masks_to_bounds = layer.masks_to_bounds;
        let clip_index = layer.clip_tree_index;
        let clip = Rect::from_origin_size(
            layer.offset_to_transform_parent.to_point(),
            layer.bounds().to_kurbo(),
        );

        let viewport = self.viewport;
        let trees = &mut self.property_trees;
        if viewport.inner_viewport_container == Some(id) {
            trees.set_inner_viewport_container_bounds_delta(delta);
        } else if viewport.outer_viewport_container == Some(id) {
            trees.set_outer_viewport_container_bounds_delta(delta);
        } else if viewport.inner_viewport_scroll == Some(id) {
            trees.set_inner_viewport_scroll_bounds_delta(delta);
        }

        self.did_update_scroll_state(id);

        if masks_to_bounds {
            let trees = &mut self.property_trees;
            if let Some(node) = trees.clip_tree.node_mut(clip_index) {
                node.clip = clip;
                trees.clip_tree.set_needs_update(true);
            }
            trees.full_tree_damaged = true;
            self.needs_update_draw_properties = true;
        } else {
            self.note_layer_property_changed(id, LayerField::BoundsDelta);
        }
    }
}
