// Copyright 2026 the Cambium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The per-layer record.

use alloc::boxed::Box;

use kurbo::{Point, Size, Vec2};

use super::debug::DebugInfo;
use super::draw::{DrawMode, DrawProperties};
use super::id::{ElementId, LayerId, MainThreadScrollingReasons, MutableProperties};
use super::kind::{LayerKind, ScrollbarOrientation};
use super::style::{BlendMode, Color};
use crate::geometry::{IntRect, IntSize, Region};
use crate::property_trees::INVALID_NODE;

/// One node of a [`LayerTree`](crate::tree::LayerTree).
///
/// A layer stores its own geometry, paint flags, scroll linkage, and change
/// tracking. Transform, opacity, clip, and scroll offset are not stored
/// here: the layer holds an index into each property tree and the owning
/// tree derives those values on demand.
///
/// All mutation goes through the owning tree so that every change can mark
/// the tree dirty; this type only exposes reads.
#[derive(Debug)]
pub struct Layer {
    pub(crate) id: LayerId,
    pub(crate) kind: LayerKind,

    // -- Geometry --
    pub(crate) bounds: IntSize,
    pub(crate) bounds_delta: Vec2,
    pub(crate) position: Point,
    pub(crate) offset_to_transform_parent: Vec2,

    // -- Property-tree linkage --
    pub(crate) transform_tree_index: u32,
    pub(crate) effect_tree_index: u32,
    pub(crate) clip_tree_index: u32,
    pub(crate) scroll_tree_index: u32,

    // -- Flags --
    pub(crate) masks_to_bounds: bool,
    pub(crate) contents_opaque: bool,
    pub(crate) draws_content: bool,
    pub(crate) may_contain_video: bool,
    pub(crate) use_parent_backface_visibility: bool,
    pub(crate) use_local_transform_for_backface_visibility: bool,
    pub(crate) should_check_backface_visibility: bool,
    pub(crate) should_flatten_transform_from_property_tree: bool,
    pub(crate) has_will_change_transform_hint: bool,
    pub(crate) scrollbars_hidden: bool,
    pub(crate) is_drawn_render_surface_layer_list_member: bool,
    pub(crate) was_ever_ready_since_last_transform_animation: bool,

    // -- Paint --
    pub(crate) background_color: Color,
    pub(crate) safe_opaque_background_color: Color,
    pub(crate) draw_blend_mode: BlendMode,
    pub(crate) preferred_raster_bounds: Option<IntSize>,

    // -- Scroll linkage --
    pub(crate) scroll_clip_layer_id: Option<LayerId>,
    pub(crate) user_scrollable_horizontal: bool,
    pub(crate) user_scrollable_vertical: bool,
    pub(crate) main_thread_scrolling_reasons: MainThreadScrollingReasons,

    // -- Input regions --
    pub(crate) non_fast_scrollable_region: Region,
    pub(crate) touch_event_handler_region: Region,

    // -- Animation linkage --
    pub(crate) element_id: Option<ElementId>,
    pub(crate) mutable_properties: MutableProperties,

    // -- Change tracking --
    pub(crate) layer_property_changed: bool,
    pub(crate) needs_push_properties: bool,
    pub(crate) update_rect: IntRect,
    pub(crate) damage_rect: IntRect,

    // -- Draw --
    pub(crate) current_draw_mode: DrawMode,
    pub(crate) draw_properties: DrawProperties,

    pub(crate) debug_info: Option<Box<dyn DebugInfo>>,
}

impl Layer {
    pub(crate) fn new(id: LayerId, kind: LayerKind) -> Self {
        Self {
            id,
            kind,
            bounds: IntSize::ZERO,
            bounds_delta: Vec2::ZERO,
            position: Point::ORIGIN,
            offset_to_transform_parent: Vec2::ZERO,
            transform_tree_index: INVALID_NODE,
            effect_tree_index: INVALID_NODE,
            clip_tree_index: INVALID_NODE,
            scroll_tree_index: INVALID_NODE,
            masks_to_bounds: false,
            contents_opaque: false,
            draws_content: false,
            may_contain_video: false,
            use_parent_backface_visibility: false,
            use_local_transform_for_backface_visibility: false,
            should_check_backface_visibility: false,
            should_flatten_transform_from_property_tree: false,
            has_will_change_transform_hint: false,
            scrollbars_hidden: false,
            is_drawn_render_surface_layer_list_member: false,
            was_ever_ready_since_last_transform_animation: true,
            background_color: Color::TRANSPARENT,
            safe_opaque_background_color: Color::TRANSPARENT,
            draw_blend_mode: BlendMode::SrcOver,
            preferred_raster_bounds: None,
            scroll_clip_layer_id: None,
            user_scrollable_horizontal: true,
            user_scrollable_vertical: true,
            main_thread_scrolling_reasons: MainThreadScrollingReasons::NOT_SCROLLING_ON_MAIN,
            non_fast_scrollable_region: Region::new(),
            touch_event_handler_region: Region::new(),
            element_id: None,
            mutable_properties: MutableProperties::NONE,
            layer_property_changed: false,
            needs_push_properties: false,
            update_rect: IntRect::EMPTY,
            damage_rect: IntRect::EMPTY,
            current_draw_mode: DrawMode::None,
            draw_properties: DrawProperties::default(),
            debug_info: None,
        }
    }

    /// The layer's id.
    #[must_use]
    pub const fn id(&self) -> LayerId {
        self.id
    }

    /// The layer's kind.
    #[must_use]
    pub const fn kind(&self) -> &LayerKind {
        &self.kind
    }

    /// Effective bounds: stored bounds grown by the ceiling of the bounds
    /// delta, saturating at the `i32` range.
    #[must_use]
    pub fn bounds(&self) -> IntSize {
        IntSize::new(
            self.bounds
                .width
                .saturating_add(ceil_to_i32(self.bounds_delta.x)),
            self.bounds
                .height
                .saturating_add(ceil_to_i32(self.bounds_delta.y)),
        )
    }

    /// Bounds as set by the producer, without the delta.
    #[must_use]
    pub const fn base_bounds(&self) -> IntSize {
        self.bounds
    }

    /// Fractional bounds used for scroll extents, keeping the exact delta.
    #[must_use]
    pub fn bounds_for_scrolling(&self) -> Size {
        Size::new(
            f64::from(self.bounds.width) + self.bounds_delta.x,
            f64::from(self.bounds.height) + self.bounds_delta.y,
        )
    }

    /// Consumer-side adjustment applied on top of the stored bounds.
    #[must_use]
    pub const fn bounds_delta(&self) -> Vec2 {
        self.bounds_delta
    }

    /// Position relative to the parent.
    #[must_use]
    pub const fn position(&self) -> Point {
        self.position
    }

    /// Offset from the origin of the layer's transform node.
    #[must_use]
    pub const fn offset_to_transform_parent(&self) -> Vec2 {
        self.offset_to_transform_parent
    }

    /// Index into the transform tree.
    #[must_use]
    pub const fn transform_tree_index(&self) -> u32 {
        self.transform_tree_index
    }

    /// Index into the effect tree.
    #[must_use]
    pub const fn effect_tree_index(&self) -> u32 {
        self.effect_tree_index
    }

    /// Index into the clip tree.
    #[must_use]
    pub const fn clip_tree_index(&self) -> u32 {
        self.clip_tree_index
    }

    /// Index into the scroll tree.
    #[must_use]
    pub const fn scroll_tree_index(&self) -> u32 {
        self.scroll_tree_index
    }

    /// Whether descendants are clipped to this layer's bounds.
    #[must_use]
    pub const fn masks_to_bounds(&self) -> bool {
        self.masks_to_bounds
    }

    /// Whether every pixel the layer draws is opaque.
    #[must_use]
    pub const fn contents_opaque(&self) -> bool {
        self.contents_opaque
    }

    /// Whether the layer draws anything itself.
    #[must_use]
    pub const fn draws_content(&self) -> bool {
        self.draws_content
    }

    /// Whether the layer may present video frames.
    #[must_use]
    pub const fn may_contain_video(&self) -> bool {
        self.may_contain_video
    }

    /// Whether backface visibility is inherited from the parent.
    #[must_use]
    pub const fn use_parent_backface_visibility(&self) -> bool {
        self.use_parent_backface_visibility
    }

    /// Whether backface visibility uses the local rather than the screen
    /// transform.
    #[must_use]
    pub const fn use_local_transform_for_backface_visibility(&self) -> bool {
        self.use_local_transform_for_backface_visibility
    }

    /// Whether the draw pass must test this layer's backface.
    #[must_use]
    pub const fn should_check_backface_visibility(&self) -> bool {
        self.should_check_backface_visibility
    }

    /// Whether draw and screen transforms are flattened to 2-D.
    #[must_use]
    pub const fn should_flatten_transform_from_property_tree(&self) -> bool {
        self.should_flatten_transform_from_property_tree
    }

    /// Whether the producer hinted that the transform will change.
    #[must_use]
    pub const fn has_will_change_transform_hint(&self) -> bool {
        self.has_will_change_transform_hint
    }

    /// Whether overlay scrollbars for this layer are hidden.
    #[must_use]
    pub const fn scrollbars_hidden(&self) -> bool {
        self.scrollbars_hidden
    }

    /// Whether the draw-properties pass selected this layer for drawing
    /// this frame.
    #[must_use]
    pub const fn is_drawn_render_surface_layer_list_member(&self) -> bool {
        self.is_drawn_render_surface_layer_list_member
    }

    /// `false` after a transform animation changed until the layer is
    /// drawn ready again.
    #[must_use]
    pub const fn was_ever_ready_since_last_transform_animation(&self) -> bool {
        self.was_ever_ready_since_last_transform_animation
    }

    /// The background color.
    #[must_use]
    pub const fn background_color(&self) -> Color {
        self.background_color
    }

    /// Color used to fill uncovered areas of the layer.
    ///
    /// Opaque layers use their stored safe color. Otherwise the background
    /// color is used, unless it is fully opaque, in which case transparent
    /// is returned so the fill cannot hide content the layer does not draw.
    #[must_use]
    pub const fn safe_opaque_background_color(&self) -> Color {
        if self.contents_opaque {
            return self.safe_opaque_background_color;
        }
        if self.background_color.is_opaque() {
            Color::TRANSPARENT
        } else {
            self.background_color
        }
    }

    /// The blend mode used when drawing.
    #[must_use]
    pub const fn draw_blend_mode(&self) -> BlendMode {
        self.draw_blend_mode
    }

    /// Raster size requested by the producer, if any.
    #[must_use]
    pub const fn preferred_raster_bounds(&self) -> Option<IntSize> {
        self.preferred_raster_bounds
    }

    /// Id of the layer whose bounds clip this layer's scrolling.
    #[must_use]
    pub const fn scroll_clip_layer_id(&self) -> Option<LayerId> {
        self.scroll_clip_layer_id
    }

    /// A layer scrolls if and only if it has a scroll clip layer.
    #[must_use]
    pub const fn scrollable(&self) -> bool {
        self.scroll_clip_layer_id.is_some()
    }

    /// Scrollable layers snap to whole pixels.
    #[must_use]
    pub const fn is_snapped(&self) -> bool {
        self.scrollable()
    }

    /// Whether user input may scroll the layer along `orientation`.
    #[must_use]
    pub const fn user_scrollable(&self, orientation: ScrollbarOrientation) -> bool {
        match orientation {
            ScrollbarOrientation::Horizontal => self.user_scrollable_horizontal,
            ScrollbarOrientation::Vertical => self.user_scrollable_vertical,
        }
    }

    /// Why scrolling must happen on the main thread.
    #[must_use]
    pub const fn main_thread_scrolling_reasons(&self) -> MainThreadScrollingReasons {
        self.main_thread_scrolling_reasons
    }

    /// Area where a scroll gesture must be routed to the main thread.
    #[must_use]
    pub const fn non_fast_scrollable_region(&self) -> &Region {
        &self.non_fast_scrollable_region
    }

    /// Area covered by touch event handlers.
    #[must_use]
    pub const fn touch_event_handler_region(&self) -> &Region {
        &self.touch_event_handler_region
    }

    /// The animation element id, if any.
    #[must_use]
    pub const fn element_id(&self) -> Option<ElementId> {
        self.element_id
    }

    /// Properties an off-thread mutator may change.
    #[must_use]
    pub const fn mutable_properties(&self) -> MutableProperties {
        self.mutable_properties
    }

    /// The node-local change flag alone.
    ///
    /// See [`LayerTree::layer_property_changed`](crate::tree::LayerTree::layer_property_changed)
    /// for the value that also accounts for property-tree changes.
    #[must_use]
    pub const fn layer_property_changed_flag(&self) -> bool {
        self.layer_property_changed
    }

    /// Whether the layer has state not yet pushed to the active tree.
    #[must_use]
    pub const fn needs_push_properties(&self) -> bool {
        self.needs_push_properties
    }

    /// Region invalidated since the last push or reset.
    #[must_use]
    pub const fn update_rect(&self) -> IntRect {
        self.update_rect
    }

    /// Paint damage accumulated since the last reset.
    #[must_use]
    pub const fn damage_rect(&self) -> IntRect {
        self.damage_rect
    }

    /// The draw mode; [`DrawMode::None`] outside a draw bracket.
    #[must_use]
    pub const fn current_draw_mode(&self) -> DrawMode {
        self.current_draw_mode
    }

    /// The draw-properties snapshot.
    #[must_use]
    pub const fn draw_properties(&self) -> &DrawProperties {
        &self.draw_properties
    }

    /// Visible part of the layer from the last draw-properties pass.
    #[must_use]
    pub const fn visible_layer_rect(&self) -> IntRect {
        self.draw_properties.visible_layer_rect
    }

    /// Area known to be fully opaque: the visible rect when contents are
    /// opaque, empty otherwise.
    #[must_use]
    pub const fn visible_opaque_region(&self) -> IntRect {
        if self.contents_opaque {
            self.draw_properties.visible_layer_rect
        } else {
            IntRect::EMPTY
        }
    }

    /// The attached diagnostics payload, if this layer owns one.
    #[must_use]
    pub fn debug_info(&self) -> Option<&dyn DebugInfo> {
        self.debug_info.as_deref()
    }
}

fn ceil_to_i32(v: f64) -> i32 {
    #[cfg(not(feature = "std"))]
    use kurbo::common::FloatFuncs as _;

    #[expect(
        clippy::cast_possible_truncation,
        reason = "float to int casts saturate, and callers add with saturation"
    )]
    let ceiled = v.ceil() as i32;
    ceiled
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layer() -> Layer {
        Layer::new(LayerId::new(1), LayerKind::Base)
    }

    #[test]
    fn fresh_layer_defaults() {
        let l = layer();
        assert_eq!(l.transform_tree_index(), INVALID_NODE);
        assert_eq!(l.current_draw_mode(), DrawMode::None);
        assert!(l.user_scrollable(ScrollbarOrientation::Horizontal));
        assert!(l.user_scrollable(ScrollbarOrientation::Vertical));
        assert!(!l.scrollable());
        assert!(l.update_rect().is_empty());
        assert!(l.was_ever_ready_since_last_transform_animation());
    }

    #[test]
    fn bounds_round_the_delta_up() {
        let mut l = layer();
        l.bounds = IntSize::new(100, 50);
        l.bounds_delta = Vec2::new(0.25, -2.5);
        assert_eq!(l.bounds(), IntSize::new(101, 48));
        assert_eq!(l.base_bounds(), IntSize::new(100, 50));
        assert_eq!(l.bounds_for_scrolling(), Size::new(100.25, 47.5));
    }

    #[test]
    fn huge_bounds_delta_saturates() {
        let mut l = layer();
        l.bounds = IntSize::new(i32::MAX - 1, 10);
        l.bounds_delta = Vec2::new(5.5, -1.0e12);
        assert_eq!(l.bounds(), IntSize::new(i32::MAX, i32::MIN + 10));
    }

    #[test]
    fn safe_background_depends_on_opacity() {
        let mut l = layer();
        l.safe_opaque_background_color = Color::WHITE;

        l.background_color = Color::BLACK;
        assert_eq!(l.safe_opaque_background_color(), Color::TRANSPARENT);

        l.background_color = Color::from_argb(0x40, 0, 0, 0);
        assert_eq!(l.safe_opaque_background_color(), l.background_color);

        l.contents_opaque = true;
        assert_eq!(l.safe_opaque_background_color(), Color::WHITE);
    }

    #[test]
    fn opaque_region_requires_opaque_contents() {
        let mut l = layer();
        l.draw_properties.visible_layer_rect = IntRect::new(0, 0, 10, 10);
        assert!(l.visible_opaque_region().is_empty());
        l.contents_opaque = true;
        assert_eq!(l.visible_opaque_region(), IntRect::new(0, 0, 10, 10));
    }
}
