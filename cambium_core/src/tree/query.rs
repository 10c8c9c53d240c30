// Copyright 2026 the Cambium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Values derived from the property trees.
//!
//! A layer's opacity, transforms, render target, and visibility are not
//! stored on the layer; they are read through its property-tree indices.
//! Missing nodes resolve to the default each query documents.

use kurbo::{Point, Rect, Vec2};

use super::{LayerTree, TreePhase};
use crate::geometry::IntRect;
use crate::layer::{Layer, LayerId};
use crate::property_trees::{INVALID_NODE, RenderSurface, TreeType};
use crate::transform::{Transform3d, is_integral};

impl<P: TreePhase> LayerTree<P> {
    /// Whether `id` changed visually since change tracking was last reset.
    ///
    /// True when the layer's own flag is set, when the whole tree is
    /// damaged, or when the layer's transform or effect node changed.
    #[must_use]
    pub fn layer_property_changed(&self, id: LayerId) -> bool {
        let layer = self.layer(id);
        let trees = &self.property_trees;
        if layer.layer_property_changed || trees.full_tree_damaged {
            return true;
        }
        if layer.transform_tree_index == INVALID_NODE {
            return false;
        }
        if trees
            .transform_tree
            .node(layer.transform_tree_index)
            .is_some_and(|node| node.transform_changed)
        {
            return true;
        }
        trees
            .effect_tree
            .node(layer.effect_tree_index)
            .is_some_and(|node| node.effect_changed)
    }

    /// The opacity of the effect node `id` owns; `1.0` if it owns none.
    #[must_use]
    pub fn opacity(&self, id: LayerId) -> f32 {
        let trees = &self.property_trees;
        trees
            .node_index_for_layer(TreeType::Effect, id)
            .and_then(|index| trees.effect_tree.node(index))
            .map_or(1.0, |node| node.opacity)
    }

    /// The local transform of the transform node `id` owns.
    ///
    /// # Panics
    ///
    /// Panics if `id` owns no transform node.
    #[must_use]
    pub fn transform(&self, id: LayerId) -> Transform3d {
        let trees = &self.property_trees;
        let node = trees
            .node_index_for_layer(TreeType::Transform, id)
            .and_then(|index| trees.transform_tree.node(index));
        match node {
            Some(node) => node.local,
            None => panic!("layer {id:?} has no transform node"),
        }
    }

    /// Maps layer space into the space of the layer's render target.
    ///
    /// Uses the cached draw properties when the layer was selected for
    /// drawing this frame, and derives the transform from the property
    /// trees otherwise.
    #[must_use]
    pub fn draw_transform(&self, id: LayerId) -> Transform3d {
        let layer = self.layer(id);
        if layer.is_drawn_render_surface_layer_list_member {
            return layer.draw_properties.target_space_transform;
        }
        if self.property_trees.non_root_surfaces_enabled {
            self.draw_transform_from_property_trees(layer)
        } else {
            self.screen_space_transform_from_property_trees(layer)
        }
    }

    /// Maps layer space into screen space.
    ///
    /// Uses the cached draw properties when the layer was selected for
    /// drawing this frame, and derives the transform from the property
    /// trees otherwise.
    #[must_use]
    pub fn screen_space_transform(&self, id: LayerId) -> Transform3d {
        let layer = self.layer(id);
        if layer.is_drawn_render_surface_layer_list_member {
            return layer.draw_properties.screen_space_transform;
        }
        self.screen_space_transform_from_property_trees(layer)
    }

    /// The layer's effective bounds mapped into target space, rounded out to
    /// whole pixels.
    #[must_use]
    pub fn enclosing_rect_in_target_space(&self, id: LayerId) -> IntRect {
        let bounds = IntRect::from_size(self.layer(id).bounds()).to_kurbo();
        IntRect::enclosing(self.draw_transform(id).map_clipped_rect(bounds))
    }

    /// Like [`enclosing_rect_in_target_space`](Self::enclosing_rect_in_target_space),
    /// but for contents rasterized at `scale`.
    ///
    /// The bounds are scaled and rounded up, then mapped by the draw
    /// transform with `scale` divided back out.
    ///
    /// # Panics
    ///
    /// Panics if `scale` is not positive.
    #[must_use]
    pub fn scaled_enclosing_rect_in_target_space(&self, id: LayerId, scale: f32) -> IntRect {
        assert!(scale > 0.0, "contents scale must be positive, got {scale}");
        let scale = f64::from(scale);
        let xform = self.draw_transform(id)
            * Transform3d::from_scale(scale.recip(), scale.recip(), 1.0);
        let scaled = (self.layer(id).bounds().to_kurbo() * scale).ceil();
        IntRect::enclosing(xform.map_clipped_rect(Rect::from_origin_size(Point::ORIGIN, scaled)))
    }

    fn draw_transform_from_property_trees(&self, layer: &Layer) -> Transform3d {
        let effect_tree = &self.property_trees.effect_tree;
        let owns_non_root_surface =
            !self.is_root_layer(layer.id) && self.render_surface(layer.id).is_some();
        if owns_non_root_surface {
            let scale = effect_tree
                .node(layer.effect_tree_index)
                .map_or(Vec2::new(1.0, 1.0), |node| node.surface_contents_scale);
            return Transform3d::from_scale(scale.x, scale.y, 1.0);
        }

        let target = effect_tree.node(self.render_target_effect_tree_index(layer.id));
        let (target_transform, scale) = target.map_or((INVALID_NODE, Vec2::new(1.0, 1.0)), |t| {
            (t.transform_id, t.surface_contents_scale)
        });
        let mut xform = Transform3d::from_scale(scale.x, scale.y, 1.0)
            * self
                .property_trees
                .transform_tree
                .to_target(layer.transform_tree_index, target_transform);
        if layer.should_flatten_transform_from_property_tree {
            xform = xform.flatten_to_2d();
        }
        xform.then_translate_local(layer.offset_to_transform_parent)
    }

    fn screen_space_transform_from_property_trees(&self, layer: &Layer) -> Transform3d {
        let xform = self
            .property_trees
            .transform_tree
            .to_screen(layer.transform_tree_index)
            .then_translate_local(layer.offset_to_transform_parent);
        if layer.should_flatten_transform_from_property_tree {
            xform.flatten_to_2d()
        } else {
            xform
        }
    }

    /// Whether the layer's screen-space opacity is exactly zero.
    #[must_use]
    pub fn is_hidden(&self, id: LayerId) -> bool {
        self.property_trees
            .effect_tree
            .node(self.layer(id).effect_tree_index)
            .is_some_and(|node| node.screen_space_opacity == 0.0)
    }

    /// The 3-D sorting context of the layer's transform node; `0` without
    /// one.
    #[must_use]
    pub fn sorting_context_id(&self, id: LayerId) -> i32 {
        self.property_trees
            .transform_tree
            .node(self.layer(id).transform_tree_index)
            .map_or(0, |node| node.sorting_context_id)
    }

    /// Whether the layer's transform node lies under the page-scale layer.
    #[must_use]
    pub fn is_affected_by_page_scale(&self, id: LayerId) -> bool {
        self.property_trees
            .transform_tree
            .node(self.layer(id).transform_tree_index)
            .is_some_and(|node| node.in_subtree_of_page_scale_layer)
    }

    /// Whether text in the layer may be rasterized with subpixel
    /// antialiasing.
    ///
    /// Requires the setting, opaque contents, full screen-space opacity,
    /// integer translations up the transform chain, and an integral offset
    /// to the transform parent. A missing tree node disqualifies the layer.
    #[must_use]
    pub fn can_use_lcd_text(&self, id: LayerId) -> bool {
        if self.settings.layers_always_allowed_lcd_text {
            return true;
        }
        if !self.settings.can_use_lcd_text {
            return false;
        }
        let layer = self.layer(id);
        if !layer.contents_opaque {
            return false;
        }
        let trees = &self.property_trees;
        let Some(effect) = trees.effect_tree.node(layer.effect_tree_index) else {
            return false;
        };
        if effect.screen_space_opacity != 1.0 {
            return false;
        }
        let Some(transform) = trees.transform_tree.node(layer.transform_tree_index) else {
            return false;
        };
        if !transform.node_and_ancestors_have_only_integer_translation {
            return false;
        }
        let offset = layer.offset_to_transform_parent;
        is_integral(offset.x) && is_integral(offset.y)
    }

    /// The effect node whose render surface the layer draws into.
    ///
    /// That is the layer's own effect node if it has a surface, and the
    /// node's cached target otherwise. [`INVALID_NODE`] without an effect
    /// node.
    #[must_use]
    pub fn render_target_effect_tree_index(&self, id: LayerId) -> u32 {
        let effect_tree = &self.property_trees.effect_tree;
        let index = self.layer(id).effect_tree_index;
        let Some(node) = effect_tree.node(index) else {
            return INVALID_NODE;
        };
        if effect_tree.render_surface(index).is_some() {
            node.id
        } else {
            node.target_id
        }
    }

    /// The render surface the layer owns, if any.
    ///
    /// A layer pointing at another layer's effect node owns no surface.
    #[must_use]
    pub fn render_surface(&self, id: LayerId) -> Option<&RenderSurface> {
        let effect_tree = &self.property_trees.effect_tree;
        let index = self.layer(id).effect_tree_index;
        let node = effect_tree.node(index)?;
        if node.owning_layer_id != Some(id) {
            return None;
        }
        effect_tree.render_surface(index)
    }

    /// The render surface the layer draws into.
    #[must_use]
    pub fn render_target(&self, id: LayerId) -> Option<&RenderSurface> {
        self.property_trees
            .effect_tree
            .render_surface(self.render_target_effect_tree_index(id))
    }

    /// Copy requests under the layer's effect node; `0` without one.
    #[must_use]
    pub fn num_copy_requests_in_target_subtree(&self, id: LayerId) -> u32 {
        self.property_trees
            .effect_tree
            .node(self.layer(id).effect_tree_index)
            .map_or(0, |node| node.num_copy_requests_in_subtree)
    }

    /// The scale at which the layer's contents should be rasterized.
    ///
    /// Device scale times page scale (when the layer is affected by it).
    /// With [`layer_transforms_should_scale_layer_contents`] set, the larger
    /// 2-D scale component of the screen-space transform is used instead,
    /// falling back to the former for perspective transforms.
    ///
    /// [`layer_transforms_should_scale_layer_contents`]: super::LayerTreeSettings::layer_transforms_should_scale_layer_contents
    #[must_use]
    pub fn ideal_contents_scale(&self, id: LayerId) -> f32 {
        let page_scale = if self.is_affected_by_page_scale(id) {
            self.page_scale_factor
        } else {
            1.0
        };
        let default_scale = page_scale * self.device_scale_factor;
        if !self.settings.layer_transforms_should_scale_layer_contents {
            return default_scale;
        }
        match self.screen_space_transform(id).scale_components_2d() {
            Some(scales) => {
                #[expect(
                    clippy::cast_possible_truncation,
                    reason = "contents scales are small factors well within f32 range"
                )]
                let scale = scales.x.max(scales.y) as f32;
                scale
            }
            None => default_scale,
        }
    }

    /// The bounds delta of the layer's scroll clip layer; zero when there is
    /// none.
    #[must_use]
    pub fn fixed_container_size_delta(&self, id: LayerId) -> Vec2 {
        self.scroll_clip_layer(id)
            .map_or(Vec2::ZERO, Layer::bounds_delta)
    }

    /// The layer whose bounds clip this layer's scrolling, if it exists.
    #[must_use]
    pub fn scroll_clip_layer(&self, id: LayerId) -> Option<&Layer> {
        self.layer(id)
            .scroll_clip_layer_id
            .and_then(|clip| self.get(clip))
    }
}
