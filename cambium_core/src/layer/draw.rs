// Copyright 2026 the Cambium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Draw-time state: the draw-mode bracket and the per-frame snapshot.

use kurbo::Rect;

use crate::geometry::IntRect;
use crate::transform::Transform3d;

/// How a layer is being drawn between `will_draw` and `did_draw`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DrawMode {
    /// Not drawing.
    #[default]
    None,
    /// Drawing through the GPU compositor.
    Hardware,
    /// Drawing with the software compositor.
    Software,
    /// Drawing in software without access to GPU resources.
    ResourcelessSoftware,
}

/// Resolved draw state for a layer, written by the draw-properties pass.
///
/// Only meaningful while the layer is a member of the drawn render-surface
/// layer list; otherwise the derived queries on
/// [`LayerTree`](crate::tree::LayerTree) recompute values from the property
/// trees instead of reading this snapshot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawProperties {
    /// Maps layer space into the space of the layer's render target.
    pub target_space_transform: Transform3d,
    /// Maps layer space into screen space.
    pub screen_space_transform: Transform3d,
    /// Part of the layer that is visible, in layer space.
    pub visible_layer_rect: IntRect,
    /// Clip applied to the layer, in target space.
    pub clip_rect: Rect,
    /// Whether `clip_rect` applies.
    pub is_clipped: bool,
    /// Opacity relative to the render target.
    pub opacity: f32,
}

impl Default for DrawProperties {
    fn default() -> Self {
        Self {
            target_space_transform: Transform3d::IDENTITY,
            screen_space_transform: Transform3d::IDENTITY,
            visible_layer_rect: IntRect::EMPTY,
            clip_rect: Rect::ZERO,
            is_clipped: false,
            opacity: 0.0,
        }
    }
}
