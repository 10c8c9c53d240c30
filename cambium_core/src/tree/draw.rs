// Copyright 2026 the Cambium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The `will_draw` / `did_draw` bracket and the draw-properties snapshot.

use super::{LayerTree, TreePhase};
use crate::layer::{DrawMode, DrawProperties, LayerId};
use crate::trace::{DrawBeginEvent, DrawEndEvent};

impl<P: TreePhase> LayerTree<P> {
    /// Opens a draw bracket for `id` in `mode`.
    ///
    /// Returns whether the layer is ready to draw; a base layer always is.
    ///
    /// # Panics
    ///
    /// Panics if `mode` is [`DrawMode::None`] or the layer is already inside
    /// a bracket.
    pub fn will_draw(&mut self, id: LayerId, mode: DrawMode) -> bool {
        assert!(mode != DrawMode::None, "will_draw needs a draw mode");
        let layer = self.layer_mut(id);
        assert!(
            layer.current_draw_mode == DrawMode::None,
            "will_draw on layer {id:?} while it is already drawing"
        );
        layer.current_draw_mode = mode;
        self.tracer.draw_begin(&DrawBeginEvent { layer: id, mode });
        true
    }

    /// Closes the draw bracket opened by [`will_draw`](Self::will_draw).
    ///
    /// # Panics
    ///
    /// Panics if the layer is not inside a bracket.
    pub fn did_draw(&mut self, id: LayerId) {
        let layer = self.layer_mut(id);
        let mode = layer.current_draw_mode;
        assert!(
            mode != DrawMode::None,
            "did_draw on layer {id:?} without will_draw"
        );
        layer.current_draw_mode = DrawMode::None;
        self.tracer.draw_end(&DrawEndEvent { layer: id, mode });
    }

    /// Stores the draw-properties snapshot computed for `id`.
    pub fn set_draw_properties(&mut self, id: LayerId, properties: DrawProperties) {
        self.layer_mut(id).draw_properties = properties;
    }

    /// Records whether `id` made it into the drawn render-surface layer list.
    ///
    /// Derived transform queries read the snapshot only while this is set.
    pub fn set_is_drawn_render_surface_layer_list_member(&mut self, id: LayerId, member: bool) {
        self.layer_mut(id).is_drawn_render_surface_layer_list_member = member;
    }
}
