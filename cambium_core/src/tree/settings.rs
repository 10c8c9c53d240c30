// Copyright 2026 the Cambium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tree-wide configuration.

/// Settings shared by the pending and active trees.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LayerTreeSettings {
    /// Whether LCD (subpixel) text may be used at all.
    pub can_use_lcd_text: bool,
    /// Forces LCD text on for every layer, skipping the per-layer checks.
    pub layers_always_allowed_lcd_text: bool,
    /// Whether the ideal contents scale follows the scale of the layer's
    /// screen-space transform.
    pub layer_transforms_should_scale_layer_contents: bool,
}

impl LayerTreeSettings {
    /// The default settings.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            can_use_lcd_text: true,
            layers_always_allowed_lcd_text: false,
            layer_transforms_should_scale_layer_contents: false,
        }
    }
}

impl Default for LayerTreeSettings {
    fn default() -> Self {
        Self::new()
    }
}
