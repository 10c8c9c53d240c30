// Copyright 2026 the Cambium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The closed set of layer kinds.

use super::LayerId;
use crate::geometry::IntSize;

/// Axis a scrollbar (or a scroll query) refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScrollbarOrientation {
    /// Left to right.
    Horizontal,
    /// Top to bottom.
    Vertical,
}

/// An opaque handle to a GPU or software resource owned elsewhere.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ResourceId(pub u32);

/// Data carried by a scrollbar layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ScrollbarKind {
    /// Which axis the scrollbar controls.
    pub orientation: ScrollbarOrientation,
    /// The layer the scrollbar scrolls, if attached.
    pub scroll_layer_id: Option<LayerId>,
}

/// What kind of layer a node is. Fixed at creation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LayerKind {
    /// A plain layer with no specialized behavior.
    #[default]
    Base,
    /// A scrollbar attached to a scrolling layer.
    Scrollbar(ScrollbarKind),
    /// A layer that presents an externally owned resource.
    TextureBacked {
        /// The presented resource.
        resource_id: ResourceId,
        /// Size of the resource in pixels.
        resource_size: IntSize,
    },
}

impl LayerKind {
    /// Name used in diagnostics.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Base => "cambium::Layer",
            Self::Scrollbar(_) => "cambium::ScrollbarLayer",
            Self::TextureBacked { .. } => "cambium::TextureLayer",
        }
    }

    /// The scrollbar data, if this is a scrollbar layer.
    #[must_use]
    pub const fn as_scrollbar(&self) -> Option<&ScrollbarKind> {
        match self {
            Self::Scrollbar(scrollbar) => Some(scrollbar),
            _ => None,
        }
    }

    /// The resource presented by a texture-backed layer, and its size.
    ///
    /// # Panics
    ///
    /// Panics for kinds that present no resource; callers must only ask
    /// layers that have one.
    #[must_use]
    pub fn contents_resource_id(&self) -> (ResourceId, IntSize) {
        match *self {
            Self::TextureBacked {
                resource_id,
                resource_size,
            } => (resource_id, resource_size),
            Self::Base | Self::Scrollbar(_) => {
                panic!("not reached: {} has no contents resource", self.type_name())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scrollbar_downcast() {
        let kind = LayerKind::Scrollbar(ScrollbarKind {
            orientation: ScrollbarOrientation::Vertical,
            scroll_layer_id: Some(LayerId::new(4)),
        });
        assert_eq!(
            kind.as_scrollbar().map(|s| s.orientation),
            Some(ScrollbarOrientation::Vertical)
        );
        assert!(LayerKind::Base.as_scrollbar().is_none());
        assert_eq!(kind.type_name(), "cambium::ScrollbarLayer");
    }

    #[test]
    fn texture_layers_expose_their_resource() {
        let kind = LayerKind::TextureBacked {
            resource_id: ResourceId(9),
            resource_size: IntSize::new(64, 32),
        };
        assert_eq!(
            kind.contents_resource_id(),
            (ResourceId(9), IntSize::new(64, 32))
        );
    }

    #[test]
    #[should_panic(expected = "not reached")]
    fn base_layer_has_no_resource() {
        let _ = LayerKind::Base.contents_resource_id();
    }
}
