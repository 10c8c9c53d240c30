// Copyright 2026 the Cambium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layer and element identity, plus the small bit sets carried per layer.

use core::fmt;
use core::ops::BitOr;

/// Identifies a layer within a [`LayerTree`](crate::tree::LayerTree).
///
/// Ids are chosen by the embedder and shared between the pending and active
/// copies of the same layer; that shared id is how a pending layer finds its
/// active counterpart.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LayerId(i32);

impl LayerId {
    /// Wraps a raw id.
    ///
    /// # Panics
    ///
    /// Panics if `raw` is zero or negative.
    #[inline]
    #[must_use]
    pub const fn new(raw: i32) -> Self {
        assert!(raw > 0, "layer id must be positive");
        Self(raw)
    }

    /// Returns the raw id.
    #[inline]
    #[must_use]
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl fmt::Debug for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LayerId({})", self.0)
    }
}

/// A stable identifier used by the animation system to address a layer
/// independently of its [`LayerId`].
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ElementId(pub u64);

impl fmt::Debug for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ElementId({})", self.0)
    }
}

/// Properties an off-thread mutator is allowed to change on a layer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct MutableProperties(u32);

impl MutableProperties {
    /// Nothing is mutable.
    pub const NONE: Self = Self(0);
    /// Opacity.
    pub const OPACITY: Self = Self(1 << 0);
    /// Horizontal scroll offset.
    pub const SCROLL_LEFT: Self = Self(1 << 1);
    /// Vertical scroll offset.
    pub const SCROLL_TOP: Self = Self(1 << 2);
    /// Transform.
    pub const TRANSFORM: Self = Self(1 << 3);

    /// Builds a set from raw bits.
    #[inline]
    #[must_use]
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// Returns the raw bits.
    #[inline]
    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Returns `true` if no property is mutable.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if every property in `other` is also in `self`.
    #[inline]
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for MutableProperties {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Why scrolling of a layer has to happen on the main thread.
///
/// The empty set means the layer can be scrolled by the compositor alone.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct MainThreadScrollingReasons(u32);

impl MainThreadScrollingReasons {
    /// Compositor scrolling is possible.
    pub const NOT_SCROLLING_ON_MAIN: Self = Self(0);
    /// Fixed background attachments must be repainted while scrolling.
    pub const HAS_BACKGROUND_ATTACHMENT_FIXED_OBJECTS: Self = Self(1 << 0);
    /// Viewport-constrained content lives outside a composited layer.
    pub const HAS_NON_LAYER_VIEWPORT_CONSTRAINED_OBJECTS: Self = Self(1 << 1);
    /// Threaded scrolling is turned off.
    pub const THREADED_SCROLLING_DISABLED: Self = Self(1 << 2);
    /// A scrollbar is being dragged.
    pub const SCROLLBAR_SCROLLING: Self = Self(1 << 3);
    /// A page overlay is present.
    pub const PAGE_OVERLAY: Self = Self(1 << 4);
    /// The scroll started inside a region with blocking event handlers.
    pub const NON_FAST_SCROLLABLE_REGION: Self = Self(1 << 5);

    /// Builds a set from raw bits.
    #[inline]
    #[must_use]
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// Returns the raw bits.
    #[inline]
    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Returns `true` if the compositor may scroll without the main thread.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if every reason in `other` is also in `self`.
    #[inline]
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for MainThreadScrollingReasons {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[should_panic(expected = "layer id must be positive")]
    fn zero_layer_id_panics() {
        let _ = LayerId::new(0);
    }

    #[test]
    #[should_panic(expected = "layer id must be positive")]
    fn negative_layer_id_panics() {
        let _ = LayerId::new(-3);
    }

    #[test]
    fn layer_ids_order_by_raw_value() {
        assert!(LayerId::new(2) < LayerId::new(10));
        assert_eq!(LayerId::new(7).get(), 7);
    }

    #[test]
    fn bit_sets_combine() {
        let props = MutableProperties::OPACITY | MutableProperties::TRANSFORM;
        assert!(props.contains(MutableProperties::OPACITY));
        assert!(!props.contains(MutableProperties::SCROLL_TOP));
        assert!(MutableProperties::NONE.is_empty());

        let reasons = MainThreadScrollingReasons::PAGE_OVERLAY
            | MainThreadScrollingReasons::SCROLLBAR_SCROLLING;
        assert!(reasons.contains(MainThreadScrollingReasons::PAGE_OVERLAY));
        assert!(MainThreadScrollingReasons::NOT_SCROLLING_ON_MAIN.is_empty());
    }
}
