// Copyright 2026 the Cambium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The query interface to the animation system.
//!
//! The layer tree never runs animations. It asks a [`MutatorHost`] about the
//! animations attached to a layer's [`ElementId`], and receives
//! [`PropertyAnimationState`] notifications through
//! [`LayerTree::on_is_animating_changed`](crate::tree::LayerTree::on_is_animating_changed).
//!
//! Every `MutatorHost` method defaults to "no animation", so a host only
//! overrides the queries it can answer.

use core::fmt;

use crate::geometry::Box3d;
use crate::layer::ElementId;

/// Which copy of the layer tree an animation query refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementListType {
    /// The tree being drawn.
    Active,
    /// The tree being built.
    Pending,
}

/// A property an animation can target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TargetProperty {
    /// The layer transform.
    Transform,
    /// The layer opacity.
    Opacity,
    /// Filter effects.
    Filter,
    /// The scroll offset.
    ScrollOffset,
    /// The background color.
    BackgroundColor,
}

impl TargetProperty {
    /// Every target property, in declaration order.
    pub const ALL: [Self; 5] = [
        Self::Transform,
        Self::Opacity,
        Self::Filter,
        Self::ScrollOffset,
        Self::BackgroundColor,
    ];

    const fn bit(self) -> u8 {
        1 << self as u8
    }
}

/// A set of [`TargetProperty`] values.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct TargetProperties(u8);

impl TargetProperties {
    /// The empty set.
    pub const NONE: Self = Self(0);

    /// Returns the set with `property` added.
    #[inline]
    #[must_use]
    pub const fn with(self, property: TargetProperty) -> Self {
        Self(self.0 | property.bit())
    }

    /// Adds or removes `property`.
    #[inline]
    pub fn set(&mut self, property: TargetProperty, value: bool) {
        if value {
            self.0 |= property.bit();
        } else {
            self.0 &= !property.bit();
        }
    }

    /// Returns `true` if `property` is in the set.
    #[inline]
    #[must_use]
    pub const fn contains(self, property: TargetProperty) -> bool {
        self.0 & property.bit() != 0
    }
}

/// Per-property animation status.
///
/// Used twice per notification: once as a mask saying which bits are
/// meaningful, once as the new values.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct PropertyAnimationState {
    /// Properties with an animation running right now.
    pub currently_running: TargetProperties,
    /// Properties with an animation that exists and may run.
    pub potentially_animating: TargetProperties,
}

/// Answers questions about the animations attached to an element.
pub trait MutatorHost: fmt::Debug {
    /// A transform animation is running on `element` in `list`.
    fn is_animating_transform_property(&self, element: ElementId, list: ElementListType) -> bool {
        _ = (element, list);
        false
    }

    /// A filter animation is running on `element` in `list`.
    fn is_animating_filter_property(&self, element: ElementId, list: ElementListType) -> bool {
        _ = (element, list);
        false
    }

    /// A transform animation exists on `element` in `list` that may run.
    fn has_potentially_running_transform_animation(
        &self,
        element: ElementId,
        list: ElementListType,
    ) -> bool {
        _ = (element, list);
        false
    }

    /// A filter animation exists on `element` in `list` that may run.
    fn has_potentially_running_filter_animation(
        &self,
        element: ElementId,
        list: ElementListType,
    ) -> bool {
        _ = (element, list);
        false
    }

    /// Every transform animation on `element` in `list` is a translation.
    fn has_only_translation_transforms(&self, element: ElementId, list: ElementListType) -> bool {
        _ = (element, list);
        true
    }

    /// Some animation on `element` targets `property`.
    fn has_any_animation_targeting_property(
        &self,
        element: ElementId,
        property: TargetProperty,
    ) -> bool {
        _ = (element, property);
        false
    }

    /// A filter animation on `element` can grow the painted area.
    fn has_filter_animation_that_inflates_bounds(&self, element: ElementId) -> bool {
        _ = element;
        false
    }

    /// A transform animation on `element` can grow the painted area.
    fn has_transform_animation_that_inflates_bounds(&self, element: ElementId) -> bool {
        _ = element;
        false
    }

    /// Any animation on `element` can grow the painted area.
    fn has_animation_that_inflates_bounds(&self, element: ElementId) -> bool {
        _ = element;
        false
    }

    /// Bounds covered by `bounds` over the lifetime of `element`'s filter
    /// animations, or `None` if they cannot be computed.
    fn filter_animation_bounds_for_box(&self, element: ElementId, bounds: Box3d) -> Option<Box3d> {
        _ = element;
        Some(bounds)
    }

    /// Bounds covered by `bounds` over the lifetime of `element`'s transform
    /// animations, or `None` if they cannot be computed.
    fn transform_animation_bounds_for_box(
        &self,
        element: ElementId,
        bounds: Box3d,
    ) -> Option<Box3d> {
        _ = element;
        Some(bounds)
    }
}

/// A [`MutatorHost`] with no animations.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoAnimations;

impl MutatorHost for NoAnimations {}
