// Copyright 2026 the Cambium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Integer geometry used for layer bounds and invalidation accumulators.
//!
//! Fractional geometry (positions, offsets, deltas, clip rectangles) uses
//! [`kurbo`] types directly. Layer bounds and the update/damage accumulators
//! are integral, and their union must treat an empty rectangle as the
//! identity so that accumulators can start out empty.

use alloc::vec::Vec;

/// A scroll offset in layer space.
pub type ScrollOffset = kurbo::Vec2;

/// An integer width and height.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct IntSize {
    /// Width in layer-space pixels.
    pub width: i32,
    /// Height in layer-space pixels.
    pub height: i32,
}

impl IntSize {
    /// The zero size.
    pub const ZERO: Self = Self::new(0, 0);

    /// Creates a size from width and height.
    #[inline]
    #[must_use]
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Returns `true` if either dimension is zero or negative.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Converts to a fractional [`kurbo::Size`].
    #[inline]
    #[must_use]
    pub fn to_kurbo(self) -> kurbo::Size {
        kurbo::Size::new(f64::from(self.width), f64::from(self.height))
    }
}

/// An integer axis-aligned rectangle.
///
/// A rectangle with zero or negative width or height is empty. Empty
/// rectangles do not contribute to [`union`](Self::union).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct IntRect {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Width.
    pub width: i32,
    /// Height.
    pub height: i32,
}

impl IntRect {
    /// The empty rectangle at the origin.
    pub const EMPTY: Self = Self::new(0, 0, 0, 0);

    /// Creates a rectangle from origin and size.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Creates a rectangle at the origin with the given size.
    #[inline]
    #[must_use]
    pub const fn from_size(size: IntSize) -> Self {
        Self::new(0, 0, size.width, size.height)
    }

    /// The smallest integer rectangle covering `rect`, clamped to the `i32`
    /// range.
    #[must_use]
    pub fn enclosing(rect: kurbo::Rect) -> Self {
        let outer = rect.abs().expand();
        let x = saturating_i32(outer.x0);
        let y = saturating_i32(outer.y0);
        Self::new(
            x,
            y,
            saturating_i32(outer.x1).saturating_sub(x),
            saturating_i32(outer.y1).saturating_sub(y),
        )
    }

    /// Converts to a fractional [`kurbo::Rect`].
    #[inline]
    #[must_use]
    pub fn to_kurbo(self) -> kurbo::Rect {
        kurbo::Rect::new(
            f64::from(self.x),
            f64::from(self.y),
            f64::from(self.right()),
            f64::from(self.bottom()),
        )
    }

    /// Right edge (exclusive), saturating at `i32::MAX`.
    #[inline]
    #[must_use]
    pub const fn right(self) -> i32 {
        self.x.saturating_add(self.width)
    }

    /// Bottom edge (exclusive), saturating at `i32::MAX`.
    #[inline]
    #[must_use]
    pub const fn bottom(self) -> i32 {
        self.y.saturating_add(self.height)
    }

    /// Returns `true` if the rectangle covers no area.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Returns the smallest rectangle containing both `self` and `other`.
    ///
    /// If either rectangle is empty the other is returned unchanged. Edges
    /// past the `i32` range are clamped to it.
    #[must_use]
    pub fn union(self, other: Self) -> Self {
        if other.is_empty() {
            return self;
        }
        if self.is_empty() {
            return other;
        }
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Self::new(x, y, right.saturating_sub(x), bottom.saturating_sub(y))
    }

    /// Returns `true` if `other` lies entirely within `self`.
    ///
    /// Every rectangle contains the empty rectangle.
    #[must_use]
    pub fn contains_rect(self, other: Self) -> bool {
        if other.is_empty() {
            return true;
        }
        !self.is_empty()
            && other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Returns `true` if the pixel at (`x`, `y`) lies inside.
    #[must_use]
    pub const fn contains_point(self, x: i32, y: i32) -> bool {
        x >= self.x && y >= self.y && x < self.right() && y < self.bottom()
    }
}

fn saturating_i32(v: f64) -> i32 {
    #[expect(
        clippy::cast_possible_truncation,
        reason = "float to int casts saturate, which is the clamping wanted here"
    )]
    let v = v as i32;
    v
}

/// A set of integer rectangles, used for input hit-testing regions.
///
/// Rectangles may overlap; a point is in the region if any rectangle
/// contains it. Empty rectangles are never stored.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Region {
    rects: Vec<IntRect>,
}

impl Region {
    /// The empty region.
    #[must_use]
    pub const fn new() -> Self {
        Self { rects: Vec::new() }
    }

    /// A region covering a single rectangle.
    #[must_use]
    pub fn from_rect(rect: IntRect) -> Self {
        let mut region = Self::new();
        region.union_rect(rect);
        region
    }

    /// Adds `rect` to the region. Empty rectangles and rectangles already
    /// covered by a single stored rectangle are skipped.
    pub fn union_rect(&mut self, rect: IntRect) {
        if rect.is_empty() || self.rects.iter().any(|r| r.contains_rect(rect)) {
            return;
        }
        self.rects.retain(|r| !rect.contains_rect(*r));
        self.rects.push(rect);
    }

    /// Returns `true` if the region covers no area.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    /// The stored rectangles.
    #[must_use]
    pub fn rects(&self) -> &[IntRect] {
        &self.rects
    }

    /// The bounding box of the region.
    #[must_use]
    pub fn bounds(&self) -> IntRect {
        self.rects
            .iter()
            .fold(IntRect::EMPTY, |acc, r| acc.union(*r))
    }

    /// Returns `true` if any stored rectangle contains the pixel at
    /// (`x`, `y`).
    #[must_use]
    pub fn contains_point(&self, x: i32, y: i32) -> bool {
        self.rects.iter().any(|r| r.contains_point(x, y))
    }
}

/// A 3-D axis-aligned box, used for animation bounds.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Box3d {
    /// Minimum corner.
    pub origin: [f64; 3],
    /// Extent along each axis.
    pub size: [f64; 3],
}

impl Box3d {
    /// Creates a box from its minimum corner and extent.
    #[inline]
    #[must_use]
    pub const fn new(origin: [f64; 3], size: [f64; 3]) -> Self {
        Self { origin, size }
    }
}
