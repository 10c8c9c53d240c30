// Copyright 2026 the Cambium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Column-major 4×4 transform for property-tree nodes.
//!
//! Covers what the transform tree and the draw-transform derivations need:
//! composition, translation, flattening to 2-D, rect mapping, and the
//! classification predicates used for LCD text and contents-scale
//! decisions.

use core::ops::Mul;

use kurbo::{Rect, Vec2};
#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

/// A column-major 4×4 transform stored as `[[f64; 4]; 4]`.
///
/// `cols[j][i]` is row `i` of column `j`; the translation lives in
/// `cols[3]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform3d {
    /// Four columns, each a 4-element array `[x, y, z, w]`.
    pub cols: [[f64; 4]; 4],
}

impl Transform3d {
    /// The 4×4 identity matrix.
    pub const IDENTITY: Self = Self {
        cols: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    /// Creates a pure translation transform.
    #[inline]
    #[must_use]
    pub const fn from_translation(x: f64, y: f64, z: f64) -> Self {
        Self {
            cols: [
                [1.0, 0.0, 0.0, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [x, y, z, 1.0],
            ],
        }
    }

    /// Creates a 2-D translation from a vector.
    #[inline]
    #[must_use]
    pub const fn from_offset(offset: Vec2) -> Self {
        Self::from_translation(offset.x, offset.y, 0.0)
    }

    /// Creates a non-uniform scale transform.
    #[inline]
    #[must_use]
    pub const fn from_scale(sx: f64, sy: f64, sz: f64) -> Self {
        Self {
            cols: [
                [sx, 0.0, 0.0, 0.0],
                [0.0, sy, 0.0, 0.0],
                [0.0, 0.0, sz, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }

    /// Returns the translation component as a 2-D vector.
    #[inline]
    #[must_use]
    pub const fn translation_2d(&self) -> Vec2 {
        Vec2::new(self.cols[3][0], self.cols[3][1])
    }

    /// Post-multiplies by a 2-D translation (`self * T(offset)`).
    ///
    /// The offset is applied in the local space of `self`, before the rest
    /// of the transform.
    #[must_use]
    pub fn then_translate_local(self, offset: Vec2) -> Self {
        self * Self::from_offset(offset)
    }

    /// Drops the z contribution so the transform maps into the z = 0 plane.
    #[must_use]
    pub const fn flatten_to_2d(mut self) -> Self {
        self.cols[0][2] = 0.0;
        self.cols[1][2] = 0.0;
        self.cols[2] = [0.0, 0.0, 1.0, 0.0];
        self.cols[3][2] = 0.0;
        self
    }

    /// Returns `true` if this is exactly the identity.
    #[inline]
    #[must_use]
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// Returns `true` if the transform is a pure translation (any amount).
    #[must_use]
    pub fn is_translation(&self) -> bool {
        let mut linear = *self;
        linear.cols[3] = [0.0, 0.0, 0.0, 1.0];
        linear.is_identity()
    }

    /// Returns `true` if the transform is a pure translation by whole
    /// numbers of pixels.
    #[must_use]
    pub fn is_integer_translation(&self) -> bool {
        if !self.is_translation() {
            return false;
        }
        let t = self.cols[3];
        is_integral(t[0]) && is_integral(t[1]) && is_integral(t[2])
    }

    /// Returns `true` if the bottom row is not `[0, 0, 0, 1]`.
    #[must_use]
    pub fn has_perspective(&self) -> bool {
        let c = &self.cols;
        c[0][3] != 0.0 || c[1][3] != 0.0 || c[2][3] != 0.0 || c[3][3] != 1.0
    }

    /// Returns the x and y scale factors of the 2-D part of the transform.
    ///
    /// Returns `None` for perspective transforms, whose scale varies across
    /// the plane.
    #[must_use]
    pub fn scale_components_2d(&self) -> Option<Vec2> {
        if self.has_perspective() {
            return None;
        }
        let c = &self.cols;
        Some(Vec2::new(c[0][0].hypot(c[0][1]), c[1][0].hypot(c[1][1])))
    }

    /// Maps a rectangle in the z = 0 plane and returns the bounding box of
    /// its visible image.
    ///
    /// Parts of the rectangle that land behind the viewer (w <= 0 under a
    /// perspective transform) are clipped away first. A rectangle that is
    /// entirely behind the viewer maps to [`Rect::ZERO`].
    #[must_use]
    pub fn map_clipped_rect(&self, rect: Rect) -> Rect {
        let corners = [
            self.map_homogeneous(rect.x0, rect.y0),
            self.map_homogeneous(rect.x1, rect.y0),
            self.map_homogeneous(rect.x1, rect.y1),
            self.map_homogeneous(rect.x0, rect.y1),
        ];
        let mut bounds: Option<Rect> = None;
        let mut include = |p: [f64; 4]| {
            let (x, y) = (p[0] / p[3], p[1] / p[3]);
            let point = Rect::new(x, y, x, y);
            bounds = Some(bounds.map_or(point, |b| b.union(point)));
        };
        for (i, &a) in corners.iter().enumerate() {
            let b = corners[(i + 1) % corners.len()];
            let a_visible = a[3] > W_EPSILON;
            if a_visible {
                include(a);
            }
            if a_visible != (b[3] > W_EPSILON) {
                let t = (W_EPSILON - a[3]) / (b[3] - a[3]);
                include(core::array::from_fn(|k| a[k] + (b[k] - a[k]) * t));
            }
        }
        bounds.unwrap_or(Rect::ZERO)
    }

    fn map_homogeneous(&self, x: f64, y: f64) -> [f64; 4] {
        let c = &self.cols;
        core::array::from_fn(|i| c[0][i] * x + c[1][i] * y + c[3][i])
    }
}

/// Smallest w still treated as in front of the viewer.
const W_EPSILON: f64 = 1e-9;

/// Whether `v` survives a round trip through `i32` unchanged.
pub(crate) fn is_integral(v: f64) -> bool {
    #[expect(
        clippy::cast_possible_truncation,
        reason = "truncation is exactly what is being tested for"
    )]
    let truncated = v as i32;
    f64::from(truncated) == v
}

impl Default for Transform3d {
    #[inline]
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Transform3d {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        let a = &self.cols;
        let b = &rhs.cols;
        let mut out = [[0.0_f64; 4]; 4];
        for (j, col) in out.iter_mut().enumerate() {
            for (i, cell) in col.iter_mut().enumerate() {
                *cell =
                    a[0][i] * b[j][0] + a[1][i] * b[j][1] + a[2][i] * b[j][2] + a[3][i] * b[j][3];
            }
        }
        Self { cols: out }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rotation_z(radians: f64) -> Transform3d {
        let (s, c) = (radians.sin(), radians.cos());
        Transform3d {
            cols: [
                [c, s, 0.0, 0.0],
                [-s, c, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }

    #[test]
    fn identity_multiply() {
        let t = Transform3d::from_translation(1.0, 2.0, 3.0);
        assert_eq!(Transform3d::IDENTITY * t, t);
        assert_eq!(t * Transform3d::IDENTITY, t);
        assert_eq!(Transform3d::default(), Transform3d::IDENTITY);
    }

    #[test]
    fn translations_compose() {
        let a = Transform3d::from_translation(1.0, 0.0, 0.0);
        let b = Transform3d::from_translation(0.0, 2.0, 0.0);
        assert_eq!((a * b).cols[3], [1.0, 2.0, 0.0, 1.0]);
    }

    #[test]
    fn local_translation_is_scaled_by_the_transform() {
        let s = Transform3d::from_scale(2.0, 2.0, 1.0);
        let t = s.then_translate_local(Vec2::new(3.0, 4.0));
        assert_eq!(t.translation_2d(), Vec2::new(6.0, 8.0));
    }

    #[test]
    fn integer_translation_classification() {
        assert!(Transform3d::IDENTITY.is_integer_translation());
        assert!(Transform3d::from_translation(3.0, -4.0, 0.0).is_integer_translation());
        assert!(!Transform3d::from_translation(0.5, 0.0, 0.0).is_integer_translation());
        assert!(!Transform3d::from_scale(2.0, 1.0, 1.0).is_integer_translation());
    }

    #[test]
    fn flatten_removes_z() {
        let mut t = Transform3d::from_translation(1.0, 2.0, 3.0);
        t.cols[0][2] = 0.5;
        let flat = t.flatten_to_2d();
        assert_eq!(flat.cols[3], [1.0, 2.0, 0.0, 1.0]);
        assert_eq!(flat.cols[0][2], 0.0);
        assert_eq!(flat.cols[2], [0.0, 0.0, 1.0, 0.0]);
    }

    #[test]
    fn scale_components() {
        let s = Transform3d::from_scale(2.0, 3.0, 1.0);
        assert_eq!(s.scale_components_2d(), Some(Vec2::new(2.0, 3.0)));

        let r = rotation_z(core::f64::consts::FRAC_PI_2) * s;
        let c = r.scale_components_2d().unwrap();
        assert!((c.x - 2.0).abs() < 1e-9);
        assert!((c.y - 3.0).abs() < 1e-9);

        let mut p = Transform3d::IDENTITY;
        p.cols[2][3] = -0.01;
        assert!(p.has_perspective());
        assert_eq!(p.scale_components_2d(), None);
    }

    #[test]
    fn map_rect_through_affine_transforms() {
        let rect = Rect::new(0.0, 0.0, 10.0, 5.0);
        let t =
            Transform3d::from_translation(3.0, 4.0, 0.0) * Transform3d::from_scale(2.0, 2.0, 1.0);
        assert_eq!(t.map_clipped_rect(rect), Rect::new(3.0, 4.0, 23.0, 14.0));

        let r = rotation_z(core::f64::consts::FRAC_PI_2).map_clipped_rect(rect);
        assert!((r.x0 + 5.0).abs() < 1e-9 && r.y0.abs() < 1e-9);
        assert!(r.x1.abs() < 1e-9 && (r.y1 - 10.0).abs() < 1e-9);
    }

    #[test]
    fn map_rect_clips_behind_the_viewer() {
        // w = 1 - x / 20, so x >= 20 is behind the viewer.
        let mut p = Transform3d::IDENTITY;
        p.cols[0][3] = -0.05;
        let mapped = p.map_clipped_rect(Rect::new(0.0, 0.0, 10.0, 10.0));
        assert_eq!(mapped.x0, 0.0);
        assert!((mapped.x1 - 20.0).abs() < 1e-9);
        assert!((mapped.y1 - 20.0).abs() < 1e-9);

        let clipped = p.map_clipped_rect(Rect::new(0.0, 0.0, 40.0, 1.0));
        assert!(clipped.x1 > 1.0e6);

        let behind = p.map_clipped_rect(Rect::new(30.0, 0.0, 40.0, 1.0));
        assert_eq!(behind, Rect::ZERO);
    }
}
