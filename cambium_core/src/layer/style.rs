// Copyright 2026 the Cambium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Paint-related value types: colors and blend modes.

/// A 32-bit ARGB color, alpha in the high byte.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Color(pub u32);

impl Color {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self(0);
    /// Opaque black.
    pub const BLACK: Self = Self(0xFF00_0000);
    /// Opaque white.
    pub const WHITE: Self = Self(0xFFFF_FFFF);

    /// Builds a color from its four channels.
    #[inline]
    #[must_use]
    pub const fn from_argb(a: u8, r: u8, g: u8, b: u8) -> Self {
        Self((a as u32) << 24 | (r as u32) << 16 | (g as u32) << 8 | b as u32)
    }

    /// The alpha channel.
    #[inline]
    #[must_use]
    pub const fn alpha(self) -> u8 {
        self.0.to_be_bytes()[0]
    }

    /// Returns `true` if the alpha channel is 255.
    #[inline]
    #[must_use]
    pub const fn is_opaque(self) -> bool {
        self.alpha() == u8::MAX
    }
}

/// How a layer's pixels combine with what is already in its target.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BlendMode {
    /// Source over destination.
    #[default]
    SrcOver,
    /// Destination cleared where the source is drawn.
    Clear,
    /// Source replaces destination.
    Src,
    /// Channel-wise multiply.
    Multiply,
    /// Inverse multiply of the inverses.
    Screen,
    /// Multiply or screen depending on the destination.
    Overlay,
    /// Minimum of source and destination.
    Darken,
    /// Maximum of source and destination.
    Lighten,
    /// Absolute difference.
    Difference,
}
