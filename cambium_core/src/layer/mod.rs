// Copyright 2026 the Cambium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layer data model.
//!
//! A *layer* is one visual element of a [`LayerTree`](crate::tree::LayerTree).
//! Each layer has:
//!
//! - An identity ([`LayerId`]) chosen by the embedder and shared between the
//!   pending and active copies of the same layer.
//! - A [`LayerKind`], fixed at creation.
//! - **Local state** set through the owning tree: bounds, position, paint
//!   flags, scroll linkage, element id.
//! - **Property-tree indices** through which transform, opacity, clip, and
//!   scroll offset are derived.
//! - **Change tracking**: the property-changed flag, the push flag, and the
//!   update and damage accumulators.

mod debug;
mod draw;
mod id;
mod kind;
mod node;
mod style;

pub use debug::DebugInfo;
pub use draw::{DrawMode, DrawProperties};
pub use id::{ElementId, LayerId, MainThreadScrollingReasons, MutableProperties};
pub use kind::{LayerKind, ResourceId, ScrollbarKind, ScrollbarOrientation};
pub use node::Layer;
pub use style::{BlendMode, Color};
