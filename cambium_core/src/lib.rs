// Copyright 2026 the Cambium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layer nodes and property trees for a retained-mode compositor.
//!
//! `cambium_core` holds the per-layer state of a compositor's layer tree and
//! keeps two copies of that tree in sync: a **pending** tree built by the
//! producer and an **active** tree that is drawn. It is `no_std` compatible
//! (with `alloc`).
//!
//! # Architecture
//!
//! ```text
//!   producer setters ──► LayerTree<Pending>
//!                              │  layers_that_should_push_properties
//!                              ▼
//!                      push_properties_to_tree
//!                              │
//!                              ▼
//!   animation host ──► LayerTree<Active> ──► derived queries ──► draw
//!                              ▲                                   │
//!                              └──── will_draw / did_draw ◄────────┘
//! ```
//!
//! **[`tree`]**: the [`LayerTree`](tree::LayerTree) container, generic over
//! its phase. Every layer operation (setters, push, derived queries, scroll
//! ops, animation bridging, the draw bracket) is a method on the tree taking
//! a [`LayerId`](layer::LayerId).
//!
//! **[`layer`]**: the [`Layer`](layer::Layer) record and its value types.
//!
//! **[`property_trees`]**: the transform, effect, clip, and scroll trees that
//! layers index into. Transform and effect trees recompute inherited state
//! through [`dirty`] channels.
//!
//! **[`animation`]**: the [`MutatorHost`](animation::MutatorHost) query
//! interface to an external animation system.
//!
//! **[`transform`]**: 3D affine transform type.
//!
//! **[`geometry`]**: integer sizes, rects, and scroll offsets.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types for
//! layer-tree instrumentation, with a zero-overhead
//! [`Tracer`](trace::Tracer) wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod animation;
pub mod dirty;
pub mod geometry;
pub mod layer;
pub mod property_trees;
pub mod trace;
pub mod transform;
pub mod tree;
