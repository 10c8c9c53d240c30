// Copyright 2026 the Cambium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dirty-tracking channels for property-tree recomputation.
//!
//! The transform and effect trees cache inherited state (`to_screen`,
//! screen-space opacity, render target) on every node. Each tree owns an
//! [`understory_dirty`] tracker keyed by node index, with a dependency edge
//! from every child to its parent, so marking a node with
//! [`EagerPolicy`](understory_dirty::EagerPolicy) also marks its whole
//! subtree.
//!
//! Recomputation drains the channel and visits the affected indices in
//! ascending order. Trees only accept a parent whose index is smaller than
//! the child's, so ascending order is always parent-before-child.

use understory_dirty::Channel;

/// Local transform, post translation, or scroll offset changed; cached
/// `to_parent` / `to_screen` must be recomputed for the subtree.
pub const TRANSFORM: Channel = Channel::new(0);

/// Opacity or render-surface ownership changed; screen-space opacity and
/// render targets must be recomputed for the subtree.
pub const EFFECT: Channel = Channel::new(1);
