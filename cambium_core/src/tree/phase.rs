// Copyright 2026 the Cambium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Type-level markers for the two copies of a layer tree.

use core::fmt;

use crate::animation::ElementListType;

/// Which copy of the layer tree a [`LayerTree`](super::LayerTree) is.
///
/// Operations that only make sense on the drawn tree (bounds deltas, scroll
/// offset writes, receiving a push) live in `impl LayerTree<Active>`, so
/// calling them on a pending tree is a compile error rather than a runtime
/// assertion.
pub trait TreePhase: fmt::Debug + 'static {
    /// `true` for the active tree.
    const IS_ACTIVE: bool;
    /// The element list that animation queries for this tree refer to.
    const ELEMENT_LIST: ElementListType;
}

/// The tree being built by the producer.
#[derive(Debug)]
pub enum Pending {}

/// The tree being drawn by the consumer.
#[derive(Debug)]
pub enum Active {}

impl TreePhase for Pending {
    const IS_ACTIVE: bool = false;
    const ELEMENT_LIST: ElementListType = ElementListType::Pending;
}

impl TreePhase for Active {
    const IS_ACTIVE: bool = true;
    const ELEMENT_LIST: ElementListType = ElementListType::Active;
}
