// Copyright 2026 the Cambium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Clip tree.

use kurbo::Rect;

use super::{INVALID_NODE, PropertyTree, TreeNode};
use crate::layer::LayerId;

/// A node of the [`ClipTree`].
#[derive(Clone, Debug, PartialEq)]
pub struct ClipNode {
    /// Index of this node (assigned on insertion).
    pub id: u32,
    /// Index of the parent node, or [`INVALID_NODE`].
    pub parent_id: u32,
    /// Layer this node was created for, if any.
    pub owning_layer_id: Option<LayerId>,
    /// Transform node whose space `clip` is expressed in.
    pub transform_id: u32,
    /// The clip rectangle.
    pub clip: Rect,
}

impl Default for ClipNode {
    fn default() -> Self {
        Self {
            id: INVALID_NODE,
            parent_id: INVALID_NODE,
            owning_layer_id: None,
            transform_id: INVALID_NODE,
            clip: Rect::ZERO,
        }
    }
}

impl TreeNode for ClipNode {
    fn id(&self) -> u32 {
        self.id
    }

    fn parent_id(&self) -> u32 {
        self.parent_id
    }

    fn owning_layer_id(&self) -> Option<LayerId> {
        self.owning_layer_id
    }

    fn set_id(&mut self, id: u32) {
        self.id = id;
    }
}

/// Tree of [`ClipNode`]s.
///
/// Clips carry no inherited cached state, so the plain arena suffices.
pub type ClipTree = PropertyTree<ClipNode>;
