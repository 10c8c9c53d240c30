// Copyright 2026 the Cambium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for layer-tree mutation.
//!
//! This module provides a [`TraceSink`] trait with one method per event the
//! layer tree emits. All method bodies default to no-ops, so implementing
//! only the events you care about is fine.
//!
//! Every [`LayerTree`](crate::tree::LayerTree) owns a [`Tracer`] wrapping an
//! optional boxed sink. When the `trace` feature is **off**, every `Tracer`
//! method compiles to nothing. When **on**, each method performs a single
//! `Option` branch before dispatching.
//!
//! A sink shared as `Rc<RefCell<S>>` is itself a sink, so the embedder can
//! keep a handle to inspect what the tree reported.
//!
//! # Crate features
//!
//! - `trace` enables the `Tracer` method bodies (one branch per call).

use alloc::boxed::Box;
use alloc::rc::Rc;
use core::cell::RefCell;

use crate::geometry::{IntRect, ScrollOffset};
use crate::layer::{DrawMode, LayerId};

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Which layer property changed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LayerField {
    /// Stored bounds.
    Bounds,
    /// Consumer-side bounds delta.
    BoundsDelta,
    /// The draws-content flag.
    DrawsContent,
    /// Background color.
    BackgroundColor,
    /// The change flag was carried over from the pending counterpart.
    Pushed,
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted when a layer is created.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LayerCreatedEvent {
    /// The new layer.
    pub layer: LayerId,
    /// Whether the layer lives in the active tree.
    pub active_tree: bool,
}

/// Emitted when a layer is destroyed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LayerDestroyedEvent {
    /// The destroyed layer.
    pub layer: LayerId,
    /// Whether the layer lived in the active tree.
    pub active_tree: bool,
}

/// Emitted when a layer's visuals are marked as changed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PropertyChangedEvent {
    /// The changed layer.
    pub layer: LayerId,
    /// Which property triggered the change.
    pub field: LayerField,
    /// Whether the layer lives in the active tree.
    pub active_tree: bool,
}

/// Emitted after a pending layer's properties were pushed to its active
/// counterpart.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PushEvent {
    /// The pushed layer.
    pub layer: LayerId,
    /// The active layer's update rect after merging.
    pub update_rect: IntRect,
}

/// Emitted when an active layer's scroll offset changes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollOffsetEvent {
    /// The scrolled layer.
    pub layer: LayerId,
    /// The new offset.
    pub offset: ScrollOffset,
}

/// Emitted when a layer enters a draw bracket.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DrawBeginEvent {
    /// The drawn layer.
    pub layer: LayerId,
    /// The mode it is drawn in.
    pub mode: DrawMode,
}

/// Emitted when a layer leaves a draw bracket.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DrawEndEvent {
    /// The drawn layer.
    pub layer: LayerId,
    /// The mode it was drawn in.
    pub mode: DrawMode,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from a layer tree.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called after a layer is created and registered.
    fn on_layer_created(&mut self, e: &LayerCreatedEvent) {
        _ = e;
    }

    /// Called after a layer is unregistered.
    fn on_layer_destroyed(&mut self, e: &LayerDestroyedEvent) {
        _ = e;
    }

    /// Called when a layer's change flag is set.
    fn on_property_changed(&mut self, e: &PropertyChangedEvent) {
        _ = e;
    }

    /// Called after a push completes.
    fn on_push(&mut self, e: &PushEvent) {
        _ = e;
    }

    /// Called when an active layer's scroll offset changes.
    fn on_scroll_offset(&mut self, e: &ScrollOffsetEvent) {
        _ = e;
    }

    /// Called when a draw bracket opens.
    fn on_draw_begin(&mut self, e: &DrawBeginEvent) {
        _ = e;
    }

    /// Called when a draw bracket closes.
    fn on_draw_end(&mut self, e: &DrawEndEvent) {
        _ = e;
    }
}

impl<S: TraceSink + ?Sized> TraceSink for Rc<RefCell<S>> {
    fn on_layer_created(&mut self, e: &LayerCreatedEvent) {
        self.borrow_mut().on_layer_created(e);
    }

    fn on_layer_destroyed(&mut self, e: &LayerDestroyedEvent) {
        self.borrow_mut().on_layer_destroyed(e);
    }

    fn on_property_changed(&mut self, e: &PropertyChangedEvent) {
        self.borrow_mut().on_property_changed(e);
    }

    fn on_push(&mut self, e: &PushEvent) {
        self.borrow_mut().on_push(e);
    }

    fn on_scroll_offset(&mut self, e: &ScrollOffsetEvent) {
        self.borrow_mut().on_scroll_offset(e);
    }

    fn on_draw_begin(&mut self, e: &DrawBeginEvent) {
        self.borrow_mut().on_draw_begin(e);
    }

    fn on_draw_end(&mut self, e: &DrawEndEvent) {
        self.borrow_mut().on_draw_end(e);
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional owned [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing and
/// a sink passed to [`new`](Self::new) is dropped immediately. When **on**,
/// each method checks the inner `Option` (one branch) before dispatching to
/// the sink.
pub struct Tracer {
    #[cfg(feature = "trace")]
    sink: Option<Box<dyn TraceSink>>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<Box<dyn TraceSink>>,
}

impl core::fmt::Debug for Tracer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl Default for Tracer {
    fn default() -> Self {
        Self::none()
    }
}

impl Tracer {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: Box<dyn TraceSink>) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`LayerCreatedEvent`].
    #[inline]
    pub fn layer_created(&mut self, e: &LayerCreatedEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_layer_created(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`LayerDestroyedEvent`].
    #[inline]
    pub fn layer_destroyed(&mut self, e: &LayerDestroyedEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_layer_destroyed(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`PropertyChangedEvent`].
    #[inline]
    pub fn property_changed(&mut self, e: &PropertyChangedEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_property_changed(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`PushEvent`].
    #[inline]
    pub fn push(&mut self, e: &PushEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_push(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`ScrollOffsetEvent`].
    #[inline]
    pub fn scroll_offset(&mut self, e: &ScrollOffsetEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_scroll_offset(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`DrawBeginEvent`].
    #[inline]
    pub fn draw_begin(&mut self, e: &DrawBeginEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_draw_begin(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`DrawEndEvent`].
    #[inline]
    pub fn draw_end(&mut self, e: &DrawEndEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_draw_end(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn layer() -> LayerId {
        LayerId::new(3)
    }

    #[test]
    fn noop_sink_compiles() {
        let mut sink = NoopSink;
        sink.on_layer_created(&LayerCreatedEvent {
            layer: layer(),
            active_tree: false,
        });
        sink.on_draw_begin(&DrawBeginEvent {
            layer: layer(),
            mode: DrawMode::Hardware,
        });
    }

    #[test]
    fn tracer_none_does_nothing() {
        let mut tracer = Tracer::none();
        tracer.push(&PushEvent {
            layer: layer(),
            update_rect: IntRect::EMPTY,
        });
    }

    #[cfg(feature = "trace")]
    #[test]
    fn tracer_dispatches_to_shared_sink() {
        use alloc::vec::Vec;

        #[derive(Default)]
        struct RecordingSink {
            changed: Vec<LayerField>,
        }
        impl TraceSink for RecordingSink {
            fn on_property_changed(&mut self, e: &PropertyChangedEvent) {
                self.changed.push(e.field);
            }
        }

        let sink = Rc::new(RefCell::new(RecordingSink::default()));
        let mut tracer = Tracer::new(Box::new(Rc::clone(&sink)));
        tracer.property_changed(&PropertyChangedEvent {
            layer: layer(),
            field: LayerField::Bounds,
            active_tree: true,
        });
        drop(tracer);
        assert_eq!(sink.borrow().changed, [LayerField::Bounds]);
    }
}
