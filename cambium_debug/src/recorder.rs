// Copyright 2026 the Cambium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact binary event recording and decoding.
//!
//! [`RecorderSink`] implements [`TraceSink`] and encodes events into a
//! `Vec<u8>` as fixed-size little-endian records. [`decode`] reads them back
//! as an iterator of [`RecordedEvent`].

use cambium_core::geometry::{IntRect, ScrollOffset};
use cambium_core::layer::{DrawMode, LayerId};
use cambium_core::trace::{
    DrawBeginEvent, DrawEndEvent, LayerCreatedEvent, LayerDestroyedEvent, LayerField,
    PropertyChangedEvent, PushEvent, ScrollOffsetEvent, TraceSink,
};

// ---------------------------------------------------------------------------
// Event type discriminants
// ---------------------------------------------------------------------------

const TAG_LAYER_CREATED: u8 = 1;
const TAG_LAYER_DESTROYED: u8 = 2;
const TAG_PROPERTY_CHANGED: u8 = 3;
const TAG_PUSH: u8 = 4;
const TAG_SCROLL_OFFSET: u8 = 5;
const TAG_DRAW_BEGIN: u8 = 6;
const TAG_DRAW_END: u8 = 7;

// ---------------------------------------------------------------------------
// RecorderSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that encodes events into a compact binary buffer.
#[derive(Debug, Default)]
pub struct RecorderSink {
    buf: Vec<u8>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a view of the recorded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the recorder and returns the recorded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    // -- encoding helpers --------------------------------------------------

    fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    fn write_bool(&mut self, v: bool) {
        self.write_u8(u8::from(v));
    }

    fn write_i32(&mut self, v: i32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_f64(&mut self, v: f64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_layer(&mut self, layer: LayerId) {
        self.write_i32(layer.get());
    }

    fn write_rect(&mut self, r: IntRect) {
        self.write_i32(r.x);
        self.write_i32(r.y);
        self.write_i32(r.width);
        self.write_i32(r.height);
    }

    fn write_field(&mut self, field: LayerField) {
        self.write_u8(match field {
            LayerField::Bounds => 0,
            LayerField::BoundsDelta => 1,
            LayerField::DrawsContent => 2,
            LayerField::BackgroundColor => 3,
            LayerField::Pushed => 4,
        });
    }

    fn write_mode(&mut self, mode: DrawMode) {
        self.write_u8(match mode {
            DrawMode::None => 0,
            DrawMode::Hardware => 1,
            DrawMode::Software => 2,
            DrawMode::ResourcelessSoftware => 3,
        });
    }
}

impl TraceSink for RecorderSink {
    fn on_layer_created(&mut self, e: &LayerCreatedEvent) {
        self.write_u8(TAG_LAYER_CREATED);
        self.write_layer(e.layer);
        self.write_bool(e.active_tree);
    }

    fn on_layer_destroyed(&mut self, e: &LayerDestroyedEvent) {
        self.write_u8(TAG_LAYER_DESTROYED);
        self.write_layer(e.layer);
        self.write_bool(e.active_tree);
    }

    fn on_property_changed(&mut self, e: &PropertyChangedEvent) {
        self.write_u8(TAG_PROPERTY_CHANGED);
        self.write_layer(e.layer);
        self.write_field(e.field);
        self.write_bool(e.active_tree);
    }

    fn on_push(&mut self, e: &PushEvent) {
        self.write_u8(TAG_PUSH);
        self.write_layer(e.layer);
        self.write_rect(e.update_rect);
    }

    fn on_scroll_offset(&mut self, e: &ScrollOffsetEvent) {
        self.write_u8(TAG_SCROLL_OFFSET);
        self.write_layer(e.layer);
        self.write_f64(e.offset.x);
        self.write_f64(e.offset.y);
    }

    fn on_draw_begin(&mut self, e: &DrawBeginEvent) {
        self.write_u8(TAG_DRAW_BEGIN);
        self.write_layer(e.layer);
        self.write_mode(e.mode);
    }

    fn on_draw_end(&mut self, e: &DrawEndEvent) {
        self.write_u8(TAG_DRAW_END);
        self.write_layer(e.layer);
        self.write_mode(e.mode);
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// A decoded event from a binary recording.
#[derive(Clone, Debug, PartialEq)]
pub enum RecordedEvent {
    /// A [`LayerCreatedEvent`].
    LayerCreated(LayerCreatedEvent),
    /// A [`LayerDestroyedEvent`].
    LayerDestroyed(LayerDestroyedEvent),
    /// A [`PropertyChangedEvent`].
    PropertyChanged(PropertyChangedEvent),
    /// A [`PushEvent`].
    Push(PushEvent),
    /// A [`ScrollOffsetEvent`].
    ScrollOffset(ScrollOffsetEvent),
    /// A [`DrawBeginEvent`].
    DrawBegin(DrawBeginEvent),
    /// A [`DrawEndEvent`].
    DrawEnd(DrawEndEvent),
}

/// Decodes a byte slice produced by [`RecorderSink`] into an iterator of
/// [`RecordedEvent`].
///
/// Iteration stops at the first truncated or malformed record.
pub fn decode(bytes: &[u8]) -> DecodeIter<'_> {
    DecodeIter {
        data: bytes,
        pos: 0,
    }
}

/// Iterator over decoded events.
#[derive(Debug)]
pub struct DecodeIter<'a> {
    data: &'a [u8],
    pos: usize,
}

impl DecodeIter<'_> {
    fn take<const N: usize>(&mut self) -> Option<[u8; N]> {
        let bytes = self.data.get(self.pos..self.pos + N)?.try_into().ok()?;
        self.pos += N;
        Some(bytes)
    }

    fn read_u8(&mut self) -> Option<u8> {
        let [v] = self.take::<1>()?;
        Some(v)
    }

    fn read_bool(&mut self) -> Option<bool> {
        Some(self.read_u8()? != 0)
    }

    fn read_i32(&mut self) -> Option<i32> {
        self.take().map(i32::from_le_bytes)
    }

    fn read_f64(&mut self) -> Option<f64> {
        self.take().map(f64::from_le_bytes)
    }

    fn read_layer(&mut self) -> Option<LayerId> {
        let raw = self.read_i32()?;
        (raw > 0).then(|| LayerId::new(raw))
    }

    fn read_rect(&mut self) -> Option<IntRect> {
        Some(IntRect::new(
            self.read_i32()?,
            self.read_i32()?,
            self.read_i32()?,
            self.read_i32()?,
        ))
    }

    fn read_field(&mut self) -> Option<LayerField> {
        Some(match self.read_u8()? {
            0 => LayerField::Bounds,
            1 => LayerField::BoundsDelta,
            2 => LayerField::DrawsContent,
            3 => LayerField::BackgroundColor,
            4 => LayerField::Pushed,
            _ => return None,
        })
    }

    fn read_mode(&mut self) -> Option<DrawMode> {
        Some(match self.read_u8()? {
            0 => DrawMode::None,
            1 => DrawMode::Hardware,
            2 => DrawMode::Software,
            3 => DrawMode::ResourcelessSoftware,
            _ => return None,
        })
    }

    fn decode_layer_created(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::LayerCreated(LayerCreatedEvent {
            layer: self.read_layer()?,
            active_tree: self.read_bool()?,
        }))
    }

    fn decode_layer_destroyed(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::LayerDestroyed(LayerDestroyedEvent {
            layer: self.read_layer()?,
            active_tree: self.read_bool()?,
        }))
    }

    fn decode_property_changed(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::PropertyChanged(PropertyChangedEvent {
            layer: self.read_layer()?,
            field: self.read_field()?,
            active_tree: self.read_bool()?,
        }))
    }

    fn decode_push(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Push(PushEvent {
            layer: self.read_layer()?,
            update_rect: self.read_rect()?,
        }))
    }

    fn decode_scroll_offset(&mut self) -> Option<RecordedEvent> {
        let layer = self.read_layer()?;
        let offset = ScrollOffset::new(self.read_f64()?, self.read_f64()?);
        Some(RecordedEvent::ScrollOffset(ScrollOffsetEvent { layer, offset }))
    }

    fn decode_draw_begin(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::DrawBegin(DrawBeginEvent {
            layer: self.read_layer()?,
            mode: self.read_mode()?,
        }))
    }

    fn decode_draw_end(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::DrawEnd(DrawEndEvent {
            layer: self.read_layer()?,
            mode: self.read_mode()?,
        }))
    }
}

impl Iterator for DecodeIter<'_> {
    type Item = RecordedEvent;

    fn next(&mut self) -> Option<Self::Item> {
        let tag = self.read_u8()?;
        match tag {
            TAG_LAYER_CREATED => self.decode_layer_created(),
            TAG_LAYER_DESTROYED => self.decode_layer_destroyed(),
            TAG_PROPERTY_CHANGED => self.decode_property_changed(),
            TAG_PUSH => self.decode_push(),
            TAG_SCROLL_OFFSET => self.decode_scroll_offset(),
            TAG_DRAW_BEGIN => self.decode_draw_begin(),
            TAG_DRAW_END => self.decode_draw_end(),
            _ => None, // unknown tag → stop iteration
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
