// Copyright 2026 the Cambium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr).

use std::io::Write;

use cambium_core::geometry::IntRect;
use cambium_core::trace::{
    DrawBeginEvent, DrawEndEvent, LayerCreatedEvent, LayerDestroyedEvent, PropertyChangedEvent,
    PushEvent, ScrollOffsetEvent, TraceSink,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink").finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self { writer }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }

    /// Consumes the sink and returns its writer.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.writer
    }
}

fn tree_name(active_tree: bool) -> &'static str {
    if active_tree { "active" } else { "pending" }
}

struct ShowRect(IntRect);

impl std::fmt::Display for ShowRect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let r = self.0;
        if r.is_empty() {
            f.write_str("empty")
        } else {
            write!(f, "{},{} {}x{}", r.x, r.y, r.width, r.height)
        }
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_layer_created(&mut self, e: &LayerCreatedEvent) {
        let _ = writeln!(
            self.writer,
            "[layer:create] layer={} tree={}",
            e.layer.get(),
            tree_name(e.active_tree),
        );
    }

    fn on_layer_destroyed(&mut self, e: &LayerDestroyedEvent) {
        let _ = writeln!(
            self.writer,
            "[layer:destroy] layer={} tree={}",
            e.layer.get(),
            tree_name(e.active_tree),
        );
    }

    fn on_property_changed(&mut self, e: &PropertyChangedEvent) {
        let _ = writeln!(
            self.writer,
            "[changed] layer={} field={:?} tree={}",
            e.layer.get(),
            e.field,
            tree_name(e.active_tree),
        );
    }

    fn on_push(&mut self, e: &PushEvent) {
        let _ = writeln!(
            self.writer,
            "[push] layer={} update_rect={}",
            e.layer.get(),
            ShowRect(e.update_rect),
        );
    }

    fn on_scroll_offset(&mut self, e: &ScrollOffsetEvent) {
        let _ = writeln!(
            self.writer,
            "[scroll] layer={} offset=({:.1}, {:.1})",
            e.layer.get(),
            e.offset.x,
            e.offset.y,
        );
    }

    fn on_draw_begin(&mut self, e: &DrawBeginEvent) {
        let _ = writeln!(
            self.writer,
            "[draw:begin] layer={} mode={:?}",
            e.layer.get(),
            e.mode,
        );
    }

    fn on_draw_end(&mut self, e: &DrawEndEvent) {
        let _ = writeln!(
            self.writer,
            "[draw:end] layer={} mode={:?}",
            e.layer.get(),
            e.mode,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cambium_core::layer::{DrawMode, LayerId};
    use cambium_core::trace::LayerField;

    #[test]
    fn pretty_print_property_change() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_property_changed(&PropertyChangedEvent {
            layer: LayerId::new(4),
            field: LayerField::Bounds,
            active_tree: true,
        });
        let output = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(output, "[changed] layer=4 field=Bounds tree=active\n");
    }

    #[test]
    fn one_line_per_event() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        let layer = LayerId::new(2);
        sink.on_push(&PushEvent {
            layer,
            update_rect: IntRect::new(0, 0, 15, 15),
        });
        sink.on_push(&PushEvent {
            layer,
            update_rect: IntRect::EMPTY,
        });
        sink.on_draw_begin(&DrawBeginEvent {
            layer,
            mode: DrawMode::Hardware,
        });
        let output = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<_> = output.lines().collect();
        assert_eq!(
            lines,
            [
                "[push] layer=2 update_rect=0,0 15x15",
                "[push] layer=2 update_rect=empty",
                "[draw:begin] layer=2 mode=Hardware",
            ]
        );
    }
}
