// Copyright 2026 the Cambium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chrome Trace Event Format exporter.
//!
//! [`export`] reads recorded bytes from a [`RecorderSink`](super::recorder::RecorderSink)
//! and writes [Chrome Trace Event Format][format] JSON to the given writer.
//!
//! Layer-tree events carry no timestamps, so each event is placed at its
//! sequence number in the recording (one microsecond apart). Each layer gets
//! its own track; draw brackets become duration slices on that track.
//!
//! [format]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use std::io::{self, Write};

use serde_json::{Value, json};

use cambium_core::layer::LayerId;

use crate::recorder::{RecordedEvent, decode};

/// Exports recorded events as Chrome Trace Event Format JSON.
///
/// The output is a complete JSON array of trace event objects, suitable for
/// loading into `chrome://tracing` or [Perfetto](https://ui.perfetto.dev/).
pub fn export(bytes: &[u8], writer: &mut dyn Write) -> io::Result<()> {
    let events: Vec<Value> = decode(bytes)
        .enumerate()
        .map(|(ts, recorded)| to_trace_event(ts, &recorded))
        .collect();

    serde_json::to_writer_pretty(writer, &events)?;
    Ok(())
}

fn tree_pid(active_tree: bool) -> u32 {
    u32::from(active_tree)
}

fn instant(ts: usize, name: &str, cat: &str, pid: u32, layer: LayerId, args: Value) -> Value {
    json!({
        "ph": "i",
        "name": name,
        "cat": cat,
        "ts": ts,
        "pid": pid,
        "tid": layer.get(),
        "s": "t",
        "args": args,
    })
}

fn to_trace_event(ts: usize, recorded: &RecordedEvent) -> Value {
    match recorded {
        RecordedEvent::LayerCreated(e) => instant(
            ts,
            "LayerCreated",
            "Tree",
            tree_pid(e.active_tree),
            e.layer,
            json!({}),
        ),
        RecordedEvent::LayerDestroyed(e) => instant(
            ts,
            "LayerDestroyed",
            "Tree",
            tree_pid(e.active_tree),
            e.layer,
            json!({}),
        ),
        RecordedEvent::PropertyChanged(e) => instant(
            ts,
            "PropertyChanged",
            "Layer",
            tree_pid(e.active_tree),
            e.layer,
            json!({ "field": format!("{:?}", e.field) }),
        ),
        RecordedEvent::Push(e) => instant(
            ts,
            "Push",
            "Sync",
            tree_pid(false),
            e.layer,
            json!({
                "update_rect": [
                    e.update_rect.x,
                    e.update_rect.y,
                    e.update_rect.width,
                    e.update_rect.height,
                ],
            }),
        ),
        RecordedEvent::ScrollOffset(e) => instant(
            ts,
            "ScrollOffset",
            "Scroll",
            tree_pid(true),
            e.layer,
            json!({ "x": e.offset.x, "y": e.offset.y }),
        ),
        RecordedEvent::DrawBegin(e) => json!({
            "ph": "B",
            "name": "Draw",
            "cat": "Draw",
            "ts": ts,
            "pid": tree_pid(true),
            "tid": e.layer.get(),
            "args": { "mode": format!("{:?}", e.mode) },
        }),
        RecordedEvent::DrawEnd(e) => json!({
            "ph": "E",
            "name": "Draw",
            "cat": "Draw",
            "ts": ts,
            "pid": tree_pid(true),
            "tid": e.layer.get(),
        }),
    }
}
