// Copyright 2026 the Cambium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::string::String;
use core::fmt;

/// An opaque diagnostics payload attached to a layer by its producer.
///
/// The layer tree never inspects the payload. It only moves ownership from a
/// pending layer to its active counterpart on push.
pub trait DebugInfo: fmt::Debug {
    /// Appends the payload to `out` in the embedder's trace format.
    fn append_as_trace_format(&self, out: &mut String);
}
