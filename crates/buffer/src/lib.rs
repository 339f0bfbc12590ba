//! Text buffer capability for lineend.
//!
//! Defines what the line ending tracker needs from a host buffer
//! (`EditorBuffer`), the change notifications buffers emit, and a
//! rope-backed `TextBuffer` implementation.

mod change;
mod text_buffer;

pub use change::{BufferChange, ChangeEmitter, Disposable, Subscription};
pub use text_buffer::TextBuffer;

use lineend_core::LineEnding;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Identity of a buffer instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferId(u64);

impl BufferId {
    /// Allocate a fresh, process-unique id.
    pub fn next() -> Self {
        static NEXT_ID: AtomicU64 = AtomicU64::new(1);
        Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for BufferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "buffer#{}", self.0)
    }
}

/// Capabilities the line ending tracker consumes from a host buffer.
pub trait EditorBuffer {
    /// Buffer identity, stable for the buffer's lifetime.
    fn id(&self) -> BufferId;

    /// Number of rows. A buffer ending with a terminator has an empty last row.
    fn line_count(&self) -> usize;

    /// Terminator of `row`, if it ends with LF or CRLF.
    ///
    /// Returns None for the last row, out-of-range rows and rows
    /// terminated by a lone carriage return.
    fn line_ending_for_row(&self, row: usize) -> Option<LineEnding>;

    /// Full buffer text.
    fn text(&self) -> String;

    /// Replace the full text as one edit.
    fn set_text(&mut self, text: &str);

    /// Style new edits and conversions should use.
    fn preferred_line_ending(&self) -> Option<LineEnding>;

    fn set_preferred_line_ending(&mut self, ending: LineEnding);

    /// Subscribe to change notifications.
    fn on_did_change(&mut self) -> Subscription;
}

/// Item that may be active in the host workspace.
///
/// Non-text items (file trees, terminals) return None.
pub trait PaneItem {
    fn buffer_mut(&mut self) -> Option<&mut dyn EditorBuffer>;
}

impl PaneItem for TextBuffer {
    fn buffer_mut(&mut self) -> Option<&mut dyn EditorBuffer> {
        Some(self)
    }
}
