//! Decides whether a buffer change may alter the set of line endings.

use lineend_buffer::BufferChange;
use lineend_core::{LineEnding, LineEndingSet};

/// What to do about one change notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reaction {
    /// The published set is still accurate.
    Ignore,
    /// Schedule a full rescan.
    Rescan,
}

/// Classify a change against the currently published set.
///
/// Rescans when the change inserts a style the set does not contain yet,
/// removes any terminator (it may have been the last of its style), or
/// touches a carriage return at the edge of the edited region, where a CRLF
/// can be split apart or joined together without either text containing one.
/// Everything else is ignored, so plain typing never rescans.
pub fn classify(change: &BufferChange, published: &LineEndingSet) -> Reaction {
    if introduces_unseen_style(change, published)
        || removes_terminator(change)
        || touches_crlf_boundary(change)
    {
        Reaction::Rescan
    } else {
        Reaction::Ignore
    }
}

fn introduces_unseen_style(change: &BufferChange, published: &LineEndingSet) -> bool {
    let new_text = change.new_text.as_str();

    if !published.contains(LineEnding::LF) {
        // A CRLF counts here too: its '\n' may end up as a bare LF.
        if new_text.contains('\n') {
            return true;
        }
    } else if !published.contains(LineEnding::CRLF) && new_text.contains("\r\n") {
        return true;
    }

    styles_in(new_text)
        .iter()
        .any(|ending| !published.contains(ending))
}

fn removes_terminator(change: &BufferChange) -> bool {
    change.old_text.contains(['\r', '\n'])
}

fn touches_crlf_boundary(change: &BufferChange) -> bool {
    change.prev_char == Some('\r')
        || (change.next_char == Some('\n') && change.new_text.ends_with('\r'))
}

/// Styles that appear inside `text` on its own.
fn styles_in(text: &str) -> LineEndingSet {
    let mut styles = LineEndingSet::new();
    let mut prev = None;
    for ch in text.chars() {
        if ch == '\n' {
            if prev == Some('\r') {
                styles.insert(LineEnding::CRLF);
            } else {
                styles.insert(LineEnding::LF);
            }
        }
        prev = Some(ch);
    }
    styles
}
