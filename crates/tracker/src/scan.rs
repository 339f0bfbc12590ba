//! Full buffer scan and conversion.

use regex::{NoExpand, Regex};
use std::borrow::Cow;
use std::sync::OnceLock;

use lineend_buffer::EditorBuffer;
use lineend_core::{LineEnding, LineEndingSet};

/// Any terminator: CRLF, LF or a lone CR.
static LINE_ENDING_PATTERN: OnceLock<Regex> = OnceLock::new();

fn line_ending_pattern() -> &'static Regex {
    LINE_ENDING_PATTERN
        .get_or_init(|| Regex::new(r"\r\n|\n|\r").expect("line ending pattern is valid"))
}

/// Collect the distinct terminators of every row except the last.
pub fn compute_line_endings<B: EditorBuffer + ?Sized>(buffer: &B) -> LineEndingSet {
    let rows = buffer.line_count().saturating_sub(1);
    (0..rows)
        .filter_map(|row| buffer.line_ending_for_row(row))
        .collect()
}

/// Replace every terminator in `text` with `ending`.
pub fn normalize_line_endings(text: &str, ending: LineEnding) -> Cow<'_, str> {
    line_ending_pattern().replace_all(text, NoExpand(ending.as_str()))
}

/// Make `ending` the buffer's preference and rewrite all terminators to it.
///
/// The rewrite is a single `set_text`, so subscribers see one change.
pub fn convert<B: EditorBuffer + ?Sized>(buffer: &mut B, ending: LineEnding) {
    buffer.set_preferred_line_ending(ending);

    let text = buffer.text();
    let normalized = normalize_line_endings(&text, ending);
    if normalized != text {
        buffer.set_text(&normalized);
        log::info!("Converted {} to {}", buffer.id(), ending);
    }
}
