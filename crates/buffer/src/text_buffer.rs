use anyhow::{Context, Result};
use ropey::Rope;
use std::ops::Range;
use std::path::{Path, PathBuf};

use lineend_core::LineEnding;

use crate::{BufferChange, BufferId, ChangeEmitter, EditorBuffer, Subscription};

/// Text buffer based on Rope.
///
/// Unlike an editing buffer that normalizes terminators on load, this keeps
/// the text exactly as read so mixed line endings stay observable.
/// Rows are split on `\r\n`, `\n` and lone `\r`.
#[derive(Debug)]
pub struct TextBuffer {
    id: BufferId,
    /// Rope structure for storing text
    rope: Rope,
    /// File path (if exists)
    file_path: Option<PathBuf>,
    /// Modified flag
    modified: bool,
    /// Line ending for new edits (None until detected or chosen)
    preferred_line_ending: Option<LineEnding>,
    changes: ChangeEmitter,
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextBuffer {
    /// Create a new empty buffer
    pub fn new() -> Self {
        Self::from_text("")
    }

    /// Create buffer holding `text`
    pub fn from_text(text: &str) -> Self {
        Self {
            id: BufferId::next(),
            rope: Rope::from_str(text),
            file_path: None,
            modified: false,
            preferred_line_ending: None,
            changes: ChangeEmitter::new(),
        }
    }

    /// Load file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?;

        let mut buffer = Self::from_text(&contents);
        buffer.file_path = Some(path.to_path_buf());
        log::debug!("Loaded {} ({} lines)", path.display(), buffer.line_count());
        Ok(buffer)
    }

    /// Save file
    pub fn save(&mut self) -> Result<()> {
        if let Some(path) = self.file_path.clone() {
            self.save_to(&path)
        } else {
            anyhow::bail!("No file path set")
        }
    }

    /// Save to specified file, writing terminators exactly as stored
    pub fn save_to<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        std::fs::write(path, self.rope.to_string())
            .with_context(|| format!("Failed to write file: {}", path.display()))?;

        self.file_path = Some(path.to_path_buf());
        self.modified = false;
        Ok(())
    }

    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    /// Check if buffer is modified
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Total length in characters
    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    /// Get line by index, including its terminator
    pub fn line(&self, index: usize) -> Option<String> {
        if index < self.rope.len_lines() {
            Some(self.rope.line(index).to_string())
        } else {
            None
        }
    }

    /// Terminator literal for new lines
    pub fn newline(&self) -> &'static str {
        self.preferred_line_ending.unwrap_or_default().as_str()
    }

    /// Insert text at character index
    pub fn insert(&mut self, char_idx: usize, text: &str) -> Result<()> {
        self.replace(char_idx..char_idx, text)
    }

    /// Insert a terminator in the preferred style
    pub fn insert_newline(&mut self, char_idx: usize) -> Result<()> {
        let newline = self.newline();
        self.insert(char_idx, newline)
    }

    /// Delete character range
    pub fn remove(&mut self, range: Range<usize>) -> Result<()> {
        self.replace(range, "")
    }

    /// Replace character range with `text`, notifying subscribers
    pub fn replace(&mut self, range: Range<usize>, text: &str) -> Result<()> {
        let len = self.rope.len_chars();
        anyhow::ensure!(
            range.start <= range.end && range.end <= len,
            "Range {}..{} out of bounds (length {})",
            range.start,
            range.end,
            len
        );

        if range.is_empty() && text.is_empty() {
            return Ok(());
        }

        let change = self.changes.has_listeners().then(|| {
            let old_text = self.rope.slice(range.clone()).to_string();
            let prev_char = range.start.checked_sub(1).map(|idx| self.rope.char(idx));
            let next_char = self.rope.get_char(range.end);
            BufferChange::new(old_text, text).with_context(prev_char, next_char)
        });

        self.rope.remove(range.clone());
        self.rope.insert(range.start, text);
        self.modified = true;

        if let Some(change) = change {
            self.changes.emit(&change);
        }
        Ok(())
    }
}

impl EditorBuffer for TextBuffer {
    fn id(&self) -> BufferId {
        self.id
    }

    fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    fn line_ending_for_row(&self, row: usize) -> Option<LineEnding> {
        if row >= self.rope.len_lines() {
            return None;
        }

        let line = self.rope.line(row);
        let len = line.len_chars();
        if len == 0 || line.char(len - 1) != '\n' {
            return None;
        }

        if len >= 2 && line.char(len - 2) == '\r' {
            Some(LineEnding::CRLF)
        } else {
            Some(LineEnding::LF)
        }
    }

    fn text(&self) -> String {
        self.rope.to_string()
    }

    fn set_text(&mut self, text: &str) {
        let old_text = self.rope.to_string();
        if old_text == text {
            return;
        }

        self.rope = Rope::from_str(text);
        self.modified = true;
        self.changes.emit(&BufferChange::new(old_text, text));
    }

    fn preferred_line_ending(&self) -> Option<LineEnding> {
        self.preferred_line_ending
    }

    fn set_preferred_line_ending(&mut self, ending: LineEnding) {
        self.preferred_line_ending = Some(ending);
    }

    fn on_did_change(&mut self) -> Subscription {
        self.changes.subscribe(self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn endings(buffer: &TextBuffer) -> Vec<Option<LineEnding>> {
        (0..buffer.line_count())
            .map(|row| buffer.line_ending_for_row(row))
            .collect()
    }

    #[test]
    fn test_empty_buffer_has_one_line() {
        let buffer = TextBuffer::new();
        assert_eq!(buffer.line_count(), 1);
        assert_eq!(buffer.line_ending_for_row(0), None);
    }

    #[test]
    fn test_line_endings_per_row() {
        let buffer = TextBuffer::from_text("a\nb\r\nc");
        assert_eq!(buffer.line_count(), 3);
        assert_eq!(
            endings(&buffer),
            vec![Some(LineEnding::LF), Some(LineEnding::CRLF), None]
        );
    }

    #[test]
    fn test_trailing_terminator_adds_empty_row() {
        let buffer = TextBuffer::from_text("a\r\n");
        assert_eq!(buffer.line_count(), 2);
        assert_eq!(endings(&buffer), vec![Some(LineEnding::CRLF), None]);
    }

    #[test]
    fn test_lone_carriage_return_splits_rows() {
        let buffer = TextBuffer::from_text("a\rb\nc");
        assert_eq!(buffer.line_count(), 3);
        assert_eq!(endings(&buffer), vec![None, Some(LineEnding::LF), None]);
    }

    #[test]
    fn test_out_of_range_row() {
        let buffer = TextBuffer::from_text("a\n");
        assert_eq!(buffer.line_ending_for_row(5), None);
    }

    #[test]
    fn test_replace_emits_change_with_context() {
        let mut buffer = TextBuffer::from_text("ab\ncd");
        let mut sub = buffer.on_did_change();

        buffer.replace(1..3, "X").unwrap();

        assert_eq!(buffer.text(), "aXcd");
        let changes = sub.drain();
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].old_text, "b\n");
        assert_eq!(changes[0].new_text, "X");
        assert_eq!(changes[0].prev_char, Some('a'));
        assert_eq!(changes[0].next_char, Some('c'));
    }

    #[test]
    fn test_insert_at_edges_has_no_context() {
        let mut buffer = TextBuffer::new();
        let mut sub = buffer.on_did_change();

        buffer.insert(0, "x").unwrap();

        let changes = sub.drain();
        assert_eq!(changes[0].prev_char, None);
        assert_eq!(changes[0].next_char, None);
    }

    #[test]
    fn test_replace_out_of_range_fails() {
        let mut buffer = TextBuffer::from_text("abc");
        assert!(buffer.replace(2..9, "x").is_err());
        assert!(buffer.remove(5..6).is_err());
        assert_eq!(buffer.text(), "abc");
        assert!(!buffer.is_modified());
    }

    #[test]
    fn test_empty_edit_is_silent() {
        let mut buffer = TextBuffer::from_text("abc");
        let mut sub = buffer.on_did_change();
        buffer.insert(1, "").unwrap();
        assert!(sub.drain().is_empty());
    }

    #[test]
    fn test_set_text_emits_whole_text() {
        let mut buffer = TextBuffer::from_text("a\nb");
        let mut sub = buffer.on_did_change();

        buffer.set_text("a\r\nb");
        buffer.set_text("a\r\nb");

        let changes = sub.drain();
        assert_eq!(changes, vec![BufferChange::new("a\nb", "a\r\nb")]);
    }

    #[test]
    fn test_insert_newline_uses_preference() {
        let mut buffer = TextBuffer::from_text("ab");
        buffer.insert_newline(1).unwrap();
        assert_eq!(buffer.text(), "a\nb");

        buffer.set_preferred_line_ending(LineEnding::CRLF);
        buffer.insert_newline(0).unwrap();
        assert_eq!(buffer.text(), "\r\na\nb");
    }

    #[test]
    fn test_disposed_subscriber_stops_notifications() {
        let mut buffer = TextBuffer::from_text("a\nb");
        let mut subscription = buffer.on_did_change();
        let id = subscription.buffer_id();

        buffer.insert(0, "x").unwrap();
        assert_eq!(subscription.drain().len(), 1);

        subscription.dispose();
        buffer.insert(0, "\r\n").unwrap();
        assert_eq!(buffer.text(), "\r\nxa\nb");
        assert!(subscription.drain().is_empty());
        assert_eq!(id, buffer.id());
    }

    #[test]
    fn test_file_round_trip_keeps_terminators() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("mixed.txt");
        std::fs::write(&path, "one\r\ntwo\nthree").unwrap();

        let mut buffer = TextBuffer::from_file(&path).unwrap();
        assert_eq!(buffer.text(), "one\r\ntwo\nthree");
        assert_eq!(buffer.file_path(), Some(path.as_path()));

        buffer.set_text("one\r\ntwo\r\nthree");
        assert!(buffer.is_modified());
        buffer.save().unwrap();

        assert!(!buffer.is_modified());
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "one\r\ntwo\r\nthree"
        );
    }

    #[test]
    fn test_save_without_path_fails() {
        let mut buffer = TextBuffer::from_text("x");
        assert!(buffer.save().is_err());
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = TextBuffer::from_file("/nonexistent/lineend/file.txt").unwrap_err();
        assert!(err.to_string().contains("Failed to read file"));
    }
}
