//! Status bar tile showing the active buffer's line endings.

use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use ratatui::{buffer::Buffer, layout::Rect, style::Style};
use unicode_width::UnicodeWidthStr;

use lineend_core::{LineEnding, LineEndingSet};
use lineend_tracker::LineEndingDisplay;

use crate::contains_point;

/// Right-aligned status bar tile: "LF", "CRLF", "Mixed", or nothing.
#[derive(Debug, Default)]
pub struct StatusTile {
    line_endings: LineEndingSet,
    /// Area used by the last render (for mouse handling)
    last_area: Option<Rect>,
}

impl StatusTile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn line_endings(&self) -> LineEndingSet {
        self.line_endings
    }

    /// Text shown in the tile.
    pub fn label(&self) -> &'static str {
        self.line_endings.label()
    }

    /// Tooltip text for the tile.
    pub fn tooltip(&self) -> String {
        format!("File uses {} line endings", self.line_endings.description())
    }

    /// Width in cells, including one cell of padding on each side.
    pub fn width(&self) -> u16 {
        let label = self.label();
        if label.is_empty() {
            0
        } else {
            label.width() as u16 + 2
        }
    }

    /// Render at the right edge of `area` (first row only).
    ///
    /// Returns the area the tile occupies; empty when there is nothing to show.
    pub fn render(&mut self, buf: &mut Buffer, area: Rect, style: Style) -> Rect {
        let width = self.width().min(area.width);
        if area.height == 0 || width == 0 {
            self.last_area = None;
            return Rect::new(area.right(), area.top(), 0, 0);
        }

        let tile_area = Rect::new(area.right() - width, area.top(), width, 1);
        let text = format!(" {} ", self.label());

        let mut x = tile_area.left();
        for ch in text.chars() {
            if x >= tile_area.right() {
                break;
            }
            buf[(x, tile_area.top())].set_char(ch).set_style(style);
            x += 1;
        }

        self.last_area = Some(tile_area);
        tile_area
    }

    /// Check if a click at (column, row) hits the tile.
    pub fn hit_test(&self, column: u16, row: u16) -> bool {
        self.last_area
            .is_some_and(|area| contains_point(area, column, row))
    }

    /// Returns true if `mouse` is a left click on the tile.
    pub fn handle_mouse(&self, mouse: MouseEvent) -> bool {
        mouse.kind == MouseEventKind::Down(MouseButton::Left)
            && self.hit_test(mouse.column, mouse.row)
    }
}

impl LineEndingDisplay for StatusTile {
    fn set_line_endings(&mut self, endings: LineEndingSet) {
        self.line_endings = endings;
    }

    fn has_line_ending(&self, ending: LineEnding) -> bool {
        self.line_endings.contains(ending)
    }

    fn description(&self) -> String {
        self.line_endings.description().to_string()
    }
}
