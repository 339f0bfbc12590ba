//! UI components for lineend.
//!
//! Provides the status bar tile that displays a buffer's line endings,
//! the picker modal used to change them, and shared modal utilities.

pub mod picker;
pub mod status_tile;

pub use picker::LineEndingPicker;
pub use status_tile::StatusTile;

use anyhow::Result;
use crossterm::event::{KeyEvent, MouseEvent};
use ratatui::{buffer::Buffer, layout::Rect};

// ===== Modal System =====

/// Modal window result (generic version).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalResult<T> {
    /// User confirmed the action with a result.
    Confirmed(T),
    /// User cancelled the action.
    Cancelled,
}

/// Trait for all modal windows.
pub trait Modal {
    /// Modal window result type.
    type Result;

    /// Render the modal window centered in `area`.
    fn render(&mut self, area: Rect, buf: &mut Buffer);

    /// Handle keyboard event.
    /// Returns Some(result) if the modal window should close.
    fn handle_key(&mut self, key: KeyEvent) -> Result<Option<ModalResult<Self::Result>>>;

    /// Handle mouse event.
    /// Returns Some(result) if the modal window should close.
    fn handle_mouse(
        &mut self,
        _mouse: MouseEvent,
        _modal_area: Rect,
    ) -> Result<Option<ModalResult<Self::Result>>> {
        Ok(None) // Default: do nothing
    }
}

// ===== Modal Width Calculation =====

/// Default modal size constants.
pub mod modal_constants {
    /// Minimum modal width.
    pub const MIN_WIDTH: u16 = 30;
    /// Maximum width as percentage of screen.
    pub const MAX_WIDTH_PERCENTAGE: f32 = 0.75;
    /// Padding with single border.
    pub const PADDING_WITH_BORDER: u16 = 6;
}

/// Calculate modal width based on content and screen constraints.
///
/// Takes the widest content, adds border padding, then applies
/// min/max constraints.
pub fn calculate_modal_width(content_widths: impl Iterator<Item = u16>, screen_width: u16) -> u16 {
    let content_width = content_widths.max().unwrap_or(0);
    let total_width = content_width + modal_constants::PADDING_WITH_BORDER;
    let max_width = (screen_width as f32 * modal_constants::MAX_WIDTH_PERCENTAGE) as u16;

    total_width
        .max(modal_constants::MIN_WIDTH)
        .min(max_width)
        .min(screen_width)
}

/// Center a `width` x `height` rectangle inside `r`, clamped to fit.
pub fn centered_rect_with_size(width: u16, height: u16, r: Rect) -> Rect {
    let width = width.min(r.width);
    let height = height.min(r.height);
    Rect::new(
        r.x + (r.width - width) / 2,
        r.y + (r.height - height) / 2,
        width,
        height,
    )
}

/// Check if a screen position falls inside `area`.
pub fn contains_point(area: Rect, column: u16, row: u16) -> bool {
    column >= area.x
        && column < area.x.saturating_add(area.width)
        && row >= area.y
        && row < area.y.saturating_add(area.height)
}
