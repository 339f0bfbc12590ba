//! Line ending picker modal.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Widget},
};
use unicode_width::UnicodeWidthStr;

use lineend_core::LineEnding;

use crate::{calculate_modal_width, centered_rect_with_size, contains_point, Modal, ModalResult};

const TITLE: &str = " Line Ending ";
const NO_MATCHES: &str = "No matches";

/// Filterable list of line ending styles.
#[derive(Debug, Default)]
pub struct LineEndingPicker {
    query: String,
    cursor: usize,
    last_list_area: Option<Rect>,
}

impl LineEndingPicker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear the query and selection before showing the picker again.
    pub fn reset(&mut self) {
        self.query.clear();
        self.cursor = 0;
        self.last_list_area = None;
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Styles matching the query, prefix matches first.
    pub fn items(&self) -> Vec<LineEnding> {
        let query = self.query.to_lowercase();
        let (mut prefixed, rest): (Vec<_>, Vec<_>) = LineEnding::ALL
            .into_iter()
            .filter(|ending| is_subsequence(&query, &ending.name().to_lowercase()))
            .partition(|ending| ending.name().to_lowercase().starts_with(&query));
        prefixed.extend(rest);
        prefixed
    }

    /// Currently highlighted style.
    pub fn selected(&self) -> Option<LineEnding> {
        self.items().get(self.cursor).copied()
    }

    fn set_query(&mut self, query: String) {
        self.query = query;
        self.cursor = 0;
    }

    fn modal_width(&self, screen_width: u16) -> u16 {
        let title_width = TITLE.width() as u16;
        let query_width = self.query.width() as u16 + 2;
        let items_width = LineEnding::ALL
            .iter()
            .map(|ending| ending.name().width() as u16 + 2)
            .max()
            .unwrap_or(0);

        calculate_modal_width(
            [title_width, query_width, items_width, NO_MATCHES.width() as u16].into_iter(),
            screen_width,
        )
    }
}

/// Check if every char of `needle` appears in `haystack` in order.
fn is_subsequence(needle: &str, haystack: &str) -> bool {
    let mut chars = haystack.chars();
    needle.chars().all(|c| chars.any(|h| h == c))
}

impl Modal for LineEndingPicker {
    type Result = LineEnding;

    fn render(&mut self, area: Rect, buf: &mut Buffer) {
        let items = self.items();
        let modal_width = self.modal_width(area.width);

        // 1 (top border) + 1 (query) + list + 1 (bottom border)
        let list_height = items.len().max(1) as u16;
        let modal_height = 1 + 1 + list_height + 1;

        let modal_area = centered_rect_with_size(modal_width, modal_height, area);
        Clear.render(modal_area, buf);

        let block = Block::default()
            .title(Span::styled(
                TITLE,
                Style::default().add_modifier(Modifier::BOLD),
            ))
            .borders(Borders::ALL);

        let inner = block.inner(modal_area);
        block.render(modal_area, buf);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Length(list_height)])
            .split(inner);

        Paragraph::new(format!("> {}", self.query)).render(chunks[0], buf);

        if items.is_empty() {
            Paragraph::new(NO_MATCHES)
                .style(Style::default().add_modifier(Modifier::DIM))
                .render(chunks[1], buf);
            self.last_list_area = None;
            return;
        }

        let list_items: Vec<ListItem> = items
            .iter()
            .enumerate()
            .map(|(idx, ending)| {
                let style = if idx == self.cursor {
                    Style::default().add_modifier(Modifier::REVERSED | Modifier::BOLD)
                } else {
                    Style::default()
                };
                ListItem::new(Line::from(Span::styled(ending.name(), style)))
            })
            .collect();

        List::new(list_items).render(chunks[1], buf);

        // Save list area for mouse handling
        self.last_list_area = Some(chunks[1]);
    }

    fn handle_key(&mut self, key: KeyEvent) -> Result<Option<ModalResult<Self::Result>>> {
        let count = self.items().len();
        match key.code {
            KeyCode::Esc => Ok(Some(ModalResult::Cancelled)),
            KeyCode::Enter => Ok(Some(match self.selected() {
                Some(ending) => ModalResult::Confirmed(ending),
                None => ModalResult::Cancelled,
            })),
            KeyCode::Up => {
                if count > 0 {
                    self.cursor = (self.cursor + count - 1) % count;
                }
                Ok(None)
            }
            KeyCode::Down => {
                if count > 0 {
                    self.cursor = (self.cursor + 1) % count;
                }
                Ok(None)
            }
            KeyCode::Home => {
                self.cursor = 0;
                Ok(None)
            }
            KeyCode::End => {
                self.cursor = count.saturating_sub(1);
                Ok(None)
            }
            KeyCode::Backspace => {
                let mut query = self.query.clone();
                query.pop();
                self.set_query(query);
                Ok(None)
            }
            KeyCode::Char(c) => {
                let mut query = self.query.clone();
                query.push(c);
                self.set_query(query);
                Ok(None)
            }
            _ => Ok(None),
        }
    }

    fn handle_mouse(
        &mut self,
        mouse: MouseEvent,
        _modal_area: Rect,
    ) -> Result<Option<ModalResult<Self::Result>>> {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return Ok(None);
        }

        let Some(list_area) = self.last_list_area else {
            return Ok(None);
        };

        if !contains_point(list_area, mouse.column, mouse.row) {
            return Ok(None);
        }

        let clicked = (mouse.row - list_area.y) as usize;
        match self.items().get(clicked) {
            Some(ending) => {
                self.cursor = clicked;
                Ok(Some(ModalResult::Confirmed(*ending)))
            }
            None => Ok(None),
        }
    }
}
