use anyhow::Result;
use crossterm::event::{KeyEvent, MouseEvent};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
};

use lineend_buffer::{Disposable, EditorBuffer, PaneItem};
use lineend_config::Config;
use lineend_core::{LineEnding, LineEndingSet};
use lineend_tracker::{convert, LineEndingTracker, TrackerSettings};
use lineend_ui::{LineEndingPicker, Modal, ModalResult, StatusTile};

use crate::command::Command;

/// Buffer behind the active item, if it is a text item.
fn active_buffer<'a>(item: Option<&'a mut dyn PaneItem>) -> Option<&'a mut dyn EditorBuffer> {
    item.and_then(|item| item.buffer_mut())
}

/// Wires the tracker, status tile and picker to the host's active item.
#[derive(Debug)]
pub struct LineEndingSelector {
    tracker: LineEndingTracker<StatusTile>,
    picker: LineEndingPicker,
    picker_visible: bool,
    /// Handle of the current change subscription
    subscription: Option<Disposable>,
    active: bool,
}

impl LineEndingSelector {
    /// Build the selector from configuration.
    pub fn activate(config: &Config) -> Self {
        let settings = TrackerSettings::from_config(config);
        log::info!(
            "Line ending selector activated (default: {}, debounce: {:?})",
            settings.default_line_ending.as_str(),
            settings.rescan_debounce
        );
        Self {
            tracker: LineEndingTracker::new(StatusTile::new(), settings),
            picker: LineEndingPicker::new(),
            picker_visible: false,
            subscription: None,
            active: true,
        }
    }

    /// Take up a reloaded configuration. The tile follows on the next scan.
    pub fn apply_config(&mut self, config: &Config) {
        let settings = TrackerSettings::from_config(config);
        log::info!(
            "Line ending settings reloaded (default: {}, debounce: {:?})",
            settings.default_line_ending.as_str(),
            settings.rescan_debounce
        );
        self.tracker
            .set_default_line_ending(settings.default_line_ending);
        self.tracker.set_rescan_debounce(settings.rescan_debounce);
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_picker_visible(&self) -> bool {
        self.picker_visible
    }

    pub fn tile(&self) -> &StatusTile {
        self.tracker.display()
    }

    /// Set currently shown by the tile.
    pub fn line_endings(&self) -> LineEndingSet {
        self.tile().line_endings()
    }

    pub fn tooltip(&self) -> String {
        self.tile().tooltip()
    }

    /// Follow a change of the active item.
    ///
    /// Text items are tracked, anything else clears the tile.
    pub fn observe_active_item(&mut self, item: Option<&mut dyn PaneItem>) {
        if !self.active {
            return;
        }

        self.release_subscription();
        match active_buffer(item) {
            Some(buffer) => {
                self.subscription = Some(self.tracker.attach(buffer));
            }
            None => {
                self.tracker.detach();
                self.hide_picker();
            }
        }
    }

    /// Run a command against the active item. Non-text items are ignored.
    pub fn dispatch(&mut self, command: Command, item: Option<&mut dyn PaneItem>) {
        if !self.active {
            return;
        }

        let Some(buffer) = active_buffer(item) else {
            log::debug!("{} ignored: no text buffer", command);
            return;
        };

        match command.target() {
            Some(ending) => self.convert_buffer(buffer, ending),
            None => self.show_picker(),
        }
    }

    /// Feed a key to the picker. Returns true if the picker consumed it.
    pub fn handle_picker_key(
        &mut self,
        key: KeyEvent,
        item: Option<&mut dyn PaneItem>,
    ) -> Result<bool> {
        if !self.picker_visible {
            return Ok(false);
        }

        if let Some(result) = self.picker.handle_key(key)? {
            self.finish_picker(result, item);
        }
        Ok(true)
    }

    /// Feed a mouse event to the picker. Returns true if the picker consumed it.
    pub fn handle_picker_mouse(
        &mut self,
        mouse: MouseEvent,
        area: Rect,
        item: Option<&mut dyn PaneItem>,
    ) -> Result<bool> {
        if !self.picker_visible {
            return Ok(false);
        }

        if let Some(result) = self.picker.handle_mouse(mouse, area)? {
            self.finish_picker(result, item);
        }
        Ok(true)
    }

    /// Open the picker when the tile is clicked. Returns true on a hit.
    pub fn handle_tile_click(&mut self, mouse: MouseEvent, item: Option<&mut dyn PaneItem>) -> bool {
        if !self.active || !self.tile().handle_mouse(mouse) {
            return false;
        }
        self.dispatch(Command::ShowPicker, item);
        true
    }

    /// Drain pending notifications and run a due rescan.
    pub fn tick(&mut self, item: Option<&mut dyn PaneItem>) -> bool {
        if !self.active {
            return false;
        }
        match active_buffer(item) {
            Some(buffer) => self.tracker.poll(buffer),
            None => false,
        }
    }

    /// Draw the tile on the bottom row of `area`, and the picker on top.
    pub fn render(&mut self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 {
            return;
        }

        let status_row = Rect::new(area.x, area.bottom() - 1, area.width, 1);
        self.tracker.display_mut().render(
            buf,
            status_row,
            Style::default().add_modifier(Modifier::REVERSED),
        );

        if self.picker_visible {
            self.picker.render(area, buf);
        }
    }

    /// Release the subscription and hide the picker. Safe to call twice.
    pub fn deactivate(&mut self) {
        if !self.active {
            return;
        }
        self.release_subscription();
        self.tracker.detach();
        self.hide_picker();
        self.active = false;
        log::info!("Line ending selector deactivated");
    }

    fn show_picker(&mut self) {
        self.picker.reset();
        self.picker_visible = true;
    }

    fn hide_picker(&mut self) {
        self.picker_visible = false;
    }

    fn finish_picker(&mut self, result: ModalResult<LineEnding>, item: Option<&mut dyn PaneItem>) {
        self.hide_picker();
        if let ModalResult::Confirmed(ending) = result {
            match active_buffer(item) {
                Some(buffer) => self.convert_buffer(buffer, ending),
                None => log::debug!("Picked {} without a text buffer", ending),
            }
        }
    }

    fn convert_buffer(&mut self, buffer: &mut dyn EditorBuffer, ending: LineEnding) {
        convert(buffer, ending);
        if self.tracker.tracked_buffer() == Some(buffer.id()) {
            self.tracker.poll(buffer);
        }
    }

    fn release_subscription(&mut self) {
        if let Some(handle) = self.subscription.take() {
            handle.dispose();
        }
    }
}
