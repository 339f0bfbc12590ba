//! Interactive line ending picker for a single file.

use anyhow::{Context, Result};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, KeyCode, KeyEvent, MouseEvent},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
    Frame, Terminal,
};
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use lineend_app::{Command, LineEndingSelector};
use lineend_buffer::TextBuffer;
use lineend_config::Config;

use crate::event::{Event, EventSource};

const TICK_RATE: Duration = Duration::from_millis(50);

/// Open `path` in the terminal UI and run until the user quits.
///
/// `config_path` is reread when the user asks for a reload.
pub fn run(path: &Path, config: &Config, config_path: Option<&Path>) -> Result<()> {
    let buffer = TextBuffer::from_file(path)?;
    let mut app = PickerApp::new(buffer, config);
    app.config_path = config_path.map(Path::to_path_buf);

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    app.selector.deactivate();
    result
}

/// Single-buffer host for the line ending selector.
struct PickerApp {
    buffer: TextBuffer,
    selector: LineEndingSelector,
    /// Explicit config file, `None` for the user config
    config_path: Option<PathBuf>,
    screen: Rect,
    should_quit: bool,
    needs_redraw: bool,
}

impl PickerApp {
    fn new(mut buffer: TextBuffer, config: &Config) -> Self {
        let mut selector = LineEndingSelector::activate(config);
        selector.observe_active_item(Some(&mut buffer));
        Self {
            buffer,
            selector,
            config_path: None,
            screen: Rect::default(),
            should_quit: false,
            needs_redraw: true,
        }
    }

    fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        let events = EventSource::new(TICK_RATE);
        let size = terminal.size()?;
        self.screen = Rect::new(0, 0, size.width, size.height);

        while !self.should_quit {
            match events.next()? {
                Event::Key(key) => {
                    self.handle_key(key)?;
                    self.needs_redraw = true;
                }
                Event::Mouse(mouse) => {
                    self.handle_mouse(mouse)?;
                    self.needs_redraw = true;
                }
                Event::Resize(width, height) => {
                    self.screen = Rect::new(0, 0, width, height);
                    self.needs_redraw = true;
                }
                Event::Tick => {
                    if self.selector.tick(Some(&mut self.buffer)) {
                        self.needs_redraw = true;
                    }
                }
            }

            // Render UI only when needed
            if self.needs_redraw {
                terminal.draw(|frame| self.render(frame))?;
                self.needs_redraw = false;
            }
        }

        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        if self
            .selector
            .handle_picker_key(key, Some(&mut self.buffer))?
        {
            return Ok(());
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('p') => self.run_command(Command::ShowPicker),
            KeyCode::Char('L') => self.run_command(Command::ConvertToLf),
            KeyCode::Char('C') => self.run_command(Command::ConvertToCrlf),
            KeyCode::Char('s') => self.save()?,
            KeyCode::Char('r') => self.reload_config(),
            _ => {}
        }
        Ok(())
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) -> Result<()> {
        if self
            .selector
            .handle_picker_mouse(mouse, self.screen, Some(&mut self.buffer))?
        {
            return Ok(());
        }
        self.selector
            .handle_tile_click(mouse, Some(&mut self.buffer));
        Ok(())
    }

    fn run_command(&mut self, command: Command) {
        log::debug!("Running {}", command);
        self.selector.dispatch(command, Some(&mut self.buffer));
    }

    fn save(&mut self) -> Result<()> {
        if !self.buffer.is_modified() {
            return Ok(());
        }
        self.buffer.save().context("Failed to save buffer")?;
        if let Some(path) = self.buffer.file_path() {
            log::info!("Saved {}", path.display());
        }
        Ok(())
    }

    /// Reread the config file and hand it to the selector.
    fn reload_config(&mut self) {
        match crate::load_config(self.config_path.as_deref()) {
            Ok(config) => {
                for warning in config.warnings() {
                    log::warn!("{}", warning);
                }
                self.selector.apply_config(&config);
                self.selector.observe_active_item(Some(&mut self.buffer));
            }
            Err(e) => log::error!("Failed to reload config: {:#}", e),
        }
    }

    fn render(&mut self, frame: &mut Frame<'_>) {
        let area = frame.area();
        if area.height == 0 {
            return;
        }
        let buf = frame.buffer_mut();

        let text_area = Rect::new(area.x, area.y, area.width, area.height - 1);
        let terminator_style = Style::default().add_modifier(Modifier::DIM);
        let lines: Vec<Line> = (0..text_area.height as usize)
            .map_while(|row| self.buffer.line(row))
            .map(|line| text_line(&line, terminator_style))
            .collect();
        Paragraph::new(lines).render(text_area, buf);

        let status_area = Rect::new(area.x, area.bottom() - 1, area.width, 1);
        Paragraph::new(self.status_text())
            .style(Style::default().add_modifier(Modifier::REVERSED))
            .render(status_area, buf);

        // Tile on the status row, picker on top
        self.selector.render(area, buf);
    }

    fn status_text(&self) -> String {
        let name = self
            .buffer
            .file_path()
            .and_then(|path| path.file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "[untitled]".to_string());
        let modified = if self.buffer.is_modified() { " [+]" } else { "" };
        let message = lineend_logger::last_entry()
            .map(|entry| format!("  {}", entry.message))
            .unwrap_or_default();
        format!(" {}{}{}", name, modified, message)
    }
}

/// Line text with its terminator shown as a dim escape.
fn text_line(line: &str, terminator_style: Style) -> Line<'static> {
    let (content, terminator) = if let Some(content) = line.strip_suffix("\r\n") {
        (content, "\\r\\n")
    } else if let Some(content) = line.strip_suffix('\n') {
        (content, "\\n")
    } else if let Some(content) = line.strip_suffix('\r') {
        (content, "\\r")
    } else {
        (line, "")
    };

    Line::from(vec![
        Span::raw(content.to_string()),
        Span::styled(terminator, terminator_style),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use lineend_buffer::EditorBuffer;
    use ratatui::backend::TestBackend;

    fn app(text: &str) -> PickerApp {
        PickerApp::new(TextBuffer::from_text(text), &Config::default())
    }

    fn press(app: &mut PickerApp, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
            .unwrap();
    }

    #[test]
    fn test_text_line_shows_terminators() {
        let style = Style::default();
        assert_eq!(text_line("ab\r\n", style).spans[1].content, "\\r\\n");
        assert_eq!(text_line("ab\n", style).spans[0].content, "ab");
        assert_eq!(text_line("ab", style).spans[1].content, "");
    }

    #[test]
    fn test_convert_keys() {
        let mut app = app("a\nb\n");

        press(&mut app, KeyCode::Char('C'));
        assert_eq!(app.buffer.text(), "a\r\nb\r\n");
        assert_eq!(app.selector.tile().label(), "CRLF");

        press(&mut app, KeyCode::Char('L'));
        assert_eq!(app.buffer.text(), "a\nb\n");
        assert_eq!(app.selector.tile().label(), "LF");
    }

    #[test]
    fn test_picker_keys_take_priority() {
        let mut app = app("a\nb\n");

        press(&mut app, KeyCode::Char('p'));
        assert!(app.selector.is_picker_visible());

        // 'q' goes to the picker query, not to quit
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.should_quit);

        press(&mut app, KeyCode::Esc);
        assert!(!app.selector.is_picker_visible());

        press(&mut app, KeyCode::Esc);
        assert!(app.should_quit);
    }

    #[test]
    fn test_reload_key_applies_config_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[line_endings]\ndefault_line_ending = \"CRLF\"\n").unwrap();
        let mut app = app("no terminators");
        app.config_path = Some(path);

        press(&mut app, KeyCode::Char('r'));

        assert_eq!(app.selector.tile().label(), "CRLF");
        assert_eq!(
            app.buffer.preferred_line_ending(),
            Some(lineend_core::LineEnding::CRLF)
        );
    }

    #[test]
    fn test_reload_failure_keeps_running() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[line_endings\n").unwrap();
        let mut app = app("a\r\nb");
        app.config_path = Some(path);

        press(&mut app, KeyCode::Char('r'));

        assert!(!app.should_quit);
        assert_eq!(app.selector.tile().label(), "CRLF");
    }

    #[test]
    fn test_render_status_row() {
        let mut app = app("one\r\ntwo\r\n");
        let mut terminal = Terminal::new(TestBackend::new(30, 5)).unwrap();

        terminal.draw(|frame| app.render(frame)).unwrap();

        let buffer = terminal.backend().buffer();
        let status: String = (0..30)
            .map(|x| buffer[(x, 4)].symbol().to_string())
            .collect();
        assert!(status.contains("[untitled]"));
        assert!(status.trim_end().ends_with("CRLF"));

        let first: String = (0..30)
            .map(|x| buffer[(x, 0)].symbol().to_string())
            .collect();
        assert!(first.starts_with("one\\r\\n"));
    }
}
