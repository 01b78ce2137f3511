//! Search box widget: the one-line text input at the top of the screen.
//!
//! # Editing
//!
//! - `Char(c)` inserts at the cursor.
//! - `Backspace` deletes the character before the cursor.
//! - `Left` / `Right` move the cursor.

use crate::event::AppEvent;
use crate::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Paragraph, Widget},
};

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Clone)]
pub struct SearchInput {
    text: String,
    /// Byte offset of the cursor within `text`.
    cursor: usize,
}

impl SearchInput {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    /// Apply an editing event. Returns `true` when the text changed; cursor
    /// moves return `false`.
    pub fn handle(&mut self, event: &AppEvent) -> bool {
        match event {
            AppEvent::Char(c) => {
                self.text.insert(self.cursor, *c);
                self.cursor += c.len_utf8();
                tracing::debug!(text = %self.text, cursor = self.cursor, "input: char inserted");
                true
            }
            AppEvent::Backspace => {
                if self.cursor == 0 {
                    return false;
                }
                let prev = self.prev_boundary();
                self.text.remove(prev);
                self.cursor = prev;
                tracing::debug!(text = %self.text, cursor = self.cursor, "input: backspace");
                true
            }
            AppEvent::Left => {
                self.cursor = self.prev_boundary();
                false
            }
            AppEvent::Right => {
                if self.cursor < self.text.len() {
                    self.cursor = self.text[self.cursor..]
                        .char_indices()
                        .nth(1)
                        .map(|(i, _)| self.cursor + i)
                        .unwrap_or(self.text.len());
                }
                false
            }
            _ => false,
        }
    }

    fn prev_boundary(&self) -> usize {
        self.text[..self.cursor]
            .char_indices()
            .last()
            .map(|(i, _)| i)
            .unwrap_or(0)
    }

    /// Column of the cursor, counted in characters.
    pub fn cursor_col(&self) -> usize {
        self.text[..self.cursor].chars().count()
    }
}

// ---------------------------------------------------------------------------
// Widget
// ---------------------------------------------------------------------------

pub struct SearchBox<'a> {
    input: &'a SearchInput,
    theme: &'a Theme,
}

impl<'a> SearchBox<'a> {
    pub fn new(input: &'a SearchInput, theme: &'a Theme) -> Self {
        Self { input, theme }
    }

    /// Absolute terminal position of the text cursor within this widget's
    /// rendered area.
    pub fn cursor_position(&self, area: Rect) -> (u16, u16) {
        let col = self.input.cursor_col() as u16;
        let x = (area.x + 1 + col).min(area.right().saturating_sub(2));
        (x, area.y + 1)
    }
}

impl Widget for SearchBox<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::bordered()
            .title("Search")
            .border_style(self.theme.border_focused);

        let line = if self.input.text().is_empty() {
            Line::from(Span::styled("Search for coffee, beer, tacos...", self.theme.placeholder))
        } else {
            Line::from(self.input.text())
        };
        Paragraph::new(line).block(block).render(area, buf);
    }
}
