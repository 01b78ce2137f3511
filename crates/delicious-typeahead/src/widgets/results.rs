//! Results list widget: one line per rendered block, the active one
//! highlighted.

use crate::{pane::ResultsPane, theme::Theme};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Paragraph, Widget},
};

pub struct ResultsList<'a> {
    pane: &'a ResultsPane,
    theme: &'a Theme,
    show_descriptions: bool,
}

impl<'a> ResultsList<'a> {
    pub fn new(pane: &'a ResultsPane, theme: &'a Theme, show_descriptions: bool) -> Self {
        Self {
            pane,
            theme,
            show_descriptions,
        }
    }

    fn lines(&self) -> Vec<Line<'a>> {
        self.pane
            .blocks()
            .iter()
            .enumerate()
            .map(|(i, block)| {
                let style = if self.pane.is_active(i) {
                    self.theme.result_active
                } else if block.href.is_none() {
                    self.theme.result_notice
                } else {
                    self.theme.result
                };

                let mut spans = vec![Span::styled(block.label.as_str(), style)];
                if self.show_descriptions {
                    if let Some(description) = self.pane.description(i) {
                        spans.push(Span::raw("  "));
                        spans.push(Span::styled(description, self.theme.result_description));
                    }
                }
                Line::from(spans)
            })
            .collect()
    }
}

impl Widget for ResultsList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if !self.pane.is_visible() {
            return;
        }
        let block = Block::bordered()
            .title("Results")
            .border_style(self.theme.border_unfocused);
        Paragraph::new(self.lines()).block(block).render(area, buf);
    }
}
