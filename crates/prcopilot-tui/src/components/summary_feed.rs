use crossterm::event::{KeyCode, KeyEvent};
use prcopilot_core::review::ReviewItem;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

use crate::components::summary_card::SummaryCard;

/// List container for the summary cards.
///
/// Holds only the selection cursor; the controller owns the collection and
/// passes it in by reference on every render, in backend response order.
pub struct SummaryFeed {
    list_state: ListState,
}

impl SummaryFeed {
    pub fn new() -> Self {
        Self {
            list_state: ListState::default(),
        }
    }

    pub fn selected(&self) -> Option<usize> {
        self.list_state.selected()
    }

    /// Keep the cursor valid after the collection changed size.
    pub fn clamp(&mut self, len: usize) {
        if len == 0 {
            self.list_state.select(None);
        } else {
            let idx = self.list_state.selected().unwrap_or(0).min(len - 1);
            self.list_state.select(Some(idx));
        }
    }

    /// Move the cursor to the item with the given PR id.
    /// Returns `true` if the item was found and selected.
    pub fn select_pr(&mut self, items: &[ReviewItem], pr_id: i64) -> bool {
        if let Some(idx) = items.iter().position(|it| it.pr_id() == pr_id) {
            self.list_state.select(Some(idx));
            return true;
        }
        false
    }

    pub fn handle_key(&mut self, key: KeyEvent, len: usize) {
        if len == 0 {
            return;
        }
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                let current = self.list_state.selected().unwrap_or(0);
                if current + 1 < len {
                    self.list_state.select(Some(current + 1));
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                let current = self.list_state.selected().unwrap_or(0);
                if current > 0 {
                    self.list_state.select(Some(current - 1));
                }
            }
            // Jump to first/last
            KeyCode::Char('g') => self.list_state.select(Some(0)),
            KeyCode::Char('G') => self.list_state.select(Some(len - 1)),
            _ => {}
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, items: &[ReviewItem]) {
        let title = format!(" Pending PR Summaries ({}) ", items.len());
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));

        if items.is_empty() {
            let empty = Paragraph::new("No pending summaries")
                .style(Style::default().fg(Color::DarkGray))
                .block(block);
            frame.render_widget(empty, area);
            return;
        }

        let cards: Vec<ListItem> = items
            .iter()
            .map(|item| SummaryCard::new(item).list_item())
            .collect();

        let list = List::new(cards)
            .block(block)
            .highlight_style(Style::default().fg(Color::Black).bg(Color::Cyan).bold())
            .highlight_symbol("> ");

        let mut state = self.list_state.clone();
        frame.render_stateful_widget(list, area, &mut state);
    }
}

impl Default for SummaryFeed {
    fn default() -> Self {
        Self::new()
    }
}
