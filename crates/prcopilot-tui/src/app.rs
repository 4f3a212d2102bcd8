use std::sync::mpsc::{channel, Receiver, Sender};

use crossterm::event::{KeyCode, KeyEvent};
use prcopilot_client::{BlockingHttpService, DecisionOutcome};
use prcopilot_core::review::{Decision, ReviewItem, ReviewState};
use prcopilot_core::summary::PrSummary;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use tracing::warn;

use crate::components::summary_feed::SummaryFeed;

/// What the app is currently showing
#[derive(Debug, Clone)]
pub enum Mode {
    /// Normal feed navigation
    Normal,
    /// Full summary text for one PR (scrollable overlay)
    Detail { pr_id: i64, scroll: u16 },
}

/// Review session controller.
///
/// Owns the local view of the backend's pending summaries and translates
/// reviewer intent into decision commands. All state mutation happens on
/// the UI thread: commands are spawned onto the service's runtime and
/// their outcomes drained back here through the channel.
pub struct App {
    service: BlockingHttpService,
    /// Pending summaries in backend response order; never reordered.
    items: Vec<ReviewItem>,
    feed: SummaryFeed,
    mode: Mode,
    status_message: Option<String>,
    /// Last list-fetch failure, shown until a reload succeeds.
    load_error: Option<String>,
    outcome_tx: Sender<DecisionOutcome>,
    outcome_rx: Receiver<DecisionOutcome>,
    in_flight: usize,
}

impl App {
    /// Build the app and perform the initial fetch. A failed fetch is not
    /// fatal: the dashboard starts empty with the retry affordance shown.
    pub fn new(service: BlockingHttpService) -> Self {
        let (outcome_tx, outcome_rx) = channel();
        let mut app = Self {
            service,
            items: Vec::new(),
            feed: SummaryFeed::new(),
            mode: Mode::Normal,
            status_message: None,
            load_error: None,
            outcome_tx,
            outcome_rx,
            in_flight: 0,
        };
        app.load_summaries();
        app
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn items(&self) -> &[ReviewItem] {
        &self.items
    }

    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    pub fn selected_item(&self) -> Option<&ReviewItem> {
        self.items.get(self.feed.selected()?)
    }

    fn selected_pr_id(&self) -> Option<i64> {
        self.selected_item().map(ReviewItem::pr_id)
    }

    /// True while any decision command is outstanding. The event loop uses
    /// this to switch to poll-with-timeout so outcomes get drained.
    pub fn has_in_flight(&self) -> bool {
        self.in_flight > 0
    }

    /// True when an overlay is open (the quit key is then a "back" key).
    pub fn in_overlay(&self) -> bool {
        !matches!(self.mode, Mode::Normal)
    }

    /// Fetch the pending set, replacing the local collection in response
    /// order. On failure the current collection is left untouched.
    fn load_summaries(&mut self) {
        match self.service.list_summaries() {
            Ok(summaries) => {
                let selected = self.selected_pr_id();
                let previous = std::mem::take(&mut self.items);
                self.items = summaries.into_iter().map(|s| revive(&previous, s)).collect();
                self.load_error = None;
                self.feed.clamp(self.items.len());
                if let Some(pr_id) = selected {
                    self.feed.select_pr(&self.items, pr_id);
                }
            }
            Err(e) => {
                warn!("failed to fetch pending summaries: {e}");
                self.load_error = Some(format!("Fetch failed: {e} (R to retry)"));
            }
        }
    }

    /// Apply every decision outcome that has arrived since the last drain.
    pub fn drain_outcomes(&mut self) {
        while let Ok(outcome) = self.outcome_rx.try_recv() {
            self.apply_outcome(outcome);
        }
    }

    fn apply_outcome(&mut self, outcome: DecisionOutcome) {
        self.in_flight = self.in_flight.saturating_sub(1);
        let DecisionOutcome {
            pr_id,
            decision,
            result,
        } = outcome;

        match result {
            Ok(()) => {
                let selected = self.selected_pr_id();
                self.items.retain(|it| it.pr_id() != pr_id);
                self.feed.clamp(self.items.len());
                if let Some(sel) = selected {
                    if sel != pr_id {
                        self.feed.select_pr(&self.items, sel);
                    }
                }
                if matches!(self.mode, Mode::Detail { pr_id: open, .. } if open == pr_id) {
                    self.mode = Mode::Normal;
                }
                self.status_message = Some(format!("{} PR #{pr_id}", decision.past_tense()));
            }
            Err(e) => {
                if let Some(item) = self.items.iter_mut().find(|it| it.pr_id() == pr_id) {
                    item.state = ReviewState::Failed {
                        decision,
                        reason: e.to_string(),
                    };
                }
                self.status_message = Some(format!(
                    "{} failed for PR #{pr_id}: {e}",
                    decision.display_name()
                ));
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        self.status_message = None;

        match self.mode.clone() {
            Mode::Normal => self.handle_normal(key),
            Mode::Detail { pr_id, scroll } => self.handle_detail(key, pr_id, scroll),
        }
    }

    fn handle_normal(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => {
                if let Some(item) = self.selected_item() {
                    self.mode = Mode::Detail {
                        pr_id: item.pr_id(),
                        scroll: 0,
                    };
                }
            }
            KeyCode::Char('a') => {
                if let Some(pr_id) = self.selected_pr_id() {
                    self.dispatch_decision(pr_id, Decision::Approve);
                }
            }
            KeyCode::Char('r') => {
                if let Some(pr_id) = self.selected_pr_id() {
                    self.dispatch_decision(pr_id, Decision::Reject);
                }
            }
            KeyCode::Char('R') => {
                self.load_summaries();
                if self.load_error.is_none() {
                    self.status_message =
                        Some(format!("Reloaded: {} pending", self.items.len()));
                }
            }
            _ => self.feed.handle_key(key, self.items.len()),
        }
    }

    fn handle_detail(&mut self, key: KeyEvent, pr_id: i64, scroll: u16) {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => self.mode = Mode::Normal,
            KeyCode::Char('j') | KeyCode::Down => {
                self.mode = Mode::Detail {
                    pr_id,
                    scroll: scroll.saturating_add(1),
                };
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.mode = Mode::Detail {
                    pr_id,
                    scroll: scroll.saturating_sub(1),
                };
            }
            KeyCode::Char('a') => self.dispatch_decision(pr_id, Decision::Approve),
            KeyCode::Char('r') => self.dispatch_decision(pr_id, Decision::Reject),
            _ => {}
        }
    }

    /// Dispatch a decision command for the given PR, unless one is already
    /// in flight for it (debounce: the card's triggers are disarmed until
    /// the outcome lands).
    fn dispatch_decision(&mut self, pr_id: i64, decision: Decision) {
        let Some(item) = self.items.iter_mut().find(|it| it.pr_id() == pr_id) else {
            return;
        };
        if !item.state.is_actionable() {
            self.status_message = Some(format!("PR #{pr_id}: decision already in flight"));
            return;
        }
        item.state = ReviewState::InFlight(decision);
        self.in_flight += 1;
        self.service
            .spawn_decision(pr_id, decision, self.outcome_tx.clone());
        self.status_message = Some(format!(
            "{} dispatched for PR #{pr_id}",
            decision.display_name()
        ));
    }

    pub fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(area);

        self.render_title_bar(frame, layout[0]);
        self.feed.render(frame, layout[1], &self.items);
        self.render_status_bar(frame, layout[2]);

        // Overlays
        match &self.mode {
            Mode::Normal => {}
            Mode::Detail { pr_id, scroll } => self.render_detail(frame, *pr_id, *scroll, area),
        }
    }

    fn render_title_bar(&self, frame: &mut Frame, area: Rect) {
        let title = Line::from(vec![
            Span::styled(" prcopilot ", Style::default().bold().fg(Color::Cyan)),
            Span::raw("| "),
            Span::styled(self.service.base_url(), Style::default().fg(Color::Yellow)),
            Span::styled(
                format!(" ({} pending)", self.items.len()),
                Style::default().fg(Color::DarkGray),
            ),
        ]);
        frame.render_widget(title, area);
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        if let Some(ref msg) = self.status_message {
            let line = Line::from(Span::styled(
                format!(" {msg}"),
                Style::default().fg(Color::Green),
            ));
            frame.render_widget(line, area);
            return;
        }
        if let Some(ref err) = self.load_error {
            let line = Line::from(Span::styled(
                format!(" {err}"),
                Style::default().fg(Color::Red),
            ));
            frame.render_widget(line, area);
            return;
        }

        let hints = match &self.mode {
            Mode::Normal => vec![
                ("q", "quit"),
                ("j/k", "move"),
                ("Enter", "detail"),
                ("a", "approve"),
                ("r", "reject"),
                ("R", "reload"),
            ],
            Mode::Detail { .. } => vec![
                ("j/k", "scroll"),
                ("a", "approve"),
                ("r", "reject"),
                ("Esc", "back"),
            ],
        };

        let spans: Vec<Span> = hints
            .into_iter()
            .flat_map(|(key, desc)| {
                vec![
                    Span::styled(format!(" {key}"), Style::default().fg(Color::Yellow).bold()),
                    Span::raw(format!(" {desc} ")),
                ]
            })
            .collect();

        frame.render_widget(Line::from(spans), area);
    }

    fn render_detail(&self, frame: &mut Frame, pr_id: i64, scroll: u16, area: Rect) {
        let popup = centered_rect(70, 70, area);
        frame.render_widget(Clear, popup);

        let block = Block::default()
            .title(format!(" PR #{pr_id} "))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));

        let body = match self.items.iter().find(|it| it.pr_id() == pr_id) {
            Some(item) => match &item.state {
                ReviewState::Failed { decision, reason } => format!(
                    "{}\n\n{} failed: {reason}",
                    item.summary.summary,
                    decision.display_name()
                ),
                _ => item.summary.summary.clone(),
            },
            None => "(no longer pending)".into(),
        };

        let paragraph = Paragraph::new(body)
            .block(block)
            .wrap(Wrap { trim: false })
            .scroll((scroll, 0));
        frame.render_widget(paragraph, popup);
    }
}

/// Re-attach the previous client-side state to a re-fetched summary, so a
/// reload cannot re-arm triggers for a command that is still outstanding.
fn revive(previous: &[ReviewItem], summary: PrSummary) -> ReviewItem {
    let state = previous
        .iter()
        .find(|it| it.pr_id() == summary.pr_id)
        .map(|it| it.state.clone())
        .unwrap_or(ReviewState::Pending);
    ReviewItem { summary, state }
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
