use prcopilot_core::review::{ReviewItem, ReviewState};
use ratatui::prelude::*;
use ratatui::widgets::ListItem;

/// Stateless rendering of one PR summary.
///
/// Shows the identifier, the summary text verbatim, and the marker that
/// reflects whether the decision triggers are armed, in flight, or failed.
/// Owns no data and performs no I/O; trigger keys are mapped by the
/// controller.
pub struct SummaryCard<'a> {
    item: &'a ReviewItem,
}

impl<'a> SummaryCard<'a> {
    pub fn new(item: &'a ReviewItem) -> Self {
        Self { item }
    }

    pub fn lines(&self) -> Vec<Line<'a>> {
        let mut header = vec![Span::styled(
            format!("PR #{}", self.item.pr_id()),
            Style::default().bold().fg(Color::Yellow),
        )];
        if let Some(marker) = state_marker(&self.item.state) {
            header.push(Span::raw(" "));
            header.push(marker);
        }
        vec![
            Line::from(header),
            Line::from(vec![
                Span::raw("  "),
                Span::raw(self.item.summary.summary.as_str()),
            ]),
        ]
    }

    pub fn list_item(&self) -> ListItem<'a> {
        ListItem::new(self.lines())
    }
}

fn state_marker(state: &ReviewState) -> Option<Span<'static>> {
    match state {
        ReviewState::Pending => None,
        ReviewState::InFlight(decision) => Some(Span::styled(
            format!("[{}…]", decision.as_str()),
            Style::default().fg(Color::Magenta),
        )),
        ReviewState::Failed { decision, .. } => Some(Span::styled(
            format!("[{} failed]", decision.as_str()),
            Style::default().fg(Color::Red).bold(),
        )),
    }
}
