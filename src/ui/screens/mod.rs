pub(crate) mod analytics;
pub(crate) mod budgets;
pub(crate) mod categories;
pub(crate) mod dashboard;
pub(crate) mod transactions;

use ratatui::{
    style::{Modifier, Style},
    text::Span,
    widgets::{Block, Borders},
};

use super::theme;

/// Bordered panel with a dim bold title, shared by every screen.
pub(crate) fn panel(title: impl Into<String>) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::OVERLAY))
        .title(Span::styled(
            format!(" {} ", title.into()),
            Style::default()
                .fg(theme::TEXT_DIM)
                .add_modifier(Modifier::BOLD),
        ))
}
