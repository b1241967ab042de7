use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, Paragraph},
    Frame,
};

use super::panel;
use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::{format_currency, format_percent, progress_bar, truncate};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    if app.budget_overview.items.is_empty() {
        render_empty(f, area, app);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(4)])
        .split(area);

    render_list(f, chunks[0], app);
    render_totals(f, chunks[1], app);
}

fn render_list(f: &mut Frame, area: Rect, app: &App) {
    let items: Vec<ListItem> = app
        .budget_overview
        .items
        .iter()
        .enumerate()
        .skip(app.budget_scroll)
        .take(area.height.saturating_sub(2) as usize)
        .map(|(i, item)| {
            let status_style = theme::budget_style(item.status);
            let style = if i == app.budget_index {
                theme::selected_style()
            } else if i % 2 == 0 {
                theme::alt_row_style()
            } else {
                theme::normal_style()
            };

            let name = format!(
                "{} {}",
                app.category_icon(&item.budget.category),
                truncate(&item.budget.category, 16)
            );
            let remaining = item.remaining();
            let remaining_text = if item.is_over() {
                format!(
                    " over by {}",
                    format_currency(remaining.abs(), &app.currency)
                )
            } else {
                format!(" {} left", format_currency(remaining, &app.currency))
            };

            ListItem::new(Line::from(vec![
                Span::styled(format!("{name:<20}"), style),
                Span::styled(
                    format!(
                        " {} / {} ",
                        format_currency(item.spent, &app.currency),
                        format_currency(item.budget.limit, &app.currency)
                    ),
                    status_style,
                ),
                Span::styled(progress_bar(item.percentage, 20), status_style),
                Span::styled(
                    format!(" {:>6}", format_percent(item.percentage)),
                    status_style.add_modifier(Modifier::BOLD),
                ),
                Span::styled(format!(" {:<9}", item.status.as_str()), status_style),
                Span::styled(remaining_text, theme::dim_style()),
            ]))
        })
        .collect();

    let list = List::new(items).block(panel(format!("Budgets for {}", app.month.label())));
    f.render_widget(list, area);
}

fn render_totals(f: &mut Frame, area: Rect, app: &App) {
    let overview = &app.budget_overview;
    let percent = overview.spent_percentage().unwrap_or(0.0);
    let style = if overview.total_spent > overview.total_limit {
        theme::expense_style()
    } else {
        theme::income_style()
    };

    let line = Line::from(vec![
        Span::styled(" Spent ", theme::normal_style()),
        Span::styled(format_currency(overview.total_spent, &app.currency), style),
        Span::styled(" of ", theme::normal_style()),
        Span::styled(
            format_currency(overview.total_limit, &app.currency),
            Style::default()
                .fg(theme::TEXT)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("  {}", progress_bar(percent, 30)), style),
        Span::styled(format!(" {}", format_percent(percent)), style),
    ]);
    f.render_widget(Paragraph::new(vec![line]).block(panel("Total")), area);
}

fn render_empty(f: &mut Frame, area: Rect, app: &App) {
    let msg = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("No budgets set for {}", app.month.label()),
            theme::dim_style(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Use :budget <category> <limit> to set a spending limit",
            theme::dim_style(),
        )),
    ])
    .centered()
    .block(panel("Budgets"));
    f.render_widget(msg, area);
}
