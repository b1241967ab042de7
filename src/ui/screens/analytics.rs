use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Cell, Row, Table},
    Frame,
};
use rust_decimal::prelude::ToPrimitive;

use super::panel;
use crate::analytics::CategoryShare;
use crate::ui::app::{App, Period};
use crate::ui::theme;
use crate::ui::util::{format_currency, format_percent, progress_bar, truncate};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(10), Constraint::Length(9)])
        .split(area);

    render_series_chart(f, chunks[0], app);

    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[1]);

    render_top(f, bottom[0], app, "Top Expense Categories", &app.top_expenses);
    render_top(f, bottom[1], app, "Top Income Categories", &app.top_incomes);
}

fn render_series_chart(f: &mut Frame, area: Rect, app: &App) {
    let groups: Vec<BarGroup> = app
        .series
        .iter()
        .map(|point| {
            let bars = [
                Bar::default()
                    .value(point.income.to_u64().unwrap_or(0))
                    .text_value(String::new())
                    .style(theme::income_style()),
                Bar::default()
                    .value(point.expense.to_u64().unwrap_or(0))
                    .text_value(String::new())
                    .style(theme::expense_style()),
            ];
            BarGroup::default()
                .label(Line::from(point.label.clone()).centered())
                .bars(&bars)
        })
        .collect();

    let (bar_width, group_gap) = match app.period {
        Period::Monthly => (2, 2),
        Period::Quarterly => (8, 6),
    };

    let years: Vec<String> = app.years.iter().map(i32::to_string).collect();
    let title = format!(
        "{} {} | income vs expense | years: {}",
        app.period,
        app.analytics_year,
        years.join(" ")
    );

    let mut chart = BarChart::default()
        .block(panel(title))
        .bar_width(bar_width)
        .bar_gap(0)
        .group_gap(group_gap);
    for group in groups {
        chart = chart.data(group);
    }

    f.render_widget(chart, area);
}

fn render_top(f: &mut Frame, area: Rect, app: &App, title: &str, shares: &[CategoryShare]) {
    if shares.is_empty() {
        let msg = ratatui::widgets::Paragraph::new(Line::from(Span::styled(
            "Nothing recorded yet",
            theme::dim_style(),
        )))
        .centered()
        .block(panel(title));
        f.render_widget(msg, area);
        return;
    }

    let rows: Vec<Row> = shares
        .iter()
        .map(|share| {
            let color = app
                .categories
                .iter()
                .find(|c| c.name == share.name)
                .map(|c| theme::hex_color(&c.color))
                .unwrap_or(theme::ACCENT);
            Row::new(vec![
                Cell::from(format!(
                    "{} {}",
                    app.category_icon(&share.name),
                    truncate(&share.name, 16)
                )),
                Cell::from(format_currency(share.value, &app.currency)),
                Cell::from(Span::styled(
                    progress_bar(share.percentage, 10),
                    Style::default().fg(color),
                )),
                Cell::from(Span::styled(
                    format_percent(share.percentage),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                )),
            ])
            .style(theme::normal_style())
        })
        .collect();

    let widths = [
        Constraint::Min(16),
        Constraint::Length(18),
        Constraint::Length(12),
        Constraint::Length(7),
    ];
    f.render_widget(Table::new(rows, widths).block(panel(title)), area);
}
