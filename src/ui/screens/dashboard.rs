use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Cell, Paragraph, Row, Sparkline, Table},
    Frame,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use super::panel;
use crate::analytics::CategoryShare;
use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::{format_currency, format_percent, truncate};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // All-time cards
            Constraint::Min(8),    // Month distributions
            Constraint::Length(4), // Year trend
            Constraint::Length(8), // Recent transactions
        ])
        .split(area);

    render_summary_cards(f, chunks[0], app);
    render_month(f, chunks[1], app);
    render_trend_sparkline(f, chunks[2], app);
    render_recent(f, chunks[3], app);
}

fn render_summary_cards(f: &mut Frame, area: Rect, app: &App) {
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
        ])
        .split(area);

    render_card(
        f,
        cards[0],
        "Total Income",
        format_currency(app.total_income, &app.currency),
        theme::GREEN,
    );
    render_card(
        f,
        cards[1],
        "Total Expenses",
        format_currency(app.total_expense, &app.currency),
        theme::RED,
    );
    render_card(
        f,
        cards[2],
        "Balance",
        format_currency(app.total_balance, &app.currency),
        signed_color(app.total_balance),
    );
    render_card(
        f,
        cards[3],
        "Savings Rate",
        format_percent(app.savings_rate),
        theme::ACCENT,
    );
}

fn signed_color(amount: Decimal) -> Color {
    if amount >= Decimal::ZERO {
        theme::GREEN
    } else {
        theme::RED
    }
}

fn render_card(f: &mut Frame, area: Rect, title: &str, display: String, color: Color) {
    let text = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            display,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
    ])
    .centered()
    .block(panel(title));

    f.render_widget(text, area);
}

fn render_month(f: &mut Frame, area: Rect, app: &App) {
    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    render_expense_chart(f, halves[0], app);
    render_month_totals(f, halves[1], app);
}

fn render_expense_chart(f: &mut Frame, area: Rect, app: &App) {
    let title = format!("Expenses by Category, {}", app.month.label());
    if app.expense_shares.is_empty() {
        let msg = Paragraph::new(Line::from(Span::styled(
            "No expenses this month. Add one with :add-txn",
            theme::dim_style(),
        )))
        .centered()
        .block(panel(title));
        f.render_widget(msg, area);
        return;
    }

    let bars: Vec<Bar> = app
        .expense_shares
        .iter()
        .take(8)
        .map(|share| {
            let color = app
                .categories
                .iter()
                .find(|c| c.name == share.name)
                .map(|c| theme::hex_color(&c.color))
                .unwrap_or(theme::ACCENT);
            Bar::default()
                .value(share.value.to_u64().unwrap_or(0))
                .text_value(format_percent(share.percentage))
                .label(Line::from(truncate(&share.name, 10)))
                .style(Style::default().fg(color))
                .value_style(
                    Style::default()
                        .fg(theme::HEADER_BG)
                        .bg(color)
                        .add_modifier(Modifier::BOLD),
                )
        })
        .collect();

    let chart = BarChart::default()
        .block(panel(title))
        .data(BarGroup::default().bars(&bars))
        .bar_width(10)
        .bar_gap(1)
        .value_style(Style::default().fg(theme::TEXT));

    f.render_widget(chart, area);
}

fn render_month_totals(f: &mut Frame, area: Rect, app: &App) {
    let totals = &app.month_totals;
    let mut lines = vec![
        amount_line("Income", totals.income, &app.currency, theme::income_style()),
        amount_line("Expenses", totals.expense, &app.currency, theme::expense_style()),
        amount_line(
            "Balance",
            totals.balance,
            &app.currency,
            Style::default().fg(signed_color(totals.balance)),
        ),
        Line::from(""),
        Line::from(Span::styled(" Income sources", theme::dim_style())),
    ];
    lines.extend(share_lines(app, &app.income_shares, 3));

    let block = panel(format!("{} (H/L to change)", app.month.label()));
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn amount_line<'a>(label: &'a str, amount: Decimal, currency: &str, style: Style) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!(" {label:<10}"), theme::normal_style()),
        Span::styled(format_currency(amount, currency), style),
    ])
}

fn share_lines<'a>(app: &'a App, shares: &'a [CategoryShare], limit: usize) -> Vec<Line<'a>> {
    if shares.is_empty() {
        return vec![Line::from(Span::styled("  none", theme::dim_style()))];
    }
    shares
        .iter()
        .take(limit)
        .map(|share| {
            Line::from(vec![
                Span::raw(format!("  {} ", app.category_icon(&share.name))),
                Span::styled(truncate(&share.name, 14), theme::normal_style()),
                Span::styled(
                    format!("  {}", format_percent(share.percentage)),
                    theme::dim_style(),
                ),
            ])
        })
        .collect()
}

fn render_trend_sparkline(f: &mut Frame, area: Rect, app: &App) {
    let data: Vec<u64> = app
        .year_series
        .iter()
        .map(|point| point.expense.to_u64().unwrap_or(0))
        .collect();

    let sparkline = Sparkline::default()
        .block(panel(format!("Monthly Spending, {}", app.month.year)))
        .data(&data)
        .style(Style::default().fg(theme::YELLOW));

    f.render_widget(sparkline, area);
}

fn render_recent(f: &mut Frame, area: Rect, app: &App) {
    if app.recent.is_empty() {
        let msg = Paragraph::new(Line::from(Span::styled(
            "No transactions yet",
            theme::dim_style(),
        )))
        .centered()
        .block(panel("Recent Transactions"));
        f.render_widget(msg, area);
        return;
    }

    let rows: Vec<Row> = app
        .recent
        .iter()
        .enumerate()
        .map(|(i, txn)| {
            let (sign, amount_style) = if txn.is_income() {
                ("+", theme::income_style())
            } else {
                ("-", theme::expense_style())
            };
            Row::new(vec![
                Cell::from(txn.date.to_string()),
                Cell::from(format!(
                    "{} {}",
                    app.category_icon(&txn.category),
                    truncate(&txn.description, 36)
                )),
                Cell::from(truncate(&txn.category, 16)),
                Cell::from(Span::styled(
                    format!("{sign}{}", format_currency(txn.amount, &app.currency)),
                    amount_style,
                )),
            ])
            .style(if i % 2 == 1 {
                theme::alt_row_style()
            } else {
                theme::normal_style()
            })
        })
        .collect();

    let widths = [
        Constraint::Length(12),
        Constraint::Min(20),
        Constraint::Length(18),
        Constraint::Length(20),
    ];
    let table = Table::new(rows, widths).block(panel("Recent Transactions"));
    f.render_widget(table, area);
}
