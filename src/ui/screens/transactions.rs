use ratatui::{
    layout::{Constraint, Rect},
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, Table},
    Frame,
};

use super::panel;
use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::{format_currency, truncate};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let title = title(app);

    if app.transactions.is_empty() {
        let msg = if !app.search_input.is_empty() {
            vec![
                Line::from(""),
                Line::from(Span::styled(
                    format!("No transactions matching '{}'", app.search_input),
                    theme::dim_style(),
                )),
                Line::from(""),
                Line::from(Span::styled(
                    "Press Esc to clear the search",
                    theme::dim_style(),
                )),
            ]
        } else {
            vec![
                Line::from(""),
                Line::from(Span::styled("No transactions", theme::dim_style())),
                Line::from(""),
                Line::from(Span::styled(
                    "Press a or use :add-txn to record one",
                    theme::dim_style(),
                )),
            ]
        };
        f.render_widget(Paragraph::new(msg).centered().block(panel(title)), area);
        return;
    }

    let header_cells = ["Date", "Description", "Category", "Amount", "Notes"]
        .iter()
        .map(|h| Cell::from(*h).style(theme::header_style()));
    let header = Row::new(header_cells).height(1);

    let rows: Vec<Row> = app
        .transactions
        .iter()
        .enumerate()
        .skip(app.transaction_scroll)
        .take(area.height.saturating_sub(3) as usize)
        .map(|(i, txn)| {
            let (sign, amount_style) = if txn.is_expense() {
                ("-", theme::expense_style())
            } else {
                ("+", theme::income_style())
            };
            let amount_str = format!("{sign}{}", format_currency(txn.amount, &app.currency));

            let style = if i == app.transaction_index {
                theme::selected_style()
            } else if i % 2 == 1 {
                theme::alt_row_style()
            } else {
                theme::normal_style()
            };

            Row::new(vec![
                Cell::from(txn.date.to_string()),
                Cell::from(truncate(&txn.description, 40)),
                Cell::from(format!(
                    "{} {}",
                    app.category_icon(&txn.category),
                    truncate(&txn.category, 16)
                )),
                Cell::from(Span::styled(amount_str, amount_style)),
                Cell::from(Span::styled(
                    truncate(txn.notes.as_deref().unwrap_or(""), 30),
                    theme::dim_style(),
                )),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(12),
        Constraint::Min(20),
        Constraint::Length(20),
        Constraint::Length(20),
        Constraint::Length(30),
    ];

    let table = Table::new(rows, widths).header(header).block(panel(title));
    f.render_widget(table, area);
}

fn title(app: &App) -> String {
    let filter = match app.type_filter {
        Some(kind) => format!("[{kind}] "),
        None => String::new(),
    };
    let search = if app.search_input.is_empty() {
        String::new()
    } else {
        format!("search: '{}'", app.search_input)
    };
    format!("Transactions ({}) {filter}{search}", app.transactions.len())
        .trim_end()
        .to_string()
}
