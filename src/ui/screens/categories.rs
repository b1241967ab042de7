use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, Table},
    Frame,
};

use super::panel;
use crate::models::{TransactionType, COLOR_CHOICES, ICON_CHOICES, SUPPORTED_CURRENCIES};
use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::truncate;

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    render_category_table(f, chunks[0], app);
    render_settings(f, chunks[1], app);
}

fn render_category_table(f: &mut Frame, area: Rect, app: &App) {
    let title = format!("Categories ({})", app.categories.len());
    if app.categories.is_empty() {
        let msg = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled("No categories", theme::dim_style())),
            Line::from(""),
            Line::from(Span::styled(
                "Create one with :category expense <name>",
                theme::dim_style(),
            )),
        ])
        .centered()
        .block(panel(title));
        f.render_widget(msg, area);
        return;
    }

    let header_cells = ["", "Name", "Type", "Color"]
        .iter()
        .map(|h| Cell::from(*h).style(theme::header_style()));
    let header = Row::new(header_cells).height(1);

    let rows: Vec<Row> = app
        .categories
        .iter()
        .enumerate()
        .skip(app.category_scroll)
        .take(area.height.saturating_sub(3) as usize)
        .map(|(i, cat)| {
            let kind_style = match cat.kind {
                TransactionType::Income => theme::income_style(),
                TransactionType::Expense => theme::expense_style(),
            };
            let style = if i == app.category_index {
                theme::selected_style()
            } else {
                theme::normal_style()
            };

            Row::new(vec![
                Cell::from(cat.icon.clone()),
                Cell::from(truncate(&cat.name, 24)),
                Cell::from(Span::styled(cat.kind.to_string(), kind_style)),
                Cell::from(Line::from(vec![
                    Span::styled("██ ", Style::default().fg(theme::hex_color(&cat.color))),
                    Span::styled(cat.color.clone(), theme::dim_style()),
                ])),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(3),
        Constraint::Min(16),
        Constraint::Length(9),
        Constraint::Length(12),
    ];

    let table = Table::new(rows, widths).header(header).block(panel(title));
    f.render_widget(table, area);
}

fn render_settings(f: &mut Frame, area: Rect, app: &App) {
    let heading = |text: &'static str| {
        Line::from(Span::styled(
            text,
            Style::default()
                .fg(theme::YELLOW)
                .add_modifier(Modifier::BOLD),
        ))
    };

    let mut lines = vec![heading(" Currency")];
    for (code, name) in SUPPORTED_CURRENCIES {
        let marker = if *code == app.currency { "●" } else { "○" };
        let style = if *code == app.currency {
            Style::default()
                .fg(theme::ACCENT)
                .add_modifier(Modifier::BOLD)
        } else {
            theme::normal_style()
        };
        lines.push(Line::from(Span::styled(
            format!("  {marker} {code}  {name}"),
            style,
        )));
    }
    lines.push(Line::from(Span::styled(
        "  :currency <CODE> to change",
        theme::dim_style(),
    )));

    lines.push(Line::from(""));
    lines.push(heading(" Icons"));
    lines.push(Line::from(format!("  {}", ICON_CHOICES.join(" "))));

    lines.push(Line::from(""));
    lines.push(heading(" Colors"));
    let mut swatches = vec![Span::raw("  ")];
    for color in COLOR_CHOICES {
        swatches.push(Span::styled(
            "██",
            Style::default().fg(theme::hex_color(color)),
        ));
        swatches.push(Span::raw(" "));
    }
    lines.push(Line::from(swatches));

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "  Deleting a category keeps its transactions",
        theme::dim_style(),
    )));

    f.render_widget(Paragraph::new(lines).block(panel("Settings")), area);
}
