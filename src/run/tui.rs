use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyModifiers};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::PathBuf;

use crate::models::TransactionType;
use crate::store::Store;
use crate::ui::app::{App, InputMode, Screen};
use crate::ui::commands;
use crate::ui::util::{scroll_down, scroll_to_bottom, scroll_to_top, scroll_up};

pub(crate) fn as_tui(store: &mut Store, export_dir: PathBuf) -> Result<()> {
    let mut app = App::new(store, export_dir);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app, store);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(ref e) = result {
        tracing::error!(error = %format!("{e:#}"), "tui exited with an error");
        eprintln!("Error: {e:?}");
    }

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    store: &mut Store,
) -> Result<()> {
    while app.running {
        app.sync(store);
        terminal.draw(|f| {
            // tab bar, status bar, command bar, block borders and table header
            let content_height = f.area().height.saturating_sub(6) as usize;
            app.visible_rows = content_height.max(1);
            crate::ui::render::render(f, app);
        })?;

        if let Event::Key(key) = event::read()? {
            if app.show_help {
                app.show_help = false;
                continue;
            }
            match app.input_mode {
                InputMode::Normal => handle_normal_input(key, app, store)?,
                InputMode::Command => handle_command_input(key, app, store)?,
                InputMode::Search => handle_search_input(key, app, store),
                InputMode::Editing => handle_editing_input(key, app, store),
                InputMode::Confirm => handle_confirm_input(key, app, store),
            }
        }
    }
    Ok(())
}

// ── Input handlers ───────────────────────────────────────────

fn handle_normal_input(key: event::KeyEvent, app: &mut App, store: &mut Store) -> Result<()> {
    match key.code {
        KeyCode::Char(':') => {
            app.input_mode = InputMode::Command;
            app.command_input.clear();
        }
        KeyCode::Char('/') => {
            app.input_mode = InputMode::Search;
            app.search_input.clear();
        }
        KeyCode::Char('q') | KeyCode::Char('c')
            if key.modifiers.contains(KeyModifiers::CONTROL) =>
        {
            app.running = false;
        }
        KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            for _ in 0..app.visible_rows / 2 {
                handle_move_down(app);
            }
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            for _ in 0..app.visible_rows / 2 {
                handle_move_up(app);
            }
        }
        KeyCode::Char('j') | KeyCode::Down => handle_move_down(app),
        KeyCode::Char('k') | KeyCode::Up => handle_move_up(app),
        KeyCode::Char('1') => switch_screen(app, store, Screen::Dashboard),
        KeyCode::Char('2') => switch_screen(app, store, Screen::Transactions),
        KeyCode::Char('3') => switch_screen(app, store, Screen::Analytics),
        KeyCode::Char('4') => switch_screen(app, store, Screen::Budgets),
        KeyCode::Char('5') => switch_screen(app, store, Screen::Categories),
        KeyCode::Tab => {
            let screens = Screen::all();
            let idx = screens.iter().position(|s| *s == app.screen).unwrap_or(0);
            let next = (idx + 1) % screens.len();
            switch_screen(app, store, screens[next]);
        }
        KeyCode::BackTab => {
            let screens = Screen::all();
            let idx = screens.iter().position(|s| *s == app.screen).unwrap_or(0);
            let prev = if idx == 0 { screens.len() - 1 } else { idx - 1 };
            switch_screen(app, store, screens[prev]);
        }
        KeyCode::Esc => handle_escape(app, store),
        KeyCode::Char('g') => handle_goto_top(app),
        KeyCode::Char('G') => handle_goto_bottom(app),
        KeyCode::Char('?') => {
            app.show_help = true;
        }
        KeyCode::Char('H') => {
            commands::handle_command("prev-month", app, store)?;
        }
        KeyCode::Char('L') => {
            commands::handle_command("next-month", app, store)?;
        }
        KeyCode::Char('[') if app.screen == Screen::Analytics => {
            let year = app.analytics_year - 1;
            commands::handle_command(&format!("year {year}"), app, store)?;
        }
        KeyCode::Char(']') if app.screen == Screen::Analytics => {
            let year = app.analytics_year + 1;
            commands::handle_command(&format!("year {year}"), app, store)?;
        }
        KeyCode::Char('p') if app.screen == Screen::Analytics => {
            commands::handle_command("period", app, store)?;
        }
        KeyCode::Char('f') if app.screen == Screen::Transactions => {
            let next = match app.type_filter {
                None => "expense",
                Some(TransactionType::Expense) => "income",
                Some(TransactionType::Income) => "all",
            };
            commands::handle_command(&format!("filter {next}"), app, store)?;
        }
        KeyCode::Char('a') => start_add(app),
        KeyCode::Char('e') | KeyCode::Enter => match app.screen {
            Screen::Transactions => commands::handle_command("edit-txn", app, store)?,
            Screen::Budgets => commands::handle_command("edit-budget", app, store)?,
            Screen::Categories => commands::handle_command("edit-category", app, store)?,
            _ => {}
        },
        KeyCode::Char('D') => match app.screen {
            Screen::Transactions => commands::handle_command("delete-txn", app, store)?,
            Screen::Budgets => commands::handle_command("delete-budget", app, store)?,
            Screen::Categories => commands::handle_command("delete-category", app, store)?,
            _ => {}
        },
        _ => {}
    }
    Ok(())
}

/// Opens the command bar with the add command for the current screen typed in.
fn start_add(app: &mut App) {
    let prefix = match app.screen {
        Screen::Budgets => "budget ",
        Screen::Categories => "category ",
        _ => "add-txn ",
    };
    app.command_input = prefix.to_string();
    app.input_mode = InputMode::Command;
}

fn handle_command_input(key: event::KeyEvent, app: &mut App, store: &mut Store) -> Result<()> {
    match key.code {
        KeyCode::Enter => {
            let input = app.command_input.clone();
            app.input_mode = InputMode::Normal;
            app.command_input.clear();
            commands::handle_command(&input, app, store)?;
        }
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
            app.command_input.clear();
        }
        KeyCode::Backspace => {
            app.command_input.pop();
            if app.command_input.is_empty() {
                app.input_mode = InputMode::Normal;
            }
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.command_input.clear();
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Char('w') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            delete_word(&mut app.command_input);
            if app.command_input.is_empty() {
                app.input_mode = InputMode::Normal;
            }
        }
        KeyCode::Char(c) => {
            app.command_input.push(c);
        }
        _ => {}
    }
    Ok(())
}

fn handle_search_input(key: event::KeyEvent, app: &mut App, store: &mut Store) {
    match key.code {
        KeyCode::Enter => {
            app.input_mode = InputMode::Normal;
            app.screen = Screen::Transactions;
            app.refresh_transactions(store);
        }
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
            app.search_input.clear();
            app.refresh_transactions(store);
        }
        KeyCode::Backspace => {
            app.search_input.pop();
            live_search(app, store);
        }
        KeyCode::Char(c) => {
            app.search_input.push(c);
            live_search(app, store);
        }
        _ => {}
    }
}

fn live_search(app: &mut App, store: &Store) {
    app.screen = Screen::Transactions;
    app.transaction_index = 0;
    app.transaction_scroll = 0;
    app.refresh_transactions(store);
}

fn handle_editing_input(key: event::KeyEvent, app: &mut App, store: &mut Store) {
    match key.code {
        KeyCode::Enter => {
            let input = std::mem::take(&mut app.command_input);
            app.input_mode = InputMode::Normal;
            if let Some(target) = app.editing.take() {
                commands::submit_edit(target, &input, app, store);
            }
        }
        KeyCode::Esc => {
            app.command_input.clear();
            app.editing = None;
            app.input_mode = InputMode::Normal;
            app.set_status("Edit cancelled");
        }
        KeyCode::Backspace => {
            app.command_input.pop();
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.command_input.clear();
        }
        KeyCode::Char('w') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            delete_word(&mut app.command_input);
        }
        KeyCode::Char(c) => {
            app.command_input.push(c);
        }
        _ => {}
    }
}

fn handle_confirm_input(key: event::KeyEvent, app: &mut App, store: &mut Store) {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => {
            if let Some(action) = app.pending_action.take() {
                commands::confirm(action, app, store);
            }
        }
        _ => {
            app.pending_action = None;
            app.set_status("Cancelled");
        }
    }
    app.input_mode = InputMode::Normal;
    app.confirm_message.clear();
}

fn delete_word(input: &mut String) {
    let trimmed = input.trim_end();
    match trimmed.rfind(' ') {
        Some(pos) => input.truncate(pos + 1),
        None => input.clear(),
    }
}

// ── Navigation helpers ───────────────────────────────────────

fn switch_screen(app: &mut App, store: &Store, screen: Screen) {
    app.screen = screen;
    match screen {
        Screen::Dashboard => app.refresh_dashboard(store),
        Screen::Transactions => app.refresh_transactions(store),
        Screen::Analytics => app.refresh_analytics(store),
        Screen::Budgets => app.refresh_budgets(store),
        Screen::Categories => app.refresh_categories(store),
    }
}

fn handle_move_down(app: &mut App) {
    let page = app.visible_rows.max(1);
    match app.screen {
        Screen::Transactions => scroll_down(
            &mut app.transaction_index,
            &mut app.transaction_scroll,
            app.transactions.len(),
            page,
        ),
        Screen::Budgets => scroll_down(
            &mut app.budget_index,
            &mut app.budget_scroll,
            app.budget_overview.items.len(),
            page,
        ),
        Screen::Categories => scroll_down(
            &mut app.category_index,
            &mut app.category_scroll,
            app.categories.len(),
            page,
        ),
        _ => {}
    }
}

fn handle_move_up(app: &mut App) {
    match app.screen {
        Screen::Transactions => scroll_up(&mut app.transaction_index, &mut app.transaction_scroll),
        Screen::Budgets => scroll_up(&mut app.budget_index, &mut app.budget_scroll),
        Screen::Categories => scroll_up(&mut app.category_index, &mut app.category_scroll),
        _ => {}
    }
}

fn handle_escape(app: &mut App, store: &Store) {
    app.status_message.clear();
    if !app.search_input.is_empty() {
        app.search_input.clear();
        app.refresh_transactions(store);
    }
}

fn handle_goto_top(app: &mut App) {
    match app.screen {
        Screen::Transactions => {
            scroll_to_top(&mut app.transaction_index, &mut app.transaction_scroll)
        }
        Screen::Budgets => scroll_to_top(&mut app.budget_index, &mut app.budget_scroll),
        Screen::Categories => scroll_to_top(&mut app.category_index, &mut app.category_scroll),
        _ => {}
    }
}

fn handle_goto_bottom(app: &mut App) {
    let page = app.visible_rows.max(1);
    match app.screen {
        Screen::Transactions => scroll_to_bottom(
            &mut app.transaction_index,
            &mut app.transaction_scroll,
            app.transactions.len(),
            page,
        ),
        Screen::Budgets => scroll_to_bottom(
            &mut app.budget_index,
            &mut app.budget_scroll,
            app.budget_overview.items.len(),
            page,
        ),
        Screen::Categories => scroll_to_bottom(
            &mut app.category_index,
            &mut app.category_scroll,
            app.categories.len(),
            page,
        ),
        _ => {}
    }
}
