use crate::app::agent::AgentManager;
use crate::app::canvas::CanvasManager;
use crate::app::logger::LogLevel;
use crate::app::runner::RunManager;
use crate::app::state::{App, AppState, Focus, NoticeKind, Tab};
use crate::ui::draw::ui;
use crate::ui::editor::FieldEditor;
use crate::ui::guards::TerminalGuard;
use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{io, time::Duration};

type Term = Terminal<CrosstermBackend<io::Stdout>>;

const PAGE: usize = 10;

/// Main application run loop
pub fn run_app(app: &mut App) -> Result<()> {
    let _guard = TerminalGuard::new()?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
    let mut editor = FieldEditor::new();
    editor.sync(app);

    app.log(LogLevel::Info, "Terminal UI started");

    while app.state != AppState::Quit {
        terminal.draw(|f| ui(f, app, &editor))?;

        if event::poll(Duration::from_millis(250))? {
            // Windows reports releases too
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    process_key_event(app, &mut editor, key, &mut terminal)?;
                }
            }
        }
    }

    app.log(LogLevel::Info, "Terminal UI closed");
    Ok(())
}

fn process_key_event(
    app: &mut App,
    editor: &mut FieldEditor,
    key: KeyEvent,
    terminal: &mut Term,
) -> Result<()> {
    match key.code {
        KeyCode::Esc => {
            if app.state == AppState::Logs {
                app.toggle_logs();
            } else {
                app.quit();
            }
            return Ok(());
        }
        KeyCode::F(n @ 1..=3) => {
            app.state = AppState::Forms;
            app.switch_tab(Tab::ALL[usize::from(n) - 1]);
            editor.sync(app);
            return Ok(());
        }
        KeyCode::F(4) => {
            app.toggle_logs();
            return Ok(());
        }
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.quit();
            return Ok(());
        }
        _ => {}
    }

    if app.state == AppState::Logs {
        handle_log_keys(app, key.code);
        return Ok(());
    }

    match key.code {
        KeyCode::Tab => {
            app.cycle_focus(true);
            editor.sync(app);
            return Ok(());
        }
        KeyCode::BackTab => {
            app.cycle_focus(false);
            editor.sync(app);
            return Ok(());
        }
        _ => {}
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        if let KeyCode::Char(c) = key.code {
            if handle_ctrl_key(app, c, terminal, editor)? {
                editor.reload(app);
                return Ok(());
            }
        }
    }

    handle_focus_key(app, editor, key);
    Ok(())
}

/// Tab-specific Ctrl shortcuts; returns false for keys left to the editor
fn handle_ctrl_key(
    app: &mut App,
    c: char,
    terminal: &mut Term,
    editor: &FieldEditor,
) -> Result<bool> {
    match (app.tab, c) {
        (Tab::Canvas, 'n') => app.new_canvas(),
        (Tab::Canvas, 's') => {
            let _ = app.save_canvas();
        }
        (Tab::Canvas, 'd') => {
            app.request_delete_canvas();
        }
        (Tab::Canvas, 'e') => {
            let _ = app.export_canvas();
        }
        (Tab::Agents, 'n') => app.new_agent(),
        (Tab::Agents, 's') => {
            let _ = app.save_agent();
        }
        (Tab::Agents, 'd') => {
            app.delete_agent();
        }
        (Tab::Agents, 'u') => app.use_agent_in_run(),
        (Tab::Run, 'r') => {
            if app.run.selected_agent.is_some() {
                app.notify(NoticeKind::Info, "Running agent...");
                terminal.draw(|f| ui(f, app, editor))?;
            }
            app.run_selected_agent();
        }
        (Tab::Run, 't') => app.toggle_include_context(),
        (Tab::Run, 'o') => {
            let _ = app.save_last_output();
        }
        (Tab::Run, 'k') => app.clear_history(),
        _ => return Ok(false),
    }
    Ok(true)
}

fn handle_focus_key(app: &mut App, editor: &mut FieldEditor, key: KeyEvent) {
    match app.focus {
        Focus::CanvasList | Focus::AgentList | Focus::RunAgentList => match key.code {
            KeyCode::Up => app.move_selection(false),
            KeyCode::Down => app.move_selection(true),
            KeyCode::Enter => {
                match app.focus {
                    Focus::CanvasList => app.load_selected_canvas(),
                    Focus::AgentList => app.load_selected_agent(),
                    _ => app.select_run_agent(),
                }
                editor.reload(app);
            }
            _ => {}
        },
        Focus::BackendPicker => match key.code {
            KeyCode::Left | KeyCode::Up => app.cycle_backend(false),
            KeyCode::Right | KeyCode::Down => app.cycle_backend(true),
            _ => {}
        },
        Focus::ContextToggle => {
            if matches!(key.code, KeyCode::Char(' ') | KeyCode::Enter) {
                app.toggle_include_context();
            }
        }
        Focus::Output => match key.code {
            KeyCode::Up => app.output_scroll.scroll_up(1),
            KeyCode::Down => app.output_scroll.scroll_down(1),
            KeyCode::PageUp => app.output_scroll.scroll_up(PAGE),
            KeyCode::PageDown => app.output_scroll.scroll_down(PAGE),
            KeyCode::Home => app.output_scroll.scroll_to_top(),
            KeyCode::End => app.output_scroll.scroll_to_bottom(),
            _ => {}
        },
        Focus::Text(_) => {
            editor.input(app, key);
        }
    }
}

fn handle_log_keys(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Up => app.log_scroll.scroll_up(1),
        KeyCode::Down => app.log_scroll.scroll_down(1),
        KeyCode::PageUp => app.log_scroll.scroll_up(PAGE),
        KeyCode::PageDown => app.log_scroll.scroll_down(PAGE),
        KeyCode::Home => app.log_scroll.scroll_to_top(),
        KeyCode::End => app.log_scroll.scroll_to_bottom(),
        _ => {}
    }
}
