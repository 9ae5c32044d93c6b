use crate::apis::BackendKind;
use crate::app::agent::AgentManager;
use crate::app::runner::RunManager;
use crate::app::state::{App, AppState, Focus, Tab, TextField};
use crate::app::utils::is_error_output;
use crate::models::RecordSummary;
use crate::ui::components::*;
use crate::ui::editor::FieldEditor;
use crate::ui::styles::AppStyles;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Paragraph, Tabs, Wrap},
    Frame,
};

/// Main UI rendering function: tab header, body, notice and key hints
pub fn ui(f: &mut Frame, app: &mut App, editor: &FieldEditor) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tabs
            Constraint::Min(8),    // Body
            Constraint::Length(1), // Notice
            Constraint::Length(1), // Key hints
        ])
        .split(f.area());

    draw_tabs(f, app, chunks[0]);
    match app.state {
        AppState::Logs => draw_logs(f, app, chunks[1]),
        _ => match app.tab {
            Tab::Canvas => draw_canvas_tab(f, app, editor, chunks[1]),
            Tab::Agents => draw_agents_tab(f, app, editor, chunks[1]),
            Tab::Run => draw_run_tab(f, app, editor, chunks[1]),
        },
    }
    draw_notice(f, app, chunks[2]);
    draw_hints(f, app, chunks[3]);
}

fn draw_tabs(f: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<String> = Tab::ALL
        .iter()
        .enumerate()
        .map(|(i, tab)| format!("F{} {}", i + 1, tab.title()))
        .collect();
    let selected = Tab::ALL.iter().position(|t| *t == app.tab).unwrap_or(0);
    let title = match app.state {
        AppState::Logs => "Strategy Planner · logs (F4 to close)",
        _ => "Strategy Planner",
    };
    let tabs = Tabs::new(titles)
        .select(selected)
        .highlight_style(AppStyles::highlight())
        .block(bordered(title, false).title_style(AppStyles::title()));
    f.render_widget(tabs, area);
}

fn draw_canvas_tab(f: &mut Frame, app: &App, editor: &FieldEditor, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(25), Constraint::Percentage(75)])
        .split(area);

    let records: Vec<&RecordSummary> = app.canvases.iter().collect();
    render_record_list(
        f,
        columns[0],
        "Saved canvases (Enter to load)",
        &records,
        app.canvas_selection,
        is_focused(app, Focus::CanvasList),
        "No canvases yet. Fill in the form and press Ctrl-S.",
    );

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(6)])
        .split(columns[1]);

    let name_title = match (&app.canvas.id, &app.canvas.last_loaded_name) {
        (Some(id), Some(loaded)) => format!("Name (#{} loaded as '{}')", id, loaded),
        _ => "Name (unsaved)".to_string(),
    };
    render_text_field(f, right[0], app, editor, TextField::CanvasName, Some(name_title));

    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(right[1]);

    draw_canvas_column(
        f,
        app,
        editor,
        halves[0],
        "Customer Segment",
        [TextField::CustomerJobs, TextField::Pains, TextField::Gains],
    );
    draw_canvas_column(
        f,
        app,
        editor,
        halves[1],
        "Value Proposition",
        [
            TextField::ProductsServices,
            TextField::GainCreators,
            TextField::PainRelievers,
        ],
    );
}

fn draw_canvas_column(
    f: &mut Frame,
    app: &App,
    editor: &FieldEditor,
    area: Rect,
    heading: &str,
    fields: [TextField; 3],
) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

    f.render_widget(
        Paragraph::new(Span::styled(heading.to_string(), AppStyles::section())),
        rows[0],
    );
    for (row, field) in rows[1..].iter().zip(fields) {
        render_text_field(f, *row, app, editor, field, None);
    }
}

fn draw_agents_tab(f: &mut Frame, app: &App, editor: &FieldEditor, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
        .split(area);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(3)])
        .split(columns[0]);
    render_text_field(f, left[0], app, editor, TextField::AgentSearch, None);

    let filtered = app.filtered_agents();
    let list_title = format!("Agents ({} of {})", filtered.len(), app.agents.len());
    render_record_list(
        f,
        left[1],
        &list_title,
        &filtered,
        app.agent_selection,
        is_focused(app, Focus::AgentList),
        "No matching agents.",
    );

    let form = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Name
            Constraint::Length(3), // Function
            Constraint::Min(4),    // Prompt
            Constraint::Length(3), // Backend
            Constraint::Length(3), // Model
        ])
        .split(columns[1]);

    let name_title = match app.agent.id {
        Some(id) => format!("Name (#{})", id),
        None => "Name (unsaved)".to_string(),
    };
    render_text_field(f, form[0], app, editor, TextField::AgentName, Some(name_title));
    render_text_field(f, form[1], app, editor, TextField::AgentFunction, None);
    render_text_field(f, form[2], app, editor, TextField::AgentPrompt, None);
    render_backend_picker(
        f,
        form[3],
        app.agent.backend,
        is_focused(app, Focus::BackendPicker),
    );

    let model_title = model_title(app.agent.backend);
    render_text_field(f, form[4], app, editor, TextField::AgentModel, Some(model_title));
}

fn draw_run_tab(f: &mut Frame, app: &mut App, editor: &FieldEditor, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
        .split(area);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(columns[0]);

    let list_title = match &app.run.selected_agent {
        Some(name) => format!("Agent: {} (Enter to pick)", name),
        None => "Agent (Enter to pick)".to_string(),
    };
    let records: Vec<&RecordSummary> = app.agents.iter().collect();
    render_record_list(
        f,
        left[0],
        &list_title,
        &records,
        app.run_selection,
        is_focused(app, Focus::RunAgentList),
        "No agents yet. Create one in the Agents tab.",
    );
    draw_history(f, app, left[1]);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(6),
            Constraint::Min(4),
        ])
        .split(columns[1]);

    render_toggle(
        f,
        right[0],
        "Include current canvas as context",
        app.run.include_context,
        is_focused(app, Focus::ContextToggle),
    );
    render_text_field(f, right[1], app, editor, TextField::TaskInput, None);
    draw_output(f, app, right[2]);
}

fn draw_history(f: &mut Frame, app: &App, area: Rect) {
    let history = app.recent_history();
    let lines: Vec<Line> = if history.is_empty() {
        vec![Line::from(Span::styled("No runs yet.", AppStyles::hint()))]
    } else {
        history
            .iter()
            .rev()
            .map(|record| {
                let style = if is_error_output(&record.output) {
                    AppStyles::error()
                } else {
                    AppStyles::hint()
                };
                Line::from(vec![
                    Span::raw(format!("{} ", record.ts)),
                    Span::styled(record.agent.clone(), AppStyles::section()),
                    Span::styled(format!(" · {}", first_line(&record.input)), style),
                ])
            })
            .collect()
    };

    let title = format!("History ({})", app.run.history.len());
    f.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(bordered(title, false)),
        area,
    );
}

fn draw_output(f: &mut Frame, app: &mut App, area: Rect) {
    let focused = is_focused(app, Focus::Output);
    let (text, style) = match &app.run.last_output {
        Some(output) if is_error_output(output) => (output.clone(), AppStyles::error()),
        Some(output) => (output.clone(), ratatui::style::Style::default()),
        None => ("Run an agent to see its output here.".to_string(), AppStyles::hint()),
    };

    let inner_width = area.width.saturating_sub(2) as usize;
    let inner_height = area.height.saturating_sub(2) as usize;
    app.output_scroll
        .update_dimensions(wrapped_height(&text, inner_width), inner_height);

    let title = if focused {
        "Output (PgUp/PgDn to scroll)"
    } else {
        "Output"
    };
    let paragraph = Paragraph::new(text)
        .style(style)
        .wrap(Wrap { trim: false })
        .scroll((app.output_scroll.position as u16, 0))
        .block(bordered(title, focused));
    f.render_widget(paragraph, area);
}

fn draw_logs(f: &mut Frame, app: &mut App, area: Rect) {
    let logs = app.recent_logs();
    let inner_width = area.width.saturating_sub(2) as usize;
    let inner_height = area.height.saturating_sub(2) as usize;
    let content_height: usize = logs.iter().map(|l| wrapped_height(l, inner_width)).sum();
    app.log_scroll.update_dimensions(content_height, inner_height);

    let title = match app.log_file_path() {
        Some(path) => format!("Logs ({})", path.display()),
        None => "Logs (memory only)".to_string(),
    };
    let lines: Vec<Line> = logs.into_iter().map(Line::from).collect();
    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((app.log_scroll.position as u16, 0))
        .block(bordered(title, true));
    f.render_widget(paragraph, area);
}

fn draw_notice(f: &mut Frame, app: &App, area: Rect) {
    let line = match &app.notice {
        Some(notice) => Line::from(Span::styled(
            format!(" {}", notice.text),
            AppStyles::notice(notice.kind),
        )),
        None => Line::from(""),
    };
    f.render_widget(Paragraph::new(line), area);
}

fn draw_hints(f: &mut Frame, app: &App, area: Rect) {
    let hints = match (&app.state, app.tab) {
        (AppState::Logs, _) => "↑/↓ PgUp/PgDn scroll · F4 back · Esc quit",
        (_, Tab::Canvas) => {
            "Tab focus · Enter load · ^N new · ^S save · ^D delete · ^E export · F4 logs · Esc quit"
        }
        (_, Tab::Agents) => {
            "Tab focus · Enter load · ^N new · ^S save · ^D delete · ^U use in Run · ←/→ backend · Esc quit"
        }
        (_, Tab::Run) => {
            "Tab focus · Enter pick · ^R run · ^T context · ^O save output · ^K clear history · Esc quit"
        }
    };
    f.render_widget(
        Paragraph::new(format!(" {}", hints)).style(AppStyles::status_bar()),
        area,
    );
}

fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or("")
}

/// Rows the text occupies once wrapped to `width` columns
fn wrapped_height(text: &str, width: usize) -> usize {
    if width == 0 {
        return 0;
    }
    text.split('\n')
        .map(|line| line.chars().count().max(1).div_ceil(width))
        .sum()
}

fn model_title(backend: BackendKind) -> String {
    match backend.default_model() {
        Some(model) => format!("Model (blank uses {})", model),
        None => "Model (unused by echo)".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrapped_height() {
        assert_eq!(wrapped_height("", 10), 1);
        assert_eq!(wrapped_height("abc\ndef", 10), 2);
        assert_eq!(wrapped_height(&"x".repeat(25), 10), 3);
        assert_eq!(wrapped_height("abc", 0), 0);
    }

    #[test]
    fn test_model_title_for_every_backend() {
        for kind in BackendKind::ALL {
            let title = model_title(kind);
            match kind.default_model() {
                Some(model) => assert!(title.ends_with(&format!("blank uses {})", model))),
                None => assert_eq!(title, "Model (unused by echo)"),
            }
        }
        assert_eq!(model_title(BackendKind::Ollama), "Model (blank uses llama3.1)");
    }

    #[test]
    fn test_first_line() {
        assert_eq!(first_line("one\ntwo"), "one");
        assert_eq!(first_line(""), "");
    }
}
