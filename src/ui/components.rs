use crate::apis::BackendKind;
use crate::app::state::{App, Focus, TextField};
use crate::models::RecordSummary;
use crate::ui::editor::FieldEditor;
use crate::ui::styles::AppStyles;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

pub fn bordered(title: impl Into<String>, focused: bool) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(if focused {
            AppStyles::focused_border()
        } else {
            AppStyles::unfocused_border()
        })
        .title(title.into())
}

/// Editor widget when the field has focus, plain wrapped text otherwise
pub fn render_text_field(
    f: &mut Frame,
    area: Rect,
    app: &App,
    editor: &FieldEditor,
    field: TextField,
    title: Option<String>,
) {
    if editor.field() == Some(field) {
        f.render_widget(editor.textarea(), area);
        return;
    }

    let text = app.text(field);
    let body = if text.is_empty() {
        Paragraph::new(Span::styled(field.placeholder(), AppStyles::hint()))
    } else {
        Paragraph::new(text.to_string())
    };
    let title = title.unwrap_or_else(|| field.label().to_string());
    f.render_widget(
        body.wrap(Wrap { trim: false }).block(bordered(title, false)),
        area,
    );
}

/// Selectable list of saved records
pub fn render_record_list(
    f: &mut Frame,
    area: Rect,
    title: &str,
    records: &[&RecordSummary],
    selected: usize,
    focused: bool,
    empty_hint: &str,
) {
    let block = bordered(title, focused);
    if records.is_empty() {
        let hint = Paragraph::new(Span::styled(empty_hint.to_string(), AppStyles::hint()))
            .wrap(Wrap { trim: true })
            .block(block);
        f.render_widget(hint, area);
        return;
    }

    let items: Vec<ListItem> = records
        .iter()
        .map(|r| ListItem::new(r.name.clone()))
        .collect();
    let list = List::new(items)
        .block(block)
        .highlight_style(AppStyles::highlight())
        .highlight_symbol("> ");

    let mut state = ListState::default().with_selected(focused.then_some(selected));
    f.render_stateful_widget(list, area, &mut state);
}

/// Row of backend names with the current one highlighted
pub fn render_backend_picker(f: &mut Frame, area: Rect, current: BackendKind, focused: bool) {
    let mut spans = Vec::new();
    for kind in BackendKind::ALL {
        let style = if kind == current {
            AppStyles::highlight()
        } else {
            AppStyles::hint()
        };
        spans.push(Span::styled(format!(" {} ", kind.as_str()), style));
        spans.push(Span::raw(" "));
    }
    let title = if focused {
        "Backend (←/→ to change)"
    } else {
        "Backend"
    };
    f.render_widget(
        Paragraph::new(Line::from(spans)).block(bordered(title, focused)),
        area,
    );
}

/// Checkbox-style toggle
pub fn render_toggle(f: &mut Frame, area: Rect, label: &str, checked: bool, focused: bool) {
    let mark = if checked { "[x]" } else { "[ ]" };
    let hint = if focused { "  (Space to toggle)" } else { "" };
    let line = Line::from(vec![
        Span::raw(format!("{} {}", mark, label)),
        Span::styled(hint, AppStyles::hint()),
    ]);
    f.render_widget(Paragraph::new(line).block(bordered("Options", focused)), area);
}

pub fn is_focused(app: &App, focus: Focus) -> bool {
    app.focus == focus
}
