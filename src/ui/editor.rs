use crate::app::state::{App, TextField};
use crate::ui::styles::AppStyles;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::widgets::{Block, Borders};
use tui_textarea::{CursorMove, TextArea};

/// Live editor for whichever text field has focus.
///
/// Every keystroke is written straight back into the view-model, so the
/// `App` forms are always current and unfocused fields render from them.
pub struct FieldEditor {
    field: Option<TextField>,
    textarea: TextArea<'static>,
}

impl FieldEditor {
    pub fn new() -> Self {
        Self {
            field: None,
            textarea: TextArea::default(),
        }
    }

    pub fn field(&self) -> Option<TextField> {
        self.field
    }

    pub fn textarea(&self) -> &TextArea<'static> {
        &self.textarea
    }

    /// Follow focus changes; a no-op while the same field stays focused
    pub fn sync(&mut self, app: &App) {
        let target = app.focus.text_field();
        if target != self.field {
            self.load(app, target);
        }
    }

    /// Rebuild from the view-model after an action rewrote the forms
    pub fn reload(&mut self, app: &App) {
        self.load(app, app.focus.text_field());
    }

    fn load(&mut self, app: &App, field: Option<TextField>) {
        self.field = field;
        self.textarea = match field {
            Some(field) => build_textarea(field, app.text(field)),
            None => TextArea::default(),
        };
    }

    /// Feed a key to the focused field; returns false when no field is focused
    pub fn input(&mut self, app: &mut App, key: KeyEvent) -> bool {
        let Some(field) = self.field else {
            return false;
        };
        if field.is_single_line() && key.code == KeyCode::Enter {
            return true;
        }
        if self.textarea.input(key) {
            app.set_text(field, self.textarea.lines().join("\n"));
        }
        true
    }
}

fn build_textarea(field: TextField, text: &str) -> TextArea<'static> {
    let lines: Vec<String> = text.split('\n').map(String::from).collect();
    let mut textarea = TextArea::new(lines);
    textarea.set_placeholder_text(field.placeholder());
    textarea.set_placeholder_style(AppStyles::hint());
    textarea.set_block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(AppStyles::focused_border())
            .title(format!("{} (editing)", field.label())),
    );
    textarea.move_cursor(CursorMove::Bottom);
    textarea.move_cursor(CursorMove::End);
    textarea
}
