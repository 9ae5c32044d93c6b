use crate::app::state::NoticeKind;
use ratatui::style::{Color, Modifier, Style};

/// UI styles used throughout the application
pub struct AppStyles;

impl AppStyles {
    /// Style for title text
    pub fn title() -> Style {
        Style::default()
            .fg(Color::LightCyan)
            .add_modifier(Modifier::BOLD)
    }

    /// Selected tab and highlighted list row
    pub fn highlight() -> Style {
        Style::default()
            .fg(Color::Black)
            .bg(Color::LightBlue)
            .add_modifier(Modifier::BOLD)
    }

    /// Border of the widget that has focus
    pub fn focused_border() -> Style {
        Style::default().fg(Color::LightCyan)
    }

    pub fn unfocused_border() -> Style {
        Style::default().fg(Color::DarkGray)
    }

    /// Section headings such as "Customer Segment"
    pub fn section() -> Style {
        Style::default()
            .fg(Color::LightYellow)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for hints and placeholder text
    pub fn hint() -> Style {
        Style::default().fg(Color::DarkGray)
    }

    /// Style for status bar
    pub fn status_bar() -> Style {
        Style::default().fg(Color::Black).bg(Color::LightBlue)
    }

    /// Agent output that is a bracketed error string
    pub fn error() -> Style {
        Style::default().fg(Color::Red)
    }

    pub fn notice(kind: NoticeKind) -> Style {
        match kind {
            NoticeKind::Info => Style::default().fg(Color::Cyan),
            NoticeKind::Success => Style::default().fg(Color::Green),
            NoticeKind::Warning => Style::default().fg(Color::Yellow),
            NoticeKind::Error => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        }
    }
}
