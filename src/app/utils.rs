use regex::Regex;
use std::sync::OnceLock;

/// Scroll position for a read-only text pane
#[derive(Debug, Clone, Default)]
pub struct ScrollState {
    /// Current scroll position (0 = top of content)
    pub position: usize,
    /// Flag indicating if content should auto-scroll to bottom on new content
    pub follow_bottom: bool,
    /// Total content size (in lines) - updated by each render cycle
    pub content_size: usize,
    /// Visible area size (in lines) - updated by each render cycle
    pub viewport_size: usize,
}

impl ScrollState {
    pub fn new() -> Self {
        Self {
            position: 0,
            follow_bottom: true,
            content_size: 0,
            viewport_size: 0,
        }
    }

    /// Update the content and viewport sizes
    pub fn update_dimensions(&mut self, content_size: usize, viewport_size: usize) {
        self.content_size = content_size;
        self.viewport_size = viewport_size;

        if self.follow_bottom {
            self.scroll_to_bottom();
        } else {
            self.clamp_position();
        }
    }

    pub fn max_scroll(&self) -> usize {
        self.content_size.saturating_sub(self.viewport_size)
    }

    pub fn clamp_position(&mut self) {
        self.position = self.position.min(self.max_scroll());
    }

    pub fn scroll_down(&mut self, amount: usize) {
        self.position = (self.position + amount).min(self.max_scroll());
        self.follow_bottom = self.position >= self.max_scroll();
    }

    pub fn scroll_up(&mut self, amount: usize) {
        self.position = self.position.saturating_sub(amount);
        self.follow_bottom = false;
    }

    pub fn scroll_to_top(&mut self) {
        self.position = 0;
        self.follow_bottom = false;
    }

    pub fn scroll_to_bottom(&mut self) {
        self.position = self.max_scroll();
        self.follow_bottom = true;
    }
}

fn unsafe_filename_chars() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^A-Za-z0-9._-]+").expect("valid filename regex"))
}

/// Filesystem-safe base name: runs of unsafe characters become `_`, max 60 chars
pub fn sanitize_filename(name: &str) -> String {
    let name = name.trim();
    let name = if name.is_empty() { "untitled" } else { name };
    unsafe_filename_chars()
        .replace_all(name, "_")
        .chars()
        .take(60)
        .collect()
}

/// True for the bracketed strings the dispatcher returns instead of a completion
pub fn is_error_output(output: &str) -> bool {
    output.starts_with("[Error]")
        || (output.starts_with('[')
            && output
                .split_once(']')
                .is_some_and(|(head, _)| head.ends_with(" Error")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("SMB Field Technicians"), "SMB_Field_Technicians");
        assert_eq!(sanitize_filename("  "), "untitled");
        assert_eq!(sanitize_filename("a / b : c"), "a_b_c");
        assert_eq!(sanitize_filename("v1.2-final_draft"), "v1.2-final_draft");
        assert_eq!(sanitize_filename(&"x".repeat(80)).len(), 60);
        assert_eq!(sanitize_filename("Café plan"), "Caf_plan");
    }

    #[test]
    fn test_is_error_output() {
        assert!(is_error_output("[Error] OPENAI_API_KEY not set."));
        assert!(is_error_output("[OpenAI Error] 500: server error"));
        assert!(!is_error_output("[Echo Backend]\nhi"));
        assert!(!is_error_output("Here are five questions"));
    }

    #[test]
    fn test_scroll_state_follows_bottom() {
        let mut scroll = ScrollState::new();
        scroll.update_dimensions(50, 10);
        assert_eq!(scroll.position, 40);

        scroll.scroll_up(5);
        assert_eq!(scroll.position, 35);
        assert!(!scroll.follow_bottom);

        scroll.update_dimensions(60, 10);
        assert_eq!(scroll.position, 35);

        scroll.scroll_down(100);
        assert_eq!(scroll.position, 50);
        assert!(scroll.follow_bottom);
    }
}
