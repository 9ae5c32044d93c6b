//! JSON and Markdown renderings of a saved canvas

use super::{Store, StoreResult};
use crate::models::Canvas;

const NOT_FOUND_JSON: &str = "{}";
const NOT_FOUND_MARKDOWN: &str = "# Value Proposition Canvas\n\n(Not found)";

impl Store {
    /// Full record as pretty JSON, or `{}` when the id is unknown
    pub fn export_json(&self, id: i64) -> StoreResult<String> {
        Ok(self
            .get_canvas_by_id(id)?
            .map(|canvas| render_json(&canvas))
            .unwrap_or_else(|| NOT_FOUND_JSON.to_string()))
    }

    pub fn export_markdown(&self, id: i64) -> StoreResult<String> {
        Ok(self
            .get_canvas_by_id(id)?
            .map(|canvas| render_markdown(&canvas))
            .unwrap_or_else(|| NOT_FOUND_MARKDOWN.to_string()))
    }
}

pub fn render_json(canvas: &Canvas) -> String {
    // Canvas holds only strings and an integer
    serde_json::to_string_pretty(canvas).unwrap_or_else(|_| NOT_FOUND_JSON.to_string())
}

pub fn render_markdown(canvas: &Canvas) -> String {
    let name = if canvas.name.is_empty() {
        "Untitled"
    } else {
        canvas.name.as_str()
    };

    let lines = [
        format!("# Value Proposition Canvas — {}", name),
        String::new(),
        format!("Created: {}", canvas.created_at),
        format!("Last Updated: {}", canvas.updated_at),
        String::new(),
        "# Customer Segment".to_string(),
        section("Customer Jobs", &canvas.customer_jobs),
        section("Pains", &canvas.pains),
        section("Gains", &canvas.gains),
        "# Value Proposition".to_string(),
        section("Products & Services", &canvas.products_services),
        section("Gain Creators", &canvas.gain_creators),
        section("Pain Relievers", &canvas.pain_relievers),
    ];
    lines.join("\n")
}

fn section(title: &str, body: &str) -> String {
    let body = body.trim();
    let body = if body.is_empty() { "-" } else { body };
    format!("## {}\n\n{}\n", title, body)
}
