use crate::app::logger::LogLevel;
use crate::app::state::{App, NoticeKind, RunRecord};
use crate::app::utils::is_error_output;
use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful strategy assistant.";
pub const HISTORY_DISPLAY_LIMIT: usize = 20;
const NO_OUTPUT: &str = "(no output)";

/// `Role: ...\n\nInstructions: ...`, or the default prompt when both parts are blank
pub fn build_system_prompt(function: &str, prompt: &str) -> String {
    let function = function.trim();
    if function.is_empty() && prompt.trim().is_empty() {
        return DEFAULT_SYSTEM_PROMPT.to_string();
    }
    format!("Role: {}\n\nInstructions: {}", function, prompt)
        .trim()
        .to_string()
}

/// Run tab actions
pub trait RunManager {
    /// Pick the highlighted agent in the Run tab's list
    fn select_run_agent(&mut self);
    fn toggle_include_context(&mut self);
    /// Dispatch the task to the selected agent; `None` when validation stopped it
    fn run_selected_agent(&mut self) -> Option<String>;
    /// The last `HISTORY_DISPLAY_LIMIT` runs, oldest first
    fn recent_history(&self) -> &[RunRecord];
    fn clear_history(&mut self);
    /// Write the last output to `agent_output_<timestamp>.md`
    fn save_last_output(&mut self) -> Result<PathBuf>;
}

impl RunManager for App {
    fn select_run_agent(&mut self) {
        if let Some(agent) = self.agents.get(self.run_selection) {
            let name = agent.name.clone();
            self.notify(NoticeKind::Info, format!("Selected agent '{}'.", name));
            self.run.selected_agent = Some(name);
        }
    }

    fn toggle_include_context(&mut self) {
        self.run.include_context = !self.run.include_context;
    }

    fn run_selected_agent(&mut self) -> Option<String> {
        let summary = self
            .run
            .selected_agent
            .as_ref()
            .and_then(|name| self.agents.iter().find(|a| &a.name == name))
            .cloned();
        let Some(summary) = summary else {
            self.notify(NoticeKind::Warning, "Select an agent first.");
            return None;
        };
        if self.run.task_input.trim().is_empty() {
            self.notify(NoticeKind::Warning, "Enter a task input.");
            return None;
        }

        let agent = match self.store.get_agent_by_id(summary.id) {
            Ok(Some(agent)) => agent,
            Ok(None) => {
                self.notify(NoticeKind::Warning, "Select an agent first.");
                self.refresh_lists();
                return None;
            }
            Err(e) => {
                self.log(LogLevel::Error, &format!("Failed to load agent: {}", e));
                self.notify(NoticeKind::Error, format!("Run failed: {}", e));
                return None;
            }
        };

        // An edited but unsaved prompt in the Agents tab wins for the same agent
        let prompt = if !self.agent.prompt.is_empty() && self.agent.name == agent.name {
            self.agent.prompt.clone()
        } else {
            agent.prompt.clone()
        };
        let system_prompt = build_system_prompt(&agent.function, &prompt);
        let context = self.run.include_context.then(|| self.canvas.context());

        self.log(
            LogLevel::Info,
            &format!(
                "Running agent '{}' on backend '{}' (model '{}', context: {})",
                agent.name, agent.backend, agent.model, self.run.include_context
            ),
        );

        let output = self.dispatcher.run(
            &agent.backend,
            &agent.model,
            &system_prompt,
            &self.run.task_input,
            context.as_ref(),
        );
        let output = if output.is_empty() {
            NO_OUTPUT.to_string()
        } else {
            output
        };

        if is_error_output(&output) {
            self.log(
                LogLevel::Warning,
                &format!("Agent '{}' returned an error: {}", agent.name, output),
            );
            self.notify(NoticeKind::Error, "Agent returned an error. See output.");
        } else {
            self.log(
                LogLevel::Info,
                &format!("Agent '{}' returned {} chars", agent.name, output.len()),
            );
            self.notify(NoticeKind::Success, format!("'{}' finished.", agent.name));
        }

        self.run.history.push(RunRecord {
            ts: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            agent: agent.name.clone(),
            input: self.run.task_input.clone(),
            output: output.clone(),
        });
        self.run.last_output = Some(output.clone());
        self.output_scroll.scroll_to_top();
        Some(output)
    }

    fn recent_history(&self) -> &[RunRecord] {
        let start = self
            .run
            .history
            .len()
            .saturating_sub(HISTORY_DISPLAY_LIMIT);
        &self.run.history[start..]
    }

    fn clear_history(&mut self) {
        self.run.history.clear();
        self.run.last_output = None;
        self.notify(NoticeKind::Info, "History cleared.");
    }

    fn save_last_output(&mut self) -> Result<PathBuf> {
        let Some(output) = self.run.last_output.clone() else {
            self.notify(NoticeKind::Warning, "No output to save yet.");
            anyhow::bail!("No output to save yet.");
        };

        let file_name = format!(
            "agent_output_{}.md",
            chrono::Local::now().format("%Y%m%d_%H%M%S")
        );
        let path = self.export_dir.join(file_name);
        let written = fs::create_dir_all(&self.export_dir)
            .and_then(|_| fs::write(&path, output))
            .with_context(|| format!("Failed to write {}", path.display()));

        match written {
            Ok(()) => {
                self.log(LogLevel::Info, &format!("Saved output to {}", path.display()));
                self.notify(NoticeKind::Success, format!("Saved {}.", path.display()));
                Ok(path)
            }
            Err(e) => {
                self.log(LogLevel::Error, &format!("{:#}", e));
                self.notify(NoticeKind::Error, format!("{:#}", e));
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_prompt_layout() {
        assert_eq!(
            build_system_prompt(" Market researcher ", "List competitors."),
            "Role: Market researcher\n\nInstructions: List competitors."
        );
    }

    #[test]
    fn test_system_prompt_trims_trailing_whitespace() {
        assert_eq!(
            build_system_prompt("Analyst", ""),
            "Role: Analyst\n\nInstructions:"
        );
    }

    #[test]
    fn test_system_prompt_default() {
        assert_eq!(build_system_prompt("  ", "\n"), DEFAULT_SYSTEM_PROMPT);
    }
}
