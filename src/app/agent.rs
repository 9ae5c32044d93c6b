use crate::app::logger::LogLevel;
use crate::app::state::{App, NoticeKind, Tab};
use crate::models::{RecordSummary, SavedRecord};
use crate::store::StoreError;

/// Agent form actions
pub trait AgentManager {
    fn new_agent(&mut self);
    fn load_agent(&mut self, id: i64);
    fn load_selected_agent(&mut self);
    fn save_agent(&mut self) -> Result<SavedRecord, StoreError>;
    fn delete_agent(&mut self) -> bool;
    /// Agents whose name contains the search text, case-insensitively
    fn filtered_agents(&self) -> Vec<&RecordSummary>;
    fn cycle_backend(&mut self, forward: bool);
    /// Preselect the agent in the form on the Run tab
    fn use_agent_in_run(&mut self);
}

impl AgentManager for App {
    fn new_agent(&mut self) {
        self.agent.clear();
        self.notify(NoticeKind::Info, "Started a new agent.");
    }

    fn load_agent(&mut self, id: i64) {
        match self.store.get_agent_by_id(id) {
            Ok(Some(agent)) => {
                self.agent.load(&agent);
                self.log(
                    LogLevel::Debug,
                    &format!("Loaded agent {} '{}'", agent.id, agent.name),
                );
                self.notify(NoticeKind::Info, format!("Loaded agent '{}'.", agent.name));
            }
            Ok(None) => {}
            Err(e) => {
                self.log(LogLevel::Error, &format!("Failed to load agent {}: {}", id, e));
                self.notify(NoticeKind::Error, format!("Load failed: {}", e));
            }
        }
    }

    fn load_selected_agent(&mut self) {
        let id = self
            .filtered_agents()
            .get(self.agent_selection)
            .map(|a| a.id);
        if let Some(id) = id {
            self.load_agent(id);
        }
    }

    fn save_agent(&mut self) -> Result<SavedRecord, StoreError> {
        let draft = self.agent.to_draft();
        let previous_name = draft
            .id
            .and_then(|id| self.agents.iter().find(|a| a.id == id))
            .map(|a| a.name.clone());
        match self.store.save_agent(&draft) {
            Ok(saved) => {
                self.log(
                    LogLevel::Info,
                    &format!(
                        "Saved agent {} '{}' ({})",
                        saved.id, saved.name, draft.backend
                    ),
                );
                self.agent.id = Some(saved.id);
                self.agent.name = saved.name.clone();
                if previous_name.is_some() && self.run.selected_agent == previous_name {
                    self.run.selected_agent = Some(saved.name.clone());
                }
                self.refresh_lists();
                self.notify(NoticeKind::Success, "Agent saved.");
                Ok(saved)
            }
            Err(e) => {
                self.log(LogLevel::Error, &format!("Agent save failed: {}", e));
                let hint = if e.is_duplicate_name() {
                    " Choose a different name."
                } else {
                    ""
                };
                self.notify(NoticeKind::Error, format!("Save failed: {}.{}", e, hint));
                Err(e)
            }
        }
    }

    fn delete_agent(&mut self) -> bool {
        let Some(id) = self.agent.id else {
            self.notify(NoticeKind::Warning, "Nothing to delete: save the agent first.");
            return false;
        };

        match self.store.delete_agent(id) {
            Ok(()) => {
                self.log(LogLevel::Info, &format!("Deleted agent {}", id));
                if self.run.selected_agent.as_deref() == Some(self.agent.name.as_str()) {
                    self.run.selected_agent = None;
                }
                self.agent.clear();
                self.refresh_lists();
                self.notify(NoticeKind::Success, "Agent deleted.");
                true
            }
            Err(e) => {
                self.log(LogLevel::Error, &format!("Agent delete failed: {}", e));
                self.notify(NoticeKind::Error, format!("Delete failed: {}", e));
                false
            }
        }
    }

    fn filtered_agents(&self) -> Vec<&RecordSummary> {
        let query = self.agent_search.trim().to_lowercase();
        self.agents
            .iter()
            .filter(|a| query.is_empty() || a.name.to_lowercase().contains(&query))
            .collect()
    }

    fn cycle_backend(&mut self, forward: bool) {
        self.agent.stored_backend = None;
        self.agent.backend = if forward {
            self.agent.backend.next()
        } else {
            self.agent.backend.previous()
        };
    }

    fn use_agent_in_run(&mut self) {
        let name = self.agent.name.trim().to_string();
        if name.is_empty() {
            self.notify(NoticeKind::Warning, "Load or name an agent first.");
            return;
        }
        if let Some(idx) = self.agents.iter().position(|a| a.name == name) {
            self.run_selection = idx;
        }
        self.run.selected_agent = Some(name);
        self.switch_tab(Tab::Run);
        self.notify(NoticeKind::Info, "Agent pre-selected in Run tab.");
    }
}
