pub mod agent;
pub mod canvas;
pub mod logger;
pub mod runner;
pub mod state;
pub mod utils;

use anyhow::{Context, Result};
use std::path::PathBuf;

// Re-exports
pub use agent::AgentManager;
pub use canvas::CanvasManager;
pub use logger::{format_log, format_log_with_color, FileLogger, LogLevel, Logger, MemoryLogger};
pub use runner::{build_system_prompt, RunManager, DEFAULT_SYSTEM_PROMPT, HISTORY_DISPLAY_LIMIT};
pub use state::{
    AgentForm, App, AppState, CanvasForm, Focus, Notice, NoticeKind, RunForm, RunRecord, Tab,
    TextField,
};
pub use utils::{is_error_output, sanitize_filename, ScrollState};

use crate::config::Config;
use crate::dispatcher::Dispatcher;
use crate::store::Store;

impl App {
    /// Open the configured database and wire up the dispatcher and log file
    pub fn new(config: &Config) -> Result<Self> {
        let store = Store::open(&config.db_path)
            .with_context(|| format!("Failed to open database {}", config.db_path.display()))?;
        let dispatcher = Dispatcher::from_config(config);

        let mut fallback_reason = None;
        let logger: Box<dyn Logger> = match FileLogger::new(&config.log_dir) {
            Ok(logger) => Box::new(logger),
            Err(e) => {
                fallback_reason = Some(e.to_string());
                Box::new(MemoryLogger::new())
            }
        };

        let mut app = Self::with_parts(store, dispatcher, logger, config.export_dir.clone());
        if let Some(reason) = fallback_reason {
            app.log(LogLevel::Warning, &format!("Logging to memory only: {}", reason));
        }
        app.log(
            LogLevel::Info,
            &format!(
                "Opened {} (secrets: {})",
                config.db_path.display(),
                app.dispatcher.secrets().sources().join(", ")
            ),
        );
        Ok(app)
    }

    pub fn with_parts(
        store: Store,
        dispatcher: Dispatcher,
        logger: Box<dyn Logger>,
        export_dir: PathBuf,
    ) -> Self {
        let mut app = Self {
            state: AppState::Forms,
            tab: Tab::Canvas,
            focus: Focus::CanvasList,
            canvas: CanvasForm::default(),
            agent: AgentForm::default(),
            run: RunForm::default(),
            agent_search: String::new(),
            canvases: Vec::new(),
            agents: Vec::new(),
            canvas_selection: 0,
            agent_selection: 0,
            run_selection: 0,
            notice: None,
            export_dir,
            output_scroll: ScrollState::new(),
            log_scroll: ScrollState::new(),
            store,
            dispatcher,
            logger,
        };
        app.refresh_lists();
        app
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn log(&mut self, level: LogLevel, message: &str) {
        self.logger.log(level, message);
    }

    pub fn recent_logs(&self) -> Vec<String> {
        self.logger.recent()
    }

    pub fn log_file_path(&self) -> Option<PathBuf> {
        self.logger.log_file_path()
    }

    pub fn notify(&mut self, kind: NoticeKind, text: impl Into<String>) {
        self.notice = Some(Notice {
            kind,
            text: text.into(),
        });
    }

    /// Reload both summary lists, keeping selections in range
    pub fn refresh_lists(&mut self) {
        match self.store.list_canvases() {
            Ok(canvases) => self.canvases = canvases,
            Err(e) => self.log(LogLevel::Error, &format!("Failed to list canvases: {}", e)),
        }
        match self.store.list_agents() {
            Ok(agents) => self.agents = agents,
            Err(e) => self.log(LogLevel::Error, &format!("Failed to list agents: {}", e)),
        }

        self.canvas_selection = self
            .canvas_selection
            .min(self.canvases.len().saturating_sub(1));
        self.run_selection = self.run_selection.min(self.agents.len().saturating_sub(1));
        let filtered = self.filtered_agents().len();
        self.agent_selection = self.agent_selection.min(filtered.saturating_sub(1));
    }

    pub fn text(&self, field: TextField) -> &str {
        match field {
            TextField::CanvasName => &self.canvas.name,
            TextField::CustomerJobs => &self.canvas.customer_jobs,
            TextField::Pains => &self.canvas.pains,
            TextField::Gains => &self.canvas.gains,
            TextField::ProductsServices => &self.canvas.products_services,
            TextField::GainCreators => &self.canvas.gain_creators,
            TextField::PainRelievers => &self.canvas.pain_relievers,
            TextField::AgentSearch => &self.agent_search,
            TextField::AgentName => &self.agent.name,
            TextField::AgentFunction => &self.agent.function,
            TextField::AgentPrompt => &self.agent.prompt,
            TextField::AgentModel => &self.agent.model,
            TextField::TaskInput => &self.run.task_input,
        }
    }

    pub fn set_text(&mut self, field: TextField, value: String) {
        let slot = match field {
            TextField::CanvasName => &mut self.canvas.name,
            TextField::CustomerJobs => &mut self.canvas.customer_jobs,
            TextField::Pains => &mut self.canvas.pains,
            TextField::Gains => &mut self.canvas.gains,
            TextField::ProductsServices => &mut self.canvas.products_services,
            TextField::GainCreators => &mut self.canvas.gain_creators,
            TextField::PainRelievers => &mut self.canvas.pain_relievers,
            TextField::AgentSearch => &mut self.agent_search,
            TextField::AgentName => &mut self.agent.name,
            TextField::AgentFunction => &mut self.agent.function,
            TextField::AgentPrompt => &mut self.agent.prompt,
            TextField::AgentModel => &mut self.agent.model,
            TextField::TaskInput => &mut self.run.task_input,
        };
        *slot = value;

        if field == TextField::AgentSearch {
            self.agent_selection = 0;
        }
    }

    pub fn switch_tab(&mut self, tab: Tab) {
        self.tab = tab;
        self.focus = Focus::order(tab)[0];
        self.canvas.delete_armed = false;
    }

    /// Move focus forward (`true`) or backward through the current tab
    pub fn cycle_focus(&mut self, forward: bool) {
        let order = Focus::order(self.tab);
        let idx = order.iter().position(|f| *f == self.focus).unwrap_or(0);
        let next = if forward {
            (idx + 1) % order.len()
        } else {
            (idx + order.len() - 1) % order.len()
        };
        self.focus = order[next];
    }

    /// Move the highlighted row of the focused list
    pub fn move_selection(&mut self, down: bool) {
        let (selection, len) = match self.focus {
            Focus::CanvasList => (&mut self.canvas_selection, self.canvases.len()),
            Focus::AgentList => {
                let len = self.filtered_agents().len();
                (&mut self.agent_selection, len)
            }
            Focus::RunAgentList => (&mut self.run_selection, self.agents.len()),
            _ => return,
        };
        if len == 0 {
            *selection = 0;
        } else if down {
            *selection = (*selection + 1).min(len - 1);
        } else {
            *selection = selection.saturating_sub(1);
        }
    }

    pub fn toggle_logs(&mut self) {
        self.state = match self.state {
            AppState::Logs => AppState::Forms,
            _ => AppState::Logs,
        };
    }

    pub fn quit(&mut self) {
        self.state = AppState::Quit;
    }
}
