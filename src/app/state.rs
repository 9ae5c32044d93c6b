use crate::apis::BackendKind;
use crate::app::logger::Logger;
use crate::app::utils::ScrollState;
use crate::dispatcher::Dispatcher;
use crate::models::{Agent, AgentDraft, Canvas, CanvasDraft, RecordSummary};
use crate::store::Store;
use serde_json::{json, Value};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppState {
    Forms,
    Logs,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Canvas,
    Agents,
    Run,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Canvas, Tab::Agents, Tab::Run];

    pub fn title(&self) -> &'static str {
        match self {
            Tab::Canvas => "Canvas",
            Tab::Agents => "Agents",
            Tab::Run => "Run",
        }
    }
}

/// Every free-text input the forms expose
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextField {
    CanvasName,
    CustomerJobs,
    Pains,
    Gains,
    ProductsServices,
    GainCreators,
    PainRelievers,
    AgentSearch,
    AgentName,
    AgentFunction,
    AgentPrompt,
    AgentModel,
    TaskInput,
}

impl TextField {
    pub fn label(&self) -> &'static str {
        match self {
            TextField::CanvasName => "Name",
            TextField::CustomerJobs => "Customer Jobs",
            TextField::Pains => "Pains",
            TextField::Gains => "Gains",
            TextField::ProductsServices => "Products & Services",
            TextField::GainCreators => "Gain Creators",
            TextField::PainRelievers => "Pain Relievers",
            TextField::AgentSearch => "Search agents",
            TextField::AgentName => "Name",
            TextField::AgentFunction => "Function (role)",
            TextField::AgentPrompt => "Prompt (guidance)",
            TextField::AgentModel => "Model",
            TextField::TaskInput => "Task input",
        }
    }

    pub fn placeholder(&self) -> &'static str {
        match self {
            TextField::CanvasName => "e.g., SMB Field Technicians",
            TextField::CustomerJobs => {
                "What tasks are customers trying to get done? Functional, social, personal, supporting jobs..."
            }
            TextField::Pains => {
                "What annoys or prevents progress? Risks, bad outcomes, obstacles, costs..."
            }
            TextField::Gains => {
                "What benefits do customers expect or desire? Required, expected, desired, unexpected..."
            }
            TextField::ProductsServices => {
                "What bundles of products/services help customers get a job done?"
            }
            TextField::GainCreators => {
                "How does your offering create customer gains? Performance, cost, convenience..."
            }
            TextField::PainRelievers => {
                "How does your offering alleviate customer pains? Reduce risks, remove obstacles, lower costs..."
            }
            TextField::AgentSearch => "Type to filter by name",
            TextField::AgentName => "e.g., Market Researcher",
            TextField::AgentFunction => "What this agent does",
            TextField::AgentPrompt => "Detailed instructions for the agent",
            TextField::AgentModel => "e.g., gpt-4o-mini, claude-3-5-sonnet, llama3.1",
            TextField::TaskInput => {
                "Describe the task (e.g., Generate 5 customer interview questions for the current canvas)"
            }
        }
    }

    /// Single-line inputs swallow Enter instead of inserting a newline
    pub fn is_single_line(&self) -> bool {
        matches!(
            self,
            TextField::CanvasName
                | TextField::AgentSearch
                | TextField::AgentName
                | TextField::AgentFunction
                | TextField::AgentModel
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    CanvasList,
    AgentList,
    BackendPicker,
    RunAgentList,
    ContextToggle,
    Output,
    Text(TextField),
}

impl Focus {
    /// Tab-key order within a tab
    pub fn order(tab: Tab) -> &'static [Focus] {
        match tab {
            Tab::Canvas => &[
                Focus::CanvasList,
                Focus::Text(TextField::CanvasName),
                Focus::Text(TextField::CustomerJobs),
                Focus::Text(TextField::Pains),
                Focus::Text(TextField::Gains),
                Focus::Text(TextField::ProductsServices),
                Focus::Text(TextField::GainCreators),
                Focus::Text(TextField::PainRelievers),
            ],
            Tab::Agents => &[
                Focus::Text(TextField::AgentSearch),
                Focus::AgentList,
                Focus::Text(TextField::AgentName),
                Focus::Text(TextField::AgentFunction),
                Focus::Text(TextField::AgentPrompt),
                Focus::BackendPicker,
                Focus::Text(TextField::AgentModel),
            ],
            Tab::Run => &[
                Focus::RunAgentList,
                Focus::ContextToggle,
                Focus::Text(TextField::TaskInput),
                Focus::Output,
            ],
        }
    }

    pub fn text_field(&self) -> Option<TextField> {
        match self {
            Focus::Text(field) => Some(*field),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Success,
    Warning,
    Error,
}

/// One-line status message shown under the forms
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

/// Canvas currently being edited; `id` is `None` until the first save
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CanvasForm {
    pub id: Option<i64>,
    pub name: String,
    pub customer_jobs: String,
    pub pains: String,
    pub gains: String,
    pub products_services: String,
    pub gain_creators: String,
    pub pain_relievers: String,
    pub last_loaded_name: Option<String>,
    /// First Ctrl-D arms, second deletes
    pub delete_armed: bool,
}

impl CanvasForm {
    pub fn load(&mut self, canvas: &Canvas) {
        self.id = Some(canvas.id);
        self.name = canvas.name.clone();
        self.customer_jobs = canvas.customer_jobs.clone();
        self.pains = canvas.pains.clone();
        self.gains = canvas.gains.clone();
        self.products_services = canvas.products_services.clone();
        self.gain_creators = canvas.gain_creators.clone();
        self.pain_relievers = canvas.pain_relievers.clone();
        self.last_loaded_name = Some(canvas.name.clone());
        self.delete_armed = false;
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Blank names are saved as "Untitled"
    pub fn to_draft(&self) -> CanvasDraft {
        let name = self.name.trim();
        CanvasDraft {
            id: self.id,
            name: if name.is_empty() { "Untitled" } else { name }.to_string(),
            customer_jobs: self.customer_jobs.clone(),
            pains: self.pains.clone(),
            gains: self.gains.clone(),
            products_services: self.products_services.clone(),
            gain_creators: self.gain_creators.clone(),
            pain_relievers: self.pain_relievers.clone(),
        }
    }

    /// The `{"canvas": {...}}` object sent to agents as context
    pub fn context(&self) -> Value {
        json!({
            "canvas": {
                "name": self.name,
                "customer_jobs": self.customer_jobs,
                "pains": self.pains,
                "gains": self.gains,
                "products_services": self.products_services,
                "gain_creators": self.gain_creators,
                "pain_relievers": self.pain_relievers,
            }
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AgentForm {
    pub id: Option<i64>,
    pub name: String,
    pub function: String,
    pub prompt: String,
    pub backend: BackendKind,
    pub model: String,
    /// Backend string as stored, when it is not one of the known identifiers
    pub stored_backend: Option<String>,
}

impl AgentForm {
    pub fn load(&mut self, agent: &Agent) {
        self.id = Some(agent.id);
        self.name = agent.name.clone();
        self.function = agent.function.clone();
        self.prompt = agent.prompt.clone();
        self.backend = agent.backend_kind();
        self.model = agent.model.clone();
        self.stored_backend =
            Some(agent.backend.clone()).filter(|raw| raw.as_str() != self.backend.as_str());
    }

    /// Stored string to write back; an unrecognized value survives resaves
    /// until the picker moves off the backend it resolves to
    pub fn backend_value(&self) -> String {
        match &self.stored_backend {
            Some(raw) if BackendKind::parse(raw) == self.backend => raw.clone(),
            _ => self.backend.as_str().to_string(),
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Blank names are saved as "Untitled Agent"
    pub fn to_draft(&self) -> AgentDraft {
        let name = self.name.trim();
        AgentDraft {
            id: self.id,
            name: if name.is_empty() { "Untitled Agent" } else { name }.to_string(),
            function: self.function.clone(),
            prompt: self.prompt.clone(),
            backend: self.backend_value(),
            model: self.model.clone(),
        }
    }
}

/// One completed run, kept for the session only
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRecord {
    pub ts: String,
    pub agent: String,
    pub input: String,
    pub output: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunForm {
    /// Name of the agent picked in the Run tab
    pub selected_agent: Option<String>,
    pub include_context: bool,
    pub task_input: String,
    pub last_output: Option<String>,
    pub history: Vec<RunRecord>,
}

impl Default for RunForm {
    fn default() -> Self {
        Self {
            selected_agent: None,
            include_context: true,
            task_input: String::new(),
            last_output: None,
            history: Vec::new(),
        }
    }
}

/// Per-session view-model shared by every tab
pub struct App {
    pub state: AppState,
    pub tab: Tab,
    pub focus: Focus,
    pub canvas: CanvasForm,
    pub agent: AgentForm,
    pub run: RunForm,
    pub agent_search: String,
    pub canvases: Vec<RecordSummary>,
    pub agents: Vec<RecordSummary>,
    /// Highlighted row in the canvas list
    pub canvas_selection: usize,
    /// Highlighted row in the filtered agent list
    pub agent_selection: usize,
    /// Highlighted row in the Run tab's agent list
    pub run_selection: usize,
    pub notice: Option<Notice>,
    pub export_dir: PathBuf,
    pub output_scroll: ScrollState,
    pub log_scroll: ScrollState,
    pub(crate) store: Store,
    pub(crate) dispatcher: Dispatcher,
    pub(crate) logger: Box<dyn Logger>,
}
