//! View-model tests: the form actions behind each tab, driven without a terminal

use anyhow::Result;
use mockito::{Matcher, Server};
use serde_json::json;
use std::fs;
use std::time::Duration;
use strategy_planner::apis::BackendKind;
use strategy_planner::app::{
    AgentManager, App, CanvasManager, Focus, MemoryLogger, NoticeKind, RunManager, Tab, TextField,
    HISTORY_DISPLAY_LIMIT,
};
use strategy_planner::dispatcher::{Dispatcher, Endpoints};
use strategy_planner::secrets::SecretResolver;
use strategy_planner::store::Store;
use tempfile::{tempdir, TempDir};

struct Harness {
    _dir: TempDir,
    app: App,
}

fn harness_with(dispatcher: Dispatcher) -> Result<Harness> {
    let dir = tempdir()?;
    let store = Store::open(dir.path().join("strategy.db"))?;
    let app = App::with_parts(
        store,
        dispatcher,
        Box::new(MemoryLogger::new()),
        dir.path().join("exports"),
    );
    Ok(Harness { _dir: dir, app })
}

fn harness() -> Result<Harness> {
    harness_with(Dispatcher::new(SecretResolver::new()))
}

fn notice_kind(app: &App) -> Option<NoticeKind> {
    app.notice.as_ref().map(|n| n.kind)
}

fn notice_text(app: &App) -> String {
    app.notice
        .as_ref()
        .map(|n| n.text.clone())
        .unwrap_or_default()
}

fn save_echo_agent(app: &mut App, name: &str) {
    app.new_agent();
    app.agent.name = name.to_string();
    app.agent.backend = BackendKind::Echo;
    app.save_agent().expect("agent saves");
}

#[test]
fn test_canvas_blank_name_saves_as_untitled() -> Result<()> {
    let mut h = harness()?;
    let app = &mut h.app;

    app.canvas.pains = "Slow quotes".into();
    let saved = app.save_canvas()?;

    assert_eq!(saved.name, "Untitled");
    assert_eq!(app.canvas.id, Some(saved.id));
    assert_eq!(app.canvas.name, "Untitled");
    assert_eq!(notice_text(app), "Saved.");
    assert_eq!(app.canvases.len(), 1);
    Ok(())
}

#[test]
fn test_canvas_resave_updates_in_place() -> Result<()> {
    let mut h = harness()?;
    let app = &mut h.app;

    app.canvas.name = "Field Techs".into();
    let first = app.save_canvas()?;
    app.canvas.gains = "Fewer callbacks".into();
    let second = app.save_canvas()?;

    assert_eq!(first.id, second.id);
    assert_eq!(app.canvases.len(), 1);
    let stored = app.store().get_canvas_by_id(first.id)?.expect("stored");
    assert_eq!(stored.gains, "Fewer callbacks");
    Ok(())
}

#[test]
fn test_canvas_duplicate_name_notice() -> Result<()> {
    let mut h = harness()?;
    let app = &mut h.app;

    app.canvas.name = "Alpha".into();
    app.save_canvas()?;
    app.new_canvas();
    assert_eq!(app.canvas.id, None);
    assert_eq!(notice_text(app), "Started a new canvas.");

    app.canvas.name = "Alpha".into();
    assert!(app.save_canvas().is_err());
    assert_eq!(notice_kind(app), Some(NoticeKind::Error));
    assert!(notice_text(app).starts_with("Save failed: "));
    assert!(notice_text(app).ends_with("Choose a different name."));
    assert_eq!(app.canvas.id, None);
    Ok(())
}

#[test]
fn test_canvas_load_and_missing_id() -> Result<()> {
    let mut h = harness()?;
    let app = &mut h.app;

    app.canvas.name = "Loaded".into();
    app.canvas.customer_jobs = "Dispatch crews".into();
    let saved = app.save_canvas()?;
    app.new_canvas();

    app.canvas_selection = 0;
    app.load_selected_canvas();
    assert_eq!(app.canvas.id, Some(saved.id));
    assert_eq!(app.canvas.customer_jobs, "Dispatch crews");
    assert_eq!(app.canvas.last_loaded_name.as_deref(), Some("Loaded"));

    // Unknown ids leave the form alone
    app.load_canvas(9999);
    assert_eq!(app.canvas.id, Some(saved.id));
    assert_eq!(app.canvas.name, "Loaded");
    Ok(())
}

#[test]
fn test_canvas_delete_needs_confirmation() -> Result<()> {
    let mut h = harness()?;
    let app = &mut h.app;

    assert!(!app.request_delete_canvas());
    assert_eq!(notice_kind(app), Some(NoticeKind::Warning));

    app.canvas.name = "Doomed".into();
    app.save_canvas()?;

    assert!(!app.request_delete_canvas());
    assert!(app.canvas.delete_armed);
    assert_eq!(app.canvases.len(), 1);

    assert!(app.request_delete_canvas());
    assert!(app.canvases.is_empty());
    assert_eq!(app.canvas.id, None);
    assert_eq!(app.canvas.name, "");
    Ok(())
}

#[test]
fn test_switching_tabs_disarms_delete() -> Result<()> {
    let mut h = harness()?;
    let app = &mut h.app;

    app.canvas.name = "Keep me".into();
    app.save_canvas()?;
    app.request_delete_canvas();
    assert!(app.canvas.delete_armed);

    app.switch_tab(Tab::Agents);
    app.switch_tab(Tab::Canvas);
    assert!(!app.request_delete_canvas());
    assert_eq!(app.canvases.len(), 1);
    Ok(())
}

#[test]
fn test_export_requires_saved_canvas() -> Result<()> {
    let mut h = harness()?;
    let app = &mut h.app;

    app.canvas.name = "Draft".into();
    assert!(app.export_canvas().is_err());
    assert_eq!(notice_text(app), "Save first to enable exports.");
    Ok(())
}

#[test]
fn test_export_writes_json_and_markdown() -> Result<()> {
    let mut h = harness()?;
    let app = &mut h.app;

    app.canvas.name = "SMB Field Technicians".into();
    app.canvas.pain_relievers = "Offline job sheets".into();
    app.save_canvas()?;

    let (json_path, md_path) = app.export_canvas()?;
    assert_eq!(
        json_path.file_name().and_then(|n| n.to_str()),
        Some("SMB_Field_Technicians.json")
    );
    assert_eq!(
        md_path.file_name().and_then(|n| n.to_str()),
        Some("SMB_Field_Technicians.md")
    );

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&json_path)?)?;
    assert_eq!(json["pain_relievers"], "Offline job sheets");
    let markdown = fs::read_to_string(&md_path)?;
    assert!(markdown.starts_with("# Value Proposition Canvas — SMB Field Technicians"));
    assert!(markdown.contains("## Pain Relievers\n\nOffline job sheets\n"));
    assert_eq!(notice_kind(app), Some(NoticeKind::Success));
    Ok(())
}

#[test]
fn test_agent_save_search_and_delete() -> Result<()> {
    let mut h = harness()?;
    let app = &mut h.app;

    let saved = app.save_agent()?;
    assert_eq!(saved.name, "Untitled Agent");
    assert_eq!(notice_text(app), "Agent saved.");

    save_echo_agent(app, "Market Researcher");
    save_echo_agent(app, "Copy Writer");

    app.set_text(TextField::AgentSearch, "RESEARCH".into());
    let names: Vec<&str> = app
        .filtered_agents()
        .iter()
        .map(|a| a.name.as_str())
        .collect();
    assert_eq!(names, vec!["Market Researcher"]);

    app.set_text(TextField::AgentSearch, String::new());
    assert_eq!(app.filtered_agents().len(), 3);

    // Copy Writer is still loaded in the form
    assert!(app.delete_agent());
    assert_eq!(app.agents.len(), 2);
    assert_eq!(app.agent.id, None);

    app.new_agent();
    assert!(!app.delete_agent());
    assert_eq!(notice_kind(app), Some(NoticeKind::Warning));
    Ok(())
}

#[test]
fn test_agent_load_keeps_unknown_backend_as_echo() -> Result<()> {
    let mut h = harness()?;
    let app = &mut h.app;

    let mut draft = strategy_planner::models::AgentDraft::named("Legacy", BackendKind::Echo);
    draft.backend = "gemini".into();
    let saved = app.store().save_agent(&draft)?;
    app.refresh_lists();

    app.load_agent(saved.id);
    assert_eq!(app.agent.name, "Legacy");
    assert_eq!(app.agent.backend, BackendKind::Echo);
    Ok(())
}

#[test]
fn test_resaving_agent_keeps_unknown_backend_string() -> Result<()> {
    let mut h = harness()?;
    let app = &mut h.app;

    let mut draft = strategy_planner::models::AgentDraft::named("Legacy", BackendKind::Echo);
    draft.backend = "gemini".into();
    let saved = app.store().save_agent(&draft)?;
    app.refresh_lists();

    app.load_agent(saved.id);
    app.agent.model = "gemini-pro".into();
    app.save_agent()?;

    let row = app.store().get_agent_by_id(saved.id)?.expect("agent exists");
    assert_eq!(row.backend, "gemini");
    assert_eq!(row.model, "gemini-pro");

    // Moving the picker replaces the unknown value with a real backend
    app.cycle_backend(true);
    app.save_agent()?;
    let row = app.store().get_agent_by_id(saved.id)?.expect("agent exists");
    assert_eq!(row.backend, "openai");
    Ok(())
}

#[test]
fn test_cycle_backend_wraps() -> Result<()> {
    let mut h = harness()?;
    let app = &mut h.app;

    assert_eq!(app.agent.backend, BackendKind::OpenAi);
    app.cycle_backend(false);
    assert_eq!(app.agent.backend, BackendKind::Echo);
    app.cycle_backend(true);
    app.cycle_backend(true);
    assert_eq!(app.agent.backend, BackendKind::Anthropic);
    Ok(())
}

#[test]
fn test_use_agent_in_run_preselects() -> Result<()> {
    let mut h = harness()?;
    let app = &mut h.app;

    save_echo_agent(app, "Alpha");
    save_echo_agent(app, "Bravo");

    app.use_agent_in_run();
    assert_eq!(app.tab, Tab::Run);
    assert_eq!(app.focus, Focus::RunAgentList);
    assert_eq!(app.run.selected_agent.as_deref(), Some("Bravo"));
    assert_eq!(app.agents[app.run_selection].name, "Bravo");
    assert_eq!(notice_text(app), "Agent pre-selected in Run tab.");
    Ok(())
}

#[test]
fn test_renaming_agent_follows_run_selection() -> Result<()> {
    let mut h = harness()?;
    let app = &mut h.app;

    save_echo_agent(app, "Draft Name");
    app.use_agent_in_run();
    app.switch_tab(Tab::Agents);

    app.agent.name = "Final Name".into();
    app.save_agent()?;
    assert_eq!(app.run.selected_agent.as_deref(), Some("Final Name"));

    app.switch_tab(Tab::Run);
    app.run.task_input = "ping".into();
    assert!(app.run_selected_agent().is_some());
    Ok(())
}

#[test]
fn test_renaming_other_agent_keeps_run_selection() -> Result<()> {
    let mut h = harness()?;
    let app = &mut h.app;

    save_echo_agent(app, "Picked");
    app.use_agent_in_run();
    app.switch_tab(Tab::Agents);

    save_echo_agent(app, "Other");
    app.agent.name = "Other Renamed".into();
    app.save_agent()?;
    assert_eq!(app.run.selected_agent.as_deref(), Some("Picked"));
    Ok(())
}

#[test]
fn test_deleting_agent_clears_run_selection() -> Result<()> {
    let mut h = harness()?;
    let app = &mut h.app;

    save_echo_agent(app, "Short Lived");
    app.use_agent_in_run();
    app.switch_tab(Tab::Agents);
    assert!(app.delete_agent());
    assert_eq!(app.run.selected_agent, None);
    Ok(())
}

#[test]
fn test_run_validation() -> Result<()> {
    let mut h = harness()?;
    let app = &mut h.app;

    assert_eq!(app.run_selected_agent(), None);
    assert_eq!(notice_text(app), "Select an agent first.");

    save_echo_agent(app, "Echoer");
    app.run_selection = 0;
    app.select_run_agent();
    app.run.task_input = "   ".into();
    assert_eq!(app.run_selected_agent(), None);
    assert_eq!(notice_text(app), "Enter a task input.");
    assert!(app.run.history.is_empty());
    Ok(())
}

#[test]
fn test_run_echo_with_and_without_context() -> Result<()> {
    let mut h = harness()?;
    let app = &mut h.app;

    app.canvas.name = "Field Techs".into();
    save_echo_agent(app, "Echoer");
    app.use_agent_in_run();
    app.run.task_input = "List risks".into();

    let output = app.run_selected_agent().expect("run happens");
    assert!(output.starts_with("[Echo Backend]\nList risks\n\nCONTEXT (JSON):\n"));
    assert!(output.contains("\"name\": \"Field Techs\""));
    assert!(output.contains("\"pain_relievers\": \"\""));
    assert_eq!(notice_kind(app), Some(NoticeKind::Success));

    app.toggle_include_context();
    let output = app.run_selected_agent().expect("run happens");
    assert_eq!(output, "[Echo Backend]\nList risks");
    assert_eq!(app.run.last_output.as_deref(), Some("[Echo Backend]\nList risks"));

    let history = app.recent_history();
    assert_eq!(history.len(), 2);
    assert_eq!(history[1].agent, "Echoer");
    assert_eq!(history[1].input, "List risks");
    Ok(())
}

#[test]
fn test_history_shows_last_twenty() -> Result<()> {
    let mut h = harness()?;
    let app = &mut h.app;

    save_echo_agent(app, "Echoer");
    app.use_agent_in_run();
    app.toggle_include_context();
    for i in 0..25 {
        app.run.task_input = format!("task {}", i);
        app.run_selected_agent();
    }

    let history = app.recent_history();
    assert_eq!(history.len(), HISTORY_DISPLAY_LIMIT);
    assert_eq!(history[0].input, "task 5");
    assert_eq!(history[HISTORY_DISPLAY_LIMIT - 1].input, "task 24");

    app.clear_history();
    assert!(app.recent_history().is_empty());
    assert_eq!(app.run.last_output, None);
    Ok(())
}

#[test]
fn test_missing_key_output_is_flagged() -> Result<()> {
    let mut h = harness()?;
    let app = &mut h.app;

    app.agent.name = "Needs Key".into();
    app.agent.backend = BackendKind::OpenAi;
    app.save_agent()?;
    app.use_agent_in_run();
    app.run.task_input = "hello".into();

    let output = app.run_selected_agent().expect("run happens");
    assert_eq!(output, "[Error] OPENAI_API_KEY not set.");
    assert_eq!(notice_kind(app), Some(NoticeKind::Error));
    Ok(())
}

#[test]
fn test_unsaved_prompt_wins_for_same_agent() -> Result<()> {
    let mut server = Server::new();
    let mock = server
        .mock("POST", "/api/chat")
        .match_body(Matcher::PartialJson(json!({
            "messages": [
                {"role": "system", "content": "Role: Analyst\n\nInstructions: Edited prompt"},
                {"role": "user", "content": "go"}
            ]
        })))
        .with_status(200)
        .with_body(r#"{"message":{"content":"done"}}"#)
        .create();

    let dispatcher = Dispatcher::new(SecretResolver::new())
        .with_endpoints(Endpoints::rooted_at(&server.url()))
        .with_timeout(Duration::from_secs(5));
    let mut h = harness_with(dispatcher)?;
    let app = &mut h.app;

    app.agent.name = "Local".into();
    app.agent.function = "Analyst".into();
    app.agent.prompt = "Saved prompt".into();
    app.agent.backend = BackendKind::Ollama;
    app.save_agent()?;

    // Edit without saving
    app.agent.prompt = "Edited prompt".into();
    app.use_agent_in_run();
    app.toggle_include_context();
    app.run.task_input = "go".into();

    assert_eq!(app.run_selected_agent().as_deref(), Some("done"));
    mock.assert();
    Ok(())
}

#[test]
fn test_empty_completion_shows_placeholder() -> Result<()> {
    let mut server = Server::new();
    let _mock = server
        .mock("POST", "/api/chat")
        .with_status(200)
        .with_body(r#"{"message":{"content":""}}"#)
        .create();

    let dispatcher = Dispatcher::new(SecretResolver::new())
        .with_endpoints(Endpoints::rooted_at(&server.url()));
    let mut h = harness_with(dispatcher)?;
    let app = &mut h.app;

    app.agent.name = "Quiet".into();
    app.agent.backend = BackendKind::Ollama;
    app.save_agent()?;
    app.use_agent_in_run();
    app.run.task_input = "anything".into();

    assert_eq!(app.run_selected_agent().as_deref(), Some("(no output)"));
    Ok(())
}

#[test]
fn test_save_last_output() -> Result<()> {
    let mut h = harness()?;
    let app = &mut h.app;

    assert!(app.save_last_output().is_err());
    assert_eq!(notice_text(app), "No output to save yet.");

    save_echo_agent(app, "Echoer");
    app.use_agent_in_run();
    app.toggle_include_context();
    app.run.task_input = "write it down".into();
    app.run_selected_agent();

    let path = app.save_last_output()?;
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .to_string();
    assert!(file_name.starts_with("agent_output_"));
    assert!(file_name.ends_with(".md"));
    assert_eq!(fs::read_to_string(&path)?, "[Echo Backend]\nwrite it down");
    Ok(())
}

#[test]
fn test_focus_cycles_within_tab() -> Result<()> {
    let mut h = harness()?;
    let app = &mut h.app;

    app.switch_tab(Tab::Run);
    assert_eq!(app.focus, Focus::RunAgentList);
    app.cycle_focus(false);
    assert_eq!(app.focus, Focus::Output);
    app.cycle_focus(true);
    app.cycle_focus(true);
    assert_eq!(app.focus, Focus::ContextToggle);
    Ok(())
}

#[test]
fn test_list_selection_is_clamped() -> Result<()> {
    let mut h = harness()?;
    let app = &mut h.app;

    save_echo_agent(app, "One");
    save_echo_agent(app, "Two");
    app.switch_tab(Tab::Agents);
    app.cycle_focus(true);
    assert_eq!(app.focus, Focus::AgentList);

    app.move_selection(true);
    app.move_selection(true);
    app.move_selection(true);
    assert_eq!(app.agent_selection, 1);
    app.move_selection(false);
    app.move_selection(false);
    assert_eq!(app.agent_selection, 0);

    app.move_selection(true);
    app.set_text(TextField::AgentSearch, "one".into());
    assert_eq!(app.agent_selection, 0);
    Ok(())
}

#[test]
fn test_actions_are_logged() -> Result<()> {
    let mut h = harness()?;
    let app = &mut h.app;

    app.canvas.name = "Logged".into();
    app.save_canvas()?;

    assert!(app.log_file_path().is_none());
    assert!(app
        .recent_logs()
        .iter()
        .any(|line| line.contains("[INFO]") && line.contains("Saved canvas")));
    Ok(())
}
