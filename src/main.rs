use anyhow::Result;
use strategy_planner::app::logger::{format_log_with_color, LogLevel};
use strategy_planner::{run_app, App, Config};

/// Package version from Cargo.toml
const VERSION: &str = env!("CARGO_PKG_VERSION");

fn main() -> Result<()> {
    if std::env::args().any(|arg| arg == "--version" || arg == "-V") {
        println!("strategy-planner {}", VERSION);
        return Ok(());
    }

    let config = Config::from_env()?;
    let mut app = App::new(&config)?;

    if let Some(path) = app.log_file_path() {
        eprintln!(
            "{}",
            format_log_with_color(LogLevel::Info, &format!("Logging to {}", path.display()))
        );
    }

    run_app(&mut app)?;

    eprintln!(
        "{}",
        format_log_with_color(
            LogLevel::Info,
            &format!("Data stored in {}", config.db_path.display())
        )
    );
    Ok(())
}
