use rusqlite::Connection;

const CREATE_CANVASES: &str = "
CREATE TABLE IF NOT EXISTS canvases (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT UNIQUE NOT NULL,
    customer_jobs TEXT,
    pains TEXT,
    gains TEXT,
    products_services TEXT,
    gain_creators TEXT,
    pain_relievers TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);";

const CREATE_AGENTS: &str = "
CREATE TABLE IF NOT EXISTS agents (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT UNIQUE NOT NULL,
    function TEXT,
    prompt TEXT,
    backend TEXT,
    model TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);";

/// Create both tables if they are missing
pub fn apply(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(CREATE_CANVASES)?;
    conn.execute_batch(CREATE_AGENTS)?;
    Ok(())
}
