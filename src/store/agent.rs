use super::{now_timestamp, validate_name, Store, StoreError, StoreResult};
use crate::models::{Agent, AgentDraft, RecordKind, RecordSummary, SavedRecord};
use rusqlite::{params, OptionalExtension, Row};

const SELECT_AGENT: &str =
    "SELECT id, name, function, prompt, backend, model, created_at, updated_at FROM agents";

fn row_to_agent(row: &Row<'_>) -> rusqlite::Result<Agent> {
    Ok(Agent {
        id: row.get(0)?,
        name: row.get(1)?,
        function: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
        prompt: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
        backend: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
        model: row.get::<_, Option<String>>(5)?.unwrap_or_default(),
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

impl Store {
    pub fn list_agents(&self) -> StoreResult<Vec<RecordSummary>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "SELECT id, name, updated_at FROM agents \
             ORDER BY datetime(updated_at) DESC, name ASC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(RecordSummary {
                id: row.get(0)?,
                name: row.get(1)?,
                updated_at: row.get(2)?,
            })
        })?;
        let summaries = rows.collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(summaries)
    }

    pub fn get_agent_by_id(&self, id: i64) -> StoreResult<Option<Agent>> {
        let conn = self.connect()?;
        let agent = conn
            .query_row(
                &format!("{} WHERE id = ?1", SELECT_AGENT),
                params![id],
                row_to_agent,
            )
            .optional()?;
        Ok(agent)
    }

    pub fn get_agent_by_name(&self, name: &str) -> StoreResult<Option<Agent>> {
        let conn = self.connect()?;
        let agent = conn
            .query_row(
                &format!("{} WHERE name = ?1", SELECT_AGENT),
                params![name],
                row_to_agent,
            )
            .optional()?;
        Ok(agent)
    }

    pub fn save_agent(&self, draft: &AgentDraft) -> StoreResult<SavedRecord> {
        let kind = RecordKind::Agent;
        let name = validate_name(&draft.name, kind)?;
        let now = now_timestamp();

        let mut conn = self.connect()?;
        let tx = conn.transaction()?;

        let id = match draft.id {
            None => {
                tx.execute(
                    "INSERT INTO agents (
                        name, function, prompt, backend, model, created_at, updated_at
                    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
                    params![
                        name,
                        draft.function,
                        draft.prompt,
                        draft.backend,
                        draft.model,
                        now
                    ],
                )
                .map_err(|e| StoreError::from_write(e, kind, name))?;
                tx.last_insert_rowid()
            }
            Some(id) => {
                let changed = tx
                    .execute(
                        "UPDATE agents
                        SET name = ?1, function = ?2, prompt = ?3, backend = ?4, model = ?5,
                            updated_at = ?6
                        WHERE id = ?7",
                        params![
                            name,
                            draft.function,
                            draft.prompt,
                            draft.backend,
                            draft.model,
                            now,
                            id
                        ],
                    )
                    .map_err(|e| StoreError::from_write(e, kind, name))?;
                if changed == 0 {
                    return Err(StoreError::NotFound { kind, id });
                }
                id
            }
        };

        tx.commit()?;

        Ok(SavedRecord {
            id,
            name: name.to_string(),
            updated_at: now,
        })
    }

    pub fn delete_agent(&self, id: i64) -> StoreResult<()> {
        let mut conn = self.connect()?;
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM agents WHERE id = ?1", params![id])?;
        tx.commit()?;
        Ok(())
    }
}
