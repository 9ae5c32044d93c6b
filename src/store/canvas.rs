use super::{now_timestamp, validate_name, Store, StoreError, StoreResult};
use crate::models::{Canvas, CanvasDraft, RecordKind, RecordSummary, SavedRecord};
use rusqlite::{params, OptionalExtension, Row};

const SELECT_CANVAS: &str = "SELECT id, name, customer_jobs, pains, gains, products_services, \
     gain_creators, pain_relievers, created_at, updated_at FROM canvases";

fn row_to_canvas(row: &Row<'_>) -> rusqlite::Result<Canvas> {
    Ok(Canvas {
        id: row.get(0)?,
        name: row.get(1)?,
        customer_jobs: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
        pains: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
        gains: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
        products_services: row.get::<_, Option<String>>(5)?.unwrap_or_default(),
        gain_creators: row.get::<_, Option<String>>(6)?.unwrap_or_default(),
        pain_relievers: row.get::<_, Option<String>>(7)?.unwrap_or_default(),
        created_at: row.get(8)?,
        updated_at: row.get(9)?,
    })
}

impl Store {
    /// Summaries, most recently updated first, ties broken by name
    pub fn list_canvases(&self) -> StoreResult<Vec<RecordSummary>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "SELECT id, name, updated_at FROM canvases \
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

    pub fn get_canvas_by_id(&self, id: i64) -> StoreResult<Option<Canvas>> {
        let conn = self.connect()?;
        let canvas = conn
            .query_row(
                &format!("{} WHERE id = ?1", SELECT_CANVAS),
                params![id],
                row_to_canvas,
            )
            .optional()?;
        Ok(canvas)
    }

    pub fn get_canvas_by_name(&self, name: &str) -> StoreResult<Option<Canvas>> {
        let conn = self.connect()?;
        let canvas = conn
            .query_row(
                &format!("{} WHERE name = ?1", SELECT_CANVAS),
                params![name],
                row_to_canvas,
            )
            .optional()?;
        Ok(canvas)
    }

    /// Insert when `draft.id` is `None`, otherwise update that row in place
    pub fn save_canvas(&self, draft: &CanvasDraft) -> StoreResult<SavedRecord> {
        let kind = RecordKind::Canvas;
        let name = validate_name(&draft.name, kind)?;
        let now = now_timestamp();

        let mut conn = self.connect()?;
        let tx = conn.transaction()?;

        let id = match draft.id {
            None => {
                tx.execute(
                    "INSERT INTO canvases (
                        name, customer_jobs, pains, gains,
                        products_services, gain_creators, pain_relievers,
                        created_at, updated_at
                    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)",
                    params![
                        name,
                        draft.customer_jobs,
                        draft.pains,
                        draft.gains,
                        draft.products_services,
                        draft.gain_creators,
                        draft.pain_relievers,
                        now,
                    ],
                )
                .map_err(|e| StoreError::from_write(e, kind, name))?;
                tx.last_insert_rowid()
            }
            Some(id) => {
                let changed = tx
                    .execute(
                        "UPDATE canvases
                        SET name = ?1, customer_jobs = ?2, pains = ?3, gains = ?4,
                            products_services = ?5, gain_creators = ?6, pain_relievers = ?7,
                            updated_at = ?8
                        WHERE id = ?9",
                        params![
                            name,
                            draft.customer_jobs,
                            draft.pains,
                            draft.gains,
                            draft.products_services,
                            draft.gain_creators,
                            draft.pain_relievers,
                            now,
                            id,
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

    /// Hard delete; an unknown id is a no-op
    pub fn delete_canvas(&self, id: i64) -> StoreResult<()> {
        let mut conn = self.connect()?;
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM canvases WHERE id = ?1", params![id])?;
        tx.commit()?;
        Ok(())
    }
}
