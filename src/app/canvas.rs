use crate::app::logger::LogLevel;
use crate::app::state::{App, NoticeKind};
use crate::app::utils::sanitize_filename;
use crate::models::SavedRecord;
use crate::store::StoreError;
use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::PathBuf;

/// Canvas form actions
pub trait CanvasManager {
    fn new_canvas(&mut self);
    fn load_canvas(&mut self, id: i64);
    fn load_selected_canvas(&mut self);
    fn save_canvas(&mut self) -> Result<SavedRecord, StoreError>;
    /// First call arms the delete, the second performs it. Returns true once deleted.
    fn request_delete_canvas(&mut self) -> bool;
    /// Write `<name>.json` and `<name>.md` into the export directory
    fn export_canvas(&mut self) -> Result<(PathBuf, PathBuf)>;
}

impl CanvasManager for App {
    fn new_canvas(&mut self) {
        self.canvas.clear();
        self.notify(NoticeKind::Info, "Started a new canvas.");
    }

    fn load_canvas(&mut self, id: i64) {
        match self.store.get_canvas_by_id(id) {
            Ok(Some(canvas)) => {
                self.canvas.load(&canvas);
                self.log(
                    LogLevel::Debug,
                    &format!("Loaded canvas {} '{}'", canvas.id, canvas.name),
                );
                self.notify(NoticeKind::Info, format!("Loaded '{}'.", canvas.name));
            }
            // Stale list entry; nothing to load
            Ok(None) => {}
            Err(e) => {
                self.log(LogLevel::Error, &format!("Failed to load canvas {}: {}", id, e));
                self.notify(NoticeKind::Error, format!("Load failed: {}", e));
            }
        }
    }

    fn load_selected_canvas(&mut self) {
        if let Some(id) = self.canvases.get(self.canvas_selection).map(|c| c.id) {
            self.load_canvas(id);
        }
    }

    fn save_canvas(&mut self) -> Result<SavedRecord, StoreError> {
        let draft = self.canvas.to_draft();
        match self.store.save_canvas(&draft) {
            Ok(saved) => {
                self.log(
                    LogLevel::Info,
                    &format!("Saved canvas {} '{}'", saved.id, saved.name),
                );
                self.canvas.id = Some(saved.id);
                self.canvas.name = saved.name.clone();
                self.canvas.last_loaded_name = Some(saved.name.clone());
                self.canvas.delete_armed = false;
                self.refresh_lists();
                self.notify(NoticeKind::Success, "Saved.");
                Ok(saved)
            }
            Err(e) => {
                self.log(LogLevel::Error, &format!("Canvas save failed: {}", e));
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

    fn request_delete_canvas(&mut self) -> bool {
        let Some(id) = self.canvas.id else {
            self.notify(NoticeKind::Warning, "Nothing to delete: save the canvas first.");
            return false;
        };

        if !self.canvas.delete_armed {
            self.canvas.delete_armed = true;
            self.notify(
                NoticeKind::Warning,
                format!("Press Ctrl-D again to delete '{}'.", self.canvas.name),
            );
            return false;
        }

        match self.store.delete_canvas(id) {
            Ok(()) => {
                self.log(LogLevel::Info, &format!("Deleted canvas {}", id));
                self.canvas.clear();
                self.refresh_lists();
                self.notify(NoticeKind::Success, "Deleted.");
                true
            }
            Err(e) => {
                self.canvas.delete_armed = false;
                self.log(LogLevel::Error, &format!("Canvas delete failed: {}", e));
                self.notify(NoticeKind::Error, format!("Delete failed: {}", e));
                false
            }
        }
    }

    fn export_canvas(&mut self) -> Result<(PathBuf, PathBuf)> {
        let result = self.write_exports();

        match &result {
            Ok((json_path, md_path)) => {
                self.log(
                    LogLevel::Info,
                    &format!(
                        "Exported canvas to {} and {}",
                        json_path.display(),
                        md_path.display()
                    ),
                );
                self.notify(
                    NoticeKind::Success,
                    format!("Exported {} and {}.", json_path.display(), md_path.display()),
                );
            }
            Err(e) => {
                self.log(LogLevel::Warning, &format!("Export failed: {:#}", e));
                self.notify(NoticeKind::Warning, format!("{:#}", e));
            }
        }
        result
    }
}

impl App {
    fn write_exports(&self) -> Result<(PathBuf, PathBuf)> {
        let id = self
            .canvas
            .id
            .ok_or_else(|| anyhow!("Save first to enable exports."))?;
        let json = self.store.export_json(id)?;
        let markdown = self.store.export_markdown(id)?;

        fs::create_dir_all(&self.export_dir)
            .with_context(|| format!("Failed to create {}", self.export_dir.display()))?;
        let base = sanitize_filename(&self.canvas.name);
        let json_path = self.export_dir.join(format!("{}.json", base));
        let md_path = self.export_dir.join(format!("{}.md", base));
        fs::write(&json_path, json)
            .with_context(|| format!("Failed to write {}", json_path.display()))?;
        fs::write(&md_path, markdown)
            .with_context(|| format!("Failed to write {}", md_path.display()))?;
        Ok((json_path, md_path))
    }
}
