use std::path::Path;

use eframe::egui;

use crate::color::ColorMap;
use crate::config::{DashboardConfig, FilterStyle};
use crate::data::entry::NewLineRecord;
use crate::data::export::to_csv_bytes;
use crate::data::filter::{apply_selections, bulk_clear, bulk_select_all, FilterState, Selection};
use crate::data::loader::load_file;
use crate::data::model::Table;
use crate::data::store::DatasetStore;

/// Column the distribution chart groups by.
pub const PIPE_TYPE_COLUMN: &str = "Pipe Type";

/// One-line feedback shown under the menu bar.
#[derive(Debug, Clone, PartialEq)]
pub enum Status {
    Success(String),
    Error(String),
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full session state, independent of rendering.
pub struct AppState {
    pub config: DashboardConfig,

    /// Current table and its CSV snapshot.
    pub store: DatasetStore,

    /// Per-column filter selections for this session.
    pub filters: FilterState,

    /// `store.table()` narrowed by `filters` (cached).
    pub filtered: Table,

    pub filter_style: FilterStyle,

    /// Contents of the "Add New Row" form.
    pub new_row: NewLineRecord,

    /// Colours for the pipe-type chart, keyed on the full table.
    pub pipe_type_colors: ColorMap,

    /// Uploaded company logo.
    pub logo: Option<egui::TextureHandle>,

    pub status: Option<Status>,
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        let store = DatasetStore::open(config.data_path(), Some(config.seed_path()));
        let mut state = AppState {
            filter_style: config.filter_style,
            config,
            store,
            filters: FilterState::default(),
            filtered: Table::default(),
            new_row: NewLineRecord::default(),
            pipe_type_colors: ColorMap::default(),
            logo: None,
            status: None,
        };
        state.table_changed();
        state
    }

    pub fn table(&self) -> &Table {
        self.store.table()
    }

    /// Recompute `filtered` after a selection change.
    pub fn refilter(&mut self) {
        self.filtered = apply_selections(self.store.table(), &self.filters);
    }

    fn table_changed(&mut self) {
        let table = self.store.table();
        self.filters.retain_valid(table);
        self.pipe_type_colors = table
            .column(PIPE_TYPE_COLUMN)
            .map(|c| {
                let labels = c.distinct_labels();
                ColorMap::new(labels.iter().map(String::as_str))
            })
            .unwrap_or_default();
        self.refilter();
    }

    pub fn set_selection(&mut self, column: &str, selection: Selection) {
        self.filters.set(column, selection);
        self.refilter();
    }

    pub fn select_all(&mut self) {
        self.filters = bulk_select_all(self.store.table());
        self.refilter();
    }

    pub fn clear_all(&mut self) {
        self.filters = bulk_clear(&self.filters);
        self.refilter();
    }

    /// Replace the whole dataset with an uploaded file. On failure the
    /// current table stays in place.
    pub fn import_file(&mut self, path: &Path) {
        let table = match load_file(path) {
            Ok(table) => table,
            Err(e) => {
                log::error!("Failed to import {}: {e}", path.display());
                self.status = Some(Status::Error(format!("Error processing file: {e}")));
                return;
            }
        };

        match self.store.replace(table) {
            Ok(()) => {
                log::info!("Imported {}", path.display());
                self.status = Some(Status::Success("Data uploaded successfully!".into()));
                self.table_changed();
            }
            Err(e) => {
                log::error!("Failed to save uploaded data: {e}");
                self.status = Some(Status::Error(format!("Failed to save uploaded data: {e}")));
            }
        }
    }

    /// Validate the add-row form and append it. The form is reset only on
    /// success.
    pub fn add_row(&mut self) {
        let row = match self.new_row.to_row() {
            Ok(row) => row,
            Err(e) => {
                self.status = Some(Status::Error(e.to_string()));
                return;
            }
        };

        match self.store.append(row) {
            Ok(()) => {
                self.status = Some(Status::Success("New record added successfully!".into()));
                self.new_row = NewLineRecord::new(self.new_row.installation_date);
                self.table_changed();
            }
            Err(e) => {
                log::error!("Failed to save new record: {e}");
                self.status = Some(Status::Error(format!("Failed to save new record: {e}")));
            }
        }
    }

    /// Write the filtered table to `path` as CSV.
    pub fn export_filtered(&mut self, path: &Path) {
        let result = to_csv_bytes(&self.filtered)
            .map_err(|e| e.to_string())
            .and_then(|bytes| std::fs::write(path, bytes).map_err(|e| e.to_string()));

        self.status = Some(match result {
            Ok(()) => {
                log::info!(
                    "Exported {} filtered lines to {}",
                    self.filtered.n_rows(),
                    path.display()
                );
                Status::Success(format!("Saved {}", path.display()))
            }
            Err(e) => {
                log::error!("Export to {} failed: {e}", path.display());
                Status::Error(format!("Export failed: {e}"))
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::data::model::Value;

    fn state_in(dir: &Path) -> AppState {
        AppState::new(DashboardConfig {
            data_dir: dir.to_path_buf(),
            ..DashboardConfig::default()
        })
    }

    fn upload(dir: &Path, body: &str) -> std::path::PathBuf {
        let path = dir.join("upload.csv");
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn import_replaces_table_and_drops_stale_filters() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = state_in(dir.path());
        state.set_selection("Vessel", Selection::Values(["S7000".to_string()].into()));

        let path = upload(dir.path(), "Country,\"Pipe\nType\"\nA,Rigid\nB,Flexible\n");
        state.import_file(&path);

        assert!(matches!(state.status, Some(Status::Success(_))));
        assert_eq!(state.table().column_names(), vec!["Country", "Pipe Type"]);
        assert!(state.filters.is_empty());
        assert_eq!(state.filtered.n_rows(), 2);
    }

    #[test]
    fn reupload_aligns_kept_filters_with_new_data() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = state_in(dir.path());
        state.import_file(&upload(dir.path(), "Country,Pipe OD\nA,10\nB,20\nB,30\n"));
        state.set_selection("Country", Selection::Values(["B".to_string()].into()));
        state.set_selection("Pipe OD", Selection::NumberRange { low: 25.0, high: 30.0 });
        assert_eq!(state.filtered.n_rows(), 1);

        state.import_file(&upload(dir.path(), "Country,Pipe OD\nA,5\nC,5\n"));

        assert_eq!(
            state.filters.get("Country"),
            Some(&Selection::Values(Default::default()))
        );
        assert!(state.filters.get("Pipe OD").is_none());
        assert_eq!(state.filtered.n_rows(), 2);
    }

    #[test]
    fn failed_import_keeps_previous_table() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = state_in(dir.path());
        let before = state.table().clone();

        state.import_file(&dir.path().join("lines.txt"));
        assert!(matches!(state.status, Some(Status::Error(_))));
        assert_eq!(state.table(), &before);
    }

    #[test]
    fn invalid_manual_row_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = state_in(dir.path());
        state.new_row.country = "Brazil".into();

        state.add_row();
        assert_eq!(
            state.status,
            Some(Status::Error("Project is a required field".into()))
        );
        assert_eq!(state.table().n_rows(), 0);
        assert_eq!(state.new_row.country, "Brazil");
    }

    #[test]
    fn manual_row_is_appended_and_filterable() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = state_in(dir.path());
        state.new_row.country = "Brazil".into();
        state.new_row.project = "Mero".into();
        state.new_row.pipe_od = 219.1;
        state.add_row();

        assert_eq!(state.table().n_rows(), 1);
        assert!(state.new_row.country.is_empty());
        assert_eq!(
            state.filtered.column("Pipe OD").unwrap().values,
            vec![Value::Number(219.1)]
        );
        assert!(dir.path().join("pipeline_data.csv").exists());
    }

    #[test]
    fn bulk_actions_refilter() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = state_in(dir.path());
        state.import_file(&upload(dir.path(), "Country,Pipe OD\nA,10\nA,20\nB,30\n"));

        state.set_selection("Country", Selection::Values(["B".to_string()].into()));
        assert_eq!(state.filtered.n_rows(), 1);

        state.select_all();
        assert_eq!(state.filtered.n_rows(), 3);

        state.set_selection("Pipe OD", Selection::NumberRange { low: 15.0, high: 30.0 });
        assert_eq!(state.filtered.n_rows(), 2);

        state.clear_all();
        assert!(state.filters.is_empty());
        assert_eq!(state.filtered.n_rows(), 3);
    }

    #[test]
    fn export_writes_filtered_csv() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = state_in(dir.path());
        state.import_file(&upload(dir.path(), "Country,Project\nA,P1\nB,P2\n"));
        state.set_selection("Country", Selection::Values(["A".to_string()].into()));

        let out = dir.path().join("export.csv");
        state.export_filtered(&out);
        assert_eq!(std::fs::read_to_string(out).unwrap(), "Country,Project\nA,P1\n");
    }
}
