use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use super::error::StoreError;
use super::loader::{read_csv, write_csv};
use super::model::{Row, Table};

// ---------------------------------------------------------------------------
// DatasetStore – the single-writer CSV snapshot
// ---------------------------------------------------------------------------

/// Owns the current table and its CSV snapshot on disk.
///
/// Every successful mutation is written through before the in-memory table
/// changes, so a failed write leaves both untouched.
#[derive(Debug)]
pub struct DatasetStore {
    path: PathBuf,
    /// Read when `path` does not exist yet; never written.
    seed_path: Option<PathBuf>,
    table: Table,
}

impl DatasetStore {
    /// Open the store and load whatever it currently holds.
    pub fn open(path: impl Into<PathBuf>, seed_path: Option<PathBuf>) -> Self {
        let mut store = DatasetStore {
            path: path.into(),
            seed_path,
            table: Table::default(),
        };
        store.table = store.load();
        store
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    /// The persisted table, else the seed file, else an empty table with
    /// the default columns. Read errors are logged and yield the default.
    pub fn load(&self) -> Table {
        match self.try_load() {
            Ok(table) => table,
            Err(e) => {
                log::error!("Failed to load pipeline data: {e}");
                Table::default_schema()
            }
        }
    }

    /// Like [`load`](Self::load) but reports read errors. A missing file is
    /// not an error.
    pub fn try_load(&self) -> Result<Table, StoreError> {
        if self.path.exists() {
            let table = read_table(&self.path)?;
            log::info!(
                "Loaded {} lines from {}",
                table.n_rows(),
                self.path.display()
            );
            return Ok(table);
        }

        if let Some(seed) = self.seed_path.as_deref().filter(|p| p.exists()) {
            let mut table = read_table(seed)?;
            table.normalize_headers();
            log::info!("Loaded {} seed lines from {}", table.n_rows(), seed.display());
            return Ok(table);
        }

        log::info!("No pipeline data at {}; starting empty", self.path.display());
        Ok(Table::default_schema())
    }

    /// Overwrite the snapshot and the in-memory table with `table`, after
    /// normalizing its column names.
    pub fn replace(&mut self, mut table: Table) -> Result<(), StoreError> {
        table.normalize_headers();
        self.persist(&table)?;
        log::info!(
            "Replaced pipeline data: {} lines, {} columns",
            table.n_rows(),
            table.columns().len()
        );
        self.table = table;
        Ok(())
    }

    /// Append one row (creating any new columns) and persist.
    pub fn append(&mut self, row: Row) -> Result<(), StoreError> {
        let mut table = self.table.clone();
        table.push_row(row);
        self.persist(&table)?;
        log::info!("Appended line {} to pipeline data", table.n_rows());
        self.table = table;
        Ok(())
    }

    /// Write to a temp file next to the snapshot, sync, then rename it into place.
    fn persist(&self, table: &Table) -> Result<(), StoreError> {
        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };

        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(dir).map_err(io_err)?;

        let mut tmp = NamedTempFile::new_in(dir).map_err(io_err)?;
        {
            let mut writer = BufWriter::new(tmp.as_file_mut());
            write_csv(table, &mut writer).map_err(|source| StoreError::Csv {
                path: self.path.clone(),
                source,
            })?;
            writer.flush().map_err(io_err)?;
        }
        tmp.as_file().sync_all().map_err(io_err)?;
        tmp.persist(&self.path).map_err(|e| io_err(e.error))?;
        Ok(())
    }
}

fn read_table(path: &Path) -> Result<Table, StoreError> {
    let file = File::open(path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read_csv(file).map_err(|source| StoreError::Csv {
        path: path.to_path_buf(),
        source,
    })
}
