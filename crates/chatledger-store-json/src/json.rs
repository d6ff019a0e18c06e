use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard},
};

use async_trait::async_trait;
use chatledger_core::{CellRange, CoreError, TabularStore};
use chatledger_domain::{CellValue, Grid};
use chrono::Utc;
use tracing::{debug, info, warn};

use crate::{error::StoreError, workbook::Workbook};

const FILE_EXTENSION: &str = "json";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S%3f";
const BACKUP_DIR_NAME: &str = "backups";
const TMP_SUFFIX: &str = "tmp";
const DEFAULT_RETENTION: usize = 5;

/// A timestamped copy of the workbook file taken before an overwrite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupInfo {
    pub id: String,
    pub path: PathBuf,
}

/// Workbook persisted as a JSON document, rewritten after every mutation.
#[derive(Debug)]
pub struct JsonWorkbookStore {
    path: PathBuf,
    backups_dir: PathBuf,
    retention: usize,
    workbook: Mutex<Workbook>,
}

impl JsonWorkbookStore {
    /// Opens `path`, keeping backups in a `backups` directory next to it.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, CoreError> {
        let path = path.into();
        let backups_dir = path
            .parent()
            .map(|parent| parent.join(BACKUP_DIR_NAME))
            .unwrap_or_else(|| PathBuf::from(BACKUP_DIR_NAME));
        Self::with_retention(path, backups_dir, DEFAULT_RETENTION)
    }

    pub fn with_retention(
        path: impl Into<PathBuf>,
        backups_dir: impl Into<PathBuf>,
        retention: usize,
    ) -> Result<Self, CoreError> {
        let path = path.into();
        let backups_dir = backups_dir.into();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(StoreError::from)?;
        }
        fs::create_dir_all(&backups_dir).map_err(StoreError::from)?;
        let workbook = if path.exists() {
            load_workbook(&path)?
        } else {
            Workbook::new()
        };
        info!(
            path = %path.display(),
            sheets = workbook.sheets().len(),
            "opened workbook"
        );
        Ok(Self {
            path,
            backups_dir,
            retention: retention.max(1),
            workbook: Mutex::new(workbook),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Adds an empty sheet and persists the workbook when it was new.
    pub fn add_sheet(&self, name: &str) -> Result<bool, CoreError> {
        self.mutate(|workbook| Ok(workbook.add_sheet(name)))
    }

    pub fn snapshot(&self) -> Result<Workbook, CoreError> {
        Ok(self.lock()?.clone())
    }

    /// Backups, newest first.
    pub fn list_backups(&self) -> Result<Vec<BackupInfo>, CoreError> {
        if !self.backups_dir.exists() {
            return Ok(Vec::new());
        }
        let prefix = format!("{}_", self.backup_stem());
        let mut entries = Vec::new();
        for entry in fs::read_dir(&self.backups_dir).map_err(StoreError::from)? {
            let path = entry.map_err(StoreError::from)?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(FILE_EXTENSION) {
                continue;
            }
            if let Some(file_name) = path.file_name().and_then(|name| name.to_str()) {
                if file_name.starts_with(&prefix) {
                    entries.push(BackupInfo {
                        id: file_name.to_string(),
                        path: path.clone(),
                    });
                }
            }
        }
        entries.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(entries)
    }

    /// Replaces the live workbook with a backup and persists it.
    pub fn restore_backup(&self, backup: &BackupInfo) -> Result<(), CoreError> {
        if !backup.path.exists() {
            return Err(CoreError::Backend(format!("backup `{}` not found", backup.id)));
        }
        let restored = load_workbook(&backup.path)?;
        self.mutate(move |workbook| {
            *workbook = restored;
            Ok(())
        })
    }

    /// Applies `change` to a copy, persists it, and only then publishes it.
    fn mutate<T>(
        &self,
        change: impl FnOnce(&mut Workbook) -> Result<T, CoreError>,
    ) -> Result<T, CoreError> {
        let mut guard = self.lock()?;
        let mut next = guard.clone();
        let outcome = change(&mut next)?;
        if next != *guard {
            self.persist(&next)?;
            *guard = next;
        }
        Ok(outcome)
    }

    fn persist(&self, workbook: &Workbook) -> Result<(), CoreError> {
        if self.path.exists() {
            self.backup_existing_file()?;
        }
        let data = serde_json::to_string_pretty(workbook).map_err(StoreError::from)?;
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, &data)?;
        fs::rename(&tmp, &self.path).map_err(StoreError::from)?;
        debug!(path = %self.path.display(), "persisted workbook");
        Ok(())
    }

    fn backup_existing_file(&self) -> Result<(), CoreError> {
        fs::create_dir_all(&self.backups_dir).map_err(StoreError::from)?;
        let timestamp = Utc::now().format(BACKUP_TIMESTAMP_FORMAT).to_string();
        let stem = format!("{}_{}", self.backup_stem(), timestamp);
        let mut backup_path = self
            .backups_dir
            .join(format!("{stem}.{FILE_EXTENSION}"));
        let mut attempt = 1;
        while backup_path.exists() {
            backup_path = self
                .backups_dir
                .join(format!("{stem}_{attempt}.{FILE_EXTENSION}"));
            attempt += 1;
        }
        fs::copy(&self.path, &backup_path).map_err(StoreError::from)?;
        self.prune_backups()
    }

    fn prune_backups(&self) -> Result<(), CoreError> {
        for entry in self.list_backups()?.into_iter().skip(self.retention) {
            if let Err(err) = fs::remove_file(&entry.path) {
                warn!(backup = %entry.id, error = %err, "failed to prune backup");
            }
        }
        Ok(())
    }

    fn backup_stem(&self) -> String {
        let stem = self
            .path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("workbook");
        canonical_name(stem)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Workbook>, CoreError> {
        self.workbook
            .lock()
            .map_err(|_| CoreError::from(StoreError::Poisoned))
    }
}

#[async_trait]
impl TabularStore for JsonWorkbookStore {
    async fn list_sheet_names(&self) -> Result<Vec<String>, CoreError> {
        Ok(self.lock()?.sheet_names())
    }

    async fn read_range(&self, sheet: &str, range: &CellRange) -> Result<Grid, CoreError> {
        self.lock()?.read_range(sheet, range)
    }

    async fn append_row(&self, sheet: &str, row: Vec<CellValue>) -> Result<(), CoreError> {
        let row_number = self.mutate(|workbook| workbook.append_row(sheet, row))?;
        debug!(sheet, row = row_number, "appended row");
        Ok(())
    }

    async fn update_range(
        &self,
        sheet: &str,
        range: &CellRange,
        values: Grid,
    ) -> Result<(), CoreError> {
        self.mutate(|workbook| workbook.update_range(sheet, range, values))
    }

    async fn ensure_sheet(&self, sheet: &str, header: Vec<CellValue>) -> Result<bool, CoreError> {
        if self.lock()?.sheet(sheet).is_some() {
            return Ok(false);
        }
        self.mutate(|workbook| Ok(workbook.ensure_sheet(sheet, header)))
    }
}

/// Reads a workbook document from disk.
pub fn load_workbook(path: &Path) -> Result<Workbook, CoreError> {
    let data = fs::read_to_string(path).map_err(StoreError::from)?;
    Ok(serde_json::from_str(&data).map_err(StoreError::from)?)
}

fn canonical_name(name: &str) -> String {
    let sanitized: String = name
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' | '-' => c,
            _ => '_',
        })
        .collect();
    if sanitized.trim_matches('_').is_empty() {
        "workbook".into()
    } else {
        sanitized
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<(), CoreError> {
    let mut file = File::create(path).map_err(StoreError::from)?;
    file.write_all(data.as_bytes()).map_err(StoreError::from)?;
    file.sync_all().map_err(StoreError::from)?;
    Ok(())
}
