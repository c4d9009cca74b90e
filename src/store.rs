//! Single-file persistence for the whole company tree.
//!
//! The on-disk format is one pretty-printed JSON document: a root object
//! with `schemaVersion`, `exportedUtc`, and the `empresas` array. Loading
//! is all-or-nothing but field-permissive — unknown keys are ignored and
//! missing ones take their defaults, so files written by newer or older
//! builds still open. Every load normalizes the tree: weeks sorted, day
//! hours clamped, record numbers made contiguous, live metrics recomputed.
//!
//! Saving hashes the content first and skips the disk entirely when
//! nothing changed since the last write. The actual write goes through a
//! temp file in the destination directory and renames over the target, so
//! a crash mid-save never leaves a half-written database behind.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::AppError;
use crate::metrics;
use crate::types::{Company, Project, WeekData};
use crate::util::atomic_write_str;

/// Version written into every saved file. Readers accept anything and
/// rely on permissive parsing; the number exists for forensics.
pub const SCHEMA_VERSION: u32 = 2;

/// Suggested filename when the user has not configured a fixed path.
pub const DEFAULT_FILE_NAME: &str = "empresas.json";

fn legacy_schema_version() -> u32 {
    // Files from before the version stamp existed.
    1
}

// ============================================================================
// Root document
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Database {
    #[serde(default = "legacy_schema_version")]
    pub schema_version: u32,
    #[serde(default)]
    pub exported_utc: String,
    #[serde(default)]
    pub empresas: Vec<Company>,
}

impl Database {
    pub fn new() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            exported_utc: String::new(),
            empresas: Vec::new(),
        }
    }

    pub fn company(&self, nombre: &str) -> Result<&Company, AppError> {
        self.empresas
            .iter()
            .find(|c| c.nombre == nombre)
            .ok_or_else(|| AppError::UnknownCompany(nombre.to_string()))
    }

    pub fn company_mut(&mut self, nombre: &str) -> Result<&mut Company, AppError> {
        self.empresas
            .iter_mut()
            .find(|c| c.nombre == nombre)
            .ok_or_else(|| AppError::UnknownCompany(nombre.to_string()))
    }

    pub fn project(&self, empresa: &str, proyecto: &str) -> Result<&Project, AppError> {
        self.company(empresa)?
            .project(proyecto)
            .ok_or_else(|| AppError::UnknownProject(proyecto.to_string()))
    }

    pub fn project_mut(&mut self, empresa: &str, proyecto: &str) -> Result<&mut Project, AppError> {
        self.company_mut(empresa)?
            .project_mut(proyecto)
            .ok_or_else(|| AppError::UnknownProject(proyecto.to_string()))
    }

    pub fn week(&self, empresa: &str, proyecto: &str, week_number: u32) -> Result<&WeekData, AppError> {
        self.project(empresa, proyecto)?
            .week(week_number)
            .ok_or(AppError::UnknownWeek(week_number))
    }

    pub fn week_mut(
        &mut self,
        empresa: &str,
        proyecto: &str,
        week_number: u32,
    ) -> Result<&mut WeekData, AppError> {
        self.project_mut(empresa, proyecto)?
            .week_mut(week_number)
            .ok_or(AppError::UnknownWeek(week_number))
    }

    /// Repair every derived or bounded value in the tree. Runs after load
    /// so hand-edited files come up consistent.
    pub fn normalize(&mut self) {
        for company in &mut self.empresas {
            for project in &mut company.proyectos {
                project.sort_weeks();
                for week in &mut project.semanas {
                    if let Some(roster) = &mut week.personal_vigente {
                        roster.normalize();
                    }
                    if let Some(piramide) = &mut week.piramide {
                        piramide.normalize();
                    }
                    if let Some(incidentes) = &mut week.incidentes {
                        incidentes.normalize();
                    }
                    if let Some(precursores) = &mut week.precursores_sif {
                        precursores.normalize();
                    }
                    week.live = metrics::recalc(week.personal_vigente.as_ref());
                }
            }
        }
    }

    fn week_count(&self) -> usize {
        self.empresas
            .iter()
            .flat_map(|c| &c.proyectos)
            .map(|p| p.semanas.len())
            .sum()
    }
}

// ============================================================================
// Load / save
// ============================================================================

/// Fingerprint of the saveable content. Deliberately excludes the export
/// timestamp so re-stamping alone never forces a write.
pub fn content_hash(db: &Database) -> Result<String, AppError> {
    let body = serde_json::to_string(&db.empresas).map_err(AppError::SerializeFailed)?;
    Ok(hex::encode(Sha256::digest(body.as_bytes())))
}

pub fn load_database(path: &Path) -> Result<Database, AppError> {
    let content = fs::read_to_string(path).map_err(|source| AppError::ReadFailed {
        path: path.to_path_buf(),
        source,
    })?;

    let mut db: Database =
        serde_json::from_str(&content).map_err(|source| AppError::ParseFailed {
            path: path.to_path_buf(),
            source,
        })?;
    db.normalize();

    log::info!(
        "Loaded {}: {} companies, {} weeks (schema v{})",
        path.display(),
        db.empresas.len(),
        db.week_count(),
        db.schema_version
    );
    Ok(db)
}

/// How a save attempt ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Written to disk. `content_hash` is the fingerprint of what landed,
    /// to be remembered for the next skip check.
    Saved { path: PathBuf, content_hash: String },
    /// Content matches the last write; disk untouched.
    Unchanged,
    /// The user backed out of the destination dialog; disk untouched.
    Cancelled,
}

/// Where "save as" destinations come from. The desktop shell backs this
/// with the native file dialog; tests and headless tools use [`FixedPath`].
pub trait PathPicker {
    /// The chosen destination, or `None` when the user backs out.
    fn pick_save_path(&self, suggested_name: &str) -> Option<PathBuf>;
}

/// Always picks the same path.
pub struct FixedPath(pub PathBuf);

impl PathPicker for FixedPath {
    fn pick_save_path(&self, _suggested_name: &str) -> Option<PathBuf> {
        Some(self.0.clone())
    }
}

/// Persist the tree.
///
/// `target` is the configured data file, if any; without one the picker is
/// asked. `last_saved_hash` is the fingerprint of the previous write; a
/// matching fingerprint skips every side effect, including the picker.
pub fn save_database(
    db: &mut Database,
    target: Option<&Path>,
    picker: &dyn PathPicker,
    last_saved_hash: Option<&str>,
    backup_on_save: bool,
    now: DateTime<Utc>,
) -> Result<SaveOutcome, AppError> {
    let hash = content_hash(db)?;
    if last_saved_hash == Some(hash.as_str()) {
        log::debug!("Save skipped: content unchanged");
        return Ok(SaveOutcome::Unchanged);
    }

    let path = match target {
        Some(p) => p.to_path_buf(),
        None => match picker.pick_save_path(DEFAULT_FILE_NAME) {
            Some(p) => p,
            None => {
                log::info!("Save cancelled by user");
                return Ok(SaveOutcome::Cancelled);
            }
        },
    };

    if backup_on_save && path.exists() {
        backup_previous(&path, now);
    }

    db.schema_version = SCHEMA_VERSION;
    db.exported_utc = now.to_rfc3339();

    let json = serde_json::to_string_pretty(db).map_err(AppError::SerializeFailed)?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|source| AppError::WriteFailed {
                path: path.clone(),
                source,
            })?;
        }
    }
    atomic_write_str(&path, &json).map_err(|source| AppError::WriteFailed {
        path: path.clone(),
        source,
    })?;

    log::info!(
        "Saved {} companies, {} weeks to {}",
        db.empresas.len(),
        db.week_count(),
        path.display()
    );
    Ok(SaveOutcome::Saved {
        path,
        content_hash: hash,
    })
}

/// Copy the current file aside before overwriting it. Losing the backup
/// must not lose the save, so failures only warn.
fn backup_previous(path: &Path, now: DateTime<Utc>) {
    let name = match path.file_name() {
        Some(n) => n.to_string_lossy().to_string(),
        None => return,
    };
    let backup_name = format!("{}.{}.bak", name, now.format("%Y%m%d-%H%M%S"));
    let backup_path = path.with_file_name(backup_name);
    match fs::copy(path, &backup_path) {
        Ok(_) => log::info!("Previous database backed up to {}", backup_path.display()),
        Err(e) => log::warn!("Backup of {} failed: {}", path.display(), e),
    }
}
