//! Personnel roster ("personal vigente") document and its side-car files.
//!
//! The roster lives inside the week it belongs to in the main database.
//! Saves additionally mirror it to one JSON per (company, project, week)
//! under `~/.obraseg/rosters/` so crews can be inspected or imported
//! without opening the whole database:
//!   rosters/personal_{Company}_{Project}_sem{NN}.json

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::util::sanitize_for_filesystem;

/// A day-hour cell can never exceed one day.
pub const MAX_DAY_HOURS: u32 = 24;

/// Roster document: company header plus one row per person on site.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalVigenteDoc {
    #[serde(default)]
    pub razon_social: String,
    #[serde(default)]
    pub responsable: String,
    #[serde(default)]
    pub ruc: String,
    #[serde(default)]
    pub registro_patronal: String,
    #[serde(default)]
    pub direccion: String,
    #[serde(default)]
    pub personal: Vec<PersonRow>,
}

/// One person-week. `d..s` are hours worked Sunday through Saturday,
/// clamped to [0,24] each; the weekly total is always derived, never stored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonRow {
    #[serde(default)]
    pub no: u32,
    #[serde(default)]
    pub nombre: String,
    /// Affiliation: the subcontractor the person reports under.
    #[serde(default)]
    pub empresa: String,
    #[serde(default)]
    pub cargo: String,
    #[serde(default)]
    pub tecnico_seguridad: bool,
    #[serde(default)]
    pub d: u32,
    #[serde(default)]
    pub l: u32,
    #[serde(default)]
    pub m: u32,
    #[serde(default)]
    pub mm: u32,
    #[serde(default)]
    pub j: u32,
    #[serde(default)]
    pub v: u32,
    #[serde(default)]
    pub s: u32,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub observaciones: String,
}

impl PersonRow {
    /// Weekly hours: sum of the seven day cells. Unbounded above by design;
    /// only the per-day cells are capped.
    pub fn hh_week(&self) -> u32 {
        self.d + self.l + self.m + self.mm + self.j + self.v + self.s
    }

    /// Cap every day cell at 24. Out-of-range input is corrected, not
    /// rejected.
    pub fn clamp_hours(&mut self) {
        self.d = self.d.min(MAX_DAY_HOURS);
        self.l = self.l.min(MAX_DAY_HOURS);
        self.m = self.m.min(MAX_DAY_HOURS);
        self.mm = self.mm.min(MAX_DAY_HOURS);
        self.j = self.j.min(MAX_DAY_HOURS);
        self.v = self.v.min(MAX_DAY_HOURS);
        self.s = self.s.min(MAX_DAY_HOURS);
    }

    /// Zero all seven day cells. Used by carry-over to keep a row's
    /// identity while dropping last week's hours.
    pub fn reset_hours(&mut self) {
        self.d = 0;
        self.l = 0;
        self.m = 0;
        self.mm = 0;
        self.j = 0;
        self.v = 0;
        self.s = 0;
    }
}

impl PersonalVigenteDoc {
    /// Restore invariants after a load or a wholesale edit: day cells in
    /// range, `no` contiguous from 1.
    pub fn normalize(&mut self) {
        for row in &mut self.personal {
            row.clamp_hours();
        }
        self.renumber();
    }

    /// Rewrite `no` to 1..=len in current order.
    pub fn renumber(&mut self) {
        for (idx, row) in self.personal.iter_mut().enumerate() {
            row.no = idx as u32 + 1;
        }
    }
}

// =============================================================================
// Side-car files
// =============================================================================

/// Envelope for a roster side-car file — self-describing so a file found
/// loose in the directory can still be attributed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterSidecar {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub empresa: String,
    #[serde(default)]
    pub proyecto: String,
    #[serde(default)]
    pub week_number: u32,
    #[serde(default)]
    pub saved_utc: String,
    pub personal: PersonalVigenteDoc,
}

fn default_version() -> u32 {
    1
}

/// Deterministic side-car path for a (company, project, week) key.
pub fn sidecar_path(app_dir: &Path, empresa: &str, proyecto: &str, week_number: u32) -> PathBuf {
    app_dir.join("rosters").join(format!(
        "personal_{}_{}_sem{:02}.json",
        sanitize_for_filesystem(empresa),
        sanitize_for_filesystem(proyecto),
        week_number
    ))
}

/// Write the roster side-car for one week. Creates `rosters/` on demand.
pub fn write_sidecar(
    app_dir: &Path,
    empresa: &str,
    proyecto: &str,
    week_number: u32,
    doc: &PersonalVigenteDoc,
) -> Result<PathBuf, AppError> {
    let path = sidecar_path(app_dir, empresa, proyecto, week_number);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| AppError::WriteFailed {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    let envelope = RosterSidecar {
        version: 1,
        empresa: empresa.to_string(),
        proyecto: proyecto.to_string(),
        week_number,
        saved_utc: chrono::Utc::now().to_rfc3339(),
        personal: doc.clone(),
    };

    let content =
        serde_json::to_string_pretty(&envelope).map_err(AppError::SerializeFailed)?;
    crate::util::atomic_write_str(&path, &content).map_err(|e| AppError::WriteFailed {
        path: path.clone(),
        source: e,
    })?;

    Ok(path)
}

/// Read a roster side-car back. Hour cells are re-clamped on the way in.
pub fn read_sidecar(
    app_dir: &Path,
    empresa: &str,
    proyecto: &str,
    week_number: u32,
) -> Result<PersonalVigenteDoc, AppError> {
    let path = sidecar_path(app_dir, empresa, proyecto, week_number);
    let content = std::fs::read_to_string(&path).map_err(|e| AppError::ReadFailed {
        path: path.clone(),
        source: e,
    })?;
    let envelope: RosterSidecar =
        serde_json::from_str(&content).map_err(|e| AppError::ParseFailed {
            path: path.clone(),
            source: e,
        })?;

    let mut doc = envelope.personal;
    doc.normalize();
    Ok(doc)
}
