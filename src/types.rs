use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::incidents::{IncidentesDoc, PrecursorSifDoc};
use crate::pyramid::{PiramideSeguridadDoc, ResumenSeguridadDoc};
use crate::report::InformeSemanalCmaDoc;
use crate::roster::PersonalVigenteDoc;

/// Configuration stored in ~/.obraseg/config.json
///
/// Read permissively: missing fields take their defaults so a config
/// written by an older build keeps working.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Path of the main database file. Empty means
    /// `~/.obraseg/empresas.json`.
    #[serde(default)]
    pub data_file: String,
    /// Write one roster JSON per (company, project, week) under
    /// `~/.obraseg/rosters/` on every roster save.
    #[serde(default = "default_true")]
    pub sidecar_rosters: bool,
    /// Keep a timestamped copy of the previous database file before each
    /// overwrite.
    #[serde(default = "default_true")]
    pub backup_on_save: bool,
    /// Specialty pre-filled for projects with no cached entry yet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_specialty: Option<String>,
}

impl Config {
    /// Resolve the database file location. An empty `data_file` means the
    /// default file inside the app directory.
    pub fn data_file_path(&self, app_dir: &Path) -> PathBuf {
        if self.data_file.is_empty() {
            app_dir.join("empresas.json")
        } else {
            PathBuf::from(&self.data_file)
        }
    }
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_file: String::new(),
            sidecar_rosters: true,
            backup_on_save: true,
            default_specialty: None,
        }
    }
}

// =============================================================================
// Company tree
// =============================================================================

/// A contracting company. Owns its projects; projects own their weeks.
/// There are no cross-references anywhere in the tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub nombre: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responsable: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ruc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registro_patronal: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direccion: Option<String>,
    #[serde(default)]
    pub proyectos: Vec<Project>,
}

impl Company {
    pub fn new(nombre: impl Into<String>) -> Self {
        Self {
            nombre: nombre.into(),
            responsable: None,
            ruc: None,
            registro_patronal: None,
            direccion: None,
            proyectos: Vec::new(),
        }
    }

    pub fn project(&self, nombre: &str) -> Option<&Project> {
        self.proyectos.iter().find(|p| p.nombre == nombre)
    }

    pub fn project_mut(&mut self, nombre: &str) -> Option<&mut Project> {
        self.proyectos.iter_mut().find(|p| p.nombre == nombre)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub nombre: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub codigo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ubicacion: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub propietario: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fecha_inicio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fecha_fin: Option<String>,
    /// Kept sorted ascending by week number; week numbers are unique
    /// within the project.
    #[serde(default)]
    pub semanas: Vec<WeekData>,
}

impl Project {
    pub fn new(nombre: impl Into<String>) -> Self {
        Self {
            nombre: nombre.into(),
            codigo: None,
            ubicacion: None,
            propietario: None,
            fecha_inicio: None,
            fecha_fin: None,
            semanas: Vec::new(),
        }
    }

    pub fn week(&self, week_number: u32) -> Option<&WeekData> {
        self.semanas.iter().find(|w| w.week_number == week_number)
    }

    pub fn week_mut(&mut self, week_number: u32) -> Option<&mut WeekData> {
        self.semanas
            .iter_mut()
            .find(|w| w.week_number == week_number)
    }

    pub fn latest_week_number(&self) -> Option<u32> {
        self.semanas.iter().map(|w| w.week_number).max()
    }

    /// Restore the sorted-ascending invariant after loads or inserts.
    pub fn sort_weeks(&mut self) {
        self.semanas.sort_by_key(|w| w.week_number);
    }
}

/// One reporting week. Holds at most one document of each kind; documents
/// are created on first edit and replaced wholesale on save.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekData {
    pub week_number: u32,
    #[serde(default)]
    pub notas: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub personal_vigente: Option<PersonalVigenteDoc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub piramide: Option<PiramideSeguridadDoc>,
    /// Pre-pyramid summary kept for old files; superseded by `piramide`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resumen_seguridad: Option<ResumenSeguridadDoc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub informe_semanal: Option<InformeSemanalCmaDoc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precursores_sif: Option<PrecursorSifDoc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub incidentes: Option<IncidentesDoc>,
    /// Legacy free-form tables (name + columns + string rows).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tablas: Vec<TablaLibre>,
    /// Projection of `personal_vigente`; recomputed on load and on every
    /// roster save, never read back from disk.
    #[serde(skip)]
    pub live: LiveMetrics,
}

impl WeekData {
    pub fn new(week_number: u32) -> Self {
        Self {
            week_number,
            notas: String::new(),
            personal_vigente: None,
            piramide: None,
            resumen_seguridad: None,
            informe_semanal: None,
            precursores_sif: None,
            incidentes: None,
            tablas: Vec::new(),
            live: LiveMetrics::default(),
        }
    }
}

// =============================================================================
// Derived + legacy value types
// =============================================================================

/// Read-only summary derived from the personnel roster. Headcount is the
/// row count, hours the sum of every row's week, technicians the count of
/// rows flagged as safety technician.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveMetrics {
    pub headcount: u32,
    pub technicians: u32,
    pub total_hours: u32,
}

/// Legacy free-form table: named columns over string cells. Only the
/// carry-over engine still interprets these.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TablaLibre {
    pub nombre: String,
    #[serde(default)]
    pub columnas: Vec<String>,
    #[serde(default)]
    pub filas: Vec<Vec<String>>,
}
