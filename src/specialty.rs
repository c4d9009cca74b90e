//! Remembered specialty per project: when the operator sets the crew
//! specialty for a project once, new roster rows prefill with it from
//! then on.
//!
//! This is a convenience cache, not data. It lives outside the database
//! file and every failure is swallowed: a missing or corrupt cache means
//! prefill falls back to the configured default, nothing more.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::util::atomic_write_str;

pub fn specialties_path(app_dir: &Path) -> PathBuf {
    app_dir.join("especialidades.json")
}

#[derive(Debug, Default)]
pub struct SpecialtyCache {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl SpecialtyCache {
    /// Read the cache file if it exists. Corrupt or unreadable files start
    /// an empty cache.
    pub fn open(path: PathBuf) -> Self {
        let entries = match fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(map) => map,
                Err(e) => {
                    log::debug!("Specialty cache unreadable, starting empty: {}", e);
                    BTreeMap::new()
                }
            },
            Err(_) => BTreeMap::new(),
        };
        Self { path, entries }
    }

    pub fn get(&self, empresa: &str, proyecto: &str) -> Option<&str> {
        self.entries.get(&key(empresa, proyecto)).map(String::as_str)
    }

    /// Remember and persist. Persistence is best-effort.
    pub fn set(&mut self, empresa: &str, proyecto: &str, specialty: &str) {
        self.entries
            .insert(key(empresa, proyecto), specialty.to_string());
        self.persist();
    }

    fn persist(&self) {
        let json = match serde_json::to_string_pretty(&self.entries) {
            Ok(j) => j,
            Err(e) => {
                log::debug!("Specialty cache not serializable: {}", e);
                return;
            }
        };
        if let Err(e) = atomic_write_str(&self.path, &json) {
            log::debug!("Specialty cache not written: {}", e);
        }
    }
}

fn key(empresa: &str, proyecto: &str) -> String {
    format!("{}|{}", empresa, proyecto)
}
