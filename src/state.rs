//! Application state: the open database, its save fingerprint, the
//! loaded config, and the small per-project caches. One instance lives
//! for the whole process; the UI shell hands it to every service call.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};

use crate::error::AppError;
use crate::metrics::LiveMetricsHub;
use crate::specialty::{specialties_path, SpecialtyCache};
use crate::store::{self, Database, PathPicker, SaveOutcome};
use crate::types::Config;
use crate::util::atomic_write_str;

pub struct AppState {
    app_dir: PathBuf,
    pub config: Mutex<Option<Config>>,
    pub db: Mutex<Option<Database>>,
    /// Fingerprint of the last content written to the data file. Saves
    /// with a matching fingerprint skip the disk.
    pub last_saved_hash: Mutex<Option<String>>,
    pub specialties: Mutex<SpecialtyCache>,
    /// Fan-out for roster projection changes; screens subscribe here.
    pub live: LiveMetricsHub,
}

impl AppState {
    /// State rooted at the per-user app directory, `~/.obraseg`.
    pub fn new() -> Result<Self, AppError> {
        let home = dirs::home_dir().ok_or(AppError::NoHomeDir)?;
        Ok(Self::at_app_dir(home.join(".obraseg")))
    }

    /// Build state rooted at an explicit app directory. Tests and the
    /// maintenance tools use this to stay out of the real home.
    pub fn at_app_dir(app_dir: PathBuf) -> Self {
        let config = match load_config(&app_dir) {
            Ok(c) => Some(c),
            Err(e) => {
                log::warn!("Could not load config: {}. Using defaults until saved.", e);
                None
            }
        };
        let specialties = SpecialtyCache::open(specialties_path(&app_dir));

        Self {
            app_dir,
            config: Mutex::new(config),
            db: Mutex::new(None),
            last_saved_hash: Mutex::new(None),
            specialties: Mutex::new(specialties),
            live: LiveMetricsHub::new(),
        }
    }

    pub fn app_dir(&self) -> &Path {
        &self.app_dir
    }

    /// Current config, defaulted when none has been saved yet.
    pub fn current_config(&self) -> Config {
        self.config
            .lock()
            .map(|guard| guard.clone().unwrap_or_default())
            .unwrap_or_default()
    }

    /// Run `f` against the open database.
    pub fn with_db<R>(&self, f: impl FnOnce(&Database) -> Result<R, AppError>) -> Result<R, AppError> {
        let guard = self.db.lock().map_err(|_| AppError::LockPoisoned)?;
        let db = guard.as_ref().ok_or(AppError::NoDatabase)?;
        f(db)
    }

    /// Run `f` against the open database with mutation rights.
    pub fn with_db_mut<R>(
        &self,
        f: impl FnOnce(&mut Database) -> Result<R, AppError>,
    ) -> Result<R, AppError> {
        let mut guard = self.db.lock().map_err(|_| AppError::LockPoisoned)?;
        let db = guard.as_mut().ok_or(AppError::NoDatabase)?;
        f(db)
    }

    /// Open the database at `path`, or start an empty one when the file
    /// does not exist yet. A freshly loaded file counts as already saved.
    pub fn open_database(&self, path: &Path) -> Result<(), AppError> {
        let (db, hash) = if path.exists() {
            let db = store::load_database(path)?;
            let hash = store::content_hash(&db)?;
            (db, Some(hash))
        } else {
            log::info!("No database at {}, starting empty", path.display());
            (Database::new(), None)
        };

        *self.db.lock().map_err(|_| AppError::LockPoisoned)? = Some(db);
        *self.last_saved_hash.lock().map_err(|_| AppError::LockPoisoned)? = hash;
        Ok(())
    }

    /// Save the open database to its configured location, skipping the
    /// disk when nothing changed since the last write.
    pub fn save_database(&self, now: DateTime<Utc>) -> Result<SaveOutcome, AppError> {
        let config = self.current_config();
        let target = config.data_file_path(&self.app_dir);
        let last = self
            .last_saved_hash
            .lock()
            .map_err(|_| AppError::LockPoisoned)?
            .clone();

        let mut guard = self.db.lock().map_err(|_| AppError::LockPoisoned)?;
        let db = guard.as_mut().ok_or(AppError::NoDatabase)?;

        // Target is always resolved, so no picker can be consulted here.
        let outcome = store::save_database(
            db,
            Some(&target),
            &store::FixedPath(target.clone()),
            last.as_deref(),
            config.backup_on_save,
            now,
        )?;

        if let SaveOutcome::Saved { content_hash, .. } = &outcome {
            *self.last_saved_hash.lock().map_err(|_| AppError::LockPoisoned)? =
                Some(content_hash.clone());
        }
        Ok(outcome)
    }

    /// Write a copy of the open database wherever the picker points.
    /// Ignores the skip fingerprint and leaves it untouched: exporting is
    /// not saving.
    pub fn export_database_as(
        &self,
        picker: &dyn PathPicker,
        now: DateTime<Utc>,
    ) -> Result<SaveOutcome, AppError> {
        let mut guard = self.db.lock().map_err(|_| AppError::LockPoisoned)?;
        let db = guard.as_mut().ok_or(AppError::NoDatabase)?;
        store::save_database(db, None, picker, None, false, now)
    }

    /// Specialty to prefill for a project: the remembered one, else the
    /// configured default.
    pub fn specialty_for(&self, empresa: &str, proyecto: &str) -> Option<String> {
        if let Ok(cache) = self.specialties.lock() {
            if let Some(s) = cache.get(empresa, proyecto) {
                return Some(s.to_string());
            }
        }
        self.current_config().default_specialty
    }

    pub fn remember_specialty(&self, empresa: &str, proyecto: &str, specialty: &str) {
        if let Ok(mut cache) = self.specialties.lock() {
            cache.set(empresa, proyecto, specialty);
        }
    }
}

/// Canonical config file location inside the app directory.
pub fn config_path(app_dir: &Path) -> PathBuf {
    app_dir.join("config.json")
}

/// Create the app directory tree. Idempotent; never touches files.
pub fn initialize_app_dirs(app_dir: &Path) -> Result<(), AppError> {
    for dir in [app_dir.to_path_buf(), app_dir.join("rosters")] {
        if !dir.exists() {
            fs::create_dir_all(&dir).map_err(|source| AppError::WriteFailed {
                path: dir.clone(),
                source,
            })?;
        }
    }
    Ok(())
}

/// Load configuration. A missing file is first-run, not an error.
pub fn load_config(app_dir: &Path) -> Result<Config, AppError> {
    let path = config_path(app_dir);
    if !path.exists() {
        return Ok(Config::default());
    }

    let content = fs::read_to_string(&path).map_err(|source| AppError::ReadFailed {
        path: path.clone(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| AppError::ParseFailed { path, source })
}

/// Create or update config.json.
///
/// Clones the in-memory config (or starts from defaults on first run),
/// applies the mutator, writes the result, then swaps it in-memory.
pub fn create_or_update_config(
    state: &AppState,
    mutator: impl FnOnce(&mut Config),
) -> Result<Config, AppError> {
    let mut guard = state.config.lock().map_err(|_| AppError::LockPoisoned)?;

    let mut config = guard.clone().unwrap_or_default();
    mutator(&mut config);

    let path = config_path(state.app_dir());
    if let Some(parent) = path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent).map_err(|source| AppError::WriteFailed {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }

    let content = serde_json::to_string_pretty(&config).map_err(AppError::SerializeFailed)?;
    atomic_write_str(&path, &content).map_err(|source| AppError::WriteFailed {
        path: path.clone(),
        source,
    })?;

    *guard = Some(config.clone());
    log::info!("Config written to {}", path.display());
    Ok(config)
}

/// Re-read config.json and swap it in-memory.
pub fn reload_config(state: &AppState) -> Result<Config, AppError> {
    let config = load_config(state.app_dir())?;
    let mut guard = state.config.lock().map_err(|_| AppError::LockPoisoned)?;
    *guard = Some(config.clone());
    Ok(config)
}
