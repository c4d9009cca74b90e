//! Pyramid reconciliation for hand-edited database files.
//!
//! The app maintains one invariant the file format cannot express: a
//! week's stored pyramid contains the contribution of that week's stored
//! report exactly once. Editing the JSON by hand can break that — most
//! commonly by lowering a pyramid counter below what the report already
//! rolled in. This tool finds such weeks by backing the stored report out
//! and rolling it back in: a consistent week reproduces itself, a drifted
//! one does not.
//!
//! Dry run by default; pass `--write` to repair the file in place (the
//! previous file is backed up first).
//!
//! Usage: reconcile_pyramids <empresas.json> [--write]

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use chrono::Utc;

use obraseg::error::AppError;
use obraseg::rollup;
use obraseg::store::{self, FixedPath};

fn main() -> ExitCode {
    env_logger::init();

    let mut write = false;
    let mut path: Option<PathBuf> = None;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--write" => write = true,
            other => path = Some(PathBuf::from(other)),
        }
    }
    let Some(path) = path else {
        eprintln!("Usage: reconcile_pyramids <empresas.json> [--write]");
        return ExitCode::from(2);
    };

    match run(&path, write) {
        Ok(0) => {
            println!("All pyramids consistent with their stored reports.");
            ExitCode::SUCCESS
        }
        Ok(drifted) if write => {
            println!("{} week(s) repaired.", drifted);
            ExitCode::SUCCESS
        }
        Ok(drifted) => {
            println!("{} week(s) drifted. Re-run with --write to repair.", drifted);
            ExitCode::from(1)
        }
        Err(e) => {
            eprintln!("{}", e);
            eprintln!("{}", e.recovery_hint());
            ExitCode::from(2)
        }
    }
}

fn run(path: &Path, write: bool) -> Result<usize, AppError> {
    let mut db = store::load_database(path)?;
    let mut drifted = 0usize;

    for company in &mut db.empresas {
        for project in &mut company.proyectos {
            for week in &mut project.semanas {
                let Some(informe) = week.informe_semanal.clone() else {
                    continue;
                };
                let stored = week.piramide.clone().unwrap_or_default();
                let candidate = rollup::add_week(
                    &rollup::remove_week(&stored, Some(&informe)),
                    Some(&informe),
                );
                if candidate == stored {
                    continue;
                }

                drifted += 1;
                println!(
                    "{} / {} week {}: pyramid does not contain its stored report exactly once",
                    company.nombre, project.nombre, week.week_number
                );
                if write {
                    let mut fixed = candidate;
                    fixed.week_number = week.week_number;
                    fixed.saved_utc = Utc::now().to_rfc3339();
                    week.piramide = Some(fixed);
                }
            }
        }
    }

    if write && drifted > 0 {
        store::save_database(
            &mut db,
            Some(path),
            &FixedPath(path.to_path_buf()),
            None,
            true,
            Utc::now(),
        )?;
    }
    Ok(drifted)
}
