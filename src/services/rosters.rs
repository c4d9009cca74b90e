// Roster editing: wholesale commit per week, live projection, optional
// per-week sidecar file.

use crate::error::AppError;
use crate::metrics::{self, LiveMetricsEvent};
use crate::roster::{self, PersonRow, PersonalVigenteDoc};
use crate::state::AppState;
use crate::types::LiveMetrics;

/// Commit the edited roster for a week. The whole document replaces
/// whatever was stored; there is no row-level merge. Returns the fresh
/// projection.
pub fn save_roster(
    state: &AppState,
    empresa: &str,
    proyecto: &str,
    week_number: u32,
    mut doc: PersonalVigenteDoc,
) -> Result<LiveMetrics, AppError> {
    doc.normalize();

    let live = state.with_db_mut(|db| {
        let week = db.week_mut(empresa, proyecto, week_number)?;
        week.personal_vigente = Some(doc.clone());
        week.live = metrics::recalc(week.personal_vigente.as_ref());
        Ok(week.live)
    })?;

    // The sidecar is a convenience copy; losing it never fails the save.
    if state.current_config().sidecar_rosters {
        match roster::write_sidecar(state.app_dir(), empresa, proyecto, week_number, &doc) {
            Ok(path) => log::debug!("Roster sidecar written to {}", path.display()),
            Err(e) => log::warn!("Roster sidecar not written: {}", e),
        }
    }

    state.live.publish(LiveMetricsEvent {
        empresa: empresa.to_string(),
        proyecto: proyecto.to_string(),
        week_number,
        metrics: live,
    });
    Ok(live)
}

/// Blank row for the add-person action: next running number, specialty
/// prefilled from the project's remembered pick or the configured default.
pub fn template_row(
    state: &AppState,
    empresa: &str,
    proyecto: &str,
    existing_rows: usize,
) -> PersonRow {
    PersonRow {
        no: existing_rows as u32 + 1,
        cargo: state.specialty_for(empresa, proyecto).unwrap_or_default(),
        ..PersonRow::default()
    }
}
