// Weekly report and pyramid editing. The stored pyramid is the effective
// snapshot: it already contains the contribution of the stored report, so
// replacing a report rolls the old one out before the new one rolls in.

use chrono::{DateTime, Utc};

use crate::error::AppError;
use crate::incidents::{IncidentesDoc, PrecursorSifDoc};
use crate::pyramid::PiramideSeguridadDoc;
use crate::report::InformeSemanalCmaDoc;
use crate::rollup;
use crate::state::AppState;

/// Store the week's report and fold its counters into the pyramid.
///
/// Any previously stored report for the week is backed out first, so
/// saving twice never double-counts. A week without a pyramid gets one.
pub fn save_weekly_report(
    state: &AppState,
    empresa: &str,
    proyecto: &str,
    week_number: u32,
    informe: InformeSemanalCmaDoc,
    now: DateTime<Utc>,
) -> Result<(), AppError> {
    state.with_db_mut(|db| {
        let week = db.week_mut(empresa, proyecto, week_number)?;

        let base = week.piramide.clone().unwrap_or_default();
        let rolled_back = rollup::remove_week(&base, week.informe_semanal.as_ref());
        let mut updated = rollup::add_week(&rolled_back, Some(&informe));
        updated.week_number = week_number;
        updated.saved_utc = now.to_rfc3339();

        week.piramide = Some(updated);
        week.informe_semanal = Some(informe);
        log::info!(
            "Weekly report stored for {}/{} week {}",
            empresa,
            proyecto,
            week_number
        );
        Ok(())
    })
}

/// Drop the week's report and back its counters out of the pyramid.
/// Weeks without a report are left as they are.
pub fn delete_weekly_report(
    state: &AppState,
    empresa: &str,
    proyecto: &str,
    week_number: u32,
    now: DateTime<Utc>,
) -> Result<(), AppError> {
    state.with_db_mut(|db| {
        let week = db.week_mut(empresa, proyecto, week_number)?;
        let Some(previous) = week.informe_semanal.take() else {
            return Ok(());
        };
        if let Some(p) = &week.piramide {
            let mut rolled = rollup::remove_week(p, Some(&previous));
            rolled.saved_utc = now.to_rfc3339();
            week.piramide = Some(rolled);
        }
        log::info!(
            "Weekly report removed from {}/{} week {}",
            empresa,
            proyecto,
            week_number
        );
        Ok(())
    })
}

/// Store a hand-edited pyramid verbatim. The dialog shows the effective
/// snapshot, so whatever the operator accepts becomes the new snapshot —
/// including the lateral fields no report ever writes.
pub fn save_pyramid(
    state: &AppState,
    empresa: &str,
    proyecto: &str,
    week_number: u32,
    mut doc: PiramideSeguridadDoc,
    now: DateTime<Utc>,
) -> Result<(), AppError> {
    doc.normalize();
    doc.week_number = week_number;
    doc.saved_utc = now.to_rfc3339();
    state.with_db_mut(|db| {
        db.week_mut(empresa, proyecto, week_number)?.piramide = Some(doc);
        Ok(())
    })
}

/// Commit the incident log for a week. Record numbers are rewritten to a
/// clean 1..n sequence on the way in.
pub fn save_incidentes(
    state: &AppState,
    empresa: &str,
    proyecto: &str,
    week_number: u32,
    mut doc: IncidentesDoc,
) -> Result<(), AppError> {
    doc.normalize();
    state.with_db_mut(|db| {
        db.week_mut(empresa, proyecto, week_number)?.incidentes = Some(doc);
        Ok(())
    })
}

/// Commit the precursor log for a week, renumbered like the incident log.
pub fn save_precursores(
    state: &AppState,
    empresa: &str,
    proyecto: &str,
    week_number: u32,
    mut doc: PrecursorSifDoc,
) -> Result<(), AppError> {
    doc.normalize();
    state.with_db_mut(|db| {
        db.week_mut(empresa, proyecto, week_number)?.precursores_sif = Some(doc);
        Ok(())
    })
}
