// Week lifecycle: create with carry-over, annotate, delete.

use chrono::{DateTime, Utc};

use crate::carryover::{self, CarryOverOutcome};
use crate::error::AppError;
use crate::metrics::LiveMetricsEvent;
use crate::state::AppState;
use crate::types::WeekData;

/// Create a week in the project and seed it from its nearest predecessor.
///
/// Week numbers are chosen by the operator and must be unused; creation is
/// the only moment carry-over runs.
pub fn create_week(
    state: &AppState,
    empresa: &str,
    proyecto: &str,
    week_number: u32,
    now: DateTime<Utc>,
) -> Result<CarryOverOutcome, AppError> {
    let (outcome, event) = state.with_db_mut(|db| {
        let project = db.project_mut(empresa, proyecto)?;
        if project.week(week_number).is_some() {
            return Err(AppError::DuplicateWeek(week_number));
        }

        project.semanas.push(WeekData::new(week_number));
        project.sort_weeks();

        let outcome = carryover::apply_from_previous(project, week_number, now);
        let live = project
            .week(week_number)
            .map(|w| w.live)
            .unwrap_or_default();

        log::info!(
            "Week {} created for {}/{}: {:?}",
            week_number,
            empresa,
            proyecto,
            outcome
        );
        Ok((
            outcome,
            LiveMetricsEvent {
                empresa: empresa.to_string(),
                proyecto: proyecto.to_string(),
                week_number,
                metrics: live,
            },
        ))
    })?;

    state.live.publish(event);
    Ok(outcome)
}

/// Replace the free-text note of a week.
pub fn update_notes(
    state: &AppState,
    empresa: &str,
    proyecto: &str,
    week_number: u32,
    notas: &str,
) -> Result<(), AppError> {
    state.with_db_mut(|db| {
        let week = db.week_mut(empresa, proyecto, week_number)?;
        week.notas = notas.to_string();
        Ok(())
    })
}

/// Remove a week outright. Other weeks keep their own stored snapshots;
/// nothing cascades.
pub fn delete_week(
    state: &AppState,
    empresa: &str,
    proyecto: &str,
    week_number: u32,
) -> Result<(), AppError> {
    state.with_db_mut(|db| {
        let project = db.project_mut(empresa, proyecto)?;
        let before = project.semanas.len();
        project.semanas.retain(|w| w.week_number != week_number);
        if project.semanas.len() == before {
            return Err(AppError::UnknownWeek(week_number));
        }
        log::info!("Week {} removed from {}/{}", week_number, empresa, proyecto);
        Ok(())
    })
}
