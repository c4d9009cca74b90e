// Read-only assembly for the tree pane and the project dashboard.
// Everything here is derived on demand from the open database; nothing
// is cached or written back.

use serde::Serialize;

use crate::error::AppError;
use crate::state::AppState;
use crate::types::{LiveMetrics, WeekData};

/// One line of the project dashboard.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekSummary {
    pub week_number: u32,
    pub notas: String,
    pub live: LiveMetrics,
    pub has_roster: bool,
    pub has_piramide: bool,
    pub has_informe: bool,
    pub incident_count: usize,
    pub precursor_count: usize,
    /// Weekly activity total from the stored report, when there is one.
    pub total_semanal: Option<u32>,
    /// Share of safe acts from the stored report, 0.0..=1.0.
    pub avance: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSummary {
    pub empresa: String,
    pub proyecto: String,
    pub weeks: Vec<WeekSummary>,
}

/// One project row of the company view.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectOverview {
    pub proyecto: String,
    pub week_count: usize,
    pub latest_week: Option<u32>,
    /// Projection of the latest week, zeros when the project is empty.
    pub latest_live: LiveMetrics,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanySummary {
    pub empresa: String,
    pub projects: Vec<ProjectOverview>,
}

fn week_summary(week: &WeekData) -> WeekSummary {
    WeekSummary {
        week_number: week.week_number,
        notas: week.notas.clone(),
        live: week.live,
        has_roster: week.personal_vigente.is_some(),
        has_piramide: week.piramide.is_some(),
        has_informe: week.informe_semanal.is_some(),
        incident_count: week
            .incidentes
            .as_ref()
            .map(|d| d.registros.len())
            .unwrap_or(0),
        precursor_count: week
            .precursores_sif
            .as_ref()
            .map(|d| d.registros.len())
            .unwrap_or(0),
        total_semanal: week.informe_semanal.as_ref().map(|i| i.total_semanal()),
        avance: week.informe_semanal.as_ref().map(|i| i.porcentaje_avance()),
    }
}

/// All weeks of a project, in stored (ascending) order.
pub fn project_summary(
    state: &AppState,
    empresa: &str,
    proyecto: &str,
) -> Result<ProjectSummary, AppError> {
    state.with_db(|db| {
        let project = db.project(empresa, proyecto)?;
        Ok(ProjectSummary {
            empresa: empresa.to_string(),
            proyecto: proyecto.to_string(),
            weeks: project.semanas.iter().map(week_summary).collect(),
        })
    })
}

/// Every project of a company with its latest-week projection.
pub fn company_summary(state: &AppState, empresa: &str) -> Result<CompanySummary, AppError> {
    state.with_db(|db| {
        let company = db.company(empresa)?;
        let projects = company
            .proyectos
            .iter()
            .map(|p| {
                let latest_week = p.latest_week_number();
                let latest_live = latest_week
                    .and_then(|n| p.week(n))
                    .map(|w| w.live)
                    .unwrap_or_default();
                ProjectOverview {
                    proyecto: p.nombre.clone(),
                    week_count: p.semanas.len(),
                    latest_week,
                    latest_live,
                }
            })
            .collect();
        Ok(CompanySummary {
            empresa: empresa.to_string(),
            projects,
        })
    })
}

/// Names of every company, for the tree root.
pub fn company_names(state: &AppState) -> Result<Vec<String>, AppError> {
    state.with_db(|db| Ok(db.empresas.iter().map(|c| c.nombre.clone()).collect()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::InformeSemanalCmaDoc;
    use crate::roster::{PersonRow, PersonalVigenteDoc};
    use crate::services::{entities, reports, rosters, weeks};
    use crate::store::Database;
    use chrono::{TimeZone, Utc};

    fn populated_state() -> (tempfile::TempDir, AppState) {
        let dir = tempfile::tempdir().expect("tempdir");
        let state = AppState::at_app_dir(dir.path().to_path_buf());
        *state.db.lock().unwrap() = Some(Database::new());
        let now = Utc.with_ymd_and_hms(2026, 8, 17, 9, 30, 0).unwrap();

        entities::add_company(&state, "CMA").unwrap();
        entities::add_project(&state, "CMA", "Obra Norte").unwrap();
        weeks::create_week(&state, "CMA", "Obra Norte", 1, now).unwrap();
        weeks::create_week(&state, "CMA", "Obra Norte", 2, now).unwrap();

        rosters::save_roster(
            &state,
            "CMA",
            "Obra Norte",
            2,
            PersonalVigenteDoc {
                personal: vec![PersonRow {
                    nombre: "Ana".to_string(),
                    tecnico_seguridad: true,
                    l: 8,
                    m: 8,
                    ..PersonRow::default()
                }],
                ..PersonalVigenteDoc::default()
            },
        )
        .unwrap();
        reports::save_weekly_report(
            &state,
            "CMA",
            "Obra Norte",
            2,
            InformeSemanalCmaDoc {
                incidentes: 1,
                actos_seguros: 9,
                actos_inseguros: 1,
                ..InformeSemanalCmaDoc::default()
            },
            now,
        )
        .unwrap();
        (dir, state)
    }

    #[test]
    fn project_summary_reflects_stored_documents() {
        let (_dir, state) = populated_state();
        let summary = project_summary(&state, "CMA", "Obra Norte").expect("summary");

        assert_eq!(summary.weeks.len(), 2);
        let week1 = &summary.weeks[0];
        assert!(!week1.has_roster);
        assert_eq!(week1.total_semanal, None);

        let week2 = &summary.weeks[1];
        assert!(week2.has_roster);
        assert!(week2.has_piramide);
        assert!(week2.has_informe);
        assert_eq!(week2.live.total_hours, 16);
        // 1 incident + 9 safe + 1 unsafe acts.
        assert_eq!(week2.total_semanal, Some(11));
        assert_eq!(week2.avance, Some(0.9));
    }

    #[test]
    fn company_summary_tracks_latest_week() {
        let (_dir, state) = populated_state();
        entities::add_project(&state, "CMA", "Obra Vacía").unwrap();

        let summary = company_summary(&state, "CMA").expect("summary");
        assert_eq!(summary.projects.len(), 2);

        let norte = &summary.projects[0];
        assert_eq!(norte.latest_week, Some(2));
        assert_eq!(norte.latest_live.headcount, 1);

        let vacia = &summary.projects[1];
        assert_eq!(vacia.latest_week, None);
        assert_eq!(vacia.latest_live, LiveMetrics::default());
    }

    #[test]
    fn summaries_serialize_in_camel_case() {
        let (_dir, state) = populated_state();
        let summary = project_summary(&state, "CMA", "Obra Norte").unwrap();
        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains("\"weekNumber\""));
        assert!(json.contains("\"hasRoster\""));
        assert!(json.contains("\"totalSemanal\""));
    }
}
