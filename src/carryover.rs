//! Week carry-over: seed a newly created week from its nearest
//! predecessor so the operator edits deltas instead of retyping headers
//! and crews.
//!
//! The predecessor is the largest week number strictly below the target —
//! by number, not by position in the list or by calendar date. Only
//! structural documents travel: legacy tables, the pyramid snapshot (or
//! the legacy summary when that is all the predecessor has), and the
//! roster with its hour cells zeroed. Weekly-specific documents (report,
//! incidents, precursors) never carry.
//!
//! Re-running carry-over on the same target re-derives the same result and
//! overwrites it — it does not merge. Callers invoke it once, at week
//! creation, before any manual editing.

use chrono::{DateTime, Utc};

use crate::metrics;
use crate::types::{Project, TablaLibre};

/// What applying carry-over did to the target week.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CarryOverOutcome {
    /// Structural documents were seeded from this predecessor.
    Seeded { source_week: u32 },
    /// No earlier week exists; only the traceability note was written.
    NoPriorData,
    /// The target week is not in the project; nothing was touched.
    TargetNotFound,
}

/// Seed `target_week_number` from the nearest earlier week of `project`.
///
/// `now` stamps the carried pyramid's `savedUtc`; it is an explicit input
/// so the routine stays deterministic under test.
pub fn apply_from_previous(
    project: &mut Project,
    target_week_number: u32,
    now: DateTime<Utc>,
) -> CarryOverOutcome {
    if project.week(target_week_number).is_none() {
        return CarryOverOutcome::TargetNotFound;
    }

    let source_week = project
        .semanas
        .iter()
        .map(|w| w.week_number)
        .filter(|&n| n < target_week_number)
        .max();

    let Some(source_week) = source_week else {
        let target = project
            .week_mut(target_week_number)
            .expect("target checked above");
        if target.notas.is_empty() {
            target.notas = format!("Semana {} creada (sin datos previos)", target_week_number);
        }
        return CarryOverOutcome::NoPriorData;
    };

    // Clone what travels before taking the mutable borrow on the target.
    let source = project.week(source_week).expect("source week exists");
    let tablas: Vec<TablaLibre> = source.tablas.iter().map(carry_table).collect();
    let piramide = source.piramide.clone();
    let resumen = source.resumen_seguridad.clone();
    let personal = source.personal_vigente.clone();

    let target = project
        .week_mut(target_week_number)
        .expect("target checked above");

    if !tablas.is_empty() {
        target.tablas = tablas;
    }

    if let Some(mut p) = piramide {
        p.week_number = target_week_number;
        p.saved_utc = now.to_rfc3339();
        target.piramide = Some(p);
    } else if let Some(mut r) = resumen {
        // Oldest files predate the structured pyramid; clone the loose
        // summary instead so nothing is lost.
        r.week_number = target_week_number;
        r.saved_utc = now.to_rfc3339();
        target.resumen_seguridad = Some(r);
    }

    if let Some(mut doc) = personal {
        for row in &mut doc.personal {
            row.reset_hours();
            // Last week's notes must not silently persist into this week.
            row.observaciones.clear();
        }
        target.personal_vigente = Some(doc);
        target.live = metrics::recalc(target.personal_vigente.as_ref());
    }

    if target.notas.is_empty() {
        target.notas = format!(
            "Semana {} creada a partir de la semana {}",
            target_week_number, source_week
        );
    }

    CarryOverOutcome::Seeded { source_week }
}

/// Clone a legacy table, zeroing every cell that holds time-like or
/// numeric data: headers verbatim, a cell becomes `"0"` when its column
/// name matches the hours heuristic or the cell itself reads as a number.
fn carry_table(table: &TablaLibre) -> TablaLibre {
    let filas = table
        .filas
        .iter()
        .map(|fila| {
            fila.iter()
                .enumerate()
                .map(|(i, cell)| {
                    let column = table.columnas.get(i).map(String::as_str).unwrap_or("");
                    if is_hours_column(column) || numeric_like(cell) {
                        "0".to_string()
                    } else {
                        cell.clone()
                    }
                })
                .collect()
        })
        .collect();

    TablaLibre {
        nombre: table.nombre.clone(),
        columnas: table.columnas.clone(),
        filas,
    }
}

/// Case-insensitive: any column mentioning "hora" or "tiempo", or named
/// exactly "hrs" / "h".
fn is_hours_column(name: &str) -> bool {
    let name = name.trim().to_lowercase();
    name.contains("hora") || name.contains("tiempo") || name == "hrs" || name == "h"
}

/// Locale-tolerant numeric check: `,` is accepted as the decimal
/// separator ("12,5" reads as 12.5). Non-finite spellings do not count.
fn numeric_like(cell: &str) -> bool {
    let t = cell.trim();
    if t.is_empty() {
        return false;
    }
    t.replace(',', ".")
        .parse::<f64>()
        .map(|v| v.is_finite())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pyramid::{PiramideSeguridadDoc, ResumenSeguridadDoc};
    use crate::report::InformeSemanalCmaDoc;
    use crate::roster::{PersonRow, PersonalVigenteDoc};
    use crate::types::{Project, WeekData};
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 17, 9, 30, 0).unwrap()
    }

    fn project_with_weeks(numbers: &[u32]) -> Project {
        let mut project = Project::new("Obra Norte");
        for &n in numbers {
            project.semanas.push(WeekData::new(n));
        }
        project
    }

    fn full_roster() -> PersonalVigenteDoc {
        PersonalVigenteDoc {
            razon_social: "CMA S.A.".to_string(),
            responsable: "R. Díaz".to_string(),
            ruc: "20100123456".to_string(),
            registro_patronal: "RP-889".to_string(),
            direccion: "Av. Industrial 450".to_string(),
            personal: vec![
                PersonRow {
                    no: 1,
                    nombre: "Juan Pérez".to_string(),
                    empresa: "CMA".to_string(),
                    cargo: "Vigía".to_string(),
                    tecnico_seguridad: true,
                    d: 8,
                    l: 8,
                    m: 8,
                    mm: 8,
                    j: 8,
                    v: 8,
                    s: 8,
                    observaciones: "Capacitación pendiente".to_string(),
                },
                PersonRow {
                    no: 2,
                    nombre: "Rosa Quispe".to_string(),
                    empresa: "Subcontrata Sur".to_string(),
                    cargo: "Operaria".to_string(),
                    d: 0,
                    l: 10,
                    m: 10,
                    mm: 10,
                    j: 10,
                    v: 10,
                    s: 0,
                    ..PersonRow::default()
                },
            ],
        }
    }

    #[test]
    fn picks_nearest_predecessor_by_number() {
        let mut project = project_with_weeks(&[3, 5, 7]);
        project.week_mut(5).unwrap().piramide = Some(PiramideSeguridadDoc {
            actos_seguros: 5,
            ..PiramideSeguridadDoc::default()
        });
        project.week_mut(7).unwrap().piramide = Some(PiramideSeguridadDoc {
            actos_seguros: 99,
            ..PiramideSeguridadDoc::default()
        });
        project.semanas.push(WeekData::new(8));

        let outcome = apply_from_previous(&mut project, 8, fixed_now());

        assert_eq!(outcome, CarryOverOutcome::Seeded { source_week: 7 });
        assert_eq!(
            project.week(8).unwrap().piramide.as_ref().unwrap().actos_seguros,
            99
        );
    }

    #[test]
    fn no_predecessor_writes_note_only() {
        let mut project = project_with_weeks(&[4]);

        let outcome = apply_from_previous(&mut project, 4, fixed_now());

        assert_eq!(outcome, CarryOverOutcome::NoPriorData);
        let week = project.week(4).unwrap();
        assert_eq!(week.notas, "Semana 4 creada (sin datos previos)");
        assert!(week.piramide.is_none());
        assert!(week.personal_vigente.is_none());
    }

    #[test]
    fn missing_target_touches_nothing() {
        let mut project = project_with_weeks(&[3]);
        let outcome = apply_from_previous(&mut project, 9, fixed_now());
        assert_eq!(outcome, CarryOverOutcome::TargetNotFound);
        assert!(project.week(3).unwrap().notas.is_empty());
    }

    #[test]
    fn roster_keeps_identity_and_drops_hours() {
        let mut project = project_with_weeks(&[6, 7]);
        project.week_mut(6).unwrap().personal_vigente = Some(full_roster());

        apply_from_previous(&mut project, 7, fixed_now());

        let doc = project.week(7).unwrap().personal_vigente.as_ref().unwrap();
        assert_eq!(doc.razon_social, "CMA S.A.");
        assert_eq!(doc.ruc, "20100123456");

        let juan = &doc.personal[0];
        assert_eq!(juan.no, 1);
        assert_eq!(juan.nombre, "Juan Pérez");
        assert_eq!(juan.empresa, "CMA");
        assert_eq!(juan.cargo, "Vigía");
        assert!(juan.tecnico_seguridad);
        assert_eq!(juan.hh_week(), 0);
        assert_eq!((juan.d, juan.l, juan.m, juan.mm, juan.j, juan.v, juan.s), (0, 0, 0, 0, 0, 0, 0));
        assert!(juan.observaciones.is_empty());

        // Projection follows the seeded roster.
        let live = project.week(7).unwrap().live;
        assert_eq!(live.headcount, 2);
        assert_eq!(live.technicians, 1);
        assert_eq!(live.total_hours, 0);
    }

    #[test]
    fn pyramid_copies_counters_and_retargets_week() {
        let mut project = project_with_weeks(&[9, 10]);
        project.week_mut(9).unwrap().piramide = Some(PiramideSeguridadDoc {
            week_number: 9,
            saved_utc: "2026-08-10T08:00:00+00:00".to_string(),
            actos_seguros: 140,
            lti1: 2,
            dias_sin_accidentes: 73,
            fecha_ultimo_registro: "2026-05-30".to_string(),
            ..PiramideSeguridadDoc::default()
        });

        apply_from_previous(&mut project, 10, fixed_now());

        let p = project.week(10).unwrap().piramide.as_ref().unwrap();
        assert_eq!(p.week_number, 10);
        assert_eq!(p.saved_utc, fixed_now().to_rfc3339());
        assert_eq!(p.actos_seguros, 140);
        assert_eq!(p.lti1, 2);
        assert_eq!(p.dias_sin_accidentes, 73);
        assert_eq!(p.fecha_ultimo_registro, "2026-05-30");
    }

    #[test]
    fn legacy_summary_carries_when_no_pyramid_exists() {
        let mut project = project_with_weeks(&[1, 2]);
        let mut resumen = ResumenSeguridadDoc {
            week_number: 1,
            ..ResumenSeguridadDoc::default()
        };
        resumen
            .valores
            .insert("Actos seguros".to_string(), "44".to_string());
        project.week_mut(1).unwrap().resumen_seguridad = Some(resumen);

        apply_from_previous(&mut project, 2, fixed_now());

        let week = project.week(2).unwrap();
        assert!(week.piramide.is_none());
        let r = week.resumen_seguridad.as_ref().unwrap();
        assert_eq!(r.week_number, 2);
        assert_eq!(r.valores.get("Actos seguros").map(String::as_str), Some("44"));
    }

    #[test]
    fn table_cells_zero_by_column_or_value() {
        let mut project = project_with_weeks(&[2, 3]);
        project.week_mut(2).unwrap().tablas = vec![TablaLibre {
            nombre: "Control".to_string(),
            columnas: vec![
                "Nombre".to_string(),
                "Horas Extra".to_string(),
                "Notas".to_string(),
            ],
            filas: vec![
                vec!["Juan".to_string(), "12".to_string(), "2024".to_string()],
                vec!["Rosa".to_string(), "tarde".to_string(), "ok".to_string()],
            ],
        }];

        apply_from_previous(&mut project, 3, fixed_now());

        let tabla = &project.week(3).unwrap().tablas[0];
        assert_eq!(tabla.columnas[1], "Horas Extra");
        // Hours column zeroes even non-numeric text; numeric heuristic
        // fires regardless of column name.
        assert_eq!(tabla.filas[0], vec!["Juan", "0", "0"]);
        assert_eq!(tabla.filas[1], vec!["Rosa", "0", "ok"]);
    }

    #[test]
    fn comma_decimals_count_as_numeric() {
        assert!(numeric_like("12,5"));
        assert!(numeric_like(" 7 "));
        assert!(numeric_like("-3"));
        assert!(!numeric_like("Juan"));
        assert!(!numeric_like(""));
        assert!(!numeric_like("inf"));
    }

    #[test]
    fn hours_column_heuristic() {
        assert!(is_hours_column("Horas Extra"));
        assert!(is_hours_column("TIEMPO MUERTO"));
        assert!(is_hours_column("HRS"));
        assert!(is_hours_column("h"));
        assert!(!is_hours_column("Hrs totales"));
        assert!(!is_hours_column("Nombre"));
    }

    #[test]
    fn note_references_the_source_week() {
        let mut project = project_with_weeks(&[7, 8]);
        apply_from_previous(&mut project, 8, fixed_now());
        assert_eq!(
            project.week(8).unwrap().notas,
            "Semana 8 creada a partir de la semana 7"
        );
    }

    #[test]
    fn existing_note_is_left_alone_but_documents_still_seed() {
        let mut project = project_with_weeks(&[7, 8]);
        project.week_mut(7).unwrap().personal_vigente = Some(full_roster());
        project.week_mut(8).unwrap().notas = "Revisión especial".to_string();

        apply_from_previous(&mut project, 8, fixed_now());

        let week = project.week(8).unwrap();
        assert_eq!(week.notas, "Revisión especial");
        assert!(week.personal_vigente.is_some());
    }

    #[test]
    fn weekly_specific_documents_never_carry() {
        let mut project = project_with_weeks(&[5, 6]);
        project.week_mut(5).unwrap().informe_semanal = Some(InformeSemanalCmaDoc {
            actos_seguros: 10,
            ..InformeSemanalCmaDoc::default()
        });

        apply_from_previous(&mut project, 6, fixed_now());

        assert!(project.week(6).unwrap().informe_semanal.is_none());
        assert!(project.week(6).unwrap().incidentes.is_none());
        assert!(project.week(6).unwrap().precursores_sif.is_none());
    }

    #[test]
    fn rerun_rederives_and_overwrites_manual_edits() {
        let mut project = project_with_weeks(&[7, 8]);
        project.week_mut(7).unwrap().personal_vigente = Some(full_roster());

        apply_from_previous(&mut project, 8, fixed_now());

        // Operator types hours into the seeded week...
        project
            .week_mut(8)
            .unwrap()
            .personal_vigente
            .as_mut()
            .unwrap()
            .personal[0]
            .l = 9;

        // ...then carry-over runs again: same derivation, edits gone.
        let outcome = apply_from_previous(&mut project, 8, fixed_now());
        assert_eq!(outcome, CarryOverOutcome::Seeded { source_week: 7 });
        let juan = &project.week(8).unwrap().personal_vigente.as_ref().unwrap().personal[0];
        assert_eq!(juan.l, 0);
    }
}
