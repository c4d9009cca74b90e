//! Pyramid rollup: fold a weekly report into a cumulative pyramid
//! snapshot, or fold it back out.
//!
//! Both operations are pure value transforms over exactly nine counters:
//!
//!   report                  pyramid
//!   ----------------------  -------------------------
//!   actos_seguros        →  actos_seguros
//!   actos_inseguros      →  actos_inseguros
//!   precursor_conducta   →  precursores_nivel1
//!   precursor_condicion  →  condiciones_detectadas
//!   incidentes           →  incidentes_sin_lesion1
//!   fai / mti / mdi / lti → fai1 / mti1 / mdi1 / lti1
//!
//! Every other pyramid field (headcount, hours, technicians, progress,
//! territory, effectiveness, near-misses, the 2/3 sub-buckets) is copied
//! verbatim — those are fed from the roster or entered by hand and must
//! never be summed out of a report.
//!
//! The engine does not remember which report is currently folded in. A
//! caller swapping reports removes the old one first, then adds the new
//! one (`services::reports` keys this off the week's stored report).

use crate::pyramid::PiramideSeguridadDoc;
use crate::report::InformeSemanalCmaDoc;

/// Fold `weekly` into `base`. With no report this is the identity copy.
pub fn add_week(
    base: &PiramideSeguridadDoc,
    weekly: Option<&InformeSemanalCmaDoc>,
) -> PiramideSeguridadDoc {
    let mut out = base.clone();
    let Some(w) = weekly else {
        return out;
    };

    out.actos_seguros += w.actos_seguros;
    out.actos_inseguros += w.actos_inseguros;
    out.precursores_nivel1 += w.precursor_conducta;
    out.condiciones_detectadas += w.precursor_condicion;
    out.incidentes_sin_lesion1 += w.incidentes;
    out.fai1 += w.fai;
    out.mti1 += w.mti;
    out.mdi1 += w.mdi;
    out.lti1 += w.lti;

    out
}

/// Inverse of [`add_week`] with saturation: a counter never drops below
/// zero, even when the report was edited upward after it was folded in.
pub fn remove_week(
    effective: &PiramideSeguridadDoc,
    weekly: Option<&InformeSemanalCmaDoc>,
) -> PiramideSeguridadDoc {
    let mut out = effective.clone();
    let Some(w) = weekly else {
        return out;
    };

    out.actos_seguros = out.actos_seguros.saturating_sub(w.actos_seguros);
    out.actos_inseguros = out.actos_inseguros.saturating_sub(w.actos_inseguros);
    out.precursores_nivel1 = out.precursores_nivel1.saturating_sub(w.precursor_conducta);
    out.condiciones_detectadas = out
        .condiciones_detectadas
        .saturating_sub(w.precursor_condicion);
    out.incidentes_sin_lesion1 = out.incidentes_sin_lesion1.saturating_sub(w.incidentes);
    out.fai1 = out.fai1.saturating_sub(w.fai);
    out.mti1 = out.mti1.saturating_sub(w.mti);
    out.mdi1 = out.mdi1.saturating_sub(w.mdi);
    out.lti1 = out.lti1.saturating_sub(w.lti);

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> PiramideSeguridadDoc {
        PiramideSeguridadDoc {
            week_number: 6,
            colaboradores: 48,
            tecnicos: 2,
            horas_hombre: 2100,
            avance_programa_pct: 80,
            territorio_rojo: 3,
            territorio_verde: 9,
            casi_accidentes: 4,
            actos_seguros: 120,
            actos_inseguros: 15,
            precursores_nivel1: 7,
            precursores_nivel2: 2,
            condiciones_detectadas: 30,
            condiciones_corregidas: 25,
            incidentes_sin_lesion1: 5,
            incidentes_sin_lesion2: 1,
            fai1: 3,
            mti1: 2,
            mdi1: 1,
            lti1: 1,
            fecha_ultimo_registro: "2026-07-02".to_string(),
            ..PiramideSeguridadDoc::default()
        }
    }

    fn weekly() -> InformeSemanalCmaDoc {
        InformeSemanalCmaDoc {
            empresa: "CMA".to_string(),
            actos_seguros: 10,
            actos_inseguros: 2,
            precursor_conducta: 3,
            precursor_condicion: 4,
            incidentes: 1,
            fai: 2,
            mti: 1,
            mdi: 1,
            lti: 1,
            // Never folded: totals come from the roster or by hand
            colaboradores: 50,
            tecnicos: 3,
            horas_hombre: 2200,
            tri: 5,
            ..InformeSemanalCmaDoc::default()
        }
    }

    #[test]
    fn add_maps_all_nine_counters() {
        let out = add_week(&base(), Some(&weekly()));
        assert_eq!(out.actos_seguros, 130);
        assert_eq!(out.actos_inseguros, 17);
        assert_eq!(out.precursores_nivel1, 10);
        assert_eq!(out.condiciones_detectadas, 34);
        assert_eq!(out.incidentes_sin_lesion1, 6);
        assert_eq!(out.fai1, 5);
        assert_eq!(out.mti1, 3);
        assert_eq!(out.mdi1, 2);
        assert_eq!(out.lti1, 2);
    }

    #[test]
    fn add_leaves_unmapped_fields_alone() {
        let out = add_week(&base(), Some(&weekly()));
        // Sourced from the roster / manual entry, not from the report.
        assert_eq!(out.colaboradores, 48);
        assert_eq!(out.tecnicos, 2);
        assert_eq!(out.horas_hombre, 2100);
        assert_eq!(out.avance_programa_pct, 80);
        assert_eq!(out.territorio_rojo, 3);
        assert_eq!(out.casi_accidentes, 4);
        assert_eq!(out.precursores_nivel2, 2);
        assert_eq!(out.incidentes_sin_lesion2, 1);
        assert_eq!(out.condiciones_corregidas, 25);
        assert_eq!(out.fecha_ultimo_registro, "2026-07-02");
    }

    #[test]
    fn absence_is_identity_both_ways() {
        assert_eq!(add_week(&base(), None), base());
        assert_eq!(remove_week(&base(), None), base());
    }

    #[test]
    fn remove_undoes_add_when_nothing_clamps() {
        let b = base();
        let w = weekly();
        assert_eq!(remove_week(&add_week(&b, Some(&w)), Some(&w)), b);
    }

    #[test]
    fn remove_saturates_at_zero() {
        let small = PiramideSeguridadDoc {
            actos_seguros: 2,
            ..PiramideSeguridadDoc::default()
        };
        let w = InformeSemanalCmaDoc {
            actos_seguros: 5,
            ..InformeSemanalCmaDoc::default()
        };
        let out = remove_week(&small, Some(&w));
        assert_eq!(out.actos_seguros, 0);
    }

    #[test]
    fn same_inputs_same_outputs() {
        let b = base();
        let w = weekly();
        assert_eq!(add_week(&b, Some(&w)), add_week(&b, Some(&w)));
        assert_eq!(remove_week(&b, Some(&w)), remove_week(&b, Some(&w)));
    }
}
