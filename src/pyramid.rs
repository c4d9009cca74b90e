//! Safety pyramid snapshot: the cumulative counter block one week carries.
//!
//! Counters are unsigned on purpose — a negative count is unrepresentable
//! in memory, and a hand-edited negative in a JSON file fails the load
//! like any other corrupt document. Only the program-progress percentage
//! needs clamping.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub const MAX_AVANCE_PCT: u32 = 100;

/// Cumulative pyramid snapshot for one week. Groups, top to bottom of the
/// printed pyramid: lateral/general indicators, base indicators, center
/// indicators, incidents without injury, and the four injury severities
/// (FAI/MTI/MDI/LTI) across three sub-buckets each.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PiramideSeguridadDoc {
    #[serde(default)]
    pub week_number: u32,
    #[serde(default)]
    pub saved_utc: String,

    // Lateral
    #[serde(default)]
    pub empresas: u32,
    #[serde(default)]
    pub colaboradores: u32,
    #[serde(default)]
    pub tecnicos: u32,
    #[serde(default)]
    pub horas_hombre: u32,
    #[serde(default)]
    pub dias_sin_accidentes: u32,
    /// Date of the last recorded incident, kept as entered.
    #[serde(default)]
    pub fecha_ultimo_registro: String,

    // Base
    #[serde(default)]
    pub actos_seguros: u32,
    #[serde(default)]
    pub actos_inseguros: u32,
    #[serde(default)]
    pub condiciones_detectadas: u32,
    #[serde(default)]
    pub condiciones_corregidas: u32,
    #[serde(default)]
    pub avance_programa_pct: u32,
    #[serde(default)]
    pub efectividad: u32,
    #[serde(default)]
    pub territorio_rojo: u32,
    #[serde(default)]
    pub territorio_verde: u32,

    // Center
    #[serde(default)]
    pub casi_accidentes: u32,
    #[serde(default)]
    pub precursores_nivel1: u32,
    #[serde(default)]
    pub precursores_nivel2: u32,
    #[serde(default)]
    pub precursores_nivel3: u32,

    // Incidents without injury
    #[serde(default)]
    pub incidentes_sin_lesion1: u32,
    #[serde(default)]
    pub incidentes_sin_lesion2: u32,

    // Injuries by severity, three sub-buckets each
    #[serde(default)]
    pub fai1: u32,
    #[serde(default)]
    pub fai2: u32,
    #[serde(default)]
    pub fai3: u32,
    #[serde(default)]
    pub mti1: u32,
    #[serde(default)]
    pub mti2: u32,
    #[serde(default)]
    pub mti3: u32,
    #[serde(default)]
    pub mdi1: u32,
    #[serde(default)]
    pub mdi2: u32,
    #[serde(default)]
    pub mdi3: u32,
    #[serde(default)]
    pub lti1: u32,
    #[serde(default)]
    pub lti2: u32,
    #[serde(default)]
    pub lti3: u32,
}

impl PiramideSeguridadDoc {
    /// Clamp the progress percentage into [0,100]. The other fields need
    /// no correction; `u32` already rules out negatives.
    pub fn normalize(&mut self) {
        self.avance_programa_pct = self.avance_programa_pct.min(MAX_AVANCE_PCT);
    }
}

/// Pre-pyramid safety summary: loose name → value pairs from the oldest
/// files. Never written for new weeks; carry-over still clones it when a
/// predecessor has nothing newer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumenSeguridadDoc {
    #[serde(default)]
    pub week_number: u32,
    #[serde(default)]
    pub saved_utc: String,
    #[serde(default)]
    pub valores: BTreeMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_all_zeroes() {
        let doc = PiramideSeguridadDoc::default();
        assert_eq!(doc.actos_seguros, 0);
        assert_eq!(doc.lti3, 0);
        assert_eq!(doc.fecha_ultimo_registro, "");
    }

    #[test]
    fn missing_counters_default_on_read() {
        let doc: PiramideSeguridadDoc =
            serde_json::from_str(r#"{"weekNumber":3,"actosSeguros":5}"#).unwrap();
        assert_eq!(doc.week_number, 3);
        assert_eq!(doc.actos_seguros, 5);
        assert_eq!(doc.actos_inseguros, 0);
        assert_eq!(doc.fai1, 0);
    }

    #[test]
    fn normalize_clamps_progress_pct() {
        let mut doc = PiramideSeguridadDoc {
            avance_programa_pct: 140,
            ..PiramideSeguridadDoc::default()
        };
        doc.normalize();
        assert_eq!(doc.avance_programa_pct, 100);

        doc.avance_programa_pct = 85;
        doc.normalize();
        assert_eq!(doc.avance_programa_pct, 85);
    }

    #[test]
    fn negative_counter_fails_the_load() {
        let result: Result<PiramideSeguridadDoc, _> =
            serde_json::from_str(r#"{"actosSeguros":-2}"#);
        assert!(result.is_err());
    }

    #[test]
    fn resumen_roundtrips_its_value_map() {
        let mut doc = ResumenSeguridadDoc {
            week_number: 2,
            ..ResumenSeguridadDoc::default()
        };
        doc.valores.insert("Actos".to_string(), "12".to_string());
        doc.valores.insert("Notas".to_string(), "ok".to_string());

        let json = serde_json::to_string(&doc).unwrap();
        let back: ResumenSeguridadDoc = serde_json::from_str(&json).unwrap();
        assert_eq!(back, doc);
    }
}
