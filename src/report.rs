//! Weekly CMA report: one row of counters a contractor turns in per week.
//!
//! Two figures are derived and never stored: the weekly total (incidents +
//! precursors + acts) and the safe-act ratio. Injury counters are kept out
//! of the weekly total; they roll into the pyramid instead.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InformeSemanalCmaDoc {
    /// Contractor the row belongs to.
    #[serde(default)]
    pub empresa: String,
    #[serde(default)]
    pub tecnicos: u32,
    #[serde(default)]
    pub colaboradores: u32,
    #[serde(default)]
    pub horas_hombre: u32,
    #[serde(default)]
    pub lti: u32,
    #[serde(default)]
    pub mdi: u32,
    #[serde(default)]
    pub mti: u32,
    #[serde(default)]
    pub tri: u32,
    #[serde(default)]
    pub fai: u32,
    #[serde(default)]
    pub incidentes: u32,
    #[serde(default)]
    pub precursor_conducta: u32,
    #[serde(default)]
    pub precursor_condicion: u32,
    #[serde(default)]
    pub actos_seguros: u32,
    #[serde(default)]
    pub actos_inseguros: u32,
}

impl InformeSemanalCmaDoc {
    /// Weekly activity total: incidents + both precursor kinds + both act
    /// kinds.
    pub fn total_semanal(&self) -> u32 {
        self.incidentes
            + self.precursor_conducta
            + self.precursor_condicion
            + self.actos_seguros
            + self.actos_inseguros
    }

    /// Safe-act ratio in [0,1]. A week with no observed acts counts as
    /// fully safe (1.0) rather than undefined.
    pub fn porcentaje_avance(&self) -> f64 {
        let total_actos = self.actos_seguros + self.actos_inseguros;
        if total_actos == 0 {
            return 1.0;
        }
        f64::from(self.actos_seguros) / f64::from(total_actos)
    }
}
