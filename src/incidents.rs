//! Incident and precursor/SIF logs: ordered free-form records per week.
//!
//! The only structural rule is the `no` column: 1-based, contiguous, in
//! list order. Every insert or delete goes through the doc methods so the
//! numbering is rewritten immediately; `normalize()` repairs files edited
//! by hand.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentesDoc {
    #[serde(default)]
    pub registros: Vec<IncidenteRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidenteRecord {
    #[serde(default)]
    pub no: u32,
    #[serde(default)]
    pub fecha: String,
    #[serde(default)]
    pub nombre: String,
    #[serde(default)]
    pub empresa: String,
    #[serde(default)]
    pub clasificacion: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub descripcion: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub acciones: String,
}

impl IncidentesDoc {
    pub fn push(&mut self, record: IncidenteRecord) {
        self.registros.push(record);
        self.renumber();
    }

    pub fn remove(&mut self, index: usize) -> Option<IncidenteRecord> {
        if index >= self.registros.len() {
            return None;
        }
        let removed = self.registros.remove(index);
        self.renumber();
        Some(removed)
    }

    pub fn renumber(&mut self) {
        for (idx, r) in self.registros.iter_mut().enumerate() {
            r.no = idx as u32 + 1;
        }
    }

    pub fn normalize(&mut self) {
        self.renumber();
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrecursorSifDoc {
    #[serde(default)]
    pub registros: Vec<PrecursorSifRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrecursorSifRecord {
    #[serde(default)]
    pub no: u32,
    #[serde(default)]
    pub fecha: String,
    #[serde(default)]
    pub nombre: String,
    #[serde(default)]
    pub empresa: String,
    /// "conducta" or "condición", as entered.
    #[serde(default)]
    pub clasificacion: String,
    /// Marked when the event could plausibly have been a serious injury
    /// or fatality.
    #[serde(default)]
    pub potencial_sif: bool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub descripcion: String,
}

impl PrecursorSifDoc {
    pub fn push(&mut self, record: PrecursorSifRecord) {
        self.registros.push(record);
        self.renumber();
    }

    pub fn remove(&mut self, index: usize) -> Option<PrecursorSifRecord> {
        if index >= self.registros.len() {
            return None;
        }
        let removed = self.registros.remove(index);
        self.renumber();
        Some(removed)
    }

    pub fn renumber(&mut self) {
        for (idx, r) in self.registros.iter_mut().enumerate() {
            r.no = idx as u32 + 1;
        }
    }

    pub fn normalize(&mut self) {
        self.renumber();
    }
}
