//! Append-only submission log.
//!
//! A [`BatchLog`] records the fact of one submission attempt — it is
//! inserted once and never updated; live per-document status lives on
//! the documents' tracking fields instead.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::core::{Estado, TipoDocumento};

/// Immutable record of one accepted lote submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchLog {
    /// Provider-assigned batch identifier.
    pub lote_id: String,
    pub fecha_envio: NaiveDateTime,
    pub tipo_documento: TipoDocumento,
    /// Number of documents actually submitted in the lote.
    pub cantidad: usize,
    /// Outcome summary for operators.
    pub resumen: String,
    pub documentos: Vec<BatchLogEntry>,
}

/// Per-document outcome within a logged submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchLogEntry {
    /// Document name/series.
    pub documento: String,
    /// Issued CDC, or empty when the response slot carried none.
    pub cdc: String,
    pub estado: Estado,
    pub mensaje: String,
}
