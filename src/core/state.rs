//! Per-document submission state machine.
//!
//! `Pendiente → Enviado → {Aprobado | Rechazado}`, with `Error` reachable
//! from `Pendiente`/`Enviado` on a failed submission and an explicit
//! `Error → Pendiente` reset. `Aprobado` is terminal: an approved document
//! is never resubmitted.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::types::Tracking;

/// Submission state of one sales document.
///
/// The serialized labels are the exact strings the provider and the host
/// UI use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Estado {
    #[default]
    Pendiente,
    Enviado,
    Aprobado,
    Rechazado,
    Error,
}

impl Estado {
    /// Map a provider status string onto the local state.
    ///
    /// Anything other than the two settled outcomes leaves the document
    /// in `Enviado`.
    pub fn desde_consulta(estado: &str) -> Self {
        match estado {
            "Aprobado" => Self::Aprobado,
            "Rechazado" => Self::Rechazado,
            _ => Self::Enviado,
        }
    }
}

impl std::fmt::Display for Estado {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Pendiente => "Pendiente",
            Self::Enviado => "Enviado",
            Self::Aprobado => "Aprobado",
            Self::Rechazado => "Rechazado",
            Self::Error => "Error",
        };
        f.write_str(s)
    }
}

/// Why a document was left out of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Already approved; approved documents are never resubmitted.
    YaAprobado,
    /// In `Error` with the retry counter at the configured maximum.
    ReintentosAgotados,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::YaAprobado => f.write_str("ya aprobado"),
            Self::ReintentosAgotados => f.write_str("reintentos agotados"),
        }
    }
}

impl Tracking {
    /// Whether the batch submitter must leave this document out.
    pub fn motivo_omision(&self, max_reintentos: u32) -> Option<SkipReason> {
        match self.estado {
            Estado::Aprobado => Some(SkipReason::YaAprobado),
            Estado::Error if self.reintentos >= max_reintentos => {
                Some(SkipReason::ReintentosAgotados)
            }
            _ => None,
        }
    }

    /// Record a successful hand-off to the provider.
    pub fn marcar_enviado(&mut self, cdc: &str, lote_id: &str, ahora: NaiveDateTime) {
        self.estado = Estado::Enviado;
        self.cdc = Some(cdc.to_string());
        self.lote_id = Some(lote_id.to_string());
        self.fecha_envio = Some(ahora);
        self.mensaje_estado = Some(format!("Enviado exitosamente. CDC: {cdc}"));
    }

    /// Record a failed submission.
    ///
    /// The retry counter increments only when the document was already in
    /// `Error` (a failed resubmission); a fresh failure initializes it
    /// to 1.
    pub fn marcar_error(&mut self, mensaje: &str) {
        self.reintentos = if self.estado == Estado::Error {
            self.reintentos + 1
        } else {
            1
        };
        self.estado = Estado::Error;
        self.mensaje_estado = Some(mensaje.to_string());
    }

    /// Apply a status-poll outcome.
    pub fn aplicar_consulta(&mut self, estado: &str, mensaje: Option<&str>) {
        self.estado = Estado::desde_consulta(estado);
        if let Some(m) = mensaje {
            self.mensaje_estado = Some(m.to_string());
        }
    }

    /// Explicit `Error → Pendiente` reset.
    ///
    /// The retry counter survives the reset so the configured maximum
    /// keeps binding across resets.
    pub fn reiniciar(&mut self) {
        if self.estado == Estado::Error {
            self.estado = Estado::Pendiente;
            self.mensaje_estado = None;
        }
    }
}
