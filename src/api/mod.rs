//! Remote API boundary.
//!
//! [`FacturaSendApi`] is the seam between the pipeline and the provider:
//! the batch submitter and the status poller only see this trait, so
//! tests drive them with stubs and the `client` feature supplies the real
//! HTTP implementation.

#[cfg(feature = "client")]
mod client;

#[cfg(feature = "client")]
pub use client::ApiClient;

use crate::core::FacturaSendError;
use crate::schema::DocumentoElectronico;

/// Result of a successful lote submission.
#[derive(Debug, Clone)]
pub struct LoteCreado {
    /// Provider-assigned batch identifier.
    pub lote_id: String,
    /// One entry per submitted document, in submission order.
    pub de_list: Vec<DeAsignado>,
}

/// Per-document outcome within an accepted lote.
#[derive(Debug, Clone, Default)]
pub struct DeAsignado {
    /// Electronic-document identifier; absent when the provider returned
    /// no result for this slot.
    pub cdc: Option<String>,
}

/// Result of a per-document status query.
#[derive(Debug, Clone)]
pub struct EstadoConsultado {
    /// Provider status string (`Aprobado`, `Rechazado`, ...).
    pub estado: String,
    pub mensaje: Option<String>,
    pub descripcion: Option<String>,
}

/// The provider's three operations, bearer-authenticated JSON over HTTPS.
///
/// Implementations never retry on their own — retry policy lives entirely
/// in the batch submitter's counter.
#[allow(async_fn_in_trait)]
pub trait FacturaSendApi {
    /// `POST {base}/{tenant}/lote/create` with up to 50 documents.
    async fn crear_lote(
        &self,
        documentos: &[DocumentoElectronico],
    ) -> Result<LoteCreado, FacturaSendError>;

    /// `POST {base}/{tenant}/de/estado` for one CDC.
    async fn consultar_estado(&self, cdc: &str) -> Result<EstadoConsultado, FacturaSendError>;

    /// `POST {base}/{tenant}/de/pdf` — rendered KUDE PDF for the CDCs.
    async fn descargar_kude(&self, cdcs: &[String]) -> Result<Vec<u8>, FacturaSendError>;
}
