use thiserror::Error;

/// Errors produced by the conversion and submission pipeline.
///
/// The taxonomy mirrors how failures propagate: `Validation` rejects a
/// batch before any side effect, `Conversion` is isolated to a single
/// document, `Transport`/`Application` fail the whole submission, and
/// `Persistence` is fatal to the current operation.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FacturaSendError {
    /// The batch itself is malformed (size, mixed document types).
    #[error("lote inválido: {0}")]
    Validation(String),

    /// One document could not be mapped to the provider schema.
    #[error("conversión fallida: {0}")]
    Conversion(String),

    /// Network failure, timeout, or non-2xx HTTP response.
    #[error("error de transporte: {0}")]
    Transport(String),

    /// The provider answered 2xx but flagged the request as failed.
    #[error("la API rechazó la solicitud: {message}")]
    Application {
        /// Provider-supplied top-level error message, verbatim.
        message: String,
        /// Per-item errors (`errores[{index, error}]`), verbatim.
        errores: Vec<ItemError>,
    },

    /// The host store failed to read or write.
    #[error("error de persistencia: {0}")]
    Persistence(String),

    /// Another operation holds the lock for one of the documents.
    #[error("documento en proceso: {0}")]
    Locked(String),
}

/// One entry of the provider's `errores` array: the position of the
/// offending document within the submitted lote plus its message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemError {
    /// Zero-based position within the submitted batch.
    pub index: usize,
    /// Provider error message, verbatim.
    pub error: String,
}

impl std::fmt::Display for ItemError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.index, self.error)
    }
}

/// A per-document conversion failure collected while assembling a batch.
///
/// These never abort the lote; they surface in the submission receipt so
/// the caller can tell them apart from skipped documents.
#[derive(Debug, Clone)]
pub struct ConversionFailure {
    /// Document name/series (e.g. `FC-001-001-0000123`).
    pub document: String,
    /// Why the document could not be converted.
    pub reason: String,
}

impl std::fmt::Display for ConversionFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.document, self.reason)
    }
}
