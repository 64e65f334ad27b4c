//! Batch validation, conversion, and submission.
//!
//! [`BatchSubmitter::enviar_lote`] is the one public operation that
//! mutates document state: it validates the candidate batch before any
//! side effect, converts the surviving documents, submits them as one
//! lote, and persists the per-document outcome plus an immutable
//! [`BatchLog`]. Partial failure is the normal case — skipped and
//! unconvertible documents never abort the lote.

mod lock;
mod log;

pub use lock::{DocumentLocks, LockGuard};
pub use log::{BatchLog, BatchLogEntry};

use std::collections::HashMap;

use chrono::NaiveDateTime;

use crate::api::FacturaSendApi;
use crate::convert::{ConversionContext, convertir_documento};
use crate::core::{
    ConversionFailure, FacturaSendError, SalesDocument, Settings, SkipReason, TipoDocumento,
};
use crate::host::{DocumentStore, Notifier};
use crate::schema::DocumentoElectronico;

/// Provider-imposed batch ceiling.
pub const MAX_DOCUMENTOS_POR_LOTE: usize = 50;

const SIN_RESPUESTA: &str = "No se recibió respuesta del servidor";

/// Structured result of a successful submission.
#[derive(Debug, Clone)]
pub struct ReciboLote {
    /// Provider-assigned batch identifier.
    pub lote_id: String,
    /// Identifier of the inserted [`BatchLog`].
    pub log_id: String,
    /// Documents handed to the provider.
    pub enviados: usize,
    /// Documents filtered out before conversion, with their reasons.
    pub omitidos: Vec<Omitido>,
    /// Documents that could not be converted; the lote went out without
    /// them.
    pub conversiones_fallidas: Vec<ConversionFailure>,
}

/// One skipped document and why.
#[derive(Debug, Clone)]
pub struct Omitido {
    pub document: String,
    pub motivo: SkipReason,
}

/// Submits candidate batches and tracks per-document outcomes.
pub struct BatchSubmitter<'a, S, A, N> {
    store: &'a S,
    api: &'a A,
    notifier: &'a N,
    settings: &'a Settings,
    locks: &'a DocumentLocks,
}

impl<'a, S, A, N> BatchSubmitter<'a, S, A, N>
where
    S: DocumentStore,
    A: FacturaSendApi,
    N: Notifier,
{
    pub fn new(
        store: &'a S,
        api: &'a A,
        notifier: &'a N,
        settings: &'a Settings,
        locks: &'a DocumentLocks,
    ) -> Self {
        Self {
            store,
            api,
            notifier,
            settings,
            locks,
        }
    }

    /// Validate, convert, and submit one batch of documents.
    ///
    /// Preconditions checked before any conversion or network call: the
    /// batch holds between 1 and 50 documents and all share one document
    /// type. Documents already approved, or in error with the retry
    /// counter exhausted, are skipped without failing the batch.
    pub async fn enviar_lote(&self, names: &[String]) -> Result<ReciboLote, FacturaSendError> {
        if names.is_empty() {
            return Err(FacturaSendError::Validation(
                "No hay documentos para enviar".into(),
            ));
        }
        if names.len() > MAX_DOCUMENTOS_POR_LOTE {
            return Err(FacturaSendError::Validation(format!(
                "No se pueden enviar más de {MAX_DOCUMENTOS_POR_LOTE} documentos a la vez"
            )));
        }

        let documentos: Vec<SalesDocument> = names
            .iter()
            .map(|n| self.store.load_document(n))
            .collect::<Result<_, _>>()?;

        let tipo = documentos[0].tipo();
        if documentos.iter().any(|d| d.tipo() != tipo) {
            return Err(FacturaSendError::Validation(
                "Todos los documentos deben ser del mismo tipo".into(),
            ));
        }

        let _guard = self.locks.try_acquire(names)?;

        let mut omitidos = Vec::new();
        let mut conversiones_fallidas = Vec::new();
        let mut enviables: Vec<(SalesDocument, DocumentoElectronico)> = Vec::new();

        for doc in documentos {
            if let Some(motivo) = doc.tracking.motivo_omision(self.settings.max_reintentos) {
                tracing::debug!(documento = %doc.name, %motivo, "documento omitido del lote");
                omitidos.push(Omitido {
                    document: doc.name.clone(),
                    motivo,
                });
                continue;
            }

            match self.convertir(&doc) {
                Ok(payload) => enviables.push((doc, payload)),
                Err(e) => conversiones_fallidas.push(ConversionFailure {
                    document: doc.name.clone(),
                    reason: e.to_string(),
                }),
            }
        }

        if enviables.is_empty() {
            let mut mensaje = String::from("No hay documentos válidos para enviar");
            if !conversiones_fallidas.is_empty() {
                let detalle: Vec<String> = conversiones_fallidas
                    .iter()
                    .map(ToString::to_string)
                    .collect();
                mensaje.push_str(": ");
                mensaje.push_str(&detalle.join("; "));
            }
            return Err(FacturaSendError::Validation(mensaje));
        }

        let payloads: Vec<DocumentoElectronico> =
            enviables.iter().map(|(_, p)| p.clone()).collect();

        tracing::info!(
            tipo = %tipo,
            cantidad = payloads.len(),
            "enviando lote a FacturaSend"
        );

        match self.api.crear_lote(&payloads).await {
            Ok(lote) => {
                self.registrar_exito(tipo, enviables, lote, omitidos, conversiones_fallidas)
            }
            Err(e @ (FacturaSendError::Transport(_) | FacturaSendError::Application { .. })) => {
                self.registrar_falla(&enviables, &e)?;
                Err(e)
            }
            Err(e) => Err(e),
        }
    }

    /// Resolve a document's context from the store and convert it.
    ///
    /// A failed customer or user read counts as a conversion failure for
    /// that document only; a missing item master just loses its
    /// barcode/NCM enrichment.
    fn convertir(&self, doc: &SalesDocument) -> Result<DocumentoElectronico, FacturaSendError> {
        let customer = self
            .store
            .load_customer(&doc.customer)
            .map_err(|e| FacturaSendError::Conversion(format!("{}: {e}", doc.name)))?;
        let user = self
            .store
            .load_user(&doc.owner)
            .map_err(|e| FacturaSendError::Conversion(format!("{}: {e}", doc.name)))?;

        let mut items = HashMap::new();
        for line in &doc.items {
            if let Ok(registro) = self.store.load_item(&line.item_code) {
                items.insert(line.item_code.clone(), registro);
            }
        }

        convertir_documento(doc, &ConversionContext { customer, user, items }, self.settings)
    }

    fn registrar_exito(
        &self,
        tipo: TipoDocumento,
        enviables: Vec<(SalesDocument, DocumentoElectronico)>,
        lote: crate::api::LoteCreado,
        omitidos: Vec<Omitido>,
        conversiones_fallidas: Vec<ConversionFailure>,
    ) -> Result<ReciboLote, FacturaSendError> {
        let ahora = ahora_local();

        let entradas: Vec<BatchLogEntry> = enviables
            .iter()
            .enumerate()
            .map(|(i, (doc, _))| {
                match lote.de_list.get(i).and_then(|de| de.cdc.clone()) {
                    Some(cdc) => BatchLogEntry {
                        documento: doc.name.clone(),
                        cdc,
                        estado: crate::core::Estado::Enviado,
                        mensaje: String::new(),
                    },
                    None => BatchLogEntry {
                        documento: doc.name.clone(),
                        cdc: String::new(),
                        estado: crate::core::Estado::Error,
                        mensaje: SIN_RESPUESTA.into(),
                    },
                }
            })
            .collect();

        let log = BatchLog {
            lote_id: lote.lote_id.clone(),
            fecha_envio: ahora,
            tipo_documento: tipo,
            cantidad: enviables.len(),
            resumen: format!(
                "Lote {} aceptado: {} documentos",
                lote.lote_id,
                enviables.len()
            ),
            documentos: entradas,
        };
        let log_id = self.store.insert_batch_log(&log)?;

        for (i, (mut doc, _)) in enviables.into_iter().enumerate() {
            match lote.de_list.get(i).and_then(|de| de.cdc.as_deref()) {
                Some(cdc) => doc.tracking.marcar_enviado(cdc, &lote.lote_id, ahora),
                None => doc.tracking.marcar_error(SIN_RESPUESTA),
            }
            self.store.save_tracking(&doc.name, &doc.tracking)?;
        }

        tracing::info!(lote_id = %lote.lote_id, %log_id, "lote registrado");

        Ok(ReciboLote {
            lote_id: lote.lote_id,
            log_id,
            enviados: log.cantidad,
            omitidos,
            conversiones_fallidas,
        })
    }

    /// Drive every submitted document into `Error` and notify if the
    /// tenant asked for it.
    fn registrar_falla(
        &self,
        enviables: &[(SalesDocument, DocumentoElectronico)],
        error: &FacturaSendError,
    ) -> Result<(), FacturaSendError> {
        let mensaje = error.to_string();
        tracing::error!(%mensaje, cantidad = enviables.len(), "falló el envío del lote");

        let mut nombres = Vec::with_capacity(enviables.len());
        for (doc, _) in enviables {
            let mut tracking = doc.tracking.clone();
            tracking.marcar_error(&mensaje);
            self.store.save_tracking(&doc.name, &tracking)?;
            nombres.push(doc.name.clone());
        }

        if self.settings.notificar_errores && !self.settings.correos_notificacion.is_empty() {
            if let Err(e) = self.notifier.notificar_error(&nombres, &mensaje) {
                tracing::warn!(error = %e, "no se pudo enviar la notificación de error");
            }
        }

        Ok(())
    }
}

/// Download the rendered KUDE PDF for a selection of documents.
///
/// Collects the CDCs the documents carry; documents without one are
/// ignored, and a selection with no CDC at all is rejected.
pub async fn descargar_kude<S, A>(
    store: &S,
    api: &A,
    names: &[String],
) -> Result<Vec<u8>, FacturaSendError>
where
    S: DocumentStore,
    A: FacturaSendApi,
{
    let mut cdcs = Vec::new();
    for name in names {
        let doc = store.load_document(name)?;
        if let Some(cdc) = doc.tracking.cdc.filter(|c| !c.is_empty()) {
            cdcs.push(cdc);
        }
    }

    if cdcs.is_empty() {
        return Err(FacturaSendError::Validation(
            "Los documentos seleccionados no tienen CDC".into(),
        ));
    }

    api.descargar_kude(&cdcs).await
}

fn ahora_local() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}
