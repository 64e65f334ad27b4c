//! Boundary traits for the host ERP.
//!
//! The ERP owns documents, customers, items, and users, and provides
//! persistence, scheduling, and email. This crate only talks to those
//! capabilities through the traits here; its own storage footprint is the
//! [`Tracking`] block on each document plus the append-only batch log.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::batch::BatchLog;
use crate::core::{
    Customer, Estado, FacturaSendError, ItemRecord, SalesDocument, TipoDocumento, UserProfile,
};

/// Read/write access to the host's document store.
///
/// All mutation goes through the host's own transactional guarantees;
/// failures surface as [`FacturaSendError::Persistence`] and abort the
/// current operation.
pub trait DocumentStore {
    fn load_document(&self, name: &str) -> Result<SalesDocument, FacturaSendError>;
    fn load_customer(&self, key: &str) -> Result<Customer, FacturaSendError>;
    fn load_user(&self, key: &str) -> Result<UserProfile, FacturaSendError>;
    fn load_item(&self, code: &str) -> Result<ItemRecord, FacturaSendError>;

    /// Persist the tracking annotations of one document.
    fn save_tracking(
        &self,
        name: &str,
        tracking: &crate::core::Tracking,
    ) -> Result<(), FacturaSendError>;

    /// Insert an immutable batch log record; returns its identifier.
    fn insert_batch_log(&self, log: &BatchLog) -> Result<String, FacturaSendError>;

    /// Documents in `Enviado` state, for the status poller. Bounded by
    /// `limit` to keep the remote-call fan-out of one tick in check.
    fn sent_documents(&self, limit: usize) -> Result<Vec<SalesDocument>, FacturaSendError>;

    /// All submitted sales documents, for the pending-documents query.
    fn submitted_documents(&self) -> Result<Vec<SalesDocument>, FacturaSendError>;
}

/// Outbound notification channel (the host's email dispatch).
pub trait Notifier {
    /// Notify the configured recipients that a submission failed.
    fn notificar_error(
        &self,
        documentos: &[String],
        mensaje: &str,
    ) -> Result<(), FacturaSendError>;
}

/// Filter for the pending-documents listing.
#[derive(Debug, Clone, Default)]
pub struct PendingFilter {
    pub tipo: Option<TipoDocumento>,
    pub desde: Option<NaiveDate>,
    pub hasta: Option<NaiveDate>,
}

/// One row of the pending-documents listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingSummary {
    pub name: String,
    pub customer: String,
    pub posting_date: NaiveDate,
    pub grand_total: Decimal,
    pub currency: String,
    pub tipo: TipoDocumento,
    pub estado: Estado,
    pub cdc: Option<String>,
    pub lote_id: Option<String>,
    pub mensaje_estado: Option<String>,
}

/// List submitted documents matching the filter, newest first.
///
/// This is the queue view operators pick batches from; it reports the
/// tracking fields alongside the document identity.
pub fn documentos_pendientes<S: DocumentStore>(
    store: &S,
    filtro: &PendingFilter,
) -> Result<Vec<PendingSummary>, FacturaSendError> {
    let mut rows: Vec<PendingSummary> = store
        .submitted_documents()?
        .into_iter()
        .filter(|doc| filtro.tipo.is_none_or(|t| doc.tipo() == t))
        .filter(|doc| filtro.desde.is_none_or(|d| doc.posting_date >= d))
        .filter(|doc| filtro.hasta.is_none_or(|h| doc.posting_date <= h))
        .map(|doc| PendingSummary {
            tipo: doc.tipo(),
            estado: doc.tracking.estado,
            cdc: doc.tracking.cdc.clone(),
            lote_id: doc.tracking.lote_id.clone(),
            mensaje_estado: doc.tracking.mensaje_estado.clone(),
            name: doc.name,
            customer: doc.customer,
            posting_date: doc.posting_date,
            grand_total: doc.grand_total,
            currency: doc.currency,
        })
        .collect();

    rows.sort_by(|a, b| b.posting_date.cmp(&a.posting_date));
    Ok(rows)
}
