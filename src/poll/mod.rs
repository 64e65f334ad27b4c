//! Periodic status reconciliation.
//!
//! One tick of the host scheduler: query the provider for every document
//! still in `Enviado` and advance its state. Each document is queried
//! individually by CDC; a failed query is logged and the tick moves on.

use crate::api::FacturaSendApi;
use crate::batch::DocumentLocks;
use crate::core::{Estado, FacturaSendError};
use crate::host::DocumentStore;

/// Upper bound on remote queries per tick.
pub const MAX_CONSULTAS_POR_CICLO: usize = 100;

/// Tally of one poll tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResumenConsulta {
    /// Documents whose status was fetched.
    pub consultados: usize,
    pub aprobados: usize,
    pub rechazados: usize,
    /// Fetched but still in an intermediate provider state.
    pub sin_cambio: usize,
    /// Queries that failed; the documents stay as they were.
    pub fallidos: usize,
    /// Documents held by a concurrent operation, skipped this tick.
    pub ocupados: usize,
}

/// Run one status-poll tick.
///
/// Selects at most [`MAX_CONSULTAS_POR_CICLO`] documents in `Enviado`
/// with a known CDC. Only persistence failures abort the tick.
pub async fn revisar_estados<S, A>(
    store: &S,
    api: &A,
    locks: &DocumentLocks,
) -> Result<ResumenConsulta, FacturaSendError>
where
    S: DocumentStore,
    A: FacturaSendApi,
{
    let mut resumen = ResumenConsulta::default();

    for mut doc in store.sent_documents(MAX_CONSULTAS_POR_CICLO)? {
        let Some(cdc) = doc.tracking.cdc.clone().filter(|c| !c.is_empty()) else {
            continue;
        };

        let Some(_guard) = locks.try_acquire_one(&doc.name) else {
            resumen.ocupados += 1;
            continue;
        };

        match api.consultar_estado(&cdc).await {
            Ok(consulta) => {
                doc.tracking
                    .aplicar_consulta(&consulta.estado, consulta.mensaje.as_deref());
                match doc.tracking.estado {
                    Estado::Aprobado => resumen.aprobados += 1,
                    Estado::Rechazado => resumen.rechazados += 1,
                    _ => resumen.sin_cambio += 1,
                }
                store.save_tracking(&doc.name, &doc.tracking)?;
                resumen.consultados += 1;
            }
            Err(e) => {
                tracing::warn!(documento = %doc.name, %cdc, error = %e, "consulta de estado fallida");
                resumen.fallidos += 1;
            }
        }
    }

    tracing::info!(
        consultados = resumen.consultados,
        aprobados = resumen.aprobados,
        rechazados = resumen.rechazados,
        fallidos = resumen.fallidos,
        "ciclo de consulta de estados completado"
    );

    Ok(resumen)
}
