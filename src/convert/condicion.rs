//! Payment condition derivation from a document's installment schedule.

use crate::core::SalesDocument;
use crate::core::extract::{codigo_o, descripcion_moneda};
use crate::schema::{Condicion, Credito, Entrega, Importe, InfoCuota, Monto};

/// Condition type codes.
const CONTADO: i64 = 1;
const CREDITO: i64 = 2;

/// Credit term fallback when the schedule yields no usable span.
const PLAZO_FALLBACK_DIAS: i64 = 30;

/// Build the condición block for a document.
///
/// An installment schedule with at least one entry makes the sale a
/// credit sale; a full-total delivery line is emitted either way. The
/// delivery instrument defaults to efectivo unless the document carries
/// an override.
pub fn construir_condicion(doc: &SalesDocument) -> Condicion {
    let entrega = Entrega {
        tipo: codigo_o(doc.instrumento_pago.as_deref(), 1),
        monto: Monto::para_moneda(doc.grand_total, &doc.currency),
        moneda: doc.currency.clone(),
        moneda_descripcion: descripcion_moneda(&doc.currency).to_string(),
        cambio: 0.0,
    };

    if doc.payment_schedule.is_empty() {
        return Condicion {
            tipo: CONTADO,
            entregas: vec![entrega],
            credito: None,
        };
    }

    let info_cuotas: Vec<InfoCuota> = doc
        .payment_schedule
        .iter()
        .map(|cuota| InfoCuota {
            moneda: doc.currency.clone(),
            monto: Importe::para_moneda(cuota.amount, &doc.currency),
            vencimiento: cuota.due_date.format("%Y-%m-%d").to_string(),
        })
        .collect();

    Condicion {
        tipo: CREDITO,
        entregas: vec![entrega],
        credito: Some(Credito {
            tipo: 1,
            plazo: format!("{} días", plazo_dias(doc)),
            cuotas: doc.payment_schedule.len(),
            monto_entrega: 0.0,
            info_cuotas,
        }),
    }
}

/// Elapsed days between the posting date and the final installment due
/// date; a non-positive span falls back to the fixed 30-day term.
fn plazo_dias(doc: &SalesDocument) -> i64 {
    let ultimo = doc
        .payment_schedule
        .iter()
        .map(|c| c.due_date)
        .max();

    match ultimo {
        Some(vencimiento) => {
            let dias = (vencimiento - doc.posting_date).num_days();
            if dias > 0 { dias } else { PLAZO_FALLBACK_DIAS }
        }
        None => PLAZO_FALLBACK_DIAS,
    }
}
