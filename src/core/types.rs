use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use super::state::Estado;

/// Provider document classification.
///
/// The host stores all three kinds in one sales-document table and
/// distinguishes them by the `is_return`/`is_debit_note` flags; this enum
/// is the single tagged form every code path works with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TipoDocumento {
    /// 1 — Factura electrónica.
    Factura,
    /// 4 — Nota de débito electrónica.
    NotaDebito,
    /// 5 — Nota de crédito electrónica.
    NotaCredito,
}

impl TipoDocumento {
    /// Classify from the host's document flags.
    pub fn clasificar(is_return: bool, is_debit_note: bool) -> Self {
        if is_return && !is_debit_note {
            Self::NotaCredito
        } else if is_debit_note {
            Self::NotaDebito
        } else {
            Self::Factura
        }
    }

    /// Provider numeric code (`tipoDocumento`).
    pub fn codigo(&self) -> i64 {
        match self {
            Self::Factura => 1,
            Self::NotaDebito => 4,
            Self::NotaCredito => 5,
        }
    }

    /// Parse from the provider numeric code.
    pub fn from_codigo(codigo: i64) -> Option<Self> {
        match codigo {
            1 => Some(Self::Factura),
            4 => Some(Self::NotaDebito),
            5 => Some(Self::NotaCredito),
            _ => None,
        }
    }
}

impl std::fmt::Display for TipoDocumento {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let nombre = match self {
            Self::Factura => "Factura",
            Self::NotaDebito => "Nota de Débito",
            Self::NotaCredito => "Nota de Crédito",
        };
        f.write_str(nombre)
    }
}

/// A submitted sales document as read from the host ERP.
///
/// The ERP owns and persists these; this crate only reads them and writes
/// back the [`Tracking`] block. Coded attributes arrive as the host stores
/// them — `"1 - Normal"` style strings — and are resolved at conversion
/// time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesDocument {
    /// Naming series, e.g. `FC-001-001-0000123`.
    pub name: String,
    /// Customer key in the host store.
    pub customer: String,
    /// Issuing user key in the host store.
    pub owner: String,
    pub posting_date: NaiveDate,
    pub grand_total: Decimal,
    /// ISO 4217 currency code.
    pub currency: String,
    #[serde(default)]
    pub is_return: bool,
    #[serde(default)]
    pub is_debit_note: bool,
    pub items: Vec<DocumentLine>,
    /// Installment schedule; non-empty means a credit sale.
    #[serde(default)]
    pub payment_schedule: Vec<Installment>,
    /// Payment instrument override for the delivery line (coded).
    #[serde(default)]
    pub instrumento_pago: Option<String>,
    #[serde(default)]
    pub descripcion: Option<String>,
    #[serde(default)]
    pub observacion: Option<String>,
    #[serde(default)]
    pub tipo_emision: Option<String>,
    #[serde(default)]
    pub tipo_transaccion: Option<String>,
    #[serde(default)]
    pub tipo_impuesto: Option<String>,
    #[serde(default)]
    pub presencia: Option<String>,
    /// Submission-tracking annotations owned by this crate.
    #[serde(default)]
    pub tracking: Tracking,
}

impl SalesDocument {
    /// Classification of this document from its flags.
    pub fn tipo(&self) -> TipoDocumento {
        TipoDocumento::clasificar(self.is_return, self.is_debit_note)
    }
}

/// The annotation fields this crate owns on a sales document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Tracking {
    #[serde(default)]
    pub estado: Estado,
    /// Electronic-document identifier issued by the provider.
    #[serde(default)]
    pub cdc: Option<String>,
    /// Provider-assigned batch identifier of the last submission.
    #[serde(default)]
    pub lote_id: Option<String>,
    /// Human-readable status message.
    #[serde(default)]
    pub mensaje_estado: Option<String>,
    #[serde(default)]
    pub fecha_envio: Option<NaiveDateTime>,
    /// Failed-submission counter; see [`Tracking::marcar_error`].
    #[serde(default)]
    pub reintentos: u32,
}

/// One line of a sales document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentLine {
    pub item_code: String,
    pub item_name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub qty: Decimal,
    /// Unit price in the document currency.
    pub rate: Decimal,
    /// Coded unit of measure; unset means the generic unit (77).
    #[serde(default)]
    pub unidad_medida: Option<String>,
    /// Coded IVA type; unset means the standard 10% regime.
    #[serde(default)]
    pub iva_tipo: Option<String>,
    #[serde(default)]
    pub iva_base: Option<i64>,
    /// IVA rate percentage.
    #[serde(default)]
    pub iva: Option<i64>,
}

/// One entry of a document's installment schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Installment {
    pub due_date: NaiveDate,
    pub amount: Decimal,
}

/// Customer master data as stored by the host.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    /// Internal key; last-resort source for the derived client code.
    pub key: String,
    pub customer_name: String,
    #[serde(default)]
    pub nombre_fantasia: Option<String>,
    /// Taxpayer flag. The host stores this loosely (checkbox integer or
    /// boolean); both deserialize, and unset means taxpayer.
    #[serde(default = "default_true", deserialize_with = "de_flag")]
    pub contribuyente: bool,
    #[serde(default)]
    pub ruc: Option<String>,
    /// Coded identity-document type (non-taxpayers).
    #[serde(default)]
    pub documento_tipo: Option<String>,
    #[serde(default)]
    pub documento_numero: Option<String>,
    #[serde(default)]
    pub tipo_operacion: Option<String>,
    #[serde(default)]
    pub tipo_contribuyente: Option<String>,
    #[serde(default)]
    pub pais: Option<String>,
    #[serde(default)]
    pub pais_descripcion: Option<String>,
    #[serde(default)]
    pub direccion: Option<String>,
    #[serde(default)]
    pub numero_casa: Option<String>,
    #[serde(default)]
    pub departamento: Option<String>,
    #[serde(default)]
    pub departamento_descripcion: Option<String>,
    #[serde(default)]
    pub distrito: Option<String>,
    #[serde(default)]
    pub distrito_descripcion: Option<String>,
    #[serde(default)]
    pub ciudad: Option<String>,
    #[serde(default)]
    pub ciudad_descripcion: Option<String>,
    #[serde(default)]
    pub telefono: Option<String>,
    #[serde(default)]
    pub celular: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    /// Preassigned client code; when unset one is derived.
    #[serde(default)]
    pub codigo: Option<String>,
}

/// Issuing-user profile fields relevant to the payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub full_name: String,
    #[serde(default)]
    pub documento_tipo: Option<String>,
    #[serde(default)]
    pub documento_numero: Option<String>,
    #[serde(default)]
    pub cargo: Option<String>,
}

/// Item master data relevant to the payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemRecord {
    pub code: String,
    #[serde(default)]
    pub barcodes: Vec<String>,
    /// Mercosur common nomenclature code.
    #[serde(default)]
    pub ncm: Option<String>,
}

fn default_true() -> bool {
    true
}

/// Accept `true`/`false`, `1`/`0`, or null for host checkbox fields.
fn de_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
        Null(()),
    }

    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(b) => b,
        Flag::Int(n) => n != 0,
        Flag::Null(()) => true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clasificacion_por_flags() {
        assert_eq!(TipoDocumento::clasificar(false, false), TipoDocumento::Factura);
        assert_eq!(TipoDocumento::clasificar(true, false), TipoDocumento::NotaCredito);
        assert_eq!(TipoDocumento::clasificar(false, true), TipoDocumento::NotaDebito);
        // is_debit_note wins over is_return
        assert_eq!(TipoDocumento::clasificar(true, true), TipoDocumento::NotaDebito);
    }

    #[test]
    fn codigos_del_proveedor() {
        assert_eq!(TipoDocumento::Factura.codigo(), 1);
        assert_eq!(TipoDocumento::NotaDebito.codigo(), 4);
        assert_eq!(TipoDocumento::NotaCredito.codigo(), 5);
        for codigo in [1, 4, 5] {
            assert_eq!(TipoDocumento::from_codigo(codigo).unwrap().codigo(), codigo);
        }
        assert!(TipoDocumento::from_codigo(2).is_none());
    }

    #[test]
    fn contribuyente_acepta_entero_y_booleano() {
        let c: Customer =
            serde_json::from_str(r#"{"key":"C1","customer_name":"X","contribuyente":1}"#).unwrap();
        assert!(c.contribuyente);

        let c: Customer =
            serde_json::from_str(r#"{"key":"C1","customer_name":"X","contribuyente":0}"#).unwrap();
        assert!(!c.contribuyente);

        let c: Customer =
            serde_json::from_str(r#"{"key":"C1","customer_name":"X","contribuyente":true}"#)
                .unwrap();
        assert!(c.contribuyente);

        let c: Customer = serde_json::from_str(r#"{"key":"C1","customer_name":"X"}"#).unwrap();
        assert!(c.contribuyente);
    }
}
