//! Provider wire format — the JSON document schema FacturaSend accepts.
//!
//! Serialize-only DTOs. Conditional blocks are modeled as `Option`s with
//! `skip_serializing_if` so an absent block never serializes half-filled:
//! the provider treats the ubicación fields as a unit, and RUC vs identity
//! document are mutually exclusive on the cliente record.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Serialize, Serializer};

/// One electronic document in the shape `POST /lote/create` expects.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentoElectronico {
    /// 1 = factura, 4 = nota de débito, 5 = nota de crédito.
    pub tipo_documento: i64,
    pub establecimiento: i64,
    /// Always three digits, zero-padded.
    pub punto: String,
    pub numero: i64,
    pub descripcion: String,
    pub observacion: String,
    /// Local time, seconds precision, no timezone (`%Y-%m-%dT%H:%M:%S`).
    pub fecha: String,
    pub tipo_emision: i64,
    pub tipo_transaccion: i64,
    pub tipo_impuesto: i64,
    /// ISO 4217 code.
    pub moneda: String,
    pub cliente: Cliente,
    pub usuario: Usuario,
    pub factura: Factura,
    pub condicion: Condicion,
    /// Never empty; conversion fails instead.
    pub items: Vec<ItemDe>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Cliente {
    pub contribuyente: bool,
    pub razon_social: String,
    pub nombre_fantasia: String,
    pub tipo_operacion: i64,
    pub pais: String,
    pub pais_descripcion: String,
    pub tipo_contribuyente: i64,
    /// Present exactly when `contribuyente` is true.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ruc: Option<String>,
    /// Present exactly when `contribuyente` is false.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documento_tipo: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documento_numero: Option<String>,
    pub telefono: String,
    pub celular: String,
    pub email: String,
    pub codigo: String,
    /// Address block; all-or-nothing (requires both ciudad and distrito).
    #[serde(flatten)]
    pub ubicacion: Option<Ubicacion>,
}

/// The address/location unit of a [`Cliente`]. Flattened into the cliente
/// object when present, omitted entirely when not.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Ubicacion {
    pub direccion: String,
    pub numero_casa: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub departamento: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub departamento_descripcion: Option<String>,
    pub distrito: i64,
    pub distrito_descripcion: String,
    pub ciudad: i64,
    pub ciudad_descripcion: String,
}

/// Issuing user. Unset optionals become empty strings, never null.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Usuario {
    pub documento_tipo: i64,
    pub documento_numero: String,
    pub nombre: String,
    pub cargo: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Factura {
    pub presencia: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDe {
    pub codigo: String,
    pub descripcion: String,
    pub unidad_medida: i64,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub cantidad: Decimal,
    pub precio_unitario: Importe,
    pub cambio: f64,
    pub iva_tipo: i64,
    pub iva_base: i64,
    pub iva: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observacion: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ncm: Option<String>,
    pub extras: ItemExtras,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemExtras {
    pub bar_code: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Condicion {
    /// 1 = contado, 2 = crédito.
    pub tipo: i64,
    pub entregas: Vec<Entrega>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credito: Option<Credito>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Entrega {
    /// Payment instrument code (1 = efectivo unless overridden).
    pub tipo: i64,
    pub monto: Monto,
    pub moneda: String,
    pub moneda_descripcion: String,
    pub cambio: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Credito {
    /// 1 = plazo.
    pub tipo: i64,
    /// e.g. `"30 días"`.
    pub plazo: String,
    pub cuotas: usize,
    pub monto_entrega: f64,
    pub info_cuotas: Vec<InfoCuota>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InfoCuota {
    pub moneda: String,
    pub monto: Importe,
    /// Due date, `%Y-%m-%d`.
    pub vencimiento: String,
}

/// A monetary amount serialized as a JSON number: integer for the
/// zero-decimal currency, float otherwise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Importe {
    Entero(i64),
    Fraccionario(Decimal),
}

impl Importe {
    /// Coerce an amount for the given currency: rounded integer for the
    /// zero-decimal currency, the untouched decimal otherwise.
    pub fn para_moneda(monto: Decimal, moneda: &str) -> Self {
        if crate::core::extract::es_moneda_sin_decimales(moneda) {
            Self::Entero(monto.round().to_i64().unwrap_or(0))
        } else {
            Self::Fraccionario(monto)
        }
    }
}

impl Serialize for Importe {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Entero(n) => serializer.serialize_i64(*n),
            Self::Fraccionario(d) => serializer.serialize_f64(d.to_f64().unwrap_or(0.0)),
        }
    }
}

/// A delivery amount. The provider wants guaraní amounts as integer
/// strings (`"1500000"`) and foreign-currency amounts as plain numbers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Monto {
    Entero(i64),
    Fraccionario(Decimal),
}

impl Monto {
    /// Coerce a delivery amount for the given currency.
    pub fn para_moneda(monto: Decimal, moneda: &str) -> Self {
        if crate::core::extract::es_moneda_sin_decimales(moneda) {
            Self::Entero(monto.round().to_i64().unwrap_or(0))
        } else {
            Self::Fraccionario(monto)
        }
    }
}

impl Serialize for Monto {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Entero(n) => serializer.collect_str(n),
            Self::Fraccionario(d) => serializer.serialize_f64(d.to_f64().unwrap_or(0.0)),
        }
    }
}
