//! Pure field extractors for series strings, coded values, and lookups.
//!
//! Everything here is total and idempotent: no I/O, no panics, parse
//! failures fall back to documented defaults. These functions absorb the
//! loosely-typed configuration the host ERP hands over (naming series,
//! `"1 - Contado"` style coded fields, payment mode labels).

use sha2::{Digest, Sha256};

/// Split a document series into (establecimiento, punto).
///
/// Expects at least `prefix-establecimiento-punto[-numero]`; with fewer
/// segments the tenant defaults apply. The punto is always zero-padded to
/// three digits, which is what the provider requires.
pub fn partes_serie(
    document_name: &str,
    default_establecimiento: &str,
    default_punto: &str,
) -> (String, String) {
    let parts: Vec<&str> = document_name.split('-').collect();

    let (establecimiento, punto) = if parts.len() >= 3 {
        (parts[1], parts[2])
    } else {
        (default_establecimiento, default_punto)
    };

    (establecimiento.to_string(), format!("{punto:0>3}"))
}

/// Extract the document number from the trailing segment of the series.
///
/// Series with fewer than four segments, or a non-numeric tail, yield 1.
/// This is lossy: two series with equal tails but different prefixes
/// collide. The real numbering authority is the ERP, so the collision is
/// surfaced there, not here.
pub fn numero_documento(document_name: &str) -> i64 {
    let parts: Vec<&str> = document_name.split('-').collect();

    if parts.len() >= 4 {
        parts.last().and_then(|p| p.trim().parse().ok()).unwrap_or(1)
    } else {
        1
    }
}

/// Extract the numeric code from a `"N - Descripción"` configuration value.
///
/// Accepts a bare number as well; any parse failure yields 1. Never panics.
pub fn extraer_codigo(valor: &str) -> i64 {
    valor
        .split('-')
        .next()
        .and_then(|p| p.trim().parse().ok())
        .unwrap_or(1)
}

/// [`extraer_codigo`] over an optional field, with an explicit default for
/// the unset case.
pub fn codigo_o(valor: Option<&str>, por_defecto: i64) -> i64 {
    match valor {
        Some(v) => extraer_codigo(v),
        None => por_defecto,
    }
}

/// Map an ERP payment mode name to the provider's payment type code.
///
/// Recognizes the English and Spanish names in use; anything else is
/// treated as cash.
pub fn codigo_modo_pago(modo: &str) -> i64 {
    match modo {
        "Cash" | "Efectivo" => 1,
        "Cheque" => 2,
        "Credit Card" | "Tarjeta" => 3,
        "Bank Transfer" | "Transferencia" => 4,
        _ => 1,
    }
}

/// Human-readable currency description for the provider payload.
///
/// Unknown codes echo back unchanged.
pub fn descripcion_moneda(codigo: &str) -> &str {
    match codigo {
        "PYG" => "Guaraní",
        "USD" => "Dólar",
        "EUR" => "Euro",
        "BRL" => "Real",
        otro => otro,
    }
}

/// Whether amounts in this currency travel as integers (no decimal part).
///
/// The guaraní is the only zero-decimal currency in the regime.
pub fn es_moneda_sin_decimales(codigo: &str) -> bool {
    codigo == "PYG"
}

/// Derive a deterministic, bounded-length client code.
///
/// Priority: RUC stripped of separators (≤15 chars), then documento
/// número (≤15 chars), then the first 10 hex chars of the SHA-256 of the
/// customer's internal key. Guarantees a stable code even for customers
/// with no business identifier configured.
pub fn codigo_cliente(ruc: Option<&str>, documento_numero: Option<&str>, key: &str) -> String {
    if let Some(ruc) = ruc.map(str::trim).filter(|r| !r.is_empty()) {
        let limpio: String = ruc.chars().filter(|c| c.is_ascii_alphanumeric()).collect();
        if !limpio.is_empty() {
            return limpio.chars().take(15).collect();
        }
    }

    if let Some(num) = documento_numero.map(str::trim).filter(|n| !n.is_empty()) {
        return num.chars().take(15).collect();
    }

    let hash = Sha256::digest(key.as_bytes());
    format!("{hash:x}").chars().take(10).collect()
}
