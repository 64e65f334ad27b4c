//! Property-based tests for the field extractors.
//!
//! The extractors absorb arbitrary host-entered strings, so the
//! properties here are totality (never panic), the documented defaults,
//! and idempotence.

use facturasend::core::extract::*;
use proptest::prelude::*;

// ── Strategies ──────────────────────────────────────────────────────────────

/// Any printable string the host could store in a series or coded field.
fn arb_texto() -> impl Strategy<Value = String> {
    "[ -~]{0,40}"
}

fn arb_codigo() -> impl Strategy<Value = i64> {
    0i64..100_000
}

proptest! {
    #[test]
    fn partes_serie_nunca_falla(name in arb_texto(), est in "[0-9]{1,3}", punto in "[0-9]{1,3}") {
        let (_, p) = partes_serie(&name, &est, &punto);
        prop_assert!(p.len() >= 3);
    }

    #[test]
    fn partes_serie_toma_segmentos_dos_y_tres(
        prefijo in "[A-Z]{2}",
        est in "[0-9]{1,3}",
        punto in "[0-9]{1,3}",
        cola in "[0-9]{1,7}",
    ) {
        let serie = format!("{prefijo}-{est}-{punto}-{cola}");
        let (e, p) = partes_serie(&serie, "900", "900");
        prop_assert_eq!(e, est);
        prop_assert_eq!(p, format!("{punto:0>3}"));
    }

    #[test]
    fn serie_corta_siempre_usa_defaults(prefijo in "[A-Z]{2}", est in "[0-9]{1,3}") {
        let serie = format!("{prefijo}-{est}");
        let (e, p) = partes_serie(&serie, "007", "9");
        prop_assert_eq!(e, "007");
        prop_assert_eq!(p, "009");
    }

    #[test]
    fn numero_documento_nunca_falla(name in arb_texto()) {
        let n = numero_documento(&name);
        prop_assert!(n >= 1 || name.split('-').count() >= 4);
    }

    #[test]
    fn numero_documento_extrae_la_cola(cola in 0i64..10_000_000) {
        let serie = format!("FC-001-001-{cola:07}");
        prop_assert_eq!(numero_documento(&serie), cola);
    }

    #[test]
    fn extraer_codigo_de_string_etiquetado(codigo in arb_codigo(), etiqueta in "[a-zA-Z ]{0,20}") {
        let valor = format!("{codigo} - {etiqueta}");
        prop_assert_eq!(extraer_codigo(&valor), codigo);
    }

    #[test]
    fn extraer_codigo_nunca_falla(valor in arb_texto()) {
        let _ = extraer_codigo(&valor);
    }

    #[test]
    fn extraer_codigo_es_idempotente_en_su_resultado(codigo in arb_codigo()) {
        let una_vez = extraer_codigo(&codigo.to_string());
        let otra_vez = extraer_codigo(&una_vez.to_string());
        prop_assert_eq!(una_vez, otra_vez);
    }

    #[test]
    fn extractores_son_puros(name in arb_texto(), valor in arb_texto(), modo in arb_texto()) {
        prop_assert_eq!(
            partes_serie(&name, "001", "001"),
            partes_serie(&name, "001", "001")
        );
        prop_assert_eq!(numero_documento(&name), numero_documento(&name));
        prop_assert_eq!(extraer_codigo(&valor), extraer_codigo(&valor));
        prop_assert_eq!(codigo_modo_pago(&modo), codigo_modo_pago(&modo));
        prop_assert_eq!(descripcion_moneda(&valor), descripcion_moneda(&valor));
    }

    #[test]
    fn modo_de_pago_siempre_en_rango(modo in arb_texto()) {
        let codigo = codigo_modo_pago(&modo);
        prop_assert!((1..=4).contains(&codigo));
    }

    #[test]
    fn moneda_desconocida_se_devuelve_tal_cual(codigo in "[A-Z]{3}") {
        let desc = descripcion_moneda(&codigo);
        if !["PYG", "USD", "EUR", "BRL"].contains(&codigo.as_str()) {
            prop_assert_eq!(desc, codigo.as_str());
        }
    }

    #[test]
    fn codigo_cliente_acotado_y_determinista(
        ruc in proptest::option::of("[0-9]{5,20}-?[0-9]"),
        documento in proptest::option::of("[0-9]{5,20}"),
        key in "[A-Z0-9-]{1,30}",
    ) {
        let codigo = codigo_cliente(ruc.as_deref(), documento.as_deref(), &key);
        prop_assert!(!codigo.is_empty());
        prop_assert!(codigo.len() <= 15);
        prop_assert_eq!(
            codigo,
            codigo_cliente(ruc.as_deref(), documento.as_deref(), &key)
        );
    }
}
