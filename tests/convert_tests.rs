//! Integration tests for document conversion: payload shape, conditional
//! blocks, and the currency-dependent amount coercions.

use std::collections::HashMap;

use chrono::NaiveDate;
use facturasend::convert::{ConversionContext, convertir_documento};
use facturasend::core::*;
use rust_decimal_macros::dec;
use serde_json::Value;

fn fecha(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn settings() -> Settings {
    Settings::new("https://api.facturasend.com.py", "empresa_abc", "clave-secreta")
}

fn cliente_completo() -> Customer {
    Customer {
        key: "CUST-001".into(),
        customer_name: "Comercial Asunción SA".into(),
        nombre_fantasia: Some("Comercial Asunción".into()),
        contribuyente: true,
        ruc: Some("80012345-6".into()),
        documento_tipo: None,
        documento_numero: None,
        tipo_operacion: Some("1 - B2B".into()),
        tipo_contribuyente: Some("2 - Persona Jurídica".into()),
        pais: None,
        pais_descripcion: None,
        direccion: Some("Avda. Mariscal López 1234".into()),
        numero_casa: Some("1234".into()),
        departamento: Some("11 - Central".into()),
        departamento_descripcion: Some("Central".into()),
        distrito: Some("1 - Asunción".into()),
        distrito_descripcion: Some("Asunción".into()),
        ciudad: Some("1 - Asunción".into()),
        ciudad_descripcion: Some("Asunción".into()),
        telefono: Some("021-555-000".into()),
        celular: None,
        email: Some("compras@comercial.com.py".into()),
        codigo: None,
    }
}

fn contexto() -> ConversionContext {
    ConversionContext {
        customer: cliente_completo(),
        user: UserProfile {
            full_name: "María González".into(),
            documento_tipo: Some("1 - Cédula paraguaya".into()),
            documento_numero: Some("4879123".into()),
            cargo: Some("Vendedora".into()),
        },
        items: HashMap::new(),
    }
}

fn factura_contado(moneda: &str, total: rust_decimal::Decimal) -> SalesDocument {
    SalesDocument {
        name: "FC-001-001-0000123".into(),
        customer: "CUST-001".into(),
        owner: "ventas@empresa.com.py".into(),
        posting_date: fecha(2025, 3, 1),
        grand_total: total,
        currency: moneda.into(),
        is_return: false,
        is_debit_note: false,
        items: vec![DocumentLine {
            item_code: "PROD-001".into(),
            item_name: "Yerba mate 500g".into(),
            description: Some("Yerba mate elaborada con palo".into()),
            qty: dec!(2),
            rate: total / dec!(2),
            unidad_medida: None,
            iva_tipo: None,
            iva_base: None,
            iva: None,
        }],
        payment_schedule: Vec::new(),
        instrumento_pago: None,
        descripcion: None,
        observacion: None,
        tipo_emision: Some("1 - Normal".into()),
        tipo_transaccion: Some("1 - Venta de mercadería".into()),
        tipo_impuesto: Some("1 - IVA".into()),
        presencia: Some("1 - Operación presencial".into()),
        tracking: Tracking::default(),
    }
}

fn a_json(doc: &SalesDocument, ctx: &ConversionContext) -> Value {
    let de = convertir_documento(doc, ctx, &settings()).expect("conversión");
    serde_json::to_value(&de).expect("serialización")
}

// ── Payload shape ───────────────────────────────────────────────────────────

#[test]
fn payload_completo_de_factura() {
    let v = a_json(&factura_contado("PYG", dec!(50000)), &contexto());

    assert_eq!(v["tipoDocumento"], 1);
    assert_eq!(v["establecimiento"], 1);
    assert_eq!(v["punto"], "001");
    assert_eq!(v["numero"], 123);
    assert_eq!(v["fecha"], "2025-03-01T00:00:00");
    assert_eq!(v["moneda"], "PYG");
    assert_eq!(v["tipoEmision"], 1);
    assert_eq!(v["factura"]["presencia"], 1);
    assert!(v["items"].as_array().is_some_and(|a| !a.is_empty()));
}

#[test]
fn camel_case_en_todo_el_payload() {
    let v = a_json(&factura_contado("PYG", dec!(50000)), &contexto());
    let cliente = v["cliente"].as_object().unwrap();
    assert!(cliente.contains_key("razonSocial"));
    assert!(cliente.contains_key("nombreFantasia"));
    assert!(cliente.contains_key("tipoContribuyente"));
    let item = v["items"][0].as_object().unwrap();
    assert!(item.contains_key("unidadMedida"));
    assert!(item.contains_key("precioUnitario"));
    assert!(item["extras"].as_object().unwrap().contains_key("barCode"));
}

// ── Conditional blocks ──────────────────────────────────────────────────────

#[test]
fn ubicacion_presente_con_ciudad_y_distrito() {
    let v = a_json(&factura_contado("PYG", dec!(50000)), &contexto());
    let cliente = v["cliente"].as_object().unwrap();
    assert_eq!(cliente["ciudad"], 1);
    assert_eq!(cliente["distrito"], 1);
    assert_eq!(cliente["departamento"], 11);
    assert_eq!(cliente["direccion"], "Avda. Mariscal López 1234");
}

#[test]
fn sin_distrito_no_hay_bloque_de_ubicacion() {
    let mut ctx = contexto();
    ctx.customer.distrito = None;
    ctx.customer.distrito_descripcion = None;
    let v = a_json(&factura_contado("PYG", dec!(50000)), &ctx);
    let cliente = v["cliente"].as_object().unwrap();
    for clave in ["direccion", "numeroCasa", "ciudad", "ciudadDescripcion", "distrito", "departamento"] {
        assert!(!cliente.contains_key(clave), "clave inesperada: {clave}");
    }
}

#[test]
fn sin_ciudad_no_hay_bloque_de_ubicacion() {
    let mut ctx = contexto();
    ctx.customer.ciudad = None;
    let v = a_json(&factura_contado("PYG", dec!(50000)), &ctx);
    assert!(!v["cliente"].as_object().unwrap().contains_key("distrito"));
}

#[test]
fn ruc_y_documento_son_excluyentes() {
    let v = a_json(&factura_contado("PYG", dec!(50000)), &contexto());
    let cliente = v["cliente"].as_object().unwrap();
    assert_eq!(cliente["ruc"], "80012345-6");
    assert!(!cliente.contains_key("documentoTipo"));
    assert!(!cliente.contains_key("documentoNumero"));

    let mut ctx = contexto();
    ctx.customer.contribuyente = false;
    ctx.customer.documento_tipo = Some("1 - Cédula paraguaya".into());
    ctx.customer.documento_numero = Some("4123987".into());
    let v = a_json(&factura_contado("PYG", dec!(50000)), &ctx);
    let cliente = v["cliente"].as_object().unwrap();
    assert!(!cliente.contains_key("ruc"));
    assert_eq!(cliente["documentoTipo"], 1);
    assert_eq!(cliente["documentoNumero"], "4123987");
}

// ── Currency coercions ──────────────────────────────────────────────────────

#[test]
fn venta_contado_en_guaranies_entrega_string_entera() {
    let v = a_json(&factura_contado("PYG", dec!(1500000)), &contexto());
    let condicion = &v["condicion"];
    assert_eq!(condicion["tipo"], 1);
    let entrega = &condicion["entregas"][0];
    assert_eq!(entrega["monto"], Value::String("1500000".into()));
    assert_eq!(entrega["monedaDescripcion"], "Guaraní");
    assert!(condicion.get("credito").is_none());
}

#[test]
fn venta_contado_en_dolares_entrega_flotante() {
    let v = a_json(&factura_contado("USD", dec!(120.50)), &contexto());
    let entrega = &v["condicion"]["entregas"][0];
    assert_eq!(entrega["monto"], serde_json::json!(120.5));
    assert_eq!(entrega["monedaDescripcion"], "Dólar");
}

#[test]
fn precio_unitario_segun_moneda() {
    let v = a_json(&factura_contado("PYG", dec!(50000)), &contexto());
    assert_eq!(v["items"][0]["precioUnitario"], 25000);

    let v = a_json(&factura_contado("USD", dec!(39.98)), &contexto());
    assert_eq!(v["items"][0]["precioUnitario"], serde_json::json!(19.99));
}

// ── Credit sales ────────────────────────────────────────────────────────────

#[test]
fn venta_a_credito_lleva_bloque_de_credito() {
    let mut doc = factura_contado("PYG", dec!(1500000));
    doc.payment_schedule = vec![
        Installment { due_date: fecha(2025, 4, 1), amount: dec!(750000) },
        Installment { due_date: fecha(2025, 5, 1), amount: dec!(750000) },
    ];
    let v = a_json(&doc, &contexto());

    let condicion = &v["condicion"];
    assert_eq!(condicion["tipo"], 2);
    // one delivery line with the full total, even on credit
    assert_eq!(condicion["entregas"].as_array().unwrap().len(), 1);
    assert_eq!(condicion["entregas"][0]["monto"], Value::String("1500000".into()));

    let credito = &condicion["credito"];
    assert_eq!(credito["cuotas"], 2);
    assert_eq!(credito["plazo"], "61 días");
    assert_eq!(credito["montoEntrega"], serde_json::json!(0.0));
    assert_eq!(credito["infoCuotas"][0]["monto"], 750000);
    assert_eq!(credito["infoCuotas"][0]["vencimiento"], "2025-04-01");
}

// ── Document classification ─────────────────────────────────────────────────

#[test]
fn clasificacion_en_el_payload() {
    let mut nc = factura_contado("PYG", dec!(50000));
    nc.is_return = true;
    assert_eq!(a_json(&nc, &contexto())["tipoDocumento"], 5);

    let mut nd = factura_contado("PYG", dec!(50000));
    nd.is_debit_note = true;
    assert_eq!(a_json(&nd, &contexto())["tipoDocumento"], 4);
}

// ── Items ───────────────────────────────────────────────────────────────────

#[test]
fn item_con_maestro_enriquecido() {
    let mut ctx = contexto();
    ctx.items.insert(
        "PROD-001".into(),
        ItemRecord {
            code: "PROD-001".into(),
            barcodes: vec!["7840001234567".into(), "7840001234574".into()],
            ncm: Some("0903.00.10".into()),
        },
    );
    let v = a_json(&factura_contado("PYG", dec!(50000)), &ctx);
    let item = &v["items"][0];
    assert_eq!(item["extras"]["barCode"], "7840001234567");
    assert_eq!(item["ncm"], "0903.00.10");
    assert_eq!(item["observacion"], "Yerba mate elaborada con palo");
}

#[test]
fn item_sin_maestro_usa_su_codigo() {
    let mut doc = factura_contado("PYG", dec!(50000));
    doc.items[0].description = None;
    let v = a_json(&doc, &contexto());
    let item = &v["items"][0];
    assert_eq!(item["extras"]["barCode"], "PROD-001");
    assert!(item.get("ncm").is_none());
    assert!(item.get("observacion").is_none());
    // description falls back to the item name
    assert_eq!(item["descripcion"], "Yerba mate 500g");
}

#[test]
fn defaults_de_iva_y_unidad() {
    let v = a_json(&factura_contado("PYG", dec!(50000)), &contexto());
    let item = &v["items"][0];
    assert_eq!(item["unidadMedida"], 77);
    assert_eq!(item["ivaTipo"], 1);
    assert_eq!(item["ivaBase"], 100);
    assert_eq!(item["iva"], 10);
}

// ── Failure isolation ───────────────────────────────────────────────────────

#[test]
fn conversion_es_todo_o_nada() {
    let mut doc = factura_contado("PYG", dec!(50000));
    doc.items.clear();
    let err = convertir_documento(&doc, &contexto(), &settings()).unwrap_err();
    assert!(matches!(err, FacturaSendError::Conversion(_)));
    assert!(err.to_string().contains("FC-001-001-0000123"));
}
