//! Conversion of one sales document into the provider schema.
//!
//! Conversion is all-or-nothing per document: it either yields a complete
//! [`DocumentoElectronico`] or a [`FacturaSendError::Conversion`], never a
//! partial payload. A failure here never aborts the surrounding batch —
//! the submitter collects it and moves on.

mod condicion;

pub use condicion::construir_condicion;

use std::collections::HashMap;

use crate::core::extract::{
    codigo_cliente, codigo_o, numero_documento, partes_serie,
};
use crate::core::{
    Customer, FacturaSendError, ItemRecord, SalesDocument, Settings, UserProfile,
};
use crate::schema::{
    Cliente, DocumentoElectronico, Factura, ItemDe, ItemExtras, Importe, Ubicacion, Usuario,
};

/// Host records resolved ahead of conversion, so the converter itself
/// stays free of I/O.
#[derive(Debug, Clone)]
pub struct ConversionContext {
    pub customer: Customer,
    pub user: UserProfile,
    /// Item master data keyed by item code. Lines whose item is missing
    /// here fall back to line-level data only.
    pub items: HashMap<String, ItemRecord>,
}

/// Convert one document plus its resolved context into the provider
/// schema.
pub fn convertir_documento(
    doc: &SalesDocument,
    ctx: &ConversionContext,
    settings: &Settings,
) -> Result<DocumentoElectronico, FacturaSendError> {
    if doc.items.is_empty() {
        return Err(FacturaSendError::Conversion(format!(
            "{}: el documento no tiene items",
            doc.name
        )));
    }

    let (establecimiento, punto) = partes_serie(
        &doc.name,
        &settings.establecimiento,
        &settings.punto_expedicion,
    );
    let establecimiento: i64 = establecimiento.parse().map_err(|_| {
        FacturaSendError::Conversion(format!(
            "{}: establecimiento no numérico en la serie ({establecimiento})",
            doc.name
        ))
    })?;

    let items = doc
        .items
        .iter()
        .map(|line| {
            let registro = ctx.items.get(&line.item_code);
            construir_item(line, registro, &doc.currency)
        })
        .collect();

    Ok(DocumentoElectronico {
        tipo_documento: doc.tipo().codigo(),
        establecimiento,
        punto,
        numero: numero_documento(&doc.name),
        descripcion: doc.descripcion.clone().unwrap_or_default(),
        observacion: doc.observacion.clone().unwrap_or_default(),
        fecha: doc
            .posting_date
            .and_hms_opt(0, 0, 0)
            .unwrap_or_default()
            .format("%Y-%m-%dT%H:%M:%S")
            .to_string(),
        tipo_emision: codigo_o(doc.tipo_emision.as_deref(), 1),
        tipo_transaccion: codigo_o(doc.tipo_transaccion.as_deref(), 1),
        tipo_impuesto: codigo_o(doc.tipo_impuesto.as_deref(), 1),
        moneda: doc.currency.clone(),
        cliente: construir_cliente(&ctx.customer),
        usuario: construir_usuario(&ctx.user),
        factura: Factura {
            presencia: codigo_o(doc.presencia.as_deref(), 1),
        },
        condicion: construir_condicion(doc),
        items,
    })
}

/// Build the cliente sub-record.
///
/// RUC and identity document are mutually exclusive, keyed off the
/// taxpayer flag. The ubicación block is emitted only when both ciudad
/// and distrito are configured; the provider rejects partial address
/// data.
fn construir_cliente(customer: &Customer) -> Cliente {
    let codigo = customer
        .codigo
        .clone()
        .filter(|c| !c.trim().is_empty())
        .unwrap_or_else(|| {
            codigo_cliente(
                customer.ruc.as_deref(),
                customer.documento_numero.as_deref(),
                &customer.key,
            )
        });

    let (ruc, documento_tipo, documento_numero) = if customer.contribuyente {
        (Some(customer.ruc.clone().unwrap_or_default()), None, None)
    } else {
        (
            None,
            Some(codigo_o(customer.documento_tipo.as_deref(), 1)),
            Some(customer.documento_numero.clone().unwrap_or_default()),
        )
    };

    Cliente {
        contribuyente: customer.contribuyente,
        razon_social: customer.customer_name.clone(),
        nombre_fantasia: customer
            .nombre_fantasia
            .clone()
            .unwrap_or_else(|| customer.customer_name.clone()),
        tipo_operacion: codigo_o(customer.tipo_operacion.as_deref(), 1),
        pais: customer.pais.clone().unwrap_or_else(|| "PRY".to_string()),
        pais_descripcion: customer
            .pais_descripcion
            .clone()
            .unwrap_or_else(|| "Paraguay".to_string()),
        tipo_contribuyente: codigo_o(customer.tipo_contribuyente.as_deref(), 1),
        ruc,
        documento_tipo,
        documento_numero,
        telefono: customer.telefono.clone().unwrap_or_default(),
        celular: customer.celular.clone().unwrap_or_default(),
        email: customer.email.clone().unwrap_or_default(),
        codigo,
        ubicacion: construir_ubicacion(customer),
    }
}

fn construir_ubicacion(customer: &Customer) -> Option<Ubicacion> {
    let ciudad = customer.ciudad.as_deref()?;
    let distrito = customer.distrito.as_deref()?;

    Some(Ubicacion {
        direccion: customer.direccion.clone().unwrap_or_default(),
        numero_casa: customer.numero_casa.clone().unwrap_or_default(),
        departamento: customer
            .departamento
            .as_deref()
            .map(crate::core::extract::extraer_codigo),
        departamento_descripcion: customer
            .departamento
            .as_ref()
            .map(|_| customer.departamento_descripcion.clone().unwrap_or_default()),
        distrito: crate::core::extract::extraer_codigo(distrito),
        distrito_descripcion: customer
            .distrito_descripcion
            .clone()
            .unwrap_or_default(),
        ciudad: crate::core::extract::extraer_codigo(ciudad),
        ciudad_descripcion: customer.ciudad_descripcion.clone().unwrap_or_default(),
    })
}

fn construir_usuario(user: &UserProfile) -> Usuario {
    Usuario {
        documento_tipo: codigo_o(user.documento_tipo.as_deref(), 1),
        documento_numero: user.documento_numero.clone().unwrap_or_default(),
        nombre: user.full_name.clone(),
        cargo: user.cargo.clone().unwrap_or_default(),
    }
}

fn construir_item(
    line: &crate::core::DocumentLine,
    registro: Option<&ItemRecord>,
    moneda: &str,
) -> ItemDe {
    let bar_code = registro
        .and_then(|r| r.barcodes.first().cloned())
        .unwrap_or_else(|| line.item_code.clone());

    ItemDe {
        codigo: line.item_code.clone(),
        descripcion: line
            .description
            .clone()
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| line.item_name.clone()),
        unidad_medida: codigo_o(line.unidad_medida.as_deref(), 77),
        cantidad: line.qty,
        precio_unitario: Importe::para_moneda(line.rate, moneda),
        cambio: 0.0,
        iva_tipo: codigo_o(line.iva_tipo.as_deref(), 1),
        iva_base: line.iva_base.unwrap_or(100),
        iva: line.iva.unwrap_or(10),
        observacion: line.description.clone().filter(|d| !d.is_empty()),
        ncm: registro.and_then(|r| r.ncm.clone()),
        extras: ItemExtras { bar_code },
    }
}
