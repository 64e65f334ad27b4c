//! # facturasend
//!
//! Batch e-invoicing integration between an ERP's sales documents and the
//! FacturaSend provider for the Paraguayan tax regime: document
//! conversion into the provider's JSON schema, lote submission over
//! HTTPS, per-document state tracking, and periodic status polling.
//!
//! The host ERP stays the system of record — it owns documents,
//! customers, items, and users, and is reached only through the traits in
//! [`host`]. This crate owns the submission lifecycle: the tracking
//! fields on each document and the append-only batch log.
//!
//! ## Quick Start
//!
//! Conversion is pure — no network, no store:
//!
//! ```rust
//! use std::collections::HashMap;
//! use chrono::NaiveDate;
//! use facturasend::convert::{ConversionContext, convertir_documento};
//! use facturasend::core::*;
//! use rust_decimal_macros::dec;
//!
//! let doc = SalesDocument {
//!     name: "FC-001-001-0000123".into(),
//!     customer: "CUST-001".into(),
//!     owner: "ventas@empresa.com.py".into(),
//!     posting_date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
//!     grand_total: dec!(50000),
//!     currency: "PYG".into(),
//!     is_return: false,
//!     is_debit_note: false,
//!     items: vec![DocumentLine {
//!         item_code: "PROD-001".into(),
//!         item_name: "Yerba mate 500g".into(),
//!         description: None,
//!         qty: dec!(2),
//!         rate: dec!(25000),
//!         unidad_medida: None,
//!         iva_tipo: None,
//!         iva_base: None,
//!         iva: None,
//!     }],
//!     payment_schedule: Vec::new(),
//!     instrumento_pago: None,
//!     descripcion: None,
//!     observacion: None,
//!     tipo_emision: None,
//!     tipo_transaccion: None,
//!     tipo_impuesto: None,
//!     presencia: None,
//!     tracking: Tracking::default(),
//! };
//!
//! let ctx = ConversionContext {
//!     customer: Customer {
//!         key: "CUST-001".into(),
//!         customer_name: "Comercial Asunción SA".into(),
//!         nombre_fantasia: None,
//!         contribuyente: true,
//!         ruc: Some("80012345-6".into()),
//!         documento_tipo: None,
//!         documento_numero: None,
//!         tipo_operacion: None,
//!         tipo_contribuyente: None,
//!         pais: None,
//!         pais_descripcion: None,
//!         direccion: None,
//!         numero_casa: None,
//!         departamento: None,
//!         departamento_descripcion: None,
//!         distrito: None,
//!         distrito_descripcion: None,
//!         ciudad: None,
//!         ciudad_descripcion: None,
//!         telefono: None,
//!         celular: None,
//!         email: None,
//!         codigo: None,
//!     },
//!     user: UserProfile {
//!         full_name: "María González".into(),
//!         documento_tipo: None,
//!         documento_numero: None,
//!         cargo: None,
//!     },
//!     items: HashMap::new(),
//! };
//!
//! let settings = Settings::new("https://api.facturasend.com.py", "empresa_abc", "api-key");
//! let de = convertir_documento(&doc, &ctx, &settings).unwrap();
//! assert_eq!(de.tipo_documento, 1);
//! assert_eq!(de.numero, 123);
//! ```
//!
//! Submission and polling go through [`batch::BatchSubmitter`] and
//! [`poll::revisar_estados`], generic over the [`host`] traits and the
//! [`api::FacturaSendApi`] seam.
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `core` (default) | Types, extractors, converter, batch submitter, poller |
//! | `client` | reqwest-based [`api::ApiClient`] for the provider API |

#[cfg(feature = "core")]
pub mod core;

#[cfg(feature = "core")]
pub mod schema;

#[cfg(feature = "core")]
pub mod convert;

#[cfg(feature = "core")]
pub mod host;

#[cfg(feature = "core")]
pub mod api;

#[cfg(feature = "core")]
pub mod batch;

#[cfg(feature = "core")]
pub mod poll;

// Re-export core types at crate root for convenience
#[cfg(feature = "core")]
pub use crate::core::*;
