//! reqwest-based implementation of [`FacturaSendApi`].

use serde::{Deserialize, Deserializer, Serialize};

use super::{DeAsignado, EstadoConsultado, FacturaSendApi, LoteCreado};
use crate::core::{FacturaSendError, ItemError, Settings};
use crate::schema::DocumentoElectronico;

/// HTTP client for the provider API.
///
/// Fixed 30-second timeout; no automatic retries. Every request carries
/// `Authorization: Bearer <api_key>` and a JSON body.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    tenant_id: String,
    api_key: String,
}

impl ApiClient {
    pub fn new(settings: &Settings) -> Result<Self, FacturaSendError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| FacturaSendError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            tenant_id: settings.tenant_id.clone(),
            api_key: settings.api_key.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}/{}", self.base_url, self.tenant_id, path)
    }

    /// POST `body` and return the response text after the HTTP-level
    /// checks. Non-2xx keeps status and body verbatim for the caller.
    async fn post_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<String, FacturaSendError> {
        let url = self.url(path);
        tracing::debug!(%url, "solicitud a FacturaSend");

        let resp = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| FacturaSendError::Transport(e.to_string()))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| FacturaSendError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(FacturaSendError::Transport(format!(
                "HTTP {status}: {text}"
            )));
        }

        Ok(text)
    }
}

impl FacturaSendApi for ApiClient {
    async fn crear_lote(
        &self,
        documentos: &[DocumentoElectronico],
    ) -> Result<LoteCreado, FacturaSendError> {
        let body = self.post_json("lote/create", documentos).await?;

        let resp: LoteCreateResponse = serde_json::from_str(&body)
            .map_err(|e| FacturaSendError::Transport(format!("respuesta no interpretable: {e}")))?;

        if !resp.success {
            return Err(FacturaSendError::Application {
                message: resp.error.unwrap_or_else(|| "Error desconocido".into()),
                errores: resp
                    .errores
                    .into_iter()
                    .map(|e| ItemError {
                        index: e.index,
                        error: e.error.unwrap_or_default(),
                    })
                    .collect(),
            });
        }

        let result = resp.result.ok_or_else(|| FacturaSendError::Application {
            message: "respuesta sin resultado".into(),
            errores: Vec::new(),
        })?;

        Ok(LoteCreado {
            lote_id: result.lote_id,
            de_list: result
                .de_list
                .into_iter()
                .map(|de| DeAsignado { cdc: de.cdc })
                .collect(),
        })
    }

    async fn consultar_estado(&self, cdc: &str) -> Result<EstadoConsultado, FacturaSendError> {
        let body = self
            .post_json("de/estado", &serde_json::json!({ "cdc": cdc }))
            .await?;

        let resp: EstadoResponse = serde_json::from_str(&body)
            .map_err(|e| FacturaSendError::Transport(format!("respuesta no interpretable: {e}")))?;

        if !resp.success {
            return Err(FacturaSendError::Application {
                message: resp
                    .error
                    .or(resp.message.clone())
                    .unwrap_or_else(|| "Error desconocido".into()),
                errores: Vec::new(),
            });
        }

        Ok(EstadoConsultado {
            estado: resp.estado.unwrap_or_default(),
            mensaje: resp.message,
            descripcion: resp.estado_descripcion,
        })
    }

    async fn descargar_kude(&self, cdcs: &[String]) -> Result<Vec<u8>, FacturaSendError> {
        let url = self.url("de/pdf");
        tracing::debug!(%url, cantidad = cdcs.len(), "descarga de KUDE");

        let resp = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&serde_json::json!({ "cdcList": cdcs }))
            .send()
            .await
            .map_err(|e| FacturaSendError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(FacturaSendError::Transport(format!(
                "HTTP {status}: {text}"
            )));
        }

        let bytes = resp
            .bytes()
            .await
            .map_err(|e| FacturaSendError::Transport(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}

#[derive(Debug, Deserialize)]
struct LoteCreateResponse {
    #[serde(default)]
    success: bool,
    result: Option<LoteResult>,
    error: Option<String>,
    #[serde(default)]
    errores: Vec<ErrorEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoteResult {
    #[serde(deserialize_with = "de_lote_id")]
    lote_id: String,
    #[serde(default)]
    de_list: Vec<DeEntry>,
}

#[derive(Debug, Deserialize)]
struct DeEntry {
    cdc: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEntry {
    #[serde(default)]
    index: usize,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EstadoResponse {
    #[serde(default)]
    success: bool,
    estado: Option<String>,
    message: Option<String>,
    estado_descripcion: Option<String>,
    error: Option<String>,
}

/// The provider emits `loteId` sometimes as a number, sometimes as a
/// string; the pipeline treats it as an opaque string either way.
fn de_lote_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Num(i64),
        Texto(String),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Num(n) => n.to_string(),
        Id::Texto(s) => s,
    })
}
