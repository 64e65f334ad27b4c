use serde::{Deserialize, Serialize};

/// Tenant configuration, provided by the host and passed explicitly into
/// every component that needs it. Read-only to this crate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Provider base URL, e.g. `https://api.facturasend.com.py`.
    pub base_url: String,
    /// Tenant/workspace identifier appended to every endpoint.
    pub tenant_id: String,
    /// Bearer token for the provider API.
    pub api_key: String,
    /// Fallback establecimiento when a series has too few segments.
    #[serde(default = "default_establecimiento")]
    pub establecimiento: String,
    /// Fallback punto de expedición when a series has too few segments.
    #[serde(default = "default_punto")]
    pub punto_expedicion: String,
    /// Documents in `Error` at this count are no longer retried.
    #[serde(default = "default_max_reintentos")]
    pub max_reintentos: u32,
    /// Minutes between status-poll ticks (consumed by the host scheduler).
    #[serde(default = "default_intervalo")]
    pub intervalo_consulta_minutos: u32,
    #[serde(default)]
    pub notificar_errores: bool,
    #[serde(default)]
    pub correos_notificacion: Vec<String>,
}

impl Settings {
    /// Minimal settings for a tenant, with the defaults everywhere else.
    pub fn new(
        base_url: impl Into<String>,
        tenant_id: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            tenant_id: tenant_id.into(),
            api_key: api_key.into(),
            establecimiento: default_establecimiento(),
            punto_expedicion: default_punto(),
            max_reintentos: default_max_reintentos(),
            intervalo_consulta_minutos: default_intervalo(),
            notificar_errores: false,
            correos_notificacion: Vec::new(),
        }
    }
}

fn default_establecimiento() -> String {
    "001".to_string()
}

fn default_punto() -> String {
    "001".to_string()
}

fn default_max_reintentos() -> u32 {
    3
}

fn default_intervalo() -> u32 {
    15
}
