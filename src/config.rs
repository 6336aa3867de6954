use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub provider: ProviderConfig,
}

#[derive(Debug, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

/// Meeting provider endpoints and credentials. Secrets are supplied through
/// the environment (e.g. `LINGODESK_PROVIDER__CLIENT_SECRET`), never inlined.
#[derive(Debug, Deserialize)]
pub struct ProviderConfig {
    pub api_base: String,
    pub token_url: String,
    pub account_id: String,
    pub client_id: String,
    pub client_secret: String,
    /// Shared secret for inbound webhook signatures; omit to disable the check.
    pub webhook_secret: Option<String>,
    pub timezone: String,
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .add_source(config::Environment::with_prefix("LINGODESK").separator("__"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
