use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    /// Fallback language when a request carries no `lang` parameter.
    pub default_language: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let default_language =
            std::env::var("DEFAULT_LANGUAGE").unwrap_or_else(|_| "en".into());
        Ok(Self {
            database_url,
            default_language,
        })
    }
}
