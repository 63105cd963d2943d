use crate::domain::error::{AppError, Result};
use crate::domain::llm_config::LLMConfig;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3001,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: "estatepulse.db".to_string(),
        }
    }
}

/// Import pipeline tuning. The price-scan bounds are heuristics inherited
/// from observed listing exports, not load-bearing constants, so they are
/// configuration rather than literals in the normalizer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportConfig {
    /// First-pass plausible price range for the whole-row numeric scan.
    pub narrow_price_min: f64,
    pub narrow_price_max: f64,
    /// Second-pass widened range.
    pub wide_price_min: f64,
    pub wide_price_max: f64,
    /// Max rows per request when the optional AI remap pre-pass is on.
    pub remap_batch_size: usize,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            narrow_price_min: 10_000.0,
            narrow_price_max: 99_999_999.0,
            wide_price_min: 500.0,
            wide_price_max: 999_999_999.0,
            remap_batch_size: 20,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub llm: LLMConfig,
    pub import: ImportConfig,
}

impl AppConfig {
    /// Defaults, overlaid with `estatepulse.toml`, overlaid with
    /// `ESTATEPULSE_*` environment variables (e.g.
    /// `ESTATEPULSE_SERVER__PORT=8080`, `ESTATEPULSE_LLM__API_KEY=...`).
    pub fn load() -> Result<Self> {
        let config: AppConfig = Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(Toml::file("estatepulse.toml"))
            .merge(Env::prefixed("ESTATEPULSE_").split("__"))
            .extract()
            .map_err(|e| AppError::ValidationError(format!("Invalid configuration: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        url::Url::parse(&self.llm.base_url).map_err(|e| {
            AppError::ValidationError(format!(
                "llm.base_url is not a valid URL ({}): {}",
                self.llm.base_url, e
            ))
        })?;

        if self.import.remap_batch_size == 0 {
            return Err(AppError::ValidationError(
                "import.remap_batch_size must be at least 1".to_string(),
            ));
        }
        if self.import.narrow_price_min >= self.import.narrow_price_max
            || self.import.wide_price_min >= self.import.wide_price_max
        {
            return Err(AppError::ValidationError(
                "import price scan ranges must be min < max".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        AppConfig::default().validate().unwrap();
    }

    #[test]
    fn bad_price_range_is_rejected() {
        let mut config = AppConfig::default();
        config.import.narrow_price_min = config.import.narrow_price_max;
        assert!(config.validate().is_err());
    }
}
