//! Backend endpoint configuration.
//!
//! Native processes read `RECIPE_BOX_SUPABASE_URL` / `RECIPE_BOX_SUPABASE_ANON_KEY`
//! at runtime (a `.env` file is honoured via `dotenvy`). WASM bundles have no
//! environment, so [`BackendConfig::compiled`] bakes the same variables in at
//! build time. The service-role key only ever exists on the server.

pub const URL_VAR: &str = "RECIPE_BOX_SUPABASE_URL";
pub const ANON_KEY_VAR: &str = "RECIPE_BOX_SUPABASE_ANON_KEY";
pub const SERVICE_ROLE_KEY_VAR: &str = "RECIPE_BOX_SUPABASE_SERVICE_ROLE_KEY";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} not set")]
    Missing(&'static str),
}

/// Public BaaS endpoint plus its anonymous API key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    pub url: String,
    pub anon_key: String,
}

impl BackendConfig {
    pub fn new(url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        let url: String = url.into();
        Self {
            url: url.trim_end_matches('/').to_string(),
            anon_key: anon_key.into(),
        }
    }

    /// Read the configuration from the process environment.
    #[cfg(feature = "server")]
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let url = std::env::var(URL_VAR).map_err(|_| ConfigError::Missing(URL_VAR))?;
        let anon_key =
            std::env::var(ANON_KEY_VAR).map_err(|_| ConfigError::Missing(ANON_KEY_VAR))?;
        Ok(Self::new(url, anon_key))
    }

    /// Configuration baked in at compile time.
    pub fn compiled() -> Result<Self, ConfigError> {
        let url = option_env!("RECIPE_BOX_SUPABASE_URL").ok_or(ConfigError::Missing(URL_VAR))?;
        let anon_key = option_env!("RECIPE_BOX_SUPABASE_ANON_KEY")
            .ok_or(ConfigError::Missing(ANON_KEY_VAR))?;
        Ok(Self::new(url, anon_key))
    }

    /// Absolute URL for a path under the backend root, e.g. `/rest/v1/recipes`.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.url, path.trim_start_matches('/'))
    }
}

/// Server-side configuration with the privileged service-role key.
#[cfg(feature = "server")]
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub backend: BackendConfig,
    pub service_role_key: String,
}

#[cfg(feature = "server")]
impl ServiceConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let backend = BackendConfig::from_env()?;
        let service_role_key = std::env::var(SERVICE_ROLE_KEY_VAR)
            .map_err(|_| ConfigError::Missing(SERVICE_ROLE_KEY_VAR))?;
        Ok(Self {
            backend,
            service_role_key,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_cleanly() {
        let config = BackendConfig::new("https://abc.supabase.co/", "anon");
        assert_eq!(config.url, "https://abc.supabase.co");
        assert_eq!(
            config.endpoint("/rest/v1/recipes"),
            "https://abc.supabase.co/rest/v1/recipes"
        );
        assert_eq!(
            config.endpoint("auth/v1/user"),
            "https://abc.supabase.co/auth/v1/user"
        );
    }

    #[test]
    fn test_missing_variable_message() {
        assert_eq!(
            ConfigError::Missing(URL_VAR).to_string(),
            "RECIPE_BOX_SUPABASE_URL not set"
        );
    }
}
