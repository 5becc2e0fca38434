//! Service-role clients, built once per server process.

use tokio::sync::OnceCell;

use crate::auth::RestAdminAuth;
use crate::config::{ConfigError, ServiceConfig};
use crate::gateway::RestGateway;

static SERVICE: OnceCell<ServiceClients> = OnceCell::const_new();

/// Gateway and admin auth client that bypass row-level security.
pub struct ServiceClients {
    pub gateway: RestGateway,
    pub admin: RestAdminAuth,
}

/// Get or initialize the service clients from the environment.
pub async fn service_clients() -> Result<&'static ServiceClients, ConfigError> {
    SERVICE
        .get_or_try_init(|| async {
            let config = ServiceConfig::from_env()?;
            tracing::info!(url = %config.backend.url, "initialised service-role clients");
            Ok(ServiceClients {
                gateway: RestGateway::with_service_role(
                    config.backend.clone(),
                    config.service_role_key.clone(),
                ),
                admin: RestAdminAuth::new(config.backend, config.service_role_key),
            })
        })
        .await
}
