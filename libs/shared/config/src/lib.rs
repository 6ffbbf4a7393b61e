use std::env;
use tracing::warn;

/// Process-wide configuration, loaded once at startup and passed to service
/// constructors. The signing secret is read here and nowhere else.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub jwt_secret: String,
    pub token_ttl_days: i64,
    pub bind_addr: String,
}

const DEFAULT_TOKEN_TTL_DAYS: i64 = 7;

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            jwt_secret: env::var("CLINIC_JWT_SECRET")
                .unwrap_or_else(|_| {
                    warn!("CLINIC_JWT_SECRET not set, using empty value");
                    String::new()
                }),
            token_ttl_days: env::var("CLINIC_TOKEN_TTL_DAYS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_TOKEN_TTL_DAYS),
            bind_addr: env::var("CLINIC_BIND_ADDR")
                .unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.jwt_secret.is_empty() && self.token_ttl_days > 0
    }
}
