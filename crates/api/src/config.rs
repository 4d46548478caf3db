//! Environment-driven configuration.

/// Runtime configuration for the API process.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Socket address to bind, `PREPDECK_ADDR` (default `0.0.0.0:8080`).
    pub bind_addr: String,

    /// HS256 secret for bearer tokens, `JWT_SECRET`.
    pub jwt_secret: String,

    /// Deployment profile, `PREPDECK_PROFILE` (default `dev`). Seed-data
    /// initializers only run under `dev`.
    pub profile: String,

    /// Postgres connection string, `DATABASE_URL` (only honored when the
    /// `postgres` feature is enabled).
    pub database_url: Option<String>,
}

impl ApiConfig {
    pub fn from_env() -> Self {
        let jwt_secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| {
            tracing::warn!("JWT_SECRET not set; using insecure dev default");
            "dev-secret".to_string()
        });

        Self {
            bind_addr: std::env::var("PREPDECK_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string()),
            jwt_secret,
            profile: std::env::var("PREPDECK_PROFILE").unwrap_or_else(|_| "dev".to_string()),
            database_url: std::env::var("DATABASE_URL").ok(),
        }
    }

    /// Configuration used by the black-box test servers.
    pub fn for_tests(jwt_secret: &str) -> Self {
        Self {
            bind_addr: "127.0.0.1:0".to_string(),
            jwt_secret: jwt_secret.to_string(),
            profile: "dev".to_string(),
            database_url: None,
        }
    }

    pub fn is_dev(&self) -> bool {
        self.profile == "dev"
    }
}
