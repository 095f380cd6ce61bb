use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub refresh_secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
    pub refresh_ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub endpoint: String,
    pub bucket: String,
    pub access_key: String,
    pub secret_key: String,
    pub public_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub storage: StorageConfig,
    pub max_upload_bytes: usize,
    pub host: String,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; `from_env` passes `std::env::var`.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| lookup(key).with_context(|| format!("{key} must be set"));
        let number = |key: &str, default: i64| {
            lookup(key)
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(default)
        };

        let jwt = JwtConfig {
            secret: required("JWT_SECRET")?,
            refresh_secret: required("JWT_REFRESH_SECRET")?,
            issuer: lookup("JWT_ISSUER").unwrap_or_else(|| "socialite".into()),
            audience: lookup("JWT_AUDIENCE").unwrap_or_else(|| "socialite-users".into()),
            ttl_minutes: number("JWT_TTL_MINUTES", 60),
            refresh_ttl_minutes: number("JWT_REFRESH_TTL_MINUTES", 60 * 24 * 14),
        };
        anyhow::ensure!(
            jwt.secret != jwt.refresh_secret,
            "JWT_REFRESH_SECRET must differ from JWT_SECRET"
        );

        let endpoint = required("MINIO_ENDPOINT")?;
        let bucket = required("MINIO_BUCKET")?;
        let public_url = lookup("STORAGE_PUBLIC_URL")
            .unwrap_or_else(|| format!("{}/{}", endpoint.trim_end_matches('/'), bucket));
        let storage = StorageConfig {
            endpoint,
            bucket,
            access_key: required("MINIO_ACCESS_KEY")?,
            secret_key: required("MINIO_SECRET_KEY")?,
            public_url,
        };

        let max_upload_bytes = match lookup("MAX_UPLOAD_BYTES") {
            Some(raw) => raw
                .parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .with_context(|| format!("MAX_UPLOAD_BYTES must be a positive integer, got {raw:?}"))?,
            None => 5 * 1024 * 1024,
        };
        let port = match lookup("APP_PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .with_context(|| format!("APP_PORT must be a port number, got {raw:?}"))?,
            None => 8080,
        };

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            jwt,
            storage,
            max_upload_bytes,
            host: lookup("APP_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port,
        })
    }
}
