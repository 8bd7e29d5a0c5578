use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Result, anyhow, bail};
use jsonwebtoken::Algorithm;

/// Signing secret used when `PRAISE_JWT_SECRET` is unset. Fine for local
/// development only; startup warns when it is in effect.
pub const DEV_JWT_SECRET: &str = "dev-secret-change-me";

const DEFAULT_ORIGINS: &str = "http://localhost:5173,http://127.0.0.1:5173";
const DEFAULT_ADMIN_PASSWORD: &str = "Adm1n_Pra1se";

/// Process-wide settings, read once at startup and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: PathBuf,
    pub jwt_secret: String,
    pub jwt_algorithm: Algorithm,
    pub token_ttl: chrono::Duration,
    pub cors_origins: Vec<String>,
    pub host: String,
    pub port: u16,
    pub admin_password: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; `from_env` passes the process environment.
    pub fn from_lookup<F>(get: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| get(key).unwrap_or_else(|| default.to_string());

        let jwt_secret = var("PRAISE_JWT_SECRET", DEV_JWT_SECRET);
        if jwt_secret.trim().is_empty() {
            bail!("PRAISE_JWT_SECRET must not be empty");
        }

        let algorithm_name = var("PRAISE_JWT_ALGORITHM", "HS256");
        let jwt_algorithm = Algorithm::from_str(&algorithm_name)
            .map_err(|_| anyhow!("unknown PRAISE_JWT_ALGORITHM '{}'", algorithm_name))?;
        if !matches!(jwt_algorithm, Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512) {
            bail!("PRAISE_JWT_ALGORITHM must be a shared-secret algorithm (HS256/HS384/HS512)");
        }

        let ttl_minutes: i64 = var("PRAISE_TOKEN_TTL_MINUTES", "30")
            .parse()
            .map_err(|e| anyhow!("invalid PRAISE_TOKEN_TTL_MINUTES: {}", e))?;
        if ttl_minutes <= 0 {
            bail!("PRAISE_TOKEN_TTL_MINUTES must be positive");
        }

        let cors_origins: Vec<String> = var("PRAISE_CORS_ORIGINS", DEFAULT_ORIGINS)
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .map(String::from)
            .collect();

        let port: u16 = var("PRAISE_PORT", "8000")
            .parse()
            .map_err(|e| anyhow!("invalid PRAISE_PORT: {}", e))?;

        Ok(Self {
            db_path: var("PRAISE_DB_PATH", "school_praise.db").into(),
            jwt_secret,
            jwt_algorithm,
            token_ttl: chrono::Duration::minutes(ttl_minutes),
            cors_origins,
            host: var("PRAISE_HOST", "0.0.0.0"),
            port,
            admin_password: var("PRAISE_ADMIN_PASSWORD", DEFAULT_ADMIN_PASSWORD),
        })
    }

    pub fn uses_dev_secret(&self) -> bool {
        self.jwt_secret == DEV_JWT_SECRET
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
