use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    /// Expected `aud` claim of session tokens; unchecked when unset.
    pub jwt_audience: Option<String>,
    /// Cached carts untouched for this long are evicted.
    pub cart_idle_secs: u64,
    pub cart_sweep_secs: u64,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET is not set"))?;
        let jwt_audience = env::var("JWT_AUDIENCE").ok().filter(|a| !a.is_empty());
        let cart_idle_secs = env_secs("CART_IDLE_SECS", 1800);
        let cart_sweep_secs = env_secs("CART_SWEEP_SECS", 300);
        Ok(Self {
            port,
            database_url,
            host,
            jwt_secret,
            jwt_audience,
            cart_idle_secs,
            cart_sweep_secs,
        })
    }
}

fn env_secs(key: &str, default: u64) -> u64 {
    env::var(key)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .filter(|secs| *secs > 0)
        .unwrap_or(default)
}
