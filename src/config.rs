use std::net::Ipv4Addr;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{key} has an invalid value: {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// Server configuration loaded from environment variables.
///
/// | Env Var                    | Default              |
/// |----------------------------|----------------------|
/// | `HOST`                     | `0.0.0.0`            |
/// | `PORT`                     | `3000`               |
/// | `DATABASE_URL`             | `sqlite://movies.db` |
/// | `DATABASE_MAX_CONNECTIONS` | `5`                  |
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: Ipv4Addr,
    pub port: u16,
    pub database_url: String,
    pub max_connections: u32,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary key lookup; missing keys take their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = parse_or(&lookup, "HOST", Ipv4Addr::UNSPECIFIED)?;
        let port = parse_or(&lookup, "PORT", 3000)?;
        let database_url = lookup("DATABASE_URL").unwrap_or_else(|| "sqlite://movies.db".into());
        let max_connections = parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 5)?;

        if max_connections == 0 {
            return Err(ConfigError::Invalid {
                key: "DATABASE_MAX_CONNECTIONS",
                value: "0".into(),
            });
        }

        Ok(Self {
            host,
            port,
            database_url,
            max_connections,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}
