use std::net::SocketAddr;

use anyhow::Context;

#[derive(Clone, Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub omdb_api_key: String,
    pub omdb_base_url: String,
    pub database_url: String,
    pub http_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| std::env::var(key).ok())
    }

    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let host = var("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port: u16 = var("PORT").unwrap_or_else(|| "3000".to_string()).parse().context("PORT")?;

        let omdb_api_key = var("OMDB_API_KEY")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .context("OMDB_API_KEY must be set")?;
        let omdb_base_url =
            var("OMDB_BASE_URL").unwrap_or_else(|| "https://www.omdbapi.com/".to_string());

        let database_url =
            var("DATABASE_URL").unwrap_or_else(|| "sqlite://movieshelf.db?mode=rwc".to_string());

        let http_timeout_secs: u64 = match var("HTTP_TIMEOUT_SECS") {
            Some(s) => s.parse().context("HTTP_TIMEOUT_SECS")?,
            None => 30,
        };

        Ok(Self {
            addr: format!("{host}:{port}").parse().context("HOST/PORT")?,
            omdb_api_key,
            omdb_base_url,
            database_url,
            http_timeout_secs,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_only_api_key_is_set() {
        let config = Config::from_vars(vars(&[("OMDB_API_KEY", "abc123")])).unwrap();
        assert_eq!(config.omdb_api_key, "abc123");
        assert_eq!(config.omdb_base_url, "https://www.omdbapi.com/");
        assert_eq!(config.database_url, "sqlite://movieshelf.db?mode=rwc");
        assert_eq!(config.addr, "0.0.0.0:3000".parse().unwrap());
        assert_eq!(config.http_timeout_secs, 30);
    }

    #[test]
    fn api_key_is_required() {
        assert!(Config::from_vars(vars(&[])).is_err());
        assert!(Config::from_vars(vars(&[("OMDB_API_KEY", "   ")])).is_err());
    }

    #[test]
    fn bad_port_is_rejected() {
        let err = Config::from_vars(vars(&[("OMDB_API_KEY", "k"), ("PORT", "http")])).unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }

    #[test]
    fn overrides_are_read() {
        let config = Config::from_vars(vars(&[
            ("OMDB_API_KEY", "k"),
            ("OMDB_BASE_URL", "http://127.0.0.1:9000/"),
            ("HOST", "127.0.0.1"),
            ("PORT", "8080"),
            ("HTTP_TIMEOUT_SECS", "5"),
        ]))
        .unwrap();
        assert_eq!(config.omdb_base_url, "http://127.0.0.1:9000/");
        assert_eq!(config.addr, "127.0.0.1:8080".parse().unwrap());
        assert_eq!(config.http_timeout_secs, 5);
    }
}
