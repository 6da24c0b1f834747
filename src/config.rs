//! Server configuration read from the environment.

use std::env;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

use crate::compositor::PageGeometry;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{name} has an invalid value '{value}': {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub log_filter: String,
    pub allowed_origins: Vec<String>,
    pub render_cache_ttl: Duration,
    pub render_cache_capacity: u64,
    /// Sessions untouched for this long are dropped.
    pub session_idle_timeout: Duration,
    pub session_capacity: u64,
    pub geometry: PageGeometry,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            log_filter: "info".to_string(),
            allowed_origins: vec![
                "http://localhost:3000".to_string(),
                "http://localhost:5173".to_string(),
                "http://127.0.0.1:8080".to_string(),
            ],
            render_cache_ttl: Duration::from_secs(10 * 60),
            render_cache_capacity: 200,
            session_idle_timeout: Duration::from_secs(60 * 60),
            session_capacity: 10_000,
            geometry: PageGeometry::default(),
        }
    }
}

impl AppConfig {
    /// Read `LEGALDOC_*` variables, falling back to defaults for unset ones.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let allowed_origins = match get("LEGALDOC_ALLOWED_ORIGINS") {
            Some(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(str::to_string)
                .collect(),
            None => defaults.allowed_origins,
        };

        let g = defaults.geometry;
        let geometry = PageGeometry {
            width: parse(&get, "LEGALDOC_PAGE_WIDTH", g.width)?,
            height: parse(&get, "LEGALDOC_PAGE_HEIGHT", g.height)?,
            margin_top: parse(&get, "LEGALDOC_MARGIN_TOP", g.margin_top)?,
            margin_bottom: parse(&get, "LEGALDOC_MARGIN_BOTTOM", g.margin_bottom)?,
            margin_left: parse(&get, "LEGALDOC_MARGIN_LEFT", g.margin_left)?,
            margin_right: parse(&get, "LEGALDOC_MARGIN_RIGHT", g.margin_right)?,
            line_height: parse(&get, "LEGALDOC_LINE_HEIGHT", g.line_height)?,
            char_width: parse(&get, "LEGALDOC_CHAR_WIDTH", g.char_width)?,
        };
        if !geometry.is_usable() {
            return Err(ConfigError::Invalid {
                name: "LEGALDOC_PAGE_*",
                value: format!("{:?}", geometry),
                reason: "page body too small for the document layout".to_string(),
            });
        }

        let ttl_secs: u64 = parse(
            &get,
            "LEGALDOC_RENDER_CACHE_TTL_SECS",
            defaults.render_cache_ttl.as_secs(),
        )?;

        let idle_secs: u64 = parse(
            &get,
            "LEGALDOC_SESSION_IDLE_SECS",
            defaults.session_idle_timeout.as_secs(),
        )?;

        Ok(Self {
            host: get("LEGALDOC_HOST").unwrap_or(defaults.host),
            port: parse(&get, "LEGALDOC_PORT", defaults.port)?,
            log_filter: get("LEGALDOC_LOG").unwrap_or(defaults.log_filter),
            allowed_origins,
            render_cache_ttl: Duration::from_secs(ttl_secs),
            render_cache_capacity: parse(
                &get,
                "LEGALDOC_RENDER_CACHE_CAPACITY",
                defaults.render_cache_capacity,
            )?,
            session_idle_timeout: Duration::from_secs(idle_secs),
            session_capacity: parse(&get, "LEGALDOC_SESSION_CAPACITY", defaults.session_capacity)?,
            geometry,
        })
    }
}

fn parse<T, G>(get: &G, name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    G: Fn(&str) -> Option<String>,
{
    match get(name) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            name,
            value: raw.clone(),
            reason: e.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = from(&[]).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.port, 8080);
        assert_eq!(config.geometry.columns(), 85);
    }

    #[test]
    fn test_overrides() {
        let config = from(&[
            ("LEGALDOC_PORT", "9000"),
            ("LEGALDOC_ALLOWED_ORIGINS", "https://a.example, ,https://b.example"),
            ("LEGALDOC_RENDER_CACHE_TTL_SECS", "30"),
            ("LEGALDOC_SESSION_IDLE_SECS", "900"),
            ("LEGALDOC_PAGE_HEIGHT", "279.4"),
            ("LEGALDOC_LOG", " "),
        ])
        .unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(
            config.allowed_origins,
            vec!["https://a.example", "https://b.example"]
        );
        assert_eq!(config.render_cache_ttl, Duration::from_secs(30));
        assert_eq!(config.session_idle_timeout, Duration::from_secs(900));
        assert_eq!(config.session_capacity, 10_000);
        assert_eq!(config.geometry.height, 279.4);
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn test_invalid_values() {
        let err = from(&[("LEGALDOC_PORT", "eighty")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "LEGALDOC_PORT", .. }));

        let err = from(&[("LEGALDOC_PAGE_HEIGHT", "40")]).unwrap_err();
        assert!(err.to_string().contains("page body too small"));
    }
}
