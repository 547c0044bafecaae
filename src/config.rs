use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::str::FromStr;
use std::time::Duration;
use strum_macros::EnumString;
use tracing::warn;

/// Device location permission as reported by `GEO_PERMISSION`
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum GeoPermission {
    Granted,
    Denied,
    /// Any other answer; the device state cannot be classified
    #[strum(disabled)]
    Unrecognized,
}

#[derive(Clone)]
pub struct Config {
    pub server_addr: String,
    pub backend_url: String,
    pub session_token: String,
    pub request_timeout: Duration,

    // Device position
    pub geo_latitude: Option<f64>,
    pub geo_longitude: Option<f64>,
    pub geo_permission: GeoPermission,
    pub geolocation_timeout: Duration,

    // Rate limiting
    pub rate_protected_per_min: u32,

    pub api_prefix: String,
    pub log_dir: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup, `from_env` uses the process env.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let geo_permission = match var("GEO_PERMISSION") {
            None => GeoPermission::Granted,
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                warn!(value = %raw, "GEO_PERMISSION is neither 'granted' nor 'denied'");
                GeoPermission::Unrecognized
            }),
        };

        Ok(Self {
            server_addr: var("SERVER_ADDR").unwrap_or_else(|| "127.0.0.1:8081".to_string()),
            backend_url: var("BACKEND_URL").context("BACKEND_URL must be set")?,
            session_token: var("SESSION_TOKEN").context("SESSION_TOKEN must be set")?,
            request_timeout: Duration::from_secs(parse_or(&var, "REQUEST_TIMEOUT_SECS", 30)?),

            geo_latitude: parse_opt(&var, "GEO_LATITUDE")?,
            geo_longitude: parse_opt(&var, "GEO_LONGITUDE")?,
            geo_permission,
            geolocation_timeout: Duration::from_secs(parse_or(&var, "GEOLOCATION_TIMEOUT_SECS", 10)?),

            rate_protected_per_min: parse_or(&var, "RATE_PROTECTED_PER_MIN", 1000)?,

            api_prefix: var("API_PREFIX").unwrap_or_else(|| "/api".to_string()),
            log_dir: var("LOG_DIR").unwrap_or_else(|| "logs".to_string()),
        })
    }

    #[cfg(test)]
    pub fn for_tests() -> Self {
        Self {
            server_addr: "127.0.0.1:0".to_string(),
            backend_url: "http://localhost:8080/api".to_string(),
            session_token: String::new(),
            request_timeout: Duration::from_secs(5),
            geo_latitude: None,
            geo_longitude: None,
            geo_permission: GeoPermission::Granted,
            geolocation_timeout: Duration::from_secs(10),
            rate_protected_per_min: 1000,
            api_prefix: "/api".to_string(),
            log_dir: "logs".to_string(),
        }
    }
}

fn parse_opt<T>(var: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    var(key)
        .map(|raw| raw.trim().parse::<T>().with_context(|| format!("{key} is not valid: '{raw}'")))
        .transpose()
}

fn parse_or<T>(var: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    Ok(parse_opt(var, key)?.unwrap_or(default))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply() {
        let config = Config::from_lookup(lookup(&[
            ("BACKEND_URL", "http://hrm:8080/api"),
            ("SESSION_TOKEN", "abc"),
        ]))
        .unwrap();

        assert_eq!(config.server_addr, "127.0.0.1:8081");
        assert_eq!(config.api_prefix, "/api");
        assert_eq!(config.geolocation_timeout, Duration::from_secs(10));
        assert_eq!(config.rate_protected_per_min, 1000);
        assert_eq!(config.geo_permission, GeoPermission::Granted);
        assert!(config.geo_latitude.is_none());
    }

    #[test]
    fn backend_url_is_required() {
        let err = Config::from_lookup(lookup(&[("SESSION_TOKEN", "abc")])).err().unwrap();
        assert!(err.to_string().contains("BACKEND_URL"));
    }

    #[test]
    fn bad_numbers_are_errors_not_panics() {
        let result = Config::from_lookup(lookup(&[
            ("BACKEND_URL", "http://hrm:8080/api"),
            ("SESSION_TOKEN", "abc"),
            ("GEO_LATITUDE", "north"),
        ]));
        assert!(result.is_err());
    }

    #[test]
    fn reads_geolocation() {
        let config = Config::from_lookup(lookup(&[
            ("BACKEND_URL", "http://hrm:8080/api"),
            ("SESSION_TOKEN", "abc"),
            ("GEO_LATITUDE", "23.8103"),
            ("GEO_LONGITUDE", "90.4125"),
            ("GEO_PERMISSION", "denied"),
        ]))
        .unwrap();

        assert_eq!(config.geo_latitude, Some(23.8103));
        assert_eq!(config.geo_longitude, Some(90.4125));
        assert_eq!(config.geo_permission, GeoPermission::Denied);
    }

    #[test]
    fn unrecognized_permission_is_kept_not_rejected() {
        let config = Config::from_lookup(lookup(&[
            ("BACKEND_URL", "http://hrm:8080/api"),
            ("SESSION_TOKEN", "abc"),
            ("GEO_PERMISSION", "prompt"),
        ]))
        .unwrap();
        assert_eq!(config.geo_permission, GeoPermission::Unrecognized);

        let config = Config::from_lookup(lookup(&[
            ("BACKEND_URL", "http://hrm:8080/api"),
            ("SESSION_TOKEN", "abc"),
            ("GEO_PERMISSION", " Denied "),
        ]))
        .unwrap();
        assert_eq!(config.geo_permission, GeoPermission::Denied);
    }
}
