use std::env;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use axum::http::HeaderValue;

use crate::error::AppError;

const DEFAULT_CORS_ORIGINS: &str =
    "http://localhost:8025,http://localhost:8026,http://localhost:8028";

/// How a lecturer's username is matched against `modules.primary_lecturer`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LecturerMatch {
    /// `primary_lecturer` contains the username anywhere (case-sensitive).
    Substring,
    /// `primary_lecturer` equals the username.
    Exact,
}

impl FromStr for LecturerMatch {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "substring" => Ok(Self::Substring),
            "exact" => Ok(Self::Exact),
            other => Err(AppError::Config(format!("unknown LECTURER_MATCH: {}", other))),
        }
    }
}

/// What an endpoint does when its SQL statement fails.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QueryFailure {
    /// Respond with a server error.
    Surface,
    /// Log the failure; listings answer an empty list, updates answer OK.
    Swallow,
}

impl FromStr for QueryFailure {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "surface" => Ok(Self::Surface),
            "swallow" => Ok(Self::Swallow),
            other => Err(AppError::Config(format!("unknown QUERY_FAILURE: {}", other))),
        }
    }
}

#[derive(Clone, Debug)]
pub struct RemoteConfig {
    pub user_service_url: String,
    pub assessment_service_url: String,
    pub timeout: Duration,
    pub retries: u32,
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub database_url: String,
    pub max_connections: u32,
    pub remote: RemoteConfig,
    pub lecturer_match: LecturerMatch,
    pub query_failure: QueryFailure,
    pub cors_origins: Vec<String>,
}

impl AppConfig {
    pub fn new_from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup, falling back to defaults
    /// for anything unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let bind_addr = parse("BIND_ADDR", &get("BIND_ADDR", "127.0.0.1:8027"))?;
        let max_connections = parse(
            "DATABASE_MAX_CONNECTIONS",
            &get("DATABASE_MAX_CONNECTIONS", "5"),
        )?;
        let timeout_secs: u64 = parse("REMOTE_TIMEOUT_SECS", &get("REMOTE_TIMEOUT_SECS", "10"))?;
        let retries = parse("REMOTE_RETRIES", &get("REMOTE_RETRIES", "0"))?;

        let cors_origins = parse_origins(&get("CORS_ORIGINS", DEFAULT_CORS_ORIGINS))?;

        Ok(Self {
            bind_addr,
            database_url: get("DATABASE_URL", "sqlite://wisetask.db"),
            max_connections,
            remote: RemoteConfig {
                user_service_url: trim_base(get("USER_SERVICE_URL", "http://localhost:8028/users")),
                assessment_service_url: trim_base(get(
                    "ASSESSMENT_SERVICE_URL",
                    "http://localhost:8026/admin/assessments",
                )),
                timeout: Duration::from_secs(timeout_secs),
                retries,
            },
            lecturer_match: get("LECTURER_MATCH", "substring").parse()?,
            query_failure: get("QUERY_FAILURE", "surface").parse()?,
            cors_origins,
        })
    }
}

fn parse<T: FromStr>(key: &str, value: &str) -> Result<T, AppError> {
    value
        .trim()
        .parse()
        .map_err(|_| AppError::Config(format!("{} has an invalid value: {}", key, value)))
}

// CORS origins must be concrete header values; a wildcard cannot sit in an
// origin list.
fn parse_origins(value: &str) -> Result<Vec<String>, AppError> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|origin| {
            if origin.contains('*') || HeaderValue::from_str(origin).is_err() {
                return Err(AppError::Config(format!(
                    "CORS_ORIGINS has an invalid origin: {}",
                    origin
                )));
            }
            Ok(origin.to_string())
        })
        .collect()
}

fn trim_base(url: String) -> String {
    url.trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn from_pairs(pairs: &[(&str, &str)]) -> Result<AppConfig, AppError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_point_at_sibling_services() {
        let config = from_pairs(&[]).unwrap();
        assert_eq!(config.bind_addr.port(), 8027);
        assert_eq!(config.remote.user_service_url, "http://localhost:8028/users");
        assert_eq!(
            config.remote.assessment_service_url,
            "http://localhost:8026/admin/assessments"
        );
        assert_eq!(config.remote.retries, 0);
        assert_eq!(config.lecturer_match, LecturerMatch::Substring);
        assert_eq!(config.query_failure, QueryFailure::Surface);
        assert_eq!(config.cors_origins.len(), 3);
    }

    #[test]
    fn overrides_are_applied() {
        let config = from_pairs(&[
            ("USER_SERVICE_URL", "http://users.internal/users/"),
            ("REMOTE_RETRIES", "2"),
            ("LECTURER_MATCH", "Exact"),
            ("QUERY_FAILURE", "swallow"),
            ("CORS_ORIGINS", "http://a.example, http://b.example"),
        ])
        .unwrap();
        assert_eq!(config.remote.user_service_url, "http://users.internal/users");
        assert_eq!(config.remote.retries, 2);
        assert_eq!(config.lecturer_match, LecturerMatch::Exact);
        assert_eq!(config.query_failure, QueryFailure::Swallow);
        assert_eq!(config.cors_origins, vec!["http://a.example", "http://b.example"]);
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(matches!(
            from_pairs(&[("LECTURER_MATCH", "fuzzy")]),
            Err(AppError::Config(_))
        ));
        assert!(matches!(
            from_pairs(&[("REMOTE_TIMEOUT_SECS", "soon")]),
            Err(AppError::Config(_))
        ));
    }

    #[test]
    fn wildcard_cors_origin_is_rejected() {
        assert!(matches!(
            from_pairs(&[("CORS_ORIGINS", "*")]),
            Err(AppError::Config(_))
        ));
        assert!(matches!(
            from_pairs(&[("CORS_ORIGINS", "http://localhost:8025,*")]),
            Err(AppError::Config(_))
        ));
        assert!(matches!(
            from_pairs(&[("CORS_ORIGINS", "http://bad\norigin")]),
            Err(AppError::Config(_))
        ));
    }
}
