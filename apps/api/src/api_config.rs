use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use chrono::Duration;
use taskpro_core::AppError;
use tracing_subscriber::EnvFilter;

/// Shortest accepted `JWT_SECRET`, in bytes.
pub const MIN_JWT_SECRET_BYTES: usize = 32;

const DEFAULT_TOKEN_TTL_MINUTES: i64 = 24 * 60;

/// Longest accepted `TOKEN_TTL_MINUTES`: one year.
pub const MAX_TOKEN_TTL_MINUTES: i64 = 366 * 24 * 60;

#[derive(Clone)]
pub struct ApiConfig {
    pub migrate_only: bool,
    pub database_url: Option<String>,
    pub frontend_url: String,
    pub jwt_secret: String,
    pub token_ttl: Duration,
    pub api_host: String,
    pub api_port: u16,
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("ApiConfig")
            .field("migrate_only", &self.migrate_only)
            .field("database_configured", &self.database_url.is_some())
            .field("frontend_url", &self.frontend_url)
            .field("token_ttl", &self.token_ttl)
            .field("api_host", &self.api_host)
            .field("api_port", &self.api_port)
            .finish_non_exhaustive()
    }
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        let migrate_only = env::args().nth(1).as_deref() == Some("migrate");
        Self::from_lookup(migrate_only, |name| env::var(name).ok())
    }

    pub fn from_lookup(
        migrate_only: bool,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, AppError> {
        let database_url = lookup("DATABASE_URL").filter(|value| !value.trim().is_empty());
        if migrate_only && database_url.is_none() {
            return Err(AppError::Validation(
                "DATABASE_URL is required to run migrations".to_owned(),
            ));
        }

        let jwt_secret = required_non_empty(&lookup, "JWT_SECRET")?;
        if jwt_secret.len() < MIN_JWT_SECRET_BYTES {
            return Err(AppError::Validation(format!(
                "JWT_SECRET must be at least {MIN_JWT_SECRET_BYTES} bytes"
            )));
        }

        let token_ttl_minutes = match lookup("TOKEN_TTL_MINUTES") {
            Some(value) => value
                .trim()
                .parse::<i64>()
                .ok()
                .filter(|minutes| (1..=MAX_TOKEN_TTL_MINUTES).contains(minutes))
                .ok_or_else(|| {
                    AppError::Validation(format!(
                        "TOKEN_TTL_MINUTES must be a whole number between 1 and \
                         {MAX_TOKEN_TTL_MINUTES}, got '{value}'"
                    ))
                })?,
            None => DEFAULT_TOKEN_TTL_MINUTES,
        };
        let token_ttl = Duration::try_minutes(token_ttl_minutes).ok_or_else(|| {
            AppError::Validation(format!(
                "TOKEN_TTL_MINUTES is out of range, got {token_ttl_minutes}"
            ))
        })?;

        let frontend_url =
            lookup("FRONTEND_URL").unwrap_or_else(|| "http://localhost:5173".to_owned());
        let api_host = lookup("API_HOST").unwrap_or_else(|| "127.0.0.1".to_owned());
        let api_port = match lookup("API_PORT") {
            Some(value) => value
                .parse::<u16>()
                .map_err(|error| AppError::Validation(format!("invalid API_PORT: {error}")))?,
            None => 5000,
        };

        Ok(Self {
            migrate_only,
            database_url,
            frontend_url,
            jwt_secret,
            token_ttl,
            api_host,
            api_port,
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Internal(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn required_non_empty(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
) -> Result<String, AppError> {
    let value = lookup(name).ok_or_else(|| AppError::Validation(format!("{name} is required")))?;
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{name} must not be empty")));
    }

    Ok(value)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use proptest::prelude::*;
    use taskpro_core::AppError;

    use super::{ApiConfig, MAX_TOKEN_TTL_MINUTES, MIN_JWT_SECRET_BYTES};

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    fn load(entries: &[(&str, &str)]) -> Result<ApiConfig, AppError> {
        let values: HashMap<String, String> = entries
            .iter()
            .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
            .collect();
        ApiConfig::from_lookup(false, |name| values.get(name).cloned())
    }

    #[test]
    fn defaults_apply_when_only_secret_is_set() {
        let config = load(&[("JWT_SECRET", SECRET)])
            .unwrap_or_else(|error| panic!("config should load: {error}"));

        assert_eq!(config.database_url, None);
        assert_eq!(config.frontend_url, "http://localhost:5173");
        assert_eq!(config.token_ttl.num_minutes(), 1440);
        assert_eq!(
            config.socket_address().map(|address| address.to_string()).ok(),
            Some("127.0.0.1:5000".to_owned())
        );
    }

    #[test]
    fn missing_secret_is_fatal() {
        let result = load(&[]);
        assert!(matches!(result, Err(AppError::Validation(ref message)) if message == "JWT_SECRET is required"));
    }

    #[test]
    fn non_positive_ttl_is_rejected() {
        assert!(load(&[("JWT_SECRET", SECRET), ("TOKEN_TTL_MINUTES", "0")]).is_err());
        assert!(load(&[("JWT_SECRET", SECRET), ("TOKEN_TTL_MINUTES", "soon")]).is_err());
    }

    #[test]
    fn oversized_ttl_is_rejected() {
        let too_long = (MAX_TOKEN_TTL_MINUTES + 1).to_string();
        let huge = i64::MAX.to_string();

        assert!(load(&[("JWT_SECRET", SECRET), ("TOKEN_TTL_MINUTES", too_long.as_str())]).is_err());
        assert!(load(&[("JWT_SECRET", SECRET), ("TOKEN_TTL_MINUTES", huge.as_str())]).is_err());

        let longest = MAX_TOKEN_TTL_MINUTES.to_string();
        let config = load(&[("JWT_SECRET", SECRET), ("TOKEN_TTL_MINUTES", longest.as_str())])
            .unwrap_or_else(|error| panic!("one year should be accepted: {error}"));
        assert_eq!(config.token_ttl.num_minutes(), MAX_TOKEN_TTL_MINUTES);
    }

    #[test]
    fn migrate_requires_database_url() {
        let result = ApiConfig::from_lookup(true, |name| {
            (name == "JWT_SECRET").then(|| SECRET.to_owned())
        });
        assert!(result.is_err());
    }

    #[test]
    fn debug_output_hides_secret() {
        let config = load(&[("JWT_SECRET", SECRET)])
            .unwrap_or_else(|error| panic!("config should load: {error}"));
        assert!(!format!("{config:?}").contains(SECRET));
    }

    proptest! {
        #[test]
        fn short_secrets_are_rejected(secret in "[a-z0-9]{1,31}") {
            prop_assert!(secret.len() < MIN_JWT_SECRET_BYTES);
            prop_assert!(load(&[("JWT_SECRET", secret.as_str())]).is_err());
        }
    }
}
