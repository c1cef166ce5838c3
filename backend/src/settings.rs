//! Service configuration loaded via OrthoConfig.
//!
//! Values come from `COMEDOR_*` environment variables (or matching CLI flags).
//! Everything is optional; accessors apply defaults and validate.

use std::net::SocketAddr;
use std::time::Duration;

use chrono::TimeDelta;
use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::{
    DEFAULT_TOKEN_TTL_HOURS, MAX_TOKEN_TTL_HOURS, RegistrationLinkBase, TokenPolicy,
};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_FRONTEND_URL: &str = "http://localhost:5173";
const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 3600;
const DEFAULT_POOL_MAX_SIZE: u32 = 10;
const MAX_TOKEN_RETENTION_DAYS: i64 = 3650;

/// Invalid configuration values, reported at startup.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    /// Bind address does not parse.
    #[error("COMEDOR_BIND_ADDR is not a socket address: {value}")]
    BindAddr {
        /// Configured value.
        value: String,
    },
    /// Frontend base is not an absolute URL.
    #[error("COMEDOR_FRONTEND_URL is not an absolute URL: {value}")]
    FrontendUrl {
        /// Configured value.
        value: String,
    },
    /// Token lifetime is out of range.
    #[error(
        "COMEDOR_TOKEN_TTL_HOURS must be between 1 and {max}, got {value}",
        max = MAX_TOKEN_TTL_HOURS
    )]
    TokenTtl {
        /// Configured hours.
        value: i64,
    },
    /// Retention window is out of range.
    #[error(
        "COMEDOR_TOKEN_RETENTION_DAYS must be between 0 and {max}, got {value}",
        max = MAX_TOKEN_RETENTION_DAYS
    )]
    TokenRetention {
        /// Configured days.
        value: i64,
    },
    /// Sweep interval is zero.
    #[error("COMEDOR_TOKEN_SWEEP_INTERVAL_SECS must be positive")]
    SweepInterval,
    /// Pool size is zero.
    #[error("COMEDOR_DB_POOL_MAX_SIZE must be positive")]
    PoolSize,
}

/// Expired-token sweep parameters, present only when retention is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenSweepSettings {
    /// Age past expiry after which tokens are deleted.
    pub retention: TimeDelta,
    /// Pause between passes.
    pub interval: Duration,
}

/// Configuration for the attendance service.
#[derive(Debug, Clone, Default, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "COMEDOR")]
pub struct AppSettings {
    /// Socket address the HTTP server binds to.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL; when unset the server runs on fixture adapters.
    pub database_url: Option<String>,
    /// Frontend base used to build registration links.
    pub frontend_url: Option<String>,
    /// Validity window of new tokens, in hours.
    pub token_ttl_hours: Option<i64>,
    /// Delete tokens that expired more than this many days ago.
    pub token_retention_days: Option<i64>,
    /// Seconds between sweep passes.
    pub token_sweep_interval_secs: Option<u64>,
    /// Maximum pooled database connections.
    pub db_pool_max_size: Option<u32>,
}

impl AppSettings {
    /// Socket address to listen on, `0.0.0.0:8080` by default.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|_| SettingsError::BindAddr {
            value: raw.to_owned(),
        })
    }

    /// Database URL, ignoring blank values.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// Base for registration links, `http://localhost:5173` by default.
    pub fn frontend_base(&self) -> Result<RegistrationLinkBase, SettingsError> {
        let raw = self.frontend_url.as_deref().unwrap_or(DEFAULT_FRONTEND_URL);
        RegistrationLinkBase::parse(raw).map_err(|_| SettingsError::FrontendUrl {
            value: raw.to_owned(),
        })
    }

    /// Token lifetime, 24 hours by default.
    pub fn token_policy(&self) -> Result<TokenPolicy, SettingsError> {
        let hours = self.token_ttl_hours.unwrap_or(DEFAULT_TOKEN_TTL_HOURS);
        TimeDelta::try_hours(hours)
            .and_then(TokenPolicy::new)
            .ok_or(SettingsError::TokenTtl { value: hours })
    }

    /// Sweep parameters, or `None` when no retention window is configured.
    pub fn token_sweep(&self) -> Result<Option<TokenSweepSettings>, SettingsError> {
        let Some(days) = self.token_retention_days else {
            return Ok(None);
        };
        let retention = (0..=MAX_TOKEN_RETENTION_DAYS)
            .contains(&days)
            .then(|| TimeDelta::try_days(days))
            .flatten()
            .ok_or(SettingsError::TokenRetention { value: days })?;
        let secs = self
            .token_sweep_interval_secs
            .unwrap_or(DEFAULT_SWEEP_INTERVAL_SECS);
        if secs == 0 {
            return Err(SettingsError::SweepInterval);
        }
        Ok(Some(TokenSweepSettings {
            retention,
            interval: Duration::from_secs(secs),
        }))
    }

    /// Pool size, 10 by default.
    pub fn db_pool_max_size(&self) -> Result<u32, SettingsError> {
        match self.db_pool_max_size.unwrap_or(DEFAULT_POOL_MAX_SIZE) {
            0 => Err(SettingsError::PoolSize),
            size => Ok(size),
        }
    }

    /// Run every accessor so bad values fail at startup rather than later.
    pub fn validate(&self) -> Result<(), SettingsError> {
        self.bind_addr()?;
        self.frontend_base()?;
        self.token_policy()?;
        self.token_sweep()?;
        self.db_pool_max_size()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    use super::*;

    const KEYS: [&str; 7] = [
        "COMEDOR_BIND_ADDR",
        "COMEDOR_DATABASE_URL",
        "COMEDOR_FRONTEND_URL",
        "COMEDOR_TOKEN_TTL_HOURS",
        "COMEDOR_TOKEN_RETENTION_DAYS",
        "COMEDOR_TOKEN_SWEEP_INTERVAL_SECS",
        "COMEDOR_DB_POOL_MAX_SIZE",
    ];

    fn load_from_empty_args() -> AppSettings {
        AppSettings::load_from_iter([OsString::from("comedor-backend")])
            .expect("config should load")
    }

    fn env_with(overrides: &[(&str, &str)]) -> Vec<(&'static str, Option<String>)> {
        KEYS.iter()
            .map(|key| {
                let value = overrides
                    .iter()
                    .find(|(name, _)| name == key)
                    .map(|(_, value)| (*value).to_owned());
                (*key, value)
            })
            .collect()
    }

    #[rstest]
    fn defaults_apply_when_unset() {
        let _guard = lock_env(env_with(&[]));

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr().expect("default addr"),
            "0.0.0.0:8080".parse::<SocketAddr>().expect("addr")
        );
        assert!(settings.database_url().is_none());
        assert_eq!(
            settings.token_policy().expect("default policy").ttl(),
            TimeDelta::hours(24)
        );
        assert_eq!(settings.token_sweep().expect("sweep"), None);
        assert_eq!(settings.db_pool_max_size().expect("pool"), 10);
        settings.validate().expect("defaults are valid");
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env(env_with(&[
            ("COMEDOR_BIND_ADDR", "127.0.0.1:9000"),
            ("COMEDOR_DATABASE_URL", "postgres://localhost/comedor"),
            ("COMEDOR_FRONTEND_URL", "https://comedor.example.org"),
            ("COMEDOR_TOKEN_TTL_HOURS", "6"),
            ("COMEDOR_TOKEN_RETENTION_DAYS", "30"),
            ("COMEDOR_TOKEN_SWEEP_INTERVAL_SECS", "60"),
        ]));

        let settings = load_from_empty_args();
        assert_eq!(
            settings.database_url(),
            Some("postgres://localhost/comedor")
        );
        assert_eq!(
            settings.token_policy().expect("policy").ttl(),
            TimeDelta::hours(6)
        );
        assert_eq!(
            settings.token_sweep().expect("sweep"),
            Some(TokenSweepSettings {
                retention: TimeDelta::days(30),
                interval: Duration::from_secs(60),
            })
        );
    }

    #[rstest]
    #[case("COMEDOR_TOKEN_TTL_HOURS", "0")]
    #[case("COMEDOR_BIND_ADDR", "not-an-address")]
    #[case("COMEDOR_FRONTEND_URL", "/relative")]
    #[case("COMEDOR_DB_POOL_MAX_SIZE", "0")]
    #[case("COMEDOR_TOKEN_TTL_HOURS", "1000000000000")]
    #[case("COMEDOR_TOKEN_RETENTION_DAYS", "-1")]
    #[case("COMEDOR_TOKEN_RETENTION_DAYS", "100000000000")]
    fn invalid_values_fail_validation(#[case] key: &str, #[case] value: &str) {
        let _guard = lock_env(env_with(&[(key, value)]));

        let settings = load_from_empty_args();
        assert!(settings.validate().is_err());
    }
}
