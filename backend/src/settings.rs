//! Application settings loaded via OrthoConfig.
//!
//! Values come from CLI flags, `HOTEL_*` environment variables and
//! configuration files. Every field is optional; accessors supply defaults.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::{DEFAULT_TOKEN_TTL_HOURS, MAX_TOKEN_TTL_HOURS};

const DEFAULT_PORT: u16 = 4000;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;

/// Runtime configuration for the booking server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "HOTEL")]
pub struct AppSettings {
    /// Interface to bind.
    pub host: Option<IpAddr>,
    /// TCP port to listen on.
    pub port: Option<u16>,
    /// PostgreSQL connection string. Without it bookings live in memory.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    pub db_max_connections: Option<u32>,
    /// Lifetime of issued bearer tokens, in hours.
    pub token_ttl_hours: Option<i64>,
}

impl AppSettings {
    /// Socket address to bind, defaulting to `0.0.0.0:4000`.
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(
            self.host.unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED)),
            self.port.unwrap_or(DEFAULT_PORT),
        )
    }

    /// Database URL, ignoring blank values.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections
            .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS)
    }

    /// Token lifetime; non-positive overrides fall back to the default and
    /// larger ones are capped at [`MAX_TOKEN_TTL_HOURS`].
    pub fn token_ttl(&self) -> chrono::Duration {
        let hours = self
            .token_ttl_hours
            .filter(|hours| *hours > 0)
            .unwrap_or(DEFAULT_TOKEN_TTL_HOURS)
            .min(MAX_TOKEN_TTL_HOURS);
        chrono::Duration::hours(hours)
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for settings parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 5] = [
        "HOTEL_HOST",
        "HOTEL_PORT",
        "HOTEL_DATABASE_URL",
        "HOTEL_DB_MAX_CONNECTIONS",
        "HOTEL_TOKEN_TTL_HOURS",
    ];

    fn load_from_empty_args() -> AppSettings {
        AppSettings::load_from_iter([OsString::from("hotel-booking")])
            .expect("config should load")
    }

    #[rstest]
    fn defaults_apply_when_unset() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let settings = load_from_empty_args();
        assert_eq!(settings.bind_addr(), "0.0.0.0:4000".parse().expect("addr"));
        assert!(settings.database_url().is_none());
        assert_eq!(settings.db_max_connections(), 10);
        assert_eq!(settings.token_ttl(), chrono::Duration::hours(24));
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("HOTEL_HOST", Some("127.0.0.1".to_owned())),
            ("HOTEL_PORT", Some("8081".to_owned())),
            (
                "HOTEL_DATABASE_URL",
                Some("postgres://hotel@localhost/hotel".to_owned()),
            ),
            ("HOTEL_DB_MAX_CONNECTIONS", Some("4".to_owned())),
            ("HOTEL_TOKEN_TTL_HOURS", Some("2".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(settings.bind_addr(), "127.0.0.1:8081".parse().expect("addr"));
        assert_eq!(
            settings.database_url(),
            Some("postgres://hotel@localhost/hotel")
        );
        assert_eq!(settings.db_max_connections(), 4);
        assert_eq!(settings.token_ttl(), chrono::Duration::hours(2));
    }

    #[rstest]
    fn command_line_flags_override_defaults() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let settings = AppSettings::load_from_iter(
            ["hotel-booking", "--port", "9100", "--token-ttl-hours", "6"].map(OsString::from),
        )
        .expect("flags should parse");

        assert_eq!(settings.bind_addr().port(), 9100);
        assert_eq!(settings.token_ttl(), chrono::Duration::hours(6));
    }

    #[rstest]
    #[case(Some(i64::MAX), MAX_TOKEN_TTL_HOURS)]
    #[case(Some(10_000_000_000), MAX_TOKEN_TTL_HOURS)]
    #[case(Some(MAX_TOKEN_TTL_HOURS + 1), MAX_TOKEN_TTL_HOURS)]
    #[case(Some(-5), DEFAULT_TOKEN_TTL_HOURS)]
    #[case(None, DEFAULT_TOKEN_TTL_HOURS)]
    fn token_ttl_stays_in_range(#[case] configured: Option<i64>, #[case] expected_hours: i64) {
        let settings = AppSettings {
            host: None,
            port: None,
            database_url: None,
            db_max_connections: None,
            token_ttl_hours: configured,
        };

        assert_eq!(settings.token_ttl(), chrono::Duration::hours(expected_hours));
    }

    #[rstest]
    fn blank_database_url_means_in_memory() {
        let _guard = lock_env([
            ("HOTEL_HOST", None),
            ("HOTEL_PORT", None),
            ("HOTEL_DATABASE_URL", Some("   ".to_owned())),
            ("HOTEL_DB_MAX_CONNECTIONS", None),
            ("HOTEL_TOKEN_TTL_HOURS", Some("0".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert!(settings.database_url().is_none());
        assert_eq!(settings.token_ttl(), chrono::Duration::hours(24));
    }
}
