//! Connection and pool settings.

use crate::error::{OrmError, OrmResult};
use serde::Deserialize;
use std::time::Duration;
use tokio_postgres::config::SslMode;

/// Connection and pool settings.
///
/// Counts and the lifetime are signed so that out-of-range input can be
/// clamped by [`Config::normalize`] instead of rejected.
///
/// ```ignore
/// let config = fury::Config::from_toml(r#"
///     username = "app"
///     host = "localhost"
///     dbname = "app"
///     max_open_conns = 8
/// "#)?;
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub username: String,
    pub password: String,
    pub host: String,
    pub port: u16,
    pub dbname: String,
    /// Require TLS when set.
    pub ssl_mode: bool,

    /// Connection attempts made by [`crate::pool::connect`].
    pub max_retries: i64,
    /// Seconds; `0` means unlimited. Not applied by [`crate::pool`]; read it
    /// through [`Config::lifetime`] when building a custom pool.
    pub conn_max_lifetime: i64,
    /// Not applied by [`crate::pool`]; deadpool has no idle-count limit.
    pub max_idle_conns: i64,
    /// `0` means the pool default.
    pub max_open_conns: i64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            username: String::new(),
            password: String::new(),
            host: "localhost".to_string(),
            port: 5432,
            dbname: String::new(),
            ssl_mode: false,
            max_retries: 1,
            conn_max_lifetime: 0,
            max_idle_conns: 2,
            max_open_conns: 0,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from TOML and normalize.
    pub fn from_toml(source: &str) -> OrmResult<Self> {
        let config: Self = toml::from_str(source)?;
        Ok(config.normalize())
    }

    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = username.into();
        self
    }

    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = password.into();
        self
    }

    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn dbname(mut self, dbname: impl Into<String>) -> Self {
        self.dbname = dbname.into();
        self
    }

    pub fn ssl_mode(mut self, require: bool) -> Self {
        self.ssl_mode = require;
        self
    }

    pub fn max_retries(mut self, retries: i64) -> Self {
        self.max_retries = retries;
        self
    }

    pub fn conn_max_lifetime(mut self, lifetime: Duration) -> Self {
        self.conn_max_lifetime = i64::try_from(lifetime.as_secs()).unwrap_or(i64::MAX);
        self
    }

    pub fn max_idle_conns(mut self, conns: i64) -> Self {
        self.max_idle_conns = conns;
        self
    }

    pub fn max_open_conns(mut self, conns: i64) -> Self {
        self.max_open_conns = conns;
        self
    }

    /// Clamp out-of-range settings.
    ///
    /// - `max_retries < 1` becomes `1`
    /// - `max_idle_conns < 1` becomes `2`
    /// - negative `max_open_conns` / `conn_max_lifetime` become `0`
    pub fn normalize(mut self) -> Self {
        if self.max_retries < 1 {
            self.max_retries = 1;
        }
        if self.max_idle_conns < 1 {
            self.max_idle_conns = 2;
        }
        if self.max_open_conns < 0 {
            self.max_open_conns = 0;
        }
        if self.conn_max_lifetime < 0 {
            self.conn_max_lifetime = 0;
        }
        self
    }

    /// Connection lifetime, `None` when unlimited.
    pub fn lifetime(&self) -> Option<Duration> {
        u64::try_from(self.conn_max_lifetime)
            .ok()
            .filter(|&secs| secs > 0)
            .map(Duration::from_secs)
    }

    /// Translate into a `tokio_postgres` connection config.
    pub fn pg_config(&self) -> OrmResult<tokio_postgres::Config> {
        if self.host.is_empty() {
            return Err(OrmError::Config("host must not be empty".to_string()));
        }
        if self.dbname.is_empty() {
            return Err(OrmError::Config("dbname must not be empty".to_string()));
        }

        let mut pg = tokio_postgres::Config::new();
        pg.host(&self.host).port(self.port).dbname(&self.dbname);
        if !self.username.is_empty() {
            pg.user(&self.username);
        }
        if !self.password.is_empty() {
            pg.password(&self.password);
        }
        pg.ssl_mode(if self.ssl_mode {
            SslMode::Require
        } else {
            SslMode::Disable
        });
        Ok(pg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_clamps() {
        let config = Config::new()
            .max_retries(0)
            .max_idle_conns(-4)
            .max_open_conns(-1)
            .normalize();
        assert_eq!(config.max_retries, 1);
        assert_eq!(config.max_idle_conns, 2);
        assert_eq!(config.max_open_conns, 0);
        assert_eq!(config.conn_max_lifetime, 0);
        assert_eq!(config.lifetime(), None);
    }

    #[test]
    fn normalize_keeps_valid_values() {
        let config = Config::new()
            .max_retries(5)
            .max_idle_conns(3)
            .max_open_conns(10)
            .conn_max_lifetime(Duration::from_secs(30))
            .normalize();
        assert_eq!(config.max_retries, 5);
        assert_eq!(config.max_idle_conns, 3);
        assert_eq!(config.max_open_conns, 10);
        assert_eq!(config.lifetime(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn from_toml_fills_defaults() {
        let config = Config::from_toml(
            r#"
            username = "app"
            dbname = "appdb"
            ssl_mode = true
            max_retries = -2
            conn_max_lifetime = -10
            "#,
        )
        .unwrap();

        assert_eq!(config.username, "app");
        assert_eq!(config.host, "localhost");
        assert_eq!(config.port, 5432);
        assert!(config.ssl_mode);
        assert_eq!(config.max_retries, 1);
        assert_eq!(config.conn_max_lifetime, 0);
    }

    #[test]
    fn from_toml_rejects_bad_types() {
        let err = Config::from_toml("port = \"not a number\"").unwrap_err();
        assert!(matches!(err, OrmError::Config(_)));
    }

    #[test]
    fn pg_config_translation() {
        let pg = Config::new()
            .username("app")
            .password("secret")
            .host("db.internal")
            .port(6543)
            .dbname("appdb")
            .ssl_mode(true)
            .pg_config()
            .unwrap();

        assert_eq!(pg.get_user(), Some("app"));
        assert_eq!(pg.get_password(), Some(&b"secret"[..]));
        assert_eq!(pg.get_dbname(), Some("appdb"));
        assert_eq!(pg.get_ports(), &[6543]);
        assert_eq!(pg.get_ssl_mode(), SslMode::Require);
    }

    #[test]
    fn pg_config_requires_dbname() {
        let err = Config::new().pg_config().unwrap_err();
        assert!(matches!(err, OrmError::Config(_)));
    }
}
