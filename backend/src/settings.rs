//! Runtime settings loaded via OrthoConfig.
//!
//! Values come from CLI flags, `CAREPLUS_*` environment variables, and
//! configuration files, in that order of precedence.

use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::outbound::persistence::PoolConfig;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5000";
const DEFAULT_ADMIN_NAME: &str = "Administrator";

/// Problems turning loaded settings into runtime values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    /// A required key was absent from every source.
    #[error("missing required setting: {0}")]
    Missing(&'static str),
    /// The bind address did not parse as `host:port`.
    #[error("invalid bind address {value:?}: {message}")]
    BindAddr {
        /// Raw configured value.
        value: String,
        /// Parser message.
        message: String,
    },
}

/// Application settings.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "CAREPLUS")]
pub struct AppSettings {
    /// PostgreSQL connection URL.
    pub database_url: Option<String>,
    /// Listen socket, `0.0.0.0:5000` when unset.
    pub bind_addr: Option<String>,
    /// HS256 signing secret.
    pub jwt_secret: Option<String>,
    /// Access token lifetime in hours.
    #[ortho_config(default = 168)]
    pub jwt_expiry_hours: u32,
    /// Maximum pooled connections.
    #[ortho_config(default = 10)]
    pub db_max_connections: u32,
    /// Server-side `statement_timeout` per connection.
    #[ortho_config(default = 5000)]
    pub db_statement_timeout_ms: u64,
    /// Retries for transient pool checkout failures.
    #[ortho_config(default = 3)]
    pub db_checkout_retries: u32,
    /// Apply embedded migrations before serving; on when unset.
    pub run_migrations: Option<bool>,
    /// Administrator account ensured at startup.
    pub admin_email: Option<String>,
    /// Password for the seeded administrator.
    pub admin_password: Option<String>,
    /// Display name for the seeded administrator.
    pub admin_name: Option<String>,
}

/// Administrator account to ensure at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminSeed<'a> {
    /// Login email.
    pub email: &'a str,
    /// Plain-text password.
    pub password: &'a str,
    /// Display name.
    pub name: &'a str,
}

impl AppSettings {
    /// Configured database URL.
    pub fn database_url(&self) -> Result<&str, SettingsError> {
        self.database_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .ok_or(SettingsError::Missing("database_url"))
    }

    /// Parsed listen socket.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|err: std::net::AddrParseError| SettingsError::BindAddr {
            value: raw.to_owned(),
            message: err.to_string(),
        })
    }

    /// Whether embedded migrations run at startup.
    pub fn run_migrations(&self) -> bool {
        self.run_migrations.unwrap_or(true)
    }

    /// Configured signing secret, if any.
    pub fn jwt_secret(&self) -> Option<&str> {
        self.jwt_secret.as_deref().filter(|s| !s.is_empty())
    }

    /// Pool configuration derived from the `db_*` keys.
    pub fn pool_config(&self) -> Result<PoolConfig, SettingsError> {
        Ok(PoolConfig::new(self.database_url()?)
            .with_max_size(self.db_max_connections)
            .with_statement_timeout(Duration::from_millis(self.db_statement_timeout_ms))
            .with_checkout_retries(self.db_checkout_retries))
    }

    /// Administrator seed when both email and password are configured.
    pub fn admin_seed(&self) -> Option<AdminSeed<'_>> {
        let email = self.admin_email.as_deref().filter(|v| !v.is_empty())?;
        let password = self.admin_password.as_deref().filter(|v| !v.is_empty())?;
        Some(AdminSeed {
            email,
            password,
            name: self.admin_name.as_deref().unwrap_or(DEFAULT_ADMIN_NAME),
        })
    }
}
