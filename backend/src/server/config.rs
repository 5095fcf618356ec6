//! HTTP server configuration object and helpers.

use std::net::SocketAddr;

use careplus::domain::TokenPolicy;
use careplus::outbound::persistence::DbPool;
use careplus::outbound::security::JwtTokenCodec;

#[cfg(feature = "metrics")]
use actix_web_prom::PrometheusMetrics;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: DbPool,
    pub(crate) tokens: JwtTokenCodec,
    pub(crate) token_policy: TokenPolicy,
    #[cfg(feature = "metrics")]
    pub(crate) prometheus: Option<PrometheusMetrics>,
}

impl ServerConfig {
    /// Construct a configuration around the database pool and token codec.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, db_pool: DbPool, tokens: JwtTokenCodec) -> Self {
        Self {
            bind_addr,
            db_pool,
            tokens,
            token_policy: TokenPolicy::default(),
            #[cfg(feature = "metrics")]
            prometheus: None,
        }
    }

    /// Override the access token lifetime.
    #[must_use]
    pub fn with_token_policy(mut self, policy: TokenPolicy) -> Self {
        self.token_policy = policy;
        self
    }

    #[cfg(feature = "metrics")]
    /// Attach Prometheus middleware to the configuration.
    #[must_use]
    pub fn with_metrics(mut self, prometheus: Option<PrometheusMetrics>) -> Self {
        self.prometheus = prometheus;
        self
    }
}
