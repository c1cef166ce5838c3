//! HTTP server configuration object and helpers.

use std::net::SocketAddr;

use comedor_backend::domain::{RegistrationLinkBase, TokenPolicy};
use comedor_backend::outbound::persistence::DbPool;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) link_base: RegistrationLinkBase,
    pub(crate) token_policy: TokenPolicy,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    /// Construct a configuration that serves fixture adapters until a pool
    /// is attached.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, link_base: RegistrationLinkBase) -> Self {
        Self {
            bind_addr,
            link_base,
            token_policy: TokenPolicy::default(),
            db_pool: None,
        }
    }

    /// Override the validity window of issued tokens.
    #[must_use]
    pub fn with_token_policy(mut self, policy: TokenPolicy) -> Self {
        self.token_policy = policy;
        self
    }

    /// Attach a database connection pool for the persistence adapters.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Return the socket address the server will bind to.
    #[cfg_attr(
        not(any(test, doctest)),
        expect(dead_code, reason = "Exercised by bootstrap tests")
    )]
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
