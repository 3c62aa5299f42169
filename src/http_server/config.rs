//! Listener settings for the person API
//!
//! Lives under the `server` key of the config file. Besides the raw values
//! this owns the two decisions made from them at startup: which address to
//! bind and which browser origins may call the API.

use std::io;
use std::net::{SocketAddr, ToSocketAddrs};

use axum::http::HeaderValue;
use serde::{Deserialize, Serialize};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::warn;

/// Where to listen and who may call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpServerConfig {
    /// Interface or host name to bind (default: "0.0.0.0")
    #[serde(default = "default_host")]
    pub host: String,

    /// TCP port (default: 8080)
    #[serde(default = "default_port")]
    pub port: u16,

    /// Allowed CORS origins; empty allows any origin
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
        }
    }
}

impl HttpServerConfig {
    pub fn with_port(port: u16) -> Self {
        Self {
            port,
            ..Default::default()
        }
    }

    /// Check values that serde accepts but the listener cannot use
    pub fn validate(&self) -> Result<(), String> {
        if self.host.trim().is_empty() {
            return Err("server.host must not be empty".to_string());
        }
        if self.port == 0 {
            return Err("server.port must be > 0".to_string());
        }
        Ok(())
    }

    /// Resolve `host:port` to the first usable socket address
    ///
    /// Host names are looked up through the system resolver.
    pub fn bind_addr(&self) -> io::Result<SocketAddr> {
        let invalid = |detail: String| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid listen address {}:{}: {}", self.host, self.port, detail),
            )
        };
        (self.host.as_str(), self.port)
            .to_socket_addrs()
            .map_err(|e| invalid(e.to_string()))?
            .next()
            .ok_or_else(|| invalid("no address found".to_string()))
    }

    /// Configured origins that form valid header values
    ///
    /// Entries that cannot be sent as an `Origin` header are dropped with a
    /// warning rather than failing startup.
    pub fn allowed_origins(&self) -> Vec<HeaderValue> {
        self.cors_origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!(origin = %origin, "ignoring invalid CORS origin");
                    None
                }
            })
            .collect()
    }

    /// CORS policy for the router: any origin unless a list is configured
    pub fn cors_layer(&self) -> CorsLayer {
        let allow_origin = if self.cors_origins.is_empty() {
            AllowOrigin::from(Any)
        } else {
            AllowOrigin::list(self.allowed_origins())
        };
        CorsLayer::new()
            .allow_origin(allow_origin)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
