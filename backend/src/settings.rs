//! Application settings loaded via OrthoConfig.
//!
//! Values come from `ROOMDESK_*` environment variables, an optional
//! configuration file and command-line flags, in increasing precedence.

use std::net::SocketAddr;
use std::path::PathBuf;

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_UPLOAD_ROOT: &str = "./uploads";

/// Runtime settings for the web server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "ROOMDESK")]
pub struct AppSettings {
    /// PostgreSQL connection string. Without one the server runs on
    /// in-memory fixtures.
    pub database_url: Option<String>,
    /// Maximum pooled database connections.
    pub db_pool_size: Option<u32>,
    /// Directory beneath which uploaded documents are written.
    pub upload_root: Option<PathBuf>,
    /// Production mode: secure cookies and a mandatory session key.
    #[ortho_config(default = false)]
    pub in_production: bool,
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// Administrator created at startup when no user has this email.
    pub admin_email: Option<String>,
    /// Password for the bootstrap administrator.
    pub admin_password: Option<String>,
}

/// Invalid configuration value.
#[derive(Debug, thiserror::Error)]
#[error("invalid bind address {value:?}: {source}")]
pub struct BindAddrError {
    value: String,
    #[source]
    source: std::net::AddrParseError,
}

impl AppSettings {
    /// Configured upload root, falling back to `./uploads`.
    pub fn upload_root(&self) -> PathBuf {
        self.upload_root
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_UPLOAD_ROOT))
    }

    /// Configured listen address, falling back to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> Result<SocketAddr, BindAddrError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value.parse().map_err(|source| BindAddrError {
            value: value.to_owned(),
            source,
        })
    }

    /// Bootstrap administrator credentials when both halves are set.
    pub fn admin_credentials(&self) -> Option<(&str, &str)> {
        match (self.admin_email.as_deref(), self.admin_password.as_deref()) {
            (Some(email), Some(password)) if !email.is_empty() && !password.is_empty() => {
                Some((email, password))
            }
            _ => None,
        }
    }
}
