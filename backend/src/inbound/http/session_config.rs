//! Session configuration parsing and validation.
//!
//! Centralises the environment-driven session settings so they are
//! validated consistently and can be tested in isolation. Whether the
//! service runs in production decides both the cookie `Secure` flag and how
//! strictly the environment is checked.

pub mod fingerprint;

use actix_web::cookie::{Key, SameSite};
use mockable::{DefaultEnv, Env};
use std::path::PathBuf;
use tracing::warn;
use zeroize::Zeroize;

const SESSION_KEY_DEFAULT_PATH: &str = "/var/run/secrets/session_key";
const SESSION_KEY_MIN_LEN: usize = 64;
const SAMESITE_ENV: &str = "SESSION_SAMESITE";
const KEY_FILE_ENV: &str = "SESSION_KEY_FILE";
const SAMESITE_EXPECTED: &str = "Strict|Lax|None";

/// Deployment mode for session configuration validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SessionMode {
    /// Local runs tolerate defaults, plain-HTTP cookies and ephemeral keys.
    Development,
    /// Production requires a readable key of full length and secure cookies.
    Production,
}

impl SessionMode {
    /// Select the mode from the `in_production` application setting.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use roomdesk::inbound::http::session_config::SessionMode;
    ///
    /// assert_eq!(SessionMode::from_in_production(true), SessionMode::Production);
    /// assert_eq!(SessionMode::from_in_production(false), SessionMode::Development);
    /// ```
    #[must_use]
    pub fn from_in_production(in_production: bool) -> Self {
        if in_production {
            Self::Production
        } else {
            Self::Development
        }
    }

    fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }
}

/// Session settings derived from configuration.
pub struct SessionSettings {
    /// Signing and encryption key for cookie sessions.
    pub key: Key,
    /// Whether session cookies are marked `Secure`.
    pub cookie_secure: bool,
    /// Configured `SameSite` policy for session cookies.
    pub same_site: SameSite,
}

/// Errors raised while validating session configuration.
#[derive(thiserror::Error, Debug)]
pub enum SessionConfigError {
    /// A variable is present but contains an invalid value.
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
    /// Reading the session key file failed.
    #[error("failed to read session key at {path}: {source}")]
    KeyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The session key file exists but is too short for production.
    #[error("session key at {path} too short: need >= {min_len} bytes, got {length}")]
    KeyTooShort {
        path: PathBuf,
        length: usize,
        min_len: usize,
    },
}

/// Build session settings from environment variables and deployment mode.
///
/// # Examples
///
/// ```rust
/// use roomdesk::inbound::http::session_config::{SessionMode, session_settings_from_env};
/// use mockable::MockEnv;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let key_path = std::env::temp_dir().join("roomdesk_session_key_example");
/// std::fs::write(&key_path, vec![b'a'; 64])?;
///
/// let key_path = key_path.to_str().expect("valid path").to_string();
/// let mut env = MockEnv::new();
/// env.expect_string().returning(move |name| match name {
///     "SESSION_KEY_FILE" => Some(key_path.clone()),
///     "SESSION_SAMESITE" => Some("Strict".to_string()),
///     _ => None,
/// });
///
/// let settings = session_settings_from_env(&env, SessionMode::Production)?;
/// assert!(settings.cookie_secure);
/// # Ok(())
/// # }
/// ```
pub fn session_settings_from_env<E: Env>(
    env: &E,
    mode: SessionMode,
) -> Result<SessionSettings, SessionConfigError> {
    let cookie_secure = mode.is_production();
    let same_site = same_site_from_env(env, mode)?;
    let key = session_key_from_env(env, mode)?;

    Ok(SessionSettings {
        key,
        cookie_secure,
        same_site,
    })
}

/// Build session settings from the process environment.
///
/// # Errors
///
/// As for [`session_settings_from_env`].
pub fn session_settings_from_process(
    mode: SessionMode,
) -> Result<SessionSettings, SessionConfigError> {
    session_settings_from_env(&DefaultEnv::new(), mode)
}

fn same_site_from_env<E: Env>(env: &E, mode: SessionMode) -> Result<SameSite, SessionConfigError> {
    let Some(value) = env.string(SAMESITE_ENV) else {
        return Ok(SameSite::Lax);
    };

    match value.to_ascii_lowercase().as_str() {
        "lax" => Ok(SameSite::Lax),
        "strict" => Ok(SameSite::Strict),
        "none" => {
            if !mode.is_production() {
                warn!("SESSION_SAMESITE=None without secure cookies; browsers may reject them");
            }
            Ok(SameSite::None)
        }
        _ if mode.is_production() => Err(SessionConfigError::InvalidEnv {
            name: SAMESITE_ENV,
            value,
            expected: SAMESITE_EXPECTED,
        }),
        _ => {
            warn!(value = %value, "invalid SESSION_SAMESITE, using Lax");
            Ok(SameSite::Lax)
        }
    }
}

fn session_key_from_env<E: Env>(env: &E, mode: SessionMode) -> Result<Key, SessionConfigError> {
    let key_path = env
        .string(KEY_FILE_ENV)
        .unwrap_or_else(|| SESSION_KEY_DEFAULT_PATH.to_string());
    let path = PathBuf::from(key_path);

    match std::fs::read(&path) {
        Ok(mut bytes) => {
            let length = bytes.len();
            if length < SESSION_KEY_MIN_LEN {
                bytes.zeroize();
                if mode.is_production() {
                    return Err(SessionConfigError::KeyTooShort {
                        path,
                        length,
                        min_len: SESSION_KEY_MIN_LEN,
                    });
                }
                warn!(path = %path.display(), length, "session key too short; using temporary key");
                return Ok(Key::generate());
            }
            let key = Key::derive_from(&bytes);
            bytes.zeroize();
            Ok(key)
        }
        Err(error) if !mode.is_production() => {
            warn!(
                path = %path.display(),
                error = %error,
                "using temporary session key (dev only)"
            );
            Ok(Key::generate())
        }
        Err(error) => Err(SessionConfigError::KeyRead {
            path,
            source: error,
        }),
    }
}

#[cfg(test)]
mod tests;
