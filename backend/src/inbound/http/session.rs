//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! Wraps the Actix session so handlers deal in typed entries, one-shot
//! flash messages and the authenticated user id.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use serde::{Serialize, de::DeserializeOwned};

use crate::domain::{Error, UserId};

pub(crate) const USER_ID_KEY: &str = "user_id";
pub(crate) const FLASH_KEY: &str = "flash";
pub(crate) const ERROR_KEY: &str = "error";
pub(crate) const WARNING_KEY: &str = "warning";

/// Flash shown on the login page when a protected page is requested.
pub const LOGIN_REQUIRED_MESSAGE: &str = "Log in first!";

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Store `value` under `key`, replacing any previous entry.
    pub fn put<T: Serialize>(&self, key: &str, value: &T) -> Result<(), Error> {
        self.0
            .insert(key, value)
            .map_err(|error| Error::internal(format!("failed to write session: {error}")))
    }

    /// Read the entry under `key` without removing it.
    ///
    /// An entry that no longer deserialises as `T` reads as absent.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.0.get::<T>(key) {
            Ok(value) => value,
            Err(error) => {
                tracing::warn!(key, %error, "discarding unreadable session entry");
                None
            }
        }
    }

    /// Read and remove the entry under `key`.
    ///
    /// A second call for the same key returns `None`.
    pub fn pop<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.get(key);
        self.0.remove(key);
        value
    }

    /// Remove the entry under `key` without reading it.
    pub fn remove(&self, key: &str) {
        self.0.remove(key);
    }

    /// True when an entry exists under `key`.
    pub fn exists(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Drop every entry.
    pub fn destroy(&self) {
        self.0.purge();
    }

    /// Issue a fresh session cookie while keeping the entries.
    pub fn renew(&self) {
        self.0.renew();
    }

    /// Queue an informational flash message.
    pub fn put_flash(&self, message: &str) -> Result<(), Error> {
        self.put(FLASH_KEY, &message)
    }

    /// Queue an error flash message.
    pub fn put_error(&self, message: &str) -> Result<(), Error> {
        self.put(ERROR_KEY, &message)
    }

    /// Queue a warning flash message.
    pub fn put_warning(&self, message: &str) -> Result<(), Error> {
        self.put(WARNING_KEY, &message)
    }

    /// Consume the informational flash message, if any.
    pub fn take_flash(&self) -> Option<String> {
        self.pop(FLASH_KEY)
    }

    /// Consume the error flash message, if any.
    pub fn take_error(&self) -> Option<String> {
        self.pop(ERROR_KEY)
    }

    /// Consume the warning flash message, if any.
    pub fn take_warning(&self) -> Option<String> {
        self.pop(WARNING_KEY)
    }

    /// Persist the authenticated user's id in the session cookie.
    pub fn persist_user(&self, user_id: UserId) -> Result<(), Error> {
        self.put(USER_ID_KEY, &user_id)
    }

    /// Fetch the current user id from the session, if present.
    pub fn user_id(&self) -> Option<UserId> {
        self.get(USER_ID_KEY)
    }

    /// True when a user has logged in on this session.
    pub fn is_authenticated(&self) -> bool {
        self.exists(USER_ID_KEY)
    }

    /// Require an authenticated user id.
    ///
    /// Without one the login-required flash is queued and an unauthorised
    /// error is returned, which the error mapper turns into a redirect to
    /// the login page.
    pub fn require_user_id(&self) -> Result<UserId, Error> {
        match self.user_id() {
            Some(id) => Ok(id),
            None => {
                self.put_error(LOGIN_REQUIRED_MESSAGE)?;
                Err(Error::unauthorized("login required"))
            }
        }
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
