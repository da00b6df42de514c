//! Authentication primitives.
//!
//! Field-level checks (required, email shape) happen in the login form
//! before credentials are built, so construction here only normalises.

use zeroize::Zeroizing;

/// Login credentials handed to [`LoginService`](crate::domain::ports::LoginService).
///
/// ## Invariants
/// - `email` is trimmed.
/// - `password` keeps caller-provided whitespace and is wiped on drop.
///
/// # Examples
/// ```
/// use roomdesk::domain::LoginCredentials;
///
/// let creds = LoginCredentials::new(" admin@example.com ", "password");
/// assert_eq!(creds.email(), "admin@example.com");
/// assert_eq!(creds.password(), "password");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Build credentials from raw form inputs.
    pub fn new(email: &str, password: &str) -> Self {
        Self {
            email: email.trim().to_owned(),
            password: Zeroizing::new(password.to_owned()),
        }
    }

    /// Email used to look up the account.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Password provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}
