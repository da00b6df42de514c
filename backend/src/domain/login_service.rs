//! Password login backed by the user repository.
//!
//! Hashes are bcrypt; verification runs on the blocking pool so a slow hash
//! never stalls an actix worker.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::domain::ports::{LoginService, UserRepository};
use crate::domain::{ADMIN_ACCESS_LEVEL, Error, LoginCredentials, NewUser, UserId};

const INVALID_CREDENTIALS: &str = "invalid credentials";

/// [`LoginService`] that checks bcrypt hashes held by a [`UserRepository`].
#[derive(Clone)]
pub struct PasswordLoginService {
    users: Arc<dyn UserRepository>,
    hash_cost: u32,
}

impl PasswordLoginService {
    /// Create a service over `users`, hashing new passwords at the default cost.
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self {
            users,
            hash_cost: bcrypt::DEFAULT_COST,
        }
    }

    /// Override the bcrypt cost used when hashing new passwords.
    #[must_use]
    pub fn with_hash_cost(mut self, cost: u32) -> Self {
        self.hash_cost = cost;
        self
    }

    /// Create an administrator account unless `email` is already registered.
    ///
    /// Returns `true` when an account was created.
    ///
    /// # Errors
    ///
    /// Returns an internal error when the repository or the hasher fails.
    pub async fn ensure_admin(&self, email: &str, password: &str) -> Result<bool, Error> {
        let email = email.trim();
        if self.users.find_credentials_by_email(email).await?.is_some() {
            return Ok(false);
        }

        let password = password.to_owned();
        let cost = self.hash_cost;
        let password_hash = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .map_err(|err| Error::internal(format!("password hashing task failed: {err}")))?
            .map_err(|err| Error::internal(format!("password hashing failed: {err}")))?;

        let user_id = self
            .users
            .insert_user(&NewUser {
                first_name: "Admin".to_owned(),
                last_name: "User".to_owned(),
                email: email.to_owned(),
                password_hash,
                access_level: ADMIN_ACCESS_LEVEL,
            })
            .await?;
        info!(%user_id, "created administrator account");
        Ok(true)
    }
}

#[async_trait]
impl LoginService for PasswordLoginService {
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error> {
        let Some(stored) = self
            .users
            .find_credentials_by_email(credentials.email())
            .await?
        else {
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };

        let password = zeroize::Zeroizing::new(credentials.password().to_owned());
        let hash = stored.password_hash;
        let verified = tokio::task::spawn_blocking(move || bcrypt::verify(password.as_str(), &hash))
            .await
            .map_err(|err| Error::internal(format!("password check task failed: {err}")))?;

        match verified {
            Ok(true) => Ok(stored.user_id),
            Ok(false) => Err(Error::unauthorized(INVALID_CREDENTIALS)),
            Err(err) => {
                warn!(user_id = %stored.user_id, error = %err, "stored password hash is unusable");
                Err(Error::internal(format!("password check failed: {err}")))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::StoredCredentials;
    use crate::domain::ports::{MockUserRepository, UserPersistenceError};
    use mockall::predicate::eq;
    use rstest::rstest;

    const TEST_COST: u32 = 4;

    fn credentials_for(password: &str) -> StoredCredentials {
        StoredCredentials {
            user_id: UserId::new(7),
            password_hash: bcrypt::hash(password, TEST_COST).expect("hash"),
        }
    }

    fn service(repo: MockUserRepository) -> PasswordLoginService {
        PasswordLoginService::new(Arc::new(repo)).with_hash_cost(TEST_COST)
    }

    #[rstest]
    #[case("secret", Ok(UserId::new(7)))]
    #[case("wrong", Err(ErrorCode::Unauthorized))]
    #[tokio::test]
    async fn authenticate_checks_the_stored_hash(
        #[case] password: &str,
        #[case] expected: Result<UserId, ErrorCode>,
    ) {
        let mut repo = MockUserRepository::new();
        repo.expect_find_credentials_by_email()
            .with(eq("jo@x.com"))
            .returning(|_| Ok(Some(credentials_for("secret"))));

        let result = service(repo)
            .authenticate(&LoginCredentials::new("jo@x.com", password))
            .await
            .map_err(|err| err.code());
        assert_eq!(result, expected);
    }

    #[tokio::test]
    async fn unknown_email_is_unauthorised() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_credentials_by_email()
            .returning(|_| Ok(None));
        let err = service(repo)
            .authenticate(&LoginCredentials::new("nobody@x.com", "secret"))
            .await
            .expect_err("unknown user");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
    }

    #[tokio::test]
    async fn corrupt_hash_is_an_internal_error() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_credentials_by_email().returning(|_| {
            Ok(Some(StoredCredentials {
                user_id: UserId::new(7),
                password_hash: "not-a-hash".into(),
            }))
        });
        let err = service(repo)
            .authenticate(&LoginCredentials::new("jo@x.com", "secret"))
            .await
            .expect_err("corrupt hash");
        assert_eq!(err.code(), ErrorCode::InternalError);
    }

    #[tokio::test]
    async fn repository_failure_is_an_internal_error() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_credentials_by_email()
            .returning(|_| Err(UserPersistenceError::connection("refused")));
        let err = service(repo)
            .authenticate(&LoginCredentials::new("jo@x.com", "secret"))
            .await
            .expect_err("connection failure");
        assert_eq!(err.code(), ErrorCode::InternalError);
    }

    #[tokio::test]
    async fn ensure_admin_creates_missing_account_once() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_credentials_by_email()
            .with(eq("admin@x.com"))
            .times(1)
            .returning(|_| Ok(None));
        repo.expect_insert_user()
            .withf(|user| {
                user.email == "admin@x.com"
                    && user.access_level == ADMIN_ACCESS_LEVEL
                    && bcrypt::verify("pw", &user.password_hash).unwrap_or(false)
            })
            .times(1)
            .returning(|_| Ok(UserId::new(1)));

        let created = service(repo)
            .ensure_admin(" admin@x.com ", "pw")
            .await
            .expect("bootstrap");
        assert!(created);
    }

    #[tokio::test]
    async fn ensure_admin_skips_existing_account() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_credentials_by_email()
            .returning(|_| Ok(Some(credentials_for("pw"))));
        repo.expect_insert_user().never();

        let created = service(repo)
            .ensure_admin("admin@x.com", "pw")
            .await
            .expect("bootstrap");
        assert!(!created);
    }
}
