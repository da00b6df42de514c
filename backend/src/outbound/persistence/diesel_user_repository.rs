//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{NewUser, StoredCredentials, UserId};

use super::diesel_basic_error_mapping::map_db_error;
use super::models::{CredentialsRow, NewUserRow};
use super::pool::DbPool;
use super::schema::users;

/// Diesel-backed implementation of the `UserRepository` port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn find_credentials_by_email(
        &self,
        email: &str,
    ) -> Result<Option<StoredCredentials>, UserPersistenceError> {
        let email = email.to_owned();
        let row = self
            .pool
            .read(|mut conn| async move {
                users::table
                    .filter(users::email.eq(email))
                    .select(CredentialsRow::as_select())
                    .first(&mut conn)
                    .await
                    .optional()
            })
            .await
            .map_err(map_db_error)?;
        Ok(row.map(|row| StoredCredentials {
            user_id: UserId::new(row.id),
            password_hash: row.password,
        }))
    }

    async fn insert_user(&self, user: &NewUser) -> Result<UserId, UserPersistenceError> {
        let row = NewUserRow {
            first_name: &user.first_name,
            last_name: &user.last_name,
            email: &user.email,
            password: &user.password_hash,
            access_level: user.access_level,
        };
        let id = self
            .pool
            .write(|mut conn| async move {
                diesel::insert_into(users::table)
                    .values(&row)
                    .returning(users::id)
                    .get_result::<i32>(&mut conn)
                    .await
            })
            .await
            .map_err(map_db_error)?;
        Ok(UserId::new(id))
    }
}
