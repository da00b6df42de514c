//! Shared mapping from pooled Diesel failures to repository port errors.

use tracing::debug;

use super::pool::{DbError, PoolError};

/// Constructors of a repository error type with connection, query and
/// timeout variants.
pub(crate) trait BasicPortError: Sized {
    fn connection(message: String) -> Self;
    fn query(message: &'static str) -> Self;
    fn timeout() -> Self;
}

macro_rules! impl_basic_port_error {
    ($($error:ty),* $(,)?) => {
        $(
            impl BasicPortError for $error {
                fn connection(message: String) -> Self {
                    <$error>::connection(message)
                }

                fn query(message: &'static str) -> Self {
                    <$error>::query(message)
                }

                fn timeout() -> Self {
                    <$error>::timeout()
                }
            }
        )*
    };
}

impl_basic_port_error!(
    crate::domain::ports::ReservationPersistenceError,
    crate::domain::ports::CustomerPersistenceError,
    crate::domain::ports::UserPersistenceError,
);

/// Map a pooled operation failure into a repository error.
pub(crate) fn map_db_error<E: BasicPortError>(error: DbError) -> E {
    match error {
        DbError::Pool(pool) => map_basic_pool_error(pool),
        DbError::Diesel(diesel) => map_basic_diesel_error(diesel),
    }
}

/// Map pool errors into connection or timeout errors.
pub(crate) fn map_basic_pool_error<E: BasicPortError>(error: PoolError) -> E {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => E::connection(message),
        PoolError::Timeout { elapsed } => {
            debug!(?elapsed, "database operation timed out");
            E::timeout()
        }
    }
}

/// Map common Diesel error variants into query/connection errors.
pub(crate) fn map_basic_diesel_error<E: BasicPortError>(error: diesel::result::Error) -> E {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => E::query("record not found"),
        DieselError::QueryBuilderError(_) => E::query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            E::connection("database connection error".to_owned())
        }
        _ => E::query("database error"),
    }
}
