//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports hide the database and the upload directory; each exposes a
//! typed error that converts into an internal [`Error`] when it reaches a
//! handler.

mod macros;
pub(crate) use macros::define_port_error;

mod customer_repository;
mod document_store;
mod login_service;
mod reservation_repository;
mod user_repository;

use crate::domain::Error;

#[cfg(test)]
pub use customer_repository::MockCustomerRepository;
pub use customer_repository::{
    CustomerPersistenceError, CustomerRepository, FixtureCustomerRepository,
};
#[cfg(test)]
pub use document_store::MockDocumentStore;
pub use document_store::{DocumentStore, DocumentStoreError, FixtureDocumentStore};
#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::{FixtureLoginService, LoginService};
#[cfg(test)]
pub use reservation_repository::MockReservationRepository;
pub use reservation_repository::{
    FixtureReservationRepository, ReservationPersistenceError, ReservationRepository,
};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};

macro_rules! internal_error_from {
    ($($source:ty),* $(,)?) => {
        $(
            impl From<$source> for Error {
                fn from(err: $source) -> Self {
                    Error::internal(err.to_string())
                }
            }
        )*
    };
}

internal_error_from!(
    ReservationPersistenceError,
    CustomerPersistenceError,
    UserPersistenceError,
    DocumentStoreError,
);
