//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the domain repository ports backed by
//! PostgreSQL via `diesel-async` and `bb8` connection pooling.
//!
//! - **Thin adapters**: repositories only translate between Diesel rows and
//!   domain types.
//! - **Internal models**: row structs (`models.rs`) and schema definitions
//!   (`schema.rs`) never leave this module.
//! - **Bounded operations**: every query runs under the pool's read or write
//!   budget and a blown budget maps to the port's `Timeout` variant.
//!
//! # Example
//!
//! ```ignore
//! use roomdesk::outbound::persistence::{DbPool, DieselReservationRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/roomdesk")).await?;
//! let repo = DieselReservationRepository::new(pool);
//! ```

mod diesel_basic_error_mapping;
mod diesel_customer_repository;
mod diesel_reservation_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_customer_repository::DieselCustomerRepository;
pub use diesel_reservation_repository::DieselReservationRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_migrations};
pub use pool::{DbError, DbPool, PoolConfig, PoolError};
