//! Room reservations and customer onboarding behind server-rendered pages.
//!
//! - [`domain`]: form validation, entities and the ports hiding storage.
//! - [`inbound`]: Actix handlers, sessions and template rendering.
//! - [`outbound`]: Diesel repositories and the on-disk document store.

pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

pub use domain::TraceId;
pub use middleware::Trace;
