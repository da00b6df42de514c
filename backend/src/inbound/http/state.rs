//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    CustomerRepository, DocumentStore, FixtureCustomerRepository, FixtureDocumentStore,
    FixtureLoginService, FixtureReservationRepository, LoginService, ReservationRepository,
};
use crate::inbound::http::render::{AskamaRenderer, TemplateRenderer};

/// Dependency bundle for HTTP handlers.
///
/// # Examples
/// ```
/// use roomdesk::inbound::http::state::HttpState;
///
/// let state = HttpState::fixtures();
/// let _reservations = state.reservations.clone();
/// ```
#[derive(Clone)]
pub struct HttpState {
    pub reservations: Arc<dyn ReservationRepository>,
    pub customers: Arc<dyn CustomerRepository>,
    pub login: Arc<dyn LoginService>,
    pub documents: Arc<dyn DocumentStore>,
    pub renderer: Arc<dyn TemplateRenderer>,
}

impl HttpState {
    /// State backed entirely by in-memory fixtures.
    pub fn fixtures() -> Self {
        Self {
            reservations: Arc::new(FixtureReservationRepository::default()),
            customers: Arc::new(FixtureCustomerRepository::default()),
            login: Arc::new(FixtureLoginService),
            documents: Arc::new(FixtureDocumentStore::default()),
            renderer: Arc::new(AskamaRenderer),
        }
    }
}
