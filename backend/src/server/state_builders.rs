//! Builders for the HTTP state ports.

use std::sync::Arc;

use tracing::warn;

use roomdesk::domain::PasswordLoginService;
use roomdesk::domain::ports::{
    CustomerRepository, DocumentStore, FixtureCustomerRepository, FixtureDocumentStore,
    FixtureLoginService, FixtureReservationRepository, LoginService, ReservationRepository,
};
use roomdesk::inbound::http::render::AskamaRenderer;
use roomdesk::inbound::http::state::HttpState;
use roomdesk::outbound::persistence::{
    DbPool, DieselCustomerRepository, DieselReservationRepository, DieselUserRepository,
};

use super::ServerConfig;

type Ports = (
    Arc<dyn ReservationRepository>,
    Arc<dyn CustomerRepository>,
    Arc<dyn LoginService>,
);

fn persistence_ports(pool: Option<&DbPool>) -> Ports {
    match pool {
        Some(pool) => (
            Arc::new(DieselReservationRepository::new(pool.clone())),
            Arc::new(DieselCustomerRepository::new(pool.clone())),
            Arc::new(PasswordLoginService::new(Arc::new(
                DieselUserRepository::new(pool.clone()),
            ))),
        ),
        None => {
            warn!("no database configured; using in-memory fixtures");
            (
                Arc::new(FixtureReservationRepository::default()),
                Arc::new(FixtureCustomerRepository::default()),
                Arc::new(FixtureLoginService),
            )
        }
    }
}

/// Build HTTP state from the configured ports, falling back to fixtures
/// for anything that is not configured.
pub(super) fn build_http_state(config: &ServerConfig) -> HttpState {
    let (reservations, customers, login) = persistence_ports(config.db_pool.as_ref());
    let documents: Arc<dyn DocumentStore> = match &config.documents {
        Some(documents) => Arc::clone(documents),
        None => Arc::new(FixtureDocumentStore::default()),
    };
    HttpState {
        reservations,
        customers,
        login,
        documents,
        renderer: Arc::new(AskamaRenderer),
    }
}
