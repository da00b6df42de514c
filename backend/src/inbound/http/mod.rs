//! HTTP inbound adapter serving the server-rendered pages.
//!
//! Handlers are grouped by area: marketing [`pages`], the public
//! [`reservations`] flow, [`auth`], the [`admin`] back office and customer
//! onboarding in [`customers`]. [`routes`] registers them all.

pub mod admin;
pub mod auth;
pub mod customers;
pub mod error;
pub mod health;
pub mod multipart;
pub mod pages;
pub mod render;
pub mod reservations;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod validation;

use actix_web::{HttpRequest, web};

use crate::domain::Error;

pub use error::HttpResult;

/// Register every page and form handler on `cfg`.
///
/// Health probes are registered separately because they need no session.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(pages::home)
        .service(pages::about)
        .service(pages::generals)
        .service(pages::majors)
        .service(pages::contact)
        .service(reservations::search_availability)
        .service(reservations::post_search_availability)
        .service(reservations::availability_json)
        .service(reservations::choose_room)
        .service(reservations::make_reservation)
        .service(reservations::post_make_reservation)
        .service(reservations::reservation_summary)
        .service(auth::show_login)
        .service(auth::post_login)
        .service(auth::logout)
        .service(admin::dashboard)
        .service(admin::new_reservations)
        .service(admin::all_reservations)
        .service(admin::show_reservation)
        .service(admin::update_reservation)
        .service(admin::process_reservation)
        .service(admin::delete_reservation)
        .service(customers::show_add_customer)
        .service(customers::add_customer)
        .service(customers::all_customers)
        .service(customers::customer_details)
        .service(customers::show_trade_license)
        .service(customers::add_trade_license)
        .service(customers::list_partners)
        .service(customers::list_memoranda)
        .service(customers::show_add_partner)
        .service(customers::add_partner)
        .service(customers::show_add_memorandum)
        .service(customers::add_memorandum)
        .service(customers::download_document);
}

/// Fallback for unmatched paths: the opaque 404 page.
pub async fn not_found(req: HttpRequest) -> HttpResult<&'static str> {
    Err(Error::not_found(format!("no route for {}", req.path())))
}
