//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::ServiceResponse;
use actix_web::test::TestRequest;

use crate::domain::ports::{
    FixtureCustomerRepository, FixtureDocumentStore, FixtureLoginService,
    FixtureReservationRepository,
};
use crate::inbound::http::render::AskamaRenderer;
use crate::inbound::http::state::HttpState;

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// The session cookie set by `response`, if any.
pub fn session_cookie<B>(response: &ServiceResponse<B>) -> Option<Cookie<'static>> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
}

/// Fixture-backed ports shared between a test and the state it builds.
#[derive(Default)]
pub struct FixturePorts {
    pub reservations: Arc<FixtureReservationRepository>,
    pub customers: Arc<FixtureCustomerRepository>,
    pub documents: Arc<FixtureDocumentStore>,
}

impl FixturePorts {
    /// Handler state wired to these fixtures.
    pub fn state(&self) -> HttpState {
        HttpState {
            reservations: self.reservations.clone(),
            customers: self.customers.clone(),
            login: Arc::new(FixtureLoginService),
            documents: self.documents.clone(),
            renderer: Arc::new(AskamaRenderer),
        }
    }
}

/// Login form submission carrying the fixture administrator's credentials.
pub fn fixture_login_request() -> TestRequest {
    let body = format!(
        "email={}&password={}",
        FixtureLoginService::EMAIL.replace('@', "%40"),
        FixtureLoginService::PASSWORD
    );
    TestRequest::post()
        .uri("/user/login")
        .insert_header(("content-type", "application/x-www-form-urlencoded"))
        .set_payload(body)
}

const MULTIPART_BOUNDARY: &str = "roomdesk-boundary";

/// One part of a hand-built multipart body.
pub enum MultipartPart<'a> {
    Text(&'a str, &'a str),
    File(&'a str, &'a str, &'a [u8]),
}

fn multipart_body(parts: &[MultipartPart<'_>]) -> Vec<u8> {
    let mut out = Vec::new();
    for part in parts {
        out.extend_from_slice(format!("--{MULTIPART_BOUNDARY}\r\n").as_bytes());
        match part {
            MultipartPart::Text(name, value) => out.extend_from_slice(
                format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n")
                    .as_bytes(),
            ),
            MultipartPart::File(name, file_name, bytes) => {
                out.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
                    )
                    .as_bytes(),
                );
                out.extend_from_slice(bytes);
                out.extend_from_slice(b"\r\n");
            }
        }
    }
    out.extend_from_slice(format!("--{MULTIPART_BOUNDARY}--\r\n").as_bytes());
    out
}

/// Multipart POST to `uri` carrying `parts`.
pub fn multipart_request(uri: &str, parts: &[MultipartPart<'_>]) -> TestRequest {
    TestRequest::post()
        .uri(uri)
        .insert_header((
            "content-type",
            format!("multipart/form-data; boundary={MULTIPART_BOUNDARY}"),
        ))
        .set_payload(multipart_body(parts))
}
