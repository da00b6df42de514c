//! Shared HTTP harness for integration tests.
//!
//! Builds the full page router behind the trace and session middleware and
//! offers helpers for logging in and carrying the session cookie between
//! requests.

use actix_http::Request;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::body::BoxBody;
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::test::{self, TestRequest};
use actix_web::{App, web};
use roomdesk::Trace;
use roomdesk::domain::ports::FixtureLoginService;
use roomdesk::inbound::http::state::HttpState;
use roomdesk::inbound::http::{not_found, routes};

pub type TestResponse = ServiceResponse<BoxBody>;

/// Full page router over `state`.
pub async fn init_app(
    state: HttpState,
) -> impl Service<Request, Response = TestResponse, Error = actix_web::Error> {
    let session = SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build();
    test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .wrap(session)
            .wrap(Trace)
            .configure(routes)
            .default_service(web::to(not_found)),
    )
    .await
}

/// The session cookie set by `res`, if any.
pub fn session_cookie<B>(res: &ServiceResponse<B>) -> Option<Cookie<'static>> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
}

/// The `Location` header of a redirect.
pub fn location<B>(res: &ServiceResponse<B>) -> Option<String> {
    res.headers()
        .get("location")
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
}

/// Urlencoded POST to `uri`.
pub fn form_post(uri: &str, body: &str) -> TestRequest {
    TestRequest::post()
        .uri(uri)
        .insert_header(("content-type", "application/x-www-form-urlencoded"))
        .set_payload(body.to_owned())
}

/// Read a response body as text.
pub async fn body_text(res: TestResponse) -> String {
    let bytes = test::read_body(res).await;
    String::from_utf8_lossy(&bytes).into_owned()
}

/// Browser-like client that keeps the latest session cookie.
pub struct Browser<S> {
    app: S,
    cookie: Option<Cookie<'static>>,
}

impl<S> Browser<S>
where
    S: Service<Request, Response = TestResponse, Error = actix_web::Error>,
{
    pub fn new(app: S) -> Self {
        Self { app, cookie: None }
    }

    /// Send `req` with the current cookie and remember any replacement.
    pub async fn send(&mut self, req: TestRequest) -> TestResponse {
        let req = match &self.cookie {
            Some(cookie) => req.cookie(cookie.clone()),
            None => req,
        };
        let res = test::call_service(&self.app, req.to_request()).await;
        if let Some(cookie) = session_cookie(&res) {
            self.cookie = Some(cookie);
        }
        res
    }

    pub async fn get(&mut self, uri: &str) -> TestResponse {
        self.send(TestRequest::get().uri(uri)).await
    }

    pub async fn post_form(&mut self, uri: &str, body: &str) -> TestResponse {
        self.send(form_post(uri, body)).await
    }

    /// Log in with the fixture administrator.
    pub async fn login(&mut self) -> TestResponse {
        let body = format!(
            "email={}&password={}",
            FixtureLoginService::EMAIL.replace('@', "%40"),
            FixtureLoginService::PASSWORD
        );
        self.post_form("/user/login", &body).await
    }
}
