//! Login and logout handlers.
//!
//! ```text
//! GET  /user/login
//! POST /user/login   email=admin%40example.com&password=password
//! GET  /user/logout
//! ```

use actix_web::{HttpResponse, get, post, web};
use tracing::{info, warn};

use crate::domain::{ErrorCode, Form, LoginCredentials};
use crate::inbound::http::error::LOGIN_PATH;
use crate::inbound::http::render::{TemplateData, render_page, see_other};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{UrlEncoded, field_set};
use crate::inbound::http::HttpResult;

const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid login credentials";
const LOGGED_IN_MESSAGE: &str = "Logged in successfully";

/// Login form.
#[get("/user/login")]
pub async fn show_login(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> HttpResult<HttpResponse> {
    render_page(&state, &session, "login", TemplateData::default())
}

/// Check credentials and remember the user in the session.
#[post("/user/login")]
pub async fn post_login(
    state: web::Data<HttpState>,
    session: SessionContext,
    form: UrlEncoded,
) -> HttpResult<HttpResponse> {
    session.renew();

    let mut form = Form::new(field_set(form));
    form.required(&["email", "password"]);
    form.is_email("email");
    if !form.is_valid() {
        return render_page(&state, &session, "login", TemplateData::default().with_form(form));
    }

    let credentials = LoginCredentials::new(form.value("email"), form.value("password"));
    match state.login.authenticate(&credentials).await {
        Ok(user_id) => {
            info!(%user_id, "user logged in");
            session.persist_user(user_id)?;
            session.put_flash(LOGGED_IN_MESSAGE)?;
            Ok(see_other("/"))
        }
        Err(err) if err.code() == ErrorCode::Unauthorized => {
            warn!(email = credentials.email(), "login rejected");
            session.put_error(INVALID_CREDENTIALS_MESSAGE)?;
            Ok(see_other(LOGIN_PATH))
        }
        Err(err) => Err(err),
    }
}

/// Forget the session and return to the login form.
#[get("/user/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.destroy();
    see_other(LOGIN_PATH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Error;
    use crate::domain::ports::{FixtureLoginService, MockLoginService};
    use crate::inbound::http::test_utils::{session_cookie, test_session_middleware};
    use actix_web::{App, http::StatusCode, test as actix_test};
    use rstest::rstest;
    use std::sync::Arc;

    fn login_request(body: &str) -> actix_test::TestRequest {
        actix_test::TestRequest::post()
            .uri("/user/login")
            .insert_header(("content-type", "application/x-www-form-urlencoded"))
            .set_payload(body.to_owned())
    }

    fn location<B>(res: &actix_web::dev::ServiceResponse<B>) -> Option<&str> {
        res.headers().get("location").and_then(|v| v.to_str().ok())
    }

    #[actix_web::test]
    async fn valid_credentials_log_in() {
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(HttpState::fixtures()))
                .wrap(test_session_middleware())
                .service(post_login)
                .service(logout),
        )
        .await;
        let body = format!(
            "email={}&password={}",
            FixtureLoginService::EMAIL.replace('@', "%40"),
            FixtureLoginService::PASSWORD
        );
        let res = actix_test::call_service(&app, login_request(&body).to_request()).await;
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&res), Some("/"));
        assert!(session_cookie(&res).is_some());
    }

    #[rstest]
    #[case("email=&password=")]
    #[case("email=not-an-email&password=secret")]
    #[actix_web::test]
    async fn invalid_forms_are_re_rendered(#[case] body: &str) {
        let mut login = MockLoginService::new();
        login.expect_authenticate().never();
        let mut state = HttpState::fixtures();
        state.login = Arc::new(login);
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .wrap(test_session_middleware())
                .service(post_login),
        )
        .await;
        let res = actix_test::call_service(&app, login_request(body).to_request()).await;
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn wrong_password_redirects_back_with_error() {
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(HttpState::fixtures()))
                .wrap(test_session_middleware())
                .service(show_login)
                .service(post_login),
        )
        .await;
        let res = actix_test::call_service(
            &app,
            login_request("email=admin%40example.com&password=wrong").to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&res), Some(LOGIN_PATH));

        let cookie = session_cookie(&res).expect("session cookie");
        let page = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri(LOGIN_PATH)
                .cookie(cookie)
                .to_request(),
        )
        .await;
        let body = actix_test::read_body(page).await;
        assert!(String::from_utf8_lossy(&body).contains(INVALID_CREDENTIALS_MESSAGE));
    }

    #[actix_web::test]
    async fn login_service_failures_are_server_errors() {
        let mut login = MockLoginService::new();
        login
            .expect_authenticate()
            .returning(|_| Err(Error::internal("database unavailable")));
        let mut state = HttpState::fixtures();
        state.login = Arc::new(login);
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .wrap(test_session_middleware())
                .service(post_login),
        )
        .await;
        let res = actix_test::call_service(
            &app,
            login_request("email=admin%40example.com&password=password").to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[actix_web::test]
    async fn logout_returns_to_login() {
        let app = actix_test::init_service(
            App::new().wrap(test_session_middleware()).service(logout),
        )
        .await;
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/user/logout").to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&res), Some(LOGIN_PATH));
    }
}
