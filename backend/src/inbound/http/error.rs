//! HTTP adapter mapping for domain errors.
//!
//! Keeps the domain error type HTTP-agnostic while turning failures into
//! opaque HTML pages. Unauthenticated requests are redirected to the login
//! form instead of receiving an error page.

use actix_web::http::header::{self, ContentType};
use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use askama::Template;
use tracing::{error, warn};

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

/// Convenient result alias for HTTP handlers.
pub type HttpResult<T> = Result<T, Error>;

/// Where unauthenticated visitors are sent.
pub const LOGIN_PATH: &str = "/user/login";

#[derive(Template)]
#[template(path = "error.page.html")]
struct ErrorPage<'a> {
    title: &'a str,
}

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::SEE_OTHER,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Opaque page body for `status`; never includes the error message.
pub(crate) fn error_page(status: StatusCode) -> String {
    let title = status.canonical_reason().unwrap_or("Error");
    ErrorPage { title }
        .render()
        .unwrap_or_else(|_| title.to_owned())
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let trace_id = self.trace_id().unwrap_or_default();
        match self.code() {
            ErrorCode::Unauthorized => {}
            ErrorCode::InvalidRequest | ErrorCode::NotFound | ErrorCode::PayloadTooLarge => {
                warn!(%trace_id, code = ?self.code(), message = self.message(), "request rejected");
            }
            _ => error!(%trace_id, message = self.message(), "request failed"),
        }

        let mut builder = HttpResponse::build(status);
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }
        if status == StatusCode::SEE_OTHER {
            return builder
                .insert_header((header::LOCATION, LOGIN_PATH))
                .finish();
        }
        builder
            .content_type(ContentType::html())
            .body(error_page(status))
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        error!(error = %err, "actix error promoted to domain error");
        Error::internal("Internal server error")
    }
}
