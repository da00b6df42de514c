//! Marketing pages.
//!
//! ```text
//! GET /
//! GET /about
//! GET /generals
//! GET /majors
//! GET /contact
//! ```

use actix_web::{HttpResponse, get, web};

use crate::inbound::http::HttpResult;
use crate::inbound::http::render::{TemplateData, render_page};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

macro_rules! static_page {
    ($(#[$meta:meta])* $handler:ident, $path:tt, $template:tt) => {
        $(#[$meta])*
        #[get($path)]
        pub async fn $handler(
            state: web::Data<HttpState>,
            session: SessionContext,
        ) -> HttpResult<HttpResponse> {
            render_page(&state, &session, $template, TemplateData::default())
        }
    };
}

static_page!(
    /// Landing page.
    home, "/", "home"
);
static_page!(about, "/about", "about");
static_page!(generals, "/generals", "generals");
static_page!(majors, "/majors", "majors");
static_page!(contact, "/contact", "contact");
