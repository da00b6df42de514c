//! Back-office reservation handlers. Every route requires a logged-in user.
//!
//! ```text
//! GET  /admin/dashboard
//! GET  /admin/reservations-new
//! GET  /admin/reservations-all
//! GET  /admin/reservations/{src}/{id}
//! POST /admin/reservations/{src}/{id}
//! GET  /admin/process-reservation/{src}/{id}/do
//! GET  /admin/delete-reservation/{src}/{id}/do
//! ```
//!
//! `{src}` names the listing the reservation was opened from (`new` or
//! `all`) so actions can return there.

use actix_web::{HttpResponse, get, post, web};
use tracing::info;

use crate::domain::{Error, FieldSet, Form, Reservation, ReservationContact, ReservationSource};
use crate::inbound::http::HttpResult;
use crate::inbound::http::render::{PageData, TemplateData, render_page, see_other};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{UrlEncoded, field_set};

type ReservationPath = web::Path<(ReservationSource, i32)>;

fn reservation_not_found(id: i32) -> Error {
    Error::not_found(format!("reservation {id} does not exist"))
}

async fn load_reservation(state: &HttpState, id: i32) -> HttpResult<Reservation> {
    state
        .reservations
        .find_reservation(id)
        .await?
        .ok_or_else(|| reservation_not_found(id))
}

fn contact_fields(reservation: &Reservation) -> FieldSet {
    FieldSet::from_pairs([
        ("first_name", reservation.first_name.as_str()),
        ("last_name", reservation.last_name.as_str()),
        ("email", reservation.email.as_str()),
        ("phone", reservation.phone.as_str()),
    ])
}

/// Admin landing page.
#[get("/admin/dashboard")]
pub async fn dashboard(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> HttpResult<HttpResponse> {
    session.require_user_id()?;
    render_page(&state, &session, "admin-dashboard", TemplateData::default())
}

/// Reservations not yet processed.
#[get("/admin/reservations-new")]
pub async fn new_reservations(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> HttpResult<HttpResponse> {
    session.require_user_id()?;
    let reservations = state.reservations.new_reservations().await?;
    let data = TemplateData::page(PageData::Reservations(reservations));
    render_page(&state, &session, "admin-new-reservations", data)
}

/// Every reservation.
#[get("/admin/reservations-all")]
pub async fn all_reservations(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> HttpResult<HttpResponse> {
    session.require_user_id()?;
    let reservations = state.reservations.all_reservations().await?;
    let data = TemplateData::page(PageData::Reservations(reservations));
    render_page(&state, &session, "admin-all-reservations", data)
}

/// One reservation with its contact details in an edit form.
#[get("/admin/reservations/{src}/{id}")]
pub async fn show_reservation(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: ReservationPath,
) -> HttpResult<HttpResponse> {
    session.require_user_id()?;
    let (source, id) = path.into_inner();
    let reservation = load_reservation(&state, id).await?;
    let form = Form::new(contact_fields(&reservation));
    let data = TemplateData::page(PageData::AdminReservation {
        reservation,
        source,
    })
    .with_form(form);
    render_page(&state, &session, "admin-reservations-show", data)
}

/// Save edited contact details.
#[post("/admin/reservations/{src}/{id}")]
pub async fn update_reservation(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: ReservationPath,
    form: UrlEncoded,
) -> HttpResult<HttpResponse> {
    session.require_user_id()?;
    let (source, id) = path.into_inner();
    let reservation = load_reservation(&state, id).await?;

    let mut form = Form::new(field_set(form));
    form.required(&["first_name", "last_name", "email"]);
    form.is_email("email");
    if !form.is_valid() {
        let data = TemplateData::page(PageData::AdminReservation {
            reservation,
            source,
        })
        .with_form(form);
        return render_page(&state, &session, "admin-reservations-show", data);
    }

    let contact = ReservationContact {
        first_name: form.value("first_name").to_owned(),
        last_name: form.value("last_name").to_owned(),
        email: form.value("email").to_owned(),
        phone: form.value("phone").to_owned(),
    };
    if !state.reservations.update_reservation(id, &contact).await? {
        return Err(reservation_not_found(id));
    }
    info!(reservation_id = id, "reservation contact updated");
    session.put_flash("Changes saved")?;
    Ok(see_other(&source.listing_path()))
}

/// Mark a reservation as processed.
#[get("/admin/process-reservation/{src}/{id}/do")]
pub async fn process_reservation(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: ReservationPath,
) -> HttpResult<HttpResponse> {
    session.require_user_id()?;
    let (source, id) = path.into_inner();
    if !state.reservations.mark_processed(id, true).await? {
        return Err(reservation_not_found(id));
    }
    info!(reservation_id = id, "reservation processed");
    session.put_flash("Reservation marked as processed")?;
    Ok(see_other(&source.listing_path()))
}

/// Delete a reservation and free its room.
#[get("/admin/delete-reservation/{src}/{id}/do")]
pub async fn delete_reservation(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: ReservationPath,
) -> HttpResult<HttpResponse> {
    session.require_user_id()?;
    let (source, id) = path.into_inner();
    if !state.reservations.delete_reservation(id).await? {
        return Err(reservation_not_found(id));
    }
    info!(reservation_id = id, "reservation deleted");
    session.put_flash("Reservation deleted")?;
    Ok(see_other(&source.listing_path()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ReservationDraft;
    use crate::domain::ports::ReservationRepository;
    use crate::inbound::http::auth::post_login;
    use crate::inbound::http::error::LOGIN_PATH;
    use crate::inbound::http::test_utils::{
        FixturePorts, fixture_login_request, session_cookie, test_session_middleware,
    };
    use actix_web::dev::ServiceResponse;
    use actix_web::{App, http::StatusCode, test as actix_test};
    use chrono::NaiveDate;
    use rstest::rstest;

    fn draft() -> ReservationDraft {
        ReservationDraft {
            first_name: "Jose".into(),
            last_name: "Lee".into(),
            email: "jo@x.com".into(),
            phone: "555".into(),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).expect("date"),
            end_date: NaiveDate::from_ymd_opt(2024, 1, 3).expect("date"),
            room_id: 1,
        }
    }

    fn location<B>(res: &ServiceResponse<B>) -> Option<&str> {
        res.headers().get("location").and_then(|v| v.to_str().ok())
    }

    macro_rules! login {
        ($app:expr) => {{
            let res = actix_test::call_service(&$app, fixture_login_request().to_request()).await;
            session_cookie(&res).expect("login sets a session cookie")
        }};
    }

    macro_rules! admin_app {
        ($ports:expr) => {
            actix_test::init_service(
                App::new()
                    .app_data(web::Data::new($ports.state()))
                    .wrap(test_session_middleware())
                    .service(post_login)
                    .service(dashboard)
                    .service(new_reservations)
                    .service(all_reservations)
                    .service(show_reservation)
                    .service(update_reservation)
                    .service(process_reservation)
                    .service(delete_reservation),
            )
            .await
        };
    }

    #[rstest]
    #[case("/admin/dashboard")]
    #[case("/admin/reservations-new")]
    #[case("/admin/reservations/all/1")]
    #[case("/admin/process-reservation/new/1/do")]
    #[actix_web::test]
    async fn anonymous_visitors_are_sent_to_login(#[case] uri: &str) {
        let ports = FixturePorts::default();
        let app = admin_app!(ports);
        let res =
            actix_test::call_service(&app, actix_test::TestRequest::get().uri(uri).to_request())
                .await;
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&res), Some(LOGIN_PATH));
    }

    #[actix_web::test]
    async fn unknown_source_is_not_found() {
        let ports = FixturePorts::default();
        let app = admin_app!(ports);
        let cookie = login!(app);
        let req = actix_test::TestRequest::get()
            .uri("/admin/reservations/calendar/1")
            .cookie(cookie)
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn missing_reservation_is_not_found() {
        let ports = FixturePorts::default();
        let app = admin_app!(ports);
        let cookie = login!(app);
        let req = actix_test::TestRequest::get()
            .uri("/admin/reservations/new/99")
            .cookie(cookie)
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn processing_returns_to_the_source_listing() {
        let ports = FixturePorts::default();
        let id = ports
            .reservations
            .insert_reservation(&draft())
            .await
            .expect("insert");
        let app = admin_app!(ports);
        let cookie = login!(app);

        let req = actix_test::TestRequest::get()
            .uri(&format!("/admin/process-reservation/new/{id}/do"))
            .cookie(cookie)
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&res), Some("/admin/reservations-new"));
        let stored = ports.reservations.reservations();
        assert!(stored.iter().all(|reservation| reservation.processed));
    }

    #[actix_web::test]
    async fn invalid_edits_are_re_rendered_without_saving() {
        let ports = FixturePorts::default();
        let id = ports
            .reservations
            .insert_reservation(&draft())
            .await
            .expect("insert");
        let app = admin_app!(ports);
        let cookie = login!(app);

        let req = actix_test::TestRequest::post()
            .uri(&format!("/admin/reservations/all/{id}"))
            .cookie(cookie)
            .insert_header(("content-type", "application/x-www-form-urlencoded"))
            .set_payload("first_name=Jose&last_name=&email=bad&phone=1")
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
        let stored = ports.reservations.reservations();
        assert_eq!(stored.first().map(|r| r.email.as_str()), Some("jo@x.com"));
    }

    #[actix_web::test]
    async fn valid_edits_are_saved() {
        let ports = FixturePorts::default();
        let id = ports
            .reservations
            .insert_reservation(&draft())
            .await
            .expect("insert");
        let app = admin_app!(ports);
        let cookie = login!(app);

        let req = actix_test::TestRequest::post()
            .uri(&format!("/admin/reservations/all/{id}"))
            .cookie(cookie)
            .insert_header(("content-type", "application/x-www-form-urlencoded"))
            .set_payload("first_name=Josephine&last_name=Lee&email=jl%40x.com&phone=1")
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&res), Some("/admin/reservations-all"));
        let stored = ports.reservations.reservations();
        assert_eq!(
            stored.first().map(|r| r.first_name.as_str()),
            Some("Josephine")
        );
    }

    #[actix_web::test]
    async fn deleting_removes_the_reservation() {
        let ports = FixturePorts::default();
        let id = ports
            .reservations
            .insert_reservation(&draft())
            .await
            .expect("insert");
        let app = admin_app!(ports);
        let cookie = login!(app);

        let req = actix_test::TestRequest::get()
            .uri(&format!("/admin/delete-reservation/all/{id}/do"))
            .cookie(cookie.clone())
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert!(ports.reservations.reservations().is_empty());

        let again = actix_test::TestRequest::get()
            .uri(&format!("/admin/delete-reservation/all/{id}/do"))
            .cookie(cookie)
            .to_request();
        let res = actix_test::call_service(&app, again).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }
}
