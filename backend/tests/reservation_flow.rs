//! End-to-end tests for the public reservation flow: search, choose a
//! room, submit the reservation form and read the one-time summary.

// Shared harness helpers are not all used by every suite.
#[allow(dead_code)]
#[path = "support/http.rs"]
mod http_support;

use std::sync::Arc;

use actix_web::http::StatusCode;
use http_support::{Browser, body_text, init_app, location};
use roomdesk::domain::ports::FixtureReservationRepository;
use roomdesk::inbound::http::state::HttpState;
use rstest::{fixture, rstest};

const RESERVATION_BODY: &str = "first_name={first}&last_name=Lee&email=jo%40x.com&phone=555\
&start_date=2024-01-01&end_date=2024-01-03&room_id=1";

fn reservation_body(first_name: &str) -> String {
    RESERVATION_BODY.replace("{first}", first_name)
}

#[fixture]
fn reservations() -> Arc<FixtureReservationRepository> {
    Arc::new(FixtureReservationRepository::default())
}

fn state_with(reservations: &Arc<FixtureReservationRepository>) -> HttpState {
    let mut state = HttpState::fixtures();
    state.reservations = reservations.clone();
    state
}

#[rstest]
#[actix_web::test]
async fn short_first_name_re_renders_the_form(reservations: Arc<FixtureReservationRepository>) {
    let mut browser = Browser::new(init_app(state_with(&reservations)).await);

    let res = browser
        .post_form("/make-reservation", &reservation_body("Jo"))
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = body_text(res).await;
    assert_eq!(
        body.matches("This field must be at least 3 characters long")
            .count(),
        1
    );
    assert!(body.contains("value=\"Jo\""));
    assert!(body.contains("value=\"Lee\""));
    assert!(body.contains("value=\"jo@x.com\""));
    assert!(reservations.reservations().is_empty());
    assert!(reservations.restrictions().is_empty());
}

#[rstest]
#[actix_web::test]
async fn valid_reservation_is_stored_and_summarised_once(
    reservations: Arc<FixtureReservationRepository>,
) {
    let mut browser = Browser::new(init_app(state_with(&reservations)).await);

    let res = browser
        .post_form("/make-reservation", &reservation_body("Jose"))
        .await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res).as_deref(), Some("/reservation-summary"));
    assert_eq!(reservations.reservations().len(), 1);
    assert_eq!(reservations.restrictions().len(), 1);

    let summary = browser.get("/reservation-summary").await;
    assert_eq!(summary.status(), StatusCode::OK);
    let body = body_text(summary).await;
    assert!(body.contains("Jose Lee"));
    assert!(body.contains("General&#x27;s Quarters") || body.contains("General's Quarters"));

    let reload = browser.get("/reservation-summary").await;
    assert_eq!(reload.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&reload).as_deref(), Some("/"));
    let home = body_text(browser.get("/").await).await;
    assert!(home.contains("Can&#x27;t get reservation from session"));
}

#[rstest]
#[actix_web::test]
async fn searching_then_choosing_a_room_prefills_the_form(
    reservations: Arc<FixtureReservationRepository>,
) {
    let mut browser = Browser::new(init_app(state_with(&reservations)).await);

    let rooms = browser
        .post_form("/search-availability", "start=2024-02-01&end=2024-02-04")
        .await;
    assert_eq!(rooms.status(), StatusCode::OK);
    assert!(body_text(rooms).await.contains("/choose-room/2"));

    let chosen = browser.get("/choose-room/2").await;
    assert_eq!(chosen.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&chosen).as_deref(), Some("/make-reservation"));

    let form = body_text(browser.get("/make-reservation").await).await;
    assert!(form.contains("value=\"2024-02-01\""));
    assert!(form.contains("value=\"2024-02-04\""));
    assert!(form.contains("value=\"2\""));
}

#[rstest]
#[actix_web::test]
async fn booked_rooms_are_reported_unavailable(reservations: Arc<FixtureReservationRepository>) {
    let mut browser = Browser::new(init_app(state_with(&reservations)).await);
    let res = browser
        .post_form("/make-reservation", &reservation_body("Jose"))
        .await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);

    let again = browser
        .post_form("/make-reservation", &reservation_body("Maria"))
        .await;
    assert_eq!(again.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&again).as_deref(), Some("/search-availability"));
    assert_eq!(reservations.reservations().len(), 1);

    let json = browser
        .post_form(
            "/search-availability-json",
            "start=2024-01-02&end=2024-01-05&room_id=1",
        )
        .await;
    assert_eq!(json.status(), StatusCode::OK);
    let body: serde_json::Value =
        serde_json::from_str(&body_text(json).await).expect("json body");
    assert_eq!(body["ok"], serde_json::Value::Bool(false));
}

#[rstest]
#[actix_web::test]
async fn malformed_dates_fail_with_an_opaque_page(
    reservations: Arc<FixtureReservationRepository>,
) {
    let mut browser = Browser::new(init_app(state_with(&reservations)).await);
    let res = browser
        .post_form(
            "/make-reservation",
            "first_name=Jose&last_name=Lee&email=jo%40x.com&start_date=tomorrow&end_date=2024-01-03&room_id=1",
        )
        .await;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_text(res).await;
    assert!(body.contains("Internal Server Error"));
    assert!(!body.contains("tomorrow"));
}
