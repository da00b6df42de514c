//! Public reservation flow.
//!
//! ```text
//! GET  /search-availability
//! POST /search-availability        start=2024-01-01&end=2024-01-03
//! POST /search-availability-json   start=..&end=..&room_id=1
//! GET  /choose-room/{id}
//! GET  /make-reservation
//! POST /make-reservation
//! GET  /reservation-summary
//! ```
//!
//! The searched date range travels in the session until the reservation form
//! is submitted; the stored reservation then travels to the summary page,
//! which consumes it.

use actix_web::{HttpResponse, get, post, web};
use serde::Serialize;
use tracing::{debug, info};

use crate::domain::{
    DATE_FORMAT, Error, FieldSet, Form, NewRoomRestriction, ReservationConfirmation,
    ReservationDraft, ReservationSearch,
};
use crate::inbound::http::HttpResult;
use crate::inbound::http::render::{PageData, TemplateData, render_page, see_other};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, UrlEncoded, field_set, parse_date, parse_number,
};

/// Session key holding the stored reservation awaiting its summary page.
pub const RESERVATION_KEY: &str = "reservation";
/// Session key holding the date range searched by the visitor.
pub const SEARCH_KEY: &str = "search";

const MISSING_RESERVATION_MESSAGE: &str = "Can't get reservation from session";
const NO_AVAILABILITY_MESSAGE: &str = "No availability";

const START: FieldName = FieldName::new("start");
const END: FieldName = FieldName::new("end");
const START_DATE: FieldName = FieldName::new("start_date");
const END_DATE: FieldName = FieldName::new("end_date");
const ROOM_ID: FieldName = FieldName::new("room_id");

/// Date range search form.
#[get("/search-availability")]
pub async fn search_availability(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> HttpResult<HttpResponse> {
    render_page(&state, &session, "search-availability", TemplateData::default())
}

/// List the rooms free for the submitted range.
#[post("/search-availability")]
pub async fn post_search_availability(
    state: web::Data<HttpState>,
    session: SessionContext,
    form: UrlEncoded,
) -> HttpResult<HttpResponse> {
    let fields = field_set(form);
    let start_date = parse_date(&fields, START)?;
    let end_date = parse_date(&fields, END)?;

    let rooms = state.reservations.available_rooms(start_date, end_date).await?;
    if rooms.is_empty() {
        debug!(%start_date, %end_date, "no rooms available");
        session.put_error(NO_AVAILABILITY_MESSAGE)?;
        return Ok(see_other("/search-availability"));
    }

    session.put(
        SEARCH_KEY,
        &ReservationSearch {
            start_date,
            end_date,
            room_id: None,
        },
    )?;
    let data = TemplateData::page(PageData::Rooms(rooms))
        .with_string("start_date", start_date.format(DATE_FORMAT).to_string())
        .with_string("end_date", end_date.format(DATE_FORMAT).to_string());
    render_page(&state, &session, "choose-room", data)
}

/// Body of `POST /search-availability-json`.
#[derive(Debug, Serialize)]
pub struct AvailabilityResponse {
    pub ok: bool,
    pub message: String,
}

/// Report whether one room is free for the submitted range.
///
/// Unparsable input is answered in the same JSON shape with `ok: false`.
#[post("/search-availability-json")]
pub async fn availability_json(
    state: web::Data<HttpState>,
    form: UrlEncoded,
) -> HttpResult<HttpResponse> {
    let fields = field_set(form);
    let parsed = parse_date(&fields, START).and_then(|start| {
        let end = parse_date(&fields, END)?;
        let room_id: i32 = parse_number(&fields, ROOM_ID)?;
        Ok((start, end, room_id))
    });
    let Ok((start_date, end_date, room_id)) = parsed else {
        return Ok(HttpResponse::Ok().json(AvailabilityResponse {
            ok: false,
            message: "Invalid search parameters".to_owned(),
        }));
    };

    let available = state
        .reservations
        .is_room_available(start_date, end_date, room_id)
        .await?;
    let message = if available { "Available" } else { "Unavailable" };
    Ok(HttpResponse::Ok().json(AvailabilityResponse {
        ok: available,
        message: message.to_owned(),
    }))
}

/// Pick a room for the pending search and continue to the reservation form.
#[get("/choose-room/{id}")]
pub async fn choose_room(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i32>,
) -> HttpResult<HttpResponse> {
    let room_id = path.into_inner();
    let Some(mut search) = session.get::<ReservationSearch>(SEARCH_KEY) else {
        session.put_error(MISSING_RESERVATION_MESSAGE)?;
        return Ok(see_other("/"));
    };
    if state.reservations.find_room(room_id).await?.is_none() {
        return Err(Error::not_found(format!("room {room_id} does not exist")));
    }
    search.room_id = Some(room_id);
    session.put(SEARCH_KEY, &search)?;
    Ok(see_other("/make-reservation"))
}

/// Reservation form, pre-filled from the pending search when there is one.
#[get("/make-reservation")]
pub async fn make_reservation(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> HttpResult<HttpResponse> {
    let mut fields = FieldSet::new();
    if let Some(search) = session.get::<ReservationSearch>(SEARCH_KEY) {
        fields.push(
            START_DATE.as_str(),
            search.start_date.format(DATE_FORMAT).to_string(),
        );
        fields.push(
            END_DATE.as_str(),
            search.end_date.format(DATE_FORMAT).to_string(),
        );
        if let Some(room_id) = search.room_id {
            fields.push(ROOM_ID.as_str(), room_id.to_string());
        }
    }
    let data = TemplateData::default().with_form(Form::new(fields));
    render_page(&state, &session, "make-reservation", data)
}

fn reservation_draft(fields: &FieldSet) -> Result<ReservationDraft, Error> {
    Ok(ReservationDraft {
        first_name: fields.value("first_name").to_owned(),
        last_name: fields.value("last_name").to_owned(),
        email: fields.value("email").to_owned(),
        phone: fields.value("phone").to_owned(),
        start_date: parse_date(fields, START_DATE)?,
        end_date: parse_date(fields, END_DATE)?,
        room_id: parse_number(fields, ROOM_ID)?,
    })
}

/// Validate and store a reservation, then hand it to the summary page.
#[post("/make-reservation")]
pub async fn post_make_reservation(
    state: web::Data<HttpState>,
    session: SessionContext,
    form: UrlEncoded,
) -> HttpResult<HttpResponse> {
    let fields = field_set(form);
    let draft = reservation_draft(&fields)?;

    let mut form = Form::new(fields);
    form.required(&["first_name", "last_name", "email"]);
    form.min_length("first_name", 3);
    form.is_email("email");
    if !form.is_valid() {
        let data = TemplateData::default().with_form(form);
        return render_page(&state, &session, "make-reservation", data);
    }

    let room = state
        .reservations
        .find_room(draft.room_id)
        .await?
        .ok_or_else(|| Error::not_found(format!("room {} does not exist", draft.room_id)))?;
    let available = state
        .reservations
        .is_room_available(draft.start_date, draft.end_date, draft.room_id)
        .await?;
    if !available {
        session.put_error(NO_AVAILABILITY_MESSAGE)?;
        return Ok(see_other("/search-availability"));
    }

    let reservation_id = state.reservations.insert_reservation(&draft).await?;
    state
        .reservations
        .insert_room_restriction(&NewRoomRestriction::for_reservation(reservation_id, &draft))
        .await?;
    info!(reservation_id, room_id = draft.room_id, "reservation stored");

    session.remove(SEARCH_KEY);
    session.put(
        RESERVATION_KEY,
        &ReservationConfirmation {
            reservation_id,
            room_name: room.room_name,
            draft,
        },
    )?;
    Ok(see_other("/reservation-summary"))
}

/// Show the reservation just stored; the session entry is consumed.
#[get("/reservation-summary")]
pub async fn reservation_summary(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> HttpResult<HttpResponse> {
    let Some(confirmation) = session.pop::<ReservationConfirmation>(RESERVATION_KEY) else {
        debug!("no reservation pending in session");
        session.put_error(MISSING_RESERVATION_MESSAGE)?;
        return Ok(see_other("/"));
    };
    let data = TemplateData::page(PageData::Confirmation(confirmation));
    render_page(&state, &session, "reservation-summary", data)
}
