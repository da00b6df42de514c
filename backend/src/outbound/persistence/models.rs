//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;

use super::schema::{
    customer_attachments, customers, memoranda, partners, reservations, room_restrictions, rooms,
    trade_licenses, users,
};

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// Columns needed to verify a login.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CredentialsRow {
    pub id: i32,
    pub password: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
    pub access_level: i32,
}

// ---------------------------------------------------------------------------
// Rooms and reservations
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = rooms)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct RoomRow {
    pub id: i32,
    pub room_name: String,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = reservations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ReservationRow {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub processed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = reservations)]
pub(crate) struct NewReservationRow<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a str,
    pub phone: &'a str,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub room_id: i32,
}

/// Contact columns an administrator may edit.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = reservations)]
pub(crate) struct ReservationContactUpdate<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a str,
    pub phone: &'a str,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = room_restrictions)]
pub(crate) struct NewRoomRestrictionRow {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub room_id: i32,
    pub reservation_id: Option<i32>,
    pub restriction_id: i32,
}

// ---------------------------------------------------------------------------
// Customers
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = customers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CustomerRow {
    pub customer_id: i32,
    pub customer_code: String,
    pub customer_name: String,
    pub contact_person: String,
    pub contact_no: String,
    pub mobile_no: String,
    pub email: String,
    pub business_name: String,
    pub location_details: String,
    pub status: String,
    pub nature_of_business: String,
    pub marketed_by: String,
    pub marketer_name: String,
    pub marketer_email: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = customers)]
pub(crate) struct NewCustomerRow<'a> {
    pub customer_code: &'a str,
    pub customer_name: &'a str,
    pub contact_person: &'a str,
    pub contact_no: &'a str,
    pub mobile_no: &'a str,
    pub email: &'a str,
    pub business_name: &'a str,
    pub location_details: &'a str,
    pub status: &'a str,
    pub nature_of_business: &'a str,
    pub marketed_by: &'a str,
    pub marketer_name: &'a str,
    pub marketer_email: &'a str,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = customer_attachments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AttachmentRow {
    pub file_id: i32,
    pub customer_id: i32,
    pub customer_code: String,
    pub file_path: String,
    pub file_name: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = customer_attachments)]
pub(crate) struct NewAttachmentRow<'a> {
    pub customer_id: i32,
    pub customer_code: &'a str,
    pub file_path: &'a str,
    pub file_name: &'a str,
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = trade_licenses)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TradeLicenseRow {
    #[diesel(skip_insertion)]
    pub trade_license_id: i32,
    pub customer_id: i32,
    pub trade_license_no: String,
    pub emirate: String,
    pub mohre_no: String,
    pub trade_name: String,
    pub legal_status: String,
    pub establishment_date: Option<NaiveDate>,
    pub registration_date: Option<NaiveDate>,
    pub license_expiry: Option<NaiveDate>,
    pub file_path: Option<String>,
    pub file_name: Option<String>,
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = partners)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PartnerRow {
    #[diesel(skip_insertion)]
    pub partner_id: i32,
    pub customer_id: i32,
    pub customer_code: String,
    pub trade_license_id: Option<i32>,
    pub name: String,
    pub role: String,
    pub nationality: String,
    pub no_of_shares: Option<i32>,
    pub emirates_id: String,
    pub emirates_id_expiry: Option<NaiveDate>,
    pub passport: String,
    pub passport_expiry: Option<NaiveDate>,
    pub id_file_path: Option<String>,
    pub id_file_name: Option<String>,
    pub passport_file_path: Option<String>,
    pub passport_file_name: Option<String>,
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = memoranda)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct MemorandumRow {
    #[diesel(skip_insertion)]
    pub memorandum_id: i32,
    pub customer_id: i32,
    pub customer_code: String,
    pub trade_license_id: Option<i32>,
    pub representative_name: String,
    pub no_of_shares: String,
    pub emirates_id: String,
    pub emirates_id_expiry: Option<NaiveDate>,
    pub passport: String,
    pub passport_expiry: Option<NaiveDate>,
    pub id_file_path: Option<String>,
    pub id_file_name: Option<String>,
    pub passport_file_path: Option<String>,
    pub passport_file_name: Option<String>,
}
