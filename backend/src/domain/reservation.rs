//! Rooms, reservations and the restrictions that block room availability.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Date format accepted from HTML date inputs.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A bookable room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub id: i32,
    pub room_name: String,
}

/// A reservation as captured from the public form, before it is stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationDraft {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub room_id: i32,
}

/// A stored reservation joined with its room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reservation {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub room: Room,
    pub processed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Contact details an administrator may change on a stored reservation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservationContact {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
}

/// Why a room is blocked for a date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RestrictionKind {
    /// Blocked by a guest reservation.
    Reservation,
    /// Blocked by the owner.
    OwnerBlock,
}

impl RestrictionKind {
    /// Identifier of the matching row in the `restrictions` table.
    pub const fn id(self) -> i32 {
        match self {
            Self::Reservation => 1,
            Self::OwnerBlock => 2,
        }
    }
}

/// Restriction row to insert alongside a reservation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRoomRestriction {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub room_id: i32,
    pub reservation_id: Option<i32>,
    pub restriction: RestrictionKind,
}

impl NewRoomRestriction {
    /// Restriction blocking the room for a freshly stored reservation.
    pub fn for_reservation(reservation_id: i32, draft: &ReservationDraft) -> Self {
        Self {
            start_date: draft.start_date,
            end_date: draft.end_date,
            room_id: draft.room_id,
            reservation_id: Some(reservation_id),
            restriction: RestrictionKind::Reservation,
        }
    }
}

/// Date range searched by a visitor, kept in the session until a room is
/// chosen and the reservation form is submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationSearch {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub room_id: Option<i32>,
}

/// Stored reservation handed to the summary page through the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationConfirmation {
    pub reservation_id: i32,
    pub room_name: String,
    pub draft: ReservationDraft,
}

/// Admin listing a reservation was opened from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservationSource {
    /// Unprocessed reservations.
    New,
    /// Every reservation.
    All,
}

impl ReservationSource {
    /// Path segment used in admin URLs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::All => "all",
        }
    }

    /// Listing page to return to after an admin action.
    pub fn listing_path(self) -> String {
        format!("/admin/reservations-{}", self.as_str())
    }
}

impl std::fmt::Display for ReservationSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
