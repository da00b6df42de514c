//! PostgreSQL-backed `ReservationRepository` implementation using Diesel ORM.
//!
//! A room is unavailable for `[start, end)` when any of its restrictions
//! satisfies `start < end_date AND end > start_date`.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use mockable::{Clock, DefaultClock};

use crate::domain::ports::{ReservationPersistenceError, ReservationRepository};
use crate::domain::{
    NewRoomRestriction, Reservation, ReservationContact, ReservationDraft, Room,
};

use super::diesel_basic_error_mapping::map_db_error;
use super::models::{
    NewReservationRow, NewRoomRestrictionRow, ReservationContactUpdate, ReservationRow, RoomRow,
};
use super::pool::DbPool;
use super::schema::{reservations, room_restrictions, rooms};

/// Diesel-backed implementation of the `ReservationRepository` port.
#[derive(Clone)]
pub struct DieselReservationRepository {
    pool: DbPool,
    clock: Arc<dyn Clock>,
}

impl DieselReservationRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self::with_clock(pool, Arc::new(DefaultClock))
    }

    /// Create a repository stamping updates with `clock`.
    pub fn with_clock(pool: DbPool, clock: Arc<dyn Clock>) -> Self {
        Self { pool, clock }
    }

    async fn load_reservations(
        &self,
        only_unprocessed: bool,
    ) -> Result<Vec<Reservation>, ReservationPersistenceError> {
        let rows = self
            .pool
            .read(|mut conn| async move {
                let mut query = reservations::table
                    .inner_join(rooms::table)
                    .select((ReservationRow::as_select(), RoomRow::as_select()))
                    .order(reservations::start_date.asc())
                    .into_boxed();
                if only_unprocessed {
                    query = query.filter(reservations::processed.eq(false));
                }
                query.load::<(ReservationRow, RoomRow)>(&mut conn).await
            })
            .await
            .map_err(map_db_error)?;
        Ok(rows.into_iter().map(row_to_reservation).collect())
    }
}

fn row_to_room(row: RoomRow) -> Room {
    Room {
        id: row.id,
        room_name: row.room_name,
    }
}

fn row_to_reservation((row, room): (ReservationRow, RoomRow)) -> Reservation {
    Reservation {
        id: row.id,
        first_name: row.first_name,
        last_name: row.last_name,
        email: row.email,
        phone: row.phone,
        start_date: row.start_date,
        end_date: row.end_date,
        room: row_to_room(room),
        processed: row.processed,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}

#[async_trait]
impl ReservationRepository for DieselReservationRepository {
    async fn insert_reservation(
        &self,
        draft: &ReservationDraft,
    ) -> Result<i32, ReservationPersistenceError> {
        let row = NewReservationRow {
            first_name: &draft.first_name,
            last_name: &draft.last_name,
            email: &draft.email,
            phone: &draft.phone,
            start_date: draft.start_date,
            end_date: draft.end_date,
            room_id: draft.room_id,
        };
        self.pool
            .write(|mut conn| async move {
                diesel::insert_into(reservations::table)
                    .values(&row)
                    .returning(reservations::id)
                    .get_result::<i32>(&mut conn)
                    .await
            })
            .await
            .map_err(map_db_error)
    }

    async fn insert_room_restriction(
        &self,
        restriction: &NewRoomRestriction,
    ) -> Result<(), ReservationPersistenceError> {
        let row = NewRoomRestrictionRow {
            start_date: restriction.start_date,
            end_date: restriction.end_date,
            room_id: restriction.room_id,
            reservation_id: restriction.reservation_id,
            restriction_id: restriction.restriction.id(),
        };
        self.pool
            .write(|mut conn| async move {
                diesel::insert_into(room_restrictions::table)
                    .values(&row)
                    .execute(&mut conn)
                    .await
            })
            .await
            .map(|_| ())
            .map_err(map_db_error)
    }

    async fn is_room_available(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        room_id: i32,
    ) -> Result<bool, ReservationPersistenceError> {
        let overlapping: i64 = self
            .pool
            .read(|mut conn| async move {
                room_restrictions::table
                    .filter(room_restrictions::room_id.eq(room_id))
                    .filter(room_restrictions::end_date.gt(start))
                    .filter(room_restrictions::start_date.lt(end))
                    .count()
                    .get_result(&mut conn)
                    .await
            })
            .await
            .map_err(map_db_error)?;
        Ok(overlapping == 0)
    }

    async fn available_rooms(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Room>, ReservationPersistenceError> {
        let rows = self
            .pool
            .read(|mut conn| async move {
                let blocked = room_restrictions::table
                    .filter(room_restrictions::end_date.gt(start))
                    .filter(room_restrictions::start_date.lt(end))
                    .select(room_restrictions::room_id);
                rooms::table
                    .filter(diesel::dsl::not(rooms::id.eq_any(blocked)))
                    .order(rooms::id.asc())
                    .select(RoomRow::as_select())
                    .load(&mut conn)
                    .await
            })
            .await
            .map_err(map_db_error)?;
        Ok(rows.into_iter().map(row_to_room).collect())
    }

    async fn find_room(&self, id: i32) -> Result<Option<Room>, ReservationPersistenceError> {
        let row = self
            .pool
            .read(|mut conn| async move {
                rooms::table
                    .find(id)
                    .select(RoomRow::as_select())
                    .first(&mut conn)
                    .await
                    .optional()
            })
            .await
            .map_err(map_db_error)?;
        Ok(row.map(row_to_room))
    }

    async fn all_reservations(&self) -> Result<Vec<Reservation>, ReservationPersistenceError> {
        self.load_reservations(false).await
    }

    async fn new_reservations(&self) -> Result<Vec<Reservation>, ReservationPersistenceError> {
        self.load_reservations(true).await
    }

    async fn find_reservation(
        &self,
        id: i32,
    ) -> Result<Option<Reservation>, ReservationPersistenceError> {
        let row = self
            .pool
            .read(|mut conn| async move {
                reservations::table
                    .inner_join(rooms::table)
                    .filter(reservations::id.eq(id))
                    .select((ReservationRow::as_select(), RoomRow::as_select()))
                    .first::<(ReservationRow, RoomRow)>(&mut conn)
                    .await
                    .optional()
            })
            .await
            .map_err(map_db_error)?;
        Ok(row.map(row_to_reservation))
    }

    async fn update_reservation(
        &self,
        id: i32,
        contact: &ReservationContact,
    ) -> Result<bool, ReservationPersistenceError> {
        let changes = ReservationContactUpdate {
            first_name: &contact.first_name,
            last_name: &contact.last_name,
            email: &contact.email,
            phone: &contact.phone,
            updated_at: self.clock.utc(),
        };
        let updated = self
            .pool
            .write(|mut conn| async move {
                diesel::update(reservations::table.find(id))
                    .set(&changes)
                    .execute(&mut conn)
                    .await
            })
            .await
            .map_err(map_db_error)?;
        Ok(updated > 0)
    }

    async fn delete_reservation(&self, id: i32) -> Result<bool, ReservationPersistenceError> {
        let deleted = self
            .pool
            .write(|mut conn| async move {
                diesel::delete(reservations::table.find(id))
                    .execute(&mut conn)
                    .await
            })
            .await
            .map_err(map_db_error)?;
        Ok(deleted > 0)
    }

    async fn mark_processed(
        &self,
        id: i32,
        processed: bool,
    ) -> Result<bool, ReservationPersistenceError> {
        let now = self.clock.utc();
        let updated = self
            .pool
            .write(|mut conn| async move {
                diesel::update(reservations::table.find(id))
                    .set((
                        reservations::processed.eq(processed),
                        reservations::updated_at.eq(now),
                    ))
                    .execute(&mut conn)
                    .await
            })
            .await
            .map_err(map_db_error)?;
        Ok(updated > 0)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for row conversion.
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn rows_convert_to_reservations_with_their_room() {
        let stamp = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).single().expect("timestamp");
        let row = ReservationRow {
            id: 3,
            first_name: "Jose".into(),
            last_name: "Lee".into(),
            email: "jo@x.com".into(),
            phone: "555".into(),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).expect("date"),
            end_date: NaiveDate::from_ymd_opt(2024, 1, 3).expect("date"),
            processed: true,
            created_at: stamp,
            updated_at: stamp,
        };
        let room = RoomRow {
            id: 2,
            room_name: "Major's Suite".into(),
        };
        let reservation = row_to_reservation((row, room));
        assert_eq!(reservation.id, 3);
        assert_eq!(reservation.room.room_name, "Major's Suite");
        assert!(reservation.processed);
    }
}
