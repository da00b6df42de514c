//! Port for rooms, reservations and room restrictions.
//!
//! Every operation is independent; callers that insert a reservation and
//! its restriction do so with two calls and no surrounding transaction.

use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use chrono::NaiveDate;
use mockable::{Clock, DefaultClock};

use crate::domain::{
    NewRoomRestriction, Reservation, ReservationContact, ReservationDraft, Room,
};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by reservation repository adapters.
    pub enum ReservationPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "reservation repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "reservation repository query failed: {message}",
        /// The operation did not finish within its time budget.
        Timeout => "reservation repository operation timed out",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReservationRepository: Send + Sync {
    /// Store a reservation and return its identifier.
    async fn insert_reservation(
        &self,
        draft: &ReservationDraft,
    ) -> Result<i32, ReservationPersistenceError>;

    /// Store a restriction blocking a room for a date range.
    async fn insert_room_restriction(
        &self,
        restriction: &NewRoomRestriction,
    ) -> Result<(), ReservationPersistenceError>;

    /// True when no restriction on `room_id` overlaps `[start, end)`.
    async fn is_room_available(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        room_id: i32,
    ) -> Result<bool, ReservationPersistenceError>;

    /// Rooms with no restriction overlapping `[start, end)`.
    async fn available_rooms(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Room>, ReservationPersistenceError>;

    /// Fetch a room by identifier.
    async fn find_room(&self, id: i32) -> Result<Option<Room>, ReservationPersistenceError>;

    /// Every reservation, earliest start first.
    async fn all_reservations(&self) -> Result<Vec<Reservation>, ReservationPersistenceError>;

    /// Reservations not yet processed, earliest start first.
    async fn new_reservations(&self) -> Result<Vec<Reservation>, ReservationPersistenceError>;

    /// Fetch a reservation by identifier.
    async fn find_reservation(
        &self,
        id: i32,
    ) -> Result<Option<Reservation>, ReservationPersistenceError>;

    /// Replace the contact details of a reservation. Returns `false` when
    /// no such reservation exists.
    async fn update_reservation(
        &self,
        id: i32,
        contact: &ReservationContact,
    ) -> Result<bool, ReservationPersistenceError>;

    /// Delete a reservation. Returns `false` when no such reservation exists.
    async fn delete_reservation(&self, id: i32) -> Result<bool, ReservationPersistenceError>;

    /// Set the processed flag. Returns `false` when no such reservation exists.
    async fn mark_processed(
        &self,
        id: i32,
        processed: bool,
    ) -> Result<bool, ReservationPersistenceError>;
}

#[derive(Default)]
struct FixtureReservationState {
    rooms: Vec<Room>,
    reservations: Vec<Reservation>,
    restrictions: Vec<NewRoomRestriction>,
    next_id: i32,
}

/// In-memory repository used when no database is configured.
///
/// Seeded with the two rooms shipped by the initial migration.
pub struct FixtureReservationRepository {
    state: Mutex<FixtureReservationState>,
    clock: Arc<dyn Clock>,
}

impl Default for FixtureReservationRepository {
    fn default() -> Self {
        Self::new(Arc::new(DefaultClock))
    }
}

impl FixtureReservationRepository {
    /// Repository stamping rows with `clock`.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        let rooms = vec![
            Room {
                id: 1,
                room_name: "General's Quarters".to_owned(),
            },
            Room {
                id: 2,
                room_name: "Major's Suite".to_owned(),
            },
        ];
        Self {
            state: Mutex::new(FixtureReservationState {
                rooms,
                next_id: 1,
                ..FixtureReservationState::default()
            }),
            clock,
        }
    }

    /// Restrictions inserted so far.
    pub fn restrictions(&self) -> Vec<NewRoomRestriction> {
        self.lock().restrictions.clone()
    }

    /// Reservations stored so far.
    pub fn reservations(&self) -> Vec<Reservation> {
        self.lock().reservations.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FixtureReservationState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn overlaps(restriction: &NewRoomRestriction, start: NaiveDate, end: NaiveDate) -> bool {
        start < restriction.end_date && end > restriction.start_date
    }

    fn sorted(mut reservations: Vec<Reservation>) -> Vec<Reservation> {
        reservations.sort_by_key(|reservation| reservation.start_date);
        reservations
    }

    fn with_reservation<F>(&self, id: i32, apply: F) -> bool
    where
        F: FnOnce(&mut Reservation),
    {
        let now = self.clock.utc();
        let mut state = self.lock();
        match state.reservations.iter_mut().find(|r| r.id == id) {
            Some(reservation) => {
                apply(reservation);
                reservation.updated_at = now;
                true
            }
            None => false,
        }
    }
}

#[async_trait]
impl ReservationRepository for FixtureReservationRepository {
    async fn insert_reservation(
        &self,
        draft: &ReservationDraft,
    ) -> Result<i32, ReservationPersistenceError> {
        let now = self.clock.utc();
        let mut state = self.lock();
        let room = state
            .rooms
            .iter()
            .find(|room| room.id == draft.room_id)
            .cloned()
            .ok_or_else(|| {
                ReservationPersistenceError::query(format!("unknown room {}", draft.room_id))
            })?;
        let id = state.next_id;
        state.next_id += 1;
        state.reservations.push(Reservation {
            id,
            first_name: draft.first_name.clone(),
            last_name: draft.last_name.clone(),
            email: draft.email.clone(),
            phone: draft.phone.clone(),
            start_date: draft.start_date,
            end_date: draft.end_date,
            room,
            processed: false,
            created_at: now,
            updated_at: now,
        });
        Ok(id)
    }

    async fn insert_room_restriction(
        &self,
        restriction: &NewRoomRestriction,
    ) -> Result<(), ReservationPersistenceError> {
        self.lock().restrictions.push(restriction.clone());
        Ok(())
    }

    async fn is_room_available(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        room_id: i32,
    ) -> Result<bool, ReservationPersistenceError> {
        let state = self.lock();
        Ok(!state
            .restrictions
            .iter()
            .any(|r| r.room_id == room_id && Self::overlaps(r, start, end)))
    }

    async fn available_rooms(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Room>, ReservationPersistenceError> {
        let state = self.lock();
        Ok(state
            .rooms
            .iter()
            .filter(|room| {
                !state
                    .restrictions
                    .iter()
                    .any(|r| r.room_id == room.id && Self::overlaps(r, start, end))
            })
            .cloned()
            .collect())
    }

    async fn find_room(&self, id: i32) -> Result<Option<Room>, ReservationPersistenceError> {
        Ok(self.lock().rooms.iter().find(|room| room.id == id).cloned())
    }

    async fn all_reservations(&self) -> Result<Vec<Reservation>, ReservationPersistenceError> {
        Ok(Self::sorted(self.lock().reservations.clone()))
    }

    async fn new_reservations(&self) -> Result<Vec<Reservation>, ReservationPersistenceError> {
        let pending = self
            .lock()
            .reservations
            .iter()
            .filter(|reservation| !reservation.processed)
            .cloned()
            .collect();
        Ok(Self::sorted(pending))
    }

    async fn find_reservation(
        &self,
        id: i32,
    ) -> Result<Option<Reservation>, ReservationPersistenceError> {
        Ok(self.lock().reservations.iter().find(|r| r.id == id).cloned())
    }

    async fn update_reservation(
        &self,
        id: i32,
        contact: &ReservationContact,
    ) -> Result<bool, ReservationPersistenceError> {
        Ok(self.with_reservation(id, |reservation| {
            reservation.first_name.clone_from(&contact.first_name);
            reservation.last_name.clone_from(&contact.last_name);
            reservation.email.clone_from(&contact.email);
            reservation.phone.clone_from(&contact.phone);
        }))
    }

    async fn delete_reservation(&self, id: i32) -> Result<bool, ReservationPersistenceError> {
        let mut state = self.lock();
        let before = state.reservations.len();
        state.reservations.retain(|r| r.id != id);
        let removed = state.reservations.len() != before;
        if removed {
            state.restrictions.retain(|r| r.reservation_id != Some(id));
        }
        Ok(removed)
    }

    async fn mark_processed(
        &self,
        id: i32,
        processed: bool,
    ) -> Result<bool, ReservationPersistenceError> {
        Ok(self.with_reservation(id, |reservation| reservation.processed = processed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RestrictionKind;
    use rstest::{fixture, rstest};

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).expect("valid date")
    }

    fn draft(room_id: i32) -> ReservationDraft {
        ReservationDraft {
            first_name: "Jose".into(),
            last_name: "Lee".into(),
            email: "jo@x.com".into(),
            phone: "555".into(),
            start_date: date(1),
            end_date: date(3),
            room_id,
        }
    }

    #[fixture]
    fn repo() -> FixtureReservationRepository {
        FixtureReservationRepository::default()
    }

    async fn book(repo: &FixtureReservationRepository, room_id: i32) -> i32 {
        let draft = draft(room_id);
        let id = repo.insert_reservation(&draft).await.expect("insert");
        repo.insert_room_restriction(&NewRoomRestriction::for_reservation(id, &draft))
            .await
            .expect("restriction");
        id
    }

    #[rstest]
    #[case(date(2), date(4), false)]
    #[case(date(3), date(5), true)]
    #[case(date(1), date(3), false)]
    #[tokio::test]
    async fn availability_only_considers_the_requested_room(
        repo: FixtureReservationRepository,
        #[case] start: NaiveDate,
        #[case] end: NaiveDate,
        #[case] room_one_free: bool,
    ) {
        book(&repo, 1).await;
        assert_eq!(
            repo.is_room_available(start, end, 1).await.expect("query"),
            room_one_free
        );
        assert!(repo.is_room_available(start, end, 2).await.expect("query"));
    }

    #[rstest]
    #[tokio::test]
    async fn available_rooms_excludes_booked_rooms(repo: FixtureReservationRepository) {
        book(&repo, 1).await;
        let rooms = repo.available_rooms(date(2), date(4)).await.expect("query");
        assert_eq!(rooms.iter().map(|r| r.id).collect::<Vec<_>>(), vec![2]);
    }

    #[rstest]
    #[tokio::test]
    async fn processed_reservations_leave_the_new_listing(repo: FixtureReservationRepository) {
        let id = book(&repo, 1).await;
        assert_eq!(repo.new_reservations().await.expect("query").len(), 1);
        assert!(repo.mark_processed(id, true).await.expect("update"));
        assert!(repo.new_reservations().await.expect("query").is_empty());
        assert_eq!(repo.all_reservations().await.expect("query").len(), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn deleting_frees_the_room(repo: FixtureReservationRepository) {
        let id = book(&repo, 1).await;
        assert!(repo.delete_reservation(id).await.expect("delete"));
        assert!(!repo.delete_reservation(id).await.expect("delete"));
        assert!(repo.is_room_available(date(1), date(3), 1).await.expect("query"));
    }

    #[rstest]
    #[tokio::test]
    async fn unknown_ids_report_missing(repo: FixtureReservationRepository) {
        assert!(repo.find_reservation(99).await.expect("query").is_none());
        assert!(!repo.mark_processed(99, true).await.expect("update"));
        let contact = ReservationContact {
            first_name: "A".into(),
            last_name: "B".into(),
            email: "a@b.com".into(),
            phone: String::new(),
        };
        assert!(!repo.update_reservation(99, &contact).await.expect("update"));
    }

    #[rstest]
    #[tokio::test]
    async fn restriction_kind_is_recorded(repo: FixtureReservationRepository) {
        book(&repo, 2).await;
        let restrictions = repo.restrictions();
        assert_eq!(restrictions.len(), 1);
        assert_eq!(
            restrictions.first().map(|r| r.restriction),
            Some(RestrictionKind::Reservation)
        );
    }
}
