//! Domain primitives, form validation and use-case services.
//!
//! Public surface:
//! - [`Form`] with [`FieldSet`] and [`FormErrors`]: the validation engine
//!   every handler runs submitted fields through.
//! - Reservation and customer entities mirroring stored rows.
//! - [`Error`] / [`ErrorCode`]: transport-agnostic failures.
//! - [`ports`]: traits hiding persistence, login and document storage.

pub mod auth;
pub mod customer;
pub mod documents;
pub mod error;
pub mod forms;
pub mod login_service;
pub mod ports;
pub mod reservation;
pub mod trace_id;
pub mod user;

pub use self::auth::LoginCredentials;
pub use self::customer::{
    Attachment, Customer, CustomerDraft, Memorandum, MemorandumDraft, NewAttachment, Partner,
    PartnerDraft, TradeLicense, TradeLicenseDraft,
};
pub use self::documents::{DocumentFolder, DocumentUpload, StoredDocument, sanitize_segment};
pub use self::error::{Error, ErrorCode, TRACE_ID_HEADER};
pub use self::forms::{BLANK_MESSAGE, FieldSet, Form, FormErrors, INVALID_EMAIL_MESSAGE};
pub use self::login_service::PasswordLoginService;
pub use self::reservation::{
    DATE_FORMAT, NewRoomRestriction, Reservation, ReservationConfirmation, ReservationContact,
    ReservationDraft, ReservationSearch, ReservationSource, RestrictionKind, Room,
};
pub use self::trace_id::TraceId;
pub use self::user::{ADMIN_ACCESS_LEVEL, NewUser, StoredCredentials, User, UserId};
