//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `migrations/` exactly. `diesel print-schema`
//! against a migrated database regenerates them.

diesel::table! {
    /// Back-office accounts. `password` holds a bcrypt hash.
    users (id) {
        id -> Int4,
        first_name -> Varchar,
        last_name -> Varchar,
        email -> Varchar,
        password -> Varchar,
        access_level -> Int4,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    rooms (id) {
        id -> Int4,
        room_name -> Varchar,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Seeded lookup: 1 = Reservation, 2 = Owner Block.
    restrictions (id) {
        id -> Int4,
        restriction_name -> Varchar,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    reservations (id) {
        id -> Int4,
        first_name -> Varchar,
        last_name -> Varchar,
        email -> Varchar,
        phone -> Varchar,
        start_date -> Date,
        end_date -> Date,
        room_id -> Int4,
        processed -> Bool,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Date ranges during which a room cannot be booked.
    room_restrictions (id) {
        id -> Int4,
        start_date -> Date,
        end_date -> Date,
        room_id -> Int4,
        reservation_id -> Nullable<Int4>,
        restriction_id -> Int4,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    customers (customer_id) {
        customer_id -> Int4,
        customer_code -> Varchar,
        customer_name -> Varchar,
        contact_person -> Varchar,
        contact_no -> Varchar,
        mobile_no -> Varchar,
        email -> Varchar,
        business_name -> Varchar,
        location_details -> Text,
        status -> Varchar,
        nature_of_business -> Varchar,
        marketed_by -> Varchar,
        marketer_name -> Varchar,
        marketer_email -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    customer_attachments (file_id) {
        file_id -> Int4,
        customer_id -> Int4,
        customer_code -> Varchar,
        /// Path relative to the upload root.
        file_path -> Text,
        file_name -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    trade_licenses (trade_license_id) {
        trade_license_id -> Int4,
        customer_id -> Int4,
        trade_license_no -> Varchar,
        emirate -> Varchar,
        mohre_no -> Varchar,
        trade_name -> Varchar,
        legal_status -> Varchar,
        establishment_date -> Nullable<Date>,
        registration_date -> Nullable<Date>,
        license_expiry -> Nullable<Date>,
        file_path -> Nullable<Text>,
        file_name -> Nullable<Text>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    partners (partner_id) {
        partner_id -> Int4,
        customer_id -> Int4,
        customer_code -> Varchar,
        trade_license_id -> Nullable<Int4>,
        name -> Varchar,
        role -> Varchar,
        nationality -> Varchar,
        no_of_shares -> Nullable<Int4>,
        emirates_id -> Varchar,
        emirates_id_expiry -> Nullable<Date>,
        passport -> Varchar,
        passport_expiry -> Nullable<Date>,
        id_file_path -> Nullable<Text>,
        id_file_name -> Nullable<Text>,
        passport_file_path -> Nullable<Text>,
        passport_file_name -> Nullable<Text>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    memoranda (memorandum_id) {
        memorandum_id -> Int4,
        customer_id -> Int4,
        customer_code -> Varchar,
        trade_license_id -> Nullable<Int4>,
        representative_name -> Varchar,
        no_of_shares -> Varchar,
        emirates_id -> Varchar,
        emirates_id_expiry -> Nullable<Date>,
        passport -> Varchar,
        passport_expiry -> Nullable<Date>,
        id_file_path -> Nullable<Text>,
        id_file_name -> Nullable<Text>,
        passport_file_path -> Nullable<Text>,
        passport_file_name -> Nullable<Text>,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(reservations -> rooms (room_id));
diesel::joinable!(room_restrictions -> rooms (room_id));
diesel::joinable!(room_restrictions -> reservations (reservation_id));
diesel::joinable!(room_restrictions -> restrictions (restriction_id));
diesel::joinable!(customer_attachments -> customers (customer_id));
diesel::joinable!(trade_licenses -> customers (customer_id));
diesel::joinable!(partners -> customers (customer_id));
diesel::joinable!(memoranda -> customers (customer_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    rooms,
    restrictions,
    reservations,
    room_restrictions,
    customers,
    customer_attachments,
    trade_licenses,
    partners,
    memoranda,
);
