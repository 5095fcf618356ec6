//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Patient and administrator accounts.
    users (id) {
        /// Primary key (SERIAL).
        id -> Int4,
        /// Normalised, unique email address.
        email -> Varchar,
        /// bcrypt hash of the password.
        password -> Varchar,
        /// Display name.
        name -> Varchar,
        /// `user` or `admin`.
        role -> Varchar,
        /// Optional phone number.
        phone -> Nullable<Varchar>,
        /// Optional postal address.
        address -> Nullable<Text>,
        /// Optional avatar reference.
        avatar -> Nullable<Text>,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp (maintained by trigger).
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Medical specialties (seeded reference data).
    specialties (id) {
        /// Primary key (SERIAL).
        id -> Int4,
        /// Unique specialty name.
        name -> Varchar,
        /// Optional description.
        description -> Nullable<Text>,
        /// Optional icon reference.
        icon -> Nullable<Varchar>,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Doctors listed in the directory.
    doctors (id) {
        /// Primary key (SERIAL).
        id -> Int4,
        /// Display name.
        name -> Varchar,
        /// Contact email.
        email -> Nullable<Varchar>,
        /// Contact phone.
        phone -> Nullable<Varchar>,
        /// Specialty; set to NULL when the specialty is deleted.
        specialty_id -> Nullable<Int4>,
        /// Years in practice (>= 0).
        experience_years -> Int4,
        /// Education summary.
        education -> Nullable<Text>,
        /// Biography.
        description -> Nullable<Text>,
        /// Fee in whole currency units (>= 0).
        consultation_price -> Int4,
        /// Average rating (0..=5).
        rating -> Float8,
        /// Review count (>= 0).
        reviews_count -> Int4,
        /// Photo reference.
        photo -> Nullable<Text>,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp (maintained by trigger).
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Appointments. At most one non-cancelled row per doctor, date, and
    /// time, enforced by the partial unique index
    /// `appointments_active_slot_idx`.
    appointments (id) {
        /// Primary key (SERIAL).
        id -> Int4,
        /// Owning patient.
        user_id -> Int4,
        /// Doctor seen.
        doctor_id -> Int4,
        /// Visit date.
        appointment_date -> Date,
        /// Slot start.
        appointment_time -> Time,
        /// `pending`, `scheduled`, `completed`, or `cancelled`.
        status -> Varchar,
        /// Presenting complaints.
        complaints -> Nullable<Text>,
        /// Known chronic conditions.
        chronic_diseases -> Nullable<Text>,
        /// Height in centimetres.
        height_cm -> Nullable<Int4>,
        /// Weight in kilograms.
        weight_kg -> Nullable<Int4>,
        /// Free-text notes.
        notes -> Nullable<Text>,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp (maintained by trigger).
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(doctors -> specialties (specialty_id));
diesel::joinable!(appointments -> doctors (doctor_id));
diesel::joinable!(appointments -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(appointments, doctors, specialties, users);
