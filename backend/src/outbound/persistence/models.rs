//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Conversions into domain types live next to
//! the repositories that load them.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use diesel::prelude::*;

use super::schema::{appointments, doctors, specialties, users};

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// Account row without the password hash.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: i32,
    pub email: String,
    pub name: String,
    pub role: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub avatar: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Account row together with its password hash, loaded only for login.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserCredentialsRow {
    #[diesel(embed)]
    pub user: UserRow,
    pub password: String,
}

/// Insertable account.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub name: &'a str,
    pub role: &'a str,
}

/// Partial profile update; `None` columns are left untouched.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
pub(crate) struct ProfileChangeset<'a> {
    pub name: Option<&'a str>,
    pub email: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub address: Option<&'a str>,
    pub avatar: Option<&'a str>,
}

// ---------------------------------------------------------------------------
// Specialties
// ---------------------------------------------------------------------------

/// Specialty row.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = specialties)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct SpecialtyRow {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Doctors
// ---------------------------------------------------------------------------

/// Doctor row.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = doctors)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct DoctorRow {
    pub id: i32,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub specialty_id: Option<i32>,
    pub experience_years: i32,
    pub education: Option<String>,
    pub description: Option<String>,
    pub consultation_price: i32,
    pub rating: f64,
    pub reviews_count: i32,
    pub photo: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable doctor; `None` metrics fall back to column defaults.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = doctors)]
pub(crate) struct NewDoctorRow<'a> {
    pub name: &'a str,
    pub email: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub specialty_id: Option<i32>,
    pub experience_years: Option<i32>,
    pub education: Option<&'a str>,
    pub description: Option<&'a str>,
    pub consultation_price: Option<i32>,
    pub rating: Option<f64>,
    pub reviews_count: Option<i32>,
    pub photo: Option<&'a str>,
}

/// Coalescing doctor update; `None` columns are left untouched.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = doctors)]
pub(crate) struct DoctorChangeset<'a> {
    pub name: Option<&'a str>,
    pub email: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub specialty_id: Option<i32>,
    pub experience_years: Option<i32>,
    pub education: Option<&'a str>,
    pub description: Option<&'a str>,
    pub consultation_price: Option<i32>,
    pub rating: Option<f64>,
    pub reviews_count: Option<i32>,
    pub photo: Option<&'a str>,
}

// ---------------------------------------------------------------------------
// Appointments
// ---------------------------------------------------------------------------

/// Appointment row.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = appointments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AppointmentRow {
    pub id: i32,
    pub user_id: i32,
    pub doctor_id: i32,
    pub appointment_date: NaiveDate,
    pub appointment_time: NaiveTime,
    pub status: String,
    pub complaints: Option<String>,
    pub chronic_diseases: Option<String>,
    pub height_cm: Option<i32>,
    pub weight_kg: Option<i32>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable appointment.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = appointments)]
pub(crate) struct NewAppointmentRow<'a> {
    pub user_id: i32,
    pub doctor_id: i32,
    pub appointment_date: NaiveDate,
    pub appointment_time: NaiveTime,
    pub status: &'a str,
    pub complaints: Option<&'a str>,
    pub chronic_diseases: Option<&'a str>,
    pub height_cm: Option<i32>,
    pub weight_kg: Option<i32>,
    pub notes: Option<&'a str>,
}
