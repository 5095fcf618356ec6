//! Domain primitives, aggregates, and services.
//!
//! Purpose: define strongly typed entities shared by the HTTP and persistence
//! adapters, plus the services implementing the driving ports. Nothing here
//! depends on actix or Diesel.
//!
//! Public surface:
//! - Error / ErrorCode: the error taxonomy every adapter maps into.
//! - User, Role, EmailAddress: accounts.
//! - Doctor, Specialty: the directory.
//! - SlotTime, AppointmentDate, SlotAvailability: scheduling.
//! - AccountService, DoctorDirectoryService, AppointmentSchedulerService:
//!   driving port implementations.

pub mod account_service;
pub mod appointment;
pub mod appointment_scheduler_service;
pub mod auth;
pub mod doctor;
pub mod doctor_directory_service;
pub mod error;
pub mod ports;
mod serial_id;
pub mod trace_id;
pub mod user;

pub use self::account_service::{AccountService, TokenPolicy};
pub use self::appointment::{
    AppointmentDate, AppointmentDetails, AppointmentId, AppointmentStatus,
    AppointmentValidationError, BookingRequest, CancelOutcome, IntakeForm, NewBooking,
    SLOT_MINUTES, SlotAvailability, SlotTime, clinic_slots,
};
pub use self::appointment_scheduler_service::AppointmentSchedulerService;
pub use self::auth::{
    AccessToken, AuthSession, Caller, LoginCredentials, LoginValidationError, NewAccount,
    PASSWORD_MAX_BYTES, PASSWORD_MIN, Password, PasswordHash, Registration,
    RegistrationValidationError, StoredCredentials, TokenClaims,
};
pub use self::doctor::{
    Doctor, DoctorDraft, DoctorFilter, DoctorId, DoctorMetrics, DoctorProfileText, DoctorUpdate,
    DoctorValidationError, RATING_MAX, Specialty, SpecialtyId,
};
pub use self::doctor_directory_service::DoctorDirectoryService;
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::serial_id::InvalidSerialId;
pub use self::trace_id::TraceId;
pub use self::user::{
    ContactDetails, EmailAddress, PersonName, ProfileUpdate, Role, User, UserDraft, UserId,
    UserValidationError,
};
