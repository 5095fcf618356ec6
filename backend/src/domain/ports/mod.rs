//! Domain ports for the hexagonal boundary.
//!
//! Driven ports (repositories, the password hasher, the token codec) are
//! implemented by outbound adapters. Driving ports (the user directory, the
//! authentication gate, the doctor directory, the appointment scheduler) are
//! implemented by domain services and called by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod access_token_codec;
mod appointment_repository;
mod appointment_scheduler;
mod authentication_gate;
mod doctor_directory;
mod doctor_repository;
mod password_hasher;
mod specialty_repository;
mod user_directory;
mod user_repository;

#[cfg(test)]
pub use access_token_codec::MockAccessTokenCodec;
pub use access_token_codec::{AccessTokenCodec, TokenError};
#[cfg(test)]
pub use appointment_repository::MockAppointmentRepository;
pub use appointment_repository::{AppointmentRepository, AppointmentRepositoryError};
#[cfg(test)]
pub use appointment_scheduler::MockAppointmentScheduler;
pub use appointment_scheduler::AppointmentScheduler;
#[cfg(test)]
pub use authentication_gate::MockAuthenticationGate;
pub use authentication_gate::AuthenticationGate;
#[cfg(test)]
pub use doctor_directory::MockDoctorDirectory;
pub use doctor_directory::DoctorDirectory;
#[cfg(test)]
pub use doctor_repository::MockDoctorRepository;
pub use doctor_repository::{DoctorRepository, DoctorRepositoryError};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHasher, PasswordHasherError};
#[cfg(test)]
pub use specialty_repository::MockSpecialtyRepository;
pub use specialty_repository::{SpecialtyRepository, SpecialtyRepositoryError};
#[cfg(test)]
pub use user_directory::MockUserDirectory;
pub use user_directory::UserDirectory;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
