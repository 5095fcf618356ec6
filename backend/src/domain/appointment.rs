//! Appointment booking types and the clinic slot grid.
//!
//! The clinic works a fixed half-hour grid from 08:00 to 20:00 inclusive.
//! Availability is always re-derived from the active (non-cancelled)
//! bookings held in storage; nothing here caches state.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use chrono::{DateTime, NaiveDate, NaiveTime, Timelike, Utc};
use regex::Regex;

use super::doctor::DoctorId;
use super::serial_id::define_serial_id;
use super::user::UserId;

define_serial_id! {
    /// Database-assigned appointment identifier.
    AppointmentId => "appointment"
}

/// First bookable slot start, in minutes after midnight.
const GRID_START_MINUTES: u32 = 8 * 60;
/// Last bookable slot start, in minutes after midnight.
const GRID_END_MINUTES: u32 = 20 * 60;
/// Slot length in minutes.
pub const SLOT_MINUTES: u32 = 30;

/// Allowed patient height range in centimetres.
pub const HEIGHT_CM_RANGE: std::ops::RangeInclusive<i32> = 30..=300;
/// Allowed patient weight range in kilograms.
pub const WEIGHT_KG_RANGE: std::ops::RangeInclusive<i32> = 1..=500;

/// Problems with booking inputs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AppointmentValidationError {
    /// Date was not `YYYY-MM-DD` or not a real calendar day.
    #[error("date must use the YYYY-MM-DD format")]
    InvalidDate,
    /// Time was not `HH:MM` or `HH:MM:SS`.
    #[error("time must use the HH:MM or HH:MM:SS format")]
    InvalidTime,
    /// Time is valid but not a clinic slot start.
    #[error("time must be a half-hour slot between 08:00 and 20:00")]
    OffGrid,
    /// Complaints are mandatory.
    #[error("complaints must not be empty")]
    EmptyComplaints,
    /// Height outside the plausible range.
    #[error("height must be between {min} and {max} cm")]
    HeightOutOfRange {
        /// Lower bound.
        min: i32,
        /// Upper bound.
        max: i32,
    },
    /// Weight outside the plausible range.
    #[error("weight must be between {min} and {max} kg")]
    WeightOutOfRange {
        /// Lower bound.
        min: i32,
        /// Upper bound.
        max: i32,
    },
    /// A stored status outside the known set.
    #[error("unknown appointment status: {0}")]
    UnknownStatus(String),
}

/// Lifecycle state of an appointment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AppointmentStatus {
    /// Newly booked, awaiting confirmation.
    Pending,
    /// Confirmed by the clinic.
    Scheduled,
    /// Visit took place.
    Completed,
    /// Cancelled by the patient; frees the slot.
    Cancelled,
}

impl AppointmentStatus {
    /// Storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Scheduled => "scheduled",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Whether the appointment still occupies its slot.
    #[must_use]
    pub const fn is_active(self) -> bool {
        !matches!(self, Self::Cancelled)
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentStatus {
    type Err = AppointmentValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "scheduled" => Ok(Self::Scheduled),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(AppointmentValidationError::UnknownStatus(other.to_owned())),
        }
    }
}

static DATE_RE: OnceLock<Regex> = OnceLock::new();

/// Shape check for `YYYY-MM-DD` ahead of calendar validation.
///
/// # Panics
///
/// Panics only if the literal pattern fails to compile.
fn date_regex() -> &'static Regex {
    DATE_RE.get_or_init(|| {
        Regex::new(r"^\d{4}-\d{2}-\d{2}$")
            .unwrap_or_else(|error| panic!("date regex failed to compile: {error}"))
    })
}

/// Calendar date of an appointment.
///
/// # Examples
/// ```
/// use careplus::domain::AppointmentDate;
///
/// let date: AppointmentDate = "2024-06-01".parse().expect("valid date");
/// assert_eq!(date.to_string(), "2024-06-01");
/// assert!("2024-6-1".parse::<AppointmentDate>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AppointmentDate(NaiveDate);

impl AppointmentDate {
    /// Wrap a calendar date.
    #[must_use]
    pub const fn from_naive(date: NaiveDate) -> Self {
        Self(date)
    }

    /// The underlying calendar date.
    #[must_use]
    pub const fn as_naive(&self) -> NaiveDate {
        self.0
    }
}

impl FromStr for AppointmentDate {
    type Err = AppointmentValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !date_regex().is_match(s) {
            return Err(AppointmentValidationError::InvalidDate);
        }
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Self)
            .map_err(|_| AppointmentValidationError::InvalidDate)
    }
}

impl fmt::Display for AppointmentDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

/// A time of day at second precision, rendered as `HH:MM:SS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotTime(NaiveTime);

impl SlotTime {
    /// Normalise a stored time, dropping sub-second precision.
    #[must_use]
    pub fn from_naive(time: NaiveTime) -> Self {
        Self(time.with_nanosecond(0).unwrap_or(time))
    }

    /// The underlying time.
    #[must_use]
    pub const fn as_naive(&self) -> NaiveTime {
        self.0
    }

    /// Whether the time starts one of the clinic's half-hour slots.
    #[must_use]
    pub fn is_on_grid(&self) -> bool {
        let minutes = self.0.hour() * 60 + self.0.minute();
        self.0.second() == 0
            && (GRID_START_MINUTES..=GRID_END_MINUTES).contains(&minutes)
            && minutes % SLOT_MINUTES == 0
    }

    /// Parse a requested booking time and require it to start a slot.
    ///
    /// Only the exact `HH:MM` and `HH:MM:SS` forms are accepted; the
    /// lenient [`FromStr`] reading is reserved for stored values.
    pub fn parse_bookable(raw: &str) -> Result<Self, AppointmentValidationError> {
        let format = match raw.len() {
            5 => "%H:%M",
            8 => "%H:%M:%S",
            _ => return Err(AppointmentValidationError::InvalidTime),
        };
        let time = NaiveTime::parse_from_str(raw, format)
            .map(Self::from_naive)
            .map_err(|_| AppointmentValidationError::InvalidTime)?;
        if time.is_on_grid() {
            Ok(time)
        } else {
            Err(AppointmentValidationError::OffGrid)
        }
    }
}

impl FromStr for SlotTime {
    type Err = AppointmentValidationError;

    /// Reads a stored time: `HH:MM`, `HH:MM:SS`, or a longer encoding whose
    /// first eight characters are `HH:MM:SS` (fractional seconds are
    /// ignored). Requested bookings go through [`SlotTime::parse_bookable`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let parsed = match trimmed.len() {
            5 => NaiveTime::parse_from_str(trimmed, "%H:%M"),
            8.. => {
                let head = trimmed
                    .get(..8)
                    .ok_or(AppointmentValidationError::InvalidTime)?;
                NaiveTime::parse_from_str(head, "%H:%M:%S")
            }
            _ => return Err(AppointmentValidationError::InvalidTime),
        };
        parsed
            .map(Self::from_naive)
            .map_err(|_| AppointmentValidationError::InvalidTime)
    }
}

impl fmt::Display for SlotTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%H:%M:%S"))
    }
}

/// Every slot start of a clinic day in ascending order.
///
/// # Examples
/// ```
/// use careplus::domain::clinic_slots;
///
/// let slots = clinic_slots();
/// assert_eq!(slots.len(), 25);
/// assert_eq!(slots[0].to_string(), "08:00:00");
/// assert_eq!(slots[24].to_string(), "20:00:00");
/// ```
#[must_use]
pub fn clinic_slots() -> Vec<SlotTime> {
    (GRID_START_MINUTES..=GRID_END_MINUTES)
        .step_by(SLOT_MINUTES as usize)
        .filter_map(|minutes| NaiveTime::from_hms_opt(minutes / 60, minutes % 60, 0))
        .map(SlotTime)
        .collect()
}

/// Availability of one doctor on one date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotAvailability {
    /// The queried date.
    pub date: AppointmentDate,
    /// Free slots, ascending.
    pub available: Vec<SlotTime>,
    /// Occupied times, ascending and de-duplicated.
    pub booked: Vec<SlotTime>,
    /// Size of the clinic grid.
    pub total: usize,
}

impl SlotAvailability {
    /// Subtract the active bookings from the clinic grid.
    #[must_use]
    pub fn compute(date: AppointmentDate, booked: impl IntoIterator<Item = SlotTime>) -> Self {
        let mut booked: Vec<SlotTime> = booked.into_iter().collect();
        booked.sort_unstable();
        booked.dedup();
        let grid = clinic_slots();
        let total = grid.len();
        let available = grid
            .into_iter()
            .filter(|slot| booked.binary_search(slot).is_err())
            .collect();
        Self {
            date,
            available,
            booked,
            total,
        }
    }
}

/// Clinical intake captured with a booking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntakeForm {
    complaints: String,
    chronic_diseases: Option<String>,
    height_cm: Option<i32>,
    weight_kg: Option<i32>,
    notes: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_owned())
        .filter(|trimmed| !trimmed.is_empty())
}

impl IntakeForm {
    /// Validate intake fields.
    pub fn new(
        complaints: &str,
        chronic_diseases: Option<String>,
        height_cm: Option<i32>,
        weight_kg: Option<i32>,
        notes: Option<String>,
    ) -> Result<Self, AppointmentValidationError> {
        let complaints = complaints.trim();
        if complaints.is_empty() {
            return Err(AppointmentValidationError::EmptyComplaints);
        }
        if height_cm.is_some_and(|height| !HEIGHT_CM_RANGE.contains(&height)) {
            return Err(AppointmentValidationError::HeightOutOfRange {
                min: *HEIGHT_CM_RANGE.start(),
                max: *HEIGHT_CM_RANGE.end(),
            });
        }
        if weight_kg.is_some_and(|weight| !WEIGHT_KG_RANGE.contains(&weight)) {
            return Err(AppointmentValidationError::WeightOutOfRange {
                min: *WEIGHT_KG_RANGE.start(),
                max: *WEIGHT_KG_RANGE.end(),
            });
        }
        Ok(Self {
            complaints: complaints.to_owned(),
            chronic_diseases: non_blank(chronic_diseases),
            height_cm,
            weight_kg,
            notes: non_blank(notes),
        })
    }

    /// Presenting complaints.
    #[must_use]
    pub fn complaints(&self) -> &str {
        &self.complaints
    }

    /// Known chronic conditions.
    #[must_use]
    pub fn chronic_diseases(&self) -> Option<&str> {
        self.chronic_diseases.as_deref()
    }

    /// Height in centimetres.
    #[must_use]
    pub fn height_cm(&self) -> Option<i32> {
        self.height_cm
    }

    /// Weight in kilograms.
    #[must_use]
    pub fn weight_kg(&self) -> Option<i32> {
        self.weight_kg
    }

    /// Free-text notes.
    #[must_use]
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }
}

/// A validated booking request from a patient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingRequest {
    /// Doctor to see.
    pub doctor_id: DoctorId,
    /// Visit date.
    pub date: AppointmentDate,
    /// Slot start.
    pub time: SlotTime,
    /// Clinical intake.
    pub intake: IntakeForm,
}

/// A booking ready to persist, bound to the patient placing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBooking {
    /// Patient placing the booking.
    pub patient_id: UserId,
    /// Doctor, date, time, and intake.
    pub request: BookingRequest,
}

/// An appointment joined with doctor and patient display fields.
#[derive(Debug, Clone, PartialEq)]
pub struct AppointmentDetails {
    /// Identifier.
    pub id: AppointmentId,
    /// Owning patient.
    pub patient_id: UserId,
    /// Doctor seen.
    pub doctor_id: DoctorId,
    /// Visit date.
    pub date: AppointmentDate,
    /// Slot start.
    pub time: SlotTime,
    /// Lifecycle state.
    pub status: AppointmentStatus,
    /// Presenting complaints.
    pub complaints: Option<String>,
    /// Known chronic conditions.
    pub chronic_diseases: Option<String>,
    /// Height in centimetres.
    pub height_cm: Option<i32>,
    /// Weight in kilograms.
    pub weight_kg: Option<i32>,
    /// Free-text notes.
    pub notes: Option<String>,
    /// Doctor display name.
    pub doctor_name: String,
    /// Doctor specialty name.
    pub specialty_name: Option<String>,
    /// Doctor fee.
    pub consultation_price: i32,
    /// Doctor photo reference.
    pub doctor_photo: Option<String>,
    /// Patient display name.
    pub patient_name: String,
    /// Patient email.
    pub patient_email: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Result of a cancellation attempt on storage.
#[derive(Debug, Clone, PartialEq)]
pub enum CancelOutcome {
    /// The appointment is now cancelled.
    Cancelled(Box<AppointmentDetails>),
    /// No appointment with that id belongs to the caller.
    NotFound,
    /// The appointment was cancelled earlier.
    AlreadyCancelled,
}
