//! Doctor directory aggregates and specialty reference data.

use chrono::{DateTime, Utc};

use super::serial_id::define_serial_id;
use super::user::PersonName;

define_serial_id! {
    /// Database-assigned doctor identifier.
    DoctorId => "doctor"
}

define_serial_id! {
    /// Database-assigned specialty identifier.
    SpecialtyId => "specialty"
}

/// Highest rating a doctor may carry.
pub const RATING_MAX: f64 = 5.0;

/// A medical specialty (seeded reference data).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Specialty {
    /// Identifier.
    pub id: SpecialtyId,
    /// Unique name, e.g. `Cardiology`.
    pub name: String,
    /// Free-text description.
    pub description: Option<String>,
    /// Icon reference used by clients.
    pub icon: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// A doctor as listed in the directory, joined with its specialty name.
#[derive(Debug, Clone, PartialEq)]
pub struct Doctor {
    /// Identifier.
    pub id: DoctorId,
    /// Display name.
    pub name: String,
    /// Contact email.
    pub email: Option<String>,
    /// Contact phone.
    pub phone: Option<String>,
    /// Specialty, cleared when the specialty is deleted.
    pub specialty_id: Option<SpecialtyId>,
    /// Joined specialty name.
    pub specialty_name: Option<String>,
    /// Years in practice.
    pub experience_years: i32,
    /// Education summary.
    pub education: Option<String>,
    /// Biography.
    pub description: Option<String>,
    /// Fee in whole currency units.
    pub consultation_price: i32,
    /// Average rating between 0 and [`RATING_MAX`].
    pub rating: f64,
    /// Number of reviews behind the rating.
    pub reviews_count: i32,
    /// Photo reference.
    pub photo: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Field-level problems with doctor payloads.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DoctorValidationError {
    /// Experience must not be negative.
    #[error("experienceYears must not be negative")]
    NegativeExperience,
    /// Prices must not be negative.
    #[error("consultationPrice must not be negative")]
    NegativePrice,
    /// Ratings live in `0..=5`.
    #[error("rating must be between 0 and {max}")]
    RatingOutOfRange {
        /// Upper bound.
        max: f64,
    },
    /// Review counts must not be negative.
    #[error("reviewsCount must not be negative")]
    NegativeReviews,
    /// An update must change at least one field.
    #[error("update must contain at least one field")]
    EmptyUpdate,
}

/// Numeric attributes shared by create and update payloads.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DoctorMetrics {
    /// Years in practice.
    pub experience_years: Option<i32>,
    /// Fee in whole currency units.
    pub consultation_price: Option<i32>,
    /// Average rating.
    pub rating: Option<f64>,
    /// Number of reviews.
    pub reviews_count: Option<i32>,
}

impl DoctorMetrics {
    /// Check ranges of every supplied value.
    pub fn validate(&self) -> Result<(), DoctorValidationError> {
        if self.experience_years.is_some_and(|years| years < 0) {
            return Err(DoctorValidationError::NegativeExperience);
        }
        if self.consultation_price.is_some_and(|price| price < 0) {
            return Err(DoctorValidationError::NegativePrice);
        }
        if self
            .rating
            .is_some_and(|rating| !(0.0..=RATING_MAX).contains(&rating))
        {
            return Err(DoctorValidationError::RatingOutOfRange { max: RATING_MAX });
        }
        if self.reviews_count.is_some_and(|count| count < 0) {
            return Err(DoctorValidationError::NegativeReviews);
        }
        Ok(())
    }

    fn is_empty(&self) -> bool {
        self.experience_years.is_none()
            && self.consultation_price.is_none()
            && self.rating.is_none()
            && self.reviews_count.is_none()
    }
}

/// Optional text attributes shared by create and update payloads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DoctorProfileText {
    /// Contact email.
    pub email: Option<String>,
    /// Contact phone.
    pub phone: Option<String>,
    /// Education summary.
    pub education: Option<String>,
    /// Biography.
    pub description: Option<String>,
    /// Photo reference.
    pub photo: Option<String>,
}

impl DoctorProfileText {
    fn is_empty(&self) -> bool {
        self.email.is_none()
            && self.phone.is_none()
            && self.education.is_none()
            && self.description.is_none()
            && self.photo.is_none()
    }
}

/// A doctor to add to the directory. Unset metrics take column defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct DoctorDraft {
    /// Display name.
    pub name: PersonName,
    /// Specialty the doctor practises.
    pub specialty_id: SpecialtyId,
    /// Optional text attributes.
    pub text: DoctorProfileText,
    /// Optional numeric attributes.
    pub metrics: DoctorMetrics,
}

impl DoctorDraft {
    /// Check numeric ranges.
    pub fn validate(&self) -> Result<(), DoctorValidationError> {
        self.metrics.validate()
    }
}

/// Partial update; `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DoctorUpdate {
    /// Replacement name.
    pub name: Option<PersonName>,
    /// Replacement specialty.
    pub specialty_id: Option<SpecialtyId>,
    /// Replacement text attributes.
    pub text: DoctorProfileText,
    /// Replacement numeric attributes.
    pub metrics: DoctorMetrics,
}

impl DoctorUpdate {
    /// Check numeric ranges and that something changes.
    pub fn validate(&self) -> Result<(), DoctorValidationError> {
        if self.name.is_none()
            && self.specialty_id.is_none()
            && self.text.is_empty()
            && self.metrics.is_empty()
        {
            return Err(DoctorValidationError::EmptyUpdate);
        }
        self.metrics.validate()
    }
}

/// Directory read filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DoctorFilter {
    specialty_id: Option<SpecialtyId>,
    name_contains: Option<String>,
}

impl DoctorFilter {
    /// Build a filter; blank search terms are ignored.
    ///
    /// # Examples
    /// ```
    /// use careplus::domain::DoctorFilter;
    ///
    /// let filter = DoctorFilter::new(None, Some("  ".to_owned()));
    /// assert!(filter.name_contains().is_none());
    /// ```
    #[must_use]
    pub fn new(specialty_id: Option<SpecialtyId>, search: Option<String>) -> Self {
        let name_contains = search
            .map(|raw| raw.trim().to_owned())
            .filter(|term| !term.is_empty());
        Self {
            specialty_id,
            name_contains,
        }
    }

    /// Restrict to one specialty.
    #[must_use]
    pub fn specialty_id(&self) -> Option<SpecialtyId> {
        self.specialty_id
    }

    /// Case-insensitive name substring.
    #[must_use]
    pub fn name_contains(&self) -> Option<&str> {
        self.name_contains.as_deref()
    }
}
