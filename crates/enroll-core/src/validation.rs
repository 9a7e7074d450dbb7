//! # Validation Module
//!
//! Field-level validation for records before they enter the store.
//!
//! - Reject malformed input before any mutation
//! - Check shapes only (lengths, formats, date order)
//! - Cross-record checks (referenced ids exist) live in the store

use crate::primitives::{MAX_FIELD_LENGTH, MAX_LOCATION_PROVIDERS, MAX_NAME_LENGTH, NPI_LENGTH};
use crate::{Enrollment, Location, Payer, Provider, StoreError};

/// Stateless field validator.
pub struct Validator;

impl Validator {
    /// Validate a provider record.
    pub fn provider(provider: &Provider) -> Result<(), StoreError> {
        required("name", &provider.name, MAX_NAME_LENGTH)?;
        if let Some(npi) = &provider.npi {
            Self::npi(npi)?;
        }
        optional("license_number", provider.license_number.as_deref())?;
        if let Some(state) = &provider.license_state {
            state_code("license_state", state)?;
        }
        optional("specialty", provider.specialty.as_deref())?;
        Ok(())
    }

    /// Validate a payer record.
    pub fn payer(payer: &Payer) -> Result<(), StoreError> {
        required("name", &payer.name, MAX_NAME_LENGTH)?;
        optional("payer_code", payer.payer_code.as_deref())?;
        optional("contact_name", payer.contact_name.as_deref())?;
        if let Some(email) = &payer.contact_email {
            optional("contact_email", Some(email))?;
            let valid = email
                .split_once('@')
                .is_some_and(|(user, domain)| !user.is_empty() && !domain.is_empty());
            if !valid {
                return Err(StoreError::validation(
                    "contact_email",
                    format!("'{}' is not an email address", email),
                ));
            }
        }
        optional("contact_phone", payer.contact_phone.as_deref())?;
        Ok(())
    }

    /// Validate a location record (provider existence is checked by the store).
    pub fn location(location: &Location) -> Result<(), StoreError> {
        optional("name", location.name.as_deref())?;
        required("address_line1", &location.address_line1, MAX_FIELD_LENGTH)?;
        optional("address_line2", location.address_line2.as_deref())?;
        required("city", &location.city, MAX_FIELD_LENGTH)?;
        state_code("state", &location.state)?;
        postal_code(&location.postal_code)?;
        if location.provider_ids.len() > MAX_LOCATION_PROVIDERS {
            return Err(StoreError::validation(
                "provider_ids",
                format!("at most {} providers per location", MAX_LOCATION_PROVIDERS),
            ));
        }
        Ok(())
    }

    /// Validate an enrollment's own fields (dates).
    pub fn enrollment(enrollment: &Enrollment) -> Result<(), StoreError> {
        if let (Some(effective), Some(expiry)) = (enrollment.effective_date, enrollment.expiry_date)
        {
            if effective > expiry {
                return Err(StoreError::validation(
                    "effective_date",
                    format!("{} is after expiry date {}", effective, expiry),
                ));
            }
        }
        Ok(())
    }

    /// Validate a National Provider Identifier: 10 digits with a Luhn
    /// check digit computed over the `80840` card-issuer prefix.
    pub fn npi(npi: &str) -> Result<(), StoreError> {
        let digits: Vec<u32> = npi.chars().filter_map(|c| c.to_digit(10)).collect();
        if npi.len() != NPI_LENGTH || digits.len() != NPI_LENGTH {
            return Err(StoreError::validation(
                "npi",
                format!("'{}' must be exactly {} digits", npi, NPI_LENGTH),
            ));
        }

        // 24 is the Luhn contribution of the 80840 prefix.
        let mut sum = 24;
        for (i, digit) in digits[..NPI_LENGTH - 1].iter().enumerate() {
            if i % 2 == 0 {
                let doubled = digit * 2;
                sum += doubled / 10 + doubled % 10;
            } else {
                sum += digit;
            }
        }
        let check = (10 - sum % 10) % 10;

        if digits[NPI_LENGTH - 1] != check {
            return Err(StoreError::validation(
                "npi",
                format!("'{}' has an invalid check digit", npi),
            ));
        }
        Ok(())
    }
}

fn required(field: &str, value: &str, max_len: usize) -> Result<(), StoreError> {
    if value.trim().is_empty() {
        return Err(StoreError::validation(field, "is required"));
    }
    if value.len() > max_len {
        return Err(StoreError::validation(
            field,
            format!("longer than {} bytes", max_len),
        ));
    }
    Ok(())
}

fn optional(field: &str, value: Option<&str>) -> Result<(), StoreError> {
    match value {
        Some(v) if v.trim().is_empty() => {
            Err(StoreError::validation(field, "must not be blank when set"))
        }
        Some(v) if v.len() > MAX_FIELD_LENGTH => Err(StoreError::validation(
            field,
            format!("longer than {} bytes", MAX_FIELD_LENGTH),
        )),
        _ => Ok(()),
    }
}

fn state_code(field: &str, value: &str) -> Result<(), StoreError> {
    if value.len() == 2 && value.chars().all(|c| c.is_ascii_uppercase()) {
        Ok(())
    } else {
        Err(StoreError::validation(
            field,
            format!("'{}' is not a two-letter state code", value),
        ))
    }
}

/// US ZIP or ZIP+4.
fn postal_code(value: &str) -> Result<(), StoreError> {
    let (base, extension) = match value.split_once('-') {
        Some((base, ext)) => (base, Some(ext)),
        None => (value, None),
    };
    let digits = |s: &str, n: usize| s.len() == n && s.chars().all(|c| c.is_ascii_digit());
    if digits(base, 5) && extension.is_none_or(|ext| digits(ext, 4)) {
        Ok(())
    } else {
        Err(StoreError::validation(
            "postal_code",
            format!("'{}' is not a ZIP code", value),
        ))
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        EnrollmentId, EnrollmentStatus, LocationId, NewLocation, NewPayer, NewProvider, PayerId,
        ProviderId,
    };
    use chrono::NaiveDate;

    fn provider(name: &str) -> Provider {
        NewProvider::new(name).into_record(ProviderId(1))
    }

    fn field_of(err: StoreError) -> String {
        match err {
            StoreError::Validation { field, .. } => field,
            other => format!("unexpected: {other}"),
        }
    }

    #[test]
    fn blank_name_rejected() {
        let err = Validator::provider(&provider("   ")).expect_err("blank");
        assert_eq!(field_of(err), "name");
    }

    #[test]
    fn overlong_name_rejected() {
        let long = "x".repeat(MAX_NAME_LENGTH + 1);
        assert!(Validator::provider(&provider(&long)).is_err());
    }

    #[test]
    fn npi_check_digit() {
        assert!(Validator::npi("1234567893").is_ok());
        assert!(Validator::npi("1234567890").is_err());
        assert!(Validator::npi("12345").is_err());
        assert!(Validator::npi("12345678a3").is_err());
    }

    #[test]
    fn license_state_must_be_code() {
        let mut p = provider("Dr. A");
        p.license_state = Some("California".to_string());
        assert_eq!(
            field_of(Validator::provider(&p).expect_err("state")),
            "license_state"
        );
    }

    #[test]
    fn payer_email_shape() {
        let mut payer = NewPayer::new("Acme Health").into_record(PayerId(1));
        payer.contact_email = Some("claims.acme.example".to_string());
        assert!(Validator::payer(&payer).is_err());

        payer.contact_email = Some("claims@acme.example".to_string());
        assert!(Validator::payer(&payer).is_ok());
    }

    #[test]
    fn location_zip_formats() {
        let ok = NewLocation::new("1 Main St", "Springfield", "IL", "62701").into_record(LocationId(1));
        assert!(Validator::location(&ok).is_ok());

        let plus4 =
            NewLocation::new("1 Main St", "Springfield", "IL", "62701-1234").into_record(LocationId(2));
        assert!(Validator::location(&plus4).is_ok());

        let bad = NewLocation::new("1 Main St", "Springfield", "IL", "6270").into_record(LocationId(3));
        assert_eq!(
            field_of(Validator::location(&bad).expect_err("zip")),
            "postal_code"
        );
    }

    #[test]
    fn enrollment_dates_ordered() {
        let day = |d| NaiveDate::from_ymd_opt(2026, 1, d).expect("date");
        let mut enrollment = Enrollment {
            id: EnrollmentId(1),
            provider_id: ProviderId(1),
            payer_id: PayerId(1),
            status: EnrollmentStatus::Draft,
            effective_date: Some(day(10)),
            expiry_date: Some(day(10)),
        };
        assert!(Validator::enrollment(&enrollment).is_ok());

        enrollment.expiry_date = Some(day(9));
        assert!(Validator::enrollment(&enrollment).is_err());

        enrollment.expiry_date = None;
        assert!(Validator::enrollment(&enrollment).is_ok());
    }
}
