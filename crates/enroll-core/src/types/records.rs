//! Entity records, creation drafts and update patches.
//!
//! A draft is a record minus its id; the store assigns the id on create.
//! A patch replaces only the fields it sets. Optional record fields use
//! `Option<Option<T>>` in patches: `Some(None)` clears the field.

use super::{
    EnrollmentId, EnrollmentStatus, FieldValue, LocationId, PayerId, ProviderId, ProviderStatus,
    Record,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

fn text(value: &str) -> Option<FieldValue> {
    Some(FieldValue::text(value))
}

fn opt_text(value: Option<&String>) -> Option<FieldValue> {
    value.map(|v| FieldValue::text(v.as_str()))
}

// =============================================================================
// PROVIDER
// =============================================================================

/// A clinician or practice entity being credentialed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provider {
    pub id: ProviderId,
    pub name: String,
    /// National Provider Identifier (10 digits).
    pub npi: Option<String>,
    pub license_number: Option<String>,
    /// Two-letter state code of the issuing board.
    pub license_state: Option<String>,
    pub specialty: Option<String>,
    pub status: ProviderStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProvider {
    pub name: String,
    #[serde(default)]
    pub npi: Option<String>,
    #[serde(default)]
    pub license_number: Option<String>,
    #[serde(default)]
    pub license_state: Option<String>,
    #[serde(default)]
    pub specialty: Option<String>,
    #[serde(default)]
    pub status: ProviderStatus,
}

impl NewProvider {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub(crate) fn into_record(self, id: ProviderId) -> Provider {
        Provider {
            id,
            name: self.name,
            npi: self.npi,
            license_number: self.license_number,
            license_state: self.license_state,
            specialty: self.specialty,
            status: self.status,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderPatch {
    pub name: Option<String>,
    pub npi: Option<Option<String>>,
    pub license_number: Option<Option<String>>,
    pub license_state: Option<Option<String>>,
    pub specialty: Option<Option<String>>,
    pub status: Option<ProviderStatus>,
}

impl ProviderPatch {
    pub(crate) fn apply(self, provider: &mut Provider) {
        if let Some(name) = self.name {
            provider.name = name;
        }
        if let Some(npi) = self.npi {
            provider.npi = npi;
        }
        if let Some(license_number) = self.license_number {
            provider.license_number = license_number;
        }
        if let Some(license_state) = self.license_state {
            provider.license_state = license_state;
        }
        if let Some(specialty) = self.specialty {
            provider.specialty = specialty;
        }
        if let Some(status) = self.status {
            provider.status = status;
        }
    }
}

impl Record for Provider {
    type Id = ProviderId;

    const FIELDS: &'static [&'static str] = &[
        "id",
        "name",
        "npi",
        "license_number",
        "license_state",
        "specialty",
        "status",
    ];

    fn id(&self) -> ProviderId {
        self.id
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "id" => Some(FieldValue::Id(self.id.0)),
            "name" => text(&self.name),
            "npi" => opt_text(self.npi.as_ref()),
            "license_number" => opt_text(self.license_number.as_ref()),
            "license_state" => opt_text(self.license_state.as_ref()),
            "specialty" => opt_text(self.specialty.as_ref()),
            "status" => text(self.status.as_str()),
            _ => None,
        }
    }
}

// =============================================================================
// PAYER
// =============================================================================

/// An insurance or reimbursement organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payer {
    pub id: PayerId,
    pub name: String,
    pub payer_code: Option<String>,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPayer {
    pub name: String,
    #[serde(default)]
    pub payer_code: Option<String>,
    #[serde(default)]
    pub contact_name: Option<String>,
    #[serde(default)]
    pub contact_email: Option<String>,
    #[serde(default)]
    pub contact_phone: Option<String>,
}

impl NewPayer {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub(crate) fn into_record(self, id: PayerId) -> Payer {
        Payer {
            id,
            name: self.name,
            payer_code: self.payer_code,
            contact_name: self.contact_name,
            contact_email: self.contact_email,
            contact_phone: self.contact_phone,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayerPatch {
    pub name: Option<String>,
    pub payer_code: Option<Option<String>>,
    pub contact_name: Option<Option<String>>,
    pub contact_email: Option<Option<String>>,
    pub contact_phone: Option<Option<String>>,
}

impl PayerPatch {
    pub(crate) fn apply(self, payer: &mut Payer) {
        if let Some(name) = self.name {
            payer.name = name;
        }
        if let Some(payer_code) = self.payer_code {
            payer.payer_code = payer_code;
        }
        if let Some(contact_name) = self.contact_name {
            payer.contact_name = contact_name;
        }
        if let Some(contact_email) = self.contact_email {
            payer.contact_email = contact_email;
        }
        if let Some(contact_phone) = self.contact_phone {
            payer.contact_phone = contact_phone;
        }
    }
}

impl Record for Payer {
    type Id = PayerId;

    const FIELDS: &'static [&'static str] = &[
        "id",
        "name",
        "payer_code",
        "contact_name",
        "contact_email",
        "contact_phone",
    ];

    fn id(&self) -> PayerId {
        self.id
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "id" => Some(FieldValue::Id(self.id.0)),
            "name" => text(&self.name),
            "payer_code" => opt_text(self.payer_code.as_ref()),
            "contact_name" => opt_text(self.contact_name.as_ref()),
            "contact_email" => opt_text(self.contact_email.as_ref()),
            "contact_phone" => opt_text(self.contact_phone.as_ref()),
            _ => None,
        }
    }
}

// =============================================================================
// LOCATION
// =============================================================================

/// A physical practice site shared by one or more providers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub id: LocationId,
    pub name: Option<String>,
    pub address_line1: String,
    pub address_line2: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub provider_ids: BTreeSet<ProviderId>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewLocation {
    #[serde(default)]
    pub name: Option<String>,
    pub address_line1: String,
    #[serde(default)]
    pub address_line2: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    #[serde(default)]
    pub provider_ids: BTreeSet<ProviderId>,
}

impl NewLocation {
    #[must_use]
    pub fn new(
        address_line1: impl Into<String>,
        city: impl Into<String>,
        state: impl Into<String>,
        postal_code: impl Into<String>,
    ) -> Self {
        Self {
            address_line1: address_line1.into(),
            city: city.into(),
            state: state.into(),
            postal_code: postal_code.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_provider(mut self, provider: ProviderId) -> Self {
        self.provider_ids.insert(provider);
        self
    }

    pub(crate) fn into_record(self, id: LocationId) -> Location {
        Location {
            id,
            name: self.name,
            address_line1: self.address_line1,
            address_line2: self.address_line2,
            city: self.city,
            state: self.state,
            postal_code: self.postal_code,
            provider_ids: self.provider_ids,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationPatch {
    pub name: Option<Option<String>>,
    pub address_line1: Option<String>,
    pub address_line2: Option<Option<String>>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    /// Replaces the whole provider list.
    pub provider_ids: Option<BTreeSet<ProviderId>>,
}

impl LocationPatch {
    pub(crate) fn apply(self, location: &mut Location) {
        if let Some(name) = self.name {
            location.name = name;
        }
        if let Some(address_line1) = self.address_line1 {
            location.address_line1 = address_line1;
        }
        if let Some(address_line2) = self.address_line2 {
            location.address_line2 = address_line2;
        }
        if let Some(city) = self.city {
            location.city = city;
        }
        if let Some(state) = self.state {
            location.state = state;
        }
        if let Some(postal_code) = self.postal_code {
            location.postal_code = postal_code;
        }
        if let Some(provider_ids) = self.provider_ids {
            location.provider_ids = provider_ids;
        }
    }
}

impl Record for Location {
    type Id = LocationId;

    const FIELDS: &'static [&'static str] = &[
        "id",
        "name",
        "address_line1",
        "address_line2",
        "city",
        "state",
        "postal_code",
    ];

    fn id(&self) -> LocationId {
        self.id
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "id" => Some(FieldValue::Id(self.id.0)),
            "name" => opt_text(self.name.as_ref()),
            "address_line1" => text(&self.address_line1),
            "address_line2" => opt_text(self.address_line2.as_ref()),
            "city" => text(&self.city),
            "state" => text(&self.state),
            "postal_code" => text(&self.postal_code),
            _ => None,
        }
    }
}

// =============================================================================
// ENROLLMENT
// =============================================================================

/// A provider's enrollment with a payer, moving through an approval workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enrollment {
    pub id: EnrollmentId,
    pub provider_id: ProviderId,
    pub payer_id: PayerId,
    pub status: EnrollmentStatus,
    pub effective_date: Option<NaiveDate>,
    pub expiry_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEnrollment {
    pub provider_id: ProviderId,
    pub payer_id: PayerId,
    /// Must be `Draft`; later states are reached through updates.
    #[serde(default)]
    pub status: EnrollmentStatus,
    #[serde(default)]
    pub effective_date: Option<NaiveDate>,
    #[serde(default)]
    pub expiry_date: Option<NaiveDate>,
}

impl NewEnrollment {
    #[must_use]
    pub fn new(provider_id: ProviderId, payer_id: PayerId) -> Self {
        Self {
            provider_id,
            payer_id,
            status: EnrollmentStatus::Draft,
            effective_date: None,
            expiry_date: None,
        }
    }

    #[must_use]
    pub fn with_dates(mut self, effective: Option<NaiveDate>, expiry: Option<NaiveDate>) -> Self {
        self.effective_date = effective;
        self.expiry_date = expiry;
        self
    }

    pub(crate) fn into_record(self, id: EnrollmentId) -> Enrollment {
        Enrollment {
            id,
            provider_id: self.provider_id,
            payer_id: self.payer_id,
            status: self.status,
            effective_date: self.effective_date,
            expiry_date: self.expiry_date,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrollmentPatch {
    pub provider_id: Option<ProviderId>,
    pub payer_id: Option<PayerId>,
    pub status: Option<EnrollmentStatus>,
    pub effective_date: Option<Option<NaiveDate>>,
    pub expiry_date: Option<Option<NaiveDate>>,
}

impl EnrollmentPatch {
    /// Patch that only changes the status.
    #[must_use]
    pub fn status(status: EnrollmentStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub(crate) fn apply(self, enrollment: &mut Enrollment) {
        if let Some(provider_id) = self.provider_id {
            enrollment.provider_id = provider_id;
        }
        if let Some(payer_id) = self.payer_id {
            enrollment.payer_id = payer_id;
        }
        if let Some(status) = self.status {
            enrollment.status = status;
        }
        if let Some(effective_date) = self.effective_date {
            enrollment.effective_date = effective_date;
        }
        if let Some(expiry_date) = self.expiry_date {
            enrollment.expiry_date = expiry_date;
        }
    }
}

impl Record for Enrollment {
    type Id = EnrollmentId;

    const FIELDS: &'static [&'static str] = &[
        "id",
        "provider_id",
        "payer_id",
        "status",
        "effective_date",
        "expiry_date",
    ];

    fn id(&self) -> EnrollmentId {
        self.id
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "id" => Some(FieldValue::Id(self.id.0)),
            "provider_id" => Some(FieldValue::Id(self.provider_id.0)),
            "payer_id" => Some(FieldValue::Id(self.payer_id.0)),
            "status" => text(self.status.as_str()),
            "effective_date" => self.effective_date.map(FieldValue::Date),
            "expiry_date" => self.expiry_date.map(FieldValue::Date),
            _ => None,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
