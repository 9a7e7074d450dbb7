//! # CLI Command Implementations
//!
//! Every command opens a session (login, then populate from the snapshot
//! file), runs against the store, saves if it mutated anything, and prints
//! plain text or JSON.

use super::{
    Cli, Commands, EnrollmentAction, ExportFormat, ListArgs, LocationAction, PayerAction,
    ProviderAction,
};
use crate::AppError;
use crate::config::Config;
use chrono::NaiveDate;
use enroll_core::primitives::{MAGIC_BYTES, MAX_SNAPSHOT_SIZE};
use enroll_core::{
    Enrollment, EnrollmentPatch, EnrollmentQuery, EnrollmentStatus, EntityStore, FieldValue,
    Filter, Location, LocationPatch, NewEnrollment, NewLocation, NewPayer, NewProvider, Payer,
    PayerPatch, Provider, ProviderPatch, ProviderStatus, Record, Role, Session, Snapshot,
    StoreError, StoreMetrics, snapshot_checksum, snapshot_crypto_hash, snapshot_from_bytes,
    store_to_bytes,
};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments and resolved configuration.
pub fn execute(cli: Cli, config: &Config) -> Result<(), AppError> {
    let json = cli.json_mode;

    match cli.command {
        Some(Commands::Init { force }) => cmd_init(config, force, json),
        Some(Commands::Status) | None => cmd_status(config, json),
        Some(Commands::Provider { action }) => cmd_provider(config, json, action),
        Some(Commands::Payer { action }) => cmd_payer(config, json, action),
        Some(Commands::Location { action }) => cmd_location(config, json, action),
        Some(Commands::Enrollment { action }) => cmd_enrollment(config, json, action),
        Some(Commands::Expire { as_of }) => cmd_expire(config, json, as_of),
        Some(Commands::Export { output, format }) => cmd_export(config, &output, format),
        Some(Commands::Import { input }) => cmd_import(config, json, &input),
        Some(Commands::Hash) => cmd_hash(config, json),
        Some(Commands::Verify) => cmd_verify(config, json),
    }
}

// =============================================================================
// FILE HANDLING
// =============================================================================

/// Reject files over the snapshot size limit before reading them.
fn validate_file_size(path: &Path) -> Result<(), AppError> {
    let size = fs::metadata(path)?.len();
    if size > MAX_SNAPSHOT_SIZE as u64 {
        return Err(StoreError::SerializationError(format!(
            "File size {} bytes exceeds maximum allowed {} bytes",
            size, MAX_SNAPSHOT_SIZE
        ))
        .into());
    }
    Ok(())
}

/// Resolve an input path to an existing regular file.
fn validate_file_path(path: &Path) -> Result<PathBuf, AppError> {
    let canonical = path.canonicalize()?;
    if !canonical.is_file() {
        return Err(AppError::Config(format!(
            "'{}' is not a regular file",
            path.display()
        )));
    }
    Ok(canonical)
}

/// Resolve an output path whose parent directory must already exist.
fn validate_output_path(path: &Path) -> Result<PathBuf, AppError> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let canonical_parent = parent.canonicalize()?;
    if !canonical_parent.is_dir() {
        return Err(AppError::Config(format!(
            "output directory '{}' is not a directory",
            parent.display()
        )));
    }
    let filename = path
        .file_name()
        .ok_or_else(|| AppError::Config("output path has no file name".to_string()))?;
    Ok(canonical_parent.join(filename))
}

/// Decode a binary snapshot, or JSON when the magic bytes are absent.
fn decode_snapshot(bytes: &[u8]) -> Result<Snapshot, AppError> {
    if bytes.starts_with(MAGIC_BYTES) {
        Ok(snapshot_from_bytes(bytes)?)
    } else {
        Ok(serde_json::from_slice(bytes)?)
    }
}

/// A missing snapshot file is an empty store.
fn read_snapshot(path: &Path) -> Result<Snapshot, AppError> {
    if !path.exists() {
        debug!(path = %path.display(), "no snapshot yet, starting empty");
        return Ok(Snapshot::default());
    }
    validate_file_size(path)?;
    decode_snapshot(&fs::read(path)?)
}

fn write_store(store: &EntityStore, path: &Path) -> Result<(), AppError> {
    let bytes = store_to_bytes(store)?;
    fs::write(path, &bytes)?;
    debug!(path = %path.display(), bytes = bytes.len(), "snapshot saved");
    Ok(())
}

// =============================================================================
// SESSION HELPERS
// =============================================================================

/// Login, populate from the snapshot file, then log every committed change.
pub fn open_session(config: &Config) -> Result<Session, AppError> {
    let mut session = Session::new();
    session.login(config.current_user());
    session.populate(read_snapshot(&config.snapshot)?)?;
    session
        .store_mut()
        .subscribe(|event| info!(%event, "change committed"));
    Ok(session)
}

fn require_write(role: Role, user: &str) -> Result<(), AppError> {
    if role == Role::Viewer {
        return Err(AppError::ReadOnly(format!(
            "user '{}' has the viewer role",
            user
        )));
    }
    Ok(())
}

/// Run a mutation and save the snapshot. Nothing is written on error.
fn mutate<T>(
    config: &Config,
    f: impl FnOnce(&mut Session) -> Result<T, AppError>,
) -> Result<T, AppError> {
    require_write(config.user.role, &config.user.id)?;
    let mut session = open_session(config)?;
    let out = f(&mut session)?;
    write_store(session.store(), &config.snapshot)?;
    Ok(out)
}

/// Empty string clears an optional field; anything else sets it.
fn clearable(value: Option<String>) -> Option<Option<String>> {
    value.map(|v| if v.trim().is_empty() { None } else { Some(v) })
}

// =============================================================================
// FILTER PARSING
// =============================================================================

fn field_value(field: &str, raw: &str) -> Result<FieldValue, AppError> {
    let raw = raw.trim();
    match field {
        "id" | "provider_id" | "payer_id" => raw
            .trim_start_matches(|c: char| c.is_ascii_alphabetic())
            .parse::<u64>()
            .map(FieldValue::Id)
            .map_err(|_| StoreError::validation(field, format!("'{}' is not an id", raw)).into()),
        "effective_date" | "expiry_date" => raw
            .parse::<NaiveDate>()
            .map(FieldValue::Date)
            .map_err(|e| StoreError::validation(field, format!("'{}': {}", raw, e)).into()),
        "status" => Ok(FieldValue::text(canonical_status(raw))),
        _ => Ok(FieldValue::text(raw)),
    }
}

/// Status filters match regardless of case.
fn canonical_status(raw: &str) -> String {
    if let Ok(status) = raw.parse::<EnrollmentStatus>() {
        status.as_str().to_string()
    } else if let Ok(status) = raw.parse::<ProviderStatus>() {
        status.as_str().to_string()
    } else {
        raw.to_string()
    }
}

fn bound(field: &str, raw: &str) -> Result<Option<FieldValue>, AppError> {
    if raw.trim().is_empty() {
        Ok(None)
    } else {
        field_value(field, raw).map(Some)
    }
}

/// `FIELD=VALUE` is equality, `FIELD=MIN..MAX` an inclusive range with
/// either side optional.
pub fn build_filter(list: &ListArgs) -> Result<Filter, AppError> {
    let mut filter = Filter::new();
    for raw in &list.filters {
        let (field, value) = raw.split_once('=').ok_or_else(|| {
            StoreError::validation("filter", format!("'{}' is not FIELD=VALUE", raw))
        })?;
        let field = field.trim();
        filter = match value.split_once("..") {
            Some((min, max)) => filter.range(field, bound(field, min)?, bound(field, max)?),
            None => filter.eq(field, field_value(field, value)?),
        };
    }
    if let Some(sort) = &list.sort {
        filter = if list.desc {
            filter.sort_by_desc(sort.as_str())
        } else {
            filter.sort_by(sort.as_str())
        };
    }
    Ok(filter)
}

// =============================================================================
// OUTPUT
// =============================================================================

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), AppError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn or_dash(value: Option<&String>) -> &str {
    value.map_or("-", String::as_str)
}

fn provider_line(p: &Provider) -> String {
    format!(
        "{:<6} {:<30} {:<11} NPI {:<10}  {}",
        p.id.to_string(),
        p.name,
        p.status.as_str(),
        or_dash(p.npi.as_ref()),
        or_dash(p.specialty.as_ref())
    )
}

fn payer_line(p: &Payer) -> String {
    format!(
        "{:<6} {:<30} {:<10} {}",
        p.id.to_string(),
        p.name,
        or_dash(p.payer_code.as_ref()),
        or_dash(p.contact_email.as_ref())
    )
}

fn location_line(l: &Location) -> String {
    let providers: Vec<String> = l.provider_ids.iter().map(ToString::to_string).collect();
    format!(
        "{:<6} {}, {}, {} {}  [{}]",
        l.id.to_string(),
        l.address_line1,
        l.city,
        l.state,
        l.postal_code,
        providers.join(" ")
    )
}

fn enrollment_line(e: &Enrollment) -> String {
    let date = |d: Option<NaiveDate>| d.map_or_else(|| "-".to_string(), |d| d.to_string());
    format!(
        "{:<6} {:<6} {:<6} {:<10} {} .. {}",
        e.id.to_string(),
        e.provider_id.to_string(),
        e.payer_id.to_string(),
        e.status.as_str(),
        date(e.effective_date),
        date(e.expiry_date)
    )
}

/// Every filterable field of a record, one per line.
fn print_fields<R: Record>(record: &R) {
    for name in R::FIELDS {
        let value = record
            .field(name)
            .map_or_else(|| "-".to_string(), |v| v.to_string());
        println!("  {:<15} {}", name, value);
    }
}

fn print_records<R: Serialize>(
    records: &[&R],
    json: bool,
    line: impl Fn(&R) -> String,
) -> Result<(), AppError> {
    if json {
        return print_json(records);
    }
    for record in records {
        println!("{}", line(record));
    }
    println!("({} records)", records.len());
    Ok(())
}

fn report<R: Serialize>(
    json: bool,
    action: &str,
    record: &R,
    line: impl Fn(&R) -> String,
) -> Result<(), AppError> {
    if json {
        return print_json(&serde_json::json!({ "action": action, "record": record }));
    }
    println!("{}: {}", action, line(record));
    Ok(())
}

// =============================================================================
// INIT & STATUS
// =============================================================================

/// Write an empty snapshot.
pub fn cmd_init(config: &Config, force: bool, json: bool) -> Result<(), AppError> {
    require_write(config.user.role, &config.user.id)?;
    let path = &config.snapshot;
    if path.exists() && !force {
        return Err(AppError::Io(std::io::Error::new(
            std::io::ErrorKind::AlreadyExists,
            format!("{} already exists, use --force to overwrite", path.display()),
        )));
    }
    write_store(&EntityStore::new(), path)?;

    if json {
        return print_json(&serde_json::json!({ "initialized": path.to_string_lossy() }));
    }
    println!("Initialized empty store at {}", path.display());
    Ok(())
}

pub fn cmd_status(config: &Config, json: bool) -> Result<(), AppError> {
    let session = open_session(config)?;
    let metrics = StoreMetrics::from_store(session.store());

    if json {
        return print_json(&serde_json::json!({
            "snapshot": config.snapshot.to_string_lossy(),
            "user": config.user.id,
            "role": config.user.role,
            "metrics": metrics,
        }));
    }

    println!("Enroll Store Status");
    println!("===================");
    println!("Snapshot: {}", config.snapshot.display());
    println!("User:     {} ({})", config.user.id, config.user.role);
    println!();
    println!("Providers:   {}", metrics.provider_count);
    println!("Payers:      {}", metrics.payer_count);
    println!("Locations:   {}", metrics.location_count);
    println!("Enrollments: {}", metrics.enrollment_count);
    for (status, count) in &metrics.enrollments_by_status {
        println!("  {:<10} {}", status.as_str(), count);
    }
    println!("Approval rate: {}%", metrics.approval_percent);
    Ok(())
}

// =============================================================================
// PROVIDER COMMANDS
// =============================================================================

pub fn cmd_provider(config: &Config, json: bool, action: ProviderAction) -> Result<(), AppError> {
    match action {
        ProviderAction::Add {
            name,
            npi,
            license_number,
            license_state,
            specialty,
            status,
        } => {
            let draft = NewProvider {
                name,
                npi,
                license_number,
                license_state,
                specialty,
                status: status.unwrap_or_default(),
            };
            let provider = mutate(config, |s| {
                let id = s.store_mut().create_provider(draft)?;
                Ok(s.store().provider(id)?.clone())
            })?;
            report(json, "Created", &provider, provider_line)
        }
        ProviderAction::Show { id } => {
            let session = open_session(config)?;
            let store = session.store();
            let provider = store.provider(id)?;
            let enrollments: Vec<&Enrollment> = store
                .query_enrollments(EnrollmentQuery::ByProvider(id))
                .collect();
            let locations: Vec<&Location> = store.locations_for_provider(id).collect();

            if json {
                return print_json(&serde_json::json!({
                    "provider": provider,
                    "enrollments": enrollments,
                    "locations": locations,
                }));
            }
            println!("Provider {}", id);
            print_fields(provider);
            println!();
            println!("Enrollments ({}):", enrollments.len());
            for enrollment in &enrollments {
                println!("  {}", enrollment_line(enrollment));
            }
            println!("Locations ({}):", locations.len());
            for location in &locations {
                println!("  {}", location_line(location));
            }
            Ok(())
        }
        ProviderAction::Update {
            id,
            name,
            npi,
            license_number,
            license_state,
            specialty,
            status,
        } => {
            let patch = ProviderPatch {
                name,
                npi: clearable(npi),
                license_number: clearable(license_number),
                license_state: clearable(license_state),
                specialty: clearable(specialty),
                status,
            };
            let provider = mutate(config, |s| Ok(s.store_mut().update_provider(id, patch)?))?;
            report(json, "Updated", &provider, provider_line)
        }
        ProviderAction::Remove { id } => {
            let (provider, enrollments, locations) = mutate(config, |s| {
                let store = s.store();
                let enrollments = store
                    .query_enrollments(EnrollmentQuery::ByProvider(id))
                    .count();
                let locations = store.locations_for_provider(id).count();
                Ok((s.delete_provider(id)?, enrollments, locations))
            })?;
            if json {
                return print_json(&serde_json::json!({
                    "action": "Removed",
                    "record": provider,
                    "enrollments_removed": enrollments,
                    "locations_updated": locations,
                }));
            }
            println!("Removed: {}", provider_line(&provider));
            println!(
                "  cascade: {} enrollments removed, {} locations updated",
                enrollments, locations
            );
            Ok(())
        }
        ProviderAction::List { list } => {
            let session = open_session(config)?;
            let listing = session.store().list_providers(build_filter(&list)?)?;
            let records: Vec<&Provider> = listing.iter().collect();
            print_records(&records, json, provider_line)
        }
    }
}

// =============================================================================
// PAYER COMMANDS
// =============================================================================

pub fn cmd_payer(config: &Config, json: bool, action: PayerAction) -> Result<(), AppError> {
    match action {
        PayerAction::Add {
            name,
            payer_code,
            contact_name,
            contact_email,
            contact_phone,
        } => {
            let draft = NewPayer {
                name,
                payer_code,
                contact_name,
                contact_email,
                contact_phone,
            };
            let payer = mutate(config, |s| {
                let id = s.store_mut().create_payer(draft)?;
                Ok(s.store().payer(id)?.clone())
            })?;
            report(json, "Created", &payer, payer_line)
        }
        PayerAction::Show { id } => {
            let session = open_session(config)?;
            let store = session.store();
            let payer = store.payer(id)?;
            let enrollments: Vec<&Enrollment> = store
                .query_enrollments(EnrollmentQuery::ByPayer(id))
                .collect();

            if json {
                return print_json(&serde_json::json!({
                    "payer": payer,
                    "enrollments": enrollments,
                }));
            }
            println!("Payer {}", id);
            print_fields(payer);
            println!();
            println!("Enrollments ({}):", enrollments.len());
            for enrollment in &enrollments {
                println!("  {}", enrollment_line(enrollment));
            }
            Ok(())
        }
        PayerAction::Update {
            id,
            name,
            payer_code,
            contact_name,
            contact_email,
            contact_phone,
        } => {
            let patch = PayerPatch {
                name,
                payer_code: clearable(payer_code),
                contact_name: clearable(contact_name),
                contact_email: clearable(contact_email),
                contact_phone: clearable(contact_phone),
            };
            let payer = mutate(config, |s| Ok(s.store_mut().update_payer(id, patch)?))?;
            report(json, "Updated", &payer, payer_line)
        }
        PayerAction::Remove { id } => {
            let (payer, enrollments) = mutate(config, |s| {
                let enrollments = s
                    .store()
                    .query_enrollments(EnrollmentQuery::ByPayer(id))
                    .count();
                Ok((s.store_mut().delete_payer(id)?, enrollments))
            })?;
            if json {
                return print_json(&serde_json::json!({
                    "action": "Removed",
                    "record": payer,
                    "enrollments_removed": enrollments,
                }));
            }
            println!("Removed: {}", payer_line(&payer));
            println!("  cascade: {} enrollments removed", enrollments);
            Ok(())
        }
        PayerAction::List { list } => {
            let session = open_session(config)?;
            let listing = session.store().list_payers(build_filter(&list)?)?;
            let records: Vec<&Payer> = listing.iter().collect();
            print_records(&records, json, payer_line)
        }
    }
}

// =============================================================================
// LOCATION COMMANDS
// =============================================================================

pub fn cmd_location(config: &Config, json: bool, action: LocationAction) -> Result<(), AppError> {
    match action {
        LocationAction::Add {
            name,
            address_line1,
            address_line2,
            city,
            state,
            postal_code,
            providers,
        } => {
            let draft = NewLocation {
                name,
                address_line1,
                address_line2,
                city,
                state,
                postal_code,
                provider_ids: providers.into_iter().collect(),
            };
            let location = mutate(config, |s| {
                let id = s.store_mut().create_location(draft)?;
                Ok(s.store().location(id)?.clone())
            })?;
            report(json, "Created", &location, location_line)
        }
        LocationAction::Show { id } => {
            let session = open_session(config)?;
            let location = session.store().location(id)?;
            if json {
                return print_json(location);
            }
            println!("Location {}", id);
            print_fields(location);
            let providers: Vec<String> =
                location.provider_ids.iter().map(ToString::to_string).collect();
            println!("  {:<15} {}", "providers", providers.join(" "));
            Ok(())
        }
        LocationAction::Update {
            id,
            name,
            address_line1,
            address_line2,
            city,
            state,
            postal_code,
            providers,
            clear_providers,
        } => {
            let provider_ids = if clear_providers {
                Some(Default::default())
            } else if providers.is_empty() {
                None
            } else {
                Some(providers.into_iter().collect())
            };
            let patch = LocationPatch {
                name: clearable(name),
                address_line1,
                address_line2: clearable(address_line2),
                city,
                state,
                postal_code,
                provider_ids,
            };
            let location = mutate(config, |s| Ok(s.store_mut().update_location(id, patch)?))?;
            report(json, "Updated", &location, location_line)
        }
        LocationAction::Remove { id } => {
            let location = mutate(config, |s| Ok(s.store_mut().delete_location(id)?))?;
            report(json, "Removed", &location, location_line)
        }
        LocationAction::List { list } => {
            let session = open_session(config)?;
            let listing = session.store().list_locations(build_filter(&list)?)?;
            let records: Vec<&Location> = listing.iter().collect();
            print_records(&records, json, location_line)
        }
    }
}

// =============================================================================
// ENROLLMENT COMMANDS
// =============================================================================

pub fn cmd_enrollment(
    config: &Config,
    json: bool,
    action: EnrollmentAction,
) -> Result<(), AppError> {
    match action {
        EnrollmentAction::Add {
            provider,
            payer,
            effective,
            expiry,
        } => {
            let draft = NewEnrollment::new(provider, payer).with_dates(effective, expiry);
            let enrollment = mutate(config, |s| {
                let id = s.store_mut().create_enrollment(draft)?;
                Ok(s.store().enrollment(id)?.clone())
            })?;
            report(json, "Created", &enrollment, enrollment_line)
        }
        EnrollmentAction::Show { id } => {
            let session = open_session(config)?;
            let store = session.store();
            let enrollment = store.enrollment(id)?;
            if json {
                return print_json(&serde_json::json!({
                    "enrollment": enrollment,
                    "provider": store.provider(enrollment.provider_id)?,
                    "payer": store.payer(enrollment.payer_id)?,
                }));
            }
            println!("Enrollment {}", id);
            print_fields(enrollment);
            println!("  {:<15} {}", "provider", store.provider(enrollment.provider_id)?.name);
            println!("  {:<15} {}", "payer", store.payer(enrollment.payer_id)?.name);
            let next: Vec<&str> = enrollment
                .status
                .allowed_next()
                .iter()
                .map(|s| s.as_str())
                .collect();
            println!("  {:<15} {}", "next", next.join(", "));
            Ok(())
        }
        EnrollmentAction::Transition { id, status } => {
            let enrollment =
                mutate(config, |s| Ok(s.store_mut().transition_enrollment(id, status)?))?;
            report(json, "Updated", &enrollment, enrollment_line)
        }
        EnrollmentAction::Update {
            id,
            provider,
            payer,
            effective,
            expiry,
            clear_effective,
            clear_expiry,
        } => {
            let date_patch = |value: Option<NaiveDate>, clear: bool| {
                if clear { Some(None) } else { value.map(Some) }
            };
            let patch = EnrollmentPatch {
                provider_id: provider,
                payer_id: payer,
                status: None,
                effective_date: date_patch(effective, clear_effective),
                expiry_date: date_patch(expiry, clear_expiry),
            };
            let enrollment = mutate(config, |s| Ok(s.store_mut().update_enrollment(id, patch)?))?;
            report(json, "Updated", &enrollment, enrollment_line)
        }
        EnrollmentAction::Remove { id } => {
            let enrollment = mutate(config, |s| Ok(s.store_mut().delete_enrollment(id)?))?;
            report(json, "Removed", &enrollment, enrollment_line)
        }
        EnrollmentAction::List {
            provider,
            payer,
            status,
            list,
        } => {
            let session = open_session(config)?;
            let store = session.store();
            let indexed = match (provider, payer, status) {
                (Some(p), None, None) => Some(EnrollmentQuery::ByProvider(p)),
                (None, Some(y), None) => Some(EnrollmentQuery::ByPayer(y)),
                (None, None, Some(s)) => Some(EnrollmentQuery::ByStatus(s)),
                _ => None,
            };

            let records: Vec<&Enrollment> = match indexed {
                Some(query) if list.filters.is_empty() && list.sort.is_none() => {
                    store.query_enrollments(query).collect()
                }
                _ => {
                    let mut filter = build_filter(&list)?;
                    if let Some(p) = provider {
                        filter = filter.eq("provider_id", FieldValue::Id(p.0));
                    }
                    if let Some(y) = payer {
                        filter = filter.eq("payer_id", FieldValue::Id(y.0));
                    }
                    if let Some(s) = status {
                        filter = filter.eq("status", FieldValue::text(s.as_str()));
                    }
                    let listing = store.list_enrollments(filter)?;
                    listing.iter().collect()
                }
            };
            print_records(&records, json, enrollment_line)
        }
    }
}

// =============================================================================
// EXPIRE COMMAND
// =============================================================================

/// Expire lapsed approvals as of a date (today by default).
pub fn cmd_expire(config: &Config, json: bool, as_of: Option<NaiveDate>) -> Result<(), AppError> {
    let as_of = as_of.unwrap_or_else(|| chrono::Local::now().date_naive());
    let expired = mutate(config, |s| Ok(s.store_mut().expire_due(as_of)))?;

    if json {
        return print_json(&serde_json::json!({
            "as_of": as_of,
            "expired": expired,
        }));
    }
    let ids: Vec<String> = expired.iter().map(ToString::to_string).collect();
    println!("Expired {} enrollments as of {}", expired.len(), as_of);
    if !ids.is_empty() {
        println!("  {}", ids.join(" "));
    }
    Ok(())
}

// =============================================================================
// EXPORT & IMPORT
// =============================================================================

pub fn cmd_export(config: &Config, output: &Path, format: ExportFormat) -> Result<(), AppError> {
    let validated_output = validate_output_path(output)?;
    let session = open_session(config)?;
    let store = session.store();

    let data = match format {
        ExportFormat::Binary => store_to_bytes(store)?,
        ExportFormat::Json => serde_json::to_vec_pretty(&store.snapshot())?,
    };
    fs::write(&validated_output, &data)?;

    println!("Checksum: {:016x}", snapshot_checksum(store)?);
    println!(
        "Exported {} bytes to {}",
        data.len(),
        validated_output.display()
    );
    Ok(())
}

/// Replace the store with the contents of an exported file.
pub fn cmd_import(config: &Config, json: bool, input: &Path) -> Result<(), AppError> {
    let validated_path = validate_file_path(input)?;
    validate_file_size(&validated_path)?;
    let snapshot = decode_snapshot(&fs::read(&validated_path)?)?;

    let metrics = mutate(config, |s| {
        s.populate(snapshot)?;
        Ok(StoreMetrics::from_store(s.store()))
    })?;

    if json {
        return print_json(&metrics);
    }
    println!(
        "Imported {} providers, {} payers, {} locations, {} enrollments",
        metrics.provider_count,
        metrics.payer_count,
        metrics.location_count,
        metrics.enrollment_count
    );
    Ok(())
}

// =============================================================================
// HASH & VERIFY
// =============================================================================

pub fn cmd_hash(config: &Config, json: bool) -> Result<(), AppError> {
    let session = open_session(config)?;
    let checksum = snapshot_checksum(session.store())?;
    let blake3 = snapshot_crypto_hash(session.store())?;

    if json {
        return print_json(&serde_json::json!({
            "checksum": format!("{:016x}", checksum),
            "blake3": blake3,
        }));
    }
    println!("Checksum: {:016x}", checksum);
    println!("BLAKE3:   {}", blake3);
    Ok(())
}

pub fn cmd_verify(config: &Config, json: bool) -> Result<(), AppError> {
    let session = open_session(config)?;
    session.store().verify_integrity()?;
    let records = StoreMetrics::from_store(session.store()).record_count();

    if json {
        return print_json(&serde_json::json!({ "integrity": "ok", "records": records }));
    }
    println!("Integrity OK ({} records)", records);
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================
