//! End-to-end tests for the enroll CLI.
//!
//! Each test drives `execute` against a snapshot in a temp directory and
//! inspects the file it leaves behind.

use clap::Parser;
use enroll::AppError;
use enroll::cli::{Cli, execute};
use enroll::config::{Config, UserConfig};
use enroll_core::{
    EnrollmentId, EnrollmentStatus, EntityStore, LocationId, PayerId, ProviderId, ProviderStatus,
    Role, StoreError, store_from_bytes,
};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// =============================================================================
// HELPERS
// =============================================================================

fn config_in(dir: &TempDir, role: Role) -> Config {
    Config {
        snapshot: dir.path().join("store.snapshot"),
        user: UserConfig {
            id: "tester".to_string(),
            role,
        },
        ..Config::default()
    }
}

fn run(config: &Config, args: &[&str]) -> Result<(), AppError> {
    let argv = std::iter::once("enroll")
        .chain(["--quiet"])
        .chain(args.iter().copied());
    let cli = Cli::try_parse_from(argv).expect("arguments parse");
    execute(cli, config)
}

fn load(path: &Path) -> EntityStore {
    store_from_bytes(&fs::read(path).expect("read snapshot")).expect("decode snapshot")
}

/// P1 and P2 with one payer, one shared location, and an enrollment each.
fn seeded(dir: &TempDir) -> Config {
    let config = config_in(dir, Role::Coordinator);
    run(&config, &["init"]).expect("init");
    run(&config, &["provider", "add", "--name", "Dr. Ada Smith", "--npi", "1234567893"])
        .expect("provider 1");
    run(&config, &["provider", "add", "--name", "Dr. Ben Jones", "--status", "active"])
        .expect("provider 2");
    run(&config, &["payer", "add", "--name", "Acme Health", "--payer-code", "ACME"])
        .expect("payer");
    run(
        &config,
        &[
            "location", "add", "--address-line1", "1 Main St", "--city", "Springfield",
            "--state", "IL", "--postal-code", "62701", "--provider", "P1", "--provider", "P2",
        ],
    )
    .expect("location");
    run(&config, &["enrollment", "add", "--provider", "P1", "--payer", "Y1"]).expect("e1");
    run(&config, &["enrollment", "add", "--provider", "P2", "--payer", "Y1"]).expect("e2");
    config
}

// =============================================================================
// LIFECYCLE
// =============================================================================

#[test]
fn init_refuses_to_overwrite_without_force() {
    let dir = TempDir::new().expect("tempdir");
    let config = config_in(&dir, Role::Admin);

    run(&config, &["init"]).expect("first init");
    assert!(matches!(run(&config, &["init"]), Err(AppError::Io(_))));
    run(&config, &["init", "--force"]).expect("forced init");
    assert!(load(&config.snapshot).is_empty());
}

#[test]
fn commands_persist_between_invocations() {
    let dir = TempDir::new().expect("tempdir");
    let config = seeded(&dir);

    let store = load(&config.snapshot);
    assert_eq!(store.provider_count(), 2);
    assert_eq!(store.payer_count(), 1);
    assert_eq!(store.location_count(), 1);
    assert_eq!(store.enrollment_count(), 2);
    assert_eq!(
        store.provider(ProviderId(2)).expect("P2").status,
        ProviderStatus::Active
    );
    store.verify_integrity().expect("integrity");
}

#[test]
fn read_commands_succeed_on_missing_snapshot() {
    let dir = TempDir::new().expect("tempdir");
    let config = config_in(&dir, Role::Viewer);

    run(&config, &["status"]).expect("status");
    run(&config, &["--json-mode", "provider", "list"]).expect("list");
    run(&config, &["verify"]).expect("verify");
    assert!(!config.snapshot.exists());
}

// =============================================================================
// CASCADES & WORKFLOW
// =============================================================================

#[test]
fn removing_provider_cascades() {
    let dir = TempDir::new().expect("tempdir");
    let config = seeded(&dir);

    run(&config, &["provider", "remove", "P1"]).expect("remove");

    let store = load(&config.snapshot);
    assert!(!store.contains_provider(ProviderId(1)));
    assert!(store.enrollment(EnrollmentId(1)).is_err());
    assert!(store.enrollment(EnrollmentId(2)).is_ok());
    let location = store.location(LocationId(1)).expect("location kept");
    assert_eq!(location.provider_ids.iter().copied().collect::<Vec<_>>(), vec![ProviderId(2)]);
    store.verify_integrity().expect("integrity");
}

#[test]
fn removing_payer_cascades() {
    let dir = TempDir::new().expect("tempdir");
    let config = seeded(&dir);

    run(&config, &["payer", "remove", "Y1"]).expect("remove");

    let store = load(&config.snapshot);
    assert_eq!(store.payer_count(), 0);
    assert_eq!(store.enrollment_count(), 0);
    assert_eq!(store.provider_count(), 2);
}

#[test]
fn enrollment_workflow_and_expiry() {
    let dir = TempDir::new().expect("tempdir");
    let config = seeded(&dir);

    run(
        &config,
        &["enrollment", "update", "E1", "--effective", "2025-01-01", "--expiry", "2025-12-31"],
    )
    .expect("dates");
    run(&config, &["enrollment", "transition", "E1", "submitted"]).expect("submit");
    run(&config, &["enrollment", "transition", "E1", "approved"]).expect("approve");

    let illegal = run(&config, &["enrollment", "transition", "E2", "approved"]);
    assert!(matches!(
        illegal,
        Err(AppError::Store(StoreError::InvalidTransition { .. }))
    ));

    run(&config, &["expire", "--as-of", "2026-01-15"]).expect("expire");

    let store = load(&config.snapshot);
    assert_eq!(
        store.enrollment(EnrollmentId(1)).expect("E1").status,
        EnrollmentStatus::Expired
    );
    assert_eq!(
        store.enrollment(EnrollmentId(2)).expect("E2").status,
        EnrollmentStatus::Draft
    );
}

#[test]
fn dangling_reference_rejected_and_nothing_saved() {
    let dir = TempDir::new().expect("tempdir");
    let config = seeded(&dir);
    let before = fs::read(&config.snapshot).expect("read");

    let result = run(&config, &["enrollment", "add", "--provider", "P9", "--payer", "Y1"]);
    assert!(matches!(
        result,
        Err(AppError::Store(StoreError::NotFound { .. }))
    ));
    assert_eq!(fs::read(&config.snapshot).expect("read"), before);
}

#[test]
fn update_clears_optional_field_with_empty_string() {
    let dir = TempDir::new().expect("tempdir");
    let config = seeded(&dir);

    run(&config, &["provider", "update", "P1", "--npi", "", "--specialty", "Cardiology"])
        .expect("update");

    let store = load(&config.snapshot);
    let provider = store.provider(ProviderId(1)).expect("P1");
    assert_eq!(provider.npi, None);
    assert_eq!(provider.specialty.as_deref(), Some("Cardiology"));
}

// =============================================================================
// LISTING
// =============================================================================

#[test]
fn list_filters_parse_and_run() {
    let dir = TempDir::new().expect("tempdir");
    let config = seeded(&dir);

    run(&config, &["provider", "list", "--where", "status=active"]).expect("eq");
    run(&config, &["provider", "list", "--where", "id=P2..", "--sort", "name", "--desc"])
        .expect("range");
    run(&config, &["enrollment", "list", "--provider", "P1"]).expect("indexed");
    run(&config, &["enrollment", "list", "--payer", "Y1", "--status", "draft"])
        .expect("combined");

    let unknown_field = run(&config, &["provider", "list", "--where", "color=red"]);
    assert!(matches!(
        unknown_field,
        Err(AppError::Store(StoreError::Validation { .. }))
    ));
}

// =============================================================================
// ROLES, IMPORT & EXPORT
// =============================================================================

#[test]
fn viewer_cannot_modify() {
    let dir = TempDir::new().expect("tempdir");
    let admin = seeded(&dir);
    let viewer = Config {
        user: UserConfig {
            id: "auditor".to_string(),
            role: Role::Viewer,
        },
        ..admin.clone()
    };

    run(&viewer, &["provider", "show", "P1"]).expect("reads allowed");
    assert!(matches!(
        run(&viewer, &["provider", "remove", "P1"]),
        Err(AppError::ReadOnly(_))
    ));
    assert!(load(&admin.snapshot).contains_provider(ProviderId(1)));
}

#[test]
fn export_then_import_restores_store() {
    let dir = TempDir::new().expect("tempdir");
    let config = seeded(&dir);
    let json_export: PathBuf = dir.path().join("export.json");
    let binary_export: PathBuf = dir.path().join("export.bin");
    let original = load(&config.snapshot).snapshot();

    let json_path = json_export.to_string_lossy().into_owned();
    let binary_path = binary_export.to_string_lossy().into_owned();
    run(&config, &["export", "-o", &json_path, "-t", "json"]).expect("json export");
    run(&config, &["export", "-o", &binary_path]).expect("binary export");

    run(&config, &["init", "--force"]).expect("wipe");
    run(&config, &["import", "-i", &json_path]).expect("json import");
    assert_eq!(load(&config.snapshot).snapshot(), original);

    run(&config, &["init", "--force"]).expect("wipe");
    run(&config, &["import", "-i", &binary_path]).expect("binary import");
    assert_eq!(load(&config.snapshot).snapshot(), original);

    run(&config, &["hash"]).expect("hash");
    run(&config, &["--json-mode", "status"]).expect("status");
}

#[test]
fn import_rejects_dangling_references() {
    let dir = TempDir::new().expect("tempdir");
    let config = seeded(&dir);
    let mut snapshot = load(&config.snapshot).snapshot();
    snapshot.enrollments[0].payer_id = PayerId(42);

    let bad = dir.path().join("bad.json");
    fs::write(&bad, serde_json::to_vec(&snapshot).expect("json")).expect("write");

    let result = run(&config, &["import", "-i", &bad.to_string_lossy()]);
    assert!(result.is_err());
    assert_eq!(load(&config.snapshot).enrollment_count(), 2);
}
