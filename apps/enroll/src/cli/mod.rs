//! # Enroll CLI Module
//!
//! This module implements the CLI interface for the credentialing store.
//!
//! ## Available Commands
//!
//! - `init` - Create an empty snapshot file
//! - `status` - Show record counts and enrollment pipeline
//! - `provider` / `payer` / `location` / `enrollment` - Record management
//! - `expire` - Expire lapsed approvals
//! - `export` / `import` - Move snapshots in and out (binary or JSON)
//! - `hash` - Compute checksum and BLAKE3 hash of the store
//! - `verify` - Run the exhaustive integrity check

mod commands;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use enroll_core::{
    EnrollmentId, EnrollmentStatus, LocationId, PayerId, ProviderId, ProviderStatus, Role,
};
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Enroll - provider credentialing store
///
/// Tracks providers, payers, practice locations and payer enrollments with
/// referential integrity and cascading deletes.
#[derive(Parser, Debug)]
#[command(name = "enroll")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to the config file (default: ./enroll.toml if present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to the snapshot file
    #[arg(short = 'S', long, global = true)]
    pub snapshot: Option<PathBuf>,

    /// Signed-in user id
    #[arg(long, global = true)]
    pub user: Option<String>,

    /// Signed-in role (admin, coordinator, viewer)
    #[arg(long, global = true)]
    pub role: Option<Role>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create an empty snapshot
    Init {
        /// Overwrite an existing snapshot
        #[arg(short, long)]
        force: bool,
    },

    /// Show record counts and the enrollment pipeline
    Status,

    /// Manage providers
    Provider {
        #[command(subcommand)]
        action: ProviderAction,
    },

    /// Manage payers
    Payer {
        #[command(subcommand)]
        action: PayerAction,
    },

    /// Manage practice locations
    Location {
        #[command(subcommand)]
        action: LocationAction,
    },

    /// Manage enrollments
    Enrollment {
        #[command(subcommand)]
        action: EnrollmentAction,
    },

    /// Expire approved enrollments whose expiry date has passed
    Expire {
        /// Reference date (default: today)
        #[arg(long)]
        as_of: Option<NaiveDate>,
    },

    /// Export the store
    Export {
        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        /// Export format
        #[arg(short = 't', long, value_enum, default_value_t = ExportFormat::Binary)]
        format: ExportFormat,
    },

    /// Replace the store with an exported file (binary or JSON)
    Import {
        /// Input file path
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Compute checksum and BLAKE3 hash of the store
    Hash,

    /// Run the exhaustive integrity check
    Verify,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Binary,
    Json,
}

/// Shared listing options.
#[derive(Args, Debug, Clone, Default)]
pub struct ListArgs {
    /// Filter as FIELD=VALUE, or FIELD=MIN..MAX for a range (repeatable)
    #[arg(short = 'w', long = "where", value_name = "FIELD=VALUE")]
    pub filters: Vec<String>,

    /// Sort by field
    #[arg(long)]
    pub sort: Option<String>,

    /// Sort descending
    #[arg(long, requires = "sort")]
    pub desc: bool,
}

// =============================================================================
// RECORD SUBCOMMANDS
// =============================================================================

/// Optional text flags take an empty string to clear the field on update.
#[derive(Subcommand, Debug)]
pub enum ProviderAction {
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        npi: Option<String>,
        #[arg(long)]
        license_number: Option<String>,
        #[arg(long)]
        license_state: Option<String>,
        #[arg(long)]
        specialty: Option<String>,
        #[arg(long)]
        status: Option<ProviderStatus>,
    },
    /// Show a provider with its enrollments and locations
    Show { id: ProviderId },
    Update {
        id: ProviderId,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        npi: Option<String>,
        #[arg(long)]
        license_number: Option<String>,
        #[arg(long)]
        license_state: Option<String>,
        #[arg(long)]
        specialty: Option<String>,
        #[arg(long)]
        status: Option<ProviderStatus>,
    },
    /// Delete a provider, its enrollments, and its place on every location
    Remove { id: ProviderId },
    List {
        #[command(flatten)]
        list: ListArgs,
    },
}

#[derive(Subcommand, Debug)]
pub enum PayerAction {
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        payer_code: Option<String>,
        #[arg(long)]
        contact_name: Option<String>,
        #[arg(long)]
        contact_email: Option<String>,
        #[arg(long)]
        contact_phone: Option<String>,
    },
    Show { id: PayerId },
    Update {
        id: PayerId,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        payer_code: Option<String>,
        #[arg(long)]
        contact_name: Option<String>,
        #[arg(long)]
        contact_email: Option<String>,
        #[arg(long)]
        contact_phone: Option<String>,
    },
    /// Delete a payer and its enrollments
    Remove { id: PayerId },
    List {
        #[command(flatten)]
        list: ListArgs,
    },
}

#[derive(Subcommand, Debug)]
pub enum LocationAction {
    Add {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        address_line1: String,
        #[arg(long)]
        address_line2: Option<String>,
        #[arg(long)]
        city: String,
        #[arg(long)]
        state: String,
        #[arg(long)]
        postal_code: String,
        /// Provider practicing here (repeatable)
        #[arg(long = "provider")]
        providers: Vec<ProviderId>,
    },
    Show { id: LocationId },
    Update {
        id: LocationId,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        address_line1: Option<String>,
        #[arg(long)]
        address_line2: Option<String>,
        #[arg(long)]
        city: Option<String>,
        #[arg(long)]
        state: Option<String>,
        #[arg(long)]
        postal_code: Option<String>,
        /// Replace the provider list (repeatable)
        #[arg(long = "provider", conflicts_with = "clear_providers")]
        providers: Vec<ProviderId>,
        /// Remove every provider from the location
        #[arg(long)]
        clear_providers: bool,
    },
    Remove { id: LocationId },
    List {
        #[command(flatten)]
        list: ListArgs,
    },
}

#[derive(Subcommand, Debug)]
pub enum EnrollmentAction {
    /// Create a Draft enrollment
    Add {
        #[arg(long)]
        provider: ProviderId,
        #[arg(long)]
        payer: PayerId,
        #[arg(long)]
        effective: Option<NaiveDate>,
        #[arg(long)]
        expiry: Option<NaiveDate>,
    },
    Show { id: EnrollmentId },
    /// Move an enrollment to a new status
    Transition { id: EnrollmentId, status: EnrollmentStatus },
    Update {
        id: EnrollmentId,
        #[arg(long)]
        provider: Option<ProviderId>,
        #[arg(long)]
        payer: Option<PayerId>,
        #[arg(long, conflicts_with = "clear_effective")]
        effective: Option<NaiveDate>,
        #[arg(long, conflicts_with = "clear_expiry")]
        expiry: Option<NaiveDate>,
        #[arg(long)]
        clear_effective: bool,
        #[arg(long)]
        clear_expiry: bool,
    },
    Remove { id: EnrollmentId },
    /// List enrollments. A single --provider, --payer or --status is served
    /// from the store's indexes.
    List {
        #[arg(long)]
        provider: Option<ProviderId>,
        #[arg(long)]
        payer: Option<PayerId>,
        #[arg(long)]
        status: Option<EnrollmentStatus>,
        #[command(flatten)]
        list: ListArgs,
    },
}
