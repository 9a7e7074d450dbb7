//! # Store Primitives
//!
//! Hardcoded limits and format constants for the credentialing store.
//! These are compiled into the binary and are immutable at runtime.

/// Magic bytes for the binary snapshot header.
///
/// - File Header = Magic Bytes ("ENRL") + Version (u8) before payload.
pub const MAGIC_BYTES: &[u8; 4] = b"ENRL";

/// Current snapshot format version.
///
/// Increment this when making breaking changes to the serialization format.
pub const FORMAT_VERSION: u8 = 1;

/// Size of the snapshot header (magic + version).
pub const HEADER_SIZE: usize = 5;

/// Maximum accepted snapshot size (256 MB).
///
/// Checked before any payload decoding to prevent memory exhaustion.
pub const MAX_SNAPSHOT_SIZE: usize = 256 * 1024 * 1024;

// =============================================================================
// INPUT VALIDATION LIMITS
// =============================================================================

/// Maximum length for names (providers, payers, locations).
pub const MAX_NAME_LENGTH: usize = 200;

/// Maximum length for any other free-text field.
pub const MAX_FIELD_LENGTH: usize = 256;

/// Length of a National Provider Identifier.
pub const NPI_LENGTH: usize = 10;

/// Maximum number of providers attached to one location.
pub const MAX_LOCATION_PROVIDERS: usize = 1000;

/// Maximum number of list filter predicates.
pub const MAX_FILTER_PREDICATES: usize = 32;
