//! # Snapshot Format
//!
//! Format: Header (5 bytes) + postcard-serialized [`Snapshot`].
//! - 4 bytes: Magic ("ENRL")
//! - 1 byte: Version
//!
//! Size and header are validated before the payload is decoded, and a
//! decoded snapshot is only turned into a store through
//! [`EntityStore::restore`], which re-checks every invariant.

use crate::primitives::{FORMAT_VERSION, HEADER_SIZE, MAGIC_BYTES, MAX_SNAPSHOT_SIZE};
use crate::{EntityStore, Snapshot, StoreError};

// =============================================================================
// FILE HEADER
// =============================================================================

/// The header that precedes every encoded snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapshotHeader {
    pub magic: [u8; 4],
    pub version: u8,
}

impl SnapshotHeader {
    /// Header for the current format version.
    #[must_use]
    pub fn new() -> Self {
        Self {
            magic: *MAGIC_BYTES,
            version: FORMAT_VERSION,
        }
    }

    pub fn validate(&self) -> Result<(), StoreError> {
        if &self.magic != MAGIC_BYTES {
            return Err(StoreError::SerializationError(
                "Invalid magic bytes".to_string(),
            ));
        }
        if self.version != FORMAT_VERSION {
            return Err(StoreError::SerializationError(format!(
                "Unsupported version: {} (expected {})",
                self.version, FORMAT_VERSION
            )));
        }
        Ok(())
    }

    #[must_use]
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut bytes = [0u8; HEADER_SIZE];
        bytes[..4].copy_from_slice(&self.magic);
        bytes[4] = self.version;
        bytes
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, StoreError> {
        match bytes {
            [a, b, c, d, version, ..] => Ok(Self {
                magic: [*a, *b, *c, *d],
                version: *version,
            }),
            _ => Err(StoreError::SerializationError(
                "Header too short".to_string(),
            )),
        }
    }
}

impl Default for SnapshotHeader {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// SERIALIZATION FUNCTIONS
// =============================================================================

pub fn snapshot_to_bytes(snapshot: &Snapshot) -> Result<Vec<u8>, StoreError> {
    let payload = postcard::to_stdvec(snapshot)
        .map_err(|e| StoreError::SerializationError(e.to_string()))?;

    let mut bytes = Vec::with_capacity(HEADER_SIZE + payload.len());
    bytes.extend_from_slice(&SnapshotHeader::new().to_bytes());
    bytes.extend_from_slice(&payload);
    Ok(bytes)
}

/// Decode a snapshot, checking size and header before touching the payload.
pub fn snapshot_from_bytes(bytes: &[u8]) -> Result<Snapshot, StoreError> {
    if bytes.len() < HEADER_SIZE {
        return Err(StoreError::SerializationError(format!(
            "Data too short: minimum {} bytes required",
            HEADER_SIZE
        )));
    }
    if bytes.len() > MAX_SNAPSHOT_SIZE {
        return Err(StoreError::SerializationError(format!(
            "Data size {} bytes exceeds maximum allowed {} bytes",
            bytes.len(),
            MAX_SNAPSHOT_SIZE
        )));
    }

    SnapshotHeader::from_bytes(bytes)?.validate()?;

    let payload = bytes.get(HEADER_SIZE..).unwrap_or_default();
    let (snapshot, rest) = postcard::take_from_bytes::<Snapshot>(payload).map_err(|e| {
        StoreError::SerializationError(format!("Failed to decode snapshot: {}", e))
    })?;
    if !rest.is_empty() {
        return Err(StoreError::SerializationError(format!(
            "{} trailing bytes after snapshot payload",
            rest.len()
        )));
    }
    Ok(snapshot)
}

/// Encode the whole store. Saving, loading and saving again is bit-exact.
pub fn store_to_bytes(store: &EntityStore) -> Result<Vec<u8>, StoreError> {
    snapshot_to_bytes(&store.snapshot())
}

pub fn store_from_bytes(bytes: &[u8]) -> Result<EntityStore, StoreError> {
    EntityStore::restore(snapshot_from_bytes(bytes)?)
}

// =============================================================================
// CHECKSUMS
// =============================================================================

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// FNV-1a over the encoded snapshot.
///
/// Fast equality check between two stores. Not collision resistant; use
/// `snapshot_crypto_hash` where tampering matters.
pub fn snapshot_checksum(store: &EntityStore) -> Result<u64, StoreError> {
    let bytes = store_to_bytes(store)?;
    Ok(bytes.iter().fold(FNV_OFFSET, |hash, byte| {
        (hash ^ u64::from(*byte)).wrapping_mul(FNV_PRIME)
    }))
}

/// BLAKE3 of the encoded snapshot as a 64-character hex string.
#[cfg(feature = "crypto-hash")]
pub fn snapshot_crypto_hash(store: &EntityStore) -> Result<String, StoreError> {
    let bytes = store_to_bytes(store)?;
    Ok(blake3::hash(&bytes).to_hex().to_string())
}

// =============================================================================
// TESTS
// =============================================================================
