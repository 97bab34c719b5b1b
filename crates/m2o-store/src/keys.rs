//! Key encoding utilities for the `RocksDB` backend.
//!
//! State keys are stored as their UTF-8 bytes. History entries are keyed so
//! that one key's modifications are contiguous and sorted by commit order.

/// Metadata key holding the next commit sequence number.
pub const COMMIT_SEQ_KEY: &[u8] = b"commit_seq";

/// Create a state key.
#[must_use]
pub fn state_key(key: &str) -> Vec<u8> {
    key.as_bytes().to_vec()
}

/// Create the prefix shared by every history entry of `key`.
///
/// Format: `len(key) as u32 BE || key`
///
/// The length prefix keeps `"ab"` from matching entries of `"abc"`.
#[must_use]
pub fn history_prefix(key: &str) -> Vec<u8> {
    let bytes = key.as_bytes();
    let len = u32::try_from(bytes.len()).unwrap_or(u32::MAX);
    let mut prefix = Vec::with_capacity(4 + bytes.len() + 8);
    prefix.extend_from_slice(&len.to_be_bytes());
    prefix.extend_from_slice(bytes);
    prefix
}

/// Create a history entry key.
///
/// Format: `history_prefix(key) || commit_seq as u64 BE`
///
/// Big-endian sequence numbers sort entries in commit order.
#[must_use]
pub fn history_key(key: &str, commit_seq: u64) -> Vec<u8> {
    let mut out = history_prefix(key);
    out.extend_from_slice(&commit_seq.to_be_bytes());
    out
}

/// Decode a stored commit sequence number.
#[must_use]
pub fn decode_seq(bytes: &[u8]) -> Option<u64> {
    let array: [u8; 8] = bytes.try_into().ok()?;
    Some(u64::from_be_bytes(array))
}
