//! Index Entry Module
//!
//! Per-collection metadata kept in the process-wide index.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::CollectionId;
use crate::error::{ListError, Result};

/// Longest accepted TTL in seconds (100 years).
pub const MAX_TTL: u64 = 100 * 365 * 24 * 60 * 60;

/// Checks a TTL before anything is written. `None` means no expiry; zero
/// and values past [`MAX_TTL`] are rejected.
pub fn validate_ttl(ttl: Option<u64>) -> Result<Option<u64>> {
    match ttl {
        Some(0) => Err(ListError::InvalidParameter(
            "ttl must be a positive integer".to_string(),
        )),
        Some(secs) if secs > MAX_TTL => Err(ListError::InvalidParameter(format!(
            "ttl must not exceed {} seconds",
            MAX_TTL
        ))),
        _ => Ok(ttl),
    }
}

// == Index Entry ==
/// Metadata of one live collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexEntry {
    /// Collection id
    pub uuid: CollectionId,
    /// When the collection was first stored
    pub created_on: DateTime<Utc>,
    /// Current element count
    pub size: usize,
    /// Number of physical chunks written
    pub chunks: usize,
    /// Chunk size the collection was partitioned with, 0 when unknown
    #[serde(default)]
    pub chunk_size: usize,
    /// TTL in seconds, None = no expiry
    pub ttl: Option<u64>,
    /// Absolute expiry derived from `ttl` when it was last set
    #[serde(default)]
    pub expires_on: Option<DateTime<Utc>>,
}

impl IndexEntry {
    // == Constructor ==
    pub fn new(
        uuid: CollectionId,
        size: usize,
        chunks: usize,
        chunk_size: usize,
        ttl: Option<u64>,
    ) -> Self {
        let mut entry = Self {
            uuid,
            created_on: Utc::now(),
            size,
            chunks,
            chunk_size,
            ttl: None,
            expires_on: None,
        };
        entry.set_ttl(ttl);
        entry
    }

    // == Set TTL ==
    /// Sets the TTL, restarting the expiry window from now.
    pub fn set_ttl(&mut self, ttl: Option<u64>) {
        self.ttl = ttl;
        self.expires_on = ttl.and_then(|secs| {
            let delta = Duration::try_seconds(i64::try_from(secs).ok()?)?;
            Utc::now().checked_add_signed(delta)
        });
    }

    // == Is Expired ==
    /// True once the expiry window has fully elapsed.
    pub fn is_expired(&self) -> bool {
        match self.expires_on {
            Some(expires) => Utc::now() >= expires,
            None => false,
        }
    }

    // == Remaining TTL ==
    /// Seconds left in the expiry window, or None if no expiry is set.
    pub fn remaining_ttl(&self) -> Option<u64> {
        self.expires_on
            .map(|expires| (expires - Utc::now()).num_seconds().max(0) as u64)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn id() -> CollectionId {
        CollectionId::new(Some("fake-list")).unwrap()
    }

    #[test]
    fn test_entry_without_ttl() {
        let entry = IndexEntry::new(id(), 10, 4, 3, None);

        assert_eq!(entry.size, 10);
        assert_eq!(entry.chunks, 4);
        assert!(entry.expires_on.is_none());
        assert!(!entry.is_expired());
        assert!(entry.remaining_ttl().is_none());
    }

    #[test]
    fn test_validate_ttl_bounds() {
        assert_eq!(validate_ttl(None).unwrap(), None);
        assert_eq!(validate_ttl(Some(MAX_TTL)).unwrap(), Some(MAX_TTL));
        assert!(matches!(validate_ttl(Some(0)), Err(ListError::InvalidParameter(_))));
        assert!(matches!(
            validate_ttl(Some(10_000_000_000_000)),
            Err(ListError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_huge_ttl_does_not_panic() {
        let entry = IndexEntry::new(id(), 1, 1, 3, Some(u64::MAX));
        assert!(!entry.is_expired());
    }

    #[test]
    fn test_entry_with_ttl() {
        let entry = IndexEntry::new(id(), 1, 1, 3, Some(3600));

        let remaining = entry.remaining_ttl().unwrap();
        assert!(remaining <= 3600 && remaining >= 3598);
        assert!(!entry.is_expired());
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let mut entry = IndexEntry::new(id(), 1, 1, 3, Some(60));
        entry.expires_on = Some(Utc::now());

        assert!(entry.is_expired());
        assert_eq!(entry.remaining_ttl(), Some(0));
    }

    #[test]
    fn test_legacy_record_without_chunk_size() {
        let json = r#"{"uuid":"fake-list","created_on":"2024-01-01T00:00:00Z","size":2,"chunks":1,"ttl":null}"#;
        let entry: IndexEntry = serde_json::from_str(json).unwrap();

        assert_eq!(entry.chunk_size, 0);
        assert_eq!(entry.uuid.as_str(), "fake-list");
    }
}
