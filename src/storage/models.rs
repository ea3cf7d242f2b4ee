use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A persisted URL mapping.
///
/// `code` is `None` only in the window between the first and second phase of
/// auto allocation: the record has been inserted to obtain its id, but the
/// derived code has not been written back yet. Codeless records never match
/// a lookup, so a crash in that window leaves harmless, unresolvable garbage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mapping {
    pub id: i64,
    pub target: String,
    pub code: Option<String>,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub click_count: u64,
}

impl Mapping {
    /// A mapping with a past expiry is semantically dead even while the row
    /// still exists physically (the sweep has not run yet).
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        matches!(self.expires_at, Some(expires_at) if expires_at < now)
    }
}

/// Insert payload. The store assigns `id` and starts `click_count` at 0.
#[derive(Debug, Clone)]
pub struct NewMapping {
    pub target: String,
    pub code: Option<String>,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_no_expiry_never_expires() {
        let mapping = Mapping {
            id: 1,
            target: "https://example.com".to_string(),
            code: Some("1".to_string()),
            created_at: Utc::now(),
            expires_at: None,
            click_count: 0,
        };
        assert!(!mapping.is_expired_at(Utc::now() + Duration::days(365 * 100)));
    }

    #[test]
    fn test_expiry_is_strictly_before() {
        let instant = Utc::now();
        let mapping = Mapping {
            id: 1,
            target: "https://example.com".to_string(),
            code: Some("1".to_string()),
            created_at: instant - Duration::hours(2),
            expires_at: Some(instant),
            click_count: 0,
        };
        // Dead only strictly after the expiry instant
        assert!(!mapping.is_expired_at(instant));
        assert!(mapping.is_expired_at(instant + Duration::seconds(1)));
    }
}
