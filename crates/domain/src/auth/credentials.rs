//! Credential pair with expiry tracking.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// A complete session credential pair.
///
/// Both tokens are always present together: a record with only one of them
/// is not representable. The session is either fully authenticated or it
/// has no credentials at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// Short-lived token attached to authenticated requests.
    pub access_token: String,
    /// Longer-lived token used solely to obtain a new access token.
    pub refresh_token: String,
    /// Instant after which the access token is no longer valid.
    pub expires_at: DateTime<Utc>,
}

impl Credentials {
    /// Creates a credential pair with an absolute expiry instant.
    #[must_use]
    pub const fn new(
        access_token: String,
        refresh_token: String,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            access_token,
            refresh_token,
            expires_at,
        }
    }

    /// Rebuilds a credential pair from persisted string parts.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidExpiry`] if the persisted expiry is not
    /// a valid RFC 3339 instant.
    pub fn from_parts(
        access_token: String,
        refresh_token: String,
        expires_at: &str,
    ) -> DomainResult<Self> {
        let expires_at = DateTime::parse_from_rfc3339(expires_at)
            .map_err(|e| DomainError::InvalidExpiry(format!("{expires_at}: {e}")))?
            .with_timezone(&Utc);
        Ok(Self::new(access_token, refresh_token, expires_at))
    }

    /// Returns true if the access token is still valid at `now`.
    ///
    /// Validity is strict: a token expiring exactly at `now` is expired.
    #[must_use]
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }

    /// Seconds remaining until expiry at `now` (negative once expired).
    #[must_use]
    pub fn seconds_until_expiry(&self, now: DateTime<Utc>) -> i64 {
        (self.expires_at - now).num_seconds()
    }

    /// Formats the `Authorization` header value for this credential.
    #[must_use]
    pub fn authorization_header(&self, scheme: &str) -> String {
        format!("{scheme} {}", self.access_token)
    }

    /// The expiry instant as an RFC 3339 string, as persisted.
    #[must_use]
    pub fn expires_at_string(&self) -> String {
        self.expires_at.to_rfc3339()
    }
}

/// A token grant as issued by the auth endpoints.
///
/// Carries a relative lifetime (`expires_in_secs`); converted to
/// [`Credentials`] with an absolute instant the moment it is received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenGrant {
    /// The new access token.
    pub token: String,
    /// The new refresh token (rotated on every grant).
    pub refresh_token: String,
    /// Lifetime of the access token in seconds from receipt.
    pub expires_in_secs: u64,
}

impl TokenGrant {
    /// Converts the grant into credentials, anchoring expiry at `received_at`.
    ///
    /// An absurdly large lifetime saturates at the maximum representable
    /// instant instead of overflowing.
    #[must_use]
    pub fn into_credentials(self, received_at: DateTime<Utc>) -> Credentials {
        let expires_at = i64::try_from(self.expires_in_secs)
            .ok()
            .and_then(chrono::Duration::try_seconds)
            .and_then(|lifetime| received_at.checked_add_signed(lifetime))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        Credentials::new(self.token, self.refresh_token, expires_at)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn instant(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn test_validity_is_strict() {
        let creds = Credentials::new(
            "access".to_string(),
            "refresh".to_string(),
            instant("2026-01-01T12:00:00Z"),
        );

        assert!(creds.is_valid_at(instant("2026-01-01T11:59:59Z")));
        assert!(!creds.is_valid_at(instant("2026-01-01T12:00:00Z")));
        assert!(!creds.is_valid_at(instant("2026-01-01T12:00:01Z")));
    }

    #[test]
    fn test_grant_conversion_anchors_expiry() {
        let grant = TokenGrant {
            token: "a1".to_string(),
            refresh_token: "r1".to_string(),
            expires_in_secs: 3600,
        };

        let received = instant("2026-01-01T12:00:00Z");
        let creds = grant.into_credentials(received);

        assert_eq!(creds.expires_at, instant("2026-01-01T13:00:00Z"));
        assert_eq!(creds.seconds_until_expiry(received), 3600);
    }

    #[test]
    fn test_from_parts_round_trip() {
        let creds = Credentials::new(
            "access".to_string(),
            "refresh".to_string(),
            instant("2026-01-01T12:00:00Z"),
        );

        let rebuilt = Credentials::from_parts(
            creds.access_token.clone(),
            creds.refresh_token.clone(),
            &creds.expires_at_string(),
        )
        .unwrap();

        assert_eq!(rebuilt, creds);
    }

    #[test]
    fn test_from_parts_rejects_garbage_expiry() {
        let result =
            Credentials::from_parts("a".to_string(), "r".to_string(), "not-an-instant");
        assert!(matches!(result, Err(DomainError::InvalidExpiry(_))));
    }

    #[test]
    fn test_authorization_header() {
        let creds = Credentials::new(
            "token123".to_string(),
            "refresh456".to_string(),
            instant("2026-01-01T12:00:00Z"),
        );
        assert_eq!(creds.authorization_header("Bearer"), "Bearer token123");
    }
}
