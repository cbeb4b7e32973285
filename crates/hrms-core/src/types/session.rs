//! Durable session record.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// One active session per user, keyed by `user_id`.
///
/// A new login overwrites the previous row, so only the most recent device
/// holds a valid refresh token. The refresh token here is the durable half
/// of the dual-source check: the cache mirror AND this row must both match
/// the presented token for a refresh to succeed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub user_id: Uuid,
    pub access_token: String,
    pub refresh_token: String,

    #[serde(with = "time::serde::rfc3339")]
    pub expires_at: OffsetDateTime,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_info: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,

    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Session {
    /// Whether the refresh token held by this session row has lapsed.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        OffsetDateTime::now_utc() > self.expires_at
    }
}
