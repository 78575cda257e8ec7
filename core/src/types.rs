//! Wire DTOs and domain records for friends and the user profile.
//!
//! # Design
//! The wire records mirror the JSON served by the fixture endpoints exactly:
//! `isTop` is a `"0"`/`"1"` string, `status` a bare integer and `updateDate` a
//! `yyyyMMdd` string. Mapping to `Friend` never fails. Unknown status codes
//! become `Accepted`, and an unparseable date becomes the earliest
//! representable instant, which only demotes that record in merge ordering.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Format of `updateDate` on the wire, interpreted in UTC.
pub const UPDATE_DATE_FORMAT: &str = "%Y%m%d";

/// Relationship between the signed-in user and a friend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FriendStatus {
    /// The friend invited the user; awaiting the user's answer.
    ReceivedInvitation,
    Accepted,
    /// The user invited the friend; awaiting the friend's answer.
    SentInvitation,
}

impl FriendStatus {
    /// Map a wire status code. Unknown codes fall back to `Accepted`.
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => FriendStatus::ReceivedInvitation,
            2 => FriendStatus::SentInvitation,
            _ => FriendStatus::Accepted,
        }
    }

    pub fn code(self) -> u8 {
        match self {
            FriendStatus::ReceivedInvitation => 0,
            FriendStatus::Accepted => 1,
            FriendStatus::SentInvitation => 2,
        }
    }
}

/// A friend as the rest of the crate sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Friend {
    /// Stable external id; the merge key.
    pub fid: String,
    pub name: String,
    pub status: FriendStatus,
    /// Pinned ("starred") in the list.
    pub is_top: bool,
    pub update_date: DateTime<Utc>,
}

/// One friend record as served on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendRecord {
    pub name: String,
    pub status: i64,
    pub is_top: String,
    pub fid: String,
    pub update_date: String,
}

/// Top-level body of every friends endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FriendsEnvelope {
    pub response: Vec<FriendRecord>,
}

impl From<FriendRecord> for Friend {
    fn from(record: FriendRecord) -> Self {
        Friend {
            status: FriendStatus::from_code(record.status),
            is_top: record.is_top == "1",
            update_date: parse_update_date(&record.update_date),
            fid: record.fid,
            name: record.name,
        }
    }
}

/// Parse a wire `updateDate` as UTC midnight, or the earliest representable
/// instant when it does not match `UPDATE_DATE_FORMAT`.
pub fn parse_update_date(raw: &str) -> DateTime<Utc> {
    NaiveDate::parse_from_str(raw, UPDATE_DATE_FORMAT)
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| Utc.from_utc_datetime(&midnight))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// The signed-in user shown above the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub name: String,
    pub koko_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub name: String,
    #[serde(rename = "kokoid")]
    pub koko_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserEnvelope {
    pub response: Vec<UserRecord>,
}

impl From<UserRecord> for UserProfile {
    fn from(record: UserRecord) -> Self {
        UserProfile {
            name: record.name,
            koko_id: record.koko_id,
        }
    }
}
