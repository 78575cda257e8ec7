//! Projection of a flat friend list into what the renderer draws.
//!
//! # Design
//! `DisplayState` values are immutable. The session builds a new one on
//! every load or search and publishes it; nothing mutates a published state.

use std::cmp::Ordering;

use crate::error::FetchErrorKind;
use crate::types::{Friend, FriendStatus};

/// Everything the renderer needs for one render pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayState {
    Loading,
    Empty,
    Content {
        /// Invitations waiting on the user, ascending by `fid`.
        received_invitations: Vec<Friend>,
        /// Friends and sent invitations in display order.
        friends: Vec<Friend>,
    },
    /// Published instead of `Empty` only when the session surfaces errors.
    Failed(FetchErrorKind),
}

impl DisplayState {
    pub fn is_loading(&self) -> bool {
        matches!(self, DisplayState::Loading)
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, DisplayState::Empty)
    }
}

/// Project `friends` into `Empty` or `Content`.
pub fn project(friends: &[Friend]) -> DisplayState {
    if friends.is_empty() {
        return DisplayState::Empty;
    }

    let mut received_invitations: Vec<Friend> = friends
        .iter()
        .filter(|f| f.status == FriendStatus::ReceivedInvitation)
        .cloned()
        .collect();
    received_invitations.sort_by(|a, b| a.fid.cmp(&b.fid));

    let mut bucket: Vec<Friend> = friends
        .iter()
        .filter(|f| matches!(f.status, FriendStatus::Accepted | FriendStatus::SentInvitation))
        .cloned()
        .collect();
    bucket.sort_by(display_order);

    DisplayState::Content {
        received_invitations,
        friends: bucket,
    }
}

fn display_order(a: &Friend, b: &Friend) -> Ordering {
    rank(a).cmp(&rank(b)).then_with(|| a.fid.cmp(&b.fid))
}

/// Sent invitations first, then pinned friends, then everyone else.
fn rank(friend: &Friend) -> u16 {
    match friend.status {
        FriendStatus::SentInvitation => 0,
        FriendStatus::Accepted if friend.is_top => 1,
        FriendStatus::Accepted => 2,
        // Never reaches the friends bucket.
        FriendStatus::ReceivedInvitation => 999,
    }
}
