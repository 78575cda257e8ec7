//! Domain core of the friends list.
//!
//! # Overview
//! Fetches friend lists from static JSON endpoints, merges and deduplicates
//! them, filters them by a search query and projects the result into a
//! `DisplayState` for an external renderer.
//!
//! # Design
//! - The fetch service is split into `build_*` (produces an `HttpRequest`)
//!   and `parse_*` (consumes an `HttpResponse`), so the I/O boundary is
//!   explicit. `Transport` executes requests for callers that want the crate
//!   to do the I/O; a native host can instead drive `FriendsSession` through
//!   `begin_load` / `complete_load`.
//! - `merge`, `search` and `project` are pure functions over `Friend` slices.
//! - `FriendsSession` is the single writer of the snapshot and the published
//!   state, and broadcasts every state it publishes.
//! - Wire DTOs are defined independently from the fixture server; the
//!   integration tests catch schema drift.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod merge;
pub mod projection;
pub mod search;
pub mod session;
pub mod transport;
pub mod types;

pub use client::FriendsClient;
pub use config::{Endpoints, Scenario, SessionConfig};
pub use error::{ConfigError, FetchError, FetchErrorKind};
pub use http::{HttpRequest, HttpResponse};
pub use merge::merge;
pub use projection::{project, DisplayState};
pub use search::{normalize_query, search};
pub use session::{FriendsSession, LoadPlan};
pub use transport::{Transport, UreqTransport};
pub use types::{Friend, FriendRecord, FriendStatus, UserProfile};
