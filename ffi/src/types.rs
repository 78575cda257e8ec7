//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type with C-compatible representations:
//! `*mut c_char` instead of `String`, boxed slices behind a pointer and a
//! length instead of `Vec`, and enums with explicit discriminants. Every
//! pointer handed out here is owned by the C caller until it is passed back to
//! the matching `friends_free_*` function. Conversion and release helpers live
//! here to keep `lib.rs` focused on the `extern "C"` surface.

use std::ffi::CString;
use std::os::raw::c_char;

use friends_core::{DisplayState, FetchError, FetchErrorKind, Friend, FriendStatus, FriendsSession, HttpRequest, LoadPlan};

/// Opaque handle to a `FriendsSession`. Not thread-safe: the host must call
/// into one handle from one thread at a time.
pub struct FfiFriendsSession {
    pub(crate) inner: FriendsSession,
}

// ---------------------------------------------------------------------------
// Strings and slices
// ---------------------------------------------------------------------------

/// Copy `s` into a heap C string. Interior NULs are dropped.
pub(crate) fn to_c_string(s: &str) -> *mut c_char {
    CString::new(s.replace('\0', "")).unwrap_or_default().into_raw()
}

/// Release a string produced by `to_c_string`. Null is ignored.
pub(crate) fn free_c_string(s: *mut c_char) {
    if !s.is_null() {
        drop(unsafe { CString::from_raw(s) });
    }
}

/// Leak `items` as a pointer/length pair. Empty input yields null.
fn into_raw_slice<T>(items: Vec<T>) -> (*mut T, u32) {
    if items.is_empty() {
        return (std::ptr::null_mut(), 0);
    }
    let len = items.len() as u32;
    let ptr = Box::into_raw(items.into_boxed_slice()) as *mut T;
    (ptr, len)
}

/// Reclaim a pointer/length pair produced by `into_raw_slice`.
fn from_raw_slice<T>(ptr: *mut T, len: u32) -> Vec<T> {
    if ptr.is_null() || len == 0 {
        return Vec::new();
    }
    let slice = std::ptr::slice_from_raw_parts_mut(ptr, len as usize);
    unsafe { Box::from_raw(slice) }.into_vec()
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// A single HTTP header as a key-value pair of C strings.
#[repr(C)]
pub struct FfiHeader {
    pub key: *mut c_char,
    pub value: *mut c_char,
}

/// An HTTP `GET` the host must execute.
#[repr(C)]
pub struct FfiHttpRequest {
    pub url: *mut c_char,
    pub headers: *mut FfiHeader,
    pub headers_len: u32,
}

impl FfiHttpRequest {
    fn from_core(req: HttpRequest) -> Self {
        let headers: Vec<FfiHeader> = req
            .headers
            .iter()
            .map(|(k, v)| FfiHeader {
                key: to_c_string(k),
                value: to_c_string(v),
            })
            .collect();
        let (headers, headers_len) = into_raw_slice(headers);
        FfiHttpRequest {
            url: to_c_string(&req.url),
            headers,
            headers_len,
        }
    }

    fn release(self) {
        free_c_string(self.url);
        for header in from_raw_slice(self.headers, self.headers_len) {
            free_c_string(header.key);
            free_c_string(header.value);
        }
    }
}

/// The requests of one load, or the error that prevented building them.
///
/// On success `error_code` is `Ok` and `requests` holds one request per
/// planned fetch, in the order their responses must be passed back. On
/// failure `requests` is null and the session has already settled.
#[repr(C)]
pub struct FfiLoadPlan {
    pub generation: u64,
    pub requests: *mut FfiHttpRequest,
    pub requests_len: u32,
    pub error_code: FfiErrorCode,
}

impl FfiLoadPlan {
    pub(crate) fn from_core(plan: LoadPlan) -> *mut Self {
        let requests: Vec<FfiHttpRequest> = plan.requests.into_iter().map(FfiHttpRequest::from_core).collect();
        let (requests, requests_len) = into_raw_slice(requests);
        Box::into_raw(Box::new(FfiLoadPlan {
            generation: plan.generation,
            requests,
            requests_len,
            error_code: FfiErrorCode::Ok,
        }))
    }

    pub(crate) fn from_error(err: &FetchError) -> *mut Self {
        let (error_code, _) = error_parts(err.kind());
        Box::into_raw(Box::new(FfiLoadPlan {
            generation: 0,
            requests: std::ptr::null_mut(),
            requests_len: 0,
            error_code,
        }))
    }

    pub(crate) fn release(self) {
        for request in from_raw_slice(self.requests, self.requests_len) {
            request.release();
        }
    }
}

// ---------------------------------------------------------------------------
// Response input (caller-provided, not heap-allocated by us)
// ---------------------------------------------------------------------------

/// An HTTP response described as C-compatible plain data.
///
/// The C caller builds these after executing the requests of a plan and
/// passes them to `friends_session_complete_load`. The FFI layer reads but
/// does not free these fields.
#[repr(C)]
pub struct FfiHttpResponse {
    pub status: u16,
    pub body: *const c_char,
}

// ---------------------------------------------------------------------------
// Display state
// ---------------------------------------------------------------------------

/// Error categories shared by load plans and failed display states.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiErrorCode {
    Ok = 0,
    InvalidUrl = 1,
    InvalidResponse = 2,
    HttpStatus = 3,
    EmptyData = 4,
    Decoding = 5,
    Transport = 6,
}

pub(crate) fn error_parts(kind: FetchErrorKind) -> (FfiErrorCode, u16) {
    match kind {
        FetchErrorKind::InvalidUrl => (FfiErrorCode::InvalidUrl, 0),
        FetchErrorKind::InvalidResponse => (FfiErrorCode::InvalidResponse, 0),
        FetchErrorKind::HttpStatus(status) => (FfiErrorCode::HttpStatus, status),
        FetchErrorKind::EmptyData => (FfiErrorCode::EmptyData, 0),
        FetchErrorKind::Decoding => (FfiErrorCode::Decoding, 0),
        FetchErrorKind::Transport => (FfiErrorCode::Transport, 0),
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiStateKind {
    Loading = 0,
    Empty = 1,
    Content = 2,
    Failed = 3,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiFriendStatus {
    ReceivedInvitation = 0,
    Accepted = 1,
    SentInvitation = 2,
}

impl From<FriendStatus> for FfiFriendStatus {
    fn from(status: FriendStatus) -> Self {
        match status {
            FriendStatus::ReceivedInvitation => FfiFriendStatus::ReceivedInvitation,
            FriendStatus::Accepted => FfiFriendStatus::Accepted,
            FriendStatus::SentInvitation => FfiFriendStatus::SentInvitation,
        }
    }
}

/// A single friend exposed to C. `update_date` is seconds since the Unix
/// epoch (UTC).
#[repr(C)]
pub struct FfiFriend {
    pub fid: *mut c_char,
    pub name: *mut c_char,
    pub status: FfiFriendStatus,
    pub is_top: bool,
    pub update_date: i64,
}

/// A list of friends exposed to C. `items` is null when `len` is zero.
#[repr(C)]
pub struct FfiFriendList {
    pub items: *mut FfiFriend,
    pub len: u32,
}

impl FfiFriendList {
    fn empty() -> Self {
        FfiFriendList {
            items: std::ptr::null_mut(),
            len: 0,
        }
    }

    fn from_core(friends: &[Friend]) -> Self {
        let items: Vec<FfiFriend> = friends
            .iter()
            .map(|f| FfiFriend {
                fid: to_c_string(&f.fid),
                name: to_c_string(&f.name),
                status: f.status.into(),
                is_top: f.is_top,
                update_date: f.update_date.timestamp(),
            })
            .collect();
        let (items, len) = into_raw_slice(items);
        FfiFriendList { items, len }
    }

    fn release(self) {
        for friend in from_raw_slice(self.items, self.len) {
            free_c_string(friend.fid);
            free_c_string(friend.name);
        }
    }
}

/// A display state snapshot.
///
/// Both lists are empty unless `kind` is `Content`. `error_code` and
/// `http_status` are only set when `kind` is `Failed`.
#[repr(C)]
pub struct FfiDisplayState {
    pub kind: FfiStateKind,
    pub received_invitations: FfiFriendList,
    pub friends: FfiFriendList,
    pub error_code: FfiErrorCode,
    pub http_status: u16,
}

impl FfiDisplayState {
    pub(crate) fn from_core(state: &DisplayState) -> *mut Self {
        let mut ffi = FfiDisplayState {
            kind: FfiStateKind::Loading,
            received_invitations: FfiFriendList::empty(),
            friends: FfiFriendList::empty(),
            error_code: FfiErrorCode::Ok,
            http_status: 0,
        };
        match state {
            DisplayState::Loading => {}
            DisplayState::Empty => ffi.kind = FfiStateKind::Empty,
            DisplayState::Content {
                received_invitations,
                friends,
            } => {
                ffi.kind = FfiStateKind::Content;
                ffi.received_invitations = FfiFriendList::from_core(received_invitations);
                ffi.friends = FfiFriendList::from_core(friends);
            }
            DisplayState::Failed(kind) => {
                let (error_code, http_status) = error_parts(*kind);
                ffi.kind = FfiStateKind::Failed;
                ffi.error_code = error_code;
                ffi.http_status = http_status;
            }
        }
        Box::into_raw(Box::new(ffi))
    }

    pub(crate) fn release(self) {
        self.received_invitations.release();
        self.friends.release();
    }
}
