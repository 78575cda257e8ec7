//! C-ABI wrapper around `friends-core`.
//!
//! # Overview
//! Exposes a `FriendsSession` through `extern "C"` functions so a native host
//! can run the HTTP round-trips itself and still get merged, searched and
//! projected friend lists back, without linking to an async runtime.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - A load is split in two: `friends_session_begin_load` returns the requests
//!   to execute, `friends_session_complete_load` (or `_fail_load`) hands the
//!   outcome back. Completions for a superseded generation are ignored.
//! - Functions that change the session return a fresh `FfiDisplayState`
//!   snapshot of the state it ended in.
//! - The C caller owns all returned pointers and must call the matching
//!   `friends_*_free` function to release them.

pub mod types;

use std::ffi::CStr;
use std::os::raw::c_char;
use std::panic::{catch_unwind, AssertUnwindSafe};

use friends_core::{Endpoints, FetchError, FriendsSession, HttpResponse, Scenario, SessionConfig};

use types::*;

/// Borrow a C string, or `None` for null. Invalid UTF-8 reads as empty.
fn read_c_str<'a>(s: *const c_char) -> Option<&'a str> {
    if s.is_null() {
        return None;
    }
    Some(unsafe { CStr::from_ptr(s) }.to_str().unwrap_or(""))
}

fn scenario_from_code(code: u32) -> Option<Scenario> {
    match code {
        0 => Some(Scenario::Empty),
        1 => Some(Scenario::FriendsOnly),
        2 => Some(Scenario::FriendsWithInvites),
        _ => None,
    }
}

/// Copy a caller-provided response. A 2xx body that is not UTF-8 cannot be
/// decoded, so it fails with `Decoding`; other statuses fail on their status
/// and keep a lossy body.
fn ffi_response_to_core(resp: &FfiHttpResponse) -> Result<HttpResponse, FetchError> {
    let bytes = if resp.body.is_null() {
        &[][..]
    } else {
        unsafe { CStr::from_ptr(resp.body) }.to_bytes()
    };
    match std::str::from_utf8(bytes) {
        Ok(body) => Ok(HttpResponse::new(resp.status, body)),
        Err(err) if (200..300).contains(&resp.status) => {
            Err(FetchError::Decoding(format!("response body is not UTF-8: {err}")))
        }
        Err(_) => Ok(HttpResponse::new(resp.status, String::from_utf8_lossy(bytes))),
    }
}

// ---------------------------------------------------------------------------
// Session lifecycle
// ---------------------------------------------------------------------------

/// Create a session for `scenario` (0 = empty, 1 = friends only,
/// 2 = friends with invitations).
///
/// `base_url` may be null to use the default host. Returns null for an
/// unknown scenario or an internal panic. The caller must free the returned
/// pointer with `friends_session_free`.
#[unsafe(no_mangle)]
pub extern "C" fn friends_session_new(
    scenario: u32,
    base_url: *const c_char,
    surface_errors: bool,
) -> *mut FfiFriendsSession {
    catch_unwind(|| {
        let Some(scenario) = scenario_from_code(scenario) else {
            return std::ptr::null_mut();
        };
        let endpoints = match read_c_str(base_url) {
            Some(url) => Endpoints::at(url),
            None => Endpoints::default(),
        };
        let config = SessionConfig::new(scenario)
            .with_endpoints(endpoints)
            .with_surface_errors(surface_errors);
        Box::into_raw(Box::new(FfiFriendsSession {
            inner: FriendsSession::new(config),
        }))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a session created by `friends_session_new`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn friends_session_free(session: *mut FfiFriendsSession) {
    if !session.is_null() {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            drop(unsafe { Box::from_raw(session) });
        }));
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Start a load and return the requests the host must execute.
///
/// Check `error_code` on the result: anything but `Ok` means no requests were
/// built and the session has already settled. Returns null if `session` is
/// null. The caller must free the plan with `friends_free_load_plan`.
#[unsafe(no_mangle)]
pub extern "C" fn friends_session_begin_load(session: *mut FfiFriendsSession) -> *mut FfiLoadPlan {
    catch_unwind(AssertUnwindSafe(|| {
        if session.is_null() {
            return std::ptr::null_mut();
        }
        let session = unsafe { &mut *session };
        match session.inner.begin_load() {
            Ok(plan) => FfiLoadPlan::from_core(plan),
            Err(e) => FfiLoadPlan::from_error(&e),
        }
    }))
    .unwrap_or(std::ptr::null_mut())
}

/// Complete load `generation` with one response per planned request, in plan
/// order.
///
/// A stale `generation` leaves the session untouched. Returns the resulting
/// state, or null if `session` is null or `responses` is null while
/// `responses_len` is not zero. The caller must free the state with
/// `friends_free_state`.
#[unsafe(no_mangle)]
pub extern "C" fn friends_session_complete_load(
    session: *mut FfiFriendsSession,
    generation: u64,
    responses: *const FfiHttpResponse,
    responses_len: u32,
) -> *mut FfiDisplayState {
    catch_unwind(AssertUnwindSafe(|| {
        if session.is_null() || (responses.is_null() && responses_len > 0) {
            return std::ptr::null_mut();
        }
        let session = unsafe { &mut *session };
        let responses: Result<Vec<HttpResponse>, FetchError> = if responses_len == 0 {
            Ok(Vec::new())
        } else {
            unsafe { std::slice::from_raw_parts(responses, responses_len as usize) }
                .iter()
                .map(ffi_response_to_core)
                .collect()
        };
        match responses {
            Ok(responses) => session.inner.complete_load(generation, responses),
            Err(err) => session.inner.fail_load(generation, err),
        };
        FfiDisplayState::from_core(session.inner.state())
    }))
    .unwrap_or(std::ptr::null_mut())
}

/// Complete load `generation` with a transport failure. `message` may be null.
///
/// Returns the resulting state, or null if `session` is null. The caller must
/// free the state with `friends_free_state`.
#[unsafe(no_mangle)]
pub extern "C" fn friends_session_fail_load(
    session: *mut FfiFriendsSession,
    generation: u64,
    message: *const c_char,
) -> *mut FfiDisplayState {
    catch_unwind(AssertUnwindSafe(|| {
        if session.is_null() {
            return std::ptr::null_mut();
        }
        let session = unsafe { &mut *session };
        let message = read_c_str(message).unwrap_or("request failed").to_string();
        session.inner.fail_load(generation, FetchError::Transport(message));
        FfiDisplayState::from_core(session.inner.state())
    }))
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Search and state
// ---------------------------------------------------------------------------

/// Filter the loaded friends by `query`. A null or blank query restores the
/// full list.
///
/// Returns the resulting state, or null if `session` is null. The caller must
/// free the state with `friends_free_state`.
#[unsafe(no_mangle)]
pub extern "C" fn friends_session_search(
    session: *mut FfiFriendsSession,
    query: *const c_char,
) -> *mut FfiDisplayState {
    catch_unwind(AssertUnwindSafe(|| {
        if session.is_null() {
            return std::ptr::null_mut();
        }
        let session = unsafe { &mut *session };
        session.inner.search_friends(read_c_str(query).unwrap_or(""));
        FfiDisplayState::from_core(session.inner.state())
    }))
    .unwrap_or(std::ptr::null_mut())
}

/// Snapshot the current state. Returns null if `session` is null.
#[unsafe(no_mangle)]
pub extern "C" fn friends_session_state(session: *const FfiFriendsSession) -> *mut FfiDisplayState {
    catch_unwind(AssertUnwindSafe(|| {
        if session.is_null() {
            return std::ptr::null_mut();
        }
        let session = unsafe { &*session };
        FfiDisplayState::from_core(session.inner.state())
    }))
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free a plan returned by `friends_session_begin_load`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn friends_free_load_plan(plan: *mut FfiLoadPlan) {
    if plan.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        unsafe { Box::from_raw(plan) }.release();
    });
}

/// Free a state returned by any `friends_session_*` function. Safe to call
/// with null.
#[unsafe(no_mangle)]
pub extern "C" fn friends_free_state(state: *mut FfiDisplayState) {
    if state.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        unsafe { Box::from_raw(state) }.release();
    });
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
