//! C-ABI wrapper around `slack-core`.
//!
//! # Overview
//! Exposes the request builder and the response classifier through
//! `extern "C"` functions so any language with a C FFI can drive the Web API
//! with its own HTTP stack, without linking to Rust's async runtime.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - Requests are built generically: an endpoint name from the catalog plus
//!   parallel key/value arrays. A null value means "absent" and is dropped.
//!   Names outside the catalog are rejected.
//! - `slack_parse_response` reports through a success/failure callback pair.
//!   Exactly one callback fires per call, and the pointers it receives are
//!   only valid for the duration of that callback.
//! - The C caller owns returned requests and clients and must release them
//!   with the matching `slack_*_free` function.

pub mod types;

use std::ffi::{c_void, CStr, CString};
use std::os::raw::c_char;
use std::panic::catch_unwind;

use slack_core::{
    ApiError, Endpoint, FileUpload, HttpResponse, NetworkError, Params, Payload, UploadOptions,
};

use types::*;

/// Receives the success payload as a JSON object string (without `ok`).
pub type SlackSuccessCallback = extern "C" fn(payload_json: *const c_char, user_data: *mut c_void);

/// Receives the classified failure.
pub type SlackFailureCallback = extern "C" fn(error: *const FfiError, user_data: *mut c_void);

// ---------------------------------------------------------------------------
// Client lifecycle
// ---------------------------------------------------------------------------

/// Create a new client bound to `base_url` that authenticates with `token`.
///
/// Returns null if either argument is null or not UTF-8, or if an internal
/// panic occurs. The caller must free the result with `slack_client_free`.
#[unsafe(no_mangle)]
pub extern "C" fn slack_client_new(base_url: *const c_char, token: *const c_char) -> *mut FfiSlackClient {
    catch_unwind(|| {
        let (Some(url), Some(token)) = (unsafe { c_str(base_url) }, unsafe { c_str(token) }) else {
            return std::ptr::null_mut();
        };
        let client = slack_core::SlackClient::new(url, token);
        Box::into_raw(Box::new(FfiSlackClient { inner: client }))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a client created by `slack_client_new`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn slack_client_free(client: *mut FfiSlackClient) {
    if !client.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { Box::from_raw(client) });
        });
    }
}

// ---------------------------------------------------------------------------
// Build request functions
// ---------------------------------------------------------------------------

/// Build a GET request for the catalog method `endpoint` (e.g.
/// `"chat.postMessage"`).
///
/// `keys` and `values` are parallel arrays of `len` entries. A null entry in
/// `values` leaves that argument out of the request. The client's token is
/// attached except for `oauth.access` and `auth.revoke`, which carry their
/// credentials as arguments.
///
/// Returns null if a required pointer is null, a string is not UTF-8, or
/// `endpoint` is not in the catalog. `files.upload` also yields null; use
/// `slack_build_upload` for it. The caller must free the result with
/// `slack_free_request`.
#[unsafe(no_mangle)]
pub extern "C" fn slack_build_request(
    client: *const FfiSlackClient,
    endpoint: *const c_char,
    keys: *const *const c_char,
    values: *const *const c_char,
    len: u32,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        let Some(endpoint) = unsafe { c_str(endpoint) }.and_then(|name| name.parse::<Endpoint>().ok())
        else {
            return std::ptr::null_mut();
        };
        let Some(params) = (unsafe { read_params(keys, values, len) }) else {
            return std::ptr::null_mut();
        };
        match client.inner.build(endpoint, Some(&params)) {
            Ok(req) => FfiHttpRequest::from_core(req).unwrap_or(std::ptr::null_mut()),
            Err(_) => std::ptr::null_mut(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Build a multipart `files.upload` POST for `data_len` bytes at `data`.
///
/// `content_type` may be null (`application/octet-stream`). Accepted keys
/// are `filetype` (default `auto`), `title`, `initial_comment` and
/// `channels` (comma-separated ids). Any other key makes the build fail.
///
/// Returns null on a null required pointer, invalid UTF-8 or an unknown key.
/// The caller must free the result with `slack_free_request`.
#[unsafe(no_mangle)]
#[allow(clippy::too_many_arguments)]
pub extern "C" fn slack_build_upload(
    client: *const FfiSlackClient,
    data: *const u8,
    data_len: usize,
    filename: *const c_char,
    content_type: *const c_char,
    keys: *const *const c_char,
    values: *const *const c_char,
    len: u32,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() || (data.is_null() && data_len > 0) {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        let Some(filename) = (unsafe { c_str(filename) }) else {
            return std::ptr::null_mut();
        };
        let bytes = if data_len == 0 {
            &[][..]
        } else {
            unsafe { std::slice::from_raw_parts(data, data_len) }
        };
        let mut file = FileUpload::new(bytes, filename);
        if !content_type.is_null() {
            match unsafe { c_str(content_type) } {
                Some(ct) => file = file.with_content_type(ct),
                None => return std::ptr::null_mut(),
            }
        }
        let Some(options) = (unsafe { read_params(keys, values, len) }).and_then(|p| upload_options(&p))
        else {
            return std::ptr::null_mut();
        };
        match client.inner.build_upload_file(&file, &options) {
            Ok(req) => FfiHttpRequest::from_core(req).unwrap_or(std::ptr::null_mut()),
            Err(_) => std::ptr::null_mut(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Parse response
// ---------------------------------------------------------------------------

/// Classify a response and report it through exactly one callback.
///
/// A null `response` stands for "no HTTP response was obtained" and is
/// reported as a network failure. A null callback is skipped. Returns the
/// category that was reported, or `Panic` if classification panicked.
#[unsafe(no_mangle)]
pub extern "C" fn slack_parse_response(
    response: *const FfiHttpResponse,
    on_success: Option<SlackSuccessCallback>,
    on_failure: Option<SlackFailureCallback>,
    user_data: *mut c_void,
) -> FfiErrorCode {
    catch_unwind(|| {
        let outcome = if response.is_null() {
            Err(ApiError::Network(NetworkError::Transport(
                "no response was obtained".to_string(),
            )))
        } else {
            let resp = unsafe { &*response };
            slack_core::classify(&unsafe { ffi_response_to_core(resp) })
        };
        report(outcome.and_then(|payload| payload_json(&payload)), on_success, on_failure, user_data)
    })
    .unwrap_or(FfiErrorCode::Panic)
}

fn report(
    outcome: Result<CString, ApiError>,
    on_success: Option<SlackSuccessCallback>,
    on_failure: Option<SlackFailureCallback>,
    user_data: *mut c_void,
) -> FfiErrorCode {
    match outcome {
        Ok(json) => {
            if let Some(cb) = on_success {
                cb(json.as_ptr(), user_data);
            }
            FfiErrorCode::Ok
        }
        Err(err) => {
            let owned = OwnedError::from_api(&err);
            if let Some(cb) = on_failure {
                let view = owned.view();
                cb(&view, user_data);
            }
            owned.code()
        }
    }
}

fn payload_json(payload: &Payload) -> Result<CString, ApiError> {
    let json = serde_json::to_string(payload).map_err(|e| ApiError::Decode(e.to_string()))?;
    Ok(lossy_c_string(json))
}

/// Copy a caller-owned `FfiHttpResponse` into a core `HttpResponse`.
///
/// Headers with a null or non-UTF-8 key or value are skipped.
unsafe fn ffi_response_to_core(resp: &FfiHttpResponse) -> HttpResponse {
    let body = if resp.body.is_null() || resp.body_len == 0 {
        Vec::new()
    } else {
        unsafe { std::slice::from_raw_parts(resp.body, resp.body_len) }.to_vec()
    };
    let headers = if resp.headers.is_null() || resp.headers_len == 0 {
        Vec::new()
    } else {
        unsafe { std::slice::from_raw_parts(resp.headers, resp.headers_len as usize) }
            .iter()
            .filter_map(|h| {
                let key = unsafe { c_str(h.key) }?;
                let value = unsafe { c_str(h.value) }?;
                Some((key.to_string(), value.to_string()))
            })
            .collect()
    };
    HttpResponse {
        status: resp.status,
        headers,
        body,
    }
}

// ---------------------------------------------------------------------------
// Argument helpers
// ---------------------------------------------------------------------------

/// Borrow a C string as `&str`. `None` for null or non-UTF-8 input.
unsafe fn c_str<'a>(ptr: *const c_char) -> Option<&'a str> {
    if ptr.is_null() {
        return None;
    }
    unsafe { CStr::from_ptr(ptr) }.to_str().ok()
}

/// Read parallel key/value arrays into `Params`. Null values are absent.
unsafe fn read_params(keys: *const *const c_char, values: *const *const c_char, len: u32) -> Option<Params> {
    let mut params = Params::new();
    if len == 0 {
        return Some(params);
    }
    if keys.is_null() || values.is_null() {
        return None;
    }
    let keys = unsafe { std::slice::from_raw_parts(keys, len as usize) };
    let values = unsafe { std::slice::from_raw_parts(values, len as usize) };
    for (&key, &value) in keys.iter().zip(values) {
        let key = unsafe { c_str(key) }?;
        let value = if value.is_null() {
            None
        } else {
            Some(unsafe { c_str(value) }?)
        };
        params.set(key, value);
    }
    Some(params)
}

fn upload_options(params: &Params) -> Option<UploadOptions> {
    let mut options = UploadOptions::default();
    for (key, value) in params.present() {
        let slack_core::ParamValue::Text(text) = value else {
            return None;
        };
        match key {
            "filetype" => options.filetype = Some(text.clone()),
            "title" => options.title = Some(text.clone()),
            "initial_comment" => options.initial_comment = Some(text.clone()),
            "channels" => {
                options.channels = text
                    .split(',')
                    .map(str::trim)
                    .filter(|c| !c.is_empty())
                    .map(str::to_string)
                    .collect()
            }
            _ => return None,
        }
    }
    Some(options)
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free an `FfiHttpRequest` returned by any `slack_build_*` function.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn slack_free_request(req: *mut FfiHttpRequest) {
    if req.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let req = unsafe { Box::from_raw(req) };
        if !req.url.is_null() {
            drop(unsafe { CString::from_raw(req.url) });
        }
        if !req.body.is_null() {
            drop(unsafe { Box::from_raw(std::ptr::slice_from_raw_parts_mut(req.body, req.body_len)) });
        }
        if !req.headers.is_null() && req.headers_len > 0 {
            let headers = unsafe {
                Box::from_raw(std::ptr::slice_from_raw_parts_mut(req.headers, req.headers_len as usize))
            };
            for h in headers.iter() {
                if !h.key.is_null() {
                    drop(unsafe { CString::from_raw(h.key) });
                }
                if !h.value.is_null() {
                    drop(unsafe { CString::from_raw(h.value) });
                }
            }
        }
    });
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
