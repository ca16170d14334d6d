//! C-compatible types for the FFI boundary.
//!
//! All types here are `#[repr(C)]` so they can be read directly from C.
//! Strings are null-terminated UTF-8 (`*mut c_char` / `*const c_char`).
//! Bodies are raw byte buffers with an explicit length because uploads carry
//! binary content.

use std::ffi::CString;
use std::os::raw::c_char;

use slack_core::{ApiError, HttpMethod, NetworkError};

// ---------------------------------------------------------------------------
// Opaque client handle
// ---------------------------------------------------------------------------

/// Opaque handle wrapping a `SlackClient`.
///
/// Created by `slack_client_new` and freed by `slack_client_free`.
pub struct FfiSlackClient {
    pub(crate) inner: slack_core::SlackClient,
}

// ---------------------------------------------------------------------------
// HTTP request (library-allocated, freed by `slack_free_request`)
// ---------------------------------------------------------------------------

/// HTTP method for a request.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiHttpMethod {
    Get = 0,
    Post = 1,
}

impl From<HttpMethod> for FfiHttpMethod {
    fn from(m: HttpMethod) -> Self {
        match m {
            HttpMethod::Get => FfiHttpMethod::Get,
            HttpMethod::Post => FfiHttpMethod::Post,
        }
    }
}

/// A single HTTP header as two owned C strings.
#[repr(C)]
pub struct FfiHeader {
    pub key: *mut c_char,
    pub value: *mut c_char,
}

/// An HTTP request descriptor the C caller should execute.
///
/// `url` already carries the query string, token included. `body` is null
/// for GET requests; otherwise it points to `body_len` bytes.
#[repr(C)]
pub struct FfiHttpRequest {
    pub method: FfiHttpMethod,
    pub url: *mut c_char,
    pub headers: *mut FfiHeader,
    pub headers_len: u32,
    pub body: *mut u8,
    pub body_len: usize,
}

impl FfiHttpRequest {
    /// Convert a core `HttpRequest` into a heap-allocated `FfiHttpRequest`.
    ///
    /// Returns `None` if any string contains an interior NUL. Nothing is
    /// leaked in that case: every conversion happens before the first
    /// allocation is handed out.
    pub(crate) fn from_core(req: slack_core::HttpRequest) -> Option<*mut Self> {
        let url = CString::new(req.url).ok()?;
        let headers = req
            .headers
            .into_iter()
            .map(|(k, v)| Some((CString::new(k).ok()?, CString::new(v).ok()?)))
            .collect::<Option<Vec<_>>>()?;

        let headers_len = headers.len() as u32;
        let headers = if headers.is_empty() {
            std::ptr::null_mut()
        } else {
            let ffi_headers: Box<[FfiHeader]> = headers
                .into_iter()
                .map(|(k, v)| FfiHeader {
                    key: k.into_raw(),
                    value: v.into_raw(),
                })
                .collect();
            Box::into_raw(ffi_headers) as *mut FfiHeader
        };

        let (body, body_len) = match req.body {
            Some(bytes) => {
                let bytes = bytes.into_boxed_slice();
                let len = bytes.len();
                (Box::into_raw(bytes) as *mut u8, len)
            }
            None => (std::ptr::null_mut(), 0),
        };

        let ffi_req = Box::new(FfiHttpRequest {
            method: req.method.into(),
            url: url.into_raw(),
            headers,
            headers_len,
            body,
            body_len,
        });
        Some(Box::into_raw(ffi_req))
    }
}

// ---------------------------------------------------------------------------
// HTTP response input (caller-provided, not freed by us)
// ---------------------------------------------------------------------------

/// A response header supplied by the caller.
#[repr(C)]
pub struct FfiResponseHeader {
    pub key: *const c_char,
    pub value: *const c_char,
}

/// An HTTP response described as C-compatible plain data.
///
/// The C caller constructs this after executing a request and passes a
/// pointer to `slack_parse_response`. The FFI layer reads but does not free
/// these fields. `headers` may be null when `headers_len` is 0, and `body`
/// may be null when `body_len` is 0.
#[repr(C)]
pub struct FfiHttpResponse {
    pub status: u16,
    pub headers: *const FfiResponseHeader,
    pub headers_len: u32,
    pub body: *const u8,
    pub body_len: usize,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Outcome category of `slack_parse_response`, mirrored in `FfiError::code`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiErrorCode {
    Ok = 0,
    Network = 1,
    MalformedJson = 2,
    TooManyRequests = 3,
    Platform = 4,
    Unknown = 5,
    Decode = 6,
    Panic = 7,
}

/// A classified failure handed to the failure callback.
///
/// The strings are borrowed for the duration of the callback only; copy
/// them if they need to outlive it.
/// - `http_status` is set for non-200 network failures and for 429, else 0.
/// - `retry_after` is the `Retry-After` seconds, or -1 when absent.
/// - `platform_code` is the wire `error` code of a platform failure, or null.
#[repr(C)]
pub struct FfiError {
    pub code: FfiErrorCode,
    pub message: *const c_char,
    pub http_status: u16,
    pub retry_after: i64,
    pub platform_code: *const c_char,
}

/// Owned backing storage for an `FfiError` view.
pub(crate) struct OwnedError {
    code: FfiErrorCode,
    message: CString,
    http_status: u16,
    retry_after: i64,
    platform_code: Option<CString>,
}

impl OwnedError {
    pub(crate) fn from_api(err: &ApiError) -> Self {
        let (code, http_status, retry_after) = match err {
            ApiError::Network(NetworkError::Status(status)) => (FfiErrorCode::Network, *status, -1),
            ApiError::Network(_) => (FfiErrorCode::Network, 0, -1),
            ApiError::MalformedJson(_) => (FfiErrorCode::MalformedJson, 0, -1),
            ApiError::TooManyRequests { retry_after } => (
                FfiErrorCode::TooManyRequests,
                429,
                retry_after.map_or(-1, |secs| i64::try_from(secs).unwrap_or(i64::MAX)),
            ),
            ApiError::Platform(_) => (FfiErrorCode::Platform, 0, -1),
            ApiError::Unknown { .. } => (FfiErrorCode::Unknown, 0, -1),
            ApiError::Decode(_) => (FfiErrorCode::Decode, 0, -1),
        };
        Self {
            code,
            message: lossy_c_string(err.to_string()),
            http_status,
            retry_after,
            platform_code: err.platform_code().map(|c| lossy_c_string(c.to_string())),
        }
    }

    pub(crate) fn code(&self) -> FfiErrorCode {
        self.code
    }

    /// Borrowed view, valid while `self` lives.
    pub(crate) fn view(&self) -> FfiError {
        FfiError {
            code: self.code,
            message: self.message.as_ptr(),
            http_status: self.http_status,
            retry_after: self.retry_after,
            platform_code: self
                .platform_code
                .as_ref()
                .map_or(std::ptr::null(), |c| c.as_ptr()),
        }
    }
}

/// `CString::new` that drops interior NULs instead of failing.
pub(crate) fn lossy_c_string(s: String) -> CString {
    CString::new(s).unwrap_or_else(|e| {
        let mut bytes = e.into_vec();
        bytes.retain(|b| *b != 0);
        CString::new(bytes).unwrap_or_default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use slack_core::SlackError;

    #[test]
    fn rate_limit_carries_status_and_retry_after() {
        let owned = OwnedError::from_api(&ApiError::TooManyRequests { retry_after: Some(30) });
        let view = owned.view();
        assert_eq!(view.code, FfiErrorCode::TooManyRequests);
        assert_eq!(view.http_status, 429);
        assert_eq!(view.retry_after, 30);
        assert!(view.platform_code.is_null());
    }

    #[test]
    fn platform_error_exposes_the_wire_code() {
        let owned = OwnedError::from_api(&ApiError::Platform(SlackError::ChannelNotFound));
        let view = owned.view();
        assert_eq!(view.code, FfiErrorCode::Platform);
        let code = unsafe { std::ffi::CStr::from_ptr(view.platform_code) };
        assert_eq!(code.to_str().unwrap(), "channel_not_found");
    }

    #[test]
    fn lossy_strings_drop_interior_nul() {
        assert_eq!(lossy_c_string("a\0b".to_string()).to_str().unwrap(), "ab");
    }
}
