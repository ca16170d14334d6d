//! HTTP request and response descriptors.
//!
//! # Design
//! Requests and responses are plain data. The builder produces an
//! `HttpRequest`, something else executes it (the async `Transport`, or a
//! host that does its own I/O), and the resulting `HttpResponse` is handed to
//! the dispatcher for classification. Bodies are raw bytes because file
//! uploads carry binary content.

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

/// An immutable request descriptor.
///
/// `url` already contains the query string, including the token when the
/// endpoint is authenticated, so avoid logging it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    /// Value of the `content-type` header, if one was set.
    pub fn content_type(&self) -> Option<&str> {
        find_header(&self.headers, "content-type")
    }
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}
