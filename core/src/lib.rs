//! Web API client core for the Slack chat platform.
//!
//! # Overview
//! Turns typed method calls into request descriptors against a closed catalog
//! of endpoints, and classifies raw responses into typed results or a
//! structured `ApiError`. Two ways in:
//! - Host-does-IO: `SlackClient::build_*` produces an `HttpRequest`, the host
//!   executes it, and `SlackClient::parse_response` classifies the reply.
//! - `WebApi`: the same builders driven over a `Transport` (reqwest by
//!   default), with stream and callback adapters on top.
//!
//! # Design
//! - Building is pure: identical inputs give byte-identical descriptors.
//!   The only randomness is the multipart boundary, which can be fixed.
//! - Absent optional arguments are dropped by one function (`encode_query`).
//! - HTTP status decides before the body: 429 is rate limiting, anything but
//!   200 is a network error, and only then does the `ok` field decide.
//! - Every call is a single attempt. Nothing retries.

pub mod callback;
pub mod client;
pub mod decode;
pub mod dispatch;
pub mod endpoint;
pub mod error;
pub mod http;
pub mod params;
pub mod request;
pub mod stream;
pub mod transport;
pub mod types;
pub mod web_api;

pub use callback::spawn_with_callbacks;
pub use client::SlackClient;
pub use dispatch::{classify, execute, Payload, Transport};
pub use endpoint::{Endpoint, UnknownEndpoint};
pub use error::{ApiError, BuildError, NetworkError, SlackError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use params::{encode_query, escape_message_text, IntoParam, ParamValue, Params};
pub use request::{FileUpload, RequestBuilder, DEFAULT_BASE_URL};
pub use stream::single;
pub use transport::ReqwestTransport;
pub use types::*;
pub use web_api::{WebApi, WebApiBuilder};
