//! Minimal JSON-over-HTTP client core.
//!
//! # Overview
//! A `Client` turns `get` / `post` / `put` calls into HTTP exchanges against a
//! base URI, bounds each attempt with a deadline, retries connection-level
//! failures, decodes the response body as JSON, and reports every failure as
//! one `ClientError` variant.
//!
//! # Design
//! - The pipeline (`executor`, `error::translate`, `decode`) never touches the
//!   network itself; it talks to a `Transport`, which performs one exchange
//!   and reports an `Outcome`.
//! - `ReqwestTransport` (async) and `UreqTransport` (blocking, on tokio's
//!   blocking pool) are the bundled transports; tests plug in scripted ones.
//! - Configuration is a plain struct, read-only once the client is built.

pub mod client;
pub mod config;
pub mod decode;
pub mod error;
pub mod executor;
pub mod http;
#[cfg(feature = "reqwest")]
pub mod reqwest_transport;
pub mod types;
#[cfg(feature = "ureq")]
pub mod ureq_transport;

pub use client::Client;
pub use config::{BodyEncoding, ClientConfig};
pub use decode::{decode, decode_body};
pub use error::{translate, ClientError, ErrorKind};
pub use executor::{build_request, execute};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Outcome, Transport};
#[cfg(feature = "reqwest")]
pub use reqwest_transport::ReqwestTransport;
pub use types::{Query, RequestSpec};
#[cfg(feature = "ureq")]
pub use ureq_transport::UreqTransport;
