//! Synchronous client core for the Marvel comics API.
//!
//! # Overview
//! Every request is signed with a timestamp, the public key and an MD5 hash
//! of both keys; list endpoints are paged by a fixed limit; responses are
//! decoded into typed envelopes and their error codes mapped to `ApiError`.
//!
//! # Design
//! - `MarvelClient` is stateless: credentials and configuration only.
//! - Each operation is split into `build_*` (produces a signed request) and
//!   `parse_*` (consumes a response), so the I/O boundary is explicit.
//! - `Marvel` joins the two halves through a blocking `Transport`
//!   (`UreqTransport` by default).
//! - Entity DTOs are defined independently from the mock-server crate;
//!   integration tests catch schema drift.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod marvel;
pub mod pagination;
pub mod signature;
pub mod types;

pub use client::MarvelClient;
pub use config::{ClientConfig, Credentials, PageLimit, DEFAULT_BASE_URL, DEFAULT_LIMIT, MAX_LIMIT};
pub use error::{ApiError, EmptyPage};
pub use http::{HttpRequest, HttpResponse, QueryParams, Transport, UreqTransport};
pub use marvel::Marvel;
pub use signature::Signature;
pub use types::{
    Character, Comic, DetailResult, Envelope, Event, Image, PagedResult, Resource, ResponseCode, Series, Story,
};
