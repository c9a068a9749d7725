//! Signed request builder and response interpreter for the Marvel API.
//!
//! # Design
//! `MarvelClient` holds only credentials and configuration, both immutable,
//! and carries no state between calls. Each operation is split into a
//! `build_*` method that produces a signed `HttpRequest` and a `parse_*`
//! method that consumes the `HttpResponse`. The caller (or `Marvel`)
//! executes the HTTP round-trip in between, keeping this half free of I/O.
//!
//! Every URL has the shape
//! `{base}/{path}?ts=..&apikey=..&hash=..[&limit=..&offset=..][&extra..]`,
//! with a fresh timestamp and hash per request.

use chrono::NaiveDateTime;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::{ClientConfig, Credentials, PageLimit};
use crate::error::{ApiError, EmptyPage};
use crate::http::{HttpRequest, HttpResponse, QueryParams};
use crate::pagination;
use crate::signature::Signature;
use crate::types::{DataContainer, DetailResult, Envelope, PagedResult, Resource, ResponseCode};

/// `code` the gateway uses when the caller ran out of calls.
pub const THROTTLED_CODE: &str = "RequestThrottled";

/// Synchronous, stateless client for the Marvel API.
///
/// Builds `HttpRequest` values and parses `HttpResponse` values without
/// touching the network.
#[derive(Debug, Clone)]
pub struct MarvelClient {
    credentials: Credentials,
    config: ClientConfig,
}

impl MarvelClient {
    pub fn new(credentials: Credentials, config: ClientConfig) -> Self {
        Self { credentials, config }
    }

    /// Client for the public gateway with the given keys and page limit.
    pub fn with_keys<L>(public_key: &str, private_key: &str, limit: L) -> Result<Self, ApiError>
    where
        L: TryInto<PageLimit, Error = ApiError>,
    {
        Ok(Self::new(
            Credentials::new(public_key, private_key),
            ClientConfig::with_limit(limit)?,
        ))
    }

    /// Client configured entirely from `MARVEL_*` environment variables.
    pub fn from_env() -> Result<Self, ApiError> {
        Ok(Self::new(Credentials::from_env()?, ClientConfig::from_env()?))
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn limit(&self) -> PageLimit {
        self.config.limit()
    }

    // -----------------------------------------------------------------------
    // Request building
    // -----------------------------------------------------------------------

    /// Signed `GET` for `path`, signed with the current local time.
    pub fn build_request(
        &self,
        path: &str,
        page: Option<u32>,
        params: &QueryParams,
    ) -> Result<HttpRequest, ApiError> {
        self.build_request_signed(path, page, params, Signature::now(&self.credentials))
    }

    /// Same as `build_request` with a fixed signing time.
    pub fn build_request_at(
        &self,
        path: &str,
        page: Option<u32>,
        params: &QueryParams,
        time: NaiveDateTime,
    ) -> Result<HttpRequest, ApiError> {
        self.build_request_signed(path, page, params, Signature::at(&self.credentials, time))
    }

    fn build_request_signed(
        &self,
        path: &str,
        page: Option<u32>,
        params: &QueryParams,
        signature: Signature,
    ) -> Result<HttpRequest, ApiError> {
        let mut url = format!(
            "{}/{}{}",
            self.config.base_url(),
            path.trim_start_matches('/'),
            signature.query_fragment()
        );

        if let Some(page) = page {
            if page == 0 {
                return Err(ApiError::InvalidPage(page));
            }
            let limit = self.limit();
            url.push_str(&format!(
                "&limit={limit}&offset={}",
                pagination::offset(page, limit)
            ));
        }

        if !params.is_empty() {
            url.push('&');
            url.push_str(&params.encode());
        }

        debug!(path, ?page, params = params.iter().count(), "built gateway request");

        Ok(HttpRequest {
            url,
            headers: vec![("accept".to_string(), "application/json".to_string())],
        })
    }

    /// Page of a top-level list, e.g. `characters`.
    pub fn build_list(
        &self,
        resource: Resource,
        page: u32,
        params: &QueryParams,
    ) -> Result<HttpRequest, ApiError> {
        self.build_request(resource.as_str(), Some(page), params)
    }

    /// Single entity by id.
    pub fn build_detail_by_id(&self, resource: Resource, id: u64) -> Result<HttpRequest, ApiError> {
        self.build_request(&format!("{resource}/{id}"), None, &QueryParams::new())
    }

    /// Lookup by exact name. `params` is copied, the caller's value is not
    /// touched.
    pub fn build_detail_by_name(
        &self,
        resource: Resource,
        name: &str,
        params: &QueryParams,
    ) -> Result<HttpRequest, ApiError> {
        let params = params.clone().with("name", name);
        self.build_request(resource.as_str(), None, &params)
    }

    /// Page of entities related to a parent, e.g. `characters/{id}/comics`.
    pub fn build_relation(
        &self,
        resource: Resource,
        id: u64,
        relation: Resource,
        page: u32,
        params: &QueryParams,
    ) -> Result<HttpRequest, ApiError> {
        self.build_request(&format!("{resource}/{id}/{relation}"), Some(page), params)
    }

    // -----------------------------------------------------------------------
    // Response parsing
    // -----------------------------------------------------------------------

    /// Decode the envelope of any response, failing on throttling.
    pub fn parse_envelope<T: DeserializeOwned>(
        &self,
        response: &HttpResponse,
    ) -> Result<Envelope<T>, ApiError> {
        decode_envelope(response)
    }

    /// Interpret a list response for `page` (list and relation calls).
    pub fn parse_list<T: DeserializeOwned>(
        &self,
        response: &HttpResponse,
        page: u32,
    ) -> Result<PagedResult<T>, ApiError> {
        let envelope = decode_envelope(response)?;
        into_paged(envelope, page, self.limit())
    }

    /// Interpret a detail-by-id response.
    pub fn parse_detail_by_id<T: DeserializeOwned>(
        &self,
        response: &HttpResponse,
        id: u64,
    ) -> Result<DetailResult<T>, ApiError> {
        let envelope: Envelope<T> = decode_envelope(response)?;
        if envelope.code.is(404) {
            return Err(ApiError::EmptyPage(EmptyPage::IdNotFound {
                status: envelope.status_text(),
                id,
            }));
        }
        let (code, status, attribution_text, data) = unpack(envelope)?;
        Ok(DetailResult {
            code,
            status,
            attribution_text,
            result: data.results.into_iter().next(),
        })
    }

    /// Interpret a detail-by-name response.
    pub fn parse_detail_by_name<T: DeserializeOwned>(
        &self,
        response: &HttpResponse,
        name: &str,
    ) -> Result<DetailResult<T>, ApiError> {
        let envelope: Envelope<T> = decode_envelope(response)?;
        if envelope.code.is(409) {
            return Err(ApiError::InvalidParameters(envelope.status_text()));
        }
        let (code, status, attribution_text, data) = unpack(envelope)?;
        match data.results.into_iter().next() {
            Some(result) => Ok(DetailResult {
                code,
                status,
                attribution_text,
                result: Some(result),
            }),
            None => Err(ApiError::EmptyPage(EmptyPage::NameNotFound {
                name: name.to_string(),
            })),
        }
    }
}

/// Parse the body and reject throttled responses. The HTTP status is not
/// consulted; the envelope repeats it.
fn decode_envelope<T: DeserializeOwned>(response: &HttpResponse) -> Result<Envelope<T>, ApiError> {
    let envelope: Envelope<T> = serde_json::from_str(&response.body)
        .map_err(|e| ApiError::Deserialization(e.to_string()))?;

    if envelope.code.is_text(THROTTLED_CODE) {
        let message = envelope.message_or_status();
        warn!(%message, "gateway throttled the request");
        return Err(ApiError::RateLimited(message));
    }

    Ok(envelope)
}

/// Apply list semantics: 409 is a parameter error, otherwise compute the
/// last page and reject pages beyond it.
fn into_paged<T>(envelope: Envelope<T>, page: u32, limit: PageLimit) -> Result<PagedResult<T>, ApiError> {
    if envelope.code.is(409) {
        return Err(ApiError::InvalidParameters(envelope.status_text()));
    }

    let (code, status, attribution_text, data) = unpack(envelope)?;
    let last_page = pagination::last_page(data.total, limit);
    if page > last_page {
        return Err(ApiError::EmptyPage(EmptyPage::PastLastPage { page, last_page }));
    }

    Ok(PagedResult {
        code,
        status,
        attribution_text,
        offset: data.offset,
        limit: data.limit,
        total: data.total,
        count: data.count,
        results: data.results,
        page,
        last_page,
    })
}

type Unpacked<T> = (u16, String, Option<String>, DataContainer<T>);

/// Split a successful envelope; anything without `data` or with a symbolic
/// code is an upstream error.
fn unpack<T>(envelope: Envelope<T>) -> Result<Unpacked<T>, ApiError> {
    let message = envelope.message_or_status();
    match (envelope.code, envelope.data) {
        (ResponseCode::Number(code), Some(data)) => Ok((
            code,
            envelope.status.unwrap_or_default(),
            envelope.attribution_text,
            data,
        )),
        (code, _) => Err(ApiError::Upstream {
            code: code.to_string(),
            message,
        }),
    }
}
