pub mod catalog;

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

pub use catalog::{Character, Related, Relation, CATALOG_SIZE};

const ATTRIBUTION: &str = "Data provided by Marvel. © 2024 MARVEL";
const DEFAULT_LIMIT: usize = 20;
const MAX_LIMIT: usize = 100;
const AUTH_KEYS: [&str; 3] = ["ts", "apikey", "hash"];
const PAGING_KEYS: [&str; 2] = ["limit", "offset"];
const CHARACTER_FILTERS: [&str; 3] = ["name", "nameStartsWith", "orderBy"];

/// Key pair the gateway accepts and an optional cap on served calls.
#[derive(Clone, Debug)]
pub struct GatewayConfig {
    pub public_key: String,
    pub private_key: String,
    pub call_budget: Option<u64>,
}

impl GatewayConfig {
    pub fn new(public_key: impl Into<String>, private_key: impl Into<String>) -> Self {
        Self {
            public_key: public_key.into(),
            private_key: private_key.into(),
            call_budget: None,
        }
    }

    /// Throttle every call after the first `budget`.
    pub fn with_call_budget(mut self, budget: u64) -> Self {
        self.call_budget = Some(budget);
        self
    }
}

pub struct Gateway {
    config: GatewayConfig,
    characters: Vec<Character>,
    calls: AtomicU64,
}

pub type Shared = Arc<Gateway>;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataContainer<T> {
    pub offset: usize,
    pub limit: usize,
    pub total: usize,
    pub count: usize,
    pub results: Vec<T>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T> {
    pub code: u16,
    pub status: String,
    pub attribution_text: String,
    pub data: DataContainer<T>,
}

/// Failures reported the way the gateway reports them: a JSON body with a
/// numeric `code` and `status`, or a symbolic `code` and `message`.
#[derive(Debug)]
pub enum GatewayError {
    MissingParameter(String),
    InvalidCredentials(String),
    Throttled,
    Conflict(String),
    NotFound(String),
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            GatewayError::MissingParameter(message) => (
                StatusCode::CONFLICT,
                serde_json::json!({"code": "MissingParameter", "message": message}),
            ),
            GatewayError::InvalidCredentials(message) => (
                StatusCode::UNAUTHORIZED,
                serde_json::json!({"code": "InvalidCredentials", "message": message}),
            ),
            GatewayError::Throttled => (
                StatusCode::TOO_MANY_REQUESTS,
                serde_json::json!({
                    "code": "RequestThrottled",
                    "message": "You have exceeded your rate limit.  Please try again later."
                }),
            ),
            GatewayError::Conflict(status) => (
                StatusCode::CONFLICT,
                serde_json::json!({"code": 409, "status": status}),
            ),
            GatewayError::NotFound(status) => (
                StatusCode::NOT_FOUND,
                serde_json::json!({"code": 404, "status": status}),
            ),
        };
        (status, Json(body)).into_response()
    }
}

pub fn app(config: GatewayConfig) -> Router {
    let gateway: Shared = Arc::new(Gateway {
        config,
        characters: catalog::characters(),
        calls: AtomicU64::new(0),
    });
    Router::new()
        .route("/v1/public/characters", get(list_characters))
        .route("/v1/public/characters/{id}", get(get_character))
        .route("/v1/public/characters/{id}/{relation}", get(list_related))
        .layer(TraceLayer::new_for_http())
        .with_state(gateway)
}

pub async fn run(listener: TcpListener, config: GatewayConfig) -> Result<(), std::io::Error> {
    axum::serve(listener, app(config)).await
}

async fn list_characters(
    State(gateway): State<Shared>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Envelope<Character>>, GatewayError> {
    gateway.admit(&params)?;
    reject_unknown(&params, &CHARACTER_FILTERS)?;
    let (limit, offset) = paging(&params)?;

    let mut matches: Vec<&Character> = gateway
        .characters
        .iter()
        .filter(|c| match params.get("name") {
            Some(name) => c.name.eq_ignore_ascii_case(name),
            None => true,
        })
        .filter(|c| match params.get("nameStartsWith") {
            Some(prefix) => c.name.to_lowercase().starts_with(&prefix.to_lowercase()),
            None => true,
        })
        .collect();

    match params.get("orderBy").map(String::as_str).unwrap_or("name") {
        "name" => matches.sort_by(|a, b| a.name.cmp(&b.name)),
        "-name" => matches.sort_by(|a, b| b.name.cmp(&a.name)),
        "modified" => matches.sort_by(|a, b| a.modified.cmp(&b.modified).then(a.id.cmp(&b.id))),
        "-modified" => matches.sort_by(|a, b| b.modified.cmp(&a.modified).then(b.id.cmp(&a.id))),
        other => {
            return Err(GatewayError::Conflict(format!(
                "You must pass a valid orderBy value. {other} is not one."
            )))
        }
    }

    Ok(Json(page(matches.into_iter().cloned().collect(), limit, offset)))
}

async fn get_character(
    State(gateway): State<Shared>,
    Path(id): Path<u64>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Envelope<Character>>, GatewayError> {
    gateway.admit(&params)?;
    reject_unknown(&params, &[])?;
    let character = gateway.find(id)?;
    Ok(Json(page(vec![character.clone()], MAX_LIMIT, 0)))
}

async fn list_related(
    State(gateway): State<Shared>,
    Path((id, relation)): Path<(u64, String)>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Envelope<Related>>, GatewayError> {
    gateway.admit(&params)?;
    let relation = Relation::parse(&relation)
        .ok_or_else(|| GatewayError::NotFound(format!("{relation} is not a character relation")))?;
    reject_unknown(&params, &[])?;
    let (limit, offset) = paging(&params)?;
    let character = gateway.find(id)?;
    Ok(Json(page(catalog::related(character, relation), limit, offset)))
}

impl Gateway {
    /// Count the call, then check throttling and the request signature.
    fn admit(&self, params: &HashMap<String, String>) -> Result<(), GatewayError> {
        let served = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.config.call_budget.is_some_and(|budget| served > budget) {
            tracing::warn!(served, "call budget exhausted");
            return Err(GatewayError::Throttled);
        }

        let ts = required(params, "ts", "You must provide a timestamp.")?;
        let apikey = required(params, "apikey", "You must provide a user key.")?;
        let hash = required(params, "hash", "You must provide a hash.")?;

        if apikey != self.config.public_key {
            return Err(GatewayError::InvalidCredentials(
                "The passed API key is invalid.".to_string(),
            ));
        }
        if hash != signature(ts, &self.config.private_key, &self.config.public_key) {
            return Err(GatewayError::InvalidCredentials(
                "That hash, timestamp and key combination is invalid.".to_string(),
            ));
        }
        Ok(())
    }

    fn find(&self, id: u64) -> Result<&Character, GatewayError> {
        self.characters
            .iter()
            .find(|c| c.id == id)
            .ok_or_else(|| GatewayError::NotFound("We couldn't find that character".to_string()))
    }
}

/// Lowercase hex MD5 of `ts + private + public`.
pub fn signature(ts: &str, private_key: &str, public_key: &str) -> String {
    let mut hasher = Md5::new();
    hasher.update(ts.as_bytes());
    hasher.update(private_key.as_bytes());
    hasher.update(public_key.as_bytes());
    format!("{:x}", hasher.finalize())
}

fn required<'a>(
    params: &'a HashMap<String, String>,
    key: &str,
    message: &str,
) -> Result<&'a str, GatewayError> {
    params
        .get(key)
        .map(String::as_str)
        .ok_or_else(|| GatewayError::MissingParameter(message.to_string()))
}

fn reject_unknown(params: &HashMap<String, String>, filters: &[&str]) -> Result<(), GatewayError> {
    let mut keys: Vec<&String> = params.keys().collect();
    keys.sort();
    for key in keys {
        let known = AUTH_KEYS.contains(&key.as_str())
            || PAGING_KEYS.contains(&key.as_str())
            || filters.contains(&key.as_str());
        if !known {
            return Err(GatewayError::Conflict(format!(
                "We don't recognize the parameter {key}"
            )));
        }
    }
    Ok(())
}

fn paging(params: &HashMap<String, String>) -> Result<(usize, usize), GatewayError> {
    let limit = match params.get("limit") {
        None => DEFAULT_LIMIT,
        Some(raw) => raw.parse::<usize>().map_err(|_| {
            GatewayError::Conflict("You must pass an integer limit greater than 0.".to_string())
        })?,
    };
    if limit == 0 {
        return Err(GatewayError::Conflict(
            "You must pass an integer limit greater than 0.".to_string(),
        ));
    }
    if limit > MAX_LIMIT {
        return Err(GatewayError::Conflict(
            "You may not request more than 100 items.".to_string(),
        ));
    }
    let offset = match params.get("offset") {
        None => 0,
        Some(raw) => raw
            .parse::<usize>()
            .map_err(|_| GatewayError::Conflict("You must pass an integer offset.".to_string()))?,
    };
    Ok((limit, offset))
}

fn page<T>(items: Vec<T>, limit: usize, offset: usize) -> Envelope<T> {
    let total = items.len();
    let results: Vec<T> = items.into_iter().skip(offset).take(limit).collect();
    Envelope {
        code: 200,
        status: "Ok".to_string(),
        attribution_text: ATTRIBUTION.to_string(),
        data: DataContainer {
            offset,
            limit,
            total,
            count: results.len(),
            results,
        },
    }
}
