//! Response envelopes and catalog entities.
//!
//! # Design
//! Every gateway response is wrapped in the same envelope: a `code` that is
//! an integer on normal responses and a string on authentication or
//! throttling failures, a human-readable `status` or `message`, and a
//! `data` container that is missing on errors. The entity structs keep the
//! fields callers usually need and collect everything else in `extra`, so
//! nothing the gateway sends is lost.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The envelope's `code`: HTTP-like number or symbolic string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseCode {
    Number(u16),
    Text(String),
}

impl ResponseCode {
    pub fn is(&self, code: u16) -> bool {
        matches!(self, ResponseCode::Number(n) if *n == code)
    }

    pub fn is_text(&self, text: &str) -> bool {
        matches!(self, ResponseCode::Text(t) if t == text)
    }
}

impl fmt::Display for ResponseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseCode::Number(n) => write!(f, "{n}"),
            ResponseCode::Text(t) => f.write_str(t),
        }
    }
}

/// Top-level wrapper of every gateway response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T> {
    pub code: ResponseCode,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub attribution_text: Option<String>,
    #[serde(default = "Option::default")]
    pub data: Option<DataContainer<T>>,
}

impl<T> Envelope<T> {
    /// `message` if present, else `status`, else empty.
    pub fn message_or_status(&self) -> String {
        self.message
            .as_deref()
            .or(self.status.as_deref())
            .unwrap_or_default()
            .to_string()
    }

    /// `status` if present, else `message`, else empty.
    pub fn status_text(&self) -> String {
        self.status
            .as_deref()
            .or(self.message.as_deref())
            .unwrap_or_default()
            .to_string()
    }
}

/// The `data` block of a successful response. `total` drives paging and
/// must be present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataContainer<T> {
    #[serde(default)]
    pub offset: u64,
    #[serde(default)]
    pub limit: u64,
    pub total: u64,
    #[serde(default)]
    pub count: u64,
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

/// One page of a list call.
#[derive(Debug, Clone, PartialEq)]
pub struct PagedResult<T> {
    pub code: u16,
    pub status: String,
    pub attribution_text: Option<String>,
    pub offset: u64,
    pub limit: u64,
    pub total: u64,
    pub count: u64,
    pub results: Vec<T>,
    pub page: u32,
    pub last_page: u32,
}

impl<T> PagedResult<T> {
    pub fn is_last_page(&self) -> bool {
        self.page >= self.last_page
    }
}

/// Result of a detail lookup: at most one item.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailResult<T> {
    pub code: u16,
    pub status: String,
    pub attribution_text: Option<String>,
    pub result: Option<T>,
}

/// Top-level catalog endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Characters,
    Comics,
    Creators,
    Events,
    Series,
    Stories,
}

impl Resource {
    pub fn as_str(self) -> &'static str {
        match self {
            Resource::Characters => "characters",
            Resource::Comics => "comics",
            Resource::Creators => "creators",
            Resource::Events => "events",
            Resource::Series => "series",
            Resource::Stories => "stories",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Image reference; the full URL is `{path}/{variant}.{extension}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    pub path: String,
    pub extension: String,
}

impl Image {
    pub fn url(&self, variant: &str) -> String {
        format!("{}/{variant}.{}", self.path, self.extension)
    }
}

/// Public web page for an entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Url {
    #[serde(rename = "type")]
    pub kind: String,
    pub url: String,
}

/// Fields the gateway sends that are not modeled explicitly.
pub type Extra = serde_json::Map<String, serde_json::Value>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub modified: Option<String>,
    #[serde(rename = "resourceURI", default)]
    pub resource_uri: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<Image>,
    #[serde(default)]
    pub urls: Vec<Url>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comic {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub issue_number: Option<f64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub modified: Option<String>,
    #[serde(rename = "resourceURI", default)]
    pub resource_uri: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<Image>,
    #[serde(default)]
    pub urls: Vec<Url>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
    #[serde(rename = "resourceURI", default)]
    pub resource_uri: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<Image>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Series {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub start_year: Option<i32>,
    #[serde(default)]
    pub end_year: Option<i32>,
    #[serde(rename = "resourceURI", default)]
    pub resource_uri: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<Image>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Story {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(rename = "resourceURI", default)]
    pub resource_uri: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_accepts_numbers_and_strings() {
        let code: ResponseCode = serde_json::from_str("409").unwrap();
        assert!(code.is(409));
        assert!(!code.is_text("409"));

        let code: ResponseCode = serde_json::from_str(r#""RequestThrottled""#).unwrap();
        assert!(code.is_text("RequestThrottled"));
        assert_eq!(code.to_string(), "RequestThrottled");
    }

    #[test]
    fn error_envelope_has_no_data() {
        let envelope: Envelope<Character> =
            serde_json::from_str(r#"{"code":"InvalidCredentials","message":"The passed API key is invalid."}"#)
                .unwrap();
        assert!(envelope.data.is_none());
        assert_eq!(envelope.message_or_status(), "The passed API key is invalid.");
    }

    #[test]
    fn status_text_prefers_status() {
        let envelope: Envelope<Character> =
            serde_json::from_str(r#"{"code":409,"status":"STATUS","message":"MSG"}"#).unwrap();
        assert_eq!(envelope.status_text(), "STATUS");
        assert_eq!(envelope.message_or_status(), "MSG");

        let envelope: Envelope<Character> = serde_json::from_str(r#"{"code":404,"message":"MSG"}"#).unwrap();
        assert_eq!(envelope.status_text(), "MSG");
    }

    #[test]
    fn data_without_total_is_rejected() {
        let result: Result<Envelope<u32>, _> =
            serde_json::from_str(r#"{"code":200,"status":"Ok","data":{"results":[1,2,3]}}"#);
        assert!(result.is_err());
    }

    #[test]
    fn character_keeps_unmodeled_fields() {
        let character: Character = serde_json::from_str(
            r#"{
                "id": 1011334,
                "name": "3-D Man",
                "description": "",
                "resourceURI": "http://gateway.marvel.com/v1/public/characters/1011334",
                "thumbnail": {"path": "http://i.annihil.us/u/prod/marvel/i/mg/c/e0/535fecbbb9784", "extension": "jpg"},
                "urls": [{"type": "detail", "url": "http://marvel.com/characters/74/3-d_man"}],
                "comics": {"available": 12}
            }"#,
        )
        .unwrap();
        assert_eq!(character.name, "3-D Man");
        assert_eq!(character.urls[0].kind, "detail");
        assert_eq!(
            character.thumbnail.unwrap().url("portrait_small"),
            "http://i.annihil.us/u/prod/marvel/i/mg/c/e0/535fecbbb9784/portrait_small.jpg"
        );
        assert_eq!(character.extra["comics"]["available"], 12);
    }

    #[test]
    fn story_requires_title() {
        let result: Result<Story, _> = serde_json::from_str(r#"{"id": 7}"#);
        assert!(result.is_err());
    }

    #[test]
    fn resource_paths() {
        assert_eq!(Resource::Characters.as_str(), "characters");
        assert_eq!(Resource::Series.to_string(), "series");
    }
}
