//! Credentials and client configuration.
//!
//! Everything here is fixed once the client is built. The page limit is the
//! only validated field: it must be an integer in `1..=100`, given either as
//! a number or as an integer-like string.

use std::fmt;
use std::str::FromStr;

use crate::error::ApiError;

/// Public gateway path of the Marvel API.
pub const DEFAULT_BASE_URL: &str = "http://gateway.marvel.com/v1/public";

/// Items per page when no limit is given.
pub const DEFAULT_LIMIT: u32 = 10;

/// Largest page the gateway will serve.
pub const MAX_LIMIT: u32 = 100;

/// API key pair used to sign every request.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    public_key: String,
    private_key: String,
}

impl Credentials {
    pub fn new(public_key: impl Into<String>, private_key: impl Into<String>) -> Self {
        Self {
            public_key: public_key.into(),
            private_key: private_key.into(),
        }
    }

    /// Read the key pair from `MARVEL_PUBLIC_KEY` and `MARVEL_PRIVATE_KEY`.
    pub fn from_env() -> Result<Self, ApiError> {
        Ok(Self::new(
            required_env("MARVEL_PUBLIC_KEY")?,
            required_env("MARVEL_PRIVATE_KEY")?,
        ))
    }

    pub fn public_key(&self) -> &str {
        &self.public_key
    }

    pub fn private_key(&self) -> &str {
        &self.private_key
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("public_key", &self.public_key)
            .field("private_key", &"<redacted>")
            .finish()
    }
}

/// Number of items requested per page, always within `1..=MAX_LIMIT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PageLimit(u32);

impl PageLimit {
    pub fn new(limit: i64) -> Result<Self, ApiError> {
        if limit > i64::from(MAX_LIMIT) {
            return Err(ApiError::InvalidConfiguration(format!(
                "limit {limit} is greater than {MAX_LIMIT}"
            )));
        }
        if limit < 1 {
            return Err(ApiError::InvalidConfiguration(format!(
                "limit {limit} must be at least 1"
            )));
        }
        Ok(Self(limit as u32))
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for PageLimit {
    fn default() -> Self {
        Self(DEFAULT_LIMIT)
    }
}

impl fmt::Display for PageLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PageLimit {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let limit: i64 = s
            .trim()
            .parse()
            .map_err(|_| ApiError::InvalidConfiguration(format!("limit must be an integer, got {s:?}")))?;
        Self::new(limit)
    }
}

impl TryFrom<&str> for PageLimit {
    type Error = ApiError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl TryFrom<String> for PageLimit {
    type Error = ApiError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl TryFrom<i32> for PageLimit {
    type Error = ApiError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(i64::from(value))
    }
}

impl TryFrom<i64> for PageLimit {
    type Error = ApiError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<u32> for PageLimit {
    type Error = ApiError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(i64::from(value))
    }
}

/// Where to send requests and how many items to ask for per page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    base_url: String,
    limit: PageLimit,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            limit: PageLimit::default(),
        }
    }
}

impl ClientConfig {
    /// Build a configuration, rejecting limits that are not integers in
    /// `1..=100`.
    pub fn new<L>(base_url: &str, limit: L) -> Result<Self, ApiError>
    where
        L: TryInto<PageLimit, Error = ApiError>,
    {
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            limit: limit.try_into()?,
        })
    }

    /// Default gateway with the given limit.
    pub fn with_limit<L>(limit: L) -> Result<Self, ApiError>
    where
        L: TryInto<PageLimit, Error = ApiError>,
    {
        Self::new(DEFAULT_BASE_URL, limit)
    }

    /// Read `MARVEL_BASE_URL` and `MARVEL_LIMIT`, falling back to the
    /// defaults for whichever is unset.
    pub fn from_env() -> Result<Self, ApiError> {
        let base_url = std::env::var("MARVEL_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        match std::env::var("MARVEL_LIMIT") {
            Ok(limit) => Self::new(&base_url, limit),
            Err(_) => Self::new(&base_url, DEFAULT_LIMIT),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn limit(&self) -> PageLimit {
        self.limit
    }
}

fn required_env(name: &str) -> Result<String, ApiError> {
    std::env::var(name).map_err(|_| ApiError::InvalidConfiguration(format!("{name} is not set")))
}
