//! Per-request authentication fragment.
//!
//! The gateway authenticates server-side clients with three query
//! parameters: a timestamp, the public key, and the lowercase hex MD5 of
//! `timestamp + private_key + public_key`. A new signature is computed for
//! every request.

use chrono::{Local, NaiveDateTime};
use md5::{Digest, Md5};

use crate::config::Credentials;

/// `strftime` pattern of the `ts` parameter, e.g. `2024-01-0212:30:45`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d%H:%M:%S";

/// Timestamp, public key and hash for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub ts: String,
    pub apikey: String,
    pub hash: String,
}

impl Signature {
    /// Sign with the current local wall-clock time.
    pub fn now(credentials: &Credentials) -> Self {
        Self::at(credentials, Local::now().naive_local())
    }

    /// Sign with a fixed time.
    pub fn at(credentials: &Credentials, time: NaiveDateTime) -> Self {
        Self::with_timestamp(credentials, time.format(TIMESTAMP_FORMAT).to_string())
    }

    /// Sign with a preformatted `ts` value.
    pub fn with_timestamp(credentials: &Credentials, ts: String) -> Self {
        let mut hasher = Md5::new();
        hasher.update(ts.as_bytes());
        hasher.update(credentials.private_key().as_bytes());
        hasher.update(credentials.public_key().as_bytes());
        let hash = format!("{:x}", hasher.finalize());
        Self {
            ts,
            apikey: credentials.public_key().to_string(),
            hash,
        }
    }

    /// `?ts=...&apikey=...&hash=...`, the first part of every query string.
    pub fn query_fragment(&self) -> String {
        format!("?ts={}&apikey={}&hash={}", self.ts, self.apikey, self.hash)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn hash_matches_documented_example() {
        let credentials = Credentials::new("1234", "abcd");
        let signature = Signature::with_timestamp(&credentials, "1".to_string());
        assert_eq!(signature.hash, "ffd275c5130566a2916217b101f26150");
        assert_eq!(signature.apikey, "1234");
    }

    #[test]
    fn timestamp_has_no_separator_between_date_and_time() {
        let credentials = Credentials::new("public", "private");
        let time = NaiveDate::from_ymd_opt(2016, 3, 4)
            .unwrap()
            .and_hms_opt(13, 5, 9)
            .unwrap();
        let signature = Signature::at(&credentials, time);
        assert_eq!(signature.ts, "2016-03-0413:05:09");
        assert_eq!(signature.hash, "759d37efdc07d12968430670fc5e05e6");
    }

    #[test]
    fn query_fragment_layout() {
        let credentials = Credentials::new("1234", "abcd");
        let signature = Signature::with_timestamp(&credentials, "1".to_string());
        assert_eq!(
            signature.query_fragment(),
            "?ts=1&apikey=1234&hash=ffd275c5130566a2916217b101f26150"
        );
    }

    #[test]
    fn now_uses_current_format() {
        let credentials = Credentials::new("public", "private");
        let signature = Signature::now(&credentials);
        assert_eq!(signature.ts.len(), "2016-03-0413:05:09".len());
        assert!(NaiveDateTime::parse_from_str(&signature.ts, TIMESTAMP_FORMAT).is_ok());
        assert_eq!(signature.hash.len(), 32);
        assert!(signature.hash.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }
}
