//! Verify signing, request building and response parsing against the JSON
//! test vectors stored in `test-vectors/`.
//!
//! Each vector file describes inputs and the expected URL, hash, result or
//! error. Error expectations name the `ApiError` / `EmptyPage` variant.

use chrono::NaiveDateTime;
use marvel_core::{
    ApiError, Character, ClientConfig, Credentials, EmptyPage, HttpResponse, MarvelClient, QueryParams, Signature,
};
use serde_json::Value;

fn response(body: &Value) -> HttpResponse {
    HttpResponse {
        status: 200,
        headers: Vec::new(),
        body: body.to_string(),
    }
}

/// Name of the variant an error maps to in the vector files.
fn error_name(err: &ApiError) -> &'static str {
    match err {
        ApiError::InvalidConfiguration(_) => "InvalidConfiguration",
        ApiError::RateLimited(_) => "RateLimited",
        ApiError::InvalidParameters(_) => "InvalidParameters",
        ApiError::EmptyPage(EmptyPage::PastLastPage { .. }) => "PastLastPage",
        ApiError::EmptyPage(EmptyPage::IdNotFound { .. }) => "IdNotFound",
        ApiError::EmptyPage(EmptyPage::NameNotFound { .. }) => "NameNotFound",
        ApiError::InvalidPage(_) => "InvalidPage",
        ApiError::Upstream { .. } => "Upstream",
        ApiError::Transport(_) => "Transport",
        ApiError::Deserialization(_) => "Deserialization",
    }
}

// ---------------------------------------------------------------------------
// Signature
// ---------------------------------------------------------------------------

#[test]
fn signature_test_vectors() {
    let raw = include_str!("../../test-vectors/signature.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let credentials = Credentials::new(
            case["public_key"].as_str().unwrap(),
            case["private_key"].as_str().unwrap(),
        );
        let signature = Signature::with_timestamp(&credentials, case["ts"].as_str().unwrap().to_string());
        assert_eq!(signature.hash, case["expected_hash"].as_str().unwrap(), "{name}: hash");
        assert_eq!(signature.apikey, case["public_key"].as_str().unwrap(), "{name}: apikey");
    }
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

#[test]
fn request_test_vectors() {
    let raw = include_str!("../../test-vectors/requests.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let client = MarvelClient::new(
        Credentials::new(
            vectors["public_key"].as_str().unwrap(),
            vectors["private_key"].as_str().unwrap(),
        ),
        ClientConfig::new(
            vectors["base_url"].as_str().unwrap(),
            vectors["limit"].as_i64().unwrap(),
        )
        .unwrap(),
    );
    let time = NaiveDateTime::parse_from_str(vectors["time"].as_str().unwrap(), "%Y-%m-%dT%H:%M:%S").unwrap();
    let signature = vectors["signature"].as_str().unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let page = case["page"].as_u64().map(|p| p as u32);
        let params: QueryParams = case["params"]
            .as_array()
            .unwrap()
            .iter()
            .map(|pair| (pair[0].as_str().unwrap(), pair[1].as_str().unwrap().to_string()))
            .collect();

        let req = client
            .build_request_at(case["path"].as_str().unwrap(), page, &params, time)
            .unwrap();
        let expected = case["expected_url"].as_str().unwrap().replace("{signature}", signature);
        assert_eq!(req.url, expected, "{name}: url");
    }
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

#[test]
fn response_test_vectors() {
    let raw = include_str!("../../test-vectors/responses.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let client = MarvelClient::with_keys("public", "private", vectors["limit"].as_i64().unwrap()).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let response = response(&case["body"]);

        match case["operation"].as_str().unwrap() {
            "list" => {
                let page = case["page"].as_u64().unwrap() as u32;
                match client.parse_list::<Character>(&response, page) {
                    Ok(result) => {
                        let expected = &case["expected_result"];
                        assert_eq!(u64::from(result.last_page), expected["last_page"].as_u64().unwrap(), "{name}: last_page");
                        assert_eq!(result.results.len() as u64, expected["count"].as_u64().unwrap(), "{name}: count");
                    }
                    Err(err) => {
                        assert_eq!(Some(error_name(&err)), case["expected_error"].as_str(), "{name}: error {err}");
                        if let Some(last_page) = case.get("expected_last_page") {
                            assert_eq!(err.last_page().map(u64::from), last_page.as_u64(), "{name}: last_page");
                        }
                    }
                }
            }
            "detail_by_id" => {
                let id = case["id"].as_u64().unwrap();
                match client.parse_detail_by_id::<Character>(&response, id) {
                    Ok(detail) => {
                        let character = detail.result.unwrap();
                        assert_eq!(character.name, case["expected_result"]["name"].as_str().unwrap(), "{name}");
                    }
                    Err(err) => {
                        assert_eq!(Some(error_name(&err)), case["expected_error"].as_str(), "{name}: error {err}");
                    }
                }
            }
            "detail_by_name" => {
                let lookup = case["lookup"].as_str().unwrap();
                match client.parse_detail_by_name::<Character>(&response, lookup) {
                    Ok(detail) => {
                        let character = detail.result.unwrap();
                        assert_eq!(character.name, case["expected_result"]["name"].as_str().unwrap(), "{name}");
                    }
                    Err(err) => {
                        assert_eq!(Some(error_name(&err)), case["expected_error"].as_str(), "{name}: error {err}");
                    }
                }
            }
            other => panic!("{name}: unknown operation {other}"),
        }
    }
}
