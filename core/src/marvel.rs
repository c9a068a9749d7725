//! One-call operations: build, send through a `Transport`, parse.
//!
//! `Marvel` owns a `MarvelClient` and a transport. Each method issues exactly
//! one blocking request. The character methods keep the names callers of the
//! gateway know (`characters_list`, `characters_comics`, ...); the generic
//! ones take a `Resource`.

use serde::de::DeserializeOwned;

use crate::client::MarvelClient;
use crate::error::ApiError;
use crate::http::{QueryParams, Transport, UreqTransport};
use crate::types::{Character, Comic, DetailResult, Event, PagedResult, Resource, Series, Story};

#[derive(Debug, Clone)]
pub struct Marvel<T = UreqTransport> {
    client: MarvelClient,
    transport: T,
}

impl Marvel<UreqTransport> {
    /// Use a default blocking `ureq` transport.
    pub fn new(client: MarvelClient) -> Self {
        Self::with_transport(client, UreqTransport::new())
    }
}

impl<T: Transport> Marvel<T> {
    pub fn with_transport(client: MarvelClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn client(&self) -> &MarvelClient {
        &self.client
    }

    // -----------------------------------------------------------------------
    // Generic operations
    // -----------------------------------------------------------------------

    pub fn list<R: DeserializeOwned>(
        &self,
        resource: Resource,
        page: u32,
        params: &QueryParams,
    ) -> Result<PagedResult<R>, ApiError> {
        let request = self.client.build_list(resource, page, params)?;
        let response = self.transport.send(&request)?;
        self.client.parse_list(&response, page)
    }

    pub fn detail_by_id<R: DeserializeOwned>(
        &self,
        resource: Resource,
        id: u64,
    ) -> Result<DetailResult<R>, ApiError> {
        let request = self.client.build_detail_by_id(resource, id)?;
        let response = self.transport.send(&request)?;
        self.client.parse_detail_by_id(&response, id)
    }

    pub fn detail_by_name<R: DeserializeOwned>(
        &self,
        resource: Resource,
        name: &str,
        params: &QueryParams,
    ) -> Result<DetailResult<R>, ApiError> {
        let request = self.client.build_detail_by_name(resource, name, params)?;
        let response = self.transport.send(&request)?;
        self.client.parse_detail_by_name(&response, name)
    }

    pub fn relation<R: DeserializeOwned>(
        &self,
        resource: Resource,
        id: u64,
        relation: Resource,
        page: u32,
        params: &QueryParams,
    ) -> Result<PagedResult<R>, ApiError> {
        let request = self.client.build_relation(resource, id, relation, page, params)?;
        let response = self.transport.send(&request)?;
        self.client.parse_list(&response, page)
    }

    // -----------------------------------------------------------------------
    // Characters
    // -----------------------------------------------------------------------

    pub fn characters_list(&self, page: u32, params: &QueryParams) -> Result<PagedResult<Character>, ApiError> {
        self.list(Resource::Characters, page, params)
    }

    pub fn characters_detail_by_name(
        &self,
        name: &str,
        params: &QueryParams,
    ) -> Result<DetailResult<Character>, ApiError> {
        self.detail_by_name(Resource::Characters, name, params)
    }

    pub fn characters_detail_by_id(&self, id: u64) -> Result<DetailResult<Character>, ApiError> {
        self.detail_by_id(Resource::Characters, id)
    }

    pub fn characters_comics(
        &self,
        id: u64,
        page: u32,
        params: &QueryParams,
    ) -> Result<PagedResult<Comic>, ApiError> {
        self.relation(Resource::Characters, id, Resource::Comics, page, params)
    }

    pub fn characters_events(
        &self,
        id: u64,
        page: u32,
        params: &QueryParams,
    ) -> Result<PagedResult<Event>, ApiError> {
        self.relation(Resource::Characters, id, Resource::Events, page, params)
    }

    pub fn characters_series(
        &self,
        id: u64,
        page: u32,
        params: &QueryParams,
    ) -> Result<PagedResult<Series>, ApiError> {
        self.relation(Resource::Characters, id, Resource::Series, page, params)
    }

    pub fn characters_stories(
        &self,
        id: u64,
        page: u32,
        params: &QueryParams,
    ) -> Result<PagedResult<Story>, ApiError> {
        self.relation(Resource::Characters, id, Resource::Stories, page, params)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use serde_json::json;

    use super::*;
    use crate::config::{ClientConfig, Credentials};
    use crate::error::EmptyPage;
    use crate::http::{HttpRequest, HttpResponse};

    /// Replays canned bodies and records the URLs it was asked for.
    struct Canned {
        bodies: RefCell<Vec<String>>,
        seen: RefCell<Vec<String>>,
    }

    impl Canned {
        fn new(bodies: Vec<serde_json::Value>) -> Self {
            Self {
                bodies: RefCell::new(bodies.into_iter().rev().map(|b| b.to_string()).collect()),
                seen: RefCell::new(Vec::new()),
            }
        }
    }

    impl Transport for Canned {
        fn send(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
            self.seen.borrow_mut().push(request.url.clone());
            let body = self
                .bodies
                .borrow_mut()
                .pop()
                .ok_or_else(|| ApiError::Transport("no canned response left".to_string()))?;
            Ok(HttpResponse {
                status: 200,
                headers: Vec::new(),
                body,
            })
        }
    }

    fn marvel(transport: &Canned) -> Marvel<&Canned> {
        let client = MarvelClient::new(
            Credentials::new("pub", "priv"),
            ClientConfig::new("http://gateway.test/v1/public", 10u32).unwrap(),
        );
        Marvel::with_transport(client, transport)
    }

    #[test]
    fn characters_comics_hits_relation_path() {
        let transport = Canned::new(vec![json!({
            "code": 200,
            "status": "Ok",
            "data": {"offset": 0, "limit": 10, "total": 1, "count": 1, "results": [{"id": 1, "title": "Hulk (2008) #1"}]}
        })]);
        let page = marvel(&transport)
            .characters_comics(1009351, 1, &QueryParams::new())
            .unwrap();
        assert_eq!(page.results[0].title, "Hulk (2008) #1");
        assert_eq!(page.last_page, 1);
        assert!(transport.seen.borrow()[0].starts_with("http://gateway.test/v1/public/characters/1009351/comics?ts="));
    }

    #[test]
    fn each_call_signs_its_own_request() {
        let ok = json!({"code": 200, "status": "Ok", "data": {"total": 0, "results": []}});
        let transport = Canned::new(vec![ok.clone(), ok]);
        let m = marvel(&transport);
        m.characters_list(1, &QueryParams::new()).unwrap();
        m.characters_list(1, &QueryParams::new().with("orderBy", "name")).unwrap();

        let seen = transport.seen.borrow();
        assert!(seen[0].ends_with("&limit=10&offset=0"));
        assert!(seen[1].ends_with("&limit=10&offset=0&orderBy=name"));
    }

    #[test]
    fn detail_by_name_missing_is_empty_page() {
        let transport = Canned::new(vec![json!({"code": 200, "status": "Ok", "data": {"total": 0, "results": []}})]);
        let err = marvel(&transport)
            .characters_detail_by_name("Professor Y", &QueryParams::new())
            .unwrap_err();
        assert!(matches!(err, ApiError::EmptyPage(EmptyPage::NameNotFound { .. })));
    }

    #[test]
    fn transport_errors_surface_unchanged() {
        let transport = Canned::new(Vec::new());
        let err = marvel(&transport).characters_detail_by_id(1).unwrap_err();
        assert!(matches!(err, ApiError::Transport(ref m) if m == "no canned response left"));
    }
}
