//! Fetch service: request building, response validation and decoding.
//!
//! # Design
//! `FriendsClient` holds only the configured `Endpoints`. Each fetch is split
//! into a `build_*` method that produces an `HttpRequest` and a `parse_*`
//! method that consumes an `HttpResponse`, so a native host can run the
//! round-trip itself. The `fetch_*` conveniences join the two halves over a
//! `Transport` for callers that let the crate do the I/O.
//!
//! Validation runs in a fixed order: the status must be a real HTTP status,
//! then a 2xx, then the body must be non-empty, then it must decode.

use tracing::debug;
use url::Url;

use crate::config::{Endpoints, Scenario};
use crate::error::FetchError;
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::Transport;
use crate::types::{Friend, FriendRecord, FriendsEnvelope, UserEnvelope, UserProfile};

/// Stateless client for the friends fixture endpoints.
#[derive(Debug, Clone, Default)]
pub struct FriendsClient {
    endpoints: Endpoints,
}

impl FriendsClient {
    pub fn new(endpoints: Endpoints) -> Self {
        Self { endpoints }
    }

    /// Build a `GET` for an arbitrary endpoint.
    ///
    /// The endpoint must be an absolute `http` or `https` URL.
    pub fn build_fetch(&self, endpoint: &str) -> Result<HttpRequest, FetchError> {
        let url = Url::parse(endpoint).map_err(|_| FetchError::InvalidUrl(endpoint.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(FetchError::InvalidUrl(endpoint.to_string()));
        }
        debug!(endpoint, "built fetch request");
        Ok(HttpRequest {
            url: endpoint.to_string(),
            headers: vec![("accept".to_string(), "application/json".to_string())],
        })
    }

    /// Build the request(s) a scenario needs, in merge order.
    pub fn build_fetch_friends(&self, scenario: Scenario) -> Result<Vec<HttpRequest>, FetchError> {
        scenario
            .endpoints(&self.endpoints)
            .into_iter()
            .map(|endpoint| self.build_fetch(endpoint))
            .collect()
    }

    pub fn build_fetch_user(&self) -> Result<HttpRequest, FetchError> {
        self.build_fetch(&self.endpoints.user)
    }

    /// Validate a friends response and return its raw records.
    pub fn parse_friend_records(&self, response: HttpResponse) -> Result<Vec<FriendRecord>, FetchError> {
        check_response(&response)?;
        let envelope: FriendsEnvelope =
            serde_json::from_str(&response.body).map_err(|e| FetchError::Decoding(e.to_string()))?;
        Ok(envelope.response)
    }

    /// Validate a friends response and map its records to domain friends.
    pub fn parse_friends(&self, response: HttpResponse) -> Result<Vec<Friend>, FetchError> {
        let records = self.parse_friend_records(response)?;
        Ok(records.into_iter().map(Friend::from).collect())
    }

    /// Validate a user response and return the first profile in it.
    pub fn parse_user_profile(&self, response: HttpResponse) -> Result<UserProfile, FetchError> {
        check_response(&response)?;
        let envelope: UserEnvelope =
            serde_json::from_str(&response.body).map_err(|e| FetchError::Decoding(e.to_string()))?;
        envelope
            .response
            .into_iter()
            .next()
            .map(UserProfile::from)
            .ok_or(FetchError::EmptyData)
    }

    /// Fetch one endpoint and return its raw records.
    pub async fn fetch_records<T>(&self, transport: &T, endpoint: &str) -> Result<Vec<FriendRecord>, FetchError>
    where
        T: Transport + ?Sized,
    {
        let request = self.build_fetch(endpoint)?;
        let response = transport.execute(request).await?;
        self.parse_friend_records(response)
    }

    /// Execute an already-built friends request and map the result.
    pub async fn fetch_friends<T>(&self, transport: &T, request: HttpRequest) -> Result<Vec<Friend>, FetchError>
    where
        T: Transport + ?Sized,
    {
        let url = request.url.clone();
        let response = transport.execute(request).await?;
        debug!(url = %url, status = response.status, bytes = response.body.len(), "received response");
        self.parse_friends(response)
    }

    pub async fn fetch_user_profile<T>(&self, transport: &T) -> Result<UserProfile, FetchError>
    where
        T: Transport + ?Sized,
    {
        let request = self.build_fetch_user()?;
        let response = transport.execute(request).await?;
        self.parse_user_profile(response)
    }
}

/// Map a response that cannot carry a friends payload to a `FetchError`.
fn check_response(response: &HttpResponse) -> Result<(), FetchError> {
    if !(100..=599).contains(&response.status) {
        return Err(FetchError::InvalidResponse(format!(
            "status {} is not an HTTP status code",
            response.status
        )));
    }
    if !(200..300).contains(&response.status) {
        return Err(FetchError::HttpStatus(response.status));
    }
    if response.body.is_empty() {
        return Err(FetchError::EmptyData);
    }
    Ok(())
}
