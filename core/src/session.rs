//! Load/search lifecycle for one friends-list scenario.
//!
//! # Design
//! A `FriendsSession` owns the last fetched snapshot and the current
//! `DisplayState`, and every mutation goes through `&mut self`. Each state it
//! produces is also sent on a broadcast channel, so a renderer can follow the
//! session without holding a reference to it.
//!
//! Loads come in two flavours:
//! - `load_friends` does the I/O itself over a `Transport`. The two-endpoint
//!   scenario fetches both halves concurrently and fails on the first error.
//! - `begin_load` / `complete_load` / `fail_load` let a host run the HTTP
//!   round-trips. Each `begin_load` starts a new generation; completions
//!   carrying an older generation are dropped, so a superseded load cannot
//!   overwrite the state of a newer one.
//!
//! A failed load leaves an empty snapshot and publishes `Empty`, which renders
//! the same as a genuinely empty list. `SessionConfig::surface_errors` opts
//! into `DisplayState::Failed` instead.

use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::client::FriendsClient;
use crate::config::{Scenario, SessionConfig};
use crate::error::FetchError;
use crate::http::{HttpRequest, HttpResponse};
use crate::merge::merge;
use crate::projection::{project, DisplayState};
use crate::search::search;
use crate::transport::Transport;
use crate::types::{Friend, UserProfile};

/// Buffered states per subscriber before the slowest one starts lagging.
pub const STATE_CHANNEL_CAPACITY: usize = 16;

/// The requests a host must execute to complete one load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadPlan {
    pub generation: u64,
    /// In merge order; responses must be handed back in the same order.
    pub requests: Vec<HttpRequest>,
}

#[derive(Debug, Clone, Copy)]
struct PendingLoad {
    generation: u64,
    expected: usize,
}

/// Orchestrates fetch, merge, search and projection for one scenario.
#[derive(Debug)]
pub struct FriendsSession {
    scenario: Scenario,
    client: FriendsClient,
    surface_errors: bool,
    generation: u64,
    pending: Option<PendingLoad>,
    snapshot: Vec<Friend>,
    state: DisplayState,
    events: broadcast::Sender<DisplayState>,
}

impl FriendsSession {
    pub fn new(config: SessionConfig) -> Self {
        let (events, _) = broadcast::channel(STATE_CHANNEL_CAPACITY);
        Self {
            scenario: config.scenario,
            client: FriendsClient::new(config.endpoints),
            surface_errors: config.surface_errors,
            generation: 0,
            pending: None,
            snapshot: Vec::new(),
            state: DisplayState::Loading,
            events,
        }
    }

    pub fn scenario(&self) -> Scenario {
        self.scenario
    }

    pub fn state(&self) -> &DisplayState {
        &self.state
    }

    /// The unfiltered friends of the last successful load.
    pub fn snapshot(&self) -> &[Friend] {
        &self.snapshot
    }

    /// Receive every state published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<DisplayState> {
        self.events.subscribe()
    }

    /// Fetch the scenario's endpoint(s) and publish the projected result.
    ///
    /// Publishes `Loading` first. Never returns an error; failures settle the
    /// session as described in the module docs.
    pub async fn load_friends<T>(&mut self, transport: &T)
    where
        T: Transport + ?Sized,
    {
        let Ok(plan) = self.begin_load() else {
            return;
        };
        let outcome = self.fetch_all(transport, plan.requests).await;
        self.settle(plan.generation, outcome);
    }

    /// Filter the last snapshot by `query` and publish the projection.
    ///
    /// Does not fetch. An empty query restores the unfiltered content.
    pub fn search_friends(&mut self, query: &str) {
        let matches = search(query, &self.snapshot);
        debug!(query, matches = matches.len(), "searched snapshot");
        self.publish(project(&matches));
    }

    /// Start a host-driven load: publish `Loading` and return the requests.
    ///
    /// If a request cannot be built the session settles immediately and the
    /// error is returned; there is nothing to complete.
    pub fn begin_load(&mut self) -> Result<LoadPlan, FetchError> {
        self.generation += 1;
        let generation = self.generation;
        self.publish(DisplayState::Loading);

        match self.client.build_fetch_friends(self.scenario) {
            Ok(requests) => {
                self.pending = Some(PendingLoad {
                    generation,
                    expected: requests.len(),
                });
                Ok(LoadPlan { generation, requests })
            }
            Err(err) => {
                self.pending = None;
                self.fail(err.clone());
                Err(err)
            }
        }
    }

    /// Finish a host-driven load with one response per planned request.
    ///
    /// Returns `false` when `generation` is not the load in flight, in which
    /// case nothing changes.
    pub fn complete_load(&mut self, generation: u64, responses: Vec<HttpResponse>) -> bool {
        let Some(pending) = self.pending.filter(|p| p.generation == generation) else {
            debug!(generation, "dropping stale load completion");
            return false;
        };

        let outcome: Result<Vec<Vec<Friend>>, FetchError> = if responses.len() == pending.expected {
            responses
                .into_iter()
                .map(|response| self.client.parse_friends(response))
                .collect()
        } else {
            Err(FetchError::InvalidResponse(format!(
                "expected {} responses, got {}",
                pending.expected,
                responses.len()
            )))
        };
        self.settle(generation, outcome)
    }

    /// Finish a host-driven load whose transport failed.
    pub fn fail_load(&mut self, generation: u64, error: FetchError) -> bool {
        self.settle(generation, Err(error))
    }

    /// Fetch the signed-in user's profile. Does not touch the display state.
    pub async fn load_user_profile<T>(&self, transport: &T) -> Result<UserProfile, FetchError>
    where
        T: Transport + ?Sized,
    {
        self.client.fetch_user_profile(transport).await.map_err(|err| {
            warn!(error = %err, "user profile fetch failed");
            err
        })
    }

    async fn fetch_all<T>(&self, transport: &T, requests: Vec<HttpRequest>) -> Result<Vec<Vec<Friend>>, FetchError>
    where
        T: Transport + ?Sized,
    {
        if let [first, second] = requests.as_slice() {
            let (first, second) = tokio::try_join!(
                self.client.fetch_friends(transport, first.clone()),
                self.client.fetch_friends(transport, second.clone()),
            )?;
            return Ok(vec![first, second]);
        }

        let mut lists = Vec::with_capacity(requests.len());
        for request in requests {
            lists.push(self.client.fetch_friends(transport, request).await?);
        }
        Ok(lists)
    }

    fn settle(&mut self, generation: u64, outcome: Result<Vec<Vec<Friend>>, FetchError>) -> bool {
        if self.pending.map(|p| p.generation) != Some(generation) {
            debug!(generation, "dropping stale load outcome");
            return false;
        }
        self.pending = None;

        match outcome {
            Ok(lists) => {
                self.snapshot = lists.into_iter().reduce(merge).unwrap_or_default();
                let state = project(&self.snapshot);
                self.publish(state);
            }
            Err(err) => self.fail(err),
        }
        true
    }

    fn fail(&mut self, err: FetchError) {
        warn!(scenario = ?self.scenario, error = %err, "friends load failed");
        self.snapshot.clear();
        let state = if self.surface_errors {
            DisplayState::Failed(err.kind())
        } else {
            DisplayState::Empty
        };
        self.publish(state);
    }

    fn publish(&mut self, state: DisplayState) {
        match &state {
            DisplayState::Content {
                received_invitations,
                friends,
            } => info!(
                invitations = received_invitations.len(),
                friends = friends.len(),
                "publishing content"
            ),
            other => info!(state = ?other, "publishing state"),
        }
        self.state = state.clone();
        // No subscribers is fine; `state()` still reflects the latest value.
        let _ = self.events.send(state);
    }
}
