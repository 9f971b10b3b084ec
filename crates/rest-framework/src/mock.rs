//! # Mock Store & Testing Guide
//!
//! `MockClient<T>` hands out a real [`ResourceClient<T>`] whose requests are answered from a
//! queue of scripted expectations instead of a store. Use it to test pipeline stages and
//! domain clients without spawning a [`ResourceActor`](crate::ResourceActor).
//!
//! ## When to use Mocks vs Real Actors
//!
//! | Feature | MockClient | Real Actor |
//! |---------|------------|------------|
//! | **Speed** | Instant (in-memory) | Fast (but involves tokio spawn) |
//! | **Determinism** | 100% Deterministic | Subject to scheduler |
//! | **State** | No real state (expectations) | Real state management |
//! | **Use Case** | Testing logic *around* the client | Testing the store or the full service |
//! | **Error Injection** | Easy (`return_err`) | Hard (requires specific state) |
//!
//! ## Example
//!
//! ```rust
//! use rest_framework::mock::MockClient;
//! use rest_framework::{FrameworkError, Record};
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut mock = MockClient::<Record>::new();
//!     mock.expect_get("missing".to_string()).return_ok(None);
//!     mock.expect_delete("missing".to_string())
//!         .return_err(FrameworkError::NotFound("missing".into()));
//!
//!     let client = mock.client();
//!     assert!(client.get("missing".to_string()).await.unwrap().is_none());
//!     assert!(client.delete("missing".to_string()).await.is_err());
//!
//!     mock.verify();
//! }
//! ```
//!
//! Requests are matched strictly in order. A request that doesn't match the next expectation
//! (wrong operation or wrong id) is dropped unanswered, so the caller sees
//! [`FrameworkError::ActorDropped`], and [`MockClient::verify`] reports the mismatch.

use crate::client::ResourceClient;
use crate::entity::ResourceEntity;
use crate::error::FrameworkError;
use crate::message::ResourceRequest;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

/// One scripted reply.
enum Expectation<T: ResourceEntity> {
    Create(Result<T, FrameworkError>),
    List(Result<Vec<T>, FrameworkError>),
    Get(T::Id, Result<Option<T>, FrameworkError>),
    Update(T::Id, Result<T, FrameworkError>),
    Delete(T::Id, Result<T, FrameworkError>),
}

struct Script<T: ResourceEntity> {
    pending: VecDeque<Expectation<T>>,
    mismatches: Vec<String>,
}

type Shared<T> = Arc<Mutex<Script<T>>>;

/// A mock client with expectation tracking for fluent testing.
pub struct MockClient<T: ResourceEntity> {
    client: ResourceClient<T>,
    script: Shared<T>,
    _handle: tokio::task::JoinHandle<()>,
}

impl<T: ResourceEntity> Default for MockClient<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ResourceEntity> MockClient<T> {
    /// Creates a new mock client with no expectations. Must be called inside a tokio runtime.
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::channel::<ResourceRequest<T>>(100);
        let script: Shared<T> = Arc::new(Mutex::new(Script {
            pending: VecDeque::new(),
            mismatches: Vec::new(),
        }));
        let shared = script.clone();

        let handle = tokio::spawn(async move {
            while let Some(request) = receiver.recv().await {
                let mut script = shared.lock().expect("mock script poisoned");
                let expectation = script.pending.pop_front();

                match (request, expectation) {
                    (ResourceRequest::Create { respond_to, .. }, Some(Expectation::Create(r))) => {
                        let _ = respond_to.send(r);
                    }
                    (ResourceRequest::List { respond_to }, Some(Expectation::List(r))) => {
                        let _ = respond_to.send(r);
                    }
                    (ResourceRequest::Get { id, respond_to }, Some(Expectation::Get(want, r)))
                        if id == want =>
                    {
                        let _ = respond_to.send(r);
                    }
                    (
                        ResourceRequest::Update { id, respond_to, .. },
                        Some(Expectation::Update(want, r)),
                    ) if id == want => {
                        let _ = respond_to.send(r);
                    }
                    (ResourceRequest::Delete { id, respond_to }, Some(Expectation::Delete(want, r)))
                        if id == want =>
                    {
                        let _ = respond_to.send(r);
                    }
                    (request, _) => {
                        script
                            .mismatches
                            .push(format!("unexpected request: {request:?}"));
                    }
                }
            }
        });

        Self {
            client: ResourceClient::new(sender),
            script,
            _handle: handle,
        }
    }

    /// Returns the client for use in tests.
    pub fn client(&self) -> ResourceClient<T> {
        self.client.clone()
    }

    pub fn expect_create(&mut self) -> ExpectationBuilder<T, T> {
        self.builder(Box::new(Expectation::Create))
    }

    pub fn expect_list(&mut self) -> ExpectationBuilder<T, Vec<T>> {
        self.builder(Box::new(Expectation::List))
    }

    pub fn expect_get(&mut self, id: T::Id) -> ExpectationBuilder<T, Option<T>> {
        self.builder(Box::new(move |r| Expectation::Get(id, r)))
    }

    pub fn expect_update(&mut self, id: T::Id) -> ExpectationBuilder<T, T> {
        self.builder(Box::new(move |r| Expectation::Update(id, r)))
    }

    pub fn expect_delete(&mut self, id: T::Id) -> ExpectationBuilder<T, T> {
        self.builder(Box::new(move |r| Expectation::Delete(id, r)))
    }

    fn builder<R>(&self, make: Wrap<T, R>) -> ExpectationBuilder<T, R> {
        ExpectationBuilder {
            script: self.script.clone(),
            make,
        }
    }

    /// Panics unless every expectation was consumed and no request went unmatched.
    pub fn verify(&self) {
        let script = self.script.lock().expect("mock script poisoned");
        if !script.mismatches.is_empty() {
            panic!("Mock received unexpected requests: {:?}", script.mismatches);
        }
        if !script.pending.is_empty() {
            panic!("Not all expectations were met. {} remaining", script.pending.len());
        }
    }
}

type Wrap<T, R> = Box<dyn FnOnce(Result<R, FrameworkError>) -> Expectation<T> + Send>;

/// Builder returned by the `expect_*` methods.
pub struct ExpectationBuilder<T: ResourceEntity, R> {
    script: Shared<T>,
    make: Wrap<T, R>,
}

impl<T: ResourceEntity, R> ExpectationBuilder<T, R> {
    /// Sets the expectation to return a successful result.
    pub fn return_ok(self, value: R) {
        self.push(Ok(value));
    }

    /// Sets the expectation to return an error.
    pub fn return_err(self, error: FrameworkError) {
        self.push(Err(error));
    }

    fn push(self, response: Result<R, FrameworkError>) {
        let mut script = self.script.lock().expect("mock script poisoned");
        script.pending.push_back((self.make)(response));
    }
}
