//! Shared fixtures for controller integration tests

#![allow(dead_code)]

use mailview::api::{API_PREFIX, LocalBoxFuture};
use mailview::{
    ApiError, InMemoryPage, MemoryHistory, QueryController, RawResponse, ResponseOrdering,
    Transport, ViewerConfig,
};
use serde_json::Value;
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;
use tokio::sync::oneshot;

/// Transport whose responses are released by the test, in any order
#[derive(Default)]
pub struct GatedTransport {
    requests: RefCell<Vec<String>>,
    pending: RefCell<HashMap<String, VecDeque<oneshot::Sender<RawResponse>>>>,
}

impl GatedTransport {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Endpoints requested so far, in issue order
    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }

    /// Settle the oldest outstanding request for `endpoint`
    pub fn respond(&self, endpoint: &str, response: RawResponse) {
        let sender = self
            .pending
            .borrow_mut()
            .get_mut(endpoint)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| panic!("no outstanding request for {}", endpoint));
        sender.send(response).expect("request future dropped");
    }

    pub fn respond_json(&self, endpoint: &str, value: Value) {
        self.respond(endpoint, RawResponse::new(200, value.to_string()));
    }
}

impl Transport for GatedTransport {
    fn get(&self, path: &str) -> LocalBoxFuture<'static, Result<RawResponse, ApiError>> {
        let endpoint = path.strip_prefix(API_PREFIX).unwrap_or(path).to_string();
        self.requests.borrow_mut().push(endpoint.clone());

        let (tx, rx) = oneshot::channel();
        self.pending
            .borrow_mut()
            .entry(endpoint)
            .or_default()
            .push_back(tx);

        Box::pin(async move {
            rx.await
                .map_err(|_| ApiError::Transport("gate closed".to_string()))
        })
    }
}

pub struct Harness {
    pub controller: QueryController,
    pub transport: Rc<GatedTransport>,
    pub page: Rc<InMemoryPage>,
    pub history: Rc<MemoryHistory>,
}

pub fn harness(url: &str) -> Harness {
    harness_with(url, ResponseOrdering::default())
}

pub fn harness_with(url: &str, ordering: ResponseOrdering) -> Harness {
    let transport = GatedTransport::new();
    let page = Rc::new(InMemoryPage::new());
    let history = Rc::new(MemoryHistory::new(url));
    let config = ViewerConfig {
        response_ordering: ordering,
        ..Default::default()
    };
    let controller = QueryController::new(transport.clone(), page.clone(), history.clone(), &config);
    Harness {
        controller,
        transport,
        page,
        history,
    }
}
