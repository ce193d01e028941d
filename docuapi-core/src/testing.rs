//! Test doubles shared across module tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;

use crate::auth::AuthenticatedClient;
use crate::config::Settings;
use crate::http::{HttpRequest, HttpResponse, HttpTransport, TransportError};
use crate::navigation::HistoryNavigator;
use crate::storage::MemoryStorage;

/// A scripted reply: a response, or a network failure.
pub(crate) enum Reply {
    Response(HttpResponse),
    NetworkError,
}

pub(crate) fn reply(status: u16, body: Value) -> Reply {
    Reply::Response(HttpResponse::json_body(
        StatusCode::from_u16(status).unwrap(),
        &body,
    ))
}

pub(crate) fn network_error() -> TransportError {
    // An unparsable URL fails inside reqwest without touching the network.
    reqwest::Client::new()
        .get("not a url")
        .build()
        .unwrap_err()
        .into()
}

type Handler = Box<dyn Fn(&HttpRequest) -> Reply + Send + Sync>;

/// Transport that records every request and answers from a script.
pub(crate) struct ScriptedTransport {
    handler: Handler,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    /// Answer with `replies` in order; panics when the script runs out.
    pub(crate) fn sequence(replies: Vec<Reply>) -> Arc<Self> {
        let queue = Mutex::new(VecDeque::from(replies));
        Self::with_handler(move |req| {
            queue
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| panic!("unexpected request: {} {}", req.method, req.url))
        })
    }

    pub(crate) fn with_handler(
        handler: impl Fn(&HttpRequest) -> Reply + Send + Sync + 'static,
    ) -> Arc<Self> {
        Arc::new(Self {
            handler: Box::new(handler),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub(crate) fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        // Suspend like a real network call so concurrent sends interleave.
        tokio::task::yield_now().await;
        let reply = (self.handler)(&request);
        self.requests.lock().unwrap().push(request);
        match reply {
            Reply::Response(res) => Ok(res),
            Reply::NetworkError => Err(network_error()),
        }
    }
}

/// Everything a client test needs to inspect afterwards.
pub(crate) struct Harness {
    pub(crate) client: AuthenticatedClient,
    pub(crate) transport: Arc<ScriptedTransport>,
    pub(crate) storage: MemoryStorage,
    pub(crate) navigator: Arc<HistoryNavigator>,
}

pub(crate) fn harness(
    transport: Arc<ScriptedTransport>,
    items: &[(&str, &str)],
    location: &str,
) -> Harness {
    let storage = MemoryStorage::with_items(items.iter().copied());
    let navigator = Arc::new(HistoryNavigator::new(location));
    let client = AuthenticatedClient::new(
        transport.clone(),
        Arc::new(storage.clone()),
        navigator.clone(),
        &Settings::default(),
    );
    Harness {
        client,
        transport,
        storage,
        navigator,
    }
}
