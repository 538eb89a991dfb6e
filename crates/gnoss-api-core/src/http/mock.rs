//! Scripted transport for unit tests

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use url::Url;

use crate::client::GnossClient;
use crate::error::{Result, TransportError};

use super::oauth::RequestSigner;
use super::transport::{HttpMethod, HttpRequest, HttpResponse, HttpTransport};

pub(crate) const TEST_BASE_URL: &str = "https://api.gnoss.test/";

#[derive(Debug, Clone)]
enum Reply {
    Response(HttpResponse),
    ConnectionError,
}

/// Replies are queued per route; the last one repeats once the queue
/// is down to a single entry. Unknown routes answer 404.
#[derive(Default)]
pub(crate) struct MockTransport {
    routes: Mutex<HashMap<(HttpMethod, String), VecDeque<Reply>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockTransport {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn reply(&self, method: HttpMethod, path: &str, status: u16, body: &str) {
        self.push(
            method,
            path,
            Reply::Response(HttpResponse {
                status,
                body: body.to_string(),
            }),
        );
    }

    pub(crate) fn fail_connection(&self, method: HttpMethod, path: &str) {
        self.push(method, path, Reply::ConnectionError);
    }

    pub(crate) fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn requests_to(&self, path: &str) -> Vec<HttpRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.url.path().trim_start_matches('/') == path)
            .collect()
    }

    fn push(&self, method: HttpMethod, path: &str, reply: Reply) {
        self.routes
            .lock()
            .unwrap()
            .entry((method, path.to_string()))
            .or_default()
            .push_back(reply);
    }
}

impl HttpTransport for MockTransport {
    fn execute(&self, request: HttpRequest) -> std::result::Result<HttpResponse, TransportError> {
        let key = (
            request.method,
            request.url.path().trim_start_matches('/').to_string(),
        );
        let url = request.url.to_string();
        self.requests.lock().unwrap().push(request);

        let reply = {
            let mut routes = self.routes.lock().unwrap();
            match routes.get_mut(&key) {
                Some(queue) if queue.len() > 1 => queue.pop_front(),
                Some(queue) => queue.front().cloned(),
                None => None,
            }
        };

        match reply {
            Some(Reply::Response(response)) => Ok(response),
            Some(Reply::ConnectionError) => Err(TransportError::Connection {
                url,
                message: "connection refused".to_string(),
            }),
            None => Ok(HttpResponse {
                status: 404,
                body: "no route".to_string(),
            }),
        }
    }
}

pub(crate) struct StaticSigner;

impl RequestSigner for StaticSigner {
    fn authorization(&self, _method: HttpMethod, _url: &Url) -> Result<String> {
        Ok("OAuth test".to_string())
    }
}

pub(crate) fn test_client(transport: &Arc<MockTransport>) -> GnossClient {
    GnossClient::new(TEST_BASE_URL, transport.clone(), Arc::new(StaticSigner)).unwrap()
}
