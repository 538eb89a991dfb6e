//! Request-scoped context
//!
//! Travels explicitly with a [`GnossClient`](crate::GnossClient) instead of
//! living in a process-wide map keyed by thread.

use uuid::Uuid;

/// Header carrying the affinity id of a logical request
pub const REQUEST_ID_HEADER: &str = "X-Request-ID";

/// Header carrying the lock token of a leased resource
pub const LOCK_TOKEN_HEADER: &str = "X-Correlation-ID";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    request_id: Uuid,
    lock_token: Option<String>,
}

impl RequestContext {
    /// Fresh context with a random request id
    pub fn new() -> Self {
        Self {
            request_id: Uuid::new_v4(),
            lock_token: None,
        }
    }

    pub fn with_request_id(mut self, request_id: Uuid) -> Self {
        self.request_id = request_id;
        self
    }

    pub fn with_lock_token(mut self, token: impl Into<String>) -> Self {
        self.lock_token = Some(token.into());
        self
    }

    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    pub fn lock_token(&self) -> Option<&str> {
        self.lock_token.as_deref()
    }

    /// Headers this context adds to every call
    pub fn headers(&self) -> Vec<(String, String)> {
        let mut headers = vec![(REQUEST_ID_HEADER.to_string(), self.request_id.to_string())];
        if let Some(token) = &self.lock_token {
            headers.push((LOCK_TOKEN_HEADER.to_string(), token.clone()));
        }
        headers
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}
