//! GNOSS API client
//!
//! Shared plumbing for every façade: builds endpoint URLs, signs and sends
//! requests, and decodes JSON answers into typed models.

use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use crate::api::{CommunityApi, NotificationApi, ResourceApi, RolApi, ThesaurusApi, UserApi};
use crate::config::Config;
use crate::error::{GnossApiError, Result, TransportError};
use crate::http::{
    HttpMethod, HttpRequest, HttpResponse, HttpTransport, OAuthSigner, RequestContext,
    RequestSigner, ReqwestTransport,
};

/// Maximum number of body characters kept in a status error
const ERROR_BODY_LIMIT: usize = 500;

/// Entry point to the platform API.
///
/// Cloning is cheap. Each clone carries its own [`RequestContext`], so a
/// logical request is correlated by passing its client around, not by
/// thread identity.
#[derive(Clone)]
pub struct GnossClient {
    base_url: Url,
    transport: Arc<dyn HttpTransport>,
    signer: Arc<dyn RequestSigner>,
    context: RequestContext,
}

impl GnossClient {
    pub fn new(
        base_url: &str,
        transport: Arc<dyn HttpTransport>,
        signer: Arc<dyn RequestSigner>,
    ) -> Result<Self> {
        // a trailing slash keeps the base path when joining endpoints
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{}/", base_url)
        };
        let base_url = Url::parse(&normalized).map_err(|_| GnossApiError::InvalidBaseUrl {
            url: base_url.to_string(),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(GnossApiError::InvalidBaseUrl {
                url: base_url.to_string(),
            });
        }

        Ok(Self {
            base_url,
            transport,
            signer,
            context: RequestContext::new(),
        })
    }

    /// Client with the `reqwest` transport and OAuth signer from config
    pub fn from_config(config: &Config) -> Result<Self> {
        let transport = ReqwestTransport::new(config.api.timeout())?;
        let signer = OAuthSigner::new(config.oauth.clone())?;
        Self::new(&config.api.base_url, Arc::new(transport), Arc::new(signer))
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn context(&self) -> &RequestContext {
        &self.context
    }

    /// Same connection, different request context
    pub fn with_context(&self, context: RequestContext) -> Self {
        Self {
            context,
            ..self.clone()
        }
    }

    pub fn community(&self) -> CommunityApi {
        CommunityApi::new(self.clone())
    }

    pub fn resources(&self) -> ResourceApi {
        ResourceApi::new(self.clone())
    }

    pub fn thesaurus(&self) -> ThesaurusApi {
        ThesaurusApi::new(self.clone())
    }

    pub fn users(&self) -> UserApi {
        UserApi::new(self.clone())
    }

    pub fn notifications(&self) -> NotificationApi {
        NotificationApi::new(self.clone())
    }

    pub fn roles(&self) -> RolApi {
        RolApi::new(self.clone())
    }

    // ========== Typed calls ==========

    pub(crate) fn get<T: DeserializeOwned>(&self, endpoint: &str, query: &[(&str, &str)]) -> Result<T> {
        let url = self.endpoint_url(endpoint, query)?;
        let response = self.send(HttpMethod::Get, url.clone(), None)?;
        decode(&url, &response)
    }

    pub(crate) fn post<B, T>(&self, endpoint: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint_url(endpoint, &[])?;
        let body = serde_json::to_string(body)?;
        let response = self.send(HttpMethod::Post, url.clone(), Some(body))?;
        decode(&url, &response)
    }

    /// POST whose answer carries nothing of interest
    pub(crate) fn post_unit<B: Serialize + ?Sized>(&self, endpoint: &str, body: &B) -> Result<()> {
        let url = self.endpoint_url(endpoint, &[])?;
        let body = serde_json::to_string(body)?;
        self.send(HttpMethod::Post, url, Some(body))?;
        Ok(())
    }

    fn endpoint_url(&self, endpoint: &str, query: &[(&str, &str)]) -> Result<Url> {
        let mut url = self
            .base_url
            .join(endpoint.trim_start_matches('/'))
            .map_err(|_| GnossApiError::InvalidBaseUrl {
                url: format!("{}{}", self.base_url, endpoint),
            })?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    fn send(&self, method: HttpMethod, url: Url, body: Option<String>) -> Result<HttpResponse> {
        let mut headers = vec![(
            "Authorization".to_string(),
            self.signer.authorization(method, &url)?,
        )];
        headers.extend(self.context.headers());

        tracing::debug!(
            %method,
            url = %url,
            request_id = %self.context.request_id(),
            locked = self.context.lock_token().is_some(),
            "calling GNOSS API"
        );

        let request = HttpRequest {
            method,
            url: url.clone(),
            headers,
            body,
        };
        let response = self.transport.execute(request).map_err(|e| {
            tracing::warn!(%method, url = %url, error = %e, "GNOSS API call failed");
            e
        })?;

        if !response.is_success() {
            tracing::warn!(
                %method,
                url = %url,
                status = response.status,
                "GNOSS API returned an error status"
            );
            return Err(TransportError::Status {
                url: url.to_string(),
                status: response.status,
                body: response.body.chars().take(ERROR_BODY_LIMIT).collect(),
            }
            .into());
        }

        Ok(response)
    }
}

impl fmt::Debug for GnossClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GnossClient")
            .field("base_url", &self.base_url.as_str())
            .field("context", &self.context)
            .finish_non_exhaustive()
    }
}

/// An empty body decodes as JSON `null`, so `Option<T>` answers map to `None`.
fn decode<T: DeserializeOwned>(url: &Url, response: &HttpResponse) -> Result<T> {
    let text = response.body.trim();
    let text = if text.is_empty() { "null" } else { text };
    serde_json::from_str(text).map_err(|e| {
        TransportError::MalformedBody {
            url: url.to_string(),
            message: e.to_string(),
        }
        .into()
    })
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;
    use crate::http::mock::{test_client, MockTransport, StaticSigner};
    use crate::http::{LOCK_TOKEN_HEADER, REQUEST_ID_HEADER};

    #[derive(Debug, Deserialize, PartialEq)]
    struct Echo {
        value: i32,
    }

    #[test]
    fn test_base_url_gets_trailing_slash() {
        let transport = MockTransport::new();
        let client = GnossClient::new(
            "https://api.gnoss.test/v1",
            transport,
            Arc::new(StaticSigner),
        )
        .unwrap();
        assert_eq!(client.base_url().as_str(), "https://api.gnoss.test/v1/");
        let url = client.endpoint_url("/community/get-categories", &[]).unwrap();
        assert_eq!(url.as_str(), "https://api.gnoss.test/v1/community/get-categories");
    }

    #[test]
    fn test_invalid_base_url() {
        let transport = MockTransport::new();
        let err = GnossClient::new("not a url", transport, Arc::new(StaticSigner)).unwrap_err();
        assert!(matches!(err, GnossApiError::InvalidBaseUrl { .. }));
    }

    #[test]
    fn test_get_sends_signed_request_with_context() {
        let transport = MockTransport::new();
        transport.reply(HttpMethod::Get, "test/echo", 200, r#"{"value": 3}"#);
        let client = test_client(&transport);

        let echo: Echo = client.get("test/echo", &[("name", "a b")]).unwrap();
        assert_eq!(echo, Echo { value: 3 });

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert_eq!(request.url.query(), Some("name=a+b"));
        assert_eq!(request.header("Authorization"), Some("OAuth test"));
        assert_eq!(
            request.header(REQUEST_ID_HEADER),
            Some(client.context().request_id().to_string().as_str())
        );
        assert_eq!(request.header(LOCK_TOKEN_HEADER), None);
    }

    #[test]
    fn test_post_serializes_body() {
        let transport = MockTransport::new();
        transport.reply(HttpMethod::Post, "test/echo", 200, r#"{"value": 1}"#);
        let client = test_client(&transport);

        let _: Echo = client
            .post("test/echo", &serde_json::json!({"name": "x"}))
            .unwrap();
        let body = transport.requests()[0].body.clone().unwrap();
        assert_eq!(body, r#"{"name":"x"}"#);
    }

    #[test]
    fn test_error_status_maps_to_transport_error() {
        let transport = MockTransport::new();
        transport.reply(HttpMethod::Get, "test/echo", 500, "boom");
        let client = test_client(&transport);

        let err = client.get::<Echo>("test/echo", &[]).unwrap_err();
        match err {
            GnossApiError::Transport(TransportError::Status { status, body, .. }) => {
                assert_eq!(status, 500);
                assert_eq!(body, "boom");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_malformed_body_maps_to_transport_error() {
        let transport = MockTransport::new();
        transport.reply(HttpMethod::Get, "test/echo", 200, "<html>");
        let client = test_client(&transport);

        let err = client.get::<Echo>("test/echo", &[]).unwrap_err();
        assert!(matches!(
            err,
            GnossApiError::Transport(TransportError::MalformedBody { .. })
        ));
    }

    #[test]
    fn test_connection_failure_maps_to_transport_error() {
        let transport = MockTransport::new();
        transport.fail_connection(HttpMethod::Post, "test/echo");
        let client = test_client(&transport);

        let err = client.post_unit("test/echo", &()).unwrap_err();
        assert!(matches!(
            err,
            GnossApiError::Transport(TransportError::Connection { .. })
        ));
        assert!(err.is_retryable());
    }

    #[test]
    fn test_empty_body_decodes_as_none() {
        let transport = MockTransport::new();
        transport.reply(HttpMethod::Get, "test/echo", 200, "");
        let client = test_client(&transport);

        let echo: Option<Echo> = client.get("test/echo", &[]).unwrap();
        assert!(echo.is_none());
    }

    #[test]
    fn test_with_context_propagates_lock_token() {
        let transport = MockTransport::new();
        transport.reply(HttpMethod::Post, "test/echo", 200, "");
        let client = test_client(&transport);

        let locked = client.with_context(RequestContext::new().with_lock_token("tok-9"));
        locked.post_unit("test/echo", &()).unwrap();

        assert_eq!(
            transport.requests()[0].header(LOCK_TOKEN_HEADER),
            Some("tok-9")
        );
        // the original client is untouched
        assert!(client.context().lock_token().is_none());
    }
}
