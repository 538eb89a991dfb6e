//! HTTP plumbing shared by every API façade
//!
//! - `transport`: request/response exchange (`reqwest::blocking` in production)
//! - `oauth`: OAuth 1.0a HMAC-SHA1 signing
//! - `context`: request-scoped affinity id and lock token

mod context;
mod oauth;
mod transport;

#[cfg(test)]
pub(crate) mod mock;

pub use context::{RequestContext, LOCK_TOKEN_HEADER, REQUEST_ID_HEADER};
pub use oauth::{OAuthCredentials, OAuthSigner, RequestSigner};
pub use transport::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};
