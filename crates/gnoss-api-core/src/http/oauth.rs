//! OAuth 1.0a request signing
//!
//! Produces the `Authorization: OAuth ...` header the platform expects,
//! signed with HMAC-SHA1 over the method and full request URL. Bodies are
//! JSON and therefore never part of the signature.

use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha1::Sha1;
use url::Url;

use crate::error::{GnossApiError, Result};

use super::transport::HttpMethod;

type HmacSha1 = Hmac<Sha1>;

const SIGNATURE_METHOD: &str = "HMAC-SHA1";
const OAUTH_VERSION: &str = "1.0";

/// Produces the `Authorization` header value for a request
pub trait RequestSigner: Send + Sync {
    fn authorization(&self, method: HttpMethod, url: &Url) -> Result<String>;
}

/// Consumer and token credentials issued by the platform
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuthCredentials {
    #[serde(default)]
    pub consumer_key: String,
    #[serde(default)]
    pub consumer_secret: String,
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub token_secret: String,
}

impl OAuthCredentials {
    pub fn new(
        consumer_key: impl Into<String>,
        consumer_secret: impl Into<String>,
        token: impl Into<String>,
        token_secret: impl Into<String>,
    ) -> Self {
        Self {
            consumer_key: consumer_key.into(),
            consumer_secret: consumer_secret.into(),
            token: token.into(),
            token_secret: token_secret.into(),
        }
    }

    /// Fail on the first empty field
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("consumer_key", &self.consumer_key),
            ("consumer_secret", &self.consumer_secret),
            ("token", &self.token),
            ("token_secret", &self.token_secret),
        ];
        for (field, value) in fields {
            if value.trim().is_empty() {
                return Err(GnossApiError::MissingCredentials { field });
            }
        }
        Ok(())
    }
}

impl fmt::Debug for OAuthCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuthCredentials")
            .field("consumer_key", &self.consumer_key)
            .field("consumer_secret", &"***")
            .field("token", &self.token)
            .field("token_secret", &"***")
            .finish()
    }
}

/// HMAC-SHA1 signer
#[derive(Debug, Clone)]
pub struct OAuthSigner {
    credentials: OAuthCredentials,
}

impl OAuthSigner {
    pub fn new(credentials: OAuthCredentials) -> Result<Self> {
        credentials.validate()?;
        Ok(Self { credentials })
    }

    /// Header value for a given nonce and timestamp
    pub fn sign(&self, method: HttpMethod, url: &Url, nonce: &str, timestamp: i64) -> Result<String> {
        let timestamp = timestamp.to_string();
        let oauth_params = [
            ("oauth_consumer_key", self.credentials.consumer_key.as_str()),
            ("oauth_nonce", nonce),
            ("oauth_signature_method", SIGNATURE_METHOD),
            ("oauth_timestamp", timestamp.as_str()),
            ("oauth_token", self.credentials.token.as_str()),
            ("oauth_version", OAUTH_VERSION),
        ];

        let base = signature_base_string(method, url, &oauth_params);
        let key = format!(
            "{}&{}",
            encode(&self.credentials.consumer_secret),
            encode(&self.credentials.token_secret)
        );
        let signature = hmac_sha1_base64(key.as_bytes(), base.as_bytes())?;

        let mut header = String::from("OAuth ");
        let mut fields: Vec<(&str, &str)> = oauth_params.to_vec();
        fields.push(("oauth_signature", signature.as_str()));
        fields.sort_by(|a, b| a.0.cmp(b.0));
        let rendered: Vec<String> = fields
            .iter()
            .map(|(k, v)| format!("{}=\"{}\"", k, encode(v)))
            .collect();
        header.push_str(&rendered.join(", "));
        Ok(header)
    }
}

impl RequestSigner for OAuthSigner {
    fn authorization(&self, method: HttpMethod, url: &Url) -> Result<String> {
        let nonce = uuid::Uuid::new_v4().simple().to_string();
        let timestamp = chrono::Utc::now().timestamp();
        self.sign(method, url, &nonce, timestamp)
    }
}

/// RFC 3986 percent-encoding, as OAuth requires
fn encode(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

/// `METHOD&base_uri&params`, each part percent-encoded
fn signature_base_string(method: HttpMethod, url: &Url, oauth_params: &[(&str, &str)]) -> String {
    let mut base_uri = format!("{}://{}", url.scheme(), url.host_str().unwrap_or_default());
    if let Some(port) = url.port() {
        base_uri.push_str(&format!(":{}", port));
    }
    base_uri.push_str(url.path());

    let mut params: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| (encode(&k), encode(&v)))
        .collect();
    params.extend(oauth_params.iter().map(|(k, v)| (encode(k), encode(v))));
    params.sort();

    let normalized = params
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");

    format!(
        "{}&{}&{}",
        method.as_str(),
        encode(&base_uri),
        encode(&normalized)
    )
}

fn hmac_sha1_base64(key: &[u8], data: &[u8]) -> Result<String> {
    let mut mac = HmacSha1::new_from_slice(key).map_err(|_| GnossApiError::MissingCredentials {
        field: "consumer_secret",
    })?;
    mac.update(data);
    Ok(STANDARD.encode(mac.finalize().into_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signer() -> OAuthSigner {
        OAuthSigner::new(OAuthCredentials::new("key", "secret", "tok", "tsecret")).unwrap()
    }

    fn oauth_params<'a>(timestamp: &'a str) -> Vec<(&'a str, &'a str)> {
        vec![
            ("oauth_consumer_key", "key"),
            ("oauth_nonce", "abc"),
            ("oauth_signature_method", SIGNATURE_METHOD),
            ("oauth_timestamp", timestamp),
            ("oauth_token", "tok"),
            ("oauth_version", OAUTH_VERSION),
        ]
    }

    #[test]
    fn test_hmac_sha1_known_vector() {
        let signature =
            hmac_sha1_base64(b"key", b"The quick brown fox jumps over the lazy dog").unwrap();
        assert_eq!(signature, "3nybhbi3iqa8ino29wqQcBydtNk=");
    }

    #[test]
    fn test_signature_base_string() {
        let url = Url::parse(
            "https://api.gnoss.com/community/get-categories?community_short_name=my%20community",
        )
        .unwrap();
        let base = signature_base_string(HttpMethod::Get, &url, &oauth_params("1700000000"));
        assert_eq!(
            base,
            "GET&https%3A%2F%2Fapi.gnoss.com%2Fcommunity%2Fget-categories&\
             community_short_name%3Dmy%2520community%26oauth_consumer_key%3Dkey%26\
             oauth_nonce%3Dabc%26oauth_signature_method%3DHMAC-SHA1%26\
             oauth_timestamp%3D1700000000%26oauth_token%3Dtok%26oauth_version%3D1.0"
        );
    }

    #[test]
    fn test_base_string_keeps_explicit_port() {
        let url = Url::parse("http://localhost:8080/user/get-user-by-id").unwrap();
        let base = signature_base_string(HttpMethod::Post, &url, &[]);
        assert_eq!(base, "POST&http%3A%2F%2Flocalhost%3A8080%2Fuser%2Fget-user-by-id&");
    }

    #[test]
    fn test_sign_header() {
        let url = Url::parse(
            "https://api.gnoss.com/community/get-categories?community_short_name=my%20community",
        )
        .unwrap();
        let header = signer()
            .sign(HttpMethod::Get, &url, "abc", 1_700_000_000)
            .unwrap();

        assert!(header.starts_with("OAuth "));
        assert!(header.contains(r#"oauth_consumer_key="key""#));
        assert!(header.contains(r#"oauth_token="tok""#));
        assert!(header.contains(r#"oauth_signature_method="HMAC-SHA1""#));
        assert!(header.contains(r#"oauth_signature="plAvwSbPxXP1AL28%2BcheMTDp%2BAM%3D""#));
        assert!(!header.contains("secret"));
    }

    #[test]
    fn test_signature_depends_on_url() {
        let signer = signer();
        let a = Url::parse("https://api.gnoss.com/resource/get-resource?resource_id=1").unwrap();
        let b = Url::parse("https://api.gnoss.com/resource/get-resource?resource_id=2").unwrap();
        assert_ne!(
            signer.sign(HttpMethod::Get, &a, "n", 1).unwrap(),
            signer.sign(HttpMethod::Get, &b, "n", 1).unwrap()
        );
        assert_eq!(
            signer.sign(HttpMethod::Get, &a, "n", 1).unwrap(),
            signer.sign(HttpMethod::Get, &a, "n", 1).unwrap()
        );
    }

    #[test]
    fn test_missing_credentials_rejected() {
        let err = OAuthSigner::new(OAuthCredentials::new("key", "", "tok", "ts")).unwrap_err();
        assert!(matches!(
            err,
            GnossApiError::MissingCredentials {
                field: "consumer_secret"
            }
        ));
    }

    #[test]
    fn test_debug_hides_secrets() {
        let creds = OAuthCredentials::new("key", "very-secret", "tok", "token-secret");
        let rendered = format!("{:?}", creds);
        assert!(!rendered.contains("very-secret"));
        assert!(!rendered.contains("token-secret"));
    }
}
