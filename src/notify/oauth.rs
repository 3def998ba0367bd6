//! OAuth 1.0a request signing (HMAC-SHA1) for the Twitter API.
//!
//! Only the `oauth_*` parameters and any query/form parameters take part in the
//! signature. JSON request bodies are not signed.

use crate::config::TwitterCredentials;
use anyhow::Result;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use hmac::{Hmac, Mac};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use sha1::Sha1;

type HmacSha1 = Hmac<Sha1>;

/// RFC 3986 unreserved characters stay as-is.
const OAUTH_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

fn encode(value: &str) -> String {
    utf8_percent_encode(value, OAUTH_ENCODE_SET).to_string()
}

pub struct OAuthSigner<'a> {
    credentials: &'a TwitterCredentials,
}

impl<'a> OAuthSigner<'a> {
    pub fn new(credentials: &'a TwitterCredentials) -> Self {
        Self { credentials }
    }

    /// `Authorization` header value for a request with a fresh nonce and timestamp.
    pub fn authorization_header(&self, method: &str, url: &str) -> Result<String> {
        let nonce = uuid::Uuid::new_v4().simple().to_string();
        let timestamp = chrono::Utc::now().timestamp().to_string();
        self.authorization_header_with(method, url, &[], &nonce, &timestamp)
    }

    pub fn authorization_header_with(
        &self,
        method: &str,
        url: &str,
        request_params: &[(&str, &str)],
        nonce: &str,
        timestamp: &str,
    ) -> Result<String> {
        let oauth_params = [
            ("oauth_consumer_key", self.credentials.api_key.as_str()),
            ("oauth_nonce", nonce),
            ("oauth_signature_method", "HMAC-SHA1"),
            ("oauth_timestamp", timestamp),
            ("oauth_token", self.credentials.access_token.as_str()),
            ("oauth_version", "1.0"),
        ];

        let signature = self.signature(method, url, &oauth_params, request_params)?;

        let mut header_params: Vec<(String, String)> = oauth_params
            .iter()
            .map(|(k, v)| (k.to_string(), encode(v)))
            .collect();
        header_params.push(("oauth_signature".to_string(), encode(&signature)));
        header_params.sort();

        let joined = header_params
            .iter()
            .map(|(k, v)| format!("{k}=\"{v}\""))
            .collect::<Vec<_>>()
            .join(", ");
        Ok(format!("OAuth {joined}"))
    }

    fn signature(
        &self,
        method: &str,
        url: &str,
        oauth_params: &[(&str, &str)],
        request_params: &[(&str, &str)],
    ) -> Result<String> {
        let mut params: Vec<(String, String)> = oauth_params
            .iter()
            .chain(request_params.iter())
            .map(|(k, v)| (encode(k), encode(v)))
            .collect();
        params.sort();

        let param_string = params
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&");

        let base_string = format!(
            "{}&{}&{}",
            method.to_uppercase(),
            encode(url),
            encode(&param_string)
        );
        let signing_key = format!(
            "{}&{}",
            encode(&self.credentials.api_secret),
            encode(&self.credentials.access_secret)
        );

        let mut mac = HmacSha1::new_from_slice(signing_key.as_bytes())
            .map_err(|e| anyhow::anyhow!("HMAC key error: {}", e))?;
        mac.update(base_string.as_bytes());
        Ok(BASE64.encode(mac.finalize().into_bytes()))
    }
}
