//! Request decomposition.
//!
//! # Responsibilities
//! - Split the target into path and raw query string
//! - Collect the body and decode it per the declared charset
//! - Merge query and body parameters (body wins on key collision)
//! - Emit the per-request log line and per-parameter diagnostics

use std::net::SocketAddr;

use http_body_util::BodyExt;
use hyper::body::Incoming;
use hyper::header::CONTENT_TYPE;
use hyper::{Method, Request};

use crate::http::params::{self, Params};

/// Error type for request decomposition.
#[derive(Debug)]
pub enum RequestError {
    /// Failed to read the request body.
    Body(hyper::Error),
}

impl std::fmt::Display for RequestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestError::Body(e) => write!(f, "Failed to read request body: {}", e),
        }
    }
}

impl std::error::Error for RequestError {}

/// Ephemeral per-request value handed to the dispatcher.
#[derive(Debug)]
pub struct RequestContext {
    method: Method,
    path: String,
    params: Params,
}

impl RequestContext {
    /// Decompose a hyper request.
    ///
    /// Query parameters are decoded first, the body second into the same
    /// mapping, so body entries overwrite same-named query entries.
    pub async fn from_hyper(
        req: Request<Incoming>,
        client: SocketAddr,
    ) -> Result<Self, RequestError> {
        let (parts, body) = req.into_parts();

        let method = parts.method;
        let path = parts.uri.path().to_string();
        let query = parts.uri.query().unwrap_or("").to_string();

        tracing::info!(client = %client, method = %method, path = %path, "Request accepted");

        let charset = parts
            .headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .and_then(charset_label)
            .map(str::to_string);

        let bytes = body
            .collect()
            .await
            .map_err(RequestError::Body)?
            .to_bytes();
        let body_text = decode_body(&bytes, charset.as_deref());

        let mut merged = params::decode(&query);
        params::decode_into(&body_text, &mut merged);

        for (key, value) in &merged {
            tracing::debug!(key = %key, value = %value, "Parameter decoded");
        }

        Ok(Self {
            method,
            path,
            params: merged,
        })
    }

    #[cfg(test)]
    pub(crate) fn for_tests(method: Method, path: &str, params: Params) -> Self {
        Self {
            method,
            path: path.to_string(),
            params,
        }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    /// URL path with the query string stripped.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Merged query-string and body parameters.
    pub fn params(&self) -> &Params {
        &self.params
    }
}

/// Extract the charset parameter from a Content-Type header value.
fn charset_label(content_type: &str) -> Option<&str> {
    content_type.split(';').skip(1).find_map(|param| {
        let (name, value) = param.split_once('=')?;
        if name.trim().eq_ignore_ascii_case("charset") {
            Some(value.trim().trim_matches('"'))
        } else {
            None
        }
    })
}

/// Decode body bytes per the declared charset, defaulting to UTF-8.
fn decode_body(bytes: &[u8], charset: Option<&str>) -> String {
    let encoding = charset
        .and_then(|label| encoding_rs::Encoding::for_label(label.as_bytes()))
        .unwrap_or(encoding_rs::UTF_8);
    let (text, _, _) = encoding.decode(bytes);
    text.into_owned()
}
