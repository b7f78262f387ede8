//! Response rendering onto the wire.
//!
//! # Responsibilities
//! - Redirects: 302 with an absolute Location built from the configured
//!   public address, falling back to the request's own host
//! - Content: 200 with explicit Content-Type, charset, and Content-Length

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{CONTENT_LENGTH, CONTENT_TYPE, LOCATION};
use hyper::{Response, StatusCode};

use crate::http::response::{Payload, ResponseDescriptor};

/// Render a descriptor as a hyper response.
///
/// `request_host` is the Host the client addressed (falling back to the
/// listener's local address upstream); a non-empty `public_address` takes
/// precedence over it when building redirect locations.
pub fn write_response(
    descriptor: &ResponseDescriptor,
    request_host: &str,
    public_address: &str,
) -> Response<Full<Bytes>> {
    let result = match descriptor.payload() {
        Payload::Redirect { target } => {
            let host = if public_address.is_empty() {
                request_host
            } else {
                public_address
            };
            let location = format!("http://{}{}", host, target);
            Response::builder()
                .status(StatusCode::FOUND)
                .header(LOCATION, location)
                .body(Full::new(Bytes::new()))
        }
        Payload::Content {
            body,
            content_type,
            charset,
        } => Response::builder()
            .status(StatusCode::OK)
            .header(CONTENT_TYPE, format!("{}; charset={}", content_type, charset))
            .header(CONTENT_LENGTH, body.len())
            .body(Full::new(Bytes::from(body.clone()))),
    };

    result.unwrap_or_else(|e| {
        // Only reachable with header-invalid redirect targets.
        tracing::error!(error = %e, "Failed to build response; redirecting to /");
        Response::builder()
            .status(StatusCode::FOUND)
            .header(LOCATION, "/")
            .body(Full::new(Bytes::new()))
            .expect("static fallback response")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::response::ResponseDescriptor;

    fn location(response: &Response<Full<Bytes>>) -> &str {
        response.headers().get(LOCATION).unwrap().to_str().unwrap()
    }

    #[test]
    fn redirect_uses_request_host_when_public_address_empty() {
        let desc = ResponseDescriptor::redirect("/login");
        let response = write_response(&desc, "192.168.0.5:8080", "");

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(location(&response), "http://192.168.0.5:8080/login");
    }

    #[test]
    fn redirect_prefers_configured_public_address() {
        let desc = ResponseDescriptor::redirect("/login");
        let response = write_response(&desc, "192.168.0.5:8080", "1.2.3.4");

        assert_eq!(location(&response), "http://1.2.3.4/login");
    }

    #[test]
    fn content_carries_explicit_headers() {
        let desc = ResponseDescriptor::html("<html>hello</html>");
        let response = write_response(&desc, "localhost", "");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(CONTENT_TYPE).unwrap(),
            "text/html; charset=utf-8"
        );
        assert_eq!(
            response.headers().get(CONTENT_LENGTH).unwrap(),
            &"<html>hello</html>".len().to_string()
        );
    }

    #[test]
    fn invalid_redirect_target_falls_back() {
        let desc = ResponseDescriptor::redirect("/bad\nlocation");
        let response = write_response(&desc, "localhost", "");

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(location(&response), "/");
    }
}
