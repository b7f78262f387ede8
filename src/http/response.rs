//! Response descriptors and the error taxonomy.

/// Fixed error classification carried by every response descriptor.
///
/// Every non-`None` kind is resolved through the configured error-to-redirect
/// mapping before the response is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ErrorKind {
    #[default]
    None,
    ExpiredSession,
    NotAuthorized,
    FileNotFound,
    PageNotFound,
    ServerError,
    UnknownType,
    ValidationError,
}

impl ErrorKind {
    pub fn is_error(&self) -> bool {
        !matches!(self, ErrorKind::None)
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ErrorKind::None => "no-error",
            ErrorKind::ExpiredSession => "expired-session",
            ErrorKind::NotAuthorized => "not-authorized",
            ErrorKind::FileNotFound => "file-not-found",
            ErrorKind::PageNotFound => "page-not-found",
            ErrorKind::ServerError => "server-error",
            ErrorKind::UnknownType => "unknown-type",
            ErrorKind::ValidationError => "validation-error",
        };
        f.write_str(name)
    }
}

/// What goes onto the wire: a redirect target or a content body.
#[derive(Debug, Clone)]
pub enum Payload {
    Redirect {
        /// Target path, prefixed with the public-or-request host when written.
        target: String,
    },
    Content {
        body: Vec<u8>,
        content_type: String,
        charset: String,
    },
}

/// The redirect-or-content union returned by the dispatcher.
///
/// Exactly one payload variant is populated; the error kind defaults to
/// `None`. A non-`None` kind turns the descriptor into a redirect to the
/// configured error path regardless of its original payload.
#[derive(Debug, Clone)]
pub struct ResponseDescriptor {
    payload: Payload,
    error: ErrorKind,
}

impl ResponseDescriptor {
    /// A redirect to the given target path.
    pub fn redirect(target: impl Into<String>) -> Self {
        Self {
            payload: Payload::Redirect {
                target: target.into(),
            },
            error: ErrorKind::None,
        }
    }

    /// A content response with explicit type and encoding.
    pub fn content(
        body: Vec<u8>,
        content_type: impl Into<String>,
        charset: impl Into<String>,
    ) -> Self {
        Self {
            payload: Payload::Content {
                body,
                content_type: content_type.into(),
                charset: charset.into(),
            },
            error: ErrorKind::None,
        }
    }

    /// UTF-8 HTML content.
    pub fn html(markup: impl Into<String>) -> Self {
        Self::content(markup.into().into_bytes(), "text/html", "utf-8")
    }

    /// An error classification; the pipeline fills in the redirect target
    /// from the configured error-to-redirect mapping.
    pub fn error(kind: ErrorKind) -> Self {
        Self {
            payload: Payload::Redirect {
                target: String::new(),
            },
            error: kind,
        }
    }

    /// Attach an error classification to an existing descriptor.
    pub fn with_error(mut self, kind: ErrorKind) -> Self {
        self.error = kind;
        self
    }

    pub fn error_kind(&self) -> ErrorKind {
        self.error
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    pub fn is_redirect(&self) -> bool {
        matches!(self.payload, Payload::Redirect { .. })
    }

    /// Overwrite the payload with a redirect to `target`.
    pub(crate) fn redirect_to(&mut self, target: String) {
        self.payload = Payload::Redirect { target };
    }

    /// Run a rewrite over the body when it is textual HTML.
    ///
    /// Redirects, non-HTML content, and bodies that are not valid UTF-8 pass
    /// through unchanged.
    pub(crate) fn rewrite_html<F>(&mut self, rewrite: F)
    where
        F: FnOnce(String) -> String,
    {
        if let Payload::Content {
            body, content_type, ..
        } = &mut self.payload
        {
            if !content_type.starts_with("text/html") {
                return;
            }
            match String::from_utf8(std::mem::take(body)) {
                Ok(text) => *body = rewrite(text).into_bytes(),
                Err(e) => *body = e.into_bytes(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn html_descriptor_defaults() {
        let desc = ResponseDescriptor::html("<html></html>");
        assert_eq!(desc.error_kind(), ErrorKind::None);
        assert!(!desc.is_redirect());
        match desc.payload() {
            Payload::Content {
                content_type,
                charset,
                ..
            } => {
                assert_eq!(content_type, "text/html");
                assert_eq!(charset, "utf-8");
            }
            Payload::Redirect { .. } => panic!("expected content"),
        }
    }

    #[test]
    fn rewrite_only_touches_html() {
        let mut html = ResponseDescriptor::html("a");
        html.rewrite_html(|text| format!("{text}b"));
        match html.payload() {
            Payload::Content { body, .. } => assert_eq!(body, b"ab"),
            Payload::Redirect { .. } => panic!("expected content"),
        }

        let mut binary = ResponseDescriptor::content(vec![1, 2], "image/png", "binary");
        binary.rewrite_html(|_| String::from("clobbered"));
        match binary.payload() {
            Payload::Content { body, .. } => assert_eq!(body, &[1, 2]),
            Payload::Redirect { .. } => panic!("expected content"),
        }
    }

    #[test]
    fn error_override_becomes_redirect() {
        let mut desc = ResponseDescriptor::html("page").with_error(ErrorKind::NotAuthorized);
        assert!(desc.error_kind().is_error());
        desc.redirect_to("/login".to_string());
        assert!(desc.is_redirect());
    }
}
