//! Post-process hook for outgoing HTML.
//!
//! The configured transform receives (session, html) and returns rewritten
//! html. The default policy substitutes an anti-forgery token placeholder;
//! embedders can install any other rewrite, or none.

use uuid::Uuid;

use crate::config::CsrfConfig;
use crate::session::Session;

/// Session value key holding the anti-forgery token.
pub const TOKEN_SESSION_KEY: &str = "csrf_token";

/// Text-rewrite hook applied to HTML content responses before transmission.
pub trait PostProcess: Send + Sync {
    fn rewrite(&self, session: &Session, html: String) -> String;
}

/// Default policy: replace the placeholder with a hidden input carrying the
/// session's anti-forgery token.
///
/// The token lives in the session's value bag under [`TOKEN_SESSION_KEY`];
/// it is generated on first use so a fresh session gets a stable token.
pub struct CsrfTokenInjector {
    placeholder: String,
    field_name: String,
}

impl CsrfTokenInjector {
    pub fn new(placeholder: impl Into<String>, field_name: impl Into<String>) -> Self {
        Self {
            placeholder: placeholder.into(),
            field_name: field_name.into(),
        }
    }

    pub fn from_config(config: &CsrfConfig) -> Self {
        Self::new(&config.placeholder, &config.field_name)
    }

    fn token_for(&self, session: &Session) -> String {
        match session.value(TOKEN_SESSION_KEY) {
            Some(token) => token,
            None => {
                let token = Uuid::new_v4().to_string();
                session.set_value(TOKEN_SESSION_KEY, token.clone());
                token
            }
        }
    }
}

impl PostProcess for CsrfTokenInjector {
    fn rewrite(&self, session: &Session, html: String) -> String {
        if !html.contains(&self.placeholder) {
            return html;
        }
        let field = format!(
            r#"<input type="hidden" name="{}" value="{}">"#,
            self.field_name,
            self.token_for(session)
        );
        html.replace(&self.placeholder, &field)
    }
}

/// No-op transform for embedders that opt out of rewriting.
pub struct NoRewrite;

impl PostProcess for NoRewrite {
    fn rewrite(&self, _session: &Session, html: String) -> String {
        html
    }
}
