use crate::types::Token;

/// Outcome of the authorization check in front of every protected route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Gate {
    /// The cached token is usable.
    Proceed(Token),
    /// No usable token; send the browser to this authorize URL.
    Redirect(String),
}

/// Decides whether a cached token allows the request through.
///
/// An expired token counts as absent. No network call is made here; a token
/// close to expiry is refreshed later, when it is actually used.
pub fn check(token: Option<Token>, now: i64, authorize_url: &str) -> Gate {
    match token {
        Some(token) if !token.is_expired(now) => Gate::Proceed(token),
        _ => Gate::Redirect(authorize_url.to_string()),
    }
}
