use base64::{Engine, engine::general_purpose::STANDARD};
use reqwest::{Client, Url};
use tracing::debug;

use crate::{
    config::Config,
    spotify::{SpotifyError, ensure_success},
    types::{Token, TokenResponse},
};

/// Builds the Spotify authorization URL for the authorization-code flow.
///
/// The query carries the client id, `response_type=code`, the redirect URI, the
/// requested scope and `show_dialog=true`, so the consent screen is shown again
/// after a logout instead of silently reusing the previous grant.
///
/// # Errors
///
/// Returns [`SpotifyError::Config`] when the configured authorize endpoint is
/// not an absolute URL.
///
/// # Example
///
/// ```
/// let url = authorize_url(&config)?;
/// // https://accounts.spotify.com/authorize?client_id=...&response_type=code&...
/// ```
pub fn authorize_url(config: &Config) -> Result<String, SpotifyError> {
    let url = Url::parse_with_params(
        &config.auth_url,
        &[
            ("client_id", config.client_id.as_str()),
            ("response_type", "code"),
            ("redirect_uri", config.redirect_uri.as_str()),
            ("scope", config.scope.as_str()),
            ("show_dialog", "true"),
        ],
    )
    .map_err(|e| SpotifyError::Config(format!("{}: {}", config.auth_url, e)))?;

    Ok(url.into())
}

/// Exchanges an authorization code for an access/refresh token pair.
///
/// The client credentials travel in a Basic `Authorization` header; the code
/// and redirect URI go in the form body. The redirect URI must match the one
/// used to build the authorize URL.
///
/// # Errors
///
/// Common failure scenarios:
/// - Invalid, expired or already used authorization code (`400`)
/// - Wrong client credentials (`400`/`401`)
/// - Network connectivity issues
pub async fn exchange_code(
    client: &Client,
    config: &Config,
    code: &str,
) -> Result<Token, SpotifyError> {
    debug!("exchanging authorization code for token");

    let response = client
        .post(&config.token_url)
        .header("Authorization", basic_auth(config))
        .form(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", config.redirect_uri.as_str()),
        ])
        .send()
        .await?;

    let body: TokenResponse = ensure_success(response).await?.json().await?;
    Ok(body.into_token(None))
}

/// Trades a refresh token for a fresh access token.
///
/// Spotify may or may not rotate the refresh token; when the response omits
/// it, the one passed in stays valid and is kept on the returned [`Token`].
pub async fn refresh_token(
    client: &Client,
    config: &Config,
    refresh_token: &str,
) -> Result<Token, SpotifyError> {
    debug!("refreshing access token");

    let response = client
        .post(&config.token_url)
        .header("Authorization", basic_auth(config))
        .form(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ])
        .send()
        .await?;

    let body: TokenResponse = ensure_success(response).await?.json().await?;
    Ok(body.into_token(Some(refresh_token)))
}

fn basic_auth(config: &Config) -> String {
    let credentials = format!("{}:{}", config.client_id, config.client_secret);
    format!("Basic {}", STANDARD.encode(credentials))
}
