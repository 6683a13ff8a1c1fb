use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    config::{AppConfig, AppContext},
    db,
    errors::ApiError,
    models::SpotifyAuthInfo,
};

pub const SPOTIFY_SCOPE: &str = "user-top-read user-read-private";

/// Token payload returned by the authorization-code exchange.
#[derive(Debug, Deserialize)]
pub struct AccessTokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub scope: String,
    pub expires_in: i64,
    pub refresh_token: String,
}

/// The refresh grant may omit scope/refresh_token, so it gets its own shape.
#[derive(Debug, Deserialize)]
pub struct RefreshTokenResponse {
    pub access_token: String,
    pub expires_in: i64,
}

#[derive(Debug, Deserialize)]
struct TopItemsResponse {
    items: Vec<TopItem>,
}

#[derive(Debug, Deserialize)]
struct TopItem {
    name: String,
}

#[derive(Debug, PartialEq, Eq)]
pub enum RefreshOutcome {
    Refreshed,
    NotExpired,
}

pub fn authorize_url(config: &AppConfig, state: &str) -> Result<reqwest::Url, ApiError> {
    reqwest::Url::parse_with_params(
        &format!("{}/authorize", config.spotify_accounts_url),
        &[
            ("response_type", "code"),
            ("client_id", config.spotify_client_id.as_str()),
            ("scope", SPOTIFY_SCOPE),
            ("redirect_uri", config.callback_redirect_url.as_str()),
            ("state", state),
            ("show_dialog", "true"),
        ],
    )
    .map_err(|err| {
        log::error!("failed to build authorize url: {}", err);
        ApiError::Internal("Internal server error".to_string())
    })
}

/// Authorization-code exchange against the accounts service, authenticated
/// with the Basic client credentials.
pub async fn exchange_code(
    ctx: &AppContext,
    code: &str,
    state: &str,
) -> Result<AccessTokenResponse, ApiError> {
    let config = &ctx.config;
    let response = ctx
        .http
        .post(format!("{}/api/token", config.spotify_accounts_url))
        .basic_auth(
            &config.spotify_client_id,
            Some(&config.spotify_client_secret),
        )
        .form(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", config.callback_redirect_url.as_str()),
            ("client_id", config.spotify_client_id.as_str()),
            ("client_secret", config.spotify_client_secret.as_str()),
            ("state", state),
        ])
        .send()
        .await
        .and_then(|res| res.error_for_status())
        .map_err(exchange_error)?;
    response.json::<AccessTokenResponse>().await.map_err(exchange_error)
}

fn exchange_error(err: reqwest::Error) -> ApiError {
    log::error!("spotify token exchange failed: {}", err);
    ApiError::Internal("Internal server error".to_string())
}

/// Stores freshly exchanged tokens with an absolute expiry computed now.
pub async fn link_account(
    ctx: &AppContext,
    user_id: Uuid,
    token: AccessTokenResponse,
) -> Result<(), ApiError> {
    let info = SpotifyAuthInfo {
        access_token: token.access_token,
        token_type: token.token_type,
        scope: token.scope,
        expires_in: token.expires_in,
        expires_timestamp: Utc::now().timestamp() + token.expires_in,
        refresh_token: token.refresh_token,
        user_id,
    };
    db::spotify::create(&info, &ctx.pool).await?;
    Ok(())
}

/// Pull-based refresh: compares the stored absolute expiry against the clock
/// and only then talks to the provider. The frontend calls this
/// opportunistically; nothing refreshes proactively.
pub async fn refresh_for_user(ctx: &AppContext, user_id: Uuid) -> Result<RefreshOutcome, ApiError> {
    let info = db::spotify::find_by_user(user_id, &ctx.pool)
        .await?
        .ok_or_else(|| {
            ApiError::NotFound("No Spotify account linked to this user".to_string())
        })?;

    let now = Utc::now().timestamp();
    if info.expires_timestamp >= now {
        return Ok(RefreshOutcome::NotExpired);
    }

    let config = &ctx.config;
    let response = ctx
        .http
        .post(format!("{}/api/token", config.spotify_accounts_url))
        .form(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", info.refresh_token.as_str()),
            ("client_id", config.spotify_client_id.as_str()),
            ("client_secret", config.spotify_client_secret.as_str()),
        ])
        .send()
        .await
        .and_then(|res| res.error_for_status())
        .map_err(refresh_error)?;
    let refreshed = response
        .json::<RefreshTokenResponse>()
        .await
        .map_err(refresh_error)?;

    let new_expiry = Utc::now().timestamp() + refreshed.expires_in;
    db::spotify::update_access_token(user_id, &refreshed.access_token, new_expiry, &ctx.pool)
        .await?;
    Ok(RefreshOutcome::Refreshed)
}

fn refresh_error(err: reqwest::Error) -> ApiError {
    log::error!("spotify token refresh failed: {}", err);
    ApiError::Internal("Error refreshing access token".to_string())
}

pub async fn unlink(ctx: &AppContext, user_id: Uuid) -> Result<(), ApiError> {
    if db::spotify::find_by_user(user_id, &ctx.pool).await?.is_none() {
        return Err(ApiError::NotFound("User not found".to_string()));
    }
    db::spotify::delete_by_user(user_id, &ctx.pool).await?;
    Ok(())
}

/// Pass-through to the provider's "top items" endpoints, reduced to the item
/// names. `kind` is `artists` or `tracks`.
pub async fn top_item_names(
    ctx: &AppContext,
    access_token: &str,
    kind: &str,
) -> Result<Vec<String>, ApiError> {
    let response = ctx
        .http
        .get(format!("{}/v1/me/top/{}", ctx.config.spotify_api_url, kind))
        .bearer_auth(access_token)
        .send()
        .await
        .and_then(|res| res.error_for_status())
        .map_err(top_items_error)?;
    let items = response
        .json::<TopItemsResponse>()
        .await
        .map_err(top_items_error)?;
    Ok(items.items.into_iter().map(|item| item.name).collect())
}

fn top_items_error(err: reqwest::Error) -> ApiError {
    log::error!("spotify top items request failed: {}", err);
    ApiError::Internal("Internal server error".to_string())
}
