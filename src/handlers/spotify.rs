use actix_web::{delete, get, web, HttpRequest, HttpResponse};
use serde_json::json;
use uuid::Uuid;

use crate::{
    config::AppContext,
    errors::ApiError,
    service::{self, auth, spotify::RefreshOutcome},
};

/// The provider token travels in this header rather than the URL path.
pub const SPOTIFY_TOKEN_HEADER: &str = "X-Spotify-Token";

#[get("/refresh")]
pub async fn refresh(
    req: HttpRequest,
    ctx: web::Data<AppContext>,
) -> Result<HttpResponse, ApiError> {
    let user = auth::current_user(&req)?;
    let outcome = service::spotify::refresh_for_user(&ctx, user.id).await?;
    let message = match outcome {
        RefreshOutcome::Refreshed => "Access token refreshed",
        RefreshOutcome::NotExpired => "Access token not expired",
    };
    Ok(HttpResponse::Ok().json(json!({ "message": message })))
}

#[delete("/{userId}")]
pub async fn unlink(
    id: web::Path<Uuid>,
    ctx: web::Data<AppContext>,
) -> Result<HttpResponse, ApiError> {
    service::spotify::unlink(&ctx, id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Spotify account unlinked" })))
}

#[get("/top-artists")]
pub async fn top_artists(
    req: HttpRequest,
    ctx: web::Data<AppContext>,
) -> Result<HttpResponse, ApiError> {
    let token = provider_token(&req)?;
    let names = service::spotify::top_item_names(&ctx, &token, "artists").await?;
    Ok(HttpResponse::Ok().json(names))
}

#[get("/top-tracks")]
pub async fn top_tracks(
    req: HttpRequest,
    ctx: web::Data<AppContext>,
) -> Result<HttpResponse, ApiError> {
    let token = provider_token(&req)?;
    let names = service::spotify::top_item_names(&ctx, &token, "tracks").await?;
    Ok(HttpResponse::Ok().json(names))
}

fn provider_token(req: &HttpRequest) -> Result<String, ApiError> {
    req.headers()
        .get(SPOTIFY_TOKEN_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_string())
        .ok_or_else(|| {
            ApiError::Validation(vec!["spotify access token not provided".to_string()])
        })
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(refresh)
        .service(top_artists)
        .service(top_tracks)
        .service(unlink);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_support::lazy_context;
    use actix_web::{http::StatusCode, test as actix_test, App};
    use serde_json::Value;

    fn spotify_app() -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(web::Data::new(lazy_context()))
            .service(web::scope("/spotify").configure(config))
    }

    #[actix_web::test]
    async fn top_artists_requires_the_provider_token_header() {
        let app = actix_test::init_service(spotify_app()).await;
        let req = actix_test::TestRequest::get()
            .uri("/spotify/top-artists")
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["errors"][0], "spotify access token not provided");
    }

    #[actix_web::test]
    async fn refresh_requires_an_identity() {
        let app = actix_test::init_service(spotify_app()).await;
        let req = actix_test::TestRequest::get()
            .uri("/spotify/refresh")
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }
}
