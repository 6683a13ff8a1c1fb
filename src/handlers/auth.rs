use actix_web::{get, http::header, post, web, HttpRequest, HttpResponse};
use serde_json::json;
use uuid::Uuid;

use crate::{
    config::AppContext,
    dto::{LoginRequest, RegisterRequest, RegisteredUser, SpotifyCallbackQuery},
    errors::ApiError,
    service,
};

#[post("/register")]
pub async fn register(
    dto: web::Json<RegisterRequest>,
    ctx: web::Data<AppContext>,
) -> Result<HttpResponse, ApiError> {
    let user = service::user::register(dto.into_inner(), &ctx.pool).await?;
    Ok(HttpResponse::Created().json(RegisteredUser::from(&user)))
}

#[post("/login")]
pub async fn login(
    dto: web::Json<LoginRequest>,
    ctx: web::Data<AppContext>,
) -> Result<HttpResponse, ApiError> {
    let token =
        service::auth::login(&ctx.pool, &ctx.config.jwt_secret, dto.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({ "accessToken": token })))
}

/// Bounces the provider's redirect back to the SPA, query string untouched.
#[get("/spotify/redirect")]
pub async fn spotify_redirect(req: HttpRequest, ctx: web::Data<AppContext>) -> HttpResponse {
    let target = format!(
        "{}/spotify-redirect?{}",
        ctx.config.frontend_url,
        req.query_string()
    );
    HttpResponse::Found()
        .insert_header((header::LOCATION, target))
        .finish()
}

#[get("/spotify/authorize")]
pub async fn spotify_authorize(ctx: web::Data<AppContext>) -> Result<HttpResponse, ApiError> {
    let state = Uuid::new_v4().simple().to_string();
    let url = service::spotify::authorize_url(&ctx.config, &state)?;
    Ok(HttpResponse::Found()
        .insert_header((header::LOCATION, url.to_string()))
        .finish())
}

#[get("/spotify/callback")]
pub async fn spotify_callback(
    query: web::Query<SpotifyCallbackQuery>,
    ctx: web::Data<AppContext>,
) -> Result<HttpResponse, ApiError> {
    let query = query.into_inner();
    let code = query
        .code
        .ok_or_else(|| ApiError::Validation(vec!["code not provided!".to_string()]))?;
    let state = query
        .state
        .ok_or_else(|| ApiError::Validation(vec!["state not provided!".to_string()]))?;
    let user_id = query
        .user_id
        .ok_or_else(|| ApiError::Validation(vec!["user not authenticated!".to_string()]))?;

    let token = service::spotify::exchange_code(&ctx, &code, &state).await?;
    service::spotify::link_account(&ctx, user_id, token).await?;

    Ok(HttpResponse::Found()
        .insert_header((
            header::LOCATION,
            format!("{}/profile", ctx.config.frontend_url),
        ))
        .finish())
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(register)
        .service(login)
        .service(spotify_redirect)
        .service(spotify_authorize)
        .service(spotify_callback);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_support::lazy_context;
    use crate::errors;
    use actix_web::{http::StatusCode, test as actix_test, App};
    use serde_json::Value;

    fn auth_app() -> App<
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
            .app_data(errors::json_error_config())
            .app_data(errors::query_error_config())
            .service(web::scope("/auth").configure(config))
    }

    #[actix_web::test]
    async fn register_reports_every_failing_field() {
        let app = actix_test::init_service(auth_app()).await;
        let req = actix_test::TestRequest::post()
            .uri("/auth/register")
            .set_json(json!({
                "eMail": "nope",
                "dateOfBirth": "31-12-2000",
                "username": " ",
                "password": "abc"
            }))
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(res).await;
        let errors = body["errors"].as_array().expect("errors array");
        assert_eq!(errors.len(), 4);
    }

    #[actix_web::test]
    async fn register_rejects_a_non_json_shape() {
        let app = actix_test::init_service(auth_app()).await;
        let req = actix_test::TestRequest::post()
            .uri("/auth/register")
            .set_json(json!({ "eMail": "a@x.com" }))
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn login_rejects_a_malformed_email() {
        let app = actix_test::init_service(auth_app()).await;
        let req = actix_test::TestRequest::post()
            .uri("/auth/login")
            .set_json(json!({ "eMail": "broken", "password": "secret" }))
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["errors"][0], "Invalid email format");
    }

    #[actix_web::test]
    async fn authorize_redirects_to_the_provider() {
        let app = actix_test::init_service(auth_app()).await;
        let req = actix_test::TestRequest::get()
            .uri("/auth/spotify/authorize")
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::FOUND);
        let location = res
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .expect("location header");
        assert!(location.starts_with("https://accounts.spotify.com/authorize?"));
        assert!(location.contains("client_id=client-id"));
        assert!(location.contains("show_dialog=true"));
    }

    #[actix_web::test]
    async fn redirect_passes_the_query_through_to_the_frontend() {
        let app = actix_test::init_service(auth_app()).await;
        let req = actix_test::TestRequest::get()
            .uri("/auth/spotify/redirect?code=abc&state=xyz")
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::FOUND);
        let location = res
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .expect("location header");
        assert_eq!(
            location,
            "http://localhost:5173/spotify-redirect?code=abc&state=xyz"
        );
    }

    #[actix_web::test]
    async fn callback_requires_code_state_and_user() {
        let app = actix_test::init_service(auth_app()).await;
        let req = actix_test::TestRequest::get()
            .uri("/auth/spotify/callback?state=xyz")
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["errors"][0], "code not provided!");
    }
}
