use std::future::{ready, Ready};

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header,
    HttpMessage, HttpRequest,
};
use futures_util::future::LocalBoxFuture;
use log::debug;
use uuid::Uuid;

use crate::{db, dto::LoginRequest, errors::ApiError, service::crypto, PGPool};

/// Identity decoded from the bearer token and attached to the request by
/// [`PrepareAuth`].
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub id: Uuid,
    pub email: String,
    pub username: String,
}

/// Pulls the identity a middleware attached earlier; fails with 401 when the
/// request carried no usable token.
pub fn current_user(req: &HttpRequest) -> Result<AuthenticatedUser, ApiError> {
    req.extensions()
        .get::<AuthenticatedUser>()
        .cloned()
        .ok_or_else(|| ApiError::Unauthorized("You don't have access".to_string()))
}

pub async fn login(pool: &PGPool, jwt_secret: &str, req: LoginRequest) -> Result<String, ApiError> {
    req.validate()?;
    let user = db::user::find_by_email(&req.email, pool)
        .await?
        .ok_or_else(|| ApiError::Validation(vec!["User does not exist".to_string()]))?;
    if !crypto::verify_password(&req.password, &user.password_hash) {
        return Err(ApiError::Unauthorized("Incorrect password".to_string()));
    }
    jwt::generate_token(user.id, &user.email, &user.username, jwt_secret).map_err(|err| {
        log::error!("failed to sign token: {}", err);
        ApiError::Internal("Failed to issue a token".to_string())
    })
}

/// Stateless token verification. Runs on every request; decodes the
/// `Authorization` header (raw token or `Bearer <token>`) and attaches the
/// identity. Never rejects -- gating is [`RequireAuth`]'s job.
pub struct PrepareAuth {
    pub jwt_secret: String,
}

impl<S, B> Transform<S, ServiceRequest> for PrepareAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = actix_web::Error;
    type Transform = PrepareAuthService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(PrepareAuthService {
            service,
            jwt_secret: self.jwt_secret.clone(),
        }))
    }
}

pub struct PrepareAuthService<S> {
    service: S,
    jwt_secret: String,
}

impl<S, B> Service<ServiceRequest> for PrepareAuthService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if let Some(value) = req.headers().get(header::AUTHORIZATION) {
            if let Ok(raw) = value.to_str() {
                let token = raw.strip_prefix("Bearer ").unwrap_or(raw).trim();
                match jwt::verify_token(token, &self.jwt_secret) {
                    Ok(data) => {
                        req.extensions_mut().insert(AuthenticatedUser {
                            id: data.claims.id,
                            email: data.claims.email,
                            username: data.claims.username,
                        });
                    }
                    Err(err) => debug!("ignoring invalid bearer token: {}", err),
                }
            }
        }
        let fut = self.service.call(req);
        Box::pin(async move { fut.await })
    }
}

/// The gate for protected scopes: no attached identity means 401.
pub struct RequireAuth;

impl<S, B> Transform<S, ServiceRequest> for RequireAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = actix_web::Error;
    type Transform = RequireAuthService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireAuthService { service }))
    }
}

pub struct RequireAuthService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for RequireAuthService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let authenticated = req.extensions().get::<AuthenticatedUser>().is_some();
        if authenticated {
            let fut = self.service.call(req);
            Box::pin(async move { fut.await })
        } else {
            Box::pin(ready(Err(ApiError::Unauthorized(
                "You don't have access".to_string(),
            )
            .into())))
        }
    }
}

pub mod jwt {
    use chrono::Utc;
    use jsonwebtoken::{
        decode, encode, DecodingKey, EncodingKey, Header, TokenData, Validation,
    };
    use uuid::Uuid;

    use crate::{dto::Claims, TOKEN_ISSUER, TOKEN_TTL_SECS};

    pub fn generate_token(
        id: Uuid,
        email: &str,
        username: &str,
        secret: &str,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let claims = Claims {
            id,
            email: email.to_string(),
            username: username.to_string(),
            exp: Utc::now().timestamp() as usize + TOKEN_TTL_SECS,
            iss: TOKEN_ISSUER.to_string(),
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_ref()),
        )
    }

    pub fn verify_token(
        token: &str,
        secret: &str,
    ) -> Result<TokenData<Claims>, jsonwebtoken::errors::Error> {
        let mut validation = Validation::default();
        validation.set_issuer(&[TOKEN_ISSUER]);
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(secret.as_ref()),
            &validation,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{get, test as actix_test, web, App, HttpResponse};
    use chrono::Utc;
    use jsonwebtoken::{encode, EncodingKey, Header};

    use crate::dto::Claims;
    use crate::TOKEN_ISSUER;

    const SECRET: &str = "test-secret";

    #[test]
    fn token_round_trip_preserves_identity() {
        let id = Uuid::new_v4();
        let token = jwt::generate_token(id, "a@x.com", "mingler", SECRET).expect("token");
        let data = jwt::verify_token(&token, SECRET).expect("valid token");
        assert_eq!(data.claims.id, id);
        assert_eq!(data.claims.email, "a@x.com");
        assert_eq!(data.claims.username, "mingler");
        assert_eq!(data.claims.iss, TOKEN_ISSUER);
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let token = jwt::generate_token(Uuid::new_v4(), "a@x.com", "mingler", "other").unwrap();
        assert!(jwt::verify_token(&token, SECRET).is_err());
    }

    fn token_with(exp: usize, iss: &str) -> String {
        let claims = Claims {
            id: Uuid::new_v4(),
            email: "a@x.com".to_string(),
            username: "mingler".to_string(),
            exp,
            iss: iss.to_string(),
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_ref()),
        )
        .unwrap()
    }

    #[test]
    fn expired_token_is_rejected() {
        let exp = (Utc::now().timestamp() - 3600) as usize;
        let token = token_with(exp, TOKEN_ISSUER);
        assert!(jwt::verify_token(&token, SECRET).is_err());
    }

    #[test]
    fn token_with_foreign_issuer_is_rejected() {
        let exp = (Utc::now().timestamp() + 3600) as usize;
        let token = token_with(exp, "http://someone-else.auth");
        assert!(jwt::verify_token(&token, SECRET).is_err());
    }

    #[get("/whoami")]
    async fn whoami(req: HttpRequest) -> Result<HttpResponse, ApiError> {
        let user = current_user(&req)?;
        Ok(HttpResponse::Ok().body(user.username))
    }

    fn protected_app() -> App<
        impl actix_web::dev::ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .wrap(PrepareAuth {
                jwt_secret: SECRET.to_string(),
            })
            .service(web::scope("/protected").wrap(RequireAuth).service(whoami))
    }

    #[actix_web::test]
    async fn gate_rejects_requests_without_a_token() {
        let app = actix_test::init_service(protected_app()).await;
        let req = actix_test::TestRequest::get()
            .uri("/protected/whoami")
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), actix_web::http::StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn gate_admits_a_valid_bearer_token() {
        let app = actix_test::init_service(protected_app()).await;
        let token = jwt::generate_token(Uuid::new_v4(), "a@x.com", "mingler", SECRET).unwrap();
        let req = actix_test::TestRequest::get()
            .uri("/protected/whoami")
            .insert_header((header::AUTHORIZATION, format!("Bearer {}", token)))
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), actix_web::http::StatusCode::OK);
        let body = actix_test::read_body(res).await;
        assert_eq!(body, "mingler");
    }

    #[actix_web::test]
    async fn gate_accepts_a_raw_token_without_prefix() {
        let app = actix_test::init_service(protected_app()).await;
        let token = jwt::generate_token(Uuid::new_v4(), "a@x.com", "mingler", SECRET).unwrap();
        let req = actix_test::TestRequest::get()
            .uri("/protected/whoami")
            .insert_header((header::AUTHORIZATION, token))
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), actix_web::http::StatusCode::OK);
    }

    #[actix_web::test]
    async fn garbage_token_is_ignored_and_gated() {
        let app = actix_test::init_service(protected_app()).await;
        let req = actix_test::TestRequest::get()
            .uri("/protected/whoami")
            .insert_header((header::AUTHORIZATION, "Bearer not-a-jwt"))
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), actix_web::http::StatusCode::UNAUTHORIZED);
    }
}
