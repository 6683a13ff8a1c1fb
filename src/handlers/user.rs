use actix_multipart::Multipart;
use actix_web::{delete, get, post, put, web, HttpResponse};
use serde_json::json;
use uuid::Uuid;

use crate::{
    config::AppContext, dto::UpdateUserRequest, errors::ApiError, service,
};

#[get("")]
pub async fn get_all(ctx: web::Data<AppContext>) -> Result<HttpResponse, ApiError> {
    let users = service::user::list(&ctx.pool).await?;
    Ok(HttpResponse::Ok().json(users))
}

#[get("/{userId}")]
pub async fn get_by_id(
    id: web::Path<Uuid>,
    ctx: web::Data<AppContext>,
) -> Result<HttpResponse, ApiError> {
    let user = service::user::profile(id.into_inner(), &ctx.pool).await?;
    Ok(HttpResponse::Ok().json(user))
}

#[put("/{userId}")]
pub async fn update(
    id: web::Path<Uuid>,
    dto: web::Json<UpdateUserRequest>,
    ctx: web::Data<AppContext>,
) -> Result<HttpResponse, ApiError> {
    let user = service::user::update(id.into_inner(), dto.into_inner(), &ctx.pool).await?;
    Ok(HttpResponse::Ok().json(user))
}

#[delete("/{userId}")]
pub async fn delete_user(
    id: web::Path<Uuid>,
    ctx: web::Data<AppContext>,
) -> Result<HttpResponse, ApiError> {
    service::user::delete(id.into_inner(), &ctx.pool).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[post("/upload/{userId}")]
pub async fn upload_picture(
    id: web::Path<Uuid>,
    payload: Multipart,
    ctx: web::Data<AppContext>,
) -> Result<HttpResponse, ApiError> {
    let user_id = id.into_inner();
    let filename = service::user::save_picture(user_id, payload, &ctx).await?;
    Ok(HttpResponse::Ok().json(json!({
        "message": format!("File uploaded successfully: {} for user {}", filename, user_id)
    })))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(get_all)
        .service(upload_picture)
        .service(get_by_id)
        .service(update)
        .service(delete_user);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_support::lazy_context;
    use crate::errors;
    use actix_web::{http::StatusCode, test as actix_test, App};
    use serde_json::Value;

    #[actix_web::test]
    async fn a_garbled_user_id_is_a_validation_error() {
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(lazy_context()))
                .app_data(errors::path_error_config())
                .service(web::scope("/users").configure(config)),
        )
        .await;
        let req = actix_test::TestRequest::get()
            .uri("/users/not-a-uuid")
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(res).await;
        assert!(body["errors"].is_array());
    }
}
