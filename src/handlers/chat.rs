use actix_web::{get, post, web, HttpResponse};
use uuid::Uuid;

use crate::{
    config::AppContext,
    dto::{NewGroupMessageRequest, NewMessageRequest},
    errors::ApiError,
    service,
};

#[post("/message")]
pub async fn send_message(
    dto: web::Json<NewMessageRequest>,
    ctx: web::Data<AppContext>,
) -> Result<HttpResponse, ApiError> {
    let message = service::chat::send_direct(dto.into_inner(), &ctx.pool).await?;
    Ok(HttpResponse::Created().json(message))
}

/// The composed id is order-independent, so either participant order returns
/// the same history.
#[get("/message/{sender_id}/{receiver_id}")]
pub async fn message_history(
    path: web::Path<(Uuid, Uuid)>,
    ctx: web::Data<AppContext>,
) -> Result<HttpResponse, ApiError> {
    let (sender_id, receiver_id) = path.into_inner();
    let messages = service::chat::direct_history(sender_id, receiver_id, &ctx.pool).await?;
    Ok(HttpResponse::Ok().json(messages))
}

#[post("/groupMessage")]
pub async fn send_group_message(
    dto: web::Json<NewGroupMessageRequest>,
    ctx: web::Data<AppContext>,
) -> Result<HttpResponse, ApiError> {
    let message = service::chat::send_group(dto.into_inner(), &ctx.pool).await?;
    Ok(HttpResponse::Created().json(message))
}

#[get("/groupMessage/{sender_id}/{group_id}")]
pub async fn group_message_history(
    path: web::Path<(Uuid, Uuid)>,
    ctx: web::Data<AppContext>,
) -> Result<HttpResponse, ApiError> {
    let (_sender_id, group_id) = path.into_inner();
    let messages = service::chat::group_history(group_id, &ctx.pool).await?;
    Ok(HttpResponse::Ok().json(messages))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(send_message)
        .service(message_history)
        .service(send_group_message)
        .service(group_message_history);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_support::lazy_context;
    use crate::errors;
    use actix_web::{http::StatusCode, test as actix_test, App};
    use serde_json::json;

    #[actix_web::test]
    async fn sending_a_message_without_text_is_a_validation_error() {
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(lazy_context()))
                .app_data(errors::json_error_config())
                .service(web::scope("/chat").configure(config)),
        )
        .await;
        let req = actix_test::TestRequest::post()
            .uri("/chat/message")
            .set_json(json!({
                "sender_id": Uuid::new_v4(),
                "receiver_id": Uuid::new_v4()
            }))
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}
