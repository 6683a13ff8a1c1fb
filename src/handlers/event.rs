use actix_web::{delete, get, post, put, web, HttpRequest, HttpResponse};
use serde_json::json;
use uuid::Uuid;

use crate::{
    config::AppContext,
    dto::{CreateEventRequest, EventInviteRequest, EventListQuery, UpdateEventRequest},
    errors::ApiError,
    service::{self, auth},
};

#[get("/public")]
pub async fn public_events(ctx: web::Data<AppContext>) -> Result<HttpResponse, ApiError> {
    let listing = service::event::public_listing(&ctx.pool).await?;
    Ok(HttpResponse::Ok().json(listing))
}

/// Union of created and participated events for one user.
#[get("")]
pub async fn list_for_user(
    query: web::Query<EventListQuery>,
    ctx: web::Data<AppContext>,
) -> Result<HttpResponse, ApiError> {
    let events = service::event::list_for_user(query.user_id, &ctx.pool).await?;
    Ok(HttpResponse::Ok().json(events))
}

#[post("")]
pub async fn create(
    dto: web::Json<CreateEventRequest>,
    ctx: web::Data<AppContext>,
) -> Result<HttpResponse, ApiError> {
    let event = service::event::create(dto.into_inner(), &ctx.pool).await?;
    Ok(HttpResponse::Created().json(event))
}

#[post("/join/{eventId}")]
pub async fn join(
    req: HttpRequest,
    id: web::Path<Uuid>,
    ctx: web::Data<AppContext>,
) -> Result<HttpResponse, ApiError> {
    let user = auth::current_user(&req)?;
    let message = service::event::join(id.into_inner(), &user, &ctx.pool).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": message })))
}

#[post("/invite/{eventId}")]
pub async fn invite(
    req: HttpRequest,
    id: web::Path<Uuid>,
    dto: web::Json<EventInviteRequest>,
    ctx: web::Data<AppContext>,
) -> Result<HttpResponse, ApiError> {
    let caller = auth::current_user(&req)?;
    let message =
        service::event::invite(id.into_inner(), dto.invited_user_id, &caller, &ctx.pool).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": message })))
}

#[post("/leave/{eventId}")]
pub async fn leave(
    req: HttpRequest,
    id: web::Path<Uuid>,
    ctx: web::Data<AppContext>,
) -> Result<HttpResponse, ApiError> {
    let user = auth::current_user(&req)?;
    let message = service::event::leave(id.into_inner(), &user, &ctx.pool).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": message })))
}

#[get("/{eventId}")]
pub async fn get_by_id(
    id: web::Path<Uuid>,
    ctx: web::Data<AppContext>,
) -> Result<HttpResponse, ApiError> {
    let event = service::event::get(id.into_inner(), &ctx.pool).await?;
    Ok(HttpResponse::Ok().json(event))
}

#[put("/{eventId}")]
pub async fn update(
    id: web::Path<Uuid>,
    dto: web::Json<UpdateEventRequest>,
    ctx: web::Data<AppContext>,
) -> Result<HttpResponse, ApiError> {
    let event = service::event::update(id.into_inner(), dto.into_inner(), &ctx.pool).await?;
    Ok(HttpResponse::Ok().json(event))
}

#[delete("/{eventId}")]
pub async fn delete_event(
    id: web::Path<Uuid>,
    ctx: web::Data<AppContext>,
) -> Result<HttpResponse, ApiError> {
    service::event::delete(id.into_inner(), &ctx.pool).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(public_events)
        .service(list_for_user)
        .service(create)
        .service(join)
        .service(invite)
        .service(leave)
        .service(get_by_id)
        .service(update)
        .service(delete_event);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_support::lazy_context;
    use crate::errors;
    use actix_web::{http::StatusCode, test as actix_test, App};

    fn event_app() -> App<
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
            .service(web::scope("/events").configure(config))
    }

    #[actix_web::test]
    async fn creating_an_event_without_a_name_is_a_validation_error() {
        let app = actix_test::init_service(event_app()).await;
        let req = actix_test::TestRequest::post()
            .uri("/events")
            .set_json(serde_json::json!({
                "creator": Uuid::new_v4(),
                "startDate": "2022-12-12T12:00:00Z",
                "endDate": "2022-12-12T14:00:00Z"
            }))
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn joining_without_an_identity_is_rejected() {
        let app = actix_test::init_service(event_app()).await;
        let req = actix_test::TestRequest::post()
            .uri(&format!("/events/join/{}", Uuid::new_v4()))
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn listing_requires_a_user_id_query() {
        let app = actix_test::init_service(event_app()).await;
        let req = actix_test::TestRequest::get().uri("/events").to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}
