use actix_web::{delete, get, post, web, HttpResponse};

use crate::{
    config::AppContext,
    dto::{MatchPair, MatchesOfUserQuery},
    errors::ApiError,
    service,
};

#[post("")]
pub async fn create(
    dto: web::Json<MatchPair>,
    ctx: web::Data<AppContext>,
) -> Result<HttpResponse, ApiError> {
    let created = service::matches::create(dto.into_inner(), &ctx.pool).await?;
    Ok(HttpResponse::Created().json(created))
}

/// Strict mutual lookup: 404 unless both directional rows exist.
#[get("")]
pub async fn get_mutual(
    dto: web::Json<MatchPair>,
    ctx: web::Data<AppContext>,
) -> Result<HttpResponse, ApiError> {
    let pair = dto.into_inner();
    let result = service::matches::mutual(pair.user_a, pair.user_b, &ctx.pool).await?;
    Ok(HttpResponse::Ok().json(result))
}

#[delete("")]
pub async fn delete_match(
    dto: web::Json<MatchPair>,
    ctx: web::Data<AppContext>,
) -> Result<HttpResponse, ApiError> {
    let deleted = service::matches::delete(dto.into_inner(), &ctx.pool).await?;
    Ok(HttpResponse::Ok().json(deleted))
}

/// Both directional lookups at once; each side may be empty.
#[get("/checkMatch")]
pub async fn check_match(
    query: web::Query<MatchPair>,
    ctx: web::Data<AppContext>,
) -> Result<HttpResponse, ApiError> {
    let pair = query.into_inner();
    let result = service::matches::check(pair.user_a, pair.user_b, &ctx.pool).await?;
    Ok(HttpResponse::Ok().json(result))
}

#[get("/getMatchesOfAnUser")]
pub async fn matches_of_user(
    query: web::Query<MatchesOfUserQuery>,
    ctx: web::Data<AppContext>,
) -> Result<HttpResponse, ApiError> {
    let matches = service::matches::of_user(query.user, &ctx.pool).await?;
    Ok(HttpResponse::Ok().json(matches))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(create)
        .service(check_match)
        .service(matches_of_user)
        .service(get_mutual)
        .service(delete_match);
}
