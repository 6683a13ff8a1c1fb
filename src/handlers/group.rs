use actix_web::{delete, get, post, put, web, HttpRequest, HttpResponse};
use uuid::Uuid;

use crate::{
    config::AppContext,
    dto::{CreateGroupRequest, GroupInviteRequest, UpdateGroupRequest},
    errors::ApiError,
    service::{self, auth},
};

#[get("")]
pub async fn get_all(ctx: web::Data<AppContext>) -> Result<HttpResponse, ApiError> {
    let groups = service::group::list(&ctx.pool).await?;
    Ok(HttpResponse::Ok().json(groups))
}

#[post("")]
pub async fn create(
    dto: web::Json<CreateGroupRequest>,
    ctx: web::Data<AppContext>,
) -> Result<HttpResponse, ApiError> {
    let group = service::group::create(dto.into_inner(), &ctx.pool).await?;
    Ok(HttpResponse::Created().json(group))
}

/// Groups created by a user, for the "my groups" view.
#[get("/findGroup/{userId}")]
pub async fn find_groups(
    id: web::Path<Uuid>,
    ctx: web::Data<AppContext>,
) -> Result<HttpResponse, ApiError> {
    let groups = service::group::created_by(id.into_inner(), &ctx.pool).await?;
    Ok(HttpResponse::Ok().json(groups))
}

#[post("/inviteUsers")]
pub async fn invite_user(
    dto: web::Json<GroupInviteRequest>,
    ctx: web::Data<AppContext>,
) -> Result<HttpResponse, ApiError> {
    let member = service::group::invite(dto.into_inner(), &ctx.pool).await?;
    Ok(HttpResponse::Created().json(member))
}

/// Populates the "invite to group" picker: groups owned by the caller the
/// target user is not in yet.
#[get("/getGroupAndCheckIfUserInGroup/{ownUserId}/{userId}")]
pub async fn groups_without_member(
    path: web::Path<(Uuid, Uuid)>,
    ctx: web::Data<AppContext>,
) -> Result<HttpResponse, ApiError> {
    let (own_user_id, user_id) = path.into_inner();
    let groups = service::group::owned_without_member(own_user_id, user_id, &ctx.pool).await?;
    Ok(HttpResponse::Ok().json(groups))
}

#[get("/getGroup/{userId}")]
pub async fn groups_of_user(
    id: web::Path<Uuid>,
    ctx: web::Data<AppContext>,
) -> Result<HttpResponse, ApiError> {
    let groups = service::group::groups_of(id.into_inner(), &ctx.pool).await?;
    Ok(HttpResponse::Ok().json(groups))
}

#[get("/getUserFromGroup/{groupId}")]
pub async fn members_of_group(
    id: web::Path<Uuid>,
    ctx: web::Data<AppContext>,
) -> Result<HttpResponse, ApiError> {
    let members = service::group::members_of(id.into_inner(), &ctx.pool).await?;
    Ok(HttpResponse::Ok().json(members))
}

#[put("/removeUserFromGroup/{groupId}/{userId}")]
pub async fn remove_user_from_group(
    req: HttpRequest,
    path: web::Path<(Uuid, Uuid)>,
    ctx: web::Data<AppContext>,
) -> Result<HttpResponse, ApiError> {
    let caller = auth::current_user(&req)?;
    let (group_id, user_id) = path.into_inner();
    service::group::kick(group_id, user_id, &caller, &ctx.pool).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[get("/{groupId}")]
pub async fn get_by_id(
    id: web::Path<Uuid>,
    ctx: web::Data<AppContext>,
) -> Result<HttpResponse, ApiError> {
    let group = service::group::get(id.into_inner(), &ctx.pool).await?;
    Ok(HttpResponse::Ok().json(group))
}

#[put("/{groupId}")]
pub async fn update(
    id: web::Path<Uuid>,
    dto: web::Json<UpdateGroupRequest>,
    ctx: web::Data<AppContext>,
) -> Result<HttpResponse, ApiError> {
    let group = service::group::update(id.into_inner(), dto.into_inner(), &ctx.pool).await?;
    Ok(HttpResponse::Ok().json(group))
}

#[delete("/{groupId}")]
pub async fn delete_group(
    id: web::Path<Uuid>,
    ctx: web::Data<AppContext>,
) -> Result<HttpResponse, ApiError> {
    service::group::delete(id.into_inner(), &ctx.pool).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(get_all)
        .service(create)
        .service(find_groups)
        .service(invite_user)
        .service(groups_without_member)
        .service(groups_of_user)
        .service(members_of_group)
        .service(remove_user_from_group)
        .service(get_by_id)
        .service(update)
        .service(delete_group);
}
