use std::collections::HashMap;

use actix_multipart::Multipart;
use chrono::Utc;
use futures_util::TryStreamExt;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::{
    config::AppContext,
    db,
    dto::{RegisterRequest, UpdateUserRequest, UserWithSpotify},
    errors::ApiError,
    models::{SpotifyAuthInfo, User},
    service::crypto,
    PGPool,
};

pub async fn register(dto: RegisterRequest, pool: &PGPool) -> Result<User, ApiError> {
    let date_of_birth = dto.validate()?;
    if db::user::find_by_email(&dto.email, pool).await?.is_some() {
        return Err(ApiError::Validation(vec![
            "User with this email already exists".to_string(),
        ]));
    }
    if db::user::username_exists(&dto.username, pool).await? {
        return Err(ApiError::Validation(vec![
            "User with this username already exists".to_string(),
        ]));
    }
    let password_hash = crypto::hash_password(&dto.password)?;
    let user = User {
        id: Uuid::new_v4(),
        firstname: None,
        lastname: None,
        email: dto.email,
        date_of_birth,
        created_at: Utc::now(),
        username: dto.username,
        bio: None,
        gender: None,
        city: None,
        state: None,
        password_hash,
        genre_preferences: None,
        image: None,
        top_track_id: None,
    };
    db::user::create(&user, pool).await?;
    Ok(user)
}

pub async fn profile(id: Uuid, pool: &PGPool) -> Result<UserWithSpotify, ApiError> {
    let user = db::user::find_by_id(id, pool)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;
    let spotify_auth_info = db::spotify::find_by_user(id, pool).await?;
    Ok(UserWithSpotify {
        user,
        spotify_auth_info,
    })
}

pub async fn list(pool: &PGPool) -> Result<Vec<UserWithSpotify>, ApiError> {
    let users = db::user::get_all(pool).await?;
    if users.is_empty() {
        return Err(ApiError::NotFound("No users found".to_string()));
    }
    let mut by_user: HashMap<Uuid, SpotifyAuthInfo> = db::spotify::get_all(pool)
        .await?
        .into_iter()
        .map(|info| (info.user_id, info))
        .collect();
    Ok(users
        .into_iter()
        .map(|user| {
            let spotify_auth_info = by_user.remove(&user.id);
            UserWithSpotify {
                user,
                spotify_auth_info,
            }
        })
        .collect())
}

pub async fn update(
    id: Uuid,
    fields: UpdateUserRequest,
    pool: &PGPool,
) -> Result<User, ApiError> {
    db::user::update(id, &fields, pool)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))
}

pub async fn delete(id: Uuid, pool: &PGPool) -> Result<(), ApiError> {
    if db::user::find_by_id(id, pool).await?.is_none() {
        return Err(ApiError::NotFound("User not found".to_string()));
    }
    db::user::delete(id, pool).await?;
    Ok(())
}

/// Streams the `profilePicture` multipart field to
/// `{picture_folder}/{user_id}{ext}` and records the filename on the user row.
pub async fn save_picture(
    user_id: Uuid,
    mut payload: Multipart,
    ctx: &AppContext,
) -> Result<String, ApiError> {
    while let Some(mut field) = payload.try_next().await.map_err(multipart_error)? {
        if field.name() != "profilePicture" {
            continue;
        }
        let extension = field
            .content_disposition()
            .get_filename()
            .and_then(|name| {
                std::path::Path::new(name)
                    .extension()
                    .map(|ext| ext.to_string_lossy().to_lowercase())
            })
            .ok_or_else(|| {
                ApiError::Validation(vec!["image format not supported".to_string()])
            })?;
        if extension != "png" && extension != "jpg" && extension != "jpeg" {
            return Err(ApiError::Validation(vec![
                "image format not supported".to_string(),
            ]));
        }

        let filename = format!("{}.{}", user_id, extension);
        let path = std::path::Path::new(&ctx.config.picture_folder).join(&filename);
        let mut file = tokio::fs::File::create(&path).await.map_err(io_error)?;
        while let Some(chunk) = field.try_next().await.map_err(multipart_error)? {
            file.write_all(&chunk).await.map_err(io_error)?;
        }
        file.flush().await.map_err(io_error)?;

        let updated = db::user::set_image(user_id, &filename, &ctx.pool).await?;
        if updated == 0 {
            return Err(ApiError::NotFound("User not found".to_string()));
        }
        return Ok(filename);
    }
    Err(ApiError::Validation(vec!["No file uploaded.".to_string()]))
}

fn multipart_error(err: actix_multipart::MultipartError) -> ApiError {
    ApiError::Validation(vec![format!("invalid multipart payload: {}", err)])
}

fn io_error(err: std::io::Error) -> ApiError {
    log::error!("failed to store uploaded file: {}", err);
    ApiError::Internal("Failed to store the uploaded file".to_string())
}
