use actix_web::{web, HttpResponse};
use serde_json::json;
use uuid::Uuid;

use crate::auth::Caller;
use crate::db::models::User;
use crate::error::AppError;
use crate::AppState;

async fn load_user(state: &AppState, id: Uuid) -> Result<User, AppError> {
    state
        .users
        .find_user(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("user {}", id)))
}

/// `GET /users/{id}/favorites`: only the user themselves may list them.
pub async fn favorites(
    path: web::Path<Uuid>,
    caller: Caller,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    if caller.user().id != id {
        load_user(&state, id).await?;
        return Err(AppError::Forbidden("favorites are private".into()));
    }

    let list = state.favorites.list(caller.user()).await?;
    Ok(HttpResponse::Ok().json(json!({ "list": list })))
}

/// `GET /users/{id}/is_store_owner`
pub async fn is_store_owner(
    path: web::Path<Uuid>,
    _caller: Caller,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let user = load_user(&state, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({ "result": user.is_store_owner })))
}

/// `GET /users/{id}/is_vaccinated`
pub async fn is_vaccinated(
    path: web::Path<Uuid>,
    _caller: Caller,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let user = load_user(&state, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({ "result": user.is_vaccinated })))
}
