use actix_web::{web, HttpResponse};
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::auth::Caller;
use crate::db::models::StoreAttributes;
use crate::error::AppError;
use crate::AppState;

/// `POST /stores`: the caller is checked before the body is parsed.
pub async fn create(
    caller: Caller,
    body: web::Bytes,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    state.stores.authorize_create(caller.user())?;
    let attributes: StoreAttributes = serde_json::from_slice(&body)
        .map_err(|e| AppError::ValidationError(format!("invalid store: {}", e)))?;

    let store = state.stores.create(caller.user(), attributes).await?;
    Ok(HttpResponse::Created().json(store))
}

/// `GET /stores`
pub async fn list(_caller: Caller, state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(state.stores.list().await?))
}

/// `GET /stores/{id}`
pub async fn retrieve(
    path: web::Path<Uuid>,
    _caller: Caller,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(state.stores.get(path.into_inner()).await?))
}

/// `PUT /stores/{id}`
pub async fn update(
    path: web::Path<Uuid>,
    req: web::Json<StoreAttributes>,
    caller: Caller,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let store = state
        .stores
        .update(caller.user(), path.into_inner(), req.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(store))
}

/// `DELETE /stores/{id}`
pub async fn destroy(
    path: web::Path<Uuid>,
    caller: Caller,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    state.stores.delete(caller.user(), path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// `GET|POST /stores/{id}/retrieve_code`: issues a fresh check-in token as plain text.
pub async fn retrieve_code(
    path: web::Path<Uuid>,
    caller: Caller,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let store = state.stores.get(path.into_inner()).await?;
    let token = state.codes.issue(caller.user(), &store).await?;

    Ok(HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body(token.to_string()))
}

/// `POST /stores/{id}/favorite`
pub async fn favorite(
    path: web::Path<Uuid>,
    caller: Caller,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let store = state.stores.get(path.into_inner()).await?;
    let change = state.favorites.toggle(caller.user(), &store).await?;

    Ok(HttpResponse::Ok().json(json!({
        "status": "success",
        "type": change
    })))
}

/// `GET /stores/{id}/get_store_patreons`: live occupancy.
pub async fn get_store_patreons(
    path: web::Path<Uuid>,
    _caller: Caller,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let store = state.stores.get(path.into_inner()).await?;
    let num = state.occupancy.count_checked_in(&store).await?;
    info!(store_id = %store.id, num, "Occupancy requested");

    Ok(HttpResponse::Ok().json(json!({ "num": num })))
}
