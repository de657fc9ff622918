use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::auth::Caller;
use crate::error::AppError;
use crate::qr;
use crate::services::parse_token;
use crate::AppState;

/// `GET /codes`: the caller's own outstanding codes.
pub async fn list(caller: Caller, state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(state.codes.list_for_user(caller.user()).await?))
}

/// `POST /codes/{token}/enter`: first call checks in, second checks out.
pub async fn enter(
    path: web::Path<String>,
    _caller: Caller,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let token = parse_token(&path)?;
    let status = state.codes.toggle(token).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "status": status
    })))
}

/// `GET /codes/{token}/qr.png`
pub async fn qr_png(path: web::Path<String>, _caller: Caller) -> Result<HttpResponse, AppError> {
    let png = qr::render(&path)?;
    Ok(HttpResponse::Ok().content_type("image/png").body(png))
}
