use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::auth::service::Registration;
use crate::db::models::User;
use crate::error::AppError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub user: User,
    pub token: String,
}

/// `POST /auth/token`
pub async fn login(
    req: web::Json<LoginRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    info!("Received login request for {}", req.username);
    match state.auth.authenticate(&req.username, &req.password).await {
        Ok(token) => {
            info!("Login successful for {}", req.username);
            Ok(HttpResponse::Ok().json(AuthResponse { token }))
        }
        Err(e) => {
            error!("Login failed for {}: {}", req.username, e);
            Err(e)
        }
    }
}

/// `POST /users`: registers the account and logs it in straight away.
pub async fn register(
    req: web::Json<Registration>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    info!("Received registration request for {}", req.username);

    let user = match state.auth.register(req.into_inner()).await {
        Ok(user) => user,
        Err(e) => {
            error!("Registration failed: {}", e);
            return Err(e);
        }
    };

    let token = state.auth.issue_token(&user)?;
    Ok(HttpResponse::Created().json(RegisterResponse { user, token }))
}
