use actix_web::{web, HttpResponse, Result};

use crate::database::models::{LoginInput, RegisterInput, UserInfo};
use crate::database::repositories::UserStore;
use crate::handlers::shared::ApiResponse;
use crate::services::auth::{AuthService, Claims};
use std::sync::Arc;

pub async fn register(
    auth_service: web::Data<AuthService>,
    input: web::Json<RegisterInput>,
) -> Result<HttpResponse> {
    match auth_service.register(input.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Created().json(ApiResponse::success(response))),
        Err(err) => {
            log::error!("Registration failed: {}", err);
            Ok(HttpResponse::BadRequest().json(ApiResponse::<()>::error(&err.to_string())))
        }
    }
}

pub async fn login(
    auth_service: web::Data<AuthService>,
    input: web::Json<LoginInput>,
) -> Result<HttpResponse> {
    match auth_service.login(input.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(response))),
        Err(err) => {
            log::warn!("Login failed: {}", err);
            Ok(HttpResponse::Unauthorized().json(ApiResponse::<()>::error(&err.to_string())))
        }
    }
}

pub async fn me(claims: Claims, users: web::Data<Arc<dyn UserStore>>) -> Result<HttpResponse> {
    match users.find_by_id(claims.sub).await {
        Ok(Some(user)) => {
            Ok(HttpResponse::Ok().json(ApiResponse::success(UserInfo::from(user))))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::<()>::error("User not found"))),
        Err(err) => {
            log::error!("Error fetching current user: {}", err);
            Ok(HttpResponse::InternalServerError()
                .json(ApiResponse::<()>::error("Failed to fetch user")))
        }
    }
}
