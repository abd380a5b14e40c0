use actix_web::{web, HttpResponse};
use bcrypt::{hash, DEFAULT_COST};
use std::sync::Arc;
use uuid::Uuid;

use crate::database::models::{CreateUserInput, Page, PageRequest, UpdateUserInput, User, UserInfo};
use crate::database::repositories::UserStore;
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::services::auth::Claims;

const DEFAULT_PAGE_SIZE: i64 = 5;

pub async fn create_user(
    claims: Claims,
    users: web::Data<Arc<dyn UserStore>>,
    input: web::Json<CreateUserInput>,
) -> Result<HttpResponse, AppError> {
    if !claims.is_manager_or_admin() {
        return Err(AppError::Forbidden("Manager access required".into()));
    }

    let input = input.into_inner();
    if users.email_exists(&input.email).await? {
        return Err(AppError::InvalidInput("User already exists".into()));
    }

    let password_hash = hash(&input.password, DEFAULT_COST)
        .map_err(|e| AppError::StorageError(e.to_string()))?;

    let mut user = User::new(
        input.name,
        input.email,
        password_hash,
        input.role.unwrap_or_default(),
    );
    user.manager = input.manager;
    user.created_by = Some(claims.sub);
    user.last_modified_by = Some(claims.sub);
    users.create(&user).await?;

    Ok(HttpResponse::Created().json(ApiResponse::success(UserInfo::from(user))))
}

pub async fn get_all_users(
    claims: Claims,
    users: web::Data<Arc<dyn UserStore>>,
) -> Result<HttpResponse, AppError> {
    if !claims.is_admin() {
        return Err(AppError::Forbidden("Admin access required".into()));
    }

    let all = users.list_all().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(all)))
}

pub async fn filter_users(
    claims: Claims,
    users: web::Data<Arc<dyn UserStore>>,
    page: web::Query<PageRequest>,
) -> Result<HttpResponse, AppError> {
    if !claims.is_admin() {
        return Err(AppError::Forbidden("Admin access required".into()));
    }

    let opts = page.options(DEFAULT_PAGE_SIZE);
    let items = users.list_paged(&opts).await?;
    let total = users.count().await?;
    let listing = Page::new(items, total, page.page(), opts.limit);
    Ok(HttpResponse::Ok().json(ApiResponse::success(listing)))
}

pub async fn get_users_by_manager(
    claims: Claims,
    users: web::Data<Arc<dyn UserStore>>,
    path: web::Path<Uuid>,
    page: web::Query<PageRequest>,
) -> Result<HttpResponse, AppError> {
    if !claims.is_manager_or_admin() {
        return Err(AppError::Forbidden("Manager access required".into()));
    }

    let manager_id = path.into_inner();
    let opts = page.options(DEFAULT_PAGE_SIZE);
    let items = users.list_by_manager(manager_id, &opts).await?;
    let total = users.count_by_manager(manager_id).await?;
    let listing = Page::new(items, total, page.page(), opts.limit);
    Ok(HttpResponse::Ok().json(ApiResponse::success(listing)))
}

pub async fn get_managers(
    claims: Claims,
    users: web::Data<Arc<dyn UserStore>>,
) -> Result<HttpResponse, AppError> {
    if !claims.is_manager_or_admin() {
        return Err(AppError::Forbidden("Manager access required".into()));
    }

    let managers = users.list_managers().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(managers)))
}

pub async fn get_user(
    _claims: Claims,
    users: web::Data<Arc<dyn UserStore>>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let user = users
        .find_by_id(path.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound("User".into()))?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(UserInfo::from(user))))
}

pub async fn update_user(
    claims: Claims,
    users: web::Data<Arc<dyn UserStore>>,
    path: web::Path<Uuid>,
    input: web::Json<UpdateUserInput>,
) -> Result<HttpResponse, AppError> {
    if !claims.is_manager_or_admin() {
        return Err(AppError::Forbidden("Manager access required".into()));
    }

    let mut user = users
        .find_by_id(path.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound("User".into()))?;

    let input = input.into_inner();
    user.name = input.name;
    user.email = input.email;
    if let Some(role) = input.role {
        user.role = role;
    }
    user.manager = input.manager;
    if let Some(password) = input.password {
        user.password_hash =
            hash(&password, DEFAULT_COST).map_err(|e| AppError::StorageError(e.to_string()))?;
    }
    user.last_modified_by = Some(claims.sub);
    users.update(&user).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(UserInfo::from(user))))
}

pub async fn delete_user(
    claims: Claims,
    users: web::Data<Arc<dyn UserStore>>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    if !claims.is_admin() {
        return Err(AppError::Forbidden("Admin access required".into()));
    }

    if !users.delete(path.into_inner()).await? {
        return Err(AppError::NotFound("User".into()));
    }

    Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_with_message(
        None,
        "User deleted successfully",
    )))
}
