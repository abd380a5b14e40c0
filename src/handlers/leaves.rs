use actix_web::{web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

use crate::database::models::{LeaveInput, PageRequest, ReviewInput};
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::services::auth::Claims;
use crate::services::query::LeaveQueryService;
use crate::services::storage::AttachmentStore;
use crate::services::workflow::LeaveWorkflow;
use base64::Engine;
use std::sync::Arc;

/// Apply for leave. The attachment, if any, was uploaded beforehand and
/// arrives as a reference; the workflow cleans it up on validation failure.
pub async fn create_leave(
    claims: Claims,
    workflow: web::Data<LeaveWorkflow>,
    input: web::Json<LeaveInput>,
) -> Result<HttpResponse, AppError> {
    let leave = workflow.create_leave(claims.sub, input.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(leave)))
}

pub async fn get_my_leaves(
    claims: Claims,
    queries: web::Data<LeaveQueryService>,
    page: web::Query<PageRequest>,
) -> Result<HttpResponse, AppError> {
    let leaves = queries.my_leaves(claims.sub, &page).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(leaves)))
}

pub async fn get_all_leaves(
    claims: Claims,
    queries: web::Data<LeaveQueryService>,
    page: web::Query<PageRequest>,
) -> Result<HttpResponse, AppError> {
    if !claims.is_admin() {
        return Err(AppError::Forbidden("Admin access required".into()));
    }

    let leaves = queries.all_leaves(&page).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(leaves)))
}

pub async fn get_team_leaves(
    claims: Claims,
    queries: web::Data<LeaveQueryService>,
    path: web::Path<Uuid>,
    page: web::Query<PageRequest>,
) -> Result<HttpResponse, AppError> {
    if !claims.is_manager_or_admin() {
        return Err(AppError::Forbidden("Manager access required".into()));
    }

    let leaves = queries.team_leaves(path.into_inner(), &page).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(leaves)))
}

pub async fn get_leave(
    _claims: Claims,
    queries: web::Data<LeaveQueryService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let leave = queries.leave_by_id(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(leave)))
}

pub async fn update_leave(
    claims: Claims,
    workflow: web::Data<LeaveWorkflow>,
    path: web::Path<Uuid>,
    input: web::Json<LeaveInput>,
) -> Result<HttpResponse, AppError> {
    let leave = workflow
        .update_leave(path.into_inner(), claims.sub, input.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(
        Some(leave),
        "Leave updated successfully",
    )))
}

pub async fn approve_leave(
    claims: Claims,
    workflow: web::Data<LeaveWorkflow>,
    path: web::Path<Uuid>,
    input: web::Json<ReviewInput>,
) -> Result<HttpResponse, AppError> {
    if !claims.is_manager_or_admin() {
        return Err(AppError::Forbidden("Manager access required".into()));
    }

    let leave = workflow
        .approve_leave(path.into_inner(), claims.sub, input.into_inner().message)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(
        Some(leave),
        "Leave approved successfully",
    )))
}

pub async fn decline_leave(
    claims: Claims,
    workflow: web::Data<LeaveWorkflow>,
    path: web::Path<Uuid>,
    input: web::Json<ReviewInput>,
) -> Result<HttpResponse, AppError> {
    if !claims.is_manager_or_admin() {
        return Err(AppError::Forbidden("Manager access required".into()));
    }

    let leave = workflow
        .reject_leave(path.into_inner(), claims.sub, input.into_inner().message)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(
        Some(leave),
        "Leave rejected successfully",
    )))
}

pub async fn delete_leave(
    claims: Claims,
    workflow: web::Data<LeaveWorkflow>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    workflow.delete_leave(path.into_inner(), claims.sub).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_with_message(
        None,
        "Leave deleted successfully",
    )))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadInput {
    pub filename: String,
    /// Base64-encoded file content.
    pub content: String,
}

/// Stores a supporting document and returns the reference to pass along
/// with a subsequent create/update call.
pub async fn upload_attachment(
    _claims: Claims,
    attachments: web::Data<Arc<dyn AttachmentStore>>,
    input: web::Json<UploadInput>,
) -> Result<HttpResponse, AppError> {
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(&input.content)
        .map_err(|_| AppError::InvalidInput("Content must be base64-encoded".into()))?;

    let reference = attachments
        .upload(&input.filename, bytes)
        .await
        .map_err(|e| AppError::StorageError(e.to_string()))?;

    Ok(HttpResponse::Created().json(ApiResponse::success(reference)))
}
