use actix_web::{web, HttpResponse};
use uuid::Uuid;

use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::services::auth::Claims;
use crate::services::history::LeaveHistoryLedger;

/// Full audit trail for one leave, oldest entry first.
pub async fn get_leave_history(
    _claims: Claims,
    ledger: web::Data<LeaveHistoryLedger>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let entries = ledger.history(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(entries)))
}
