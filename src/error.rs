use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;

use crate::database::models::{Leave, LeaveStatus};
use crate::handlers::shared::ApiResponse;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("You are sending previous dates")]
    PastDateRejected,

    #[error("Weekend dates are not allowed")]
    WeekendNotAllowed,

    #[error("Already applied for these dates")]
    DuplicateDateConflict(Vec<Leave>),

    #[error("{0} not found")]
    NotFound(String),

    #[error("Leave is already approved")]
    AlreadyApproved,

    #[error("Leave already {0}")]
    InvalidTransition(LeaveStatus),

    #[error("An approved leave can't be deleted")]
    CannotDeleteApproved,

    #[error("Failed to send notification: {0}")]
    DeliveryError(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Database error: {0}")]
    Database(sqlx::Error),

    #[error("Forbidden: {0}")]
    Forbidden(String),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_)
            | AppError::PastDateRejected
            | AppError::WeekendNotAllowed
            | AppError::DuplicateDateConflict(_)
            | AppError::AlreadyApproved
            | AppError::InvalidTransition(_)
            | AppError::CannotDeleteApproved => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::DeliveryError(_) | AppError::StorageError(_) | AppError::Database(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status_code = self.status_code();
        let error_message = self.to_string();

        log::error!(
            "Request failed with status {}: {}",
            status_code,
            error_message
        );

        // The duplicate-date failure ships the conflicting requests so the
        // caller can show the user which applications clash.
        if let AppError::DuplicateDateConflict(conflicts) = self {
            let body = ApiResponse::error_with_data(conflicts.clone(), &error_message);
            return HttpResponse::build(status_code).json(body);
        }

        let response_body = ApiResponse::<()>::error(&error_message);

        HttpResponse::build(status_code).json(response_body)
    }
}

impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> Self {
        log::error!("Database error: {}", error);
        AppError::Database(error)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        // Repositories return anyhow; recover the sqlx error when there is
        // one so the response keeps the database classification.
        if error.is::<sqlx::Error>() {
            match error.downcast::<sqlx::Error>() {
                Ok(sqlx_err) => return AppError::Database(sqlx_err),
                Err(original_error) => {
                    return AppError::StorageError(original_error.to_string());
                }
            }
        }

        AppError::StorageError(error.to_string())
    }
}
