// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Request/response models for the public and internal HTTP APIs.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::errors::ScheduleError;
use crate::protocol::ExpressionSummary;

#[derive(Debug, Deserialize)]
pub struct CalculateRequest {
    pub expression: String,
}

#[derive(Debug, Serialize)]
pub struct CalculateResponse {
    pub id: String,
}

#[derive(Debug, Serialize)]
pub struct ExpressionsResponse {
    pub expressions: Vec<ExpressionSummary>,
}

#[derive(Debug, Serialize)]
pub struct ExpressionResponse {
    pub expression: ExpressionSummary,
}

/// API-boundary error: every failure leaves the handler as one of these and
/// serializes as `{"error": "<message>"}` with the matching status code.
#[derive(Debug)]
pub enum ApiError {
    Unprocessable(String),
    NotFound(String),
    Busy,
    Internal(String),
}

impl From<ScheduleError> for ApiError {
    fn from(err: ScheduleError) -> Self {
        match err {
            ScheduleError::Parse(parse) => Self::Unprocessable(parse.to_string()),
            ScheduleError::NoTasksAvailable => Self::NotFound("no tasks available".into()),
            ScheduleError::TaskNotFound(_) => Self::NotFound("task not found".into()),
            ScheduleError::TaskNotInProgress(_) => {
                Self::Unprocessable("invalid task result".into())
            }
            ScheduleError::ReadyQueueFull => Self::Busy,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::Unprocessable(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Self::Busy => (
                StatusCode::SERVICE_UNAVAILABLE,
                "ready queue is full".to_string(),
            ),
            Self::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = serde_json::json!({ "error": message });
        (status, Json(body)).into_response()
    }
}
