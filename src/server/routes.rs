// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! HTTP route handlers.
//!
//! The public API accepts expressions and serves registry reads; the
//! `/internal` routes are the pull-based worker protocol. Handlers only
//! translate between the wire and the [`TaskScheduler`] seam; all state
//! lives behind it.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::errors::ScheduleError;
use crate::parser::validate_expression;
use crate::protocol::{TaskEnvelope, TaskReport};
use crate::traits::TaskScheduler;

use super::models::{
    ApiError, CalculateRequest, CalculateResponse, ExpressionResponse, ExpressionsResponse,
};

#[derive(Clone)]
pub struct AppState {
    pub scheduler: Arc<dyn TaskScheduler>,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/calculate", post(calculate_handler))
        .route("/api/v1/expressions", get(list_expressions_handler))
        .route("/api/v1/expressions/:id", get(get_expression_handler))
        .route(
            "/internal/task",
            get(claim_task_handler).post(submit_result_handler),
        )
        .with_state(state)
}

/// POST /api/v1/calculate - submit an expression for evaluation
async fn calculate_handler(
    State(state): State<AppState>,
    body: Result<Json<CalculateRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) =
        body.map_err(|_| ApiError::Unprocessable("invalid request body".into()))?;

    // coarse structural check first so broken input never reaches the parser
    validate_expression(&req.expression)
        .map_err(|err| ApiError::Unprocessable(err.to_string()))?;

    let id = state.scheduler.submit(&req.expression)?;
    Ok((StatusCode::CREATED, Json(CalculateResponse { id })))
}

/// GET /api/v1/expressions - snapshot of every expression
async fn list_expressions_handler(State(state): State<AppState>) -> Json<ExpressionsResponse> {
    Json(ExpressionsResponse {
        expressions: state.scheduler.list(),
    })
}

/// GET /api/v1/expressions/:id - one expression by id
async fn get_expression_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ExpressionResponse>, ApiError> {
    let expression = state
        .scheduler
        .get(&id)
        .ok_or_else(|| ApiError::NotFound("expression not found".into()))?;
    Ok(Json(ExpressionResponse { expression }))
}

/// GET /internal/task - claim the next ready task, args already resolved
async fn claim_task_handler(
    State(state): State<AppState>,
) -> Result<Json<TaskEnvelope>, ApiError> {
    let task = state
        .scheduler
        .claim()
        .ok_or_else(|| ApiError::from(ScheduleError::NoTasksAvailable))?;
    let payload = state.scheduler.resolve(&task);
    Ok(Json(TaskEnvelope { task: payload }))
}

/// POST /internal/task - accept a worker's result or failure report
async fn submit_result_handler(
    State(state): State<AppState>,
    body: Result<Json<TaskReport>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(report) =
        body.map_err(|_| ApiError::Unprocessable("invalid request body".into()))?;

    match (report.result, report.error.as_deref()) {
        (Some(result), None) => state.scheduler.complete(&report.id, result)?,
        (None, Some(reason)) => state.scheduler.fail(&report.id, reason)?,
        _ => return Err(ApiError::Unprocessable("invalid request body".into())),
    }

    Ok(StatusCode::OK)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::config::OperationTimes;
    use crate::engine::Scheduler;

    fn test_router() -> Router {
        create_router(AppState {
            scheduler: Arc::new(Scheduler::new(OperationTimes::default())),
        })
    }

    async fn send(
        router: &Router,
        method: &str,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(value) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(value.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    #[tokio::test]
    async fn calculate_returns_created_with_expression_id() {
        let router = test_router();
        let (status, body) = send(
            &router,
            "POST",
            "/api/v1/calculate",
            Some(json!({"expression": "2+2*2"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body, json!({"id": "expr-1"}));
    }

    #[tokio::test]
    async fn calculate_rejects_malformed_bodies() {
        let router = test_router();
        let (status, _) = send(&router, "POST", "/api/v1/calculate", Some(json!({}))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn calculate_rejects_invalid_expressions() {
        let router = test_router();
        let (status, body) = send(
            &router,
            "POST",
            "/api/v1/calculate",
            Some(json!({"expression": "1+2*"})),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["error"].as_str().unwrap().contains("operator"));
    }

    #[tokio::test]
    async fn claim_with_empty_queue_returns_not_found() {
        let router = test_router();
        let (status, body) = send(&router, "GET", "/internal/task", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"error": "no tasks available"}));
    }

    #[tokio::test]
    async fn claim_hands_out_each_ready_task_once() {
        let router = test_router();
        send(
            &router,
            "POST",
            "/api/v1/calculate",
            Some(json!({"expression": "1+1"})),
        )
        .await;

        let (status, body) = send(&router, "GET", "/internal/task", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["task"]["id"], "task-1");
        assert_eq!(body["task"]["operation"], "+");
        assert_eq!(body["task"]["arg1"], 1.0);
        assert_eq!(body["task"]["operation_time"], 2000);

        let (status, _) = send(&router, "GET", "/internal/task", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn result_submission_completes_the_expression() {
        let router = test_router();
        send(
            &router,
            "POST",
            "/api/v1/calculate",
            Some(json!({"expression": "1+1"})),
        )
        .await;
        send(&router, "GET", "/internal/task", None).await;

        let (status, _) = send(
            &router,
            "POST",
            "/internal/task",
            Some(json!({"id": "task-1", "result": 2.0})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(&router, "GET", "/api/v1/expressions/expr-1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"expression": {"id": "expr-1", "status": "done", "result": 2.0}})
        );
    }

    #[tokio::test]
    async fn duplicate_result_submission_is_rejected() {
        let router = test_router();
        send(
            &router,
            "POST",
            "/api/v1/calculate",
            Some(json!({"expression": "1+1"})),
        )
        .await;
        send(&router, "GET", "/internal/task", None).await;
        send(
            &router,
            "POST",
            "/internal/task",
            Some(json!({"id": "task-1", "result": 2.0})),
        )
        .await;

        let (status, body) = send(
            &router,
            "POST",
            "/internal/task",
            Some(json!({"id": "task-1", "result": 2.0})),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body, json!({"error": "invalid task result"}));
    }

    #[tokio::test]
    async fn result_for_unknown_task_returns_not_found() {
        let router = test_router();
        let (status, body) = send(
            &router,
            "POST",
            "/internal/task",
            Some(json!({"id": "task-99", "result": 1.0})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"error": "task not found"}));
    }

    #[tokio::test]
    async fn report_without_result_or_error_is_rejected() {
        let router = test_router();
        let (status, _) = send(
            &router,
            "POST",
            "/internal/task",
            Some(json!({"id": "task-1"})),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn error_report_marks_the_expression_failed() {
        let router = test_router();
        send(
            &router,
            "POST",
            "/api/v1/calculate",
            Some(json!({"expression": "10/(5-5)"})),
        )
        .await;

        // the subtraction resolves to zero
        let (_, body) = send(&router, "GET", "/internal/task", None).await;
        let sub_id = body["task"]["id"].as_str().unwrap().to_owned();
        send(
            &router,
            "POST",
            "/internal/task",
            Some(json!({"id": sub_id, "result": 0.0})),
        )
        .await;

        // the divide is dispatched with arg2 == 0; the worker reports it
        let (_, body) = send(&router, "GET", "/internal/task", None).await;
        assert_eq!(body["task"]["arg2"], 0.0);
        let div_id = body["task"]["id"].as_str().unwrap().to_owned();
        let (status, _) = send(
            &router,
            "POST",
            "/internal/task",
            Some(json!({"id": div_id, "error": "division by zero"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (_, body) = send(&router, "GET", "/api/v1/expressions/expr-1", None).await;
        assert_eq!(body["expression"]["status"], "error");
    }

    #[tokio::test]
    async fn expressions_listing_snapshots_state() {
        let router = test_router();
        send(
            &router,
            "POST",
            "/api/v1/calculate",
            Some(json!({"expression": "7"})),
        )
        .await;

        let (status, body) = send(&router, "GET", "/api/v1/expressions", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"expressions": [{"id": "expr-1", "status": "done", "result": 7.0}]})
        );
    }

    #[tokio::test]
    async fn unknown_expression_returns_not_found() {
        let router = test_router();
        let (status, body) = send(&router, "GET", "/api/v1/expressions/expr-42", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"error": "expression not found"}));
    }
}
