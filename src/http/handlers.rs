//! Route handlers.
//!
//! Each handler decodes its input, calls the rental service and records
//! one request metric with the final status.

use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Query, State},
    http::HeaderMap,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::time::Instant;

use crate::http::request::request_id;
use crate::http::response::{ApiError, ApiResponse, ApiResult};
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::rental::{FeeRatioRequest, RentResourceRequest, ReturnResourceRequest};

fn finish<T: Serialize>(route: &'static str, start: Instant, result: ApiResult<T>) -> Response {
    let response = result.into_response();
    metrics::record_request(route, response.status().as_u16(), start);
    response
}

/// `GET /fee`
pub async fn fee_ratio(
    State(state): State<AppState>,
    headers: HeaderMap,
    query: Result<Query<FeeRatioRequest>, QueryRejection>,
) -> Response {
    let start = Instant::now();
    let result = async {
        let Query(request) = query?;
        tracing::debug!(request_id = %request_id(&headers), ?request, "Fee quote");
        let quote = state.service.fee_ratio(&request).await?;
        Ok::<_, ApiError>(ApiResponse(quote))
    }
    .await;
    finish("/fee", start, result)
}

/// `POST /rent`
pub async fn rent_resource(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<RentResourceRequest>, JsonRejection>,
) -> Response {
    let start = Instant::now();
    let result = async {
        let Json(request) = body?;
        tracing::debug!(request_id = %request_id(&headers), ?request, "Rent resource");
        let receipt = state.service.rent_resource(&request).await?;
        Ok::<_, ApiError>(ApiResponse(receipt))
    }
    .await;
    finish("/rent", start, result)
}

/// `POST /return`
pub async fn return_resource(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<ReturnResourceRequest>, JsonRejection>,
) -> Response {
    let start = Instant::now();
    let result = async {
        let Json(request) = body?;
        tracing::debug!(request_id = %request_id(&headers), ?request, "Return resource");
        let receipt = state.service.return_resource(&request).await?;
        Ok::<_, ApiError>(ApiResponse(receipt))
    }
    .await;
    finish("/return", start, result)
}

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub version: &'static str,
}

/// `GET /health`
pub async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
