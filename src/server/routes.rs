//! HTTP routes of the tokenization server.
//!
//! - `GET  /tokenizer/tokenize?text=&encoding=utf-8&mode=0`
//! - `POST /tokenizer/tokenize` with the same parameters form-encoded
//! - `GET  /tokenizer/dictionaries`

use std::sync::Arc;

use axum::extract::rejection::{FormRejection, QueryRejection};
use axum::extract::{Form, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use tower_http::cors::CorsLayer;

use crate::error::PolydictError;
use crate::server::service::{
    DictionaryInfo, TOKENIZATION_FAILURE, TokenizeRequest, TokenizeResponse, TokenizeService,
};

/// Build the router serving `service`.
pub fn router(service: Arc<TokenizeService>) -> Router {
    Router::new()
        .route(
            "/tokenizer/tokenize",
            get(tokenize_get).post(tokenize_post),
        )
        .route("/tokenizer/dictionaries", get(list_dictionaries))
        .layer(CorsLayer::permissive())
        .with_state(service)
}

async fn tokenize_get(
    State(service): State<Arc<TokenizeService>>,
    request: Result<Query<TokenizeRequest>, QueryRejection>,
) -> Result<Json<TokenizeResponse>, PolydictError> {
    let Query(request) = request.map_err(|e| PolydictError::invalid_request(e.body_text()))?;
    Ok(Json(service.handle(request).await?))
}

async fn tokenize_post(
    State(service): State<Arc<TokenizeService>>,
    request: Result<Form<TokenizeRequest>, FormRejection>,
) -> Result<Json<TokenizeResponse>, PolydictError> {
    let Form(request) = request.map_err(|e| PolydictError::invalid_request(e.body_text()))?;
    Ok(Json(service.handle(request).await?))
}

async fn list_dictionaries(
    State(service): State<Arc<TokenizeService>>,
) -> Json<Vec<DictionaryInfo>> {
    Json(service.dictionary_infos())
}

impl IntoResponse for PolydictError {
    fn into_response(self) -> Response {
        let status = match &self {
            PolydictError::NotFound(_) => StatusCode::NOT_FOUND,
            PolydictError::Decoding(_) | PolydictError::InvalidRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let message = if self.is_engine_failure() {
            TOKENIZATION_FAILURE.to_string()
        } else {
            self.to_string()
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
