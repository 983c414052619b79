//! Custom JSON extractor that returns errors as JSON

use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json as AxumJson,
};
use serde::de::DeserializeOwned;

use super::error::ApiErrorResponse;

/// Wrapper around `axum::Json` whose rejections use the `{"error": ...}` body
#[derive(Debug)]
pub struct Json<T>(pub T);

/// Unreadable body, answered with 400 whatever axum rejected it for
#[derive(Debug)]
pub struct BodyRejection(String);

impl IntoResponse for BodyRejection {
    fn into_response(self) -> Response {
        (
            StatusCode::BAD_REQUEST,
            AxumJson(ApiErrorResponse { error: self.0 }),
        )
            .into_response()
    }
}

impl<S, T> FromRequest<S> for Json<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = BodyRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        AxumJson::<T>::from_request(req, state)
            .await
            .map(|AxumJson(value)| Json(value))
            .map_err(|rejection| BodyRejection(rejection_message(&rejection)))
    }
}

fn rejection_message(rejection: &JsonRejection) -> String {
    match rejection {
        JsonRejection::MissingJsonContentType(_) => "Expected an application/json body".to_string(),
        other => format!("Invalid request body: {}", other.body_text()),
    }
}

impl<T> IntoResponse for Json<T>
where
    T: serde::Serialize,
{
    fn into_response(self) -> Response {
        AxumJson(self.0).into_response()
    }
}
