//! Query string extractor that returns errors as JSON

use axum::{
    extract::{FromRequestParts, Query as AxumQuery},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;

use super::error::ApiError;

/// Wrapper around `axum::extract::Query` whose rejections use the API
/// error envelope instead of a plain-text body.
#[derive(Debug, Clone, Copy, Default)]
pub struct Query<T>(pub T);

/// Query rejection rendered in the API error format
#[derive(Debug)]
pub struct QueryRejection {
    status: StatusCode,
    message: String,
}

impl IntoResponse for QueryRejection {
    fn into_response(self) -> Response {
        let mut error = ApiError::bad_request(self.message).with_code("invalid_query");
        error.status = self.status;
        error.into_response()
    }
}

impl<S, T> FromRequestParts<S> for Query<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = QueryRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match AxumQuery::<T>::from_request_parts(parts, state).await {
            Ok(AxumQuery(value)) => Ok(Query(value)),
            Err(rejection) => Err(QueryRejection {
                status: StatusCode::BAD_REQUEST,
                message: format!("Invalid query parameters: {}", rejection.body_text()),
            }),
        }
    }
}
