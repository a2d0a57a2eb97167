//! HTTP error mapping
//!
//! Route handlers return [`ApiResult`]. Core errors are mapped onto status
//! codes here; server-side failures are logged in full and the client only
//! sees a generic message.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tally_core::Error;
use thiserror::Error as ThisError;

/// JSON body for every error response
#[derive(Debug, Serialize)]
#[cfg_attr(test, derive(serde::Deserialize))]
pub struct ErrorResponse {
    pub error: String,
}

/// Chart routes keep the chart shape even when they fail
#[derive(Debug, Serialize)]
pub struct ChartErrorResponse {
    pub error: String,
    #[serde(rename = "Keys")]
    pub keys: Vec<String>,
    #[serde(rename = "Values")]
    pub values: Vec<f64>,
    #[serde(rename = "Dates")]
    pub dates: Vec<String>,
}

#[derive(Debug, ThisError)]
pub enum ApiError {
    #[error(transparent)]
    Core(#[from] Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        let ApiError::Core(err) = self;
        match err {
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::Auth(_) | Error::Jwt(_) => StatusCode::UNAUTHORIZED,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Conflict(_) => StatusCode::CONFLICT,
            Error::Upstream(_) | Error::Http(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to send to the client
    pub fn public_message(&self) -> String {
        let ApiError::Core(err) = self;
        match err {
            Error::Validation(msg)
            | Error::Auth(msg)
            | Error::NotFound(msg)
            | Error::Conflict(msg)
            | Error::Upstream(msg) => msg.clone(),
            Error::Jwt(_) => "Token is invalid".to_string(),
            Error::Http(_) => "Failed to reach Habitica".to_string(),
            _ => "Internal server error".to_string(),
        }
    }

    fn log(&self, status: StatusCode) {
        if status.is_server_error() {
            log::error!("Request failed: {}", self);
        } else {
            log::warn!("Request rejected ({}): {}", status.as_u16(), self);
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        self.log(status);

        let body = ErrorResponse {
            error: self.public_message(),
        };
        (status, Json(body)).into_response()
    }
}

/// Failure of a chart route, rendered with empty chart arrays
#[derive(Debug)]
pub struct ChartError(pub ApiError);

impl From<Error> for ChartError {
    fn from(err: Error) -> Self {
        ChartError(ApiError::Core(err))
    }
}

impl From<ApiError> for ChartError {
    fn from(err: ApiError) -> Self {
        ChartError(err)
    }
}

impl IntoResponse for ChartError {
    fn into_response(self) -> Response {
        // Missing credentials stay a 404; every other chart failure is a 500
        let status = match self.0.status() {
            StatusCode::NOT_FOUND => StatusCode::NOT_FOUND,
            StatusCode::UNAUTHORIZED => StatusCode::UNAUTHORIZED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        self.0.log(status);

        let body = ChartErrorResponse {
            error: self.0.public_message(),
            keys: Vec::new(),
            values: Vec::new(),
            dates: Vec::new(),
        };
        (status, Json(body)).into_response()
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn extract_response(response: Response) -> (StatusCode, serde_json::Value) {
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[test]
    fn test_status_mapping() {
        let cases = [
            (Error::validation("bad"), StatusCode::BAD_REQUEST),
            (Error::auth("nope"), StatusCode::UNAUTHORIZED),
            (Error::not_found("gone"), StatusCode::NOT_FOUND),
            (Error::conflict("taken"), StatusCode::CONFLICT),
            (Error::upstream("Habitica API error 401"), StatusCode::BAD_GATEWAY),
            (Error::internal("oops"), StatusCode::INTERNAL_SERVER_ERROR),
            (Error::config("missing"), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, expected) in cases {
            assert_eq!(ApiError::from(err).status(), expected);
        }
    }

    #[tokio::test]
    async fn test_conflict_body_carries_message() {
        let response = ApiError::from(Error::conflict("Username 'alice' is already taken"))
            .into_response();
        let (status, body) = extract_response(response).await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "Username 'alice' is already taken");
    }

    #[tokio::test]
    async fn test_internal_details_not_leaked() {
        let response = ApiError::from(Error::internal("disk on fire at /var/db")).into_response();
        let (status, body) = extract_response(response).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Internal server error");
    }

    #[tokio::test]
    async fn test_chart_error_keeps_chart_shape() {
        let response = ChartError::from(Error::upstream("Habitica API error 503")).into_response();
        let (status, body) = extract_response(response).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Habitica API error 503");
        assert_eq!(body["Keys"], serde_json::json!([]));
        assert_eq!(body["Values"], serde_json::json!([]));
        assert_eq!(body["Dates"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_chart_error_missing_credentials_is_404() {
        let response =
            ChartError::from(Error::not_found("No Habitica API credentials found")).into_response();
        let (status, body) = extract_response(response).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["Keys"], serde_json::json!([]));
    }
}
