use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use crate::agent::AgentError;
use crate::traits::ToolError;

/// JSON error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
}

#[derive(Debug)]
pub enum ApiError {
    /// 500 - the agent failed or could not be assembled.
    Agent(String),
    /// 502 - a tool produced no answer at all.
    NoAnswer(String),
    /// 500 - anything else.
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            ApiError::Agent(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "agent_error", msg),
            ApiError::NoAnswer(msg) => (StatusCode::BAD_GATEWAY, "no_answer", msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg),
        };

        if status.is_server_error() {
            tracing::error!(error = error_code, %message, "request failed");
        }

        let body = ErrorBody {
            error: error_code.to_string(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

impl From<AgentError> for ApiError {
    fn from(err: AgentError) -> Self {
        match err {
            AgentError::Tool(ToolError::NoAnswer(tool)) => {
                ApiError::NoAnswer(format!("{tool} returned no answer"))
            }
            other => ApiError::Agent(other.to_string()),
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Agent(format!("{err:#}"))
    }
}
