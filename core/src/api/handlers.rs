use axum::Json;
use axum::extract::{Path, Query, State};
use serde::{Deserialize, Serialize};

use crate::agent::run_agent;
use crate::api::error::ApiError;
use crate::api::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct RootResponse {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct MessageParams {
    pub question: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageResponse {
    pub answer: String,
    pub session_id: String,
    pub user_id: String,
}

pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "Hello World".to_string(),
    })
}

/// `POST /message/{user_id}/{session_id}?question=...`
///
/// The agent makes blocking upstream calls, so the whole run happens on
/// the blocking pool.
pub async fn message(
    State(state): State<AppState>,
    Path((user_id, session_id)): Path<(String, String)>,
    Query(params): Query<MessageParams>,
) -> Result<Json<MessageResponse>, ApiError> {
    let executors = state.executors.clone();
    let (user, session) = (user_id.clone(), session_id.clone());

    let answer = tokio::task::spawn_blocking(move || -> Result<String, ApiError> {
        let executor = executors.build(&user, &session)?;
        Ok(run_agent(&params.question, executor.as_ref())?)
    })
    .await
    .map_err(|e| ApiError::Internal(format!("agent task failed: {e}")))??;

    tracing::info!(%user_id, %session_id, "answered question");

    Ok(Json(MessageResponse {
        answer,
        session_id,
        user_id,
    }))
}
