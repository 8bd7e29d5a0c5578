use axum::{
    Extension, Json,
    extract::{Path, State},
};
use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use praise_db::models::format_timestamp;
use praise_types::api::{CreatePraiseRequest, CreatePraiseResponse};
use praise_types::models::{PraiseMessage, Teacher};
use praise_types::validation::validate_praise;

use crate::error::{ApiError, Payload};
use crate::state::{AppState, blocking};

/// POST /praise — unauthenticated submission addressed to one teacher.
pub async fn create_praise(
    State(state): State<AppState>,
    Payload(req): Payload<CreatePraiseRequest>,
) -> Result<Json<CreatePraiseResponse>, ApiError> {
    let praise = validate_praise(req)?;
    let praise_id = Uuid::new_v4().to_string();
    let created_at = format_timestamp(Utc::now());

    let pid = praise_id.clone();
    blocking(&state, move |s| {
        if !s.db.insert_praise(&pid, &praise, &created_at)? {
            return Err(ApiError::NotFound("Teacher not found"));
        }
        info!("Praise {} stored for teacher {}", pid, praise.teacher_id);
        Ok(())
    })
    .await?;

    Ok(Json(CreatePraiseResponse {
        success: true,
        message: "Praise sent successfully".to_string(),
        praise_id,
    }))
}

/// GET /praise/teacher/{teacher_id} — a teacher's own inbox, newest first.
pub async fn teacher_praises(
    State(state): State<AppState>,
    Path(teacher_id): Path<String>,
    Extension(actor): Extension<Teacher>,
) -> Result<Json<Vec<PraiseMessage>>, ApiError> {
    if actor.id != teacher_id {
        warn!("{} tried to read praise for {}", actor.username, teacher_id);
        return Err(ApiError::Forbidden("Not authorized to access these messages"));
    }

    let messages = blocking(&state, move |s| {
        Ok(s.db
            .get_praises_for_teacher(&teacher_id)?
            .into_iter()
            .map(|row| row.into_model())
            .collect::<Vec<_>>())
    })
    .await?;

    Ok(Json(messages))
}
