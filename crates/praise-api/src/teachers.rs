use axum::{
    Json,
    extract::{Path, State},
};

use praise_types::models::Teacher;

use crate::error::ApiError;
use crate::state::{AppState, blocking};

pub async fn list_teachers(State(state): State<AppState>) -> Result<Json<Vec<Teacher>>, ApiError> {
    let teachers = blocking(&state, |s| {
        Ok(s.db.list_teachers()?.iter().map(|row| row.to_public()).collect::<Vec<_>>())
    })
    .await?;

    Ok(Json(teachers))
}

pub async fn get_teacher(
    State(state): State<AppState>,
    Path(teacher_id): Path<String>,
) -> Result<Json<Teacher>, ApiError> {
    let teacher = blocking(&state, move |s| {
        s.db.get_teacher_by_id(&teacher_id)?
            .map(|row| row.to_public())
            .ok_or(ApiError::NotFound("Teacher not found"))
    })
    .await?;

    Ok(Json(teacher))
}
