use axum::{
    Extension, Json,
    extract::{Path, State},
};
use chrono::{Duration, Utc};
use tracing::info;
use uuid::Uuid;

use praise_db::models::format_timestamp;
use praise_types::api::{
    AdminStats, CreateTeacherRequest, PageQuery, SuccessResponse, UpdateTeacherRequest,
};
use praise_types::models::{PraiseMessageDetail, Teacher};
use praise_types::validation::{validate_new_teacher, validate_teacher_update};

use crate::error::{ApiError, Payload, QueryParams};
use crate::state::{AppState, blocking};

const MAX_PAGE: u32 = 500;

/// GET /admin/stats
pub async fn stats(State(state): State<AppState>) -> Result<Json<AdminStats>, ApiError> {
    let since = format_timestamp(Utc::now() - Duration::days(7));
    let row = blocking(&state, move |s| Ok(s.db.stats(&since)?)).await?;

    Ok(Json(AdminStats {
        total_teachers: row.total_teachers,
        total_praises: row.total_praises,
        praises_last_week: row.praises_since,
    }))
}

/// POST /admin/teachers
pub async fn create_teacher(
    State(state): State<AppState>,
    Extension(admin): Extension<Teacher>,
    Payload(req): Payload<CreateTeacherRequest>,
) -> Result<Json<Teacher>, ApiError> {
    let new = validate_new_teacher(req)?;

    let teacher = blocking(&state, move |s| {
        let password_hash = s.hasher.hash(&new.password)?;
        let id = Uuid::new_v4().to_string();
        let row = s
            .db
            .create_teacher(&id, &new.username, &new.full_name, &new.subject, &password_hash, new.role)?
            .ok_or_else(|| {
                ApiError::Conflict(format!("User '{}' already exists", new.username))
            })?;
        info!("{} created {} account '{}'", admin.username, row.role, row.username);
        Ok(row.to_public())
    })
    .await?;

    Ok(Json(teacher))
}

/// PUT /admin/teachers/{teacher_id} — partial update; absent fields are kept.
pub async fn update_teacher(
    State(state): State<AppState>,
    Path(teacher_id): Path<String>,
    Payload(req): Payload<UpdateTeacherRequest>,
) -> Result<Json<Teacher>, ApiError> {
    let update = validate_teacher_update(req)?;

    let teacher = blocking(&state, move |s| {
        // Nothing to change: skip the write transaction.
        if update.is_empty() {
            return s
                .db
                .get_teacher_by_id(&teacher_id)?
                .map(|row| row.to_public())
                .ok_or(ApiError::NotFound("Teacher not found"));
        }

        let password_hash = update
            .password
            .as_deref()
            .map(|p| s.hasher.hash(p))
            .transpose()?;

        s.db.update_teacher(
            &teacher_id,
            update.full_name.as_deref(),
            update.subject.as_deref(),
            password_hash.as_deref(),
        )?
        .map(|row| row.to_public())
        .ok_or(ApiError::NotFound("Teacher not found"))
    })
    .await?;

    Ok(Json(teacher))
}

/// DELETE /admin/teachers/{teacher_id} — hard delete, cascading to the teacher's praise.
pub async fn delete_teacher(
    State(state): State<AppState>,
    Path(teacher_id): Path<String>,
    Extension(admin): Extension<Teacher>,
) -> Result<Json<SuccessResponse>, ApiError> {
    if admin.id == teacher_id {
        return Err(ApiError::BadRequest("Cannot delete your own account".to_string()));
    }

    blocking(&state, move |s| {
        let removed = s
            .db
            .delete_teacher(&teacher_id)?
            .ok_or(ApiError::NotFound("Teacher not found"))?;
        info!("{} deleted teacher {} and {} praise messages", admin.username, teacher_id, removed);
        Ok(())
    })
    .await?;

    Ok(Json(SuccessResponse {
        success: true,
        message: "Teacher deleted".to_string(),
    }))
}

/// GET /admin/praises?limit=&offset= — newest first, with the recipient joined in.
pub async fn list_praises(
    State(state): State<AppState>,
    QueryParams(page): QueryParams<PageQuery>,
) -> Result<Json<Vec<PraiseMessageDetail>>, ApiError> {
    let limit = page.limit.clamp(1, MAX_PAGE);
    let offset = page.offset;

    let praises = blocking(&state, move |s| {
        Ok(s.db
            .list_praises(limit, offset)?
            .into_iter()
            .map(|row| row.into_model())
            .collect::<Vec<_>>())
    })
    .await?;

    Ok(Json(praises))
}

/// DELETE /admin/praises/{praise_id}
pub async fn delete_praise(
    State(state): State<AppState>,
    Path(praise_id): Path<String>,
    Extension(admin): Extension<Teacher>,
) -> Result<Json<SuccessResponse>, ApiError> {
    blocking(&state, move |s| {
        if !s.db.delete_praise(&praise_id)? {
            return Err(ApiError::NotFound("Praise message not found"));
        }
        info!("{} deleted praise {}", admin.username, praise_id);
        Ok(())
    })
    .await?;

    Ok(Json(SuccessResponse {
        success: true,
        message: "Praise message deleted".to_string(),
    }))
}
