//! 自习组局端点（进程内存 CRUD）

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use tracing::info;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{CreateStudySession, StudySession};
use crate::state::AppState;

/// GET /api/study-sessions
pub async fn list(State(state): State<AppState>) -> Json<Vec<StudySession>> {
    Json(state.study_sessions.read().await.clone())
}

/// POST /api/study-sessions
///
/// 新组局排在最前（与页面展示顺序一致），发起人自动算 1 人。
pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateStudySession>,
) -> AppResult<(StatusCode, Json<StudySession>)> {
    if req.subject.trim().is_empty() {
        return Err(AppError::Validation("Subject is required".to_string()));
    }
    if req.max_participants == 0 {
        return Err(AppError::Validation(
            "maxParticipants must be at least 1".to_string(),
        ));
    }

    let session = StudySession {
        id: Uuid::new_v4().to_string(),
        subject: req.subject,
        location: req.location,
        date: req.date,
        time: req.time,
        duration: req.duration,
        author: req.author.unwrap_or_else(|| "You".to_string()),
        description: req.description,
        participants: 1,
        max_participants: req.max_participants,
    };

    info!("📚 新组局: {} @ {}", session.subject, session.location);
    state
        .study_sessions
        .write()
        .await
        .insert(0, session.clone());

    Ok((StatusCode::CREATED, Json(session)))
}

/// POST /api/study-sessions/{id}/join
pub async fn join(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<StudySession>> {
    let mut sessions = state.study_sessions.write().await;
    let session = sessions
        .iter_mut()
        .find(|s| s.id == id)
        .ok_or_else(|| AppError::NotFound("Study session not found".to_string()))?;

    if session.is_full() {
        return Err(AppError::Conflict("Study session is full".to_string()));
    }

    session.participants += 1;
    Ok(Json(session.clone()))
}
