//! 考试安排端点（进程内存 CRUD）

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use tracing::info;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{days_until, CreateExam, Exam};
use crate::state::AppState;

/// GET /api/exams
///
/// 列表始终按日期升序，daysLeft 每次读取时按当天重算。
pub async fn list(State(state): State<AppState>) -> Json<Vec<Exam>> {
    let mut exams = state.exams.read().await.clone();
    for exam in &mut exams {
        exam.refresh_days_left();
    }
    Json(exams)
}

/// POST /api/exams
pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateExam>,
) -> AppResult<(StatusCode, Json<Exam>)> {
    if req.subject.trim().is_empty() {
        return Err(AppError::Validation("Subject is required".to_string()));
    }
    let days_left = days_until(&req.date).ok_or_else(|| {
        AppError::Validation("Invalid exam date, expected YYYY-MM-DD".to_string())
    })?;

    let exam = Exam {
        id: Uuid::new_v4().to_string(),
        subject: req.subject,
        date: req.date,
        time: req.time,
        location: req.location,
        duration: req.duration,
        exam_type: req.exam_type,
        notes: req.notes,
        days_left,
    };

    info!("📅 新考试: {} ({})", exam.subject, exam.date);

    let mut exams = state.exams.write().await;
    exams.push(exam.clone());
    // ISO 日期字符串的字典序就是时间序
    exams.sort_by(|a, b| a.date.cmp(&b.date));

    Ok((StatusCode::CREATED, Json(exam)))
}

/// DELETE /api/exams/{id}
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let mut exams = state.exams.write().await;
    let before = exams.len();
    exams.retain(|e| e.id != id);

    if exams.len() == before {
        return Err(AppError::NotFound("Exam not found".to_string()));
    }
    Ok(StatusCode::NO_CONTENT)
}
