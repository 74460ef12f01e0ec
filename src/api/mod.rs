//! HTTP 路由层
//!
//! 只做参数提取和响应包装，业务都在 workflow / services 里。

pub mod exams;
pub mod quiz;
pub mod study_sessions;

use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use tower_http::cors::CorsLayer;

use crate::state::AppState;

/// 上传文件大小上限（25 MB）
const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

/// 组装全部路由
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/api/users", get(list_users))
        .route("/api/generate-questions", post(quiz::generate_questions))
        .route(
            "/api/study-sessions",
            get(study_sessions::list).post(study_sessions::create),
        )
        .route("/api/study-sessions/:id/join", post(study_sessions::join))
        .route("/api/exams", get(exams::list).post(exams::create))
        .route("/api/exams/:id", delete(exams::remove))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// GET / 健康检查
async fn health() -> &'static str {
    "Server is running! Use POST /api/generate-questions"
}

/// GET /api/users 演示用户列表
async fn list_users() -> Json<serde_json::Value> {
    Json(serde_json::json!([{ "id": 1, "name": "Ann" }]))
}
