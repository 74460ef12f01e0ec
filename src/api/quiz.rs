//! 出题端点
//!
//! 接收 multipart 表单（可选的 file 部件和可选的 text 部件），
//! 转交给出题流程，把 QuizSet 或结构化错误返回给调用方。

use axum::extract::{Multipart, State};
use axum::Json;
use tracing::info;

use crate::error::{AppError, AppResult};
use crate::models::QuizSet;
use crate::state::AppState;
use crate::workflow::{RequestCtx, UploadedFile};

/// POST /api/generate-questions
pub async fn generate_questions(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Json<QuizSet>> {
    let mut file: Option<UploadedFile> = None;
    let mut text: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| malformed(&e.to_string()))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                let original_name = field.file_name().unwrap_or("upload").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| malformed(&e.to_string()))?
                    .to_vec();
                file = Some(UploadedFile {
                    original_name,
                    bytes,
                });
            }
            Some("text") => {
                text = Some(field.text().await.map_err(|e| malformed(&e.to_string()))?);
            }
            // 未知字段直接忽略
            _ => {}
        }
    }

    let source = file
        .as_ref()
        .map(|f| f.original_name.clone())
        .unwrap_or_else(|| "text".to_string());
    let ctx = RequestCtx::new(source);
    info!("{} 收到生成请求", ctx);

    let quiz = state.quiz_flow.run(file, text, &ctx).await?;
    Ok(Json(quiz))
}

fn malformed(detail: &str) -> AppError {
    tracing::warn!("multipart 表单解析失败: {}", detail);
    AppError::Validation("Malformed multipart payload".to_string())
}
