//! 出题流程 - 流程层
//!
//! 核心职责：定义"一次生成请求"的完整处理流程
//!
//! 流程顺序：
//! 1. 输入解析（文件优先于文本）
//! 2. 文本提取 → 空内容检查
//! 3. LLM 出题 → 宽容切片 → JSON 解析 → 严格校验
//!
//! 任何一步失败都是这次请求的终态，不做自动重试。

use serde_json::Value as JsonValue;
use tracing::{error, info};

use crate::config::Config;
use crate::error::{AppError, AppResult, QuizError};
use crate::models::QuizSet;
use crate::quiz::repair::slice_json_object;
use crate::quiz::schema::validate_quiz_payload;
use crate::services::{ExtractService, LlmService};
use crate::utils::truncate_text;
use crate::workflow::request_ctx::RequestCtx;

/// 随请求上传的文件
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub original_name: String,
    pub bytes: Vec<u8>,
}

/// 出题流程
///
/// 职责：
/// - 编排一次生成请求从输入到 QuizSet 的全过程
/// - 每个请求独立无状态，请求之间不共享任何可变数据
/// - 只依赖业务能力（services），不持有任何 HTTP 细节
pub struct QuizFlow {
    extract_service: ExtractService,
    llm_service: LlmService,
}

impl QuizFlow {
    /// 创建新的出题流程
    pub fn new(config: &Config) -> Self {
        Self {
            extract_service: ExtractService::new(config),
            llm_service: LlmService::new(config),
        }
    }

    /// 执行一次生成请求
    ///
    /// # 参数
    /// - `file`: 上传的文件（可选）
    /// - `text`: 粘贴的文本（可选）
    ///
    /// 两者都存在时优先用文件，文本被忽略；两者都缺失是错误。
    pub async fn run(
        &self,
        file: Option<UploadedFile>,
        text: Option<String>,
        ctx: &RequestCtx,
    ) -> AppResult<QuizSet> {
        // ========== 第一步：解析出学习材料 ==========
        let content = match (file, text) {
            (Some(file), _) => {
                info!("{} 🔍 提取上传文件: {}", ctx, file.original_name);
                self.extract_service
                    .extract(&file.original_name, &file.bytes)
                    .await?
            }
            (None, Some(text)) if !text.is_empty() => text,
            _ => return Err(QuizError::MissingInput.into()),
        };

        if content.trim().is_empty() {
            return Err(QuizError::EmptyInput.into());
        }
        info!("{} ✓ 学习材料就绪，共 {} 字符", ctx, content.chars().count());

        // ========== 第二步：调用 LLM 出题 ==========
        info!("{} 🤖 调用 LLM 生成题目...", ctx);
        let raw = self.llm_service.generate_quiz_json(&content).await?;

        // ========== 第三步：切片、解析、校验 ==========
        let quiz = parse_model_output(&raw, ctx)?;

        info!("{} ✓ 成功生成 {} 道题目", ctx, quiz.len());
        Ok(quiz)
    }
}

/// 把模型的原始响应变成校验过的 QuizSet
///
/// 切片只是尽力修复，解析和校验失败时把原始输出记进服务端日志
/// （截断后），但绝不透给最终用户。
fn parse_model_output(raw: &str, ctx: &RequestCtx) -> AppResult<QuizSet> {
    let candidate = slice_json_object(raw).unwrap_or(raw);

    let value: JsonValue = serde_json::from_str(candidate).map_err(|source| {
        error!(
            "{} 模型输出无法解析为 JSON，原始输出: {}",
            ctx,
            truncate_text(raw, 500)
        );
        AppError::Quiz(QuizError::ModelOutputNotJson { source })
    })?;

    validate_quiz_payload(&value).map_err(|reason| {
        error!(
            "{} 模型输出不符合题目结构 ({})，原始输出: {}",
            ctx,
            reason,
            truncate_text(raw, 500)
        );
        AppError::schema_mismatch(reason)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExtractError;
    use serde_json::json;

    fn test_flow() -> QuizFlow {
        let config = Config {
            upload_dir: std::env::temp_dir()
                .join(format!("studyallo-flow-{}", uuid::Uuid::new_v4()))
                .display()
                .to_string(),
            ..Config::default()
        };
        QuizFlow::new(&config)
    }

    fn ctx() -> RequestCtx {
        RequestCtx::new("test")
    }

    fn valid_payload_text() -> String {
        let questions: Vec<_> = (0..5)
            .map(|i| {
                json!({
                    "question": format!("第 {} 题", i + 1),
                    "options": ["甲", "乙", "丙", "丁"],
                    "correctIndex": 1
                })
            })
            .collect();
        json!({ "questions": questions }).to_string()
    }

    #[tokio::test]
    async fn test_missing_input() {
        let flow = test_flow();
        let err = flow.run(None, None, &ctx()).await.unwrap_err();
        assert!(matches!(err, AppError::Quiz(QuizError::MissingInput)));

        // 空字符串的文本字段等同于没有提供
        let err = flow
            .run(None, Some(String::new()), &ctx())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Quiz(QuizError::MissingInput)));
    }

    #[tokio::test]
    async fn test_whitespace_text_is_empty_input() {
        let flow = test_flow();
        let err = flow
            .run(None, Some("   \n\t  ".to_string()), &ctx())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Quiz(QuizError::EmptyInput)));
    }

    #[tokio::test]
    async fn test_file_takes_precedence_over_text() {
        let flow = test_flow();
        let file = UploadedFile {
            original_name: "virus.exe".to_string(),
            bytes: b"MZ".to_vec(),
        };

        // 文本本身合法，但文件优先，所以失败在文件类型上
        let err = flow
            .run(file.into(), Some("光合作用".to_string()), &ctx())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::Extract(ExtractError::Unsupported { .. })
        ));
    }

    #[tokio::test]
    async fn test_whitespace_only_file_is_empty_input() {
        let flow = test_flow();
        let file = UploadedFile {
            original_name: "blank.txt".to_string(),
            bytes: b"  \n\n  ".to_vec(),
        };
        let err = flow.run(Some(file), None, &ctx()).await.unwrap_err();
        assert!(matches!(err, AppError::Quiz(QuizError::EmptyInput)));
    }

    #[test]
    fn test_parse_model_output_with_commentary() {
        let raw = format!("Here you go!\n{}\nGood luck!", valid_payload_text());
        let quiz = parse_model_output(&raw, &ctx()).expect("带噪声的合法输出应该通过");
        assert_eq!(quiz.len(), 5);
    }

    #[test]
    fn test_parse_model_output_not_json() {
        let err = parse_model_output("I cannot generate questions.", &ctx()).unwrap_err();
        assert!(matches!(
            err,
            AppError::Quiz(QuizError::ModelOutputNotJson { .. })
        ));
    }

    #[test]
    fn test_parse_model_output_schema_mismatch() {
        // 合法 JSON 但只有 4 道题
        let questions: Vec<_> = (0..4)
            .map(|_| {
                json!({
                    "question": "q",
                    "options": ["a", "b", "c", "d"],
                    "correctIndex": 0
                })
            })
            .collect();
        let raw = json!({ "questions": questions }).to_string();

        let err = parse_model_output(&raw, &ctx()).unwrap_err();
        assert!(matches!(
            err,
            AppError::Quiz(QuizError::ModelOutputSchemaMismatch { .. })
        ));
    }
}
