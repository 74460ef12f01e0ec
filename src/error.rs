use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use std::fmt;
use tracing::{error, warn};

/// 应用程序错误类型
#[derive(Debug)]
pub enum AppError {
    /// 出题协议错误（输入缺失、模型输出不合法等）
    Quiz(QuizError),
    /// 文档文本提取错误
    Extract(ExtractError),
    /// LLM 服务错误
    Llm(LlmError),
    /// 答题会话状态机错误
    Session(SessionError),
    /// 客户端请求构造器错误
    Client(ClientError),
    /// 资源不存在
    NotFound(String),
    /// 资源状态冲突（例如组局已满员）
    Conflict(String),
    /// 请求参数校验失败
    Validation(String),
    /// 其他错误（用于包装第三方库错误）
    Other(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Quiz(e) => write!(f, "出题错误: {}", e),
            AppError::Extract(e) => write!(f, "提取错误: {}", e),
            AppError::Llm(e) => write!(f, "LLM错误: {}", e),
            AppError::Session(e) => write!(f, "会话错误: {}", e),
            AppError::Client(e) => write!(f, "客户端错误: {}", e),
            AppError::NotFound(msg) => write!(f, "资源不存在: {}", msg),
            AppError::Conflict(msg) => write!(f, "状态冲突: {}", msg),
            AppError::Validation(msg) => write!(f, "参数校验失败: {}", msg),
            AppError::Other(msg) => write!(f, "错误: {}", msg),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Quiz(e) => Some(e),
            AppError::Extract(e) => Some(e),
            AppError::Llm(e) => Some(e),
            AppError::Session(e) => Some(e),
            AppError::Client(e) => Some(e),
            _ => None,
        }
    }
}

/// 出题协议错误
///
/// 每个变体对应一种对请求终态的失败，服务端不做任何自动重试。
#[derive(Debug)]
pub enum QuizError {
    /// 既没有文件也没有文本
    MissingInput,
    /// 提取出的文本为空或全是空白
    EmptyInput,
    /// 模型输出经宽容切片后仍不是合法 JSON
    ModelOutputNotJson {
        source: serde_json::Error,
    },
    /// 模型输出是 JSON 但不符合约定的题目结构
    ModelOutputSchemaMismatch {
        reason: String,
    },
}

impl fmt::Display for QuizError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuizError::MissingInput => write!(f, "请求中没有文件也没有文本"),
            QuizError::EmptyInput => write!(f, "提取出的学习材料为空"),
            QuizError::ModelOutputNotJson { source } => {
                write!(f, "模型输出无法解析为JSON: {}", source)
            }
            QuizError::ModelOutputSchemaMismatch { reason } => {
                write!(f, "模型输出不符合题目结构: {}", reason)
            }
        }
    }
}

impl std::error::Error for QuizError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            QuizError::ModelOutputNotJson { source } => Some(source),
            _ => None,
        }
    }
}

/// 文档文本提取错误
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// 不支持的文件类型
    #[error("不支持的文件类型: {extension:?}")]
    Unsupported { extension: Option<String> },

    /// 读写上传文件失败
    #[error("读写上传文件失败 ({path}): {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// PDF 文本提取失败
    #[error("PDF文本提取失败: {detail}")]
    PdfParse { detail: String },

    /// DOCX 文本提取失败
    #[error("DOCX文本提取失败: {detail}")]
    DocxParse { detail: String },
}

/// LLM 服务错误
#[derive(Debug)]
pub enum LlmError {
    /// API 调用失败
    ApiCallFailed {
        model: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 返回结果为空
    EmptyResponse {
        model: String,
    },
    /// 返回内容为空
    EmptyContent {
        model: String,
    },
}

impl fmt::Display for LlmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LlmError::ApiCallFailed { model, source } => {
                write!(f, "LLM API调用失败 (模型: {}): {}", model, source)
            }
            LlmError::EmptyResponse { model } => {
                write!(f, "LLM返回结果为空 (模型: {})", model)
            }
            LlmError::EmptyContent { model } => {
                write!(f, "LLM返回内容为空 (模型: {})", model)
            }
        }
    }
}

impl std::error::Error for LlmError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LlmError::ApiCallFailed { source, .. } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
            _ => None,
        }
    }
}

/// 答题会话状态机错误
///
/// 这些错误都发生在客户端状态机内部，不会出现在 HTTP 响应里。
#[derive(Debug)]
pub enum SessionError {
    /// 题目列表为空，无法开始答题
    EmptyQuizSet,
    /// 选项下标超出范围
    OptionOutOfRange {
        index: usize,
        option_count: usize,
    },
    /// 当前题目尚未作答，不能前进
    AnswerRequired {
        index: usize,
    },
    /// 已经在第一题，不能后退
    AtFirstQuestion,
    /// 本次答题已经结束
    AlreadyFinished,
    /// 本次答题尚未结束
    NotFinished,
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::EmptyQuizSet => write!(f, "题目列表为空"),
            SessionError::OptionOutOfRange {
                index,
                option_count,
            } => {
                write!(f, "选项下标 {} 超出范围 [0, {})", index, option_count)
            }
            SessionError::AnswerRequired { index } => {
                write!(f, "第 {} 题尚未作答", index + 1)
            }
            SessionError::AtFirstQuestion => write!(f, "已经在第一题"),
            SessionError::AlreadyFinished => write!(f, "本次答题已经结束"),
            SessionError::NotFinished => write!(f, "本次答题尚未结束"),
        }
    }
}

impl std::error::Error for SessionError {}

/// 客户端请求构造器错误
#[derive(Debug)]
pub enum ClientError {
    /// 已有一个生成请求在途
    RequestInFlight,
    /// 没有可提交的内容（既没选文件也没有文本）
    NothingToSubmit,
    /// 网络传输失败
    Transport {
        source: reqwest::Error,
    },
    /// 服务端返回了错误响应
    Rejected {
        message: String,
    },
    /// 服务端返回了无法识别的格式
    UnexpectedFormat {
        message: String,
    },
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::RequestInFlight => write!(f, "已有一个生成请求在途"),
            ClientError::NothingToSubmit => write!(f, "没有可提交的内容"),
            ClientError::Transport { source } => write!(f, "网络请求失败: {}", source),
            ClientError::Rejected { message } => write!(f, "服务端拒绝请求: {}", message),
            ClientError::UnexpectedFormat { message } => {
                write!(f, "服务端返回格式异常: {}", message)
            }
        }
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ClientError::Transport { source } => Some(source),
            _ => None,
        }
    }
}

// ========== 从子错误类型转换 ==========

impl From<QuizError> for AppError {
    fn from(err: QuizError) -> Self {
        AppError::Quiz(err)
    }
}

impl From<ExtractError> for AppError {
    fn from(err: ExtractError) -> Self {
        AppError::Extract(err)
    }
}

impl From<LlmError> for AppError {
    fn from(err: LlmError) -> Self {
        AppError::Llm(err)
    }
}

impl From<SessionError> for AppError {
    fn from(err: SessionError) -> Self {
        AppError::Session(err)
    }
}

impl From<ClientError> for AppError {
    fn from(err: ClientError) -> Self {
        AppError::Client(err)
    }
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建 LLM API 调用错误
    pub fn llm_api_failed(
        model: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Llm(LlmError::ApiCallFailed {
            model: model.into(),
            source: Box::new(source),
        })
    }

    /// 创建模型输出结构不符错误
    pub fn schema_mismatch(reason: impl Into<String>) -> Self {
        AppError::Quiz(QuizError::ModelOutputSchemaMismatch {
            reason: reason.into(),
        })
    }

    /// 创建服务端拒绝错误（客户端侧）
    pub fn rejected(message: impl Into<String>) -> Self {
        AppError::Client(ClientError::Rejected {
            message: message.into(),
        })
    }

    /// 返回给最终用户的英文文案
    ///
    /// 对外文案固定为英文，内部日志（Display）为中文。
    pub fn user_message(&self) -> String {
        match self {
            AppError::Quiz(QuizError::MissingInput) => "No content provided".to_string(),
            AppError::Quiz(QuizError::EmptyInput) => {
                "Could not read any text from the provided input.".to_string()
            }
            AppError::Quiz(QuizError::ModelOutputNotJson { .. }) => {
                "Failed to parse model output as JSON.".to_string()
            }
            AppError::Quiz(QuizError::ModelOutputSchemaMismatch { .. }) => {
                "Output JSON did not match expected schema.".to_string()
            }
            AppError::Extract(ExtractError::Unsupported { .. }) => {
                "Unsupported file type. Use .txt, .pdf, or .docx".to_string()
            }
            AppError::Extract(_) => "Failed to read the uploaded file.".to_string(),
            AppError::Llm(_) => "Failed to generate questions.".to_string(),
            AppError::NotFound(msg)
            | AppError::Conflict(msg)
            | AppError::Validation(msg)
            | AppError::Other(msg) => msg.clone(),
            AppError::Session(_) | AppError::Client(_) => "Internal server error".to_string(),
        }
    }

    /// 对应的 HTTP 状态码
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Quiz(QuizError::MissingInput)
            | AppError::Quiz(QuizError::EmptyInput)
            | AppError::Extract(_)
            | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// ========== HTTP 响应映射 ==========

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!("请求处理失败: {}", self);
        } else {
            warn!("请求被拒绝: {}", self);
        }

        let body = Json(serde_json::json!({ "error": self.user_message() }));
        (status, body).into_response()
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages_match_wire_contract() {
        assert_eq!(
            AppError::Quiz(QuizError::MissingInput).user_message(),
            "No content provided"
        );
        assert_eq!(
            AppError::Extract(ExtractError::Unsupported {
                extension: Some("exe".to_string())
            })
            .user_message(),
            "Unsupported file type. Use .txt, .pdf, or .docx"
        );
        assert_eq!(
            AppError::schema_mismatch("questions 长度为 4").user_message(),
            "Output JSON did not match expected schema."
        );
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::Quiz(QuizError::MissingInput).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::NotFound("no such exam".to_string()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Conflict("session is full".to_string()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::schema_mismatch("bad").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
