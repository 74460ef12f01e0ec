//! 出题请求构造器（客户端侧）
//!
//! 收集一个文件或一段文本，打包成 multipart 请求发给生成端点。
//! 同一时刻最多只允许一个在途请求，这也是整个流程唯一的背压手段。

use reqwest::multipart;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::{AppError, AppResult, ClientError};
use crate::models::QuizSet;
use crate::quiz::schema::{OPTION_COUNT, QUESTION_COUNT};
use crate::utils::truncate_text;

/// 用户选中的待上传文件
#[derive(Debug, Clone)]
pub struct SelectedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// 出题请求构造器
///
/// 职责：
/// - 维护输入来源（选中的文件、粘贴的文本）和在途标记
/// - 组装 multipart 请求并解析响应
/// - 失败时保留输入原样，方便用户修正后重试
pub struct QuizRequestBuilder {
    endpoint: String,
    client: reqwest::Client,
    file: Option<SelectedFile>,
    text: String,
    in_flight: bool,
}

impl QuizRequestBuilder {
    /// 创建新的请求构造器
    ///
    /// # 参数
    /// - `endpoint`: 生成端点的完整 URL
    /// - `timeout`: 单次请求超时。上游没有显式超时，这里必须兜底，
    ///   否则上游挂死会让调用方永远停在"生成中"。
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| ClientError::Transport { source })?;

        Ok(Self {
            endpoint: endpoint.into(),
            client,
            file: None,
            text: String::new(),
            in_flight: false,
        })
    }

    /// 记录用户选中的文件
    pub fn select_file(&mut self, name: impl Into<String>, bytes: Vec<u8>) {
        self.file = Some(SelectedFile {
            name: name.into(),
            bytes,
        });
    }

    /// 清除选中的文件
    pub fn clear_file(&mut self) {
        self.file = None;
    }

    /// 更新粘贴的文本
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    /// 有内容且没有在途请求时才能提交
    pub fn can_submit(&self) -> bool {
        !self.in_flight && self.has_content()
    }

    fn has_content(&self) -> bool {
        self.file.is_some() || !self.text.trim().is_empty()
    }

    /// 提交生成请求
    ///
    /// 文件和文本都存在时两者都会随表单发出，服务端约定优先用文件。
    /// 失败路径不动任何输入，调用方可以直接重试。
    pub async fn submit(&mut self) -> AppResult<QuizSet> {
        if self.in_flight {
            return Err(ClientError::RequestInFlight.into());
        }
        if !self.has_content() {
            return Err(ClientError::NothingToSubmit.into());
        }

        self.in_flight = true;
        let result = self.perform().await;
        self.in_flight = false;
        result
    }

    async fn perform(&self) -> AppResult<QuizSet> {
        let mut form = multipart::Form::new();

        if let Some(file) = &self.file {
            debug!("提交文件: {} ({} 字节)", file.name, file.bytes.len());
            form = form.part(
                "file",
                multipart::Part::bytes(file.bytes.clone()).file_name(file.name.clone()),
            );
        }
        if !self.text.trim().is_empty() {
            form = form.text("text", self.text.clone());
        }

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|source| ClientError::Transport { source })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|source| ClientError::Transport { source })?;

        if !status.is_success() {
            // 服务端的错误文案原样透出给用户
            let message = serde_json::from_str::<serde_json::Value>(&body)
                .ok()
                .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(String::from))
                .unwrap_or_else(|| "Failed to generate questions".to_string());
            warn!("生成请求被拒绝 ({}): {}", status, message);
            return Err(AppError::rejected(message));
        }

        let quiz: QuizSet = serde_json::from_str(&body).map_err(|_| {
            ClientError::UnexpectedFormat {
                message: format!("响应不是题目列表: {}", truncate_text(&body, 200)),
            }
        })?;

        validate_received_quiz(&quiz)?;

        info!("✓ 收到 {} 道题目", quiz.len());
        Ok(quiz)
    }
}

/// 客户端侧的兜底校验：数量或选项数不对就整套拒绝
fn validate_received_quiz(quiz: &QuizSet) -> Result<(), ClientError> {
    if quiz.len() != QUESTION_COUNT {
        return Err(ClientError::UnexpectedFormat {
            message: format!("期望 {} 道题目，收到 {}", QUESTION_COUNT, quiz.len()),
        });
    }
    for (i, question) in quiz.questions.iter().enumerate() {
        if question.options.len() != OPTION_COUNT {
            return Err(ClientError::UnexpectedFormat {
                message: format!("第 {} 题只有 {} 个选项", i + 1, question.options.len()),
            });
        }
    }
    Ok(())
}
