//! LLM 服务 - 业务能力层
//!
//! 只负责"调用大模型拿回文本"能力，不关心出题流程
//!
//! ## 技术栈
//! - 使用 `async-openai` crate 进行 API 调用
//! - 支持自定义 API 端点和模型
//! - 兼容 OpenAI API 的服务（如 Azure, Gemini, Doubao 等）

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
    Client,
};
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{AppError, AppResult, LlmError};
use crate::quiz::schema::QUESTION_COUNT;

/// 出题指令，要求模型只返回约定结构的 JSON
///
/// 线上契约：questions 数组，每题 4 个选项加一个 correctIndex。
const QUIZ_SYSTEM_PROMPT: &str = r#"You are a quiz generator. Always reply with ONLY valid JSON (no markdown). JSON shape: {"questions":[{"question":"string","options":["string","string","string","string"],"correctIndex":0}]} Ensure exactly 4 options per question and a single correctIndex (0-3)."#;

/// 低随机性，减少模型输出偏离结构的概率
const QUIZ_TEMPERATURE: f32 = 0.3;

const QUIZ_MAX_TOKENS: u32 = 2048;

/// LLM 服务
///
/// 职责：
/// - 提供通用的 LLM 调用接口
/// - 提供出题专用的 prompt 组装
/// - 不解析、不校验模型输出（那是流程层的事）
pub struct LlmService {
    client: Client<OpenAIConfig>,
    model_name: String,
}

impl LlmService {
    /// 创建新的 LLM 服务
    pub fn new(config: &Config) -> Self {
        // 配置 OpenAI 客户端（兼容 OpenAI API 的服务）
        let openai_config = OpenAIConfig::new()
            .with_api_key(&config.llm_api_key)
            .with_api_base(&config.llm_api_base_url);

        let client = Client::with_config(openai_config);

        Self {
            client,
            model_name: config.llm_model_name.clone(),
        }
    }

    /// 通用的 LLM 调用函数
    ///
    /// 这是最基础的 LLM 调用接口，其他 LLM 相关功能都基于此函数。
    ///
    /// # 参数
    /// - `user_message`: 用户消息内容
    /// - `system_message`: 系统消息（可选）
    ///
    /// # 返回
    /// 返回 LLM 的响应内容（字符串，已去首尾空白）
    pub async fn send_to_llm(
        &self,
        user_message: &str,
        system_message: Option<&str>,
    ) -> AppResult<String> {
        debug!("调用 LLM API，模型: {}", self.model_name);
        debug!("用户消息长度: {} 字符", user_message.chars().count());

        // 构建消息列表
        let mut messages = Vec::new();

        // 添加系统消息（如果提供）
        if let Some(sys_msg) = system_message {
            let system_msg = ChatCompletionRequestSystemMessageArgs::default()
                .content(sys_msg)
                .build()
                .map_err(|e| AppError::llm_api_failed(&self.model_name, e))?;
            messages.push(ChatCompletionRequestMessage::System(system_msg));
        }

        // 添加用户消息
        let user_msg = ChatCompletionRequestUserMessageArgs::default()
            .content(user_message)
            .build()
            .map_err(|e| AppError::llm_api_failed(&self.model_name, e))?;
        messages.push(ChatCompletionRequestMessage::User(user_msg));

        // 构建请求
        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model_name)
            .messages(messages)
            .temperature(QUIZ_TEMPERATURE)
            .max_tokens(QUIZ_MAX_TOKENS)
            .build()
            .map_err(|e| AppError::llm_api_failed(&self.model_name, e))?;

        // 调用 API
        let response = self.client.chat().create(request).await.map_err(|e| {
            warn!("LLM API 调用失败: {}", e);
            AppError::llm_api_failed(&self.model_name, e)
        })?;

        debug!("LLM API 调用成功");

        // 提取响应内容
        let choice = response.choices.first().ok_or_else(|| {
            AppError::Llm(LlmError::EmptyResponse {
                model: self.model_name.clone(),
            })
        })?;

        let content = choice.message.content.clone().ok_or_else(|| {
            AppError::Llm(LlmError::EmptyContent {
                model: self.model_name.clone(),
            })
        })?;

        Ok(content.trim().to_string())
    }

    /// 根据学习材料生成一套选择题的原始响应
    ///
    /// 只负责拿回模型的原始文本，JSON 的切片、解析、校验都在流程层。
    pub async fn generate_quiz_json(&self, study_material: &str) -> AppResult<String> {
        let user_message = build_quiz_user_message(study_material);
        self.send_to_llm(&user_message, Some(QUIZ_SYSTEM_PROMPT))
            .await
    }
}

/// 组装出题的用户消息
fn build_quiz_user_message(study_material: &str) -> String {
    format!(
        "Create {} multiple-choice questions (MCQs) from the study material below. \
         Return ONLY JSON using the schema above.\n\nStudy Material:\n{}",
        QUESTION_COUNT, study_material
    )
}
