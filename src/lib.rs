//! # StudyAllo 后端
//!
//! 学生学习效率应用的 Rust 后端：AI 出题、自习组局布告栏、
//! 考试安排、番茄钟。出题之外的列表都只存在进程内存里。
//!
//! ## 架构设计
//!
//! 本系统采用分层架构：
//!
//! ### ① 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，每个服务只管一件事
//! - `ExtractService` - 上传文档到纯文本的提取能力
//! - `LlmService` - LLM 调用能力
//!
//! ### ② 协议层（Quiz）
//! - `quiz/` - 出题请求/响应契约和答题状态机
//! - `repair` / `schema` - 模型输出的宽容切片与严格校验
//! - `QuizSession` - 答题会话状态机
//! - `QuizRequestBuilder` - 客户端 multipart 请求构造器
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一次生成请求"的完整处理流程
//! - `RequestCtx` - 上下文封装（请求 ID + 输入来源）
//! - `QuizFlow` - 流程编排（提取 → LLM → 切片 → 校验）
//!
//! ### ④ 接入层（API）
//! - `api/` - axum 路由，只做参数提取和响应包装
//! - `state` / `app` - 共享状态与启动组装

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod logger;
pub mod models;
pub mod quiz;
pub mod services;
pub mod state;
pub mod timer;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use app::App;
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::{Question, QuizSet};
pub use quiz::{QuizRequestBuilder, QuizSession};
pub use state::AppState;
pub use workflow::{QuizFlow, RequestCtx, UploadedFile};
