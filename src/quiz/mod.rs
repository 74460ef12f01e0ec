//! 出题协议层
//!
//! 包含这个仓库里最接近"协议"的几块东西：
//! - `repair`: 模型输出的宽容切片（尽力修复）
//! - `schema`: 模型输出的严格结构校验
//! - `session`: 答题会话状态机
//! - `builder`: 客户端的 multipart 请求构造器

pub mod builder;
pub mod repair;
pub mod schema;
pub mod session;

pub use builder::{QuizRequestBuilder, SelectedFile};
pub use repair::slice_json_object;
pub use schema::{validate_quiz_payload, OPTION_COUNT, QUESTION_COUNT};
pub use session::{AdvanceOutcome, QuizOutcome, QuizSession, ReviewEntry};
