pub mod quiz_flow;
pub mod request_ctx;

pub use quiz_flow::{QuizFlow, UploadedFile};
pub use request_ctx::RequestCtx;
