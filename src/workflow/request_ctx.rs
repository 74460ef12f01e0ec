//! 生成请求上下文
//!
//! 封装"我正在处理哪个生成请求"这一信息，只用于日志串联

use std::fmt::Display;
use uuid::Uuid;

/// 生成请求上下文
#[derive(Debug, Clone)]
pub struct RequestCtx {
    /// 请求ID（短随机串，仅用于日志显示）
    pub request_id: String,
    /// 输入来源描述（文件名或 "text"）
    pub source: String,
}

impl RequestCtx {
    /// 为一次生成请求创建新的上下文
    pub fn new(source: impl Into<String>) -> Self {
        let id = Uuid::new_v4().simple().to_string();
        Self {
            request_id: id[..8].to_string(),
            source: source.into(),
        }
    }
}

impl Display for RequestCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[请求 #{} 来源#{}]", self.request_id, self.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_ids_are_unique() {
        let a = RequestCtx::new("text");
        let b = RequestCtx::new("text");
        assert_ne!(a.request_id, b.request_id);
        assert_eq!(a.request_id.len(), 8);
    }

    #[test]
    fn test_display_carries_source() {
        let ctx = RequestCtx::new("notes.pdf");
        let shown = format!("{}", ctx);
        assert!(shown.contains("notes.pdf"));
        assert!(shown.contains(&ctx.request_id));
    }
}
