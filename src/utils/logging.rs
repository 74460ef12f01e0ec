/// 日志工具模块
///
/// 提供日志格式化和输出的辅助函数
use crate::config::Config;
use tracing::info;

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 StudyAllo 后端启动");
    info!(
        "启动时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("📡 监听端口: {}", config.server_port);
    info!("🤖 LLM 模型: {}", config.llm_model_name);
    info!("📁 上传目录: {}", config.upload_dir);
    info!("{}", "=".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_text_unchanged() {
        assert_eq!(truncate_text("hello", 10), "hello");
    }

    #[test]
    fn test_truncate_long_text() {
        assert_eq!(truncate_text("hello world", 5), "hello...");
    }

    #[test]
    fn test_truncate_counts_chars_not_bytes() {
        // 中文按字符截断，不会切坏 UTF-8
        assert_eq!(truncate_text("一二三四五六", 3), "一二三...");
    }
}
