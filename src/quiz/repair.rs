//! 模型输出的宽容切片
//!
//! 模型即使被要求"只返回 JSON"，也可能在前后加说明文字或 markdown 围栏。
//! 这里取第一个 `{` 到最后一个 `}` 之间的片段再交给解析器，
//! 属于尽力而为的修复，不保证切出来的一定是合法 JSON。

/// 从原始响应中切出疑似 JSON 对象的片段
///
/// # 返回
/// 找不到成对的花括号时返回 None，调用方应改用原始文本继续解析
pub fn slice_json_object(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&raw[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_object_unchanged() {
        let raw = r#"{"questions":[]}"#;
        assert_eq!(slice_json_object(raw), Some(raw));
    }

    #[test]
    fn test_strips_leading_commentary() {
        let raw = "Sure! Here is your quiz:\n{\"questions\":[]}";
        assert_eq!(slice_json_object(raw), Some("{\"questions\":[]}"));
    }

    #[test]
    fn test_strips_trailing_commentary() {
        let raw = "{\"questions\":[]}\nHope this helps!";
        assert_eq!(slice_json_object(raw), Some("{\"questions\":[]}"));
    }

    #[test]
    fn test_strips_markdown_fences() {
        let raw = "```json\n{\"questions\":[]}\n```";
        assert_eq!(slice_json_object(raw), Some("{\"questions\":[]}"));
    }

    #[test]
    fn test_keeps_nested_braces_intact() {
        let raw = "noise {\"a\":{\"b\":1}} noise";
        assert_eq!(slice_json_object(raw), Some("{\"a\":{\"b\":1}}"));
    }

    #[test]
    fn test_no_braces_returns_none() {
        assert_eq!(slice_json_object("I cannot do that."), None);
        assert_eq!(slice_json_object(""), None);
    }

    #[test]
    fn test_reversed_braces_returns_none() {
        assert_eq!(slice_json_object("} oops {"), None);
    }
}
