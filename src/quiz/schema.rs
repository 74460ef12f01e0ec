//! 模型输出的严格结构校验
//!
//! 解析成功的 JSON 还必须整体符合约定结构才会被接受。
//! 任何一处不符都整套拒绝：不截断多余的题目、不补齐缺少的选项、
//! 不把越界的 correctIndex 钳到范围内。

use serde_json::Value as JsonValue;

use crate::models::{Question, QuizSet};

/// 每套题固定 5 道
pub const QUESTION_COUNT: usize = 5;

/// 每道题固定 4 个选项
pub const OPTION_COUNT: usize = 4;

/// 把解析后的 JSON 校验并转换为 QuizSet
///
/// # 返回
/// 校验失败返回具体原因（用于服务端诊断日志，不直接展示给用户）
pub fn validate_quiz_payload(value: &JsonValue) -> Result<QuizSet, String> {
    let questions = value
        .get("questions")
        .ok_or_else(|| "缺少 questions 字段".to_string())?
        .as_array()
        .ok_or_else(|| "questions 不是数组".to_string())?;

    if questions.len() != QUESTION_COUNT {
        return Err(format!(
            "questions 长度为 {}，应为 {}",
            questions.len(),
            QUESTION_COUNT
        ));
    }

    let mut validated = Vec::with_capacity(questions.len());
    for (i, item) in questions.iter().enumerate() {
        validated.push(validate_question(item).map_err(|reason| format!("第 {} 题{}", i + 1, reason))?);
    }

    Ok(QuizSet {
        questions: validated,
    })
}

/// 校验单道题目的结构
fn validate_question(item: &JsonValue) -> Result<Question, String> {
    let question = item
        .get("question")
        .and_then(|v| v.as_str())
        .ok_or_else(|| " question 不是字符串".to_string())?;
    if question.trim().is_empty() {
        return Err(" question 为空".to_string());
    }

    let options = item
        .get("options")
        .and_then(|v| v.as_array())
        .ok_or_else(|| " options 不是数组".to_string())?;
    if options.len() != OPTION_COUNT {
        return Err(format!(" options 长度为 {}，应为 {}", options.len(), OPTION_COUNT));
    }

    let mut option_texts = Vec::with_capacity(OPTION_COUNT);
    for opt in options {
        let text = opt
            .as_str()
            .ok_or_else(|| " options 中有非字符串元素".to_string())?;
        option_texts.push(text.to_string());
    }

    // 只接受非负整数，2.0 或 -1 这类值都算结构不符
    let correct_index = item
        .get("correctIndex")
        .and_then(|v| v.as_u64())
        .ok_or_else(|| " correctIndex 不是非负整数".to_string())? as usize;
    if correct_index >= OPTION_COUNT {
        return Err(format!(
            " correctIndex 为 {}，超出 [0, {}]",
            correct_index,
            OPTION_COUNT - 1
        ));
    }

    // explanation 是可选的补充说明，存在时必须是字符串
    let explanation = match item.get("explanation") {
        None | Some(JsonValue::Null) => None,
        Some(v) => Some(
            v.as_str()
                .ok_or_else(|| " explanation 不是字符串".to_string())?
                .to_string(),
        ),
    };

    Ok(Question {
        question: question.to_string(),
        options: option_texts,
        correct_index,
        explanation,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_question(correct: i64) -> JsonValue {
        json!({
            "question": "中国的首都是哪里？",
            "options": ["北京", "上海", "广州", "深圳"],
            "correctIndex": correct
        })
    }

    fn sample_payload() -> JsonValue {
        json!({ "questions": (0..5).map(|_| sample_question(0)).collect::<Vec<_>>() })
    }

    #[test]
    fn test_valid_payload_accepted() {
        let quiz = validate_quiz_payload(&sample_payload()).expect("合法结构应该通过");
        assert_eq!(quiz.len(), QUESTION_COUNT);
        assert_eq!(quiz.questions[0].correct_index, 0);
        assert_eq!(quiz.questions[0].options.len(), OPTION_COUNT);
    }

    #[test]
    fn test_four_questions_rejected() {
        let payload = json!({ "questions": (0..4).map(|_| sample_question(0)).collect::<Vec<_>>() });
        let reason = validate_quiz_payload(&payload).unwrap_err();
        assert!(reason.contains("长度为 4"), "原因应点明长度: {}", reason);
    }

    #[test]
    fn test_correct_index_out_of_range_rejected() {
        let mut payload = sample_payload();
        payload["questions"][2] = sample_question(5);
        let reason = validate_quiz_payload(&payload).unwrap_err();
        assert!(reason.contains("第 3 题"), "原因应定位到题号: {}", reason);
        assert!(reason.contains("correctIndex"));
    }

    #[test]
    fn test_fractional_correct_index_rejected() {
        let mut payload = sample_payload();
        payload["questions"][0]["correctIndex"] = json!(1.5);
        assert!(validate_quiz_payload(&payload).is_err());
    }

    #[test]
    fn test_short_options_rejected_without_padding() {
        let mut payload = sample_payload();
        payload["questions"][1]["options"] = json!(["只有", "三个", "选项"]);
        let reason = validate_quiz_payload(&payload).unwrap_err();
        assert!(reason.contains("options 长度为 3"));
    }

    #[test]
    fn test_non_string_option_rejected() {
        let mut payload = sample_payload();
        payload["questions"][0]["options"] = json!(["a", "b", "c", 4]);
        assert!(validate_quiz_payload(&payload).is_err());
    }

    #[test]
    fn test_missing_questions_rejected() {
        assert!(validate_quiz_payload(&json!({})).is_err());
        assert!(validate_quiz_payload(&json!({ "questions": "not an array" })).is_err());
    }

    #[test]
    fn test_explanation_carried_through() {
        let mut payload = sample_payload();
        payload["questions"][0]["explanation"] = json!("北京自明清两代即为都城。");
        let quiz = validate_quiz_payload(&payload).unwrap();
        assert_eq!(
            quiz.questions[0].explanation.as_deref(),
            Some("北京自明清两代即为都城。")
        );
        assert!(quiz.questions[1].explanation.is_none());
    }

    #[test]
    fn test_empty_question_text_rejected() {
        let mut payload = sample_payload();
        payload["questions"][4]["question"] = json!("   ");
        let reason = validate_quiz_payload(&payload).unwrap_err();
        assert!(reason.contains("第 5 题"));
    }
}
