use serde::{Deserialize, Serialize};

/// 单道选择题
///
/// 由生成服务校验通过后产出，产出后不再修改。
/// `options` 的顺序有意义：前端按位置标注 A-D，判分也按位置比较。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    /// 题干
    pub question: String,
    /// 固定 4 个选项
    pub options: Vec<String>,
    /// 正确选项在 `options` 中的下标（0-3）
    #[serde(rename = "correctIndex")]
    pub correct_index: usize,
    /// 解析说明（模型可能不返回）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

impl Question {
    /// 判断给定选项是否为正确答案
    pub fn is_correct(&self, option_index: usize) -> bool {
        option_index == self.correct_index
    }

    /// 选项的字母标签：0 -> 'A'，1 -> 'B'，以此类推
    pub fn option_label(option_index: usize) -> char {
        (b'A' + option_index as u8) as char
    }
}

/// 一次生成调用产出的整套题目
///
/// 生命周期：生成成功时创建，一次答题期间由客户端持有，
/// 重新开始或离开页面时丢弃。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizSet {
    pub questions: Vec<Question>,
}

impl QuizSet {
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}
