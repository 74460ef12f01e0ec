use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

/// 考试安排条目
///
/// `days_left` 是派生值，每次列出时都会按当天日期重算。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exam {
    pub id: String,
    pub subject: String,
    /// 考试日期，YYYY-MM-DD
    pub date: String,
    /// 开始时间，HH:MM
    pub time: String,
    pub location: String,
    /// 时长（分钟）
    pub duration: u32,
    /// 考试类型（Midterm / Final 等）
    #[serde(rename = "type")]
    pub exam_type: String,
    pub notes: String,
    /// 距今天数，负数表示已过期
    pub days_left: i64,
}

impl Exam {
    /// 以今天为基准重算剩余天数
    pub fn refresh_days_left(&mut self) {
        if let Some(days) = days_until(&self.date) {
            self.days_left = days;
        }
    }
}

/// 计算 YYYY-MM-DD 日期距今天的天数，解析失败返回 None
pub fn days_until(date: &str) -> Option<i64> {
    let exam_date = NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()?;
    let today = Local::now().date_naive();
    Some((exam_date - today).num_days())
}

/// 添加考试的请求体
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateExam {
    pub subject: String,
    pub date: String,
    pub time: String,
    pub location: String,
    pub duration: u32,
    #[serde(rename = "type")]
    pub exam_type: String,
    #[serde(default)]
    pub notes: String,
}
