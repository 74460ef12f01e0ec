use serde::{Deserialize, Serialize};

/// 自习组局（布告栏条目）
///
/// 仅存在于进程内存中，进程重启即清空。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudySession {
    pub id: String,
    pub subject: String,
    pub location: String,
    /// 日期，YYYY-MM-DD
    pub date: String,
    /// 开始时间，HH:MM
    pub time: String,
    /// 时长（分钟）
    pub duration: u32,
    pub author: String,
    pub description: String,
    /// 当前报名人数
    pub participants: u32,
    pub max_participants: u32,
}

impl StudySession {
    /// 是否已满员
    pub fn is_full(&self) -> bool {
        self.participants >= self.max_participants
    }
}

/// 创建组局的请求体
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateStudySession {
    pub subject: String,
    pub location: String,
    pub date: String,
    pub time: String,
    pub duration: u32,
    pub description: String,
    pub max_participants: u32,
    /// 发起人，缺省为 "You"
    #[serde(default)]
    pub author: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_full() {
        let mut session = StudySession {
            id: "1".to_string(),
            subject: "数据结构".to_string(),
            location: "图书馆".to_string(),
            date: "2025-01-20".to_string(),
            time: "14:00".to_string(),
            duration: 120,
            author: "Ann".to_string(),
            description: String::new(),
            participants: 3,
            max_participants: 4,
        };
        assert!(!session.is_full());
        session.participants = 4;
        assert!(session.is_full());
    }

    #[test]
    fn test_wire_names_are_camel_case() {
        let json = serde_json::json!({
            "subject": "OOP",
            "location": "Cafeteria",
            "date": "2025-01-22",
            "time": "16:30",
            "duration": 90,
            "description": "Inheritance concepts.",
            "maxParticipants": 3
        });
        let req: CreateStudySession = serde_json::from_value(json).unwrap();
        assert_eq!(req.max_participants, 3);
        assert!(req.author.is_none());
    }
}
