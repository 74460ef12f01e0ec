//! 共享应用状态
//!
//! 出题流程本身无状态；这里的两份列表（组局、考试）是进程内存中
//! 唯一的共享可变数据，用读写锁保护，进程重启即清空。

use std::sync::Arc;
use tokio::sync::RwLock;

use crate::config::Config;
use crate::models::{days_until, Exam, StudySession};
use crate::workflow::QuizFlow;

/// 各路由共享的应用状态
#[derive(Clone)]
pub struct AppState {
    pub quiz_flow: Arc<QuizFlow>,
    pub study_sessions: Arc<RwLock<Vec<StudySession>>>,
    pub exams: Arc<RwLock<Vec<Exam>>>,
}

impl AppState {
    /// 创建空状态
    pub fn new(config: &Config) -> Self {
        Self {
            quiz_flow: Arc::new(QuizFlow::new(config)),
            study_sessions: Arc::new(RwLock::new(Vec::new())),
            exams: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// 填充演示数据（与线上页面初始内容一致）
    pub async fn seed_demo_data(&self) {
        let mut sessions = self.study_sessions.write().await;
        sessions.extend([
            StudySession {
                id: "1".to_string(),
                subject: "Data Structures & Algorithms".to_string(),
                location: "Data Structures Lab".to_string(),
                date: "2025-01-20".to_string(),
                time: "14:00".to_string(),
                duration: 120,
                author: "Annlia Jose".to_string(),
                description: "Working on stacks, queue and linked lists.".to_string(),
                participants: 2,
                max_participants: 4,
            },
            StudySession {
                id: "2".to_string(),
                subject: "Mathematics for Information Science".to_string(),
                location: "SJCET Library".to_string(),
                date: "2025-01-21".to_string(),
                time: "10:00".to_string(),
                duration: 180,
                author: "Ann Scaria".to_string(),
                description: "Review session for upcoming internals. Focus on Binomial Distribution."
                    .to_string(),
                participants: 3,
                max_participants: 6,
            },
            StudySession {
                id: "3".to_string(),
                subject: "Object Oriented Programming".to_string(),
                location: "Madona Cafeteria".to_string(),
                date: "2025-01-22".to_string(),
                time: "16:30".to_string(),
                duration: 90,
                author: "Merin Anna Johns".to_string(),
                description: "Parameterized Constructors and Inheritance concepts.".to_string(),
                participants: 1,
                max_participants: 3,
            },
        ]);
        drop(sessions);

        let mut exams = self.exams.write().await;
        for (id, subject, date, time, location, duration, exam_type, notes) in [
            (
                "1",
                "Data Structures & Algorithms",
                "2025-01-25",
                "09:00",
                "Computer Science Building - Room 101",
                180u32,
                "Midterm",
                "Focus on trees, graphs, and dynamic programming",
            ),
            (
                "2",
                "Organic Chemistry",
                "2025-01-28",
                "14:00",
                "Chemistry Building - Lab 205",
                120,
                "Final",
                "Reaction mechanisms and synthesis problems",
            ),
            (
                "3",
                "Calculus II",
                "2025-02-02",
                "10:30",
                "Mathematics Building - Room 301",
                150,
                "Midterm",
                "Integration techniques and series",
            ),
        ] {
            exams.push(Exam {
                id: id.to_string(),
                subject: subject.to_string(),
                date: date.to_string(),
                time: time.to_string(),
                location: location.to_string(),
                duration,
                exam_type: exam_type.to_string(),
                notes: notes.to_string(),
                days_left: days_until(date).unwrap_or(0),
            });
        }
    }
}
