pub mod exam;
pub mod question;
pub mod study_session;

pub use exam::{days_until, CreateExam, Exam};
pub use question::{Question, QuizSet};
pub use study_session::{CreateStudySession, StudySession};
