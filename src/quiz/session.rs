//! 答题会话状态机
//!
//! 状态流转：Input -> Quiz -> Result。Input 阶段还没有会话对象，
//! 生成成功后用 QuizSet 构造会话进入 Quiz；最后一题提交后进入 Result。
//!
//! 不变式：
//! - 题目下标每次只移动一步，前进必须先作答当前题
//! - 后退保留已有作答，作答只能覆盖、不能清空
//! - 得分在进入 Result 时计算一次，之后不再重算

use crate::error::SessionError;
use crate::models::{Question, QuizSet};

/// 一次前进操作的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceOutcome {
    /// 移动到下一题（携带新的下标）
    Next(usize),
    /// 最后一题已提交，本次答题结束
    Finished(QuizOutcome),
}

/// 答题结果，进入 Result 时固定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizOutcome {
    /// 答对题数
    pub correct: usize,
    /// 总题数
    pub total: usize,
}

/// 复盘条目（Result 界面逐题展示用）
#[derive(Debug)]
pub struct ReviewEntry<'a> {
    /// 题目下标
    pub index: usize,
    pub question: &'a Question,
    /// 用户选择的选项
    pub selected: Option<usize>,
    pub is_correct: bool,
}

/// 答题会话
///
/// 职责：
/// - 持有一次答题期间的 QuizSet 和答题卡
/// - 执行所有状态转移并守住不变式
/// - 不发网络请求、不做任何 IO
#[derive(Debug, Clone)]
pub struct QuizSession {
    quiz: QuizSet,
    index: usize,
    answers: Vec<Option<usize>>,
    outcome: Option<QuizOutcome>,
}

impl QuizSession {
    /// 用生成好的题目开始一次答题
    pub fn new(quiz: QuizSet) -> Result<Self, SessionError> {
        if quiz.is_empty() {
            return Err(SessionError::EmptyQuizSet);
        }
        let total = quiz.len();
        Ok(Self {
            quiz,
            index: 0,
            answers: vec![None; total],
            outcome: None,
        })
    }

    pub fn total(&self) -> usize {
        self.quiz.len()
    }

    pub fn current_index(&self) -> usize {
        self.index
    }

    pub fn current_question(&self) -> &Question {
        &self.quiz.questions[self.index]
    }

    pub fn is_last_question(&self) -> bool {
        self.index + 1 == self.quiz.len()
    }

    pub fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }

    /// 答题卡（按题目顺序）
    pub fn answers(&self) -> &[Option<usize>] {
        &self.answers
    }

    /// 记录当前题的作答，重复选择直接覆盖
    pub fn select_option(&mut self, option: usize) -> Result<(), SessionError> {
        if self.is_finished() {
            return Err(SessionError::AlreadyFinished);
        }
        let option_count = self.current_question().options.len();
        if option >= option_count {
            return Err(SessionError::OptionOutOfRange {
                index: option,
                option_count,
            });
        }
        self.answers[self.index] = Some(option);
        Ok(())
    }

    /// 当前题已作答且答题未结束时才能前进
    pub fn can_advance(&self) -> bool {
        !self.is_finished() && self.answers[self.index].is_some()
    }

    /// 前进一步；在最后一题上等价于提交
    pub fn advance(&mut self) -> Result<AdvanceOutcome, SessionError> {
        if self.is_finished() {
            return Err(SessionError::AlreadyFinished);
        }
        if self.answers[self.index].is_none() {
            return Err(SessionError::AnswerRequired { index: self.index });
        }

        if self.is_last_question() {
            // 得分在这里计算一次，之后只读
            let outcome = QuizOutcome {
                correct: self.count_correct(),
                total: self.quiz.len(),
            };
            self.outcome = Some(outcome);
            return Ok(AdvanceOutcome::Finished(outcome));
        }

        self.index += 1;
        Ok(AdvanceOutcome::Next(self.index))
    }

    /// 后退一步，已有作答原样保留
    pub fn go_back(&mut self) -> Result<usize, SessionError> {
        if self.is_finished() {
            return Err(SessionError::AlreadyFinished);
        }
        if self.index == 0 {
            return Err(SessionError::AtFirstQuestion);
        }
        self.index -= 1;
        Ok(self.index)
    }

    /// 进入 Result 时固定下来的得分
    pub fn outcome(&self) -> Option<QuizOutcome> {
        self.outcome
    }

    /// 逐题复盘，只在 Result 状态可用
    pub fn review(&self) -> Result<Vec<ReviewEntry<'_>>, SessionError> {
        if !self.is_finished() {
            return Err(SessionError::NotFinished);
        }
        Ok(self
            .quiz
            .questions
            .iter()
            .enumerate()
            .map(|(i, question)| ReviewEntry {
                index: i,
                question,
                selected: self.answers[i],
                is_correct: self.answers[i] == Some(question.correct_index),
            })
            .collect())
    }

    /// 重做同一套题：清空答题卡、回到第一题
    pub fn retake(&mut self) -> Result<(), SessionError> {
        if !self.is_finished() {
            return Err(SessionError::NotFinished);
        }
        self.answers = vec![None; self.quiz.len()];
        self.index = 0;
        self.outcome = None;
        Ok(())
    }

    fn count_correct(&self) -> usize {
        self.quiz
            .questions
            .iter()
            .zip(self.answers.iter())
            .filter(|(question, answer)| **answer == Some(question.correct_index))
            .count()
    }
}
