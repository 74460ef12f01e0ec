//! 专注计时器状态机
//!
//! 学习/休息两个阶段交替。走表由外部驱动（每秒一次 tick），
//! 状态机本身不持有任何定时资源，方便测试。

/// 计时器当前阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerPhase {
    Study,
    Break,
}

/// 一个阶段倒数到零时产生的事件
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseEvent {
    /// 学习阶段结束，该休息了
    StudyComplete,
    /// 休息阶段结束，该学习了
    BreakComplete,
}

/// 番茄钟
///
/// 不变式：
/// - 倒数到零时自动停表、切换阶段、装入新阶段的时长
/// - 修改时长设置只在停表状态下生效
#[derive(Debug, Clone)]
pub struct PomodoroTimer {
    study_minutes: u32,
    break_minutes: u32,
    phase: TimerPhase,
    remaining_secs: u32,
    running: bool,
}

impl Default for PomodoroTimer {
    fn default() -> Self {
        Self::new(25, 5)
    }
}

impl PomodoroTimer {
    /// 创建计时器，初始处于学习阶段、停表状态
    pub fn new(study_minutes: u32, break_minutes: u32) -> Self {
        Self {
            study_minutes,
            break_minutes,
            phase: TimerPhase::Study,
            remaining_secs: study_minutes * 60,
            running: false,
        }
    }

    pub fn phase(&self) -> TimerPhase {
        self.phase
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// 开始/暂停
    pub fn toggle(&mut self) {
        self.running = !self.running;
    }

    /// 停表并重置当前阶段的剩余时间
    pub fn reset(&mut self) {
        self.running = false;
        self.remaining_secs = self.phase_duration_secs(self.phase);
    }

    /// 修改学习/休息时长，停表时立即装入当前阶段
    pub fn set_durations(&mut self, study_minutes: u32, break_minutes: u32) {
        self.study_minutes = study_minutes;
        self.break_minutes = break_minutes;
        if !self.running {
            self.remaining_secs = self.phase_duration_secs(self.phase);
        }
    }

    /// 走一秒
    ///
    /// # 返回
    /// 阶段切换时返回对应事件，其余情况返回 None
    pub fn tick(&mut self) -> Option<PhaseEvent> {
        if !self.running || self.remaining_secs == 0 {
            return None;
        }

        self.remaining_secs -= 1;
        if self.remaining_secs > 0 {
            return None;
        }

        // 倒数到零：停表、换阶段、装入新阶段时长
        self.running = false;
        let event = match self.phase {
            TimerPhase::Study => {
                self.phase = TimerPhase::Break;
                PhaseEvent::StudyComplete
            }
            TimerPhase::Break => {
                self.phase = TimerPhase::Study;
                PhaseEvent::BreakComplete
            }
        };
        self.remaining_secs = self.phase_duration_secs(self.phase);
        Some(event)
    }

    /// 当前阶段已走过的比例（0.0 到 1.0）
    pub fn progress(&self) -> f32 {
        let total = self.phase_duration_secs(self.phase);
        if total == 0 {
            return 0.0;
        }
        (total - self.remaining_secs) as f32 / total as f32
    }

    /// 剩余时间的 MM:SS 显示
    pub fn format_remaining(&self) -> String {
        format!(
            "{:02}:{:02}",
            self.remaining_secs / 60,
            self.remaining_secs % 60
        )
    }

    fn phase_duration_secs(&self, phase: TimerPhase) -> u32 {
        match phase {
            TimerPhase::Study => self.study_minutes * 60,
            TimerPhase::Break => self.break_minutes * 60,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let timer = PomodoroTimer::default();
        assert_eq!(timer.phase(), TimerPhase::Study);
        assert_eq!(timer.remaining_secs(), 25 * 60);
        assert!(!timer.is_running());
        assert_eq!(timer.format_remaining(), "25:00");
    }

    #[test]
    fn test_tick_ignored_while_paused() {
        let mut timer = PomodoroTimer::new(1, 1);
        assert_eq!(timer.tick(), None);
        assert_eq!(timer.remaining_secs(), 60);
    }

    #[test]
    fn test_study_finishes_into_break() {
        let mut timer = PomodoroTimer::new(1, 2);
        timer.toggle();

        for _ in 0..59 {
            assert_eq!(timer.tick(), None);
        }
        // 最后一秒：停表、切到休息阶段、装入休息时长
        assert_eq!(timer.tick(), Some(PhaseEvent::StudyComplete));
        assert_eq!(timer.phase(), TimerPhase::Break);
        assert!(!timer.is_running());
        assert_eq!(timer.remaining_secs(), 2 * 60);
    }

    #[test]
    fn test_break_finishes_back_into_study() {
        let mut timer = PomodoroTimer::new(1, 1);
        timer.toggle();
        for _ in 0..60 {
            timer.tick();
        }
        assert_eq!(timer.phase(), TimerPhase::Break);

        timer.toggle();
        let mut event = None;
        for _ in 0..60 {
            event = timer.tick();
        }
        assert_eq!(event, Some(PhaseEvent::BreakComplete));
        assert_eq!(timer.phase(), TimerPhase::Study);
    }

    #[test]
    fn test_reset_reloads_current_phase() {
        let mut timer = PomodoroTimer::new(25, 5);
        timer.toggle();
        timer.tick();
        timer.tick();
        assert_eq!(timer.remaining_secs(), 25 * 60 - 2);

        timer.reset();
        assert!(!timer.is_running());
        assert_eq!(timer.remaining_secs(), 25 * 60);
    }

    #[test]
    fn test_settings_apply_only_while_idle() {
        let mut timer = PomodoroTimer::new(25, 5);
        timer.set_durations(50, 10);
        assert_eq!(timer.remaining_secs(), 50 * 60);

        // 走表期间修改设置不打断当前倒数
        timer.toggle();
        timer.tick();
        timer.set_durations(30, 10);
        assert_eq!(timer.remaining_secs(), 50 * 60 - 1);
    }

    #[test]
    fn test_progress() {
        let mut timer = PomodoroTimer::new(1, 1);
        assert_eq!(timer.progress(), 0.0);
        timer.toggle();
        for _ in 0..30 {
            timer.tick();
        }
        assert!((timer.progress() - 0.5).abs() < f32::EPSILON);
    }
}
