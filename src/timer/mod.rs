//! 专注计时器
//!
//! 纯状态机加一条可见性订阅，走表和告警都由外部事件驱动。

pub mod pomodoro;
pub mod visibility;

pub use pomodoro::{PhaseEvent, PomodoroTimer, TimerPhase};
pub use visibility::{DistractionMonitor, Visibility, VisibilityWatcher};
