//! 页面可见性订阅与分心提醒
//!
//! 平台的可见性变化通过 watch 通道广播；分心监视器订阅它，
//! 在计时器走表期间页面被切走时触发一次告警转移。
//! 监视器销毁时后台任务被显式取消，不会悬挂。

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

/// 页面可见性
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Visible,
    Hidden,
}

/// 可见性事件源
///
/// 持有 watch 发送端；宿主（页面、测试）在可见性变化时调用 `set`。
pub struct VisibilityWatcher {
    tx: watch::Sender<Visibility>,
}

impl Default for VisibilityWatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl VisibilityWatcher {
    /// 创建事件源，初始状态为可见
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(Visibility::Visible);
        Self { tx }
    }

    /// 订阅可见性变化
    pub fn subscribe(&self) -> watch::Receiver<Visibility> {
        self.tx.subscribe()
    }

    /// 上报一次可见性变化
    pub fn set(&self, visibility: Visibility) {
        // send_replace 在没有订阅者时也不报错
        self.tx.send_replace(visibility);
    }
}

/// 分心监视器
///
/// 职责：
/// - 消费可见性订阅，把"隐藏且计时器在走表"翻译成一次告警回调
/// - 只做这一个状态转移，不碰计时器本身
pub struct DistractionMonitor {
    handle: JoinHandle<()>,
}

impl DistractionMonitor {
    /// 启动后台订阅任务
    ///
    /// # 参数
    /// - `visibility`: 可见性订阅端
    /// - `is_timer_running`: 查询计时器是否在走表
    /// - `on_alert`: 触发告警时的回调（每次隐藏最多一次）
    pub fn spawn<F, A>(
        mut visibility: watch::Receiver<Visibility>,
        is_timer_running: F,
        mut on_alert: A,
    ) -> Self
    where
        F: Fn() -> bool + Send + 'static,
        A: FnMut() + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            while visibility.changed().await.is_ok() {
                let current = *visibility.borrow_and_update();
                if current == Visibility::Hidden && is_timer_running() {
                    debug!("⏰ 页面在计时期间被切走，触发分心提醒");
                    on_alert();
                }
            }
        });
        Self { handle }
    }

    /// 显式取消后台订阅
    pub fn stop(&self) {
        self.handle.abort();
    }
}

impl Drop for DistractionMonitor {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
