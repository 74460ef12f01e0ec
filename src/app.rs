//! 应用组装与启动

use anyhow::Result;
use tokio::net::TcpListener;
use tracing::info;

use crate::api;
use crate::config::Config;
use crate::state::AppState;
use crate::utils::logging::log_startup;

/// 应用主结构
pub struct App {
    config: Config,
    state: AppState,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        // 上传目录先建好，出题请求进来时直接可用
        tokio::fs::create_dir_all(&config.upload_dir).await?;

        let state = AppState::new(&config);
        state.seed_demo_data().await;

        Ok(Self { config, state })
    }

    /// 运行 HTTP 服务（阻塞到进程退出）
    pub async fn run(self) -> Result<()> {
        log_startup(&self.config);

        let addr = format!("0.0.0.0:{}", self.config.server_port);
        let listener = TcpListener::bind(&addr).await?;
        info!("📡 服务已就绪: http://{}", addr);

        axum::serve(listener, api::router(self.state)).await?;
        Ok(())
    }
}
