//! Git Push Agent - 本地 Git 推送/发布服务器
//!
//! 库入口：模块树 + 启动流程

pub mod api;
pub mod config;
pub mod domain;
pub mod error;
pub mod infra;
pub mod services;
pub mod state;

use std::sync::Arc;

use tracing::{error, info};

use crate::config::env::EnvConfig;
use crate::state::AppState;

/// 命令行运行时配置
#[derive(Debug, Default, Clone)]
pub struct RuntimeConfig {
    /// 覆盖监听端口
    pub port_override: Option<u16>,
    /// 启动时不打开浏览器
    pub no_browser: bool,
}

/// 初始化并运行服务器
///
/// 加载配置、绑定端口、启动浏览器，直到收到 Ctrl+C 为止。
pub async fn init_and_run(runtime: RuntimeConfig) {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let mut config = EnvConfig::from_env();
    if let Some(port) = runtime.port_override {
        config.port = port;
    }
    if runtime.no_browser {
        config.open_browser = false;
    }

    let port = config.port;
    let url = format!("http://localhost:{}", port);
    let open_browser = config.open_browser;

    info!(
        port = port,
        work_dir = %config.work_dir.display(),
        "Starting git-push-agent"
    );

    let state = Arc::new(AppState::new(config));
    let app = api::router(state);

    let listener = match tokio::net::TcpListener::bind(("0.0.0.0", port)).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(port = port, error = %e, "Failed to bind port");
            std::process::exit(1);
        }
    };

    print_banner(&url);

    if open_browser {
        services::browser::open_in_background(url);
    }

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!(error = %e, "Server error");
        std::process::exit(1);
    }

    info!("Server stopped");
}

/// 启动横幅
fn print_banner(url: &str) {
    println!();
    println!("  ================================================");
    println!(
        "       Git 自动推送工具 - 本地服务器 v{}",
        config::env::constants::VERSION
    );
    println!("  ================================================");
    println!();
    println!("  服务器已启动: {}", url);
    println!("  按 Ctrl+C 停止服务器");
    println!();
}

/// 等待 Ctrl+C 信号
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    info!("Shutdown signal received");
    println!("\n服务器已停止");
}
