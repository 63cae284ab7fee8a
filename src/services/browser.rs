//! 浏览器启动
//!
//! 服务器就绪后在后台打开默认浏览器，失败只记日志，不影响服务。

use std::time::Duration;

use tokio::process::Command;
use tracing::{info, warn};

/// 启动后台任务，稍候打开浏览器指向给定 URL
pub fn open_in_background(url: String) {
    tokio::spawn(async move {
        // 留给监听器一点就绪时间
        tokio::time::sleep(Duration::from_millis(800)).await;

        let result = if cfg!(target_os = "macos") {
            Command::new("open").arg(&url).status().await
        } else if cfg!(windows) {
            Command::new("cmd").args(["/C", "start", &url]).status().await
        } else {
            Command::new("xdg-open").arg(&url).status().await
        };

        match result {
            Ok(status) if status.success() => {
                info!(url = %url, "Opened browser");
            }
            Ok(status) => {
                warn!(url = %url, code = ?status.code(), "Browser opener exited with error");
            }
            Err(e) => {
                warn!(url = %url, error = %e, "Failed to launch browser opener");
            }
        }
    });
}
