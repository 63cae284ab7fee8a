//! 应用状态

use tokio::sync::Mutex;

use crate::config::env::EnvConfig;
use crate::services::git::GitClient;

/// 应用状态
///
/// 请求之间唯一共享的可变资源是外部 git 仓库本身，
/// 用 `workflow_lock` 把推送/发布工作流串行化（排队而非拒绝），
/// 避免并发工作流在 git 层面交错执行。只读端点不取锁。
pub struct AppState {
    /// 环境配置
    pub config: EnvConfig,
    /// git 客户端
    pub git: GitClient,
    /// 工作流互斥锁
    pub workflow_lock: Mutex<()>,
}

impl AppState {
    pub fn new(config: EnvConfig) -> Self {
        let git = GitClient::from_config(&config);
        Self {
            config,
            git,
            workflow_lock: Mutex::new(()),
        }
    }
}
