//! 环境变量配置加载

use std::env;
use std::path::PathBuf;

/// 环境配置
///
/// "当前项目" 即工作目录是显式配置值，由这里统一加载后
/// 注入到各组件，而不是模块级常量。
#[derive(Clone, Debug)]
pub struct EnvConfig {
    /// 服务监听端口
    pub port: u16,
    /// git 仓库工作目录
    pub work_dir: PathBuf,
    /// git 可执行文件路径
    pub git_path: String,
    /// 启动时是否自动打开浏览器
    pub open_browser: bool,
}

impl EnvConfig {
    /// 从环境变量加载配置
    pub fn from_env() -> Self {
        let port = env::var("PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(constants::DEFAULT_PORT);

        // 默认以进程当前目录作为仓库根目录
        let work_dir = env::var("WORK_DIR")
            .map(PathBuf::from)
            .or_else(|_| env::current_dir())
            .unwrap_or_else(|_| PathBuf::from("."));

        let git_path = env::var("GIT_PATH").unwrap_or_else(|_| "git".to_string());

        let open_browser = env::var("OPEN_BROWSER")
            .ok()
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(true);

        Self {
            port,
            work_dir,
            git_path,
            open_browser,
        }
    }
}

/// 常量
pub mod constants {
    /// 默认监听端口
    pub const DEFAULT_PORT: u16 = 8765;

    /// 单条 git 命令超时（秒）
    pub const GIT_TIMEOUT_SECS: u64 = 300;

    /// 前端页面文件名（从工作目录读取）
    pub const FRONTEND_FILE: &str = "git-push-tool.html";

    /// 版本号
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
}
