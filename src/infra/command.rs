//! 命令执行器
//!
//! 提供统一的外部命令执行接口：
//! - 显式参数列表调用（不经过 shell，杜绝注入）
//! - 超时控制（到期杀死进程）
//! - stdout/stderr 文本化捕获（无效字节替换而非报错）
//!
//! 所有失败（启动失败、超时、非零退出）都归一化为 `CommandOutput`，
//! 本模块对调用方永不返回 Err。

use std::path::Path;
use std::time::Duration;

use tokio::process::Command;
use tracing::error;

/// 命令执行结果
#[derive(Clone, Debug)]
pub struct CommandOutput {
    /// 退出码是否为 0
    pub success: bool,
    /// 标准输出（lossy 解码）
    pub stdout: String,
    /// 标准错误（lossy 解码）
    pub stderr: String,
    /// 退出码；启动失败或超时为 -1
    pub exit_code: i32,
}

impl CommandOutput {
    /// 未能得到进程退出状态时的归一化失败结果
    fn failure(stderr: String) -> Self {
        Self {
            success: false,
            stdout: String::new(),
            stderr,
            exit_code: -1,
        }
    }
}

/// 命令执行器
pub struct CommandRunner;

impl CommandRunner {
    /// 执行命令并等待完成
    ///
    /// # Arguments
    /// * `program` - 要执行的程序
    /// * `args` - 命令行参数（逐个传递，不做 shell 解释）
    /// * `work_dir` - 工作目录
    /// * `timeout` - 超时时间，到期后进程被杀死
    pub async fn run(
        program: &str,
        args: &[&str],
        work_dir: &Path,
        timeout: Duration,
    ) -> CommandOutput {
        let output = Command::new(program)
            .args(args)
            .current_dir(work_dir)
            .kill_on_drop(true)
            .output();

        match tokio::time::timeout(timeout, output).await {
            Ok(Ok(output)) => CommandOutput {
                success: output.status.success(),
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                exit_code: output.status.code().unwrap_or(-1),
            },
            Ok(Err(e)) => {
                error!(program = program, error = %e, "Failed to spawn command");
                CommandOutput::failure(format!("Failed to spawn {}: {}", program, e))
            }
            Err(_) => {
                // kill_on_drop 保证被丢弃的子进程随 future 一起终止
                error!(program = program, timeout_secs = timeout.as_secs(), "Command timed out");
                CommandOutput::failure(format!(
                    "Command timed out after {}s: {}",
                    timeout.as_secs(),
                    program
                ))
            }
        }
    }
}
