//! 推送 / 发布工作流
//!
//! 两条固定的线性命令序列。每个步骤恰好产生一条日志（成功、
//! 警告或致命错误），首个致命步骤处短路，已产生的日志全部
//! 随响应返回。

use serde::Serialize;
use tracing::info;

use crate::domain::workflow::{StepLog, StepLogEntry, Version};
use crate::services::git::GitClient;

/// 推送时的默认提交信息
const DEFAULT_PUSH_MESSAGE: &str = "更新应用代码";

/// 工作流执行报告
#[derive(Debug, Serialize)]
pub struct WorkflowReport {
    pub success: bool,
    pub logs: Vec<StepLogEntry>,
    /// 可在浏览器打开的仓库地址（仅成功时返回）
    #[serde(rename = "repoUrl", skip_serializing_if = "Option::is_none")]
    pub repo_url: Option<String>,
    /// 归一化后的版本号（仅发布工作流成功时返回）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl WorkflowReport {
    fn failed(log: StepLog) -> Self {
        Self {
            success: false,
            logs: log.into_entries(),
            repo_url: None,
            version: None,
        }
    }

    fn succeeded(log: StepLog, repo_url: String, version: Option<String>) -> Self {
        Self {
            success: true,
            logs: log.into_entries(),
            repo_url: Some(repo_url),
            version,
        }
    }
}

/// 推送工作流
///
/// 暂存 -> 提交 -> 推送当前分支 -> 提示 CI 已触发。
/// "nothing to commit" 是非致命警告，工作流继续。
pub async fn push(git: &GitClient, message: Option<String>) -> WorkflowReport {
    let message = non_empty(message).unwrap_or_else(|| DEFAULT_PUSH_MESSAGE.to_string());
    let mut log = StepLog::new();

    // 步骤 1: 暂存全部更改
    let add = git.add_all().await;
    if !add.success {
        log.error(format!("添加失败: {}", add.stderr));
        return WorkflowReport::failed(log);
    }
    log.success("添加完成");

    // 步骤 2: 提交
    let log = match commit_step(git, &message, log).await {
        Ok(log) => log,
        Err(log) => return WorkflowReport::failed(log),
    };

    // 步骤 3: 推送当前分支
    let mut log = match push_branch_step(git, log).await {
        Ok(log) => log,
        Err(log) => return WorkflowReport::failed(log),
    };

    // 步骤 4: CI 触发提示（假定而非验证）
    log.success("GitHub Actions 已自动触发构建");

    let repo_url = git.repo_url().await;
    info!("Push workflow completed");
    WorkflowReport::succeeded(log, repo_url, None)
}

/// 发布工作流
///
/// 版本号须已通过校验；暂存 -> 提交 -> 推送分支 -> 打标签
/// （已存在视为警告）-> 推送标签。
pub async fn release(git: &GitClient, version: Version, message: Option<String>) -> WorkflowReport {
    let message = non_empty(message).unwrap_or_else(|| format!("发布版本 {}", version.tag()));
    let mut log = StepLog::new();

    // 步骤 1: 暂存全部更改
    let add = git.add_all().await;
    if !add.success {
        log.error(format!("添加失败: {}", add.stderr));
        return WorkflowReport::failed(log);
    }
    log.success("添加完成");

    // 步骤 2: 提交（与推送工作流同一套判定）
    let log = match commit_step(git, &message, log).await {
        Ok(log) => log,
        Err(log) => return WorkflowReport::failed(log),
    };

    // 步骤 3: 推送当前分支
    let mut log = match push_branch_step(git, log).await {
        Ok(log) => log,
        Err(log) => return WorkflowReport::failed(log),
    };

    // 步骤 4: 创建标签（已存在不致命）
    let tag = git.tag(version.tag()).await;
    if tag.success {
        log.success(format!("标签 {} 创建完成", version.tag()));
    } else {
        log.warning("标签可能已存在");
    }

    // 步骤 5: 推送标签
    let push_tag = git.push(version.tag()).await;
    if !push_tag.success {
        log.error(format!("推送标签失败: {}", push_tag.stderr));
        return WorkflowReport::failed(log);
    }
    log.success("标签推送完成");

    let repo_url = git.repo_url().await;
    info!(version = version.tag(), "Release workflow completed");
    WorkflowReport::succeeded(log, repo_url, Some(version.into_tag()))
}

/// 提交步骤
///
/// "nothing to commit" 记为警告并继续；其它失败为致命错误。
async fn commit_step(git: &GitClient, message: &str, mut log: StepLog) -> Result<StepLog, StepLog> {
    let commit = git.commit(message).await;
    if commit.stdout.contains("nothing to commit") {
        log.warning("没有需要提交的更改");
    } else if !commit.success {
        log.error(format!("提交失败: {}", commit.stderr));
        return Err(log);
    } else {
        log.success("提交完成");
    }
    Ok(log)
}

/// 读取当前分支并推送到远程同名分支；任一失败都是致命错误
async fn push_branch_step(git: &GitClient, mut log: StepLog) -> Result<StepLog, StepLog> {
    let Some(branch) = git.current_branch().await else {
        log.error("推送失败: 无法获取当前分支");
        return Err(log);
    };

    let push = git.push(&branch).await;
    if !push.success {
        log.error(format!("推送失败: {}", push.stderr));
        return Err(log);
    }
    log.success("推送完成");
    Ok(log)
}

/// 过滤掉 None 与纯空白的调用方输入
fn non_empty(message: Option<String>) -> Option<String> {
    message.filter(|m| !m.trim().is_empty())
}

#[cfg(test)]
#[cfg(unix)]
mod tests {
    use super::*;
    use crate::domain::workflow::LogType;
    use std::os::unix::fs::PermissionsExt;
    use std::time::Duration;
    use tempfile::TempDir;

    /// 写一个模拟 git 行为的脚本作为 git 可执行文件
    fn fake_git(dir: &TempDir, body: &str) -> GitClient {
        let script = dir.path().join("fake-git");
        std::fs::write(&script, format!("#!/bin/sh\n{}\n", body)).unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
        GitClient::new(
            script.to_string_lossy().into_owned(),
            dir.path().to_path_buf(),
            Duration::from_secs(5),
        )
    }

    /// 全部子命令成功的基准脚本
    const HAPPY_SCRIPT: &str = r#"
case "$1" in
  commit) echo "[main abc1234] test commit" ;;
  branch) echo "main" ;;
  remote) echo "git@github.com:alice/proj.git" ;;
esac
exit 0
"#;

    fn types(report: &WorkflowReport) -> Vec<LogType> {
        report.logs.iter().map(|e| e.log_type).collect()
    }

    #[tokio::test]
    async fn test_push_happy_path() {
        let dir = TempDir::new().unwrap();
        let git = fake_git(&dir, HAPPY_SCRIPT);

        let report = push(&git, Some("更新首页".to_string())).await;
        assert!(report.success);
        assert_eq!(
            types(&report),
            vec![LogType::Success, LogType::Success, LogType::Success, LogType::Success]
        );
        let steps: Vec<u32> = report.logs.iter().map(|e| e.step).collect();
        assert_eq!(steps, vec![1, 2, 3, 4]);
        assert_eq!(
            report.repo_url.as_deref(),
            Some("https://github.com/alice/proj")
        );
        assert!(report.version.is_none());
    }

    #[tokio::test]
    async fn test_push_blank_message_falls_back_to_default() {
        let dir = TempDir::new().unwrap();
        // 脚本把提交信息写进工作目录，便于断言实际传给 git 的参数
        let git = fake_git(
            &dir,
            r#"
case "$1" in
  commit) printf '%s' "$3" > commit-message.txt; echo "[main abc1234] test commit" ;;
  branch) echo "main" ;;
  remote) echo "git@github.com:alice/proj.git" ;;
esac
exit 0
"#,
        );

        let report = push(&git, Some("   ".to_string())).await;
        assert!(report.success);
        let recorded = std::fs::read_to_string(dir.path().join("commit-message.txt")).unwrap();
        assert_eq!(recorded, DEFAULT_PUSH_MESSAGE);

        let report = push(&git, Some(String::new())).await;
        assert!(report.success);
        let recorded = std::fs::read_to_string(dir.path().join("commit-message.txt")).unwrap();
        assert_eq!(recorded, DEFAULT_PUSH_MESSAGE);
    }

    #[tokio::test]
    async fn test_push_nothing_to_commit_is_warning() {
        let dir = TempDir::new().unwrap();
        let git = fake_git(
            &dir,
            r#"
case "$1" in
  commit) echo "nothing to commit, working tree clean"; exit 1 ;;
  branch) echo "main" ;;
  remote) echo "git@github.com:alice/proj.git" ;;
esac
exit 0
"#,
        );

        let report = push(&git, None).await;
        assert!(report.success);
        assert_eq!(report.logs[1].log_type, LogType::Warning);
        assert_eq!(report.logs[1].step, 2);
    }

    #[tokio::test]
    async fn test_push_failure_short_circuits() {
        let dir = TempDir::new().unwrap();
        let git = fake_git(
            &dir,
            r#"
case "$1" in
  commit) echo "[main abc1234] test commit" ;;
  branch) echo "main" ;;
  push) echo "error: failed to push some refs" >&2; exit 1 ;;
esac
exit 0
"#,
        );

        let report = push(&git, None).await;
        assert!(!report.success);
        assert_eq!(report.logs.len(), 3);
        let last = report.logs.last().unwrap();
        assert_eq!(last.log_type, LogType::Error);
        assert_eq!(last.step, 3);
        assert!(last.message.contains("推送失败"));
        assert!(report.repo_url.is_none());
    }

    #[tokio::test]
    async fn test_push_commit_failure_is_fatal() {
        let dir = TempDir::new().unwrap();
        let git = fake_git(
            &dir,
            r#"
case "$1" in
  commit) echo "fatal: unable to commit" >&2; exit 128 ;;
esac
exit 0
"#,
        );

        let report = push(&git, None).await;
        assert!(!report.success);
        assert_eq!(report.logs.len(), 2);
        assert_eq!(report.logs[1].log_type, LogType::Error);
        assert!(report.logs[1].message.contains("提交失败"));
    }

    #[tokio::test]
    async fn test_release_happy_path_normalizes_version() {
        let dir = TempDir::new().unwrap();
        let git = fake_git(&dir, HAPPY_SCRIPT);

        let version = Version::parse("1.2.3").unwrap();
        let report = release(&git, version, None).await;
        assert!(report.success);
        assert_eq!(report.version.as_deref(), Some("v1.2.3"));
        assert_eq!(report.logs.len(), 5);
        let steps: Vec<u32> = report.logs.iter().map(|e| e.step).collect();
        assert_eq!(steps, vec![1, 2, 3, 4, 5]);
        assert_eq!(
            report.repo_url.as_deref(),
            Some("https://github.com/alice/proj")
        );
    }

    #[tokio::test]
    async fn test_release_existing_tag_is_warning() {
        let dir = TempDir::new().unwrap();
        let git = fake_git(
            &dir,
            r#"
case "$1" in
  commit) echo "[main abc1234] test commit" ;;
  branch) echo "main" ;;
  remote) echo "git@github.com:alice/proj.git" ;;
  tag) echo "fatal: tag 'v1.2.3' already exists" >&2; exit 128 ;;
esac
exit 0
"#,
        );

        let version = Version::parse("v1.2.3").unwrap();
        let report = release(&git, version, None).await;
        assert!(report.success);
        assert_eq!(report.logs[3].log_type, LogType::Warning);
        assert_eq!(report.logs[4].log_type, LogType::Success);
    }

    #[tokio::test]
    async fn test_release_tag_push_failure_is_fatal() {
        let dir = TempDir::new().unwrap();
        let git = fake_git(
            &dir,
            r#"
case "$1" in
  commit) echo "[main abc1234] test commit" ;;
  branch) echo "main" ;;
  push)
    # 推分支成功，推标签失败
    case "$3" in
      v*) echo "error: tag rejected" >&2; exit 1 ;;
    esac
    ;;
esac
exit 0
"#,
        );

        let version = Version::parse("2.0.0").unwrap();
        let report = release(&git, version, Some("发布".to_string())).await;
        assert!(!report.success);
        assert_eq!(report.logs.len(), 5);
        let last = report.logs.last().unwrap();
        assert_eq!(last.log_type, LogType::Error);
        assert!(last.message.contains("推送标签失败"));
    }
}
