//! Git 客户端
//!
//! 把固定的 git 命令面封装成带类型的方法，并提供仓库信息查询。
//! 所有调用都走显式参数列表，提交信息、版本号等用户输入
//! 作为单个不透明参数传递。

use std::path::PathBuf;
use std::time::Duration;

use crate::config::env::{constants, EnvConfig};
use crate::domain::repo::{count_changes, derive_repo_url, RepoInfo};
use crate::infra::{CommandOutput, CommandRunner};

/// Git 客户端
///
/// git 可执行文件路径与工作目录都来自配置。
#[derive(Clone, Debug)]
pub struct GitClient {
    git_path: String,
    work_dir: PathBuf,
    timeout: Duration,
}

impl GitClient {
    pub fn new(git_path: impl Into<String>, work_dir: PathBuf, timeout: Duration) -> Self {
        Self {
            git_path: git_path.into(),
            work_dir,
            timeout,
        }
    }

    pub fn from_config(config: &EnvConfig) -> Self {
        Self::new(
            config.git_path.clone(),
            config.work_dir.clone(),
            Duration::from_secs(constants::GIT_TIMEOUT_SECS),
        )
    }

    /// 执行一条 git 子命令
    pub async fn run(&self, args: &[&str]) -> CommandOutput {
        CommandRunner::run(&self.git_path, args, &self.work_dir, self.timeout).await
    }

    /// `git add .`
    pub async fn add_all(&self) -> CommandOutput {
        self.run(&["add", "."]).await
    }

    /// `git commit -m <message>`
    pub async fn commit(&self, message: &str) -> CommandOutput {
        self.run(&["commit", "-m", message]).await
    }

    /// `git push origin <ref>`（分支或标签）
    pub async fn push(&self, reference: &str) -> CommandOutput {
        self.run(&["push", "origin", reference]).await
    }

    /// `git tag <name>`
    pub async fn tag(&self, name: &str) -> CommandOutput {
        self.run(&["tag", name]).await
    }

    /// `git status`（人类可读的完整输出）
    pub async fn status(&self) -> CommandOutput {
        self.run(&["status"]).await
    }

    /// 当前分支名
    ///
    /// 命令失败或输出为空（如 detached HEAD）时返回 None。
    pub async fn current_branch(&self) -> Option<String> {
        let result = self.run(&["branch", "--show-current"]).await;
        if !result.success {
            return None;
        }
        let branch = result.stdout.trim();
        if branch.is_empty() {
            None
        } else {
            Some(branch.to_string())
        }
    }

    /// origin 远程地址；未配置或查询失败时返回 None
    pub async fn remote_url(&self) -> Option<String> {
        let result = self.run(&["remote", "get-url", "origin"]).await;
        if !result.success {
            return None;
        }
        let url = result.stdout.trim();
        if url.is_empty() {
            None
        } else {
            Some(url.to_string())
        }
    }

    /// 可在浏览器打开的仓库地址；无远程时为空字符串
    pub async fn repo_url(&self) -> String {
        match self.remote_url().await {
            Some(url) => derive_repo_url(&url),
            None => String::new(),
        }
    }

    /// 查询仓库信息
    ///
    /// 四个子查询相互独立地容忍失败：分支查不到记为 "unknown"，
    /// 远程查不到记为空，更改数取 porcelain 输出的非空行数。
    pub async fn repo_info(&self) -> RepoInfo {
        let branch = self
            .current_branch()
            .await
            .unwrap_or_else(|| "unknown".to_string());

        let remote_url = self.remote_url().await.unwrap_or_default();

        let status = self.run(&["status", "--porcelain"]).await;
        let change_count = count_changes(&status.stdout);

        let project_name = self
            .work_dir
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "unknown".to_string());

        RepoInfo {
            project_name,
            branch,
            repo_url: derive_repo_url(&remote_url),
            has_remote: !remote_url.is_empty(),
            remote_url,
            change_count,
        }
    }
}

#[cfg(test)]
#[cfg(unix)]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
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

    const INSPECT_SCRIPT: &str = r#"
case "$1" in
  branch) echo "main" ;;
  remote) echo "git@github.com:alice/proj.git" ;;
  status) printf ' M src/lib.rs\n?? notes.txt\n' ;;
esac
exit 0
"#;

    #[tokio::test]
    async fn test_repo_info_happy_path() {
        let dir = TempDir::new().unwrap();
        let git = fake_git(&dir, INSPECT_SCRIPT);

        let info = git.repo_info().await;
        assert_eq!(info.branch, "main");
        assert_eq!(info.remote_url, "git@github.com:alice/proj.git");
        assert_eq!(info.repo_url, "https://github.com/alice/proj");
        assert_eq!(info.change_count, 2);
        assert!(info.has_remote);
        assert_eq!(
            info.project_name,
            dir.path().file_name().unwrap().to_string_lossy()
        );
    }

    #[tokio::test]
    async fn test_repo_info_tolerates_failures() {
        let dir = TempDir::new().unwrap();
        // 所有子命令都失败
        let git = fake_git(&dir, "exit 128");

        let info = git.repo_info().await;
        assert_eq!(info.branch, "unknown");
        assert_eq!(info.remote_url, "");
        assert_eq!(info.repo_url, "");
        assert_eq!(info.change_count, 0);
        assert!(!info.has_remote);
    }

    #[tokio::test]
    async fn test_current_branch_empty_output_is_none() {
        let dir = TempDir::new().unwrap();
        // detached HEAD：命令成功但无输出
        let git = fake_git(&dir, "exit 0");
        assert_eq!(git.current_branch().await, None);
    }
}
