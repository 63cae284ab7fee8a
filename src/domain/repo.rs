//! 仓库信息领域模型

use serde::Serialize;

/// 仓库信息
///
/// 每次 `/api/info` 请求都重新查询，不做缓存
/// （数据源是 git 的实时状态）。
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepoInfo {
    /// 项目名称（工作目录的基名）
    pub project_name: String,
    /// 当前分支；查询失败时为 "unknown"
    pub branch: String,
    /// origin 远程地址；查询失败时为空
    pub remote_url: String,
    /// 可在浏览器打开的仓库地址（由 remote_url 推导）
    pub repo_url: String,
    /// 未提交更改数量
    pub change_count: usize,
    /// 是否配置了远程仓库
    pub has_remote: bool,
}

/// 由远程地址推导浏览器可访问的仓库 URL
///
/// - 去掉结尾的 `.git` 后缀
/// - `git@github.com:owner/repo` 形式改写为 `https://github.com/owner/repo`
/// - 其它形式仅去掉后缀原样返回
pub fn derive_repo_url(remote_url: &str) -> String {
    let trimmed = remote_url.strip_suffix(".git").unwrap_or(remote_url);
    match trimmed.strip_prefix("git@github.com:") {
        Some(path) => format!("https://github.com/{}", path),
        None => trimmed.to_string(),
    }
}

/// 统计 `git status --porcelain` 输出中的非空行数
pub fn count_changes(porcelain_output: &str) -> usize {
    porcelain_output
        .lines()
        .filter(|line| !line.trim().is_empty())
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_repo_url_ssh_github() {
        assert_eq!(
            derive_repo_url("git@github.com:alice/proj.git"),
            "https://github.com/alice/proj"
        );
    }

    #[test]
    fn test_derive_repo_url_https() {
        assert_eq!(
            derive_repo_url("https://github.com/alice/proj.git"),
            "https://github.com/alice/proj"
        );
    }

    #[test]
    fn test_derive_repo_url_only_trailing_suffix_stripped() {
        // ".git" 出现在中间时不能被误删
        assert_eq!(
            derive_repo_url("https://example.com/a.git.mirror/repo.git"),
            "https://example.com/a.git.mirror/repo"
        );
    }

    #[test]
    fn test_derive_repo_url_other_remote_passthrough() {
        assert_eq!(
            derive_repo_url("ssh://git.internal/team/repo"),
            "ssh://git.internal/team/repo"
        );
    }

    #[test]
    fn test_derive_repo_url_empty() {
        assert_eq!(derive_repo_url(""), "");
    }

    #[test]
    fn test_count_changes() {
        assert_eq!(count_changes(""), 0);
        assert_eq!(count_changes("\n"), 0);
        assert_eq!(count_changes(" M src/lib.rs\n?? notes.txt\n"), 2);
        assert_eq!(count_changes(" M a.txt\n\n?? b.txt"), 2);
    }
}
