//! 仓库查询 API
//!
//! 包含 /api/status, /api/info 端点（只读，不取工作流锁）

use std::sync::Arc;

use axum::{extract::State, response::Response, routing::get, Router};
use serde::Serialize;

use crate::domain::repo::RepoInfo;
use crate::state::AppState;

use super::json_utf8;

/// `git status` 原始输出响应
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub success: bool,
    pub output: String,
}

/// 仓库信息响应
#[derive(Debug, Serialize)]
pub struct InfoResponse {
    pub success: bool,
    pub data: RepoInfo,
}

/// 创建仓库查询路由
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/status", get(repo_status))
        .route("/api/info", get(repo_info))
}

/// 获取 git status 输出
///
/// GET /api/status
/// 成功时 output 为 stdout，失败时为 stderr
async fn repo_status(State(state): State<Arc<AppState>>) -> Response {
    let result = state.git.status().await;
    let output = if result.stdout.is_empty() {
        result.stderr
    } else {
        result.stdout
    };

    json_utf8(StatusResponse {
        success: result.success,
        output,
    })
}

/// 获取仓库信息
///
/// GET /api/info
/// 每次请求实时查询，子项失败各自降级
async fn repo_info(State(state): State<Arc<AppState>>) -> Response {
    let data = state.git.repo_info().await;
    json_utf8(InfoResponse {
        success: true,
        data,
    })
}
