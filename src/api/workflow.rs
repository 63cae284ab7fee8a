//! 工作流 API
//!
//! 包含 /api/push, /api/release 端点
//!
//! 注意：实际的命令编排在 services/workflow 模块中，
//! 此处只负责请求解析、版本号校验和工作流锁。

use std::sync::Arc;

use axum::{body::Bytes, extract::State, response::Response, routing::post, Router};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::workflow::Version;
use crate::services;
use crate::state::AppState;

use super::json_utf8;

/// 推送请求
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PushRequest {
    /// 提交信息；缺省时使用固定占位信息
    pub message: Option<String>,
}

/// 发布请求
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReleaseRequest {
    /// 版本号，须匹配 `v?X.Y.Z`
    #[serde(default)]
    pub version: String,
    /// 提交信息；缺省为 "发布版本 <version>"
    pub message: Option<String>,
}

/// 版本号校验失败响应
#[derive(Debug, Serialize)]
struct ValidationFailure {
    success: bool,
    message: String,
}

/// 创建工作流路由
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/push", post(run_push))
        .route("/api/release", post(run_release))
}

/// 解析 JSON 请求体
///
/// 解析失败降级为空对象而不是拒绝请求（网页端约定）。
fn lenient_json<T: Default + for<'de> Deserialize<'de>>(body: &Bytes) -> T {
    serde_json::from_slice(body).unwrap_or_else(|e| {
        warn!(error = %e, "Malformed request body, treating as empty object");
        T::default()
    })
}

/// 执行推送工作流
///
/// POST /api/push  body: {"message"?: string}
async fn run_push(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    let request: PushRequest = lenient_json(&body);

    // 工作流之间串行执行，并发请求在此排队
    let _guard = state.workflow_lock.lock().await;
    let report = services::workflow::push(&state.git, request.message).await;
    json_utf8(report)
}

/// 执行发布工作流
///
/// POST /api/release  body: {"version": string, "message"?: string}
/// 版本号不合法时直接返回失败，不执行任何 git 命令
async fn run_release(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    let request: ReleaseRequest = lenient_json(&body);

    let version = match Version::parse(&request.version) {
        Ok(version) => version,
        Err(e) => {
            return json_utf8(ValidationFailure {
                success: false,
                message: e.to_string(),
            });
        }
    };

    let _guard = state.workflow_lock.lock().await;
    let report = services::workflow::release(&state.git, version, request.message).await;
    json_utf8(report)
}
