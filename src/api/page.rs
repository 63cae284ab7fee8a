//! 前端页面
//!
//! GET / 原样返回工作目录下的网页工具文件

use std::io;
use std::sync::Arc;

use axum::{
    extract::State,
    response::{Html, IntoResponse, Response},
};

use crate::config::env::constants::FRONTEND_FILE;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// 返回前端 HTML 页面
///
/// GET /
/// 文件不存在时返回 404
pub async fn index(State(state): State<Arc<AppState>>) -> ApiResult<Response> {
    let path = state.config.work_dir.join(FRONTEND_FILE);
    match tokio::fs::read_to_string(&path).await {
        Ok(html) => Ok(Html(html).into_response()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Err(ApiError::not_found("HTML file")),
        Err(e) => Err(ApiError::internal(format!(
            "Failed to read {}: {}",
            FRONTEND_FILE, e
        ))),
    }
}
