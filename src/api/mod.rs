//! API 模块
//!
//! HTTP handlers 和路由组装

pub mod page;
pub mod repo;
pub mod workflow;

use std::sync::Arc;

use axum::{
    extract::Request,
    http::{header, HeaderValue, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::state::AppState;

/// 构建完整的 API 路由
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        // 前端页面
        .route("/", get(page::index))
        // 仓库查询
        .merge(repo::router())
        // 推送 / 发布工作流
        .merge(workflow::router())
        // Middleware（最外层的 dispatch_gate 先于路由处理请求）
        .layer(CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE]))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(dispatch_gate))
        .with_state(state)
}

/// 请求分发守卫
///
/// - 任意路径的 OPTIONS 一律回 200 + 跨域响应头（axum 的
///   MethodRouter 对未注册方法会回 405，不满足网页端的预检约定）
/// - 路由表之外的方法按 404 处理，与路径不存在时一致
async fn dispatch_gate(req: Request, next: Next) -> Response {
    if req.method() == Method::OPTIONS {
        return preflight_ok();
    }

    let response = next.run(req).await;
    if response.status() == StatusCode::METHOD_NOT_ALLOWED {
        return StatusCode::NOT_FOUND.into_response();
    }
    response
}

/// CORS 预检响应：200、空 body、三个跨域响应头
fn preflight_ok() -> Response {
    (
        [
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
            (header::ACCESS_CONTROL_ALLOW_METHODS, "GET, POST, OPTIONS"),
            (header::ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type"),
        ],
        StatusCode::OK,
    )
        .into_response()
}

/// JSON 响应，显式带 charset 和跨域响应头
///
/// `axum::Json` 只写 `application/json`，网页端约定的
/// Content-Type 是 `application/json; charset=utf-8`。
/// 三个跨域响应头在每个 JSON 响应上都要出现；`CorsLayer`
/// 只在预检时附带 allow-methods / allow-headers，这里补齐。
pub(crate) fn json_utf8<T: Serialize>(value: T) -> Response {
    let mut response = Json(value).into_response();
    let headers = response.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json; charset=utf-8"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, POST, OPTIONS"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type"),
    );
    response
}
