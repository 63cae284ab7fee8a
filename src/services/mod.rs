//! 服务层
//!
//! git 客户端、推送/发布工作流与浏览器启动

pub mod browser;
pub mod git;
pub mod workflow;
