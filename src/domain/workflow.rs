//! 工作流领域模型
//!
//! 步骤日志与版本号校验。

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

/// 步骤日志级别
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogType {
    Info,
    Success,
    Warning,
    Error,
}

/// 单条步骤日志
#[derive(Clone, Debug, Serialize)]
pub struct StepLogEntry {
    /// 步骤编号（同一次工作流内从 1 开始严格递增）
    pub step: u32,
    /// 面向用户的提示信息
    pub message: String,
    /// 日志级别
    #[serde(rename = "type")]
    pub log_type: LogType,
}

/// 步骤日志序列
///
/// 不变量：编号从 1 开始、严格递增、无空洞；`error` 条目一旦出现
/// 即为最后一条（工作流在首个致命步骤处短路）。编号由容器自动分配，
/// 调用方无法写出违反不变量的序列。
#[derive(Debug, Default)]
pub struct StepLog {
    entries: Vec<StepLogEntry>,
}

impl StepLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, log_type: LogType, message: impl Into<String>) {
        let step = self.entries.len() as u32 + 1;
        self.entries.push(StepLogEntry {
            step,
            message: message.into(),
            log_type,
        });
    }

    /// 步骤成功
    pub fn success(&mut self, message: impl Into<String>) {
        self.push(LogType::Success, message);
    }

    /// 步骤出现非致命问题，工作流继续
    pub fn warning(&mut self, message: impl Into<String>) {
        self.push(LogType::Warning, message);
    }

    /// 步骤致命失败，必须是最后一条
    pub fn error(&mut self, message: impl Into<String>) {
        self.push(LogType::Error, message);
    }

    pub fn into_entries(self) -> Vec<StepLogEntry> {
        self.entries
    }
}

/// 校验通过并归一化后的版本号（保证以 "v" 开头）
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Version(String);

/// 版本号格式错误
#[derive(Debug, thiserror::Error)]
#[error("版本号格式不正确，请使用格式如: v1.0.0")]
pub struct InvalidVersion;

static VERSION_RE: OnceLock<Regex> = OnceLock::new();

fn version_re() -> &'static Regex {
    VERSION_RE.get_or_init(|| Regex::new(r"^v?\d+\.\d+\.\d+$").expect("valid version regex"))
}

impl Version {
    /// 解析版本号
    ///
    /// 必须匹配 `^v?\d+\.\d+\.\d+$`；无 "v" 前缀时自动补上。
    pub fn parse(input: &str) -> Result<Self, InvalidVersion> {
        if !version_re().is_match(input) {
            return Err(InvalidVersion);
        }
        let tag = if input.starts_with('v') {
            input.to_string()
        } else {
            format!("v{}", input)
        };
        Ok(Self(tag))
    }

    /// 用作 git 标签名的完整版本号
    pub fn tag(&self) -> &str {
        &self.0
    }

    pub fn into_tag(self) -> String {
        self.0
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
