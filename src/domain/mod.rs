//! 领域模型

pub mod repo;
pub mod workflow;
