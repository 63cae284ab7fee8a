//! 基础设施层

pub mod command;

pub use command::{CommandOutput, CommandRunner};
