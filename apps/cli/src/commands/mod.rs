//! CLI 命令模块

pub mod check;
pub mod run;

pub use check::CheckCommand;
pub use run::RunCommand;
