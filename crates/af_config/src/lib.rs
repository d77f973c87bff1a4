// crates/af_config/src/lib.rs

//! AeroFlow Config Layer
//!
//! 配置层，提供求解器配置结构与控制文件解析。
//! 本层所有数值使用 f64，可通过 serde 序列化（`validate`/`info`
//! 子命令以 JSON 形式输出配置）。
//!
//! # 模块概览
//!
//! - [`solver_config`]: SolverConfig 求解器配置（全 f64）
//! - [`types`]: 格式/插值/时间推进枚举
//! - [`parse`]: 固定顺序控制文件解析器
//! - [`error`]: 配置错误类型
//!
//! # 控制文件格式
//!
//! 每个非空、非 `#` 行为一条指令，顺序固定（见 [`parse`] 模块文档），
//! `~` 为缺省哨兵。未知的格式名、时间推进方式或时间精度为致命配置错误。

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod parse;
pub mod solver_config;
pub mod types;

pub use error::ConfigError;
pub use parse::parse_control_file;
pub use solver_config::{FreeStreamConfig, GasConfig, SolverConfig};
pub use types::{InterpolantKind, SchemeKind, TimeAccuracy, TimeStepping};
