// crates/af_foundation/src/error.rs

//! 基础错误类型
//!
//! 定义整个项目的基础错误类型，仅包含与基础设施相关的错误。
//! 高层错误（配置、网格、求解器）在各自 crate 中定义，
//! 并在应用层统一转换为诊断消息后终止进程。
//!
//! # 错误分层
//!
//! ```text
//! 求解器错误 (af_physics::SolverError)
//!        ↓ (转换)
//! IO 错误 (af_io::IoError) / 配置错误 (af_config::ConfigError)
//!        ↓ (转换)
//! 基础错误 ← 你在这里 (af_foundation::AfError)
//! ```

use thiserror::Error;

/// 基础错误类型
///
/// 覆盖错误分类中的底层类别：IO、分配、数值。
/// 配置错误在 `af_config` 中细化，此处仅保留兜底变体。
#[derive(Debug, Error)]
pub enum AfError {
    /// IO 错误
    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),

    /// 分配错误（数组维度非法或尺寸溢出）
    #[error("分配错误: {context} (imx={imx}, jmx={jmx})")]
    Allocation {
        /// 失败位置说明
        context: String,
        /// 请求的 i 方向尺寸
        imx: usize,
        /// 请求的 j 方向尺寸
        jmx: usize,
    },

    /// 数值错误（非物理状态）
    #[error("数值错误 [{module}::{routine}]: {message}")]
    Numerical {
        /// 检测到错误的模块
        module: &'static str,
        /// 检测到错误的子程序
        routine: &'static str,
        /// 诊断消息
        message: String,
    },

    /// 内部错误（不应出现的状态）
    #[error("内部错误: {0}")]
    Internal(String),
}

impl AfError {
    /// 构造数值错误
    pub fn numerical(
        module: &'static str,
        routine: &'static str,
        message: impl Into<String>,
    ) -> Self {
        Self::Numerical {
            module,
            routine,
            message: message.into(),
        }
    }

    /// 构造分配错误
    pub fn allocation(context: impl Into<String>, imx: usize, jmx: usize) -> Self {
        Self::Allocation {
            context: context.into(),
            imx,
            jmx,
        }
    }
}

/// 基础错误结果别名
pub type AfResult<T> = Result<T, AfError>;
