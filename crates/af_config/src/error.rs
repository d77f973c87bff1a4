// crates/af_config/src/error.rs

//! 配置层错误类型

use thiserror::Error;

/// 配置错误
///
/// 所有变体都是致命的：应用层打印诊断消息后以非零码退出。
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO 错误
    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),

    /// 指令缺失（文件在预期指令前结束）
    #[error("缺失指令: 第 {position} 条 ({expected})")]
    MissingDirective {
        /// 指令序号（从 1 起）
        position: usize,
        /// 期望的指令名
        expected: &'static str,
    },

    /// 数值解析失败
    #[error("解析错误 '{directive}': 无法将 '{value}' 解析为数值")]
    ParseNumber {
        /// 指令名
        directive: &'static str,
        /// 原始文本
        value: String,
    },

    /// 未知枚举值
    #[error("未知的 {directive}: '{value}'")]
    UnknownEnum {
        /// 指令名
        directive: &'static str,
        /// 原始文本
        value: String,
    },

    /// 无效值
    #[error("无效值 '{directive}': {value} - {reason}")]
    InvalidValue {
        /// 指令名
        directive: &'static str,
        /// 配置值
        value: String,
        /// 原因
        reason: String,
    },
}
