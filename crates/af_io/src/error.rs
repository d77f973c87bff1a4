// crates/af_io/src/error.rs

//! IO 层错误类型

use thiserror::Error;

/// IO 错误
#[derive(Debug, Error)]
pub enum IoError {
    /// 底层 IO 错误
    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),

    /// 格式错误
    #[error("格式错误 [{file}]: {message}")]
    Format {
        /// 文件名
        file: String,
        /// 说明
        message: String,
    },

    /// 维度不符
    #[error("维度不符 [{file}]: 期望 {expected}, 实际 {found}")]
    Dimension {
        /// 文件名
        file: String,
        /// 期望项数
        expected: usize,
        /// 实际项数
        found: usize,
    },
}

impl IoError {
    /// 构造格式错误
    pub fn format(file: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Format {
            file: file.into(),
            message: message.into(),
        }
    }
}

/// IO 结果别名
pub type IoResult<T> = Result<T, IoError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_error_display() {
        let err = IoError::format("grid.txt", "缺少维度行");
        assert!(err.to_string().contains("grid.txt"));
    }
}
