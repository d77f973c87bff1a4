// crates/af_config/src/types.rs

//! 格式、插值与时间推进枚举
//!
//! 控制文件中的枚举指令统一在此定义。`FromStr` 实现即解析入口，
//! 未知值返回 [`ConfigError::UnknownEnum`]。

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 无粘通量格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemeKind {
    /// Van Leer 通量矢量分裂
    #[default]
    VanLeer,
    /// LDFSS(0)：Van Leer 分裂加压力修正
    Ldfss0,
}

impl FromStr for SchemeKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "van_leer" => Ok(Self::VanLeer),
            "ldfss0" => Ok(Self::Ldfss0),
            other => Err(ConfigError::UnknownEnum {
                directive: "scheme_name",
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for SchemeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::VanLeer => write!(f, "van_leer"),
            Self::Ldfss0 => write!(f, "ldfss0"),
        }
    }
}

/// 面重构插值方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterpolantKind {
    /// 一阶：左值取 i-1 单元、右值取 i 单元
    #[default]
    None,
    /// MUSCL 类限制重构（minmod 限制器）
    Muscl,
}

impl FromStr for InterpolantKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Self::None),
            "muscl" => Ok(Self::Muscl),
            other => Err(ConfigError::UnknownEnum {
                directive: "interpolant",
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for InterpolantKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Muscl => write!(f, "muscl"),
        }
    }
}

/// 时间步进方式
///
/// 控制文件中以单字符 `l`/`g` 表示；`g` 可在同一行携带可选的
/// 全局时间步长。非正的全局步长在求解器中回退为局部步长的全域最小值。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "mode", content = "dt")]
pub enum TimeStepping {
    /// 局部时间步长（每单元独立）
    Local,
    /// 全局时间步长（显式覆盖值，非正则回退为局部最小值广播）
    Global(f64),
}

impl Default for TimeStepping {
    fn default() -> Self {
        Self::Local
    }
}

impl fmt::Display for TimeStepping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local => write!(f, "local"),
            Self::Global(dt) => write!(f, "global({dt})"),
        }
    }
}

/// 时间精度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeAccuracy {
    /// 单级前向欧拉
    #[default]
    Euler,
    /// 经典四级 Runge-Kutta
    Rk4,
}

impl FromStr for TimeAccuracy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Self::Euler),
            "RK4" => Ok(Self::Rk4),
            other => Err(ConfigError::UnknownEnum {
                directive: "time_step_accuracy",
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for TimeAccuracy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Euler => write!(f, "none"),
            Self::Rk4 => write!(f, "RK4"),
        }
    }
}
