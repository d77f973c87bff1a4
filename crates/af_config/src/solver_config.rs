// crates/af_config/src/solver_config.rs

//! SolverConfig - 求解器配置（全 f64）
//!
//! 定义求解器的所有配置参数。数值字段统一使用 f64，
//! 结构可通过 serde 序列化，供 `validate`/`info` 子命令输出。

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::ConfigError;
use crate::types::{InterpolantKind, SchemeKind, TimeAccuracy, TimeStepping};

/// 气体热力学参数
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GasConfig {
    /// 比热比 γ
    pub gamma: f64,
    /// 气体常数 R [J/(kg·K)]
    pub r_gas: f64,
    /// 参考动力黏度 μ_ref [kg/(m·s)]，0 表示无粘
    pub mu_ref: f64,
    /// 参考温度 T_ref [K]
    pub t_ref: f64,
    /// Sutherland 常数 [K]
    pub sutherland_temp: f64,
    /// Prandtl 数
    pub prandtl: f64,
}

impl Default for GasConfig {
    fn default() -> Self {
        // 标准空气
        Self {
            gamma: 1.4,
            r_gas: 287.0,
            mu_ref: 0.0,
            t_ref: 288.15,
            sutherland_temp: 110.4,
            prandtl: 0.72,
        }
    }
}

/// 自由流参考状态
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FreeStreamConfig {
    /// 密度 ρ∞ [kg/m³]
    pub density: f64,
    /// x 方向速度 u∞ [m/s]
    pub x_speed: f64,
    /// y 方向速度 v∞ [m/s]
    pub y_speed: f64,
    /// 压力 p∞ [Pa]
    pub pressure: f64,
}

impl Default for FreeStreamConfig {
    fn default() -> Self {
        Self {
            density: 1.225,
            x_speed: 100.0,
            y_speed: 0.0,
            pressure: 101325.0,
        }
    }
}

/// 求解器配置（全 f64）
///
/// 字段顺序与控制文件指令顺序一致，便于对照。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverConfig {
    /// 无粘通量格式
    pub scheme: SchemeKind,
    /// 面重构插值方式
    pub interpolant: InterpolantKind,
    /// CFL 数
    pub cfl: f64,
    /// 时间步进方式
    pub time_stepping: TimeStepping,
    /// 时间精度
    pub time_accuracy: TimeAccuracy,
    /// 收敛容差（resnorm / resnorm_0 阈值）
    pub tolerance: f64,
    /// 网格文件路径
    pub grid_file: PathBuf,
    /// 浸入边界距离场文件（None 表示禁用）
    pub ib_file: Option<PathBuf>,
    /// 初始状态载入文件（None 表示自由流初始化）
    pub state_load_file: Option<PathBuf>,
    /// 最大迭代数
    pub max_iters: u64,
    /// 检查点间隔（0 表示从不写出）
    pub checkpoint_iter: u64,
    /// 调试级别（≥5 时记录 RK4 非物理状态）
    pub debug_level: u8,
    /// 气体参数
    pub gas: GasConfig,
    /// 自由流状态
    pub free_stream: FreeStreamConfig,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            scheme: SchemeKind::default(),
            interpolant: InterpolantKind::default(),
            cfl: 0.5,
            time_stepping: TimeStepping::default(),
            time_accuracy: TimeAccuracy::default(),
            tolerance: 1e-6,
            grid_file: PathBuf::from("grid.txt"),
            ib_file: None,
            state_load_file: None,
            max_iters: 1000,
            checkpoint_iter: 0,
            debug_level: 0,
            gas: GasConfig::default(),
            free_stream: FreeStreamConfig::default(),
        }
    }
}

impl SolverConfig {
    /// 校验配置的数值约束
    ///
    /// 枚举合法性在解析阶段已保证，这里只检查数值范围。
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn positive(directive: &'static str, value: f64) -> Result<(), ConfigError> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(ConfigError::InvalidValue {
                    directive,
                    value: value.to_string(),
                    reason: "必须为正的有限值".to_string(),
                })
            }
        }

        positive("CFL", self.cfl)?;
        positive("tolerance", self.tolerance)?;
        positive("R", self.gas.r_gas)?;
        positive("T_ref", self.gas.t_ref)?;
        positive("Pr", self.gas.prandtl)?;
        positive("density_inf", self.free_stream.density)?;
        positive("pressure_inf", self.free_stream.pressure)?;

        if !(self.gas.gamma.is_finite() && self.gas.gamma > 1.0) {
            return Err(ConfigError::InvalidValue {
                directive: "gamma",
                value: self.gas.gamma.to_string(),
                reason: "比热比必须大于 1".to_string(),
            });
        }
        if !(self.gas.mu_ref.is_finite() && self.gas.mu_ref >= 0.0) {
            return Err(ConfigError::InvalidValue {
                directive: "mu_ref",
                value: self.gas.mu_ref.to_string(),
                reason: "黏度不可为负".to_string(),
            });
        }
        if self.max_iters == 0 {
            return Err(ConfigError::InvalidValue {
                directive: "max_iters",
                value: "0".to_string(),
                reason: "至少迭代一步".to_string(),
            });
        }
        Ok(())
    }

    /// 是否包含黏性通量
    pub fn is_viscous(&self) -> bool {
        self.gas.mu_ref != 0.0
    }
}
