// crates/af_physics/src/gas.rs

//! 气体模型
//!
//! 热力学参数在装配后不可变。黏性律采用 Sutherland 公式：
//!
//! ```text
//! μ(T) = μ_ref (T/T_ref)^{3/2} (T_ref + S)/(T + S)
//! ```

use af_config::GasConfig;

/// 气体模型
///
/// γ、R、黏性参考量与 Prandtl 数的不可变集合。
#[derive(Debug, Clone)]
pub struct GasModel {
    /// 比热比 γ
    pub gamma: f64,
    /// 气体常数 R [J/(kg·K)]
    pub r_gas: f64,
    /// 参考动力黏度 [kg/(m·s)]
    pub mu_ref: f64,
    /// 参考温度 [K]
    pub t_ref: f64,
    /// Sutherland 常数 [K]
    pub sutherland_temp: f64,
    /// Prandtl 数
    pub prandtl: f64,
}

impl GasModel {
    /// 从配置构造
    pub fn from_config(config: &GasConfig) -> Self {
        Self {
            gamma: config.gamma,
            r_gas: config.r_gas,
            mu_ref: config.mu_ref,
            t_ref: config.t_ref,
            sutherland_temp: config.sutherland_temp,
            prandtl: config.prandtl,
        }
    }

    /// 声速 a = √(γp/ρ)
    #[inline]
    pub fn sound_speed(&self, density: f64, pressure: f64) -> f64 {
        (self.gamma * pressure / density).sqrt()
    }

    /// 温度 T = p/(ρR)
    #[inline]
    pub fn temperature(&self, density: f64, pressure: f64) -> f64 {
        pressure / (density * self.r_gas)
    }

    /// Sutherland 黏性律 μ(T)
    #[inline]
    pub fn viscosity(&self, temperature: f64) -> f64 {
        let ratio = temperature / self.t_ref;
        self.mu_ref
            * ratio.powf(1.5)
            * (self.t_ref + self.sutherland_temp)
            / (temperature + self.sutherland_temp)
    }

    /// 定压比热 cp = γR/(γ-1)
    #[inline]
    pub fn cp(&self) -> f64 {
        self.gamma * self.r_gas / (self.gamma - 1.0)
    }

    /// 导热系数 k = μ cp / Pr
    #[inline]
    pub fn conductivity(&self, viscosity: f64) -> f64 {
        viscosity * self.cp() / self.prandtl
    }
}
