// crates/af_physics/src/schemes/van_leer.rs

//! Van Leer 通量矢量分裂
//!
//! 对每个面：以平均声速归一化的垂直马赫数 M⊥，经超/亚音速开关
//! 分裂出对流系数 c± 与压力系数 𝒟±，再装配质量、动量与滞止焓通量。
//!
//! 亚音速分裂（|M⊥| < 1）：
//!
//! ```text
//! c⁺ = ¼(M_L + 1)²        𝒟⁺ = ¼(M_L + 1)²(2 − M_L)
//! c⁻ = −¼(M_R − 1)²       𝒟⁻ = ¼(M_R − 1)²(2 + M_R)
//! ```
//!
//! 超音速时退化为纯迎风：c± = α± M，𝒟± = α±。

use super::{FluxBuffers, FluxScheme};
use crate::field::Prim;
use crate::mesh::MeshMetrics;
use crate::reconstruction::FaceStates;

/// 分裂系数
///
/// LDFSS(0) 在装配前修正其中的 c±，其余字段共享。
#[derive(Debug, Clone, Copy)]
pub(crate) struct SplitCoefficients {
    /// 面平均声速
    pub a_avg: f64,
    /// 左侧垂直马赫数
    pub m_left: f64,
    /// 右侧垂直马赫数
    pub m_right: f64,
    /// 左侧亚音速开关（|M| < 1 时为 1）
    pub beta_left: f64,
    /// 右侧亚音速开关
    pub beta_right: f64,
    /// 对流系数 c⁺
    pub c_plus: f64,
    /// 对流系数 c⁻
    pub c_minus: f64,
    /// 压力系数 𝒟⁺
    pub d_plus: f64,
    /// 压力系数 𝒟⁻
    pub d_minus: f64,
}

/// 计算 Van Leer 分裂系数
pub(crate) fn split(left: Prim, right: Prim, nx: f64, ny: f64, gamma: f64) -> SplitCoefficients {
    let a_avg = 0.5 * (left.sound_speed(gamma) + right.sound_speed(gamma));
    let m_left = left.normal_speed(nx, ny) / a_avg;
    let m_right = right.normal_speed(nx, ny) / a_avg;

    // 超音速开关：α⁺ 选中右行超音速，α⁻ 选中左行超音速
    let alpha_plus = 0.5 * (1.0 + m_left.signum());
    let alpha_minus = 0.5 * (1.0 - m_right.signum());
    let beta_left = if m_left.abs() < 1.0 { 1.0 } else { 0.0 };
    let beta_right = if m_right.abs() < 1.0 { 1.0 } else { 0.0 };

    let m_plus = 0.25 * (m_left + 1.0).powi(2);
    let m_minus = -0.25 * (m_right - 1.0).powi(2);
    let d_plus_sub = 0.25 * (m_left + 1.0).powi(2) * (2.0 - m_left);
    let d_minus_sub = 0.25 * (m_right - 1.0).powi(2) * (2.0 + m_right);

    SplitCoefficients {
        a_avg,
        m_left,
        m_right,
        beta_left,
        beta_right,
        c_plus: alpha_plus * (1.0 - beta_left) * m_left + beta_left * m_plus,
        c_minus: alpha_minus * (1.0 - beta_right) * m_right + beta_right * m_minus,
        d_plus: alpha_plus * (1.0 - beta_left) + beta_left * d_plus_sub,
        d_minus: alpha_minus * (1.0 - beta_right) + beta_right * d_minus_sub,
    }
}

/// 由分裂系数装配面通量（含面积）
pub(crate) fn assemble(
    split: &SplitCoefficients,
    left: Prim,
    right: Prim,
    nx: f64,
    ny: f64,
    area: f64,
    gamma: f64,
) -> [f64; 4] {
    let mass_left = left.rho * split.a_avg * split.c_plus;
    let mass_right = right.rho * split.a_avg * split.c_minus;

    let h_left = left.stagnation_enthalpy(gamma);
    let h_right = right.stagnation_enthalpy(gamma);

    [
        area * (mass_left + mass_right),
        area * (mass_left * left.u
            + split.d_plus * left.p * nx
            + mass_right * right.u
            + split.d_minus * right.p * nx),
        area * (mass_left * left.v
            + split.d_plus * left.p * ny
            + mass_right * right.v
            + split.d_minus * right.p * ny),
        area * (mass_left * h_left + mass_right * h_right),
    ]
}

/// Van Leer 格式
#[derive(Debug, Clone, Copy, Default)]
pub struct VanLeer;

impl FluxScheme for VanLeer {
    fn name(&self) -> &'static str {
        "van_leer"
    }

    fn accumulate(
        &self,
        faces: &FaceStates,
        metrics: &MeshMetrics,
        gamma: f64,
        fluxes: &mut FluxBuffers,
    ) {
        // f 维度 (imx+1, jmx, 4)，g 维度 (imx, jmx+1, 4)
        let (imx, jmx) = (fluxes.g.dim().0, fluxes.f.dim().1);

        for i in 1..=imx {
            for j in 1..jmx {
                let left = faces.xi_prim_left(i, j);
                let right = faces.xi_prim_right(i, j);
                let (nx, ny) = (metrics.xi_nx[[i, j]], metrics.xi_ny[[i, j]]);
                let coeffs = split(left, right, nx, ny, gamma);
                let flux = assemble(&coeffs, left, right, nx, ny, metrics.xi_area[[i, j]], gamma);
                for (var, value) in flux.iter().enumerate() {
                    fluxes.f[[i, j, var]] += value;
                }
            }
        }

        for i in 1..imx {
            for j in 1..=jmx {
                let left = faces.eta_prim_left(i, j);
                let right = faces.eta_prim_right(i, j);
                let (nx, ny) = (metrics.eta_nx[[i, j]], metrics.eta_ny[[i, j]]);
                let coeffs = split(left, right, nx, ny, gamma);
                let flux = assemble(&coeffs, left, right, nx, ny, metrics.eta_area[[i, j]], gamma);
                for (var, value) in flux.iter().enumerate() {
                    fluxes.g[[i, j, var]] += value;
                }
            }
        }
    }
}
