// crates/af_physics/src/schemes/ldfss.rs

//! LDFSS(0) 格式
//!
//! 低耗散通量分裂：先做 Van Leer 分裂，再从 c± 中扣除/加回一个
//! 压力加权的对流修正量，装配复用 Van Leer 的。
//!
//! ```text
//! M½  = ¼ β_L β_R (√((M⊥_L² + M⊥_R²)/2) − 1)²
//! c⁺ ← c⁺ − M½ (1 − (p_L − p_R)/(2 ρ_L a²))
//! c⁻ ← c⁻ + M½ (1 + (p_L − p_R)/(2 ρ_R a²))
//! ```
//!
//! β_L β_R 乘积使修正只在两侧都亚音速时生效；超音速面与
//! Van Leer 完全一致（同样退化为精确迎风通量）。

use super::van_leer::{assemble, split, SplitCoefficients};
use super::{FluxBuffers, FluxScheme};
use crate::field::Prim;
use crate::mesh::MeshMetrics;
use crate::reconstruction::FaceStates;

/// LDFSS(0) 格式
#[derive(Debug, Clone, Copy, Default)]
pub struct Ldfss0;

/// 对 Van Leer 分裂系数施加 LDFSS(0) 对流修正
pub(crate) fn correct(coeffs: &mut SplitCoefficients, left: Prim, right: Prim) {
    let m_half = 0.25
        * coeffs.beta_left
        * coeffs.beta_right
        * ((0.5 * (coeffs.m_left * coeffs.m_left + coeffs.m_right * coeffs.m_right)).sqrt() - 1.0)
            .powi(2);

    let a_sq = coeffs.a_avg * coeffs.a_avg;
    let p_diff = left.p - right.p;
    let m_plus = m_half * (1.0 - p_diff / (2.0 * left.rho * a_sq));
    let m_minus = m_half * (1.0 + p_diff / (2.0 * right.rho * a_sq));

    coeffs.c_plus -= m_plus;
    coeffs.c_minus += m_minus;
}

impl FluxScheme for Ldfss0 {
    fn name(&self) -> &'static str {
        "ldfss0"
    }

    fn accumulate(
        &self,
        faces: &FaceStates,
        metrics: &MeshMetrics,
        gamma: f64,
        fluxes: &mut FluxBuffers,
    ) {
        let (imx, jmx) = (fluxes.g.dim().0, fluxes.f.dim().1);

        for i in 1..=imx {
            for j in 1..jmx {
                let left = faces.xi_prim_left(i, j);
                let right = faces.xi_prim_right(i, j);
                let (nx, ny) = (metrics.xi_nx[[i, j]], metrics.xi_ny[[i, j]]);
                let mut coeffs = split(left, right, nx, ny, gamma);
                correct(&mut coeffs, left, right);
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
                let mut coeffs = split(left, right, nx, ny, gamma);
                correct(&mut coeffs, left, right);
                let flux = assemble(&coeffs, left, right, nx, ny, metrics.eta_area[[i, j]], gamma);
                for (var, value) in flux.iter().enumerate() {
                    fluxes.g[[i, j, var]] += value;
                }
            }
        }
    }
}
