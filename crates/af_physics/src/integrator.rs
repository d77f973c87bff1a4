// crates/af_physics/src/integrator.rs

//! 显式时间积分
//!
//! 更新在原始变量上进行：Q' = Q_base − dE/dx · Δt/V。
//!
//! - **前向欧拉**：单级，带逐单元正值保护——候选值 ρ'、p' 有一个
//!   非正即放弃该单元的更新，保留原状态（局部稳健性限制器）
//! - **经典 RK4**：快照 Q_n，四个阶段残差 dEdx₁..₄，阶段推进系数
//!   ½、½、1（均从 Q_n 出发，经正值保护更新），终组合
//!   Q = Q_n − Δt/V (dEdx₁/6 + dEdx₂/3 + dEdx₃/3 + dEdx₄/6)；
//!   终组合不做保护，非物理单元计数后由调用方按调试级别记录

use ndarray::{Array2, Array3};

use crate::field::{FlowField, FreeStream, Prim, NUM_VARS, P, RHO, U, V};

/// RK4 暂存
///
/// 阶段 0 的状态快照与四个阶段的原始变量残差。
#[derive(Debug, Clone)]
pub struct Rk4Scratch {
    /// 阶段 0 状态快照 Q_n
    pub q_n: FlowField,
    /// 四个阶段残差 dEdx₁..₄
    pub stages: [Array3<f64>; 4],
}

impl Rk4Scratch {
    /// 按网格尺寸分配
    pub fn new(imx: usize, jmx: usize, free_stream: &FreeStream) -> Self {
        let shape = (imx + 1, jmx + 1, NUM_VARS);
        Self {
            q_n: FlowField::from_free_stream(imx, jmx, free_stream),
            stages: [
                Array3::zeros(shape),
                Array3::zeros(shape),
                Array3::zeros(shape),
                Array3::zeros(shape),
            ],
        }
    }
}

/// RK4 阶段推进：field ← guarded(Q_n − factor·Δt/V · dedx)
///
/// `factor` 缩放 Δt（阶段 2、3 用 ½，阶段 4 用 1），始终从快照
/// `q_n` 出发。候选值 ρ'、p' 有一个非正即退回 Q_n 的单元状态。
///
/// # 返回
/// 被正值保护拒绝的单元数
pub fn stage_update(
    field: &mut FlowField,
    q_n: &FlowField,
    dedx: &Array3<f64>,
    dt: &Array2<f64>,
    volume: &Array2<f64>,
    factor: f64,
) -> usize {
    let (imx, jmx) = (field.imx(), field.jmx());
    let mut rejected = 0;

    for i in 1..imx {
        for j in 1..jmx {
            let prev = q_n.prim(i, j);
            let scale = factor * dt[[i, j]] / volume[[i, j]];
            let candidate = Prim {
                rho: prev.rho - scale * dedx[[i, j, RHO]],
                u: prev.u - scale * dedx[[i, j, U]],
                v: prev.v - scale * dedx[[i, j, V]],
                p: prev.p - scale * dedx[[i, j, P]],
            };
            if candidate.rho > 0.0 && candidate.p > 0.0 {
                field.set_prim(i, j, candidate);
            } else {
                field.set_prim(i, j, prev);
                rejected += 1;
            }
        }
    }
    rejected
}

/// 前向欧拉更新（就地，正值保护）
///
/// # 返回
/// 被拒绝的单元数
pub fn euler_update(
    field: &mut FlowField,
    dedx: &Array3<f64>,
    dt: &Array2<f64>,
    volume: &Array2<f64>,
) -> usize {
    let (imx, jmx) = (field.imx(), field.jmx());
    let mut rejected = 0;

    for i in 1..imx {
        for j in 1..jmx {
            let prev = field.prim(i, j);
            let scale = dt[[i, j]] / volume[[i, j]];
            let candidate = Prim {
                rho: prev.rho - scale * dedx[[i, j, RHO]],
                u: prev.u - scale * dedx[[i, j, U]],
                v: prev.v - scale * dedx[[i, j, V]],
                p: prev.p - scale * dedx[[i, j, P]],
            };
            if candidate.rho > 0.0 && candidate.p > 0.0 {
                field.set_prim(i, j, candidate);
            } else {
                rejected += 1;
            }
        }
    }
    rejected
}

/// RK4 终组合（不做保护）
///
/// Q = Q_n − Δt/V (dEdx₁/6 + dEdx₂/3 + dEdx₃/3 + dEdx₄/6)
///
/// # 返回
/// 非物理（ρ ≤ 0 或 p ≤ 0）单元数，调用方按调试级别记录
pub fn rk4_combine(
    field: &mut FlowField,
    q_n: &FlowField,
    stages: &[Array3<f64>; 4],
    dt: &Array2<f64>,
    volume: &Array2<f64>,
) -> usize {
    const WEIGHTS: [f64; 4] = [1.0 / 6.0, 1.0 / 3.0, 1.0 / 3.0, 1.0 / 6.0];
    let (imx, jmx) = (field.imx(), field.jmx());
    let mut negatives = 0;

    for i in 1..imx {
        for j in 1..jmx {
            let prev = q_n.prim(i, j);
            let scale = dt[[i, j]] / volume[[i, j]];

            let mut increment = [0.0; NUM_VARS];
            for (stage, weight) in stages.iter().zip(WEIGHTS) {
                for (var, value) in increment.iter_mut().enumerate() {
                    *value += weight * stage[[i, j, var]];
                }
            }

            let updated = Prim {
                rho: prev.rho - scale * increment[RHO],
                u: prev.u - scale * increment[U],
                v: prev.v - scale * increment[V],
                p: prev.p - scale * increment[P],
            };
            if updated.rho <= 0.0 || updated.p <= 0.0 {
                negatives += 1;
            }
            field.set_prim(i, j, updated);
        }
    }
    negatives
}
