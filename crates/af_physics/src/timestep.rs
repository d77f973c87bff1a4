// crates/af_physics/src/timestep.rs

//! CFL 时间步长
//!
//! 两种模式：
//!
//! - **局部**：每单元 Δt(i,j) = CFL · V / Σ(A_k λ_k)，λ_k = |u·n| + a，
//!   对四周面求和
//! - **全局**：配置了正的覆盖值则全场取该常数；否则取局部步长的
//!   全域最小值广播（非正覆盖值同样回退）
//!
//! 即使全局模式，Δt 也写入每单元数组，更新公式不区分模式。

use ndarray::Array2;
use rayon::prelude::*;
use std::sync::atomic::{AtomicU64, Ordering};

use af_config::TimeStepping;

use crate::field::FlowField;
use crate::gas::GasModel;
use crate::mesh::MeshMetrics;

/// 计算 Δt 数组
pub fn compute_dt(
    field: &FlowField,
    metrics: &MeshMetrics,
    gas: &GasModel,
    cfl: f64,
    stepping: TimeStepping,
    dt: &mut Array2<f64>,
) {
    match stepping {
        TimeStepping::Local => {
            compute_local_dt(field, metrics, gas, cfl, dt);
        }
        TimeStepping::Global(global) if global > 0.0 => {
            fill_interior(field, dt, global);
        }
        TimeStepping::Global(_) => {
            // 无覆盖值：局部最小值广播
            compute_local_dt(field, metrics, gas, cfl, dt);
            let min = interior_minimum(field, dt);
            fill_interior(field, dt, min);
        }
    }
}

/// 局部 CFL 步长
fn compute_local_dt(
    field: &FlowField,
    metrics: &MeshMetrics,
    gas: &GasModel,
    cfl: f64,
    dt: &mut Array2<f64>,
) {
    let (imx, jmx) = (field.imx(), field.jmx());
    for i in 1..imx {
        for j in 1..jmx {
            let prim = field.prim(i, j);
            let a = gas.sound_speed(prim.rho, prim.p);

            let faces = [
                (metrics.xi_nx[[i, j]], metrics.xi_ny[[i, j]], metrics.xi_area[[i, j]]),
                (
                    metrics.xi_nx[[i + 1, j]],
                    metrics.xi_ny[[i + 1, j]],
                    metrics.xi_area[[i + 1, j]],
                ),
                (metrics.eta_nx[[i, j]], metrics.eta_ny[[i, j]], metrics.eta_area[[i, j]]),
                (
                    metrics.eta_nx[[i, j + 1]],
                    metrics.eta_ny[[i, j + 1]],
                    metrics.eta_area[[i, j + 1]],
                ),
            ];

            let mut wave_sum = 0.0;
            for (nx, ny, area) in faces {
                let lambda = prim.normal_speed(nx, ny).abs() + a;
                wave_sum += area * lambda;
            }
            dt[[i, j]] = cfl * metrics.volume[[i, j]] / wave_sum;
        }
    }
}

/// 内部单元最小步长（并行原子归约）
fn interior_minimum(field: &FlowField, dt: &Array2<f64>) -> f64 {
    let (imx, jmx) = (field.imx(), field.jmx());
    let n = (imx - 1) * (jmx - 1);

    let min_bits = AtomicU64::new(f64::MAX.to_bits());
    (0..n).into_par_iter().for_each(|idx| {
        let i = 1 + idx / (jmx - 1);
        let j = 1 + idx % (jmx - 1);
        min_bits.fetch_min(dt[[i, j]].to_bits(), Ordering::Relaxed);
    });
    f64::from_bits(min_bits.load(Ordering::Relaxed))
}

fn fill_interior(field: &FlowField, dt: &mut Array2<f64>, value: f64) {
    let (imx, jmx) = (field.imx(), field.jmx());
    for i in 1..imx {
        for j in 1..jmx {
            dt[[i, j]] = value;
        }
    }
}
