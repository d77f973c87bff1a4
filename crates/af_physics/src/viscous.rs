// crates/af_physics/src/viscous.rs

//! 黏性面通量
//!
//! 以一阶面状态构造面中心梯度（法向差商），经 Sutherland 律取 μ(T)，
//! 组装应力张量与 Prandtl 数导热通量，从通量缓冲中扣除。
//!
//! 排序契约：黏性通量必须先于无粘通量写入缓冲，且无论无粘插值
//! 方式为何都基于一阶面状态（调用方负责时序）。
//!
//! 法向距离用相邻单元体积估计：dn = (V_L + V_R)/(2A)，
//! 幽灵单元体积已在度量构造时复制相邻内部单元，边界面无需特判。

use crate::gas::GasModel;
use crate::mesh::MeshMetrics;
use crate::reconstruction::FaceStates;
use crate::schemes::FluxBuffers;

/// 累加全部面的黏性通量（从缓冲中扣除）
pub fn accumulate_viscous(
    faces: &FaceStates,
    metrics: &MeshMetrics,
    gas: &GasModel,
    fluxes: &mut FluxBuffers,
) {
    let (imx, jmx) = (fluxes.g.dim().0, fluxes.f.dim().1);

    for i in 1..=imx {
        for j in 1..jmx {
            let left = faces.xi_prim_left(i, j);
            let right = faces.xi_prim_right(i, j);
            let nx = metrics.xi_nx[[i, j]];
            let ny = metrics.xi_ny[[i, j]];
            let area = metrics.xi_area[[i, j]];
            // ξ 向面 (i, j) 两侧单元为 (i−1, j) 与 (i, j)
            let dn = 0.5 * (metrics.volume[[i - 1, j]] + metrics.volume[[i, j]]) / area;
            let flux = face_viscous_flux(left, right, nx, ny, area, dn, gas);
            for (var, value) in flux.iter().enumerate() {
                fluxes.f[[i, j, var]] -= value;
            }
        }
    }

    for i in 1..imx {
        for j in 1..=jmx {
            let left = faces.eta_prim_left(i, j);
            let right = faces.eta_prim_right(i, j);
            let nx = metrics.eta_nx[[i, j]];
            let ny = metrics.eta_ny[[i, j]];
            let area = metrics.eta_area[[i, j]];
            let dn = 0.5 * (metrics.volume[[i, j - 1]] + metrics.volume[[i, j]]) / area;
            let flux = face_viscous_flux(left, right, nx, ny, area, dn, gas);
            for (var, value) in flux.iter().enumerate() {
                fluxes.g[[i, j, var]] -= value;
            }
        }
    }
}

/// 单面黏性通量
///
/// 梯度取法向差商在法向上的投影：∂q/∂x ≈ (Δq/dn)·n_x。
fn face_viscous_flux(
    left: crate::field::Prim,
    right: crate::field::Prim,
    nx: f64,
    ny: f64,
    area: f64,
    dn: f64,
    gas: &GasModel,
) -> [f64; 4] {
    // 法向差商
    let dudn = (right.u - left.u) / dn;
    let dvdn = (right.v - left.v) / dn;
    let t_left = gas.temperature(left.rho, left.p);
    let t_right = gas.temperature(right.rho, right.p);
    let dtdn = (t_right - t_left) / dn;

    // 面中心值
    let u = 0.5 * (left.u + right.u);
    let v = 0.5 * (left.v + right.v);
    let t = 0.5 * (t_left + t_right);

    let mu = gas.viscosity(t);
    let k = gas.conductivity(mu);

    // 方向导数投影
    let u_x = dudn * nx;
    let u_y = dudn * ny;
    let v_x = dvdn * nx;
    let v_y = dvdn * ny;

    let div = u_x + v_y;
    let tau_xx = mu * (2.0 * u_x - 2.0 / 3.0 * div);
    let tau_yy = mu * (2.0 * v_y - 2.0 / 3.0 * div);
    let tau_xy = mu * (u_y + v_x);

    // 能量通量：应力做功 + 导热
    let theta_x = u * tau_xx + v * tau_xy + k * dtdn * nx;
    let theta_y = u * tau_xy + v * tau_yy + k * dtdn * ny;

    [
        0.0,
        area * (tau_xx * nx + tau_xy * ny),
        area * (tau_xy * nx + tau_yy * ny),
        area * (theta_x * nx + theta_y * ny),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{FlowField, FreeStream, Prim};
    use crate::mesh::CurvilinearMesh;
    use crate::reconstruction::{FirstOrder, Reconstructor};
    use af_config::{FreeStreamConfig, GasConfig};

    fn viscous_gas() -> GasModel {
        GasModel::from_config(&GasConfig {
            mu_ref: 1.789e-5,
            ..GasConfig::default()
        })
    }

    #[test]
    fn test_uniform_flow_no_viscous_flux() {
        let gas = viscous_gas();
        let fs = FreeStream::new(&FreeStreamConfig::default(), &gas);
        let mesh = CurvilinearMesh::cartesian(5, 5, 0.1, 0.1).unwrap();
        let metrics = MeshMetrics::new(&mesh).unwrap();
        let field = FlowField::from_free_stream(5, 5, &fs);

        let mut faces = crate::reconstruction::FaceStates::new(5, 5);
        FirstOrder.reconstruct(&field, &mut faces);

        let mut fluxes = FluxBuffers::new(5, 5);
        accumulate_viscous(&faces, &metrics, &gas, &mut fluxes);

        // 均匀流无梯度，黏性通量恒零
        for value in fluxes.f.iter().chain(fluxes.g.iter()) {
            assert_eq!(*value, 0.0);
        }
    }

    #[test]
    fn test_shear_produces_momentum_flux() {
        let gas = viscous_gas();
        // 纯剪切：u 随 y 增大，ξ 向面无梯度，η 向面出现 τ_xy
        let left = Prim {
            rho: 1.225,
            u: 0.0,
            v: 0.0,
            p: 101325.0,
        };
        let right = Prim {
            rho: 1.225,
            u: 10.0,
            v: 0.0,
            p: 101325.0,
        };
        let flux = face_viscous_flux(left, right, 0.0, 1.0, 1.0, 0.1, &gas);

        // 质量分量恒零
        assert_eq!(flux[0], 0.0);
        // x 动量分量 = τ_xy = μ ∂u/∂y > 0
        let t = gas.temperature(1.225, 101325.0);
        let expected = gas.viscosity(t) * (10.0 / 0.1);
        assert!((flux[1] - expected).abs() < 1e-12 * expected.abs());
        // 对称法向应力：τ_yy 不含 u 的 y 梯度以外贡献
        assert!(flux[2].abs() < 1e-20);
    }

    #[test]
    fn test_heat_conduction_energy_flux() {
        let gas = viscous_gas();
        // 温差但无速度：能量通量只剩导热项
        let left = Prim {
            rho: 1.3,
            u: 0.0,
            v: 0.0,
            p: 101325.0,
        };
        let right = Prim {
            rho: 1.1,
            u: 0.0,
            v: 0.0,
            p: 101325.0,
        };
        let flux = face_viscous_flux(left, right, 1.0, 0.0, 1.0, 0.1, &gas);

        assert_eq!(flux[1], 0.0);
        assert_eq!(flux[2], 0.0);
        let t_left = gas.temperature(1.3, 101325.0);
        let t_right = gas.temperature(1.1, 101325.0);
        assert!((flux[3]).signum() == (t_right - t_left).signum());
    }
}
