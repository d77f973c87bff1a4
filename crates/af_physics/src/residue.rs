// crates/af_physics/src/residue.rs

//! 通量散度与原始变量残差
//!
//! 每内部单元的残差是四周面通量的散度：
//!
//! ```text
//! R_k(i, j) = F_k(i+1, j) − F_k(i, j) + G_k(i, j+1) − G_k(i, j)
//! ```
//!
//! 残差经链式法则 Jacobian 变换为原始变量残差 dE/dx，
//! 这是时间积分器实际累加的量。逆变换用于诊断与测试。

use ndarray::Array3;

use crate::field::{FlowField, NUM_VARS};
use crate::schemes::FluxBuffers;

/// 计算通量散度残差
///
/// `residue` 维度 (imx+1, jmx+1, 4)，仅内部单元被写入。
pub fn compute_residue(fluxes: &FluxBuffers, residue: &mut Array3<f64>) {
    let (imx, jmx) = (fluxes.g.dim().0, fluxes.f.dim().1);
    for i in 1..imx {
        for j in 1..jmx {
            for var in 0..NUM_VARS {
                residue[[i, j, var]] = fluxes.f[[i + 1, j, var]] - fluxes.f[[i, j, var]]
                    + fluxes.g[[i, j + 1, var]]
                    - fluxes.g[[i, j, var]];
            }
        }
    }
}

/// 守恒残差 → 原始变量残差
///
/// ```text
/// dE₁ = R₁
/// dE₂ = (−u R₁ + R₂)/ρ
/// dE₃ = (−v R₁ + R₃)/ρ
/// dE₄ = ½(γ−1)(u²+v²)R₁ − (γ−1)u R₂ − (γ−1)v R₃ + (γ−1)R₄
/// ```
pub fn residue_to_primitive(
    field: &FlowField,
    residue: &Array3<f64>,
    gamma: f64,
    dedx: &mut Array3<f64>,
) {
    let (imx, jmx) = (field.imx(), field.jmx());
    let gm1 = gamma - 1.0;
    for i in 1..imx {
        for j in 1..jmx {
            let prim = field.prim(i, j);
            let r1 = residue[[i, j, 0]];
            let r2 = residue[[i, j, 1]];
            let r3 = residue[[i, j, 2]];
            let r4 = residue[[i, j, 3]];

            dedx[[i, j, 0]] = r1;
            dedx[[i, j, 1]] = (-prim.u * r1 + r2) / prim.rho;
            dedx[[i, j, 2]] = (-prim.v * r1 + r3) / prim.rho;
            dedx[[i, j, 3]] = 0.5 * gm1 * (prim.u * prim.u + prim.v * prim.v) * r1
                - gm1 * prim.u * r2
                - gm1 * prim.v * r3
                + gm1 * r4;
        }
    }
}

/// 原始变量残差 → 守恒残差（逆变换）
pub fn primitive_to_residue(
    field: &FlowField,
    dedx: &Array3<f64>,
    gamma: f64,
    residue: &mut Array3<f64>,
) {
    let (imx, jmx) = (field.imx(), field.jmx());
    let gm1 = gamma - 1.0;
    for i in 1..imx {
        for j in 1..jmx {
            let prim = field.prim(i, j);
            let e1 = dedx[[i, j, 0]];
            let e2 = dedx[[i, j, 1]];
            let e3 = dedx[[i, j, 2]];
            let e4 = dedx[[i, j, 3]];

            let r1 = e1;
            let r2 = prim.rho * e2 + prim.u * e1;
            let r3 = prim.rho * e3 + prim.v * e1;
            let r4 = e4 / gm1 - 0.5 * (prim.u * prim.u + prim.v * prim.v) * e1
                + prim.u * r2
                + prim.v * r3;

            residue[[i, j, 0]] = r1;
            residue[[i, j, 1]] = r2;
            residue[[i, j, 2]] = r3;
            residue[[i, j, 3]] = r4;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{FreeStream, Prim, NUM_VARS};
    use crate::gas::GasModel;
    use af_config::{FreeStreamConfig, GasConfig};

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9 * (1.0 + a.abs().max(b.abs()))
    }

    #[test]
    fn test_divergence_stencil() {
        let mut fluxes = FluxBuffers::new(3, 3);
        fluxes.f[[1, 1, 0]] = 1.0;
        fluxes.f[[2, 1, 0]] = 4.0;
        fluxes.g[[1, 1, 0]] = 2.0;
        fluxes.g[[1, 2, 0]] = 7.0;

        let mut residue = Array3::zeros((4, 4, NUM_VARS));
        compute_residue(&fluxes, &mut residue);
        // (4−1) + (7−2) = 8
        assert_eq!(residue[[1, 1, 0]], 8.0);
    }

    #[test]
    fn test_column_sum_telescopes() {
        // 一行内部单元的 ξ 向散度之和 = F(imx) − F(1)
        let mut fluxes = FluxBuffers::new(6, 3);
        for i in 1..=6 {
            fluxes.f[[i, 1, 0]] = (i * i) as f64;
        }
        let mut residue = Array3::zeros((7, 4, NUM_VARS));
        compute_residue(&fluxes, &mut residue);

        let sum: f64 = (1..6).map(|i| residue[[i, 1, 0]]).sum();
        assert!(approx_eq(sum, fluxes.f[[6, 1, 0]] - fluxes.f[[1, 1, 0]]));
    }

    #[test]
    fn test_jacobian_round_trip() {
        let gas = GasModel::from_config(&GasConfig::default());
        let fs = FreeStream::new(&FreeStreamConfig::default(), &gas);
        let mut field = FlowField::from_free_stream(4, 4, &fs);
        // 非均匀状态更有说服力
        field.set_prim(
            2,
            2,
            Prim {
                rho: 0.8,
                u: 120.0,
                v: -30.0,
                p: 9e4,
            },
        );

        let mut residue = Array3::zeros((5, 5, NUM_VARS));
        for i in 1..4 {
            for j in 1..4 {
                for var in 0..NUM_VARS {
                    residue[[i, j, var]] = (i + 2 * j + var) as f64 * 0.37 - 1.1;
                }
            }
        }

        let mut dedx = Array3::zeros((5, 5, NUM_VARS));
        residue_to_primitive(&field, &residue, gas.gamma, &mut dedx);

        let mut recovered = Array3::zeros((5, 5, NUM_VARS));
        primitive_to_residue(&field, &dedx, gas.gamma, &mut recovered);

        for i in 1..4 {
            for j in 1..4 {
                for var in 0..NUM_VARS {
                    assert!(
                        approx_eq(recovered[[i, j, var]], residue[[i, j, var]]),
                        "({i},{j},{var}): {} vs {}",
                        recovered[[i, j, var]],
                        residue[[i, j, var]]
                    );
                }
            }
        }
    }
}
