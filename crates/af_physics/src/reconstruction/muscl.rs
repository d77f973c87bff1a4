// crates/af_physics/src/reconstruction/muscl.rs

//! MUSCL 限制重构
//!
//! 对每条网格线做分量式限制线性外推：
//!
//! ```text
//! q_L(i) = q[i−1] + ½ minmod(q[i−1] − q[i−2], q[i] − q[i−1])
//! q_R(i) = q[i]   − ½ minmod(q[i] − q[i−1], q[i+1] − q[i])
//! ```
//!
//! 模板超出幽灵环的面（紧邻边界的第一/最后一个面的外侧）退回一阶。
//! minmod 保证重构值落在相邻单元值的包络内，正状态不会因重构破坏。

use super::limiter::minmod;
use super::{FaceStates, Reconstructor};
use crate::field::{FlowField, NUM_VARS};

/// MUSCL 重构器（minmod 限制）
#[derive(Debug, Clone, Copy, Default)]
pub struct Muscl;

impl Reconstructor for Muscl {
    fn name(&self) -> &'static str {
        "muscl"
    }

    fn reconstruct(&self, field: &FlowField, faces: &mut FaceStates) {
        let (imx, jmx) = (field.imx(), field.jmx());

        // ξ 向面
        for i in 1..=imx {
            for j in 1..jmx {
                for var in 0..NUM_VARS {
                    let q_m1 = field.get(i - 1, j, var);
                    let q_0 = field.get(i, j, var);

                    let left = if i >= 2 {
                        let q_m2 = field.get(i - 2, j, var);
                        q_m1 + 0.5 * minmod(q_m1 - q_m2, q_0 - q_m1)
                    } else {
                        q_m1
                    };
                    let right = if i + 1 <= imx {
                        let q_p1 = field.get(i + 1, j, var);
                        q_0 - 0.5 * minmod(q_0 - q_m1, q_p1 - q_0)
                    } else {
                        q_0
                    };

                    faces.xi_left[[i, j, var]] = left;
                    faces.xi_right[[i, j, var]] = right;
                }
            }
        }

        // η 向面
        for i in 1..imx {
            for j in 1..=jmx {
                for var in 0..NUM_VARS {
                    let q_m1 = field.get(i, j - 1, var);
                    let q_0 = field.get(i, j, var);

                    let left = if j >= 2 {
                        let q_m2 = field.get(i, j - 2, var);
                        q_m1 + 0.5 * minmod(q_m1 - q_m2, q_0 - q_m1)
                    } else {
                        q_m1
                    };
                    let right = if j + 1 <= jmx {
                        let q_p1 = field.get(i, j + 1, var);
                        q_0 - 0.5 * minmod(q_0 - q_m1, q_p1 - q_0)
                    } else {
                        q_0
                    };

                    faces.eta_left[[i, j, var]] = left;
                    faces.eta_right[[i, j, var]] = right;
                }
            }
        }
    }
}
