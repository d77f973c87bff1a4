// crates/af_physics/src/immersed.rs

//! 浸入边界协作接口
//!
//! 固体由单元带上的符号距离标记，而非贴体网格表达。核心只依赖
//! 一个小接口：重构之后复位界面面的左右状态、黏性通量之后复位
//! 界面面的梯度贡献。每次状态写入后都要重新复位，子步流水线
//! 负责时序。
//!
//! [`DistanceField`] 是具体实现：载入每内部单元的符号距离
//! （负值在固体内），按符号变化分类界面面，在界面面上以流体侧
//! 状态的滑移镜像覆盖固体侧，实现零法向通量。

use glam::DVec2;
use ndarray::Array2;

use af_foundation::{AfError, AfResult};

use crate::boundary::reflect_velocity;
use crate::field::{Prim, P, RHO, U, V};
use crate::mesh::MeshMetrics;
use crate::reconstruction::FaceStates;
use crate::schemes::FluxBuffers;

/// 浸入边界协作接口
pub trait ImmersedBoundary: Send + Sync {
    /// 复位界面面的左右重构状态（每次重构后调用）
    fn reset_states_at_interface_faces(&self, metrics: &MeshMetrics, faces: &mut FaceStates);

    /// 复位界面面的梯度贡献（黏性通量累加后调用）
    fn reset_gradients_at_interfaces(&self, fluxes: &mut FluxBuffers);

    /// 内部单元符号距离（检查点的附加标量输出）
    fn signed_distance(&self) -> &Array2<f64>;
}

/// 符号距离场浸入边界
///
/// 界面面：两侧单元符号距离异号的面。
#[derive(Debug, Clone)]
pub struct DistanceField {
    /// 内部单元符号距离，维度 (imx−1, jmx−1)
    interior: Array2<f64>,
    /// 带幽灵垫边的符号距离，维度 (imx+1, jmx+1)
    padded: Array2<f64>,
    /// 界面 ξ 向面 (i, j) 列表
    xi_faces: Vec<(usize, usize)>,
    /// 界面 η 向面 (i, j) 列表
    eta_faces: Vec<(usize, usize)>,
}

impl DistanceField {
    /// 由内部单元符号距离构造
    ///
    /// # 参数
    /// - `interior`: 维度 (imx−1, jmx−1) 的符号距离，负值在固体内
    /// - `imx`, `jmx`: 网格顶点数
    pub fn new(interior: Array2<f64>, imx: usize, jmx: usize) -> AfResult<Self> {
        if interior.dim() != (imx - 1, jmx - 1) {
            return Err(AfError::allocation(
                "浸入边界距离场维度与网格不符",
                interior.dim().0,
                interior.dim().1,
            ));
        }

        // 垫边：幽灵单元复制最近内部单元
        let mut padded = Array2::zeros((imx + 1, jmx + 1));
        for i in 0..=imx {
            for j in 0..=jmx {
                let ci = i.clamp(1, imx - 1);
                let cj = j.clamp(1, jmx - 1);
                padded[[i, j]] = interior[[ci - 1, cj - 1]];
            }
        }

        // 界面面分类：两侧符号异号
        let mut xi_faces = Vec::new();
        for i in 1..=imx {
            for j in 1..jmx {
                if padded[[i - 1, j]] * padded[[i, j]] < 0.0 {
                    xi_faces.push((i, j));
                }
            }
        }
        let mut eta_faces = Vec::new();
        for i in 1..imx {
            for j in 1..=jmx {
                if padded[[i, j - 1]] * padded[[i, j]] < 0.0 {
                    eta_faces.push((i, j));
                }
            }
        }

        Ok(Self {
            interior,
            padded,
            xi_faces,
            eta_faces,
        })
    }

    /// 界面 ξ 向面数量
    pub fn xi_interface_count(&self) -> usize {
        self.xi_faces.len()
    }

    /// 界面 η 向面数量
    pub fn eta_interface_count(&self) -> usize {
        self.eta_faces.len()
    }
}

/// 以流体侧状态的滑移镜像覆盖两侧
fn slip_pair(fluid: Prim, normal: DVec2) -> (Prim, Prim) {
    let velocity = DVec2::new(fluid.u, fluid.v);
    let mirrored = reflect_velocity(velocity, normal);
    let ghost = Prim {
        rho: fluid.rho,
        u: mirrored.x,
        v: mirrored.y,
        p: fluid.p,
    };
    (fluid, ghost)
}

impl ImmersedBoundary for DistanceField {
    fn reset_states_at_interface_faces(&self, metrics: &MeshMetrics, faces: &mut FaceStates) {
        for &(i, j) in &self.xi_faces {
            let normal = DVec2::new(metrics.xi_nx[[i, j]], metrics.xi_ny[[i, j]]);
            let left_is_fluid = self.padded[[i - 1, j]] >= 0.0;
            if left_is_fluid {
                let fluid = faces.xi_prim_left(i, j);
                let (left, right) = slip_pair(fluid, normal);
                faces.set_xi(i, j, left, right);
            } else {
                let fluid = faces.xi_prim_right(i, j);
                let (right, left) = slip_pair(fluid, normal);
                faces.set_xi(i, j, left, right);
            }
        }

        for &(i, j) in &self.eta_faces {
            let normal = DVec2::new(metrics.eta_nx[[i, j]], metrics.eta_ny[[i, j]]);
            let left_is_fluid = self.padded[[i, j - 1]] >= 0.0;
            if left_is_fluid {
                let fluid = faces.eta_prim_left(i, j);
                let (left, right) = slip_pair(fluid, normal);
                faces.set_eta(i, j, left, right);
            } else {
                let fluid = faces.eta_prim_right(i, j);
                let (right, left) = slip_pair(fluid, normal);
                faces.set_eta(i, j, left, right);
            }
        }
    }

    fn reset_gradients_at_interfaces(&self, fluxes: &mut FluxBuffers) {
        // 调用时缓冲中只有黏性贡献，界面面清零即移除其梯度
        for &(i, j) in &self.xi_faces {
            for var in [RHO, U, V, P] {
                fluxes.f[[i, j, var]] = 0.0;
            }
        }
        for &(i, j) in &self.eta_faces {
            for var in [RHO, U, V, P] {
                fluxes.g[[i, j, var]] = 0.0;
            }
        }
    }

    fn signed_distance(&self) -> &Array2<f64> {
        &self.interior
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{FlowField, FreeStream};
    use crate::gas::GasModel;
    use crate::mesh::CurvilinearMesh;
    use crate::reconstruction::{FirstOrder, Reconstructor};
    use af_config::{FreeStreamConfig, GasConfig};

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12 * (1.0 + a.abs().max(b.abs()))
    }

    /// 6x6 顶点网格，中央 (2..4, 2..4) 单元为固体
    fn centered_body() -> DistanceField {
        let mut interior = Array2::from_elem((5, 5), 1.0);
        for i in 1..4 {
            for j in 1..4 {
                interior[[i, j]] = -1.0;
            }
        }
        DistanceField::new(interior, 6, 6).unwrap()
    }

    #[test]
    fn test_interface_classification() {
        let ib = centered_body();
        // 固体块 3x3：每行 2 个 ξ 界面 × 3 行
        assert_eq!(ib.xi_interface_count(), 6);
        assert_eq!(ib.eta_interface_count(), 6);
    }

    #[test]
    fn test_no_body_no_interfaces() {
        let interior = Array2::from_elem((4, 4), 1.0);
        let ib = DistanceField::new(interior, 5, 5).unwrap();
        assert_eq!(ib.xi_interface_count(), 0);
        assert_eq!(ib.eta_interface_count(), 0);
    }

    #[test]
    fn test_dimension_mismatch_rejected() {
        let interior = Array2::from_elem((3, 4), 1.0);
        assert!(DistanceField::new(interior, 5, 5).is_err());
    }

    #[test]
    fn test_reset_states_cancels_normal_flux() {
        let gas = GasModel::from_config(&GasConfig::default());
        let fs = FreeStream::new(&FreeStreamConfig::default(), &gas);
        let mesh = CurvilinearMesh::cartesian(6, 6, 1.0, 1.0).unwrap();
        let metrics = MeshMetrics::new(&mesh).unwrap();
        let field = FlowField::from_free_stream(6, 6, &fs);
        let ib = centered_body();

        let mut faces = FaceStates::new(6, 6);
        FirstOrder.reconstruct(&field, &mut faces);
        ib.reset_states_at_interface_faces(&metrics, &mut faces);

        // 界面面两侧法向速度互为相反数（平均为零）
        let (i, j) = (2, 2); // 单元 (1,2) 流体 / (2,2) 固体之间的 ξ 界面
        let left = faces.xi_prim_left(i, j);
        let right = faces.xi_prim_right(i, j);
        let nx = metrics.xi_nx[[i, j]];
        let ny = metrics.xi_ny[[i, j]];
        assert!(approx_eq(
            left.normal_speed(nx, ny),
            -right.normal_speed(nx, ny)
        ));
        // 密度与压力取流体侧
        assert!(approx_eq(left.rho, fs.prim.rho));
        assert!(approx_eq(right.rho, fs.prim.rho));
    }

    #[test]
    fn test_reset_gradients_zeroes_interface_faces() {
        let ib = centered_body();
        let mut fluxes = FluxBuffers::new(6, 6);
        fluxes.f.fill(2.0);
        fluxes.g.fill(3.0);
        ib.reset_gradients_at_interfaces(&mut fluxes);

        assert_eq!(fluxes.f[[2, 2, 0]], 0.0);
        // 非界面面不受影响
        assert_eq!(fluxes.f[[1, 1, 0]], 2.0);
    }
}
