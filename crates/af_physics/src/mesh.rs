// crates/af_physics/src/mesh.rs

//! 曲线网格与几何度量
//!
//! 结构化 (imx × jmx) 顶点网格，以及由其一次性导出的面法向、
//! 面面积与单元体积。度量在构造后不可变。
//!
//! # 索引约定
//!
//! 单元以 (i, j) 编号，内部单元 i ∈ [1, imx−1]、j ∈ [1, jmx−1]，
//! 幽灵环占据 i ∈ {0, imx}、j ∈ {0, jmx}。ξ 向面位于 i ∈ [1, imx]，
//! η 向面位于 j ∈ [1, jmx]。所有场数组按此约定带垫边分配。
//!
//! 顶点数组按 0 基索引存储：单元 (i, j) 的四个角点是顶点
//! (i−1, j−1)、(i, j−1)、(i, j)、(i−1, j)。

use af_foundation::validation::ensure_grid_dims;
use af_foundation::{AfError, AfResult};
use glam::DVec2;
use ndarray::Array2;

/// 结构化曲线网格（顶点坐标）
///
/// 不变量：网格不自交、所有单元体积为正（由 [`MeshMetrics::new`] 校验）。
#[derive(Debug, Clone)]
pub struct CurvilinearMesh {
    /// i 方向顶点数
    pub imx: usize,
    /// j 方向顶点数
    pub jmx: usize,
    /// 顶点 x 坐标，维度 (imx, jmx)
    pub x: Array2<f64>,
    /// 顶点 y 坐标，维度 (imx, jmx)
    pub y: Array2<f64>,
}

impl CurvilinearMesh {
    /// 由顶点坐标数组构造
    pub fn new(x: Array2<f64>, y: Array2<f64>) -> AfResult<Self> {
        let (imx, jmx) = x.dim();
        if y.dim() != (imx, jmx) {
            return Err(AfError::allocation("网格坐标数组维度不一致", imx, jmx));
        }
        ensure_grid_dims(imx, jmx, "curvilinear mesh")?;
        Ok(Self { imx, jmx, x, y })
    }

    /// 生成均匀笛卡尔网格（测试与算例用）
    pub fn cartesian(imx: usize, jmx: usize, dx: f64, dy: f64) -> AfResult<Self> {
        ensure_grid_dims(imx, jmx, "cartesian mesh")?;
        let x = Array2::from_shape_fn((imx, jmx), |(i, _)| i as f64 * dx);
        let y = Array2::from_shape_fn((imx, jmx), |(_, j)| j as f64 * dy);
        Self::new(x, y)
    }

    /// 顶点坐标
    #[inline]
    pub fn vertex(&self, i: usize, j: usize) -> DVec2 {
        DVec2::new(self.x[[i, j]], self.y[[i, j]])
    }

    /// 内部单元 (i, j) 的形心（角点平均）
    #[inline]
    pub fn cell_center(&self, i: usize, j: usize) -> DVec2 {
        0.25 * (self.vertex(i - 1, j - 1)
            + self.vertex(i, j - 1)
            + self.vertex(i, j)
            + self.vertex(i - 1, j))
    }
}

/// 几何度量
///
/// 每面外法向单位分量与面积、每内部单元体积。
/// 由 [`CurvilinearMesh`] 一次性导出，随后整个求解过程保持不变。
#[derive(Debug, Clone)]
pub struct MeshMetrics {
    /// ξ 向面单位法向 x 分量，维度 (imx+1, jmx)，有效域 i ∈ [1, imx]、j ∈ [1, jmx−1]
    pub xi_nx: Array2<f64>,
    /// ξ 向面单位法向 y 分量
    pub xi_ny: Array2<f64>,
    /// ξ 向面面积（二维下为边长）
    pub xi_area: Array2<f64>,
    /// η 向面单位法向 x 分量，维度 (imx, jmx+1)，有效域 i ∈ [1, imx−1]、j ∈ [1, jmx]
    pub eta_nx: Array2<f64>,
    /// η 向面单位法向 y 分量
    pub eta_ny: Array2<f64>,
    /// η 向面面积
    pub eta_area: Array2<f64>,
    /// 单元体积，维度 (imx+1, jmx+1)；幽灵单元复制相邻内部单元
    pub volume: Array2<f64>,
}

impl MeshMetrics {
    /// 由网格导出度量
    ///
    /// ξ 向面法向指向 +ξ（由单元 i−1 指向单元 i），η 向面法向指向 +η。
    /// 任一单元体积非正即判定网格非法。
    pub fn new(mesh: &CurvilinearMesh) -> AfResult<Self> {
        let (imx, jmx) = (mesh.imx, mesh.jmx);

        let mut xi_nx = Array2::zeros((imx + 1, jmx));
        let mut xi_ny = Array2::zeros((imx + 1, jmx));
        let mut xi_area = Array2::zeros((imx + 1, jmx));
        let mut eta_nx = Array2::zeros((imx, jmx + 1));
        let mut eta_ny = Array2::zeros((imx, jmx + 1));
        let mut eta_area = Array2::zeros((imx, jmx + 1));
        let mut volume = Array2::zeros((imx + 1, jmx + 1));

        // ξ 向面：顶点 (i−1, j−1) 到 (i−1, j) 的边
        for i in 1..=imx {
            for j in 1..jmx {
                let a = mesh.vertex(i - 1, j - 1);
                let b = mesh.vertex(i - 1, j);
                let edge = b - a;
                let area = edge.length();
                if area <= 0.0 {
                    return Err(AfError::numerical(
                        "mesh",
                        "compute_metrics",
                        format!("ξ 向面 ({i}, {j}) 面积为零"),
                    ));
                }
                xi_area[[i, j]] = area;
                xi_nx[[i, j]] = edge.y / area;
                xi_ny[[i, j]] = -edge.x / area;
            }
        }

        // η 向面：顶点 (i−1, j−1) 到 (i, j−1) 的边
        for i in 1..imx {
            for j in 1..=jmx {
                let a = mesh.vertex(i - 1, j - 1);
                let b = mesh.vertex(i, j - 1);
                let edge = b - a;
                let area = edge.length();
                if area <= 0.0 {
                    return Err(AfError::numerical(
                        "mesh",
                        "compute_metrics",
                        format!("η 向面 ({i}, {j}) 面积为零"),
                    ));
                }
                eta_area[[i, j]] = area;
                eta_nx[[i, j]] = -edge.y / area;
                eta_ny[[i, j]] = edge.x / area;
            }
        }

        // 单元体积：对角线叉积的一半
        for i in 1..imx {
            for j in 1..jmx {
                let p1 = mesh.vertex(i - 1, j - 1);
                let p2 = mesh.vertex(i, j - 1);
                let p3 = mesh.vertex(i, j);
                let p4 = mesh.vertex(i - 1, j);
                let vol = 0.5 * (p3 - p1).perp_dot(p4 - p2).abs();
                if vol <= 0.0 {
                    return Err(AfError::numerical(
                        "mesh",
                        "compute_metrics",
                        format!("单元 ({i}, {j}) 体积非正: {vol}"),
                    ));
                }
                volume[[i, j]] = vol;
            }
        }

        // 幽灵单元体积复制相邻内部单元
        for j in 1..jmx {
            volume[[0, j]] = volume[[1, j]];
            volume[[imx, j]] = volume[[imx - 1, j]];
        }
        for i in 0..=imx {
            let lo = i.clamp(1, imx - 1);
            volume[[i, 0]] = volume[[lo, 1]];
            volume[[i, jmx]] = volume[[lo, jmx - 1]];
        }

        Ok(Self {
            xi_nx,
            xi_ny,
            xi_area,
            eta_nx,
            eta_ny,
            eta_area,
            volume,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn test_cartesian_metrics() {
        let mesh = CurvilinearMesh::cartesian(5, 4, 0.1, 0.2).unwrap();
        let metrics = MeshMetrics::new(&mesh).unwrap();

        // ξ 向面：法向 +x，面积 = dy
        assert!(approx_eq(metrics.xi_nx[[1, 1]], 1.0));
        assert!(approx_eq(metrics.xi_ny[[1, 1]], 0.0));
        assert!(approx_eq(metrics.xi_area[[1, 1]], 0.2));

        // η 向面：法向 +y，面积 = dx
        assert!(approx_eq(metrics.eta_nx[[1, 1]], 0.0));
        assert!(approx_eq(metrics.eta_ny[[1, 1]], 1.0));
        assert!(approx_eq(metrics.eta_area[[1, 1]], 0.1));

        // 单元体积 = dx * dy
        assert!(approx_eq(metrics.volume[[1, 1]], 0.02));
        // 幽灵体积复制
        assert!(approx_eq(metrics.volume[[0, 1]], 0.02));
    }

    #[test]
    fn test_single_cell_mesh() {
        // 2x2 顶点 = 单内部单元的边界情形
        let mesh = CurvilinearMesh::cartesian(2, 2, 1.0, 1.0).unwrap();
        let metrics = MeshMetrics::new(&mesh).unwrap();
        assert!(approx_eq(metrics.volume[[1, 1]], 1.0));
        assert!(approx_eq(metrics.xi_area[[2, 1]], 1.0));
        assert!(approx_eq(metrics.eta_area[[1, 2]], 1.0));
    }

    #[test]
    fn test_degenerate_mesh_rejected() {
        // 全部顶点重合
        let x = Array2::zeros((3, 3));
        let y = Array2::zeros((3, 3));
        let mesh = CurvilinearMesh::new(x, y).unwrap();
        assert!(MeshMetrics::new(&mesh).is_err());
    }

    #[test]
    fn test_too_small_mesh_rejected() {
        let x = Array2::zeros((1, 3));
        let y = Array2::zeros((1, 3));
        assert!(CurvilinearMesh::new(x, y).is_err());
    }

    #[test]
    fn test_cell_center() {
        let mesh = CurvilinearMesh::cartesian(3, 3, 1.0, 1.0).unwrap();
        let c = mesh.cell_center(1, 1);
        assert!(approx_eq(c.x, 0.5));
        assert!(approx_eq(c.y, 0.5));
    }

    #[test]
    fn test_skewed_mesh_positive_volume() {
        // 平行四边形单元
        let mut mesh = CurvilinearMesh::cartesian(3, 3, 1.0, 1.0).unwrap();
        for j in 0..3 {
            for i in 0..3 {
                mesh.x[[i, j]] += 0.3 * j as f64;
            }
        }
        let metrics = MeshMetrics::new(&mesh).unwrap();
        assert!(approx_eq(metrics.volume[[1, 1]], 1.0));
        // 倾斜后 ξ 向面不再与 y 轴对齐
        assert!(metrics.xi_ny[[1, 1]].abs() > 0.0);
    }
}
