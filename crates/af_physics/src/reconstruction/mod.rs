// crates/af_physics/src/reconstruction/mod.rs

//! 面重构
//!
//! 由单元平均值得到每个 ξ/η 向面的左右原始状态。
//! 一阶重构直接复制相邻单元；高阶重构（MUSCL 类）做限制线性外推。
//!
//! 黏性通量的排序契约：无论无粘插值方式为何，黏性梯度始终
//! 基于一阶面状态计算，因此子步先做一阶重构、算黏性通量，
//! 再（在需要时）用高阶重构覆盖面状态。

mod limiter;
mod muscl;

pub use limiter::minmod;
pub use muscl::Muscl;

use ndarray::Array3;

use crate::field::{FlowField, Prim, NUM_VARS, P, RHO, U, V};

/// 左右面状态缓冲
///
/// ξ 向面数组维度 (imx+1, jmx, 4)，有效域 i ∈ [1, imx]、j ∈ [1, jmx−1]；
/// η 向面数组维度 (imx, jmx+1, 4)，有效域 i ∈ [1, imx−1]、j ∈ [1, jmx]。
/// 左侧指 −ξ/−η 一侧（索引较小的单元）。
#[derive(Debug, Clone)]
pub struct FaceStates {
    /// ξ 向面左状态
    pub xi_left: Array3<f64>,
    /// ξ 向面右状态
    pub xi_right: Array3<f64>,
    /// η 向面左状态
    pub eta_left: Array3<f64>,
    /// η 向面右状态
    pub eta_right: Array3<f64>,
}

impl FaceStates {
    /// 按网格尺寸分配
    pub fn new(imx: usize, jmx: usize) -> Self {
        Self {
            xi_left: Array3::zeros((imx + 1, jmx, NUM_VARS)),
            xi_right: Array3::zeros((imx + 1, jmx, NUM_VARS)),
            eta_left: Array3::zeros((imx, jmx + 1, NUM_VARS)),
            eta_right: Array3::zeros((imx, jmx + 1, NUM_VARS)),
        }
    }

    /// 读取 ξ 向面左状态
    #[inline]
    pub fn xi_prim_left(&self, i: usize, j: usize) -> Prim {
        prim_at(&self.xi_left, i, j)
    }

    /// 读取 ξ 向面右状态
    #[inline]
    pub fn xi_prim_right(&self, i: usize, j: usize) -> Prim {
        prim_at(&self.xi_right, i, j)
    }

    /// 读取 η 向面左状态
    #[inline]
    pub fn eta_prim_left(&self, i: usize, j: usize) -> Prim {
        prim_at(&self.eta_left, i, j)
    }

    /// 读取 η 向面右状态
    #[inline]
    pub fn eta_prim_right(&self, i: usize, j: usize) -> Prim {
        prim_at(&self.eta_right, i, j)
    }

    /// 写入 ξ 向面左右状态
    #[inline]
    pub fn set_xi(&mut self, i: usize, j: usize, left: Prim, right: Prim) {
        set_prim_at(&mut self.xi_left, i, j, left);
        set_prim_at(&mut self.xi_right, i, j, right);
    }

    /// 写入 η 向面左右状态
    #[inline]
    pub fn set_eta(&mut self, i: usize, j: usize, left: Prim, right: Prim) {
        set_prim_at(&mut self.eta_left, i, j, left);
        set_prim_at(&mut self.eta_right, i, j, right);
    }
}

#[inline]
fn prim_at(arr: &Array3<f64>, i: usize, j: usize) -> Prim {
    Prim {
        rho: arr[[i, j, RHO]],
        u: arr[[i, j, U]],
        v: arr[[i, j, V]],
        p: arr[[i, j, P]],
    }
}

#[inline]
fn set_prim_at(arr: &mut Array3<f64>, i: usize, j: usize, prim: Prim) {
    arr[[i, j, RHO]] = prim.rho;
    arr[[i, j, U]] = prim.u;
    arr[[i, j, V]] = prim.v;
    arr[[i, j, P]] = prim.p;
}

/// 面重构器接口
pub trait Reconstructor: Send + Sync {
    /// 重构器名称
    fn name(&self) -> &'static str;

    /// 填充全部面的左右状态
    fn reconstruct(&self, field: &FlowField, faces: &mut FaceStates);
}

/// 一阶重构：左值取 i−1 单元、右值取 i 单元
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstOrder;

impl Reconstructor for FirstOrder {
    fn name(&self) -> &'static str {
        "none"
    }

    fn reconstruct(&self, field: &FlowField, faces: &mut FaceStates) {
        let (imx, jmx) = (field.imx(), field.jmx());
        for i in 1..=imx {
            for j in 1..jmx {
                faces.set_xi(i, j, field.prim(i - 1, j), field.prim(i, j));
            }
        }
        for i in 1..imx {
            for j in 1..=jmx {
                faces.set_eta(i, j, field.prim(i, j - 1), field.prim(i, j));
            }
        }
    }
}
