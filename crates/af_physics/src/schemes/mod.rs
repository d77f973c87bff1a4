// crates/af_physics/src/schemes/mod.rs

//! 无粘通量格式
//!
//! 抽象契约：给定面左右原始状态，产出 ξ/η 向面的四分量守恒通量。
//! 通量累加进缓冲（`+=`），允许黏性通量先行写入同一缓冲。
//!
//! 具体格式：
//! - [`VanLeer`]: 通量矢量分裂
//! - [`Ldfss0`]: Van Leer 分裂后做压力加权对流修正（组合结构，
//!   修正只触及 c±，装配复用 Van Leer 的）

mod ldfss;
mod van_leer;

pub use ldfss::Ldfss0;
pub use van_leer::VanLeer;

use ndarray::Array3;

use crate::field::NUM_VARS;
use crate::mesh::MeshMetrics;
use crate::reconstruction::FaceStates;
use af_config::SchemeKind;

/// 守恒通量缓冲
///
/// `f` 为 ξ 向面通量，维度 (imx+1, jmx, 4)；`g` 为 η 向面通量，
/// 维度 (imx, jmx+1, 4)。面积已计入通量。
#[derive(Debug, Clone)]
pub struct FluxBuffers {
    /// ξ 向面通量 F
    pub f: Array3<f64>,
    /// η 向面通量 G
    pub g: Array3<f64>,
}

impl FluxBuffers {
    /// 按网格尺寸分配
    pub fn new(imx: usize, jmx: usize) -> Self {
        Self {
            f: Array3::zeros((imx + 1, jmx, NUM_VARS)),
            g: Array3::zeros((imx, jmx + 1, NUM_VARS)),
        }
    }

    /// 清零（子步阶段 (i)）
    pub fn zero(&mut self) {
        self.f.fill(0.0);
        self.g.fill(0.0);
    }
}

/// 无粘通量格式接口
pub trait FluxScheme: Send + Sync {
    /// 格式名称
    fn name(&self) -> &'static str;

    /// 将全部面的无粘通量累加进缓冲
    fn accumulate(
        &self,
        faces: &FaceStates,
        metrics: &MeshMetrics,
        gamma: f64,
        fluxes: &mut FluxBuffers,
    );
}

/// 按配置构造格式
pub fn create_scheme(kind: SchemeKind) -> Box<dyn FluxScheme> {
    match kind {
        SchemeKind::VanLeer => Box::new(VanLeer),
        SchemeKind::Ldfss0 => Box::new(Ldfss0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_names() {
        assert_eq!(create_scheme(SchemeKind::VanLeer).name(), "van_leer");
        assert_eq!(create_scheme(SchemeKind::Ldfss0).name(), "ldfss0");
    }

    #[test]
    fn test_flux_buffers_zero() {
        let mut fluxes = FluxBuffers::new(4, 4);
        fluxes.f[[1, 1, 0]] = 3.0;
        fluxes.zero();
        assert_eq!(fluxes.f[[1, 1, 0]], 0.0);
    }
}
