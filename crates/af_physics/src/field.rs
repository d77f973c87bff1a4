// crates/af_physics/src/field.rs

//! 原始变量场
//!
//! 单元中心原始变量 (ρ, u, v, p)，带一圈幽灵单元。
//! 四个分量存放在单个三维数组中，通过访问方法读写，
//! 不存在对同一内存的两个可独立变异的别名。

use af_config::FreeStreamConfig;
use af_foundation::{AfError, AfResult};
use ndarray::{Array2, Array3};

use crate::gas::GasModel;

/// 密度分量下标
pub const RHO: usize = 0;
/// x 速度分量下标
pub const U: usize = 1;
/// y 速度分量下标
pub const V: usize = 2;
/// 压力分量下标
pub const P: usize = 3;
/// 原始变量分量数
pub const NUM_VARS: usize = 4;

/// 单点原始状态
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prim {
    /// 密度 ρ
    pub rho: f64,
    /// x 速度 u
    pub u: f64,
    /// y 速度 v
    pub v: f64,
    /// 压力 p
    pub p: f64,
}

impl Prim {
    /// 声速 √(γp/ρ)
    #[inline]
    pub fn sound_speed(&self, gamma: f64) -> f64 {
        (gamma * self.p / self.rho).sqrt()
    }

    /// 滞止焓 H = ½(u²+v²) + γ/(γ−1)·p/ρ
    #[inline]
    pub fn stagnation_enthalpy(&self, gamma: f64) -> f64 {
        0.5 * (self.u * self.u + self.v * self.v) + gamma / (gamma - 1.0) * self.p / self.rho
    }

    /// 法向速度 u·n
    #[inline]
    pub fn normal_speed(&self, nx: f64, ny: f64) -> f64 {
        self.u * nx + self.v * ny
    }
}

/// 自由流参考状态
///
/// 超音速标志在装配时计算一次：√(u∞²+v∞²)/a∞ ≥ 1。
#[derive(Debug, Clone, Copy)]
pub struct FreeStream {
    /// 自由流原始状态
    pub prim: Prim,
    /// 自由流速度幅值 |v∞|
    pub speed: f64,
    /// 自由流声速
    pub sound_speed: f64,
    /// 超音速标志
    pub supersonic: bool,
}

impl FreeStream {
    /// 从配置构造
    pub fn new(config: &FreeStreamConfig, gas: &GasModel) -> Self {
        let prim = Prim {
            rho: config.density,
            u: config.x_speed,
            v: config.y_speed,
            p: config.pressure,
        };
        let speed = (prim.u * prim.u + prim.v * prim.v).sqrt();
        let sound_speed = prim.sound_speed(gas.gamma);
        Self {
            prim,
            speed,
            sound_speed,
            supersonic: speed / sound_speed >= 1.0,
        }
    }

    /// 自由流马赫数
    pub fn mach(&self) -> f64 {
        self.speed / self.sound_speed
    }
}

/// 带幽灵环的原始变量场
///
/// 数组维度 (imx+1, jmx+1, 4)，单元索引与规格一致：
/// 内部 i ∈ [1, imx−1]、j ∈ [1, jmx−1]，幽灵 i ∈ {0, imx}、j ∈ {0, jmx}。
#[derive(Debug, Clone)]
pub struct FlowField {
    data: Array3<f64>,
    imx: usize,
    jmx: usize,
}

impl FlowField {
    /// 按网格尺寸分配，全场填充自由流
    pub fn from_free_stream(imx: usize, jmx: usize, free_stream: &FreeStream) -> Self {
        let mut field = Self {
            data: Array3::zeros((imx + 1, jmx + 1, NUM_VARS)),
            imx,
            jmx,
        };
        field.fill(free_stream.prim);
        field
    }

    /// i 方向顶点数
    #[inline]
    pub fn imx(&self) -> usize {
        self.imx
    }

    /// j 方向顶点数
    #[inline]
    pub fn jmx(&self) -> usize {
        self.jmx
    }

    /// 读取单元原始状态
    #[inline]
    pub fn prim(&self, i: usize, j: usize) -> Prim {
        Prim {
            rho: self.data[[i, j, RHO]],
            u: self.data[[i, j, U]],
            v: self.data[[i, j, V]],
            p: self.data[[i, j, P]],
        }
    }

    /// 写入单元原始状态
    #[inline]
    pub fn set_prim(&mut self, i: usize, j: usize, prim: Prim) {
        self.data[[i, j, RHO]] = prim.rho;
        self.data[[i, j, U]] = prim.u;
        self.data[[i, j, V]] = prim.v;
        self.data[[i, j, P]] = prim.p;
    }

    /// 读取单个分量
    #[inline]
    pub fn get(&self, i: usize, j: usize, var: usize) -> f64 {
        self.data[[i, j, var]]
    }

    /// 写入单个分量
    #[inline]
    pub fn set(&mut self, i: usize, j: usize, var: usize, value: f64) {
        self.data[[i, j, var]] = value;
    }

    /// 全场填充同一状态（含幽灵）
    pub fn fill(&mut self, prim: Prim) {
        for var in 0..NUM_VARS {
            let value = match var {
                RHO => prim.rho,
                U => prim.u,
                V => prim.v,
                _ => prim.p,
            };
            self.data.index_axis_mut(ndarray::Axis(2), var).fill(value);
        }
    }

    /// 从另一场整体复制（RK4 快照恢复）
    pub fn assign(&mut self, other: &FlowField) {
        self.data.assign(&other.data);
    }

    /// 以分量数组写入内部单元（状态文件载入）
    ///
    /// 输入数组维度必须为 (imx−1, jmx−1)，按内部单元 0 基排列。
    pub fn load_interior(
        &mut self,
        density: &Array2<f64>,
        u: &Array2<f64>,
        v: &Array2<f64>,
        pressure: &Array2<f64>,
    ) -> AfResult<()> {
        let expect = (self.imx - 1, self.jmx - 1);
        for (name, arr) in [
            ("density", density),
            ("u", u),
            ("v", v),
            ("pressure", pressure),
        ] {
            if arr.dim() != expect {
                return Err(AfError::allocation(
                    format!("状态载入: {name} 数组维度与网格不符"),
                    arr.dim().0,
                    arr.dim().1,
                ));
            }
        }
        for i in 1..self.imx {
            for j in 1..self.jmx {
                let prim = Prim {
                    rho: density[[i - 1, j - 1]],
                    u: u[[i - 1, j - 1]],
                    v: v[[i - 1, j - 1]],
                    p: pressure[[i - 1, j - 1]],
                };
                if prim.rho <= 0.0 || prim.p <= 0.0 {
                    return Err(AfError::numerical(
                        "field",
                        "load_interior",
                        format!("单元 ({i}, {j}) 非物理状态: ρ={}, p={}", prim.rho, prim.p),
                    ));
                }
                self.set_prim(i, j, prim);
            }
        }
        Ok(())
    }

    /// 导出内部单元分量数组（检查点输出）
    pub fn interior_component(&self, var: usize) -> Array2<f64> {
        Array2::from_shape_fn((self.imx - 1, self.jmx - 1), |(i, j)| {
            self.data[[i + 1, j + 1, var]]
        })
    }

    /// 检查全部内部单元满足 ρ > 0 ∧ p > 0
    pub fn interior_is_physical(&self) -> bool {
        for i in 1..self.imx {
            for j in 1..self.jmx {
                if self.data[[i, j, RHO]] <= 0.0 || self.data[[i, j, P]] <= 0.0 {
                    return false;
                }
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use af_config::GasConfig;

    fn free_stream(u: f64) -> FreeStream {
        let gas = GasModel::from_config(&GasConfig::default());
        FreeStream::new(
            &FreeStreamConfig {
                density: 1.225,
                x_speed: u,
                y_speed: 0.0,
                pressure: 101325.0,
            },
            &gas,
        )
    }

    #[test]
    fn test_supersonic_flag() {
        assert!(!free_stream(100.0).supersonic);
        assert!(free_stream(500.0).supersonic);
        // 正好音速视为超音速
        let fs = free_stream(0.0);
        let sonic = free_stream(fs.sound_speed);
        assert!(sonic.supersonic);
    }

    #[test]
    fn test_fill_and_access() {
        let fs = free_stream(100.0);
        let field = FlowField::from_free_stream(5, 4, &fs);
        // 内部与幽灵都填充自由流
        assert_eq!(field.prim(1, 1), fs.prim);
        assert_eq!(field.prim(0, 0), fs.prim);
        assert_eq!(field.prim(5, 4), fs.prim);
    }

    #[test]
    fn test_load_interior_round_trip() {
        let fs = free_stream(100.0);
        let mut field = FlowField::from_free_stream(4, 4, &fs);
        let rho = Array2::from_elem((3, 3), 2.0);
        let u = Array2::from_elem((3, 3), 10.0);
        let v = Array2::from_elem((3, 3), -5.0);
        let p = Array2::from_elem((3, 3), 5e4);
        field.load_interior(&rho, &u, &v, &p).unwrap();

        assert_eq!(field.prim(2, 2).rho, 2.0);
        assert_eq!(field.interior_component(U)[[0, 0]], 10.0);
        // 幽灵不受载入影响
        assert_eq!(field.prim(0, 1), fs.prim);
    }

    #[test]
    fn test_load_interior_rejects_negative_pressure() {
        let fs = free_stream(100.0);
        let mut field = FlowField::from_free_stream(4, 4, &fs);
        let rho = Array2::from_elem((3, 3), 2.0);
        let u = Array2::zeros((3, 3));
        let v = Array2::zeros((3, 3));
        let mut p = Array2::from_elem((3, 3), 5e4);
        p[[1, 1]] = -1.0;
        assert!(field.load_interior(&rho, &u, &v, &p).is_err());
    }

    #[test]
    fn test_load_interior_rejects_wrong_dims() {
        let fs = free_stream(100.0);
        let mut field = FlowField::from_free_stream(4, 4, &fs);
        let wrong = Array2::zeros((2, 3));
        let ok = Array2::from_elem((3, 3), 1.0);
        assert!(field.load_interior(&wrong, &ok, &ok, &ok).is_err());
    }

    #[test]
    fn test_interior_is_physical() {
        let fs = free_stream(100.0);
        let mut field = FlowField::from_free_stream(4, 4, &fs);
        assert!(field.interior_is_physical());
        field.set(2, 2, RHO, -1.0);
        assert!(!field.interior_is_physical());
    }

    #[test]
    fn test_stagnation_enthalpy() {
        let prim = Prim {
            rho: 1.0,
            u: 3.0,
            v: 4.0,
            p: 1.0,
        };
        let h = prim.stagnation_enthalpy(1.4);
        // ½·25 + 3.5·1 = 16.0
        assert!((h - 16.0).abs() < 1e-12);
    }
}
