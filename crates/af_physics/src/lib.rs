// crates/af_physics/src/lib.rs

//! AeroFlow Physics Layer
//!
//! 二维、单元中心、有限体积可压缩流求解核心。
//! 在结构化曲线网格上积分二维欧拉方程（可选 Navier-Stokes 黏性贡献），
//! 使用迎风通量矢量分裂格式、可选高阶面重构与显式时间推进
//! （单级欧拉或经典四级 Runge-Kutta），并支持单元带级别的浸入边界耦合。
//!
//! # 模块概览
//!
//! - [`gas`]: 气体模型（声速、温度、Sutherland 黏性律）
//! - [`mesh`]: 曲线网格与面法向/面积/体积度量
//! - [`field`]: 带幽灵环的原始变量场
//! - [`boundary`]: 幽灵单元边界条件（单一入口）
//! - [`reconstruction`]: 面重构（一阶 / MUSCL 限制重构）
//! - [`schemes`]: 无粘通量格式（Van Leer / LDFSS(0)）
//! - [`viscous`]: 黏性面通量
//! - [`immersed`]: 浸入边界协作接口与距离场实现
//! - [`residue`]: 通量散度与原始变量残差变换
//! - [`timestep`]: CFL 时间步长（局部 / 全局）
//! - [`integrator`]: 显式时间积分（欧拉 / RK4）
//! - [`solver`]: 子步流水线与外层推进驱动
//!
//! # 数据流
//!
//! ```text
//! mesh ─> field ─> reconstruction ─> schemes ─> residue ─> integrator
//!                       │                          │
//!                    immersed                  timestep
//! ```
//!
//! 每个子步内的阶段顺序是契约（幽灵先于重构、黏性先于无粘、
//! IB 复位跟随每次状态写入），求解器负责维持。

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod boundary;
pub mod field;
pub mod gas;
pub mod immersed;
pub mod integrator;
pub mod mesh;
pub mod reconstruction;
pub mod residue;
pub mod schemes;
pub mod solver;
pub mod timestep;
pub mod viscous;

pub use field::{FlowField, FreeStream, Prim};
pub use gas::GasModel;
pub use mesh::{CurvilinearMesh, MeshMetrics};
pub use solver::{Solver, SolverError, StepReport};
