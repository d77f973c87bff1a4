// crates/af_physics/src/solver.rs

//! 求解器驱动
//!
//! [`Solver`] 是一个显式的值：装配期获取网格、度量、状态与格式暂存，
//! 析构时随所有权释放，不存在进程级全局状态。迭代计数、模拟时钟与
//! 残差范数都收拢在该值内。
//!
//! # 子步流水线
//!
//! 一个子步按契约顺序执行：
//!
//! 1. 清零 F、G
//! 2. 重填幽灵单元
//! 3. 一阶面重构
//! 4. 浸入边界复位界面面状态
//! 5. 黏性通量（若 μ_ref ≠ 0），随后浸入边界复位界面梯度
//! 6. 高阶重构（若插值 ≠ none），随后再次复位界面面状态
//! 7. 无粘通量
//! 8. 通量散度残差
//! 9. 时间步长（RK4 模式下跳过，由阶段 1 显式计算）
//! 10. 原始变量残差 dE/dx
//!
//! 外层步进调用一个子步，再调用积分器（RK4 在内部触发后续子步），
//! 推进模拟时钟与迭代计数，计算残差范数与质量守恒诊断。

use ndarray::{Array2, Array3};
use rayon::prelude::*;
use thiserror::Error;
use tracing::debug;

use af_config::{ConfigError, InterpolantKind, SolverConfig, TimeAccuracy};
use af_foundation::{AfError, NumericalTolerance};

use crate::boundary::{apply_ghost_conditions, WallTreatment};
use crate::field::{FlowField, FreeStream, NUM_VARS, P, RHO};
use crate::gas::GasModel;
use crate::immersed::ImmersedBoundary;
use crate::integrator::{euler_update, rk4_combine, stage_update, Rk4Scratch};
use crate::mesh::{CurvilinearMesh, MeshMetrics};
use crate::reconstruction::{FaceStates, FirstOrder, Muscl, Reconstructor};
use crate::residue::{compute_residue, residue_to_primitive};
use crate::schemes::{create_scheme, FluxBuffers, FluxScheme};
use crate::timestep::compute_dt;
use crate::viscous::accumulate_viscous;

/// 求解器错误
#[derive(Debug, Error)]
pub enum SolverError {
    /// 基础错误（分配、数值、IO）
    #[error(transparent)]
    Foundation(#[from] AfError),

    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
}

/// 质量守恒诊断
///
/// 四条物理边界上的质量通量及净流量（仅通量分量 1）。
#[derive(Debug, Clone, Copy)]
pub struct MassBalance {
    /// 净流量 = −入口 + 出口 − 下壁 + 上壁
    pub net: f64,
    /// 入口边界 ΣF₁@i=1
    pub inlet: f64,
    /// 出口边界 ΣF₁@i=imx
    pub exit: f64,
    /// 下壁边界 ΣG₁@j=1
    pub bottom: f64,
    /// 上壁边界 ΣG₁@j=jmx
    pub top: f64,
}

/// 单步报告
#[derive(Debug, Clone)]
pub struct StepReport {
    /// 迭代计数（本步完成后）
    pub iter: u64,
    /// 模拟时钟
    pub sim_clock: f64,
    /// 总残差范数
    pub resnorm: f64,
    /// resnorm / resnorm_0
    pub resnorm_ratio: f64,
    /// 四个方程各自的残差范数
    pub eq_norms: [f64; 4],
    /// 质量守恒诊断
    pub mass_balance: MassBalance,
    /// 被正值保护拒绝（欧拉）或检出非物理（RK4）的单元数
    pub rejected_cells: usize,
}

/// 求解器
pub struct Solver {
    config: SolverConfig,
    gas: GasModel,
    free_stream: FreeStream,
    tolerance: NumericalTolerance,
    mesh: CurvilinearMesh,
    metrics: MeshMetrics,
    field: FlowField,
    faces: FaceStates,
    fluxes: FluxBuffers,
    residue: Array3<f64>,
    dedx: Array3<f64>,
    dt: Array2<f64>,
    scheme: Box<dyn FluxScheme>,
    high_order: Option<Box<dyn Reconstructor>>,
    ib: Option<Box<dyn ImmersedBoundary>>,
    rk4: Rk4Scratch,
    wall: WallTreatment,
    iter: u64,
    sim_clock: f64,
    resnorm: f64,
    resnorm_0: f64,
}

impl Solver {
    /// 装配求解器
    ///
    /// 按依赖顺序分配：度量 ← 网格，状态与格式暂存 ← 度量。
    /// 初始状态为自由流；外部状态载入通过 [`Solver::load_state`]。
    pub fn new(
        config: SolverConfig,
        mesh: CurvilinearMesh,
        ib: Option<Box<dyn ImmersedBoundary>>,
    ) -> Result<Self, SolverError> {
        config.validate()?;

        let gas = GasModel::from_config(&config.gas);
        let free_stream = FreeStream::new(&config.free_stream, &gas);
        let metrics = MeshMetrics::new(&mesh)?;
        let (imx, jmx) = (mesh.imx, mesh.jmx);

        let field = FlowField::from_free_stream(imx, jmx, &free_stream);
        let faces = FaceStates::new(imx, jmx);
        let fluxes = FluxBuffers::new(imx, jmx);
        let shape = (imx + 1, jmx + 1, NUM_VARS);

        let scheme = create_scheme(config.scheme);
        let high_order: Option<Box<dyn Reconstructor>> = match config.interpolant {
            InterpolantKind::None => None,
            InterpolantKind::Muscl => Some(Box::new(Muscl)),
        };
        let wall = if config.is_viscous() {
            WallTreatment::NoSlip
        } else {
            WallTreatment::Reflect
        };
        let rk4 = Rk4Scratch::new(imx, jmx, &free_stream);

        Ok(Self {
            config,
            gas,
            free_stream,
            tolerance: NumericalTolerance::default(),
            mesh,
            metrics,
            field,
            faces,
            fluxes,
            residue: Array3::zeros(shape),
            dedx: Array3::zeros(shape),
            dt: Array2::zeros((imx + 1, jmx + 1)),
            scheme,
            high_order,
            ib,
            rk4,
            wall,
            iter: 0,
            sim_clock: 0.0,
            resnorm: 0.0,
            resnorm_0: 0.0,
        })
    }

    /// 载入内部单元状态（重启）
    pub fn load_state(
        &mut self,
        density: &Array2<f64>,
        u: &Array2<f64>,
        v: &Array2<f64>,
        pressure: &Array2<f64>,
    ) -> Result<(), SolverError> {
        self.field.load_interior(density, u, v, pressure)?;
        Ok(())
    }

    /// 推进一个外层步
    pub fn step(&mut self) -> Result<StepReport, SolverError> {
        self.sub_step();

        let rejected = match self.config.time_accuracy {
            TimeAccuracy::Euler => euler_update(
                &mut self.field,
                &self.dedx,
                &self.dt,
                &self.metrics.volume,
            ),
            TimeAccuracy::Rk4 => self.rk4_advance(),
        };

        self.sim_clock += self.minimum_dt();
        self.iter += 1;

        let (resnorm, eq_norms) = self.residue_norms();
        self.resnorm = resnorm;
        if self.iter == 1 {
            self.resnorm_0 = resnorm;
        }

        Ok(StepReport {
            iter: self.iter,
            sim_clock: self.sim_clock,
            resnorm,
            resnorm_ratio: if self.resnorm_0 > 0.0 {
                resnorm / self.resnorm_0
            } else {
                0.0
            },
            eq_norms,
            mass_balance: self.mass_balance(),
            rejected_cells: rejected,
        })
    }

    /// 收敛判定：resnorm / resnorm_0 < tolerance
    pub fn converged(&self) -> bool {
        if self.iter == 0 || self.resnorm_0 <= 0.0 {
            return false;
        }
        self.resnorm / self.resnorm_0 < self.config.tolerance
    }

    /// 子步流水线（阶段顺序是契约，见模块文档）
    fn sub_step(&mut self) {
        self.fluxes.zero();
        apply_ghost_conditions(&mut self.field, &self.free_stream, &self.metrics, self.wall);

        FirstOrder.reconstruct(&self.field, &mut self.faces);
        if let Some(ib) = &self.ib {
            ib.reset_states_at_interface_faces(&self.metrics, &mut self.faces);
        }

        if self.config.is_viscous() {
            // 黏性梯度始终基于一阶面状态
            accumulate_viscous(&self.faces, &self.metrics, &self.gas, &mut self.fluxes);
            if let Some(ib) = &self.ib {
                ib.reset_gradients_at_interfaces(&mut self.fluxes);
            }
        }

        if let Some(recon) = &self.high_order {
            recon.reconstruct(&self.field, &mut self.faces);
            if let Some(ib) = &self.ib {
                ib.reset_states_at_interface_faces(&self.metrics, &mut self.faces);
            }
        }

        self.scheme
            .accumulate(&self.faces, &self.metrics, self.gas.gamma, &mut self.fluxes);
        compute_residue(&self.fluxes, &mut self.residue);

        if self.config.time_accuracy != TimeAccuracy::Rk4 {
            self.compute_time_step();
        }

        residue_to_primitive(&self.field, &self.residue, self.gas.gamma, &mut self.dedx);
    }

    /// RK4 推进
    ///
    /// 阶段推进系数 ½、½、1，均从快照 Q_n 出发；终组合按
    /// 1/6、1/3、1/3、1/6 加权，不做正值保护，非物理单元按
    /// 调试级别记录后继续。
    fn rk4_advance(&mut self) -> usize {
        // Δt 基于 Q_n，整个 RK4 步保持不变
        self.compute_time_step();
        self.rk4.q_n.assign(&self.field);
        self.rk4.stages[0].assign(&self.dedx);

        // Stage 2: Q ← Q_n − ½Δt/V · dEdx₁
        stage_update(
            &mut self.field,
            &self.rk4.q_n,
            &self.rk4.stages[0],
            &self.dt,
            &self.metrics.volume,
            0.5,
        );
        self.sub_step();
        self.rk4.stages[1].assign(&self.dedx);

        // Stage 3: Q ← Q_n − ½Δt/V · dEdx₂
        stage_update(
            &mut self.field,
            &self.rk4.q_n,
            &self.rk4.stages[1],
            &self.dt,
            &self.metrics.volume,
            0.5,
        );
        self.sub_step();
        self.rk4.stages[2].assign(&self.dedx);

        // Stage 4: Q ← Q_n − Δt/V · dEdx₃
        stage_update(
            &mut self.field,
            &self.rk4.q_n,
            &self.rk4.stages[2],
            &self.dt,
            &self.metrics.volume,
            1.0,
        );
        self.sub_step();
        self.rk4.stages[3].assign(&self.dedx);

        let negatives = rk4_combine(
            &mut self.field,
            &self.rk4.q_n,
            &self.rk4.stages,
            &self.dt,
            &self.metrics.volume,
        );
        if negatives > 0 && self.config.debug_level >= 5 {
            debug!(
                iter = self.iter,
                cells = negatives,
                "RK4 终组合产生非物理单元"
            );
        }
        negatives
    }

    fn compute_time_step(&mut self) {
        compute_dt(
            &self.field,
            &self.metrics,
            &self.gas,
            self.config.cfl,
            self.config.time_stepping,
            &mut self.dt,
        );
    }

    /// 内部单元最小时间步长（模拟时钟推进量）
    fn minimum_dt(&self) -> f64 {
        let (imx, jmx) = (self.field.imx(), self.field.jmx());
        let mut min = f64::MAX;
        for i in 1..imx {
            for j in 1..jmx {
                min = min.min(self.dt[[i, j]]);
            }
        }
        min
    }

    /// 残差范数
    ///
    /// resnorm = √Σ[(R₁/N₁)² + (R₂/N₂)² + (R₃/N₃)² + (R₄/N₄)²]，
    /// 归一化因子 N₁ = ρ∞|v∞|、N₂ = N₃ = ρ∞|v∞|²、
    /// N₄ = ρ∞|v∞|(½|v∞|² + γ/(γ−1)·p∞/ρ∞)。
    fn residue_norms(&self) -> (f64, [f64; 4]) {
        let fs = &self.free_stream;
        let speed = fs.speed.max(self.tolerance.safe_div);
        let gamma = self.gas.gamma;

        let normalizers = [
            fs.prim.rho * speed,
            fs.prim.rho * speed * speed,
            fs.prim.rho * speed * speed,
            fs.prim.rho
                * speed
                * (0.5 * speed * speed + gamma / (gamma - 1.0) * fs.prim.p / fs.prim.rho),
        ];

        let (imx, jmx) = (self.field.imx(), self.field.jmx());
        let sums: [f64; NUM_VARS] = (1..imx)
            .into_par_iter()
            .map(|i| {
                let mut row = [0.0; NUM_VARS];
                for j in 1..jmx {
                    for (var, sum) in row.iter_mut().enumerate() {
                        let scaled = self.residue[[i, j, var]] / normalizers[var];
                        *sum += scaled * scaled;
                    }
                }
                row
            })
            .reduce(
                || [0.0; NUM_VARS],
                |mut acc, row| {
                    for (a, r) in acc.iter_mut().zip(row) {
                        *a += r;
                    }
                    acc
                },
            );

        let eq_norms = [
            sums[0].sqrt(),
            sums[1].sqrt(),
            sums[2].sqrt(),
            sums[3].sqrt(),
        ];
        let total = sums.iter().sum::<f64>().sqrt();
        (total, eq_norms)
    }

    /// 质量守恒诊断（仅通量分量 1）
    pub fn mass_balance(&self) -> MassBalance {
        let (imx, jmx) = (self.field.imx(), self.field.jmx());

        let inlet: f64 = (1..jmx).map(|j| self.fluxes.f[[1, j, RHO]]).sum();
        let exit: f64 = (1..jmx).map(|j| self.fluxes.f[[imx, j, RHO]]).sum();
        let bottom: f64 = (1..imx).map(|i| self.fluxes.g[[i, 1, RHO]]).sum();
        let top: f64 = (1..imx).map(|i| self.fluxes.g[[i, jmx, RHO]]).sum();

        MassBalance {
            net: -inlet + exit - bottom + top,
            inlet,
            exit,
            bottom,
            top,
        }
    }

    /// 下壁面压力分布：(面中心 x 坐标, 重构面压力)
    pub fn wall_pressure(&self) -> Vec<(f64, f64)> {
        let imx = self.field.imx();
        (1..imx)
            .map(|i| {
                let x = 0.5 * (self.mesh.x[[i - 1, 0]] + self.mesh.x[[i, 0]]);
                (x, self.faces.eta_left[[i, 1, P]])
            })
            .collect()
    }

    /// 迭代计数
    pub fn iter(&self) -> u64 {
        self.iter
    }

    /// 模拟时钟
    pub fn sim_clock(&self) -> f64 {
        self.sim_clock
    }

    /// 当前残差范数
    pub fn resnorm(&self) -> f64 {
        self.resnorm
    }

    /// 首步残差范数
    pub fn resnorm_0(&self) -> f64 {
        self.resnorm_0
    }

    /// 原始变量场
    pub fn field(&self) -> &FlowField {
        &self.field
    }

    /// 网格
    pub fn mesh(&self) -> &CurvilinearMesh {
        &self.mesh
    }

    /// 几何度量
    pub fn metrics(&self) -> &MeshMetrics {
        &self.metrics
    }

    /// 配置
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// 浸入边界符号距离（若启用）
    pub fn ib_distance(&self) -> Option<&Array2<f64>> {
        self.ib.as_ref().map(|ib| ib.signed_distance())
    }

    /// 当前守恒残差数组（诊断）
    pub fn residue(&self) -> &Array3<f64> {
        &self.residue
    }
}
