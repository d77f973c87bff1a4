// apps/af_cli/src/commands/run.rs

//! 运行模拟命令
//!
//! 装配求解器并驱动外层循环：
//!
//! 1. 解析控制文件（固定顺序文本格式）
//! 2. 读入网格；可选读入浸入边界距离场与重启状态
//! 3. 迭代至 `max_iters` 或收敛
//! 4. 周期输出：`resnorms`（首步之后每步五个数）、`mass_residue`
//!    （每步五个数）、检查点 VTK 与下壁面压力分布

use anyhow::{Context, Result};
use clap::Args;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

use af_config::{parse_control_file, SolverConfig};
use af_io::history::{write_wall_pressure, LineSink};
use af_io::{grid, vtk};
use af_physics::field::{P, RHO, U, V};
use af_physics::immersed::{DistanceField, ImmersedBoundary};
use af_physics::{CurvilinearMesh, Solver};

/// 运行模拟参数
#[derive(Args)]
pub struct RunArgs {
    /// 控制文件路径
    #[arg(short, long)]
    pub config: PathBuf,

    /// 输出目录
    #[arg(short, long, default_value = ".")]
    pub output: PathBuf,
}

/// 执行运行命令
pub fn execute(args: RunArgs) -> Result<()> {
    let start = Instant::now();
    info!("=== AeroFlow 模拟启动 ===");

    let config = parse_control_file(&args.config)
        .with_context(|| format!("解析控制文件失败: {}", args.config.display()))?;
    info!(
        scheme = %config.scheme,
        interpolant = %config.interpolant,
        cfl = config.cfl,
        max_iters = config.max_iters,
        "控制文件已载入"
    );

    let mut solver = build_solver(&config)?;
    let mach = config.free_stream.x_speed.hypot(config.free_stream.y_speed)
        / (config.gas.gamma * config.free_stream.pressure / config.free_stream.density).sqrt();
    info!(
        imx = solver.mesh().imx,
        jmx = solver.mesh().jmx,
        mach = format!("{mach:.3}"),
        "求解器已装配"
    );

    std::fs::create_dir_all(&args.output)?;
    let mut resnorms = LineSink::create(&args.output.join("resnorms"))?;
    let mut mass_residue = LineSink::create(&args.output.join("mass_residue"))?;
    let pressure_path = args
        .output
        .join(format!("pressure-{}", config.interpolant));

    let mut converged = false;
    for _ in 0..config.max_iters {
        let report = solver.step().context("推进失败")?;

        mass_residue.write_line(&[
            report.mass_balance.net,
            report.mass_balance.inlet,
            report.mass_balance.exit,
            report.mass_balance.bottom,
            report.mass_balance.top,
        ])?;

        if report.iter > 1 {
            resnorms.write_line(&[
                report.resnorm,
                report.eq_norms[0],
                report.eq_norms[1],
                report.eq_norms[2],
                report.eq_norms[3],
            ])?;
        }

        if report.rejected_cells > 0 {
            debug!(
                iter = report.iter,
                cells = report.rejected_cells,
                "正值保护拒绝了部分单元更新"
            );
        }

        if config.checkpoint_iter > 0 && report.iter % config.checkpoint_iter == 0 {
            let path = args.output.join(format!("checkpoint_{:06}.vtk", report.iter));
            write_checkpoint(&solver, &path)
                .with_context(|| format!("写出检查点失败: {}", path.display()))?;
            write_wall_pressure(&pressure_path, &solver.wall_pressure())?;
            info!(iter = report.iter, file = %path.display(), "检查点已写出");
        }

        if report.iter % 100 == 0 || report.iter == 1 {
            info!(
                iter = report.iter,
                resnorm = report.resnorm,
                ratio = report.resnorm_ratio,
                "推进中"
            );
        }

        if solver.converged() {
            info!(iter = report.iter, "达到收敛容差");
            converged = true;
            break;
        }
    }

    // 最终输出：状态与下壁面压力
    let final_path = args.output.join("output.vtk");
    write_checkpoint(&solver, &final_path)?;
    write_wall_pressure(&pressure_path, &solver.wall_pressure())?;

    info!(
        iters = solver.iter(),
        converged,
        resnorm = solver.resnorm(),
        elapsed = ?start.elapsed(),
        "=== 模拟结束 ==="
    );
    Ok(())
}

/// 装配求解器（网格 → 浸入边界 → 求解器 → 重启状态）
fn build_solver(config: &SolverConfig) -> Result<Solver> {
    let grid_data = grid::read_grid(&config.grid_file)
        .with_context(|| format!("读取网格失败: {}", config.grid_file.display()))?;
    let mesh = CurvilinearMesh::new(grid_data.x, grid_data.y)?;

    let ib: Option<Box<dyn ImmersedBoundary>> = match &config.ib_file {
        Some(path) => {
            let distance = grid::read_distance_field(path)
                .with_context(|| format!("读取浸入边界距离场失败: {}", path.display()))?;
            let field = DistanceField::new(distance, mesh.imx, mesh.jmx)?;
            info!(
                xi_faces = field.xi_interface_count(),
                eta_faces = field.eta_interface_count(),
                "浸入边界已启用"
            );
            Some(Box::new(field))
        }
        None => None,
    };

    let mut solver = Solver::new(config.clone(), mesh, ib)?;

    if let Some(path) = &config.state_load_file {
        let state = vtk::load_state(path)
            .with_context(|| format!("载入状态文件失败: {}", path.display()))?;
        anyhow::ensure!(
            state.imx == solver.mesh().imx && state.jmx == solver.mesh().jmx,
            "状态文件维度 ({} x {}) 与网格 ({} x {}) 不符",
            state.imx,
            state.jmx,
            solver.mesh().imx,
            solver.mesh().jmx
        );
        solver.load_state(&state.density, &state.u, &state.v, &state.pressure)?;
        info!(file = %path.display(), "重启状态已载入");
    }

    Ok(solver)
}

/// 写出一个 VTK 检查点
fn write_checkpoint(solver: &Solver, path: &Path) -> Result<()> {
    let field = solver.field();
    vtk::write_state(
        path,
        &solver.mesh().x,
        &solver.mesh().y,
        &field.interior_component(U),
        &field.interior_component(V),
        &field.interior_component(RHO),
        &field.interior_component(P),
        solver.ib_distance().map(|d| ("IBDistance", d)),
    )?;
    Ok(())
}
