// apps/af_cli/src/commands/info.rs

//! 概要命令
//!
//! 读入控制文件与网格，打印求解设定与网格规模概要。

use anyhow::{Context, Result};
use clap::Args;
use serde_json::json;
use std::path::PathBuf;

use af_config::parse_control_file;
use af_io::grid;

/// 概要参数
#[derive(Args)]
pub struct InfoArgs {
    /// 控制文件路径
    #[arg(short, long)]
    pub config: PathBuf,
}

/// 执行概要命令
pub fn execute(args: InfoArgs) -> Result<()> {
    let config = parse_control_file(&args.config)
        .with_context(|| format!("解析控制文件失败: {}", args.config.display()))?;
    let grid_data = grid::read_grid(&config.grid_file)
        .with_context(|| format!("读取网格失败: {}", config.grid_file.display()))?;

    let mach = config.free_stream.x_speed.hypot(config.free_stream.y_speed)
        / (config.gas.gamma * config.free_stream.pressure / config.free_stream.density).sqrt();

    let summary = json!({
        "scheme": config.scheme.to_string(),
        "interpolant": config.interpolant.to_string(),
        "time_accuracy": config.time_accuracy.to_string(),
        "cfl": config.cfl,
        "max_iters": config.max_iters,
        "viscous": config.is_viscous(),
        "immersed_boundary": config.ib_file.is_some(),
        "grid": {
            "imx": grid_data.imx,
            "jmx": grid_data.jmx,
            "interior_cells": (grid_data.imx - 1) * (grid_data.jmx - 1),
        },
        "free_stream": {
            "mach": mach,
            "supersonic": mach >= 1.0,
        },
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_info_reports_grid() {
        let dir = tempdir().unwrap();
        let grid_path = dir.path().join("grid.txt");
        std::fs::write(&grid_path, "2 2\n0.0 0.0\n1.0 0.0\n0.0 1.0\n1.0 1.0\n").unwrap();

        let control = format!(
            "van_leer\nnone\n0.5\nl\nnone\n1e-6\n{}\n~\n~\n100\n0\n0\n\
             1.4\n287.0\n1.225\n100.0\n0.0\n101325.0\n0.0\n288.15\n110.4\n0.72\n",
            grid_path.display()
        );
        let config_path = dir.path().join("control.txt");
        std::fs::write(&config_path, control).unwrap();

        assert!(execute(InfoArgs {
            config: config_path
        })
        .is_ok());
    }
}
