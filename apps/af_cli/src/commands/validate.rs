// apps/af_cli/src/commands/validate.rs

//! 校验控制文件命令
//!
//! 解析控制文件并做数值约束检查，可选地以 JSON 输出解析结果。
//! 未知枚举值、数值越界都在这里暴露，不必等到真正起算。

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use tracing::info;

use af_config::parse_control_file;

/// 校验参数
#[derive(Args)]
pub struct ValidateArgs {
    /// 控制文件路径
    #[arg(short, long)]
    pub config: PathBuf,

    /// 以 JSON 输出解析后的配置
    #[arg(long)]
    pub json: bool,
}

/// 执行校验命令
pub fn execute(args: ValidateArgs) -> Result<()> {
    let config = parse_control_file(&args.config)
        .with_context(|| format!("解析控制文件失败: {}", args.config.display()))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&config)?);
    } else {
        info!(
            scheme = %config.scheme,
            interpolant = %config.interpolant,
            time_stepping = %config.time_stepping,
            time_accuracy = %config.time_accuracy,
            grid = %config.grid_file.display(),
            "控制文件合法"
        );
    }
    Ok(())
}
